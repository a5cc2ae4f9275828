use crate::document::state::{ConditionOperand, State};
use crate::document::summary::DocumentSummary;
use crate::foundation::error::FxrResult;
use crate::foundation::version::Game;
use crate::graph::node::Node;
use crate::graph::write::check_tree;
use crate::value::modifier::Modifier;

/// Id lists stored at the end of version 5 files. They can always be rebuilt
/// from the tree with [`Document::gather_references`].
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct CrossReferences {
    /// Effect ids embedded by SFX reference actions.
    pub references: Vec<i32>,
    /// Ids sampled by `ExternalValue1` modifiers and state conditions.
    pub external_values: Vec<i32>,
    /// Ids sampled by `ExternalValue2` modifiers.
    pub unk_external_values: Vec<i32>,
}

impl CrossReferences {
    fn normalize(&mut self) {
        for list in [
            &mut self.references,
            &mut self.external_values,
            &mut self.unk_external_values,
        ] {
            list.sort_unstable();
            list.dedup();
        }
    }
}

/// One effect file.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub id: i32,
    pub root: Node,
    pub states: Vec<State>,
    pub cross_references: CrossReferences,
}

impl Document {
    /// An empty effect: a root node with nothing under it.
    pub fn new(id: i32) -> Self {
        Self {
            id,
            root: Node::root(),
            states: Vec::new(),
            cross_references: CrossReferences::default(),
        }
    }

    pub fn with_root(mut self, root: Node) -> Self {
        self.root = root;
        self
    }

    pub fn with_states(mut self, states: Vec<State>) -> Self {
        self.states = states;
        self
    }

    /// Rebuild the cross-reference lists by scanning the tree and the state
    /// table. Each list is sorted and deduplicated.
    pub fn gather_references(&self) -> CrossReferences {
        let mut refs = CrossReferences::default();
        refs.references
            .extend(self.root.walk_actions().filter_map(|a| a.sfx_reference()));
        for modifier in self.root.walk_properties().flat_map(|p| p.modifiers()) {
            match modifier {
                Modifier::ExternalValue1 { external_value, .. } => {
                    refs.external_values.push(*external_value)
                }
                Modifier::ExternalValue2 { external_value, .. } => {
                    refs.unk_external_values.push(*external_value)
                }
                _ => {}
            }
        }
        let condition_ids = self
            .states
            .iter()
            .flat_map(|s| &s.conditions)
            .flat_map(|c| c.operands())
            .filter_map(|operand| match operand {
                ConditionOperand::ExternalValue(id) => Some(id),
                _ => None,
            });
        refs.external_values.extend(condition_ids);
        refs.normalize();
        refs
    }

    /// Replace the stored cross-reference lists with freshly gathered ones.
    pub fn update_references(&mut self) {
        self.cross_references = self.gather_references();
    }

    /// Fail with the first structure in the tree that cannot be written for
    /// `game`.
    pub fn check_compatibility(&self, game: Game) -> FxrResult<()> {
        check_tree(&self.root, game)
    }

    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary::of(self)
    }
}
