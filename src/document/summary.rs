use crate::document::model::{CrossReferences, Document};
use crate::graph::action::Action;

/// Element counts of one document.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct DocumentSummary {
    pub id: i32,
    pub nodes: usize,
    pub max_depth: usize,
    pub effects: usize,
    pub actions: usize,
    /// Actions addressed by parameter name rather than raw lists.
    pub schema_actions: usize,
    pub properties: usize,
    pub animated_properties: usize,
    pub modifiers: usize,
    pub states: usize,
    pub conditions: usize,
    pub references: CrossReferences,
}

impl DocumentSummary {
    pub(crate) fn of(doc: &Document) -> Self {
        let mut summary = Self {
            id: doc.id,
            nodes: doc.root.walk().count(),
            effects: doc.root.walk_effects().count(),
            states: doc.states.len(),
            conditions: doc.states.iter().map(|s| s.conditions.len()).sum(),
            references: doc.gather_references(),
            ..Self::default()
        };

        let mut stack = vec![(&doc.root, 1)];
        while let Some((node, depth)) = stack.pop() {
            summary.max_depth = summary.max_depth.max(depth);
            stack.extend(node.children.iter().map(|c| (c, depth + 1)));
        }

        for action in doc.root.walk_actions() {
            summary.actions += 1;
            if matches!(action, Action::Schema(_)) {
                summary.schema_actions += 1;
            }
        }
        for property in doc.root.walk_properties() {
            summary.properties += 1;
            if property.is_animated() {
                summary.animated_properties += 1;
            }
            summary.modifiers += property.modifiers().len();
        }
        summary
    }
}
