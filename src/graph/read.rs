use std::collections::HashSet;

use crate::binary::field::Field;
use crate::binary::reader::Reader;
use crate::binary::section::{Section, SectionTable};
use crate::foundation::error::{FxrError, FxrResult};
use crate::foundation::version::Game;
use crate::graph::action::{Action, ActionType, GenericAction, SchemaAction};
use crate::graph::node::{Effect, EffectKind, Node, NodeKind};
use crate::schema::resolve::{lookup, resolve};
use crate::value::codec::{decode_modifier, decode_property};
use crate::value::modifier::Modifier;
use crate::value::property::{Property, PropertyFunction, unpack_tag};

/// Deepest node nesting accepted on read.
pub(crate) const MAX_NODE_DEPTH: usize = 128;

/// Read the node tree whose root header sits at the start of the nodes
/// section.
pub(crate) fn read_graph(
    r: &mut Reader<'_>,
    table: &SectionTable,
    game: Game,
    parse_schema_actions: bool,
) -> FxrResult<Node> {
    let nodes = table.get(Section::Nodes);
    if nodes.count == 0 {
        return Err(FxrError::format(nodes.offset, "file has no root node"));
    }
    let mut g = GraphReader {
        r,
        game,
        parse_schema_actions,
        counts: Counts::default(),
        visited: HashSet::new(),
        depth: 0,
    };
    g.r.step_in(nodes.offset)?;
    let root = g.read_node()?;
    g.r.step_out()?;

    for (section, found) in [
        (Section::Nodes, g.counts.nodes),
        (Section::Effects, g.counts.effects),
        (Section::Actions, g.counts.actions),
        (Section::Properties, g.counts.properties),
        (Section::Modifiers, g.counts.modifiers),
        (Section::ModifierProperties, g.counts.modifier_properties),
        (Section::Section10, g.counts.section10s),
    ] {
        let entry = table.get(section);
        if entry.count != found {
            return Err(FxrError::format(
                entry.offset,
                format!(
                    "header lists {} {}, the tree holds {found}",
                    entry.count,
                    section.name()
                ),
            ));
        }
    }
    Ok(root)
}

#[derive(Debug, Default)]
struct Counts {
    nodes: usize,
    effects: usize,
    actions: usize,
    properties: usize,
    modifiers: usize,
    modifier_properties: usize,
    section10s: usize,
}

struct GraphReader<'r, 'a> {
    r: &'r mut Reader<'a>,
    game: Game,
    parse_schema_actions: bool,
    counts: Counts,
    /// Header offsets of nodes read so far; a node may only be read once.
    visited: HashSet<usize>,
    depth: usize,
}

impl GraphReader<'_, '_> {
    /// Run `read_one` `count` times at `offset`, then return to the current
    /// position.
    fn read_many<T>(
        &mut self,
        offset: usize,
        count: usize,
        mut read_one: impl FnMut(&mut Self) -> FxrResult<T>,
    ) -> FxrResult<Vec<T>> {
        if count == 0 {
            return Ok(Vec::new());
        }
        self.r.step_in(offset)?;
        let mut out = Vec::with_capacity(count.min(self.r.remaining() / 16 + 1));
        for _ in 0..count {
            out.push(read_one(self)?);
        }
        self.r.step_out()?;
        Ok(out)
    }

    fn read_node(&mut self) -> FxrResult<Node> {
        let at = self.r.position();
        if !self.visited.insert(at) {
            return Err(FxrError::format(
                at,
                "node is referenced more than once in the tree",
            ));
        }
        if self.depth >= MAX_NODE_DEPTH {
            return Err(FxrError::format(
                at,
                format!("node tree is nested deeper than {MAX_NODE_DEPTH} levels"),
            ));
        }
        let kind = NodeKind::from_code(self.r.read_i32()?);
        self.r.assert_i32(&[0])?;
        let effect_count = self.r.read_count()?;
        let action_count = self.r.read_count()?;
        let child_count = self.r.read_count()?;
        self.r.assert_i32(&[0])?;
        let effects_offset = self.r.read_offset64()?;
        let actions_offset = self.r.read_offset64()?;
        let children_offset = self.r.read_offset64()?;
        self.counts.nodes += 1;

        let effects = self.read_many(effects_offset, effect_count, Self::read_effect)?;
        let actions = self.read_many(actions_offset, action_count, Self::read_action)?;
        self.depth += 1;
        let children = self.read_many(children_offset, child_count, Self::read_node)?;
        self.depth -= 1;
        Ok(Node {
            kind,
            effects,
            actions,
            children,
        })
    }

    fn read_effect(&mut self) -> FxrResult<Effect> {
        let kind = EffectKind::from_code(self.r.read_i32()?);
        self.r.assert_i32(&[0])?;
        let action_count = self.r.read_count()?;
        self.r.assert_i32(&[0])?;
        let actions_offset = self.r.read_offset64()?;
        self.counts.effects += 1;

        let actions = self.read_many(actions_offset, action_count, Self::read_action)?;
        Ok(Effect { kind, actions })
    }

    fn read_action(&mut self) -> FxrResult<Action> {
        let has_section10 = self.game.version().has_section10();
        let action_type = ActionType(self.r.read_u16()?);
        self.r.assert_i16(&[0])?;
        let fields1_count = self.r.read_count()?;
        let fields2_count = self.r.read_count()?;
        let section10_count = if has_section10 {
            self.r.read_count()?
        } else {
            0
        };
        let properties1_count = self.r.read_count()?;
        let properties2_count = self.r.read_count()?;
        let fields1_offset = self.r.read_offset64()?;
        let fields2_offset = self.r.read_offset64()?;
        let section10_offset = if has_section10 {
            self.r.read_offset64()?
        } else {
            0
        };
        let properties_offset = self.r.read_offset64()?;
        self.counts.actions += 1;

        let fields1 = Field::read_many_at(self.r, fields1_offset, fields1_count)?;
        let fields2 = Field::read_many_at(self.r, fields2_offset, fields2_count)?;
        let section10s = self.read_many(section10_offset, section10_count, Self::read_section10)?;
        let mut properties1 = self.read_many(
            properties_offset,
            properties1_count + properties2_count,
            |g| g.read_property(true),
        )?;
        let properties2 = properties1.split_off(properties1_count);

        let raw = GenericAction {
            action_type,
            fields1,
            fields2,
            properties1,
            properties2,
            section10s,
        };
        if self.parse_schema_actions && action_type != ActionType::NONE {
            return self.try_schema(raw, fields2_offset);
        }
        Ok(Action::Generic(raw))
    }

    /// Reinterpret `raw` through its schema, keeping the generic form when
    /// the game has no layout for it or the list lengths do not fit.
    fn try_schema(&mut self, raw: GenericAction, fields2_offset: usize) -> FxrResult<Action> {
        let Some(schema) = lookup(raw.action_type.0) else {
            return Ok(Action::Generic(raw));
        };
        let layout = match resolve(schema.action_type, self.game) {
            Ok(layout) => layout,
            Err(err) => {
                tracing::trace!(action = %raw.action_type, %err, "keeping generic action");
                return Ok(Action::Generic(raw));
            }
        };

        let mut stripped = None;
        if let Some(quirk) = schema.quirk
            && quirk.game == self.game
            && raw.fields2.len() == layout.fields2.len() + 1
            && quirk.index < raw.fields2.len()
        {
            self.r.step_in(fields2_offset + 4 * quirk.index)?;
            let word = self.r.read_u32()?;
            self.r.step_out()?;
            if word == quirk.value {
                tracing::trace!(
                    action = %raw.action_type,
                    index = quirk.index,
                    "skipping extra fields2 entry"
                );
                let mut trimmed = raw.clone();
                trimmed.fields2.remove(quirk.index);
                stripped = Some(trimmed);
            }
        }

        let candidate = stripped.as_ref().unwrap_or(&raw);
        match SchemaAction::from_generic(candidate, layout) {
            Some(action) => Ok(Action::Schema(action)),
            None => {
                tracing::trace!(
                    action = %raw.action_type,
                    fields1 = raw.fields1.len(),
                    fields2 = raw.fields2.len(),
                    properties1 = raw.properties1.len(),
                    properties2 = raw.properties2.len(),
                    "list lengths do not fit the schema, keeping generic action"
                );
                Ok(Action::Generic(raw))
            }
        }
    }

    fn read_section10(&mut self) -> FxrResult<Vec<i32>> {
        let count = self.r.read_count()?;
        self.r.assert_i32(&[0])?;
        let offset = self.r.read_offset64()?;
        self.counts.section10s += 1;
        let words = self.r.read_words_at(offset, count)?;
        Ok(words.into_iter().map(|w| w as i32).collect())
    }

    /// Property header at the current position. Action-owned properties carry
    /// a modifier list; modifier factors do not.
    fn read_property(&mut self, owned_by_action: bool) -> FxrResult<Property> {
        let at = self.r.position();
        let tag = self.r.read_u16()?;
        let mirror = self.r.read_u16()?;
        if tag != mirror {
            return Err(FxrError::format(
                at,
                format!("property tag {tag:#x} does not match its mirror {mirror:#x}"),
            ));
        }
        let field_count = self.r.read_count()?;
        self.r.assert_i32(&[0])?;
        let fields_offset = self.r.read_offset64()?;
        let (modifier_count, modifiers_offset) = if owned_by_action {
            let count = self.r.read_count()?;
            self.r.assert_i32(&[0])?;
            (count, self.r.read_offset64()?)
        } else {
            (0, 0)
        };
        if owned_by_action {
            self.counts.properties += 1;
        } else {
            self.counts.modifier_properties += 1;
        }

        if let Some((_, PropertyFunction::CompCurve, _)) = unpack_tag(tag)
            && !self.game.has_component_curves()
        {
            return Err(FxrError::unsupported("per-component curve properties", self.game));
        }
        let words = self.r.read_words_at(fields_offset, field_count)?;
        let mut property = decode_property(tag, &words, fields_offset)?;
        *property.modifiers_mut() =
            self.read_many(modifiers_offset, modifier_count, Self::read_modifier)?;
        Ok(property)
    }

    fn read_modifier(&mut self) -> FxrResult<Modifier> {
        let tag_a = self.r.read_u16()?;
        self.r.assert_i16(&[0])?;
        let tag_b = self.r.read_i32()?;
        let field_count = self.r.read_count()?;
        let property_count = self.r.assert_i32(&[0, 1])?;
        let fields_offset = self.r.read_offset64()?;
        let properties_offset = self.r.read_offset64()?;
        self.counts.modifiers += 1;

        let words = self.r.read_words_at(fields_offset, field_count)?;
        let factor = if property_count == 1 {
            self.r.step_in(properties_offset)?;
            let factor = self.read_property(false)?;
            self.r.step_out()?;
            Some(factor)
        } else {
            None
        };
        decode_modifier(tag_a, tag_b, &words, factor, fields_offset)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/read.rs"]
mod tests;
