use std::borrow::Cow;

use crate::binary::field::Field;
use crate::binary::section::Section;
use crate::binary::writer::{Slot, SlotKind, Writer};
use crate::foundation::error::{FxrError, FxrResult};
use crate::foundation::version::Game;
use crate::graph::action::{Action, GenericAction};
use crate::graph::node::{Effect, Node};
use crate::value::codec::{encode_modifier, encode_property};
use crate::value::modifier::Modifier;
use crate::value::property::Property;

/// Sections start on this boundary.
pub(crate) const SECTION_ALIGN: usize = 16;

/// Pad, then point the header entry of `section` here. Returns the offset.
pub(crate) fn begin_section(w: &mut Writer, section: Section) -> FxrResult<usize> {
    w.pad_to(SECTION_ALIGN);
    let offset = w.position();
    w.fill_position(Slot::section_offset(section))?;
    Ok(offset)
}

pub(crate) fn end_section(
    w: &mut Writer,
    section: Section,
    offset: usize,
    count: usize,
) -> FxrResult<()> {
    w.fill_count(Slot::section_count(section), count)?;
    tracing::debug!(
        section = section.name(),
        offset,
        count,
        bytes = w.position() - offset,
        "wrote section"
    );
    Ok(())
}

/// Check that everything under `root` can be written for `game`.
pub(crate) fn check_tree(root: &Node, game: Game) -> FxrResult<()> {
    for action in root.walk_actions() {
        check_action(&*action.to_generic(game)?, game)?;
    }
    for property in root.walk_properties() {
        check_property(property, game)?;
        for modifier in property.modifiers() {
            modifier.validate()?;
        }
    }
    Ok(())
}

fn check_action(raw: &GenericAction, game: Game) -> FxrResult<()> {
    if !game.version().has_section10() && !raw.section10s.is_empty() {
        return Err(FxrError::unsupported(
            format!("section10 lists on action {}", raw.action_type),
            game,
        ));
    }
    Ok(())
}

fn check_property(property: &Property, game: Game) -> FxrResult<()> {
    if matches!(property, Property::Components(_)) && !game.has_component_curves() {
        return Err(FxrError::unsupported("per-component curve properties", game));
    }
    Ok(())
}

/// Write every section from the node tree through the field pool.
///
/// Nodes are emitted breadth-first. Every other entity kind is collected into
/// a flat list in the order its header is written, and the next pass walks
/// that list to write the bodies, which in turn fills the reservations made
/// by the headers.
pub(crate) fn write_graph(w: &mut Writer, root: &Node, game: Game) -> FxrResult<()> {
    let has_section10 = game.version().has_section10();

    let offset = begin_section(w, Section::Nodes)?;
    let mut nodes: Vec<&Node> = vec![root];
    write_node_header(w, root, 0)?;
    let mut next = 0;
    while let Some(&node) = nodes.get(next) {
        w.fill_position(Slot::new(SlotKind::NodeChildren, next))?;
        for child in &node.children {
            write_node_header(w, child, nodes.len())?;
            nodes.push(child);
        }
        next += 1;
    }
    end_section(w, Section::Nodes, offset, nodes.len())?;

    let offset = begin_section(w, Section::Effects)?;
    let mut effects: Vec<&Effect> = Vec::new();
    for (i, node) in nodes.iter().enumerate() {
        w.fill_position(Slot::new(SlotKind::NodeEffects, i))?;
        for effect in &node.effects {
            write_effect_header(w, effect, effects.len())?;
            effects.push(effect);
        }
    }
    end_section(w, Section::Effects, offset, effects.len())?;

    let offset = begin_section(w, Section::Actions)?;
    let mut actions: Vec<Cow<'_, GenericAction>> = Vec::new();
    for (i, node) in nodes.iter().enumerate() {
        w.fill_position(Slot::new(SlotKind::NodeActions, i))?;
        for action in &node.actions {
            push_action(w, &mut actions, action, game)?;
        }
    }
    for (i, effect) in effects.iter().enumerate() {
        w.fill_position(Slot::new(SlotKind::EffectActions, i))?;
        for action in &effect.actions {
            push_action(w, &mut actions, action, game)?;
        }
    }
    end_section(w, Section::Actions, offset, actions.len())?;

    let offset = begin_section(w, Section::Properties)?;
    let mut properties: Vec<&Property> = Vec::new();
    let mut property_fields: Vec<Vec<Field>> = Vec::new();
    for (i, action) in actions.iter().enumerate() {
        w.fill_position(Slot::new(SlotKind::ActionProperties, i))?;
        for property in action.properties() {
            check_property(property, game)?;
            let fields = encode_property(property);
            write_property_header(w, property, fields.len(), Some(properties.len()))?;
            properties.push(property);
            property_fields.push(fields);
        }
    }
    end_section(w, Section::Properties, offset, properties.len())?;

    let offset = begin_section(w, Section::Modifiers)?;
    let mut modifiers: Vec<Modifier> = Vec::new();
    let mut modifier_fields: Vec<Vec<Field>> = Vec::new();
    for (i, property) in properties.iter().enumerate() {
        w.fill_position(Slot::new(SlotKind::PropertyModifiers, i))?;
        for modifier in property.modifiers() {
            let modifier = modifier.broadcast(property.value_type())?;
            modifier.validate()?;
            let fields = encode_modifier(&modifier);
            write_modifier_header(w, &modifier, fields.len(), modifiers.len())?;
            modifiers.push(modifier);
            modifier_fields.push(fields);
        }
    }
    end_section(w, Section::Modifiers, offset, modifiers.len())?;

    let offset = begin_section(w, Section::ModifierProperties)?;
    let mut factor_fields: Vec<Vec<Field>> = Vec::new();
    for (i, modifier) in modifiers.iter().enumerate() {
        w.fill_position(Slot::new(SlotKind::ModifierProperties, i))?;
        if let Some(factor) = modifier.factor() {
            check_property(factor, game)?;
            let fields = encode_property(factor);
            write_property_header(w, factor, fields.len(), None)?;
            w.reserve_offset64(Slot::new(SlotKind::ModifierPropertyFields, factor_fields.len()))?;
            factor_fields.push(fields);
        }
    }
    end_section(w, Section::ModifierProperties, offset, factor_fields.len())?;

    let offset = begin_section(w, Section::Section10)?;
    let mut section10s: Vec<&[i32]> = Vec::new();
    if has_section10 {
        for (i, action) in actions.iter().enumerate() {
            w.fill_position(Slot::new(SlotKind::ActionSection10, i))?;
            for list in &action.section10s {
                w.write_count(list.len())?;
                w.write_i32(0);
                w.reserve_offset64(Slot::new(SlotKind::Section10Fields, section10s.len()))?;
                section10s.push(list);
            }
        }
    }
    end_section(w, Section::Section10, offset, section10s.len())?;

    let offset = begin_section(w, Section::Fields)?;
    let start = w.position();
    for (i, action) in actions.iter().enumerate() {
        w.fill_position(Slot::new(SlotKind::ActionFields1, i))?;
        write_fields(w, &action.fields1);
        w.fill_position(Slot::new(SlotKind::ActionFields2, i))?;
        write_fields(w, &action.fields2);
    }
    for (i, list) in section10s.iter().enumerate() {
        w.fill_position(Slot::new(SlotKind::Section10Fields, i))?;
        for &v in *list {
            w.write_i32(v);
        }
    }
    for (i, fields) in property_fields.iter().enumerate() {
        w.fill_position(Slot::new(SlotKind::PropertyFields, i))?;
        write_fields(w, fields);
    }
    for (i, fields) in modifier_fields.iter().enumerate() {
        w.fill_position(Slot::new(SlotKind::ModifierFields, i))?;
        write_fields(w, fields);
    }
    for (i, fields) in factor_fields.iter().enumerate() {
        w.fill_position(Slot::new(SlotKind::ModifierPropertyFields, i))?;
        write_fields(w, fields);
    }
    end_section(w, Section::Fields, offset, (w.position() - start) / 4)?;
    Ok(())
}

fn write_node_header(w: &mut Writer, node: &Node, index: usize) -> FxrResult<()> {
    w.write_i32(node.kind.code());
    w.write_i32(0);
    w.write_count(node.effects.len())?;
    w.write_count(node.actions.len())?;
    w.write_count(node.children.len())?;
    w.write_i32(0);
    w.reserve_offset64(Slot::new(SlotKind::NodeEffects, index))?;
    w.reserve_offset64(Slot::new(SlotKind::NodeActions, index))?;
    w.reserve_offset64(Slot::new(SlotKind::NodeChildren, index))
}

fn write_effect_header(w: &mut Writer, effect: &Effect, index: usize) -> FxrResult<()> {
    w.write_i32(effect.kind.code());
    w.write_i32(0);
    w.write_count(effect.actions.len())?;
    w.write_i32(0);
    w.reserve_offset64(Slot::new(SlotKind::EffectActions, index))
}

fn push_action<'a>(
    w: &mut Writer,
    actions: &mut Vec<Cow<'a, GenericAction>>,
    action: &'a Action,
    game: Game,
) -> FxrResult<()> {
    let raw = action.to_generic(game)?;
    check_action(&raw, game)?;
    let index = actions.len();
    let has_section10 = game.version().has_section10();

    w.write_u16(raw.action_type.0);
    w.write_i16(0);
    w.write_count(raw.fields1.len())?;
    w.write_count(raw.fields2.len())?;
    if has_section10 {
        w.write_count(raw.section10s.len())?;
    }
    w.write_count(raw.properties1.len())?;
    w.write_count(raw.properties2.len())?;
    w.reserve_offset64(Slot::new(SlotKind::ActionFields1, index))?;
    w.reserve_offset64(Slot::new(SlotKind::ActionFields2, index))?;
    if has_section10 {
        w.reserve_offset64(Slot::new(SlotKind::ActionSection10, index))?;
    }
    w.reserve_offset64(Slot::new(SlotKind::ActionProperties, index))?;
    actions.push(raw);
    Ok(())
}

/// Property header. Action-owned properties pass their index and get a
/// modifier list; modifier factors pass `None` and the caller reserves their
/// field offset under its own slot kind.
fn write_property_header(
    w: &mut Writer,
    property: &Property,
    field_count: usize,
    owned_index: Option<usize>,
) -> FxrResult<()> {
    let tag = property.tag();
    w.write_u16(tag);
    w.write_u16(tag);
    w.write_count(field_count)?;
    w.write_i32(0);
    let Some(index) = owned_index else {
        return Ok(());
    };
    w.reserve_offset64(Slot::new(SlotKind::PropertyFields, index))?;
    w.write_count(property.modifiers().len())?;
    w.write_i32(0);
    w.reserve_offset64(Slot::new(SlotKind::PropertyModifiers, index))
}

fn write_modifier_header(
    w: &mut Writer,
    modifier: &Modifier,
    field_count: usize,
    index: usize,
) -> FxrResult<()> {
    w.write_u16(modifier.tag_a());
    w.write_i16(0);
    w.write_i32(modifier.tag_b());
    w.write_count(field_count)?;
    w.write_i32(i32::from(modifier.factor().is_some()));
    w.reserve_offset64(Slot::new(SlotKind::ModifierFields, index))?;
    w.reserve_offset64(Slot::new(SlotKind::ModifierProperties, index))
}

fn write_fields(w: &mut Writer, fields: &[Field]) {
    for field in fields {
        field.write(w);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/write.rs"]
mod tests;
