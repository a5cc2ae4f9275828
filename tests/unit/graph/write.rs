use super::*;
use crate::binary::section::SectionEntry;
use crate::graph::action::{ActionType, SchemaAction};
use crate::graph::node::{EffectKind, NodeKind};

fn encode(root: &Node, game: Game) -> FxrResult<Vec<u8>> {
    let mut w = Writer::new();
    for &section in &Section::for_version(game.version())[1..9] {
        w.reserve(Slot::section_offset(section))?;
        w.reserve(Slot::section_count(section))?;
    }
    write_graph(&mut w, root, game)?;
    w.finish()
}

fn i32_at(bytes: &[u8], at: usize) -> i32 {
    i32::from_le_bytes(bytes[at..at + 4].try_into().unwrap())
}

/// Header pair `i` of the eight graph sections (nodes first).
fn entry(bytes: &[u8], i: usize) -> SectionEntry {
    SectionEntry {
        offset: i32_at(bytes, i * 8) as usize,
        count: i32_at(bytes, i * 8 + 4) as usize,
    }
}

fn tagged(code: i32) -> Node {
    Node::new(NodeKind::Other(code))
}

#[test]
fn nodes_are_written_breadth_first() {
    let root = Node::root()
        .with_child(tagged(1).with_child(tagged(11).with_child(tagged(111))))
        .with_child(tagged(2).with_child(tagged(21)));
    let bytes = encode(&root, Game::EldenRing).unwrap();
    let nodes = entry(&bytes, 0);
    assert_eq!(nodes.count, 6);
    let codes: Vec<i32> = (0..6).map(|k| i32_at(&bytes, nodes.offset + 48 * k)).collect();
    assert_eq!(codes, vec![2000, 1, 2, 11, 21, 111]);
}

#[test]
fn child_offsets_point_at_contiguous_child_headers() {
    let root = Node::root()
        .with_child(tagged(1).with_child(tagged(11)))
        .with_child(tagged(2));
    let bytes = encode(&root, Game::Sekiro).unwrap();
    let base = entry(&bytes, 0).offset;
    // root: child count 2, children start at the second header
    assert_eq!(i32_at(&bytes, base + 16), 2);
    assert_eq!(i32_at(&bytes, base + 40) as usize, base + 48);
    // node 1: one child, the fourth header
    assert_eq!(i32_at(&bytes, base + 48 + 40) as usize, base + 3 * 48);
}

#[test]
fn every_section_is_sixteen_byte_aligned() {
    let effect = Effect::new(EffectKind::Basic);
    let mut action = GenericAction::new(ActionType(900));
    action.fields1.push(Field::Int(3));
    action.properties1.push(Property::constant(2.0));
    let root = Node::root().with_effect(effect).with_action(action);
    let bytes = encode(&root, Game::EldenRing).unwrap();
    for i in 0..8 {
        assert_eq!(entry(&bytes, i).offset % 16, 0, "section {i}");
    }
    assert_eq!(entry(&bytes, 1).count, 1);
    assert_eq!(entry(&bytes, 2).count, 16);
    assert_eq!(entry(&bytes, 3).count, 1);
}

#[test]
fn zero_constant_stores_no_fields() {
    let mut action = GenericAction::new(ActionType(900));
    action.properties1.push(Property::constant(0.0));
    let bytes = encode(&Node::root().with_action(action), Game::EldenRing).unwrap();
    let properties = entry(&bytes, 3);
    assert_eq!(properties.count, 1);
    // tag: scalar, function zero, no loop
    assert_eq!(i32_at(&bytes, properties.offset) & 0xFFFF, 0);
    assert_eq!(i32_at(&bytes, properties.offset + 4), 0);
    assert_eq!(entry(&bytes, 7).count, 0);
}

#[test]
fn section10_is_rejected_for_version_4() {
    let mut action = GenericAction::new(ActionType(900));
    action.section10s.push(vec![1, 2, 3]);
    let root = Node::root().with_action(action);
    let err = encode(&root, Game::DarkSouls3).unwrap_err();
    assert!(matches!(err, FxrError::UnsupportedForVersion { .. }));

    let bytes = encode(&root, Game::EldenRing).unwrap();
    assert_eq!(entry(&bytes, 6).count, 1);
    assert_eq!(entry(&bytes, 7).count, 3);
}

#[test]
fn check_tree_reports_unsupported_schema_actions() {
    let spot = SchemaAction::new(ActionType::SPOT_LIGHT).unwrap();
    let root = Node::root().with_action(spot);
    assert!(check_tree(&root, Game::Sekiro).is_ok());
    let err = check_tree(&root, Game::DarkSouls3).unwrap_err();
    assert_eq!(
        err.to_string(),
        "action type 614 is not supported for Dark Souls III"
    );
}
