use super::*;
use crate::binary::field::Field;
use crate::foundation::error::FxrError;
use crate::foundation::version::Game;
use crate::graph::action::{ActionType, GenericAction, SchemaAction};
use crate::graph::node::{Effect, EffectKind, Node, NodeKind};
use crate::value::modifier::Modifier;
use crate::value::property::{Keyframe, Property, SequenceFunction};

fn i32_at(bytes: &[u8], at: usize) -> i32 {
    i32::from_le_bytes(bytes[at..at + 4].try_into().unwrap())
}

fn sfx(id: i32) -> SchemaAction {
    SchemaAction::new(ActionType::SFX_REFERENCE)
        .unwrap()
        .with("sfx", Field::Int(id))
        .unwrap()
}

fn driven(ev1: i32, ev2: i32) -> GenericAction {
    let mut action = GenericAction::new(ActionType(900));
    action.properties1 = vec![
        Property::constant(2.0)
            .with_modifier(Modifier::external_value1(ev1, Property::constant(0.5)).unwrap()),
        Property::constant(3.0)
            .with_modifier(Modifier::external_value2(ev2, Property::constant(0.25)).unwrap()),
    ];
    action
}

fn sample() -> Document {
    let state = State::new(vec![
        Condition::new(
            ConditionOperator::GreaterOrEqual,
            ConditionOperand::StateTime,
            ConditionOperand::Literal(2.5),
        )
        .with_next_state(1),
        Condition::new(
            ConditionOperator::Equal,
            ConditionOperand::ExternalValue(1000),
            ConditionOperand::Literal(1.0),
        ),
    ]);
    let root = Node::root()
        .with_child(
            Node::new(NodeKind::Basic)
                .with_action(sfx(5))
                .with_action(driven(7, 9)),
        )
        .with_child(Node::new(NodeKind::Basic).with_action(sfx(3)).with_action(driven(7, 8)));
    Document::new(4_000_123)
        .with_root(root)
        .with_states(vec![state, State::default()])
}

#[test]
fn options_default_to_elden_ring() {
    let read = ReadOptions::default();
    assert_eq!(read.game, Game::EldenRing);
    assert!(read.parse_schema_actions);
    let write = WriteOptions::for_game(Game::Sekiro);
    assert_eq!(write.game, Game::Sekiro);
    assert!(write.recompute_references);
}

#[test]
fn header_layout_for_both_versions() {
    let doc = Document::new(77);
    let v5 = doc.write(&WriteOptions::for_game(Game::EldenRing)).unwrap();
    assert_eq!(&v5[0..4], b"FXR\0");
    assert_eq!(i32_at(&v5, 4) >> 16, 5);
    assert_eq!(i32_at(&v5, 8), 1);
    assert_eq!(i32_at(&v5, 12), 77);
    // states pair, then nodes pair
    assert_eq!(i32_at(&v5, 16), 128);
    assert_eq!(i32_at(&v5, 28), 1);
    assert_eq!(i32_at(&v5, 24) % 16, 0);

    let v4 = doc.write(&WriteOptions::for_game(Game::DarkSouls3)).unwrap();
    assert_eq!(i32_at(&v4, 4) >> 16, 4);
    assert_eq!(i32_at(&v4, 16), 96);
    assert!(v4.len() < v5.len());
}

#[test]
fn document_round_trips_with_states_and_references() {
    let mut doc = sample();
    doc.update_references();
    let bytes = doc.write(&WriteOptions::default()).unwrap();
    let read = Document::read(&bytes, &ReadOptions::default()).unwrap();
    assert_eq!(read, doc);
}

#[test]
fn version_4_drops_cross_references() {
    let mut doc = sample();
    doc.update_references();
    let bytes = doc.write(&WriteOptions::for_game(Game::DarkSouls3)).unwrap();
    let read = Document::read(&bytes, &ReadOptions::for_game(Game::DarkSouls3)).unwrap();
    assert_eq!(read.cross_references, CrossReferences::default());
    assert_eq!(read.root, doc.root);
    assert_eq!(read.states, doc.states);
}

#[test]
fn gather_references_scans_tree_and_states() {
    let refs = sample().gather_references();
    assert_eq!(refs.references, vec![3, 5]);
    assert_eq!(refs.external_values, vec![7, 1000]);
    assert_eq!(refs.unk_external_values, vec![8, 9]);
}

#[test]
fn stored_references_are_written_when_not_recomputed() {
    let mut doc = sample();
    doc.cross_references.references = vec![42];
    let opts = WriteOptions {
        recompute_references: false,
        ..WriteOptions::default()
    };
    let bytes = doc.write(&opts).unwrap();
    let read = Document::read(&bytes, &ReadOptions::default()).unwrap();
    assert_eq!(read.cross_references.references, vec![42]);
    assert!(read.cross_references.external_values.is_empty());

    let bytes = doc.write(&WriteOptions::default()).unwrap();
    let read = Document::read(&bytes, &ReadOptions::default()).unwrap();
    assert_eq!(read.cross_references.references, vec![3, 5]);
}

#[test]
fn reading_with_the_wrong_version_is_unsupported() {
    let bytes = Document::new(1)
        .write(&WriteOptions::for_game(Game::DarkSouls3))
        .unwrap();
    let err = Document::read(&bytes, &ReadOptions::for_game(Game::Sekiro)).unwrap_err();
    assert!(matches!(err, FxrError::UnsupportedForVersion { .. }));
}

#[test]
fn bad_magic_and_truncation_are_format_errors() {
    let mut bytes = Document::new(1).write(&WriteOptions::default()).unwrap();
    let truncated = &bytes[..40];
    assert!(Document::read(truncated, &ReadOptions::default())
        .unwrap_err()
        .is_format());
    bytes[0] = b'G';
    let err = Document::read(&bytes, &ReadOptions::default()).unwrap_err();
    assert!(err.to_string().contains("invalid magic"));
}

#[test]
fn check_compatibility_flags_version_specific_structures() {
    let curve = crate::value::property::ComponentSequenceProperty::new(vec![
        crate::value::property::SequenceProperty::new(
            SequenceFunction::Linear,
            vec![Keyframe::new(0.0, 0.0), Keyframe::new(1.0, 1.0)],
        )
        .unwrap(),
    ])
    .unwrap();
    let mut action = GenericAction::new(ActionType(900));
    action.properties1.push(Property::Components(curve));
    let doc = Document::new(1).with_root(Node::root().with_action(action));
    assert!(doc.check_compatibility(Game::ArmoredCore6).is_ok());
    for game in [Game::DarkSouls3, Game::Sekiro, Game::EldenRing] {
        assert!(doc.check_compatibility(game).is_err(), "{game}");
        assert!(doc.write(&WriteOptions::for_game(game)).is_err(), "{game}");
    }
}

#[test]
fn summary_counts_the_tree() {
    let effect = Effect::new(EffectKind::LevelsOfDetail)
        .with_slot(
            0,
            GenericAction {
                properties1: vec![
                    Property::sequence(
                        SequenceFunction::Stepped,
                        vec![Keyframe::new(0.0, 1.0), Keyframe::new(1.0, 2.0)],
                    )
                    .unwrap(),
                ],
                ..GenericAction::new(ActionType(901))
            },
        )
        .unwrap();
    let mut doc = sample();
    doc.root.children[0].children.push(Node::new(NodeKind::Basic).with_effect(effect));

    let summary = doc.summary();
    assert_eq!(summary.id, 4_000_123);
    assert_eq!(summary.nodes, 4);
    assert_eq!(summary.max_depth, 3);
    assert_eq!(summary.effects, 1);
    assert_eq!(summary.actions, 5);
    assert_eq!(summary.schema_actions, 2);
    // two driven properties per action, their two factors, and the curve
    assert_eq!(summary.properties, 9);
    assert_eq!(summary.animated_properties, 1);
    assert_eq!(summary.modifiers, 4);
    assert_eq!(summary.states, 2);
    assert_eq!(summary.conditions, 2);

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["references"]["references"], serde_json::json!([3, 5]));
}
