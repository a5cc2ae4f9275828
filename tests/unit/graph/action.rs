use super::*;
use crate::value::property::{Keyframe, SequenceFunction};

fn point_light() -> SchemaAction {
    SchemaAction::new(ActionType::POINT_LIGHT).unwrap()
}

#[test]
fn new_schema_action_reports_defaults() {
    let light = point_light();
    assert_eq!(light.explicit_params().count(), 0);
    assert_eq!(
        light.get("radius").unwrap().as_property(),
        Some(&Property::constant(10.0))
    );
    assert_eq!(
        light.get("shadows").unwrap().as_field(),
        Some(Field::Bool(false))
    );
}

#[test]
fn unknown_type_and_unknown_param_are_validation_errors() {
    assert!(matches!(
        SchemaAction::new(ActionType(4321)),
        Err(FxrError::Validation(_))
    ));
    let err = point_light().get("brightness").unwrap_err();
    assert!(err.to_string().contains("PointLight has no parameter `brightness`"));
}

#[test]
fn set_coerces_fields_and_drops_defaults() {
    let mut light = point_light();
    light.set("fade_out_time", Field::Float(3.0)).unwrap();
    assert_eq!(
        light.get("fade_out_time").unwrap().as_field(),
        Some(Field::Int(3))
    );

    light.set("radius", Field::Int(4)).unwrap();
    assert_eq!(
        light.get("radius").unwrap().as_property(),
        Some(&Property::constant(4.0))
    );
    assert_eq!(light.explicit_params().count(), 2);

    light.set("radius", Property::constant(10.0)).unwrap();
    light.set("fade_out_time", Field::Int(0)).unwrap();
    assert_eq!(light.explicit_params().count(), 0);
}

#[test]
fn property_for_field_param_is_rejected() {
    let err = point_light()
        .with("shadows", Property::constant(1.0))
        .unwrap_err();
    assert!(matches!(err, FxrError::Validation(_)));
}

#[test]
fn to_generic_follows_each_games_layout() {
    let light = point_light()
        .with("diffuse_multiplier", Field::Float(2.0))
        .unwrap()
        .with("radius", Field::Float(25.0))
        .unwrap();

    let ds3 = light.to_generic(Game::DarkSouls3).unwrap();
    assert_eq!(ds3.fields1.len(), 0);
    assert_eq!(ds3.fields2.len(), 8);
    assert_eq!(ds3.fields2[0], Field::Float(2.0));
    assert_eq!(ds3.properties1.len(), 3);
    assert_eq!(ds3.properties1[2], Property::constant(25.0));

    let er = light.to_generic(Game::EldenRing).unwrap();
    assert_eq!(er.fields2.len(), 12);
    assert_eq!(er.fields2[9], Field::Bool(true));
    let ac6 = light.to_generic(Game::ArmoredCore6).unwrap();
    assert_eq!(ac6.fields2.len(), 13);
}

#[test]
fn param_missing_from_a_games_layout_is_unsupported() {
    let light = point_light()
        .with("volume_density", Field::Float(0.5))
        .unwrap();
    assert!(light.to_generic(Game::Sekiro).is_ok());
    let err = light.to_generic(Game::DarkSouls3).unwrap_err();
    assert!(matches!(err, FxrError::UnsupportedForVersion { .. }));
    assert!(err.to_string().contains("volume_density"));
}

#[test]
fn action_type_without_entry_for_game_is_unsupported() {
    let spot = SchemaAction::new(ActionType::SPOT_LIGHT).unwrap();
    assert!(matches!(
        spot.to_generic(Game::DarkSouls3),
        Err(FxrError::UnsupportedForVersion { .. })
    ));
}

#[test]
fn from_generic_names_raw_lists_and_keeps_only_changes() {
    let layout = resolve(ActionType::NODE_ACCELERATION.0, Game::EldenRing).unwrap();
    let mut raw = GenericAction::new(ActionType::NODE_ACCELERATION);
    raw.fields1 = vec![Field::Int(1), Field::Int(0), Field::infer(1.0f32.to_bits())];
    raw.properties1 = vec![
        Property::constant([0.0, -9.8, 0.0]),
        Property::constant(1.0),
        Property::constant(-1.0),
    ];

    let action = SchemaAction::from_generic(&raw, layout).unwrap();
    let explicit: Vec<_> = action.explicit_params().collect();
    assert_eq!(explicit.len(), 2);
    assert_eq!(
        action.get("align_with_acceleration").unwrap().as_field(),
        Some(Field::Bool(true))
    );
    assert_eq!(
        action.get("acceleration").unwrap().as_property(),
        Some(&Property::constant([0.0, -9.8, 0.0]))
    );
    assert_eq!(action.to_generic(Game::EldenRing).unwrap(), raw_typed(&raw));
}

fn raw_typed(raw: &GenericAction) -> GenericAction {
    let mut typed = raw.clone();
    typed.fields1 = vec![Field::Bool(true), Field::Int(0), Field::Float(1.0)];
    typed
}

#[test]
fn from_generic_rejects_mismatched_counts() {
    let layout = resolve(ActionType::NODE_TRANSLATION.0, Game::DarkSouls3).unwrap();
    let mut raw = GenericAction::new(ActionType::NODE_TRANSLATION);
    assert!(SchemaAction::from_generic(&raw, layout).is_none());
    raw.properties1 = vec![Property::constant(0.0), Property::constant(0.0)];
    assert!(SchemaAction::from_generic(&raw, layout).is_none());
}

#[test]
fn sfx_reference_reads_both_variants() {
    let schema = SchemaAction::new(ActionType::SFX_REFERENCE)
        .unwrap()
        .with("sfx", Field::Int(402_000))
        .unwrap();
    assert_eq!(Action::from(schema).sfx_reference(), Some(402_000));

    let mut raw = GenericAction::new(ActionType::SFX_REFERENCE);
    raw.fields1.push(Field::Int(7));
    assert_eq!(Action::from(raw).sfx_reference(), Some(7));

    assert_eq!(Action::none().sfx_reference(), None);
}

#[test]
fn action_properties_cover_explicit_schema_params() {
    let curve = Property::sequence(
        SequenceFunction::Linear,
        vec![Keyframe::new(0.0, 0.0), Keyframe::new(1.0, 5.0)],
    )
    .unwrap();
    let light = point_light().with("radius", curve.clone()).unwrap();
    let action = Action::from(light);
    assert_eq!(action.properties(), vec![&curve]);
    assert_eq!(action.action_type(), ActionType::POINT_LIGHT);
    assert!(matches!(
        action.to_generic(Game::Sekiro).unwrap(),
        Cow::Owned(_)
    ));
    assert!(matches!(
        Action::none().to_generic(Game::Sekiro).unwrap(),
        Cow::Borrowed(_)
    ));
}

#[test]
fn display_uses_schema_name() {
    assert_eq!(ActionType::POINT_LIGHT.to_string(), "PointLight (609)");
    assert_eq!(ActionType(77).to_string(), "77");
}
