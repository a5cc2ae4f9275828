use super::*;

fn linear(keys: &[(f32, f32)]) -> SequenceProperty {
    SequenceProperty::new(
        SequenceFunction::Linear,
        keys.iter().map(|&(p, v)| Keyframe::new(p, v)).collect(),
    )
    .unwrap()
}

#[test]
fn constants_of_zero_and_one_use_compact_functions() {
    assert_eq!(Property::constant(0.0).function(), PropertyFunction::Zero);
    assert_eq!(Property::constant([1.0, 1.0]).function(), PropertyFunction::One);
    assert_eq!(
        Property::constant([1.0, 0.5]).function(),
        PropertyFunction::Constant
    );
}

#[test]
fn linear_midpoint_is_the_componentwise_average() {
    let p = Property::sequence(
        SequenceFunction::Linear,
        vec![
            Keyframe::new(0.0, [0.0, 2.0, 4.0]),
            Keyframe::new(2.0, [1.0, 4.0, -4.0]),
        ],
    )
    .unwrap();
    assert_eq!(p.value_at(1.0).as_slice(), &[0.5, 3.0, 0.0]);
}

#[test]
fn stepped_holds_the_previous_keyframe() {
    let mut s = linear(&[(0.0, 1.0), (1.0, 5.0)]);
    s.function = SequenceFunction::Stepped;
    assert_eq!(s.value_at(0.99).as_slice(), &[1.0]);
    assert_eq!(s.value_at(1.0).as_slice(), &[5.0]);
}

#[test]
fn evaluation_clamps_outside_the_keyframes() {
    let s = linear(&[(0.0, 0.0), (2.0, 2.0)]);
    assert_eq!(s.value_at(-1.0).as_slice(), &[0.0]);
    assert_eq!(s.value_at(5.0).as_slice(), &[2.0]);
}

#[test]
fn looping_wraps_by_the_last_position() {
    let s = linear(&[(0.0, 0.0), (2.0, 2.0)]).with_loop(true);
    assert_eq!(s.value_at(3.0).as_slice(), &[1.0]);
    assert_eq!(s.value_at(-1.0).as_slice(), &[1.0]);
}

#[test]
fn sequences_validate_their_keyframes() {
    assert!(SequenceProperty::new(SequenceFunction::Linear, Vec::new()).is_err());
    assert!(
        SequenceProperty::new(
            SequenceFunction::Linear,
            vec![Keyframe::new(0.0, 1.0), Keyframe::new(1.0, [1.0, 2.0])],
        )
        .is_err()
    );
    let err = SequenceProperty::new(
        SequenceFunction::Linear,
        vec![Keyframe::new(1.0, 1.0), Keyframe::new(0.0, 1.0)],
    )
    .unwrap_err();
    assert!(matches!(err, FxrError::Validation(_)));
}

#[test]
fn curve_sequences_always_carry_tangents() {
    let s = SequenceProperty::new(
        SequenceFunction::Curve1,
        vec![
            Keyframe::new(0.0, [1.0, 2.0]),
            Keyframe::new(1.0, [3.0, 4.0]).with_tangents([0.5, 0.5], [1.0, 1.0]),
        ],
    )
    .unwrap();
    assert_eq!(s.keyframes()[0].tangent1, Some(Value::from([0.0, 0.0])));
    assert_eq!(s.keyframes()[1].tangent2, Some(Value::from([1.0, 1.0])));

    let plain = SequenceProperty::new(
        SequenceFunction::Linear,
        vec![Keyframe::new(0.0, 1.0).with_tangents(1.0, 1.0)],
    )
    .unwrap();
    assert_eq!(plain.keyframes()[0].tangent1, None);
}

#[test]
fn tag_packs_arity_function_and_loop() {
    assert_eq!(
        pack_tag(ValueType::Vec3, PropertyFunction::Linear, true),
        0b11_0010
    );
    assert_eq!(
        unpack_tag(0b11_0010),
        Some((ValueType::Vec3, PropertyFunction::Linear, true))
    );
    assert_eq!(Property::constant(0.0).tag(), 0);
    assert_eq!(unpack_tag(0x40), None);
}

#[test]
fn broadcast_widens_value_and_modifiers() {
    let p = Property::constant(2.0).with_modifier(Modifier::random_delta(1.0));
    let wide = p.broadcast(ValueType::Vec3).unwrap();
    assert_eq!(wide.value_at(0.0).as_slice(), &[2.0, 2.0, 2.0]);
    assert_eq!(wide.modifiers()[0].arity(), 3);
    assert_eq!(wide.modifiers()[0].seeds(), Some(&[0, 0, 0][..]));
}

#[test]
fn broadcast_never_truncates() {
    let p = Property::constant([1.0, 2.0]);
    assert!(p.broadcast(ValueType::Scalar).is_err());
    assert!(p.broadcast(ValueType::Vec3).is_err());
}

#[test]
fn power_maps_base_and_keyframe_values() {
    let mut p = Property::constant([2.0, 3.0]);
    p.power(2.0);
    assert_eq!(p.value_at(0.0).as_slice(), &[4.0, 9.0]);

    let mut s = Property::Sequence(linear(&[(0.0, 2.0), (1.0, 4.0)]));
    s.power(0.5);
    assert_eq!(s.value_at(1.0).as_slice(), &[2.0]);
}

#[test]
fn component_sequences_evaluate_each_curve() {
    let cs = ComponentSequenceProperty::new(vec![
        linear(&[(0.0, 0.0), (2.0, 2.0)]),
        linear(&[(0.0, 10.0), (4.0, 10.0)]),
    ])
    .unwrap();
    assert_eq!(cs.value_type(), ValueType::Vec2);
    assert_eq!(cs.duration(), 4.0);
    assert_eq!(cs.value_at(1.0).as_slice(), &[1.0, 10.0]);
    assert_eq!(cs.components()[0].function, SequenceFunction::Curve2);

    let seq = cs.to_sequence();
    let positions: Vec<f32> = seq.positions().collect();
    assert_eq!(positions, vec![0.0, 2.0, 4.0]);
    assert_eq!(seq.value_at(4.0).as_slice(), &[2.0, 10.0]);
}

#[test]
fn component_sequences_reject_vector_or_modified_curves() {
    let vector = SequenceProperty::new(
        SequenceFunction::Linear,
        vec![Keyframe::new(0.0, [1.0, 2.0])],
    )
    .unwrap();
    assert!(ComponentSequenceProperty::new(vec![vector]).is_err());

    let mut modified = linear(&[(0.0, 1.0)]);
    modified.modifiers.push(Modifier::random_delta(1.0));
    assert!(ComponentSequenceProperty::new(vec![modified]).is_err());
    assert!(ComponentSequenceProperty::new(Vec::new()).is_err());
}
