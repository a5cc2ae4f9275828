use super::*;

#[test]
fn tags_encode_kind_and_arity() {
    let m = Modifier::random_range([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]).unwrap();
    assert_eq!(m.tag_a(), 24 << 2 | 2);
    assert_eq!(m.tag_b(), 10);
    let e = Modifier::external_value2(3, Property::constant(1.0)).unwrap();
    assert_eq!(e.tag_a(), 39 << 2);
    assert_eq!(e.tag_b(), 16);
    assert_eq!(ModifierKind::from_code(53), Some(ModifierKind::RandomFraction));
    assert_eq!(ModifierKind::from_code(22), None);
}

#[test]
fn scalar_modifiers_broadcast_with_repeated_seeds() {
    let m = Modifier::random_fraction(0.25).with_seed(9);
    let wide = m.broadcast(ValueType::Vec2).unwrap();
    assert_eq!(wide.seeds(), Some(&[9, 9][..]));
    assert!(wide.broadcast(ValueType::Vec3).is_err());
}

#[test]
fn with_seed_numbers_each_component() {
    let m = Modifier::random_delta([1.0, 1.0, 1.0]).with_seed(100);
    assert_eq!(m.seeds(), Some(&[100, 101, 102][..]));
}

#[test]
fn negative_scale_keeps_range_ordered() {
    let m = Modifier::random_range(1.0, 3.0).unwrap();
    let scaled = m.scaled(&Value::scalar(-2.0)).unwrap();
    let Modifier::RandomRange { min, max, .. } = scaled else {
        panic!("expected RandomRange");
    };
    assert_eq!(min.as_slice(), &[-6.0]);
    assert_eq!(max.as_slice(), &[-2.0]);
}

#[test]
fn delta_scales_by_magnitude() {
    let m = Modifier::random_delta(0.5);
    let scaled = m.scaled(&Value::from([-2.0, 4.0])).unwrap();
    let Modifier::RandomDelta { max_change, seeds } = scaled else {
        panic!("expected RandomDelta");
    };
    assert_eq!(max_change.as_slice(), &[1.0, 2.0]);
    assert_eq!(seeds.len(), 2);
}

#[test]
fn fraction_is_rescaled_by_an_offset() {
    let m = Modifier::random_fraction(0.5);
    let base = Value::scalar(2.0);
    let Modifier::RandomFraction { max_fraction, .. } =
        m.offset(&base, &Value::scalar(2.0)).unwrap()
    else {
        panic!("expected RandomFraction");
    };
    assert_eq!(max_fraction.as_slice(), &[0.25]);

    let unchanged = m.offset(&base, &Value::scalar(-2.0)).unwrap();
    assert_eq!(unchanged, m);
}

#[test]
fn separate_and_combine_restore_the_modifier() {
    let m = Modifier::random_range([1.0, 2.0], [3.0, 4.0])
        .unwrap()
        .with_seed(7);
    let parts = m.separate_components().unwrap();
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[1].seeds(), Some(&[8][..]));
    assert_eq!(Modifier::combine_components(&parts).unwrap(), m);
}

#[test]
fn combining_requires_matching_kinds_and_ids() {
    let mixed = [Modifier::random_delta(1.0), Modifier::random_fraction(1.0)];
    assert!(Modifier::combine_components(&mixed).is_err());

    let ids = [
        Modifier::external_value1(1, Property::constant(1.0)).unwrap(),
        Modifier::external_value1(2, Property::constant(1.0)).unwrap(),
    ];
    assert!(Modifier::combine_components(&ids).is_err());

    let same = [
        Modifier::external_value1(4, Property::constant(0.5)).unwrap(),
        Modifier::external_value1(4, Property::constant(2.0)).unwrap(),
    ];
    let joined = Modifier::combine_components(&same).unwrap();
    assert_eq!(joined.external_value(), Some(4));
    assert_eq!(joined.factor().unwrap().value_at(0.0).as_slice(), &[0.5, 2.0]);
}

#[test]
fn factors_cannot_carry_modifiers() {
    let factor = Property::constant(1.0).with_modifier(Modifier::random_delta(1.0));
    let err = Modifier::external_value1(0, factor).unwrap_err();
    assert!(matches!(err, FxrError::Validation(_)));
}

#[test]
fn validate_checks_seed_count() {
    let mut m = Modifier::random_delta([1.0, 1.0]);
    assert!(m.validate().is_ok());
    if let Modifier::RandomDelta { seeds, .. } = &mut m {
        seeds.pop();
    }
    assert!(m.validate().is_err());
}

#[test]
fn seedless_modifiers_are_rejected_instead_of_reshaped() {
    let bad = Modifier::RandomDelta {
        seeds: Seeds::new(),
        max_change: Value::scalar(1.0),
    };
    assert!(matches!(
        bad.broadcast(ValueType::Vec3).unwrap_err(),
        FxrError::Validation(_)
    ));
    assert!(bad.broadcast(ValueType::Scalar).is_err());
    assert!(bad.separate_components().is_err());
    assert!(Modifier::combine_components(std::slice::from_ref(&bad)).is_err());

    let good = Modifier::random_delta(1.0);
    assert!(Modifier::combine_components(&[good.clone(), bad.clone(), good]).is_err());

    let short = Modifier::RandomRange {
        seeds: smallvec::smallvec![1],
        min: Value::from([0.0, 0.0]),
        max: Value::from([1.0, 1.0]),
    };
    assert!(short.separate_components().is_err());
}
