use super::*;
use crate::value::property::ComponentSequenceProperty;

fn linear(keys: &[(f32, f32)]) -> Property {
    Property::sequence(
        SequenceFunction::Linear,
        keys.iter().map(|&(p, v)| Keyframe::new(p, v)).collect(),
    )
    .unwrap()
}

#[test]
fn constants_split_and_join_exactly() {
    let p = Property::constant([1.0, 2.0, 3.0])
        .with_modifier(Modifier::random_range([0.0; 3], [1.0, 2.0, 3.0]).unwrap());
    let parts = separate_components(&p).unwrap();
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[2].value_at(0.0).as_slice(), &[3.0]);
    assert_eq!(parts[2].modifiers().len(), 1);
    assert_eq!(combine_components(&parts).unwrap(), p);
}

#[test]
fn sequences_with_shared_positions_join_exactly() {
    let p = Property::sequence(
        SequenceFunction::Stepped,
        vec![
            Keyframe::new(0.0, [1.0, 5.0]),
            Keyframe::new(2.0, [3.0, 7.0]),
        ],
    )
    .unwrap()
    .with_modifier(Modifier::random_delta([0.5, 0.25]));
    let parts = separate_components(&p).unwrap();
    assert_eq!(parts[1].value_at(2.0).as_slice(), &[7.0]);
    assert_eq!(combine_components(&parts).unwrap(), p);
}

#[test]
fn scalar_modifiers_are_split_to_every_component() {
    let p = Property::constant([1.0, 2.0]).with_modifier(Modifier::random_delta(0.5));
    let parts = separate_components(&p).unwrap();
    assert!(parts.iter().all(|part| part.modifiers().len() == 1));
}

#[test]
fn mismatched_sequences_are_resampled() {
    let parts = [
        linear(&[(0.0, 0.0), (2.0, 2.0)]),
        linear(&[(1.0, 5.0)]),
        Property::constant(9.0),
    ];
    let joined = combine_components(&parts).unwrap();
    let Property::Sequence(s) = &joined else {
        panic!("expected a sequence");
    };
    assert_eq!(s.function, SequenceFunction::Linear);
    let positions: Vec<f32> = s.positions().collect();
    assert_eq!(positions, vec![0.0, 1.0, 2.0]);
    assert_eq!(s.value_at(1.0).as_slice(), &[1.0, 5.0, 9.0]);
}

#[test]
fn component_curves_split_into_looping_sequences() {
    let curve = |v: f32| {
        SequenceProperty::new(
            SequenceFunction::Linear,
            vec![Keyframe::new(0.0, v), Keyframe::new(1.0, v)],
        )
        .unwrap()
    };
    let cs = ComponentSequenceProperty::new(vec![curve(1.0), curve(2.0)])
        .unwrap()
        .with_loop(true);
    let parts = separate_components(&Property::Components(cs)).unwrap();
    assert_eq!(parts.len(), 2);
    assert!(parts.iter().all(Property::loops));
}

#[test]
fn invalid_joins_are_rejected() {
    let five = vec![Property::constant(1.0); 5];
    assert!(combine_components(&five).is_err());
    assert!(combine_components(&[]).is_err());
    assert!(combine_components(&[Property::constant([1.0, 2.0])]).is_err());

    let uneven = [
        Property::constant(1.0).with_modifier(Modifier::random_delta(1.0)),
        Property::constant(2.0),
    ];
    assert!(matches!(
        combine_components(&uneven).unwrap_err(),
        FxrError::Validation(_)
    ));
}
