use crate::foundation::error::{FxrError, FxrResult};
use crate::value::modifier::Modifier;
use crate::value::property::{
    Keyframe, Property, SequenceFunction, SequenceProperty, ValueProperty, union_positions,
};
use crate::value::vector::{Value, ValueType};

/// Split a property into one scalar property per component. Modifiers are
/// split the same way.
pub fn separate_components(p: &Property) -> FxrResult<Vec<Property>> {
    let arity = p.arity();
    let mut modifiers = split_modifiers(p.modifiers(), p.value_type())?;

    let mut parts: Vec<Property> = match p {
        Property::Value(v) => (0..arity)
            .map(|i| Property::constant(v.value.component(i)))
            .collect(),
        Property::Sequence(s) => (0..arity)
            .map(|i| Property::Sequence(component_of(s, i)))
            .collect(),
        Property::Components(cs) => cs
            .components()
            .iter()
            .map(|c| Property::Sequence(c.clone().with_loop(cs.loops)))
            .collect(),
    };
    for (part, mods) in parts.iter_mut().zip(modifiers.iter_mut()) {
        *part.modifiers_mut() = std::mem::take(mods);
    }
    Ok(parts)
}

/// Join 1 to 4 scalar properties into one vector property.
///
/// Constants join exactly. Sequences join exactly when they share keyframe
/// positions, function and loop flag; anything else is resampled at the union
/// of all positions into a linear sequence. Modifiers are joined position by
/// position and must agree in count and kind.
pub fn combine_components(parts: &[Property]) -> FxrResult<Property> {
    let Some(value_type) = ValueType::from_arity(parts.len()) else {
        return Err(FxrError::validation(format!(
            "cannot combine {} properties into one value",
            parts.len()
        )));
    };
    if let Some(odd) = parts.iter().find(|p| p.value_type() != ValueType::Scalar) {
        return Err(FxrError::validation(format!(
            "component properties must be scalar, found {} components",
            odd.arity()
        )));
    }
    let modifiers = join_modifiers(parts)?;

    let mut out = if parts.iter().all(|p| !p.is_animated()) {
        Property::Value(ValueProperty {
            value: parts.iter().map(|p| p.value_at(0.0).component(0)).collect(),
            modifiers: Vec::new(),
        })
    } else {
        let sequences: Vec<SequenceProperty> = parts.iter().map(scalar_sequence).collect();
        match merge_exact(&sequences, value_type) {
            Some(merged) => Property::Sequence(merged),
            None => Property::Sequence(resample(&sequences, value_type)),
        }
    };
    *out.modifiers_mut() = modifiers;
    Ok(out)
}

fn component_of(s: &SequenceProperty, i: usize) -> SequenceProperty {
    let pick = |v: &Value| Value::scalar(v.component(i));
    let keyframes = s
        .keyframes()
        .iter()
        .map(|k| Keyframe {
            position: k.position,
            value: pick(&k.value),
            tangent1: k.tangent1.as_ref().map(pick),
            tangent2: k.tangent2.as_ref().map(pick),
        })
        .collect();
    SequenceProperty::from_parts(ValueType::Scalar, s.function, s.loops, keyframes, Vec::new())
}

fn scalar_sequence(p: &Property) -> SequenceProperty {
    match p {
        Property::Sequence(s) => s.clone(),
        Property::Components(cs) => cs.to_sequence(),
        Property::Value(v) => SequenceProperty::from_parts(
            ValueType::Scalar,
            SequenceFunction::Linear,
            false,
            vec![Keyframe::new(0.0, v.value.clone())],
            Vec::new(),
        ),
    }
}

fn merge_exact(sequences: &[SequenceProperty], value_type: ValueType) -> Option<SequenceProperty> {
    let first = sequences.first()?;
    let same_shape = sequences.iter().all(|s| {
        s.function == first.function
            && s.loops == first.loops
            && s.keyframes().len() == first.keyframes().len()
            && s.positions().zip(first.positions()).all(|(a, b)| a == b)
    });
    if !same_shape {
        return None;
    }

    let column = |k: usize, pick: fn(&Keyframe) -> Option<&Value>| -> Option<Value> {
        sequences
            .iter()
            .map(|s| pick(&s.keyframes()[k]).map(|v| v.component(0)))
            .collect::<Option<Vec<f32>>>()
            .map(|c| c.into_iter().collect())
    };
    let keyframes = first
        .keyframes()
        .iter()
        .enumerate()
        .map(|(k, key)| Keyframe {
            position: key.position,
            value: sequences
                .iter()
                .map(|s| s.keyframes()[k].value.component(0))
                .collect(),
            tangent1: column(k, |key| key.tangent1.as_ref()),
            tangent2: column(k, |key| key.tangent2.as_ref()),
        })
        .collect();
    Some(SequenceProperty::from_parts(
        value_type,
        first.function,
        first.loops,
        keyframes,
        Vec::new(),
    ))
}

fn resample(sequences: &[SequenceProperty], value_type: ValueType) -> SequenceProperty {
    let keyframes = union_positions(sequences.iter())
        .into_iter()
        .map(|pos| {
            let value: Value = sequences
                .iter()
                .map(|s| s.value_at(pos).component(0))
                .collect();
            Keyframe::new(pos, value)
        })
        .collect();
    SequenceProperty::from_parts(
        value_type,
        SequenceFunction::Linear,
        sequences.iter().all(|s| s.loops),
        keyframes,
        Vec::new(),
    )
}

/// `out[i]` holds the scalar modifiers for component `i`.
fn split_modifiers(modifiers: &[Modifier], value_type: ValueType) -> FxrResult<Vec<Vec<Modifier>>> {
    let mut out = vec![Vec::with_capacity(modifiers.len()); value_type.arity()];
    for m in modifiers {
        let split = m.broadcast(value_type)?.separate_components()?;
        for (slot, part) in out.iter_mut().zip(split) {
            slot.push(part);
        }
    }
    Ok(out)
}

fn join_modifiers(parts: &[Property]) -> FxrResult<Vec<Modifier>> {
    let count = parts.first().map_or(0, |p| p.modifiers().len());
    if parts.iter().any(|p| p.modifiers().len() != count) {
        return Err(FxrError::validation(
            "component properties carry different numbers of modifiers",
        ));
    }
    (0..count)
        .map(|j| {
            let column: Vec<Modifier> = parts.iter().map(|p| p.modifiers()[j].clone()).collect();
            Modifier::combine_components(&column)
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/value/components.rs"]
mod tests;
