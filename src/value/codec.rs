//! Field encodings of properties and modifiers.
//!
//! Properties store floats (plus int keyframe counts) in the shared field
//! pool; modifiers store int seeds or an external id followed by floats.

use crate::binary::field::Field;
use crate::foundation::error::{FxrError, FxrResult};
use crate::value::modifier::{Modifier, ModifierKind};
use crate::value::property::{
    ComponentSequenceProperty, Keyframe, Property, PropertyFunction, SequenceFunction,
    SequenceProperty, unpack_tag,
};
use crate::value::vector::{Value, ValueType};

pub(crate) fn encode_property(p: &Property) -> Vec<Field> {
    let mut out = Vec::new();
    match p {
        Property::Value(v) => {
            if p.function() == PropertyFunction::Constant {
                push_value(&mut out, &v.value);
            }
        }
        Property::Sequence(s) => {
            out.push(Field::Int(s.keyframes().len() as i32));
            let (min, max) = bounds(s);
            push_value(&mut out, &min);
            push_value(&mut out, &max);
            push_sequence_body(&mut out, s, s.function.has_tangents());
        }
        Property::Components(cs) => {
            let bounds: Vec<(Value, Value)> = cs.components().iter().map(bounds).collect();
            out.extend(bounds.iter().map(|(min, _)| Field::Float(min.component(0))));
            out.extend(bounds.iter().map(|(_, max)| Field::Float(max.component(0))));
            out.extend(
                cs.components()
                    .iter()
                    .map(|c| Field::Int(c.keyframes().len() as i32)),
            );
            for c in cs.components() {
                push_sequence_body(&mut out, c, true);
            }
        }
    }
    out
}

/// Decode a property from its packed tag and raw field words. `offset` is the
/// position of the first word, used for error reporting.
pub(crate) fn decode_property(tag: u16, words: &[u32], offset: usize) -> FxrResult<Property> {
    let Some((value_type, function, loops)) = unpack_tag(tag) else {
        return Err(FxrError::format(offset, format!("invalid property tag {tag:#x}")));
    };
    let arity = value_type.arity();
    let mut w = Words::new(words, offset);

    let property = match function {
        PropertyFunction::Zero => Property::constant(Value::zeros(value_type)),
        PropertyFunction::One => Property::constant(Value::splat(1.0, value_type)),
        PropertyFunction::Constant => Property::constant(w.value(arity)?),
        PropertyFunction::CompCurve => {
            w.skip(arity * 2)?;
            let counts = (0..arity).map(|_| w.count()).collect::<FxrResult<Vec<_>>>()?;
            let components = counts
                .into_iter()
                .map(|count| w.sequence(SequenceFunction::Curve2, ValueType::Scalar, count))
                .collect::<FxrResult<Vec<_>>>()?;
            let cs = ComponentSequenceProperty::new(components)
                .map_err(|e| FxrError::format(offset, e.to_string()))?;
            Property::Components(cs.with_loop(loops))
        }
        _ => {
            let Some(function) = SequenceFunction::from_property_function(function) else {
                return Err(FxrError::format(offset, "unhandled property function"));
            };
            let count = w.count()?;
            w.skip(arity * 2)?;
            Property::Sequence(w.sequence(function, value_type, count)?.with_loop(loops))
        }
    };
    w.finish()?;
    Ok(property)
}

pub(crate) fn encode_modifier(m: &Modifier) -> Vec<Field> {
    let mut out = Vec::new();
    match m {
        Modifier::RandomDelta { seeds: s, max_change } => {
            push_seeds(&mut out, s);
            push_value(&mut out, max_change);
        }
        Modifier::RandomRange { seeds: s, min, max } => {
            push_seeds(&mut out, s);
            push_value(&mut out, min);
            push_value(&mut out, max);
        }
        Modifier::RandomFraction {
            seeds: s,
            max_fraction,
        } => {
            push_seeds(&mut out, s);
            push_value(&mut out, max_fraction);
        }
        Modifier::ExternalValue1 { external_value, .. }
        | Modifier::ExternalValue2 { external_value, .. } => {
            out.push(Field::Int(*external_value));
        }
    }
    out
}

/// Decode a modifier from its two tags, raw field words and optional factor
/// property.
pub(crate) fn decode_modifier(
    tag_a: u16,
    tag_b: i32,
    words: &[u32],
    factor: Option<Property>,
    offset: usize,
) -> FxrResult<Modifier> {
    let Some(kind) = ModifierKind::from_code(tag_a >> 2) else {
        return Err(FxrError::format(offset, format!("unknown modifier tag {tag_a:#x}")));
    };
    let code = (tag_a & 0b11) as u8;
    let Some(value_type) = ValueType::from_code(code) else {
        return Err(FxrError::format(offset, format!("invalid modifier tag {tag_a:#x}")));
    };
    if tag_b != kind.tag_offset() + i32::from(code) {
        return Err(FxrError::format(
            offset,
            format!("{} tag mismatch: {tag_a:#x} / {tag_b}", kind.name()),
        ));
    }

    let arity = value_type.arity();
    let mut w = Words::new(words, offset);
    let modifier = match (kind, factor) {
        (ModifierKind::RandomDelta, None) => Modifier::RandomDelta {
            seeds: w.seeds(arity)?,
            max_change: w.value(arity)?,
        },
        (ModifierKind::RandomRange, None) => Modifier::RandomRange {
            seeds: w.seeds(arity)?,
            min: w.value(arity)?,
            max: w.value(arity)?,
        },
        (ModifierKind::RandomFraction, None) => Modifier::RandomFraction {
            seeds: w.seeds(arity)?,
            max_fraction: w.value(arity)?,
        },
        (ModifierKind::ExternalValue1 | ModifierKind::ExternalValue2, Some(factor)) => {
            if factor.value_type() != value_type {
                return Err(FxrError::format(
                    offset,
                    format!(
                        "{} has {arity} components but its factor has {}",
                        kind.name(),
                        factor.arity()
                    ),
                ));
            }
            let external_value = w.int()?;
            if kind == ModifierKind::ExternalValue1 {
                Modifier::ExternalValue1 {
                    external_value,
                    factor,
                }
            } else {
                Modifier::ExternalValue2 {
                    external_value,
                    factor,
                }
            }
        }
        (kind, factor) => {
            return Err(FxrError::format(
                offset,
                format!(
                    "{} with {} factor properties",
                    kind.name(),
                    usize::from(factor.is_some())
                ),
            ));
        }
    };
    w.finish()?;
    Ok(modifier)
}

fn push_seeds(out: &mut Vec<Field>, seeds: &[i32]) {
    out.extend(seeds.iter().map(|&s| Field::Int(s)));
}

fn push_value(out: &mut Vec<Field>, v: &Value) {
    out.extend(v.as_slice().iter().map(|&c| Field::Float(c)));
}

fn push_sequence_body(out: &mut Vec<Field>, s: &SequenceProperty, tangents: bool) {
    let zeros = Value::zeros(s.value_type());
    out.extend(s.positions().map(Field::Float));
    for k in s.keyframes() {
        push_value(out, &k.value);
    }
    if tangents {
        for k in s.keyframes() {
            push_value(out, k.tangent1.as_ref().unwrap_or(&zeros));
        }
        for k in s.keyframes() {
            push_value(out, k.tangent2.as_ref().unwrap_or(&zeros));
        }
    }
}

/// Component-wise minimum and maximum over keyframe values.
fn bounds(s: &SequenceProperty) -> (Value, Value) {
    let arity = s.value_type().arity();
    let fold = |init: f32, f: fn(f32, f32) -> f32| -> Value {
        (0..arity)
            .map(|i| {
                s.keyframes()
                    .iter()
                    .map(|k| k.value.component(i))
                    .fold(init, f)
            })
            .collect()
    };
    (fold(f32::INFINITY, f32::min), fold(f32::NEG_INFINITY, f32::max))
}

/// Cursor over a property's or modifier's field words.
struct Words<'a> {
    words: &'a [u32],
    pos: usize,
    offset: usize,
}

impl<'a> Words<'a> {
    fn new(words: &'a [u32], offset: usize) -> Self {
        Self {
            words,
            pos: 0,
            offset,
        }
    }

    fn here(&self) -> usize {
        self.offset + self.pos * 4
    }

    fn take(&mut self, n: usize) -> FxrResult<&'a [u32]> {
        let end = self.pos.saturating_add(n);
        if end > self.words.len() {
            return Err(FxrError::format(
                self.here(),
                format!(
                    "field list too short: need {n} more, have {}",
                    self.words.len() - self.pos
                ),
            ));
        }
        let out = &self.words[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    fn skip(&mut self, n: usize) -> FxrResult<()> {
        self.take(n).map(|_| ())
    }

    fn int(&mut self) -> FxrResult<i32> {
        Ok(self.take(1)?[0] as i32)
    }

    fn count(&mut self) -> FxrResult<usize> {
        let at = self.here();
        let v = self.int()?;
        usize::try_from(v).map_err(|_| FxrError::format(at, format!("negative keyframe count {v}")))
    }

    fn floats(&mut self, n: usize) -> FxrResult<impl Iterator<Item = f32> + use<'a>> {
        Ok(self.take(n)?.iter().map(|&w| f32::from_bits(w)))
    }

    fn value(&mut self, arity: usize) -> FxrResult<Value> {
        Ok(self.floats(arity)?.collect())
    }

    fn seeds(&mut self, arity: usize) -> FxrResult<crate::value::modifier::Seeds> {
        Ok(self.take(arity)?.iter().map(|&w| w as i32).collect())
    }

    fn values(&mut self, count: usize, arity: usize) -> FxrResult<Vec<Value>> {
        let flat: Vec<f32> = self.floats(count.saturating_mul(arity))?.collect();
        Ok(flat.chunks(arity).map(|c| c.iter().copied().collect()).collect())
    }

    fn sequence(
        &mut self,
        function: SequenceFunction,
        value_type: ValueType,
        count: usize,
    ) -> FxrResult<SequenceProperty> {
        let at = self.here();
        let arity = value_type.arity();
        let positions: Vec<f32> = self.floats(count)?.collect();
        let values = self.values(count, arity)?;
        let (t1, t2) = if function.has_tangents() {
            (self.values(count, arity)?, self.values(count, arity)?)
        } else {
            (Vec::new(), Vec::new())
        };
        let mut t1 = t1.into_iter();
        let mut t2 = t2.into_iter();
        let keyframes = positions
            .into_iter()
            .zip(values)
            .map(|(position, value)| Keyframe {
                position,
                value,
                tangent1: t1.next(),
                tangent2: t2.next(),
            })
            .collect();
        SequenceProperty::new(function, keyframes).map_err(|e| FxrError::format(at, e.to_string()))
    }

    fn finish(&self) -> FxrResult<()> {
        if self.pos != self.words.len() {
            return Err(FxrError::format(
                self.here(),
                format!(
                    "expected {} fields, found {}",
                    self.pos,
                    self.words.len()
                ),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/value/codec.rs"]
mod tests;
