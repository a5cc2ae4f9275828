//! Arithmetic across constants, vectors and properties.
//!
//! Operands promote to the larger arity when one side is a scalar. Modifiers
//! travel with their property and are rewritten against the other operand's
//! base value; an animated operand contributes its value at time 0.

use crate::binary::field::Field;
use crate::foundation::error::FxrResult;
use crate::value::codec::{encode_modifier, encode_property};
use crate::value::modifier::Modifier;
use crate::value::property::{
    Keyframe, Property, SequenceFunction, SequenceProperty, ValueProperty, union_positions,
};
use crate::value::vector::{Value, promote};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Op {
    Mul,
    Add,
}

impl Op {
    fn apply(self, a: f32, b: f32) -> f32 {
        match self {
            Self::Mul => a * b,
            Self::Add => a + b,
        }
    }
}

/// One side of a `combine_*` call.
#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    Scalar(f32),
    Vector(Value),
    Property(Property),
}

impl Operand {
    /// View as a property; plain numbers become constants.
    pub fn into_property(self) -> Property {
        match self {
            Self::Scalar(v) => Property::constant(v),
            Self::Vector(v) => Property::constant(v),
            Self::Property(p) => p,
        }
    }

    /// Plain value, or a property's base value at time 0.
    pub fn base_value(&self) -> Value {
        match self {
            Self::Scalar(v) => Value::scalar(*v),
            Self::Vector(v) => v.clone(),
            Self::Property(p) => p.value_at(0.0),
        }
    }
}

impl From<f32> for Operand {
    fn from(v: f32) -> Self {
        Self::Scalar(v)
    }
}

impl From<Value> for Operand {
    fn from(v: Value) -> Self {
        if v.arity() == 1 {
            Self::Scalar(v.component(0))
        } else {
            Self::Vector(v)
        }
    }
}

impl From<Property> for Operand {
    fn from(p: Property) -> Self {
        Self::Property(p)
    }
}

/// Multiply two operands.
pub fn combine_mul(a: &Operand, b: &Operand) -> FxrResult<Operand> {
    combine(Op::Mul, a, b)
}

/// Add two operands.
pub fn combine_add(a: &Operand, b: &Operand) -> FxrResult<Operand> {
    combine(Op::Add, a, b)
}

fn combine(op: Op, a: &Operand, b: &Operand) -> FxrResult<Operand> {
    match (a, b) {
        (Operand::Property(p), Operand::Property(q)) => {
            Ok(Operand::Property(property_pair(op, p, q)?))
        }
        (Operand::Property(p), c) | (c, Operand::Property(p)) => Ok(Operand::Property(
            property_with_constant(op, p, &c.base_value())?,
        )),
        (x, y) => Ok(x
            .base_value()
            .zip_with(&y.base_value(), |x, y| op.apply(x, y))?
            .into()),
    }
}

/// Apply `op` with a constant to a property's base values and rewrite its
/// modifiers to match.
pub(crate) fn property_with_constant(op: Op, p: &Property, c: &Value) -> FxrResult<Property> {
    let value_type = promote(p.value_type(), c.value_type())?;
    let p = p.broadcast(value_type)?;
    let base = p.value_at(0.0);
    let mut out = map_base(op, &p, c)?;
    let modifiers = rewrite_modifiers(op, p.modifiers(), &base, c)?;
    *out.modifiers_mut() = modifiers;
    Ok(out)
}

fn property_pair(op: Op, p: &Property, q: &Property) -> FxrResult<Property> {
    let value_type = promote(p.value_type(), q.value_type())?;
    let p = p.broadcast(value_type)?;
    let q = q.broadcast(value_type)?;
    let (p_base, q_base) = (p.value_at(0.0), q.value_at(0.0));

    let mut modifiers = rewrite_modifiers(op, p.modifiers(), &p_base, &q_base)?;
    modifiers.extend(rewrite_modifiers(op, q.modifiers(), &q_base, &p_base)?);
    modifiers.sort_by_cached_key(canonical_key);

    let mut out = match (&p, &q) {
        (Property::Value(a), _) => map_base(op, &q, &a.value)?,
        (_, Property::Value(b)) => map_base(op, &p, &b.value)?,
        _ => {
            let a = as_sequence(&p);
            let b = as_sequence(&q);
            let keyframes = union_positions([&a, &b].into_iter())
                .into_iter()
                .map(|pos| {
                    let v = a.value_at(pos).zip_with(&b.value_at(pos), |x, y| op.apply(x, y))?;
                    Ok(Keyframe::new(pos, v))
                })
                .collect::<FxrResult<Vec<_>>>()?;
            Property::Sequence(SequenceProperty::from_parts(
                value_type,
                SequenceFunction::Linear,
                a.loops && b.loops,
                keyframes,
                Vec::new(),
            ))
        }
    };
    *out.modifiers_mut() = modifiers;
    Ok(out)
}

/// Apply `op` with `c` to base values and keyframes only. Multiplication also
/// scales tangents.
fn map_base(op: Op, p: &Property, c: &Value) -> FxrResult<Property> {
    let f = |x: f32, y: f32| op.apply(x, y);
    Ok(match p {
        Property::Value(v) => Property::Value(ValueProperty {
            value: v.value.zip_with(c, f)?,
            modifiers: v.modifiers.clone(),
        }),
        Property::Sequence(s) => Property::Sequence(map_sequence(op, s, c)?),
        Property::Components(cs) => {
            let mut out = cs.clone();
            for (i, comp) in out.components_mut().iter_mut().enumerate() {
                *comp = map_sequence(op, comp, &Value::scalar(c.component(i)))?;
            }
            Property::Components(out)
        }
    })
}

fn map_sequence(op: Op, s: &SequenceProperty, c: &Value) -> FxrResult<SequenceProperty> {
    let value_type = promote(s.value_type(), c.value_type())?;
    let tangent = |t: &Option<Value>| -> FxrResult<Option<Value>> {
        match (op, t) {
            (Op::Mul, Some(t)) => Ok(Some(t.zip_with(c, |x, y| x * y)?)),
            (Op::Add, Some(t)) => Ok(Some(t.broadcast(value_type)?)),
            (_, None) => Ok(None),
        }
    };
    let keyframes = s
        .keyframes()
        .iter()
        .map(|k| {
            Ok(Keyframe {
                position: k.position,
                value: k.value.zip_with(c, |x, y| op.apply(x, y))?,
                tangent1: tangent(&k.tangent1)?,
                tangent2: tangent(&k.tangent2)?,
            })
        })
        .collect::<FxrResult<Vec<_>>>()?;
    Ok(SequenceProperty::from_parts(
        value_type,
        s.function,
        s.loops,
        keyframes,
        s.modifiers.clone(),
    ))
}

fn as_sequence(p: &Property) -> SequenceProperty {
    match p {
        Property::Sequence(s) => s.clone(),
        Property::Components(cs) => cs.to_sequence(),
        Property::Value(v) => SequenceProperty::from_parts(
            v.value.value_type(),
            SequenceFunction::Linear,
            false,
            vec![Keyframe::new(0.0, v.value.clone())],
            v.modifiers.clone(),
        ),
    }
}

/// Sort key that orders modifiers by type tag, then by their stored fields
/// and factor, so a merged list does not depend on operand order.
fn canonical_key(m: &Modifier) -> (u16, Vec<u32>) {
    let mut bits: Vec<u32> = encode_modifier(m).into_iter().map(Field::to_bits).collect();
    if let Some(factor) = m.factor() {
        bits.push(u32::from(factor.tag()));
        bits.extend(encode_property(factor).into_iter().map(Field::to_bits));
    }
    (m.tag_a(), bits)
}

fn rewrite_modifiers(
    op: Op,
    modifiers: &[Modifier],
    base: &Value,
    other: &Value,
) -> FxrResult<Vec<Modifier>> {
    modifiers
        .iter()
        .map(|m| match op {
            Op::Mul => m.scaled(other),
            Op::Add => m.offset(base, other),
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/value/ops.rs"]
mod tests;
