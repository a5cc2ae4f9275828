use crate::foundation::error::{FxrError, FxrResult};
use crate::value::modifier::Modifier;
use crate::value::ops::{self, Op};
use crate::value::vector::{Value, ValueType};

/// How a property's stored floats are laid out and evaluated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropertyFunction {
    Zero,
    One,
    Constant,
    Stepped,
    Linear,
    Curve1,
    Curve2,
    CompCurve,
}

impl PropertyFunction {
    pub fn code(self) -> u8 {
        match self {
            Self::Zero => 0,
            Self::One => 1,
            Self::Constant => 2,
            Self::Stepped => 3,
            Self::Linear => 4,
            Self::Curve1 => 5,
            Self::Curve2 => 6,
            Self::CompCurve => 7,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => Self::Zero,
            1 => Self::One,
            2 => Self::Constant,
            3 => Self::Stepped,
            4 => Self::Linear,
            5 => Self::Curve1,
            6 => Self::Curve2,
            7 => Self::CompCurve,
            _ => return None,
        })
    }
}

/// Interpolation of a keyframe sequence.
///
/// The two curve kinds store two tangent vectors per keyframe. The tangents are
/// kept for round-tripping but evaluation treats both curves as linear: the
/// spline basis the engines use is not recoverable from the format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SequenceFunction {
    /// Hold the previous keyframe's value.
    Stepped,
    Linear,
    Curve1,
    Curve2,
}

impl SequenceFunction {
    pub fn has_tangents(self) -> bool {
        matches!(self, Self::Curve1 | Self::Curve2)
    }

    pub fn property_function(self) -> PropertyFunction {
        match self {
            Self::Stepped => PropertyFunction::Stepped,
            Self::Linear => PropertyFunction::Linear,
            Self::Curve1 => PropertyFunction::Curve1,
            Self::Curve2 => PropertyFunction::Curve2,
        }
    }

    pub fn from_property_function(function: PropertyFunction) -> Option<Self> {
        match function {
            PropertyFunction::Stepped => Some(Self::Stepped),
            PropertyFunction::Linear => Some(Self::Linear),
            PropertyFunction::Curve1 => Some(Self::Curve1),
            PropertyFunction::Curve2 => Some(Self::Curve2),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Keyframe {
    pub position: f32,
    pub value: Value,
    pub tangent1: Option<Value>,
    pub tangent2: Option<Value>,
}

impl Keyframe {
    pub fn new(position: f32, value: impl Into<Value>) -> Self {
        Self {
            position,
            value: value.into(),
            tangent1: None,
            tangent2: None,
        }
    }

    pub fn with_tangents(mut self, tangent1: impl Into<Value>, tangent2: impl Into<Value>) -> Self {
        self.tangent1 = Some(tangent1.into());
        self.tangent2 = Some(tangent2.into());
        self
    }

    fn broadcast(&self, value_type: ValueType) -> FxrResult<Self> {
        Ok(Self {
            position: self.position,
            value: self.value.broadcast(value_type)?,
            tangent1: self
                .tangent1
                .as_ref()
                .map(|t| t.broadcast(value_type))
                .transpose()?,
            tangent2: self
                .tangent2
                .as_ref()
                .map(|t| t.broadcast(value_type))
                .transpose()?,
        })
    }
}

/// A fixed value.
#[derive(Clone, Debug, PartialEq)]
pub struct ValueProperty {
    pub value: Value,
    pub modifiers: Vec<Modifier>,
}

/// A value over time given by keyframes.
#[derive(Clone, Debug, PartialEq)]
pub struct SequenceProperty {
    value_type: ValueType,
    pub function: SequenceFunction,
    pub loops: bool,
    keyframes: Vec<Keyframe>,
    pub modifiers: Vec<Modifier>,
}

impl SequenceProperty {
    /// Build a sequence. Keyframes must be non-empty, sorted by position and
    /// share one arity.
    pub fn new(function: SequenceFunction, keyframes: Vec<Keyframe>) -> FxrResult<Self> {
        let Some(first) = keyframes.first() else {
            return Err(FxrError::validation(
                "a sequence property needs at least one keyframe",
            ));
        };
        let value_type = first.value.value_type();
        for k in &keyframes {
            let tangents = k.tangent1.iter().chain(k.tangent2.iter());
            if k.value.value_type() != value_type || tangents.clone().any(|t| t.value_type() != value_type) {
                return Err(FxrError::validation(format!(
                    "keyframe at {} does not have {} components",
                    k.position,
                    value_type.arity()
                )));
            }
        }
        if !keyframes.windows(2).all(|w| w[0].position <= w[1].position) {
            return Err(FxrError::validation(
                "keyframes must be sorted by position",
            ));
        }
        let mut seq = Self {
            value_type,
            function,
            loops: false,
            keyframes,
            modifiers: Vec::new(),
        };
        seq.normalize_tangents();
        Ok(seq)
    }

    /// Curve functions store tangents for every keyframe; the others store
    /// none. Missing curve tangents become zeros and stray ones are dropped.
    pub(crate) fn normalize_tangents(&mut self) {
        let has_tangents = self.function.has_tangents();
        let zeros = Value::zeros(self.value_type);
        for k in &mut self.keyframes {
            if has_tangents {
                k.tangent1.get_or_insert_with(|| zeros.clone());
                k.tangent2.get_or_insert_with(|| zeros.clone());
            } else {
                k.tangent1 = None;
                k.tangent2 = None;
            }
        }
    }

    /// Build without validation; callers guarantee every keyframe has
    /// `value_type` components and positions are sorted.
    pub(crate) fn from_parts(
        value_type: ValueType,
        function: SequenceFunction,
        loops: bool,
        keyframes: Vec<Keyframe>,
        modifiers: Vec<Modifier>,
    ) -> Self {
        Self {
            value_type,
            function,
            loops,
            keyframes,
            modifiers,
        }
    }

    pub fn with_loop(mut self, loops: bool) -> Self {
        self.loops = loops;
        self
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    pub(crate) fn keyframes_mut(&mut self) -> &mut [Keyframe] {
        &mut self.keyframes
    }

    pub fn positions(&self) -> impl Iterator<Item = f32> + '_ {
        self.keyframes.iter().map(|k| k.position)
    }

    /// Position of the last keyframe.
    pub fn duration(&self) -> f32 {
        self.keyframes.last().map_or(0.0, |k| k.position)
    }

    pub fn value_at(&self, arg: f32) -> Value {
        let arg = wrap_position(arg, self.loops, self.duration());
        let keys = &self.keyframes;
        let idx = keys.partition_point(|k| k.position <= arg);
        if idx == 0 {
            return keys[0].value.clone();
        }
        if idx >= keys.len() {
            return keys[keys.len() - 1].value.clone();
        }

        let a = &keys[idx - 1];
        let b = &keys[idx];
        let span = b.position - a.position;
        if span <= 0.0 {
            return a.value.clone();
        }
        match self.function {
            SequenceFunction::Stepped => a.value.clone(),
            _ => Value::lerp(&a.value, &b.value, (arg - a.position) / span),
        }
    }

    fn broadcast(&self, value_type: ValueType) -> FxrResult<Self> {
        Ok(Self {
            value_type,
            function: self.function,
            loops: self.loops,
            keyframes: self
                .keyframes
                .iter()
                .map(|k| k.broadcast(value_type))
                .collect::<FxrResult<_>>()?,
            modifiers: broadcast_modifiers(&self.modifiers, value_type)?,
        })
    }
}

/// One independent scalar curve per component.
#[derive(Clone, Debug, PartialEq)]
pub struct ComponentSequenceProperty {
    pub loops: bool,
    components: Vec<SequenceProperty>,
    pub modifiers: Vec<Modifier>,
}

impl ComponentSequenceProperty {
    /// Build from 1 to 4 scalar curves without modifiers of their own.
    ///
    /// Component curves are stored with tangents, so each is kept as a
    /// `Curve2` sequence.
    pub fn new(mut components: Vec<SequenceProperty>) -> FxrResult<Self> {
        if ValueType::from_arity(components.len()).is_none() {
            return Err(FxrError::validation(format!(
                "a component sequence needs 1 to 4 components, got {}",
                components.len()
            )));
        }
        for c in &components {
            if c.value_type != ValueType::Scalar {
                return Err(FxrError::validation(
                    "component curves must be scalar",
                ));
            }
            if !c.modifiers.is_empty() {
                return Err(FxrError::validation(
                    "component curves cannot carry modifiers",
                ));
            }
        }
        for c in &mut components {
            c.function = SequenceFunction::Curve2;
            c.loops = false;
            c.normalize_tangents();
        }
        Ok(Self {
            loops: false,
            components,
            modifiers: Vec::new(),
        })
    }

    pub fn with_loop(mut self, loops: bool) -> Self {
        self.loops = loops;
        self
    }

    pub fn value_type(&self) -> ValueType {
        ValueType::from_arity(self.components.len()).unwrap_or(ValueType::Scalar)
    }

    pub fn components(&self) -> &[SequenceProperty] {
        &self.components
    }

    pub(crate) fn components_mut(&mut self) -> &mut [SequenceProperty] {
        &mut self.components
    }

    pub fn duration(&self) -> f32 {
        self.components
            .iter()
            .map(SequenceProperty::duration)
            .fold(0.0, f32::max)
    }

    pub fn value_at(&self, arg: f32) -> Value {
        let arg = wrap_position(arg, self.loops, self.duration());
        self.components
            .iter()
            .map(|c| c.value_at(arg).component(0))
            .collect()
    }

    /// Expand into a general vector sequence keyed at the union of every
    /// component's keyframe positions.
    pub fn to_sequence(&self) -> SequenceProperty {
        let positions = union_positions(self.components.iter());
        let keyframes = positions
            .into_iter()
            .map(|pos| Keyframe::new(pos, self.value_at_unwrapped(pos)))
            .collect();
        SequenceProperty::from_parts(
            self.value_type(),
            SequenceFunction::Linear,
            self.loops,
            keyframes,
            self.modifiers.clone(),
        )
    }

    fn value_at_unwrapped(&self, arg: f32) -> Value {
        self.components
            .iter()
            .map(|c| c.value_at(arg).component(0))
            .collect()
    }
}

/// A numeric parameter that may vary over time.
#[derive(Clone, Debug, PartialEq)]
pub enum Property {
    Value(ValueProperty),
    Sequence(SequenceProperty),
    Components(ComponentSequenceProperty),
}

impl Property {
    pub fn constant(value: impl Into<Value>) -> Self {
        Self::Value(ValueProperty {
            value: value.into(),
            modifiers: Vec::new(),
        })
    }

    pub fn sequence(function: SequenceFunction, keyframes: Vec<Keyframe>) -> FxrResult<Self> {
        Ok(Self::Sequence(SequenceProperty::new(function, keyframes)?))
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Value(p) => p.value.value_type(),
            Self::Sequence(p) => p.value_type,
            Self::Components(p) => p.value_type(),
        }
    }

    pub fn arity(&self) -> usize {
        self.value_type().arity()
    }

    /// Function used on the wire. Constants of all zeros or all ones use the
    /// compact encodings that store no floats.
    pub fn function(&self) -> PropertyFunction {
        match self {
            Self::Value(p) if p.value.is_all(0.0) => PropertyFunction::Zero,
            Self::Value(p) if p.value.is_all(1.0) => PropertyFunction::One,
            Self::Value(_) => PropertyFunction::Constant,
            Self::Sequence(p) => p.function.property_function(),
            Self::Components(_) => PropertyFunction::CompCurve,
        }
    }

    pub fn loops(&self) -> bool {
        match self {
            Self::Value(_) => false,
            Self::Sequence(p) => p.loops,
            Self::Components(p) => p.loops,
        }
    }

    pub fn is_animated(&self) -> bool {
        !matches!(self, Self::Value(_))
    }

    pub fn modifiers(&self) -> &[Modifier] {
        match self {
            Self::Value(p) => &p.modifiers,
            Self::Sequence(p) => &p.modifiers,
            Self::Components(p) => &p.modifiers,
        }
    }

    pub fn modifiers_mut(&mut self) -> &mut Vec<Modifier> {
        match self {
            Self::Value(p) => &mut p.modifiers,
            Self::Sequence(p) => &mut p.modifiers,
            Self::Components(p) => &mut p.modifiers,
        }
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers_mut().push(modifier);
        self
    }

    /// Base value at `arg`, ignoring modifiers.
    pub fn value_at(&self, arg: f32) -> Value {
        match self {
            Self::Value(p) => p.value.clone(),
            Self::Sequence(p) => p.value_at(arg),
            Self::Components(p) => p.value_at(arg),
        }
    }

    /// Widen a scalar property (and its modifiers) to `value_type`.
    pub fn broadcast(&self, value_type: ValueType) -> FxrResult<Self> {
        if self.value_type() == value_type {
            return Ok(self.clone());
        }
        Ok(match self {
            Self::Value(p) => Self::Value(ValueProperty {
                value: p.value.broadcast(value_type)?,
                modifiers: broadcast_modifiers(&p.modifiers, value_type)?,
            }),
            Self::Sequence(p) => Self::Sequence(p.broadcast(value_type)?),
            Self::Components(p) => {
                if p.value_type() != ValueType::Scalar {
                    return Err(FxrError::validation(format!(
                        "cannot fit a {}-component property into {} components",
                        p.components.len(),
                        value_type.arity()
                    )));
                }
                Self::Components(ComponentSequenceProperty {
                    loops: p.loops,
                    components: vec![p.components[0].clone(); value_type.arity()],
                    modifiers: broadcast_modifiers(&p.modifiers, value_type)?,
                })
            }
        })
    }

    /// Multiply in place by a constant.
    pub fn scale(&mut self, factor: impl Into<Value>) -> FxrResult<()> {
        *self = ops::property_with_constant(Op::Mul, self, &factor.into())?;
        Ok(())
    }

    /// Add a constant in place.
    pub fn add(&mut self, offset: impl Into<Value>) -> FxrResult<()> {
        *self = ops::property_with_constant(Op::Add, self, &offset.into())?;
        Ok(())
    }

    /// Raise base and keyframe values to `exponent`. Tangents and modifiers
    /// are left as they are.
    pub fn power(&mut self, exponent: f32) {
        let pow = |v: f32| v.powf(exponent);
        match self {
            Self::Value(p) => p.value = p.value.map(pow),
            Self::Sequence(p) => {
                for k in p.keyframes_mut() {
                    k.value = k.value.map(pow);
                }
            }
            Self::Components(p) => {
                for c in p.components_mut() {
                    for k in c.keyframes_mut() {
                        k.value = k.value.map(pow);
                    }
                }
            }
        }
    }

    /// Packed `(arity, function, loop)` tag: bits 0-1 arity-1, bits 2-4
    /// function, bit 5 loop.
    pub(crate) fn tag(&self) -> u16 {
        pack_tag(self.value_type(), self.function(), self.loops())
    }
}

pub(crate) fn pack_tag(value_type: ValueType, function: PropertyFunction, loops: bool) -> u16 {
    u16::from(value_type.code()) | u16::from(function.code()) << 2 | u16::from(loops) << 5
}

pub(crate) fn unpack_tag(tag: u16) -> Option<(ValueType, PropertyFunction, bool)> {
    if tag >> 6 != 0 {
        return None;
    }
    let value_type = ValueType::from_code((tag & 0b11) as u8)?;
    let function = PropertyFunction::from_code(((tag >> 2) & 0b111) as u8)?;
    Some((value_type, function, tag & 0b10_0000 != 0))
}

fn broadcast_modifiers(modifiers: &[Modifier], value_type: ValueType) -> FxrResult<Vec<Modifier>> {
    modifiers.iter().map(|m| m.broadcast(value_type)).collect()
}

fn wrap_position(arg: f32, loops: bool, duration: f32) -> f32 {
    if loops && duration > 0.0 {
        arg.rem_euclid(duration)
    } else {
        arg
    }
}

/// Sorted, deduplicated keyframe positions of every sequence.
pub(crate) fn union_positions<'a>(
    sequences: impl Iterator<Item = &'a SequenceProperty>,
) -> Vec<f32> {
    let mut positions: Vec<f32> = sequences.flat_map(|s| s.positions()).collect();
    positions.sort_by(f32::total_cmp);
    positions.dedup();
    positions
}

#[cfg(test)]
#[path = "../../tests/unit/value/property.rs"]
mod tests;
