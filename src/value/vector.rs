use smallvec::SmallVec;

use crate::foundation::error::{FxrError, FxrResult};

/// Number of components of a property value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueType {
    Scalar,
    Vec2,
    Vec3,
    Vec4,
}

impl ValueType {
    pub fn arity(self) -> usize {
        self.code() as usize + 1
    }

    pub fn from_arity(arity: usize) -> Option<Self> {
        match arity {
            1 => Some(Self::Scalar),
            2 => Some(Self::Vec2),
            3 => Some(Self::Vec3),
            4 => Some(Self::Vec4),
            _ => None,
        }
    }

    /// Two-bit wire code (`arity - 1`).
    pub fn code(self) -> u8 {
        match self {
            Self::Scalar => 0,
            Self::Vec2 => 1,
            Self::Vec3 => 2,
            Self::Vec4 => 3,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::from_arity(usize::from(code) + 1)
    }
}

/// A scalar or 2-4 component vector of floats.
#[derive(Clone, Debug, PartialEq)]
pub struct Value(SmallVec<[f32; 4]>);

impl Value {
    pub fn scalar(v: f32) -> Self {
        Self(smallvec::smallvec![v])
    }

    pub fn from_slice(components: &[f32]) -> FxrResult<Self> {
        if ValueType::from_arity(components.len()).is_none() {
            return Err(FxrError::validation(format!(
                "a value needs 1 to 4 components, got {}",
                components.len()
            )));
        }
        Ok(Self(SmallVec::from_slice(components)))
    }

    pub fn splat(v: f32, value_type: ValueType) -> Self {
        Self(smallvec::smallvec![v; value_type.arity()])
    }

    pub fn zeros(value_type: ValueType) -> Self {
        Self::splat(0.0, value_type)
    }

    pub fn arity(&self) -> usize {
        self.0.len()
    }

    pub fn value_type(&self) -> ValueType {
        match self.0.len() {
            2 => ValueType::Vec2,
            3 => ValueType::Vec3,
            4 => ValueType::Vec4,
            _ => ValueType::Scalar,
        }
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Component `i`, broadcasting scalars to every index.
    pub fn component(&self, i: usize) -> f32 {
        if self.0.len() == 1 { self.0[0] } else { self.0[i] }
    }

    pub fn is_all(&self, v: f32) -> bool {
        self.0.iter().all(|&c| c == v)
    }

    /// Widen a scalar to `value_type`. Narrowing is an error.
    pub fn broadcast(&self, value_type: ValueType) -> FxrResult<Self> {
        let arity = value_type.arity();
        if self.arity() == arity {
            return Ok(self.clone());
        }
        if self.arity() == 1 {
            return Ok(Self::splat(self.0[0], value_type));
        }
        Err(FxrError::validation(format!(
            "cannot fit a {}-component value into {arity} components",
            self.arity()
        )))
    }

    pub fn map(&self, f: impl Fn(f32) -> f32) -> Self {
        Self(self.0.iter().map(|&c| f(c)).collect())
    }

    /// Component-wise combination, promoting a scalar operand to the other's
    /// arity.
    pub fn zip_with(&self, other: &Self, f: impl Fn(f32, f32) -> f32) -> FxrResult<Self> {
        let value_type = promote(self.value_type(), other.value_type())?;
        Ok(Self(
            (0..value_type.arity())
                .map(|i| f(self.component(i), other.component(i)))
                .collect(),
        ))
    }

    /// Linear interpolation. `a` and `b` must share an arity or one must be a
    /// scalar.
    pub fn lerp(a: &Self, b: &Self, t: f32) -> Self {
        let arity = a.arity().max(b.arity());
        Self(
            (0..arity)
                .map(|i| {
                    let (x, y) = (a.component(i), b.component(i));
                    x + (y - x) * t
                })
                .collect(),
        )
    }
}

/// Larger of two value types, provided one of them is a scalar or they match.
pub fn promote(a: ValueType, b: ValueType) -> FxrResult<ValueType> {
    if a == b || b == ValueType::Scalar {
        return Ok(a);
    }
    if a == ValueType::Scalar {
        return Ok(b);
    }
    Err(FxrError::validation(format!(
        "cannot combine {}-component and {}-component values",
        a.arity(),
        b.arity()
    )))
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::scalar(v)
    }
}

impl From<[f32; 2]> for Value {
    fn from(v: [f32; 2]) -> Self {
        Self(SmallVec::from_slice(&v))
    }
}

impl From<[f32; 3]> for Value {
    fn from(v: [f32; 3]) -> Self {
        Self(SmallVec::from_slice(&v))
    }
}

impl From<[f32; 4]> for Value {
    fn from(v: [f32; 4]) -> Self {
        Self(SmallVec::from_slice(&v))
    }
}

impl FromIterator<f32> for Value {
    /// Collects up to four components; callers guarantee the length.
    fn from_iter<I: IntoIterator<Item = f32>>(iter: I) -> Self {
        Self(iter.into_iter().take(4).collect())
    }
}
