use smallvec::SmallVec;

use crate::foundation::error::{FxrError, FxrResult};
use crate::value::components;
use crate::value::ops::{self, Op};
use crate::value::property::Property;
use crate::value::vector::{Value, ValueType, promote};

pub type Seeds = SmallVec<[i32; 4]>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModifierKind {
    RandomDelta,
    RandomRange,
    ExternalValue1,
    ExternalValue2,
    RandomFraction,
}

impl ModifierKind {
    pub const ALL: [ModifierKind; 5] = [
        ModifierKind::RandomDelta,
        ModifierKind::RandomRange,
        ModifierKind::ExternalValue1,
        ModifierKind::ExternalValue2,
        ModifierKind::RandomFraction,
    ];

    /// Type code stored in the high bits of the 16-bit tag.
    pub fn code(self) -> u16 {
        match self {
            Self::RandomDelta => 21,
            Self::RandomRange => 24,
            Self::ExternalValue1 => 38,
            Self::ExternalValue2 => 39,
            Self::RandomFraction => 53,
        }
    }

    /// Base of the 32-bit tag; the stored tag is this plus `arity - 1`.
    pub fn tag_offset(self) -> i32 {
        match self {
            Self::RandomDelta => 4,
            Self::RandomRange => 8,
            Self::ExternalValue1 => 12,
            Self::ExternalValue2 => 16,
            Self::RandomFraction => 20,
        }
    }

    pub fn from_code(code: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.code() == code)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::RandomDelta => "RandomDelta",
            Self::RandomRange => "RandomRange",
            Self::ExternalValue1 => "ExternalValue1",
            Self::ExternalValue2 => "ExternalValue2",
            Self::RandomFraction => "RandomFraction",
        }
    }
}

/// A perturbation layered on a property's base value.
///
/// Random kinds carry one seed per component. The two external kinds sample a
/// host-supplied value through `factor`, which is a full property of its own
/// but may not carry modifiers.
#[derive(Clone, Debug, PartialEq)]
pub enum Modifier {
    /// Adds a uniform sample from `[-max_change, max_change]`.
    RandomDelta { seeds: Seeds, max_change: Value },
    /// Adds a uniform sample from `[min, max]`.
    RandomRange { seeds: Seeds, min: Value, max: Value },
    /// Multiplies by `1 + U(-1, 1) * max_fraction`.
    RandomFraction { seeds: Seeds, max_fraction: Value },
    /// Multiplies by `factor(external_value)`.
    ExternalValue1 { external_value: i32, factor: Property },
    /// Adds `factor(external_value)`.
    ExternalValue2 { external_value: i32, factor: Property },
}

impl Modifier {
    pub fn random_delta(max_change: impl Into<Value>) -> Self {
        let max_change = max_change.into();
        Self::RandomDelta {
            seeds: default_seeds(max_change.arity()),
            max_change,
        }
    }

    pub fn random_range(min: impl Into<Value>, max: impl Into<Value>) -> FxrResult<Self> {
        let (min, max) = (min.into(), max.into());
        let value_type = promote(min.value_type(), max.value_type())?;
        Ok(Self::RandomRange {
            seeds: default_seeds(value_type.arity()),
            min: min.broadcast(value_type)?,
            max: max.broadcast(value_type)?,
        })
    }

    pub fn random_fraction(max_fraction: impl Into<Value>) -> Self {
        let max_fraction = max_fraction.into();
        Self::RandomFraction {
            seeds: default_seeds(max_fraction.arity()),
            max_fraction,
        }
    }

    pub fn external_value1(external_value: i32, factor: Property) -> FxrResult<Self> {
        check_factor(&factor)?;
        Ok(Self::ExternalValue1 {
            external_value,
            factor,
        })
    }

    pub fn external_value2(external_value: i32, factor: Property) -> FxrResult<Self> {
        check_factor(&factor)?;
        Ok(Self::ExternalValue2 {
            external_value,
            factor,
        })
    }

    /// Replace the seeds with `seed, seed + 1, ...`, one per component.
    pub fn with_seed(mut self, seed: i32) -> Self {
        if let Some(seeds) = self.seeds_mut() {
            for (i, s) in seeds.iter_mut().enumerate() {
                *s = seed.wrapping_add(i as i32);
            }
        }
        self
    }

    pub fn kind(&self) -> ModifierKind {
        match self {
            Self::RandomDelta { .. } => ModifierKind::RandomDelta,
            Self::RandomRange { .. } => ModifierKind::RandomRange,
            Self::RandomFraction { .. } => ModifierKind::RandomFraction,
            Self::ExternalValue1 { .. } => ModifierKind::ExternalValue1,
            Self::ExternalValue2 { .. } => ModifierKind::ExternalValue2,
        }
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            Self::RandomDelta { max_change, .. } => max_change.value_type(),
            Self::RandomRange { min, .. } => min.value_type(),
            Self::RandomFraction { max_fraction, .. } => max_fraction.value_type(),
            Self::ExternalValue1 { factor, .. } | Self::ExternalValue2 { factor, .. } => {
                factor.value_type()
            }
        }
    }

    pub fn arity(&self) -> usize {
        self.value_type().arity()
    }

    pub fn seeds(&self) -> Option<&[i32]> {
        match self {
            Self::RandomDelta { seeds, .. }
            | Self::RandomRange { seeds, .. }
            | Self::RandomFraction { seeds, .. } => Some(seeds),
            _ => None,
        }
    }

    fn seeds_mut(&mut self) -> Option<&mut Seeds> {
        match self {
            Self::RandomDelta { seeds, .. }
            | Self::RandomRange { seeds, .. }
            | Self::RandomFraction { seeds, .. } => Some(seeds),
            _ => None,
        }
    }

    pub fn external_value(&self) -> Option<i32> {
        match self {
            Self::ExternalValue1 { external_value, .. }
            | Self::ExternalValue2 { external_value, .. } => Some(*external_value),
            _ => None,
        }
    }

    pub fn factor(&self) -> Option<&Property> {
        match self {
            Self::ExternalValue1 { factor, .. } | Self::ExternalValue2 { factor, .. } => {
                Some(factor)
            }
            _ => None,
        }
    }

    /// 16-bit tag: `kind << 2 | arity - 1`.
    pub(crate) fn tag_a(&self) -> u16 {
        self.kind().code() << 2 | u16::from(self.value_type().code())
    }

    /// 32-bit tag: kind offset plus `arity - 1`.
    pub(crate) fn tag_b(&self) -> i32 {
        self.kind().tag_offset() + i32::from(self.value_type().code())
    }

    /// Check structural consistency: seed count matches arity and factors
    /// carry no modifiers.
    pub fn validate(&self) -> FxrResult<()> {
        if let Some(seeds) = self.seeds()
            && seeds.len() != self.arity()
        {
            return Err(FxrError::validation(format!(
                "{} has {} seeds for {} components",
                self.kind().name(),
                seeds.len(),
                self.arity()
            )));
        }
        if let Self::RandomRange { min, max, .. } = self
            && min.arity() != max.arity()
        {
            return Err(FxrError::validation(
                "RandomRange min and max differ in component count",
            ));
        }
        match self.factor() {
            Some(factor) => check_factor(factor),
            None => Ok(()),
        }
    }

    /// Widen a scalar modifier to `value_type`. Seeds are repeated.
    pub fn broadcast(&self, value_type: ValueType) -> FxrResult<Self> {
        self.validate()?;
        if self.value_type() == value_type {
            return Ok(self.clone());
        }
        if self.value_type() != ValueType::Scalar {
            return Err(FxrError::validation(format!(
                "cannot fit a {}-component {} into {} components",
                self.arity(),
                self.kind().name(),
                value_type.arity()
            )));
        }
        let seeds = |s: &Seeds| -> Seeds { (0..value_type.arity()).map(|_| s[0]).collect() };
        Ok(match self {
            Self::RandomDelta { seeds: s, max_change } => Self::RandomDelta {
                seeds: seeds(s),
                max_change: max_change.broadcast(value_type)?,
            },
            Self::RandomRange { seeds: s, min, max } => Self::RandomRange {
                seeds: seeds(s),
                min: min.broadcast(value_type)?,
                max: max.broadcast(value_type)?,
            },
            Self::RandomFraction { seeds: s, max_fraction } => Self::RandomFraction {
                seeds: seeds(s),
                max_fraction: max_fraction.broadcast(value_type)?,
            },
            Self::ExternalValue1 {
                external_value,
                factor,
            } => Self::ExternalValue1 {
                external_value: *external_value,
                factor: factor.broadcast(value_type)?,
            },
            Self::ExternalValue2 {
                external_value,
                factor,
            } => Self::ExternalValue2 {
                external_value: *external_value,
                factor: factor.broadcast(value_type)?,
            },
        })
    }

    /// Rewrite this modifier for a property that was multiplied by `c`.
    pub(crate) fn scaled(&self, c: &Value) -> FxrResult<Self> {
        Ok(match self {
            Self::RandomDelta { seeds, max_change } => {
                let max_change = max_change.zip_with(c, |m, c| m * c.abs())?;
                Self::RandomDelta {
                    seeds: broadcast_seeds(seeds, max_change.value_type()),
                    max_change,
                }
            }
            Self::RandomRange { seeds, min, max } => {
                let value_type = promote(promote(min.value_type(), max.value_type())?, c.value_type())?;
                let mut new_min = Vec::with_capacity(value_type.arity());
                let mut new_max = Vec::with_capacity(value_type.arity());
                for i in 0..value_type.arity() {
                    let k = c.component(i);
                    let (a, b) = (min.component(i) * k, max.component(i) * k);
                    if k < 0.0 {
                        new_min.push(b);
                        new_max.push(a);
                    } else {
                        new_min.push(a);
                        new_max.push(b);
                    }
                }
                Self::RandomRange {
                    seeds: broadcast_seeds(seeds, value_type),
                    min: new_min.into_iter().collect(),
                    max: new_max.into_iter().collect(),
                }
            }
            Self::RandomFraction { .. } | Self::ExternalValue1 { .. } => self.clone(),
            Self::ExternalValue2 {
                external_value,
                factor,
            } => Self::ExternalValue2 {
                external_value: *external_value,
                factor: ops::property_with_constant(Op::Mul, factor, c)?,
            },
        })
    }

    /// Rewrite this modifier for a property with base value `base` that had
    /// `c` added to it.
    pub(crate) fn offset(&self, base: &Value, c: &Value) -> FxrResult<Self> {
        match self {
            Self::RandomFraction {
                seeds,
                max_fraction,
            } => {
                let value_type = promote(max_fraction.value_type(), c.value_type())?;
                let fraction: Value = (0..value_type.arity())
                    .map(|i| {
                        let (f, b, k) = (max_fraction.component(i), base.component(i), c.component(i));
                        let denom = b + k;
                        if k == 0.0 || denom == 0.0 { f } else { f * b / denom }
                    })
                    .collect();
                Ok(Self::RandomFraction {
                    seeds: broadcast_seeds(seeds, value_type),
                    max_fraction: fraction,
                })
            }
            _ => Ok(self.clone()),
        }
    }

    /// Split into one scalar modifier per component.
    pub fn separate_components(&self) -> FxrResult<Vec<Modifier>> {
        self.validate()?;
        let arity = self.arity();
        let seed = |seeds: &Seeds, i: usize| -> Seeds { smallvec::smallvec![seeds[i]] };
        let part = |v: &Value, i: usize| Value::scalar(v.component(i));
        Ok(match self {
            Self::RandomDelta { seeds, max_change } => (0..arity)
                .map(|i| Self::RandomDelta {
                    seeds: seed(seeds, i),
                    max_change: part(max_change, i),
                })
                .collect(),
            Self::RandomRange { seeds, min, max } => (0..arity)
                .map(|i| Self::RandomRange {
                    seeds: seed(seeds, i),
                    min: part(min, i),
                    max: part(max, i),
                })
                .collect(),
            Self::RandomFraction {
                seeds,
                max_fraction,
            } => (0..arity)
                .map(|i| Self::RandomFraction {
                    seeds: seed(seeds, i),
                    max_fraction: part(max_fraction, i),
                })
                .collect(),
            Self::ExternalValue1 {
                external_value,
                factor,
            } => components::separate_components(factor)?
                .into_iter()
                .map(|factor| Self::ExternalValue1 {
                    external_value: *external_value,
                    factor,
                })
                .collect(),
            Self::ExternalValue2 {
                external_value,
                factor,
            } => components::separate_components(factor)?
                .into_iter()
                .map(|factor| Self::ExternalValue2 {
                    external_value: *external_value,
                    factor,
                })
                .collect(),
        })
    }

    /// Join scalar modifiers of one kind into a single vector modifier.
    pub fn combine_components(parts: &[Modifier]) -> FxrResult<Modifier> {
        let Some(first) = parts.first() else {
            return Err(FxrError::validation("no modifiers to combine"));
        };
        if ValueType::from_arity(parts.len()).is_none() {
            return Err(FxrError::validation(format!(
                "cannot combine {} modifiers into one value",
                parts.len()
            )));
        }
        if let Some(odd) = parts.iter().find(|m| m.kind() != first.kind()) {
            return Err(FxrError::validation(format!(
                "cannot combine {} with {}",
                first.kind().name(),
                odd.kind().name()
            )));
        }
        for part in parts {
            part.validate()?;
        }
        if let Some(odd) = parts.iter().find(|m| m.arity() != 1) {
            return Err(FxrError::validation(format!(
                "component modifiers must be scalar, found {} components",
                odd.arity()
            )));
        }

        let seeds = || -> Seeds { parts.iter().filter_map(|m| m.seeds()).map(|s| s[0]).collect() };
        let column = |pick: fn(&Modifier) -> Option<f32>| -> Value {
            parts.iter().filter_map(pick).collect()
        };
        Ok(match first {
            Self::RandomDelta { .. } => Self::RandomDelta {
                seeds: seeds(),
                max_change: column(|m| match m {
                    Self::RandomDelta { max_change, .. } => Some(max_change.component(0)),
                    _ => None,
                }),
            },
            Self::RandomRange { .. } => Self::RandomRange {
                seeds: seeds(),
                min: column(|m| match m {
                    Self::RandomRange { min, .. } => Some(min.component(0)),
                    _ => None,
                }),
                max: column(|m| match m {
                    Self::RandomRange { max, .. } => Some(max.component(0)),
                    _ => None,
                }),
            },
            Self::RandomFraction { .. } => Self::RandomFraction {
                seeds: seeds(),
                max_fraction: column(|m| match m {
                    Self::RandomFraction { max_fraction, .. } => Some(max_fraction.component(0)),
                    _ => None,
                }),
            },
            Self::ExternalValue1 { external_value, .. }
            | Self::ExternalValue2 { external_value, .. } => {
                if let Some(odd) = parts
                    .iter()
                    .find(|m| m.external_value() != Some(*external_value))
                {
                    return Err(FxrError::validation(format!(
                        "cannot combine external values {external_value} and {}",
                        odd.external_value().unwrap_or_default()
                    )));
                }
                let factors: Vec<Property> =
                    parts.iter().filter_map(|m| m.factor().cloned()).collect();
                let factor = components::combine_components(&factors)?;
                if first.kind() == ModifierKind::ExternalValue1 {
                    Self::ExternalValue1 {
                        external_value: *external_value,
                        factor,
                    }
                } else {
                    Self::ExternalValue2 {
                        external_value: *external_value,
                        factor,
                    }
                }
            }
        })
    }
}

fn check_factor(factor: &Property) -> FxrResult<()> {
    if !factor.modifiers().is_empty() {
        return Err(FxrError::validation(
            "an external value factor cannot carry modifiers",
        ));
    }
    Ok(())
}

fn default_seeds(arity: usize) -> Seeds {
    (0..arity).map(|_| 0).collect()
}

fn broadcast_seeds(seeds: &Seeds, value_type: ValueType) -> Seeds {
    if seeds.len() == value_type.arity() {
        return seeds.clone();
    }
    let first = seeds.first().copied().unwrap_or_default();
    (0..value_type.arity()).map(|_| first).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/value/modifier.rs"]
mod tests;
