//! Property and modifier value model.
//!
//! A [`Property`] is a constant, a keyframe sequence or a set of per-component
//! curves, optionally perturbed by [`Modifier`]s. The arithmetic in [`ops`]
//! works across all three forms.

pub(crate) mod codec;
pub mod components;
pub mod modifier;
pub mod ops;
pub mod property;
pub mod vector;

pub use components::{combine_components, separate_components};
pub use modifier::{Modifier, ModifierKind};
pub use ops::{Operand, combine_add, combine_mul};
pub use property::{
    ComponentSequenceProperty, Keyframe, Property, PropertyFunction, SequenceFunction,
    SequenceProperty, ValueProperty,
};
pub use vector::{Value, ValueType};
