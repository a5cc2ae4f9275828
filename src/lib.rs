//! Reader and writer for FXR effect files.
//!
//! An FXR file is a tree of nodes. Nodes carry effects, effects carry fixed
//! slots of actions, and actions carry fields and time-varying properties.
//!
//! - Parse a file with [`Document::read`]
//! - Edit the [`Node`] tree, using [`SchemaAction`] for actions with a known
//!   per-game layout
//! - Serialize it for any supported [`Game`] with [`Document::write`]
#![forbid(unsafe_code)]

mod foundation;

pub mod binary;
pub mod document;
pub mod graph;
pub mod schema;
pub mod value;

pub use crate::foundation::error::{FxrError, FxrResult};
pub use crate::foundation::version::{FxrVersion, Game};

pub use crate::binary::field::{Field, FieldType};
pub use crate::document::{
    Condition, ConditionOperand, ConditionOperator, CrossReferences, Document, DocumentSummary,
    ReadOptions, State, WriteOptions,
};
pub use crate::graph::{
    Action, ActionType, Effect, EffectKind, GenericAction, Node, NodeKind, Param, SchemaAction,
};
pub use crate::value::{
    ComponentSequenceProperty, Keyframe, Modifier, ModifierKind, Operand, Property,
    PropertyFunction, SequenceFunction, SequenceProperty, Value, ValueProperty, ValueType,
    combine_add, combine_components, combine_mul, separate_components,
};
