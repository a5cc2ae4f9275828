//! The effect tree: nodes, effects and actions, plus the codec that lays the
//! tree out as the file's flat sections.

pub mod action;
pub mod node;
pub(crate) mod read;
pub mod walk;
pub(crate) mod write;

pub use action::{Action, ActionType, GenericAction, Param, SchemaAction};
pub use node::{Effect, EffectKind, Node, NodeKind};
