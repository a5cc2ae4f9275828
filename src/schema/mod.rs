//! Per-game layouts of schema-variant actions.
//!
//! A schema action names its parameters; each game's record maps those names
//! onto the four raw lists of the generic action layout. Records and single
//! lists may alias another game's, and [`resolve`] chases those aliases into
//! four literal lists.

pub mod catalogue;
pub mod resolve;
pub mod table;

pub use resolve::{ResolvedLayout, lookup, resolve};
pub use table::{ActionSchema, ExtraFieldQuirk, ParamDef, ParamDefault, RawList};
