//! Whole files: header, state table, node tree and cross-reference lists.

mod io;
pub mod model;
pub mod options;
pub mod state;
pub mod summary;

pub use model::{CrossReferences, Document};
pub use options::{ReadOptions, WriteOptions};
pub use state::{Condition, ConditionOperand, ConditionOperator, State};
pub use summary::DocumentSummary;

#[cfg(test)]
#[path = "../../tests/unit/document/document.rs"]
mod tests;
