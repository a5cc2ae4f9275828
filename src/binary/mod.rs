//! Offset-based binary I/O: a step-in/step-out reader, a writer with
//! reserve/fill offset slots, and the three primitive field types.

pub mod field;
pub mod reader;
pub mod section;
pub mod writer;
