//! Request handlers, one module per resource.

pub mod grid;
pub mod program;
pub mod schedule;
