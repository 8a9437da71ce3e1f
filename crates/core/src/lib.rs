//! # Signage Core
//!
//! The weekly recurring schedule engine for display screens: the block
//! model, the time grid helpers, the conflict resolver that turns
//! overlapping blocks into a per-day program, and the store that edits a
//! working set and keeps it in sync with the remote schedule service.

pub mod errors;
pub mod grid;
pub mod models;
pub mod resolver;
pub mod service;
pub mod store;
