pub mod grid;
pub mod health;
pub mod program;
pub mod schedule;
