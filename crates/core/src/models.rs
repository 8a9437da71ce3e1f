pub mod block;
pub mod program;
pub mod schedule;
pub mod sequence;
pub mod time;
