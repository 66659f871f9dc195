//! Shell state machine
//!
//! The outer loop (home and app screens, gesture driven) and the inner task
//! loop (raw samples routed to the active app) are explicit and
//! deterministic.

pub mod events;
pub mod machine;
pub mod task_loop;

pub use events::ShellEvent;
pub use machine::ShellState;
pub use task_loop::{TaskHit, TaskLoop};
