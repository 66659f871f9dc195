//! Simulator configuration
//!
//! The default `device.toml` is compiled into the binary; `--config`
//! replaces it with a file read at start-up.

mod loader;

pub use loader::{AppEntry, AppKind, NetworkEntry, SimConfig, TaskEntry};
