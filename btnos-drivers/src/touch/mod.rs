//! Touch panel drivers

pub mod ft6x36;

pub use ft6x36::{Ft6x36, DEFAULT_ADDRESS};
