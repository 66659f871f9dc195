//! Board-agnostic core of the BtnOS touch shell
//!
//! This crate contains everything that does not depend on a particular
//! board:
//!
//! - Hardware abstraction traits (display, touch, clock, peripherals)
//! - Button registry and the fixed screen layout
//! - Touch polling with tap/hold classification
//! - Shell state machine and the event dispatcher
//! - The app plugin interface
//! - Device parameters and app registration

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[cfg(all(feature = "testing", not(test)))]
extern crate std;

// Must come first so the logging macros are visible to every module
mod fmt;

pub mod app;
pub mod button;
pub mod clock;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod geometry;
pub mod poller;
pub mod render;
pub mod session;
pub mod state;
pub mod traits;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use app::{AppContext, AppHandler, NoopApp};
pub use button::{AppSlot, ButtonEdit, ButtonId, TaskSlot};
pub use dispatch::{Device, Dispatcher};
pub use error::ShellError;
pub use geometry::{Point, Rect};
