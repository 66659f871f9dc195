//! Example apps for the BtnOS shell
//!
//! Each app is an [`AppHandler`](btnos_core::AppHandler) plus the labels it
//! expects on its app and task buttons:
//!
//! - [`WifiApp`]: join/leave the configured network, scan, big clock
//! - [`ImuApp`]: live accelerometer readout and SD card capture
//! - [`DoodleApp`]: finger painting with a palette and pen widths

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// Must come first so the logging macros are visible to every module
mod fmt;

pub mod doodle;
pub mod imu;
pub mod wifi;

#[cfg(test)]
mod rig;

pub use doodle::DoodleApp;
pub use imu::ImuApp;
pub use wifi::WifiApp;
