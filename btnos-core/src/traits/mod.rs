//! Hardware abstraction traits
//!
//! These traits define the interface between the shell logic and the
//! board-specific drivers.

pub mod clock;
pub mod display;
pub mod peripherals;
pub mod touch;

pub use clock::{LocalTime, SystemClock};
pub use display::{Color, Display, DisplayError, Font};
pub use peripherals::{
    AccessPoint, Imu, ImuSample, PeripheralError, Peripherals, Power, Storage, StorageError,
    StorageSession, Wifi, MAX_SCAN_RESULTS, SSID_LEN,
};
pub use touch::{TouchController, TouchError};
