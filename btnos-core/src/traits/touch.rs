//! Touch panel trait

use core::fmt;

use crate::geometry::Point;

/// Errors that can occur reading the touch controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchError {
    /// I2C transaction failed
    Bus,
    /// Controller returned a malformed report
    InvalidReport,
}

impl fmt::Display for TouchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TouchError::Bus => f.write_str("touch bus error"),
            TouchError::InvalidReport => f.write_str("malformed touch report"),
        }
    }
}

impl core::error::Error for TouchError {}

/// Trait for a single-point capacitive touch controller
pub trait TouchController {
    /// Read the current contact
    ///
    /// Returns `Ok(None)` when nothing is touching the panel. Some panels
    /// report `(0, 0)` instead of no contact; that value is passed through
    /// unchanged and treated as a sentinel by the caller.
    fn read_point(&mut self) -> Result<Option<Point>, TouchError>;
}

impl<T: TouchController + ?Sized> TouchController for &mut T {
    fn read_point(&mut self) -> Result<Option<Point>, TouchError> {
        (**self).read_point()
    }
}
