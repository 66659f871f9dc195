//! Shell error type

use core::fmt;

use crate::button::ButtonId;
use crate::config::ConfigError;
use crate::traits::{DisplayError, PeripheralError, StorageError, TouchError};

/// Anything that can abort a dispatch step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ShellError {
    Display(DisplayError),
    Touch(TouchError),
    Peripheral(PeripheralError),
    Storage(StorageError),
    Config(ConfigError),
    /// Edit of a button that is not on the live screen
    NotVisible(ButtonId),
}

impl fmt::Display for ShellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellError::Display(e) => write!(f, "display: {e}"),
            ShellError::Touch(e) => write!(f, "touch: {e}"),
            ShellError::Peripheral(e) => write!(f, "peripheral: {e}"),
            ShellError::Storage(e) => write!(f, "storage: {e}"),
            ShellError::Config(e) => write!(f, "config: {e}"),
            ShellError::NotVisible(id) => write!(f, "{id} is not on screen"),
        }
    }
}

impl core::error::Error for ShellError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            ShellError::Display(e) => Some(e),
            ShellError::Touch(e) => Some(e),
            ShellError::Peripheral(e) => Some(e),
            ShellError::Storage(e) => Some(e),
            ShellError::Config(e) => Some(e),
            ShellError::NotVisible(_) => None,
        }
    }
}

impl From<DisplayError> for ShellError {
    fn from(e: DisplayError) -> Self {
        ShellError::Display(e)
    }
}

impl From<TouchError> for ShellError {
    fn from(e: TouchError) -> Self {
        ShellError::Touch(e)
    }
}

impl From<PeripheralError> for ShellError {
    fn from(e: PeripheralError) -> Self {
        ShellError::Peripheral(e)
    }
}

impl From<StorageError> for ShellError {
    fn from(e: StorageError) -> Self {
        ShellError::Storage(e)
    }
}

impl From<ConfigError> for ShellError {
    fn from(e: ConfigError) -> Self {
        ShellError::Config(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::button::AppSlot;
    use core::error::Error;

    #[test]
    fn test_shell_error_display_and_source() {
        let e = ShellError::from(StorageError::NotMounted);
        assert_eq!(e.to_string(), "storage: card not mounted");
        assert!(e.source().is_some());

        let e = ShellError::from(ConfigError::InvalidAppSlot(9));
        assert_eq!(e.to_string(), "config: app slot 9 outside 1..=4");

        let id = ButtonId::App(AppSlot::new(2).unwrap());
        let e = ShellError::NotVisible(id);
        assert!(e.source().is_none());
        assert!(e.to_string().ends_with("is not on screen"));
    }
}
