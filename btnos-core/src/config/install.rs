//! App registration requests
//!
//! An [`AppInstall`] is the raw, unchecked form coming from code or a config
//! file. [`AppInstall::validate`] checks every slot number up front so that a
//! bad request never leaves the registry half updated.

use core::fmt;

use heapless::Vec;

use crate::button::{label, AppSlot, Label, TaskSlot};

/// Most task entries accepted in one request
pub const MAX_INSTALL_TASKS: usize = 8;

/// Errors in app registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// App slot outside 1..=4
    InvalidAppSlot(u8),
    /// Task key outside 5..=8
    InvalidTaskSlot(u8),
    /// More task entries than can be stored
    TooManyTasks,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidAppSlot(n) => write!(f, "app slot {n} outside 1..=4"),
            ConfigError::InvalidTaskSlot(n) => write!(f, "task key {n} outside 5..=8"),
            ConfigError::TooManyTasks => {
                write!(f, "more than {MAX_INSTALL_TASKS} task entries")
            }
        }
    }
}

impl core::error::Error for ConfigError {}

/// Unvalidated request to label an app slot and its task buttons
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInstall {
    pub slot: u8,
    pub label: Label,
    pub tasks: Vec<(u8, Label), MAX_INSTALL_TASKS>,
    overflowed: bool,
}

impl AppInstall {
    pub fn new(slot: u8, text: &str) -> Self {
        Self {
            slot,
            label: label(text),
            tasks: Vec::new(),
            overflowed: false,
        }
    }

    /// Add a task label; later entries for the same key win
    pub fn task(mut self, key: u8, text: &str) -> Self {
        if self.tasks.push((key, label(text))).is_err() {
            self.overflowed = true;
        }
        self
    }

    pub fn validate(&self) -> Result<Registration, ConfigError> {
        let slot = AppSlot::new(self.slot).ok_or(ConfigError::InvalidAppSlot(self.slot))?;
        if self.overflowed {
            return Err(ConfigError::TooManyTasks);
        }
        let mut tasks: [Option<Label>; 4] = Default::default();
        for (key, text) in &self.tasks {
            let task = TaskSlot::new(*key).ok_or(ConfigError::InvalidTaskSlot(*key))?;
            tasks[task.index()] = Some(text.clone());
        }
        Ok(Registration {
            slot,
            label: self.label.clone(),
            tasks,
        })
    }
}

/// A checked registration, ready to apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub slot: AppSlot,
    pub label: Label,
    /// New label per task slot, `None` leaves the existing label
    pub tasks: [Option<Label>; 4],
}
