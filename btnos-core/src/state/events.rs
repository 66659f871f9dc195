//! Events that trigger shell state transitions

use crate::button::AppSlot;

/// Events that can change which loop the shell is in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ShellEvent {
    /// Home screen was drawn (boot, B button)
    ShowHome,
    /// Any gesture on an app button
    SelectApp(AppSlot),
    /// App button touched again from inside the task loop
    ExitTaskLoop,
    /// Hold on A
    PowerDown,
    /// Hold on C, or a fatal configuration error
    HardReset,
}
