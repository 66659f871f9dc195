//! Shell state machine
//!
//! Which loop is running, and which screen is up, is a pure function of the
//! current state and an event. Side effects (drawing, power) are performed
//! by the dispatcher after the transition is decided.

use super::events::ShellEvent;
use crate::button::AppSlot;

/// Shell states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ShellState {
    /// Nothing drawn yet
    Boot,
    /// Home screen up, polling gestures
    Home,
    /// App screen up, sampling raw touches for the app
    TaskLoop(AppSlot),
    /// App screen still up after leaving the task loop, polling gestures
    AppScreen(AppSlot),
    /// Power cut requested
    PoweredDown,
    /// Reboot requested
    Resetting,
}

impl ShellState {
    /// No further events are accepted
    pub fn is_terminal(&self) -> bool {
        matches!(self, ShellState::PoweredDown | ShellState::Resetting)
    }

    /// The app whose screen is showing, if any
    pub fn active_app(&self) -> Option<AppSlot> {
        match self {
            ShellState::TaskLoop(slot) | ShellState::AppScreen(slot) => Some(*slot),
            _ => None,
        }
    }

    /// Input is read as gestures (as opposed to raw samples)
    pub fn polls_gestures(&self) -> bool {
        matches!(self, ShellState::Home | ShellState::AppScreen(_))
    }

    /// Apply an event and return the next state
    pub fn transition(self, event: ShellEvent) -> Self {
        use ShellEvent as E;
        use ShellState as S;

        if self.is_terminal() {
            return self;
        }

        match (self, event) {
            (_, E::PowerDown) => S::PoweredDown,
            (_, E::HardReset) => S::Resetting,
            (_, E::ShowHome) => S::Home,

            (S::Home, E::SelectApp(slot)) => S::TaskLoop(slot),
            // A second gesture on the app button goes back home
            (S::AppScreen(_), E::SelectApp(_)) => S::Home,

            (S::TaskLoop(slot), E::ExitTaskLoop) => S::AppScreen(slot),

            (state, _) => state,
        }
    }
}
