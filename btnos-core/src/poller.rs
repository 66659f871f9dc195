//! Touch polling and gesture classification
//!
//! The poller turns raw panel readings into tap and hold gestures on the
//! zones of the live screen. It keeps no history beyond the press that is
//! currently being tracked.

use heapless::Vec;

use crate::button::{ButtonId, MAX_VISIBLE};
use crate::geometry::{Point, Rect};
use crate::traits::{TouchController, TouchError};

/// Press duration at which a touch becomes a hold
pub const HOLD_THRESHOLD_MS: u64 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GestureAction {
    Tap,
    Hold,
}

/// A completed gesture on one button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Gesture {
    pub button: ButtonId,
    pub action: GestureAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tracking {
    Idle,
    Pressed { button: ButtonId, since_ms: u64 },
    /// Hold already reported, waiting for release
    Held,
    /// Contact began outside every zone
    Ignored,
}

pub struct TouchPoller<T> {
    touch: T,
    zones: Vec<(ButtonId, Rect), MAX_VISIBLE>,
    tracking: Tracking,
    last: Option<Point>,
}

impl<T: TouchController> TouchPoller<T> {
    pub fn new(touch: T) -> Self {
        Self {
            touch,
            zones: Vec::new(),
            tracking: Tracking::Idle,
            last: None,
        }
    }

    /// Replace the bound zones and forget any press in progress
    pub fn rebind(&mut self, zones: impl IntoIterator<Item = (ButtonId, Rect)>) {
        self.zones.clear();
        for zone in zones {
            if self.zones.push(zone).is_err() {
                warn!("too many touch zones, extra ignored");
                break;
            }
        }
        self.reset_gesture();
    }

    /// Forget any press in progress
    pub fn reset_gesture(&mut self) {
        self.tracking = Tracking::Idle;
    }

    pub fn zones(&self) -> &[(ButtonId, Rect)] {
        &self.zones
    }

    /// First bound zone containing `point`
    pub fn zone_at(&self, point: Point) -> Option<ButtonId> {
        self.zones
            .iter()
            .find(|(_, rect)| rect.contains(point))
            .map(|(id, _)| *id)
    }

    /// Raw reading, `(0, 0)` passed through
    pub fn current_point(&mut self) -> Result<Option<Point>, TouchError> {
        self.last = self.touch.read_point()?;
        Ok(self.last)
    }

    /// True if the most recent reading falls inside `rect`
    pub fn zone_touched(&self, rect: Rect) -> bool {
        self.last.is_some_and(|p| rect.contains(p))
    }

    /// Sample the panel once and report a gesture if one just completed
    pub fn poll_gesture(&mut self, now_ms: u64) -> Result<Option<Gesture>, TouchError> {
        let contact = self.current_point()?.filter(|p| !p.is_origin());

        let (next, gesture) = match (self.tracking, contact) {
            (Tracking::Idle, None) => (Tracking::Idle, None),
            (Tracking::Idle, Some(p)) => match self.zone_at(p) {
                Some(button) => {
                    trace!("press {} at {}", button, p);
                    (Tracking::Pressed { button, since_ms: now_ms }, None)
                }
                None => (Tracking::Ignored, None),
            },
            (Tracking::Pressed { button, since_ms }, Some(_)) => {
                if now_ms.saturating_sub(since_ms) >= HOLD_THRESHOLD_MS {
                    (Tracking::Held, Some(Gesture { button, action: GestureAction::Hold }))
                } else {
                    (self.tracking, None)
                }
            }
            (Tracking::Pressed { button, since_ms }, None) => {
                let action = if now_ms.saturating_sub(since_ms) >= HOLD_THRESHOLD_MS {
                    GestureAction::Hold
                } else {
                    GestureAction::Tap
                };
                (Tracking::Idle, Some(Gesture { button, action }))
            }
            (Tracking::Held | Tracking::Ignored, Some(_)) => (self.tracking, None),
            (Tracking::Held | Tracking::Ignored, None) => (Tracking::Idle, None),
        };

        self.tracking = next;
        if let Some(g) = gesture {
            debug!("gesture {} {:?}", g.button, g.action);
        }
        Ok(gesture)
    }

    pub fn touch_mut(&mut self) -> &mut T {
        &mut self.touch
    }

    pub fn into_inner(self) -> T {
        self.touch
    }
}
