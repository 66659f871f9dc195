//! Raw sample handling while an app screen owns the touch panel
//!
//! Unlike the outer loop, the task loop reacts to every new reading rather
//! than to completed gestures. Readings are debounced against the previous
//! one and resolved against the work band, the app's own button and the four
//! task buttons, first match wins.

use crate::button::{AppSlot, TaskSlot};
use crate::config::Layout;
use crate::geometry::Point;

/// What a sample resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TaskHit {
    /// Inside the work area's vertical band
    WorkArea(Point),
    /// The app's own button, after at least one earlier sample
    Exit,
    Task(TaskSlot),
}

/// Debounce and zone resolution for one visit to an app screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskLoop {
    slot: AppSlot,
    /// `None` until the first sample is accepted
    prev: Option<Option<Point>>,
    accepted: u32,
}

impl TaskLoop {
    pub fn new(slot: AppSlot) -> Self {
        Self {
            slot,
            prev: None,
            accepted: 0,
        }
    }

    pub fn slot(&self) -> AppSlot {
        self.slot
    }

    /// Samples accepted so far (after debounce)
    pub fn accepted(&self) -> u32 {
        self.accepted
    }

    /// Feed one reading
    ///
    /// - a repeat of the previous reading is dropped
    /// - `(0, 0)` is dropped without touching the debounce state
    /// - no contact is recorded but resolves to nothing
    pub fn feed(&mut self, sample: Option<Point>, layout: &Layout) -> Option<TaskHit> {
        if self.prev == Some(sample) {
            return None;
        }
        if sample.is_some_and(|p| p.is_origin()) {
            return None;
        }

        let hit = sample.and_then(|p| self.resolve(p, layout));
        self.prev = Some(sample);
        self.accepted += 1;
        hit
    }

    fn resolve(&self, p: Point, layout: &Layout) -> Option<TaskHit> {
        if layout.work.contains_y(p.y) {
            return Some(TaskHit::WorkArea(p));
        }
        // The finger that opened the app may still be on its button
        if self.accepted > 0 && layout.app(self.slot).contains(p) {
            return Some(TaskHit::Exit);
        }
        TaskSlot::ALL
            .into_iter()
            .find(|t| layout.task(*t).contains(p))
            .map(TaskHit::Task)
    }
}
