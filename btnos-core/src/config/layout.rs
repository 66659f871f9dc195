//! Fixed screen layout
//!
//! ```text
//!   0 +-------+-------+-------+-------+   task buttons 5..8 (app screen)
//!     |         title bar             |   title (home screen)
//!  40 +-------------------------------+
//!     |                               |
//!     |          work area            |
//!     |                               |
//! 200 +-------+-------+-------+-------+
//!     | app 1 | app 2 | app 3 | app 4 |
//! 240 +=======+=======+=======+=======+   bottom of the display
//!     |    A     |    B     |    C    |   frame buttons (touch only)
//! 280 +----------+----------+---------+
//! ```

use crate::button::{AppSlot, ButtonId, TaskSlot};
use crate::geometry::Rect;

pub const SCREEN_WIDTH: u16 = 320;
pub const SCREEN_HEIGHT: u16 = 240;

/// Rectangles for every button zone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Layout {
    pub frame: [Rect; 3],
    pub title: Rect,
    pub work: Rect,
    pub apps: [Rect; 4],
    pub tasks: [Rect; 4],
}

impl Layout {
    /// M5Stack Core2: 320x240 panel with the touch area extended to y = 280
    pub const CORE2: Layout = Layout {
        frame: [
            Rect::new(0, 240, 107, 40),
            Rect::new(107, 240, 107, 40),
            Rect::new(214, 240, 106, 40),
        ],
        title: Rect::new(0, 0, 320, 40),
        work: Rect::new(0, 40, 320, 160),
        apps: [
            Rect::new(0, 200, 80, 40),
            Rect::new(80, 200, 80, 40),
            Rect::new(160, 200, 80, 40),
            Rect::new(240, 200, 80, 40),
        ],
        tasks: [
            Rect::new(0, 0, 80, 40),
            Rect::new(80, 0, 80, 40),
            Rect::new(160, 0, 80, 40),
            Rect::new(240, 0, 80, 40),
        ],
    };

    pub const fn app(&self, slot: AppSlot) -> Rect {
        self.apps[slot.index()]
    }

    pub const fn task(&self, task: TaskSlot) -> Rect {
        self.tasks[task.index()]
    }

    /// Zone for any button
    pub const fn rect(&self, id: ButtonId) -> Rect {
        match id {
            ButtonId::A => self.frame[0],
            ButtonId::B => self.frame[1],
            ButtonId::C => self.frame[2],
            ButtonId::Title => self.title,
            ButtonId::Work => self.work,
            ButtonId::App(slot) => self.app(slot),
            ButtonId::Task(_, task) => self.task(task),
        }
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::CORE2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    #[test]
    fn test_core2_zones_tile_the_panel() {
        let layout = Layout::CORE2;
        for y in (0..280).step_by(7) {
            for x in (0..320).step_by(5) {
                let p = Point::new(x, y);
                let hits = layout.frame.iter().filter(|r| r.contains(p)).count()
                    + layout.apps.iter().filter(|r| r.contains(p)).count()
                    + usize::from(layout.work.contains(p))
                    + usize::from(layout.title.contains(p));
                assert_eq!(hits, 1, "point {} hit {} zones", p, hits);
            }
        }
    }

    #[test]
    fn test_task_row_overlays_title() {
        let layout = Layout::CORE2;
        for r in layout.tasks {
            assert_eq!(r.y, layout.title.y);
            assert_eq!(r.h, layout.title.h);
        }
    }

    #[test]
    fn test_rect_lookup() {
        let layout = Layout::CORE2;
        let slot = AppSlot::ALL[2];
        assert_eq!(layout.rect(ButtonId::App(slot)), Rect::new(160, 200, 80, 40));
        assert_eq!(
            layout.rect(ButtonId::Task(slot, TaskSlot::ALL[3])),
            Rect::new(240, 0, 80, 40)
        );
        assert_eq!(layout.rect(ButtonId::C), Rect::new(214, 240, 106, 40));
    }
}
