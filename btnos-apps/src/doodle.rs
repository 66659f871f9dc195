//! Doodle pad
//!
//! Paints a `pen x pen` square wherever the work area is touched. Button 5
//! cycles the palette and takes on the current color, button 6 cycles the
//! pen width and draws one yellow line per pixel of width, button 8 wipes.
//! Color and pen live in the shell session so they survive leaving the app.

use core::fmt::Write;

use btnos_core::app::{AppContext, AppHandler};
use btnos_core::button::{ButtonEdit, TaskSlot};
use btnos_core::config::AppInstall;
use btnos_core::error::ShellError;
use btnos_core::geometry::{Point, Rect};
use btnos_core::traits::{Color, Font};
use heapless::String;

#[derive(Debug, Default)]
pub struct DoodleApp;

impl DoodleApp {
    pub fn new() -> Self {
        Self
    }

    pub fn registration(slot: u8) -> AppInstall {
        AppInstall::new(slot, "DoDl")
            .task(5, "CLR")
            .task(6, "Pen")
            .task(7, "TBD")
            .task(8, "Wipe")
    }

    fn next_color(&mut self, cx: &mut AppContext<'_>, task: TaskSlot) -> Result<(), ShellError> {
        let bg = cx.session.next_color();
        let name = cx.session.color_name();
        let fg = if bg == Color::BLACK { Color::WHITE } else { Color::BLACK };
        debug!("pen color {}", name);
        cx.edit_task(task, ButtonEdit::new().label(name).fg(fg).bg(bg))
    }

    fn next_pen(&mut self, cx: &mut AppContext<'_>, task: TaskSlot) -> Result<(), ShellError> {
        let pen = cx.session.next_pen();
        let mut text: String<8> = String::new();
        let _ = write!(text, "Pen # {}", pen);
        cx.edit_task(task, ButtonEdit::new().label(&text).font(Font::Small))?;

        let r = cx.button(cx.task_button(task)).rect;
        let x = r.x + r.w / 4;
        for i in 0..u16::from(pen) {
            cx.display.draw_hline(x, r.y + 24 + i, r.w / 2, Color::YELLOW)?;
        }
        Ok(())
    }
}

impl AppHandler for DoodleApp {
    fn on_area_touch(&mut self, cx: &mut AppContext<'_>, point: Point) -> Result<(), ShellError> {
        let pen = u16::from(cx.session.pen);
        if pen == 0 {
            return Ok(());
        }
        let color = cx.session.color();
        cx.display
            .fill_rect(Rect::new(point.x, point.y, pen, pen), color)?;
        Ok(())
    }

    fn on_task(&mut self, cx: &mut AppContext<'_>, task: TaskSlot) -> Result<(), ShellError> {
        match task.number() {
            5 => self.next_color(cx, task),
            6 => self.next_pen(cx, task),
            8 => cx.wipe(),
            _ => {
                debug!("doodle task {} unused", task.number());
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rig::Rig;
    use btnos_core::config::Layout;
    use btnos_core::testing::Op;

    fn task(n: u8) -> TaskSlot {
        TaskSlot::new(n).unwrap()
    }

    #[test]
    fn test_palette_wraps_to_white() {
        let mut rig = Rig::new(3);
        DoodleApp.on_task(&mut rig.cx(), task(5)).unwrap();
        assert_eq!(
            rig.display.ops.last(),
            Some(&Op::text("WHT", 6, 12, Color::BLACK, Color::WHITE))
        );
        assert_eq!(rig.session.color(), Color::WHITE);
    }

    #[test]
    fn test_black_gets_white_text() {
        let mut rig = Rig::new(3);
        for _ in 0..8 {
            DoodleApp.on_task(&mut rig.cx(), task(5)).unwrap();
        }
        assert_eq!(rig.session.color_name(), "BLK");
        assert_eq!(
            rig.display.ops.last(),
            Some(&Op::text("BLK", 6, 12, Color::WHITE, Color::BLACK))
        );
    }

    #[test]
    fn test_no_paint_before_pen_chosen() {
        let mut rig = Rig::new(3);
        DoodleApp.on_area_touch(&mut rig.cx(), Point::new(50, 60)).unwrap();
        assert!(rig.display.ops.is_empty());
    }

    #[test]
    fn test_pen_lines_and_square() {
        let mut rig = Rig::new(3);
        DoodleApp.on_task(&mut rig.cx(), task(6)).unwrap();
        DoodleApp.on_task(&mut rig.cx(), task(6)).unwrap();
        DoodleApp.on_task(&mut rig.cx(), task(6)).unwrap();
        assert_eq!(rig.session.pen, 3);

        let r = Layout::CORE2.tasks[1];
        let lines: std::vec::Vec<_> = rig
            .display
            .ops
            .iter()
            .rev()
            .take_while(|op| matches!(op, Op::HLine { .. }))
            .cloned()
            .collect();
        assert_eq!(lines.len(), 3);
        assert!(lines.contains(&Op::HLine {
            x: r.x + 20,
            y: r.y + 26,
            len: 40,
            color: Color::YELLOW,
        }));
        assert!(rig.display.ops.iter().any(|op| matches!(
            op,
            Op::Text { font: Font::Small, text, .. } if text == "Pen # 3"
        )));

        rig.display.ops.clear();
        DoodleApp.on_area_touch(&mut rig.cx(), Point::new(50, 60)).unwrap();
        assert_eq!(
            rig.display.ops,
            [Op::Fill(Rect::new(50, 60, 3, 3), Color::BLACK)]
        );
    }

    #[test]
    fn test_pen_wraps() {
        let mut rig = Rig::new(3);
        rig.session.pen = 9;
        DoodleApp.on_task(&mut rig.cx(), task(6)).unwrap();
        assert_eq!(rig.session.pen, 1);
    }

    #[test]
    fn test_unused_task_draws_nothing() {
        let mut rig = Rig::new(3);
        DoodleApp.on_task(&mut rig.cx(), task(7)).unwrap();
        assert!(rig.display.ops.is_empty());
    }

    #[test]
    fn test_wipe_repaints_work_area() {
        let mut rig = Rig::new(3);
        DoodleApp.on_task(&mut rig.cx(), task(8)).unwrap();
        assert_eq!(rig.display.ops[0], Op::Fill(Layout::CORE2.work, Color::BLACK));
    }
}
