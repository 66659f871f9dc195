//! App plugin interface
//!
//! An app is anything implementing [`AppHandler`]. While its screen is in
//! the task loop the dispatcher calls it with an [`AppContext`] that borrows
//! the display, the registry and the peripherals for the duration of the
//! call.

use crate::button::{AppSlot, ButtonDescriptor, ButtonEdit, ButtonId, ButtonRegistry, TaskSlot};
use crate::config::{DeviceParams, Layout};
use crate::error::ShellError;
use crate::geometry::Point;
use crate::render::{Renderer, Text, TextStyle};
use crate::session::Session;
use crate::traits::{Display, Peripherals, SystemClock};

/// Everything an app may touch during one callback
pub struct AppContext<'a> {
    pub slot: AppSlot,
    pub display: &'a mut dyn Display,
    pub registry: &'a mut ButtonRegistry,
    pub session: &'a mut Session,
    pub params: &'a mut DeviceParams,
    pub clock: &'a mut dyn SystemClock,
    pub peripherals: &'a mut dyn Peripherals,
}

impl<'a> AppContext<'a> {
    pub fn layout(&self) -> Layout {
        *self.registry.layout()
    }

    /// Id of one of this app's task buttons
    pub fn task_button(&self, task: TaskSlot) -> ButtonId {
        ButtonId::Task(self.slot, task)
    }

    pub fn button(&self, id: ButtonId) -> &ButtonDescriptor {
        self.registry.descriptor(id)
    }

    pub fn renderer(&mut self) -> Renderer<'_, dyn Display + 'a> {
        Renderer::new(&mut *self.display)
    }

    /// Edit and repaint a visible button
    pub fn edit(&mut self, id: ButtonId, edit: ButtonEdit) -> Result<(), ShellError> {
        Renderer::new(&mut *self.display).edit(self.registry, id, &edit)
    }

    /// Edit and repaint one of this app's task buttons
    pub fn edit_task(&mut self, task: TaskSlot, edit: ButtonEdit) -> Result<(), ShellError> {
        self.edit(ButtonId::Task(self.slot, task), edit)
    }

    /// Repaint the work area, erasing whatever the app drew there
    pub fn wipe(&mut self) -> Result<(), ShellError> {
        self.edit(ButtonId::Work, ButtonEdit::new())
    }

    pub fn write(&mut self, lines: &[Text<'_>], style: TextStyle) -> Result<(), ShellError> {
        self.renderer().write(lines, style)?;
        Ok(())
    }
}

/// Callbacks for one installed app
///
/// Both methods default to logging a warning, so an app only implements
/// what it uses.
pub trait AppHandler {
    /// Touch anywhere in the work area's band
    fn on_area_touch(&mut self, cx: &mut AppContext<'_>, point: Point) -> Result<(), ShellError> {
        warn!("app {} ignores touch at {}", cx.slot.number(), point);
        Ok(())
    }

    /// Touch on task button 5..=8
    fn on_task(&mut self, cx: &mut AppContext<'_>, task: TaskSlot) -> Result<(), ShellError> {
        warn!("app {} has no task {}", cx.slot.number(), task.number());
        Ok(())
    }
}

/// Stand-in for empty app slots
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopApp;

impl AppHandler for NoopApp {}
