//! Canonical button storage and the live screen
//!
//! Every button has exactly one descriptor here for the life of the device.
//! A [`Screen`] is just the list of ids currently shown; switching screens
//! never copies or drops descriptors, so labels set by an app survive a
//! round trip through the home screen.

use heapless::Vec;

use super::descriptor::{ButtonDescriptor, ButtonEdit};
use super::id::{AppSlot, ButtonId, TaskSlot};
use crate::config::{Layout, Registration};
use crate::geometry::{Point, Rect};
use crate::traits::Color;

/// Most buttons on one screen (home: 3 frame + title + work + 4 apps)
pub const MAX_VISIBLE: usize = 12;

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScreenKind {
    Home,
    App(AppSlot),
}

/// The visible buttons in paint order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    kind: ScreenKind,
    members: Vec<ButtonId, MAX_VISIBLE>,
}

impl Screen {
    fn home() -> Self {
        let mut members = Vec::new();
        // Paint order: frame zones, work, title, then app buttons
        for id in [ButtonId::A, ButtonId::B, ButtonId::C, ButtonId::Work, ButtonId::Title] {
            let _ = members.push(id);
        }
        for slot in AppSlot::ALL {
            let _ = members.push(ButtonId::App(slot));
        }
        Self {
            kind: ScreenKind::Home,
            members,
        }
    }

    pub fn kind(&self) -> ScreenKind {
        self.kind
    }

    pub fn contains(&self, id: ButtonId) -> bool {
        self.members.contains(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = ButtonId> + '_ {
        self.members.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Owner of every [`ButtonDescriptor`]
#[derive(Debug, Clone)]
pub struct ButtonRegistry {
    layout: Layout,
    /// A, B, C, Title, Work
    frame: [ButtonDescriptor; 5],
    apps: [ButtonDescriptor; 4],
    tasks: [[ButtonDescriptor; 4]; 4],
    screen: Screen,
}

impl ButtonRegistry {
    /// Default labels `App1`..`App4` and `Btn5`..`Btn8`, home screen visible
    pub fn new(layout: Layout) -> Self {
        let apps = AppSlot::ALL.map(|slot| {
            let mut text = heapless::String::<8>::new();
            let _ = core::fmt::write(&mut text, format_args!("App{}", slot.number()));
            ButtonDescriptor::new(ButtonId::App(slot), layout.app(slot), &text)
        });
        let tasks = AppSlot::ALL.map(|slot| {
            TaskSlot::ALL.map(|task| {
                let mut text = heapless::String::<8>::new();
                let _ = core::fmt::write(&mut text, format_args!("Btn{}", task.number()));
                ButtonDescriptor::new(ButtonId::Task(slot, task), layout.task(task), &text)
            })
        });
        Self {
            frame: frame_buttons(&layout, ""),
            layout,
            apps,
            tasks,
            screen: Screen::home(),
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Canonical descriptor, whether or not it is visible
    pub fn descriptor(&self, id: ButtonId) -> &ButtonDescriptor {
        match id {
            ButtonId::A => &self.frame[0],
            ButtonId::B => &self.frame[1],
            ButtonId::C => &self.frame[2],
            ButtonId::Title => &self.frame[3],
            ButtonId::Work => &self.frame[4],
            ButtonId::App(slot) => &self.apps[slot.index()],
            ButtonId::Task(slot, task) => &self.tasks[slot.index()][task.index()],
        }
    }

    /// Mutable canonical descriptor
    pub fn define(&mut self, id: ButtonId) -> &mut ButtonDescriptor {
        match id {
            ButtonId::A => &mut self.frame[0],
            ButtonId::B => &mut self.frame[1],
            ButtonId::C => &mut self.frame[2],
            ButtonId::Title => &mut self.frame[3],
            ButtonId::Work => &mut self.frame[4],
            ButtonId::App(slot) => &mut self.apps[slot.index()],
            ButtonId::Task(slot, task) => &mut self.tasks[slot.index()][task.index()],
        }
    }

    /// Descriptor if the button is on the live screen
    pub fn visible(&self, id: ButtonId) -> Option<&ButtonDescriptor> {
        self.screen.contains(id).then(|| self.descriptor(id))
    }

    /// Apply an edit to a visible button
    ///
    /// Returns `None` if the button is not on screen.
    pub fn apply_edit(&mut self, id: ButtonId, edit: &ButtonEdit) -> Option<&ButtonDescriptor> {
        if !self.screen.contains(id) {
            return None;
        }
        let button = self.define(id);
        if button.apply(edit) {
            trace!("edit {}", id);
        }
        Some(&*button)
    }

    /// Rebuild A/B/C, the title bar and the work area from defaults
    pub fn define_frame(&mut self, title: &str) {
        self.frame = frame_buttons(&self.layout, title);
    }

    /// Show the home screen
    pub fn show_home(&mut self) {
        self.screen = Screen::home();
    }

    /// Show an app screen
    ///
    /// Keeps the app's own button, the work area and the frame buttons in
    /// their current order and appends the app's four task buttons.
    pub fn show_app(&mut self, slot: AppSlot) {
        let keep = |id: &ButtonId| {
            id.is_frame() || *id == ButtonId::Work || *id == ButtonId::App(slot)
        };
        self.screen.members.retain(keep);
        for id in [ButtonId::A, ButtonId::B, ButtonId::C, ButtonId::Work, ButtonId::App(slot)] {
            if !self.screen.members.contains(&id) {
                let _ = self.screen.members.push(id);
            }
        }
        for task in TaskSlot::ALL {
            let _ = self.screen.members.push(ButtonId::Task(slot, task));
        }
        self.screen.kind = ScreenKind::App(slot);
    }

    /// Visible descriptors in paint order
    pub fn iter_visible(&self) -> impl Iterator<Item = &ButtonDescriptor> + '_ {
        self.screen.ids().map(move |id| self.descriptor(id))
    }

    /// Touch zones for the live screen
    pub fn zones(&self) -> Vec<(ButtonId, Rect), MAX_VISIBLE> {
        self.iter_visible().map(|b| (b.id, b.rect)).collect()
    }

    /// First visible button containing `point`
    pub fn hit(&self, point: Point) -> Option<ButtonId> {
        self.iter_visible().find(|b| b.rect.contains(point)).map(|b| b.id)
    }

    /// Apply a validated registration (labels only, nothing is painted)
    pub fn install(&mut self, registration: &Registration) {
        let slot = registration.slot;
        self.apps[slot.index()].label = registration.label.clone();
        for (task, text) in TaskSlot::ALL.iter().zip(&registration.tasks) {
            if let Some(text) = text {
                self.tasks[slot.index()][task.index()].label = text.clone();
            }
        }
    }
}

fn frame_buttons(layout: &Layout, title: &str) -> [ButtonDescriptor; 5] {
    [
        ButtonDescriptor::hidden(ButtonId::A, layout.frame[0]),
        ButtonDescriptor::hidden(ButtonId::B, layout.frame[1]),
        ButtonDescriptor::hidden(ButtonId::C, layout.frame[2]),
        ButtonDescriptor::panel(ButtonId::Title, layout.title, title, Color::YELLOW),
        ButtonDescriptor::panel(ButtonId::Work, layout.work, "", Color::WHITE),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppInstall;

    fn slot(n: u8) -> AppSlot {
        AppSlot::new(n).unwrap()
    }

    #[test]
    fn test_home_screen_members() {
        let reg = ButtonRegistry::new(Layout::CORE2);
        let screen = reg.screen();
        assert_eq!(screen.kind(), ScreenKind::Home);
        assert_eq!(screen.len(), 9);
        for id in [ButtonId::A, ButtonId::B, ButtonId::C, ButtonId::Title, ButtonId::Work] {
            assert!(screen.contains(id));
        }
        for s in AppSlot::ALL {
            assert!(screen.contains(ButtonId::App(s)));
        }
    }

    #[test]
    fn test_app_screen_members() {
        let mut reg = ButtonRegistry::new(Layout::CORE2);
        reg.show_app(slot(2));
        let screen = reg.screen();
        assert_eq!(screen.kind(), ScreenKind::App(slot(2)));
        assert_eq!(screen.len(), 9);
        assert!(!screen.contains(ButtonId::Title));
        assert!(!screen.contains(ButtonId::App(slot(1))));
        assert!(screen.contains(ButtonId::App(slot(2))));
        for t in TaskSlot::ALL {
            assert!(screen.contains(ButtonId::Task(slot(2), t)));
            assert!(!screen.contains(ButtonId::Task(slot(1), t)));
        }
    }

    #[test]
    fn test_app_screen_paint_order() {
        let mut reg = ButtonRegistry::new(Layout::CORE2);
        reg.show_app(slot(1));
        let ids: std::vec::Vec<_> = reg.screen().ids().collect();
        assert_eq!(&ids[..5], &[
            ButtonId::A,
            ButtonId::B,
            ButtonId::C,
            ButtonId::Work,
            ButtonId::App(slot(1)),
        ]);
        assert_eq!(ids[5], ButtonId::Task(slot(1), TaskSlot::ALL[0]));
    }

    #[test]
    fn test_labels_survive_screen_changes() {
        let mut reg = ButtonRegistry::new(Layout::CORE2);
        reg.show_app(slot(3));
        reg.define(ButtonId::Task(slot(3), TaskSlot::ALL[0])).label = crate::button::label("CLR");
        reg.show_home();
        reg.show_app(slot(3));
        assert_eq!(
            reg.descriptor(ButtonId::Task(slot(3), TaskSlot::ALL[0])).label.as_str(),
            "CLR"
        );
    }

    #[test]
    fn test_default_labels() {
        let reg = ButtonRegistry::new(Layout::CORE2);
        assert_eq!(reg.descriptor(ButtonId::App(slot(4))).label.as_str(), "App4");
        assert_eq!(
            reg.descriptor(ButtonId::Task(slot(1), TaskSlot::ALL[3])).label.as_str(),
            "Btn8"
        );
        assert_eq!(reg.descriptor(ButtonId::Work).fg, Color::WHITE);
        assert_eq!(reg.descriptor(ButtonId::Title).fg, Color::YELLOW);
    }

    #[test]
    fn test_edit_requires_visibility() {
        let mut reg = ButtonRegistry::new(Layout::CORE2);
        let hidden = ButtonId::Task(slot(1), TaskSlot::ALL[0]);
        assert!(reg.apply_edit(hidden, &ButtonEdit::new().label("X")).is_none());
        assert_eq!(reg.descriptor(hidden).label.as_str(), "Btn5");
    }

    #[test]
    fn test_install_labels() {
        let mut reg = ButtonRegistry::new(Layout::CORE2);
        let registration = AppInstall::new(1, "WiFi")
            .task(5, "Wifi")
            .task(8, "Wipe")
            .validate()
            .unwrap();
        reg.install(&registration);
        assert_eq!(reg.descriptor(ButtonId::App(slot(1))).label.as_str(), "WiFi");
        let task = |n| ButtonId::Task(slot(1), TaskSlot::new(n).unwrap());
        assert_eq!(reg.descriptor(task(5)).label.as_str(), "Wifi");
        assert_eq!(reg.descriptor(task(6)).label.as_str(), "Btn6");
        assert_eq!(reg.descriptor(task(8)).label.as_str(), "Wipe");
    }

    #[test]
    fn test_hit_uses_visible_zones() {
        let mut reg = ButtonRegistry::new(Layout::CORE2);
        let top = Point::new(100, 10);
        assert_eq!(reg.hit(top), Some(ButtonId::Title));
        reg.show_app(slot(1));
        assert_eq!(reg.hit(top), Some(ButtonId::Task(slot(1), TaskSlot::ALL[1])));
        assert_eq!(reg.zones().len(), 9);
    }
}
