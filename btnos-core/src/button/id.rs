//! Button identifiers

use core::fmt;

/// Home screen app slot, numbered 1..=4
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AppSlot(u8);

impl AppSlot {
    pub const ALL: [AppSlot; 4] = [AppSlot(1), AppSlot(2), AppSlot(3), AppSlot(4)];

    pub const fn new(number: u8) -> Option<Self> {
        if number >= 1 && number <= 4 {
            Some(Self(number))
        } else {
            None
        }
    }

    /// The user-facing number, 1..=4
    pub const fn number(self) -> u8 {
        self.0
    }

    /// Zero-based table index
    pub const fn index(self) -> usize {
        (self.0 - 1) as usize
    }
}

/// App screen task slot, numbered 5..=8
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskSlot(u8);

impl TaskSlot {
    pub const ALL: [TaskSlot; 4] = [TaskSlot(5), TaskSlot(6), TaskSlot(7), TaskSlot(8)];

    pub const fn new(number: u8) -> Option<Self> {
        if number >= 5 && number <= 8 {
            Some(Self(number))
        } else {
            None
        }
    }

    pub const fn number(self) -> u8 {
        self.0
    }

    pub const fn index(self) -> usize {
        (self.0 - 5) as usize
    }
}

/// Every button the shell knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonId {
    /// Left frame button (power)
    A,
    /// Middle frame button (home)
    B,
    /// Right frame button (reset)
    C,
    /// Title bar across the top of the home screen
    Title,
    /// Work area in the middle of the display
    Work,
    /// Home screen app button
    App(AppSlot),
    /// Task button belonging to an app
    Task(AppSlot, TaskSlot),
}

impl ButtonId {
    pub const FRAME: [ButtonId; 3] = [ButtonId::A, ButtonId::B, ButtonId::C];

    /// A, B or C
    pub const fn is_frame(self) -> bool {
        matches!(self, ButtonId::A | ButtonId::B | ButtonId::C)
    }

    /// Short name used in logs, `btn_a` .. `btn_8`
    pub const fn name(self) -> &'static str {
        match self {
            ButtonId::A => "btn_a",
            ButtonId::B => "btn_b",
            ButtonId::C => "btn_c",
            ButtonId::Title => "btn_t",
            ButtonId::Work => "btn_w",
            ButtonId::App(slot) => match slot.0 {
                1 => "btn_1",
                2 => "btn_2",
                3 => "btn_3",
                _ => "btn_4",
            },
            ButtonId::Task(_, task) => match task.0 {
                5 => "btn_5",
                6 => "btn_6",
                7 => "btn_7",
                _ => "btn_8",
            },
        }
    }
}

impl fmt::Display for ButtonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_ranges() {
        assert!(AppSlot::new(0).is_none());
        assert_eq!(AppSlot::new(1).map(AppSlot::index), Some(0));
        assert_eq!(AppSlot::new(4).map(AppSlot::index), Some(3));
        assert!(AppSlot::new(5).is_none());

        assert!(TaskSlot::new(4).is_none());
        assert_eq!(TaskSlot::new(5).map(TaskSlot::index), Some(0));
        assert_eq!(TaskSlot::new(8).map(TaskSlot::index), Some(3));
        assert!(TaskSlot::new(9).is_none());
    }

    #[test]
    fn test_names() {
        let slot = AppSlot::ALL[1];
        assert_eq!(ButtonId::App(slot).name(), "btn_2");
        assert_eq!(ButtonId::Task(slot, TaskSlot::ALL[2]).name(), "btn_7");
        assert_eq!(ButtonId::Title.name(), "btn_t");
        assert!(ButtonId::B.is_frame());
        assert!(!ButtonId::Work.is_frame());
    }
}
