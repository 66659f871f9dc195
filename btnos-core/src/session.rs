//! Per-boot session state shared between the shell and apps

use crate::button::ScreenKind;
use crate::traits::Color;

/// Doodle palette in cycling order, with the short names shown on the button
pub const PALETTE: [(Color, &str); 8] = [
    (Color::WHITE, "WHT"),
    (Color::BLUE, "BLU"),
    (Color::RED, "RED"),
    (Color::GREEN, "GRN"),
    (Color::CYAN, "CYAN"),
    (Color::MAGENTA, "MGNT"),
    (Color::YELLOW, "YLW"),
    (Color::BLACK, "BLK"),
];

/// Largest pen width
pub const PEN_MAX: u8 = 9;

/// What the title bar clock last showed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockMode {
    Time,
    #[default]
    Date,
}

impl ClockMode {
    pub const fn toggled(self) -> Self {
        match self {
            ClockMode::Time => ClockMode::Date,
            ClockMode::Date => ClockMode::Time,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub screen: ScreenKind,
    /// Index into [`PALETTE`]; starts on black
    pub palette: usize,
    /// Pen width in pixels, 0 until first chosen
    pub pen: u8,
    pub clock_mode: ClockMode,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            screen: ScreenKind::Home,
            palette: PALETTE.len() - 1,
            pen: 0,
            clock_mode: ClockMode::Date,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while an app screen is showing
    pub fn is_app_active(&self) -> bool {
        matches!(self.screen, ScreenKind::App(_))
    }

    pub fn color(&self) -> Color {
        PALETTE[self.palette % PALETTE.len()].0
    }

    pub fn color_name(&self) -> &'static str {
        PALETTE[self.palette % PALETTE.len()].1
    }

    /// Advance to the next palette color
    pub fn next_color(&mut self) -> Color {
        self.palette = (self.palette + 1) % PALETTE.len();
        self.color()
    }

    /// Advance the pen width, 1..=9 then back to 1
    pub fn next_pen(&mut self) -> u8 {
        self.pen = if self.pen < PEN_MAX { self.pen + 1 } else { 1 };
        self.pen
    }
}
