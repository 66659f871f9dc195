//! Display primitives trait

use core::fmt;

use crate::geometry::Rect;

/// Errors that can occur while drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Bus transfer to the panel failed
    Bus,
    /// Drawing fell entirely outside the panel
    OutOfBounds,
    /// Text contained glyphs the font cannot render
    UnsupportedGlyph,
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayError::Bus => f.write_str("display bus error"),
            DisplayError::OutOfBounds => f.write_str("drawing outside the panel"),
            DisplayError::UnsupportedGlyph => f.write_str("text has glyphs the font lacks"),
        }
    }
}

impl core::error::Error for DisplayError {}

/// RGB565 color as sent to the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color(pub u16);

impl Color {
    pub const BLACK: Color = Color(0x0000);
    pub const BLUE: Color = Color(0x001F);
    pub const RED: Color = Color(0xF800);
    pub const GREEN: Color = Color(0x07E0);
    pub const CYAN: Color = Color(0x07FF);
    pub const MAGENTA: Color = Color(0xF81F);
    pub const YELLOW: Color = Color(0xFFE0);
    pub const WHITE: Color = Color(0xFFFF);

    /// Raw RGB565 value
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Split into 5/6/5 bit channels
    pub const fn channels(self) -> (u8, u8, u8) {
        (
            ((self.0 >> 11) & 0x1F) as u8,
            ((self.0 >> 5) & 0x3F) as u8,
            (self.0 & 0x1F) as u8,
        )
    }
}

/// The two bitmap fonts used by the shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Font {
    /// 10 pixel font for dense text (lists, tables)
    Small,
    /// 20 pixel font for button labels and headings
    #[default]
    Large,
}

impl Font {
    /// Glyph cell `(width, height)` in pixels
    pub const fn cell(self) -> (u16, u16) {
        match self {
            Font::Small => (6, 10),
            Font::Large => (10, 20),
        }
    }
}

/// Trait for the pixel display
///
/// Implementations wrap a concrete panel driver. Coordinates are clipped by
/// the implementation; callers may draw partly off-screen.
pub trait Display {
    /// Panel size `(width, height)` in pixels
    fn size(&self) -> (u16, u16);

    /// Fill the whole panel
    fn clear(&mut self, color: Color) -> Result<(), DisplayError>;

    /// Fill a rectangle
    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), DisplayError>;

    /// Draw a one pixel rectangle outline
    fn draw_rect(&mut self, rect: Rect, color: Color) -> Result<(), DisplayError>;

    /// Draw text with its top-left corner at `(x, y)`
    ///
    /// The glyph background is painted with `bg`.
    fn draw_text(
        &mut self,
        font: Font,
        text: &str,
        x: u16,
        y: u16,
        fg: Color,
        bg: Color,
    ) -> Result<(), DisplayError>;

    /// Draw a horizontal line `len` pixels long
    fn draw_hline(&mut self, x: u16, y: u16, len: u16, color: Color) -> Result<(), DisplayError>;

    /// Draw a vertical line `len` pixels long
    fn draw_vline(&mut self, x: u16, y: u16, len: u16, color: Color) -> Result<(), DisplayError> {
        for dy in 0..len {
            self.set_pixel(x, y.saturating_add(dy), color)?;
        }
        Ok(())
    }

    /// Set a single pixel
    fn set_pixel(&mut self, x: u16, y: u16, color: Color) -> Result<(), DisplayError>;
}
