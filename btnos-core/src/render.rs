//! Drawing buttons, text and the home splash
//!
//! The renderer borrows the display for the duration of one operation.
//! It is generic over `?Sized` so it can wrap either a concrete driver or a
//! `dyn Display` handed to an app.

use crate::button::{ButtonDescriptor, ButtonEdit, ButtonId, ButtonRegistry};
use crate::error::ShellError;
use crate::geometry::Rect;
use crate::traits::{Color, Display, DisplayError, Font};

/// Label offset from the top-left corner of a button
pub const LABEL_INSET: (u16, u16) = (6, 12);

/// A string placed at an absolute position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Text<'t> {
    pub text: &'t str,
    pub x: u16,
    pub y: u16,
}

impl<'t> Text<'t> {
    pub const fn at(text: &'t str, x: u16, y: u16) -> Self {
        Self { text, x, y }
    }
}

/// Font and colors for a block of [`Text`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    pub font: Font,
    pub fg: Color,
    pub bg: Color,
}

impl Default for TextStyle {
    /// Small green text on black
    fn default() -> Self {
        Self {
            font: Font::Small,
            fg: Color::GREEN,
            bg: Color::BLACK,
        }
    }
}

impl TextStyle {
    pub const fn new(font: Font, fg: Color) -> Self {
        Self {
            font,
            fg,
            bg: Color::BLACK,
        }
    }
}

/// Seven-segment digit geometry
///
/// A digit occupies `len + 2 * thick` by `2 * len + 3 * thick` pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// Segment length
    pub len: u16,
    /// Segment thickness
    pub thick: u16,
}

impl Default for Segment {
    fn default() -> Self {
        Self { len: 24, thick: 4 }
    }
}

impl Segment {
    /// Bounding box width of one digit
    pub const fn width(&self) -> u16 {
        self.len + 2 * self.thick
    }

    pub const fn height(&self) -> u16 {
        2 * self.len + 3 * self.thick
    }
}

/// Lit segments a..g per digit, bit 0 = a
const SEGMENTS: [u8; 10] = [
    0b011_1111, // 0
    0b000_0110, // 1
    0b101_1011, // 2
    0b100_1111, // 3
    0b110_0110, // 4
    0b110_1101, // 5
    0b111_1101, // 6
    0b000_0111, // 7
    0b111_1111, // 8
    0b110_1111, // 9
];

pub struct Renderer<'d, D: ?Sized> {
    display: &'d mut D,
}

impl<'d, D: Display + ?Sized> Renderer<'d, D> {
    pub fn new(display: &'d mut D) -> Self {
        Self { display }
    }

    /// Fill (optional), border, then label
    pub fn paint(&mut self, button: &ButtonDescriptor) -> Result<(), DisplayError> {
        let r = button.rect;
        if button.fill {
            self.display.fill_rect(r, button.bg)?;
        }
        self.display.draw_rect(r, button.border)?;
        let at = r.offset(LABEL_INSET.0, LABEL_INSET.1);
        self.display
            .draw_text(button.font, &button.label, at.x, at.y, button.fg, button.bg)
    }

    /// Apply `edit` to a visible button and repaint it
    ///
    /// The button is repainted even when nothing changed.
    pub fn edit(
        &mut self,
        registry: &mut ButtonRegistry,
        id: ButtonId,
        edit: &ButtonEdit,
    ) -> Result<(), ShellError> {
        let Some(button) = registry.apply_edit(id, edit) else {
            warn!("edit of hidden button {}", id);
            return Err(ShellError::NotVisible(id));
        };
        self.paint(button)?;
        debug!("edited {}", id);
        Ok(())
    }

    /// Draw each text run in the same style
    pub fn write(&mut self, lines: &[Text<'_>], style: TextStyle) -> Result<(), DisplayError> {
        for line in lines {
            self.display
                .draw_text(style.font, line.text, line.x, line.y, style.fg, style.bg)?;
        }
        Ok(())
    }

    /// Clear a rectangle to black
    pub fn clear(&mut self, rect: Rect) -> Result<(), DisplayError> {
        self.display.fill_rect(rect, Color::BLACK)
    }

    /// Product splash and frame button legend inside the work area
    pub fn splash(&mut self) -> Result<(), DisplayError> {
        self.display.draw_rect(Rect::new(8, 48, 304, 144), Color::WHITE)?;
        self.write(
            &[Text::at("BtnOS", 120, 80)],
            TextStyle::new(Font::Large, Color::GREEN),
        )?;
        self.write(
            &[Text::at("touch button shell", 88, 104), Text::at("version 5", 124, 120)],
            TextStyle::default(),
        )?;
        self.write(
            &[
                Text::at("btn_a", 30, 152),
                Text::at("btn_b", 140, 152),
                Text::at("btn_c", 260, 152),
                Text::at("shutdown", 18, 164),
                Text::at("homescreen", 120, 164),
                Text::at("rerun", 260, 164),
            ],
            TextStyle::new(Font::Small, Color::YELLOW),
        )?;
        self.write(
            &[Text::at("O", 40, 172), Text::at("O", 152, 172), Text::at("O", 272, 172)],
            TextStyle::new(Font::Large, Color::RED),
        )
    }

    /// Draw one seven-segment digit with its top-left corner at `(x, y)`
    ///
    /// Unlit segments are painted black so digits can be redrawn in place.
    pub fn draw_digit(
        &mut self,
        digit: u8,
        x: u16,
        y: u16,
        seg: Segment,
        color: Color,
    ) -> Result<(), DisplayError> {
        let lit = SEGMENTS.get(usize::from(digit)).copied().unwrap_or(0);
        let (l, t) = (seg.len, seg.thick);
        let rects = [
            Rect::new(x + t, y, l, t),                 // a: top
            Rect::new(x + l + t, y + t, t, l),         // b: upper right
            Rect::new(x + l + t, y + 2 * t + l, t, l), // c: lower right
            Rect::new(x + t, y + 2 * l + 2 * t, l, t), // d: bottom
            Rect::new(x, y + 2 * t + l, t, l),         // e: lower left
            Rect::new(x, y + t, t, l),                 // f: upper left
            Rect::new(x + t, y + t + l, l, t),         // g: middle
        ];
        for (i, r) in rects.into_iter().enumerate() {
            let c = if lit & (1 << i) != 0 { color } else { Color::BLACK };
            self.display.fill_rect(r, c)?;
        }
        Ok(())
    }

    /// Draw a string of digits; any other character is drawn as a colon
    ///
    /// Returns the x coordinate just past the last cell.
    pub fn draw_digits(
        &mut self,
        text: &str,
        x: u16,
        y: u16,
        seg: Segment,
        color: Color,
    ) -> Result<u16, DisplayError> {
        let pitch = seg.width() + seg.thick;
        let mut cx = x;
        for ch in text.chars() {
            match ch.to_digit(10) {
                Some(d) => self.draw_digit(d as u8, cx, y, seg, color)?,
                None => {
                    let dot = seg.thick;
                    let mid = cx + seg.width() / 2 - dot / 2;
                    let upper = y + seg.len / 2;
                    let lower = upper + seg.len + 2 * seg.thick;
                    self.display.fill_rect(Rect::new(mid, upper, dot, dot), color)?;
                    self.display.fill_rect(Rect::new(mid, lower, dot, dot), color)?;
                }
            }
            cx = cx.saturating_add(pitch);
        }
        Ok(cx)
    }
}
