//! `embedded-graphics` display adapter
//!
//! Wraps any RGB565 [`DrawTarget`] (an SPI panel driver, a host framebuffer)
//! as a shell [`Display`]. Drawing that falls off the target is clipped by
//! `embedded-graphics`; only single pixels are bounds checked.
//!
//! # Fonts
//!
//! | Shell font | Mono font    |
//! |------------|--------------|
//! | Small      | `FONT_6X10`  |
//! | Large      | `FONT_10X20` |
//!
//! Text is positioned by its top-left corner and always drawn with an
//! opaque background.

use btnos_core::geometry::Rect;
use btnos_core::traits::{Color, Display, DisplayError, Font};
use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};

/// Convert a shell color to the panel's pixel type
pub fn to_rgb565(color: Color) -> Rgb565 {
    Rgb565::from(RawU16::new(color.raw()))
}

/// Mono font backing a shell font
pub const fn mono_font(font: Font) -> &'static MonoFont<'static> {
    match font {
        Font::Small => &FONT_6X10,
        Font::Large => &FONT_10X20,
    }
}

fn rectangle(x: u16, y: u16, w: u16, h: u16) -> Rectangle {
    Rectangle::new(
        Point::new(i32::from(x), i32::from(y)),
        Size::new(u32::from(w), u32::from(h)),
    )
}

fn bus<E>(_: E) -> DisplayError {
    DisplayError::Bus
}

/// Shell display over an `embedded-graphics` draw target
pub struct GraphicsDisplay<D> {
    target: D,
}

impl<D> GraphicsDisplay<D> {
    pub fn new(target: D) -> Self {
        Self { target }
    }

    pub fn inner(&self) -> &D {
        &self.target
    }

    pub fn inner_mut(&mut self) -> &mut D {
        &mut self.target
    }

    pub fn into_inner(self) -> D {
        self.target
    }
}

impl<D: DrawTarget<Color = Rgb565>> Display for GraphicsDisplay<D> {
    fn size(&self) -> (u16, u16) {
        let size = self.target.bounding_box().size;
        (
            u16::try_from(size.width).unwrap_or(u16::MAX),
            u16::try_from(size.height).unwrap_or(u16::MAX),
        )
    }

    fn clear(&mut self, color: Color) -> Result<(), DisplayError> {
        self.target.clear(to_rgb565(color)).map_err(bus)
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), DisplayError> {
        self.target
            .fill_solid(&rectangle(rect.x, rect.y, rect.w, rect.h), to_rgb565(color))
            .map_err(bus)
    }

    fn draw_rect(&mut self, rect: Rect, color: Color) -> Result<(), DisplayError> {
        rectangle(rect.x, rect.y, rect.w, rect.h)
            .into_styled(PrimitiveStyle::with_stroke(to_rgb565(color), 1))
            .draw(&mut self.target)
            .map_err(bus)
    }

    fn draw_text(
        &mut self,
        font: Font,
        text: &str,
        x: u16,
        y: u16,
        fg: Color,
        bg: Color,
    ) -> Result<(), DisplayError> {
        // The mono fonts only carry ASCII glyphs
        if !text.is_ascii() {
            return Err(DisplayError::UnsupportedGlyph);
        }
        let style = MonoTextStyleBuilder::new()
            .font(mono_font(font))
            .text_color(to_rgb565(fg))
            .background_color(to_rgb565(bg))
            .build();
        Text::with_baseline(
            text,
            Point::new(i32::from(x), i32::from(y)),
            style,
            Baseline::Top,
        )
        .draw(&mut self.target)
        .map(drop)
        .map_err(bus)
    }

    fn draw_hline(&mut self, x: u16, y: u16, len: u16, color: Color) -> Result<(), DisplayError> {
        self.target
            .fill_solid(&rectangle(x, y, len, 1), to_rgb565(color))
            .map_err(bus)
    }

    fn draw_vline(&mut self, x: u16, y: u16, len: u16, color: Color) -> Result<(), DisplayError> {
        self.target
            .fill_solid(&rectangle(x, y, 1, len), to_rgb565(color))
            .map_err(bus)
    }

    fn set_pixel(&mut self, x: u16, y: u16, color: Color) -> Result<(), DisplayError> {
        let p = Point::new(i32::from(x), i32::from(y));
        if !self.target.bounding_box().contains(p) {
            return Err(DisplayError::OutOfBounds);
        }
        Pixel(p, to_rgb565(color)).draw(&mut self.target).map_err(bus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::mock_display::MockDisplay;

    fn display() -> GraphicsDisplay<MockDisplay<Rgb565>> {
        let mut mock = MockDisplay::new();
        mock.set_allow_overdraw(true);
        GraphicsDisplay::new(mock)
    }

    #[test]
    fn test_color_conversion() {
        assert_eq!(to_rgb565(Color::RED), Rgb565::RED);
        assert_eq!(to_rgb565(Color::GREEN), Rgb565::GREEN);
        assert_eq!(to_rgb565(Color::BLUE), Rgb565::BLUE);
        assert_eq!(to_rgb565(Color::WHITE), Rgb565::WHITE);
        assert_eq!(to_rgb565(Color::BLACK), Rgb565::BLACK);
    }

    #[test]
    fn test_size_matches_target() {
        assert_eq!(display().size(), (64, 64));
    }

    #[test]
    fn test_fill_rect() {
        let mut d = display();
        d.fill_rect(Rect::new(2, 2, 3, 3), Color::GREEN).unwrap();
        let mock = d.inner();
        assert_eq!(mock.get_pixel(Point::new(2, 2)), Some(Rgb565::GREEN));
        assert_eq!(mock.get_pixel(Point::new(4, 4)), Some(Rgb565::GREEN));
        assert_eq!(mock.get_pixel(Point::new(5, 5)), None);
        assert_eq!(mock.get_pixel(Point::new(1, 2)), None);
    }

    #[test]
    fn test_outline_leaves_inside_alone() {
        let mut d = display();
        d.draw_rect(Rect::new(0, 0, 4, 4), Color::MAGENTA).unwrap();
        let mock = d.inner();
        assert_eq!(mock.get_pixel(Point::new(0, 0)), Some(Rgb565::MAGENTA));
        assert_eq!(mock.get_pixel(Point::new(3, 3)), Some(Rgb565::MAGENTA));
        assert_eq!(mock.get_pixel(Point::new(1, 1)), None);
        assert_eq!(mock.get_pixel(Point::new(2, 2)), None);
    }

    #[test]
    fn test_text_is_opaque() {
        let mut d = display();
        d.draw_text(Font::Small, "A", 0, 0, Color::WHITE, Color::BLUE)
            .unwrap();
        let mock = d.inner();
        let mut fg = 0;
        let mut bg = 0;
        for y in 0..10 {
            for x in 0..6 {
                match mock.get_pixel(Point::new(x, y)) {
                    Some(c) if c == Rgb565::WHITE => fg += 1,
                    Some(c) if c == Rgb565::BLUE => bg += 1,
                    other => panic!("unexpected pixel {:?} at ({}, {})", other, x, y),
                }
            }
        }
        assert!(fg > 0);
        assert!(bg > 0);
        assert_eq!(mock.get_pixel(Point::new(6, 0)), None);
    }

    #[test]
    fn test_non_ascii_text_rejected() {
        let mut d = display();
        assert_eq!(
            d.draw_text(Font::Large, "20°C", 0, 0, Color::WHITE, Color::BLACK),
            Err(DisplayError::UnsupportedGlyph)
        );
    }

    #[test]
    fn test_lines() {
        let mut d = display();
        d.draw_hline(1, 3, 5, Color::YELLOW).unwrap();
        d.draw_vline(10, 0, 2, Color::CYAN).unwrap();
        let mock = d.inner();
        assert_eq!(mock.get_pixel(Point::new(1, 3)), Some(Rgb565::YELLOW));
        assert_eq!(mock.get_pixel(Point::new(5, 3)), Some(Rgb565::YELLOW));
        assert_eq!(mock.get_pixel(Point::new(6, 3)), None);
        assert_eq!(mock.get_pixel(Point::new(10, 1)), Some(Rgb565::CYAN));
        assert_eq!(mock.get_pixel(Point::new(10, 2)), None);
    }

    #[test]
    fn test_pixel_bounds() {
        let mut d = display();
        d.set_pixel(63, 63, Color::RED).unwrap();
        assert_eq!(d.set_pixel(64, 0, Color::RED), Err(DisplayError::OutOfBounds));
    }
}
