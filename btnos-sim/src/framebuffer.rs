//! In-memory RGB565 panel
//!
//! Stands in for the Core2's ILI9342C. The shell draws into it through
//! [`GraphicsDisplay`](btnos_drivers::display::GraphicsDisplay); the result
//! can be written out as a binary PPM.

use std::convert::Infallible;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

pub const WIDTH: usize = 320;
pub const HEIGHT: usize = 240;

pub struct Framebuffer {
    pixels: Vec<Rgb565>,
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Framebuffer {
    pub fn new() -> Self {
        Self {
            pixels: vec![Rgb565::BLACK; WIDTH * HEIGHT],
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb565> {
        if x < WIDTH && y < HEIGHT {
            Some(self.pixels[y * WIDTH + x])
        } else {
            None
        }
    }

    #[inline]
    fn set_pixel(&mut self, x: i32, y: i32, color: Rgb565) {
        if x >= 0 && (x as usize) < WIDTH && y >= 0 && (y as usize) < HEIGHT {
            self.pixels[y as usize * WIDTH + x as usize] = color;
        }
    }

    /// Write the panel as a binary PPM (P6), widened to 8 bits per channel
    pub fn write_ppm<W: Write>(&self, mut out: W) -> io::Result<()> {
        write!(out, "P6\n{} {}\n255\n", WIDTH, HEIGHT)?;
        for p in &self.pixels {
            // Replicate the high bits into the low ones so white stays 255
            let r = (p.r() << 3) | (p.r() >> 2);
            let g = (p.g() << 2) | (p.g() >> 4);
            let b = (p.b() << 3) | (p.b() >> 2);
            out.write_all(&[r, g, b])?;
        }
        out.flush()
    }

    pub fn save_ppm(&self, path: &Path) -> Result<()> {
        let file =
            File::create(path).with_context(|| format!("creating {}", path.display()))?;
        self.write_ppm(BufWriter::new(file))
            .with_context(|| format!("writing {}", path.display()))
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl DrawTarget for Framebuffer {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point.x, point.y, color);
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        if area.size == Size::zero() {
            return Ok(());
        }
        let x0 = area.top_left.x as usize;
        let w = area.size.width as usize;
        for y in area.rows() {
            let row = y as usize * WIDTH;
            self.pixels[row + x0..row + x0 + w].fill(color);
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.pixels.fill(color);
        Ok(())
    }
}
