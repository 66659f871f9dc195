//! Display drivers

pub mod graphics;

pub use graphics::{mono_font, to_rgb565, GraphicsDisplay};
