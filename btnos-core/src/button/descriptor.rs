//! Button appearance and partial edits

use heapless::String;

use super::id::ButtonId;
use crate::geometry::Rect;
use crate::traits::{Color, Font};

/// Maximum label length in bytes, enough for the title bar date
pub const LABEL_LEN: usize = 24;

pub type Label = String<LABEL_LEN>;

/// Build a label, truncating at [`LABEL_LEN`] bytes on a char boundary
pub fn label(text: &str) -> Label {
    let mut out = Label::new();
    for ch in text.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}

/// Everything needed to paint one button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonDescriptor {
    pub id: ButtonId,
    pub rect: Rect,
    pub label: Label,
    pub border: Color,
    pub fg: Color,
    pub bg: Color,
    /// Fill the rectangle with `bg` before drawing the border
    pub fill: bool,
    pub font: Font,
}

impl ButtonDescriptor {
    /// App and task button defaults: yellow on black with a magenta border
    pub fn new(id: ButtonId, rect: Rect, text: &str) -> Self {
        Self {
            id,
            rect,
            label: label(text),
            border: Color::MAGENTA,
            fg: Color::YELLOW,
            bg: Color::BLACK,
            fill: true,
            font: Font::Large,
        }
    }

    /// Frame buttons sit below the panel and are never drawn
    pub fn hidden(id: ButtonId, rect: Rect) -> Self {
        Self {
            id,
            rect,
            label: Label::new(),
            border: Color::BLACK,
            fg: Color::BLACK,
            bg: Color::BLACK,
            fill: false,
            font: Font::Large,
        }
    }

    /// Borderless panel, used for the title bar and work area
    pub fn panel(id: ButtonId, rect: Rect, text: &str, fg: Color) -> Self {
        Self {
            id,
            rect,
            label: label(text),
            border: Color::BLACK,
            fg,
            bg: Color::BLACK,
            fill: true,
            font: Font::Large,
        }
    }

    /// Apply the fields present in `edit`
    ///
    /// Returns true if any field actually changed.
    pub fn apply(&mut self, edit: &ButtonEdit) -> bool {
        let mut changed = false;
        if let Some(text) = &edit.label {
            changed |= assign(&mut self.label, text.clone());
        }
        if let Some(c) = edit.border {
            changed |= assign(&mut self.border, c);
        }
        if let Some(c) = edit.fg {
            changed |= assign(&mut self.fg, c);
        }
        if let Some(c) = edit.bg {
            changed |= assign(&mut self.bg, c);
        }
        if let Some(fill) = edit.fill {
            changed |= assign(&mut self.fill, fill);
        }
        if let Some(font) = edit.font {
            changed |= assign(&mut self.font, font);
        }
        changed
    }
}

fn assign<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

/// A partial update to a [`ButtonDescriptor`]
///
/// Unset fields are left alone. An empty edit still forces a repaint when
/// passed through the renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ButtonEdit {
    pub label: Option<Label>,
    pub border: Option<Color>,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub fill: Option<bool>,
    pub font: Option<Font>,
}

impl ButtonEdit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(mut self, text: &str) -> Self {
        self.label = Some(label(text));
        self
    }

    pub fn border(mut self, color: Color) -> Self {
        self.border = Some(color);
        self
    }

    pub fn fg(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    pub fn bg(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    pub fn fill(mut self, fill: bool) -> Self {
        self.fill = Some(fill);
        self
    }

    pub fn font(mut self, font: Font) -> Self {
        self.font = Some(font);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
