//! Text measurement contract.
//!
//! The engine never rasterizes text; it asks a measurement context for
//! glyph widths, mirroring the canvas 2D `measureText` contract: set a
//! font, read back the (possibly normalized) font string, measure text.

use unicode_width::UnicodeWidthStr;

/// A context capable of measuring text in a given font.
pub trait TextMeasure {
    /// Set the active font from a CSS font string.
    fn set_font(&mut self, font: &str);

    /// The active font string as normalized by the backend.
    ///
    /// Backends may reformat the string that was set, e.g.
    /// `"10px Arial, sans serif"` becoming `"10px Arial, \"sans serif\""`.
    fn font(&self) -> &str;

    /// Width in pixels of `text` rendered in the active font.
    fn measure_text(&self, text: &str) -> f64;
}

/// Deterministic measurer assuming a fixed advance per terminal cell.
///
/// Used by tests and headless callers; wide glyphs count double via
/// Unicode width.
#[derive(Debug, Clone)]
pub struct MonospaceMeasure {
    char_width: f64,
    font: String,
}

impl MonospaceMeasure {
    #[must_use]
    pub fn new(char_width: f64) -> Self {
        Self {
            char_width,
            font: String::new(),
        }
    }
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self::new(10.0)
    }
}

impl TextMeasure for MonospaceMeasure {
    fn set_font(&mut self, font: &str) {
        self.font = font.to_string();
    }

    fn font(&self) -> &str {
        &self.font
    }

    fn measure_text(&self, text: &str) -> f64 {
        text.width() as f64 * self.char_width
    }
}
