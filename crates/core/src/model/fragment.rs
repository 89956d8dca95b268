//! Positioned text fragments as delivered by the PDF decoder.

use itertools::Itertools;

/// Horizontal alignment attribute reported by the decoder.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Other,
}

impl From<&str> for Alignment {
    fn from(s: &str) -> Self {
        match s {
            "left" => Alignment::Left,
            "center" => Alignment::Center,
            "right" => Alignment::Right,
            _ => Alignment::Other,
        }
    }
}

/// Style tuple of a run: `(fontFace, fontSize, bold, italic)`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StyleDescriptor {
    pub font_face: i64,
    pub font_size: f64,
    pub bold: bool,
    pub italic: bool,
}

/// A run of identically styled, already decoded text.
#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    pub text: String,
    /// Index into the decoder's style dictionary.
    pub style_index: i64,
    pub style: StyleDescriptor,
}

impl TextRun {
    pub fn new(text: impl Into<String>, style_index: i64, style: StyleDescriptor) -> Self {
        Self {
            text: text.into(),
            style_index,
            style,
        }
    }
}

/// A positioned, styled piece of text on a page.
#[derive(Clone, Debug, PartialEq)]
pub struct TextFragment {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub align: Alignment,
    pub color: i64,
    pub outline: Option<String>,
    pub runs: Vec<TextRun>,
}

impl TextFragment {
    /// Single-run fragment with default appearance.
    pub fn new(x: f64, y: f64, width: f64, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            width,
            align: Alignment::Left,
            color: 0,
            outline: None,
            runs: vec![TextRun::new(text, 0, StyleDescriptor::default())],
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Run texts joined by a single space.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).join(" ")
    }

    /// Alignment, fill colour and outline colour all match.
    pub fn same_appearance(&self, other: &TextFragment) -> bool {
        self.align == other.align && self.color == other.color && self.outline == other.outline
    }
}
