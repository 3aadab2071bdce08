//! Positioned-text types for the paginated-document path.

use serde::{Deserialize, Serialize};

/// One positioned run of text extracted from a page.
///
/// Fragments arrive in no particular order; the layout reconstructor groups
/// them into [`Line`]s by vertical position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextFragment {
    /// The text content
    pub text: String,

    /// Horizontal position in document units (left edge)
    pub x: f32,

    /// Vertical position in document units (larger = higher on the page)
    pub y: f32,

    /// Rendered glyph height
    #[serde(default)]
    pub height: f32,

    /// Font identifier, if the extractor reported one
    #[serde(default)]
    pub font_name: Option<String>,
}

impl TextFragment {
    /// Create a new fragment.
    pub fn new(text: impl Into<String>, x: f32, y: f32, height: f32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            height,
            font_name: None,
        }
    }

    /// Create a new fragment with a font identifier.
    pub fn with_font(
        text: impl Into<String>,
        x: f32,
        y: f32,
        height: f32,
        font_name: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            height,
            font_name: Some(font_name.into()),
        }
    }

    /// Whether the fragment's font identifier marks it as bold.
    pub fn is_bold(&self) -> bool {
        self.font_name
            .as_deref()
            .is_some_and(|name| name.to_lowercase().contains("bold"))
    }
}

/// Fragments grouped as one horizontal text row, decorated with derived
/// structure fields.
///
/// Invariants: `fragments` is non-empty and sorted ascending by x; `text` is
/// the fragment strings joined by single spaces and trimmed. The derived
/// fields are written by successive layout stages (indent, then heading,
/// then list); no stage alters a field written by an earlier one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Line {
    /// Fragments in this line, sorted by x
    pub fragments: Vec<TextFragment>,

    /// Representative vertical coordinate (rounded)
    pub y: i64,

    /// Joined, trimmed text
    pub text: String,

    /// Indentation level relative to the page's leftmost line (0 at minimum)
    pub indent_level: i32,

    /// Heading level 1-3, or 0 for body text
    pub heading_level: u8,

    /// Whether the text starts with a bullet-glyph or dash/asterisk lead-in
    pub is_bullet: bool,

    /// Whether the text starts with a digit/letter/roman-numeral lead-in
    pub is_numbered: bool,
}

impl Line {
    /// Leftmost x coordinate of the line.
    pub fn start_x(&self) -> f32 {
        self.fragments.first().map(|f| f.x).unwrap_or(0.0)
    }

    /// Average fragment glyph height.
    pub fn avg_height(&self) -> f32 {
        if self.fragments.is_empty() {
            return 0.0;
        }
        let sum: f32 = self.fragments.iter().map(|f| f.height).sum();
        sum / self.fragments.len() as f32
    }

    /// Whether any fragment in the line is bold.
    pub fn has_bold(&self) -> bool {
        self.fragments.iter().any(|f| f.is_bold())
    }

    /// Whether the line text is fully upper-case and contains a letter.
    pub fn is_all_caps(&self) -> bool {
        self.text == self.text.to_uppercase() && self.text.chars().any(|c| c.is_ascii_uppercase())
    }
}

/// An ordered sequence of lines for one page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,

    /// Lines in reading order (top of page first)
    pub lines: Vec<Line>,
}

impl Page {
    /// Create a page from classified lines.
    pub fn new(number: u32, lines: Vec<Line>) -> Self {
        Self { number, lines }
    }

    /// Check if the page has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
