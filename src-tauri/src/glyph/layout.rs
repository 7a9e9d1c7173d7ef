//! Text layout over a character → glyph map.
//!
//! Glyph outlines use font coordinates: 1000-unit em, Y up, origin on the
//! baseline. Placements are in display coordinates: Y down, origin at the
//! top-left. The flip happens at render time (see svg.rs), never on the
//! stored glyph data.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Distance between consecutive baselines.
pub const LINE_HEIGHT: f64 = 1200.0;
/// Left margin; the renderer adds the same on the right.
pub const MARGIN: f64 = 100.0;
/// Baseline of the first line, measured from the top margin.
pub const BASELINE: f64 = 800.0;
/// Advance for a glyph without an explicit width.
pub const DEFAULT_ADVANCE: f64 = 600.0;
/// Advance for a space with no glyph.
pub const SPACE_ADVANCE: f64 = 300.0;
/// Advance for any other character with no glyph.
pub const MISSING_ADVANCE: f64 = 400.0;
/// Room below the last baseline for descenders.
pub const DESCENDER_PADDING: f64 = 400.0;

/// Placeholder box drawn for a missing glyph, in font units.
pub const PLACEHOLDER_INSET: f64 = 50.0;
pub const PLACEHOLDER_WIDTH: f64 = 300.0;
pub const PLACEHOLDER_HEIGHT: f64 = 700.0;

/// One glyph outline, supplied from outside. Never mutated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedGlyph {
    /// Usually a single character; `"Space"`/`"space"` name the space glyph.
    #[serde(rename = "char")]
    pub ch: String,
    /// SVG path data in font units.
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
}

impl GeneratedGlyph {
    pub fn advance(&self) -> f64 {
        self.width.unwrap_or(DEFAULT_ADVANCE)
    }
}

/// Glyph lookup keyed by the glyph's `char` string.
#[derive(Debug, Clone, Default)]
pub struct GlyphMap {
    glyphs: HashMap<String, GeneratedGlyph>,
}

impl GlyphMap {
    /// Later glyphs with the same key replace earlier ones.
    pub fn from_glyphs(glyphs: impl IntoIterator<Item = GeneratedGlyph>) -> Self {
        let glyphs = glyphs.into_iter().map(|g| (g.ch.clone(), g)).collect();
        Self { glyphs }
    }

    /// Parse a JSON array of `{ "char", "path", "width"? }` objects.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let glyphs: Vec<GeneratedGlyph> = serde_json::from_str(json)?;
        Ok(Self::from_glyphs(glyphs))
    }

    pub fn get(&self, key: &str) -> Option<&GeneratedGlyph> {
        self.glyphs.get(key)
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Glyph for a character, with the named fallbacks for space.
    fn lookup(&self, ch: char) -> Option<&GeneratedGlyph> {
        let mut buf = [0u8; 4];
        self.get(ch.encode_utf8(&mut buf)).or_else(|| {
            if ch == ' ' {
                self.get("Space").or_else(|| self.get("space"))
            } else {
                None
            }
        })
    }
}

/// A positioned element of the laid-out text. `(x, y)` is the glyph origin
/// on the baseline, in display coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Placement<'a> {
    Glyph { x: f64, y: f64, path: &'a str },
    /// No glyph for this character; drawn as a ghost box.
    Missing { x: f64, y: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout<'a> {
    pub placements: Vec<Placement<'a>>,
    /// Widest line, including the left margin.
    pub width: f64,
    /// Last baseline plus descender padding.
    pub height: f64,
}

/// Lay out `text` line by line. Same input, same output.
pub fn layout_text<'a>(text: &str, glyphs: &'a GlyphMap) -> TextLayout<'a> {
    let mut placements = Vec::new();
    let mut cursor_x = MARGIN;
    let mut cursor_y = MARGIN + BASELINE;
    let mut max_width: f64 = 0.0;

    for ch in text.chars() {
        if ch == '\n' {
            max_width = max_width.max(cursor_x);
            cursor_x = MARGIN;
            cursor_y += LINE_HEIGHT;
            continue;
        }

        match glyphs.lookup(ch) {
            Some(glyph) => {
                placements.push(Placement::Glyph {
                    x: cursor_x,
                    y: cursor_y,
                    path: &glyph.path,
                });
                cursor_x += glyph.advance();
            }
            None if ch == ' ' => cursor_x += SPACE_ADVANCE,
            None => {
                placements.push(Placement::Missing {
                    x: cursor_x,
                    y: cursor_y,
                });
                cursor_x += MISSING_ADVANCE;
            }
        }
    }

    TextLayout {
        placements,
        width: max_width.max(cursor_x),
        height: cursor_y + DESCENDER_PADDING,
    }
}
