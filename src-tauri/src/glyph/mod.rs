//! Glyph preview domain: lays text out with externally supplied glyph
//! outlines and renders it to SVG.
//!
//! Independent of the identification flow. This module never generates,
//! fetches or validates glyph data; callers hand in a ready map.

pub mod layout;
pub mod svg;

pub use layout::{layout_text, GeneratedGlyph, GlyphMap, Placement, TextLayout};
pub use svg::{render_glyph_cell, render_text_svg};

/// Lay out and render in one step.
pub fn render_preview(text: &str, glyphs: &GlyphMap) -> String {
    let layout = layout_text(text, glyphs);
    log::debug!(
        "[GLYPH] Preview: {} chars, {} placements, {}x{} units",
        text.chars().count(),
        layout.placements.len(),
        layout.width,
        layout.height
    );
    render_text_svg(&layout)
}
