//! SVG output for laid-out text and single glyph cells.
//!
//! Every glyph is wrapped in `translate(x, y) scale(1, -1)` so the Y-up
//! outline lands upright on its baseline in the Y-down SVG canvas.

use std::fmt::Write as FmtWrite;

use super::layout::{
    GeneratedGlyph, Placement, TextLayout, BASELINE, MARGIN, PLACEHOLDER_HEIGHT,
    PLACEHOLDER_INSET, PLACEHOLDER_WIDTH,
};

const EM: f64 = 1000.0;

/// Render a layout as a standalone SVG document.
///
/// Paths are filled with `currentColor` so the host page picks the colour.
pub fn render_text_svg(layout: &TextLayout<'_>) -> String {
    let mut svg = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}" preserveAspectRatio="xMinYMid meet" fill="currentColor">"#,
        fmt_num(layout.width + MARGIN),
        fmt_num(layout.height)
    );

    for placement in &layout.placements {
        match placement {
            Placement::Glyph { x, y, path } => {
                let _ = writeln!(
                    svg,
                    r#"  <g transform="translate({}, {}) scale(1, -1)"><path d="{}"/></g>"#,
                    fmt_num(*x),
                    fmt_num(*y),
                    escape_attr(path)
                );
            }
            Placement::Missing { x, y } => {
                let _ = writeln!(
                    svg,
                    r#"  <g transform="translate({}, {}) scale(1, -1)"><rect x="{}" y="0" width="{}" height="{}" rx="50" fill="none" stroke="currentColor" stroke-width="20" stroke-dasharray="60 40" opacity="0.2"/></g>"#,
                    fmt_num(*x),
                    fmt_num(*y),
                    fmt_num(PLACEHOLDER_INSET),
                    fmt_num(PLACEHOLDER_WIDTH),
                    fmt_num(PLACEHOLDER_HEIGHT)
                );
            }
        }
    }

    svg.push_str("</svg>\n");
    svg
}

/// Render one glyph in a square em box, baseline at 800 units from the top.
pub fn render_glyph_cell(glyph: &GeneratedGlyph) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {em} {em}" fill="currentColor"><title>{title}</title><g transform="translate(0, {baseline}) scale(1, -1)"><path d="{path}"/></g></svg>"#,
        em = fmt_num(EM),
        baseline = fmt_num(BASELINE),
        title = escape_attr(&glyph.ch),
        path = escape_attr(&glyph.path),
    )
}

/// Integers print without a fractional part; everything else keeps two decimals.
fn fmt_num(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{:.2}", v)
    }
}

fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
