//! Layout properties of the glyph preview renderer.

use font_detective_lib::glyph::layout::{LINE_HEIGHT, MISSING_ADVANCE, SPACE_ADVANCE};
use font_detective_lib::glyph::{layout_text, render_preview, GeneratedGlyph, GlyphMap, Placement};

fn alphabet() -> GlyphMap {
    GlyphMap::from_json(
        r#"[
            {"char": "A", "path": "M0 0 L300 700 L600 0 Z"},
            {"char": "B", "path": "M0 0 L0 700 L450 700 L450 0 Z", "width": 560},
            {"char": "C", "path": "M500 100 C300 -50 0 100 0 350 C0 600 300 750 500 600", "width": 580}
        ]"#,
    )
    .unwrap()
}

fn origin(p: &Placement<'_>) -> (f64, f64) {
    match p {
        Placement::Glyph { x, y, .. } | Placement::Missing { x, y } => (*x, *y),
    }
}

#[test]
fn layout_is_deterministic() {
    let map = alphabet();
    let text = "AB C\nCAB?\n\nA";
    let first = layout_text(text, &map);
    let second = layout_text(text, &map);
    assert_eq!(first, second);
    assert_eq!(render_preview(text, &map), render_preview(text, &map));
}

#[test]
fn second_line_baseline_is_one_line_height_lower() {
    let map = alphabet();
    let layout = layout_text("AB\nC", &map);

    assert_eq!(layout.placements.len(), 3);
    let (_, first_baseline) = origin(&layout.placements[0]);
    let (x, second_baseline) = origin(&layout.placements[2]);
    assert_eq!(second_baseline, first_baseline + LINE_HEIGHT);
    assert_eq!(x, 100.0);
}

#[test]
fn unknown_character_gets_exactly_one_placeholder() {
    let map = alphabet();
    let with = layout_text("A%B", &map);
    let without = layout_text("AB", &map);

    let missing: Vec<_> = with
        .placements
        .iter()
        .filter(|p| matches!(p, Placement::Missing { .. }))
        .collect();
    assert_eq!(missing.len(), 1);
    assert_eq!(with.width - without.width, MISSING_ADVANCE);
}

#[test]
fn unmapped_space_only_advances() {
    let map = alphabet();
    let spaced = layout_text("A B", &map);
    let tight = layout_text("AB", &map);

    assert_eq!(spaced.placements.len(), tight.placements.len());
    assert_eq!(spaced.width - tight.width, SPACE_ADVANCE);
}

#[test]
fn stored_glyphs_are_not_flipped() {
    let glyph = GeneratedGlyph {
        ch: "A".to_string(),
        path: "M0 0 L300 700 L600 0 Z".to_string(),
        width: None,
    };
    let map = GlyphMap::from_glyphs([glyph.clone()]);
    let layout = layout_text("AAA", &map);

    assert_eq!(map.get("A"), Some(&glyph));
    for p in &layout.placements {
        assert!(matches!(p, Placement::Glyph { path, .. } if *path == glyph.path));
    }
    let svg = render_preview("A", &map);
    assert!(svg.contains("scale(1, -1)"));
    assert!(svg.contains(&glyph.path));
}

#[test]
fn width_tracks_the_widest_line() {
    let map = alphabet();
    let layout = layout_text("A\nABC\nB", &map);
    assert_eq!(layout.width, 100.0 + 600.0 + 560.0 + 580.0);
    assert_eq!(layout.height, 100.0 + 800.0 + 2.0 * LINE_HEIGHT + 400.0);
}
