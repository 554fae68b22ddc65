//! Unified theme and color constants for the graph explorer.
//!
//! All canvas and panel colors are sourced from here so the graph and the
//! surrounding chrome stay visually consistent across the dark and light
//! palettes.

use egui::Color32;

/// Orange used for every pending-connection indicator (drag line, draft
/// connector, candidate ring)
pub const PENDING: Color32 = Color32::from_rgb(249, 115, 22);

/// Mode-dependent colors for the canvas and its strokes
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    /// Canvas background
    pub canvas: Color32,
    /// Panel background
    pub panel: Color32,
    /// Default edge stroke
    pub link_default: Color32,
    /// Stroke for edges outgoing from the selection; also arrowheads and labels
    pub link_active: Color32,
    /// Node title text
    pub text: Color32,
    /// Halo behind edge labels, matches the canvas
    pub halo: Color32,
    /// Muted text for secondary panel content
    pub text_muted: Color32,
}

pub fn palette(dark: bool) -> Palette {
    if dark {
        Palette {
            canvas: Color32::from_rgb(2, 6, 23),
            panel: Color32::from_rgb(15, 23, 42),
            link_default: Color32::from_rgb(51, 65, 85),
            link_active: Color32::from_rgb(148, 163, 184),
            text: Color32::from_rgb(241, 245, 249),
            halo: Color32::from_rgb(2, 6, 23),
            text_muted: Color32::from_rgb(148, 163, 184),
        }
    } else {
        Palette {
            canvas: Color32::from_rgb(248, 250, 252),
            panel: Color32::from_rgb(241, 245, 249),
            link_default: Color32::from_rgb(203, 213, 225),
            link_active: Color32::from_rgb(100, 116, 139),
            text: Color32::from_rgb(30, 41, 59),
            halo: Color32::from_rgb(248, 250, 252),
            text_muted: Color32::from_rgb(100, 116, 139),
        }
    }
}

/// Per-category node styling: a soft fill and a darker accent stroke
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryStyle {
    pub fill: Color32,
    pub stroke: Color32,
}

const FALLBACK_STYLE: CategoryStyle = CategoryStyle {
    fill: Color32::from_rgb(243, 244, 246),
    stroke: Color32::from_rgb(107, 114, 128),
};

/// Style lookup by category name. Unknown categories get the "Other" style.
pub fn category_style(category: &str) -> CategoryStyle {
    let (fill, stroke) = match category {
        "Concept" => ((241, 245, 249), (71, 85, 105)),
        "Science" => ((219, 234, 254), (37, 99, 235)),
        "Technology" => ((224, 231, 255), (79, 70, 229)),
        "Person" => ((255, 237, 213), (234, 88, 12)),
        "Place" => ((220, 252, 231), (22, 163, 74)),
        "Organization" => ((243, 232, 255), (147, 51, 234)),
        "Event" => ((255, 228, 230), (225, 29, 72)),
        "Art" => ((252, 231, 243), (219, 39, 119)),
        "History" => ((254, 249, 195), (202, 138, 4)),
        "Nature" => ((204, 251, 241), (13, 148, 136)),
        "Society" => ((224, 242, 254), (2, 132, 199)),
        "Object" => ((236, 252, 203), (101, 163, 13)),
        _ => return FALLBACK_STYLE,
    };
    CategoryStyle {
        fill: Color32::from_rgb(fill.0, fill.1, fill.2),
        stroke: Color32::from_rgb(stroke.0, stroke.1, stroke.2),
    }
}

/// All known categories, for pickers and legends
pub const CATEGORIES: &[&str] = &[
    "Concept",
    "Science",
    "Technology",
    "Person",
    "Place",
    "Organization",
    "Event",
    "Art",
    "History",
    "Nature",
    "Society",
    "Object",
    "Other",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_category_uses_fallback() {
        assert_eq!(category_style("Cryptids"), FALLBACK_STYLE);
        assert_eq!(category_style("Other"), FALLBACK_STYLE);
    }

    #[test]
    fn every_listed_category_has_a_distinct_stroke() {
        let strokes: Vec<Color32> = CATEGORIES
            .iter()
            .map(|c| category_style(c).stroke)
            .collect();
        for (i, a) in strokes.iter().enumerate() {
            for b in &strokes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn halo_matches_canvas_in_both_modes() {
        for dark in [true, false] {
            let p = palette(dark);
            assert_eq!(p.halo, p.canvas);
        }
    }
}
