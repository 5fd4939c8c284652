// SPDX-FileCopyrightText: 2026 Emipro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Page geometry and text pagination for A4 output.

/// A4 width in millimetres.
pub const PAGE_WIDTH_MM: f32 = 210.0;
/// A4 height in millimetres.
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const MARGIN_MM: f32 = 14.0;

pub const BODY_FONT_PT: f32 = 10.0;
pub const LINE_HEIGHT_MM: f32 = 5.0;
/// Characters per wrapped body line at [`BODY_FONT_PT`].
pub const BODY_COLUMNS: usize = 95;

/// Body lines that fit between the top and bottom margins.
pub fn lines_per_page() -> usize {
    ((PAGE_HEIGHT_MM - 2.0 * MARGIN_MM) / LINE_HEIGHT_MM).floor() as usize
}

/// Splits text into pages of at most `per_page` lines.
///
/// Trailing blank lines are dropped; empty text yields no pages.
pub fn paginate(text: &str, per_page: usize) -> Vec<Vec<String>> {
    let per_page = per_page.max(1);
    let lines: Vec<String> = text.trim_end().lines().map(str::to_string).collect();
    if lines.iter().all(|l| l.trim().is_empty()) {
        return Vec::new();
    }
    lines.chunks(per_page).map(<[String]>::to_vec).collect()
}

/// Approximate left offset that centres `text` at `font_pt` on the page.
///
/// Uses an average Helvetica glyph width of half an em.
pub fn centered_x(text: &str, font_pt: f32) -> f32 {
    let em_mm = font_pt * 0.3528;
    let width = text.chars().count() as f32 * em_mm * 0.5;
    ((PAGE_WIDTH_MM - width) / 2.0).max(MARGIN_MM)
}
