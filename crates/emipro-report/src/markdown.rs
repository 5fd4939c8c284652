// SPDX-FileCopyrightText: 2026 Emipro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Markdown rendering for freeform sections.

use comrak::{markdown_to_html, Options};

/// Renders section markdown to HTML.
///
/// Raw HTML in the source is omitted, never passed through.
pub fn render_markdown(text: &str) -> String {
    let mut options = Options::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    markdown_to_html(text, &options)
}
