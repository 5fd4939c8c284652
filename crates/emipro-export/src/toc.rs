// SPDX-FileCopyrightText: 2026 Emipro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Table-of-contents extraction from the rendered report container.

use std::sync::LazyLock;

use regex::Regex;

static SECTION_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<section\b[^>]*\bid\s*=\s*"section-[^"]*"[^>]*>\s*<h2\b[^>]*>(.*?)</h2>"#)
        .expect("section heading pattern is valid")
});

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

/// Plain-text titles of every `section-*` block's `<h2>`, in document order.
///
/// Headings that are empty after stripping markup are skipped.
pub fn section_titles(container_html: &str) -> Vec<String> {
    SECTION_HEADING
        .captures_iter(container_html)
        .filter_map(|caps| {
            let text = unescape(TAG.replace_all(&caps[1], "").trim());
            (!text.is_empty()).then_some(text)
        })
        .collect()
}

/// Numbered TOC lines, `"1. Title"`.
pub fn toc_lines(titles: &[String]) -> Vec<String> {
    titles
        .iter()
        .enumerate()
        .map(|(i, title)| format!("{}. {title}", i + 1))
        .collect()
}

fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
