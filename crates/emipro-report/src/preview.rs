// SPDX-FileCopyrightText: 2026 Emipro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The report preview document.
//!
//! [`render_container`] produces the `report-content` block that both the
//! preview and the PDF export consume; [`render_document`] wraps it in a
//! standalone HTML page with the expiry notice.

use emipro_core::{Profile, SectionContent, SectionResult};

use crate::catalog;
use crate::html::escape;
use crate::markdown::render_markdown;

/// Element id of the report container.
pub const CONTAINER_ID: &str = "report-content";

pub const DISCLAIMER: &str = "This report has been generated with the assistance of artificial intelligence. While efforts are made to provide accurate and useful information, the content may contain errors, omissions, or unintended inaccuracies. It should not be relied upon as professional, legal, financial, medical, or other expert advice. We provide links to our sources in each section of our report. Users are responsible for independently verifying the information before making decisions or taking action. Neither emigrationpro.com nor its affiliates assume liability for any reliance placed on this report.";

/// Formats remaining seconds as `MM:SS`. Minutes are not capped at 59.
pub fn format_time(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Sections re-sorted into catalog order. Unknown ids go last, in input order.
pub fn in_catalog_order(sections: &[SectionResult]) -> Vec<&SectionResult> {
    let mut sorted: Vec<&SectionResult> = sections.iter().collect();
    sorted.sort_by_key(|s| catalog::position(&s.id).unwrap_or(usize::MAX));
    sorted
}

/// Renders the report container: cover, table of contents, sections, disclaimer.
pub fn render_container(
    title: &str,
    profile: &Profile,
    sections: &[SectionResult],
    generated_on: &str,
) -> String {
    let sections = in_catalog_order(sections);
    let mut html = format!(r#"<div id="{CONTAINER_ID}">"#);

    html.push_str(&format!(
        r#"<header class="cover"><h1>{}</h1><p>For: {}, {}</p><p>Generated on {}</p></header>"#,
        escape(title),
        escape(&profile.destination_city),
        escape(&profile.destination_country),
        escape(generated_on),
    ));

    html.push_str(r#"<nav class="toc"><h2>Table of Contents</h2><ol>"#);
    for section in &sections {
        html.push_str(&format!(
            r##"<li><a href="#section-{}">{}</a></li>"##,
            escape(&section.id),
            escape(&section.title)
        ));
    }
    html.push_str("</ol></nav>");

    for section in &sections {
        html.push_str(&render_section(section));
    }

    html.push_str(&format!(
        r#"<footer class="disclaimer"><p>{DISCLAIMER}</p></footer></div>"#
    ));
    html
}

fn render_section(section: &SectionResult) -> String {
    let body = match &section.content {
        SectionContent::Markdown(text) => render_markdown(text),
        SectionContent::Html(html) => html.clone(),
    };

    let mut html = format!(
        r#"<section id="section-{}"><h2>{}</h2><div class="section-body">{body}</div>"#,
        escape(&section.id),
        escape(&section.title),
    );

    if !section.sources.is_empty() {
        html.push_str(r#"<div class="sources"><h4>Sources:</h4><ul>"#);
        for source in &section.sources {
            html.push_str(&format!(
                r#"<li><a href="{}" target="_blank" rel="noopener noreferrer">{}</a></li>"#,
                escape(&source.uri),
                escape(&source.title)
            ));
        }
        html.push_str("</ul></div>");
    }

    html.push_str("</section>");
    html
}

/// A standalone HTML page for viewing the report in a browser.
pub fn render_document(
    title: &str,
    profile: &Profile,
    sections: &[SectionResult],
    generated_on: &str,
    seconds_left: u64,
) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
</head>
<body>
<h2>Your Personalized Report</h2>
<p>Here is the detailed analysis based on your requirements.</p>
<p role="alert"><strong>Download your report now!</strong> It will be available for the next {time}. After this time, the session will expire.</p>
{container}
</body>
</html>
"#,
        title = escape(title),
        time = format_time(seconds_left),
        container = render_container(title, profile, sections, generated_on),
    )
}
