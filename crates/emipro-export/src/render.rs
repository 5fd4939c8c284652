// SPDX-FileCopyrightText: 2026 Emipro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builds the PDF bytes: cover page, table of contents, then body pages.

use emipro_core::EmiproError;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference};

use crate::layout::{
    centered_x, lines_per_page, paginate, BODY_COLUMNS, BODY_FONT_PT, LINE_HEIGHT_MM, MARGIN_MM,
    PAGE_HEIGHT_MM, PAGE_WIDTH_MM,
};
use crate::toc;

const LAYER: &str = "Layer 1";

/// A rendered document and its page count.
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    pub pages: usize,
}

/// Renders the report container into PDF bytes.
pub fn render_pdf(
    title: &str,
    generated_on: &str,
    container_html: &str,
) -> Result<RenderedPdf, EmiproError> {
    let body = html2text::from_read(container_html.as_bytes(), BODY_COLUMNS)
        .map_err(|e| EmiproError::Export {
            message: format!("failed to convert report to text: {e}"),
            source: Some(Box::new(e)),
        })?;
    let titles = toc::section_titles(container_html);

    let (doc, cover_page, cover_layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER);
    let regular = builtin_font(&doc, BuiltinFont::Helvetica)?;
    let bold = builtin_font(&doc, BuiltinFont::HelveticaBold)?;
    let mut pages = 1;

    // Cover.
    {
        let layer = doc.get_page(cover_page).get_layer(cover_layer);
        let y = PAGE_HEIGHT_MM * 2.0 / 3.0;
        layer.use_text(title, 30.0, Mm(centered_x(title, 30.0)), Mm(y), &bold);
        let stamp = format!("Generated on: {generated_on}");
        layer.use_text(
            stamp.as_str(),
            16.0,
            Mm(centered_x(&stamp, 16.0)),
            Mm(y - 20.0),
            &regular,
        );
    }

    // Table of contents; continues onto more pages when long.
    let toc_entries = toc::toc_lines(&titles);
    let toc_first = PAGE_HEIGHT_MM - 40.0;
    let toc_per_page = ((toc_first - MARGIN_MM) / 10.0).floor() as usize;
    let mut toc_pages = toc_entries.chunks(toc_per_page.max(1)).peekable();
    if toc_pages.peek().is_none() {
        let (page, layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER);
        doc.get_page(page).get_layer(layer).use_text(
            "Table of Contents",
            22.0,
            Mm(MARGIN_MM),
            Mm(PAGE_HEIGHT_MM - 22.0),
            &bold,
        );
        pages += 1;
    }
    for chunk in toc_pages {
        let (page, layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER);
        let layer = doc.get_page(page).get_layer(layer);
        layer.use_text(
            "Table of Contents",
            22.0,
            Mm(MARGIN_MM),
            Mm(PAGE_HEIGHT_MM - 22.0),
            &bold,
        );
        let mut y = toc_first;
        for entry in chunk {
            layer.use_text(entry.as_str(), 12.0, Mm(MARGIN_MM), Mm(y), &regular);
            y -= 10.0;
        }
        pages += 1;
    }

    // Body.
    for page_lines in paginate(&body, lines_per_page()) {
        let (page, layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER);
        let layer = doc.get_page(page).get_layer(layer);
        let mut y = PAGE_HEIGHT_MM - MARGIN_MM;
        for line in page_lines {
            if !line.trim().is_empty() {
                layer.use_text(line, BODY_FONT_PT, Mm(MARGIN_MM), Mm(y), &regular);
            }
            y -= LINE_HEIGHT_MM;
        }
        pages += 1;
    }

    let bytes = doc
        .save_to_bytes()
        .map_err(|e| EmiproError::export(format!("failed to serialize PDF: {e:?}")))?;

    Ok(RenderedPdf { bytes, pages })
}

fn builtin_font(
    doc: &PdfDocumentReference,
    font: BuiltinFont,
) -> Result<IndirectFontRef, EmiproError> {
    doc.add_builtin_font(font)
        .map_err(|e| EmiproError::export(format!("failed to load built-in font: {e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTAINER: &str = r#"<div id="report-content">
<h1>Emigration Pro Report</h1>
<section id="section-healthcare"><h2>Healthcare System</h2><p>Public and private care.</p></section>
<section id="section-visa"><h2>Visa &amp; Residency</h2><p>D7 visa.</p></section>
</div>"#;

    #[test]
    fn renders_cover_toc_and_body() {
        let pdf = render_pdf("Emigration Pro Report", "2026-10-19", CONTAINER).unwrap();
        assert!(pdf.bytes.starts_with(b"%PDF"));
        assert_eq!(pdf.pages, 3);
    }

    #[test]
    fn long_body_spans_several_pages() {
        let paragraphs: String = (0..200)
            .map(|i| format!("<p>Paragraph number {i}.</p>"))
            .collect();
        let html = format!(
            r#"<section id="section-situation"><h2>Local Situation</h2>{paragraphs}</section>"#
        );
        let pdf = render_pdf("Report", "today", &html).unwrap();
        assert!(pdf.pages > 4, "got {} pages", pdf.pages);
    }

    #[test]
    fn empty_container_still_has_cover_and_toc() {
        let pdf = render_pdf("Report", "today", "").unwrap();
        assert_eq!(pdf.pages, 2);
    }
}
