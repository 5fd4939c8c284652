// SPDX-FileCopyrightText: 2026 Emipro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for PDF export through the adapter trait.

use emipro_config::model::ExportConfig;
use emipro_core::traits::ExportAdapter;
use emipro_core::types::ExportRequest;
use emipro_core::{EmiproError, PluginAdapter};
use emipro_export::PdfExporter;

fn exporter(dir: &std::path::Path) -> PdfExporter {
    PdfExporter::new(&ExportConfig {
        output_dir: dir.to_string_lossy().into_owned(),
        ..ExportConfig::default()
    })
}

fn request(file_name: &str) -> ExportRequest {
    ExportRequest {
        container_html: r#"<div id="report-content">
<section id="section-healthcare"><h2>Healthcare System</h2><p>Care.</p></section>
</div>"#
            .to_string(),
        file_name: file_name.to_string(),
        title: "Emigration Pro Report".to_string(),
    }
}

#[tokio::test]
async fn export_writes_pdf_with_requested_name() {
    let dir = tempfile::tempdir().unwrap();
    let output = exporter(dir.path())
        .export(request("Emigration_Pro_Report_Lisbon.pdf"))
        .await
        .unwrap();

    assert_eq!(output.path, dir.path().join("Emigration_Pro_Report_Lisbon.pdf"));
    assert_eq!(output.pages, 3);
    let bytes = std::fs::read(&output.path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn export_leaves_no_temporary_files() {
    let dir = tempfile::tempdir().unwrap();
    exporter(dir.path()).export(request("a.pdf")).await.unwrap();

    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.pdf".to_string()]);
}

#[tokio::test]
async fn export_strips_directory_components_from_name() {
    let dir = tempfile::tempdir().unwrap();
    let output = exporter(dir.path())
        .export(request("../escape.pdf"))
        .await
        .unwrap();
    assert_eq!(output.path, dir.path().join("escape.pdf"));
}

#[tokio::test]
async fn failed_export_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"x").unwrap();

    let err = exporter(&blocker).export(request("a.pdf")).await.unwrap_err();
    assert!(matches!(err, EmiproError::Export { .. }));
    assert_eq!(err.user_message(), emipro_core::error::EXPORT_FAILED_MESSAGE);
    assert!(!blocker.join("a.pdf").exists());
}

#[tokio::test]
async fn health_reports_missing_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    let missing = exporter(&dir.path().join("nope"));
    assert!(matches!(
        missing.health_check().await.unwrap(),
        emipro_core::HealthStatus::Degraded(_)
    ));
}
