// SPDX-FileCopyrightText: 2026 Emipro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! PDF export adapter for the Emipro report generator.
//!
//! Turns the on-screen report container into an A4 document with a cover
//! page, a table of contents built from the section headings actually
//! present, and the report text. Files are written through a temporary file
//! in the output directory and renamed into place, so a failed export never
//! leaves a partial PDF behind.

pub mod layout;
pub mod render;
pub mod toc;

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use emipro_config::model::ExportConfig;
use emipro_core::error::EmiproError;
use emipro_core::traits::{ExportAdapter, PluginAdapter};
use emipro_core::types::{AdapterType, ExportOutput, ExportRequest, HealthStatus};
use tracing::{debug, info};

/// Local-filesystem PDF exporter implementing [`ExportAdapter`].
pub struct PdfExporter {
    output_dir: PathBuf,
}

impl PdfExporter {
    pub fn new(config: &ExportConfig) -> Self {
        Self {
            output_dir: PathBuf::from(&config.output_dir),
        }
    }

    /// Directory exports are written to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

#[async_trait]
impl PluginAdapter for PdfExporter {
    fn name(&self) -> &str {
        "pdf"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Export
    }

    async fn health_check(&self) -> Result<HealthStatus, EmiproError> {
        if self.output_dir.is_dir() {
            Ok(HealthStatus::Healthy)
        } else {
            Ok(HealthStatus::Degraded(format!(
                "output directory {} does not exist",
                self.output_dir.display()
            )))
        }
    }

    async fn shutdown(&self) -> Result<(), EmiproError> {
        debug!("PDF exporter shutting down");
        Ok(())
    }
}

#[async_trait]
impl ExportAdapter for PdfExporter {
    async fn export(&self, request: ExportRequest) -> Result<ExportOutput, EmiproError> {
        let output_dir = self.output_dir.clone();
        let generated_on = chrono::Local::now().format("%Y-%m-%d").to_string();

        let output = tokio::task::spawn_blocking(move || {
            write_pdf(&output_dir, &request, &generated_on)
        })
        .await
        .map_err(|e| EmiproError::Internal(format!("export task failed: {e}")))??;

        info!(path = %output.path.display(), pages = output.pages, "report exported");
        Ok(output)
    }
}

/// Renders and atomically writes the PDF for `request` into `output_dir`.
pub fn write_pdf(
    output_dir: &Path,
    request: &ExportRequest,
    generated_on: &str,
) -> Result<ExportOutput, EmiproError> {
    let file_name = Path::new(&request.file_name)
        .file_name()
        .ok_or_else(|| EmiproError::export(format!("invalid file name `{}`", request.file_name)))?;
    let target = output_dir.join(file_name);

    let rendered = render::render_pdf(&request.title, generated_on, &request.container_html)?;

    std::fs::create_dir_all(output_dir).map_err(|e| EmiproError::Export {
        message: format!("cannot create {}: {e}", output_dir.display()),
        source: Some(Box::new(e)),
    })?;

    let mut temp = tempfile::Builder::new()
        .prefix(".emipro-export-")
        .suffix(".pdf")
        .tempfile_in(output_dir)
        .map_err(|e| EmiproError::Export {
            message: format!("cannot create temporary file: {e}"),
            source: Some(Box::new(e)),
        })?;
    temp.write_all(&rendered.bytes)
        .and_then(|()| temp.as_file().sync_all())
        .map_err(|e| EmiproError::Export {
            message: format!("cannot write PDF: {e}"),
            source: Some(Box::new(e)),
        })?;
    temp.persist(&target).map_err(|e| EmiproError::Export {
        message: format!("cannot move PDF into place: {}", e.error),
        source: Some(Box::new(e.error)),
    })?;

    debug!(path = %target.display(), bytes = rendered.bytes.len(), "PDF written");
    Ok(ExportOutput {
        path: target,
        pages: rendered.pages,
    })
}
