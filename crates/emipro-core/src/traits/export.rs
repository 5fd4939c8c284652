// SPDX-FileCopyrightText: 2026 Emipro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Export adapter trait for document rendering.

use async_trait::async_trait;

use crate::error::EmiproError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ExportOutput, ExportRequest};

/// Adapter that turns a report container into a downloadable document.
///
/// Either the complete file is written or nothing is.
#[async_trait]
pub trait ExportAdapter: PluginAdapter {
    async fn export(&self, request: ExportRequest) -> Result<ExportOutput, EmiproError>;
}
