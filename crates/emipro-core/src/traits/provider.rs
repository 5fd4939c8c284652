// SPDX-FileCopyrightText: 2026 Emipro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for the generative-AI backend.

use async_trait::async_trait;

use crate::error::EmiproError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{GenerationRequest, GenerationResponse};

/// Adapter for the generative-AI backend.
///
/// One call produces the raw material for one report section. Any error is
/// fatal to the current report run; implementations make a single attempt.
#[async_trait]
pub trait ProviderAdapter: PluginAdapter {
    /// Sends a generation request and returns the full response.
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, EmiproError>;
}
