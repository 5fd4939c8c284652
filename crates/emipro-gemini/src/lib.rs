// SPDX-FileCopyrightText: 2026 Emipro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Gemini provider adapter for the Emipro report generator.
//!
//! This crate implements [`ProviderAdapter`] for the Gemini `generateContent`
//! endpoint. Freeform requests are grounded with web search and return
//! citations; structured requests are constrained to a JSON schema.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use emipro_config::EmiproConfig;
use emipro_core::error::EmiproError;
use emipro_core::traits::{PluginAdapter, ProviderAdapter};
use emipro_core::types::{
    AdapterType, GenerationRequest, GenerationResponse, GroundingCitation, HealthStatus,
};
use tracing::{debug, info};

use crate::client::GeminiClient;
use crate::types::GenerateContentRequest;

/// Gemini provider implementing [`ProviderAdapter`].
///
/// API key resolution order: config -> `GEMINI_API_KEY` -> `API_KEY` -> error.
pub struct GeminiProvider {
    client: GeminiClient,
}

impl GeminiProvider {
    /// Creates a new Gemini provider from the given configuration.
    pub fn new(config: &EmiproConfig) -> Result<Self, EmiproError> {
        let api_key = resolve_api_key(&config.gemini.api_key, |name| std::env::var(name).ok())?;

        let client = GeminiClient::new(
            &api_key,
            config.gemini.model.clone(),
            config.gemini.base_url.clone(),
            Duration::from_secs(config.gemini.timeout_secs),
        )?;

        info!(model = %config.gemini.model, "Gemini provider initialized");

        Ok(Self { client })
    }

    /// Creates a provider with an existing client (for testing).
    #[cfg(test)]
    fn with_client(client: GeminiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PluginAdapter for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, EmiproError> {
        // No probe call: every request is billed.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), EmiproError> {
        debug!("Gemini provider shutting down");
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for GeminiProvider {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, EmiproError> {
        let api_request = match request.response_schema {
            Some(schema) => GenerateContentRequest::structured(request.prompt, schema),
            None => GenerateContentRequest::grounded(request.prompt),
        };

        let response = self.client.generate_content(&api_request).await?;

        let citations = response
            .web_chunks()
            .map(|web| GroundingCitation {
                title: web.title.clone(),
                uri: web.uri.clone(),
            })
            .collect::<Vec<_>>();

        debug!(
            model = %self.client.model(),
            citations = citations.len(),
            "generation complete"
        );

        Ok(GenerationResponse {
            text: response.text(),
            citations,
        })
    }
}

/// Resolves the API key: a non-empty config value wins, then each env var in turn.
fn resolve_api_key(
    config_key: &Option<String>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<String, EmiproError> {
    if let Some(key) = config_key
        && !key.is_empty()
    {
        return Ok(key.clone());
    }

    ["GEMINI_API_KEY", "API_KEY"]
        .into_iter()
        .filter_map(env)
        .find(|key| !key.is_empty())
        .ok_or_else(|| {
            EmiproError::ProviderConfig(
                "Gemini API key not found. Set gemini.api_key in config or the GEMINI_API_KEY environment variable.".into(),
            )
        })
}
