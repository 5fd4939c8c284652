// SPDX-FileCopyrightText: 2026 Emipro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted generation backend for deterministic testing.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use emipro_core::traits::{PluginAdapter, ProviderAdapter};
use emipro_core::types::{
    AdapterType, GenerationRequest, GenerationResponse, GroundingCitation, HealthStatus,
};
use emipro_core::EmiproError;

/// One scripted answer.
#[derive(Debug, Clone)]
pub enum MockReply {
    Text {
        text: String,
        citations: Vec<GroundingCitation>,
    },
    Fail(String),
}

impl MockReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            citations: Vec::new(),
        }
    }

    /// A reply citing `(title, uri)` pairs.
    pub fn cited(text: impl Into<String>, citations: &[(&str, &str)]) -> Self {
        Self::Text {
            text: text.into(),
            citations: citations
                .iter()
                .map(|(title, uri)| GroundingCitation {
                    title: Some(title.to_string()),
                    uri: Some(uri.to_string()),
                })
                .collect(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self::Fail(message.into())
    }
}

/// A mock provider that answers from a FIFO queue.
///
/// When the queue is empty, `"mock response"` is returned. Every request is
/// recorded for later inspection.
#[derive(Clone, Default)]
pub struct MockProvider {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
    delay: Option<Duration>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_replies(replies: Vec<MockReply>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::from(replies))),
            ..Self::default()
        }
    }

    /// Waits `delay` before answering each request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub async fn add_reply(&self, reply: MockReply) {
        self.replies.lock().await.push_back(reply);
    }

    /// Requests received so far, in order.
    pub async fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, EmiproError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), EmiproError> {
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, EmiproError> {
        self.requests.lock().await.push(request);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.replies.lock().await.pop_front() {
            Some(MockReply::Text { text, citations }) => Ok(GenerationResponse { text, citations }),
            Some(MockReply::Fail(message)) => Err(EmiproError::provider(message)),
            None => Ok(GenerationResponse {
                text: "mock response".to_string(),
                citations: Vec::new(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(prompt: &str) -> GenerationRequest {
        GenerationRequest {
            prompt: prompt.into(),
            response_schema: None,
        }
    }

    #[tokio::test]
    async fn replies_are_served_in_order_then_default() {
        let provider = MockProvider::with_replies(vec![
            MockReply::text("first"),
            MockReply::fail("boom"),
        ]);

        assert_eq!(provider.generate(request("a")).await.unwrap().text, "first");
        assert!(provider.generate(request("b")).await.is_err());
        assert_eq!(
            provider.generate(request("c")).await.unwrap().text,
            "mock response"
        );

        let prompts: Vec<_> = provider
            .requests()
            .await
            .into_iter()
            .map(|r| r.prompt)
            .collect();
        assert_eq!(prompts, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn cited_reply_carries_citations() {
        let provider = MockProvider::with_replies(vec![MockReply::cited(
            "text",
            &[("A", "https://a.example")],
        )]);
        let response = provider.generate(request("x")).await.unwrap();
        assert_eq!(response.citations.len(), 1);
        assert_eq!(response.citations[0].title.as_deref(), Some("A"));
    }

    #[tokio::test(start_paused = true)]
    async fn delay_is_applied() {
        let provider = MockProvider::new().with_delay(Duration::from_secs(10));
        let started = tokio::time::Instant::now();
        provider.generate(request("x")).await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(10));
    }
}
