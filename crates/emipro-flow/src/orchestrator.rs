// SPDX-FileCopyrightText: 2026 Emipro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sequential section generation with progress reporting.
//!
//! One backend call per selected topic, strictly one at a time, in catalog
//! order. Any failed call aborts the run; no partial report is returned.

use std::sync::Arc;

use emipro_core::{EmiproError, ProviderAdapter, Profile, SectionResult};
use emipro_report::{catalog, formatter};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Observable state of a running generation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationState {
    /// `"Researching: {title}... ({index}/{total})"` for the call in flight.
    pub message: String,
    pub total: usize,
    /// Sections finished so far, in catalog order.
    pub sections: Vec<SectionResult>,
}

impl GenerationState {
    pub fn completed(&self) -> usize {
        self.sections.len()
    }
}

/// Receives progress while a report is generated.
pub trait ProgressObserver: Send + Sync {
    /// Called before each backend call.
    fn researching(&self, message: &str, index: usize, total: usize);

    /// Called after each successful section with every section so far.
    fn section_ready(&self, sections: &[SectionResult]);
}

impl ProgressObserver for watch::Sender<GenerationState> {
    fn researching(&self, message: &str, _index: usize, total: usize) {
        self.send_modify(|state| {
            state.message = message.to_string();
            state.total = total;
        });
    }

    fn section_ready(&self, sections: &[SectionResult]) {
        self.send_modify(|state| state.sections = sections.to_vec());
    }
}

/// Progress message shown while the `index`-th of `total` topics is generated.
pub fn progress_message(title: &str, index: usize, total: usize) -> String {
    format!("Researching: {title}... ({index}/{total})")
}

/// Drives one report run against a generation backend.
#[derive(Clone)]
pub struct ReportOrchestrator {
    provider: Arc<dyn ProviderAdapter>,
}

impl ReportOrchestrator {
    pub fn new(provider: Arc<dyn ProviderAdapter>) -> Self {
        Self { provider }
    }

    /// Generates one section per topic in `topic_ids`, in catalog order.
    ///
    /// Unknown identifiers fail before any call is made. An empty selection
    /// yields an empty report.
    pub async fn run(
        &self,
        profile: &Profile,
        topic_ids: &[String],
        observer: &dyn ProgressObserver,
    ) -> Result<Vec<SectionResult>, EmiproError> {
        let topics = catalog::resolve(topic_ids)?;
        let total = topics.len();
        let mut sections = Vec::with_capacity(total);

        info!(total, city = %profile.destination_city, "report generation started");

        for (i, topic) in topics.into_iter().enumerate() {
            let message = progress_message(topic.title, i + 1, total);
            debug!(topic = topic.id, "{message}");
            observer.researching(&message, i + 1, total);

            let response = self
                .provider
                .generate(topic.request(profile))
                .await
                .inspect_err(|e| {
                    warn!(topic = topic.id, error = %e, "section generation failed, aborting run");
                })?;

            sections.push(formatter::format_section(topic, response));
            observer.section_ready(&sections);
        }

        info!(sections = sections.len(), "report generation complete");
        Ok(sections)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use emipro_core::Lifestyle;
    use emipro_test_utils::{MockProvider, MockReply};
    use tracing_test::traced_test;

    #[derive(Default)]
    struct Recorder {
        messages: Mutex<Vec<String>>,
        snapshots: Mutex<Vec<usize>>,
    }

    impl ProgressObserver for Recorder {
        fn researching(&self, message: &str, _index: usize, _total: usize) {
            self.messages.lock().unwrap().push(message.to_string());
        }

        fn section_ready(&self, sections: &[SectionResult]) {
            self.snapshots.lock().unwrap().push(sections.len());
        }
    }

    fn profile() -> Profile {
        Profile {
            destination_country: "Portugal".into(),
            destination_city: "Lisbon".into(),
            profession: "Engineer".into(),
            age: "30".into(),
            lifestyle: Lifestyle::Moderate,
        }
    }

    fn ids(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn sections_follow_catalog_order_and_report_progress() {
        let provider = Arc::new(MockProvider::new());
        let orchestrator = ReportOrchestrator::new(provider.clone());
        let recorder = Recorder::default();

        let sections = orchestrator
            .run(&profile(), &ids(&["visa", "healthcare"]), &recorder)
            .await
            .unwrap();

        let order: Vec<_> = sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(order, ["healthcare", "visa"]);
        assert_eq!(
            *recorder.messages.lock().unwrap(),
            [
                "Researching: Healthcare Mapping... (1/2)",
                "Researching: Visa & Immigration Guide... (2/2)",
            ]
        );
        assert_eq!(*recorder.snapshots.lock().unwrap(), [1, 2]);
        assert_eq!(provider.call_count().await, 2);
    }

    #[tokio::test]
    #[traced_test]
    async fn failure_aborts_after_partial_progress() {
        let provider = Arc::new(MockProvider::with_replies(vec![
            MockReply::text("ok"),
            MockReply::text("ok"),
            MockReply::fail("quota exceeded"),
        ]));
        let orchestrator = ReportOrchestrator::new(provider.clone());
        let (tx, rx) = watch::channel(GenerationState::default());

        let result = orchestrator
            .run(
                &profile(),
                &ids(&["healthcare", "finance", "situation", "visa"]),
                &tx,
            )
            .await;

        assert!(matches!(result, Err(EmiproError::Provider { .. })));
        // Third call failed: two sections were visible, the fourth never ran.
        assert_eq!(rx.borrow().completed(), 2);
        assert_eq!(rx.borrow().total, 4);
        assert_eq!(provider.call_count().await, 3);
        assert!(logs_contain("section generation failed, aborting run"));
    }

    #[tokio::test]
    async fn structured_topic_sends_schema_and_degrades_on_bad_json() {
        let provider = Arc::new(MockProvider::with_replies(vec![MockReply::text("not json")]));
        let orchestrator = ReportOrchestrator::new(provider.clone());

        let sections = orchestrator
            .run(&profile(), &ids(&["finance"]), &Recorder::default())
            .await
            .unwrap();

        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].content.as_str(), formatter::STRUCTURED_FORMAT_ERROR);
        assert!(provider.requests().await[0].is_structured());
    }

    #[tokio::test]
    async fn unknown_topic_fails_before_any_call() {
        let provider = Arc::new(MockProvider::new());
        let orchestrator = ReportOrchestrator::new(provider.clone());

        let err = orchestrator
            .run(&profile(), &ids(&["healthcare", "weather"]), &Recorder::default())
            .await
            .unwrap_err();

        assert!(matches!(err, EmiproError::UnknownTopic(_)));
        assert_eq!(provider.call_count().await, 0);
    }

    #[tokio::test]
    async fn empty_selection_yields_empty_report() {
        let orchestrator = ReportOrchestrator::new(Arc::new(MockProvider::new()));
        let sections = orchestrator
            .run(&profile(), &[], &Recorder::default())
            .await
            .unwrap();
        assert!(sections.is_empty());
    }
}
