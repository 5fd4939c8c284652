// SPDX-FileCopyrightText: 2026 Emipro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end wizard runs against the in-memory adapters.

use std::sync::Arc;
use std::time::Duration;

use emipro_config::EmiproConfig;
use emipro_core::error::{
    EXPORT_FAILED_MESSAGE, GENERATION_FAILED_MESSAGE, PAYMENT_UNAVAILABLE_MESSAGE,
    REPORT_EXPIRED_MESSAGE, SESSION_RESTORE_FAILED_MESSAGE, SESSION_SAVE_FAILED_MESSAGE,
};
use emipro_core::{EmiproError, Lifestyle};
use emipro_flow::{ExpiryTimer, ReportFlow, Step, Wizard};
use emipro_report::ProfileForm;
use emipro_test_utils::{MemoryStore, MockCheckout, MockExporter, MockProvider, MockReply};
use url::Url;

struct Harness {
    flow: ReportFlow,
    provider: MockProvider,
    store: Arc<MemoryStore>,
    checkout: MockCheckout,
    exporter: MockExporter,
}

fn config() -> EmiproConfig {
    let mut config = EmiproConfig::default();
    config.payment.price_id = Some("price_report".into());
    config
}

fn harness_with(
    config: EmiproConfig,
    provider: MockProvider,
    store: MemoryStore,
    exporter: MockExporter,
) -> Harness {
    let store = Arc::new(store);
    let checkout = MockCheckout::new();
    let flow = ReportFlow::new(
        config,
        Arc::new(provider.clone()),
        store.clone(),
        Arc::new(exporter.clone()),
    )
    .with_checkout(Arc::new(checkout.clone()));
    Harness {
        flow,
        provider,
        store,
        checkout,
        exporter,
    }
}

fn harness(provider: MockProvider) -> Harness {
    harness_with(config(), provider, MemoryStore::new(), MockExporter::new())
}

fn filled_wizard(topics: &[&str]) -> Wizard {
    let mut form = ProfileForm::new();
    form.set_country("Portugal");
    form.set_city("Lisbon").unwrap();
    form.profession = "Software engineer".into();
    form.age = "34".into();
    form.lifestyle = Lifestyle::Moderate;

    let mut wizard = Wizard::new();
    wizard.submit_profile(form.submit().unwrap());
    wizard
        .select_topics(topics.iter().map(|t| t.to_string()).collect())
        .unwrap();
    wizard
}

fn return_address() -> Url {
    Url::parse("http://localhost:8080/?payment_success=true").unwrap()
}

#[tokio::test]
async fn checkout_then_resume_produces_report_in_catalog_order() {
    let h = harness(MockProvider::with_replies(vec![
        MockReply::cited("## Clinics", &[("Health Ministry", "https://gov.pt/health")]),
        MockReply::text("## Visas"),
    ]));

    let mut wizard = filled_wizard(&["visa", "healthcare"]);
    let session = h.flow.start_checkout(&mut wizard).await.unwrap();
    assert_eq!(session.redirect_url, "https://checkout.example/pay/cs_mock");
    assert_eq!(wizard.step(), Step::Payment);

    let requests = h.checkout.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].price_id, "price_report");
    assert_eq!(requests[0].success_url, "http://localhost:8080/?payment_success=true");
    assert_eq!(requests[0].cancel_url, "http://localhost:8080/");
    assert!(h.store.peek("emigrationReportData").await.is_some());

    // The redirect loses all in-memory state.
    let mut wizard = Wizard::new();
    let cleaned = h
        .flow
        .resume(&mut wizard, &return_address())
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(cleaned.as_str(), "http://localhost:8080/");
    assert_eq!(wizard.step(), Step::Generating);
    assert!(h.store.peek("emigrationReportData").await.is_none());

    h.flow.generate(&mut wizard).await.unwrap();
    assert_eq!(wizard.step(), Step::Preview);
    let ids: Vec<&str> = wizard.report().iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, ["healthcare", "visa"]);
    assert_eq!(wizard.report()[0].sources.len(), 1);
    assert_eq!(h.provider.call_count().await, 2);

    let page = h.flow.preview_document(&wizard, 1800).unwrap();
    assert!(page.contains(r#"id="report-content""#));
    assert!(page.contains("30:00"));
    assert!(page.contains("For: Lisbon, Portugal"));
}

#[tokio::test]
async fn second_resume_is_a_missing_session_error() {
    let h = harness(MockProvider::new());
    let mut wizard = filled_wizard(&["visa"]);
    h.flow.start_checkout(&mut wizard).await.unwrap();

    let mut first = Wizard::new();
    let resumed = h.flow.resume(&mut first, &return_address()).await.unwrap();
    assert!(resumed.restored.is_ok());

    let mut refreshed = Wizard::new();
    let resumed = h.flow.resume(&mut refreshed, &return_address()).await.unwrap();
    assert_eq!(resumed.address.as_str(), "http://localhost:8080/");
    let err = resumed.restored.unwrap_err();
    assert!(matches!(err, EmiproError::Session(_)));
    assert_eq!(refreshed.step(), Step::UserInput);
    assert_eq!(refreshed.error(), Some(SESSION_RESTORE_FAILED_MESSAGE));
}

#[tokio::test]
async fn plain_start_does_not_resume() {
    let h = harness(MockProvider::new());
    let mut wizard = Wizard::new();
    let address = Url::parse("http://localhost:8080/").unwrap();
    assert!(h.flow.resume(&mut wizard, &address).await.is_none());
    assert_eq!(wizard.step(), Step::UserInput);
    assert!(wizard.error().is_none());
}

#[tokio::test]
async fn unreadable_store_reports_restore_failure() {
    let h = harness_with(
        config(),
        MockProvider::new(),
        MemoryStore::unreadable(),
        MockExporter::new(),
    );

    let mut wizard = Wizard::new();
    let resumed = h.flow.resume(&mut wizard, &return_address()).await.unwrap();
    assert_eq!(resumed.address.as_str(), "http://localhost:8080/");
    let err = resumed.into_result().unwrap_err();
    assert!(matches!(err, EmiproError::Session(_)));
    assert_eq!(wizard.step(), Step::UserInput);
    assert_eq!(wizard.error(), Some(SESSION_RESTORE_FAILED_MESSAGE));
    assert_eq!(h.provider.call_count().await, 0);
}

#[tokio::test]
async fn resume_needs_no_payment_processor() {
    let provider = MockProvider::with_replies(vec![MockReply::text("## Visas")]);
    let store = Arc::new(MemoryStore::new());
    let with_payment = ReportFlow::new(
        config(),
        Arc::new(provider.clone()),
        store.clone(),
        Arc::new(MockExporter::new()),
    )
    .with_checkout(Arc::new(MockCheckout::new()));
    let mut wizard = filled_wizard(&["visa"]);
    with_payment.start_checkout(&mut wizard).await.unwrap();

    let flow = ReportFlow::new(
        config(),
        Arc::new(provider),
        store,
        Arc::new(MockExporter::new()),
    );
    let mut wizard = Wizard::new();
    flow.resume(&mut wizard, &return_address())
        .await
        .unwrap()
        .into_result()
        .unwrap();
    flow.generate(&mut wizard).await.unwrap();
    assert_eq!(wizard.step(), Step::Preview);
}

#[tokio::test]
async fn checkout_without_payment_processor_saves_nothing() {
    let store = Arc::new(MemoryStore::new());
    let flow = ReportFlow::new(
        config(),
        Arc::new(MockProvider::new()),
        store.clone(),
        Arc::new(MockExporter::new()),
    );

    let mut wizard = filled_wizard(&["visa"]);
    let err = flow.start_checkout(&mut wizard).await.unwrap_err();
    assert!(matches!(err, EmiproError::Config(_)));
    assert_eq!(wizard.error(), Some(PAYMENT_UNAVAILABLE_MESSAGE));
    assert!(store.peek("emigrationReportData").await.is_none());
}

#[tokio::test]
async fn missing_price_blocks_checkout_before_saving() {
    let mut config = config();
    config.payment.price_id = Some(String::new());
    if std::env::var("STRIPE_PRICE_ID").is_ok_and(|v| !v.is_empty()) {
        return;
    }
    let h = harness_with(config, MockProvider::new(), MemoryStore::new(), MockExporter::new());

    let mut wizard = filled_wizard(&["visa"]);
    let err = h.flow.start_checkout(&mut wizard).await.unwrap_err();
    assert!(matches!(err, EmiproError::Config(_)));
    assert_eq!(wizard.step(), Step::ConcernSelection);
    assert_eq!(wizard.error(), Some(PAYMENT_UNAVAILABLE_MESSAGE));
    assert!(h.store.peek("emigrationReportData").await.is_none());
    assert!(h.checkout.requests().await.is_empty());
}

#[tokio::test]
async fn unavailable_store_blocks_payment() {
    let h = harness_with(
        config(),
        MockProvider::new(),
        MemoryStore::unavailable(),
        MockExporter::new(),
    );

    let mut wizard = filled_wizard(&["finance"]);
    let err = h.flow.start_checkout(&mut wizard).await.unwrap_err();
    assert!(matches!(err, EmiproError::Storage { .. }));
    assert_eq!(wizard.step(), Step::ConcernSelection);
    assert_eq!(wizard.error(), Some(SESSION_SAVE_FAILED_MESSAGE));
    assert!(h.checkout.requests().await.is_empty());
}

#[tokio::test]
async fn failed_section_aborts_run_and_returns_to_selection() {
    let h = harness(MockProvider::with_replies(vec![
        MockReply::text("## Clinics"),
        MockReply::fail("quota exceeded"),
    ]));
    let mut wizard = filled_wizard(&["healthcare", "situation", "visa"]);
    h.flow.start_checkout(&mut wizard).await.unwrap();

    let mut wizard = Wizard::new();
    h.flow
        .resume(&mut wizard, &return_address())
        .await
        .unwrap()
        .into_result()
        .unwrap();
    let err = h.flow.generate(&mut wizard).await.unwrap_err();

    assert!(matches!(err, EmiproError::Provider { .. }));
    assert_eq!(wizard.step(), Step::ConcernSelection);
    assert!(wizard.report().is_empty());
    assert_eq!(wizard.error(), Some(GENERATION_FAILED_MESSAGE));
    // No call after the failing one.
    assert_eq!(h.provider.call_count().await, 2);
}

#[tokio::test(start_paused = true)]
async fn restart_during_generation_discards_late_result() {
    let provider = MockProvider::new().with_delay(Duration::from_secs(5));
    let h = harness(provider);
    let mut wizard = filled_wizard(&["visa"]);
    h.flow.start_checkout(&mut wizard).await.unwrap();

    let mut wizard = Wizard::new();
    h.flow
        .resume(&mut wizard, &return_address())
        .await
        .unwrap()
        .into_result()
        .unwrap();
    let handle = h.flow.spawn_generation(&wizard).unwrap();

    wizard.restart();
    let (epoch, result) = handle.join().await;
    assert!(result.is_ok());
    assert!(!wizard.finish_generation(epoch, result));
    assert_eq!(wizard.step(), Step::UserInput);
    assert!(wizard.report().is_empty());
}

#[tokio::test(start_paused = true)]
async fn preview_expires_after_the_configured_window() {
    let h = harness(MockProvider::new());
    let mut wizard = filled_wizard(&["visa"]);
    h.flow.start_checkout(&mut wizard).await.unwrap();
    let mut wizard = Wizard::new();
    h.flow
        .resume(&mut wizard, &return_address())
        .await
        .unwrap()
        .into_result()
        .unwrap();
    h.flow.generate(&mut wizard).await.unwrap();

    let timer = ExpiryTimer::start(h.flow.config().session.expiry_secs);
    tokio::time::sleep(Duration::from_millis(1_799_500)).await;
    assert_eq!(timer.remaining(), 1);
    assert_eq!(wizard.step(), Step::Preview);

    tokio::select! {
        _ = timer.expired() => wizard.expire(),
        _ = tokio::time::sleep(Duration::from_secs(5)) => panic!("timer did not expire"),
    }
    assert_eq!(wizard.step(), Step::UserInput);
    assert!(wizard.report().is_empty());
    assert_eq!(wizard.notice(), Some(REPORT_EXPIRED_MESSAGE));
}

#[tokio::test]
async fn export_uses_city_file_name_and_container() {
    let h = harness(MockProvider::new());
    let mut wizard = filled_wizard(&["visa"]);
    h.flow.start_checkout(&mut wizard).await.unwrap();
    let mut wizard = Wizard::new();
    h.flow
        .resume(&mut wizard, &return_address())
        .await
        .unwrap()
        .into_result()
        .unwrap();
    h.flow.generate(&mut wizard).await.unwrap();

    let output = h.flow.export_pdf(&wizard).await.unwrap();
    assert_eq!(output.path.to_str(), Some("Emigration_Pro_Report_Lisbon.pdf"));

    let requests = h.exporter.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].title, "Emigration Pro Report");
    assert!(requests[0].container_html.contains(r#"<section id="section-visa">"#));
}

#[tokio::test]
async fn export_failure_leaves_preview_intact() {
    let h = harness_with(
        config(),
        MockProvider::new(),
        MemoryStore::new(),
        MockExporter::failing(),
    );
    let mut wizard = filled_wizard(&["visa"]);
    h.flow.start_checkout(&mut wizard).await.unwrap();
    let mut wizard = Wizard::new();
    h.flow
        .resume(&mut wizard, &return_address())
        .await
        .unwrap()
        .into_result()
        .unwrap();
    h.flow.generate(&mut wizard).await.unwrap();

    let err = h.flow.export_pdf(&wizard).await.unwrap_err();
    assert_eq!(err.user_message(), EXPORT_FAILED_MESSAGE);
    assert_eq!(wizard.step(), Step::Preview);
    assert_eq!(wizard.report().len(), 1);
}

#[tokio::test]
async fn export_before_preview_is_refused() {
    let h = harness(MockProvider::new());
    let wizard = filled_wizard(&["visa"]);
    assert!(h.flow.export_pdf(&wizard).await.is_err());
    assert!(h.exporter.requests().await.is_empty());
}
