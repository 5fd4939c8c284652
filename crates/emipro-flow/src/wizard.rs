// SPDX-FileCopyrightText: 2026 Emipro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The report wizard: step machine plus the async operations that move it.
//!
//! [`Wizard`] is plain state with no I/O. [`ReportFlow`] owns the adapters
//! and performs the save, checkout, resume, generation and export operations,
//! converting every failure into a user message on the wizard.

use std::sync::Arc;

use emipro_checkout::build_checkout_request;
use emipro_config::EmiproConfig;
use emipro_core::types::{CheckoutSession, ExportOutput, ExportRequest};
use emipro_core::error::REPORT_EXPIRED_MESSAGE;
use emipro_core::{
    CheckoutAdapter, EmiproError, ExportAdapter, PendingSession, Profile, ProviderAdapter,
    SectionResult, SessionStore,
};
use emipro_report::{catalog, preview};
use strum::Display;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::bridge::SessionBridge;
use crate::orchestrator::{GenerationState, ReportOrchestrator};

/// Wizard steps, in the order a user normally visits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum Step {
    #[default]
    #[strum(serialize = "user input")]
    UserInput,
    #[strum(serialize = "concern selection")]
    ConcernSelection,
    #[strum(serialize = "payment")]
    Payment,
    #[strum(serialize = "generating")]
    Generating,
    #[strum(serialize = "preview")]
    Preview,
}

/// Message shown when no concern was picked.
pub const EMPTY_SELECTION_MESSAGE: &str = "Please select at least one concern.";

/// In-memory wizard state.
///
/// Every generation run is tagged with an epoch. Progress and results carrying
/// an older epoch are dropped, so a run that outlives a restart or an expiry
/// never writes into the fresh state.
#[derive(Debug, Default)]
pub struct Wizard {
    step: Step,
    profile: Option<Profile>,
    topics: Vec<String>,
    progress: GenerationState,
    report: Vec<SectionResult>,
    error: Option<String>,
    notice: Option<String>,
    epoch: u64,
}

impl Wizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    /// Progress of the run in flight, including its partial sections.
    pub fn progress(&self) -> &GenerationState {
        &self.progress
    }

    /// Finished report sections. Empty unless the wizard is in [`Step::Preview`].
    pub fn report(&self) -> &[SectionResult] {
        &self.report
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Blocking notice, such as the expiry message.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    pub fn submit_profile(&mut self, profile: Profile) {
        self.profile = Some(profile);
        self.error = None;
        self.step = Step::ConcernSelection;
    }

    /// Records the concern selection. An empty or unknown selection is rejected
    /// and the step does not change.
    pub fn select_topics(&mut self, topic_ids: Vec<String>) -> Result<(), EmiproError> {
        if topic_ids.is_empty() {
            let err = EmiproError::Validation(EMPTY_SELECTION_MESSAGE.into());
            self.fail(&err);
            return Err(err);
        }
        if let Err(err) = catalog::resolve(&topic_ids[..]) {
            self.fail(&err);
            return Err(err);
        }
        self.topics = topic_ids;
        self.error = None;
        Ok(())
    }

    /// The record to persist before leaving for payment.
    pub fn pending_session(&self) -> Result<PendingSession, EmiproError> {
        let profile = self
            .profile
            .clone()
            .ok_or_else(|| EmiproError::Validation("Please complete your profile first.".into()))?;
        if self.topics.is_empty() {
            return Err(EmiproError::Validation(EMPTY_SELECTION_MESSAGE.into()));
        }
        Ok(PendingSession {
            profile,
            topics: self.topics.clone(),
        })
    }

    pub fn enter_payment(&mut self) {
        self.error = None;
        self.step = Step::Payment;
    }

    /// One step back. Only the input steps go back; the others stay put.
    pub fn back(&mut self) {
        self.step = match self.step {
            Step::Payment => Step::ConcernSelection,
            Step::ConcernSelection => Step::UserInput,
            other => other,
        };
    }

    /// Enters [`Step::Generating`] for `session` and returns the run's epoch.
    pub fn begin_generation(&mut self, session: PendingSession) -> u64 {
        self.epoch += 1;
        self.profile = Some(session.profile);
        self.topics = session.topics;
        self.progress = GenerationState::default();
        self.report.clear();
        self.error = None;
        self.step = Step::Generating;
        self.epoch
    }

    /// Applies a progress snapshot. Returns `false` when it belongs to a stale run.
    pub fn apply_progress(&mut self, epoch: u64, state: GenerationState) -> bool {
        if !self.is_current(epoch) {
            return false;
        }
        self.progress = state;
        true
    }

    /// Settles a run. Success moves to the preview; failure discards partial
    /// sections and returns to concern selection with the error.
    ///
    /// Returns `false` and changes nothing when `epoch` is stale.
    pub fn finish_generation(
        &mut self,
        epoch: u64,
        result: Result<Vec<SectionResult>, EmiproError>,
    ) -> bool {
        match result {
            Ok(sections) => self.complete_generation(epoch, sections),
            Err(err) => self.abort_generation(epoch, &err),
        }
    }

    /// Success half of [`Wizard::finish_generation`].
    pub fn complete_generation(&mut self, epoch: u64, sections: Vec<SectionResult>) -> bool {
        if !self.is_current(epoch) {
            debug!(epoch, current = self.epoch, "dropping result of a stale generation run");
            return false;
        }
        self.report = sections;
        self.error = None;
        self.step = Step::Preview;
        true
    }

    /// Failure half of [`Wizard::finish_generation`].
    pub fn abort_generation(&mut self, epoch: u64, err: &EmiproError) -> bool {
        if !self.is_current(epoch) {
            debug!(epoch, current = self.epoch, "dropping failure of a stale generation run");
            return false;
        }
        error!(error = %err, "report generation aborted");
        self.report.clear();
        self.progress = GenerationState::default();
        self.error = Some(err.user_message());
        self.step = Step::ConcernSelection;
        true
    }

    /// Back to the first step with everything cleared.
    pub fn restart(&mut self) {
        self.epoch += 1;
        self.step = Step::UserInput;
        self.profile = None;
        self.topics.clear();
        self.progress = GenerationState::default();
        self.report.clear();
        self.error = None;
        self.notice = None;
    }

    /// The preview window ran out.
    pub fn expire(&mut self) {
        info!("report expired, restarting wizard");
        self.restart();
        self.notice = Some(REPORT_EXPIRED_MESSAGE.to_string());
    }

    /// A payment return could not be resumed.
    pub fn fail_restore(&mut self, err: &EmiproError) {
        self.restart();
        self.error = Some(err.user_message());
    }

    /// Surfaces `err` without leaving the current step.
    pub fn fail(&mut self, err: &EmiproError) {
        self.error = Some(err.user_message());
    }

    fn is_current(&self, epoch: u64) -> bool {
        epoch == self.epoch && self.step == Step::Generating
    }
}

/// A generation run spawned onto the runtime.
pub struct GenerationHandle {
    pub epoch: u64,
    /// Progress snapshots, including partial sections.
    pub progress: watch::Receiver<GenerationState>,
    task: JoinHandle<Result<Vec<SectionResult>, EmiproError>>,
}

impl GenerationHandle {
    /// Waits for the run to settle.
    pub async fn join(self) -> (u64, Result<Vec<SectionResult>, EmiproError>) {
        let result = match self.task.await {
            Ok(result) => result,
            Err(e) => Err(EmiproError::Internal(format!("generation task failed: {e}"))),
        };
        (self.epoch, result)
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Outcome of reopening the application with the success signal.
#[derive(Debug)]
pub struct Resumption {
    /// The return address with the success signal removed.
    pub address: Url,
    /// Whether the pending session was recovered.
    pub restored: Result<(), EmiproError>,
}

impl Resumption {
    /// The cleaned address, or the restore error.
    pub fn into_result(self) -> Result<Url, EmiproError> {
        self.restored.map(|()| self.address)
    }
}

/// The adapters and settings the wizard operations need.
pub struct ReportFlow {
    config: EmiproConfig,
    orchestrator: ReportOrchestrator,
    bridge: SessionBridge,
    checkout: Option<Arc<dyn CheckoutAdapter>>,
    exporter: Arc<dyn ExportAdapter>,
}

impl ReportFlow {
    /// Creates a flow without a checkout adapter; see [`ReportFlow::with_checkout`].
    pub fn new(
        config: EmiproConfig,
        provider: Arc<dyn ProviderAdapter>,
        store: Arc<dyn SessionStore>,
        exporter: Arc<dyn ExportAdapter>,
    ) -> Self {
        let bridge = SessionBridge::new(
            store,
            config.session.storage_key.clone(),
            config.session.success_param.clone(),
        );
        Self {
            orchestrator: ReportOrchestrator::new(provider),
            bridge,
            checkout: None,
            exporter,
            config,
        }
    }

    /// Attaches the payment processor used by [`ReportFlow::start_checkout`].
    pub fn with_checkout(mut self, checkout: Arc<dyn CheckoutAdapter>) -> Self {
        self.checkout = Some(checkout);
        self
    }

    pub fn config(&self) -> &EmiproConfig {
        &self.config
    }

    pub fn bridge(&self) -> &SessionBridge {
        &self.bridge
    }

    /// Saves the pending session and opens a checkout.
    ///
    /// Payment configuration is checked before anything is written, and
    /// checkout is never attempted when the save fails. On success the wizard
    /// is in [`Step::Payment`].
    pub async fn start_checkout(
        &self,
        wizard: &mut Wizard,
    ) -> Result<CheckoutSession, EmiproError> {
        let outcome = self.try_checkout(wizard).await;
        match &outcome {
            Ok(session) => {
                info!(session = %session.id, "checkout created");
                wizard.enter_payment();
            }
            Err(err) => {
                warn!(error = %err, "checkout blocked");
                wizard.fail(err);
            }
        }
        outcome
    }

    async fn try_checkout(&self, wizard: &Wizard) -> Result<CheckoutSession, EmiproError> {
        let pending = wizard.pending_session()?;
        let checkout = self
            .checkout
            .as_ref()
            .ok_or_else(|| EmiproError::Config("no payment processor is attached".into()))?;
        let request = build_checkout_request(&self.config.payment, &self.config.session)?;
        self.bridge.save(&pending).await?;
        checkout.create_checkout(request).await
    }

    /// Handles the address the application was (re)opened with.
    ///
    /// Without a success signal this is a no-op returning `None`. With one,
    /// the pending session is consumed and the wizard enters
    /// [`Step::Generating`]. A missing or unreadable record restarts the
    /// wizard with an error instead. Either way the returned
    /// [`Resumption`] carries the address without the signal.
    pub async fn resume(&self, wizard: &mut Wizard, address: &Url) -> Option<Resumption> {
        let restored = match self.bridge.restore(address).await {
            Ok(Some(session)) => {
                wizard.begin_generation(session);
                Ok(())
            }
            Ok(None) => return None,
            Err(err) => {
                wizard.fail_restore(&err);
                Err(err)
            }
        };
        Some(Resumption {
            address: self.bridge.strip_success_signal(address),
            restored,
        })
    }

    /// Spawns the generation run for the wizard's current profile and topics.
    pub fn spawn_generation(&self, wizard: &Wizard) -> Result<GenerationHandle, EmiproError> {
        if wizard.step() != Step::Generating {
            return Err(EmiproError::Internal(format!(
                "cannot generate from the {} step",
                wizard.step()
            )));
        }
        let profile = wizard
            .profile()
            .cloned()
            .ok_or_else(|| EmiproError::Internal("generation started without a profile".into()))?;
        let topics = wizard.topics().to_vec();
        let orchestrator = self.orchestrator.clone();
        let (tx, progress) = watch::channel(GenerationState::default());

        let task = tokio::spawn(async move { orchestrator.run(&profile, &topics, &tx).await });

        Ok(GenerationHandle {
            epoch: wizard.epoch(),
            progress,
            task,
        })
    }

    /// Runs generation to completion, mirroring progress into the wizard.
    pub async fn generate(&self, wizard: &mut Wizard) -> Result<(), EmiproError> {
        let mut handle = self.spawn_generation(wizard)?;
        while handle.progress.changed().await.is_ok() {
            let snapshot = handle.progress.borrow_and_update().clone();
            wizard.apply_progress(handle.epoch, snapshot);
        }
        match handle.join().await {
            (epoch, Ok(sections)) => {
                wizard.complete_generation(epoch, sections);
                Ok(())
            }
            (epoch, Err(err)) => {
                wizard.abort_generation(epoch, &err);
                Err(err)
            }
        }
    }

    /// The standalone preview page with the countdown notice.
    pub fn preview_document(&self, wizard: &Wizard, seconds_left: u64) -> Option<String> {
        let profile = wizard.profile()?;
        if wizard.step() != Step::Preview {
            return None;
        }
        Some(preview::render_document(
            &self.config.app.report_title,
            profile,
            wizard.report(),
            &generated_on(),
            seconds_left,
        ))
    }

    /// The export request for the previewed report.
    pub fn export_request(&self, wizard: &Wizard) -> Result<ExportRequest, EmiproError> {
        let profile = match (wizard.step(), wizard.profile()) {
            (Step::Preview, Some(profile)) => profile,
            _ => return Err(EmiproError::export("no report is available to export")),
        };
        Ok(ExportRequest {
            container_html: preview::render_container(
                &self.config.app.report_title,
                profile,
                wizard.report(),
                &generated_on(),
            ),
            file_name: self.config.export.file_name_for(&profile.destination_city),
            title: self.config.app.report_title.clone(),
        })
    }

    /// Exports the previewed report. The wizard state is left untouched either way.
    pub async fn export_pdf(&self, wizard: &Wizard) -> Result<ExportOutput, EmiproError> {
        let request = self.export_request(wizard)?;
        self.exporter.export(request).await.inspect_err(|e| {
            error!(error = %e, "pdf export failed");
        })
    }
}

/// Today's date as printed on the report cover.
pub fn generated_on() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use emipro_core::error::{GENERATION_FAILED_MESSAGE, SESSION_RESTORE_FAILED_MESSAGE};
    use emipro_core::{Lifestyle, SectionContent};

    fn profile() -> Profile {
        Profile {
            destination_country: "Spain".into(),
            destination_city: "Valencia".into(),
            profession: "Nurse".into(),
            age: "41".into(),
            lifestyle: Lifestyle::BudgetConscious,
        }
    }

    fn session() -> PendingSession {
        PendingSession {
            profile: profile(),
            topics: vec!["visa".into()],
        }
    }

    fn section(id: &str) -> SectionResult {
        SectionResult {
            id: id.into(),
            title: id.into(),
            content: SectionContent::Markdown("body".into()),
            sources: vec![],
        }
    }

    #[test]
    fn happy_path_walks_every_step() {
        let mut wizard = Wizard::new();
        assert_eq!(wizard.step(), Step::UserInput);

        wizard.submit_profile(profile());
        assert_eq!(wizard.step(), Step::ConcernSelection);

        wizard.select_topics(vec!["visa".into()]).unwrap();
        let pending = wizard.pending_session().unwrap();
        assert_eq!(pending.topics, vec!["visa".to_string()]);

        wizard.enter_payment();
        assert_eq!(wizard.step(), Step::Payment);

        let epoch = wizard.begin_generation(pending);
        assert_eq!(wizard.step(), Step::Generating);
        assert!(wizard.finish_generation(epoch, Ok(vec![section("visa")])));
        assert_eq!(wizard.step(), Step::Preview);
        assert_eq!(wizard.report().len(), 1);
    }

    #[test]
    fn empty_selection_is_rejected() {
        let mut wizard = Wizard::new();
        wizard.submit_profile(profile());
        let err = wizard.select_topics(vec![]).unwrap_err();
        assert!(matches!(err, EmiproError::Validation(_)));
        assert_eq!(wizard.error(), Some(EMPTY_SELECTION_MESSAGE));
        assert_eq!(wizard.step(), Step::ConcernSelection);
        assert!(wizard.pending_session().is_err());
    }

    #[test]
    fn unknown_topic_is_rejected() {
        let mut wizard = Wizard::new();
        wizard.submit_profile(profile());
        assert!(matches!(
            wizard.select_topics(vec!["astrology".into()]),
            Err(EmiproError::UnknownTopic(_))
        ));
        assert!(wizard.topics().is_empty());
    }

    #[test]
    fn back_from_payment_returns_to_selection() {
        let mut wizard = Wizard::new();
        wizard.submit_profile(profile());
        wizard.enter_payment();
        wizard.back();
        assert_eq!(wizard.step(), Step::ConcernSelection);
        wizard.back();
        assert_eq!(wizard.step(), Step::UserInput);
    }

    #[test]
    fn failed_run_returns_to_selection_without_partial_report() {
        let mut wizard = Wizard::new();
        let epoch = wizard.begin_generation(session());
        wizard.apply_progress(
            epoch,
            GenerationState {
                message: "Researching".into(),
                total: 2,
                sections: vec![section("healthcare")],
            },
        );
        assert_eq!(wizard.progress().completed(), 1);

        wizard.finish_generation(epoch, Err(EmiproError::provider("boom")));
        assert_eq!(wizard.step(), Step::ConcernSelection);
        assert!(wizard.report().is_empty());
        assert_eq!(wizard.progress().completed(), 0);
        assert_eq!(wizard.error(), Some(GENERATION_FAILED_MESSAGE));
    }

    #[test]
    fn stale_results_are_dropped_after_restart() {
        let mut wizard = Wizard::new();
        let stale = wizard.begin_generation(session());
        wizard.restart();

        assert!(!wizard.apply_progress(stale, GenerationState::default()));
        assert!(!wizard.finish_generation(stale, Ok(vec![section("visa")])));
        assert_eq!(wizard.step(), Step::UserInput);
        assert!(wizard.report().is_empty());
    }

    #[test]
    fn superseded_run_cannot_overwrite_newer_run() {
        let mut wizard = Wizard::new();
        let first = wizard.begin_generation(session());
        let second = wizard.begin_generation(session());
        assert_ne!(first, second);

        assert!(!wizard.finish_generation(first, Err(EmiproError::provider("late"))));
        assert_eq!(wizard.step(), Step::Generating);
        assert!(wizard.finish_generation(second, Ok(vec![section("visa")])));
        assert_eq!(wizard.step(), Step::Preview);
    }

    #[test]
    fn expire_clears_report_and_sets_notice() {
        let mut wizard = Wizard::new();
        let epoch = wizard.begin_generation(session());
        wizard.finish_generation(epoch, Ok(vec![section("visa")]));

        wizard.expire();
        assert_eq!(wizard.step(), Step::UserInput);
        assert!(wizard.report().is_empty());
        assert!(wizard.profile().is_none());
        assert_eq!(wizard.notice(), Some(REPORT_EXPIRED_MESSAGE));
        assert_eq!(wizard.take_notice().as_deref(), Some(REPORT_EXPIRED_MESSAGE));
        assert!(wizard.notice().is_none());
    }

    #[test]
    fn fail_restore_restarts_with_message() {
        let mut wizard = Wizard::new();
        wizard.submit_profile(profile());
        wizard.fail_restore(&EmiproError::Session("missing".into()));
        assert_eq!(wizard.step(), Step::UserInput);
        assert_eq!(wizard.error(), Some(SESSION_RESTORE_FAILED_MESSAGE));
    }

    #[test]
    fn step_names_read_naturally() {
        assert_eq!(Step::ConcernSelection.to_string(), "concern selection");
        assert_eq!(Step::default(), Step::UserInput);
    }
}
