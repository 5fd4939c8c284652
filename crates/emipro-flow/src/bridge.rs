// SPDX-FileCopyrightText: 2026 Emipro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Carries the pending session across the payment redirect.
//!
//! The record is written just before checkout and consumed exactly once when
//! the user comes back with the success signal in the return address.

use std::sync::Arc;

use emipro_core::{EmiproError, PendingSession, SessionStore};
use tracing::{error, info, warn};
use url::Url;

/// Saves and restores the [`PendingSession`] under one fixed key.
#[derive(Clone)]
pub struct SessionBridge {
    store: Arc<dyn SessionStore>,
    key: String,
    success_param: String,
}

impl SessionBridge {
    pub fn new(store: Arc<dyn SessionStore>, key: String, success_param: String) -> Self {
        Self {
            store,
            key,
            success_param,
        }
    }

    /// Persists the session, replacing any earlier one.
    ///
    /// A failed write is returned as is; the caller must not proceed to payment.
    pub async fn save(&self, session: &PendingSession) -> Result<(), EmiproError> {
        let raw = serde_json::to_string(session)
            .map_err(|e| EmiproError::Internal(format!("cannot serialize pending session: {e}")))?;
        self.store.put(&self.key, &raw).await.inspect_err(|e| {
            error!(error = %e, "failed to save pending session");
        })?;
        info!(topics = session.topics.len(), "pending session saved");
        Ok(())
    }

    /// Whether `address` carries the payment success signal.
    ///
    /// Any non-empty value counts.
    pub fn has_success_signal(&self, address: &Url) -> bool {
        address
            .query_pairs()
            .any(|(name, value)| name == self.success_param.as_str() && !value.is_empty())
    }

    /// `address` with the success signal removed and other parameters kept.
    pub fn strip_success_signal(&self, address: &Url) -> Url {
        let kept: Vec<(String, String)> = address
            .query_pairs()
            .filter(|(name, _)| name != self.success_param.as_str())
            .map(|(n, v)| (n.into_owned(), v.into_owned()))
            .collect();

        let mut clean = address.clone();
        if kept.is_empty() {
            clean.set_query(None);
        } else {
            clean.query_pairs_mut().clear().extend_pairs(kept);
        }
        clean
    }

    /// Consumes the pending session if `address` signals a completed payment.
    ///
    /// Returns `Ok(None)` when there is no signal. With a signal, the stored
    /// record is deleted before it is parsed, so it can never be replayed; a
    /// missing, unreadable, or empty record is a [`EmiproError::Session`] error,
    /// and so is a store that fails on the read itself.
    pub async fn restore(&self, address: &Url) -> Result<Option<PendingSession>, EmiproError> {
        if !self.has_success_signal(address) {
            return Ok(None);
        }

        let stored = self.store.take(&self.key).await.map_err(|e| {
            error!(error = %e, "failed to read pending session");
            EmiproError::Session(format!("pending session could not be read: {e}"))
        })?;
        let raw = stored.ok_or_else(|| {
            warn!("payment success signal present but no pending session stored");
            EmiproError::Session("no pending session was found".into())
        })?;

        let session: PendingSession = serde_json::from_str(&raw).map_err(|e| {
            warn!(error = %e, "stored pending session is malformed");
            EmiproError::Session(format!("stored session is malformed: {e}"))
        })?;

        if session.topics.is_empty() {
            return Err(EmiproError::Session(
                "stored session has no selected topics".into(),
            ));
        }

        info!(topics = session.topics.len(), "pending session restored");
        Ok(Some(session))
    }
}

/// Parses a return address typed or pasted by the user.
pub fn parse_address(address: &str) -> Result<Url, EmiproError> {
    Url::parse(address.trim())
        .map_err(|e| EmiproError::Validation(format!("`{address}` is not a valid address: {e}")))
}
