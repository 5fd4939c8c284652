// SPDX-FileCopyrightText: 2026 Emipro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Minimal Stripe Checkout Sessions client.

use std::time::Duration;

use emipro_core::EmiproError;
use emipro_core::types::{CheckoutRequest, CheckoutSession};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct SessionResponse {
    id: String,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
}

/// HTTP client for `POST /checkout/sessions`.
#[derive(Debug, Clone)]
pub struct StripeClient {
    client: reqwest::Client,
    secret_key: String,
    base_url: String,
}

impl StripeClient {
    /// Creates a client authenticating with `secret_key` against `base_url`
    /// (e.g. `https://api.stripe.com/v1`).
    pub fn new(secret_key: String, base_url: String) -> Result<Self, EmiproError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| EmiproError::Checkout {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            secret_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Creates a one-time payment session for a single line item.
    ///
    /// Transport failures carry their source; a rejection by the processor
    /// carries only its message.
    pub async fn create_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, EmiproError> {
        let quantity = request.quantity.to_string();
        let form = [
            ("mode", "payment"),
            ("line_items[0][price]", request.price_id.as_str()),
            ("line_items[0][quantity]", quantity.as_str()),
            ("success_url", request.success_url.as_str()),
            ("cancel_url", request.cancel_url.as_str()),
        ];

        let response = self
            .client
            .post(format!("{}/checkout/sessions", self.base_url))
            .bearer_auth(&self.secret_key)
            .form(&form)
            .send()
            .await
            .map_err(|e| EmiproError::Checkout {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, "checkout session response received");

        let body = response.text().await.map_err(|e| EmiproError::Checkout {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .map(|api_err| api_err.error.message)
                .unwrap_or_else(|_| format!("processor returned {status}"));
            return Err(EmiproError::checkout(message));
        }

        let session: SessionResponse = serde_json::from_str(&body).map_err(|e| {
            EmiproError::checkout(format!("unreadable checkout session response: {e}"))
        })?;

        let redirect_url = session
            .url
            .ok_or_else(|| EmiproError::checkout("checkout session has no redirect URL"))?;

        Ok(CheckoutSession {
            id: session.id,
            redirect_url,
        })
    }
}
