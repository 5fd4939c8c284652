// SPDX-FileCopyrightText: 2026 Emipro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hosted checkout adapter for the Emipro report generator.
//!
//! Implements [`CheckoutAdapter`] on top of Stripe Checkout Sessions and
//! builds the one-item payment request from configuration.

pub mod client;

use async_trait::async_trait;
use emipro_config::model::{PaymentConfig, SessionConfig};
use emipro_core::error::EmiproError;
use emipro_core::traits::{CheckoutAdapter, PluginAdapter};
use emipro_core::types::{AdapterType, CheckoutRequest, CheckoutSession, HealthStatus};
use tracing::{debug, error, info};

use crate::client::StripeClient;

/// Stripe checkout implementing [`CheckoutAdapter`].
///
/// Secret key resolution order: config -> `STRIPE_SECRET_KEY` env var -> error.
pub struct StripeCheckout {
    client: StripeClient,
}

impl StripeCheckout {
    /// Creates the adapter. Fails with [`EmiproError::Config`] when no secret key is set.
    pub fn new(config: &PaymentConfig) -> Result<Self, EmiproError> {
        let secret_key = resolve_setting(&config.secret_key, "STRIPE_SECRET_KEY", |name| {
            std::env::var(name).ok()
        })
        .ok_or_else(|| {
            error!("checkout configuration error: no secret key in payment.secret_key or STRIPE_SECRET_KEY");
            EmiproError::Config("payment secret key is not configured".into())
        })?;

        let client = StripeClient::new(secret_key, config.api_base.clone())?;
        info!(api_base = %config.api_base, "Stripe checkout initialized");
        Ok(Self { client })
    }
}

/// Builds the one-time payment request for the report.
///
/// The success URL is `return_url` with `{success_param}=true` appended; the
/// cancel URL is `return_url` unchanged. Fails with [`EmiproError::Config`]
/// when no price is configured.
pub fn build_checkout_request(
    payment: &PaymentConfig,
    session: &SessionConfig,
) -> Result<CheckoutRequest, EmiproError> {
    let price_id = resolve_setting(&payment.price_id, "STRIPE_PRICE_ID", |name| {
        std::env::var(name).ok()
    })
    .ok_or_else(|| {
        error!("checkout configuration error: no price in payment.price_id or STRIPE_PRICE_ID");
        EmiproError::Config("payment price id is not configured".into())
    })?;

    let mut success_url = url::Url::parse(&payment.return_url)
        .map_err(|e| EmiproError::Config(format!("invalid payment.return_url: {e}")))?;
    success_url
        .query_pairs_mut()
        .append_pair(&session.success_param, "true");

    Ok(CheckoutRequest {
        price_id,
        quantity: 1,
        success_url: success_url.into(),
        cancel_url: payment.return_url.clone(),
    })
}

/// A non-empty configured value, else a non-empty env value.
fn resolve_setting(
    configured: &Option<String>,
    env_name: &str,
    env: impl Fn(&str) -> Option<String>,
) -> Option<String> {
    configured
        .clone()
        .filter(|v| !v.is_empty())
        .or_else(|| env(env_name).filter(|v| !v.is_empty()))
}

#[async_trait]
impl PluginAdapter for StripeCheckout {
    fn name(&self) -> &str {
        "stripe"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Checkout
    }

    async fn health_check(&self) -> Result<HealthStatus, EmiproError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), EmiproError> {
        debug!("Stripe checkout shutting down");
        Ok(())
    }
}

#[async_trait]
impl CheckoutAdapter for StripeCheckout {
    async fn create_checkout(
        &self,
        request: CheckoutRequest,
    ) -> Result<CheckoutSession, EmiproError> {
        let session = self.client.create_session(&request).await?;
        info!(session_id = %session.id, "checkout session created");
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment(price: Option<&str>, return_url: &str) -> PaymentConfig {
        PaymentConfig {
            secret_key: Some("sk_test".into()),
            price_id: price.map(String::from),
            return_url: return_url.into(),
            ..PaymentConfig::default()
        }
    }

    #[test]
    fn request_appends_success_param() {
        let request = build_checkout_request(
            &payment(Some("price_1"), "http://localhost:8080/"),
            &SessionConfig::default(),
        )
        .unwrap();
        assert_eq!(request.price_id, "price_1");
        assert_eq!(request.quantity, 1);
        assert_eq!(
            request.success_url,
            "http://localhost:8080/?payment_success=true"
        );
        assert_eq!(request.cancel_url, "http://localhost:8080/");
    }

    #[test]
    fn existing_query_is_preserved() {
        let request = build_checkout_request(
            &payment(Some("price_1"), "https://app.example.com/report?lang=en"),
            &SessionConfig::default(),
        )
        .unwrap();
        assert_eq!(
            request.success_url,
            "https://app.example.com/report?lang=en&payment_success=true"
        );
    }

    #[test]
    fn setting_prefers_config_over_env() {
        let value = resolve_setting(&Some("cfg".into()), "X", |_| Some("env".into()));
        assert_eq!(value.as_deref(), Some("cfg"));
        let value = resolve_setting(&Some(String::new()), "X", |_| Some("env".into()));
        assert_eq!(value.as_deref(), Some("env"));
        let value = resolve_setting(&None, "X", |_| Some(String::new()));
        assert_eq!(value, None);
    }

    #[test]
    fn config_error_maps_to_unavailable_message() {
        let err = EmiproError::Config("payment price id is not configured".into());
        assert_eq!(
            err.user_message(),
            emipro_core::error::PAYMENT_UNAVAILABLE_MESSAGE
        );
    }
}
