// SPDX-FileCopyrightText: 2026 Emipro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Checkout adapter trait for the redirect-based payment backend.

use async_trait::async_trait;

use crate::error::EmiproError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{CheckoutRequest, CheckoutSession};

/// Adapter for a hosted checkout page.
///
/// The application leaves for the returned redirect URL and resumes when the
/// processor sends the user back to `success_url`.
#[async_trait]
pub trait CheckoutAdapter: PluginAdapter {
    /// Creates a checkout and returns where to send the user.
    async fn create_checkout(
        &self,
        request: CheckoutRequest,
    ) -> Result<CheckoutSession, EmiproError>;
}
