// SPDX-FileCopyrightText: 2026 Emipro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Emipro report generator.

use thiserror::Error;

/// Shown when a section generation call fails and the run is aborted.
pub const GENERATION_FAILED_MESSAGE: &str =
    "An error occurred while generating the report. Please check your API key and try again.";

/// Shown when the pending session cannot be written before checkout.
pub const SESSION_SAVE_FAILED_MESSAGE: &str =
    "Could not save your session. Please ensure your browser allows site data storage.";

/// Shown when the pending session cannot be recovered after payment.
pub const SESSION_RESTORE_FAILED_MESSAGE: &str =
    "There was an issue retrieving your session after payment. Please start over.";

/// Shown when the generative-AI backend has no usable credentials.
pub const GENERATION_UNAVAILABLE_MESSAGE: &str =
    "Report generation is unavailable. Set gemini.api_key or GEMINI_API_KEY and try again.";

/// Shown when checkout is not configured.
pub const PAYMENT_UNAVAILABLE_MESSAGE: &str =
    "Payment processing is currently unavailable. Please contact support.";

/// Shown when the payment processor cannot be reached.
pub const PAYMENT_UNREACHABLE_MESSAGE: &str =
    "Could not connect to the payment processor. Please try again later.";

/// Shown when PDF assembly fails.
pub const EXPORT_FAILED_MESSAGE: &str = "Sorry, there was an error generating the PDF.";

/// Blocking notice shown when the report preview expires.
pub const REPORT_EXPIRED_MESSAGE: &str = "Your 30-minute session has expired, and the report is no longer available. Please start over to generate a new report.";

/// The primary error type used across all Emipro adapter traits and core operations.
#[derive(Debug, Error)]
pub enum EmiproError {
    /// Configuration errors (invalid TOML, missing keys, incomplete payment setup).
    #[error("configuration error: {0}")]
    Config(String),

    /// Generative-AI backend misconfigured (no API key, unusable key).
    #[error("provider configuration error: {0}")]
    ProviderConfig(String),

    /// Durable key-value store errors (database unavailable, write failure).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Generative-AI backend errors (transport failure, API error, unreadable body).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Payment checkout errors (processor rejected the request or was unreachable).
    #[error("checkout error: {message}")]
    Checkout {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// PDF export errors (layout, font, or file assembly failure).
    #[error("export error: {message}")]
    Export {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Pending session missing, malformed, or already consumed.
    #[error("session error: {0}")]
    Session(String),

    /// User-supplied input failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// A topic identifier did not resolve to a catalog entry.
    #[error("unknown topic `{0}`")]
    UnknownTopic(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl EmiproError {
    /// Creates a provider error without an underlying source.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a checkout error without an underlying source.
    pub fn checkout(message: impl Into<String>) -> Self {
        Self::Checkout {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an export error without an underlying source.
    pub fn export(message: impl Into<String>) -> Self {
        Self::Export {
            message: message.into(),
            source: None,
        }
    }

    /// Wraps any error as a storage error.
    pub fn storage(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Storage {
            source: source.into(),
        }
    }

    /// The human-readable message a user sees for this error.
    ///
    /// Every failure in the wizard is converted at its boundary through this
    /// method; none surface as raw error text.
    pub fn user_message(&self) -> String {
        match self {
            EmiproError::Provider { .. } | EmiproError::UnknownTopic(_) => {
                GENERATION_FAILED_MESSAGE.to_string()
            }
            EmiproError::Storage { .. } => SESSION_SAVE_FAILED_MESSAGE.to_string(),
            EmiproError::Session(_) => SESSION_RESTORE_FAILED_MESSAGE.to_string(),
            EmiproError::Config(_) => PAYMENT_UNAVAILABLE_MESSAGE.to_string(),
            EmiproError::ProviderConfig(_) => GENERATION_UNAVAILABLE_MESSAGE.to_string(),
            EmiproError::Checkout { message, source } => match source {
                Some(_) => PAYMENT_UNREACHABLE_MESSAGE.to_string(),
                None => format!("Payment error: {message}"),
            },
            EmiproError::Export { .. } => EXPORT_FAILED_MESSAGE.to_string(),
            EmiproError::Validation(message) => message.clone(),
            EmiproError::Internal(_) => {
                "Something went wrong. Please start over.".to_string()
            }
        }
    }
}
