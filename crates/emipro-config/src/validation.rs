// SPDX-FileCopyrightText: 2026 Emipro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks semantic constraints serde cannot express: non-empty keys,
//! positive durations, parsable URLs.

use tracing::warn;

use crate::diagnostic::ConfigError;
use crate::model::EmiproConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every problem instead of stopping at the first one.
pub fn validate_config(config: &EmiproConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::validation(
            "storage.database_path must not be empty",
        ));
    }

    if config.session.storage_key.trim().is_empty() {
        errors.push(ConfigError::validation(
            "session.storage_key must not be empty",
        ));
    }

    if config.session.success_param.trim().is_empty() {
        errors.push(ConfigError::validation(
            "session.success_param must not be empty",
        ));
    }

    if config.session.expiry_secs == 0 {
        errors.push(ConfigError::validation(
            "session.expiry_secs must be greater than zero",
        ));
    }

    if config.gemini.timeout_secs == 0 {
        errors.push(ConfigError::validation(
            "gemini.timeout_secs must be greater than zero",
        ));
    }

    if config.gemini.model.trim().is_empty() {
        errors.push(ConfigError::validation("gemini.model must not be empty"));
    }

    for (key, value) in [
        ("gemini.base_url", &config.gemini.base_url),
        ("payment.api_base", &config.payment.api_base),
        ("payment.return_url", &config.payment.return_url),
    ] {
        if let Err(e) = url::Url::parse(value) {
            errors.push(ConfigError::validation(format!(
                "{key} `{value}` is not a valid URL: {e}"
            )));
        }
    }

    if config.export.file_prefix.trim().is_empty() {
        errors.push(ConfigError::validation(
            "export.file_prefix must not be empty",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        warn!(count = errors.len(), "configuration failed validation");
        Err(errors)
    }
}
