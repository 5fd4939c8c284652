// SPDX-FileCopyrightText: 2026 Emipro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Emipro report generator.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Emipro configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EmiproConfig {
    /// Application identity and logging.
    #[serde(default)]
    pub app: AppConfig,

    /// Gemini generation backend settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Hosted checkout settings.
    #[serde(default)]
    pub payment: PaymentConfig,

    /// Durable key-value store settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Pending-session handoff and report expiry settings.
    #[serde(default)]
    pub session: SessionConfig,

    /// PDF export settings.
    #[serde(default)]
    pub export: ExportConfig,
}

/// Application identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Display name used in log filters.
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Title printed on the report cover and PDF front page.
    #[serde(default = "default_report_title")]
    pub report_title: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            log_level: default_log_level(),
            report_title: default_report_title(),
        }
    }
}

fn default_app_name() -> String {
    "emipro".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_report_title() -> String {
    "Emigration Pro Report".to_string()
}

/// Gemini API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// Gemini API key. `None` falls back to `GEMINI_API_KEY`, then `API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model used for every section.
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// Base URL of the Generative Language API.
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_gemini_model(),
            base_url: default_gemini_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

/// Hosted checkout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PaymentConfig {
    /// Stripe secret key. `None` falls back to `STRIPE_SECRET_KEY`.
    #[serde(default)]
    pub secret_key: Option<String>,

    /// Stripe price identifier of the report. `None` falls back to `STRIPE_PRICE_ID`.
    #[serde(default)]
    pub price_id: Option<String>,

    /// Base URL of the Stripe API.
    #[serde(default = "default_payment_api_base")]
    pub api_base: String,

    /// Address the checkout returns to, with or without the success signal.
    #[serde(default = "default_return_url")]
    pub return_url: String,

    /// Price shown to the user before checkout.
    #[serde(default = "default_price_label")]
    pub price_label: String,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            secret_key: None,
            price_id: None,
            api_base: default_payment_api_base(),
            return_url: default_return_url(),
            price_label: default_price_label(),
        }
    }
}

fn default_payment_api_base() -> String {
    "https://api.stripe.com/v1".to_string()
}

fn default_return_url() -> String {
    "http://localhost:8080/".to_string()
}

fn default_price_label() -> String {
    "$49.99".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("emipro").join("emipro.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("emipro.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Pending-session handoff and expiry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Key the pending session is stored under.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Query parameter that marks a successful payment return.
    #[serde(default = "default_success_param")]
    pub success_param: String,

    /// Seconds the report preview stays available.
    #[serde(default = "default_expiry_secs")]
    pub expiry_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            success_param: default_success_param(),
            expiry_secs: default_expiry_secs(),
        }
    }
}

fn default_storage_key() -> String {
    "emigrationReportData".to_string()
}

fn default_success_param() -> String {
    "payment_success".to_string()
}

fn default_expiry_secs() -> u64 {
    30 * 60
}

/// PDF export configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ExportConfig {
    /// Directory PDFs are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// File name prefix; the destination city is appended.
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            file_prefix: default_file_prefix(),
        }
    }
}

fn default_output_dir() -> String {
    ".".to_string()
}

fn default_file_prefix() -> String {
    "Emigration_Pro_Report".to_string()
}

impl ExportConfig {
    /// File name for a report about `city`.
    pub fn file_name_for(&self, city: &str) -> String {
        format!("{}_{}.pdf", self.file_prefix, city.replace(' ', "_"))
    }
}
