// SPDX-FileCopyrightText: 2026 Emipro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the report wizard.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Provider,
    Storage,
    Checkout,
    Export,
}

// --- Profile ---

/// Expected standard of living at the destination.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
pub enum Lifestyle {
    #[strum(serialize = "Budget-conscious")]
    #[serde(rename = "Budget-conscious")]
    BudgetConscious,
    #[default]
    Moderate,
    Luxury,
}

impl Lifestyle {
    /// All tiers in display order.
    pub const ALL: [Lifestyle; 3] = [
        Lifestyle::BudgetConscious,
        Lifestyle::Moderate,
        Lifestyle::Luxury,
    ];
}

/// The user's relocation parameters for one report run.
///
/// Serialized with the camelCase field names the pending-session record has
/// always used, so records written by older builds still restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub destination_country: String,
    pub destination_city: String,
    pub profession: String,
    pub age: String,
    pub lifestyle: Lifestyle,
}

// --- Report sections ---

/// A citation attached to a generated section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub uri: String,
}

/// Renderable body of a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "format", content = "body", rename_all = "lowercase")]
pub enum SectionContent {
    /// Lightly marked-up text, rendered to HTML at preview time.
    Markdown(String),
    /// Ready-made HTML produced from structured output.
    Html(String),
}

impl SectionContent {
    /// The raw content string regardless of format.
    pub fn as_str(&self) -> &str {
        match self {
            SectionContent::Markdown(text) | SectionContent::Html(text) => text,
        }
    }
}

/// The generated content and citations for one topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionResult {
    /// Topic identifier this section was generated for.
    pub id: String,
    pub title: String,
    pub content: SectionContent,
    /// Citations, unique by URI, in first-seen order.
    pub sources: Vec<Source>,
}

/// The (profile, topic selection) pair persisted across the payment redirect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingSession {
    #[serde(rename = "userInput")]
    pub profile: Profile,
    #[serde(rename = "concerns")]
    pub topics: Vec<String>,
}

// --- Provider types ---

/// A single generation call against the AI backend.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Fully rendered prompt text.
    pub prompt: String,
    /// When present, the backend must answer with JSON matching this schema.
    pub response_schema: Option<serde_json::Value>,
}

impl GenerationRequest {
    /// Whether this request asks for structured JSON output.
    pub fn is_structured(&self) -> bool {
        self.response_schema.is_some()
    }
}

/// A grounding citation exactly as reported by the backend.
///
/// Either field may be missing; filtering happens in the section formatter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingCitation {
    pub title: Option<String>,
    pub uri: Option<String>,
}

/// The backend's answer to a [`GenerationRequest`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationResponse {
    /// Freeform text, or the JSON document for structured requests.
    pub text: String,
    pub citations: Vec<GroundingCitation>,
}

// --- Checkout types ---

/// A one-time payment checkout request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub price_id: String,
    pub quantity: u32,
    /// Address the processor redirects to after payment, carrying the success signal.
    pub success_url: String,
    /// Address the processor redirects to when the user cancels.
    pub cancel_url: String,
}

/// A created checkout, ready for redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    pub id: String,
    pub redirect_url: String,
}

// --- Export types ---

/// A request to turn the on-screen report container into a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    /// HTML of the report container.
    pub container_html: String,
    /// Desired output file name (e.g. `Emigration_Pro_Report_Lisbon.pdf`).
    pub file_name: String,
    /// Title printed on the cover page.
    pub title: String,
}

/// The written export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutput {
    pub path: PathBuf,
    pub pages: usize,
}
