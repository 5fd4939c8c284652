// SPDX-FileCopyrightText: 2026 Emipro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Emipro report generator.
//!
//! This crate provides the trait definitions, error types, and common types
//! shared by every crate in the workspace. Each external collaborator (AI
//! backend, key-value store, checkout, PDF export) is reached through a trait
//! defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::EmiproError;
pub use types::{
    AdapterType, GenerationRequest, GenerationResponse, GroundingCitation, HealthStatus,
    Lifestyle, PendingSession, Profile, SectionContent, SectionResult, Source,
};

pub use traits::{
    CheckoutAdapter, ExportAdapter, PluginAdapter, ProviderAdapter, SessionStore,
};
