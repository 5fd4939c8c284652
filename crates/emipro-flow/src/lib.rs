// SPDX-FileCopyrightText: 2026 Emipro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Report orchestration and wizard flow for Emipro.
//!
//! Ties the generation backend, the durable session store, checkout and PDF
//! export together behind the [`Wizard`] step machine.

pub mod bridge;
pub mod expiry;
pub mod orchestrator;
pub mod wizard;

pub use bridge::{parse_address, SessionBridge};
pub use expiry::ExpiryTimer;
pub use orchestrator::{progress_message, GenerationState, ProgressObserver, ReportOrchestrator};
pub use wizard::{generated_on, GenerationHandle, ReportFlow, Resumption, Step, Wizard};
