// SPDX-FileCopyrightText: 2026 Emipro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Emipro integration tests.
//!
//! Provides in-memory and scripted implementations of every adapter trait so
//! the wizard can be exercised without network access or a database.
//!
//! # Components
//!
//! - [`MockProvider`] - scripted generation backend
//! - [`MemoryStore`] - in-memory session store, optionally failing
//! - [`MockCheckout`] - checkout that records requests
//! - [`MockExporter`] - exporter that records requests

pub mod mock_adapters;
pub mod mock_provider;

pub use mock_adapters::{MemoryStore, MockCheckout, MockExporter};
pub use mock_provider::{MockProvider, MockReply};
