// SPDX-FileCopyrightText: 2026 Emipro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the external collaborators of the wizard.
//!
//! All adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod checkout;
pub mod export;
pub mod provider;
pub mod store;

pub use adapter::PluginAdapter;
pub use checkout::CheckoutAdapter;
pub use export::ExportAdapter;
pub use provider::ProviderAdapter;
pub use store::SessionStore;
