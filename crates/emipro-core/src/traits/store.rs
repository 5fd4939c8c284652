// SPDX-FileCopyrightText: 2026 Emipro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable key-value store used to carry state across the payment redirect.

use async_trait::async_trait;

use crate::error::EmiproError;
use crate::traits::adapter::PluginAdapter;

/// A durable string key-value store.
///
/// Write, read-and-delete, and delete are the whole surface. `take` must
/// remove the value in the same transaction that reads it, so a record can
/// never be observed twice.
#[async_trait]
pub trait SessionStore: PluginAdapter {
    /// Stores `value` under `key`, replacing any previous value.
    async fn put(&self, key: &str, value: &str) -> Result<(), EmiproError>;

    /// Reads and deletes the value under `key`. Returns `None` if absent.
    async fn take(&self, key: &str) -> Result<Option<String>, EmiproError>;

    /// Deletes the value under `key` if present.
    async fn remove(&self, key: &str) -> Result<(), EmiproError>;
}
