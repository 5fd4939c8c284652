// SPDX-FileCopyrightText: 2026 Emipro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for the Emipro report generator.
//!
//! Holds the pending session across the payment redirect: a durable,
//! single-writer key-value table with take-once reads, migrated on open.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;

pub use adapter::SqliteSessionStore;
pub use database::Database;
