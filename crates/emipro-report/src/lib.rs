// SPDX-FileCopyrightText: 2026 Emipro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Report content for the Emipro report generator.
//!
//! Owns everything about what a report says and looks like: the destination
//! catalog and profile form, the topic catalog with its prompts, the section
//! formatter, and the HTML preview consumed by the PDF exporter.

pub mod catalog;
pub mod formatter;
pub mod geography;
pub mod html;
pub mod markdown;
pub mod preview;

pub use catalog::{Topic, TopicKind};
pub use formatter::{format_section, STRUCTURED_FORMAT_ERROR};
pub use geography::ProfileForm;
pub use preview::{format_time, render_container, render_document};
