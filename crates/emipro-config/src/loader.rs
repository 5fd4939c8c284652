// SPDX-FileCopyrightText: 2026 Emipro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./emipro.toml` > `~/.config/emipro/emipro.toml` > `/etc/emipro/emipro.toml`
//! with environment variable overrides via `EMIPRO_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use tracing::{debug, trace};

use crate::model::EmiproConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/emipro/emipro.toml` (system-wide)
/// 3. `~/.config/emipro/emipro.toml` (user XDG config)
/// 4. `./emipro.toml` (local directory)
/// 5. `EMIPRO_*` environment variables
pub fn load_config() -> Result<EmiproConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<EmiproConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(EmiproConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<EmiproConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(EmiproConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Config files of the XDG hierarchy, lowest precedence first.
pub fn hierarchy_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/etc/emipro/emipro.toml")];
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("emipro/emipro.toml"));
    }
    paths.push(PathBuf::from("emipro.toml"));
    paths
}

/// Build the Figment used for the XDG hierarchy, before extraction.
pub fn build_figment() -> Figment {
    let mut figment = Figment::new().merge(Serialized::defaults(EmiproConfig::default()));
    for path in hierarchy_paths() {
        if path.is_file() {
            debug!(path = %path.display(), "config layer loaded");
        } else {
            trace!(path = %path.display(), "config layer absent");
        }
        figment = figment.merge(Toml::file(path));
    }
    figment.merge(env_provider())
}

/// Create the environment variable provider with explicit section mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `EMIPRO_PAYMENT_PRICE_ID` must map to `payment.price_id`.
fn env_provider() -> Env {
    Env::prefixed("EMIPRO_").map(|key| map_env_key(key.as_str()).into())
}

/// Map a lowercased, prefix-stripped env var name to a dotted config path.
pub(crate) fn map_env_key(key: &str) -> String {
    const SECTIONS: [&str; 6] = ["app", "gemini", "payment", "storage", "session", "export"];
    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
