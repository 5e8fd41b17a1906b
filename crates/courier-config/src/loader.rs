// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./courier.toml` > `~/.config/courier/courier.toml`
//! > `/etc/courier/courier.toml`, with environment variable overrides via the
//! `COURIER_` prefix.

// figment::Error is external and cannot be boxed without a wrapper.
#![allow(clippy::result_large_err)]

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::CourierConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/courier/courier.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "courier.toml";

/// Path of the per-user config file, if the platform has a config dir.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("courier").join(LOCAL_CONFIG_FILE))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/courier/courier.toml`
/// 3. `~/.config/courier/courier.toml`
/// 4. `./courier.toml`
/// 5. `COURIER_*` environment variables
pub fn load_config() -> Result<CourierConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<CourierConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CourierConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<CourierConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CourierConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the layered Figment without extracting it.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(CourierConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Environment provider with explicit section mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `COURIER_ACTIONS_ALLOWED_HOSTS` must become
/// `actions.allowed_hosts`, not `actions.allowed.hosts`.
fn env_provider() -> Env {
    Env::prefixed("COURIER_").map(|key| {
        key.as_str()
            .replacen("logging_", "logging.", 1)
            .replacen("actions_", "actions.", 1)
            .replacen("elasticsearch_", "elasticsearch.", 1)
            .into()
    })
}
