// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as parseable URLs, non-empty allow-lists and non-zero limits.

use tracing::warn;

use crate::diagnostic::ConfigError;
use crate::model::CourierConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &CourierConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let level = config.logging.level.trim().to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "logging.level `{}` is not one of: {}",
                config.logging.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.actions.allowed_hosts.is_empty() {
        errors.push(ConfigError::Validation {
            message: "actions.allowed_hosts must not be empty (use [\"*\"] to allow any host)"
                .to_string(),
        });
    }

    for (i, host) in config.actions.allowed_hosts.iter().enumerate() {
        if host.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("actions.allowed_hosts[{i}] must not be empty"),
            });
        }
    }

    if config.actions.enabled_action_types.is_empty() {
        warn!("actions.enabled_action_types is empty; no action type can be executed");
    }

    if config.actions.response_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "actions.response_timeout_secs must be greater than 0".to_string(),
        });
    }

    if config.actions.max_response_content_length == 0 {
        errors.push(ConfigError::Validation {
            message: "actions.max_response_content_length must be greater than 0".to_string(),
        });
    }

    if let Some(base_url) = &config.actions.public_base_url {
        if let Err(message) = check_http_url(base_url) {
            errors.push(ConfigError::Validation {
                message: format!("actions.public_base_url {message}"),
            });
        }
    }

    if let Err(message) = check_http_url(&config.elasticsearch.url) {
        errors.push(ConfigError::Validation {
            message: format!("elasticsearch.url {message}"),
        });
    }

    if config.elasticsearch.password.is_some() && config.elasticsearch.username.is_none() {
        errors.push(ConfigError::Validation {
            message: "elasticsearch.password is set but elasticsearch.username is missing"
                .to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_http_url(value: &str) -> Result<(), String> {
    match url::Url::parse(value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        Ok(parsed) => Err(format!(
            "`{value}` must use http or https, got `{}`",
            parsed.scheme()
        )),
        Err(e) => Err(format!("`{value}` is not a valid URL: {e}")),
    }
}
