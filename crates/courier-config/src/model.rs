// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Courier connector framework.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Wildcard entry accepted by `allowed_hosts` and `enabled_action_types`.
pub const ALLOW_ALL: &str = "*";

/// Top-level Courier configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CourierConfig {
    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Connector execution policy.
    #[serde(default)]
    pub actions: ActionsConfig,

    /// Cluster used by the `.index` connector.
    #[serde(default)]
    pub elasticsearch: ElasticsearchConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Policy applied to every connector: which hosts may be contacted, which
/// action types may run, and how outbound responses are bounded.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ActionsConfig {
    /// Hostnames connectors may contact. `"*"` allows any host.
    #[serde(default = "default_allow_all")]
    pub allowed_hosts: Vec<String>,

    /// Action type ids that may be executed. `"*"` enables every type.
    #[serde(default = "default_allow_all")]
    pub enabled_action_types: Vec<String>,

    /// Public URL of the host application, linked from email footers.
    #[serde(default)]
    pub public_base_url: Option<String>,

    /// Maximum accepted response body size in bytes.
    #[serde(default = "default_max_response_content_length")]
    pub max_response_content_length: u64,

    /// Timeout for outbound requests in seconds.
    #[serde(default = "default_response_timeout_secs")]
    pub response_timeout_secs: u64,
}

impl Default for ActionsConfig {
    fn default() -> Self {
        Self {
            allowed_hosts: default_allow_all(),
            enabled_action_types: default_allow_all(),
            public_base_url: None,
            max_response_content_length: default_max_response_content_length(),
            response_timeout_secs: default_response_timeout_secs(),
        }
    }
}

fn default_allow_all() -> Vec<String> {
    vec![ALLOW_ALL.to_string()]
}

fn default_max_response_content_length() -> u64 {
    1024 * 1024
}

fn default_response_timeout_secs() -> u64 {
    60
}

/// Elasticsearch connection used by the index connector.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ElasticsearchConfig {
    /// Base URL of the cluster.
    #[serde(default = "default_elasticsearch_url")]
    pub url: String,

    /// Basic auth user. `None` sends unauthenticated requests.
    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,
}

impl Default for ElasticsearchConfig {
    fn default() -> Self {
        Self {
            url: default_elasticsearch_url(),
            username: None,
            password: None,
        }
    }
}

fn default_elasticsearch_url() -> String {
    "http://localhost:9200".to_string()
}
