// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Host and action type allow-lists shared by every connector.
//!
//! [`ActionsConfigurationUtilities`] is built once from the `[actions]`
//! config section and handed to each action type, which checks its target
//! URLs and hostnames against it during config and secrets validation.

use courier_config::model::{ALLOW_ALL, ActionsConfig};
use courier_core::CourierError;
use tracing::debug;

/// Case-insensitive set of entries with `*` wildcard support.
#[derive(Debug, Clone)]
struct AllowList {
    any: bool,
    entries: Vec<String>,
}

impl AllowList {
    fn new(entries: &[String]) -> Self {
        let entries: Vec<String> = entries.iter().map(|e| e.trim().to_lowercase()).collect();
        Self {
            any: entries.iter().any(|e| e == ALLOW_ALL),
            entries,
        }
    }

    fn contains(&self, candidate: &str) -> bool {
        self.any || self.entries.iter().any(|e| *e == candidate.to_lowercase())
    }
}

/// Bounds applied to outbound responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseSettings {
    pub max_content_length: u64,
    pub timeout: std::time::Duration,
}

/// Allow-list checks and response settings derived from `[actions]` config.
#[derive(Debug, Clone)]
pub struct ActionsConfigurationUtilities {
    allowed_hosts: AllowList,
    enabled_action_types: AllowList,
    response: ResponseSettings,
}

impl ActionsConfigurationUtilities {
    pub fn new(config: &ActionsConfig) -> Self {
        Self {
            allowed_hosts: AllowList::new(&config.allowed_hosts),
            enabled_action_types: AllowList::new(&config.enabled_action_types),
            response: ResponseSettings {
                max_content_length: config.max_response_content_length,
                timeout: std::time::Duration::from_secs(config.response_timeout_secs),
            },
        }
    }

    /// Utilities that allow every host and action type, with default limits.
    pub fn allow_all() -> Self {
        Self::new(&ActionsConfig::default())
    }

    pub fn is_hostname_allowed(&self, hostname: &str) -> bool {
        self.allowed_hosts.contains(hostname)
    }

    /// Returns true when `uri` parses and its hostname is allowed.
    pub fn is_uri_allowed(&self, uri: &str) -> bool {
        match url::Url::parse(uri) {
            Ok(parsed) => parsed
                .host_str()
                .map(|host| self.is_hostname_allowed(host.trim_matches(['[', ']'])))
                .unwrap_or(false),
            Err(e) => {
                debug!(uri = %uri, error = %e, "rejecting unparseable uri");
                false
            }
        }
    }

    pub fn is_action_type_enabled(&self, action_type_id: &str) -> bool {
        self.enabled_action_types.contains(action_type_id)
    }

    pub fn ensure_hostname_allowed(&self, hostname: &str) -> Result<(), CourierError> {
        if self.is_hostname_allowed(hostname) {
            Ok(())
        } else {
            Err(CourierError::NotAllowed(format!(
                "target hostname \"{hostname}\" is not added to the courier config actions.allowed_hosts"
            )))
        }
    }

    pub fn ensure_uri_allowed(&self, uri: &str) -> Result<(), CourierError> {
        if self.is_uri_allowed(uri) {
            Ok(())
        } else {
            Err(CourierError::NotAllowed(format!(
                "target url \"{uri}\" is not added to the courier config actions.allowed_hosts"
            )))
        }
    }

    pub fn ensure_action_type_enabled(&self, action_type_id: &str) -> Result<(), CourierError> {
        if self.is_action_type_enabled(action_type_id) {
            Ok(())
        } else {
            Err(CourierError::ActionTypeDisabled {
                id: action_type_id.to_string(),
            })
        }
    }

    pub fn response_settings(&self) -> ResponseSettings {
        self.response
    }
}
