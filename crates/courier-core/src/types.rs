// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by action types, the registry, forms and the CLI.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString};

/// A configured connector instance: an action type plus its config and secrets.
///
/// `id` is `None` while the connector is being created and set once it has
/// been saved, which is how forms tell create mode from edit mode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionConnector {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub action_type_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub config: Map<String, Value>,
    #[serde(default)]
    pub secrets: Map<String, Value>,
    #[serde(default)]
    pub is_preconfigured: bool,
}

impl ActionConnector {
    /// Create an unsaved connector of the given action type.
    pub fn new(action_type_id: impl Into<String>) -> Self {
        Self {
            action_type_id: action_type_id.into(),
            ..Self::default()
        }
    }

    /// Returns true when the connector has not been saved yet.
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Returns a config value as a string slice, if present and a string.
    pub fn config_str(&self, key: &str) -> Option<&str> {
        self.config.get(key).and_then(Value::as_str)
    }

    /// Returns a secrets value as a string slice, if present and a string.
    pub fn secret_str(&self, key: &str) -> Option<&str> {
        self.secrets.get(key).and_then(Value::as_str)
    }

    pub fn config_value(&self) -> Value {
        Value::Object(self.config.clone())
    }

    pub fn secrets_value(&self) -> Value {
        Value::Object(self.secrets.clone())
    }
}

/// Inputs handed to an action type executor after validation.
#[derive(Debug, Clone)]
pub struct ExecutorOptions {
    /// Id of the connector being executed, used in results and log lines.
    pub action_id: String,
    pub config: Value,
    pub secrets: Value,
    pub params: Value,
}

/// Outcome status of an executor run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ExecutionStatus {
    Ok,
    Error,
}

/// Retry hint returned by an executor: a flag, or the earliest time to retry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Retry {
    Flag(bool),
    At(DateTime<Utc>),
}

/// Result of running an action type executor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionTypeExecutorResult {
    pub action_id: String,
    pub status: ExecutionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry: Option<Retry>,
}

impl ActionTypeExecutorResult {
    /// A successful result without data.
    pub fn ok(action_id: impl Into<String>) -> Self {
        Self {
            action_id: action_id.into(),
            status: ExecutionStatus::Ok,
            message: None,
            service_message: None,
            data: None,
            retry: None,
        }
    }

    /// A successful result carrying response data.
    pub fn ok_with_data(action_id: impl Into<String>, data: Value) -> Self {
        Self {
            data: Some(data),
            ..Self::ok(action_id)
        }
    }

    /// A failed result with a user-facing message.
    pub fn error(action_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: ExecutionStatus::Error,
            message: Some(message.into()),
            ..Self::ok(action_id)
        }
    }

    pub fn with_service_message(mut self, service_message: impl Into<String>) -> Self {
        self.service_message = Some(service_message.into());
        self
    }

    pub fn with_retry(mut self, retry: Retry) -> Self {
        self.retry = Some(retry);
        self
    }

    pub fn is_ok(&self) -> bool {
        self.status == ExecutionStatus::Ok
    }
}

/// Summary of a registered action type, as listed by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionTypeInfo {
    pub id: String,
    pub name: String,
    /// Whether the action type may be executed under the current configuration.
    pub enabled: bool,
}
