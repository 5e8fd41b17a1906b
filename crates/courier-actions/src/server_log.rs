// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `.server-log`: write a message to the host's own log.

use async_trait::async_trait;
use courier_core::schema::{Empty, SchemaKind, parse};
use courier_core::{ActionType, ActionTypeExecutorResult, CourierError, ExecutorOptions};
use serde::Deserialize;
use serde_json::Value;
use strum::Display;
use tracing::{debug, error, info, trace, warn};

pub const ACTION_TYPE_ID: &str = ".server-log";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Fatal,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerLogParams {
    pub message: String,
    #[serde(default)]
    pub level: LogLevel,
}

/// Replace control characters so a message cannot forge extra log lines.
fn without_control_characters(message: &str) -> String {
    message
        .chars()
        .map(|c| if c.is_control() { ';' } else { c })
        .collect()
}

#[derive(Debug, Default)]
pub struct ServerLogActionType;

impl ServerLogActionType {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ActionType for ServerLogActionType {
    fn id(&self) -> &str {
        ACTION_TYPE_ID
    }

    fn name(&self) -> &str {
        "Server log"
    }

    fn validate_config(&self, config: &Value) -> Result<(), CourierError> {
        parse::<Empty>(SchemaKind::Config, config).map(|_| ())
    }

    fn validate_secrets(&self, secrets: &Value) -> Result<(), CourierError> {
        parse::<Empty>(SchemaKind::Secrets, secrets).map(|_| ())
    }

    fn validate_params(&self, params: &Value) -> Result<(), CourierError> {
        let params: ServerLogParams = parse(SchemaKind::Params, params)?;
        crate::slack::ensure_message(&params.message)
    }

    async fn execute(
        &self,
        options: ExecutorOptions,
    ) -> Result<ActionTypeExecutorResult, CourierError> {
        let params: ServerLogParams = parse(SchemaKind::Params, &options.params)?;
        let message = without_control_characters(&params.message);
        let action_id = options.action_id.as_str();

        match params.level {
            LogLevel::Trace => trace!(action_id, "Server log: {message}"),
            LogLevel::Debug => debug!(action_id, "Server log: {message}"),
            LogLevel::Info => info!(action_id, "Server log: {message}"),
            LogLevel::Warn => warn!(action_id, "Server log: {message}"),
            LogLevel::Error => error!(action_id, "Server log: {message}"),
            LogLevel::Fatal => error!(action_id, fatal = true, "Server log: {message}"),
        }

        Ok(ActionTypeExecutorResult::ok(options.action_id))
    }
}
