// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Executor service: validates a connector invocation and runs it.
//!
//! Every failure mode (unknown type, disabled type, invalid config, secrets
//! or params, executor error) is reported as an error-status
//! [`ActionTypeExecutorResult`] so callers always get the same shape back.

use std::sync::Arc;

use courier_core::{ActionConnector, ActionTypeExecutorResult, CourierError, ExecutorOptions};
use serde_json::Value;
use tracing::{Instrument, debug, info_span, warn};

use crate::registry::ActionTypeRegistry;

/// A request to execute one connector.
#[derive(Debug, Clone)]
pub struct ExecuteRequest {
    pub action_id: String,
    pub action_type_id: String,
    pub config: Value,
    pub secrets: Value,
    pub params: Value,
}

impl ExecuteRequest {
    /// Build a request from a stored connector and invocation params.
    ///
    /// Unsaved connectors execute under the id `preview`.
    pub fn from_connector(connector: &ActionConnector, params: Value) -> Self {
        Self {
            action_id: connector.id.clone().unwrap_or_else(|| "preview".to_string()),
            action_type_id: connector.action_type_id.clone(),
            config: connector.config_value(),
            secrets: connector.secrets_value(),
            params,
        }
    }
}

/// Runs connectors registered in an [`ActionTypeRegistry`].
#[derive(Debug, Clone)]
pub struct ActionExecutor {
    registry: Arc<ActionTypeRegistry>,
}

impl ActionExecutor {
    pub fn new(registry: Arc<ActionTypeRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<ActionTypeRegistry> {
        &self.registry
    }

    /// Validate and execute a request.
    pub async fn execute(&self, request: ExecuteRequest) -> ActionTypeExecutorResult {
        let span = info_span!(
            "action_execute",
            action_id = %request.action_id,
            action_type = %request.action_type_id
        );
        let action_id = request.action_id.clone();

        let result = match self.run(request).instrument(span.clone()).await {
            Ok(result) => result,
            Err(e) => ActionTypeExecutorResult::error(action_id, e.to_string()),
        };

        let _guard = span.enter();
        if result.is_ok() {
            debug!("action executed");
        } else {
            warn!(
                error = result.message.as_deref().unwrap_or_default(),
                "action execution failed"
            );
        }
        result
    }

    /// Convenience wrapper around [`ExecuteRequest::from_connector`].
    pub async fn execute_connector(
        &self,
        connector: &ActionConnector,
        params: Value,
    ) -> ActionTypeExecutorResult {
        self.execute(ExecuteRequest::from_connector(connector, params))
            .await
    }

    async fn run(&self, request: ExecuteRequest) -> Result<ActionTypeExecutorResult, CourierError> {
        let action_type = self.registry.get(&request.action_type_id)?;
        self.registry
            .ensure_action_type_enabled(&request.action_type_id)?;

        action_type.validate_config(&request.config)?;
        action_type.validate_secrets(&request.secrets)?;
        action_type.validate_params(&request.params)?;

        let options = ExecutorOptions {
            action_id: request.action_id,
            config: request.config,
            secrets: request.secrets,
            params: request.params,
        };

        let action_id = options.action_id.clone();
        match action_type.execute(options).await {
            Ok(result) => Ok(result),
            Err(e @ CourierError::Validation { .. }) => Err(e),
            Err(e) => Ok(ActionTypeExecutorResult::error(
                action_id,
                format!("an error occurred while running the action executor: {e}"),
            )),
        }
    }
}
