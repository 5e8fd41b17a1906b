// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subcommand implementations.
//!
//! Each command returns the JSON document it prints so it can be tested
//! without capturing stdout.

use std::path::Path;

use courier_core::{ActionConnector, ActionTypeExecutorResult, ActionTypeInfo, CourierError};
use courier_forms::{ConnectorFieldsProps, FormView, ValidationResult};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::info;

use crate::app::App;

/// Output of `courier validate`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateReport {
    pub action_type_id: String,
    /// Messages from the server-side config and secrets checks.
    pub server_errors: Vec<String>,
    /// Per-field messages from the connector form.
    pub form: ValidationResult,
    pub valid: bool,
}

/// Read and deserialize a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CourierError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        CourierError::Config(format!("failed to read {}: {e}", path.display()))
    })?;
    serde_json::from_str(&content)
        .map_err(|e| CourierError::Config(format!("failed to parse {}: {e}", path.display())))
}

pub fn run_types(app: &App) -> Vec<ActionTypeInfo> {
    app.registry().list()
}

pub fn run_validate(
    app: &App,
    connector: &ActionConnector,
) -> Result<ValidateReport, CourierError> {
    let action_type = app.registry().get(&connector.action_type_id)?;
    let form = app.form(&connector.action_type_id)?;

    let mut server_errors = Vec::new();
    if let Err(e) = action_type.validate_config(&connector.config_value()) {
        server_errors.push(e.to_string());
    }
    if let Err(e) = action_type.validate_secrets(&connector.secrets_value()) {
        server_errors.push(e.to_string());
    }
    let form = form.validate_connector(connector);
    let valid = server_errors.is_empty() && form.is_valid();

    info!(action_type = %connector.action_type_id, valid, "validated connector");
    Ok(ValidateReport {
        action_type_id: connector.action_type_id.clone(),
        server_errors,
        form,
        valid,
    })
}

/// Describe the connector form, with the current validation errors attached.
pub fn run_form(
    app: &App,
    connector: &ActionConnector,
    read_only: bool,
) -> Result<FormView, CourierError> {
    let model = app.form(&connector.action_type_id)?;
    let errors = model.validate_connector(connector).errors;
    Ok(model.connector_fields(&ConnectorFieldsProps {
        connector,
        errors: &errors,
        read_only,
    }))
}

pub async fn run_execute(
    app: &App,
    connector: &ActionConnector,
    params: Value,
) -> ActionTypeExecutorResult {
    app.executor.execute_connector(connector, params).await
}
