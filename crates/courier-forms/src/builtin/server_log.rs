// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Server log connector form. It has no connector fields.

use courier_core::ActionConnector;
use serde_json::Value;

use crate::model::{ActionTypeModel, TypeRegistryItem, ValidationResult, param_str};
use crate::view::{ConnectorFieldsProps, FormView};

pub const ACTION_TYPE_ID: &str = ".server-log";

pub const LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "fatal"];

#[derive(Debug, Clone, Copy, Default)]
pub struct ServerLogModel;

impl TypeRegistryItem for ServerLogModel {
    fn id(&self) -> &str {
        ACTION_TYPE_ID
    }
}

impl ActionTypeModel for ServerLogModel {
    fn icon_class(&self) -> &str {
        "logsApp"
    }

    fn select_message(&self) -> &str {
        "Add a message to a server log."
    }

    fn action_type_title(&self) -> &str {
        "Send to Server log"
    }

    fn validate_connector(&self, _connector: &ActionConnector) -> ValidationResult {
        ValidationResult::default()
    }

    fn validate_params(&self, params: &Value) -> ValidationResult {
        let mut result = ValidationResult::with_fields(&["message", "level"]);
        if param_str(params, "message").is_none() {
            result.push("message", "Message is required.");
        }
        if let Some(level) = params.get("level") {
            if !level.as_str().is_some_and(|l| LEVELS.contains(&l)) {
                result.push("level", format!("Level must be one of {}.", LEVELS.join(", ")));
            }
        }
        result
    }

    fn connector_fields(&self, _props: &ConnectorFieldsProps<'_>) -> FormView {
        FormView::new()
    }
}
