// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! PagerDuty connector form.

use chrono::{DateTime, NaiveDateTime};
use courier_core::ActionConnector;
use serde_json::Value;

use crate::model::{
    ActionTypeModel, TypeRegistryItem, ValidationResult, is_valid_url, non_blank, param_str,
};
use crate::view::{Callout, ConnectorFieldsProps, FieldKind, FieldTarget, FormField, FormView};

pub const ACTION_TYPE_ID: &str = ".pagerduty";

#[derive(Debug, Clone, Copy, Default)]
pub struct PagerDutyModel;

fn is_valid_timestamp(value: &str) -> bool {
    DateTime::parse_from_rfc3339(value).is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").is_ok()
}

impl TypeRegistryItem for PagerDutyModel {
    fn id(&self) -> &str {
        ACTION_TYPE_ID
    }
}

impl ActionTypeModel for PagerDutyModel {
    fn icon_class(&self) -> &str {
        "logoPagerDuty"
    }

    fn select_message(&self) -> &str {
        "Send an event in PagerDuty."
    }

    fn action_type_title(&self) -> &str {
        "Send to PagerDuty"
    }

    fn validate_connector(&self, connector: &ActionConnector) -> ValidationResult {
        let mut result = ValidationResult::with_fields(&["apiUrl", "routingKey"]);
        if let Some(url) = non_blank(&connector.config, "apiUrl") {
            if !is_valid_url(url) {
                result.push("apiUrl", "URL is invalid.");
            }
        }
        if non_blank(&connector.secrets, "routingKey").is_none() {
            result.push("routingKey", "An integration key / routing key is required.");
        }
        result
    }

    fn validate_params(&self, params: &Value) -> ValidationResult {
        let mut result = ValidationResult::with_fields(&["dedupKey", "summary", "timestamp"]);
        let action = params
            .get("eventAction")
            .and_then(Value::as_str)
            .unwrap_or("trigger");

        if matches!(action, "resolve" | "acknowledge") && param_str(params, "dedupKey").is_none() {
            result.push(
                "dedupKey",
                "DedupKey is required when resolving or acknowledging an incident.",
            );
        }
        if action == "trigger" && param_str(params, "summary").is_none() {
            result.push("summary", "Summary is required.");
        }
        if let Some(ts) = param_str(params, "timestamp") {
            if !is_valid_timestamp(ts) {
                result.push("timestamp", format!("Timestamp \"{ts}\" is not a valid date."));
            }
        }
        result
    }

    fn connector_fields(&self, props: &ConnectorFieldsProps<'_>) -> FormView {
        FormView::new()
            .callout(Callout::credentials(props.connector, "Integration key"))
            .field(
                props,
                FormField::new(
                    "pagerdutyApiUrlInput",
                    "API URL (optional)",
                    FieldKind::Url,
                    FieldTarget::Config("apiUrl".into()),
                ),
            )
            .field(
                props,
                FormField::new(
                    "pagerdutyRoutingKeyInput",
                    "Integration key",
                    FieldKind::Password,
                    FieldTarget::Secrets("routingKey".into()),
                ),
            )
    }
}
