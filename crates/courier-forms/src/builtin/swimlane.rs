// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Swimlane connector form.

use courier_core::ActionConnector;
use serde_json::Value;

use crate::model::{
    ActionTypeModel, TypeRegistryItem, ValidationResult, is_valid_url, non_blank, param_str,
};
use crate::view::{Callout, ConnectorFieldsProps, FieldKind, FieldTarget, FormField, FormView};

pub const ACTION_TYPE_ID: &str = ".swimlane";

pub const API_URL_INPUT: &str = "swimlaneApiUrlInput";
pub const APP_ID_INPUT: &str = "swimlaneAppIdInput";
pub const USERNAME_INPUT: &str = "swimlaneUsernameInput";
pub const API_TOKEN_INPUT: &str = "swimlaneApiTokenInput";

#[derive(Debug, Clone, Copy, Default)]
pub struct SwimlaneModel;

impl TypeRegistryItem for SwimlaneModel {
    fn id(&self) -> &str {
        ACTION_TYPE_ID
    }
}

impl ActionTypeModel for SwimlaneModel {
    fn icon_class(&self) -> &str {
        "logoSwimlane"
    }

    fn select_message(&self) -> &str {
        "Create record in Swimlane"
    }

    fn action_type_title(&self) -> &str {
        "Create Swimlane Record"
    }

    fn validate_connector(&self, connector: &ActionConnector) -> ValidationResult {
        let mut result =
            ValidationResult::with_fields(&["apiUrl", "appId", "username", "apiToken"]);

        // apiUrl is optional here; the server side checks it against the allow-list.
        if let Some(url) = non_blank(&connector.config, "apiUrl") {
            if !is_valid_url(url) {
                result.push("apiUrl", "URL is invalid.");
            }
        }
        if non_blank(&connector.config, "appId").is_none() {
            result.push("appId", "An App ID is required.");
        }
        if non_blank(&connector.config, "username").is_none() {
            result.push("username", "Username is required.");
        }
        if non_blank(&connector.secrets, "apiToken").is_none() {
            result.push("apiToken", "An API token is required.");
        }
        result
    }

    fn validate_params(&self, params: &Value) -> ValidationResult {
        let mut result = ValidationResult::with_fields(&["alertName", "alertSource"]);
        if params.get("subAction").and_then(Value::as_str) != Some("createRecord") {
            return result;
        }
        let Some(sub) = params.get("subActionParams") else {
            result.push("alertName", "Alert name is required.");
            result.push("alertSource", "Alert source is required.");
            return result;
        };
        if param_str(sub, "alertName").is_none() {
            result.push("alertName", "Alert name is required.");
        }
        if param_str(sub, "alertSource").is_none() {
            result.push("alertSource", "Alert source is required.");
        }
        result
    }

    fn connector_fields(&self, props: &ConnectorFieldsProps<'_>) -> FormView {
        FormView::new()
            .callout(Callout::credentials(props.connector, "API token"))
            .field(
                props,
                FormField::new(
                    API_URL_INPUT,
                    "API Url",
                    FieldKind::Url,
                    FieldTarget::Config("apiUrl".into()),
                ),
            )
            .field(
                props,
                FormField::new(
                    APP_ID_INPUT,
                    "Application ID",
                    FieldKind::Text,
                    FieldTarget::Config("appId".into()),
                ),
            )
            .field(
                props,
                FormField::new(
                    USERNAME_INPUT,
                    "Username",
                    FieldKind::Text,
                    FieldTarget::Config("username".into()),
                ),
            )
            .field(
                props,
                FormField::new(
                    API_TOKEN_INPUT,
                    "API token",
                    FieldKind::Password,
                    FieldTarget::Secrets("apiToken".into()),
                ),
            )
    }
}
