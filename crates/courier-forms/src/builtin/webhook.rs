// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook connector form.

use courier_core::ActionConnector;
use serde_json::Value;

use super::{check_user_password, has_auth};
use crate::model::{
    ActionTypeModel, TypeRegistryItem, ValidationResult, is_valid_url, non_blank, param_str,
};
use crate::view::{Callout, ConnectorFieldsProps, FieldKind, FieldTarget, FormField, FormView};

pub const ACTION_TYPE_ID: &str = ".webhook";

const METHODS: [&str; 2] = ["post", "put"];

#[derive(Debug, Clone, Copy, Default)]
pub struct WebhookModel;

impl TypeRegistryItem for WebhookModel {
    fn id(&self) -> &str {
        ACTION_TYPE_ID
    }
}

impl ActionTypeModel for WebhookModel {
    fn icon_class(&self) -> &str {
        "logoWebhook"
    }

    fn select_message(&self) -> &str {
        "Send a request to a web service."
    }

    fn action_type_title(&self) -> &str {
        "Webhook data"
    }

    fn validate_connector(&self, connector: &ActionConnector) -> ValidationResult {
        let mut result =
            ValidationResult::with_fields(&["url", "method", "headers", "user", "password"]);
        let config = &connector.config;

        match non_blank(config, "url") {
            None => result.push("url", "URL is required."),
            Some(url) if !is_valid_url(url) => result.push("url", "URL is invalid."),
            Some(_) => {}
        }
        if let Some(method) = config.get("method") {
            if !method.as_str().is_some_and(|m| METHODS.contains(&m)) {
                result.push("method", "Method must be post or put.");
            }
        }
        if let Some(headers) = config.get("headers") {
            let all_strings = headers
                .as_object()
                .is_some_and(|map| map.values().all(Value::is_string));
            if !headers.is_null() && !all_strings {
                result.push("headers", "Header values must be strings.");
            }
        }

        check_user_password(connector, &mut result);
        result
    }

    fn validate_params(&self, params: &Value) -> ValidationResult {
        let mut result = ValidationResult::with_fields(&["body"]);
        if param_str(params, "body").is_none() {
            result.push("body", "Body is required.");
        }
        result
    }

    fn connector_fields(&self, props: &ConnectorFieldsProps<'_>) -> FormView {
        let mut view = FormView::new()
            .field(
                props,
                FormField::new(
                    "webhookMethodSelect",
                    "Method",
                    FieldKind::Select {
                        options: METHODS.iter().map(|m| m.to_string()).collect(),
                    },
                    FieldTarget::Config("method".into()),
                ),
            )
            .field(
                props,
                FormField::new(
                    "webhookUrlText",
                    "URL",
                    FieldKind::Url,
                    FieldTarget::Config("url".into()),
                ),
            )
            .field(
                props,
                FormField::new(
                    "webhookHeadersInput",
                    "Headers",
                    FieldKind::TextArea,
                    FieldTarget::Config("headers".into()),
                ),
            )
            .field(
                props,
                FormField::new(
                    "webhookHasAuthSwitch",
                    "Require authentication for this webhook",
                    FieldKind::Toggle,
                    FieldTarget::Config("hasAuth".into()),
                ),
            );

        if has_auth(props.connector) {
            view = view
                .callout(Callout::credentials(props.connector, "Username and password"))
                .field(
                    props,
                    FormField::new(
                        "webhookUserInput",
                        "Username",
                        FieldKind::Text,
                        FieldTarget::Secrets("user".into()),
                    ),
                )
                .field(
                    props,
                    FormField::new(
                        "webhookPasswordInput",
                        "Password",
                        FieldKind::Password,
                        FieldTarget::Secrets("password".into()),
                    ),
                );
        }
        view
    }
}
