// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Forms for connectors that post to an incoming webhook URL (Slack, Teams).

use courier_core::ActionConnector;
use serde_json::Value;

use crate::model::{
    ActionTypeModel, TypeRegistryItem, ValidationResult, is_valid_url, non_blank, param_str,
};
use crate::view::{Callout, ConnectorFieldsProps, FieldKind, FieldTarget, FormField, FormView};

/// A connector whose only secret is a webhook URL and whose only param is a message.
#[derive(Debug, Clone)]
pub struct IncomingWebhookModel {
    id: &'static str,
    icon_class: &'static str,
    select_message: &'static str,
    title: &'static str,
    url_input: &'static str,
}

impl IncomingWebhookModel {
    pub fn slack() -> Self {
        Self {
            id: ".slack",
            icon_class: "logoSlack",
            select_message: "Send a message to a Slack channel or user.",
            title: "Send to Slack",
            url_input: "slackWebhookUrlInput",
        }
    }

    pub fn teams() -> Self {
        Self {
            id: ".teams",
            icon_class: "logoTeams",
            select_message: "Send a message to a Microsoft Teams channel.",
            title: "Send a message to a Microsoft Teams channel.",
            url_input: "teamsUrlText",
        }
    }

    /// Test subject of the webhook URL input.
    pub fn url_input(&self) -> &str {
        self.url_input
    }
}

impl TypeRegistryItem for IncomingWebhookModel {
    fn id(&self) -> &str {
        self.id
    }
}

impl ActionTypeModel for IncomingWebhookModel {
    fn icon_class(&self) -> &str {
        self.icon_class
    }

    fn select_message(&self) -> &str {
        self.select_message
    }

    fn action_type_title(&self) -> &str {
        self.title
    }

    fn validate_connector(&self, connector: &ActionConnector) -> ValidationResult {
        let mut result = ValidationResult::with_fields(&["webhookUrl"]);
        match non_blank(&connector.secrets, "webhookUrl") {
            None => result.push("webhookUrl", "Webhook URL is required."),
            Some(url) if !is_valid_url(url) => result.push("webhookUrl", "Webhook URL is invalid."),
            Some(url) if !url.starts_with("https://") => {
                result.push("webhookUrl", "Webhook URL must start with https://.")
            }
            Some(_) => {}
        }
        result
    }

    fn validate_params(&self, params: &Value) -> ValidationResult {
        let mut result = ValidationResult::with_fields(&["message"]);
        if param_str(params, "message").is_none() {
            result.push("message", "Message is required.");
        }
        result
    }

    fn connector_fields(&self, props: &ConnectorFieldsProps<'_>) -> FormView {
        FormView::new()
            .callout(Callout::credentials(props.connector, "Webhook URL"))
            .field(
                props,
                FormField::new(
                    self.url_input,
                    "Webhook URL",
                    FieldKind::Url,
                    FieldTarget::Secrets("webhookUrl".into()),
                ),
            )
    }
}
