// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Email connector form.

use courier_core::ActionConnector;
use serde_json::Value;

use super::{check_user_password, has_auth};
use crate::model::{ActionTypeModel, TypeRegistryItem, ValidationResult, non_blank, param_str};
use crate::view::{Callout, ConnectorFieldsProps, FieldKind, FieldTarget, FormField, FormView};

pub const ACTION_TYPE_ID: &str = ".email";

/// Services whose host and port are filled in by the server.
pub const WELL_KNOWN_SERVICES: [&str; 3] = ["gmail", "outlook365", "ses"];

const NO_RECIPIENTS: &str = "No To, Cc, or Bcc entry. At least one entry is required.";

#[derive(Debug, Clone, Copy, Default)]
pub struct EmailModel;

fn is_valid_address(address: &str) -> bool {
    // Accept `Name <user@host>` as well as a bare address.
    let bare = match (address.find('<'), address.rfind('>')) {
        (Some(start), Some(end)) if start < end => &address[start + 1..end],
        _ => address,
    };
    match bare.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

fn recipient_count(params: &Value, key: &str) -> usize {
    params
        .get(key)
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .count()
        })
        .unwrap_or(0)
}

impl TypeRegistryItem for EmailModel {
    fn id(&self) -> &str {
        ACTION_TYPE_ID
    }
}

impl ActionTypeModel for EmailModel {
    fn icon_class(&self) -> &str {
        "email"
    }

    fn select_message(&self) -> &str {
        "Send email from your server."
    }

    fn action_type_title(&self) -> &str {
        "Send to email"
    }

    fn validate_connector(&self, connector: &ActionConnector) -> ValidationResult {
        let mut result =
            ValidationResult::with_fields(&["from", "host", "port", "user", "password"]);
        let config = &connector.config;

        match non_blank(config, "from") {
            None => result.push("from", "Sender is required."),
            Some(from) if !is_valid_address(from) => {
                result.push("from", "Sender is not a valid email address.")
            }
            Some(_) => {}
        }

        let well_known = non_blank(config, "service")
            .is_some_and(|service| WELL_KNOWN_SERVICES.contains(&service));
        if !well_known {
            if non_blank(config, "host").is_none() {
                result.push("host", "Host is required.");
            }
            if !config.get("port").is_some_and(Value::is_u64) {
                result.push("port", "Port is required.");
            }
        }

        check_user_password(connector, &mut result);
        result
    }

    fn validate_params(&self, params: &Value) -> ValidationResult {
        let mut result = ValidationResult::with_fields(&["to", "cc", "bcc", "subject", "message"]);
        let total: usize = ["to", "cc", "bcc"]
            .iter()
            .map(|key| recipient_count(params, key))
            .sum();
        if total == 0 {
            for key in ["to", "cc", "bcc"] {
                result.push(key, NO_RECIPIENTS);
            }
        }
        if param_str(params, "subject").is_none() {
            result.push("subject", "Subject is required.");
        }
        if param_str(params, "message").is_none() {
            result.push("message", "Message is required.");
        }
        result
    }

    fn connector_fields(&self, props: &ConnectorFieldsProps<'_>) -> FormView {
        let mut services: Vec<String> = WELL_KNOWN_SERVICES.iter().map(|s| s.to_string()).collect();
        services.push("other".to_string());

        let mut view = FormView::new()
            .field(
                props,
                FormField::new(
                    "emailFromInput",
                    "Sender",
                    FieldKind::Text,
                    FieldTarget::Config("from".into()),
                ),
            )
            .field(
                props,
                FormField::new(
                    "emailServiceSelectInput",
                    "Service",
                    FieldKind::Select { options: services },
                    FieldTarget::Config("service".into()),
                ),
            )
            .field(
                props,
                FormField::new(
                    "emailHostInput",
                    "Host",
                    FieldKind::Text,
                    FieldTarget::Config("host".into()),
                ),
            )
            .field(
                props,
                FormField::new(
                    "emailPortInput",
                    "Port",
                    FieldKind::Number,
                    FieldTarget::Config("port".into()),
                ),
            )
            .field(
                props,
                FormField::new(
                    "emailSecureSwitch",
                    "Secure",
                    FieldKind::Toggle,
                    FieldTarget::Config("secure".into()),
                ),
            )
            .field(
                props,
                FormField::new(
                    "emailHasAuthSwitch",
                    "Require authentication for this server",
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
                        "emailUserInput",
                        "Username",
                        FieldKind::Text,
                        FieldTarget::Secrets("user".into()),
                    ),
                )
                .field(
                    props,
                    FormField::new(
                        "emailPasswordInput",
                        "Password",
                        FieldKind::Password,
                        FieldTarget::Secrets("password".into()),
                    ),
                );
        }
        view
    }
}
