// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Forms for the ITSM case connectors: ServiceNow, Jira and IBM Resilient.
//!
//! The three share one shape: an API URL plus one or two config keys, two
//! secrets, and a `pushToService` sub-action whose incident needs a title-like
//! field. Each connector is described by a static table of its inputs.

use courier_core::ActionConnector;
use serde_json::Value;

use crate::model::{
    ActionTypeModel, TypeRegistryItem, ValidationResult, is_valid_url, non_blank, param_str,
};
use crate::view::{Callout, ConnectorFieldsProps, FieldKind, FieldTarget, FormField, FormView};

#[derive(Debug, Clone, Copy)]
enum Section {
    Config,
    Secrets,
}

#[derive(Debug, Clone, Copy)]
struct Input {
    key: &'static str,
    test_subj: &'static str,
    label: &'static str,
    section: Section,
    masked: bool,
    required: &'static str,
}

impl Input {
    const fn config(
        key: &'static str,
        test_subj: &'static str,
        label: &'static str,
        required: &'static str,
    ) -> Self {
        Self { key, test_subj, label, section: Section::Config, masked: false, required }
    }

    /// A secret shown in clear text, such as a username.
    const fn identity(
        key: &'static str,
        test_subj: &'static str,
        label: &'static str,
        required: &'static str,
    ) -> Self {
        Self { key, test_subj, label, section: Section::Secrets, masked: false, required }
    }

    const fn secret(
        key: &'static str,
        test_subj: &'static str,
        label: &'static str,
        required: &'static str,
    ) -> Self {
        Self { key, test_subj, label, section: Section::Secrets, masked: true, required }
    }

    fn kind(&self) -> FieldKind {
        if self.key == "apiUrl" {
            FieldKind::Url
        } else if self.masked {
            FieldKind::Password
        } else {
            FieldKind::Text
        }
    }

    fn target(&self) -> FieldTarget {
        match self.section {
            Section::Config => FieldTarget::Config(self.key.to_string()),
            Section::Secrets => FieldTarget::Secrets(self.key.to_string()),
        }
    }
}

/// Form model for one ITSM connector.
#[derive(Debug, Clone)]
pub struct ItsmModel {
    id: &'static str,
    icon_class: &'static str,
    select_message: &'static str,
    title: &'static str,
    inputs: &'static [Input],
    credentials: &'static str,
    /// Incident field that `pushToService` requires, with its message.
    title_field: (&'static str, &'static str),
    /// Whether incident labels are checked for whitespace.
    check_labels: bool,
}

const SERVICENOW_INPUTS: &[Input] = &[
    Input::config("apiUrl", "apiUrlFromInput", "URL", "URL is required."),
    Input::identity(
        "username",
        "connector-servicenow-username-form-input",
        "Username",
        "Username is required.",
    ),
    Input::secret(
        "password",
        "connector-servicenow-password-form-input",
        "Password",
        "Password is required.",
    ),
];

const JIRA_INPUTS: &[Input] = &[
    Input::config("apiUrl", "apiUrlFromInput", "URL", "URL is required."),
    Input::config(
        "projectKey",
        "connector-jira-project-key-form-input",
        "Project key",
        "Project key is required",
    ),
    Input::identity("email", "connector-jira-email-form-input", "Email", "Email is required"),
    Input::secret(
        "apiToken",
        "connector-jira-apiToken-form-input",
        "API token",
        "API token is required",
    ),
];

const RESILIENT_INPUTS: &[Input] = &[
    Input::config("apiUrl", "apiUrlFromInput", "URL", "URL is required."),
    Input::config(
        "orgId",
        "connector-resilient-orgId-form-input",
        "Organization ID",
        "Organization ID is required",
    ),
    Input::identity(
        "apiKeyId",
        "connector-resilient-apiKeyId-form-input",
        "API key ID",
        "API key ID is required",
    ),
    Input::secret(
        "apiKeySecret",
        "connector-resilient-apiKeySecret-form-input",
        "API key secret",
        "API key secret is required",
    ),
];

impl ItsmModel {
    pub fn servicenow() -> Self {
        Self {
            id: ".servicenow",
            icon_class: "logoServiceNow",
            select_message: "Create an incident in ServiceNow.",
            title: "ServiceNow",
            inputs: SERVICENOW_INPUTS,
            credentials: "Username and password",
            title_field: ("short_description", "Short description is required."),
            check_labels: false,
        }
    }

    pub fn jira() -> Self {
        Self {
            id: ".jira",
            icon_class: "logoJira",
            select_message: "Create an incident in Jira.",
            title: "Jira",
            inputs: JIRA_INPUTS,
            credentials: "Email and API token",
            title_field: ("summary", "Summary is required."),
            check_labels: true,
        }
    }

    pub fn resilient() -> Self {
        Self {
            id: ".resilient",
            icon_class: "logoResilient",
            select_message: "Create an incident in IBM Resilient.",
            title: "IBM Resilient",
            inputs: RESILIENT_INPUTS,
            credentials: "API key ID and secret",
            title_field: ("name", "Name is required."),
            check_labels: false,
        }
    }
}

impl TypeRegistryItem for ItsmModel {
    fn id(&self) -> &str {
        self.id
    }
}

impl ActionTypeModel for ItsmModel {
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
        let keys: Vec<&str> = self.inputs.iter().map(|i| i.key).collect();
        let mut result = ValidationResult::with_fields(&keys);
        for input in self.inputs {
            let map = match input.section {
                Section::Config => &connector.config,
                Section::Secrets => &connector.secrets,
            };
            match non_blank(map, input.key) {
                None => result.push(input.key, input.required),
                Some(url) if input.key == "apiUrl" && !is_valid_url(url) => {
                    result.push(input.key, "URL is invalid.")
                }
                Some(_) => {}
            }
        }
        result
    }

    fn validate_params(&self, params: &Value) -> ValidationResult {
        let (field, message) = self.title_field;
        let mut fields = vec![field];
        if self.check_labels {
            fields.push("labels");
        }
        let mut result = ValidationResult::with_fields(&fields);

        if params.get("subAction").and_then(Value::as_str) != Some("pushToService") {
            return result;
        }
        let incident = params
            .get("subActionParams")
            .and_then(|p| p.get("incident"))
            .unwrap_or(&Value::Null);
        if param_str(incident, field).is_none() {
            result.push(field, message);
        }
        if self.check_labels {
            let spaced = incident
                .get("labels")
                .and_then(Value::as_array)
                .is_some_and(|labels| {
                    labels
                        .iter()
                        .filter_map(Value::as_str)
                        .any(|l| l.contains(char::is_whitespace))
                });
            if spaced {
                result.push("labels", "Labels cannot contain spaces.");
            }
        }
        result
    }

    fn connector_fields(&self, props: &ConnectorFieldsProps<'_>) -> FormView {
        self.inputs.iter().fold(
            FormView::new().callout(Callout::credentials(props.connector, self.credentials)),
            |view, input| {
                view.field(
                    props,
                    FormField::new(input.test_subj, input.label, input.kind(), input.target()),
                )
            },
        )
    }
}
