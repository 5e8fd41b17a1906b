// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Renderer-neutral description of a connector form.
//!
//! A [`FormView`] lists the inputs a connector form shows, each with its
//! `data-test-subj` id, current value, read-only flag and validation errors,
//! plus any callouts shown above them. Edits flow back through
//! [`FormView::apply`], which routes a value to the connector's `config` or
//! `secrets` depending on the field.

use std::collections::BTreeMap;

use courier_core::ActionConnector;
use serde::Serialize;
use serde_json::Value;

use crate::error::FormError;

/// Test subject of the callout shown while creating a connector.
pub const REMEMBER_VALUES_MESSAGE: &str = "rememberValuesMessage";
/// Test subject of the callout shown while editing a connector.
pub const REENTER_VALUES_MESSAGE: &str = "reenterValuesMessage";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum FieldKind {
    Text,
    Url,
    Password,
    Number,
    Toggle,
    TextArea,
    Select { options: Vec<String> },
}

/// Where an edit to a field is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "section", content = "key")]
pub enum FieldTarget {
    Config(String),
    Secrets(String),
}

impl FieldTarget {
    pub fn key(&self) -> &str {
        match self {
            FieldTarget::Config(key) | FieldTarget::Secrets(key) => key,
        }
    }

    fn read<'a>(&self, connector: &'a ActionConnector) -> Option<&'a Value> {
        match self {
            FieldTarget::Config(key) => connector.config.get(key),
            FieldTarget::Secrets(key) => connector.secrets.get(key),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    pub test_subj: String,
    pub label: String,
    pub kind: FieldKind,
    pub target: FieldTarget,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    pub read_only: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
}

impl FormField {
    /// A value-less field; [`FormView::field`] fills in value, errors and read-only state.
    pub fn new(test_subj: &str, label: &str, kind: FieldKind, target: FieldTarget) -> Self {
        Self {
            test_subj: test_subj.to_string(),
            label: label.to_string(),
            kind,
            target,
            value: None,
            read_only: false,
            errors: Vec::new(),
            help_text: None,
        }
    }

    pub fn with_help_text(mut self, help_text: &str) -> Self {
        self.help_text = Some(help_text.to_string());
        self
    }

    /// The current value as a string, if it is one.
    pub fn value_str(&self) -> Option<&str> {
        self.value.as_ref().and_then(Value::as_str)
    }

    pub fn is_invalid(&self) -> bool {
        !self.errors.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Callout {
    pub test_subj: String,
    pub title: String,
}

impl Callout {
    /// The credentials callout matching the connector's lifecycle stage.
    ///
    /// A connector without an id is being created, one with an id is being edited.
    pub fn credentials(connector: &ActionConnector, fields: &str) -> Self {
        if connector.is_new() {
            Callout {
                test_subj: REMEMBER_VALUES_MESSAGE.to_string(),
                title: format!(
                    "Remember these values. You must reenter them each time you edit the connector. ({fields})"
                ),
            }
        } else {
            Callout {
                test_subj: REENTER_VALUES_MESSAGE.to_string(),
                title: format!(
                    "Values are encrypted. Please reenter values for these fields. ({fields})"
                ),
            }
        }
    }
}

/// Inputs passed to [`crate::ActionTypeModel::connector_fields`].
#[derive(Debug, Clone, Copy)]
pub struct ConnectorFieldsProps<'a> {
    pub connector: &'a ActionConnector,
    pub errors: &'a BTreeMap<String, Vec<String>>,
    pub read_only: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormView {
    pub callouts: Vec<Callout>,
    pub fields: Vec<FormField>,
}

impl FormView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, taking its value from the connector and its errors
    /// from the entry keyed by the field's config or secrets key.
    pub fn field(mut self, props: &ConnectorFieldsProps<'_>, mut field: FormField) -> Self {
        field.value = field.target.read(props.connector).cloned();
        field.errors = props
            .errors
            .get(field.target.key())
            .cloned()
            .unwrap_or_default();
        field.read_only = props.read_only;
        self.fields.push(field);
        self
    }

    pub fn callout(mut self, callout: Callout) -> Self {
        self.callouts.push(callout);
        self
    }

    pub fn get(&self, test_subj: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.test_subj == test_subj)
    }

    /// True when a field or callout with this test subject is rendered.
    pub fn contains(&self, test_subj: &str) -> bool {
        self.get(test_subj).is_some() || self.callouts.iter().any(|c| c.test_subj == test_subj)
    }

    /// Store an edit made through the field `test_subj`.
    ///
    /// `null` clears the key.
    pub fn apply(
        &self,
        connector: &mut ActionConnector,
        test_subj: &str,
        value: Value,
    ) -> Result<(), FormError> {
        let field = self.get(test_subj).ok_or_else(|| FormError::UnknownField {
            test_subj: test_subj.to_string(),
        })?;
        if field.read_only {
            return Err(FormError::ReadOnly {
                test_subj: test_subj.to_string(),
            });
        }

        let section = match &field.target {
            FieldTarget::Config(_) => &mut connector.config,
            FieldTarget::Secrets(_) => &mut connector.secrets,
        };
        let key = field.target.key().to_string();
        if value.is_null() {
            section.remove(&key);
        } else {
            section.insert(key, value);
        }
        Ok(())
    }
}
