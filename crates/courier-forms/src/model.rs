// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The per-connector form model and its validation result.

use std::collections::BTreeMap;

use courier_core::ActionConnector;
use serde::Serialize;
use serde_json::Value;

use crate::view::{ConnectorFieldsProps, FormView};

/// Per-field validation messages.
///
/// Every field a model validates has an entry; an empty list means the field
/// is valid.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ValidationResult {
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ValidationResult {
    /// A result with an empty error list for each of `fields`.
    pub fn with_fields(fields: &[&str]) -> Self {
        Self {
            errors: fields
                .iter()
                .map(|f| (f.to_string(), Vec::new()))
                .collect(),
        }
    }

    /// Record `message` against `field`.
    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_valid(&self) -> bool {
        self.errors.values().all(Vec::is_empty)
    }

    /// Messages for `field`; empty when the field is valid or unknown.
    pub fn field(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Anything stored in a [`crate::TypeRegistry`].
pub trait TypeRegistryItem: Send + Sync {
    fn id(&self) -> &str;
}

/// The form side of a connector type.
pub trait ActionTypeModel: TypeRegistryItem {
    /// Icon shown next to the connector in pickers.
    fn icon_class(&self) -> &str;

    /// One-line description shown when choosing a connector type.
    fn select_message(&self) -> &str;

    fn action_type_title(&self) -> &str;

    /// Check a connector's config and secrets field by field.
    fn validate_connector(&self, connector: &ActionConnector) -> ValidationResult;

    /// Check invocation params field by field.
    fn validate_params(&self, params: &Value) -> ValidationResult;

    /// Describe the connector form.
    fn connector_fields(&self, props: &ConnectorFieldsProps<'_>) -> FormView;
}

/// Trimmed string at `key` in `map`, `None` when missing, blank or not a string.
pub(crate) fn non_blank<'a>(map: &'a serde_json::Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Non-blank string param at `key`.
pub(crate) fn param_str<'a>(params: &'a Value, key: &str) -> Option<&'a str> {
    params.as_object().and_then(|map| non_blank(map, key))
}

/// True when `value` parses as an absolute URL.
pub(crate) fn is_valid_url(value: &str) -> bool {
    url::Url::parse(value).is_ok()
}
