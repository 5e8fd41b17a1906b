// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Index connector form.

use courier_core::ActionConnector;
use serde_json::Value;

use crate::model::{ActionTypeModel, TypeRegistryItem, ValidationResult, non_blank};
use crate::view::{ConnectorFieldsProps, FieldKind, FieldTarget, FormField, FormView};

pub const ACTION_TYPE_ID: &str = ".index";

#[derive(Debug, Clone, Copy, Default)]
pub struct IndexModel;

impl TypeRegistryItem for IndexModel {
    fn id(&self) -> &str {
        ACTION_TYPE_ID
    }
}

impl ActionTypeModel for IndexModel {
    fn icon_class(&self) -> &str {
        "indexOpen"
    }

    fn select_message(&self) -> &str {
        "Index data into Elasticsearch."
    }

    fn action_type_title(&self) -> &str {
        "Index data"
    }

    fn validate_connector(&self, connector: &ActionConnector) -> ValidationResult {
        let mut result = ValidationResult::with_fields(&["index"]);
        if non_blank(&connector.config, "index").is_none() {
            result.push("index", "Index is required.");
        }
        result
    }

    fn validate_params(&self, params: &Value) -> ValidationResult {
        let mut result = ValidationResult::with_fields(&["documents"]);
        let valid = params
            .get("documents")
            .and_then(Value::as_array)
            .is_some_and(|docs| !docs.is_empty() && docs.iter().all(Value::is_object));
        if !valid {
            result.push("documents", "Document is required and should be a valid JSON object.");
        }
        result
    }

    fn connector_fields(&self, props: &ConnectorFieldsProps<'_>) -> FormView {
        FormView::new()
            .field(
                props,
                FormField::new(
                    "connectorIndexesComboBox",
                    "Index",
                    FieldKind::Text,
                    FieldTarget::Config("index".into()),
                ),
            )
            .field(
                props,
                FormField::new(
                    "indexRefreshCheckbox",
                    "Refresh index",
                    FieldKind::Toggle,
                    FieldTarget::Config("refresh".into()),
                )
                .with_help_text(
                    "Refresh the affected shards to make this operation visible to search.",
                ),
            )
            .field(
                props,
                FormField::new(
                    "executionTimeFieldInput",
                    "Time field",
                    FieldKind::Text,
                    FieldTarget::Config("executionTimeField".into()),
                ),
            )
    }
}
