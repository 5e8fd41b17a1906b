// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Swimlane form model looked up through the registry.

use std::collections::BTreeMap;
use std::sync::Arc;

use courier_core::ActionConnector;
use courier_forms::{
    ActionTypeModel, ConnectorFieldsProps, REENTER_VALUES_MESSAGE, REMEMBER_VALUES_MESSAGE,
    TypeRegistry, TypeRegistryItem, ValidationResult, register_builtin_action_type_models,
};
use courier_test_utils::connector;
use serde_json::json;

const ACTION_TYPE_ID: &str = ".swimlane";

fn model() -> Arc<dyn ActionTypeModel> {
    let mut registry: TypeRegistry<dyn ActionTypeModel> = TypeRegistry::new();
    register_builtin_action_type_models(&mut registry).unwrap();
    registry.get(ACTION_TYPE_ID).unwrap()
}

fn saved_connector() -> ActionConnector {
    connector(
        Some("test"),
        ACTION_TYPE_ID,
        json!({
            "apiUrl": "http:\\test",
            "appId": "1234567asbd32",
            "username": "username"
        }),
        json!({"apiToken": "test"}),
    )
}

fn all_valid() -> ValidationResult {
    ValidationResult::with_fields(&["username", "apiToken", "apiUrl", "appId"])
}

#[test]
fn static_data() {
    let model = model();
    assert_eq!(model.id(), ACTION_TYPE_ID);
    assert_eq!(model.icon_class(), "logoSwimlane");
    assert_eq!(model.action_type_title(), "Create Swimlane Record");
}

#[test]
fn valid_connector_has_empty_error_lists() {
    let model = model();
    let mut c = saved_connector();
    assert_eq!(model.validate_connector(&c), all_valid());

    c.config.remove("apiUrl");
    c.secrets.insert("apiToken".into(), json!("test1"));
    assert_eq!(model.validate_connector(&c), all_valid());
}

#[test]
fn missing_username_is_reported() {
    let model = model();
    let mut c = saved_connector();
    c.config.remove("username");

    let mut expected = all_valid();
    expected.push("username", "Username is required.");
    assert_eq!(model.validate_connector(&c), expected);
}

#[test]
fn missing_app_id_and_token_are_reported() {
    let model = model();
    let c = connector(
        None,
        ACTION_TYPE_ID,
        json!({"apiUrl": "not a url", "username": "u"}),
        json!({}),
    );
    let result = model.validate_connector(&c);
    assert_eq!(result.field("apiUrl"), ["URL is invalid."]);
    assert_eq!(result.field("appId"), ["An App ID is required."]);
    assert_eq!(result.field("apiToken"), ["An API token is required."]);
    assert!(result.field("username").is_empty());
}

#[test]
fn all_fields_are_rendered_with_values() {
    let model = model();
    let c = saved_connector();
    let mut errors = BTreeMap::new();
    errors.insert("index".to_string(), Vec::new());
    errors.insert("apiToken".to_string(), Vec::new());
    let view = model.connector_fields(&ConnectorFieldsProps {
        connector: &c,
        errors: &errors,
        read_only: false,
    });

    let api_url = view.get("swimlaneApiUrlInput").unwrap();
    assert_eq!(api_url.value_str(), Some("http:\\test"));
    assert!(view.contains("swimlaneAppIdInput"));
    assert!(view.contains("swimlaneUsernameInput"));
    assert!(view.contains("swimlaneApiTokenInput"));
}

#[test]
fn create_shows_remember_values_message() {
    let model = model();
    let c = connector(None, ACTION_TYPE_ID, json!({}), json!({}));
    let errors = BTreeMap::new();
    let view = model.connector_fields(&ConnectorFieldsProps {
        connector: &c,
        errors: &errors,
        read_only: false,
    });
    assert!(view.contains(REMEMBER_VALUES_MESSAGE));
    assert!(!view.contains(REENTER_VALUES_MESSAGE));
}

#[test]
fn edit_shows_reenter_values_message() {
    let model = model();
    let c = saved_connector();
    let errors = BTreeMap::new();
    let view = model.connector_fields(&ConnectorFieldsProps {
        connector: &c,
        errors: &errors,
        read_only: false,
    });
    assert!(view.contains(REENTER_VALUES_MESSAGE));
    assert!(!view.contains(REMEMBER_VALUES_MESSAGE));
}

#[test]
fn form_edits_update_the_connector() {
    let model = model();
    let mut c = connector(None, ACTION_TYPE_ID, json!({}), json!({}));
    let errors = BTreeMap::new();
    let view = model.connector_fields(&ConnectorFieldsProps {
        connector: &c.clone(),
        errors: &errors,
        read_only: false,
    });
    view.apply(&mut c, "swimlaneAppIdInput", json!("app-1")).unwrap();
    view.apply(&mut c, "swimlaneApiTokenInput", json!("tok")).unwrap();
    view.apply(&mut c, "swimlaneUsernameInput", json!("me")).unwrap();
    assert_eq!(c.config_str("appId"), Some("app-1"));
    assert_eq!(c.secret_str("apiToken"), Some("tok"));

    let result = model.validate_connector(&c);
    assert!(result.is_valid());
}

#[test]
fn create_record_params() {
    let model = model();
    let result = model.validate_params(&json!({
        "subAction": "createRecord",
        "subActionParams": {"alertName": "cpu"}
    }));
    assert!(result.field("alertName").is_empty());
    assert_eq!(result.field("alertSource"), ["Alert source is required."]);

    let app =
        model.validate_params(&json!({"subAction": "application", "subActionParams": {"id": "1"}}));
    assert!(app.is_valid());
}
