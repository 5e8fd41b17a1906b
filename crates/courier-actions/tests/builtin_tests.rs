// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registration and end-to-end execution of the built-in connectors.

use std::sync::Arc;

use courier_actions::{
    BUILTIN_ACTION_TYPE_IDS, BuiltinActionTypeDeps, builtin_action_types,
    register_builtin_action_types,
};
use courier_config::model::{ActionsConfig, ElasticsearchConfig};
use courier_core::ExecutionStatus;
use courier_registry::{ActionExecutor, ActionTypeRegistry, ExecuteRequest};
use courier_security::ActionsConfigurationUtilities;
use courier_test_utils::connector;
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn deps(actions: ActionsConfig) -> BuiltinActionTypeDeps {
    BuiltinActionTypeDeps {
        utils: Arc::new(ActionsConfigurationUtilities::new(&actions)),
        public_base_url: Some("https://courier.example.com".into()),
        elasticsearch: ElasticsearchConfig::default(),
    }
}

fn registry(actions: ActionsConfig) -> ActionTypeRegistry {
    let deps = deps(actions);
    let mut registry = ActionTypeRegistry::new(Arc::clone(&deps.utils));
    register_builtin_action_types(&mut registry, &deps).unwrap();
    registry
}

fn executor(actions: ActionsConfig) -> ActionExecutor {
    ActionExecutor::new(Arc::new(registry(actions)))
}

fn request(action_type_id: &str, config: Value, secrets: Value, params: Value) -> ExecuteRequest {
    ExecuteRequest {
        action_id: "connector-1".into(),
        action_type_id: action_type_id.into(),
        config,
        secrets,
        params,
    }
}

#[test]
fn registers_all_builtin_types_in_order() {
    let built = builtin_action_types(&deps(ActionsConfig::default())).unwrap();
    let ids: Vec<&str> = built.iter().map(|t| t.id()).collect();
    assert_eq!(ids, BUILTIN_ACTION_TYPE_IDS);
    assert_eq!(
        ids,
        [
            ".email",
            ".index",
            ".pagerduty",
            ".swimlane",
            ".server-log",
            ".slack",
            ".webhook",
            ".servicenow",
            ".jira",
            ".resilient",
            ".teams"
        ]
    );

    let registry = registry(ActionsConfig::default());
    assert_eq!(registry.len(), 11);
    for id in BUILTIN_ACTION_TYPE_IDS {
        assert!(registry.has(id), "{id} should be registered");
        assert_eq!(registry.get(id).unwrap().id(), id);
    }
}

#[test]
fn registering_twice_fails() {
    let deps = deps(ActionsConfig::default());
    let mut registry = ActionTypeRegistry::new(Arc::clone(&deps.utils));
    register_builtin_action_types(&mut registry, &deps).unwrap();
    let err = register_builtin_action_types(&mut registry, &deps).unwrap_err();
    assert_eq!(err.to_string(), "Action type \".email\" is already registered.");
}

#[test]
fn listing_reports_enabled_state() {
    let registry = registry(ActionsConfig {
        enabled_action_types: vec![".server-log".into(), ".slack".into()],
        ..ActionsConfig::default()
    });
    let list = registry.list();
    assert_eq!(list.len(), 11);
    let enabled: Vec<&str> = list
        .iter()
        .filter(|info| info.enabled)
        .map(|info| info.id.as_str())
        .collect();
    assert_eq!(enabled, [".server-log", ".slack"]);
    let swimlane = list.iter().find(|info| info.id == ".swimlane").unwrap();
    assert_eq!(swimlane.name, "Swimlane");
}

#[tokio::test]
async fn server_log_runs_end_to_end() {
    let executor = executor(ActionsConfig::default());
    let result = executor
        .execute(request(
            ".server-log",
            json!({}),
            json!({}),
            json!({"message": "hello from a test"}),
        ))
        .await;
    assert_eq!(result.status, ExecutionStatus::Ok);
    assert_eq!(result.action_id, "connector-1");
}

#[tokio::test]
async fn disallowed_host_fails_config_validation() {
    let executor = executor(ActionsConfig {
        allowed_hosts: vec!["hooks.example.com".into()],
        ..ActionsConfig::default()
    });
    let result = executor
        .execute(request(
            ".webhook",
            json!({"url": "https://elsewhere.example.com/hook"}),
            json!({}),
            json!({"body": "{}"}),
        ))
        .await;
    assert_eq!(result.status, ExecutionStatus::Error);
    assert_eq!(
        result.message.as_deref(),
        Some(
            "error validating action type config: error configuring webhook action: \
             target url \"https://elsewhere.example.com/hook\" is not added to the courier config \
             actions.allowed_hosts"
        )
    );
}

#[tokio::test]
async fn disabled_type_is_rejected_before_validation() {
    let executor = executor(ActionsConfig {
        enabled_action_types: vec![".slack".into()],
        ..ActionsConfig::default()
    });
    let result = executor
        .execute(request(".server-log", json!({}), json!({}), json!({})))
        .await;
    assert_eq!(
        result.message.as_deref(),
        Some(
            "action type \".server-log\" is not enabled in the courier config actions.enabled_action_types"
        )
    );
}

#[tokio::test]
async fn invalid_params_are_reported() {
    let executor = executor(ActionsConfig::default());
    let result = executor
        .execute(request(
            ".pagerduty",
            json!({}),
            json!({"routingKey": "rk"}),
            json!({"eventAction": "acknowledge"}),
        ))
        .await;
    assert_eq!(
        result.message.as_deref(),
        Some(
            "error validating action params: DedupKey is required when eventAction is \"acknowledge\""
        )
    );
}

#[tokio::test]
async fn swimlane_connector_creates_record() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/app/1234567asbd32/record"))
        .and(header("Private-Token", "test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "r1", "name": "SW-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let executor = executor(ActionsConfig::default());
    let swimlane = connector(
        Some("test"),
        ".swimlane",
        json!({
            "apiUrl": server.uri(),
            "appId": "1234567asbd32",
            "username": "username",
            "mappings": {
                "alertSourceKeyName": {"id": "f1", "key": "alert-source"},
                "severityKeyName": {"id": "f2", "key": "severity"},
                "caseIdKeyName": {"id": "f3", "key": "case-id"},
                "alertNameKeyName": {"id": "f4", "key": "alert-name"}
            }
        }),
        json!({"apiToken": "test"}),
    );
    let result = executor
        .execute_connector(
            &swimlane,
            json!({
                "subAction": "createRecord",
                "subActionParams": {"alertName": "a", "severity": "low", "alertSource": "s"}
            }),
        )
        .await;
    assert_eq!(result.status, ExecutionStatus::Ok, "{result:?}");
    assert_eq!(result.action_id, "test");
    assert_eq!(result.data.unwrap()["title"], "SW-1");
}

#[tokio::test]
async fn vendor_failure_is_wrapped_by_the_executor() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let executor = executor(ActionsConfig::default());
    let result = executor
        .execute(request(
            ".servicenow",
            json!({"apiUrl": server.uri()}),
            json!({"username": "u", "password": "p"}),
            json!({
                "subAction": "pushToService",
                "subActionParams": {"incident": {"short_description": "x"}}
            }),
        ))
        .await;
    assert_eq!(
        result.message.as_deref(),
        Some(
            "an error occurred while running the action executor: \
             [Action][ServiceNow]: Unable to create incident. Error: [500] Internal Server Error"
        )
    );
}
