// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the executor service.

use std::sync::Arc;

use courier_core::schema::SchemaKind;
use courier_core::{ExecutionStatus, Retry};
use courier_registry::ExecuteRequest;
use courier_test_utils::{MockActionType, MockOutcome, TestHarness, connector};
use serde_json::json;

fn request(action_type_id: &str) -> ExecuteRequest {
    ExecuteRequest {
        action_id: "conn-1".to_string(),
        action_type_id: action_type_id.to_string(),
        config: json!({}),
        secrets: json!({}),
        params: json!({"message": "hello"}),
    }
}

#[tokio::test]
async fn executes_registered_action_type() {
    let mock = MockActionType::new(".mock").with_outcome(MockOutcome::Ok(json!({"sent": true})));
    let calls = mock.calls();
    let harness = TestHarness::builder()
        .with_action_type(Arc::new(mock))
        .build()
        .unwrap();

    let result = harness.executor.execute(request(".mock")).await;
    assert_eq!(result.status, ExecutionStatus::Ok);
    assert_eq!(result.action_id, "conn-1");
    assert_eq!(result.data, Some(json!({"sent": true})));

    let calls = calls.lock().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].params["message"], "hello");
}

#[tokio::test]
async fn unknown_action_type_is_an_error_result() {
    let harness = TestHarness::builder().build().unwrap();
    let result = harness.executor.execute(request(".nope")).await;
    assert_eq!(result.status, ExecutionStatus::Error);
    assert_eq!(
        result.message.as_deref(),
        Some("Action type \".nope\" is not registered.")
    );
}

#[tokio::test]
async fn disabled_action_type_is_not_executed() {
    let mock = MockActionType::new(".mock");
    let calls = mock.calls();
    let harness = TestHarness::builder()
        .with_enabled_action_types(&[".other"])
        .with_action_type(Arc::new(mock))
        .build()
        .unwrap();

    let result = harness.executor.execute(request(".mock")).await;
    assert_eq!(result.status, ExecutionStatus::Error);
    assert!(
        result
            .message
            .as_deref()
            .unwrap()
            .contains("is not enabled in the courier config")
    );
    assert!(calls.lock().await.is_empty());
}

#[tokio::test]
async fn validation_failures_name_the_failing_part() {
    for (kind, prefix) in [
        (SchemaKind::Config, "error validating action type config"),
        (SchemaKind::Secrets, "error validating action type secrets"),
        (SchemaKind::Params, "error validating action params"),
    ] {
        let mock = MockActionType::new(".mock").rejecting(kind);
        let calls = mock.calls();
        let harness = TestHarness::builder()
            .with_action_type(Arc::new(mock))
            .build()
            .unwrap();

        let result = harness.executor.execute(request(".mock")).await;
        assert_eq!(result.status, ExecutionStatus::Error);
        assert!(result.message.as_deref().unwrap().starts_with(prefix));
        assert!(calls.lock().await.is_empty());
    }
}

#[tokio::test]
async fn executor_failure_is_wrapped() {
    let mock = MockActionType::new(".mock").with_outcome(MockOutcome::Fail("socket closed".into()));
    let harness = TestHarness::builder()
        .with_action_type(Arc::new(mock))
        .build()
        .unwrap();

    let result = harness.executor.execute(request(".mock")).await;
    assert_eq!(
        result.message.as_deref(),
        Some("an error occurred while running the action executor: socket closed")
    );
    assert_eq!(result.retry, None::<Retry>);
}

#[tokio::test]
async fn error_results_pass_through_unchanged() {
    let mock =
        MockActionType::new(".mock").with_outcome(MockOutcome::ErrorResult("rate limited".into()));
    let harness = TestHarness::builder()
        .with_action_type(Arc::new(mock))
        .build()
        .unwrap();

    let result = harness.executor.execute(request(".mock")).await;
    assert_eq!(result.message.as_deref(), Some("rate limited"));
}

#[tokio::test]
async fn unsaved_connector_executes_as_preview() {
    let harness = TestHarness::builder()
        .with_action_type(Arc::new(MockActionType::new(".mock")))
        .build()
        .unwrap();

    let draft = connector(None, ".mock", json!({}), json!({}));
    let result = harness
        .executor
        .execute_connector(&draft, json!({"message": "hi"}))
        .await;
    assert!(result.is_ok());
    assert_eq!(result.action_id, "preview");
}

#[test]
fn duplicate_mock_registration_fails_build() {
    let result = TestHarness::builder()
        .with_action_type(Arc::new(MockActionType::new(".mock")))
        .with_action_type(Arc::new(MockActionType::new(".mock")))
        .build();
    assert!(result.is_err());
}
