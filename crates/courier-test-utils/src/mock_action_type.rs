// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock action type for deterministic executor tests.
//!
//! `MockActionType` records every invocation it receives and answers with a
//! pre-configured outcome, without any network access.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use courier_core::schema::SchemaKind;
use courier_core::{ActionType, ActionTypeExecutorResult, CourierError, ExecutorOptions};
use serde_json::Value;

/// What the mock does when executed.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Return an ok result carrying this data.
    Ok(Value),
    /// Return an error-status result with this message.
    ErrorResult(String),
    /// Fail the executor itself with a service error.
    Fail(String),
}

/// A mock action type with injectable validation failures and outcome.
pub struct MockActionType {
    id: String,
    outcome: MockOutcome,
    reject: Option<SchemaKind>,
    calls: Arc<Mutex<Vec<ExecutorOptions>>>,
}

impl MockActionType {
    /// Create a mock that succeeds with `null` data.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            outcome: MockOutcome::Ok(Value::Null),
            reject: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_outcome(mut self, outcome: MockOutcome) -> Self {
        self.outcome = outcome;
        self
    }

    /// Make validation of the given kind fail.
    pub fn rejecting(mut self, kind: SchemaKind) -> Self {
        self.reject = Some(kind);
        self
    }

    /// Handle to the recorded invocations, usable after the mock is registered.
    pub fn calls(&self) -> Arc<Mutex<Vec<ExecutorOptions>>> {
        Arc::clone(&self.calls)
    }

    fn check(&self, kind: SchemaKind) -> Result<(), CourierError> {
        if self.reject == Some(kind) {
            Err(CourierError::validation(kind, "rejected by mock"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ActionType for MockActionType {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        "Mock"
    }

    fn validate_config(&self, _config: &Value) -> Result<(), CourierError> {
        self.check(SchemaKind::Config)
    }

    fn validate_secrets(&self, _secrets: &Value) -> Result<(), CourierError> {
        self.check(SchemaKind::Secrets)
    }

    fn validate_params(&self, _params: &Value) -> Result<(), CourierError> {
        self.check(SchemaKind::Params)
    }

    async fn execute(
        &self,
        options: ExecutorOptions,
    ) -> Result<ActionTypeExecutorResult, CourierError> {
        let action_id = options.action_id.clone();
        self.calls.lock().await.push(options);
        match &self.outcome {
            MockOutcome::Ok(data) => Ok(ActionTypeExecutorResult::ok_with_data(
                action_id,
                data.clone(),
            )),
            MockOutcome::ErrorResult(message) => {
                Ok(ActionTypeExecutorResult::error(action_id, message.clone()))
            }
            MockOutcome::Fail(message) => Err(CourierError::service(message.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> ExecutorOptions {
        ExecutorOptions {
            action_id: "a1".into(),
            config: Value::Null,
            secrets: Value::Null,
            params: serde_json::json!({"message": "hi"}),
        }
    }

    #[tokio::test]
    async fn records_calls() {
        let mock = MockActionType::new(".mock");
        let calls = mock.calls();
        let result = mock.execute(options()).await.unwrap();
        assert!(result.is_ok());
        assert_eq!(calls.lock().await.len(), 1);
        assert_eq!(calls.lock().await[0].params["message"], "hi");
    }

    #[tokio::test]
    async fn rejecting_fails_only_selected_kind() {
        let mock = MockActionType::new(".mock").rejecting(SchemaKind::Params);
        assert!(mock.validate_config(&Value::Null).is_ok());
        assert!(mock.validate_params(&Value::Null).is_err());
    }

    #[tokio::test]
    async fn fail_outcome_is_an_executor_error() {
        let mock = MockActionType::new(".mock").with_outcome(MockOutcome::Fail("down".into()));
        assert!(mock.execute(options()).await.is_err());
    }
}
