// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The action type trait every connector implements.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::CourierError;
use crate::types::{ActionTypeExecutorResult, ExecutorOptions};

/// A named integration with an external notification service.
///
/// The validation hooks run before [`ActionType::execute`] and receive the raw
/// JSON objects. Implementations usually deserialize them into typed schema
/// structs with [`crate::schema::parse`] and then apply semantic checks such
/// as the host allow-list.
#[async_trait]
pub trait ActionType: Send + Sync + 'static {
    /// Unique identifier, e.g. `.slack`.
    fn id(&self) -> &str;

    /// Human-readable name, e.g. `Slack`.
    fn name(&self) -> &str;

    /// Validates the public, non-secret configuration.
    fn validate_config(&self, _config: &Value) -> Result<(), CourierError> {
        Ok(())
    }

    /// Validates the credentials.
    fn validate_secrets(&self, _secrets: &Value) -> Result<(), CourierError> {
        Ok(())
    }

    /// Validates the per-invocation parameters.
    fn validate_params(&self, _params: &Value) -> Result<(), CourierError> {
        Ok(())
    }

    /// Performs the external side effect.
    ///
    /// Service failures that the caller should see are returned as an
    /// `Ok` result with error status; `Err` is reserved for failures of the
    /// executor itself.
    async fn execute(
        &self,
        options: ExecutorOptions,
    ) -> Result<ActionTypeExecutorResult, CourierError>;
}
