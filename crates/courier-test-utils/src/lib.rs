// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Courier integration tests.
//!
//! - [`MockActionType`] - action type with recorded calls and canned outcomes
//! - [`TestHarness`] - registry plus executor over a chosen policy
//! - [`connector`] - shorthand for building connector fixtures

pub mod harness;
pub mod mock_action_type;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_action_type::{MockActionType, MockOutcome};

use courier_core::ActionConnector;
use serde_json::Value;

/// Build a saved connector fixture from JSON config and secrets objects.
///
/// Non-object values are treated as empty.
pub fn connector(
    id: Option<&str>,
    action_type_id: &str,
    config: Value,
    secrets: Value,
) -> ActionConnector {
    let as_map = |v: Value| match v {
        Value::Object(map) => map,
        _ => serde_json::Map::new(),
    };
    ActionConnector {
        id: id.map(str::to_string),
        action_type_id: action_type_id.to_string(),
        name: Some(action_type_id.trim_start_matches('.').to_string()),
        config: as_map(config),
        secrets: as_map(secrets),
        is_preconfigured: false,
    }
}
