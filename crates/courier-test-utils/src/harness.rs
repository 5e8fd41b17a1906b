// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registry and executor harness for integration tests.
//!
//! Builds an [`ActionTypeRegistry`] and [`ActionExecutor`] over a chosen
//! `[actions]` policy, with whatever action types the test registers.

use std::sync::Arc;

use courier_config::model::ActionsConfig;
use courier_core::{ActionType, CourierError};
use courier_registry::{ActionExecutor, ActionTypeRegistry};
use courier_security::ActionsConfigurationUtilities;

/// A ready-to-use registry, executor and configuration utilities.
pub struct TestHarness {
    pub utils: Arc<ActionsConfigurationUtilities>,
    pub registry: Arc<ActionTypeRegistry>,
    pub executor: ActionExecutor,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::default()
    }
}

/// Builder for [`TestHarness`].
#[derive(Default)]
pub struct TestHarnessBuilder {
    config: ActionsConfig,
    action_types: Vec<Arc<dyn ActionType>>,
}

impl TestHarnessBuilder {
    pub fn with_allowed_hosts(mut self, hosts: &[&str]) -> Self {
        self.config.allowed_hosts = hosts.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_enabled_action_types(mut self, ids: &[&str]) -> Self {
        self.config.enabled_action_types = ids.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_action_type(mut self, action_type: Arc<dyn ActionType>) -> Self {
        self.action_types.push(action_type);
        self
    }

    /// The configuration utilities the harness will use, for constructing
    /// action types that need them before `build`.
    pub fn utils(&self) -> Arc<ActionsConfigurationUtilities> {
        Arc::new(ActionsConfigurationUtilities::new(&self.config))
    }

    pub fn build(self) -> Result<TestHarness, CourierError> {
        let utils = Arc::new(ActionsConfigurationUtilities::new(&self.config));
        let mut registry = ActionTypeRegistry::new(Arc::clone(&utils));
        for action_type in self.action_types {
            registry.register(action_type)?;
        }
        let registry = Arc::new(registry);
        Ok(TestHarness {
            utils,
            executor: ActionExecutor::new(Arc::clone(&registry)),
            registry,
        })
    }
}
