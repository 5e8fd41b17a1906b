// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wiring of the action registry, executor and form registry from config.

use std::sync::Arc;

use courier_actions::{BuiltinActionTypeDeps, register_builtin_action_types};
use courier_config::CourierConfig;
use courier_core::CourierError;
use courier_forms::{ActionTypeModel, TypeRegistry, register_builtin_action_type_models};
use courier_registry::{ActionExecutor, ActionTypeRegistry};
use courier_security::ActionsConfigurationUtilities;
use tracing::debug;

/// Everything a command needs.
pub struct App {
    pub executor: ActionExecutor,
    pub forms: TypeRegistry<dyn ActionTypeModel>,
}

impl App {
    pub fn new(config: &CourierConfig) -> Result<Self, CourierError> {
        let utils = Arc::new(ActionsConfigurationUtilities::new(&config.actions));

        let mut registry = ActionTypeRegistry::new(Arc::clone(&utils));
        let deps = BuiltinActionTypeDeps {
            utils,
            public_base_url: config.actions.public_base_url.clone(),
            elasticsearch: config.elasticsearch.clone(),
        };
        register_builtin_action_types(&mut registry, &deps)?;

        let mut forms: TypeRegistry<dyn ActionTypeModel> = TypeRegistry::new();
        register_builtin_action_type_models(&mut forms)
            .map_err(|e| CourierError::Internal(e.to_string()))?;

        debug!(
            action_types = registry.len(),
            form_models = forms.len(),
            "courier initialized"
        );
        Ok(Self {
            executor: ActionExecutor::new(Arc::new(registry)),
            forms,
        })
    }

    pub fn registry(&self) -> &ActionTypeRegistry {
        self.executor.registry()
    }

    /// The form model for an action type.
    pub fn form(&self, action_type_id: &str) -> Result<Arc<dyn ActionTypeModel>, CourierError> {
        self.forms
            .get(action_type_id)
            .ok_or_else(|| CourierError::ActionTypeNotFound {
                id: action_type_id.to_string(),
            })
    }
}
