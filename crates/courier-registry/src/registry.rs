// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registry of action types keyed by id.
//!
//! Built-in connectors are registered once at startup; lookups afterwards
//! are read-only, so the registry is shared behind an `Arc` without locking.

use std::collections::HashMap;
use std::sync::Arc;

use courier_core::{ActionType, ActionTypeInfo, CourierError};
use courier_security::ActionsConfigurationUtilities;
use tracing::debug;

/// Registry mapping action type ids to their definitions.
pub struct ActionTypeRegistry {
    action_types: HashMap<String, Arc<dyn ActionType>>,
    utils: Arc<ActionsConfigurationUtilities>,
}

impl std::fmt::Debug for ActionTypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<&String> = self.action_types.keys().collect();
        ids.sort();
        f.debug_struct("ActionTypeRegistry")
            .field("action_types", &ids)
            .finish()
    }
}

impl ActionTypeRegistry {
    /// Create an empty registry governed by the given configuration utilities.
    pub fn new(utils: Arc<ActionsConfigurationUtilities>) -> Self {
        Self {
            action_types: HashMap::new(),
            utils,
        }
    }

    /// Register an action type. Ids must be unique.
    pub fn register(&mut self, action_type: Arc<dyn ActionType>) -> Result<(), CourierError> {
        let id = action_type.id().to_string();
        if self.action_types.contains_key(&id) {
            return Err(CourierError::ActionTypeAlreadyRegistered { id });
        }
        debug!(action_type = %id, "registered action type");
        self.action_types.insert(id, action_type);
        Ok(())
    }

    /// Returns true if an action type with this id is registered.
    pub fn has(&self, id: &str) -> bool {
        self.action_types.contains_key(id)
    }

    /// Look up an action type by id.
    pub fn get(&self, id: &str) -> Result<Arc<dyn ActionType>, CourierError> {
        self.action_types
            .get(id)
            .cloned()
            .ok_or_else(|| CourierError::ActionTypeNotFound { id: id.to_string() })
    }

    /// Returns true if the action type is registered and enabled in config.
    pub fn is_action_type_enabled(&self, id: &str) -> bool {
        self.has(id) && self.utils.is_action_type_enabled(id)
    }

    /// Fails unless the action type is registered and enabled in config.
    pub fn ensure_action_type_enabled(&self, id: &str) -> Result<(), CourierError> {
        if !self.has(id) {
            return Err(CourierError::ActionTypeNotFound { id: id.to_string() });
        }
        self.utils.ensure_action_type_enabled(id)
    }

    /// List all registered action types, sorted by id.
    pub fn list(&self) -> Vec<ActionTypeInfo> {
        let mut infos: Vec<ActionTypeInfo> = self
            .action_types
            .values()
            .map(|t| ActionTypeInfo {
                id: t.id().to_string(),
                name: t.name().to_string(),
                enabled: self.utils.is_action_type_enabled(t.id()),
            })
            .collect();
        infos.sort_by(|a, b| a.id.cmp(&b.id));
        infos
    }

    /// The configuration utilities this registry checks against.
    pub fn utils(&self) -> &Arc<ActionsConfigurationUtilities> {
        &self.utils
    }

    pub fn len(&self) -> usize {
        self.action_types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.action_types.is_empty()
    }
}
