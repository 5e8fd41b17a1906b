// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Id-keyed registry for form models.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::FormError;
use crate::model::TypeRegistryItem;

/// Registry of items keyed by [`TypeRegistryItem::id`].
pub struct TypeRegistry<T: ?Sized + TypeRegistryItem> {
    items: BTreeMap<String, Arc<T>>,
}

impl<T: ?Sized + TypeRegistryItem> Default for TypeRegistry<T> {
    fn default() -> Self {
        Self {
            items: BTreeMap::new(),
        }
    }
}

impl<T: ?Sized + TypeRegistryItem> std::fmt::Debug for TypeRegistry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("ids", &self.items.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<T: ?Sized + TypeRegistryItem> TypeRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an item. Fails if its id is already taken.
    pub fn register(&mut self, item: Arc<T>) -> Result<(), FormError> {
        let id = item.id().to_string();
        if self.items.contains_key(&id) {
            return Err(FormError::AlreadyRegistered { id });
        }
        debug!(id = %id, "registered form model");
        self.items.insert(id, item);
        Ok(())
    }

    pub fn has(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<Arc<T>> {
        self.items.get(id).cloned()
    }

    /// All items, ordered by id.
    pub fn list(&self) -> Vec<Arc<T>> {
        self.items.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
