// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in form model registration.

use courier_forms::{
    ActionTypeModel, FormError, TypeRegistry, TypeRegistryItem, register_builtin_action_type_models,
};

const IDS: [&str; 11] = [
    ".email",
    ".index",
    ".jira",
    ".pagerduty",
    ".resilient",
    ".server-log",
    ".servicenow",
    ".slack",
    ".swimlane",
    ".teams",
    ".webhook",
];

#[test]
fn every_builtin_is_retrievable_exactly_once() {
    let mut registry: TypeRegistry<dyn ActionTypeModel> = TypeRegistry::new();
    register_builtin_action_type_models(&mut registry).unwrap();

    let listed: Vec<String> = registry.list().iter().map(|m| m.id().to_string()).collect();
    assert_eq!(listed, IDS);
    for id in IDS {
        assert!(registry.has(id));
        let model = registry.get(id).unwrap();
        assert_eq!(model.id(), id);
        assert!(!model.icon_class().is_empty());
        assert!(!model.select_message().is_empty());
    }
}

#[test]
fn second_registration_fails() {
    let mut registry: TypeRegistry<dyn ActionTypeModel> = TypeRegistry::new();
    register_builtin_action_type_models(&mut registry).unwrap();
    let err = register_builtin_action_type_models(&mut registry).unwrap_err();
    assert!(matches!(err, FormError::AlreadyRegistered { .. }));
    assert_eq!(registry.len(), 11);
}
