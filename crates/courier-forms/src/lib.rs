// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connector forms for Courier.
//!
//! Every connector type has an [`ActionTypeModel`] describing how its form
//! looks ([`FormView`]) and how its config, secrets and params are checked
//! field by field ([`ValidationResult`]). Models live in a [`TypeRegistry`]
//! keyed by action type id.

pub mod builtin;
pub mod error;
pub mod model;
pub mod type_registry;
pub mod view;

pub use builtin::register_builtin_action_type_models;
pub use error::FormError;
pub use model::{ActionTypeModel, TypeRegistryItem, ValidationResult};
pub use type_registry::TypeRegistry;
pub use view::{
    Callout, ConnectorFieldsProps, FieldKind, FieldTarget, FormField, FormView,
    REENTER_VALUES_MESSAGE, REMEMBER_VALUES_MESSAGE,
};
