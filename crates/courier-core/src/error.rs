// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Courier connector framework.

use thiserror::Error;

use crate::schema::SchemaKind;

/// The primary error type used across action types, the registry and the executor.
#[derive(Debug, Error)]
pub enum CourierError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// A config, secrets or params object failed schema validation.
    #[error("{}: {}", .kind.error_prefix(), .message)]
    Validation { kind: SchemaKind, message: String },

    /// Requested action type was not found in the registry.
    #[error("Action type \"{id}\" is not registered.")]
    ActionTypeNotFound { id: String },

    /// An action type with the same id was registered twice.
    #[error("Action type \"{id}\" is already registered.")]
    ActionTypeAlreadyRegistered { id: String },

    /// The action type is registered but disabled by configuration.
    #[error(
        "action type \"{id}\" is not enabled in the courier config actions.enabled_action_types"
    )]
    ActionTypeDisabled { id: String },

    /// A URI or hostname is not in the configured allow-list.
    #[error("{0}")]
    NotAllowed(String),

    /// Third-party service errors (HTTP failure, unexpected response, SMTP rejection).
    #[error("{message}")]
    Service {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CourierError {
    /// Shorthand for a [`CourierError::Validation`] error.
    pub fn validation(kind: SchemaKind, message: impl Into<String>) -> Self {
        CourierError::Validation {
            kind,
            message: message.into(),
        }
    }

    /// Shorthand for a [`CourierError::Service`] error without a source.
    pub fn service(message: impl Into<String>) -> Self {
        CourierError::Service {
            message: message.into(),
            source: None,
        }
    }
}
