// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Courier connector framework.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Courier workspace. All built-in action
//! types implement [`ActionType`].

pub mod error;
pub mod schema;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::CourierError;
pub use schema::SchemaKind;
pub use traits::ActionType;
pub use types::{
    ActionConnector, ActionTypeExecutorResult, ActionTypeInfo, ExecutionStatus, ExecutorOptions,
    Retry,
};
