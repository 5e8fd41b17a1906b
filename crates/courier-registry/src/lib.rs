// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Action type registry and executor service.
//!
//! The registry stores connector definitions keyed by id; the executor looks
//! them up, checks they are enabled, validates the invocation and runs it.

pub mod executor;
pub mod registry;

pub use executor::{ActionExecutor, ExecuteRequest};
pub use registry::ActionTypeRegistry;
