// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions for the Courier connector architecture.
//!
//! Action types use `#[async_trait]` so they can be stored as
//! `Arc<dyn ActionType>` in the registry.

pub mod action_type;

pub use action_type::ActionType;
