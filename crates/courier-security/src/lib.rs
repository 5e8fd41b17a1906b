// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound security policy for Courier connectors.
//!
//! Provides the host and action type allow-lists, the shared HTTP client
//! with response limits, and secret redaction for error text.

pub mod allowlist;
pub mod http;
pub mod redact;

pub use allowlist::{ActionsConfigurationUtilities, ResponseSettings};
pub use http::{build_action_client, read_body_limited, transport_error};
pub use redact::{REDACTED, redact};
