// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound HTTP policy for connector executors.
//!
//! Builds the reqwest client every connector shares and enforces the
//! configured response size limit when reading bodies.

use courier_core::CourierError;
use tracing::{error, warn};

use crate::allowlist::ResponseSettings;
use crate::redact::redact;

const USER_AGENT: &str = concat!("courier/", env!("CARGO_PKG_VERSION"));

/// Build a reqwest client honoring the configured response timeout.
pub fn build_action_client(settings: &ResponseSettings) -> Result<reqwest::Client, CourierError> {
    reqwest::Client::builder()
        .timeout(settings.timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| {
            error!("failed to build connector HTTP client: {e}");
            CourierError::Internal(format!("failed to build connector HTTP client: {e}"))
        })
}

/// Read a response body as text, rejecting bodies above `max_content_length`.
pub async fn read_body_limited(
    response: reqwest::Response,
    settings: &ResponseSettings,
) -> Result<String, CourierError> {
    let limit = settings.max_content_length;
    if let Some(declared) = response.content_length() {
        if declared > limit {
            warn!(declared, limit, "response body exceeds configured limit");
            return Err(body_too_large(declared, limit));
        }
    }

    let bytes = response.bytes().await.map_err(|e| CourierError::Service {
        message: format!("failed to read response body: {}", redact(&e.to_string(), &[])),
        source: Some(Box::new(e)),
    })?;

    let actual = bytes.len() as u64;
    if actual > limit {
        warn!(actual, limit, "response body exceeds configured limit");
        return Err(body_too_large(actual, limit));
    }

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn body_too_large(size: u64, limit: u64) -> CourierError {
    CourierError::service(format!(
        "maxContentLength size of {limit} exceeded (response was {size} bytes)"
    ))
}

/// Convert a reqwest transport error into a service error with secrets removed.
pub fn transport_error(e: reqwest::Error, secrets: &[String]) -> CourierError {
    if e.is_timeout() {
        warn!("outbound request timed out");
    }
    CourierError::Service {
        message: redact(&e.to_string(), secrets),
        source: Some(Box::new(e)),
    }
}
