// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping of vendor HTTP responses onto executor results.
//!
//! All HTTP-backed connectors classify failures the same way:
//!
//! | status | result |
//! |--------|--------|
//! | 429 | error, `retry` at `Retry-After` when present, else `true` |
//! | 5xx | error, `retry: true` |
//! | other non-2xx | error, no retry hint |
//!
//! Transport failures (connection refused, timeout, oversized body) become
//! error results carrying the redacted failure text as `serviceMessage`.
//! Response bodies are redacted the same way before they reach a result.

use std::time::Duration;

use chrono::Utc;
use courier_core::{ActionTypeExecutorResult, CourierError, Retry};
use courier_security::redact;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, RETRY_AFTER};

/// Parse a `Retry-After` header given in whole seconds.
///
/// HTTP-date values are ignored; callers fall back to a plain retry flag.
pub fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

/// Retry hint for a failed status, or `None` when retrying will not help.
pub fn retry_hint(status: StatusCode, headers: &HeaderMap) -> Option<Retry> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        Some(match retry_after(headers) {
            Some(delay) => chrono::Duration::from_std(delay)
                .ok()
                .and_then(|delta| Utc::now().checked_add_signed(delta))
                .map_or(Retry::Flag(true), Retry::At),
            None => Retry::Flag(true),
        })
    } else if status.is_server_error() {
        Some(Retry::Flag(true))
    } else {
        None
    }
}

/// `[503] Service Unavailable` style summary of a status line.
pub fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("[{}] {reason}", status.as_u16()),
        None => format!("[{}]", status.as_u16()),
    }
}

/// Build the error result for a non-success response.
///
/// `what` completes the sentence "error <what>", e.g. `posting slack message`.
/// `secrets` are scrubbed from the body before it becomes `serviceMessage`.
pub fn status_error(
    action_id: &str,
    what: &str,
    status: StatusCode,
    headers: &HeaderMap,
    body: &str,
    secrets: &[String],
) -> ActionTypeExecutorResult {
    let body = body.trim();
    let service_message = if body.is_empty() {
        status_line(status)
    } else {
        format!("{}: {}", status_line(status), redact(body, secrets))
    };

    match retry_hint(status, headers) {
        Some(retry) => {
            ActionTypeExecutorResult::error(action_id, format!("error {what}, retry later"))
                .with_service_message(service_message)
                .with_retry(retry)
        }
        None => ActionTypeExecutorResult::error(
            action_id,
            format!("error {what}, unexpected http status {}", status.as_u16()),
        )
        .with_service_message(service_message),
    }
}

/// Build the error result for a request that never produced a response.
pub fn transport_failure(
    action_id: &str,
    what: &str,
    err: &CourierError,
) -> ActionTypeExecutorResult {
    ActionTypeExecutorResult::error(action_id, format!("error {what}, unexpected error"))
        .with_service_message(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers_with_retry_after(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn retry_after_seconds() {
        let headers = headers_with_retry_after("30");
        assert_eq!(retry_after(&headers), Some(Duration::from_secs(30)));
        assert_eq!(retry_after(&HeaderMap::new()), None);
        assert_eq!(
            retry_after(&headers_with_retry_after("Wed, 21 Oct 2015 07:28:00 GMT")),
            None
        );
    }

    #[test]
    fn rate_limit_with_header_retries_at_a_time() {
        let before = Utc::now();
        let hint = retry_hint(StatusCode::TOO_MANY_REQUESTS, &headers_with_retry_after("10"));
        match hint {
            Some(Retry::At(at)) => assert!(at >= before + chrono::Duration::seconds(10)),
            other => panic!("expected a timestamp, got {other:?}"),
        }
    }

    #[test]
    fn out_of_range_retry_after_falls_back_to_flag() {
        for value in ["10000000000000", "18446744073709551615"] {
            assert_eq!(
                retry_hint(StatusCode::TOO_MANY_REQUESTS, &headers_with_retry_after(value)),
                Some(Retry::Flag(true)),
                "Retry-After: {value}"
            );
        }
    }

    #[test]
    fn rate_limit_without_header_retries() {
        assert_eq!(
            retry_hint(StatusCode::TOO_MANY_REQUESTS, &HeaderMap::new()),
            Some(Retry::Flag(true))
        );
    }

    #[test]
    fn server_errors_retry_client_errors_do_not() {
        assert_eq!(
            retry_hint(StatusCode::BAD_GATEWAY, &HeaderMap::new()),
            Some(Retry::Flag(true))
        );
        assert_eq!(retry_hint(StatusCode::BAD_REQUEST, &HeaderMap::new()), None);
        assert_eq!(retry_hint(StatusCode::UNAUTHORIZED, &HeaderMap::new()), None);
    }

    #[test]
    fn status_error_messages() {
        let result = status_error(
            "a1",
            "posting slack message",
            StatusCode::SERVICE_UNAVAILABLE,
            &HeaderMap::new(),
            "",
            &[],
        );
        assert_eq!(
            result.message.as_deref(),
            Some("error posting slack message, retry later")
        );
        assert_eq!(
            result.service_message.as_deref(),
            Some("[503] Service Unavailable")
        );

        let result = status_error(
            "a1",
            "calling webhook",
            StatusCode::BAD_REQUEST,
            &HeaderMap::new(),
            "missing field",
            &[],
        );
        assert_eq!(
            result.message.as_deref(),
            Some("error calling webhook, unexpected http status 400")
        );
        assert_eq!(
            result.service_message.as_deref(),
            Some("[400] Bad Request: missing field")
        );
        assert_eq!(result.retry, None);
    }

    #[test]
    fn status_error_redacts_the_body() {
        let result = status_error(
            "a1",
            "posting pagerduty event",
            StatusCode::BAD_REQUEST,
            &HeaderMap::new(),
            "invalid routing key rk-SECRET-123 for https://hooks.slack.com/services/T0/B0/XX",
            &["rk-SECRET-123".to_string()],
        );
        let service_message = result.service_message.unwrap();
        assert!(!service_message.contains("rk-SECRET-123"));
        assert!(!service_message.contains("T0/B0/XX"));
        assert_eq!(
            service_message,
            "[400] Bad Request: invalid routing key [REDACTED] for [REDACTED]"
        );
    }
}
