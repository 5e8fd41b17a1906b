// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret redaction for executor results and log output.
//!
//! Two complementary mechanisms:
//! 1. **Regex-based**: known secret shapes (incoming webhook URLs, bearer
//!    tokens, credentials embedded in URLs).
//! 2. **Exact-match**: connector secrets known at execution time.

use std::sync::LazyLock;

use regex::Regex;

/// The redaction placeholder.
pub const REDACTED: &str = "[REDACTED]";

/// Known secret patterns and their replacements.
static REDACTION_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    vec![
        // Slack incoming webhooks: the path is the credential.
        (
            Regex::new(r"https://hooks\.slack\.com/services/[A-Za-z0-9/_\-]+").unwrap(),
            REDACTED,
        ),
        // Microsoft Teams incoming webhooks.
        (
            Regex::new(r"https://[A-Za-z0-9\-.]*webhook\.office\.com/[^\s)]+").unwrap(),
            REDACTED,
        ),
        // Bearer tokens in headers.
        (
            Regex::new(r"Bearer\s+[a-zA-Z0-9._\-]{10,}").unwrap(),
            REDACTED,
        ),
        // user:password@ embedded in URLs.
        (
            Regex::new(r"(https?://)[^/\s:@]+:[^/\s@]+@").unwrap(),
            "${1}[REDACTED]@",
        ),
    ]
});

/// Redact secrets from a string using regex patterns and exact-match values.
pub fn redact(input: &str, secret_values: &[String]) -> String {
    let mut result = input.to_string();

    for (pattern, replacement) in REDACTION_PATTERNS.iter() {
        result = pattern.replace_all(&result, *replacement).into_owned();
    }

    // Longest first so a secret containing another is replaced whole.
    let mut sorted: Vec<&String> = secret_values.iter().collect();
    sorted.sort_by_key(|v| std::cmp::Reverse(v.len()));
    for value in sorted {
        if !value.is_empty() {
            result = result.replace(value.as_str(), REDACTED);
        }
    }

    result
}
