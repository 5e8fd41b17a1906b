// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Declarative schema validation for connector config, secrets and params.
//!
//! Schemas are plain serde structs (usually with `deny_unknown_fields`). This
//! module turns serde failures into [`CourierError::Validation`] errors that
//! carry the object kind, so callers get messages such as
//! `error validating action type config: missing field `apiUrl``.

use serde::de::DeserializeOwned;
use serde_json::Value;
use strum::Display;

use crate::error::CourierError;

/// Which part of a connector invocation is being validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum SchemaKind {
    Config,
    Secrets,
    Params,
}

impl SchemaKind {
    /// Message prefix used when validation of this kind fails.
    pub fn error_prefix(&self) -> &'static str {
        match self {
            SchemaKind::Config => "error validating action type config",
            SchemaKind::Secrets => "error validating action type secrets",
            SchemaKind::Params => "error validating action params",
        }
    }
}

/// Deserialize `value` into the schema type `T`.
///
/// `null` is treated as an empty object so connectors without config or
/// secrets accept an absent value.
pub fn parse<T: DeserializeOwned>(kind: SchemaKind, value: &Value) -> Result<T, CourierError> {
    let value = if value.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        value.clone()
    };
    serde_json::from_value(value).map_err(|e| CourierError::validation(kind, e.to_string()))
}

/// Fail with a validation error when `value` is longer than `max` characters.
pub fn ensure_max_len(
    kind: SchemaKind,
    field: &str,
    value: Option<&str>,
    max: usize,
) -> Result<(), CourierError> {
    match value {
        Some(v) if v.chars().count() > max => Err(CourierError::validation(
            kind,
            format!(
                "[{field}]: value has length [{}] but it must have a maximum length of [{max}].",
                v.chars().count()
            ),
        )),
        _ => Ok(()),
    }
}

/// Schema for connectors that take no configuration or secrets.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Empty {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    #[serde(deny_unknown_fields, rename_all = "camelCase")]
    struct Sample {
        api_url: String,
        #[serde(default)]
        app_id: Option<String>,
    }

    #[test]
    fn parse_accepts_valid_object() {
        let value = serde_json::json!({"apiUrl": "https://example.com", "appId": "abc"});
        let sample: Sample = parse(SchemaKind::Config, &value).unwrap();
        assert_eq!(sample.api_url, "https://example.com");
        assert_eq!(sample.app_id.as_deref(), Some("abc"));
    }

    #[test]
    fn parse_reports_missing_field_with_prefix() {
        let value = serde_json::json!({"appId": "abc"});
        let err = parse::<Sample>(SchemaKind::Config, &value).unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("error validating action type config:"));
        assert!(msg.contains("apiUrl"));
    }

    #[test]
    fn parse_rejects_unknown_fields() {
        let value = serde_json::json!({"apiUrl": "x", "bogus": 1});
        let err = parse::<Sample>(SchemaKind::Secrets, &value).unwrap_err();
        assert!(err.to_string().contains("bogus"));
    }

    #[test]
    fn null_is_an_empty_object() {
        assert!(parse::<Empty>(SchemaKind::Config, &Value::Null).is_ok());
        assert!(parse::<Empty>(SchemaKind::Config, &serde_json::json!({"a": 1})).is_err());
    }

    #[test]
    fn params_prefix() {
        let err = CourierError::validation(SchemaKind::Params, "[message]: required");
        assert_eq!(
            err.to_string(),
            "error validating action params: [message]: required"
        );
    }

    #[test]
    fn max_len_is_counted_in_chars() {
        assert!(ensure_max_len(SchemaKind::Params, "summary", Some("abc"), 3).is_ok());
        assert!(ensure_max_len(SchemaKind::Params, "summary", Some("abcd"), 3).is_err());
        assert!(ensure_max_len(SchemaKind::Params, "summary", None, 3).is_ok());
    }
}
