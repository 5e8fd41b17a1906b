// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Config, secrets and params schemas for the Swimlane connector.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// A Swimlane application field: its internal id and its display key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigMap {
    pub id: String,
    pub key: String,
}

/// Which application fields receive each alert attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ConfigMapping {
    pub alert_source_key_name: ConfigMap,
    pub severity_key_name: ConfigMap,
    #[serde(default)]
    pub case_name_key_name: Option<ConfigMap>,
    pub case_id_key_name: ConfigMap,
    pub alert_name_key_name: ConfigMap,
    #[serde(default)]
    pub comments_key_name: Option<ConfigMap>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct SwimlaneConfig {
    pub api_url: String,
    pub app_id: String,
    /// Shown in the connector form; the record API authenticates by token only.
    #[serde(default)]
    pub username: Option<String>,
    pub mappings: ConfigMapping,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct SwimlaneSecrets {
    pub api_token: SecretString,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GetApplicationParams {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct CreateRecordParams {
    pub alert_name: String,
    pub severity: String,
    pub alert_source: String,
    #[serde(default)]
    pub case_name: Option<String>,
    #[serde(default)]
    pub case_id: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
}

/// The sub-action to run, tagged by `subAction` with its `subActionParams`.
#[derive(Debug, Clone, Deserialize)]
#[serde(
    tag = "subAction",
    content = "subActionParams",
    rename_all = "camelCase",
    deny_unknown_fields
)]
pub enum SwimlaneParams {
    Application(GetApplicationParams),
    CreateRecord(CreateRecordParams),
}
