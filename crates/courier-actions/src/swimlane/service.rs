// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Swimlane REST client.

use chrono::{SecondsFormat, Utc};
use courier_core::CourierError;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::{Map, Value, json};
use tracing::debug;

use super::schema::{ConfigMapping, CreateRecordParams};
use crate::context::HttpContext;

const PRIVATE_TOKEN_HEADER: &str = "Private-Token";

/// Body of `POST /api/app/{appId}/record`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordRequest {
    pub application_id: String,
    pub values: Map<String, Value>,
}

/// Build the record body by routing each alert attribute to its mapped field id.
pub fn record_request(
    app_id: &str,
    mappings: &ConfigMapping,
    params: &CreateRecordParams,
) -> RecordRequest {
    let mut values = Map::new();
    values.insert(
        mappings.alert_name_key_name.id.clone(),
        Value::String(params.alert_name.clone()),
    );
    values.insert(
        mappings.severity_key_name.id.clone(),
        Value::String(params.severity.clone()),
    );
    values.insert(
        mappings.alert_source_key_name.id.clone(),
        Value::String(params.alert_source.clone()),
    );
    if let Some(case_id) = &params.case_id {
        values.insert(
            mappings.case_id_key_name.id.clone(),
            Value::String(case_id.clone()),
        );
    }
    if let (Some(field), Some(case_name)) = (&mappings.case_name_key_name, &params.case_name) {
        values.insert(field.id.clone(), Value::String(case_name.clone()));
    }
    if let (Some(field), Some(comments)) = (&mappings.comments_key_name, &params.comments) {
        values.insert(field.id.clone(), Value::String(comments.clone()));
    }
    RecordRequest {
        application_id: app_id.to_string(),
        values,
    }
}

pub struct SwimlaneService<'a> {
    ctx: &'a HttpContext,
    api_url: String,
    app_id: String,
    api_token: SecretString,
}

impl<'a> SwimlaneService<'a> {
    pub fn new(ctx: &'a HttpContext, api_url: &str, app_id: &str, api_token: SecretString) -> Self {
        Self {
            ctx,
            api_url: api_url.trim_end_matches('/').to_string(),
            app_id: app_id.to_string(),
            api_token,
        }
    }

    fn secrets(&self) -> Vec<String> {
        vec![self.api_token.expose_secret().to_string()]
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.ctx
            .client()
            .get(url)
            .header(PRIVATE_TOKEN_HEADER, self.api_token.expose_secret())
    }

    /// Fetch an application definition.
    pub async fn application(&self, id: &str) -> Result<Value, CourierError> {
        let url = format!("{}/api/app/{id}", self.api_url);
        debug!(application_id = %id, "fetching swimlane application");
        self.ctx
            .call_json(
                self.get(&url),
                &self.secrets(),
                &format!("[Action][Swimlane]: Unable to get application with id {id}"),
            )
            .await
    }

    /// Create a record in the configured application.
    pub async fn create_record(
        &self,
        mappings: &ConfigMapping,
        params: &CreateRecordParams,
    ) -> Result<Value, CourierError> {
        let url = format!("{}/api/app/{}/record", self.api_url, self.app_id);
        let body = record_request(&self.app_id, mappings, params);
        debug!(app_id = %self.app_id, fields = body.values.len(), "creating swimlane record");

        let request = self
            .ctx
            .client()
            .post(&url)
            .header(PRIVATE_TOKEN_HEADER, self.api_token.expose_secret())
            .json(&body);
        let record = self
            .ctx
            .call_json(
                request,
                &self.secrets(),
                &format!(
                    "[Action][Swimlane]: Unable to create record in application with id {}",
                    self.app_id
                ),
            )
            .await?;

        let id = record
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let title = record
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(id.as_str())
            .to_string();
        let pushed_date = record
            .get("createdDate")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));

        Ok(json!({
            "id": id,
            "title": title,
            "url": format!("{}/record/{}/{}", self.api_url, self.app_id, id),
            "pushedDate": pushed_date,
        }))
    }
}
