// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `.index`: bulk-index documents into an Elasticsearch index.
//!
//! The cluster is the host's own `[elasticsearch]` connection, so its URL
//! is not subject to the outbound host allow-list.

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use courier_config::model::ElasticsearchConfig;
use courier_core::schema::{Empty, SchemaKind, parse};
use courier_core::{ActionType, ActionTypeExecutorResult, CourierError, ExecutorOptions};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use crate::context::HttpContext;
use crate::response::{status_error, transport_failure};

pub const ACTION_TYPE_ID: &str = ".index";

const WHAT: &str = "indexing documents";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct IndexConfig {
    pub index: String,
    #[serde(default)]
    pub refresh: bool,
    #[serde(default)]
    pub execution_time_field: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexParams {
    pub documents: Vec<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct BulkResponse {
    #[serde(default)]
    errors: bool,
    #[serde(default)]
    items: Vec<Map<String, Value>>,
}

impl BulkResponse {
    /// Reason of the first failed item, if any.
    fn first_error(&self) -> Option<String> {
        self.items
            .iter()
            .filter_map(|item| item.values().next())
            .find_map(|op| op.get("error"))
            .map(|error| {
                error
                    .get("reason")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| error.to_string())
            })
    }
}

/// Render the `_bulk` request body, one action line plus one source line per document.
fn bulk_body(
    config: &IndexConfig,
    documents: Vec<Map<String, Value>>,
) -> Result<String, CourierError> {
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let action = json!({ "index": { "_index": config.index } }).to_string();
    let mut body = String::new();
    for mut document in documents {
        if let Some(field) = &config.execution_time_field {
            document.insert(field.clone(), Value::String(now.clone()));
        }
        let source = serde_json::to_string(&document).map_err(|e| {
            CourierError::Internal(format!("failed to serialize document: {e}"))
        })?;
        body.push_str(&action);
        body.push('\n');
        body.push_str(&source);
        body.push('\n');
    }
    Ok(body)
}

pub struct IndexActionType {
    ctx: HttpContext,
    elasticsearch: ElasticsearchConfig,
}

impl IndexActionType {
    pub fn new(ctx: HttpContext, elasticsearch: ElasticsearchConfig) -> Self {
        Self { ctx, elasticsearch }
    }

    fn bulk_url(&self, refresh: bool) -> Result<url::Url, CourierError> {
        let base = self.elasticsearch.url.trim_end_matches('/');
        let mut url = url::Url::parse(&format!("{base}/_bulk"))
            .map_err(|e| CourierError::Config(format!("invalid elasticsearch.url: {e}")))?;
        if refresh {
            url.query_pairs_mut().append_pair("refresh", "true");
        }
        Ok(url)
    }
}

#[async_trait]
impl ActionType for IndexActionType {
    fn id(&self) -> &str {
        ACTION_TYPE_ID
    }

    fn name(&self) -> &str {
        "Index"
    }

    fn validate_config(&self, config: &Value) -> Result<(), CourierError> {
        let config: IndexConfig = parse(SchemaKind::Config, config)?;
        if config.index.trim().is_empty() {
            return Err(CourierError::validation(
                SchemaKind::Config,
                "[index]: must not be empty",
            ));
        }
        Ok(())
    }

    fn validate_secrets(&self, secrets: &Value) -> Result<(), CourierError> {
        parse::<Empty>(SchemaKind::Secrets, secrets).map(|_| ())
    }

    fn validate_params(&self, params: &Value) -> Result<(), CourierError> {
        let params: IndexParams = parse(SchemaKind::Params, params)?;
        if params.documents.is_empty() {
            return Err(CourierError::validation(
                SchemaKind::Params,
                "[documents]: array size is [0], but cannot be smaller than [1]",
            ));
        }
        Ok(())
    }

    async fn execute(
        &self,
        options: ExecutorOptions,
    ) -> Result<ActionTypeExecutorResult, CourierError> {
        let config: IndexConfig = parse(SchemaKind::Config, &options.config)?;
        let params: IndexParams = parse(SchemaKind::Params, &options.params)?;
        let action_id = options.action_id;

        let count = params.documents.len();
        let body = bulk_body(&config, params.documents)?;
        debug!(index = %config.index, count, "bulk indexing documents");

        let mut request = self
            .ctx
            .client()
            .post(self.bulk_url(config.refresh)?)
            .header(reqwest::header::CONTENT_TYPE, "application/x-ndjson")
            .body(body);
        let mut redactions = Vec::new();
        if let Some(username) = &self.elasticsearch.username {
            request = request.basic_auth(username, self.elasticsearch.password.as_deref());
            redactions.extend(self.elasticsearch.password.iter().cloned());
        }

        let reply = match self.ctx.send(request, &redactions).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "bulk request failed");
                return Ok(transport_failure(&action_id, WHAT, &e));
            }
        };

        if !reply.is_success() {
            return Ok(status_error(
                &action_id,
                WHAT,
                reply.status,
                &reply.headers,
                &reply.body,
                &redactions,
            ));
        }

        let data: Value = reply.json()?;
        let bulk: BulkResponse = serde_json::from_value(data.clone()).map_err(|e| {
            CourierError::service(format!("unexpected bulk response: {e}"))
        })?;
        if bulk.errors {
            let reason = bulk
                .first_error()
                .unwrap_or_else(|| "bulk request reported errors".to_string());
            return Ok(ActionTypeExecutorResult::error(action_id, "error indexing documents")
                .with_service_message(reason));
        }

        Ok(ActionTypeExecutorResult::ok_with_data(action_id, data))
    }
}
