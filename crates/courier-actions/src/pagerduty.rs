// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `.pagerduty`: trigger, acknowledge or resolve a PagerDuty Events API v2
//! alert.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use courier_core::schema::{SchemaKind, ensure_max_len, parse};
use courier_core::{ActionType, ActionTypeExecutorResult, CourierError, ExecutorOptions};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::Display;
use tracing::{debug, warn};

use crate::context::HttpContext;
use crate::response::{status_error, transport_failure};

pub const ACTION_TYPE_ID: &str = ".pagerduty";

/// Events API v2 endpoint used when `apiUrl` is not configured.
pub const DEFAULT_API_URL: &str = "https://events.pagerduty.com/v2/enqueue";

const WHAT: &str = "posting pagerduty event";
const DEDUP_KEY_MAX: usize = 255;
const SUMMARY_MAX: usize = 1024;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct PagerDutyConfig {
    #[serde(default)]
    pub api_url: Option<String>,
}

impl PagerDutyConfig {
    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct PagerDutySecrets {
    pub routing_key: SecretString,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EventAction {
    #[default]
    Trigger,
    Resolve,
    Acknowledge,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Error,
    Warning,
    #[default]
    Info,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct PagerDutyParams {
    #[serde(default)]
    pub event_action: EventAction,
    #[serde(default)]
    pub dedup_key: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub component: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub class: Option<String>,
}

impl PagerDutyParams {
    fn check(&self) -> Result<(), CourierError> {
        ensure_max_len(SchemaKind::Params, "dedupKey", self.dedup_key.as_deref(), DEDUP_KEY_MAX)?;
        ensure_max_len(SchemaKind::Params, "summary", self.summary.as_deref(), SUMMARY_MAX)?;

        if self.event_action != EventAction::Trigger && self.dedup_key.is_none() {
            return Err(CourierError::validation(
                SchemaKind::Params,
                format!(
                    "DedupKey is required when eventAction is \"{}\"",
                    self.event_action
                ),
            ));
        }
        if let Some(ts) = &self.timestamp {
            parse_timestamp(ts)?;
        }
        Ok(())
    }
}

fn parse_timestamp(ts: &str) -> Result<DateTime<Utc>, CourierError> {
    DateTime::parse_from_rfc3339(ts.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            CourierError::validation(
                SchemaKind::Params,
                format!("error parsing timestamp \"{ts}\""),
            )
        })
}

#[derive(Debug, Serialize)]
struct EventPayload {
    summary: String,
    source: String,
    severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    component: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    class: Option<String>,
}

#[derive(Debug, Serialize)]
struct Event<'a> {
    routing_key: &'a str,
    event_action: EventAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    dedup_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload: Option<EventPayload>,
}

fn build_event<'a>(
    action_id: &str,
    routing_key: &'a str,
    params: PagerDutyParams,
) -> Result<Event<'a>, CourierError> {
    let payload = match params.event_action {
        EventAction::Trigger => {
            let timestamp = match &params.timestamp {
                Some(ts) => Some(parse_timestamp(ts)?.to_rfc3339_opts(SecondsFormat::Millis, true)),
                None => None,
            };
            Some(EventPayload {
                summary: params
                    .summary
                    .unwrap_or_else(|| "No summary provided.".to_string()),
                source: params
                    .source
                    .unwrap_or_else(|| format!("Courier Action {action_id}")),
                severity: params.severity,
                timestamp,
                component: params.component,
                group: params.group,
                class: params.class,
            })
        }
        EventAction::Resolve | EventAction::Acknowledge => None,
    };

    Ok(Event {
        routing_key,
        event_action: params.event_action,
        dedup_key: params.dedup_key,
        payload,
    })
}

pub struct PagerDutyActionType {
    ctx: HttpContext,
}

impl PagerDutyActionType {
    pub fn new(ctx: HttpContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl ActionType for PagerDutyActionType {
    fn id(&self) -> &str {
        ACTION_TYPE_ID
    }

    fn name(&self) -> &str {
        "PagerDuty"
    }

    fn validate_config(&self, config: &Value) -> Result<(), CourierError> {
        let config: PagerDutyConfig = parse(SchemaKind::Config, config)?;
        if let Some(url) = &config.api_url {
            self.ctx.utils().ensure_uri_allowed(url).map_err(|e| {
                CourierError::validation(
                    SchemaKind::Config,
                    format!("error configuring pagerduty action: {e}"),
                )
            })?;
        }
        Ok(())
    }

    fn validate_secrets(&self, secrets: &Value) -> Result<(), CourierError> {
        parse::<PagerDutySecrets>(SchemaKind::Secrets, secrets).map(|_| ())
    }

    fn validate_params(&self, params: &Value) -> Result<(), CourierError> {
        let params: PagerDutyParams = parse(SchemaKind::Params, params)?;
        params.check()
    }

    async fn execute(
        &self,
        options: ExecutorOptions,
    ) -> Result<ActionTypeExecutorResult, CourierError> {
        let config: PagerDutyConfig = parse(SchemaKind::Config, &options.config)?;
        let secrets: PagerDutySecrets = parse(SchemaKind::Secrets, &options.secrets)?;
        let params: PagerDutyParams = parse(SchemaKind::Params, &options.params)?;
        params.check()?;

        let action_id = options.action_id;
        let routing_key = secrets.routing_key.expose_secret();
        let event = build_event(&action_id, routing_key, params)?;
        debug!(event_action = %event.event_action, "posting pagerduty event");

        let request = self.ctx.client().post(config.api_url()).json(&event);
        let secrets = [routing_key.to_string()];
        let reply = match self.ctx.send(request, &secrets).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "pagerduty request failed");
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
                &secrets,
            ));
        }

        let data = serde_json::from_str(&reply.body).unwrap_or(Value::String(reply.body));
        Ok(ActionTypeExecutorResult::ok_with_data(action_id, data))
    }
}
