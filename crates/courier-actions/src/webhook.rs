// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `.webhook`: send a request to an arbitrary HTTP endpoint.

use std::collections::BTreeMap;

use async_trait::async_trait;
use courier_core::schema::{SchemaKind, parse};
use courier_core::{ActionType, ActionTypeExecutorResult, CourierError, ExecutorOptions};
use reqwest::header::{HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::Value;
use strum::Display;
use tracing::{debug, warn};

use crate::context::HttpContext;
use crate::response::{status_error, transport_failure};

pub const ACTION_TYPE_ID: &str = ".webhook";

const WHAT: &str = "calling webhook";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WebhookMethod {
    #[default]
    Post,
    Put,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct WebhookConfig {
    pub url: String,
    #[serde(default)]
    pub method: WebhookMethod,
    #[serde(default)]
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(default = "default_has_auth")]
    pub has_auth: bool,
}

fn default_has_auth() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WebhookSecrets {
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<SecretString>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WebhookParams {
    #[serde(default)]
    pub body: Option<String>,
}

pub struct WebhookActionType {
    ctx: HttpContext,
}

impl WebhookActionType {
    pub fn new(ctx: HttpContext) -> Self {
        Self { ctx }
    }
}

fn parse_headers(
    headers: &BTreeMap<String, String>,
) -> Result<Vec<(HeaderName, HeaderValue)>, CourierError> {
    headers
        .iter()
        .map(|(name, value)| {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                CourierError::validation(
                    SchemaKind::Config,
                    format!("invalid header name \"{name}\": {e}"),
                )
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                CourierError::validation(
                    SchemaKind::Config,
                    format!("invalid value for header \"{name}\": {e}"),
                )
            })?;
            Ok((name, value))
        })
        .collect()
}

#[async_trait]
impl ActionType for WebhookActionType {
    fn id(&self) -> &str {
        ACTION_TYPE_ID
    }

    fn name(&self) -> &str {
        "Webhook"
    }

    fn validate_config(&self, config: &Value) -> Result<(), CourierError> {
        let config: WebhookConfig = parse(SchemaKind::Config, config)?;
        self.ctx.utils().ensure_uri_allowed(&config.url).map_err(|e| {
            CourierError::validation(
                SchemaKind::Config,
                format!("error configuring webhook action: {e}"),
            )
        })?;
        if let Some(headers) = &config.headers {
            parse_headers(headers)?;
        }
        Ok(())
    }

    fn validate_secrets(&self, secrets: &Value) -> Result<(), CourierError> {
        let secrets: WebhookSecrets = parse(SchemaKind::Secrets, secrets)?;
        match (&secrets.user, &secrets.password) {
            (Some(_), Some(_)) | (None, None) => Ok(()),
            _ => Err(CourierError::validation(
                SchemaKind::Secrets,
                "both user and password must be specified",
            )),
        }
    }

    fn validate_params(&self, params: &Value) -> Result<(), CourierError> {
        parse::<WebhookParams>(SchemaKind::Params, params).map(|_| ())
    }

    async fn execute(
        &self,
        options: ExecutorOptions,
    ) -> Result<ActionTypeExecutorResult, CourierError> {
        let config: WebhookConfig = parse(SchemaKind::Config, &options.config)?;
        let secrets: WebhookSecrets = parse(SchemaKind::Secrets, &options.secrets)?;
        let params: WebhookParams = parse(SchemaKind::Params, &options.params)?;
        let action_id = options.action_id;

        let mut request = match config.method {
            WebhookMethod::Post => self.ctx.client().post(&config.url),
            WebhookMethod::Put => self.ctx.client().put(&config.url),
        };
        if let Some(headers) = &config.headers {
            for (name, value) in parse_headers(headers)? {
                request = request.header(name, value);
            }
        }

        let mut redactions = Vec::new();
        if config.has_auth {
            if let (Some(user), Some(password)) = (&secrets.user, &secrets.password) {
                request = request.basic_auth(user, Some(password.expose_secret()));
                redactions.push(password.expose_secret().to_string());
            }
        }
        if let Some(body) = params.body {
            request = request.body(body);
        }

        debug!(method = %config.method, "calling webhook");
        let reply = match self.ctx.send(request, &redactions).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "webhook request failed");
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

        let data = serde_json::from_str(&reply.body).unwrap_or(Value::String(reply.body));
        Ok(ActionTypeExecutorResult::ok_with_data(action_id, data))
    }
}
