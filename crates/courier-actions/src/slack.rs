// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `.slack`: post a message to a Slack incoming webhook.

use async_trait::async_trait;
use courier_core::schema::{Empty, SchemaKind, parse};
use courier_core::{ActionType, ActionTypeExecutorResult, CourierError, ExecutorOptions};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::warn;

use crate::context::HttpContext;
use crate::response::{status_error, transport_failure};

pub const ACTION_TYPE_ID: &str = ".slack";

#[derive(Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct SlackSecrets {
    pub webhook_url: SecretString,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlackParams {
    pub message: String,
}

pub struct SlackActionType {
    ctx: HttpContext,
}

impl SlackActionType {
    pub fn new(ctx: HttpContext) -> Self {
        Self { ctx }
    }
}

/// Check an incoming-webhook URL secret against the host allow-list.
pub(crate) fn ensure_webhook_allowed(
    ctx: &HttpContext,
    connector: &str,
    url: &SecretString,
) -> Result<(), CourierError> {
    ctx.utils()
        .ensure_uri_allowed(url.expose_secret())
        .map_err(|e| {
            CourierError::validation(
                SchemaKind::Secrets,
                format!("error configuring {connector} action: {e}"),
            )
        })
}

pub(crate) fn ensure_message(message: &str) -> Result<(), CourierError> {
    if message.is_empty() {
        return Err(CourierError::validation(
            SchemaKind::Params,
            "[message]: value has length [0] but it must have a minimum length of [1].",
        ));
    }
    Ok(())
}

/// POST `{"text": message}` to an incoming webhook and classify the reply.
pub(crate) async fn post_text(
    ctx: &HttpContext,
    action_id: &str,
    url: &SecretString,
    message: &str,
    what: &str,
) -> ActionTypeExecutorResult {
    let url = url.expose_secret();
    let request = ctx.client().post(url).json(&json!({ "text": message }));
    let secrets = [url.to_string()];
    let reply = match ctx.send(request, &secrets).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!(error = %e, "incoming webhook request failed");
            return transport_failure(action_id, what, &e);
        }
    };

    if !reply.is_success() {
        return status_error(
            action_id,
            what,
            reply.status,
            &reply.headers,
            &reply.body,
            &secrets,
        );
    }
    ActionTypeExecutorResult::ok_with_data(action_id, Value::String(reply.body))
}

#[async_trait]
impl ActionType for SlackActionType {
    fn id(&self) -> &str {
        ACTION_TYPE_ID
    }

    fn name(&self) -> &str {
        "Slack"
    }

    fn validate_config(&self, config: &Value) -> Result<(), CourierError> {
        parse::<Empty>(SchemaKind::Config, config).map(|_| ())
    }

    fn validate_secrets(&self, secrets: &Value) -> Result<(), CourierError> {
        let secrets: SlackSecrets = parse(SchemaKind::Secrets, secrets)?;
        ensure_webhook_allowed(&self.ctx, "slack", &secrets.webhook_url)
    }

    fn validate_params(&self, params: &Value) -> Result<(), CourierError> {
        let params: SlackParams = parse(SchemaKind::Params, params)?;
        ensure_message(&params.message)
    }

    async fn execute(
        &self,
        options: ExecutorOptions,
    ) -> Result<ActionTypeExecutorResult, CourierError> {
        let secrets: SlackSecrets = parse(SchemaKind::Secrets, &options.secrets)?;
        let params: SlackParams = parse(SchemaKind::Params, &options.params)?;
        Ok(post_text(
            &self.ctx,
            &options.action_id,
            &secrets.webhook_url,
            &params.message,
            "posting slack message",
        )
        .await)
    }
}
