// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `.teams`: post a message to a Microsoft Teams incoming webhook.

use async_trait::async_trait;
use courier_core::schema::{Empty, SchemaKind, parse};
use courier_core::{ActionType, ActionTypeExecutorResult, CourierError, ExecutorOptions};
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::Value;

use crate::context::HttpContext;
use crate::slack::{ensure_message, ensure_webhook_allowed, post_text};

pub const ACTION_TYPE_ID: &str = ".teams";

#[derive(Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct TeamsSecrets {
    pub webhook_url: SecretString,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TeamsParams {
    pub message: String,
}

pub struct TeamsActionType {
    ctx: HttpContext,
}

impl TeamsActionType {
    pub fn new(ctx: HttpContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl ActionType for TeamsActionType {
    fn id(&self) -> &str {
        ACTION_TYPE_ID
    }

    fn name(&self) -> &str {
        "Microsoft Teams"
    }

    fn validate_config(&self, config: &Value) -> Result<(), CourierError> {
        parse::<Empty>(SchemaKind::Config, config).map(|_| ())
    }

    fn validate_secrets(&self, secrets: &Value) -> Result<(), CourierError> {
        let secrets: TeamsSecrets = parse(SchemaKind::Secrets, secrets)?;
        ensure_webhook_allowed(&self.ctx, "teams", &secrets.webhook_url)
    }

    fn validate_params(&self, params: &Value) -> Result<(), CourierError> {
        let params: TeamsParams = parse(SchemaKind::Params, params)?;
        ensure_message(&params.message)
    }

    async fn execute(
        &self,
        options: ExecutorOptions,
    ) -> Result<ActionTypeExecutorResult, CourierError> {
        let secrets: TeamsSecrets = parse(SchemaKind::Secrets, &options.secrets)?;
        let params: TeamsParams = parse(SchemaKind::Params, &options.params)?;
        Ok(post_text(
            &self.ctx,
            &options.action_id,
            &secrets.webhook_url,
            &params.message,
            "posting a message to microsoft teams",
        )
        .await)
    }
}
