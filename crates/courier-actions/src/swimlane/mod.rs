// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `.swimlane`: create records in a Swimlane application.

pub mod schema;
pub mod service;
pub mod validators;

use async_trait::async_trait;
use courier_core::schema::{SchemaKind, parse};
use courier_core::{ActionType, ActionTypeExecutorResult, CourierError, ExecutorOptions};
use serde_json::Value;
use tracing::debug;

use crate::context::HttpContext;
use schema::{SwimlaneConfig, SwimlaneParams, SwimlaneSecrets};
use service::SwimlaneService;

pub const ACTION_TYPE_ID: &str = ".swimlane";

pub struct SwimlaneActionType {
    ctx: HttpContext,
}

impl SwimlaneActionType {
    pub fn new(ctx: HttpContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl ActionType for SwimlaneActionType {
    fn id(&self) -> &str {
        ACTION_TYPE_ID
    }

    fn name(&self) -> &str {
        "Swimlane"
    }

    fn validate_config(&self, config: &Value) -> Result<(), CourierError> {
        let config: SwimlaneConfig = parse(SchemaKind::Config, config)?;
        validators::validate_common_config(self.ctx.utils(), &config)
    }

    fn validate_secrets(&self, secrets: &Value) -> Result<(), CourierError> {
        let secrets: SwimlaneSecrets = parse(SchemaKind::Secrets, secrets)?;
        validators::validate_common_secrets(self.ctx.utils(), &secrets)
    }

    fn validate_params(&self, params: &Value) -> Result<(), CourierError> {
        parse::<SwimlaneParams>(SchemaKind::Params, params).map(|_| ())
    }

    async fn execute(
        &self,
        options: ExecutorOptions,
    ) -> Result<ActionTypeExecutorResult, CourierError> {
        let config: SwimlaneConfig = parse(SchemaKind::Config, &options.config)?;
        let secrets: SwimlaneSecrets = parse(SchemaKind::Secrets, &options.secrets)?;
        let params: SwimlaneParams = parse(SchemaKind::Params, &options.params)?;

        let service =
            SwimlaneService::new(&self.ctx, &config.api_url, &config.app_id, secrets.api_token);
        let data = match params {
            SwimlaneParams::Application(p) => service.application(&p.id).await?,
            SwimlaneParams::CreateRecord(p) => {
                debug!(alert_name = %p.alert_name, "pushing alert to swimlane");
                service.create_record(&config.mappings, &p).await?
            }
        };
        Ok(ActionTypeExecutorResult::ok_with_data(options.action_id, data))
    }
}
