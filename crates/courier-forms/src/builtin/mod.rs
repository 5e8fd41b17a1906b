// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Form models for the built-in connectors.

use std::sync::Arc;

use courier_core::ActionConnector;
use tracing::info;

use crate::error::FormError;
use crate::model::{ActionTypeModel, non_blank};
use crate::type_registry::TypeRegistry;

pub mod email;
pub mod es_index;
pub mod incoming_webhook;
pub mod itsm;
pub mod pagerduty;
pub mod server_log;
pub mod swimlane;
pub mod webhook;

/// Register a form model for every built-in connector.
pub fn register_builtin_action_type_models(
    registry: &mut TypeRegistry<dyn ActionTypeModel>,
) -> Result<(), FormError> {
    let models: Vec<Arc<dyn ActionTypeModel>> = vec![
        Arc::new(server_log::ServerLogModel),
        Arc::new(incoming_webhook::IncomingWebhookModel::slack()),
        Arc::new(email::EmailModel),
        Arc::new(es_index::IndexModel),
        Arc::new(pagerduty::PagerDutyModel),
        Arc::new(swimlane::SwimlaneModel),
        Arc::new(webhook::WebhookModel),
        Arc::new(itsm::ItsmModel::servicenow()),
        Arc::new(itsm::ItsmModel::jira()),
        Arc::new(itsm::ItsmModel::resilient()),
        Arc::new(incoming_webhook::IncomingWebhookModel::teams()),
    ];
    let count = models.len();
    for model in models {
        registry.register(model)?;
    }
    info!(count, "registered built-in form models");
    Ok(())
}

/// `hasAuth` flag of a connector config, defaulting to `true`.
pub(crate) fn has_auth(connector: &ActionConnector) -> bool {
    connector
        .config
        .get("hasAuth")
        .and_then(serde_json::Value::as_bool)
        .unwrap_or(true)
}

/// Username/password checks shared by the email and webhook forms.
///
/// With auth on both are required; with auth off each requires the other.
pub(crate) fn check_user_password(
    connector: &ActionConnector,
    result: &mut crate::ValidationResult,
) {
    let user = non_blank(&connector.secrets, "user").is_some();
    let password = non_blank(&connector.secrets, "password").is_some();
    if has_auth(connector) {
        if !user {
            result.push("user", "Username is required.");
        }
        if !password {
            result.push("password", "Password is required.");
        }
    } else if user && !password {
        result.push("password", "Password is required when username is used.");
    } else if password && !user {
        result.push("user", "Username is required when password is used.");
    }
}
