// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in connectors for the Courier action framework.
//!
//! [`register_builtin_action_types`] installs all eleven connectors into an
//! [`ActionTypeRegistry`]. Each connector validates its own config, secrets
//! and params with serde schemas and calls the vendor API directly through
//! a shared reqwest client bounded by the `[actions]` response limits.

pub mod cases;
pub mod context;
pub mod email;
pub mod es_index;
pub mod pagerduty;
pub mod response;
pub mod server_log;
pub mod slack;
pub mod swimlane;
pub mod teams;
pub mod webhook;

use std::sync::Arc;

use courier_config::model::ElasticsearchConfig;
use courier_core::{ActionType, CourierError};
use courier_registry::ActionTypeRegistry;
use courier_security::ActionsConfigurationUtilities;
use tracing::info;

pub use context::HttpContext;

/// Ids of the built-in connectors, in registration order.
pub const BUILTIN_ACTION_TYPE_IDS: [&str; 11] = [
    email::ACTION_TYPE_ID,
    es_index::ACTION_TYPE_ID,
    pagerduty::ACTION_TYPE_ID,
    swimlane::ACTION_TYPE_ID,
    server_log::ACTION_TYPE_ID,
    slack::ACTION_TYPE_ID,
    webhook::ACTION_TYPE_ID,
    cases::servicenow::ACTION_TYPE_ID,
    cases::jira::ACTION_TYPE_ID,
    cases::resilient::ACTION_TYPE_ID,
    teams::ACTION_TYPE_ID,
];

/// What the built-in connectors need from their host.
#[derive(Debug, Clone)]
pub struct BuiltinActionTypeDeps {
    pub utils: Arc<ActionsConfigurationUtilities>,
    /// Public URL of the host, used for links in email footers.
    pub public_base_url: Option<String>,
    /// Cluster targeted by the `.index` connector.
    pub elasticsearch: ElasticsearchConfig,
}

/// Build every built-in connector, in registration order.
pub fn builtin_action_types(
    deps: &BuiltinActionTypeDeps,
) -> Result<Vec<Arc<dyn ActionType>>, CourierError> {
    let ctx = HttpContext::new(Arc::clone(&deps.utils))?;
    Ok(vec![
        Arc::new(email::EmailActionType::new(
            Arc::clone(&deps.utils),
            deps.public_base_url.clone(),
        )),
        Arc::new(es_index::IndexActionType::new(
            ctx.clone(),
            deps.elasticsearch.clone(),
        )),
        Arc::new(pagerduty::PagerDutyActionType::new(ctx.clone())),
        Arc::new(swimlane::SwimlaneActionType::new(ctx.clone())),
        Arc::new(server_log::ServerLogActionType::new()),
        Arc::new(slack::SlackActionType::new(ctx.clone())),
        Arc::new(webhook::WebhookActionType::new(ctx.clone())),
        Arc::new(cases::servicenow::ServiceNowActionType::new(ctx.clone())),
        Arc::new(cases::jira::JiraActionType::new(ctx.clone())),
        Arc::new(cases::resilient::ResilientActionType::new(ctx.clone())),
        Arc::new(teams::TeamsActionType::new(ctx)),
    ])
}

/// Register all built-in connectors.
///
/// Fails on the first id that is already registered.
pub fn register_builtin_action_types(
    registry: &mut ActionTypeRegistry,
    deps: &BuiltinActionTypeDeps,
) -> Result<(), CourierError> {
    for action_type in builtin_action_types(deps)? {
        registry.register(action_type)?;
    }
    info!(count = BUILTIN_ACTION_TYPE_IDS.len(), "registered built-in action types");
    Ok(())
}
