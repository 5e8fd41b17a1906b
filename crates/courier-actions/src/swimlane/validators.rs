// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Allow-list checks run after the Swimlane schemas parse.

use courier_core::CourierError;
use courier_core::schema::SchemaKind;
use courier_security::ActionsConfigurationUtilities;

use super::schema::{SwimlaneConfig, SwimlaneSecrets};

/// The API URL must pass the host allow-list.
pub fn validate_common_config(
    utils: &ActionsConfigurationUtilities,
    config: &SwimlaneConfig,
) -> Result<(), CourierError> {
    utils.ensure_uri_allowed(&config.api_url).map_err(|e| {
        CourierError::validation(
            SchemaKind::Config,
            format!("error configuring connector action: {e}"),
        )
    })
}

/// Secrets carry no host information, so only the schema applies.
pub fn validate_common_secrets(
    _utils: &ActionsConfigurationUtilities,
    _secrets: &SwimlaneSecrets,
) -> Result<(), CourierError> {
    Ok(())
}
