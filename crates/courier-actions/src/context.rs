// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound HTTP state shared by the HTTP-backed connectors.

use std::sync::Arc;

use courier_core::CourierError;
use courier_security::{
    ActionsConfigurationUtilities, build_action_client, read_body_limited, redact, transport_error,
};
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use tracing::debug;

/// A fully read vendor response.
#[derive(Debug)]
pub struct HttpReply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Parse the body as JSON, mapping failures to a service error.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, CourierError> {
        serde_json::from_str(&self.body).map_err(|e| CourierError::Service {
            message: format!("failed to parse response body: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

/// Allow-list utilities plus the one reqwest client every connector reuses.
#[derive(Debug, Clone)]
pub struct HttpContext {
    utils: Arc<ActionsConfigurationUtilities>,
    client: reqwest::Client,
}

impl HttpContext {
    pub fn new(utils: Arc<ActionsConfigurationUtilities>) -> Result<Self, CourierError> {
        let client = build_action_client(&utils.response_settings())?;
        Ok(Self { utils, client })
    }

    pub fn utils(&self) -> &ActionsConfigurationUtilities {
        &self.utils
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Read a response body under the configured size limit.
    pub async fn read_body(&self, response: reqwest::Response) -> Result<String, CourierError> {
        read_body_limited(response, &self.utils.response_settings()).await
    }

    /// Send a request and read its body.
    ///
    /// `secrets` are scrubbed from transport error text.
    pub async fn send(
        &self,
        request: reqwest::RequestBuilder,
        secrets: &[String],
    ) -> Result<HttpReply, CourierError> {
        let response = request
            .send()
            .await
            .map_err(|e| transport_error(e, secrets))?;
        let status = response.status();
        let headers = response.headers().clone();
        debug!(status = %status, "vendor response received");
        let body = self.read_body(response).await?;
        Ok(HttpReply {
            status,
            headers,
            body,
        })
    }

    /// Send a vendor API call and return its JSON body.
    ///
    /// Transport failures and non-success statuses become service errors
    /// prefixed with `context`, e.g. `[Action][Jira]: Unable to get issue`.
    /// An empty body is returned as `null`.
    pub async fn call_json(
        &self,
        request: reqwest::RequestBuilder,
        secrets: &[String],
        context: &str,
    ) -> Result<serde_json::Value, CourierError> {
        let reply = self
            .send(request, secrets)
            .await
            .map_err(|e| CourierError::service(format!("{context}. Error: {e}")))?;

        if !reply.is_success() {
            let detail = crate::response::status_line(reply.status);
            let body = redact(reply.body.trim(), secrets);
            let message = if body.is_empty() {
                format!("{context}. Error: {detail}")
            } else {
                format!("{context}. Error: {detail} Reason: {body}")
            };
            return Err(CourierError::service(message));
        }

        if reply.body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        reply
            .json()
            .map_err(|e| CourierError::service(format!("{context}. Error: {e}")))
    }
}
