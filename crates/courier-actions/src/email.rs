// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `.email`: send mail over SMTP.
//!
//! Messages are sent as `multipart/alternative` with the Markdown source as
//! the plain-text part and its rendered HTML as the rich part.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use comrak::{Options, markdown_to_html};
use courier_core::schema::{SchemaKind, parse};
use courier_core::{ActionType, ActionTypeExecutorResult, CourierError, ExecutorOptions};
use courier_security::{ActionsConfigurationUtilities, redact};
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::response::transport_failure;

pub const ACTION_TYPE_ID: &str = ".email";

const WHAT: &str = "sending email";

/// Host, port and implicit-TLS flag of a well-known mail service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WellKnownService {
    pub host: &'static str,
    pub port: u16,
    pub secure: bool,
}

/// Look up a well-known service by name, case-insensitively.
pub fn well_known_service(name: &str) -> Option<WellKnownService> {
    match name.to_ascii_lowercase().as_str() {
        "gmail" => Some(WellKnownService {
            host: "smtp.gmail.com",
            port: 465,
            secure: true,
        }),
        "outlook365" => Some(WellKnownService {
            host: "smtp.office365.com",
            port: 587,
            secure: false,
        }),
        "ses" => Some(WellKnownService {
            host: "email-smtp.us-east-1.amazonaws.com",
            port: 465,
            secure: true,
        }),
        _ => None,
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct EmailConfig {
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub secure: Option<bool>,
    pub from: String,
    #[serde(default = "default_has_auth")]
    pub has_auth: bool,
}

fn default_has_auth() -> bool {
    true
}

/// Resolved SMTP endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpEndpoint {
    pub host: String,
    pub port: u16,
    pub secure: bool,
}

impl EmailConfig {
    /// Resolve the SMTP endpoint from `service` or `host`/`port`.
    pub fn endpoint(&self) -> Result<SmtpEndpoint, CourierError> {
        let custom = matches!(self.service.as_deref(), None | Some("other"));
        if !custom {
            let name = self.service.as_deref().unwrap_or_default();
            let known = well_known_service(name).ok_or_else(|| {
                CourierError::validation(
                    SchemaKind::Config,
                    format!("[service]: \"{name}\" is not a well-known email service"),
                )
            })?;
            return Ok(SmtpEndpoint {
                host: self.host.clone().unwrap_or_else(|| known.host.to_string()),
                port: self.port.unwrap_or(known.port),
                secure: self.secure.unwrap_or(known.secure),
            });
        }

        let host = self.host.clone().ok_or_else(|| {
            CourierError::validation(
                SchemaKind::Config,
                "[host] is required if [service] is not provided",
            )
        })?;
        let port = self.port.ok_or_else(|| {
            CourierError::validation(
                SchemaKind::Config,
                "[port] is required if [service] is not provided",
            )
        })?;
        Ok(SmtpEndpoint {
            host,
            port,
            secure: self.secure.unwrap_or(port == 465),
        })
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmailSecrets {
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<SecretString>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FooterLink {
    pub path: String,
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct EmailParams {
    #[serde(default)]
    pub to: Vec<String>,
    #[serde(default)]
    pub cc: Vec<String>,
    #[serde(default)]
    pub bcc: Vec<String>,
    pub subject: String,
    pub message: String,
    #[serde(default)]
    pub footer_link: Option<FooterLink>,
}

impl EmailParams {
    fn check(&self) -> Result<(), CourierError> {
        if self.to.is_empty() && self.cc.is_empty() && self.bcc.is_empty() {
            return Err(CourierError::validation(
                SchemaKind::Params,
                "no [to], [cc], or [bcc] entries",
            ));
        }
        Ok(())
    }
}

fn mailbox(kind: SchemaKind, field: &str, address: &str) -> Result<Mailbox, CourierError> {
    address.parse::<Mailbox>().map_err(|e| {
        CourierError::validation(kind, format!("[{field}]: invalid address \"{address}\": {e}"))
    })
}

/// Append the "sent by" footer, linking back to the host when its public URL is known.
pub fn with_footer(
    message: &str,
    public_base_url: Option<&str>,
    link: Option<&FooterLink>,
) -> String {
    let footer = match public_base_url {
        Some(base) => {
            let base = base.trim_end_matches('/');
            match link {
                Some(link) => format!(
                    "This message was sent by Courier. [{}]({base}{}).",
                    link.text, link.path
                ),
                None => format!("This message was sent by Courier. [Go to Courier]({base})."),
            }
        }
        None => "This message was sent by Courier.".to_string(),
    };
    format!("{message}\n\n--\n\n{footer}")
}

/// Plain-text and HTML bodies, footer included.
pub fn render_bodies(params: &EmailParams, public_base_url: Option<&str>) -> (String, String) {
    let text = with_footer(&params.message, public_base_url, params.footer_link.as_ref());
    let html = markdown_to_html(&text, &Options::default());
    (text, html)
}

/// Build the MIME message.
pub fn build_message(
    config: &EmailConfig,
    params: &EmailParams,
    public_base_url: Option<&str>,
) -> Result<Message, CourierError> {
    let mut builder = Message::builder()
        .from(mailbox(SchemaKind::Config, "from", &config.from)?)
        .subject(params.subject.clone());
    for address in &params.to {
        builder = builder.to(mailbox(SchemaKind::Params, "to", address)?);
    }
    for address in &params.cc {
        builder = builder.cc(mailbox(SchemaKind::Params, "cc", address)?);
    }
    for address in &params.bcc {
        builder = builder.bcc(mailbox(SchemaKind::Params, "bcc", address)?);
    }

    let (text, html) = render_bodies(params, public_base_url);
    builder
        .multipart(MultiPart::alternative_plain_html(text, html))
        .map_err(|e| CourierError::Internal(format!("failed to build email message: {e}")))
}

pub struct EmailActionType {
    utils: Arc<ActionsConfigurationUtilities>,
    public_base_url: Option<String>,
}

impl EmailActionType {
    pub fn new(utils: Arc<ActionsConfigurationUtilities>, public_base_url: Option<String>) -> Self {
        Self {
            utils,
            public_base_url,
        }
    }

    fn transport(
        &self,
        endpoint: &SmtpEndpoint,
        credentials: Option<Credentials>,
    ) -> Result<AsyncSmtpTransport<Tokio1Executor>, CourierError> {
        let smtp_error = |e: lettre::transport::smtp::Error| CourierError::Service {
            message: format!("failed to configure SMTP transport: {e}"),
            source: Some(Box::new(e)),
        };

        let mut builder = if endpoint.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&endpoint.host).map_err(smtp_error)?
        } else {
            let tls = TlsParameters::new(endpoint.host.clone()).map_err(smtp_error)?;
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&endpoint.host)
                .tls(Tls::Opportunistic(tls))
        };
        builder = builder
            .port(endpoint.port)
            .timeout(Some(self.timeout()));
        if let Some(credentials) = credentials {
            builder = builder.credentials(credentials);
        }
        Ok(builder.build())
    }

    fn timeout(&self) -> Duration {
        self.utils.response_settings().timeout
    }
}

#[async_trait]
impl ActionType for EmailActionType {
    fn id(&self) -> &str {
        ACTION_TYPE_ID
    }

    fn name(&self) -> &str {
        "Email"
    }

    fn validate_config(&self, config: &Value) -> Result<(), CourierError> {
        let config: EmailConfig = parse(SchemaKind::Config, config)?;
        let endpoint = config.endpoint()?;
        self.utils
            .ensure_hostname_allowed(&endpoint.host)
            .map_err(|e| {
                CourierError::validation(
                    SchemaKind::Config,
                    format!("error configuring email action: {e}"),
                )
            })?;
        mailbox(SchemaKind::Config, "from", &config.from).map(|_| ())
    }

    fn validate_secrets(&self, secrets: &Value) -> Result<(), CourierError> {
        let secrets: EmailSecrets = parse(SchemaKind::Secrets, secrets)?;
        match (&secrets.user, &secrets.password) {
            (Some(_), Some(_)) | (None, None) => Ok(()),
            _ => Err(CourierError::validation(
                SchemaKind::Secrets,
                "both user and password must be specified",
            )),
        }
    }

    fn validate_params(&self, params: &Value) -> Result<(), CourierError> {
        let params: EmailParams = parse(SchemaKind::Params, params)?;
        params.check()
    }

    async fn execute(
        &self,
        options: ExecutorOptions,
    ) -> Result<ActionTypeExecutorResult, CourierError> {
        let config: EmailConfig = parse(SchemaKind::Config, &options.config)?;
        let secrets: EmailSecrets = parse(SchemaKind::Secrets, &options.secrets)?;
        let params: EmailParams = parse(SchemaKind::Params, &options.params)?;
        params.check()?;
        let action_id = options.action_id;

        let mut redactions = Vec::new();
        let credentials = if config.has_auth {
            match (secrets.user, secrets.password) {
                (Some(user), Some(password)) => {
                    redactions.push(password.expose_secret().to_string());
                    Some(Credentials::new(user, password.expose_secret().to_string()))
                }
                _ => {
                    return Err(CourierError::validation(
                        SchemaKind::Secrets,
                        "[user] and [password] are required when [hasAuth] is true",
                    ));
                }
            }
        } else {
            None
        };

        let endpoint = config.endpoint()?;
        let message = build_message(&config, &params, self.public_base_url.as_deref())?;
        let transport = self.transport(&endpoint, credentials)?;
        debug!(
            host = %endpoint.host,
            port = endpoint.port,
            recipients = params.to.len() + params.cc.len() + params.bcc.len(),
            "sending email"
        );

        match transport.send(message).await {
            Ok(response) => Ok(ActionTypeExecutorResult::ok_with_data(
                action_id,
                json!({
                    "code": response.code().to_string(),
                    "message": response.message().collect::<Vec<_>>().join(" "),
                }),
            )),
            Err(e) => {
                let failure = CourierError::service(redact(&e.to_string(), &redactions));
                warn!(error = %failure, "smtp delivery failed");
                Ok(transport_failure(&action_id, WHAT, &failure))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_support::options;
    use courier_config::model::ActionsConfig;

    fn email(hosts: &[&str], public_base_url: Option<&str>) -> EmailActionType {
        let utils = ActionsConfigurationUtilities::new(&ActionsConfig {
            allowed_hosts: hosts.iter().map(|h| h.to_string()).collect(),
            response_timeout_secs: 2,
            ..ActionsConfig::default()
        });
        EmailActionType::new(Arc::new(utils), public_base_url.map(str::to_string))
    }

    fn params() -> EmailParams {
        EmailParams {
            to: vec!["ops@example.com".into()],
            cc: vec![],
            bcc: vec!["audit@example.com".into()],
            subject: "Alert fired".into(),
            message: "CPU is **high**".into(),
            footer_link: Some(FooterLink {
                path: "/app/alerts/123".into(),
                text: "View alert".into(),
            }),
        }
    }

    #[test]
    fn custom_host_requires_port() {
        let email = email(&["*"], None);
        let config = json!({"from": "bob@example.com", "host": "smtp.example.com", "port": 25});
        assert!(email.validate_config(&config).is_ok());
        let err = email
            .validate_config(&json!({"from": "bob@example.com", "host": "smtp.example.com"}))
            .unwrap_err();
        assert!(err.to_string().contains("[port] is required"));
        let err = email
            .validate_config(&json!({"from": "bob@example.com"}))
            .unwrap_err();
        assert!(err.to_string().contains("[host] is required"));
    }

    #[test]
    fn well_known_services_resolve() {
        let config: EmailConfig =
            serde_json::from_value(json!({"service": "gmail", "from": "a@b.c"})).unwrap();
        assert_eq!(
            config.endpoint().unwrap(),
            SmtpEndpoint {
                host: "smtp.gmail.com".into(),
                port: 465,
                secure: true
            }
        );
        let config: EmailConfig =
            serde_json::from_value(json!({"service": "pigeon", "from": "a@b.c"})).unwrap();
        assert!(config.endpoint().is_err());
    }

    #[test]
    fn smtp_host_must_be_allowed() {
        let email = email(&["smtp.example.com"], None);
        let err = email
            .validate_config(&json!({"from": "bob@example.com", "service": "gmail"}))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "error validating action type config: error configuring email action: \
             target hostname \"smtp.gmail.com\" is not added to the courier config \
             actions.allowed_hosts"
        );
    }

    #[test]
    fn params_need_a_recipient() {
        let email = email(&["*"], None);
        let err = email
            .validate_params(&json!({"subject": "s", "message": "m"}))
            .unwrap_err();
        assert!(err.to_string().contains("no [to], [cc], or [bcc] entries"));
        assert!(
            email
                .validate_params(&json!({"cc": ["x@example.com"], "subject": "s", "message": "m"}))
                .is_ok()
        );
    }

    #[test]
    fn footer_links_to_public_base_url() {
        let link = FooterLink {
            path: "/app/alerts/1".into(),
            text: "View alert".into(),
        };
        assert_eq!(
            with_footer("hi", Some("https://courier.example.com/"), Some(&link)),
            "hi\n\n--\n\nThis message was sent by Courier. [View alert](https://courier.example.com/app/alerts/1)."
        );
        assert_eq!(
            with_footer("hi", Some("https://courier.example.com"), None),
            "hi\n\n--\n\nThis message was sent by Courier. [Go to Courier](https://courier.example.com)."
        );
        assert_eq!(
            with_footer("hi", None, Some(&link)),
            "hi\n\n--\n\nThis message was sent by Courier."
        );
    }

    #[test]
    fn message_has_plain_and_html_parts() {
        let config: EmailConfig = serde_json::from_value(json!({
            "from": "Courier <courier@example.com>", "host": "smtp.example.com", "port": 25
        }))
        .unwrap();
        let message =
            build_message(&config, &params(), Some("https://courier.example.com")).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: Alert fired"));
        assert!(raw.contains("multipart/alternative"));
        assert!(raw.contains("text/html"));
        assert!(!raw.contains("Bcc:"));
    }

    #[test]
    fn markdown_is_rendered_to_html() {
        let (text, html) = render_bodies(&params(), Some("https://courier.example.com"));
        assert!(text.starts_with("CPU is **high**"));
        assert!(html.contains("<strong>high</strong>"));
        assert!(
            html.contains("<a href=\"https://courier.example.com/app/alerts/123\">View alert</a>")
        );
    }

    #[test]
    fn invalid_recipient_is_a_params_error() {
        let config: EmailConfig = serde_json::from_value(json!({
            "from": "courier@example.com", "host": "smtp.example.com", "port": 25
        }))
        .unwrap();
        let mut bad = params();
        bad.to = vec!["not an address".into()];
        let err = build_message(&config, &bad, None).unwrap_err();
        assert!(err.to_string().starts_with("error validating action params: [to]"));
    }

    #[tokio::test]
    async fn has_auth_requires_credentials() {
        let email = email(&["*"], None);
        let err = email
            .execute(options(
                json!({"from": "a@example.com", "host": "localhost", "port": 9}),
                json!({}),
                json!({"to": ["b@example.com"], "subject": "s", "message": "m"}),
            ))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("[hasAuth]"));
    }

    #[tokio::test]
    async fn unreachable_server_is_an_error_result() {
        let email = email(&["*"], None);
        let result = email
            .execute(options(
                json!({
                    "from": "a@example.com",
                    "host": "localhost",
                    "port": 9,
                    "secure": false,
                    "hasAuth": false
                }),
                json!({}),
                json!({"to": ["b@example.com"], "subject": "s", "message": "m"}),
            ))
            .await
            .unwrap();
        assert_eq!(result.message.as_deref(), Some("error sending email, unexpected error"));
    }
}
