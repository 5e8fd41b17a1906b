// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `.servicenow`: push incidents to the ServiceNow table API.

use async_trait::async_trait;
use courier_core::schema::{Empty, SchemaKind, parse};
use courier_core::{ActionType, ActionTypeExecutorResult, CourierError, ExecutorOptions};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{
    CaseIncident, Comment, ExternalService, ExternalServiceComment, ExternalServiceIncident,
    GetIncidentParams, PushToServiceParams, normalize_date, push_to_service, str_field, to_data,
};
use crate::context::HttpContext;

pub const ACTION_TYPE_ID: &str = ".servicenow";

const INCIDENT_TABLE_PATH: &str = "api/now/v2/table/incident";
const VIEW_INCIDENT_PATH: &str = "nav_to.do?uri=incident.do?sys_id=";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ServiceNowConfig {
    pub api_url: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceNowSecrets {
    pub username: String,
    pub password: SecretString,
}

/// Incident fields sent to the `incident` table.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceNowIncident {
    pub short_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urgency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(default, rename = "externalId", skip_serializing)]
    pub external_id: Option<String>,
}

impl CaseIncident for ServiceNowIncident {
    fn external_id(&self) -> Option<&str> {
        self.external_id.as_deref()
    }
}

#[derive(Debug, Deserialize)]
#[serde(
    tag = "subAction",
    content = "subActionParams",
    rename_all = "camelCase",
    deny_unknown_fields
)]
pub enum ServiceNowParams {
    PushToService(PushToServiceParams<ServiceNowIncident>),
    GetIncident(GetIncidentParams),
    Handshake(Empty),
}

pub struct ServiceNowService<'a> {
    ctx: &'a HttpContext,
    api_url: String,
    username: String,
    password: SecretString,
}

impl<'a> ServiceNowService<'a> {
    pub fn new(
        ctx: &'a HttpContext,
        config: &ServiceNowConfig,
        secrets: ServiceNowSecrets,
    ) -> Self {
        Self {
            ctx,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            username: secrets.username,
            password: secrets.password,
        }
    }

    fn incident_url(&self, id: Option<&str>) -> String {
        match id {
            Some(id) => format!("{}/{INCIDENT_TABLE_PATH}/{id}", self.api_url),
            None => format!("{}/{INCIDENT_TABLE_PATH}", self.api_url),
        }
    }

    fn view_url(&self, sys_id: &str) -> String {
        format!("{}/{VIEW_INCIDENT_PATH}{sys_id}", self.api_url)
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.basic_auth(&self.username, Some(self.password.expose_secret()))
    }

    fn secrets(&self) -> Vec<String> {
        vec![self.password.expose_secret().to_string()]
    }

    fn to_incident(&self, result: &Value, date_field: &str) -> ExternalServiceIncident {
        let sys_id = str_field(result, "sys_id");
        ExternalServiceIncident {
            url: self.view_url(&sys_id),
            title: str_field(result, "number"),
            pushed_date: normalize_date(result.get(date_field).unwrap_or(&Value::Null)),
            id: sys_id,
        }
    }

    async fn patch(&self, id: &str, body: &Value, context: &str) -> Result<Value, CourierError> {
        let request = self.authed(self.ctx.client().patch(self.incident_url(Some(id)))).json(body);
        let response = self.ctx.call_json(request, &self.secrets(), context).await?;
        Ok(response.get("result").cloned().unwrap_or(Value::Null))
    }
}

#[async_trait]
impl ExternalService for ServiceNowService<'_> {
    type Incident = ServiceNowIncident;

    async fn get_incident(&self, id: &str) -> Result<Value, CourierError> {
        let request = self.authed(self.ctx.client().get(self.incident_url(Some(id))));
        let response = self
            .ctx
            .call_json(
                request,
                &self.secrets(),
                &format!("[Action][ServiceNow]: Unable to get incident with id {id}"),
            )
            .await?;
        Ok(response.get("result").cloned().unwrap_or(Value::Null))
    }

    async fn create_incident(
        &self,
        incident: &ServiceNowIncident,
    ) -> Result<ExternalServiceIncident, CourierError> {
        let request = self
            .authed(self.ctx.client().post(self.incident_url(None)))
            .json(incident);
        let response = self
            .ctx
            .call_json(
                request,
                &self.secrets(),
                "[Action][ServiceNow]: Unable to create incident",
            )
            .await?;
        let result = response.get("result").cloned().unwrap_or(Value::Null);
        Ok(self.to_incident(&result, "sys_created_on"))
    }

    async fn update_incident(
        &self,
        id: &str,
        incident: &ServiceNowIncident,
    ) -> Result<ExternalServiceIncident, CourierError> {
        let body = serde_json::to_value(incident)
            .map_err(|e| CourierError::Internal(format!("failed to serialize incident: {e}")))?;
        let result = self
            .patch(
                id,
                &body,
                &format!("[Action][ServiceNow]: Unable to update incident with id {id}"),
            )
            .await?;
        Ok(self.to_incident(&result, "sys_updated_on"))
    }

    async fn create_comment(
        &self,
        incident_id: &str,
        comment: &Comment,
    ) -> Result<ExternalServiceComment, CourierError> {
        let result = self
            .patch(
                incident_id,
                &json!({ "comments": comment.comment }),
                &format!(
                    "[Action][ServiceNow]: Unable to create comment at incident with id {incident_id}"
                ),
            )
            .await?;
        Ok(ExternalServiceComment {
            comment_id: comment.comment_id.clone(),
            pushed_date: normalize_date(result.get("sys_updated_on").unwrap_or(&Value::Null)),
        })
    }
}

pub struct ServiceNowActionType {
    ctx: HttpContext,
}

impl ServiceNowActionType {
    pub fn new(ctx: HttpContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl ActionType for ServiceNowActionType {
    fn id(&self) -> &str {
        ACTION_TYPE_ID
    }

    fn name(&self) -> &str {
        "ServiceNow"
    }

    fn validate_config(&self, config: &Value) -> Result<(), CourierError> {
        let config: ServiceNowConfig = parse(SchemaKind::Config, config)?;
        self.ctx.utils().ensure_uri_allowed(&config.api_url).map_err(|e| {
            CourierError::validation(
                SchemaKind::Config,
                format!("error configuring connector action: {e}"),
            )
        })
    }

    fn validate_secrets(&self, secrets: &Value) -> Result<(), CourierError> {
        parse::<ServiceNowSecrets>(SchemaKind::Secrets, secrets).map(|_| ())
    }

    fn validate_params(&self, params: &Value) -> Result<(), CourierError> {
        parse::<ServiceNowParams>(SchemaKind::Params, params).map(|_| ())
    }

    async fn execute(
        &self,
        options: ExecutorOptions,
    ) -> Result<ActionTypeExecutorResult, CourierError> {
        let config: ServiceNowConfig = parse(SchemaKind::Config, &options.config)?;
        let secrets: ServiceNowSecrets = parse(SchemaKind::Secrets, &options.secrets)?;
        let params: ServiceNowParams = parse(SchemaKind::Params, &options.params)?;
        let service = ServiceNowService::new(&self.ctx, &config, secrets);

        let data = match params {
            ServiceNowParams::PushToService(push) => {
                to_data(&push_to_service(&service, push).await?)?
            }
            ServiceNowParams::GetIncident(get) => service.get_incident(&get.external_id).await?,
            ServiceNowParams::Handshake(_) => json!({}),
        };
        Ok(ActionTypeExecutorResult::ok_with_data(options.action_id, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_support::{allow_all, allowing, options};
    use wiremock::matchers::{basic_auth, body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn secrets() -> Value {
        json!({"username": "admin", "password": "pa55"})
    }

    #[test]
    fn api_url_must_be_allowed() {
        let sn = ServiceNowActionType::new(allowing(&["dev.service-now.com"]));
        assert!(
            sn.validate_config(&json!({"apiUrl": "https://dev.service-now.com"}))
                .is_ok()
        );
        assert!(
            sn.validate_config(&json!({"apiUrl": "https://evil.com"}))
                .unwrap_err()
                .to_string()
                .contains("error configuring connector action")
        );
    }

    #[test]
    fn params_schema() {
        let sn = ServiceNowActionType::new(allow_all());
        assert!(
            sn.validate_params(&json!({
                "subAction": "pushToService",
                "subActionParams": {"incident": {"short_description": "down"}, "comments": []}
            }))
            .is_ok()
        );
        assert!(
            sn.validate_params(&json!({"subAction": "handshake", "subActionParams": {}}))
                .is_ok()
        );
        assert!(
            sn.validate_params(&json!({
                "subAction": "pushToService",
                "subActionParams": {"incident": {"description": "no title"}}
            }))
            .is_err()
        );
    }

    #[tokio::test]
    async fn pushes_new_incident_with_comments() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/now/v2/table/incident"))
            .and(basic_auth("admin", "pa55"))
            .and(body_json(json!({"short_description": "DB down", "urgency": "1"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "result": {
                    "sys_id": "abc123",
                    "number": "INC0010001",
                    "sys_created_on": "2026-02-01 09:30:00"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/api/now/v2/table/incident/abc123"))
            .and(body_json(json!({"comments": "paged on-call"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": {
                    "sys_id": "abc123",
                    "number": "INC0010001",
                    "sys_updated_on": "2026-02-01 09:31:00"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let sn = ServiceNowActionType::new(allow_all());
        let result = sn
            .execute(options(
                json!({"apiUrl": server.uri()}),
                secrets(),
                json!({
                    "subAction": "pushToService",
                    "subActionParams": {
                        "incident": {"short_description": "DB down", "urgency": "1"},
                        "comments": [{"commentId": "c-1", "comment": "paged on-call"}]
                    }
                }),
            ))
            .await
            .unwrap();

        let data = result.data.unwrap();
        assert_eq!(data["id"], "abc123");
        assert_eq!(data["title"], "INC0010001");
        assert_eq!(data["pushedDate"], "2026-02-01T09:30:00.000Z");
        assert_eq!(
            data["url"],
            format!("{}/nav_to.do?uri=incident.do?sys_id=abc123", server.uri())
        );
        assert_eq!(data["comments"][0]["commentId"], "c-1");
        assert_eq!(data["comments"][0]["pushedDate"], "2026-02-01T09:31:00.000Z");
    }

    #[tokio::test]
    async fn updates_existing_incident() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/api/now/v2/table/incident/abc123"))
            .and(body_json(json!({"short_description": "DB down (again)"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": {
                    "sys_id": "abc123",
                    "number": "INC0010001",
                    "sys_updated_on": "2026-02-02 08:00:00"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let sn = ServiceNowActionType::new(allow_all());
        let result = sn
            .execute(options(
                json!({"apiUrl": server.uri()}),
                secrets(),
                json!({
                    "subAction": "pushToService",
                    "subActionParams": {
                        "incident": {"short_description": "DB down (again)", "externalId": "abc123"}
                    }
                }),
            ))
            .await
            .unwrap();
        assert_eq!(result.data.unwrap()["pushedDate"], "2026-02-02T08:00:00.000Z");
    }

    #[tokio::test]
    async fn get_incident_failure_names_the_incident() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": {"message": "No Record found"}
            })))
            .mount(&server)
            .await;

        let sn = ServiceNowActionType::new(allow_all());
        let err = sn
            .execute(options(
                json!({"apiUrl": server.uri()}),
                secrets(),
                json!({"subAction": "getIncident", "subActionParams": {"externalId": "nope"}}),
            ))
            .await
            .unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with(
            "[Action][ServiceNow]: Unable to get incident with id nope. Error: [404] Not Found"
        ));
        assert!(message.contains("No Record found"));
    }
}
