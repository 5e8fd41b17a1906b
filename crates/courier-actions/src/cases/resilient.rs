// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `.resilient`: push incidents to IBM Resilient.

use async_trait::async_trait;
use chrono::Utc;
use courier_core::schema::{Empty, SchemaKind, parse};
use courier_core::{ActionType, ActionTypeExecutorResult, CourierError, ExecutorOptions};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Map, Value, json};

use super::{
    CaseIncident, Comment, ExternalService, ExternalServiceComment, ExternalServiceIncident,
    GetIncidentParams, PushToServiceParams, normalize_date, push_to_service, str_field, to_data,
};
use crate::context::HttpContext;

pub const ACTION_TYPE_ID: &str = ".resilient";

const CONTENT_FORMAT: (&str, &str) = ("text_content_output_format", "objects_convert");

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ResilientConfig {
    pub api_url: String,
    pub org_id: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ResilientSecrets {
    pub api_key_id: String,
    pub api_key_secret: SecretString,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ResilientIncident {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub incident_types: Option<Vec<i64>>,
    #[serde(default)]
    pub severity_code: Option<i64>,
}

impl CaseIncident for ResilientIncident {
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
pub enum ResilientParams {
    PushToService(PushToServiceParams<ResilientIncident>),
    GetIncident(GetIncidentParams),
    IncidentTypes(Empty),
    Severity(Empty),
    Handshake(Empty),
}

/// Body for creating an incident.
fn create_body(incident: &ResilientIncident) -> Value {
    let mut body = Map::new();
    body.insert("name".into(), json!(incident.name));
    body.insert("discovered_date".into(), json!(Utc::now().timestamp_millis()));
    if let Some(description) = &incident.description {
        body.insert(
            "description".into(),
            json!({ "format": "html", "content": description }),
        );
    }
    if let Some(types) = &incident.incident_types {
        let ids: Vec<Value> = types.iter().map(|id| json!({ "id": id })).collect();
        body.insert("incident_type_ids".into(), Value::Array(ids));
    }
    if let Some(severity) = incident.severity_code {
        body.insert("severity_code".into(), json!({ "id": severity }));
    }
    Value::Object(body)
}

/// Resilient updates are expressed as old/new value pairs against the
/// current incident.
fn update_changes(current: &Value, incident: &ResilientIncident) -> Value {
    let mut changes = vec![json!({
        "field": { "name": "name" },
        "old_value": { "text": current.get("name").cloned().unwrap_or(Value::Null) },
        "new_value": { "text": incident.name },
    })];

    if let Some(description) = &incident.description {
        changes.push(json!({
            "field": { "name": "description" },
            "old_value": { "textarea": current.get("description").cloned().unwrap_or(Value::Null) },
            "new_value": { "textarea": { "format": "html", "content": description } },
        }));
    }
    if let Some(types) = &incident.incident_types {
        changes.push(json!({
            "field": { "name": "incident_type_ids" },
            "old_value": { "ids": current.get("incident_type_ids").cloned().unwrap_or(json!([])) },
            "new_value": { "ids": types },
        }));
    }
    if let Some(severity) = incident.severity_code {
        changes.push(json!({
            "field": { "name": "severity_code" },
            "old_value": { "id": current.get("severity_code").cloned().unwrap_or(Value::Null) },
            "new_value": { "id": severity },
        }));
    }
    json!({ "changes": changes })
}

/// `[{ id, name }]` from a Resilient field's `values`.
fn field_values(field: &Value) -> Value {
    let values = field
        .get("values")
        .and_then(Value::as_array)
        .map(|values| {
            values
                .iter()
                .map(|v| {
                    json!({
                        "id": v.get("value").cloned().unwrap_or(Value::Null),
                        "name": str_field(v, "label"),
                    })
                })
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    Value::Array(values)
}

pub struct ResilientService<'a> {
    ctx: &'a HttpContext,
    api_url: String,
    org_id: String,
    api_key_id: String,
    api_key_secret: SecretString,
}

impl<'a> ResilientService<'a> {
    pub fn new(ctx: &'a HttpContext, config: &ResilientConfig, secrets: ResilientSecrets) -> Self {
        Self {
            ctx,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            org_id: config.org_id.clone(),
            api_key_id: secrets.api_key_id,
            api_key_secret: secrets.api_key_secret,
        }
    }

    fn org_url(&self, path: &str) -> String {
        format!("{}/rest/orgs/{}/{path}", self.api_url, self.org_id)
    }

    fn incident_url(&self, path: &str) -> Result<url::Url, CourierError> {
        let mut url = url::Url::parse(&self.org_url(path))
            .map_err(|e| CourierError::Config(format!("invalid resilient apiUrl: {e}")))?;
        url.query_pairs_mut()
            .append_pair(CONTENT_FORMAT.0, CONTENT_FORMAT.1);
        Ok(url)
    }

    fn view_url(&self, id: &str) -> String {
        format!("{}/#incidents/{id}", self.api_url)
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.basic_auth(&self.api_key_id, Some(self.api_key_secret.expose_secret()))
    }

    fn secrets(&self) -> Vec<String> {
        vec![self.api_key_secret.expose_secret().to_string()]
    }

    fn to_incident(&self, incident: &Value, date_field: &str) -> ExternalServiceIncident {
        let id = str_field(incident, "id");
        ExternalServiceIncident {
            url: self.view_url(&id),
            title: id.clone(),
            pushed_date: normalize_date(incident.get(date_field).unwrap_or(&Value::Null)),
            id,
        }
    }

    async fn field(&self, name: &str, context: &str) -> Result<Value, CourierError> {
        let request = self.authed(
            self.ctx
                .client()
                .get(self.org_url(&format!("types/incident/fields/{name}"))),
        );
        let field = self.ctx.call_json(request, &self.secrets(), context).await?;
        Ok(field_values(&field))
    }

    pub async fn incident_types(&self) -> Result<Value, CourierError> {
        self.field(
            "incident_type_ids",
            "[Action][IBM Resilient]: Unable to get incident types",
        )
        .await
    }

    pub async fn severity(&self) -> Result<Value, CourierError> {
        self.field("severity_code", "[Action][IBM Resilient]: Unable to get severity")
            .await
    }
}

#[async_trait]
impl ExternalService for ResilientService<'_> {
    type Incident = ResilientIncident;

    async fn get_incident(&self, id: &str) -> Result<Value, CourierError> {
        let request = self.authed(
            self.ctx
                .client()
                .get(self.incident_url(&format!("incidents/{id}"))?),
        );
        self.ctx
            .call_json(
                request,
                &self.secrets(),
                &format!("[Action][IBM Resilient]: Unable to get incident with id {id}"),
            )
            .await
    }

    async fn create_incident(
        &self,
        incident: &ResilientIncident,
    ) -> Result<ExternalServiceIncident, CourierError> {
        let request = self
            .authed(self.ctx.client().post(self.incident_url("incidents")?))
            .json(&create_body(incident));
        let created = self
            .ctx
            .call_json(
                request,
                &self.secrets(),
                "[Action][IBM Resilient]: Unable to create incident",
            )
            .await?;
        Ok(self.to_incident(&created, "create_date"))
    }

    async fn update_incident(
        &self,
        id: &str,
        incident: &ResilientIncident,
    ) -> Result<ExternalServiceIncident, CourierError> {
        let context = format!("[Action][IBM Resilient]: Unable to update incident with id {id}");
        let current = self.get_incident(id).await?;
        let request = self
            .authed(
                self.ctx
                    .client()
                    .patch(self.incident_url(&format!("incidents/{id}"))?),
            )
            .json(&update_changes(&current, incident));
        let outcome = self
            .ctx
            .call_json(request, &self.secrets(), &context)
            .await?;
        if outcome.get("success").and_then(Value::as_bool) == Some(false) {
            let reason = outcome
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("update was rejected");
            return Err(CourierError::service(format!("{context}. Error: {reason}")));
        }

        let updated = self.get_incident(id).await?;
        Ok(self.to_incident(&updated, "inc_last_modified_date"))
    }

    async fn create_comment(
        &self,
        incident_id: &str,
        comment: &Comment,
    ) -> Result<ExternalServiceComment, CourierError> {
        let request = self
            .authed(
                self.ctx
                    .client()
                    .post(self.incident_url(&format!("incidents/{incident_id}/comments"))?),
            )
            .json(&json!({ "text": { "format": "text", "content": comment.comment } }));
        let created = self
            .ctx
            .call_json(
                request,
                &self.secrets(),
                &format!(
                    "[Action][IBM Resilient]: Unable to create comment at incident with id {incident_id}"
                ),
            )
            .await?;
        Ok(ExternalServiceComment {
            comment_id: comment.comment_id.clone(),
            pushed_date: normalize_date(created.get("create_date").unwrap_or(&Value::Null)),
        })
    }
}

pub struct ResilientActionType {
    ctx: HttpContext,
}

impl ResilientActionType {
    pub fn new(ctx: HttpContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl ActionType for ResilientActionType {
    fn id(&self) -> &str {
        ACTION_TYPE_ID
    }

    fn name(&self) -> &str {
        "IBM Resilient"
    }

    fn validate_config(&self, config: &Value) -> Result<(), CourierError> {
        let config: ResilientConfig = parse(SchemaKind::Config, config)?;
        self.ctx.utils().ensure_uri_allowed(&config.api_url).map_err(|e| {
            CourierError::validation(
                SchemaKind::Config,
                format!("error configuring connector action: {e}"),
            )
        })
    }

    fn validate_secrets(&self, secrets: &Value) -> Result<(), CourierError> {
        parse::<ResilientSecrets>(SchemaKind::Secrets, secrets).map(|_| ())
    }

    fn validate_params(&self, params: &Value) -> Result<(), CourierError> {
        parse::<ResilientParams>(SchemaKind::Params, params).map(|_| ())
    }

    async fn execute(
        &self,
        options: ExecutorOptions,
    ) -> Result<ActionTypeExecutorResult, CourierError> {
        let config: ResilientConfig = parse(SchemaKind::Config, &options.config)?;
        let secrets: ResilientSecrets = parse(SchemaKind::Secrets, &options.secrets)?;
        let params: ResilientParams = parse(SchemaKind::Params, &options.params)?;
        let service = ResilientService::new(&self.ctx, &config, secrets);

        let data = match params {
            ResilientParams::PushToService(push) => {
                to_data(&push_to_service(&service, push).await?)?
            }
            ResilientParams::GetIncident(get) => service.get_incident(&get.external_id).await?,
            ResilientParams::IncidentTypes(_) => service.incident_types().await?,
            ResilientParams::Severity(_) => service.severity().await?,
            ResilientParams::Handshake(_) => json!({}),
        };
        Ok(ActionTypeExecutorResult::ok_with_data(options.action_id, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_support::{allow_all, options};
    use wiremock::matchers::{basic_auth, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(uri: &str) -> Value {
        json!({"apiUrl": uri, "orgId": "201"})
    }

    fn secrets() -> Value {
        json!({"apiKeyId": "keyId", "apiKeySecret": "secret"})
    }

    #[test]
    fn create_body_shapes_fields() {
        let incident = ResilientIncident {
            name: "Phishing".into(),
            description: Some("reported by user".into()),
            external_id: None,
            incident_types: Some(vec![1001, 16]),
            severity_code: Some(6),
        };
        let body = create_body(&incident);
        assert_eq!(body["name"], "Phishing");
        assert_eq!(body["description"], json!({"format": "html", "content": "reported by user"}));
        assert_eq!(body["incident_type_ids"], json!([{"id": 1001}, {"id": 16}]));
        assert_eq!(body["severity_code"], json!({"id": 6}));
        assert!(body["discovered_date"].is_i64());
    }

    #[test]
    fn update_changes_carry_old_values() {
        let current = json!({"name": "old", "severity_code": 4});
        let incident = ResilientIncident {
            name: "new".into(),
            description: None,
            external_id: Some("1".into()),
            incident_types: None,
            severity_code: Some(6),
        };
        let changes = update_changes(&current, &incident);
        assert_eq!(changes["changes"][0]["old_value"]["text"], "old");
        assert_eq!(changes["changes"][0]["new_value"]["text"], "new");
        assert_eq!(changes["changes"][1]["field"]["name"], "severity_code");
        assert_eq!(changes["changes"][1]["old_value"]["id"], 4);
        assert_eq!(changes["changes"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn creates_incident() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/orgs/201/incidents"))
            .and(query_param("text_content_output_format", "objects_convert"))
            .and(basic_auth("keyId", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 1,
                "name": "title",
                "create_date": 1589391874472_i64
            })))
            .expect(1)
            .mount(&server)
            .await;

        let resilient = ResilientActionType::new(allow_all());
        let result = resilient
            .execute(options(
                config(&server.uri()),
                secrets(),
                json!({
                    "subAction": "pushToService",
                    "subActionParams": {"incident": {"name": "title", "incidentTypes": [1001]}}
                }),
            ))
            .await
            .unwrap();
        let data = result.data.unwrap();
        assert_eq!(data["id"], "1");
        assert_eq!(data["title"], "1");
        assert_eq!(data["url"], format!("{}/#incidents/1", server.uri()));
        assert_eq!(data["pushedDate"], "2020-05-13T17:44:34.472Z");
    }

    #[tokio::test]
    async fn rejected_update_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/orgs/201/incidents/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1, "name": "old"})))
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/rest/orgs/201/incidents/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "message": "field severity_code is read-only"
            })))
            .mount(&server)
            .await;

        let resilient = ResilientActionType::new(allow_all());
        let err = resilient
            .execute(options(
                config(&server.uri()),
                secrets(),
                json!({
                    "subAction": "pushToService",
                    "subActionParams": {"incident": {"name": "new", "externalId": "1"}}
                }),
            ))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "[Action][IBM Resilient]: Unable to update incident with id 1. Error: field severity_code is read-only"
        );
    }

    #[tokio::test]
    async fn lists_severity_values() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/orgs/201/types/incident/fields/severity_code"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "values": [{"value": 4, "label": "Low"}, {"value": 6, "label": "High"}]
            })))
            .mount(&server)
            .await;

        let resilient = ResilientActionType::new(allow_all());
        let result = resilient
            .execute(options(
                config(&server.uri()),
                secrets(),
                json!({"subAction": "severity", "subActionParams": {}}),
            ))
            .await
            .unwrap();
        assert_eq!(
            result.data.unwrap(),
            json!([{"id": 4, "name": "Low"}, {"id": 6, "name": "High"}])
        );
    }
}
