// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `.jira`: push incidents to Jira issues through REST API v2.

use async_trait::async_trait;
use courier_core::schema::{Empty, SchemaKind, parse};
use courier_core::{ActionType, ActionTypeExecutorResult, CourierError, ExecutorOptions};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::debug;

use super::{
    CaseIncident, Comment, ExternalService, ExternalServiceComment, ExternalServiceIncident,
    GetIncidentParams, PushToServiceParams, normalize_date, push_to_service, str_field, to_data,
};
use crate::context::HttpContext;

pub const ACTION_TYPE_ID: &str = ".jira";

const API_PATH: &str = "rest/api/2";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct JiraConfig {
    pub api_url: String,
    pub project_key: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct JiraSecrets {
    pub email: String,
    pub api_token: SecretString,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct JiraIncident {
    pub summary: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub external_id: Option<String>,
    /// Issue type id.
    #[serde(default)]
    pub issue_type: Option<String>,
    /// Priority name.
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub labels: Option<Vec<String>>,
    /// Parent issue key, for sub-tasks.
    #[serde(default)]
    pub parent: Option<String>,
}

impl CaseIncident for JiraIncident {
    fn external_id(&self) -> Option<&str> {
        self.external_id.as_deref()
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IssuesParams {
    pub title: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IssueParams {
    pub id: String,
}

#[derive(Debug, Deserialize)]
#[serde(
    tag = "subAction",
    content = "subActionParams",
    rename_all = "camelCase",
    deny_unknown_fields
)]
pub enum JiraParams {
    PushToService(PushToServiceParams<JiraIncident>),
    GetIncident(GetIncidentParams),
    IssueTypes(Empty),
    Issues(IssuesParams),
    Issue(IssueParams),
    Handshake(Empty),
}

/// The `fields` object of a create or update request.
fn issue_fields(incident: &JiraIncident, project_key: Option<&str>) -> Value {
    let mut fields = Map::new();
    fields.insert("summary".into(), json!(incident.summary));
    if let Some(description) = &incident.description {
        fields.insert("description".into(), json!(description));
    }
    if let Some(key) = project_key {
        fields.insert("project".into(), json!({ "key": key }));
    }
    if let Some(issue_type) = &incident.issue_type {
        fields.insert("issuetype".into(), json!({ "id": issue_type }));
    }
    if let Some(priority) = &incident.priority {
        fields.insert("priority".into(), json!({ "name": priority }));
    }
    if let Some(labels) = &incident.labels {
        fields.insert("labels".into(), json!(labels));
    }
    if let Some(parent) = &incident.parent {
        fields.insert("parent".into(), json!({ "key": parent }));
    }
    json!({ "fields": fields })
}

/// `{ id, key, title }` summary of an issue resource.
fn issue_summary(issue: &Value) -> Value {
    json!({
        "id": str_field(issue, "id"),
        "key": str_field(issue, "key"),
        "title": issue.pointer("/fields/summary").cloned().unwrap_or(Value::Null),
    })
}

pub struct JiraService<'a> {
    ctx: &'a HttpContext,
    api_url: String,
    project_key: String,
    email: String,
    api_token: SecretString,
}

impl<'a> JiraService<'a> {
    pub fn new(ctx: &'a HttpContext, config: &JiraConfig, secrets: JiraSecrets) -> Self {
        Self {
            ctx,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            project_key: config.project_key.clone(),
            email: secrets.email,
            api_token: secrets.api_token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{API_PATH}/{path}", self.api_url)
    }

    fn browse_url(&self, key: &str) -> String {
        format!("{}/browse/{key}", self.api_url)
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.basic_auth(&self.email, Some(self.api_token.expose_secret()))
    }

    fn secrets(&self) -> Vec<String> {
        vec![self.api_token.expose_secret().to_string()]
    }

    async fn get(&self, url: impl reqwest::IntoUrl, context: &str) -> Result<Value, CourierError> {
        let request = self.authed(self.ctx.client().get(url));
        self.ctx.call_json(request, &self.secrets(), context).await
    }

    fn to_incident(&self, issue: &Value, date_pointer: &str) -> ExternalServiceIncident {
        let key = str_field(issue, "key");
        ExternalServiceIncident {
            id: str_field(issue, "id"),
            url: self.browse_url(&key),
            pushed_date: normalize_date(issue.pointer(date_pointer).unwrap_or(&Value::Null)),
            title: key,
        }
    }

    /// Issue types available for the configured project.
    pub async fn issue_types(&self) -> Result<Value, CourierError> {
        let mut url = url::Url::parse(&self.url("issue/createmeta"))
            .map_err(|e| CourierError::Config(format!("invalid jira apiUrl: {e}")))?;
        url.query_pairs_mut()
            .append_pair("projectKeys", &self.project_key)
            .append_pair("expand", "projects.issuetypes.fields");
        let meta = self
            .get(url, "[Action][Jira]: Unable to get issue types")
            .await?;
        let types = meta
            .pointer("/projects/0/issuetypes")
            .and_then(Value::as_array)
            .map(|types| {
                types
                    .iter()
                    .map(|t| json!({ "id": str_field(t, "id"), "name": str_field(t, "name") }))
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        Ok(Value::Array(types))
    }

    /// Issues in the project whose summary matches `title`.
    pub async fn issues(&self, title: &str) -> Result<Value, CourierError> {
        let mut url = url::Url::parse(&self.url("search"))
            .map_err(|e| CourierError::Config(format!("invalid jira apiUrl: {e}")))?;
        let escaped = title.replace('\\', "\\\\").replace('"', "\\\"");
        url.query_pairs_mut().append_pair(
            "jql",
            &format!("project=\"{}\" and summary ~\"{escaped}\"", self.project_key),
        );
        let found = self
            .get(url, &format!("[Action][Jira]: Unable to get issues with title {title}"))
            .await?;
        let issues = found
            .get("issues")
            .and_then(Value::as_array)
            .map(|issues| issues.iter().map(issue_summary).collect::<Vec<_>>())
            .unwrap_or_default();
        Ok(Value::Array(issues))
    }

    /// One issue's `{ id, key, title }`.
    pub async fn issue(&self, id: &str) -> Result<Value, CourierError> {
        let issue = self
            .get(
                self.url(&format!("issue/{id}")),
                &format!("[Action][Jira]: Unable to get issue with id {id}"),
            )
            .await?;
        Ok(issue_summary(&issue))
    }
}

#[async_trait]
impl ExternalService for JiraService<'_> {
    type Incident = JiraIncident;

    async fn get_incident(&self, id: &str) -> Result<Value, CourierError> {
        self.get(
            self.url(&format!("issue/{id}")),
            &format!("[Action][Jira]: Unable to get incident with id {id}"),
        )
        .await
    }

    async fn create_incident(
        &self,
        incident: &JiraIncident,
    ) -> Result<ExternalServiceIncident, CourierError> {
        let request = self
            .authed(self.ctx.client().post(self.url("issue")))
            .json(&issue_fields(incident, Some(&self.project_key)));
        let created = self
            .ctx
            .call_json(request, &self.secrets(), "[Action][Jira]: Unable to create incident")
            .await?;
        let id = str_field(&created, "id");
        debug!(issue_id = %id, "jira issue created");

        let issue = self.get_incident(&id).await?;
        Ok(self.to_incident(&issue, "/fields/created"))
    }

    async fn update_incident(
        &self,
        id: &str,
        incident: &JiraIncident,
    ) -> Result<ExternalServiceIncident, CourierError> {
        let request = self
            .authed(self.ctx.client().put(self.url(&format!("issue/{id}"))))
            .json(&issue_fields(incident, None));
        self.ctx
            .call_json(
                request,
                &self.secrets(),
                &format!("[Action][Jira]: Unable to update incident with id {id}"),
            )
            .await?;

        let issue = self.get_incident(id).await?;
        Ok(self.to_incident(&issue, "/fields/updated"))
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
                    .post(self.url(&format!("issue/{incident_id}/comment"))),
            )
            .json(&json!({ "body": comment.comment }));
        let created = self
            .ctx
            .call_json(
                request,
                &self.secrets(),
                &format!(
                    "[Action][Jira]: Unable to create comment at incident with id {incident_id}"
                ),
            )
            .await?;
        Ok(ExternalServiceComment {
            comment_id: comment.comment_id.clone(),
            pushed_date: normalize_date(created.get("created").unwrap_or(&Value::Null)),
        })
    }
}

pub struct JiraActionType {
    ctx: HttpContext,
}

impl JiraActionType {
    pub fn new(ctx: HttpContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl ActionType for JiraActionType {
    fn id(&self) -> &str {
        ACTION_TYPE_ID
    }

    fn name(&self) -> &str {
        "Jira"
    }

    fn validate_config(&self, config: &Value) -> Result<(), CourierError> {
        let config: JiraConfig = parse(SchemaKind::Config, config)?;
        self.ctx.utils().ensure_uri_allowed(&config.api_url).map_err(|e| {
            CourierError::validation(
                SchemaKind::Config,
                format!("error configuring connector action: {e}"),
            )
        })
    }

    fn validate_secrets(&self, secrets: &Value) -> Result<(), CourierError> {
        parse::<JiraSecrets>(SchemaKind::Secrets, secrets).map(|_| ())
    }

    fn validate_params(&self, params: &Value) -> Result<(), CourierError> {
        parse::<JiraParams>(SchemaKind::Params, params).map(|_| ())
    }

    async fn execute(
        &self,
        options: ExecutorOptions,
    ) -> Result<ActionTypeExecutorResult, CourierError> {
        let config: JiraConfig = parse(SchemaKind::Config, &options.config)?;
        let secrets: JiraSecrets = parse(SchemaKind::Secrets, &options.secrets)?;
        let params: JiraParams = parse(SchemaKind::Params, &options.params)?;
        let service = JiraService::new(&self.ctx, &config, secrets);

        let data = match params {
            JiraParams::PushToService(push) => to_data(&push_to_service(&service, push).await?)?,
            JiraParams::GetIncident(get) => service.get_incident(&get.external_id).await?,
            JiraParams::IssueTypes(_) => service.issue_types().await?,
            JiraParams::Issues(p) => service.issues(&p.title).await?,
            JiraParams::Issue(p) => service.issue(&p.id).await?,
            JiraParams::Handshake(_) => json!({}),
        };
        Ok(ActionTypeExecutorResult::ok_with_data(options.action_id, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_support::{allow_all, options};
    use wiremock::matchers::{basic_auth, body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(uri: &str) -> Value {
        json!({"apiUrl": uri, "projectKey": "CK"})
    }

    fn secrets() -> Value {
        json!({"email": "elastic@example.com", "apiToken": "jira-token"})
    }

    #[test]
    fn issue_fields_for_create_include_project() {
        let incident = JiraIncident {
            summary: "Login broken".into(),
            description: Some("500 on /login".into()),
            external_id: None,
            issue_type: Some("10006".into()),
            priority: Some("High".into()),
            labels: Some(vec!["sre".into()]),
            parent: None,
        };
        assert_eq!(
            issue_fields(&incident, Some("CK")),
            json!({"fields": {
                "summary": "Login broken",
                "description": "500 on /login",
                "project": {"key": "CK"},
                "issuetype": {"id": "10006"},
                "priority": {"name": "High"},
                "labels": ["sre"]
            }})
        );
        assert!(issue_fields(&incident, None)["fields"].get("project").is_none());
    }

    #[tokio::test]
    async fn creates_issue_and_comment() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/api/2/issue"))
            .and(basic_auth("elastic@example.com", "jira-token"))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({"id": "10267", "key": "CK-1"})),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/api/2/issue/10267"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "10267",
                "key": "CK-1",
                "fields": {"summary": "title", "created": "2026-05-01T12:00:00.000+0000"}
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/rest/api/2/issue/10267/comment"))
            .and(body_json(json!({"body": "a comment"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "c1",
                "created": "2026-05-01T12:01:00.000+0000"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let jira = JiraActionType::new(allow_all());
        let result = jira
            .execute(options(
                config(&server.uri()),
                secrets(),
                json!({
                    "subAction": "pushToService",
                    "subActionParams": {
                        "incident": {"summary": "title"},
                        "comments": [{"commentId": "case-comment-1", "comment": "a comment"}]
                    }
                }),
            ))
            .await
            .unwrap();

        let data = result.data.unwrap();
        assert_eq!(data["id"], "10267");
        assert_eq!(data["title"], "CK-1");
        assert_eq!(data["url"], format!("{}/browse/CK-1", server.uri()));
        assert_eq!(data["pushedDate"], "2026-05-01T12:00:00.000Z");
        assert_eq!(data["comments"][0]["commentId"], "case-comment-1");
        assert_eq!(data["comments"][0]["pushedDate"], "2026-05-01T12:01:00.000Z");
    }

    #[tokio::test]
    async fn updates_issue() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/rest/api/2/issue/CK-1"))
            .and(body_json(json!({"fields": {"summary": "new title"}})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/api/2/issue/CK-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "10267",
                "key": "CK-1",
                "fields": {"summary": "new title", "updated": "2026-05-02T08:00:00.000+0000"}
            })))
            .mount(&server)
            .await;

        let jira = JiraActionType::new(allow_all());
        let result = jira
            .execute(options(
                config(&server.uri()),
                secrets(),
                json!({
                    "subAction": "pushToService",
                    "subActionParams": {"incident": {"summary": "new title", "externalId": "CK-1"}}
                }),
            ))
            .await
            .unwrap();
        assert_eq!(result.data.unwrap()["pushedDate"], "2026-05-02T08:00:00.000Z");
    }

    #[tokio::test]
    async fn lists_issue_types_for_project() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/2/issue/createmeta"))
            .and(query_param("projectKeys", "CK"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "projects": [{"issuetypes": [
                    {"id": "10006", "name": "Task", "fields": {}},
                    {"id": "10007", "name": "Bug", "fields": {}}
                ]}]
            })))
            .mount(&server)
            .await;

        let jira = JiraActionType::new(allow_all());
        let result = jira
            .execute(options(
                config(&server.uri()),
                secrets(),
                json!({"subAction": "issueTypes", "subActionParams": {}}),
            ))
            .await
            .unwrap();
        assert_eq!(
            result.data.unwrap(),
            json!([{"id": "10006", "name": "Task"}, {"id": "10007", "name": "Bug"}])
        );
    }

    #[tokio::test]
    async fn searches_issues_by_title() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/2/search"))
            .and(query_param("jql", "project=\"CK\" and summary ~\"Test title\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "issues": [{"id": "10267", "key": "CK-1", "fields": {"summary": "Test title"}}]
            })))
            .mount(&server)
            .await;

        let jira = JiraActionType::new(allow_all());
        let result = jira
            .execute(options(
                config(&server.uri()),
                secrets(),
                json!({"subAction": "issues", "subActionParams": {"title": "Test title"}}),
            ))
            .await
            .unwrap();
        assert_eq!(
            result.data.unwrap(),
            json!([{"id": "10267", "key": "CK-1", "title": "Test title"}])
        );
    }
}
