// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! ITSM "cases" connectors: ServiceNow, Jira and IBM Resilient.
//!
//! All three share the push-to-service flow:
//!
//! 1. when `incident.externalId` is set the remote record is updated,
//!    otherwise it is created;
//! 2. each non-empty comment is pushed to the record in order;
//! 3. the result reports the remote id, title, url and push timestamps.
//!
//! Vendor specifics live behind [`ExternalService`].

pub mod jira;
pub mod resilient;
pub mod servicenow;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use courier_core::CourierError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// A comment to attach to the remote incident.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Comment {
    pub comment_id: String,
    pub comment: String,
}

/// Params of the `pushToService` sub-action.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PushToServiceParams<I> {
    pub incident: I,
    #[serde(default)]
    pub comments: Option<Vec<Comment>>,
}

/// Params of the `getIncident` sub-action.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct GetIncidentParams {
    pub external_id: String,
}

/// Incident fields that know which remote record, if any, they update.
pub trait CaseIncident {
    fn external_id(&self) -> Option<&str>;
}

/// A remote incident as reported after create or update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalServiceIncident {
    pub id: String,
    pub title: String,
    pub url: String,
    pub pushed_date: String,
}

/// A pushed comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalServiceComment {
    pub comment_id: String,
    pub pushed_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PushToServiceResponse {
    #[serde(flatten)]
    pub incident: ExternalServiceIncident,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<ExternalServiceComment>>,
}

/// Vendor REST operations used by the push-to-service flow.
#[async_trait]
pub trait ExternalService: Send + Sync {
    type Incident: CaseIncident + Send + Sync;

    async fn get_incident(&self, id: &str) -> Result<Value, CourierError>;

    async fn create_incident(
        &self,
        incident: &Self::Incident,
    ) -> Result<ExternalServiceIncident, CourierError>;

    async fn update_incident(
        &self,
        id: &str,
        incident: &Self::Incident,
    ) -> Result<ExternalServiceIncident, CourierError>;

    async fn create_comment(
        &self,
        incident_id: &str,
        comment: &Comment,
    ) -> Result<ExternalServiceComment, CourierError>;
}

/// Create or update the remote incident, then push its comments.
pub async fn push_to_service<S: ExternalService>(
    service: &S,
    params: PushToServiceParams<S::Incident>,
) -> Result<PushToServiceResponse, CourierError> {
    let incident = match params.incident.external_id() {
        Some(id) => {
            debug!(external_id = %id, "updating remote incident");
            service.update_incident(id, &params.incident).await?
        }
        None => {
            debug!("creating remote incident");
            service.create_incident(&params.incident).await?
        }
    };

    let mut pushed = Vec::new();
    for comment in params.comments.unwrap_or_default() {
        if comment.comment.trim().is_empty() {
            continue;
        }
        pushed.push(service.create_comment(&incident.id, &comment).await?);
    }

    Ok(PushToServiceResponse {
        incident,
        comments: if pushed.is_empty() { None } else { Some(pushed) },
    })
}

/// Serialize a push response as executor result data.
pub fn to_data<T: Serialize>(value: &T) -> Result<Value, CourierError> {
    serde_json::to_value(value)
        .map_err(|e| CourierError::Internal(format!("failed to serialize response: {e}")))
}

/// Normalize a vendor timestamp to RFC 3339 UTC with milliseconds.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` (UTC) and epoch milliseconds.
/// Anything else is returned unchanged.
pub fn normalize_date(raw: &Value) -> String {
    let format = |dt: DateTime<Utc>| dt.to_rfc3339_opts(SecondsFormat::Millis, true);
    match raw {
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(format)
            .unwrap_or_else(|| n.to_string()),
        Value::String(s) => {
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return format(dt.with_timezone(&Utc));
            }
            // Jira: 2026-03-01T10:00:00.000+0000
            if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z") {
                return format(dt.with_timezone(&Utc));
            }
            match NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
                Ok(naive) => format(naive.and_utc()),
                Err(_) => s.clone(),
            }
        }
        Value::Null => format(Utc::now()),
        other => other.to_string(),
    }
}

/// Read a string field, accepting numbers as well.
pub fn str_field(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::sync::Mutex;

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct TestIncident {
        title: String,
        #[serde(default)]
        external_id: Option<String>,
    }

    impl CaseIncident for TestIncident {
        fn external_id(&self) -> Option<&str> {
            self.external_id.as_deref()
        }
    }

    #[derive(Default)]
    struct RecordingService {
        calls: Mutex<Vec<String>>,
    }

    fn incident(id: &str, title: &str) -> ExternalServiceIncident {
        ExternalServiceIncident {
            id: id.into(),
            title: title.into(),
            url: format!("https://itsm.test/{id}"),
            pushed_date: "2026-01-01T00:00:00.000Z".into(),
        }
    }

    #[async_trait]
    impl ExternalService for RecordingService {
        type Incident = TestIncident;

        async fn get_incident(&self, id: &str) -> Result<Value, CourierError> {
            Ok(json!({"id": id}))
        }

        async fn create_incident(
            &self,
            incident_fields: &TestIncident,
        ) -> Result<ExternalServiceIncident, CourierError> {
            self.calls.lock().await.push(format!("create {}", incident_fields.title));
            Ok(incident("new-1", &incident_fields.title))
        }

        async fn update_incident(
            &self,
            id: &str,
            incident_fields: &TestIncident,
        ) -> Result<ExternalServiceIncident, CourierError> {
            self.calls.lock().await.push(format!("update {id}"));
            Ok(incident(id, &incident_fields.title))
        }

        async fn create_comment(
            &self,
            incident_id: &str,
            comment: &Comment,
        ) -> Result<ExternalServiceComment, CourierError> {
            self.calls
                .lock()
                .await
                .push(format!("comment {incident_id} {}", comment.comment_id));
            Ok(ExternalServiceComment {
                comment_id: comment.comment_id.clone(),
                pushed_date: "2026-01-01T00:00:01.000Z".into(),
            })
        }
    }

    fn params(value: Value) -> PushToServiceParams<TestIncident> {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn creates_when_no_external_id() {
        let service = RecordingService::default();
        let response = push_to_service(
            &service,
            params(json!({
                "incident": {"title": "Disk full"},
                "comments": [
                    {"commentId": "c1", "comment": "first"},
                    {"commentId": "c2", "comment": "  "},
                    {"commentId": "c3", "comment": "third"}
                ]
            })),
        )
        .await
        .unwrap();

        assert_eq!(response.incident.id, "new-1");
        assert_eq!(
            *service.calls.lock().await,
            vec!["create Disk full", "comment new-1 c1", "comment new-1 c3"]
        );
        let data = to_data(&response).unwrap();
        assert_eq!(data["id"], "new-1");
        assert_eq!(data["comments"][1]["commentId"], "c3");
    }

    #[tokio::test]
    async fn updates_when_external_id_is_set() {
        let service = RecordingService::default();
        let response = push_to_service(
            &service,
            params(json!({"incident": {"title": "Disk full", "externalId": "INC-7"}})),
        )
        .await
        .unwrap();
        assert_eq!(*service.calls.lock().await, vec!["update INC-7"]);
        let data = to_data(&response).unwrap();
        assert!(data.get("comments").is_none());
        assert_eq!(data["url"], "https://itsm.test/INC-7");
    }

    #[test]
    fn dates_are_normalized() {
        assert_eq!(
            normalize_date(&json!("2020-03-10 12:24:20")),
            "2020-03-10T12:24:20.000Z"
        );
        assert_eq!(
            normalize_date(&json!("2020-04-27T10:59:46.202Z")),
            "2020-04-27T10:59:46.202Z"
        );
        assert_eq!(
            normalize_date(&json!("2020-04-27T12:59:46.202+0200")),
            "2020-04-27T10:59:46.202Z"
        );
        assert_eq!(normalize_date(&json!(1589391874472_i64)), "2020-05-13T17:44:34.472Z");
        assert_eq!(normalize_date(&json!("yesterday")), "yesterday");
    }
}
