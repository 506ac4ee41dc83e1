//! clist.by contest API integration
//!
//! ## API Reference
//!
//! Endpoint: https://clist.by/api/v4/contest
//! Returns: `{ "meta": {...}, "objects": [ {id, event, host, start, end, duration, href, ...}, ... ] }`
//!
//! The response is validated at the boundary: the envelope must be a JSON
//! object holding an `objects` array, otherwise the whole call fails. Each
//! element is then decoded on its own, so one malformed record cannot sink
//! the batch.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{map_reqwest_error, EventServiceError, RecordError};
use super::window::QueryWindow;
use crate::config::ClistConfig;

/// Largest slice of a rejected payload echoed into the log
const LOGGED_PAYLOAD_CHARS: usize = 2_000;

/// Contest id as sent by the API (number today, string in older dumps)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for RawId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawId::Number(n) => write!(f, "{}", n),
            RawId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// One contest as returned by the API
///
/// Everything is optional here; required-field checks happen in the normalizer
/// so that a missing field drops the record instead of failing decoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawContestRecord {
    pub id: Option<RawId>,
    /// Contest title (clist's field name)
    pub event: Option<String>,
    /// Title fallbacks seen from other feeds
    pub name: Option<String>,
    pub title: Option<String>,
    pub contest_name: Option<String>,
    pub host: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    /// Seconds
    pub duration: Option<f64>,
    pub href: Option<String>,
    pub url: Option<String>,
    pub resource: Option<Value>,
}

impl RawContestRecord {
    pub fn from_value(value: Value) -> Result<Self, RecordError> {
        serde_json::from_value(value).map_err(|e| RecordError::Malformed(e.to_string()))
    }

    /// First non-empty title field
    pub fn title(&self) -> Option<&str> {
        [&self.event, &self.name, &self.title, &self.contest_name]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .find(|s| !s.trim().is_empty())
    }

    /// First non-empty link field
    pub fn link(&self) -> Option<&str> {
        [&self.href, &self.url]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .find(|s| !s.trim().is_empty())
    }
}

/// Validated response envelope
#[derive(Debug, Clone, Default)]
pub struct ContestListResponse {
    pub objects: Vec<Value>,
}

impl ContestListResponse {
    /// Parse-or-reject the raw response body
    pub fn parse(body: &str) -> Result<Self, EventServiceError> {
        let value: Value = serde_json::from_str(body).map_err(|e| {
            log::error!("Contest API returned non-JSON body: {}", truncate(body));
            EventServiceError::InvalidResponse(format!("body is not JSON: {}", e))
        })?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, EventServiceError> {
        // Inspect before taking the value apart so the full payload gets logged
        let rejection = match value.get("objects") {
            Some(Value::Array(_)) => None,
            Some(other) => Some(format!("expected objects array, found {}", json_kind(other))),
            None if value.is_object() => Some("expected objects array, found nothing".to_string()),
            None => Some(format!("response body is {}, not an object", json_kind(&value))),
        };
        if let Some(reason) = rejection {
            log::error!(
                "Unexpected API response format ({}): {}",
                reason,
                truncate(&value.to_string())
            );
            return Err(EventServiceError::InvalidResponse(reason));
        }

        let objects = match value {
            Value::Object(mut map) => map.remove("objects"),
            _ => None,
        };
        match objects {
            Some(Value::Array(objects)) => Ok(Self { objects }),
            _ => Err(EventServiceError::InvalidResponse(
                "expected objects array not found".to_string(),
            )),
        }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn truncate(s: &str) -> String {
    s.chars().take(LOGGED_PAYLOAD_CHARS).collect()
}

/// Anything that can produce a contest listing for a window
#[async_trait]
pub trait ContestSource: Send + Sync {
    async fn fetch_contests(
        &self,
        window: &QueryWindow,
    ) -> Result<ContestListResponse, EventServiceError>;
}

/// HTTP client for the clist.by contest endpoint
#[derive(Debug, Clone)]
pub struct ClistClient {
    http: Client,
    base_url: String,
    username: String,
    api_key: String,
    limit: u32,
}

impl ClistClient {
    pub fn new(config: &ClistConfig) -> Result<Self, EventServiceError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .user_agent(concat!("contestflow/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| EventServiceError::ClientSetup(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            username: config.username.clone(),
            api_key: config.api_key.clone(),
            limit: config.limit,
        })
    }

    /// Query parameters without credentials
    pub fn query_params(&self, window: &QueryWindow) -> Vec<(&'static str, String)> {
        vec![
            ("order_by", "start".to_string()),
            ("limit", self.limit.to_string()),
            ("format", "json".to_string()),
            ("start__gt", window.start_param()),
            ("end__lt", window.end_param()),
            ("with_problems", "false".to_string()),
            ("with_extra", "true".to_string()),
        ]
    }
}

#[async_trait]
impl ContestSource for ClistClient {
    async fn fetch_contests(
        &self,
        window: &QueryWindow,
    ) -> Result<ContestListResponse, EventServiceError> {
        let params = self.query_params(window);
        log::debug!(
            "GET {} start__gt={} end__lt={}",
            self.base_url,
            window.start_param(),
            window.end_param()
        );

        let res = self
            .http
            .get(&self.base_url)
            .query(&[("username", &self.username), ("api_key", &self.api_key)])
            .query(&params)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = res.status();
        log::debug!("Contest API response status: {}", status);

        if status != StatusCode::OK {
            // The status already decides the outcome; a failed body read only loses detail
            let body = truncate(&res.text().await.unwrap_or_default());
            log::error!("Unexpected status code {}: {}", status, body);
            return Err(EventServiceError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body = res.text().await.map_err(map_reqwest_error)?;

        let response = ContestListResponse::parse(&body)?;
        log::info!("Found {} events", response.len());
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn test_parse_envelope() {
        let body = r#"{"meta": {"total_count": 2}, "objects": [{"id": 1}, {"id": 2}]}"#;
        let response = ContestListResponse::parse(body).unwrap();
        assert_eq!(response.len(), 2);

        let empty = ContestListResponse::parse(r#"{"objects": []}"#).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        for body in [
            "not json",
            r#"[{"id": 1}]"#,
            r#"{"meta": {}}"#,
            r#"{"objects": {"id": 1}}"#,
            "null",
        ] {
            let err = ContestListResponse::parse(body).unwrap_err();
            assert!(err.is_format(), "{} should be a format error", body);
        }
    }

    #[test]
    fn test_rejection_names_offending_objects_field() {
        let err = ContestListResponse::parse(r#"{"objects": {"id": 1}}"#).unwrap_err();
        assert!(err.to_string().contains("found an object"), "{}", err);

        let err = ContestListResponse::parse(r#"{"meta": {}}"#).unwrap_err();
        assert!(err.to_string().contains("found nothing"), "{}", err);

        let err = ContestListResponse::parse(r#"[1, 2]"#).unwrap_err();
        assert!(err.to_string().contains("an array, not an object"), "{}", err);
    }

    #[test]
    fn test_truncate_caps_logged_payload() {
        let long = "x".repeat(LOGGED_PAYLOAD_CHARS * 2);
        assert_eq!(truncate(&long).chars().count(), LOGGED_PAYLOAD_CHARS);
        assert_eq!(truncate("short"), "short");
    }

    #[test]
    fn test_record_decoding() {
        let record = RawContestRecord::from_value(json!({
            "id": 42,
            "event": "Div 2 Round",
            "host": "codeforces.com",
            "start": "2024-06-01T10:00:00",
            "end": "2024-06-01T12:00:00",
            "duration": 7200,
            "href": "https://codeforces.com/contest/42",
            "resource": "codeforces.com",
            "n_problems": 6
        }))
        .unwrap();

        assert_eq!(record.id, Some(RawId::Number(42)));
        assert_eq!(record.title(), Some("Div 2 Round"));
        assert_eq!(record.duration, Some(7200.0));
        assert_eq!(record.link(), Some("https://codeforces.com/contest/42"));

        let string_id = RawContestRecord::from_value(json!({"id": "abc"})).unwrap();
        assert_eq!(string_id.id.unwrap().to_string(), "abc");

        assert!(RawContestRecord::from_value(json!({"id": [1, 2]})).is_err());
        assert!(RawContestRecord::from_value(json!("just a string")).is_err());
    }

    #[test]
    fn test_title_and_link_fallbacks() {
        let record = RawContestRecord {
            event: Some("  ".into()),
            contest_name: Some("Weekly 400".into()),
            url: Some("https://leetcode.com/contest/weekly-contest-400".into()),
            ..Default::default()
        };
        assert_eq!(record.title(), Some("Weekly 400"));
        assert_eq!(
            record.link(),
            Some("https://leetcode.com/contest/weekly-contest-400")
        );
        assert_eq!(RawContestRecord::default().title(), None);
    }

    #[test]
    fn test_query_params() {
        let client = ClistClient::new(&ClistConfig::new("alice", "secret")).unwrap();
        let window = QueryWindow::around(Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap());
        let params = client.query_params(&window);

        let get = |key: &str| {
            params
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("order_by"), Some("start"));
        assert_eq!(get("limit"), Some("1000"));
        assert_eq!(get("format"), Some("json"));
        assert_eq!(get("start__gt"), Some("2024-05-15T00:00:00"));
        assert_eq!(get("end__lt"), Some("2025-06-15T00:00:00"));
        assert_eq!(get("with_problems"), Some("false"));
        assert_eq!(get("with_extra"), Some("true"));
        // Credentials are attached separately and never part of the loggable set
        assert_eq!(get("api_key"), None);
    }
}
