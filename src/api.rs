// src/api.rs

//! JSON request/response contract for whatever server fronts the engine.
//!
//! The adapter is transport-agnostic: a server hands over the method and the
//! raw body and writes back the returned status, headers and body.

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, warn};

use crate::config::AnalyzerConfig;
use crate::core::error::AnalysisError;
use crate::core::scanner::analyze_url;

pub const CORS_HEADERS: [(&str, &str); 2] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Headers", "authorization, x-client-info, apikey, content-type"),
];

/// The analysis request: `{ "url": "..." }`.
#[derive(Debug, Deserialize)]
pub struct AnalysisRequest {
    #[serde(default)]
    pub url: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl ApiResponse {
    fn with_cors(status: u16, body: String, json: bool) -> Self {
        let mut headers: Vec<(String, String)> = CORS_HEADERS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        if json {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }
        Self { status, headers, body }
    }

    fn json(status: u16, value: &Value) -> Self {
        Self::with_cors(status, value.to_string(), true)
    }

    fn error(err: &AnalysisError) -> Self {
        Self::json(err.status_code(), &json!({ "error": err.to_string() }))
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Extracts the URL string from a request body.
fn parse_request(body: &str) -> Result<String, AnalysisError> {
    let request: AnalysisRequest =
        serde_json::from_str(body).map_err(|e| AnalysisError::MalformedRequest(e.to_string()))?;
    match request.url {
        Some(Value::String(url)) if !url.trim().is_empty() => Ok(url),
        _ => Err(AnalysisError::MissingUrl),
    }
}

/// Answers one request.
///
/// `OPTIONS` gets an empty pre-flight answer. Anything else must carry a JSON
/// body with a `url`; the reply is the report (200) or `{ "error": ... }`
/// with 400 for a missing URL and 500 for every other failure.
pub async fn handle_request(method: &str, body: &str, config: &AnalyzerConfig) -> ApiResponse {
    if method.eq_ignore_ascii_case("OPTIONS") {
        return ApiResponse::with_cors(200, String::new(), false);
    }

    let url = match parse_request(body) {
        Ok(url) => url,
        Err(e) => {
            warn!(error = %e, "Rejecting analysis request.");
            return ApiResponse::error(&e);
        }
    };

    let report = match analyze_url(&url, config).await {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "Analysis error.");
            return ApiResponse::error(&e);
        }
    };

    match serde_json::to_value(&report) {
        Ok(value) => ApiResponse::json(200, &value),
        Err(e) => {
            let err = AnalysisError::Unexpected(e.to_string());
            error!(error = %err, "Failed to serialize report.");
            ApiResponse::error(&err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_json(response: &ApiResponse) -> Value {
        serde_json::from_str(&response.body).unwrap()
    }

    fn has_cors(response: &ApiResponse) -> bool {
        CORS_HEADERS
            .iter()
            .all(|(k, v)| response.headers.iter().any(|(hk, hv)| hk == k && hv == v))
    }

    #[tokio::test]
    async fn preflight_is_empty_with_cors() {
        let response = handle_request("OPTIONS", "", &AnalyzerConfig::default()).await;
        assert_eq!(response.status, 200);
        assert!(response.body.is_empty());
        assert!(has_cors(&response));
    }

    #[tokio::test]
    async fn missing_url_is_400() {
        for body in [r#"{}"#, r#"{"url": ""}"#, r#"{"url": "   "}"#, r#"{"url": null}"#, r#"{"url": 42}"#] {
            let response = handle_request("POST", body, &AnalyzerConfig::default()).await;
            assert_eq!(response.status, 400, "body: {body}");
            assert_eq!(body_json(&response), json!({ "error": "URL is required" }));
            assert!(has_cors(&response));
        }
    }

    #[tokio::test]
    async fn malformed_json_is_500() {
        let response = handle_request("POST", "not json", &AnalyzerConfig::default()).await;
        assert_eq!(response.status, 500);
        let error = body_json(&response)["error"].as_str().unwrap().to_string();
        assert!(error.starts_with("Malformed request body"), "{error}");
    }

    #[tokio::test]
    async fn unusable_url_is_500() {
        let response = handle_request("POST", r#"{"url": "https://"}"#, &AnalyzerConfig::default()).await;
        assert_eq!(response.status, 500);
        assert_eq!(body_json(&response)["error"], "Invalid URL: https://");
    }
}
