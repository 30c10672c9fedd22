mod auth;
mod error;
mod notifications;
mod subscriptions;
mod user;

pub use error::{ApiError, ApiErrorKind, ApiResult, ContactField};

use crate::config::EnvConfig;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Whether a request carries the bearer token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Access {
    Public,
    Bearer,
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    pub(crate) base_url: String,
    pub(crate) token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn from_config(config: &EnvConfig) -> Self {
        Self::new(config.api_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub(crate) fn get_auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {t}"))
    }

    fn with_auth_headers(
        mut req: reqwest::RequestBuilder,
        header: Option<String>,
    ) -> reqwest::RequestBuilder {
        if let Some(header) = header {
            req = req.header("Authorization", header);
        }
        req
    }

    async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        access: Access,
    ) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let client = reqwest::Client::new();
        let url = format!("{}{}", self.base_url, path);
        let mut req = client
            .request(method.clone(), url)
            .header(CONTENT_TYPE, "application/json");

        if access == Access::Bearer {
            req = Self::with_auth_headers(req, self.get_auth_header());
        }

        if let Some(b) = body {
            if method != Method::GET {
                req = req.json(b);
            }
        }

        let result = Self::execute(req).await.and_then(|value| {
            serde_json::from_value::<T>(value).map_err(ApiError::parse)
        });

        if let Err(e) = &result {
            tracing::warn!(%method, path, status = ?e.status, error = %e, "API request failed");
        }
        result
    }

    async fn execute(req: reqwest::RequestBuilder) -> ApiResult<Value> {
        let res = req.send().await.map_err(ApiError::network)?;

        let status = res.status().as_u16();
        let content_type = res
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        let text = res.text().await.map_err(ApiError::network)?;

        decode_response(status, content_type.as_deref(), &text)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str, access: Access) -> ApiResult<T> {
        self.request::<T, ()>(Method::GET, path, None, access).await
    }

    pub(crate) async fn post<T, B>(&self, path: &str, body: Option<&B>, access: Access) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, body, access).await
    }

    pub(crate) async fn put<T, B>(&self, path: &str, body: Option<&B>, access: Access) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, path, body, access).await
    }

    pub(crate) async fn patch<T, B>(&self, path: &str, body: &B, access: Access) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PATCH, path, Some(body), access).await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str, access: Access) -> ApiResult<T> {
        self.request::<T, ()>(Method::DELETE, path, None, access).await
    }
}

/// Encodes an id for use as a single path segment.
pub(crate) fn segment(id: &str) -> String {
    urlencoding::encode(id.trim()).into_owned()
}

pub(crate) fn require_id(id: &str, what: &str) -> ApiResult<String> {
    if id.trim().is_empty() {
        return Err(ApiError::invalid_input(&format!("{what} is required")));
    }
    Ok(segment(id))
}

/// Turns a raw response into a JSON value.
///
/// - non-2xx: JSON bodies are kept as-is, anything else becomes `{"error": text}`
/// - 204 and empty JSON bodies: `null`
/// - non-JSON 2xx bodies: a JSON string
pub(crate) fn decode_response(status: u16, content_type: Option<&str>, body: &str) -> ApiResult<Value> {
    let is_json = content_type
        .map(|ct| ct.contains("application/json"))
        .unwrap_or(false);

    if !(200..300).contains(&status) {
        let data = if is_json {
            serde_json::from_str(body).unwrap_or_else(|_| serde_json::json!({ "error": body }))
        } else {
            serde_json::json!({ "error": body })
        };
        return Err(ApiError::from_response(status, data));
    }

    if status == 204 || (is_json && body.trim().is_empty()) {
        return Ok(Value::Null);
    }

    if is_json {
        serde_json::from_str(body).map_err(ApiError::parse)
    } else {
        Ok(Value::String(body.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const JSON: Option<&str> = Some("application/json; charset=utf-8");

    #[test]
    fn test_api_client_new_trims_trailing_slash() {
        let client = ApiClient::new("http://localhost:8080/api/");
        assert_eq!(client.base_url(), "http://localhost:8080/api");
        assert!(client.token().is_none());
    }

    #[test]
    fn test_api_client_get_auth_header() {
        let mut client = ApiClient::new("http://localhost:8080/api");
        assert!(client.get_auth_header().is_none());

        client.set_token(Some("my-jwt-token".to_string()));
        assert_eq!(
            client.get_auth_header().as_deref(),
            Some("Bearer my-jwt-token")
        );
    }

    #[test]
    fn test_decode_success_json_and_text() {
        assert_eq!(
            decode_response(200, JSON, r#"{"count": 2}"#).unwrap(),
            json!({"count": 2})
        );
        assert_eq!(
            decode_response(200, Some("text/plain"), "ok").unwrap(),
            json!("ok")
        );
        assert_eq!(decode_response(200, None, "").unwrap(), json!(""));
    }

    #[test]
    fn test_decode_no_content_is_empty_success() {
        assert_eq!(decode_response(204, None, "").unwrap(), Value::Null);
        assert_eq!(decode_response(204, JSON, "").unwrap(), Value::Null);
        assert_eq!(decode_response(200, JSON, "  ").unwrap(), Value::Null);
    }

    #[test]
    fn test_decode_error_json_body() {
        let err = decode_response(401, JSON, r#"{"error":"Invalid credentials"}"#).unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Unauthorized);
        assert_eq!(err.status, Some(401));
        assert_eq!(err.message, "Invalid credentials");
        assert_eq!(err.data, Some(json!({"error": "Invalid credentials"})));
    }

    #[test]
    fn test_decode_error_text_body_is_wrapped() {
        let err = decode_response(500, Some("text/html"), "Bad gateway").unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Server);
        assert_eq!(err.data, Some(json!({"error": "Bad gateway"})));
        assert_eq!(err.server_message(), Some("Bad gateway"));
    }

    #[test]
    fn test_decode_malformed_success_json_is_parse_error() {
        let err = decode_response(200, JSON, "{not json").unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Parse);
    }

    #[test]
    fn test_require_id_rejects_blank_and_encodes() {
        let err = require_id("  ", "User ID").unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::InvalidInput);
        assert_eq!(err.message, "User ID is required");
        assert_eq!(require_id("a b/c", "User ID").unwrap(), "a%20b%2Fc");
    }
}
