//! Request executor with auth, response normalization and error mapping.

use crate::auth::AuthProvider;
use crate::config::SharePointConfig;
use crate::errors::{
    AuthenticationError, AuthorizationError, NetworkError, QuotaError, RequestError,
    ResourceError, ServerError, SharePointError, SharePointResult,
};
use crate::transport::{
    BodyStream, HttpMethod, HttpRequest, HttpResponse, HttpTransport, RequestBody,
    StreamingResponse,
};
use crate::types::{select_clause, validate_many, validate_one, DerivationPolicy, Shape, SharePointResponse};
use bytes::Bytes;
use mime::Mime;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Accept header for JSON responses.
pub const ACCEPT_JSON: &str = "application/json";

/// Accept header that strips OData annotations from list item fields.
pub const ACCEPT_JSON_NO_METADATA: &str = "application/json;odata.metadata=none";

/// A request relative to the Graph base URL.
#[derive(Debug)]
pub struct ApiRequest {
    method: HttpMethod,
    path: String,
    query: Vec<(String, String)>,
    body: Option<RequestBody>,
    content_type: Option<Mime>,
    accept: &'static str,
}

impl ApiRequest {
    /// Creates a request for `path`, which must already be percent-encoded.
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            content_type: None,
            accept: ACCEPT_JSON,
        }
    }

    /// GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// POST request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    /// PUT request.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    /// PATCH request.
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, path)
    }

    /// DELETE request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Appends a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Restricts the response to the fields a shape reads.
    pub fn select<S: Shape>(self) -> Self {
        self.query("$select", select_clause::<S>())
    }

    /// Sets a JSON body.
    pub fn json<T: Serialize>(mut self, body: &T) -> SharePointResult<Self> {
        let bytes = serde_json::to_vec(body).map_err(|e| {
            SharePointError::Request(RequestError::ValidationError(format!(
                "Failed to serialize request body: {}",
                e
            )))
        })?;
        self.body = Some(RequestBody::Bytes(Bytes::from(bytes)));
        self.content_type = Some(mime::APPLICATION_JSON);
        Ok(self)
    }

    /// Sets a binary body.
    pub fn bytes(mut self, data: Bytes) -> Self {
        self.body = Some(RequestBody::Bytes(data));
        self.content_type = Some(mime::APPLICATION_OCTET_STREAM);
        self
    }

    /// Sets a streamed binary body.
    pub fn stream(mut self, data: BodyStream) -> Self {
        self.body = Some(RequestBody::Stream(data));
        self.content_type = Some(mime::APPLICATION_OCTET_STREAM);
        self
    }

    /// Overrides the Accept header.
    pub fn accept(mut self, accept: &'static str) -> Self {
        self.accept = accept;
        self
    }
}

/// Request executor that adds authentication, sends requests through the
/// transport and normalizes responses into envelopes.
pub struct RequestExecutor {
    config: SharePointConfig,
    transport: Arc<dyn HttpTransport>,
    auth: Arc<dyn AuthProvider>,
}

impl RequestExecutor {
    /// Creates a new request executor.
    pub fn new(
        config: SharePointConfig,
        transport: Arc<dyn HttpTransport>,
        auth: Arc<dyn AuthProvider>,
    ) -> Self {
        Self {
            config,
            transport,
            auth,
        }
    }

    /// Configured SharePoint host name.
    pub fn sp_domain(&self) -> &str {
        &self.config.sp_domain
    }

    /// Derivation policy applied to every response.
    pub fn policy(&self) -> DerivationPolicy {
        self.config.derivation_policy
    }

    /// Builds a full URL from a path and query parameters.
    ///
    /// The path is appended to the base URL verbatim, so `:` path
    /// addressing and existing percent-escapes survive.
    pub fn build_url(&self, path: &str, query: &[(String, String)]) -> SharePointResult<Url> {
        let base = self.config.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');

        let mut url = Url::parse(&format!("{}/{}", base, path)).map_err(|e| {
            SharePointError::Request(RequestError::InvalidParameter(format!(
                "Invalid URL for {}: {}",
                path, e
            )))
        })?;

        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    async fn prepare(&self, request: ApiRequest) -> SharePointResult<HttpRequest> {
        let url = self.build_url(&request.path, &request.query)?;

        let token = self
            .auth
            .get_access_token()
            .await
            .map_err(SharePointError::Authentication)?;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token.token.expose_secret())).map_err(
                |_| {
                    SharePointError::Authentication(AuthenticationError::InvalidToken(
                        "Token contains characters not allowed in a header".to_string(),
                    ))
                },
            )?,
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&self.config.user_agent).map_err(|e| {
                SharePointError::Request(RequestError::ValidationError(format!(
                    "Invalid user agent: {}",
                    e
                )))
            })?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static(request.accept));
        if let Some(content_type) = &request.content_type {
            let value = HeaderValue::from_str(content_type.as_ref()).map_err(|e| {
                SharePointError::Request(RequestError::ValidationError(format!(
                    "Invalid content type: {}",
                    e
                )))
            })?;
            headers.insert(CONTENT_TYPE, value);
        }

        debug!(method = ?request.method, url = %url, "Sending request");

        Ok(HttpRequest {
            method: request.method,
            url,
            headers,
            body: request.body,
            timeout: Some(self.config.timeout),
        })
    }

    /// Sends a request and buffers the response, whatever its status.
    pub async fn execute(&self, request: ApiRequest) -> SharePointResult<HttpResponse> {
        let http_request = self.prepare(request).await?;
        let response = self.transport.send(http_request).await?;
        debug!(status = response.status.as_u16(), "HTTP status code");
        Ok(response)
    }

    /// Sends a request and returns the body unread.
    pub async fn execute_streaming(&self, request: ApiRequest) -> SharePointResult<StreamingResponse> {
        let http_request = self.prepare(request).await?;
        let response = self.transport.send_streaming(http_request).await?;
        debug!(status = response.status.as_u16(), "HTTP status code");
        Ok(response)
    }

    /// Normalizes a single-object response into shape `S`.
    ///
    /// Content is only parsed when the status is one of `ok`.
    pub fn shape<S: Shape>(
        &self,
        response: HttpResponse,
        ok: &[StatusCode],
    ) -> SharePointResult<SharePointResponse<S>> {
        let content = if ok.contains(&response.status) {
            let raw = parse_json(&response.body)?;
            Some(validate_one::<S>(&raw, self.policy())?)
        } else {
            None
        };
        Ok(SharePointResponse::new(
            response.status,
            response.headers,
            response.body,
            content,
        ))
    }

    /// Normalizes a `{"value": [...]}` collection into shape `S`.
    pub fn shape_list<S: Shape>(
        &self,
        response: HttpResponse,
        ok: &[StatusCode],
    ) -> SharePointResult<SharePointResponse<Vec<S>>> {
        let content = if ok.contains(&response.status) {
            let raw = parse_json(&response.body)?;
            Some(validate_many::<S>(collection(&raw)?, self.policy())?)
        } else {
            None
        };
        Ok(SharePointResponse::new(
            response.status,
            response.headers,
            response.body,
            content,
        ))
    }

    /// Envelope for operations whose success carries no content.
    pub fn unit(&self, response: HttpResponse, ok: &[StatusCode]) -> SharePointResponse<()> {
        let content = ok.contains(&response.status).then_some(());
        SharePointResponse::new(response.status, response.headers, response.body, content)
    }
}

pub(crate) fn parse_json(body: &Bytes) -> SharePointResult<Value> {
    serde_json::from_slice(body).map_err(|e| {
        SharePointError::deserialization(format!("Failed to deserialize response: {}", e))
    })
}

pub(crate) fn collection(raw: &Value) -> SharePointResult<&[Value]> {
    raw.get("value")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| SharePointError::unexpected_format("Expected a `value` array in response"))
}

/// Maps a failure status and Graph error body to a domain error.
pub(crate) fn error_from_response(
    status: StatusCode,
    headers: &HeaderMap,
    body: &[u8],
) -> SharePointError {
    #[derive(serde::Deserialize)]
    struct ErrorResponse {
        error: ErrorDetail,
    }

    #[derive(serde::Deserialize)]
    struct ErrorDetail {
        #[serde(default)]
        code: Option<String>,
        #[serde(default)]
        message: Option<String>,
    }

    let detail = serde_json::from_slice::<ErrorResponse>(body).ok().map(|e| e.error);
    let code = detail.as_ref().and_then(|d| d.code.clone()).unwrap_or_default();
    let message = detail
        .and_then(|d| d.message)
        .unwrap_or_else(|| format!("HTTP {}: {}", status.as_u16(), String::from_utf8_lossy(body)));

    let retry_after = headers
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs);

    match status {
        StatusCode::BAD_REQUEST => match code.as_str() {
            "invalidRequest" => SharePointError::Request(RequestError::InvalidParameter(message)),
            _ => SharePointError::Request(RequestError::ValidationError(message)),
        },
        StatusCode::UNAUTHORIZED => {
            SharePointError::Authentication(AuthenticationError::InvalidToken(message))
        }
        StatusCode::FORBIDDEN => match code.as_str() {
            "accessDenied" => SharePointError::Authorization(AuthorizationError::AccessDenied(message)),
            _ => SharePointError::Authorization(AuthorizationError::Forbidden(message)),
        },
        StatusCode::NOT_FOUND => SharePointError::Resource(ResourceError::ItemNotFound(message)),
        StatusCode::CONFLICT => SharePointError::Resource(ResourceError::AlreadyExists(message)),
        StatusCode::LOCKED => SharePointError::Resource(ResourceError::Locked(message)),
        StatusCode::TOO_MANY_REQUESTS => SharePointError::Quota(QuotaError::TooManyRequests {
            message,
            retry_after,
        }),
        StatusCode::INSUFFICIENT_STORAGE => {
            SharePointError::Quota(QuotaError::InsufficientStorage(message))
        }
        StatusCode::INTERNAL_SERVER_ERROR => {
            SharePointError::Server(ServerError::InternalError(message))
        }
        StatusCode::BAD_GATEWAY => SharePointError::Server(ServerError::BadGateway(message)),
        StatusCode::SERVICE_UNAVAILABLE => {
            SharePointError::Server(ServerError::ServiceUnavailable {
                message,
                retry_after,
            })
        }
        StatusCode::GATEWAY_TIMEOUT => SharePointError::Network(NetworkError::Timeout(message)),
        _ => SharePointError::Server(ServerError::UnexpectedStatus {
            status: status.as_u16(),
            message,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{MockAuthProvider, MockHttpTransport};
    use crate::types::{DriveInfo, SiteInfo};

    fn executor(transport: Arc<MockHttpTransport>) -> RequestExecutor {
        let config = SharePointConfig::builder()
            .auth_provider(MockAuthProvider::new("test-token"))
            .sp_domain("contoso.sharepoint.com")
            .build()
            .unwrap();
        let auth = config.auth_provider.clone();
        RequestExecutor::new(config, transport, auth)
    }

    #[test]
    fn test_build_url_keeps_base_path() {
        let executor = executor(Arc::new(MockHttpTransport::new()));

        let url = executor.build_url("/sites/abc", &[]).unwrap();
        assert_eq!(url.as_str(), "https://graph.microsoft.com/v1.0/sites/abc");

        let url = executor
            .build_url(
                "drives/b!x/root:/My%20Docs:/children",
                &[("$select".to_string(), "id,name".to_string())],
            )
            .unwrap();
        assert_eq!(url.path(), "/v1.0/drives/b!x/root:/My%20Docs:/children");
        assert_eq!(
            url.query_pairs().next().map(|(k, v)| (k.into_owned(), v.into_owned())),
            Some(("$select".to_string(), "id,name".to_string()))
        );
    }

    #[tokio::test]
    async fn test_execute_adds_headers() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.enqueue_json_response(200, "{}");
        let executor = executor(transport.clone());

        let request = ApiRequest::patch("drives/d/root:/a")
            .json(&serde_json::json!({"name": "b"}))
            .unwrap();
        executor.execute(request).await.unwrap();

        transport.verify_header(0, "authorization", "Bearer test-token");
        transport.verify_header(0, "accept", ACCEPT_JSON);
        transport.verify_header(0, "content-type", "application/json");
        assert_eq!(transport.get_requests()[0].json()["name"], "b");
    }

    #[tokio::test]
    async fn test_auth_failure_is_an_error() {
        let transport = Arc::new(MockHttpTransport::new());
        let config = SharePointConfig::builder()
            .auth_provider(MockAuthProvider::failing("tenant disabled"))
            .sp_domain("contoso.sharepoint.com")
            .build()
            .unwrap();
        let auth = config.auth_provider.clone();
        let executor = RequestExecutor::new(config, transport.clone(), auth);

        let err = executor.execute(ApiRequest::get("sites/x")).await.unwrap_err();

        assert!(matches!(err, SharePointError::Authentication(_)));
        transport.verify_request_count(0);
    }

    #[test]
    fn test_shape_skips_parsing_on_failure_status() {
        let executor = executor(Arc::new(MockHttpTransport::new()));
        let response = HttpResponse::new(
            StatusCode::NOT_FOUND,
            HeaderMap::new(),
            Bytes::from_static(b"<html>not json</html>"),
        );

        let envelope = executor.shape::<SiteInfo>(response, &[StatusCode::OK]).unwrap();

        assert_eq!(envelope.status, StatusCode::NOT_FOUND);
        assert!(envelope.content.is_none());
    }

    #[test]
    fn test_shape_list_requires_value_array() {
        let executor = executor(Arc::new(MockHttpTransport::new()));
        let response = HttpResponse::new(
            StatusCode::OK,
            HeaderMap::new(),
            Bytes::from_static(br#"{"items": []}"#),
        );

        let err = executor
            .shape_list::<DriveInfo>(response, &[StatusCode::OK])
            .unwrap_err();

        assert!(matches!(err, SharePointError::Response(_)));
    }

    #[test]
    fn test_error_mapping() {
        let mut headers = HeaderMap::new();
        headers.insert("retry-after", HeaderValue::from_static("12"));

        let err = error_from_response(
            StatusCode::TOO_MANY_REQUESTS,
            &headers,
            br#"{"error":{"code":"activityLimitReached","message":"Slow down"}}"#,
        );
        assert!(err.is_retryable());
        assert_eq!(err.retry_after(), Some(Duration::from_secs(12)));

        let err = error_from_response(
            StatusCode::FORBIDDEN,
            &HeaderMap::new(),
            br#"{"error":{"code":"accessDenied","message":"Access denied"}}"#,
        );
        assert!(matches!(
            err,
            SharePointError::Authorization(AuthorizationError::AccessDenied(_))
        ));

        let err = error_from_response(StatusCode::IM_A_TEAPOT, &HeaderMap::new(), b"short and stout");
        match err {
            SharePointError::Server(ServerError::UnexpectedStatus { status, message }) => {
                assert_eq!(status, 418);
                assert_eq!(message, "HTTP 418: short and stout");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
