//! Mock implementations for testing.
//!
//! These let the services run against canned responses without network
//! access or real credentials.

use crate::auth::{AccessToken, AuthProvider};
use crate::errors::{AuthenticationError, TransportError};
use crate::transport::{
    ByteStream, HttpMethod, HttpRequest, HttpResponse, HttpTransport, RequestBody,
    StreamingResponse,
};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{Duration, Utc};
use futures::{stream, StreamExt};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use url::Url;

/// A request as seen by [`MockHttpTransport`], with its body collected.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Request URL.
    pub url: Url,
    /// Request headers.
    pub headers: HeaderMap,
    /// Request body; empty when none was sent.
    pub body: Bytes,
}

impl RecordedRequest {
    /// Parses the body as JSON.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap_or(serde_json::Value::Null)
    }

    /// Value of a query parameter.
    pub fn query(&self, key: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }
}

/// Mock HTTP transport for testing.
///
/// Responses are served in the order they were enqueued. Streaming requests
/// take from the streaming queue first and fall back to the regular queue.
///
/// # Example
///
/// ```
/// use integrations_sharepoint::mocks::MockHttpTransport;
/// use integrations_sharepoint::transport::{HttpMethod, HttpRequest, HttpTransport};
/// use url::Url;
///
/// # async fn example() {
/// let transport = MockHttpTransport::new();
/// transport.enqueue_json_response(200, r#"{"id": "1"}"#);
///
/// let url = Url::parse("https://graph.microsoft.com/v1.0/sites/1").unwrap();
/// let response = transport.send(HttpRequest::new(HttpMethod::Get, url)).await.unwrap();
/// assert_eq!(response.status.as_u16(), 200);
///
/// transport.verify_request_count(1);
/// # }
/// ```
pub struct MockHttpTransport {
    responses: Arc<Mutex<VecDeque<Result<HttpResponse, TransportError>>>>,
    streaming_responses: Arc<Mutex<VecDeque<Result<(StatusCode, Vec<StreamChunk>), TransportError>>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockHttpTransport {
    /// Create a new mock HTTP transport.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            streaming_responses: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Enqueue a response to be returned by the next request.
    pub fn enqueue_response(&self, response: Result<HttpResponse, TransportError>) {
        self.responses.lock().unwrap().push_back(response);
    }

    /// Enqueue a JSON response with the given status code and body.
    pub fn enqueue_json_response(&self, status: u16, body: &str) {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        self.enqueue_response(Ok(HttpResponse::new(
            status_code(status),
            headers,
            Bytes::from(body.to_string()),
        )));
    }

    /// Enqueue a JSON response built from a value.
    pub fn enqueue_json(&self, status: u16, body: serde_json::Value) {
        self.enqueue_json_response(status, &body.to_string());
    }

    /// Enqueue a response without a body.
    pub fn enqueue_empty_response(&self, status: u16) {
        self.enqueue_response(Ok(HttpResponse::new(
            status_code(status),
            HeaderMap::new(),
            Bytes::new(),
        )));
    }

    /// Enqueue a transport error.
    pub fn enqueue_error(&self, error: TransportError) {
        self.enqueue_response(Err(error));
    }

    /// Enqueue a streaming response with multiple chunks.
    pub fn enqueue_streaming_response(&self, status: u16, chunks: Vec<Bytes>) {
        self.streaming_responses
            .lock()
            .unwrap()
            .push_back(Ok((status_code(status), chunks.into_iter().map(Ok).collect())));
    }

    /// Enqueue a streaming response whose body fails after `chunks`.
    pub fn enqueue_interrupted_stream(&self, status: u16, chunks: Vec<Bytes>, error: TransportError) {
        let mut body: Vec<StreamChunk> = chunks.into_iter().map(Ok).collect();
        body.push(Err(error));
        self.streaming_responses
            .lock()
            .unwrap()
            .push_back(Ok((status_code(status), body)));
    }

    /// Enqueue a streaming error.
    pub fn enqueue_streaming_error(&self, error: TransportError) {
        self.streaming_responses.lock().unwrap().push_back(Err(error));
    }

    /// Get all requests that were made.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Get the last request that was made.
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    /// Verify that exactly `expected` requests were made.
    pub fn verify_request_count(&self, expected: usize) {
        let actual = self.requests.lock().unwrap().len();
        assert_eq!(actual, expected, "Expected {} requests, got {}", expected, actual);
    }

    /// Clear all recorded requests.
    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }

    /// Verify that a request was made with the expected method and URL path suffix.
    pub fn verify_request(&self, index: usize, method: HttpMethod, path_suffix: &str) {
        let requests = self.requests.lock().unwrap();
        assert!(index < requests.len(), "No request at index {}", index);

        let request = &requests[index];
        assert_eq!(request.method, method, "Expected method {:?}, got {:?}", method, request.method);
        assert!(
            request.url.path().ends_with(path_suffix),
            "Expected URL path to end with '{}', got '{}'",
            path_suffix,
            request.url.path()
        );
    }

    /// Verify that a request contains a specific header.
    pub fn verify_header(&self, index: usize, header_name: &str, header_value: &str) {
        let requests = self.requests.lock().unwrap();
        assert!(index < requests.len(), "No request at index {}", index);

        let actual_value = requests[index]
            .headers
            .get(header_name)
            .and_then(|v| v.to_str().ok());
        assert_eq!(
            actual_value,
            Some(header_value),
            "Expected header '{}' to be '{}', got {:?}",
            header_name,
            header_value,
            actual_value
        );
    }

    async fn record(&self, request: HttpRequest) -> Result<(), TransportError> {
        let body = match request.body {
            None | Some(RequestBody::Empty) => Bytes::new(),
            Some(RequestBody::Bytes(bytes)) => bytes,
            Some(RequestBody::Stream(mut body)) => {
                let mut buf = Vec::new();
                while let Some(chunk) = body.next().await {
                    let chunk = chunk.map_err(|e| TransportError::Network(e.to_string()))?;
                    buf.extend_from_slice(&chunk);
                }
                Bytes::from(buf)
            }
        };

        self.requests.lock().unwrap().push(RecordedRequest {
            method: request.method,
            url: request.url,
            headers: request.headers,
            body,
        });
        Ok(())
    }

    fn next_response(&self) -> Result<HttpResponse, TransportError> {
        self.responses.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(TransportError::Network(
                "No response configured in MockHttpTransport".to_string(),
            ))
        })
    }
}

impl Default for MockHttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

type StreamChunk = Result<Bytes, TransportError>;

fn status_code(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

#[async_trait]
impl HttpTransport for MockHttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.record(request).await?;
        self.next_response()
    }

    async fn send_streaming(
        &self,
        request: HttpRequest,
    ) -> Result<StreamingResponse, TransportError> {
        self.record(request).await?;

        let queued = self.streaming_responses.lock().unwrap().pop_front();
        let (status, headers, chunks) = match queued {
            Some(result) => {
                let (status, chunks) = result?;
                (status, HeaderMap::new(), chunks)
            }
            None => {
                let response = self.next_response()?;
                (response.status, response.headers, vec![Ok(response.body)])
            }
        };

        Ok(StreamingResponse {
            status,
            headers,
            body: ByteStream::new(stream::iter(chunks)),
        })
    }
}

/// Mock authentication provider for testing.
///
/// Hands out a fixed bearer token and counts how often it was asked.
///
/// ```
/// use integrations_sharepoint::mocks::MockAuthProvider;
/// use integrations_sharepoint::auth::AuthProvider;
///
/// # async fn example() {
/// let auth = MockAuthProvider::new("test-token");
/// let token = auth.get_access_token().await.unwrap();
/// assert_eq!(token.authorization_header(), "Bearer test-token");
/// assert_eq!(auth.call_count(), 1);
/// # }
/// ```
pub struct MockAuthProvider {
    token: String,
    failure: Option<String>,
    calls: AtomicUsize,
}

impl MockAuthProvider {
    /// Create a provider returning `token`.
    pub fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
            failure: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a provider whose token requests always fail.
    pub fn failing(message: &str) -> Self {
        Self {
            token: String::new(),
            failure: Some(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of token requests served.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthProvider for MockAuthProvider {
    async fn get_access_token(&self) -> Result<AccessToken, AuthenticationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(message) => Err(AuthenticationError::TokenRequestFailed(message.clone())),
            None => Ok(AccessToken::new(
                self.token.clone(),
                "Bearer",
                Utc::now() + Duration::hours(1),
                Vec::new(),
            )),
        }
    }

    async fn refresh_token(&self) -> Result<AccessToken, AuthenticationError> {
        self.get_access_token().await
    }

    fn is_expired(&self) -> bool {
        false
    }
}
