//! Authentication providers for the Microsoft Graph API.
//!
//! SharePoint access goes through an Azure AD app registration using the
//! OAuth 2.0 client credentials grant:
//!
//! ```no_run
//! use integrations_sharepoint::auth::{AuthProvider, ClientCredentialsProvider};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = ClientCredentialsProvider::new_with_strings(
//!     "contoso.onmicrosoft.com",
//!     "00000000-0000-0000-0000-000000000000",
//!     "client_secret",
//! );
//!
//! let token = provider.get_access_token().await?;
//! # Ok(())
//! # }
//! ```

use crate::errors::AuthenticationError;
use crate::transport::{HttpMethod, HttpRequest, HttpTransport, ReqwestTransport, RequestBody};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Duration, Utc};
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use url::Url;

/// Default Azure AD login host.
pub const LOGIN_URL: &str = "https://login.microsoftonline.com";

/// Scope requesting every application permission granted to the app.
pub const GRAPH_DEFAULT_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Token expiry buffer (5 minutes) - refresh tokens proactively before expiry.
pub const TOKEN_EXPIRY_BUFFER_SECONDS: i64 = 300;

/// Authentication provider abstraction.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Get an access token for API requests.
    async fn get_access_token(&self) -> Result<AccessToken, AuthenticationError>;

    /// Force refresh the access token.
    async fn refresh_token(&self) -> Result<AccessToken, AuthenticationError>;

    /// Check if the current token is expired.
    fn is_expired(&self) -> bool;
}

/// Access token with metadata.
#[derive(Debug, Clone)]
pub struct AccessToken {
    /// The token string.
    pub token: SecretString,

    /// Token type (usually "Bearer").
    pub token_type: String,

    /// Expiration time.
    pub expires_at: DateTime<Utc>,

    /// Scopes granted.
    pub scopes: Vec<String>,
}

impl AccessToken {
    /// Creates a new access token.
    pub fn new(
        token: impl Into<String>,
        token_type: impl Into<String>,
        expires_at: DateTime<Utc>,
        scopes: Vec<String>,
    ) -> Self {
        Self {
            token: SecretString::new(token.into()),
            token_type: token_type.into(),
            expires_at,
            scopes,
        }
    }

    /// Checks if the token is expired.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Checks if the token needs proactive refresh (within 5 minutes of expiry).
    pub fn needs_refresh(&self) -> bool {
        let threshold = self.expires_at - Duration::seconds(TOKEN_EXPIRY_BUFFER_SECONDS);
        Utc::now() >= threshold
    }

    /// Returns the authorization header value.
    pub fn authorization_header(&self) -> String {
        format!("{} {}", self.token_type, self.token.expose_secret())
    }
}

/// Client credentials (app-only) provider.
///
/// Tokens are cached and refreshed five minutes before they expire. The
/// provider is thread-safe; the cache sits behind an `RwLock`.
pub struct ClientCredentialsProvider {
    tenant_id: String,
    client_id: String,
    client_secret: SecretString,
    scope: String,
    login_url: String,
    cached_token: Arc<RwLock<Option<AccessToken>>>,
    transport: Arc<dyn HttpTransport>,
}

impl ClientCredentialsProvider {
    /// Creates a new provider.
    pub fn new(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: SecretString,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret,
            scope: GRAPH_DEFAULT_SCOPE.to_string(),
            login_url: LOGIN_URL.to_string(),
            cached_token: Arc::new(RwLock::new(None)),
            transport: Arc::new(ReqwestTransport::new(Client::new())),
        }
    }

    /// Creates a new provider with a string secret.
    pub fn new_with_strings(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self::new(tenant_id, client_id, SecretString::new(client_secret.into()))
    }

    /// Sets a custom login host (for national clouds or testing).
    pub fn with_login_url(mut self, login_url: impl Into<String>) -> Self {
        self.login_url = login_url.into();
        self
    }

    /// Sets the transport used to reach the token endpoint.
    pub fn with_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = transport;
        self
    }

    /// Tenant the provider authenticates against.
    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    /// Token endpoint for the tenant.
    pub fn token_url(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.login_url.trim_end_matches('/'),
            self.tenant_id
        )
    }

    async fn request_token(&self) -> Result<AccessToken, AuthenticationError> {
        #[derive(Serialize)]
        struct TokenRequest<'a> {
            grant_type: &'a str,
            client_id: &'a str,
            client_secret: &'a str,
            scope: &'a str,
        }

        #[derive(Deserialize)]
        struct TokenResponse {
            access_token: String,
            token_type: String,
            expires_in: i64,
        }

        #[derive(Deserialize)]
        struct TokenErrorResponse {
            error: String,
            #[serde(default)]
            error_description: Option<String>,
        }

        let url = Url::parse(&self.token_url()).map_err(|e| {
            AuthenticationError::TokenRequestFailed(format!("Invalid token URL: {}", e))
        })?;

        let form = serde_urlencoded::to_string(TokenRequest {
            grant_type: "client_credentials",
            client_id: &self.client_id,
            client_secret: self.client_secret.expose_secret(),
            scope: &self.scope,
        })
        .map_err(|e| {
            AuthenticationError::TokenRequestFailed(format!("Failed to encode form: {}", e))
        })?;

        let mut request = HttpRequest::new(HttpMethod::Post, url);
        request.headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        request.body = Some(RequestBody::Bytes(Bytes::from(form)));

        debug!(tenant = %self.tenant_id, "Requesting access token");

        let response = self.transport.send(request).await.map_err(|e| {
            AuthenticationError::TokenRequestFailed(format!("HTTP request failed: {}", e))
        })?;

        if !response.status.is_success() {
            let status = response.status;
            warn!(tenant = %self.tenant_id, status = status.as_u16(), "Token request rejected");

            if let Ok(err) = serde_json::from_slice::<TokenErrorResponse>(&response.body) {
                let detail = err.error_description.unwrap_or_default();
                return Err(match err.error.as_str() {
                    "invalid_client" | "unauthorized_client" => {
                        AuthenticationError::InvalidClient(detail)
                    }
                    _ => AuthenticationError::TokenRequestFailed(format!(
                        "{} ({}): {}",
                        err.error, status, detail
                    )),
                });
            }
            return Err(AuthenticationError::TokenRequestFailed(format!(
                "Token request failed with status {}: {}",
                status,
                String::from_utf8_lossy(&response.body)
            )));
        }

        let token_response: TokenResponse =
            serde_json::from_slice(&response.body).map_err(|e| {
                AuthenticationError::TokenRequestFailed(format!("Failed to parse response: {}", e))
            })?;

        let expires_at = Utc::now() + Duration::seconds(token_response.expires_in);
        info!(tenant = %self.tenant_id, expires_at = %expires_at, "Access token acquired");

        Ok(AccessToken::new(
            token_response.access_token,
            token_response.token_type,
            expires_at,
            vec![self.scope.clone()],
        ))
    }
}

#[async_trait]
impl AuthProvider for ClientCredentialsProvider {
    async fn get_access_token(&self) -> Result<AccessToken, AuthenticationError> {
        let cached = self.cached_token.read().await;
        if let Some(token) = cached.as_ref() {
            if !token.needs_refresh() {
                return Ok(token.clone());
            }
        }
        drop(cached);

        self.refresh_token().await
    }

    async fn refresh_token(&self) -> Result<AccessToken, AuthenticationError> {
        let token = self.request_token().await?;

        let mut cached = self.cached_token.write().await;
        *cached = Some(token.clone());

        Ok(token)
    }

    fn is_expired(&self) -> bool {
        match self.cached_token.try_read() {
            Ok(cached) => cached.as_ref().map_or(true, AccessToken::needs_refresh),
            // A refresh is in flight.
            Err(_) => true,
        }
    }
}

/// Provider for a token issued elsewhere.
///
/// The token is never refreshed; once it expires every request fails with
/// `AuthenticationError::ExpiredToken`.
pub struct StaticTokenProvider {
    token: AccessToken,
}

impl StaticTokenProvider {
    /// Wraps an existing token.
    pub fn new(token: AccessToken) -> Self {
        Self { token }
    }

    /// Wraps a bearer token string valid until `expires_at`.
    pub fn bearer(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self::new(AccessToken::new(token, "Bearer", expires_at, Vec::new()))
    }
}

#[async_trait]
impl AuthProvider for StaticTokenProvider {
    async fn get_access_token(&self) -> Result<AccessToken, AuthenticationError> {
        if self.token.is_expired() {
            return Err(AuthenticationError::ExpiredToken(format!(
                "Token expired at {}",
                self.token.expires_at
            )));
        }
        Ok(self.token.clone())
    }

    async fn refresh_token(&self) -> Result<AccessToken, AuthenticationError> {
        self.get_access_token().await
    }

    fn is_expired(&self) -> bool {
        self.token.is_expired()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::MockHttpTransport;

    fn provider(transport: Arc<MockHttpTransport>) -> ClientCredentialsProvider {
        ClientCredentialsProvider::new_with_strings("contoso", "app-id", "s3cret")
            .with_transport(transport)
    }

    #[test]
    fn test_access_token_refresh_window() {
        let token = AccessToken::new("t", "Bearer", Utc::now() + Duration::minutes(4), vec![]);
        assert!(!token.is_expired());
        assert!(token.needs_refresh());

        let token = AccessToken::new("t", "Bearer", Utc::now() + Duration::hours(1), vec![]);
        assert!(!token.needs_refresh());
        assert_eq!(token.authorization_header(), "Bearer t");
    }

    #[test]
    fn test_token_url() {
        let provider = ClientCredentialsProvider::new_with_strings("contoso", "id", "secret");
        assert_eq!(
            provider.token_url(),
            "https://login.microsoftonline.com/contoso/oauth2/v2.0/token"
        );

        let provider = provider.with_login_url("http://127.0.0.1:8080/");
        assert_eq!(
            provider.token_url(),
            "http://127.0.0.1:8080/contoso/oauth2/v2.0/token"
        );
    }

    #[tokio::test]
    async fn test_token_is_cached() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.enqueue_json_response(
            200,
            r#"{"token_type":"Bearer","expires_in":3599,"access_token":"abc"}"#,
        );
        let provider = provider(transport.clone());

        assert!(provider.is_expired());
        let first = provider.get_access_token().await.unwrap();
        let second = provider.get_access_token().await.unwrap();

        assert_eq!(first.token.expose_secret(), "abc");
        assert_eq!(second.token.expose_secret(), "abc");
        assert!(!provider.is_expired());
        transport.verify_request_count(1);

        let request = &transport.get_requests()[0];
        assert_eq!(request.method, HttpMethod::Post);
        let form: Vec<(String, String)> = serde_urlencoded::from_bytes(&request.body).unwrap();
        assert!(form.contains(&("grant_type".to_string(), "client_credentials".to_string())));
        assert!(form.contains(&("scope".to_string(), GRAPH_DEFAULT_SCOPE.to_string())));
    }

    #[tokio::test]
    async fn test_invalid_client() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.enqueue_json_response(
            401,
            r#"{"error":"invalid_client","error_description":"AADSTS7000215: Invalid client secret."}"#,
        );

        let err = provider(transport).get_access_token().await.unwrap_err();

        assert!(matches!(err, AuthenticationError::InvalidClient(msg) if msg.starts_with("AADSTS")));
    }

    #[tokio::test]
    async fn test_static_token_expiry() {
        let provider = StaticTokenProvider::bearer("t", Utc::now() - Duration::seconds(1));
        assert!(provider.is_expired());
        assert!(matches!(
            provider.get_access_token().await,
            Err(AuthenticationError::ExpiredToken(_))
        ));
    }

    #[test]
    fn test_static_token_valid() {
        let provider = StaticTokenProvider::bearer("t", Utc::now() + Duration::hours(1));
        assert!(!provider.is_expired());

        let token = tokio_test::assert_ok!(tokio_test::block_on(provider.get_access_token()));
        assert_eq!(token.authorization_header(), "Bearer t");
    }
}
