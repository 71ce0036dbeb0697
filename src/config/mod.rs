//! Configuration for the SharePoint client.

use crate::auth::{AuthProvider, ClientCredentialsProvider, LOGIN_URL};
use crate::errors::{ConfigurationError, SharePointError, SharePointResult};
use crate::transport::ReqwestTransport;
use crate::types::DerivationPolicy;
use secrecy::SecretString;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Default Microsoft Graph endpoint.
pub const DEFAULT_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

/// Configuration for the SharePoint client.
#[derive(Clone)]
pub struct SharePointConfig {
    /// Authentication provider.
    pub auth_provider: Arc<dyn AuthProvider>,

    /// SharePoint host name, e.g. `contoso.sharepoint.com`.
    pub sp_domain: String,

    /// Base URL for the Graph API.
    pub base_url: Url,

    /// Azure AD login host used for client credentials.
    pub login_url: Url,

    /// Default timeout for requests.
    pub timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// User agent string.
    pub user_agent: String,

    /// Pool configuration.
    pub pool: PoolConfig,

    /// How response shapes treat incomplete derivation inputs.
    pub derivation_policy: DerivationPolicy,
}

impl std::fmt::Debug for SharePointConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharePointConfig")
            .field("sp_domain", &self.sp_domain)
            .field("base_url", &self.base_url.as_str())
            .field("login_url", &self.login_url.as_str())
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("user_agent", &self.user_agent)
            .field("pool", &self.pool)
            .field("derivation_policy", &self.derivation_policy)
            .finish_non_exhaustive()
    }
}

/// Connection pool configuration.
#[derive(Clone, Debug)]
pub struct PoolConfig {
    /// Maximum idle connections per host.
    pub max_idle_per_host: usize,

    /// Idle timeout.
    pub idle_timeout: Option<Duration>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_idle_per_host: 10,
            idle_timeout: Some(Duration::from_secs(90)),
        }
    }
}

impl SharePointConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> SharePointConfigBuilder {
        SharePointConfigBuilder::new()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> SharePointResult<()> {
        if self.sp_domain.trim().is_empty() {
            return Err(SharePointError::Configuration(
                ConfigurationError::InvalidConfiguration(
                    "SharePoint domain must not be empty".to_string(),
                ),
            ));
        }

        if self.sp_domain.contains('/') {
            return Err(SharePointError::Configuration(
                ConfigurationError::InvalidConfiguration(format!(
                    "SharePoint domain must be a host name, got {}",
                    self.sp_domain
                )),
            ));
        }

        check_secure(&self.base_url, "Base URL")?;
        check_secure(&self.login_url, "Login URL")?;

        Ok(())
    }
}

// Plain HTTP is accepted for loopback hosts so tests can point at a local server.
fn check_secure(url: &Url, what: &str) -> SharePointResult<()> {
    let loopback = matches!(url.host_str(), Some("localhost" | "127.0.0.1" | "[::1]"));
    if url.scheme() == "https" || (url.scheme() == "http" && loopback) {
        return Ok(());
    }
    Err(SharePointError::Configuration(
        ConfigurationError::InvalidConfiguration(format!("{} must use HTTPS", what)),
    ))
}

fn parse_url(value: &str, what: &str) -> SharePointResult<Url> {
    Url::parse(value).map_err(|e| {
        SharePointError::Configuration(ConfigurationError::InvalidUrl(format!(
            "{} {}: {}",
            what, value, e
        )))
    })
}

struct ClientCredentials {
    tenant_id: String,
    client_id: String,
    client_secret: SecretString,
}

/// Builder for SharePointConfig.
pub struct SharePointConfigBuilder {
    auth_provider: Option<Arc<dyn AuthProvider>>,
    credentials: Option<ClientCredentials>,
    sp_domain: Option<String>,
    base_url: Option<String>,
    login_url: Option<String>,
    timeout: Duration,
    connect_timeout: Duration,
    user_agent: Option<String>,
    pool: PoolConfig,
    derivation_policy: DerivationPolicy,
}

impl SharePointConfigBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            auth_provider: None,
            credentials: None,
            sp_domain: None,
            base_url: None,
            login_url: None,
            timeout: Duration::from_secs(300),
            connect_timeout: Duration::from_secs(30),
            user_agent: None,
            pool: PoolConfig::default(),
            derivation_policy: DerivationPolicy::default(),
        }
    }

    /// Sets the authentication provider.
    pub fn auth_provider<A: AuthProvider + 'static>(mut self, provider: A) -> Self {
        self.auth_provider = Some(Arc::new(provider));
        self
    }

    /// Sets the authentication provider from an Arc.
    pub fn auth_provider_arc(mut self, provider: Arc<dyn AuthProvider>) -> Self {
        self.auth_provider = Some(provider);
        self
    }

    /// Authenticates with an app registration's client credentials.
    ///
    /// Ignored when an explicit auth provider is also set.
    pub fn client_credentials(
        mut self,
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: SecretString,
    ) -> Self {
        self.credentials = Some(ClientCredentials {
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret,
        });
        self
    }

    /// Sets the SharePoint host name.
    pub fn sp_domain(mut self, domain: impl Into<String>) -> Self {
        self.sp_domain = Some(domain.into());
        self
    }

    /// Sets the base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the Azure AD login host.
    pub fn login_url(mut self, url: impl Into<String>) -> Self {
        self.login_url = Some(url.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the user agent string.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the pool configuration.
    pub fn pool(mut self, pool: PoolConfig) -> Self {
        self.pool = pool;
        self
    }

    /// Sets the derivation policy used when normalizing responses.
    pub fn derivation_policy(mut self, policy: DerivationPolicy) -> Self {
        self.derivation_policy = policy;
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> SharePointResult<SharePointConfig> {
        let base_url = parse_url(self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL), "Base URL")?;
        let login_url = parse_url(self.login_url.as_deref().unwrap_or(LOGIN_URL), "Login URL")?;

        let auth_provider = match (self.auth_provider, self.credentials) {
            (Some(provider), _) => provider,
            (None, Some(creds)) => {
                // Token requests honour the same timeouts as API requests.
                let transport =
                    ReqwestTransport::with_settings(self.timeout, self.connect_timeout, &self.pool)
                        .map_err(|e| {
                            SharePointError::configuration(format!(
                                "Failed to create token transport: {}",
                                e
                            ))
                        })?;
                Arc::new(
                    ClientCredentialsProvider::new(
                        creds.tenant_id,
                        creds.client_id,
                        creds.client_secret,
                    )
                    .with_login_url(login_url.as_str())
                    .with_transport(Arc::new(transport)),
                )
            }
            (None, None) => {
                return Err(SharePointError::Configuration(
                    ConfigurationError::MissingCredentials(
                        "Authentication provider or client credentials are required".to_string(),
                    ),
                ))
            }
        };

        let sp_domain = self.sp_domain.ok_or_else(|| {
            SharePointError::Configuration(ConfigurationError::InvalidConfiguration(
                "SharePoint domain is required".to_string(),
            ))
        })?;

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("integrations-sharepoint/{}", env!("CARGO_PKG_VERSION")));

        let config = SharePointConfig {
            auth_provider,
            sp_domain,
            base_url,
            login_url,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            user_agent,
            pool: self.pool,
            derivation_policy: self.derivation_policy,
        };

        config.validate()?;

        Ok(config)
    }
}

impl Default for SharePointConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::MockAuthProvider;

    #[test]
    fn test_default_config() {
        let config = SharePointConfig::builder()
            .auth_provider(MockAuthProvider::new("token"))
            .sp_domain("contoso.sharepoint.com")
            .build()
            .unwrap();

        assert_eq!(config.base_url.as_str(), "https://graph.microsoft.com/v1.0");
        assert_eq!(config.login_url.as_str(), "https://login.microsoftonline.com/");
        assert_eq!(config.timeout, Duration::from_secs(300));
        assert_eq!(config.derivation_policy, DerivationPolicy::Lenient);
        assert!(config.user_agent.starts_with("integrations-sharepoint/"));
    }

    #[test]
    fn test_custom_config() {
        let config = SharePointConfig::builder()
            .client_credentials("contoso", "app", SecretString::new("secret".into()))
            .sp_domain("contoso.sharepoint.com")
            .timeout(Duration::from_secs(60))
            .user_agent("test-agent/1.0")
            .derivation_policy(DerivationPolicy::Strict)
            .build()
            .unwrap();

        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.user_agent, "test-agent/1.0");
        assert_eq!(config.derivation_policy, DerivationPolicy::Strict);
        assert!(!format!("{:?}", config).contains("secret"));
    }

    #[test]
    fn test_missing_auth_provider() {
        let result = SharePointConfig::builder()
            .sp_domain("contoso.sharepoint.com")
            .build();
        assert!(matches!(
            result,
            Err(SharePointError::Configuration(ConfigurationError::MissingCredentials(_)))
        ));
    }

    #[test]
    fn test_domain_required() {
        let result = SharePointConfig::builder()
            .auth_provider(MockAuthProvider::new("token"))
            .sp_domain("  ")
            .build();
        assert!(result.is_err());

        let result = SharePointConfig::builder()
            .auth_provider(MockAuthProvider::new("token"))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_insecure_and_malformed_urls() {
        let result = SharePointConfig::builder()
            .auth_provider(MockAuthProvider::new("token"))
            .sp_domain("contoso.sharepoint.com")
            .base_url("http://graph.example.com/v1.0")
            .build();
        assert!(result.is_err());

        let result = SharePointConfig::builder()
            .auth_provider(MockAuthProvider::new("token"))
            .sp_domain("contoso.sharepoint.com")
            .base_url("not a url")
            .build();
        assert!(matches!(
            result,
            Err(SharePointError::Configuration(ConfigurationError::InvalidUrl(_)))
        ));

        let result = SharePointConfig::builder()
            .auth_provider(MockAuthProvider::new("token"))
            .sp_domain("contoso.sharepoint.com")
            .base_url("http://127.0.0.1:9000/v1.0")
            .build();
        assert!(result.is_ok());
    }
}
