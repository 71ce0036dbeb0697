//! SharePoint client implementation.

use crate::auth::{AccessToken, AuthProvider};
use crate::config::{PoolConfig, SharePointConfig, SharePointConfigBuilder};
use crate::errors::{SharePointError, SharePointResult};
use crate::services::*;
use crate::transport::{HttpTransport, ReqwestTransport};
use crate::types::DerivationPolicy;
use secrecy::SecretString;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

mod executor;
pub(crate) use executor::{collection, error_from_response, parse_json};
pub use executor::{ApiRequest, RequestExecutor, ACCEPT_JSON, ACCEPT_JSON_NO_METADATA};

/// SharePoint client over Microsoft Graph.
///
/// Entry point for every operation; the services it hands out share one
/// executor, so they share the transport and the token cache.
pub struct SharePointClient {
    config: SharePointConfig,
    auth: Arc<dyn AuthProvider>,
    executor: Arc<RequestExecutor>,
}

impl SharePointClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use integrations_sharepoint::{SharePointClient, SharePointConfig};
    /// use secrecy::SecretString;
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = SharePointConfig::builder()
    ///     .client_credentials("contoso.onmicrosoft.com", "app-id", SecretString::new("secret".into()))
    ///     .sp_domain("contoso.sharepoint.com")
    ///     .build()?;
    ///
    /// let client = SharePointClient::new(config)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: SharePointConfig) -> SharePointResult<Self> {
        let transport = ReqwestTransport::from_config(&config).map_err(|e| {
            SharePointError::configuration(format!("Failed to create transport: {}", e))
        })?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Creates a client on top of a custom transport.
    pub fn with_transport(
        config: SharePointConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> SharePointResult<Self> {
        config.validate()?;

        let auth = config.auth_provider.clone();
        let executor = Arc::new(RequestExecutor::new(config.clone(), transport, auth.clone()));

        Ok(Self {
            config,
            auth,
            executor,
        })
    }

    /// Creates a new client builder.
    pub fn builder() -> SharePointClientBuilder {
        SharePointClientBuilder::new()
    }

    /// Fetches an access token now instead of on the first request.
    pub async fn authenticate(&self) -> SharePointResult<AccessToken> {
        info!("Getting authentication token");
        let token = self
            .auth
            .get_access_token()
            .await
            .map_err(SharePointError::Authentication)?;
        info!(expires_at = %token.expires_at, "Authentication successful");
        Ok(token)
    }

    /// Sites and document libraries.
    pub fn sites(&self) -> SitesService {
        SitesService::new(self.executor.clone())
    }

    /// Folder operations.
    pub fn folders(&self) -> FoldersService {
        FoldersService::new(self.executor.clone())
    }

    /// File operations and transfers.
    pub fn files(&self) -> FilesService {
        FilesService::new(self.executor.clone())
    }

    /// SharePoint lists.
    pub fn lists(&self) -> ListsService {
        ListsService::new(self.executor.clone())
    }

    /// Gets the configuration.
    pub fn config(&self) -> &SharePointConfig {
        &self.config
    }

    /// Gets the request executor (for advanced use cases).
    pub fn executor(&self) -> &Arc<RequestExecutor> {
        &self.executor
    }
}

/// Builder for SharePointClient.
pub struct SharePointClientBuilder {
    config_builder: SharePointConfigBuilder,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl SharePointClientBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            config_builder: SharePointConfig::builder(),
            transport: None,
        }
    }

    /// Sets the authentication provider.
    pub fn auth_provider<A: AuthProvider + 'static>(mut self, provider: A) -> Self {
        self.config_builder = self.config_builder.auth_provider(provider);
        self
    }

    /// Sets the authentication provider from an Arc.
    pub fn auth_provider_arc(mut self, provider: Arc<dyn AuthProvider>) -> Self {
        self.config_builder = self.config_builder.auth_provider_arc(provider);
        self
    }

    /// Authenticates with client credentials.
    pub fn client_credentials(
        mut self,
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: SecretString,
    ) -> Self {
        self.config_builder = self
            .config_builder
            .client_credentials(tenant_id, client_id, client_secret);
        self
    }

    /// Sets the SharePoint host name.
    pub fn sp_domain(mut self, domain: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.sp_domain(domain);
        self
    }

    /// Sets the base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.base_url(url);
        self
    }

    /// Sets the Azure AD login host.
    pub fn login_url(mut self, url: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.login_url(url);
        self
    }

    /// Sets the timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config_builder = self.config_builder.timeout(timeout);
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config_builder = self.config_builder.connect_timeout(timeout);
        self
    }

    /// Sets the user agent.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.user_agent(ua);
        self
    }

    /// Sets the pool configuration.
    pub fn pool(mut self, pool: PoolConfig) -> Self {
        self.config_builder = self.config_builder.pool(pool);
        self
    }

    /// Sets the derivation policy.
    pub fn derivation_policy(mut self, policy: DerivationPolicy) -> Self {
        self.config_builder = self.config_builder.derivation_policy(policy);
        self
    }

    /// Uses a custom transport instead of reqwest.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Builds the client.
    pub fn build(self) -> SharePointResult<SharePointClient> {
        let config = self.config_builder.build()?;
        match self.transport {
            Some(transport) => SharePointClient::with_transport(config, transport),
            None => SharePointClient::new(config),
        }
    }
}

impl Default for SharePointClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
