//! Sites and document libraries.

use super::{encode_path, require};
use crate::client::{ApiRequest, RequestExecutor};
use crate::errors::SharePointResult;
use crate::types::{DriveInfo, HostNameInfo, SharePointResponse, SiteInfo};
use reqwest::StatusCode;
use std::sync::Arc;
use tracing::info;

/// Service for site lookups.
pub struct SitesService {
    executor: Arc<RequestExecutor>,
}

impl SitesService {
    /// Creates a new sites service.
    pub(crate) fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    /// Resolves a site by name under the configured SharePoint domain.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use integrations_sharepoint::*;
    /// # async fn example(client: SharePointClient) -> SharePointResult<()> {
    /// let response = client.sites().get_site_info("Finance").await?;
    /// if let Some(site) = response.content {
    ///     println!("site id: {}", site.id);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_site_info(&self, name: &str) -> SharePointResult<SharePointResponse<SiteInfo>> {
        require("name", name)?;
        info!(site = name, "Getting site info");

        let path = format!(
            "sites/{}:/sites/{}",
            self.executor.sp_domain(),
            encode_path(name)
        );
        let response = self
            .executor
            .execute(ApiRequest::get(path).select::<SiteInfo>())
            .await?;

        let envelope = self.executor.shape(response, &[StatusCode::OK])?;
        if envelope.has_content() {
            info!("Request successful");
        }
        Ok(envelope)
    }

    /// Gets the host name details of a site.
    pub async fn get_hostname_info(
        &self,
        site_id: &str,
    ) -> SharePointResult<SharePointResponse<HostNameInfo>> {
        require("site_id", site_id)?;
        info!(site_id, "Getting host name info");

        let response = self
            .executor
            .execute(ApiRequest::get(format!("sites/{}", site_id)).select::<HostNameInfo>())
            .await?;

        let envelope = self.executor.shape(response, &[StatusCode::OK])?;
        if envelope.has_content() {
            info!("Request successful");
        }
        Ok(envelope)
    }

    /// Lists the document libraries of a site.
    pub async fn list_drives(
        &self,
        site_id: &str,
    ) -> SharePointResult<SharePointResponse<Vec<DriveInfo>>> {
        require("site_id", site_id)?;
        info!(site_id, "Listing drives");

        let response = self
            .executor
            .execute(ApiRequest::get(format!("sites/{}/drives", site_id)).select::<DriveInfo>())
            .await?;

        let envelope = self.executor.shape_list(response, &[StatusCode::OK])?;
        if let Some(drives) = &envelope.content {
            info!(count = drives.len(), "Request successful");
        }
        Ok(envelope)
    }
}
