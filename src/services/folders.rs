//! Folder operations within a document library.

use super::{item_action, item_path, require};
use crate::client::{ApiRequest, RequestExecutor};
use crate::errors::SharePointResult;
use crate::types::requests::{CreateFolderRequest, RenameItemRequest};
use crate::types::{CreatedDir, DirEntry, DirInfo, RenamedFolder, SharePointResponse};
use reqwest::StatusCode;
use std::sync::Arc;
use tracing::info;

/// Service for folder operations.
///
/// Paths are relative to the drive root, e.g. `Reports/2024`; `None` means
/// the root itself.
pub struct FoldersService {
    executor: Arc<RequestExecutor>,
}

impl FoldersService {
    /// Creates a new folders service.
    pub(crate) fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    /// Gets folder metadata.
    pub async fn get_dir_info(
        &self,
        drive_id: &str,
        path: Option<&str>,
    ) -> SharePointResult<SharePointResponse<DirInfo>> {
        require("drive_id", drive_id)?;
        info!(drive_id, path = path.unwrap_or("/"), "Getting folder info");

        let response = self
            .executor
            .execute(ApiRequest::get(item_path(drive_id, path)).select::<DirInfo>())
            .await?;

        let envelope = self.executor.shape(response, &[StatusCode::OK])?;
        if envelope.has_content() {
            info!("Request successful");
        }
        Ok(envelope)
    }

    /// Lists the children of a folder.
    ///
    /// Every entry's `path` is the folder that was listed (`/` for the root).
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use integrations_sharepoint::*;
    /// # async fn example(client: SharePointClient) -> SharePointResult<()> {
    /// let listing = client.folders().list_dir("b!drive", Some("Reports")).await?;
    /// for entry in listing.content.unwrap_or_default() {
    ///     println!("{} {:?}", entry.name, entry.extension);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list_dir(
        &self,
        drive_id: &str,
        path: Option<&str>,
    ) -> SharePointResult<SharePointResponse<Vec<DirEntry>>> {
        require("drive_id", drive_id)?;
        let listed = path.filter(|p| !p.trim_matches('/').is_empty()).unwrap_or("/");
        info!(drive_id, path = listed, "Listing folder");

        let response = self
            .executor
            .execute(ApiRequest::get(item_action(drive_id, path, "children")).select::<DirEntry>())
            .await?;

        let envelope = self
            .executor
            .shape_list::<DirEntry>(response, &[StatusCode::OK])?
            .map(|entries| {
                entries
                    .into_iter()
                    .map(|entry| entry.with_path(listed))
                    .collect::<Vec<_>>()
            });
        if let Some(entries) = &envelope.content {
            info!(count = entries.len(), "Request successful");
        }
        Ok(envelope)
    }

    /// Creates `name` inside the folder at `path`, replacing an existing
    /// folder of the same name.
    pub async fn create_dir(
        &self,
        drive_id: &str,
        path: &str,
        name: &str,
    ) -> SharePointResult<SharePointResponse<CreatedDir>> {
        require("drive_id", drive_id)?;
        require("name", name)?;
        info!(drive_id, path, name, "Creating folder");

        let request = ApiRequest::post(item_action(drive_id, Some(path), "children"))
            .select::<CreatedDir>()
            .json(&CreateFolderRequest::new(name))?;
        let response = self.executor.execute(request).await?;

        let envelope = self
            .executor
            .shape(response, &[StatusCode::OK, StatusCode::CREATED])?;
        if envelope.has_content() {
            info!("Request successful");
        }
        Ok(envelope)
    }

    /// Deletes the folder at `path` and everything in it.
    pub async fn delete_dir(
        &self,
        drive_id: &str,
        path: &str,
    ) -> SharePointResult<SharePointResponse<()>> {
        require("drive_id", drive_id)?;
        require("path", path)?;
        info!(drive_id, path, "Deleting folder");

        let response = self
            .executor
            .execute(ApiRequest::delete(item_path(drive_id, Some(path))))
            .await?;

        let envelope = self
            .executor
            .unit(response, &[StatusCode::OK, StatusCode::NO_CONTENT]);
        if envelope.has_content() {
            info!("Request successful");
        }
        Ok(envelope)
    }

    /// Renames the folder at `path`.
    pub async fn rename_folder(
        &self,
        drive_id: &str,
        path: &str,
        new_name: &str,
    ) -> SharePointResult<SharePointResponse<RenamedFolder>> {
        require("drive_id", drive_id)?;
        require("path", path)?;
        require("new_name", new_name)?;
        info!(drive_id, path, new_name, "Renaming folder");

        let request = ApiRequest::patch(item_path(drive_id, Some(path)))
            .select::<RenamedFolder>()
            .json(&RenameItemRequest {
                name: new_name.to_string(),
            })?;
        let response = self.executor.execute(request).await?;

        let envelope = self.executor.shape(response, &[StatusCode::OK])?;
        if envelope.has_content() {
            info!("Request successful");
        }
        Ok(envelope)
    }
}
