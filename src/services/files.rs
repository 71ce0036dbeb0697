//! File operations and transfers.
//!
//! Files are addressed by their path relative to the drive root, e.g.
//! `Reports/2024/summary.xlsx`. Downloads stream to disk chunk by chunk and
//! uploads stream from disk, so large files never sit in memory.

use super::{item_action, item_path, require};
use crate::client::{ApiRequest, RequestExecutor};
use crate::errors::SharePointResult;
use crate::services::FoldersService;
use crate::transport::{ByteStream, HttpResponse, StreamingResponse};
use crate::types::requests::{CopyItemRequest, MoveItemRequest, RenameItemRequest};
use crate::types::{
    DownloadReport, DownloadStatus, FileInfo, MovedFile, RenamedFile, SharePointResponse,
    UploadedFile,
};
use bytes::Bytes;
use futures::StreamExt;
use reqwest::StatusCode;
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tracing::{info, warn};

/// Service for file operations.
pub struct FilesService {
    executor: Arc<RequestExecutor>,
}

impl FilesService {
    /// Creates a new files service.
    pub(crate) fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    /// Gets file metadata.
    pub async fn get_file_info(
        &self,
        drive_id: &str,
        filename: &str,
    ) -> SharePointResult<SharePointResponse<FileInfo>> {
        require("drive_id", drive_id)?;
        require("filename", filename)?;
        info!(drive_id, filename, "Getting file info");

        let response = self
            .executor
            .execute(ApiRequest::get(item_path(drive_id, Some(filename))).select::<FileInfo>())
            .await?;

        let envelope = self
            .executor
            .shape(response, &[StatusCode::OK, StatusCode::ACCEPTED])?;
        if envelope.has_content() {
            info!("Request successful");
        }
        Ok(envelope)
    }

    /// Copies a file into `target_path` of the same drive.
    ///
    /// The service copies asynchronously; success only means the copy was
    /// accepted.
    pub async fn copy_file(
        &self,
        drive_id: &str,
        filename: &str,
        target_path: &str,
        new_name: Option<&str>,
    ) -> SharePointResult<SharePointResponse<()>> {
        require("drive_id", drive_id)?;
        require("filename", filename)?;
        info!(drive_id, filename, target_path, "Copying file");

        let body = CopyItemRequest::within_drive(
            drive_id,
            target_path.trim_matches('/'),
            new_name.map(str::to_string),
        );
        let request = ApiRequest::post(item_action(drive_id, Some(filename), "copy")).json(&body)?;
        let response = self.executor.execute(request).await?;

        let envelope = self
            .executor
            .unit(response, &[StatusCode::OK, StatusCode::ACCEPTED]);
        if envelope.has_content() {
            info!("Request successful");
        }
        Ok(envelope)
    }

    /// Moves a file into the folder at `target_path`, optionally renaming it.
    ///
    /// Looks up the file and the target folder first. If either lookup
    /// fails, its envelope is returned without content and nothing is moved.
    pub async fn move_file(
        &self,
        drive_id: &str,
        filename: &str,
        target_path: &str,
        new_name: Option<&str>,
    ) -> SharePointResult<SharePointResponse<MovedFile>> {
        info!(drive_id, filename, target_path, "Moving file");

        let file = self.get_file_info(drive_id, filename).await?;
        let file_id = match file.content.as_ref().map(|info| info.id.clone()) {
            Some(id) => id,
            None => {
                warn!(status = file.status_code(), "File lookup failed");
                return Ok(file.with_content(None));
            }
        };

        let folders = FoldersService::new(self.executor.clone());
        let folder = folders.get_dir_info(drive_id, Some(target_path)).await?;
        let folder_id = match folder.content.as_ref().map(|info| info.id.clone()) {
            Some(id) => id,
            None => {
                warn!(status = folder.status_code(), "Target folder lookup failed");
                return Ok(folder.with_content(None));
            }
        };

        let request = ApiRequest::patch(format!("drives/{}/items/{}", drive_id, file_id))
            .select::<MovedFile>()
            .json(&MoveItemRequest::to_folder(folder_id, new_name.map(str::to_string)))?;
        let response = self.executor.execute(request).await?;

        let envelope = self.executor.shape(response, &[StatusCode::OK])?;
        if envelope.has_content() {
            info!("Request successful");
        }
        Ok(envelope)
    }

    /// Deletes a file.
    pub async fn delete_file(
        &self,
        drive_id: &str,
        filename: &str,
    ) -> SharePointResult<SharePointResponse<()>> {
        require("drive_id", drive_id)?;
        require("filename", filename)?;
        info!(drive_id, filename, "Deleting file");

        let response = self
            .executor
            .execute(ApiRequest::delete(item_path(drive_id, Some(filename))))
            .await?;

        let envelope = self
            .executor
            .unit(response, &[StatusCode::OK, StatusCode::NO_CONTENT]);
        if envelope.has_content() {
            info!("Request successful");
        }
        Ok(envelope)
    }

    /// Renames a file in place.
    pub async fn rename_file(
        &self,
        drive_id: &str,
        filename: &str,
        new_name: &str,
    ) -> SharePointResult<SharePointResponse<RenamedFile>> {
        require("drive_id", drive_id)?;
        require("filename", filename)?;
        require("new_name", new_name)?;
        info!(drive_id, filename, new_name, "Renaming file");

        let request = ApiRequest::patch(item_path(drive_id, Some(filename)))
            .select::<RenamedFile>()
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

    /// Streams a file to `local_path`.
    ///
    /// Content is the number of bytes written. The local file is only
    /// created once the service answered with success.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use integrations_sharepoint::*;
    /// # async fn example(client: SharePointClient) -> SharePointResult<()> {
    /// let response = client
    ///     .files()
    ///     .download_file("b!drive", "Reports/summary.xlsx", "/tmp/summary.xlsx")
    ///     .await?;
    /// println!("{:?} bytes", response.content);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn download_file(
        &self,
        drive_id: &str,
        remote_path: &str,
        local_path: impl AsRef<Path>,
    ) -> SharePointResult<SharePointResponse<u64>> {
        require("drive_id", drive_id)?;
        require("remote_path", remote_path)?;
        let local_path = local_path.as_ref();
        info!(drive_id, remote_path, local_path = %local_path.display(), "Downloading file");

        let response = self
            .executor
            .execute_streaming(ApiRequest::get(item_action(drive_id, Some(remote_path), "content")))
            .await?;

        if response.status != StatusCode::OK {
            let failed = response.collect().await?;
            warn!(status = failed.status.as_u16(), "Download failed");
            return Ok(SharePointResponse::new(failed.status, failed.headers, failed.body, None));
        }

        let StreamingResponse {
            status,
            headers,
            mut body,
        } = response;

        let mut file = tokio::fs::File::create(local_path).await?;
        let written = match write_body(&mut file, &mut body).await {
            Ok(written) => written,
            Err(e) => {
                // A truncated file must not look like a finished download.
                drop(file);
                if let Err(remove_err) = tokio::fs::remove_file(local_path).await {
                    warn!(error = %remove_err, "Failed to remove partial download");
                }
                return Err(e);
            }
        };

        info!(bytes = written, "File downloaded successfully");
        Ok(SharePointResponse::new(status, headers, Bytes::new(), Some(written)))
    }

    /// Downloads a file into memory.
    pub async fn download_file_to_memory(
        &self,
        drive_id: &str,
        remote_path: &str,
    ) -> SharePointResult<SharePointResponse<Bytes>> {
        require("drive_id", drive_id)?;
        require("remote_path", remote_path)?;
        info!(drive_id, remote_path, "Downloading file to memory");

        let response = self
            .executor
            .execute(ApiRequest::get(item_action(drive_id, Some(remote_path), "content")))
            .await?;

        let content = (response.status == StatusCode::OK).then(|| response.body.clone());
        if let Some(bytes) = &content {
            info!(bytes = bytes.len(), "File downloaded successfully");
        }
        Ok(SharePointResponse::new(
            response.status,
            response.headers,
            response.body,
            content,
        ))
    }

    /// Downloads every file with an extension in the folder at `remote_path`
    /// into `local_dir`.
    ///
    /// Folders and extension-less files are skipped. Each downloaded file is
    /// reported as passed or failed; one failure does not stop the others.
    /// The envelope carries the status of the folder listing.
    pub async fn download_all_files(
        &self,
        drive_id: &str,
        remote_path: &str,
        local_dir: impl AsRef<Path>,
    ) -> SharePointResult<SharePointResponse<Vec<DownloadReport>>> {
        let local_dir = local_dir.as_ref();
        info!(drive_id, remote_path, local_dir = %local_dir.display(), "Downloading all files");

        let folders = FoldersService::new(self.executor.clone());
        let mut listing = folders.list_dir(drive_id, Some(remote_path)).await?;
        let entries = match listing.content.take() {
            Some(entries) => entries,
            None => {
                warn!(status = listing.status_code(), "Failed to list folder contents");
                return Ok(listing.with_content(None));
            }
        };

        tokio::fs::create_dir_all(local_dir).await?;

        let folder = remote_path.trim_end_matches('/');
        let mut reports = Vec::new();
        for entry in entries.into_iter().filter(|e| e.has_extension()) {
            let remote_file = if folder.is_empty() {
                entry.name.clone()
            } else {
                format!("{}/{}", folder, entry.name)
            };

            let status = match self
                .download_file(drive_id, &remote_file, local_dir.join(&entry.name))
                .await
            {
                Ok(response) if response.has_content() => DownloadStatus::Pass,
                Ok(response) => {
                    warn!(file = %entry.name, status = response.status_code(), "Failed to download");
                    DownloadStatus::Fail
                }
                Err(e) => {
                    warn!(file = %entry.name, error = %e, "Failed to download");
                    DownloadStatus::Fail
                }
            };

            reports.push(DownloadReport { entry, status });
        }

        info!(count = reports.len(), "Folder download finished");
        Ok(listing.with_content(Some(reports)))
    }

    /// Uploads a local file to `remote_path`, replacing any existing file.
    pub async fn upload_file(
        &self,
        drive_id: &str,
        local_path: impl AsRef<Path>,
        remote_path: &str,
    ) -> SharePointResult<SharePointResponse<UploadedFile>> {
        require("drive_id", drive_id)?;
        require("remote_path", remote_path)?;
        let local_path = local_path.as_ref();
        info!(drive_id, local_path = %local_path.display(), remote_path, "Uploading file");

        let file = tokio::fs::File::open(local_path).await?;
        let request = ApiRequest::put(item_action(drive_id, Some(remote_path), "content"))
            .select::<UploadedFile>()
            .stream(Box::pin(ReaderStream::new(file)));
        let response = self.executor.execute(request).await?;

        self.uploaded(response)
    }

    /// Uploads in-memory data to `remote_path`.
    pub async fn upload_bytes(
        &self,
        drive_id: &str,
        data: Bytes,
        remote_path: &str,
    ) -> SharePointResult<SharePointResponse<UploadedFile>> {
        require("drive_id", drive_id)?;
        require("remote_path", remote_path)?;
        info!(drive_id, remote_path, bytes = data.len(), "Uploading data");

        let request = ApiRequest::put(item_action(drive_id, Some(remote_path), "content"))
            .select::<UploadedFile>()
            .bytes(data);
        let response = self.executor.execute(request).await?;

        self.uploaded(response)
    }

    fn uploaded(
        &self,
        response: HttpResponse,
    ) -> SharePointResult<SharePointResponse<UploadedFile>> {
        let envelope = self
            .executor
            .shape(response, &[StatusCode::OK, StatusCode::CREATED])?;
        if envelope.has_content() {
            info!("Upload successful");
        }
        Ok(envelope)
    }
}

async fn write_body(file: &mut tokio::fs::File, body: &mut ByteStream) -> SharePointResult<u64> {
    let mut written: u64 = 0;
    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    Ok(written)
}
