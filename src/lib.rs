//! SharePoint Integration Module
//!
//! A typed client for SharePoint document libraries and lists over the
//! Microsoft Graph API. Every response is normalized into a record with a
//! fixed shape: remote camel-case fields become snake-case fields, required
//! fields are checked, and convenience fields (file extension, last
//! modifier's name and email) are derived from nested objects.
//!
//! # Features
//!
//! - **Sites**: Resolve sites by name, host names, document libraries
//! - **Folders**: Inspect, list, create, delete and rename folders
//! - **Files**: Inspect, copy, move, delete, rename, stream downloads and uploads
//! - **Lists**: Lists, column definitions, items
//! - **Authentication**: Client credentials with cached tokens
//! - **Response Shapes**: Validated records with derived fields
//!
//! # Example
//!
//! ```no_run
//! use integrations_sharepoint::{SharePointClient, SharePointConfig};
//! use secrecy::SecretString;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SharePointConfig::builder()
//!     .client_credentials(
//!         "contoso.onmicrosoft.com",
//!         "00000000-0000-0000-0000-000000000000",
//!         SecretString::new("client_secret".into()),
//!     )
//!     .sp_domain("contoso.sharepoint.com")
//!     .build()?;
//!
//! let client = SharePointClient::new(config)?;
//!
//! let site = client.sites().get_site_info("Finance").await?.into_result()?;
//! let drives = client.sites().list_drives(&site.id).await?;
//! for drive in drives.content.unwrap_or_default() {
//!     println!("{}: {:?}", drive.id, drive.name);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

// Core modules
pub mod auth;
pub mod client;
pub mod config;
pub mod errors;
pub mod mocks;
pub mod services;
pub mod transport;
pub mod types;

// Re-exports for convenience
pub use auth::{AccessToken, AuthProvider, ClientCredentialsProvider, StaticTokenProvider};
pub use client::{SharePointClient, SharePointClientBuilder};
pub use config::{SharePointConfig, SharePointConfigBuilder};
pub use errors::{SchemaError, SharePointError, SharePointResult};
pub use types::{DerivationPolicy, SharePointResponse};

/// Prelude module with commonly used types and traits.
///
/// ```no_run
/// use integrations_sharepoint::prelude::*;
/// ```
pub mod prelude {
    // Client
    pub use crate::client::{SharePointClient, SharePointClientBuilder};

    // Configuration
    pub use crate::config::{SharePointConfig, SharePointConfigBuilder};

    // Authentication
    pub use crate::auth::{AccessToken, AuthProvider, ClientCredentialsProvider, StaticTokenProvider};

    // Services
    pub use crate::services::{FilesService, FoldersService, ListsService, SitesService};

    // Response shapes
    pub use crate::types::{
        AddedListItem, CreatedDir, DirEntry, DirInfo, DownloadReport, DownloadStatus, DriveInfo,
        FileInfo, HostNameInfo, ListColumn, ListInfo, MovedFile, RenamedFile, RenamedFolder,
        SharePointResponse, SiteInfo, UploadedFile,
    };

    // Schema
    pub use crate::types::{validate_many, validate_one, DerivationPolicy, Shape};

    // Errors
    pub use crate::errors::{SchemaError, SharePointError, SharePointResult};
}
