//! Drive item shapes (folders and files).

use super::fields::*;
use super::raw::derive_extension;
use super::{FieldSpec, RawObject, Shape};
use crate::errors::SchemaError;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Folder metadata, as returned by `get_dir_info`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirInfo {
    /// Item ID.
    pub id: String,
    /// Folder name.
    pub name: Option<String>,
    /// Browser URL.
    pub web_url: Option<String>,
    /// Total size of the folder contents in bytes.
    pub size: Option<i64>,
    /// Creation time.
    pub created_date_time: DateTime<Utc>,
    /// Last modification time.
    pub last_modified_date_time: Option<DateTime<Utc>>,
}

impl Shape for DirInfo {
    const NAME: &'static str = "DirInfo";
    const FIELDS: &'static [FieldSpec] = &[
        ID,
        NAME_OPT,
        WEB_URL_OPT,
        SIZE_OPT,
        CREATED,
        LAST_MODIFIED_OPT,
    ];

    fn from_raw(raw: &RawObject<'_>) -> Result<Self, SchemaError> {
        Ok(Self {
            id: raw.required_string(&ID)?,
            name: raw.optional_string(&NAME_OPT)?,
            web_url: raw.optional_string(&WEB_URL_OPT)?,
            size: raw.optional_i64(&SIZE_OPT)?,
            created_date_time: raw.required_datetime(&CREATED)?,
            last_modified_date_time: raw.optional_datetime(&LAST_MODIFIED_OPT)?,
        })
    }
}

/// One child of a folder, as returned by `list_dir`.
///
/// `extension` is `None` for folders and for files without a `.` in
/// their name. `path` is the folder that was listed; the record built from
/// the raw object leaves it unset until the listing operation fills it in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirEntry {
    /// Item ID.
    pub id: String,
    /// Item name.
    pub name: String,
    /// File extension, derived from `name`.
    pub extension: Option<String>,
    /// Size in bytes.
    pub size: Option<i64>,
    /// Folder the entry was listed from.
    pub path: Option<String>,
    /// Browser URL.
    pub web_url: Option<String>,
    /// Creation time.
    pub created_date_time: DateTime<Utc>,
    /// Last modification time.
    pub last_modified_date_time: Option<DateTime<Utc>>,
    /// Display name of the last modifying user.
    pub last_modified_by_name: Option<String>,
    /// Email of the last modifying user.
    pub last_modified_by_email: Option<String>,
}

impl DirEntry {
    /// Sets the folder the entry was listed from.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Returns true if the entry is a file with an extension.
    pub fn has_extension(&self) -> bool {
        self.extension.is_some()
    }
}

impl Shape for DirEntry {
    const NAME: &'static str = "DirEntry";
    const FIELDS: &'static [FieldSpec] = &[
        ID,
        NAME_REQ,
        SIZE_OPT,
        WEB_URL_OPT,
        FOLDER,
        CREATED,
        LAST_MODIFIED_OPT,
        LAST_MODIFIED_BY,
    ];
    const DERIVED: &'static [&'static str] = &[
        "extension",
        "path",
        "last_modified_by_name",
        "last_modified_by_email",
    ];

    fn from_raw(raw: &RawObject<'_>) -> Result<Self, SchemaError> {
        let id = raw.required_string(&ID)?;
        let name = raw.required_string(&NAME_REQ)?;
        let size = raw.optional_i64(&SIZE_OPT)?;
        let web_url = raw.optional_string(&WEB_URL_OPT)?;
        let folder = raw.optional_object(&FOLDER)?;
        let created_date_time = raw.required_datetime(&CREATED)?;
        let last_modified_date_time = raw.optional_datetime(&LAST_MODIFIED_OPT)?;
        let last_modified_by = raw.optional_object(&LAST_MODIFIED_BY)?;

        let extension = derive_extension(&name, folder);
        let last_modified_by_name =
            raw.principal_user_field(last_modified_by, "displayName", "last_modified_by_name")?;
        let last_modified_by_email =
            raw.principal_user_field(last_modified_by, "email", "last_modified_by_email")?;

        Ok(Self {
            id,
            name,
            extension,
            size,
            path: None,
            web_url,
            created_date_time,
            last_modified_date_time,
            last_modified_by_name,
            last_modified_by_email,
        })
    }
}

/// A newly created folder, as returned by `create_dir`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatedDir {
    /// Item ID.
    pub id: String,
    /// Folder name.
    pub name: Option<String>,
    /// Browser URL.
    pub web_url: Option<String>,
    /// Creation time.
    pub created_date_time: DateTime<Utc>,
}

impl Shape for CreatedDir {
    const NAME: &'static str = "CreatedDir";
    const FIELDS: &'static [FieldSpec] = &[ID, NAME_OPT, WEB_URL_OPT, CREATED];

    fn from_raw(raw: &RawObject<'_>) -> Result<Self, SchemaError> {
        Ok(Self {
            id: raw.required_string(&ID)?,
            name: raw.optional_string(&NAME_OPT)?,
            web_url: raw.optional_string(&WEB_URL_OPT)?,
            created_date_time: raw.required_datetime(&CREATED)?,
        })
    }
}

/// A renamed folder, as returned by `rename_folder`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenamedFolder {
    /// Item ID.
    pub id: String,
    /// New folder name.
    pub name: String,
    /// Browser URL.
    pub web_url: Option<String>,
    /// Creation time.
    pub created_date_time: DateTime<Utc>,
    /// Last modification time.
    pub last_modified_date_time: Option<DateTime<Utc>>,
}

impl Shape for RenamedFolder {
    const NAME: &'static str = "RenamedFolder";
    const FIELDS: &'static [FieldSpec] = &[ID, NAME_REQ, WEB_URL_OPT, CREATED, LAST_MODIFIED_OPT];

    fn from_raw(raw: &RawObject<'_>) -> Result<Self, SchemaError> {
        Ok(Self {
            id: raw.required_string(&ID)?,
            name: raw.required_string(&NAME_REQ)?,
            web_url: raw.optional_string(&WEB_URL_OPT)?,
            created_date_time: raw.required_datetime(&CREATED)?,
            last_modified_date_time: raw.optional_datetime(&LAST_MODIFIED_OPT)?,
        })
    }
}

/// File metadata, as returned by `get_file_info`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileInfo {
    /// Item ID.
    pub id: String,
    /// File name.
    pub name: String,
    /// Browser URL.
    pub web_url: Option<String>,
    /// Size in bytes.
    pub size: Option<i64>,
    /// Creation time.
    pub created_date_time: DateTime<Utc>,
    /// Last modification time.
    pub last_modified_date_time: Option<DateTime<Utc>>,
    /// Email of the last modifying user.
    pub last_modified_by_email: Option<String>,
}

impl Shape for FileInfo {
    const NAME: &'static str = "FileInfo";
    const FIELDS: &'static [FieldSpec] = &[
        ID,
        NAME_REQ,
        WEB_URL_OPT,
        SIZE_OPT,
        CREATED,
        LAST_MODIFIED_OPT,
        LAST_MODIFIED_BY,
    ];
    const DERIVED: &'static [&'static str] = &["last_modified_by_email"];

    fn from_raw(raw: &RawObject<'_>) -> Result<Self, SchemaError> {
        let last_modified_by = raw.optional_object(&LAST_MODIFIED_BY)?;

        Ok(Self {
            id: raw.required_string(&ID)?,
            name: raw.required_string(&NAME_REQ)?,
            web_url: raw.optional_string(&WEB_URL_OPT)?,
            size: raw.optional_i64(&SIZE_OPT)?,
            created_date_time: raw.required_datetime(&CREATED)?,
            last_modified_date_time: raw.optional_datetime(&LAST_MODIFIED_OPT)?,
            last_modified_by_email: raw.principal_user_field(
                last_modified_by,
                "email",
                "last_modified_by_email",
            )?,
        })
    }
}

/// A moved file, as returned by `move_file`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovedFile {
    /// Item ID.
    pub id: String,
    /// File name at the destination.
    pub name: String,
    /// Browser URL.
    pub web_url: Option<String>,
    /// Size in bytes.
    pub size: Option<i64>,
    /// Creation time.
    pub created_date_time: DateTime<Utc>,
    /// Last modification time.
    pub last_modified_date_time: Option<DateTime<Utc>>,
}

impl Shape for MovedFile {
    const NAME: &'static str = "MovedFile";
    const FIELDS: &'static [FieldSpec] = &[
        ID,
        NAME_REQ,
        WEB_URL_OPT,
        SIZE_OPT,
        CREATED,
        LAST_MODIFIED_OPT,
    ];

    fn from_raw(raw: &RawObject<'_>) -> Result<Self, SchemaError> {
        Ok(Self {
            id: raw.required_string(&ID)?,
            name: raw.required_string(&NAME_REQ)?,
            web_url: raw.optional_string(&WEB_URL_OPT)?,
            size: raw.optional_i64(&SIZE_OPT)?,
            created_date_time: raw.required_datetime(&CREATED)?,
            last_modified_date_time: raw.optional_datetime(&LAST_MODIFIED_OPT)?,
        })
    }
}

/// A renamed file, as returned by `rename_file`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenamedFile {
    /// Item ID.
    pub id: String,
    /// New file name.
    pub name: String,
    /// Browser URL.
    pub web_url: Option<String>,
    /// Size in bytes.
    pub size: Option<i64>,
    /// Creation time.
    pub created_date_time: DateTime<Utc>,
    /// Last modification time.
    pub last_modified_date_time: Option<DateTime<Utc>>,
}

impl Shape for RenamedFile {
    const NAME: &'static str = "RenamedFile";
    const FIELDS: &'static [FieldSpec] = &[
        ID,
        NAME_REQ,
        WEB_URL_OPT,
        SIZE_OPT,
        CREATED,
        LAST_MODIFIED_OPT,
    ];

    fn from_raw(raw: &RawObject<'_>) -> Result<Self, SchemaError> {
        Ok(Self {
            id: raw.required_string(&ID)?,
            name: raw.required_string(&NAME_REQ)?,
            web_url: raw.optional_string(&WEB_URL_OPT)?,
            size: raw.optional_i64(&SIZE_OPT)?,
            created_date_time: raw.required_datetime(&CREATED)?,
            last_modified_date_time: raw.optional_datetime(&LAST_MODIFIED_OPT)?,
        })
    }
}

/// An uploaded file, as returned by `upload_file`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadedFile {
    /// Item ID.
    pub id: String,
    /// File name.
    pub name: Option<String>,
    /// Size in bytes.
    pub size: Option<i64>,
}

impl Shape for UploadedFile {
    const NAME: &'static str = "UploadedFile";
    const FIELDS: &'static [FieldSpec] = &[ID, NAME_OPT, SIZE_OPT];

    fn from_raw(raw: &RawObject<'_>) -> Result<Self, SchemaError> {
        Ok(Self {
            id: raw.required_string(&ID)?,
            name: raw.optional_string(&NAME_OPT)?,
            size: raw.optional_i64(&SIZE_OPT)?,
        })
    }
}
