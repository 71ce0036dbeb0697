//! Site and drive shapes.

use super::fields::*;
use super::{FieldSpec, RawObject, Shape};
use crate::errors::SchemaError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

/// A SharePoint site, as returned by `get_site_info`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteInfo {
    /// Site ID (`hostname,site-collection-id,web-id`).
    pub id: String,
    /// URL name of the site.
    pub name: Option<String>,
    /// Display name of the site.
    pub display_name: Option<String>,
    /// Browser URL of the site.
    pub web_url: Option<String>,
    /// Creation time.
    pub created_date_time: DateTime<Utc>,
    /// Last modification time.
    pub last_modified_date_time: Option<DateTime<Utc>>,
}

impl Shape for SiteInfo {
    const NAME: &'static str = "SiteInfo";
    const FIELDS: &'static [FieldSpec] = &[
        ID,
        NAME_OPT,
        DISPLAY_NAME_OPT,
        WEB_URL_OPT,
        CREATED,
        LAST_MODIFIED_OPT,
    ];

    fn from_raw(raw: &RawObject<'_>) -> Result<Self, SchemaError> {
        Ok(Self {
            id: raw.required_string(&ID)?,
            name: raw.optional_string(&NAME_OPT)?,
            display_name: raw.optional_string(&DISPLAY_NAME_OPT)?,
            web_url: raw.optional_string(&WEB_URL_OPT)?,
            created_date_time: raw.required_datetime(&CREATED)?,
            last_modified_date_time: raw.optional_datetime(&LAST_MODIFIED_OPT)?,
        })
    }
}

const SITE_COLLECTION_OPT: FieldSpec = FieldSpec::optional("site_collection", "siteCollection");

/// A site together with its host details, as returned by `get_hostname_info`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HostNameInfo {
    /// Site ID.
    pub id: String,
    /// URL name of the site.
    pub name: Option<String>,
    /// Display name of the site.
    pub display_name: Option<String>,
    /// Site description.
    pub description: Option<String>,
    /// Browser URL of the site.
    pub web_url: Option<String>,
    /// Site collection facet (carries `hostname`).
    pub site_collection: Option<Map<String, Value>>,
    /// Creation time.
    pub created_date_time: DateTime<Utc>,
    /// Last modification time.
    pub last_modified_date_time: Option<DateTime<Utc>>,
}

impl HostNameInfo {
    /// Host name from the site collection facet, if present.
    pub fn hostname(&self) -> Option<&str> {
        self.site_collection
            .as_ref()
            .and_then(|sc| sc.get("hostname"))
            .and_then(Value::as_str)
    }
}

impl Shape for HostNameInfo {
    const NAME: &'static str = "HostNameInfo";
    const FIELDS: &'static [FieldSpec] = &[
        ID,
        NAME_OPT,
        DISPLAY_NAME_OPT,
        DESCRIPTION_OPT,
        WEB_URL_OPT,
        SITE_COLLECTION_OPT,
        CREATED,
        LAST_MODIFIED_OPT,
    ];

    fn from_raw(raw: &RawObject<'_>) -> Result<Self, SchemaError> {
        Ok(Self {
            id: raw.required_string(&ID)?,
            name: raw.optional_string(&NAME_OPT)?,
            display_name: raw.optional_string(&DISPLAY_NAME_OPT)?,
            description: raw.optional_string(&DESCRIPTION_OPT)?,
            web_url: raw.optional_string(&WEB_URL_OPT)?,
            site_collection: raw.optional_object(&SITE_COLLECTION_OPT)?.cloned(),
            created_date_time: raw.required_datetime(&CREATED)?,
            last_modified_date_time: raw.optional_datetime(&LAST_MODIFIED_OPT)?,
        })
    }
}

const DRIVE_TYPE_OPT: FieldSpec = FieldSpec::optional("drive_type", "driveType");

/// A document library, as returned by `list_drives`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriveInfo {
    /// Drive ID.
    pub id: String,
    /// Drive name.
    pub name: Option<String>,
    /// Drive description.
    pub description: Option<String>,
    /// Browser URL of the drive.
    pub web_url: Option<String>,
    /// Drive type (`documentLibrary`, `business`, `personal`).
    pub drive_type: Option<String>,
    /// Creation time.
    pub created_date_time: DateTime<Utc>,
    /// Last modification time.
    pub last_modified_date_time: Option<DateTime<Utc>>,
}

impl Shape for DriveInfo {
    const NAME: &'static str = "DriveInfo";
    const FIELDS: &'static [FieldSpec] = &[
        ID,
        NAME_OPT,
        DESCRIPTION_OPT,
        WEB_URL_OPT,
        DRIVE_TYPE_OPT,
        CREATED,
        LAST_MODIFIED_OPT,
    ];

    fn from_raw(raw: &RawObject<'_>) -> Result<Self, SchemaError> {
        Ok(Self {
            id: raw.required_string(&ID)?,
            name: raw.optional_string(&NAME_OPT)?,
            description: raw.optional_string(&DESCRIPTION_OPT)?,
            web_url: raw.optional_string(&WEB_URL_OPT)?,
            drive_type: raw.optional_string(&DRIVE_TYPE_OPT)?,
            created_date_time: raw.required_datetime(&CREATED)?,
            last_modified_date_time: raw.optional_datetime(&LAST_MODIFIED_OPT)?,
        })
    }
}
