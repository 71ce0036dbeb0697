//! Response shapes for the SharePoint API.
//!
//! Every operation that returns data has one shape: a record type that
//! declares which remote (camel-case) fields it reads, which of them are
//! required, and which derived fields it computes. Shapes are built in two
//! phases. Declared fields are parsed first, then derived fields are
//! computed from the parsed values and the raw nested objects. Raw-only
//! objects (the `folder` facet, the `lastModifiedBy` identity set) are
//! consumed during derivation and never stored on the record, so the
//! serialized form of a record only ever contains its exposed fields.

mod items;
mod lists;
mod raw;
pub mod requests;
mod response;
mod sites;

pub use items::{
    CreatedDir, DirEntry, DirInfo, FileInfo, MovedFile, RenamedFile, RenamedFolder, UploadedFile,
};
pub use lists::{AddedListItem, ListColumn, ListInfo};
pub use raw::RawObject;
pub use response::{DownloadReport, DownloadStatus, SharePointResponse};
pub use sites::{DriveInfo, HostNameInfo, SiteInfo};

use crate::errors::SchemaError;
use serde::Serialize;
use serde_json::Value;

/// Role a declared remote field plays in a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    /// Must be present and well-typed.
    Required,
    /// May be absent or `null`.
    Optional,
    /// Consumed to compute derived fields, never exposed.
    RawOnly,
}

/// One row of a shape's static field table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Normalized (snake-case) name.
    pub name: &'static str,
    /// Remote (camel-case) name used by the service.
    pub remote: &'static str,
    /// Role in the shape.
    pub role: FieldRole,
}

impl FieldSpec {
    /// Declares a required field.
    pub const fn required(name: &'static str, remote: &'static str) -> Self {
        Self {
            name,
            remote,
            role: FieldRole::Required,
        }
    }

    /// Declares an optional field.
    pub const fn optional(name: &'static str, remote: &'static str) -> Self {
        Self {
            name,
            remote,
            role: FieldRole::Optional,
        }
    }

    /// Declares a raw-only field.
    pub const fn raw_only(name: &'static str, remote: &'static str) -> Self {
        Self {
            name,
            remote,
            role: FieldRole::RawOnly,
        }
    }

    /// Returns true if the normalized record exposes this field.
    pub fn is_exposed(&self) -> bool {
        self.role != FieldRole::RawOnly
    }
}

/// How derived fields react to incomplete derivation inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DerivationPolicy {
    /// Unresolvable derivations become `None`.
    #[default]
    Lenient,
    /// A present-but-incomplete derivation input fails validation.
    Strict,
}

/// A normalized response shape.
pub trait Shape: Sized + Serialize {
    /// Shape name used in error reports.
    const NAME: &'static str;

    /// Static table of declared remote fields.
    const FIELDS: &'static [FieldSpec];

    /// Normalized names of derived fields.
    const DERIVED: &'static [&'static str] = &[];

    /// Builds the record from one raw object.
    fn from_raw(raw: &RawObject<'_>) -> Result<Self, SchemaError>;
}

/// Validates a single raw JSON object against a shape.
pub fn validate_one<S: Shape>(raw: &Value, policy: DerivationPolicy) -> Result<S, SchemaError> {
    let map = raw.as_object().ok_or_else(|| SchemaError::TypeMismatch {
        shape: S::NAME,
        field: "$",
        expected: "object",
        found: raw::json_kind(raw).to_string(),
    })?;
    S::from_raw(&RawObject::new(S::NAME, map, policy))
}

/// Validates every raw object in order, failing on the first invalid one.
///
/// No partial list is returned when any member fails.
pub fn validate_many<S: Shape>(
    raw: &[Value],
    policy: DerivationPolicy,
) -> Result<Vec<S>, SchemaError> {
    raw.iter().map(|item| validate_one::<S>(item, policy)).collect()
}

/// Remote field names the shape depends on, in table order.
pub fn field_projection<S: Shape>() -> Vec<&'static str> {
    S::FIELDS.iter().map(|f| f.remote).collect()
}

/// `$select` value for a shape.
pub fn select_clause<S: Shape>() -> String {
    field_projection::<S>().join(",")
}

/// Normalized names present in a record's serialized form.
pub fn exposed_fields<S: Shape>() -> Vec<&'static str> {
    S::FIELDS
        .iter()
        .filter(|f| f.is_exposed())
        .map(|f| f.name)
        .chain(S::DERIVED.iter().copied())
        .collect()
}

/// Field declarations shared across shapes.
pub(crate) mod fields {
    use super::FieldSpec;

    pub const ID: FieldSpec = FieldSpec::required("id", "id");
    pub const NAME_REQ: FieldSpec = FieldSpec::required("name", "name");
    pub const NAME_OPT: FieldSpec = FieldSpec::optional("name", "name");
    pub const DISPLAY_NAME_OPT: FieldSpec = FieldSpec::optional("display_name", "displayName");
    pub const DESCRIPTION_OPT: FieldSpec = FieldSpec::optional("description", "description");
    pub const WEB_URL_OPT: FieldSpec = FieldSpec::optional("web_url", "webUrl");
    pub const SIZE_OPT: FieldSpec = FieldSpec::optional("size", "size");
    pub const CREATED: FieldSpec = FieldSpec::required("created_date_time", "createdDateTime");
    pub const LAST_MODIFIED_OPT: FieldSpec =
        FieldSpec::optional("last_modified_date_time", "lastModifiedDateTime");
    pub const FOLDER: FieldSpec = FieldSpec::raw_only("folder", "folder");
    pub const LAST_MODIFIED_BY: FieldSpec = FieldSpec::raw_only("last_modified_by", "lastModifiedBy");
}
