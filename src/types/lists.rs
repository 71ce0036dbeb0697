//! SharePoint list shapes.

use super::fields::*;
use super::{FieldSpec, RawObject, Shape};
use crate::errors::SchemaError;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A SharePoint list, as returned by `list_lists`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListInfo {
    /// List ID.
    pub id: String,
    /// Internal list name.
    pub name: Option<String>,
    /// Display name.
    pub display_name: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Browser URL.
    pub web_url: Option<String>,
    /// Creation time.
    pub created_date_time: DateTime<Utc>,
    /// Last modification time.
    pub last_modified_date_time: Option<DateTime<Utc>>,
}

impl Shape for ListInfo {
    const NAME: &'static str = "ListInfo";
    const FIELDS: &'static [FieldSpec] = &[
        ID,
        NAME_OPT,
        DISPLAY_NAME_OPT,
        DESCRIPTION_OPT,
        WEB_URL_OPT,
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
            created_date_time: raw.required_datetime(&CREATED)?,
            last_modified_date_time: raw.optional_datetime(&LAST_MODIFIED_OPT)?,
        })
    }
}

const DISPLAY_NAME: FieldSpec = FieldSpec::required("display_name", "displayName");
const DESCRIPTION: FieldSpec = FieldSpec::required("description", "description");
const COLUMN_GROUP: FieldSpec = FieldSpec::required("column_group", "columnGroup");
const ENFORCE_UNIQUE_VALUES: FieldSpec =
    FieldSpec::required("enforce_unique_values", "enforceUniqueValues");
const HIDDEN: FieldSpec = FieldSpec::required("hidden", "hidden");
const INDEXED: FieldSpec = FieldSpec::required("indexed", "indexed");
const READ_ONLY: FieldSpec = FieldSpec::required("read_only", "readOnly");
const REQUIRED: FieldSpec = FieldSpec::required("required", "required");

/// A column definition, as returned by `list_list_columns`.
///
/// Every field is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListColumn {
    /// Column ID.
    pub id: String,
    /// Internal (API) name.
    pub name: String,
    /// Display name.
    pub display_name: String,
    /// Description.
    pub description: String,
    /// Group the column belongs to.
    pub column_group: String,
    /// Whether values must be unique.
    pub enforce_unique_values: bool,
    /// Whether the column is hidden.
    pub hidden: bool,
    /// Whether the column is indexed.
    pub indexed: bool,
    /// Whether the column is read-only.
    pub read_only: bool,
    /// Whether a value is required.
    pub required: bool,
}

impl Shape for ListColumn {
    const NAME: &'static str = "ListColumn";
    const FIELDS: &'static [FieldSpec] = &[
        ID,
        NAME_REQ,
        DISPLAY_NAME,
        DESCRIPTION,
        COLUMN_GROUP,
        ENFORCE_UNIQUE_VALUES,
        HIDDEN,
        INDEXED,
        READ_ONLY,
        REQUIRED,
    ];

    fn from_raw(raw: &RawObject<'_>) -> Result<Self, SchemaError> {
        Ok(Self {
            id: raw.required_string(&ID)?,
            name: raw.required_string(&NAME_REQ)?,
            display_name: raw.required_string(&DISPLAY_NAME)?,
            description: raw.required_string(&DESCRIPTION)?,
            column_group: raw.required_string(&COLUMN_GROUP)?,
            enforce_unique_values: raw.required_bool(&ENFORCE_UNIQUE_VALUES)?,
            hidden: raw.required_bool(&HIDDEN)?,
            indexed: raw.required_bool(&INDEXED)?,
            read_only: raw.required_bool(&READ_ONLY)?,
            required: raw.required_bool(&REQUIRED)?,
        })
    }
}

/// A newly added list item, as returned by `add_list_item`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddedListItem {
    /// Item ID.
    pub id: String,
    /// Item name.
    pub name: Option<String>,
    /// Browser URL.
    pub web_url: Option<String>,
    /// Creation time.
    pub created_date_time: DateTime<Utc>,
}

impl Shape for AddedListItem {
    const NAME: &'static str = "AddedListItem";
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{validate_many, validate_one, DerivationPolicy};
    use serde_json::json;

    fn column(title: &str, hidden: bool) -> serde_json::Value {
        json!({
            "id": format!("col-{}", title),
            "name": title,
            "displayName": title,
            "description": "",
            "columnGroup": "Custom Columns",
            "enforceUniqueValues": false,
            "hidden": hidden,
            "indexed": false,
            "readOnly": false,
            "required": title == "Title",
        })
    }

    #[test]
    fn test_list_columns() {
        let raw = vec![column("Title", false), column("ContentType", true)];

        let columns: Vec<ListColumn> = validate_many(&raw, DerivationPolicy::Lenient).unwrap();

        assert_eq!(columns.len(), 2);
        assert!(columns[0].required);
        assert!(columns[1].hidden);
        assert_eq!(columns[1].column_group, "Custom Columns");
    }

    #[test]
    fn test_list_column_boolean_must_be_boolean() {
        let mut raw = column("Title", false);
        raw["hidden"] = json!("false");

        let err = validate_one::<ListColumn>(&raw, DerivationPolicy::Lenient).unwrap_err();

        assert_eq!(
            err,
            SchemaError::TypeMismatch {
                shape: "ListColumn",
                field: "hidden",
                expected: "boolean",
                found: "string".to_string(),
            }
        );
    }

    #[test]
    fn test_list_info_optional_fields() {
        let raw = json!({
            "id": "e11f111b",
            "displayName": "Tasks",
            "description": null,
            "createdDateTime": "2024-01-01T00:00:00Z",
        });

        let list: ListInfo = validate_one(&raw, DerivationPolicy::Lenient).unwrap();

        assert_eq!(list.display_name.as_deref(), Some("Tasks"));
        assert_eq!(list.description, None);
        assert_eq!(list.name, None);
    }

    #[test]
    fn test_added_list_item() {
        let raw = json!({
            "id": "17",
            "webUrl": "https://contoso.sharepoint.com/sites/x/Lists/Tasks/17_.000",
            "createdDateTime": "2024-01-01T00:00:00Z",
            "fields": {"Title": "Hello World"},
        });

        let item: AddedListItem = validate_one(&raw, DerivationPolicy::Lenient).unwrap();

        assert_eq!(item.id, "17");
        let serialized = serde_json::to_value(&item).unwrap();
        assert!(serialized.get("fields").is_none());
    }
}
