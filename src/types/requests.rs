//! Request bodies sent to the Graph API.

use serde::Serialize;
use serde_json::{Map, Value};

/// How the service resolves a name collision when creating an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConflictBehavior {
    /// Fail the request.
    Fail,
    /// Pick a new unique name.
    Rename,
    /// Overwrite the existing item.
    #[default]
    Replace,
}

/// Empty facet marking an item as a folder.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FolderFacet {}

/// Request to create a folder.
#[derive(Debug, Clone, Serialize)]
pub struct CreateFolderRequest {
    /// Folder name.
    pub name: String,
    /// Folder facet.
    pub folder: FolderFacet,
    /// Collision handling.
    #[serde(rename = "@microsoft.graph.conflictBehavior")]
    pub conflict_behavior: ConflictBehavior,
}

impl CreateFolderRequest {
    /// Creates a request that replaces an existing folder of the same name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            folder: FolderFacet::default(),
            conflict_behavior: ConflictBehavior::Replace,
        }
    }
}

/// Request to rename an item.
#[derive(Debug, Clone, Serialize)]
pub struct RenameItemRequest {
    /// New name.
    pub name: String,
}

/// Reference to a parent location.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemReference {
    /// Parent item ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Drive ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drive_id: Option<String>,
    /// Drive type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drive_type: Option<String>,
    /// Path of the parent (`/drives/{id}/root:/...`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Request to copy an item.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyItemRequest {
    /// Destination folder.
    pub parent_reference: ItemReference,
    /// Name for the copy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl CopyItemRequest {
    /// Copies into `target_path` of the same document library.
    pub fn within_drive(drive_id: &str, target_path: &str, new_name: Option<String>) -> Self {
        Self {
            parent_reference: ItemReference {
                drive_id: Some(drive_id.to_string()),
                drive_type: Some("documentLibrary".to_string()),
                path: Some(format!("/drives/{}/root:/{}", drive_id, target_path)),
                ..Default::default()
            },
            name: new_name,
        }
    }
}

/// Request to move an item.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveItemRequest {
    /// Destination folder.
    pub parent_reference: ItemReference,
    /// Name at the destination.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl MoveItemRequest {
    /// Moves into the folder with `folder_id`.
    pub fn to_folder(folder_id: impl Into<String>, new_name: Option<String>) -> Self {
        Self {
            parent_reference: ItemReference {
                id: Some(folder_id.into()),
                ..Default::default()
            },
            name: new_name,
        }
    }
}

/// Request to add a list item.
#[derive(Debug, Clone, Serialize)]
pub struct AddListItemRequest {
    /// Column values keyed by internal column name.
    pub fields: Map<String, Value>,
}
