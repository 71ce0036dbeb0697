//! SharePoint lists.

use super::require;
use crate::client::{collection, parse_json, ApiRequest, RequestExecutor, ACCEPT_JSON_NO_METADATA};
use crate::errors::{SharePointError, SharePointResult};
use crate::types::requests::AddListItemRequest;
use crate::types::{AddedListItem, ListColumn, ListInfo, SharePointResponse};
use reqwest::StatusCode;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::info;

/// Service for list operations.
pub struct ListsService {
    executor: Arc<RequestExecutor>,
}

impl ListsService {
    /// Creates a new lists service.
    pub(crate) fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    /// Lists the lists of a site.
    pub async fn list_lists(
        &self,
        site_id: &str,
    ) -> SharePointResult<SharePointResponse<Vec<ListInfo>>> {
        require("site_id", site_id)?;
        info!(site_id, "Listing lists");

        let response = self
            .executor
            .execute(ApiRequest::get(format!("sites/{}/lists", site_id)).select::<ListInfo>())
            .await?;

        let envelope = self.executor.shape_list(response, &[StatusCode::OK])?;
        if let Some(lists) = &envelope.content {
            info!(count = lists.len(), "Request successful");
        }
        Ok(envelope)
    }

    /// Lists the column definitions of a list.
    pub async fn list_list_columns(
        &self,
        site_id: &str,
        list_id: &str,
    ) -> SharePointResult<SharePointResponse<Vec<ListColumn>>> {
        require("site_id", site_id)?;
        require("list_id", list_id)?;
        info!(site_id, list_id, "Listing list columns");

        let path = format!("sites/{}/lists/{}/columns", site_id, list_id);
        let response = self
            .executor
            .execute(ApiRequest::get(path).select::<ListColumn>())
            .await?;

        let envelope = self.executor.shape_list(response, &[StatusCode::OK])?;
        if let Some(columns) = &envelope.content {
            info!(count = columns.len(), "Request successful");
        }
        Ok(envelope)
    }

    /// Lists the items of a list, returning each item's column values.
    ///
    /// `fields` is a comma-separated list of internal column names to expand.
    /// Column values have no fixed shape, so they are returned as raw JSON
    /// objects.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use integrations_sharepoint::*;
    /// # async fn example(client: SharePointClient) -> SharePointResult<()> {
    /// let items = client.lists().list_list_items("site", "list", "Title,Status").await?;
    /// for fields in items.content.unwrap_or_default() {
    ///     println!("{:?}", fields.get("Title"));
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list_list_items(
        &self,
        site_id: &str,
        list_id: &str,
        fields: &str,
    ) -> SharePointResult<SharePointResponse<Vec<Map<String, Value>>>> {
        require("site_id", site_id)?;
        require("list_id", list_id)?;
        info!(site_id, list_id, fields, "Listing list items");

        let path = format!("sites/{}/lists/{}/items", site_id, list_id);
        let request = ApiRequest::get(path)
            .query("select", fields)
            .query("expand", "fields")
            .accept(ACCEPT_JSON_NO_METADATA);
        let response = self.executor.execute(request).await?;

        let content = if response.status == StatusCode::OK {
            let raw = parse_json(&response.body)?;
            Some(item_fields(collection(&raw)?)?)
        } else {
            None
        };
        if let Some(items) = &content {
            info!(count = items.len(), "Request successful");
        }
        Ok(SharePointResponse::new(
            response.status,
            response.headers,
            response.body,
            content,
        ))
    }

    /// Deletes a list item.
    pub async fn delete_list_item(
        &self,
        site_id: &str,
        list_id: &str,
        item_id: &str,
    ) -> SharePointResult<SharePointResponse<()>> {
        require("site_id", site_id)?;
        require("list_id", list_id)?;
        require("item_id", item_id)?;
        info!(site_id, list_id, item_id, "Deleting list item");

        let path = format!("sites/{}/lists/{}/items/{}", site_id, list_id, item_id);
        let response = self.executor.execute(ApiRequest::delete(path)).await?;

        let envelope = self.executor.unit(response, &[StatusCode::NO_CONTENT]);
        if envelope.has_content() {
            info!("Request successful");
        }
        Ok(envelope)
    }

    /// Adds an item with the given column values.
    pub async fn add_list_item(
        &self,
        site_id: &str,
        list_id: &str,
        item: Map<String, Value>,
    ) -> SharePointResult<SharePointResponse<AddedListItem>> {
        require("site_id", site_id)?;
        require("list_id", list_id)?;
        info!(site_id, list_id, "Adding list item");

        let path = format!("sites/{}/lists/{}/items", site_id, list_id);
        let request = ApiRequest::post(path)
            .select::<AddedListItem>()
            .json(&AddListItemRequest { fields: item })?;
        let response = self.executor.execute(request).await?;

        let envelope = self.executor.shape(response, &[StatusCode::CREATED])?;
        if envelope.has_content() {
            info!("Request successful");
        }
        Ok(envelope)
    }
}

fn item_fields(items: &[Value]) -> SharePointResult<Vec<Map<String, Value>>> {
    items
        .iter()
        .map(|item| {
            item.get("fields")
                .and_then(Value::as_object)
                .cloned()
                .ok_or_else(|| {
                    SharePointError::unexpected_format("List item without a `fields` object")
                })
        })
        .collect()
}
