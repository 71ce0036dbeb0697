//! Integration tests for the lists service.

mod common;

use common::*;
use integrations_sharepoint::mocks::MockHttpTransport;
use integrations_sharepoint::transport::HttpMethod;
use integrations_sharepoint::SharePointError;
use serde_json::{json, Map, Value};
use std::sync::Arc;

fn column(name: &str, required: bool) -> Value {
    json!({
        "id": format!("col-{}", name),
        "name": name,
        "displayName": name,
        "description": "",
        "columnGroup": "Custom Columns",
        "enforceUniqueValues": false,
        "hidden": false,
        "indexed": false,
        "readOnly": false,
        "required": required,
    })
}

#[tokio::test]
async fn test_list_lists() {
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_json(
        200,
        json!({
            "value": [
                {
                    "id": "list-1",
                    "name": "Tasks",
                    "displayName": "Tasks",
                    "createdDateTime": "2023-01-01T00:00:00Z",
                },
                {
                    "id": "list-2",
                    "displayName": "Invoices",
                    "description": "Supplier invoices",
                    "createdDateTime": "2023-02-01T00:00:00Z",
                }
            ]
        }),
    );
    let client = client(transport.clone());

    let response = client.lists().list_lists(SITE).await.unwrap();

    let lists = response.content.unwrap();
    assert_eq!(lists.len(), 2);
    assert_eq!(lists[0].name.as_deref(), Some("Tasks"));
    assert_eq!(lists[1].name, None);
    assert_eq!(lists[1].description.as_deref(), Some("Supplier invoices"));
    transport.verify_request(0, HttpMethod::Get, "/sites/contoso.sharepoint.com,1111,2222/lists");
}

#[tokio::test]
async fn test_list_list_columns() {
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_json(
        200,
        json!({"value": [column("Title", true), column("Status", false)]}),
    );
    let client = client(transport.clone());

    let response = client.lists().list_list_columns(SITE, "list-1").await.unwrap();

    let columns = response.content.unwrap();
    assert_eq!(columns[0].name, "Title");
    assert!(columns[0].required);
    assert!(!columns[1].required);
    assert_eq!(columns[1].column_group, "Custom Columns");
    transport.verify_request(0, HttpMethod::Get, "/lists/list-1/columns");
}

#[tokio::test]
async fn test_list_list_columns_rejects_partial_column() {
    let transport = Arc::new(MockHttpTransport::new());
    let mut partial = column("Status", false);
    partial.as_object_mut().unwrap().remove("hidden");
    transport.enqueue_json(200, json!({"value": [column("Title", true), partial]}));
    let client = client(transport);

    let err = client
        .lists()
        .list_list_columns(SITE, "list-1")
        .await
        .unwrap_err();

    match err {
        SharePointError::Schema(schema) => {
            assert_eq!(schema.shape(), "ListColumn");
            assert_eq!(schema.field(), "hidden");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_list_list_items() {
    // Arrange
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_json(
        200,
        json!({
            "value": [
                {"id": "1", "fields": {"Title": "Fix roof", "Status": "Open"}},
                {"id": "2", "fields": {"Title": "Paint fence", "Status": "Done"}}
            ]
        }),
    );
    let client = client(transport.clone());

    // Act
    let response = client
        .lists()
        .list_list_items(SITE, "list-1", "Title,Status")
        .await
        .unwrap();

    // Assert
    let items = response.content.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["Title"], "Fix roof");
    assert_eq!(items[1]["Status"], "Done");
    assert!(items[0].get("id").is_none());

    transport.verify_request(0, HttpMethod::Get, "/lists/list-1/items");
    transport.verify_header(0, "accept", "application/json;odata.metadata=none");
    let request = transport.last_request().unwrap();
    assert_eq!(request.query("select").as_deref(), Some("Title,Status"));
    assert_eq!(request.query("expand").as_deref(), Some("fields"));
}

#[tokio::test]
async fn test_list_list_items_without_fields_object() {
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_json(200, json!({"value": [{"id": "1"}]}));
    let client = client(transport);

    let result = client.lists().list_list_items(SITE, "list-1", "Title").await;

    assert!(matches!(result, Err(SharePointError::Response(_))));
}

#[tokio::test]
async fn test_delete_list_item() {
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_empty_response(204);
    let client = client(transport.clone());

    let response = client
        .lists()
        .delete_list_item(SITE, "list-1", "7")
        .await
        .unwrap();

    assert!(response.has_content());
    transport.verify_request(0, HttpMethod::Delete, "/lists/list-1/items/7");
}

#[tokio::test]
async fn test_delete_list_item_only_accepts_no_content() {
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_json(200, json!({}));
    let client = client(transport);

    let response = client
        .lists()
        .delete_list_item(SITE, "list-1", "7")
        .await
        .unwrap();

    assert_eq!(response.status_code(), 200);
    assert!(!response.has_content());
    assert!(matches!(
        response.into_result(),
        Err(SharePointError::Server(_))
    ));
}

#[tokio::test]
async fn test_add_list_item() {
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_json(
        201,
        json!({
            "id": "8",
            "webUrl": "https://contoso.sharepoint.com/sites/Finance/Lists/Tasks/8_.000",
            "createdDateTime": "2024-04-01T00:00:00Z",
            "fields": {"Title": "Order paper"},
        }),
    );
    let client = client(transport.clone());
    let mut fields = Map::new();
    fields.insert("Title".to_string(), json!("Order paper"));
    fields.insert("Priority".to_string(), json!(2));

    let response = client
        .lists()
        .add_list_item(SITE, "list-1", fields)
        .await
        .unwrap();

    assert_eq!(response.status_code(), 201);
    assert_eq!(response.content.unwrap().id, "8");
    transport.verify_request(0, HttpMethod::Post, "/lists/list-1/items");
    transport.verify_header(0, "content-type", "application/json");
    assert_eq!(
        transport.last_request().unwrap().json(),
        json!({"fields": {"Title": "Order paper", "Priority": 2}})
    );
}

#[tokio::test]
async fn test_add_list_item_validation_failure() {
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_json_response(
        400,
        &graph_error("invalidRequest", "Field 'Priority' is not recognized"),
    );
    let client = client(transport);

    let response = client
        .lists()
        .add_list_item(SITE, "list-1", Map::new())
        .await
        .unwrap();

    assert!(response.content.is_none());
    assert!(matches!(
        response.into_result(),
        Err(SharePointError::Request(_))
    ));
}
