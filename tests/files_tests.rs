//! Integration tests for the files service.

mod common;

use bytes::Bytes;
use common::*;
use integrations_sharepoint::errors::TransportError;
use integrations_sharepoint::mocks::MockHttpTransport;
use integrations_sharepoint::transport::HttpMethod;
use integrations_sharepoint::types::DownloadStatus;
use integrations_sharepoint::SharePointError;
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn test_get_file_info() {
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_json(200, file_item("file-1", "budget.xlsx"));
    let client = client(transport.clone());

    let response = client
        .files()
        .get_file_info(DRIVE, "Finance/budget.xlsx")
        .await
        .unwrap();

    let info = response.content.unwrap();
    assert_eq!(info.id, "file-1");
    assert_eq!(info.size, Some(2048));
    assert_eq!(info.last_modified_by_email.as_deref(), Some("ana@contoso.com"));
    transport.verify_request(0, HttpMethod::Get, "/drives/b!drive/root:/Finance/budget.xlsx");
}

#[tokio::test]
async fn test_get_file_info_unauthorized() {
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_json_response(401, &graph_error("InvalidAuthenticationToken", "Access token has expired"));
    let client = client(transport);

    let response = client.files().get_file_info(DRIVE, "a.txt").await.unwrap();

    assert_eq!(response.status_code(), 401);
    assert!(response.content.is_none());
    assert!(matches!(
        response.into_result(),
        Err(SharePointError::Authentication(_))
    ));
}

#[tokio::test]
async fn test_copy_file() {
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_empty_response(202);
    let client = client(transport.clone());

    let response = client
        .files()
        .copy_file(DRIVE, "Docs/a.txt", "/Archive/", None)
        .await
        .unwrap();

    assert_eq!(response.status_code(), 202);
    assert!(response.has_content());
    transport.verify_request(0, HttpMethod::Post, "/root:/Docs/a.txt:/copy");
    assert_eq!(
        transport.last_request().unwrap().json(),
        json!({
            "parentReference": {
                "driveId": "b!drive",
                "driveType": "documentLibrary",
                "path": "/drives/b!drive/root:/Archive",
            }
        })
    );
}

#[tokio::test]
async fn test_copy_file_with_new_name() {
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_empty_response(202);
    let client = client(transport.clone());

    client
        .files()
        .copy_file(DRIVE, "a.txt", "Archive", Some("b.txt"))
        .await
        .unwrap();

    let body = transport.last_request().unwrap().json();
    assert_eq!(body["name"], "b.txt");
}

#[tokio::test]
async fn test_move_file() {
    // Arrange
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_json(200, file_item("file-1", "a.txt"));
    transport.enqueue_json(200, folder_item("folder-1", "Archive"));
    transport.enqueue_json(
        200,
        json!({
            "id": "file-1",
            "name": "b.txt",
            "createdDateTime": "2024-03-01T08:00:00Z",
        }),
    );
    let client = client(transport.clone());

    // Act
    let response = client
        .files()
        .move_file(DRIVE, "Docs/a.txt", "Archive", Some("b.txt"))
        .await
        .unwrap();

    // Assert
    let moved = response.content.unwrap();
    assert_eq!(moved.id, "file-1");
    assert_eq!(moved.name, "b.txt");

    transport.verify_request_count(3);
    transport.verify_request(0, HttpMethod::Get, "/root:/Docs/a.txt");
    transport.verify_request(1, HttpMethod::Get, "/root:/Archive");
    transport.verify_request(2, HttpMethod::Patch, "/drives/b!drive/items/file-1");
    assert_eq!(
        transport.last_request().unwrap().json(),
        json!({"parentReference": {"id": "folder-1"}, "name": "b.txt"})
    );
}

#[tokio::test]
async fn test_move_file_missing_target_folder() {
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_json(200, file_item("file-1", "a.txt"));
    transport.enqueue_json_response(404, &graph_error("itemNotFound", "The resource could not be found."));
    let client = client(transport.clone());

    let response = client
        .files()
        .move_file(DRIVE, "a.txt", "Nowhere", None)
        .await
        .unwrap();

    assert_eq!(response.status_code(), 404);
    assert!(response.content.is_none());
    transport.verify_request_count(2);
}

#[tokio::test]
async fn test_move_file_missing_source() {
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_json_response(404, &graph_error("itemNotFound", "The resource could not be found."));
    let client = client(transport.clone());

    let response = client
        .files()
        .move_file(DRIVE, "ghost.txt", "Archive", None)
        .await
        .unwrap();

    assert_eq!(response.status_code(), 404);
    assert!(response.content.is_none());
    transport.verify_request_count(1);
}

#[tokio::test]
async fn test_delete_file() {
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_empty_response(204);
    let client = client(transport.clone());

    let response = client.files().delete_file(DRIVE, "Docs/a.txt").await.unwrap();

    assert!(response.has_content());
    transport.verify_request(0, HttpMethod::Delete, "/root:/Docs/a.txt");
}

#[tokio::test]
async fn test_rename_file() {
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_json(
        200,
        json!({
            "id": "file-1",
            "name": "final.docx",
            "size": 512,
            "createdDateTime": "2024-03-01T08:00:00Z",
        }),
    );
    let client = client(transport.clone());

    let response = client
        .files()
        .rename_file(DRIVE, "Docs/draft.docx", "final.docx")
        .await
        .unwrap();

    let renamed = response.content.unwrap();
    assert_eq!(renamed.name, "final.docx");
    assert_eq!(renamed.size, Some(512));
    transport.verify_request(0, HttpMethod::Patch, "/root:/Docs/draft.docx");
    assert_eq!(transport.last_request().unwrap().json(), json!({"name": "final.docx"}));
}

#[tokio::test]
async fn test_download_file_streams_to_disk() {
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_streaming_response(
        200,
        vec![Bytes::from_static(b"hello "), Bytes::from_static(b"world")],
    );
    let client = client(transport.clone());
    let dir = tempfile::tempdir().unwrap();
    let local = dir.path().join("a.txt");

    let response = client
        .files()
        .download_file(DRIVE, "Docs/a.txt", &local)
        .await
        .unwrap();

    assert_eq!(response.content, Some(11));
    assert!(response.raw().is_empty());
    assert_eq!(std::fs::read_to_string(&local).unwrap(), "hello world");
    transport.verify_request(0, HttpMethod::Get, "/root:/Docs/a.txt:/content");
}

#[tokio::test]
async fn test_download_file_not_found_leaves_no_file() {
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_json_response(404, &graph_error("itemNotFound", "The resource could not be found."));
    let client = client(transport);
    let dir = tempfile::tempdir().unwrap();
    let local = dir.path().join("missing.txt");

    let response = client
        .files()
        .download_file(DRIVE, "missing.txt", &local)
        .await
        .unwrap();

    assert_eq!(response.status_code(), 404);
    assert!(response.content.is_none());
    assert!(!local.exists());
}

#[tokio::test]
async fn test_download_file_interrupted_removes_partial_file() {
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_interrupted_stream(
        200,
        vec![Bytes::from_static(b"first half")],
        TransportError::Network("connection reset".to_string()),
    );
    let client = client(transport);
    let dir = tempfile::tempdir().unwrap();
    let local = dir.path().join("big.bin");

    let result = client.files().download_file(DRIVE, "big.bin", &local).await;

    assert!(matches!(result, Err(SharePointError::Network(_))));
    assert!(!local.exists());
}

#[tokio::test]
async fn test_download_file_to_memory() {
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_response(Ok(integrations_sharepoint::transport::HttpResponse::new(
        reqwest::StatusCode::OK,
        reqwest::header::HeaderMap::new(),
        Bytes::from_static(b"%PDF-1.7"),
    )));
    let client = client(transport);

    let response = client
        .files()
        .download_file_to_memory(DRIVE, "report.pdf")
        .await
        .unwrap();

    assert_eq!(response.content.as_deref(), Some(&b"%PDF-1.7"[..]));
}

#[tokio::test]
async fn test_download_all_files() {
    // Arrange
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_json(
        200,
        json!({
            "value": [
                file_item("1", "a.txt"),
                folder_item("2", "Nested"),
                file_item("3", "README"),
                file_item("4", "b.csv"),
            ]
        }),
    );
    transport.enqueue_streaming_response(200, vec![Bytes::from_static(b"alpha")]);
    transport.enqueue_streaming_response(404, vec![Bytes::new()]);
    let client = client(transport.clone());
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("export");

    // Act
    let response = client
        .files()
        .download_all_files(DRIVE, "Docs/", &target)
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status_code(), 200);
    let reports = response.content.unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].entry.name, "a.txt");
    assert_eq!(reports[0].status, DownloadStatus::Pass);
    assert_eq!(reports[1].entry.name, "b.csv");
    assert_eq!(reports[1].status, DownloadStatus::Fail);

    assert_eq!(std::fs::read_to_string(target.join("a.txt")).unwrap(), "alpha");
    assert!(!target.join("b.csv").exists());

    transport.verify_request_count(3);
    transport.verify_request(1, HttpMethod::Get, "/root:/Docs/a.txt:/content");
    transport.verify_request(2, HttpMethod::Get, "/root:/Docs/b.csv:/content");

    let serialized = serde_json::to_value(&reports[0]).unwrap();
    assert_eq!(serialized["status"], "pass");
    assert_eq!(serialized["name"], "a.txt");
    assert_eq!(serialized["path"], "Docs/");
}

#[tokio::test]
async fn test_download_all_files_listing_failure() {
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_json_response(403, &graph_error("accessDenied", "Access denied"));
    let client = client(transport.clone());
    let dir = tempfile::tempdir().unwrap();

    let response = client
        .files()
        .download_all_files(DRIVE, "Private", dir.path())
        .await
        .unwrap();

    assert_eq!(response.status_code(), 403);
    assert!(response.content.is_none());
    transport.verify_request_count(1);
}

#[tokio::test]
async fn test_upload_file_streams_from_disk() {
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_json(201, json!({"id": "new-1", "name": "notes.txt", "size": 14}));
    let client = client(transport.clone());
    let dir = tempfile::tempdir().unwrap();
    let local = dir.path().join("notes.txt");
    std::fs::write(&local, "meeting notes\n").unwrap();

    let response = client
        .files()
        .upload_file(DRIVE, &local, "Team Notes/notes.txt")
        .await
        .unwrap();

    let uploaded = response.content.unwrap();
    assert_eq!(uploaded.id, "new-1");
    assert_eq!(uploaded.size, Some(14));

    transport.verify_request(0, HttpMethod::Put, "/root:/Team%20Notes/notes.txt:/content");
    transport.verify_header(0, "content-type", "application/octet-stream");
    assert_eq!(&transport.last_request().unwrap().body[..], b"meeting notes\n");
}

#[tokio::test]
async fn test_upload_file_missing_local_file() {
    let transport = Arc::new(MockHttpTransport::new());
    let client = client(transport.clone());
    let dir = tempfile::tempdir().unwrap();

    let result = client
        .files()
        .upload_file(DRIVE, dir.path().join("absent.bin"), "absent.bin")
        .await;

    assert!(result.is_err());
    transport.verify_request_count(0);
}

#[tokio::test]
async fn test_upload_bytes() {
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_json(200, json!({"id": "existing-1"}));
    let client = client(transport.clone());

    let response = client
        .files()
        .upload_bytes(DRIVE, Bytes::from_static(b"a,b\n1,2\n"), "data.csv")
        .await
        .unwrap();

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.content.unwrap().name, None);
    assert_eq!(&transport.last_request().unwrap().body[..], b"a,b\n1,2\n");
}
