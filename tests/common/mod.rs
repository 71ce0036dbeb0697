//! Shared helpers for integration tests.

#![allow(dead_code)]

use integrations_sharepoint::mocks::{MockAuthProvider, MockHttpTransport};
use integrations_sharepoint::{DerivationPolicy, SharePointClient};
use serde_json::{json, Value};
use std::sync::Arc;

pub const DOMAIN: &str = "contoso.sharepoint.com";
pub const DRIVE: &str = "b!drive";
pub const SITE: &str = "contoso.sharepoint.com,1111,2222";

/// Client wired to a mock transport.
pub fn client(transport: Arc<MockHttpTransport>) -> SharePointClient {
    client_with_policy(transport, DerivationPolicy::Lenient)
}

pub fn client_with_policy(
    transport: Arc<MockHttpTransport>,
    policy: DerivationPolicy,
) -> SharePointClient {
    SharePointClient::builder()
        .auth_provider(MockAuthProvider::new("test-token"))
        .sp_domain(DOMAIN)
        .derivation_policy(policy)
        .transport(transport)
        .build()
        .unwrap()
}

pub fn graph_error(code: &str, message: &str) -> String {
    json!({"error": {"code": code, "message": message}}).to_string()
}

pub fn file_item(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "size": 2048,
        "webUrl": format!("https://contoso.sharepoint.com/Shared%20Documents/{}", name),
        "file": {"mimeType": "application/octet-stream"},
        "createdDateTime": "2024-03-01T08:00:00Z",
        "lastModifiedDateTime": "2024-03-02T09:30:00Z",
        "lastModifiedBy": {
            "user": {"displayName": "Ana Silva", "email": "ana@contoso.com"}
        },
    })
}

pub fn folder_item(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "size": 0,
        "folder": {"childCount": 3},
        "createdDateTime": "2024-03-01T08:00:00Z",
    })
}
