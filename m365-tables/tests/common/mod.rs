//! Shared utilities for integration tests against a mock Graph server.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;

use m365_tables::api::query::{FilterValue, Qual};
use m365_tables::api::{
    ClientConfig, CloudEnvironment, ConnectionContext, GraphResult, Session, TokenCredential,
};

/// Credential returning a fixed token, so no identity endpoint is needed.
pub struct StaticCredential(pub String);

#[async_trait]
impl TokenCredential for StaticCredential {
    async fn token(&self) -> GraphResult<String> {
        Ok(self.0.clone())
    }
}

/// A connection context whose session is pre-resolved and whose API root
/// points at the mock server.
pub fn test_context(server_uri: &str) -> ConnectionContext {
    let session = Arc::new(Session::new(
        "test-tenant",
        CloudEnvironment::Public,
        Arc::new(StaticCredential("test-token".to_string())),
    ));
    ConnectionContext::with_session(&ClientConfig::default(), session, server_uri)
}

/// Equality qual on a string column.
pub fn string_qual(column: &str, value: &str) -> (String, Qual) {
    (
        column.to_string(),
        Qual::equal(FilterValue::String(value.to_string())),
    )
}

pub fn quals(entries: Vec<(String, Qual)>) -> HashMap<String, Qual> {
    entries.into_iter().collect()
}

/// Test data factory for directory users.
pub fn test_user(id: &str, upn_prefix: &str) -> Value {
    json!({
        "id": id,
        "userPrincipalName": format!("{}@contoso.onmicrosoft.com", upn_prefix),
        "displayName": format!("Test User {}", upn_prefix),
        "givenName": "Test",
        "surname": "User",
        "mail": format!("{}@contoso.com", upn_prefix),
        "accountEnabled": true,
        "userType": "Member"
    })
}

/// Test data factory for mailbox messages.
pub fn test_message(id: &str, subject: &str, is_read: bool) -> Value {
    json!({
        "id": id,
        "subject": subject,
        "isRead": is_read,
        "hasAttachments": false,
        "from": {"emailAddress": {"name": "Ada", "address": "ada@contoso.com"}},
        "receivedDateTime": "2026-02-01T10:00:00Z"
    })
}

/// One page of an OData collection, with an optional continuation link.
pub fn page(items: Vec<Value>, next_link: Option<String>) -> Value {
    match next_link {
        Some(link) => json!({"value": items, "@odata.nextLink": link}),
        None => json!({"value": items}),
    }
}

/// The stable error envelope shape.
pub fn error_envelope(code: &str, message: &str) -> Value {
    json!({"error": {"code": code, "message": message}})
}
