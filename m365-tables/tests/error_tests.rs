//! Error classification and ignorable-error behavior over the wire.

mod common;

use common::*;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use m365_tables::GraphError;
use m365_tables::plugin::QueryContext;

/// A structured not-found on a mailbox table is declared ignorable and
/// surfaces as zero rows, not a failure.
#[tokio::test]
async fn ignorable_structured_error_yields_zero_rows() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/u-1/messages"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(error_envelope(
                "ResourceNotFound",
                "The mailbox is not provisioned.",
            )),
        )
        .mount(&server)
        .await;

    let conn = test_context(&server.uri());
    let plugin = m365_tables::plugin();
    let table = plugin.table("m365_mail_message").unwrap();

    let (ctx, mut rows) = QueryContext::new(quals(vec![string_qual("user_id", "u-1")]), None);
    table.list(&conn, &ctx).await.unwrap();
    assert!(rows.try_recv().is_err());
}

/// An ignorable match on the message substring, not the code.
#[tokio::test]
async fn ignorable_matches_by_message_substring() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/u-1/calendars"))
        .respond_with(ResponseTemplate::new(400).set_body_json(error_envelope(
            "UnknownCode",
            "inner failure: MailboxNotEnabledForRESTAPI on this account",
        )))
        .mount(&server)
        .await;

    let conn = test_context(&server.uri());
    let plugin = m365_tables::plugin();
    let table = plugin.table("m365_calendar").unwrap();

    let (ctx, mut rows) = QueryContext::new(quals(vec![string_qual("user_id", "u-1")]), None);
    table.list(&conn, &ctx).await.unwrap();
    assert!(rows.try_recv().is_err());
}

/// Structured errors a table did not declare ignorable propagate with
/// their classification intact.
#[tokio::test]
async fn undeclared_structured_error_propagates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(403).set_body_json(error_envelope(
            "Authorization_RequestDenied",
            "Insufficient privileges to complete the operation.",
        )))
        .mount(&server)
        .await;

    let conn = test_context(&server.uri());
    let plugin = m365_tables::plugin();
    let table = plugin.table("m365_user").unwrap();

    let (ctx, _rows) = QueryContext::new(Default::default(), None);
    let err = table.list(&conn, &ctx).await.unwrap_err();

    let graph_err = err
        .chain()
        .find_map(|e| e.downcast_ref::<GraphError>())
        .expect("GraphError in the chain");
    match graph_err {
        GraphError::Api { code, .. } => assert_eq!(code, "Authorization_RequestDenied"),
        other => panic!("unexpected error: {other:?}"),
    }
}

/// The beta envelope shape (code/message at the top level) classifies the
/// same way as the stable shape.
#[tokio::test]
async fn beta_envelope_shape_is_classified() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/u-1/messages"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "code": "ErrorItemNotFound",
            "message": "The specified object was not found in the store."
        })))
        .mount(&server)
        .await;

    let conn = test_context(&server.uri());
    let plugin = m365_tables::plugin();
    let table = plugin.table("m365_mail_message").unwrap();

    // ErrorItemNotFound is on the mailbox ignore list, so classification of
    // the beta shape shows up as a clean empty result.
    let (ctx, mut rows) = QueryContext::new(quals(vec![string_qual("user_id", "u-1")]), None);
    table.list(&conn, &ctx).await.unwrap();
    assert!(rows.try_recv().is_err());
}

/// A body with no recognizable envelope is not classifiable and propagates
/// as an unstructured status error.
#[tokio::test]
async fn unstructured_error_is_not_swallowed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/u-1/messages"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let conn = test_context(&server.uri());
    let plugin = m365_tables::plugin();
    let table = plugin.table("m365_mail_message").unwrap();

    let (ctx, _rows) = QueryContext::new(quals(vec![string_qual("user_id", "u-1")]), None);
    let err = table.list(&conn, &ctx).await.unwrap_err();
    let graph_err = err
        .chain()
        .find_map(|e| e.downcast_ref::<GraphError>())
        .expect("GraphError in the chain");
    assert!(matches!(graph_err, GraphError::Status { status: 500, .. }));
}

/// Transport-level failures are never classified and never ignorable: they
/// propagate even on tables with a declared ignore list.
#[tokio::test]
async fn transport_error_is_not_classifiable() {
    // Grab a port from a mock server, then drop it so connections are
    // refused.
    let dead_uri = {
        let server = MockServer::start().await;
        server.uri()
    };

    let conn = test_context(&dead_uri);
    let plugin = m365_tables::plugin();
    let table = plugin.table("m365_mail_message").unwrap();

    let (ctx, _rows) = QueryContext::new(quals(vec![string_qual("user_id", "u-1")]), None);
    let err = table.list(&conn, &ctx).await.unwrap_err();
    let graph_err = err
        .chain()
        .find_map(|e| e.downcast_ref::<GraphError>())
        .expect("GraphError in the chain");
    assert!(matches!(graph_err, GraphError::Http(_)));
    assert!(m365_tables::api::classify(graph_err).is_none());
}

/// A missing user id with no configured default fails the query up front.
#[tokio::test]
async fn per_user_table_without_user_id_errors() {
    let server = MockServer::start().await;
    let conn = test_context(&server.uri());
    let plugin = m365_tables::plugin();
    let table = plugin.table("m365_mail_message").unwrap();

    let (ctx, _rows) = QueryContext::new(Default::default(), None);
    let err = table.list(&conn, &ctx).await.unwrap_err();
    let graph_err = err
        .chain()
        .find_map(|e| e.downcast_ref::<GraphError>())
        .expect("GraphError in the chain");
    assert!(matches!(graph_err, GraphError::MissingUserId));
}
