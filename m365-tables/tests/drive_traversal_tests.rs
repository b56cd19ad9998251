//! Work-stack folder traversal for the drive-item table.

mod common;

use common::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use m365_tables::plugin::QueryContext;

fn folder(id: &str, name: &str, children: i64) -> serde_json::Value {
    json!({"id": id, "name": name, "folder": {"childCount": children}})
}

fn file(id: &str, name: &str, size: i64) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "size": size,
        "file": {"mimeType": "text/plain"},
        "parentReference": {"driveId": "d-1", "path": "/drive/root:"}
    })
}

/// Root items are emitted before any descent; child folders found along the
/// way are expanded iteratively.
#[tokio::test]
async fn traversal_walks_folders_via_the_work_stack() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/u-1/drives"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page(vec![json!({"id": "d-1", "name": "OneDrive"})], None)),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/drives/d-1/items/root/children"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![folder("f-1", "Reports", 2), file("a", "readme.txt", 10)],
            None,
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/drives/d-1/items/f-1/children"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![file("b", "q1.txt", 20), file("c", "q2.txt", 30)],
            None,
        )))
        .mount(&server)
        .await;

    let conn = test_context(&server.uri());
    let plugin = m365_tables::plugin();
    let table = plugin.table("m365_drive_item").unwrap();

    let (ctx, mut rows) = QueryContext::new(quals(vec![string_qual("user_id", "u-1")]), None);
    table.list(&conn, &ctx).await.unwrap();

    let mut received = Vec::new();
    while let Ok(row) = rows.try_recv() {
        received.push(row);
    }
    assert_eq!(received.len(), 4);
    // Parent-level rows come before the descended children.
    assert_eq!(received[0].get("id").unwrap(), "f-1");
    assert_eq!(received[0].get("is_folder").unwrap(), &json!(true));
    assert_eq!(received[1].get("id").unwrap(), "a");
    assert_eq!(received[2].get("id").unwrap(), "b");
    assert_eq!(received[3].get("id").unwrap(), "c");
    // Every row carries the binding columns.
    assert!(received.iter().all(|r| r.get("drive_id").unwrap() == "d-1"));
    assert!(received.iter().all(|r| r.get("user_id").unwrap() == "u-1"));
}

/// The row limit is honored across the traversal; unexpanded folders are
/// abandoned once no more rows are wanted.
#[tokio::test]
async fn traversal_stops_at_the_row_limit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/u-1/drives"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page(vec![json!({"id": "d-1", "name": "OneDrive"})], None)),
        )
        .mount(&server)
        .await;

    // Two folders at root; their children are never mounted, so following
    // them would fail the test.
    Mock::given(method("GET"))
        .and(path("/drives/d-1/items/root/children"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![folder("f-1", "A", 9), folder("f-2", "B", 9)],
            None,
        )))
        .mount(&server)
        .await;

    let conn = test_context(&server.uri());
    let plugin = m365_tables::plugin();
    let table = plugin.table("m365_drive_item").unwrap();

    let (ctx, mut rows) = QueryContext::new(quals(vec![string_qual("user_id", "u-1")]), Some(2));
    table.list(&conn, &ctx).await.unwrap();

    let mut received = 0;
    while rows.try_recv().is_ok() {
        received += 1;
    }
    assert_eq!(received, 2);
}

/// Direct drive_id quals skip drive discovery.
#[tokio::test]
async fn drive_id_qual_skips_drive_discovery() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drives/d-9/items/root/children"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page(vec![file("x", "only.txt", 1)], None)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let conn = test_context(&server.uri());
    let plugin = m365_tables::plugin();
    let table = plugin.table("m365_drive_item").unwrap();

    let (ctx, mut rows) = QueryContext::new(
        quals(vec![
            string_qual("user_id", "u-1"),
            string_qual("drive_id", "d-9"),
        ]),
        None,
    );
    table.list(&conn, &ctx).await.unwrap();
    let row = rows.try_recv().unwrap();
    assert_eq!(row.get("id").unwrap(), "x");
}
