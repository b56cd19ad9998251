//! The `m365_drive` table

use anyhow::Context as _;
use async_trait::async_trait;
use std::sync::Arc;

use crate::api::manager::ConnectionContext;
use crate::api::query::QueryBuilder;
use crate::models::files::Drive;
use crate::models::{json_int, json_str, json_string, json_timestamp, json_value};
use crate::plugin::{
    Column, ColumnType, KeyColumn, QueryContext, TableDescriptor, TableHandler, TableSchema,
};
use crate::tables::{resolve_user_id, stream_collection, suppress_ignorable};

const TABLE: &str = "m365_drive";
const IGNORE: &[&str] = &["ResourceNotFound", "Request_ResourceNotFound"];

pub struct DriveTable {
    descriptor: TableDescriptor,
    schema: TableSchema<Drive>,
}

impl DriveTable {
    pub fn handler() -> Arc<dyn TableHandler> {
        Arc::new(Self::new())
    }

    pub fn new() -> Self {
        let schema = Self::schema();
        let descriptor = TableDescriptor {
            name: TABLE,
            description: "Drives (OneDrive and document libraries) available to a user.",
            columns: schema.defs(),
            list_key_columns: vec![KeyColumn::optional("user_id")],
            get_key_columns: vec![],
            ignore_codes: IGNORE,
        };
        Self { descriptor, schema }
    }

    fn schema() -> TableSchema<Drive> {
        TableSchema::new(vec![
            Column::new("id", ColumnType::String, "Unique identifier for the drive.", |d: &Drive| {
                json_str(&d.id)
            }),
            Column::new("name", ColumnType::String, "Drive name.", |d: &Drive| {
                json_string(&d.name)
            }),
            Column::new("description", ColumnType::String, "Drive description.", |d: &Drive| {
                json_string(&d.description)
            }),
            Column::new("drive_type", ColumnType::String, "personal, business or documentLibrary.", |d: &Drive| {
                json_string(&d.drive_type)
            }),
            Column::new("web_url", ColumnType::String, "Browser URL of the drive.", |d: &Drive| {
                json_string(&d.web_url)
            }),
            Column::new("owner_display_name", ColumnType::String, "Display name of the owning user.", |d: &Drive| {
                d.owner_display_name().and_then(json_str)
            }),
            Column::new("quota_total", ColumnType::Int, "Total quota in bytes.", |d: &Drive| {
                json_int(&d.quota_total())
            }),
            Column::new("quota_used", ColumnType::Int, "Used quota in bytes.", |d: &Drive| {
                json_int(&d.quota_used())
            }),
            Column::new("quota_state", ColumnType::String, "normal, nearing, critical or exceeded.", |d: &Drive| {
                d.quota_state().and_then(json_str)
            }),
            Column::new("quota", ColumnType::Json, "Full quota facet.", |d: &Drive| {
                json_value(&d.quota)
            }),
            Column::new("created_date_time", ColumnType::Timestamp, "Creation stamp.", |d: &Drive| {
                json_timestamp(&d.created_date_time)
            }),
            Column::new("last_modified_date_time", ColumnType::Timestamp, "Last modification stamp.", |d: &Drive| {
                json_timestamp(&d.last_modified_date_time)
            }),
            Column::new("user_id", ColumnType::String, "ID or principal name of the user the drive belongs to.", |_| None),
        ])
    }
}

#[async_trait]
impl TableHandler for DriveTable {
    fn descriptor(&self) -> &TableDescriptor {
        &self.descriptor
    }

    async fn list(&self, conn: &ConnectionContext, ctx: &QueryContext) -> anyhow::Result<()> {
        let result = async {
            let user_id = resolve_user_id(conn, ctx)?;
            let client = conn.client().await.context("Failed to create Graph client")?;
            let path = QueryBuilder::new(format!("users/{}/drives", user_id))
                .top(Some(ctx.top_hint()))
                .build();
            stream_collection(
                &client,
                &path,
                &self.schema,
                ctx,
                &[("user_id", Some(user_id.clone()))],
            )
            .await
            .with_context(|| format!("Failed to list drives for user {}", user_id))
        }
        .await;
        suppress_ignorable(result, TABLE, IGNORE)
    }
}
