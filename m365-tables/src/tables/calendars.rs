//! The `m365_calendar` table

use anyhow::Context as _;
use async_trait::async_trait;
use std::sync::Arc;

use crate::api::manager::ConnectionContext;
use crate::api::query::QueryBuilder;
use crate::models::calendar::Calendar;
use crate::models::{json_bool, json_list, json_str, json_string};
use crate::plugin::{
    Column, ColumnType, KeyColumn, QueryContext, TableDescriptor, TableHandler, TableSchema,
};
use crate::tables::{resolve_user_id, stream_collection, suppress_ignorable};

const TABLE: &str = "m365_calendar";
const IGNORE: &[&str] = &[
    "ResourceNotFound",
    "ErrorItemNotFound",
    "MailboxNotEnabledForRESTAPI",
];

pub struct CalendarTable {
    descriptor: TableDescriptor,
    schema: TableSchema<Calendar>,
}

impl CalendarTable {
    pub fn handler() -> Arc<dyn TableHandler> {
        Arc::new(Self::new())
    }

    pub fn new() -> Self {
        let schema = Self::schema();
        let descriptor = TableDescriptor {
            name: TABLE,
            description: "Calendars of a user. Users without a provisioned mailbox yield no rows.",
            columns: schema.defs(),
            list_key_columns: vec![KeyColumn::optional("user_id")],
            get_key_columns: vec![],
            ignore_codes: IGNORE,
        };
        Self { descriptor, schema }
    }

    fn schema() -> TableSchema<Calendar> {
        TableSchema::new(vec![
            Column::new("id", ColumnType::String, "Unique identifier for the calendar.", |c: &Calendar| {
                json_str(&c.id)
            }),
            Column::new("name", ColumnType::String, "Calendar name.", |c: &Calendar| {
                json_string(&c.name)
            }),
            Column::new("color", ColumnType::String, "Theme color.", |c: &Calendar| {
                json_string(&c.color)
            }),
            Column::new("change_key", ColumnType::String, "Version marker.", |c: &Calendar| {
                json_string(&c.change_key)
            }),
            Column::new("can_edit", ColumnType::Bool, "Whether the user can write to the calendar.", |c: &Calendar| {
                json_bool(&c.can_edit)
            }),
            Column::new("can_share", ColumnType::Bool, "Whether the user can share the calendar.", |c: &Calendar| {
                json_bool(&c.can_share)
            }),
            Column::new("can_view_private_items", ColumnType::Bool, "Whether private items are visible.", |c: &Calendar| {
                json_bool(&c.can_view_private_items)
            }),
            Column::new("is_default_calendar", ColumnType::Bool, "Whether this is the user's default calendar.", |c: &Calendar| {
                json_bool(&c.is_default_calendar)
            }),
            Column::new("is_removable", ColumnType::Bool, "Whether the calendar can be deleted.", |c: &Calendar| {
                json_bool(&c.is_removable)
            }),
            Column::new("owner_name", ColumnType::String, "Display name of the owner.", |c: &Calendar| {
                c.owner_name().and_then(json_str)
            }),
            Column::new("owner_address", ColumnType::String, "SMTP address of the owner.", |c: &Calendar| {
                c.owner_address().and_then(json_str)
            }),
            Column::new("allowed_online_meeting_providers", ColumnType::Json, "Meeting providers that can be used.", |c: &Calendar| {
                json_list(&c.allowed_online_meeting_providers)
            }),
            Column::new("user_id", ColumnType::String, "ID or principal name of the user owning the calendar.", |_| None),
        ])
    }
}

#[async_trait]
impl TableHandler for CalendarTable {
    fn descriptor(&self) -> &TableDescriptor {
        &self.descriptor
    }

    async fn list(&self, conn: &ConnectionContext, ctx: &QueryContext) -> anyhow::Result<()> {
        let result = async {
            let user_id = resolve_user_id(conn, ctx)?;
            let client = conn.client().await.context("Failed to create Graph client")?;
            let path = QueryBuilder::new(format!("users/{}/calendars", user_id))
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
            .with_context(|| format!("Failed to list calendars for user {}", user_id))
        }
        .await;
        suppress_ignorable(result, TABLE, IGNORE)
    }
}
