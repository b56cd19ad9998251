//! The `m365_calendar_event` table

use anyhow::Context as _;
use async_trait::async_trait;
use std::sync::Arc;

use crate::api::manager::ConnectionContext;
use crate::api::query::{QueryBuilder, build_filter};
use crate::models::calendar::{EVENT_SELECT, Event};
use crate::models::{json_bool, json_list, json_str, json_string, json_timestamp};
use crate::plugin::{
    Column, ColumnType, KeyColumn, QueryContext, TableDescriptor, TableHandler, TableSchema,
};
use crate::tables::{
    echoed_filter, resolve_user_id, stream_collection, suppress_ignorable,
};

const TABLE: &str = "m365_calendar_event";
const IGNORE: &[&str] = &[
    "ResourceNotFound",
    "ErrorItemNotFound",
    "MailboxNotEnabledForRESTAPI",
];

pub struct CalendarEventTable {
    descriptor: TableDescriptor,
    schema: TableSchema<Event>,
}

impl CalendarEventTable {
    pub fn handler() -> Arc<dyn TableHandler> {
        Arc::new(Self::new())
    }

    pub fn new() -> Self {
        let schema = Self::schema();
        let descriptor = TableDescriptor {
            name: TABLE,
            description: "Events across a user's calendars.",
            columns: schema.defs(),
            list_key_columns: vec![
                KeyColumn::optional("user_id"),
                KeyColumn::optional("subject"),
                KeyColumn::boolean("is_all_day"),
                KeyColumn::raw_filter(),
            ],
            get_key_columns: vec![],
            ignore_codes: IGNORE,
        };
        Self { descriptor, schema }
    }

    fn schema() -> TableSchema<Event> {
        TableSchema::new(vec![
            Column::new("id", ColumnType::String, "Unique identifier for the event.", |e: &Event| {
                json_str(&e.id)
            }),
            Column::new("subject", ColumnType::String, "Subject line.", |e: &Event| {
                json_string(&e.subject)
            }),
            Column::new("body_preview", ColumnType::String, "First lines of the body.", |e: &Event| {
                json_string(&e.body_preview)
            }),
            Column::new("importance", ColumnType::String, "Low, normal or high.", |e: &Event| {
                json_string(&e.importance)
            }),
            Column::new("sensitivity", ColumnType::String, "Normal, personal, private or confidential.", |e: &Event| {
                json_string(&e.sensitivity)
            }),
            Column::new("show_as", ColumnType::String, "Free/busy status.", |e: &Event| {
                json_string(&e.show_as)
            }),
            Column::new("event_type", ColumnType::String, "singleInstance, occurrence, exception or seriesMaster.", |e: &Event| {
                json_string(&e.event_type)
            }),
            Column::new("series_master_id", ColumnType::String, "Master event for occurrences.", |e: &Event| {
                json_string(&e.series_master_id)
            }),
            Column::new("is_all_day", ColumnType::Bool, "Whether the event lasts whole days.", |e: &Event| {
                json_bool(&e.is_all_day)
            }),
            Column::new("is_cancelled", ColumnType::Bool, "Whether the event is cancelled.", |e: &Event| {
                json_bool(&e.is_cancelled)
            }),
            Column::new("is_organizer", ColumnType::Bool, "Whether the mailbox owner organizes the event.", |e: &Event| {
                json_bool(&e.is_organizer)
            }),
            Column::new("is_online_meeting", ColumnType::Bool, "Whether an online meeting is attached.", |e: &Event| {
                json_bool(&e.is_online_meeting)
            }),
            Column::new("response_requested", ColumnType::Bool, "Whether responses were requested.", |e: &Event| {
                json_bool(&e.response_requested)
            }),
            Column::new("start_time", ColumnType::String, "Start stamp in the event's time zone.", |e: &Event| {
                e.start_time().and_then(json_str)
            }),
            Column::new("end_time", ColumnType::String, "End stamp in the event's time zone.", |e: &Event| {
                e.end_time().and_then(json_str)
            }),
            Column::new("location_name", ColumnType::String, "Display name of the location.", |e: &Event| {
                e.location_name().and_then(json_str)
            }),
            Column::new("organizer_name", ColumnType::String, "Organizer display name.", |e: &Event| {
                e.organizer_name().and_then(json_str)
            }),
            Column::new("organizer_address", ColumnType::String, "Organizer SMTP address.", |e: &Event| {
                e.organizer_address().and_then(json_str)
            }),
            Column::new("attendees", ColumnType::Json, "Attendees with response status.", |e: &Event| {
                json_list(&e.attendees)
            }),
            Column::new("web_link", ColumnType::String, "Link to the event in Outlook on the web.", |e: &Event| {
                json_string(&e.web_link)
            }),
            Column::new("created_date_time", ColumnType::Timestamp, "Creation stamp.", |e: &Event| {
                json_timestamp(&e.created_date_time)
            }),
            Column::new("last_modified_date_time", ColumnType::Timestamp, "Last modification stamp.", |e: &Event| {
                json_timestamp(&e.last_modified_date_time)
            }),
            Column::new("user_id", ColumnType::String, "ID or principal name of the mailbox owner.", |_| None),
            Column::new("filter", ColumnType::String, "Raw OData $filter passed through to the remote API.", |_| None),
        ])
    }
}

#[async_trait]
impl TableHandler for CalendarEventTable {
    fn descriptor(&self) -> &TableDescriptor {
        &self.descriptor
    }

    async fn list(&self, conn: &ConnectionContext, ctx: &QueryContext) -> anyhow::Result<()> {
        let result = async {
            let user_id = resolve_user_id(conn, ctx)?;
            let client = conn.client().await.context("Failed to create Graph client")?;
            let filter = build_filter(ctx.quals(), &["user_id"])?;
            let path = QueryBuilder::new(format!("users/{}/events", user_id))
                .select(EVENT_SELECT)
                .filter(filter)
                .top(Some(ctx.top_hint()))
                .build();
            stream_collection(
                &client,
                &path,
                &self.schema,
                ctx,
                &[("user_id", Some(user_id.clone())), echoed_filter(ctx)],
            )
            .await
            .with_context(|| format!("Failed to list events for user {}", user_id))
        }
        .await;
        suppress_ignorable(result, TABLE, IGNORE)
    }
}
