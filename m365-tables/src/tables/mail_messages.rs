//! The `m365_mail_message` table

use anyhow::Context as _;
use async_trait::async_trait;
use std::sync::Arc;

use crate::api::manager::ConnectionContext;
use crate::api::query::{QueryBuilder, build_filter};
use crate::models::mail::{MESSAGE_SELECT, Message};
use crate::models::{json_bool, json_list, json_str, json_string, json_timestamp};
use crate::plugin::{
    Column, ColumnType, KeyColumn, QueryContext, TableDescriptor, TableHandler, TableSchema,
};
use crate::tables::{
    echoed_filter, resolve_user_id, stream_collection, suppress_ignorable,
};

const TABLE: &str = "m365_mail_message";
const IGNORE: &[&str] = &[
    "ResourceNotFound",
    "ErrorItemNotFound",
    "MailboxNotEnabledForRESTAPI",
];

pub struct MailMessageTable {
    descriptor: TableDescriptor,
    schema: TableSchema<Message>,
}

impl MailMessageTable {
    pub fn handler() -> Arc<dyn TableHandler> {
        Arc::new(Self::new())
    }

    pub fn new() -> Self {
        let schema = Self::schema();
        let descriptor = TableDescriptor {
            name: TABLE,
            description: "Messages in a user's mailbox. Users without a provisioned mailbox yield no rows.",
            columns: schema.defs(),
            list_key_columns: vec![
                KeyColumn::optional("user_id"),
                KeyColumn::optional("subject"),
                KeyColumn::optional("importance"),
                KeyColumn::boolean("is_read"),
                KeyColumn::boolean("has_attachments"),
                KeyColumn::raw_filter(),
            ],
            get_key_columns: vec![],
            ignore_codes: IGNORE,
        };
        Self { descriptor, schema }
    }

    fn schema() -> TableSchema<Message> {
        TableSchema::new(vec![
            Column::new("id", ColumnType::String, "Unique identifier for the message.", |m: &Message| {
                json_str(&m.id)
            }),
            Column::new("subject", ColumnType::String, "Subject line.", |m: &Message| {
                json_string(&m.subject)
            }),
            Column::new("body_preview", ColumnType::String, "First lines of the body.", |m: &Message| {
                json_string(&m.body_preview)
            }),
            Column::new("importance", ColumnType::String, "Low, normal or high.", |m: &Message| {
                json_string(&m.importance)
            }),
            Column::new("inference_classification", ColumnType::String, "Focused or other.", |m: &Message| {
                json_string(&m.inference_classification)
            }),
            Column::new("internet_message_id", ColumnType::String, "RFC 2822 message ID.", |m: &Message| {
                json_string(&m.internet_message_id)
            }),
            Column::new("conversation_id", ColumnType::String, "Conversation thread identifier.", |m: &Message| {
                json_string(&m.conversation_id)
            }),
            Column::new("is_read", ColumnType::Bool, "Whether the message has been read.", |m: &Message| {
                json_bool(&m.is_read)
            }),
            Column::new("is_draft", ColumnType::Bool, "Whether the message is an unsent draft.", |m: &Message| {
                json_bool(&m.is_draft)
            }),
            Column::new("has_attachments", ColumnType::Bool, "Whether the message carries attachments.", |m: &Message| {
                json_bool(&m.has_attachments)
            }),
            Column::new("from_address", ColumnType::String, "SMTP address of the From header.", |m: &Message| {
                m.from_address().and_then(json_str)
            }),
            Column::new("sender_address", ColumnType::String, "SMTP address of the actual sender.", |m: &Message| {
                m.sender_address().and_then(json_str)
            }),
            Column::new("to_recipients", ColumnType::Json, "To line recipients.", |m: &Message| {
                json_list(&m.to_recipients)
            }),
            Column::new("cc_recipients", ColumnType::Json, "Cc line recipients.", |m: &Message| {
                json_list(&m.cc_recipients)
            }),
            Column::new("categories", ColumnType::Json, "Categories assigned to the message.", |m: &Message| {
                json_list(&m.categories)
            }),
            Column::new("received_date_time", ColumnType::Timestamp, "When the message was received.", |m: &Message| {
                json_timestamp(&m.received_date_time)
            }),
            Column::new("sent_date_time", ColumnType::Timestamp, "When the message was sent.", |m: &Message| {
                json_timestamp(&m.sent_date_time)
            }),
            Column::new("web_link", ColumnType::String, "Link to the message in Outlook on the web.", |m: &Message| {
                json_string(&m.web_link)
            }),
            Column::new("user_id", ColumnType::String, "ID or principal name of the mailbox owner.", |_| None),
            Column::new("filter", ColumnType::String, "Raw OData $filter passed through to the remote API.", |_| None),
        ])
    }
}

#[async_trait]
impl TableHandler for MailMessageTable {
    fn descriptor(&self) -> &TableDescriptor {
        &self.descriptor
    }

    async fn list(&self, conn: &ConnectionContext, ctx: &QueryContext) -> anyhow::Result<()> {
        let result = async {
            let user_id = resolve_user_id(conn, ctx)?;
            let client = conn.client().await.context("Failed to create Graph client")?;
            let filter = build_filter(ctx.quals(), &["user_id"])?;
            let path = QueryBuilder::new(format!("users/{}/messages", user_id))
                .select(MESSAGE_SELECT)
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
            .with_context(|| format!("Failed to list messages for user {}", user_id))
        }
        .await;
        suppress_ignorable(result, TABLE, IGNORE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::query::{FilterValue, Qual};
    use std::collections::HashMap;

    #[test]
    fn boolean_keys_translate_including_negation() {
        let mut quals = HashMap::new();
        quals.insert("user_id".to_string(), Qual::equal(FilterValue::String("u1".into())));
        quals.insert(
            "has_attachments".to_string(),
            Qual::not_equal(FilterValue::Bool(true)),
        );
        quals.insert("is_read".to_string(), Qual::equal(FilterValue::Bool(true)));
        let filter = build_filter(&quals, &["user_id"]).unwrap().unwrap();
        assert!(filter.contains("HasAttachments eq false"));
        assert!(filter.contains("IsRead eq true"));
        assert!(!filter.contains("UserId"));
    }
}
