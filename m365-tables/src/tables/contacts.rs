//! The `m365_contact` table

use anyhow::Context as _;
use async_trait::async_trait;
use std::sync::Arc;

use crate::api::manager::ConnectionContext;
use crate::api::query::{QueryBuilder, build_filter};
use crate::models::mail::{CONTACT_SELECT, Contact};
use crate::models::{json_list, json_str, json_string, json_timestamp};
use crate::plugin::{
    Column, ColumnType, KeyColumn, QueryContext, TableDescriptor, TableHandler, TableSchema,
};
use crate::tables::{
    echoed_filter, resolve_user_id, stream_collection, suppress_ignorable,
};

const TABLE: &str = "m365_contact";
const IGNORE: &[&str] = &[
    "ResourceNotFound",
    "ErrorItemNotFound",
    "MailboxNotEnabledForRESTAPI",
];

pub struct ContactTable {
    descriptor: TableDescriptor,
    schema: TableSchema<Contact>,
}

impl ContactTable {
    pub fn handler() -> Arc<dyn TableHandler> {
        Arc::new(Self::new())
    }

    pub fn new() -> Self {
        let schema = Self::schema();
        let descriptor = TableDescriptor {
            name: TABLE,
            description: "Personal contacts in a user's mailbox.",
            columns: schema.defs(),
            list_key_columns: vec![
                KeyColumn::optional("user_id"),
                KeyColumn::optional("given_name"),
                KeyColumn::optional("surname"),
                KeyColumn::raw_filter(),
            ],
            get_key_columns: vec![],
            ignore_codes: IGNORE,
        };
        Self { descriptor, schema }
    }

    fn schema() -> TableSchema<Contact> {
        TableSchema::new(vec![
            Column::new("id", ColumnType::String, "Unique identifier for the contact.", |c: &Contact| {
                json_str(&c.id)
            }),
            Column::new("display_name", ColumnType::String, "Display name.", |c: &Contact| {
                json_string(&c.display_name)
            }),
            Column::new("given_name", ColumnType::String, "Given (first) name.", |c: &Contact| {
                json_string(&c.given_name)
            }),
            Column::new("surname", ColumnType::String, "Surname (last name).", |c: &Contact| {
                json_string(&c.surname)
            }),
            Column::new("middle_name", ColumnType::String, "Middle name.", |c: &Contact| {
                json_string(&c.middle_name)
            }),
            Column::new("nick_name", ColumnType::String, "Nickname.", |c: &Contact| {
                json_string(&c.nick_name)
            }),
            Column::new("company_name", ColumnType::String, "Company.", |c: &Contact| {
                json_string(&c.company_name)
            }),
            Column::new("job_title", ColumnType::String, "Job title.", |c: &Contact| {
                json_string(&c.job_title)
            }),
            Column::new("department", ColumnType::String, "Department.", |c: &Contact| {
                json_string(&c.department)
            }),
            Column::new("primary_email", ColumnType::String, "First listed email address.", |c: &Contact| {
                c.primary_email().and_then(json_str)
            }),
            Column::new("email_addresses", ColumnType::Json, "All email addresses.", |c: &Contact| {
                json_list(&c.email_addresses)
            }),
            Column::new("mobile_phone", ColumnType::String, "Mobile number.", |c: &Contact| {
                json_string(&c.mobile_phone)
            }),
            Column::new("business_phones", ColumnType::Json, "Business phone numbers.", |c: &Contact| {
                json_list(&c.business_phones)
            }),
            Column::new("home_phones", ColumnType::Json, "Home phone numbers.", |c: &Contact| {
                json_list(&c.home_phones)
            }),
            Column::new("personal_notes", ColumnType::String, "Free-form notes.", |c: &Contact| {
                json_string(&c.personal_notes)
            }),
            Column::new("created_date_time", ColumnType::Timestamp, "Creation stamp.", |c: &Contact| {
                json_timestamp(&c.created_date_time)
            }),
            Column::new("last_modified_date_time", ColumnType::Timestamp, "Last modification stamp.", |c: &Contact| {
                json_timestamp(&c.last_modified_date_time)
            }),
            Column::new("user_id", ColumnType::String, "ID or principal name of the mailbox owner.", |_| None),
            Column::new("filter", ColumnType::String, "Raw OData $filter passed through to the remote API.", |_| None),
        ])
    }
}

#[async_trait]
impl TableHandler for ContactTable {
    fn descriptor(&self) -> &TableDescriptor {
        &self.descriptor
    }

    async fn list(&self, conn: &ConnectionContext, ctx: &QueryContext) -> anyhow::Result<()> {
        let result = async {
            let user_id = resolve_user_id(conn, ctx)?;
            let client = conn.client().await.context("Failed to create Graph client")?;
            let filter = build_filter(ctx.quals(), &["user_id"])?;
            let path = QueryBuilder::new(format!("users/{}/contacts", user_id))
                .select(CONTACT_SELECT)
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
            .with_context(|| format!("Failed to list contacts for user {}", user_id))
        }
        .await;
        suppress_ignorable(result, TABLE, IGNORE)
    }
}
