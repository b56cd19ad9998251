//! The `m365_user` table

use anyhow::Context as _;
use async_trait::async_trait;
use std::sync::Arc;

use crate::api::manager::ConnectionContext;
use crate::api::query::{QueryBuilder, build_filter};
use crate::models::directory::{USER_SELECT, User};
use crate::models::{json_bool, json_list, json_str, json_string, json_timestamp};
use crate::plugin::{
    Column, ColumnType, KeyColumn, QueryContext, TableDescriptor, TableHandler, TableSchema,
};
use crate::tables::{echoed_filter, stream_collection, suppress_ignorable};

const TABLE: &str = "m365_user";
const IGNORE: &[&str] = &["Request_ResourceNotFound"];

pub struct UserTable {
    descriptor: TableDescriptor,
    schema: TableSchema<User>,
}

impl UserTable {
    pub fn handler() -> Arc<dyn TableHandler> {
        Arc::new(Self::new())
    }

    pub fn new() -> Self {
        let schema = Self::schema();
        let descriptor = TableDescriptor {
            name: TABLE,
            description: "Users in the directory, including member and guest accounts.",
            columns: schema.defs(),
            list_key_columns: vec![
                KeyColumn::optional("user_principal_name"),
                KeyColumn::optional("user_type"),
                KeyColumn::optional("surname"),
                KeyColumn::boolean("account_enabled"),
                KeyColumn::raw_filter(),
            ],
            get_key_columns: vec![KeyColumn::required("id")],
            ignore_codes: IGNORE,
        };
        Self { descriptor, schema }
    }

    fn schema() -> TableSchema<User> {
        TableSchema::new(vec![
            Column::new("id", ColumnType::String, "Unique identifier for the user.", |u: &User| {
                json_str(&u.id)
            }),
            Column::new("display_name", ColumnType::String, "Name displayed in the address book.", |u: &User| {
                json_string(&u.display_name)
            }),
            Column::new("user_principal_name", ColumnType::String, "Principal name, usually the sign-in address.", |u: &User| {
                json_string(&u.user_principal_name)
            }),
            Column::new("mail", ColumnType::String, "Primary SMTP address.", |u: &User| {
                json_string(&u.mail)
            }),
            Column::new("given_name", ColumnType::String, "Given (first) name.", |u: &User| {
                json_string(&u.given_name)
            }),
            Column::new("surname", ColumnType::String, "Surname (last name).", |u: &User| {
                json_string(&u.surname)
            }),
            Column::new("user_type", ColumnType::String, "Member or Guest.", |u: &User| {
                json_string(&u.user_type)
            }),
            Column::new("account_enabled", ColumnType::Bool, "Whether the account can sign in.", |u: &User| {
                json_bool(&u.account_enabled)
            }),
            Column::new("job_title", ColumnType::String, "Job title.", |u: &User| {
                json_string(&u.job_title)
            }),
            Column::new("department", ColumnType::String, "Department.", |u: &User| {
                json_string(&u.department)
            }),
            Column::new("mobile_phone", ColumnType::String, "Primary mobile number.", |u: &User| {
                json_string(&u.mobile_phone)
            }),
            Column::new("office_location", ColumnType::String, "Office location.", |u: &User| {
                json_string(&u.office_location)
            }),
            Column::new("preferred_language", ColumnType::String, "Preferred language, ISO 639-1.", |u: &User| {
                json_string(&u.preferred_language)
            }),
            Column::new("employee_id", ColumnType::String, "Organization-assigned employee identifier.", |u: &User| {
                json_string(&u.employee_id)
            }),
            Column::new("usage_location", ColumnType::String, "Two-letter usage location for license checks.", |u: &User| {
                json_string(&u.usage_location)
            }),
            Column::new("created_date_time", ColumnType::Timestamp, "When the user object was created.", |u: &User| {
                json_timestamp(&u.created_date_time)
            }),
            Column::new("business_phones", ColumnType::Json, "Business phone numbers.", |u: &User| {
                json_list(&u.business_phones)
            }),
            Column::new("im_addresses", ColumnType::Json, "Instant-messaging addresses.", |u: &User| {
                json_list(&u.im_addresses)
            }),
            Column::new("filter", ColumnType::String, "Raw OData $filter passed through to the remote API.", |_| None),
        ])
    }
}

#[async_trait]
impl TableHandler for UserTable {
    fn descriptor(&self) -> &TableDescriptor {
        &self.descriptor
    }

    async fn list(&self, conn: &ConnectionContext, ctx: &QueryContext) -> anyhow::Result<()> {
        let result = async {
            let client = conn.client().await.context("Failed to create Graph client")?;
            let filter = build_filter(ctx.quals(), &[])?;
            let path = QueryBuilder::new("users")
                .select(USER_SELECT)
                .filter(filter)
                .top(Some(ctx.top_hint()))
                .build();
            stream_collection(&client, &path, &self.schema, ctx, &[echoed_filter(ctx)])
                .await
                .context("Failed to list users")
        }
        .await;
        suppress_ignorable(result, TABLE, IGNORE)
    }

    async fn get(&self, conn: &ConnectionContext, ctx: &QueryContext) -> anyhow::Result<()> {
        let Some(id) = ctx.qual_string("id") else {
            anyhow::bail!("get on {} requires an id qual", TABLE);
        };
        let result = async {
            let client = conn.client().await.context("Failed to create Graph client")?;
            let user: User = client
                .get(&format!("users/{}?$select={}", id, USER_SELECT))
                .await
                .with_context(|| format!("Failed to get user {}", id))?;
            ctx.emit(self.schema.row(&user));
            Ok(())
        }
        .await;
        suppress_ignorable(result, TABLE, IGNORE)
    }
}
