//! The `m365_application` table

use anyhow::Context as _;
use async_trait::async_trait;
use std::sync::Arc;

use crate::api::manager::ConnectionContext;
use crate::api::query::{QueryBuilder, build_filter};
use crate::models::directory::{APPLICATION_SELECT, Application};
use crate::models::{json_list, json_str, json_string, json_timestamp, json_value};
use crate::plugin::{
    Column, ColumnType, KeyColumn, QueryContext, TableDescriptor, TableHandler, TableSchema,
};
use crate::tables::{echoed_filter, stream_collection, suppress_ignorable};

const TABLE: &str = "m365_application";
const IGNORE: &[&str] = &["Request_ResourceNotFound"];

pub struct ApplicationTable {
    descriptor: TableDescriptor,
    schema: TableSchema<Application>,
}

impl ApplicationTable {
    pub fn handler() -> Arc<dyn TableHandler> {
        Arc::new(Self::new())
    }

    pub fn new() -> Self {
        let schema = Self::schema();
        let descriptor = TableDescriptor {
            name: TABLE,
            description: "Application registrations owned by the tenant.",
            columns: schema.defs(),
            list_key_columns: vec![
                KeyColumn::optional("display_name"),
                KeyColumn::optional("app_id"),
                KeyColumn::raw_filter(),
            ],
            get_key_columns: vec![KeyColumn::required("id")],
            ignore_codes: IGNORE,
        };
        Self { descriptor, schema }
    }

    fn schema() -> TableSchema<Application> {
        TableSchema::new(vec![
            Column::new("id", ColumnType::String, "Unique identifier for the application object.", |a: &Application| {
                json_str(&a.id)
            }),
            Column::new("app_id", ColumnType::String, "Application (client) ID.", |a: &Application| {
                json_string(&a.app_id)
            }),
            Column::new("display_name", ColumnType::String, "Display name.", |a: &Application| {
                json_string(&a.display_name)
            }),
            Column::new("sign_in_audience", ColumnType::String, "Supported account types.", |a: &Application| {
                json_string(&a.sign_in_audience)
            }),
            Column::new("publisher_domain", ColumnType::String, "Verified publisher domain.", |a: &Application| {
                json_string(&a.publisher_domain)
            }),
            Column::new("home_page_url", ColumnType::String, "Home page from the web facet.", |a: &Application| {
                a.home_page_url().and_then(json_str)
            }),
            Column::new("redirect_uris", ColumnType::Json, "OAuth redirect URIs from the web facet.", |a: &Application| {
                json_list(a.redirect_uris())
            }),
            Column::new("created_date_time", ColumnType::Timestamp, "When the registration was created.", |a: &Application| {
                json_timestamp(&a.created_date_time)
            }),
            Column::new("identifier_uris", ColumnType::Json, "Identifier URIs.", |a: &Application| {
                json_list(&a.identifier_uris)
            }),
            Column::new("tags", ColumnType::Json, "Custom tags.", |a: &Application| {
                json_list(&a.tags)
            }),
            Column::new("web", ColumnType::Json, "Full web facet.", |a: &Application| {
                json_value(&a.web)
            }),
            Column::new("filter", ColumnType::String, "Raw OData $filter passed through to the remote API.", |_| None),
        ])
    }
}

#[async_trait]
impl TableHandler for ApplicationTable {
    fn descriptor(&self) -> &TableDescriptor {
        &self.descriptor
    }

    async fn list(&self, conn: &ConnectionContext, ctx: &QueryContext) -> anyhow::Result<()> {
        let result = async {
            let client = conn.client().await.context("Failed to create Graph client")?;
            let filter = build_filter(ctx.quals(), &[])?;
            let path = QueryBuilder::new("applications")
                .select(APPLICATION_SELECT)
                .filter(filter)
                .top(Some(ctx.top_hint()))
                .build();
            stream_collection(&client, &path, &self.schema, ctx, &[echoed_filter(ctx)])
                .await
                .context("Failed to list applications")
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
            let app: Application = client
                .get(&format!("applications/{}?$select={}", id, APPLICATION_SELECT))
                .await
                .with_context(|| format!("Failed to get application {}", id))?;
            ctx.emit(self.schema.row(&app));
            Ok(())
        }
        .await;
        suppress_ignorable(result, TABLE, IGNORE)
    }
}
