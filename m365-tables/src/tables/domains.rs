//! The `m365_domain` table

use anyhow::Context as _;
use async_trait::async_trait;
use std::sync::Arc;

use crate::api::manager::ConnectionContext;
use crate::api::query::QueryBuilder;
use crate::models::directory::Domain;
use crate::models::{json_bool, json_int, json_list, json_str, json_string};
use crate::plugin::{
    Column, ColumnType, KeyColumn, QueryContext, TableDescriptor, TableHandler, TableSchema,
};
use crate::tables::{stream_collection, suppress_ignorable};

const TABLE: &str = "m365_domain";
const IGNORE: &[&str] = &["Request_ResourceNotFound"];

pub struct DomainTable {
    descriptor: TableDescriptor,
    schema: TableSchema<Domain>,
}

impl DomainTable {
    pub fn handler() -> Arc<dyn TableHandler> {
        Arc::new(Self::new())
    }

    pub fn new() -> Self {
        let schema = Self::schema();
        let descriptor = TableDescriptor {
            name: TABLE,
            description: "Domains registered with the tenant.",
            columns: schema.defs(),
            // The domains endpoint accepts no server-side filtering.
            list_key_columns: vec![],
            get_key_columns: vec![KeyColumn::required("id")],
            ignore_codes: IGNORE,
        };
        Self { descriptor, schema }
    }

    fn schema() -> TableSchema<Domain> {
        TableSchema::new(vec![
            Column::new("id", ColumnType::String, "Fully qualified domain name.", |d: &Domain| {
                json_str(&d.id)
            }),
            Column::new("authentication_type", ColumnType::String, "Managed or Federated.", |d: &Domain| {
                json_string(&d.authentication_type)
            }),
            Column::new("is_admin_managed", ColumnType::Bool, "Whether DNS validation is complete.", |d: &Domain| {
                json_bool(&d.is_admin_managed)
            }),
            Column::new("is_default", ColumnType::Bool, "Whether new objects default to this domain.", |d: &Domain| {
                json_bool(&d.is_default)
            }),
            Column::new("is_initial", ColumnType::Bool, "Whether this is the initial onmicrosoft.com domain.", |d: &Domain| {
                json_bool(&d.is_initial)
            }),
            Column::new("is_root", ColumnType::Bool, "Whether this is a root domain.", |d: &Domain| {
                json_bool(&d.is_root)
            }),
            Column::new("is_verified", ColumnType::Bool, "Whether ownership is verified.", |d: &Domain| {
                json_bool(&d.is_verified)
            }),
            Column::new("password_notification_window_in_days", ColumnType::Int, "Days before expiry that users are notified.", |d: &Domain| {
                json_int(&d.password_notification_window_in_days)
            }),
            Column::new("password_validity_period_in_days", ColumnType::Int, "Password validity period.", |d: &Domain| {
                json_int(&d.password_validity_period_in_days)
            }),
            Column::new("supported_services", ColumnType::Json, "Capabilities enabled for the domain.", |d: &Domain| {
                json_list(&d.supported_services)
            }),
        ])
    }
}

#[async_trait]
impl TableHandler for DomainTable {
    fn descriptor(&self) -> &TableDescriptor {
        &self.descriptor
    }

    async fn list(&self, conn: &ConnectionContext, ctx: &QueryContext) -> anyhow::Result<()> {
        let result = async {
            let client = conn.client().await.context("Failed to create Graph client")?;
            let path = QueryBuilder::new("domains").top(Some(ctx.top_hint())).build();
            stream_collection(&client, &path, &self.schema, ctx, &[])
                .await
                .context("Failed to list domains")
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
            let domain: Domain = client
                .get(&format!("domains/{}", id))
                .await
                .with_context(|| format!("Failed to get domain {}", id))?;
            ctx.emit(self.schema.row(&domain));
            Ok(())
        }
        .await;
        suppress_ignorable(result, TABLE, IGNORE)
    }
}
