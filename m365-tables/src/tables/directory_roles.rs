//! The `m365_directory_role` table

use anyhow::Context as _;
use async_trait::async_trait;
use std::sync::Arc;

use crate::api::manager::ConnectionContext;
use crate::api::query::QueryBuilder;
use crate::models::directory::DirectoryRole;
use crate::models::{json_str, json_string};
use crate::plugin::{
    Column, ColumnType, KeyColumn, QueryContext, TableDescriptor, TableHandler, TableSchema,
};
use crate::tables::{stream_collection, suppress_ignorable};

const TABLE: &str = "m365_directory_role";
const IGNORE: &[&str] = &["Request_ResourceNotFound"];

pub struct DirectoryRoleTable {
    descriptor: TableDescriptor,
    schema: TableSchema<DirectoryRole>,
}

impl DirectoryRoleTable {
    pub fn handler() -> Arc<dyn TableHandler> {
        Arc::new(Self::new())
    }

    pub fn new() -> Self {
        let schema = Self::schema();
        let descriptor = TableDescriptor {
            name: TABLE,
            description: "Directory roles activated in the tenant.",
            columns: schema.defs(),
            // directoryRoles accepts neither $filter nor $top.
            list_key_columns: vec![],
            get_key_columns: vec![KeyColumn::required("id")],
            ignore_codes: IGNORE,
        };
        Self { descriptor, schema }
    }

    fn schema() -> TableSchema<DirectoryRole> {
        TableSchema::new(vec![
            Column::new("id", ColumnType::String, "Unique identifier for the role.", |r: &DirectoryRole| {
                json_str(&r.id)
            }),
            Column::new("display_name", ColumnType::String, "Display name.", |r: &DirectoryRole| {
                json_string(&r.display_name)
            }),
            Column::new("description", ColumnType::String, "Role description.", |r: &DirectoryRole| {
                json_string(&r.description)
            }),
            Column::new("role_template_id", ColumnType::String, "Template the role was activated from.", |r: &DirectoryRole| {
                json_string(&r.role_template_id)
            }),
        ])
    }
}

#[async_trait]
impl TableHandler for DirectoryRoleTable {
    fn descriptor(&self) -> &TableDescriptor {
        &self.descriptor
    }

    async fn list(&self, conn: &ConnectionContext, ctx: &QueryContext) -> anyhow::Result<()> {
        let result = async {
            let client = conn.client().await.context("Failed to create Graph client")?;
            let path = QueryBuilder::new("directoryRoles").build();
            stream_collection(&client, &path, &self.schema, ctx, &[])
                .await
                .context("Failed to list directory roles")
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
            let role: DirectoryRole = client
                .get(&format!("directoryRoles/{}", id))
                .await
                .with_context(|| format!("Failed to get directory role {}", id))?;
            ctx.emit(self.schema.row(&role));
            Ok(())
        }
        .await;
        suppress_ignorable(result, TABLE, IGNORE)
    }
}
