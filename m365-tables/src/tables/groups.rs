//! The `m365_group` table

use anyhow::Context as _;
use async_trait::async_trait;
use std::sync::Arc;

use crate::api::manager::ConnectionContext;
use crate::api::query::{QueryBuilder, build_filter};
use crate::models::directory::{GROUP_SELECT, Group};
use crate::models::{json_bool, json_list, json_str, json_string, json_timestamp};
use crate::plugin::{
    Column, ColumnType, KeyColumn, QueryContext, TableDescriptor, TableHandler, TableSchema,
};
use crate::tables::{echoed_filter, stream_collection, suppress_ignorable};

const TABLE: &str = "m365_group";
const IGNORE: &[&str] = &["Request_ResourceNotFound", "Request_UnsupportedQuery"];

pub struct GroupTable {
    descriptor: TableDescriptor,
    schema: TableSchema<Group>,
}

impl GroupTable {
    pub fn handler() -> Arc<dyn TableHandler> {
        Arc::new(Self::new())
    }

    pub fn new() -> Self {
        let schema = Self::schema();
        let descriptor = TableDescriptor {
            name: TABLE,
            description: "Security and Microsoft 365 groups in the directory.",
            columns: schema.defs(),
            list_key_columns: vec![
                KeyColumn::optional("mail_nickname"),
                KeyColumn::boolean("mail_enabled"),
                KeyColumn::boolean("security_enabled"),
                KeyColumn::raw_filter(),
            ],
            get_key_columns: vec![KeyColumn::required("id")],
            ignore_codes: IGNORE,
        };
        Self { descriptor, schema }
    }

    fn schema() -> TableSchema<Group> {
        TableSchema::new(vec![
            Column::new("id", ColumnType::String, "Unique identifier for the group.", |g: &Group| {
                json_str(&g.id)
            }),
            Column::new("display_name", ColumnType::String, "Display name.", |g: &Group| {
                json_string(&g.display_name)
            }),
            Column::new("description", ColumnType::String, "Optional description.", |g: &Group| {
                json_string(&g.description)
            }),
            Column::new("mail", ColumnType::String, "SMTP address of the group.", |g: &Group| {
                json_string(&g.mail)
            }),
            Column::new("mail_nickname", ColumnType::String, "Mail alias, unique in the tenant.", |g: &Group| {
                json_string(&g.mail_nickname)
            }),
            Column::new("mail_enabled", ColumnType::Bool, "Whether the group is mail-enabled.", |g: &Group| {
                json_bool(&g.mail_enabled)
            }),
            Column::new("security_enabled", ColumnType::Bool, "Whether the group is a security group.", |g: &Group| {
                json_bool(&g.security_enabled)
            }),
            Column::new("visibility", ColumnType::String, "Public, Private or HiddenMembership.", |g: &Group| {
                json_string(&g.visibility)
            }),
            Column::new("classification", ColumnType::String, "Tenant-defined classification label.", |g: &Group| {
                json_string(&g.classification)
            }),
            Column::new("is_assignable_to_role", ColumnType::Bool, "Whether directory roles can be assigned to the group.", |g: &Group| {
                json_bool(&g.is_assignable_to_role)
            }),
            Column::new("is_unified", ColumnType::Bool, "Whether this is a Microsoft 365 group.", |g: &Group| {
                Some(serde_json::Value::Bool(g.is_unified()))
            }),
            Column::new("created_date_time", ColumnType::Timestamp, "When the group was created.", |g: &Group| {
                json_timestamp(&g.created_date_time)
            }),
            Column::new("expiration_date_time", ColumnType::Timestamp, "When the group expires under the tenant's lifecycle policy.", |g: &Group| {
                json_timestamp(&g.expiration_date_time)
            }),
            Column::new("renewed_date_time", ColumnType::Timestamp, "Last lifecycle renewal.", |g: &Group| {
                json_timestamp(&g.renewed_date_time)
            }),
            Column::new("group_types", ColumnType::Json, "Group type markers.", |g: &Group| {
                json_list(&g.group_types)
            }),
            Column::new("filter", ColumnType::String, "Raw OData $filter passed through to the remote API.", |_| None),
        ])
    }
}

#[async_trait]
impl TableHandler for GroupTable {
    fn descriptor(&self) -> &TableDescriptor {
        &self.descriptor
    }

    async fn list(&self, conn: &ConnectionContext, ctx: &QueryContext) -> anyhow::Result<()> {
        let result = async {
            let client = conn.client().await.context("Failed to create Graph client")?;
            let filter = build_filter(ctx.quals(), &[])?;
            let path = QueryBuilder::new("groups")
                .select(GROUP_SELECT)
                .filter(filter)
                .top(Some(ctx.top_hint()))
                .build();
            stream_collection(&client, &path, &self.schema, ctx, &[echoed_filter(ctx)])
                .await
                .context("Failed to list groups")
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
            let group: Group = client
                .get(&format!("groups/{}?$select={}", id, GROUP_SELECT))
                .await
                .with_context(|| format!("Failed to get group {}", id))?;
            ctx.emit(self.schema.row(&group));
            Ok(())
        }
        .await;
        suppress_ignorable(result, TABLE, IGNORE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unified_marker_becomes_a_column() {
        let table = GroupTable::new();
        let group: Group = serde_json::from_value(json!({
            "id": "g-1",
            "displayName": "All Hands",
            "groupTypes": ["Unified"]
        }))
        .unwrap();
        let row = table.schema.row(&group);
        assert_eq!(row.get("is_unified"), Some(&json!(true)));
    }
}
