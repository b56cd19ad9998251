//! The `m365_team` table

use anyhow::Context as _;
use async_trait::async_trait;
use std::sync::Arc;

use crate::api::manager::ConnectionContext;
use crate::api::query::QueryBuilder;
use crate::models::teamwork::Team;
use crate::models::{json_bool, json_str, json_string, json_timestamp};
use crate::plugin::{
    Column, ColumnType, KeyColumn, QueryContext, TableDescriptor, TableHandler, TableSchema,
};
use crate::tables::{resolve_user_id, stream_collection, suppress_ignorable};

const TABLE: &str = "m365_team";
const IGNORE: &[&str] = &["NotFound", "Request_ResourceNotFound"];

pub struct TeamTable {
    descriptor: TableDescriptor,
    schema: TableSchema<Team>,
}

impl TeamTable {
    pub fn handler() -> Arc<dyn TableHandler> {
        Arc::new(Self::new())
    }

    pub fn new() -> Self {
        let schema = Self::schema();
        let descriptor = TableDescriptor {
            name: TABLE,
            description: "Teams the user has joined.",
            columns: schema.defs(),
            list_key_columns: vec![KeyColumn::optional("user_id")],
            get_key_columns: vec![KeyColumn::required("id")],
            ignore_codes: IGNORE,
        };
        Self { descriptor, schema }
    }

    fn schema() -> TableSchema<Team> {
        TableSchema::new(vec![
            Column::new("id", ColumnType::String, "Unique identifier for the team.", |t: &Team| {
                json_str(&t.id)
            }),
            Column::new("display_name", ColumnType::String, "Team name.", |t: &Team| {
                json_string(&t.display_name)
            }),
            Column::new("description", ColumnType::String, "Team description.", |t: &Team| {
                json_string(&t.description)
            }),
            Column::new("is_archived", ColumnType::Bool, "Whether the team is read-only archived.", |t: &Team| {
                json_bool(&t.is_archived)
            }),
            // joinedTeams returns a reduced projection; these come from the
            // single-team read.
            Column::from_get("internal_id", ColumnType::String, "Internal chat service identifier.", |t: &Team| {
                json_string(&t.internal_id)
            }),
            Column::from_get("specialization", ColumnType::String, "Team specialization.", |t: &Team| {
                json_string(&t.specialization)
            }),
            Column::from_get("visibility", ColumnType::String, "Public or private.", |t: &Team| {
                json_string(&t.visibility)
            }),
            Column::from_get("classification", ColumnType::String, "Tenant-defined classification label.", |t: &Team| {
                json_string(&t.classification)
            }),
            Column::from_get("web_url", ColumnType::String, "Deep link to the team.", |t: &Team| {
                json_string(&t.web_url)
            }),
            Column::from_get("created_date_time", ColumnType::Timestamp, "Creation stamp.", |t: &Team| {
                json_timestamp(&t.created_date_time)
            }),
            Column::new("user_id", ColumnType::String, "ID or principal name of the member user the listing ran as.", |_| None),
        ])
    }
}

#[async_trait]
impl TableHandler for TeamTable {
    fn descriptor(&self) -> &TableDescriptor {
        &self.descriptor
    }

    async fn list(&self, conn: &ConnectionContext, ctx: &QueryContext) -> anyhow::Result<()> {
        let result = async {
            let user_id = resolve_user_id(conn, ctx)?;
            let client = conn.client().await.context("Failed to create Graph client")?;
            let path = QueryBuilder::new(format!("users/{}/joinedTeams", user_id)).build();
            stream_collection(
                &client,
                &path,
                &self.schema,
                ctx,
                &[("user_id", Some(user_id.clone()))],
            )
            .await
            .with_context(|| format!("Failed to list joined teams for user {}", user_id))
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
            let team: Team = client
                .get(&format!("teams/{}", id))
                .await
                .with_context(|| format!("Failed to get team {}", id))?;
            ctx.emit(self.schema.row(&team));
            Ok(())
        }
        .await;
        suppress_ignorable(result, TABLE, IGNORE)
    }
}
