//! The `m365_team_channel` table

use anyhow::Context as _;
use async_trait::async_trait;
use std::sync::Arc;

use crate::api::error::GraphError;
use crate::api::manager::ConnectionContext;
use crate::api::query::QueryBuilder;
use crate::models::teamwork::Channel;
use crate::models::{json_bool, json_str, json_string, json_timestamp};
use crate::plugin::{
    Column, ColumnType, KeyColumn, QueryContext, TableDescriptor, TableHandler, TableSchema,
};
use crate::tables::{stream_collection, suppress_ignorable};

const TABLE: &str = "m365_team_channel";
const IGNORE: &[&str] = &["NotFound", "Request_ResourceNotFound"];

pub struct TeamChannelTable {
    descriptor: TableDescriptor,
    schema: TableSchema<Channel>,
}

impl TeamChannelTable {
    pub fn handler() -> Arc<dyn TableHandler> {
        Arc::new(Self::new())
    }

    pub fn new() -> Self {
        let schema = Self::schema();
        let descriptor = TableDescriptor {
            name: TABLE,
            description: "Channels of a team. Requires a team_id qual.",
            columns: schema.defs(),
            list_key_columns: vec![KeyColumn::required("team_id")],
            get_key_columns: vec![KeyColumn::required("team_id"), KeyColumn::required("id")],
            ignore_codes: IGNORE,
        };
        Self { descriptor, schema }
    }

    fn schema() -> TableSchema<Channel> {
        TableSchema::new(vec![
            Column::new("id", ColumnType::String, "Unique identifier for the channel.", |c: &Channel| {
                json_str(&c.id)
            }),
            Column::new("display_name", ColumnType::String, "Channel name.", |c: &Channel| {
                json_string(&c.display_name)
            }),
            Column::new("description", ColumnType::String, "Channel description.", |c: &Channel| {
                json_string(&c.description)
            }),
            Column::new("email", ColumnType::String, "Email address for posting into the channel.", |c: &Channel| {
                json_string(&c.email)
            }),
            Column::new("membership_type", ColumnType::String, "standard, private or shared.", |c: &Channel| {
                json_string(&c.membership_type)
            }),
            Column::new("web_url", ColumnType::String, "Deep link to the channel.", |c: &Channel| {
                json_string(&c.web_url)
            }),
            Column::new("is_favorite_by_default", ColumnType::Bool, "Whether the channel is auto-favorited for members.", |c: &Channel| {
                json_bool(&c.is_favorite_by_default)
            }),
            Column::new("created_date_time", ColumnType::Timestamp, "Creation stamp.", |c: &Channel| {
                json_timestamp(&c.created_date_time)
            }),
            Column::new("team_id", ColumnType::String, "Team the channel belongs to.", |_| None),
        ])
    }
}

#[async_trait]
impl TableHandler for TeamChannelTable {
    fn descriptor(&self) -> &TableDescriptor {
        &self.descriptor
    }

    async fn list(&self, conn: &ConnectionContext, ctx: &QueryContext) -> anyhow::Result<()> {
        let result = async {
            let team_id = ctx
                .qual_string("team_id")
                .map(str::to_string)
                .ok_or_else(|| {
                    GraphError::UnsupportedQual(format!(
                        "{} requires an equality qual on team_id",
                        TABLE
                    ))
                })?;
            let client = conn.client().await.context("Failed to create Graph client")?;
            let path = QueryBuilder::new(format!("teams/{}/channels", team_id)).build();
            stream_collection(
                &client,
                &path,
                &self.schema,
                ctx,
                &[("team_id", Some(team_id.clone()))],
            )
            .await
            .with_context(|| format!("Failed to list channels for team {}", team_id))
        }
        .await;
        suppress_ignorable(result, TABLE, IGNORE)
    }

    async fn get(&self, conn: &ConnectionContext, ctx: &QueryContext) -> anyhow::Result<()> {
        let (Some(team_id), Some(id)) = (ctx.qual_string("team_id"), ctx.qual_string("id"))
        else {
            anyhow::bail!("get on {} requires team_id and id quals", TABLE);
        };
        let result = async {
            let client = conn.client().await.context("Failed to create Graph client")?;
            let channel: Channel = client
                .get(&format!("teams/{}/channels/{}", team_id, id))
                .await
                .with_context(|| format!("Failed to get channel {} in team {}", id, team_id))?;
            let mut row = self.schema.row(&channel);
            row.insert("team_id".into(), team_id.into());
            ctx.emit(row);
            Ok(())
        }
        .await;
        suppress_ignorable(result, TABLE, IGNORE)
    }
}
