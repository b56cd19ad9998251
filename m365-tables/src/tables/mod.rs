//! Table handlers
//!
//! One module per table. Every handler follows the same shape: a declarative
//! descriptor (columns, key columns, ignorable error codes) plus a listing
//! that resolves the connection session, builds a filtered request, walks
//! the page iterator and emits rows until the context wants no more.

pub mod applications;
pub mod calendar_events;
pub mod calendars;
pub mod contacts;
pub mod directory_roles;
pub mod domains;
pub mod drive_items;
pub mod drives;
pub mod groups;
pub mod mail_messages;
pub mod service_principals;
pub mod team_channels;
pub mod teams;
pub mod users;

use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::api::client::GraphClient;
use crate::api::error::{GraphError, GraphResult, is_ignorable_in};
use crate::api::manager::ConnectionContext;
use crate::plugin::{QueryContext, TableHandler, TableSchema};

/// Every table the plugin registers, in registration order.
pub fn all_tables() -> Vec<Arc<dyn TableHandler>> {
    vec![
        users::UserTable::handler(),
        groups::GroupTable::handler(),
        service_principals::ServicePrincipalTable::handler(),
        applications::ApplicationTable::handler(),
        domains::DomainTable::handler(),
        directory_roles::DirectoryRoleTable::handler(),
        calendars::CalendarTable::handler(),
        calendar_events::CalendarEventTable::handler(),
        contacts::ContactTable::handler(),
        mail_messages::MailMessageTable::handler(),
        drives::DriveTable::handler(),
        drive_items::DriveItemTable::handler(),
        teams::TeamTable::handler(),
        team_channels::TeamChannelTable::handler(),
    ]
}

/// The user a per-user listing targets: the pushed-down `user_id` qual,
/// else the connection's default user identifier.
pub(crate) fn resolve_user_id(
    conn: &ConnectionContext,
    ctx: &QueryContext,
) -> GraphResult<String> {
    ctx.qual_string("user_id")
        .map(str::to_string)
        .or_else(|| conn.default_user_id().map(str::to_string))
        .ok_or(GraphError::MissingUserId)
}

/// The raw-filter qual echoed back as the `filter` column value.
pub(crate) fn echoed_filter(ctx: &QueryContext) -> (&'static str, Option<String>) {
    (
        crate::api::query::RAW_FILTER_COLUMN,
        ctx.qual_string(crate::api::query::RAW_FILTER_COLUMN)
            .map(str::to_string),
    )
}

/// Walk all pages of `path`, flattening each item through the schema and
/// emitting until the context reports no more rows are wanted. `extra`
/// carries qual-bound column values (`user_id`, the filter echo) copied
/// into every row.
pub(crate) async fn stream_collection<T: DeserializeOwned>(
    client: &GraphClient,
    path: &str,
    schema: &TableSchema<T>,
    ctx: &QueryContext,
    extra: &[(&'static str, Option<String>)],
) -> GraphResult<()> {
    client
        .list_pages::<T, _>(path, |items| {
            for item in items {
                let mut row = schema.row(&item);
                for (column, value) in extra {
                    if let Some(v) = value {
                        row.insert((*column).to_string(), serde_json::Value::String(v.clone()));
                    }
                }
                if !ctx.emit(row) {
                    return false;
                }
            }
            true
        })
        .await
}

/// Convert failures a table declared ignorable into an empty result.
pub(crate) fn suppress_ignorable(
    result: anyhow::Result<()>,
    table: &str,
    codes: &[&str],
) -> anyhow::Result<()> {
    match result {
        Err(err) if is_ignorable_in(&err, codes) => {
            log::debug!("Table {}: suppressing ignorable error: {:#}", table, err);
            Ok(())
        }
        other => {
            if let Err(err) = &other {
                log::error!("Table {}: {:#}", table, err);
            }
            other
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn table_names_are_unique_and_prefixed() {
        let tables = all_tables();
        let mut seen = HashSet::new();
        for table in &tables {
            let name = table.descriptor().name;
            assert!(name.starts_with("m365_"), "bad table name {name}");
            assert!(seen.insert(name), "duplicate table name {name}");
        }
        assert_eq!(tables.len(), 14);
    }

    #[test]
    fn column_names_are_unique_per_table() {
        for table in all_tables() {
            let descriptor = table.descriptor();
            let mut seen = HashSet::new();
            for column in &descriptor.columns {
                assert!(
                    seen.insert(column.name),
                    "duplicate column {} in {}",
                    column.name,
                    descriptor.name
                );
            }
        }
    }

    #[test]
    fn key_columns_reference_declared_columns_or_the_escape_hatch() {
        for table in all_tables() {
            let descriptor = table.descriptor();
            let columns: HashSet<&str> =
                descriptor.columns.iter().map(|c| c.name).collect();
            for key in descriptor
                .list_key_columns
                .iter()
                .chain(&descriptor.get_key_columns)
            {
                assert!(
                    columns.contains(key.column),
                    "key column {} not declared in {}",
                    key.column,
                    descriptor.name
                );
            }
        }
    }

    #[tokio::test]
    async fn missing_user_id_is_a_query_time_error() {
        use crate::api::models::ClientConfig;
        let conn = ConnectionContext::new(&ClientConfig::default());
        let (ctx, _rows) = QueryContext::new(Default::default(), None);
        let err = resolve_user_id(&conn, &ctx).unwrap_err();
        assert!(matches!(err, GraphError::MissingUserId));
    }
}
