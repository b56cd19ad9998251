//! Microsoft 365 / Entra ID objects as queryable relational tables
//!
//! This crate is a data-source plugin: it registers a fixed set of named
//! tables (users, groups, calendars, mail, drives, teams, service
//! principals, ...) with a host query engine and answers list/get calls by
//! driving the Microsoft Graph REST API.
//!
//! The interesting parts live in [`api`]: multi-strategy credential
//! resolution (client secret, client certificate, managed identity, Azure
//! CLI fallback), a per-connection compute-once session cache, OData
//! `$filter` translation of pushed-down predicates, and a paginating Graph
//! client. Everything in [`tables`] is declarative mapping on top of that.
//!
//! ```no_run
//! use m365_tables::api::{ClientConfig, ConnectionContext};
//! use m365_tables::plugin::{QueryContext, TableHandler as _};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let plugin = m365_tables::plugin();
//! let conn = ConnectionContext::new(&ClientConfig::default());
//! let (ctx, mut rows) = QueryContext::new(Default::default(), Some(100));
//!
//! let users = plugin.table("m365_user").unwrap();
//! users.list(&conn, &ctx).await?;
//! while let Some(row) = rows.recv().await {
//!     println!("{}", serde_json::Value::Object(row));
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod models;
pub mod plugin;
pub mod tables;

pub use api::{ClientConfig, ConnectionContext, GraphError};
pub use plugin::{Plugin, QueryContext, Row, TableHandler};

/// Build the plugin with every table registered.
pub fn plugin() -> Plugin {
    Plugin::new("m365", tables::all_tables())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plugin_registers_the_full_table_set() {
        let plugin = plugin();
        assert_eq!(plugin.tables().len(), 14);
        assert!(plugin.table("m365_user").is_some());
        assert!(plugin.table("m365_mail_message").is_some());
        assert!(plugin.table("m365_drive_item").is_some());
        assert!(plugin.table("no_such_table").is_none());
    }
}
