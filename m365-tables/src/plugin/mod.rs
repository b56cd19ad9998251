//! Host-facing plugin surface
//!
//! A [`Plugin`] is a fixed set of named tables. Each table declares its
//! schema (typed columns with extractors), key columns with the comparison
//! operators they accept, and which structured remote errors it treats as
//! zero rows. The host drives [`TableHandler::list`]/[`TableHandler::get`]
//! with a [`QueryContext`] carrying the pushed-down quals, the row limit,
//! and the row sink.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::mpsc;

use crate::api::constants::MAX_PAGE_SIZE;
use crate::api::manager::ConnectionContext;
use crate::api::query::{CompareOp, Qual};

/// A produced row: column name to scalar/JSON value. Transient; the host
/// owns anything beyond emission.
pub type Row = serde_json::Map<String, Value>;

/// Column value type as declared to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    String,
    Bool,
    Int,
    Timestamp,
    Json,
}

/// Which operation populates a column. Most come straight from the list
/// response; `Get` marks columns the host should fill through the per-row
/// get binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hydrate {
    List,
    Get,
}

/// Schema-level column description, as exposed to the host.
#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub name: &'static str,
    pub ty: ColumnType,
    pub description: &'static str,
    pub hydrate: Hydrate,
}

/// A typed column: its description plus an extractor over the concrete
/// model type. Extractors are plain function pointers; no dynamic dispatch
/// over remote-object shapes.
pub struct Column<T> {
    pub def: ColumnDef,
    pub extract: fn(&T) -> Option<Value>,
}

impl<T> Column<T> {
    pub fn new(
        name: &'static str,
        ty: ColumnType,
        description: &'static str,
        extract: fn(&T) -> Option<Value>,
    ) -> Self {
        Self {
            def: ColumnDef {
                name,
                ty,
                description,
                hydrate: Hydrate::List,
            },
            extract,
        }
    }

    /// A column populated by the per-row get binding rather than the list
    /// response.
    pub fn from_get(
        name: &'static str,
        ty: ColumnType,
        description: &'static str,
        extract: fn(&T) -> Option<Value>,
    ) -> Self {
        Self {
            def: ColumnDef {
                name,
                ty,
                description,
                hydrate: Hydrate::Get,
            },
            extract,
        }
    }
}

/// Ordered column set for one table.
pub struct TableSchema<T> {
    columns: Vec<Column<T>>,
}

impl<T> TableSchema<T> {
    pub fn new(columns: Vec<Column<T>>) -> Self {
        Self { columns }
    }

    pub fn defs(&self) -> Vec<ColumnDef> {
        self.columns.iter().map(|c| c.def.clone()).collect()
    }

    /// Flatten one remote object into a row. Absent values become SQL-style
    /// nulls so every row carries the full column set.
    pub fn row(&self, item: &T) -> Row {
        let mut row = Row::new();
        for column in &self.columns {
            let value = (column.extract)(item).unwrap_or(Value::Null);
            row.insert(column.def.name.to_string(), value);
        }
        row
    }
}

/// A column the host may push quals on.
#[derive(Debug, Clone)]
pub struct KeyColumn {
    pub column: &'static str,
    pub required: bool,
    pub operators: &'static [CompareOp],
}

const EQUAL_ONLY: &[CompareOp] = &[CompareOp::Equal];
const EQUAL_OR_NOT: &[CompareOp] = &[CompareOp::Equal, CompareOp::NotEqual];

impl KeyColumn {
    pub fn required(column: &'static str) -> Self {
        Self {
            column,
            required: true,
            operators: EQUAL_ONLY,
        }
    }

    pub fn optional(column: &'static str) -> Self {
        Self {
            column,
            required: false,
            operators: EQUAL_ONLY,
        }
    }

    /// Boolean key column: the only type for which `<>` is translatable.
    pub fn boolean(column: &'static str) -> Self {
        Self {
            column,
            required: false,
            operators: EQUAL_OR_NOT,
        }
    }

    /// The raw OData filter escape hatch.
    pub fn raw_filter() -> Self {
        Self {
            column: crate::api::query::RAW_FILTER_COLUMN,
            required: false,
            operators: EQUAL_ONLY,
        }
    }
}

/// Everything the host declares about one table.
#[derive(Debug, Clone)]
pub struct TableDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub columns: Vec<ColumnDef>,
    pub list_key_columns: Vec<KeyColumn>,
    pub get_key_columns: Vec<KeyColumn>,
    /// Structured error codes (or message substrings) this table treats as
    /// an empty result instead of a failure.
    pub ignore_codes: &'static [&'static str],
}

/// One queryable table.
#[async_trait]
pub trait TableHandler: Send + Sync {
    fn descriptor(&self) -> &TableDescriptor;

    /// Stream matching rows into the context until exhausted or the context
    /// reports no more rows are wanted.
    async fn list(&self, conn: &ConnectionContext, ctx: &QueryContext) -> anyhow::Result<()>;

    /// Fetch a single row by the get key columns. Tables without a stable
    /// single-object binding keep the default.
    async fn get(&self, _conn: &ConnectionContext, _ctx: &QueryContext) -> anyhow::Result<()> {
        anyhow::bail!("table {} does not support get", self.descriptor().name)
    }
}

/// Per-query state: pushed-down quals, row limit, cancellation, row sink.
/// Cancellation is cooperative; handlers consult the return value of
/// [`QueryContext::emit`] (or [`QueryContext::rows_remaining`] once per page
/// in hierarchical listings).
pub struct QueryContext {
    quals: HashMap<String, Qual>,
    limit: Option<u64>,
    emitted: AtomicU64,
    stopped: AtomicBool,
    sink: mpsc::UnboundedSender<Row>,
}

impl QueryContext {
    /// Returns the context plus the receiving end of the row stream.
    pub fn new(
        quals: HashMap<String, Qual>,
        limit: Option<u64>,
    ) -> (Self, mpsc::UnboundedReceiver<Row>) {
        let (sink, rows) = mpsc::unbounded_channel();
        (
            Self {
                quals,
                limit,
                emitted: AtomicU64::new(0),
                stopped: AtomicBool::new(false),
                sink,
            },
            rows,
        )
    }

    pub fn quals(&self) -> &HashMap<String, Qual> {
        &self.quals
    }

    /// The string value of an equality qual on `column`, if pushed down.
    pub fn qual_string(&self, column: &str) -> Option<&str> {
        let qual = self.quals.get(column)?;
        if qual.operator != CompareOp::Equal {
            return None;
        }
        qual.value.as_str()
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    /// `$top` hint for the first page: the row limit capped at the Graph
    /// page ceiling, or the ceiling itself when no limit was declared.
    pub fn top_hint(&self) -> u32 {
        self.limit
            .map_or(MAX_PAGE_SIZE, |l| l.min(u64::from(MAX_PAGE_SIZE)) as u32)
    }

    /// Host-side cancellation.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Relaxed);
    }

    /// True while the query wants more rows.
    pub fn rows_remaining(&self) -> bool {
        if self.stopped.load(Ordering::Relaxed) {
            return false;
        }
        match self.limit {
            Some(limit) => self.emitted.load(Ordering::Relaxed) < limit,
            None => true,
        }
    }

    /// Send one row to the host. Returns false when the handler should stop:
    /// the limit is reached, the host cancelled, or the receiver is gone.
    /// A row offered past the limit is dropped, never forwarded.
    pub fn emit(&self, row: Row) -> bool {
        if !self.rows_remaining() {
            return false;
        }
        if self.sink.send(row).is_err() {
            self.stopped.store(true, Ordering::Relaxed);
            return false;
        }
        self.emitted.fetch_add(1, Ordering::Relaxed);
        self.rows_remaining()
    }
}

/// The registered table set, handed to the host at initialization.
pub struct Plugin {
    name: &'static str,
    tables: Vec<Arc<dyn TableHandler>>,
}

impl Plugin {
    pub fn new(name: &'static str, tables: Vec<Arc<dyn TableHandler>>) -> Self {
        Self { name, tables }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn tables(&self) -> &[Arc<dyn TableHandler>] {
        &self.tables
    }

    pub fn table(&self, name: &str) -> Option<&Arc<dyn TableHandler>> {
        self.tables.iter().find(|t| t.descriptor().name == name)
    }
}
