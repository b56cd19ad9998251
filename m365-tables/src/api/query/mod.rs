//! OData query construction
//!
//! Predicate-to-`$filter` translation plus a fluent builder for request
//! paths with `$select`/`$filter`/`$top`/`$expand` options.

pub mod builder;
pub mod filters;

pub use builder::QueryBuilder;
pub use filters::{
    CompareOp, FilterValue, Qual, RAW_FILTER_COLUMN, build_filter, to_api_field,
};
