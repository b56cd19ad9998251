//! Graph API layer
//!
//! Credential resolution, multi-strategy authentication, the per-connection
//! session cache, the HTTP client with page iteration, error classification,
//! and OData query construction. Table handlers sit on top of this module.

pub mod auth;
pub mod client;
pub mod constants;
pub mod error;
pub mod manager;
pub mod models;
pub mod query;

pub use auth::{AuthManager, AuthStrategy, Authorizer, Session, TokenCredential};
pub use client::{GraphClient, ODataPage, RetryConfig};
pub use error::{GraphError, GraphResult, NormalizedError, classify, is_ignorable};
pub use manager::ConnectionContext;
pub use models::{ClientConfig, CloudEnvironment, CredentialSet, TokenInfo};
pub use query::{CompareOp, FilterValue, Qual, QueryBuilder};
