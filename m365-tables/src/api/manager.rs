//! Per-connection context and session cache
//!
//! One `ConnectionContext` exists per host connection and is handed to every
//! table handler. The session lives in a compute-once cell: concurrent
//! queries on the same connection share a single resolution, and repeated
//! calls return the identical session.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;

use super::auth::{AuthManager, Session};
use super::client::{GraphClient, RetryConfig};
use super::constants;
use super::error::GraphResult;
use super::models::{ClientConfig, CredentialSet};

#[derive(Debug)]
pub struct ConnectionContext {
    creds: CredentialSet,
    http: reqwest::Client,
    session: OnceCell<Arc<Session>>,
    base_url_override: Option<String>,
}

impl ConnectionContext {
    /// Build a context from host-supplied connection configuration.
    /// Credentials are resolved (connection values over environment
    /// variables) exactly once, here.
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            creds: CredentialSet::resolve(config),
            http: http_client(),
            session: OnceCell::new(),
            base_url_override: None,
        }
    }

    /// Build a context around an already-authenticated session and an
    /// explicit API root, bypassing credential resolution.
    pub fn with_session(
        config: &ClientConfig,
        session: Arc<Session>,
        base_url: impl Into<String>,
    ) -> Self {
        let cell = OnceCell::new();
        cell.set(session).expect("fresh cell");
        Self {
            creds: CredentialSet::resolve(config),
            http: http_client(),
            session: cell,
            base_url_override: Some(base_url.into()),
        }
    }

    /// The connection's session, resolving it on first use. Concurrent
    /// callers share one resolution; later callers get the cached value.
    pub async fn session(&self) -> GraphResult<&Arc<Session>> {
        self.session
            .get_or_try_init(|| async {
                let session = AuthManager::resolve(&self.creds).await?;
                log::info!(
                    "Session established for tenant {}",
                    session.tenant_id()
                );
                Ok(Arc::new(session))
            })
            .await
    }

    /// A Graph client with default retry behavior.
    pub async fn client(&self) -> GraphResult<GraphClient> {
        self.client_with_retry(RetryConfig::default()).await
    }

    /// A Graph client with explicit retry behavior, for tables that opt out
    /// of transient retries.
    pub async fn client_with_retry(&self, retry: RetryConfig) -> GraphResult<GraphClient> {
        let session = self.session().await?;
        let base_url = match &self.base_url_override {
            Some(url) => url.clone(),
            None => format!(
                "{}/{}",
                session.environment().graph_endpoint(),
                constants::API_VERSION
            ),
        };
        Ok(GraphClient::new(
            self.http.clone(),
            Arc::clone(session),
            base_url,
            retry,
        ))
    }

    /// Configured default user identifier for per-user tables queried
    /// without an explicit `user_id` qual.
    pub fn default_user_id(&self) -> Option<&str> {
        self.creds.default_user_id.as_deref()
    }
}

fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .build()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret_config() -> ClientConfig {
        ClientConfig {
            tenant_id: Some("tenant".into()),
            client_id: Some("client".into()),
            client_secret: Some("secret".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn session_is_resolved_once_and_shared() {
        let ctx = ConnectionContext::new(&secret_config());
        let first = Arc::clone(ctx.session().await.unwrap());
        let second = Arc::clone(ctx.session().await.unwrap());
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.tenant_id(), "tenant");
    }

    #[tokio::test]
    async fn clients_share_the_cached_session() {
        let ctx = ConnectionContext::new(&secret_config());
        let a = ctx.client().await.unwrap();
        let b = ctx.client_with_retry(RetryConfig::disabled()).await.unwrap();
        assert!(Arc::ptr_eq(a.session(), b.session()));
    }

    #[tokio::test]
    async fn base_url_follows_the_cloud_environment() {
        let config = ClientConfig {
            environment: Some("AZUREUSGOVERNMENTCLOUD".into()),
            ..secret_config()
        };
        let ctx = ConnectionContext::new(&config);
        let client = ctx.client().await.unwrap();
        assert_eq!(client.base_url(), "https://graph.microsoft.us/v1.0");
    }
}
