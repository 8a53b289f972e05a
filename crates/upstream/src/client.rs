//! Client facade over the upstream transport.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use gatesync_core::{ConnectorError, ConnectorResult};

use crate::address::normalize_proxy_address;
use crate::credential::Credential;
use crate::inventory::{App, Database, Node};
use crate::role::Role;
use crate::transport::{DialConfig, Dialer, UpstreamTransport};
use crate::user::User;
use crate::wire::{CreateResetPasswordTokenRequest, KIND_NODE, ListResourcesRequest};

/// Upper bound on connection setup, independent of caller timeouts.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// One page of nodes and the backend's native continuation key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodePage {
    pub nodes: Vec<Node>,
    /// Empty on the last page.
    pub next_key: String,
}

/// One-time credential setup token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetToken {
    pub user: String,
    pub url: String,
    pub expires: Option<DateTime<Utc>>,
}

/// Typed access to the upstream backend.
///
/// Transport failures are propagated unmodified (mapped onto
/// [`ConnectorError`]); nothing is retried here.
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn UpstreamTransport>,
    proxy_address: String,
}

impl core::fmt::Debug for Client {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Client")
            .field("proxy_address", &self.proxy_address)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Dial the proxy, bounded by [`CONNECT_TIMEOUT`].
    #[instrument(skip(dialer, credential), fields(credential = credential.source_name()))]
    pub async fn connect<D: Dialer>(
        dialer: &D,
        proxy_address: &str,
        credential: Credential,
    ) -> ConnectorResult<Self> {
        if proxy_address.trim().is_empty() {
            return Err(ConnectorError::config("proxy address is required"));
        }
        let proxy_address = normalize_proxy_address(proxy_address);

        let config = DialConfig {
            addrs: vec![proxy_address.clone()],
            credential,
        };

        let transport = match tokio::time::timeout(CONNECT_TIMEOUT, dialer.dial(config)).await {
            Ok(Ok(transport)) => transport,
            Ok(Err(err)) => {
                return Err(ConnectorError::auth(format!(
                    "failed to connect to {proxy_address}: {err}"
                )));
            }
            Err(_) => return Err(ConnectorError::Timeout(CONNECT_TIMEOUT)),
        };

        debug!(%proxy_address, "connected to upstream proxy");
        Ok(Self {
            transport: Arc::new(transport),
            proxy_address,
        })
    }

    /// Wrap an already-authenticated transport.
    pub fn from_transport(
        transport: Arc<dyn UpstreamTransport>,
        proxy_address: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            proxy_address: proxy_address.into(),
        }
    }

    pub fn proxy_address(&self) -> &str {
        &self.proxy_address
    }

    #[instrument(skip(self))]
    pub async fn list_users(&self) -> ConnectorResult<Vec<User>> {
        self.transport
            .get_users(false)
            .await?
            .into_iter()
            .map(User::from_document)
            .collect()
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, name: &str) -> ConnectorResult<User> {
        let doc = self.transport.get_user(name, false).await?;
        User::from_document(doc)
    }

    #[instrument(skip(self, user), fields(user = %user.name))]
    pub async fn create_user(&self, user: &User) -> ConnectorResult<User> {
        let doc = self.transport.create_user(user.to_document()).await?;
        User::from_document(doc)
    }

    #[instrument(skip(self, user), fields(user = %user.name))]
    pub async fn update_user(&self, user: &User) -> ConnectorResult<User> {
        let doc = self.transport.update_user(user.to_document()).await?;
        User::from_document(doc)
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, name: &str) -> ConnectorResult<()> {
        Ok(self.transport.delete_user(name).await?)
    }

    #[instrument(skip(self))]
    pub async fn list_roles(&self) -> ConnectorResult<Vec<Role>> {
        let roles = self.transport.get_roles().await?;
        Ok(roles.into_iter().map(Role::from_document).collect())
    }

    /// Fetch one page of nodes starting at `start_key` (`""` for the first).
    ///
    /// `limit == 0` lets the backend pick its default page size.
    #[instrument(skip(self))]
    pub async fn list_nodes_page(&self, start_key: &str, limit: u32) -> ConnectorResult<NodePage> {
        let resp = self
            .transport
            .list_resources(ListResourcesRequest {
                resource_type: KIND_NODE.to_string(),
                start_key: start_key.to_string(),
                limit,
            })
            .await?;

        Ok(NodePage {
            nodes: resp.resources.into_iter().map(Node::from).collect(),
            next_key: resp.next_key,
        })
    }

    #[instrument(skip(self))]
    pub async fn list_apps(&self) -> ConnectorResult<Vec<App>> {
        let apps = self.transport.get_apps().await?;
        Ok(apps.into_iter().map(App::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn list_databases(&self) -> ConnectorResult<Vec<Database>> {
        let dbs = self.transport.get_databases().await?;
        Ok(dbs.into_iter().map(Database::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn create_reset_credential_token(
        &self,
        name: &str,
        ttl: chrono::Duration,
    ) -> ConnectorResult<ResetToken> {
        let doc = self
            .transport
            .create_reset_password_token(CreateResetPasswordTokenRequest {
                name: name.to_string(),
                ttl_secs: ttl.num_seconds(),
            })
            .await?;

        Ok(ResetToken {
            user: doc.user,
            url: doc.url,
            expires: doc.metadata.expires,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::in_memory::{InMemoryDialer, InMemoryTransport};

    fn key() -> Credential {
        Credential::KeyFile("auth.pem".into())
    }

    #[tokio::test]
    async fn connect_normalizes_address() {
        let dialer = InMemoryDialer::new(InMemoryTransport::new());
        let client = Client::connect(&dialer, "https://proxy.example.com", key())
            .await
            .unwrap();

        assert_eq!(client.proxy_address(), "proxy.example.com:443");
        assert_eq!(dialer.dialed_addrs(), vec!["proxy.example.com:443".to_string()]);
    }

    #[tokio::test]
    async fn empty_address_fails_before_dialing() {
        let dialer = InMemoryDialer::new(InMemoryTransport::new());
        let err = Client::connect(&dialer, "  ", key()).await.unwrap_err();

        assert!(matches!(err, ConnectorError::Config(_)));
        assert!(dialer.dialed_addrs().is_empty());
    }

    #[tokio::test]
    async fn rejected_credentials_surface_as_auth_error() {
        let dialer = InMemoryDialer::new(InMemoryTransport::new()).rejecting_credentials();
        let err = Client::connect(&dialer, "proxy:3080", key()).await.unwrap_err();
        assert!(matches!(err, ConnectorError::Auth(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_dial_hits_the_connect_bound() {
        let dialer = InMemoryDialer::new(InMemoryTransport::new())
            .with_delay(CONNECT_TIMEOUT + Duration::from_secs(1));
        let err = Client::connect(&dialer, "proxy", key()).await.unwrap_err();
        assert_eq!(err, ConnectorError::Timeout(CONNECT_TIMEOUT));
    }

    #[tokio::test]
    async fn missing_user_is_not_found() {
        let client = Client::from_transport(Arc::new(InMemoryTransport::new()), "proxy:443");
        let err = client.get_user("ghost").await.unwrap_err();
        assert!(matches!(err, ConnectorError::NotFound(_)));
    }
}
