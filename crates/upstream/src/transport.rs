//! The wire-client seam.
//!
//! Implementations own authentication, RPC transport and any retries internal
//! to the wire client. The facade adds nothing on top beyond the connect bound.

use async_trait::async_trait;
use thiserror::Error;

use gatesync_core::ConnectorError;

use crate::credential::Credential;
use crate::wire::{
    AppDocument, CreateResetPasswordTokenRequest, DatabaseDocument, ListResourcesRequest,
    ListResourcesResponse, ResetPasswordTokenDocument, RoleDocument, UserDocument,
};

/// Failure reported by the wire client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// A conditional write lost against a concurrent change.
    #[error("compare failed: {0}")]
    CompareFailed(String),

    #[error("bad parameter: {0}")]
    BadParameter(String),

    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("connection problem: {0}")]
    ConnectionProblem(String),
}

impl From<TransportError> for ConnectorError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::NotFound(m) => ConnectorError::NotFound(m),
            TransportError::AlreadyExists(m) | TransportError::CompareFailed(m) => {
                ConnectorError::Conflict(m)
            }
            TransportError::BadParameter(m) => ConnectorError::Validation(m),
            TransportError::AccessDenied(m) => ConnectorError::Auth(m),
            TransportError::ConnectionProblem(m) => ConnectorError::Transport(m),
        }
    }
}

/// Operations consumed from the upstream backend.
#[async_trait]
pub trait UpstreamTransport: Send + Sync {
    async fn get_users(&self, with_secrets: bool) -> Result<Vec<UserDocument>, TransportError>;

    async fn get_user(&self, name: &str, with_secrets: bool) -> Result<UserDocument, TransportError>;

    async fn create_user(&self, user: UserDocument) -> Result<UserDocument, TransportError>;

    async fn update_user(&self, user: UserDocument) -> Result<UserDocument, TransportError>;

    async fn delete_user(&self, name: &str) -> Result<(), TransportError>;

    async fn get_roles(&self) -> Result<Vec<RoleDocument>, TransportError>;

    /// Paginated listing; only `"node"` is requested by the connector.
    async fn list_resources(
        &self,
        request: ListResourcesRequest,
    ) -> Result<ListResourcesResponse, TransportError>;

    async fn get_apps(&self) -> Result<Vec<AppDocument>, TransportError>;

    async fn get_databases(&self) -> Result<Vec<DatabaseDocument>, TransportError>;

    async fn create_reset_password_token(
        &self,
        request: CreateResetPasswordTokenRequest,
    ) -> Result<ResetPasswordTokenDocument, TransportError>;
}

/// What a dialer needs to open an authenticated transport.
#[derive(Debug, Clone)]
pub struct DialConfig {
    pub addrs: Vec<String>,
    pub credential: Credential,
}

/// Opens authenticated transports.
#[async_trait]
pub trait Dialer: Send + Sync {
    type Transport: UpstreamTransport + 'static;

    async fn dial(&self, config: DialConfig) -> Result<Self::Transport, TransportError>;
}
