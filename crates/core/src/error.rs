//! Connector error model.

use std::time::Duration;

use thiserror::Error;

/// Result type used across the connector.
pub type ConnectorResult<T> = Result<T, ConnectorError>;

/// Rejection from a resource constructor (malformed upstream object).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResourceError {
    #[error("resource of type '{resource_type}' has an empty id")]
    EmptyId { resource_type: String },

    #[error("resource type id is empty")]
    EmptyResourceType,

    #[error("unsupported {kind} version '{version}' for '{name}'")]
    UnsupportedVersion {
        kind: String,
        version: String,
        name: String,
    },
}

/// Connector-level error.
///
/// Nothing is retried at this layer; each variant is surfaced to the caller
/// as-is.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectorError {
    /// Missing or conflicting configuration (address, credential sources).
    #[error("configuration error: {0}")]
    Config(String),

    /// Connection or credential rejected by the upstream backend.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// A principal or role is missing upstream.
    #[error("not found: {0}")]
    NotFound(String),

    /// A non-user principal was presented to a role-membership operation.
    #[error("invalid principal type '{principal_type}': {message}")]
    InvalidPrincipalType {
        principal_type: String,
        message: String,
    },

    /// Upstream rejected a mutation because of a concurrent change.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Input or upstream mutation failed validation.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A resource mapper rejected an upstream object.
    #[error("mapping failed: {0}")]
    Mapping(#[from] ResourceError),

    /// Any other upstream transport failure, passed through verbatim.
    #[error("upstream transport failure: {0}")]
    Transport(String),

    /// A bounded operation did not finish in time.
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

impl ConnectorError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invalid_principal_type(
        principal_type: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        Self::InvalidPrincipalType {
            principal_type: principal_type.into(),
            message: msg.into(),
        }
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Fatal for the whole sync pass (as opposed to a single operation).
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Auth(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_error_becomes_mapping_error() {
        let err: ConnectorError = ResourceError::EmptyId {
            resource_type: "node".into(),
        }
        .into();

        assert!(matches!(err, ConnectorError::Mapping(_)));
        assert!(err.to_string().contains("node"));
    }

    #[test]
    fn only_config_and_auth_are_fatal() {
        assert!(ConnectorError::config("x").is_fatal());
        assert!(ConnectorError::auth("x").is_fatal());
        assert!(!ConnectorError::not_found("alice").is_fatal());
        assert!(!ConnectorError::conflict("stale").is_fatal());
    }
}
