//! Versioned wire documents exchanged with the upstream transport.
//!
//! These mirror the backend's resource encoding. Only the client facade
//! touches them; the connector sees the adapted types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const KIND_USER: &str = "user";
pub const KIND_ROLE: &str = "role";
pub const KIND_NODE: &str = "node";
pub const KIND_APP: &str = "app";
pub const KIND_DATABASE: &str = "db";

pub const USER_VERSION: &str = "v2";
pub const ROLE_VERSION: &str = "v7";

/// Label marking a user as a machine (bot) identity.
pub const BOT_LABEL: &str = "teleport.internal/bot";
/// Label carrying the internal resource classification.
pub const RESOURCE_TYPE_LABEL: &str = "teleport.internal/resource-type";
pub const SYSTEM_RESOURCE_TYPE: &str = "system";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub revision: String,
    /// Legacy numeric id; zero when unset.
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub expires: Option<DateTime<Utc>>,
}

impl Metadata {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: "default".to_string(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedBy {
    #[serde(default)]
    pub user: String,
    pub time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalIdentity {
    pub connector_id: String,
    pub username: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSpecV2 {
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub traits: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub oidc_identities: Vec<ExternalIdentity>,
    #[serde(default)]
    pub saml_identities: Vec<ExternalIdentity>,
    #[serde(default)]
    pub github_identities: Vec<ExternalIdentity>,
    #[serde(default)]
    pub created_by: Option<CreatedBy>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginStatus {
    /// Absent when the backend did not report a lock state.
    #[serde(default)]
    pub is_locked: Option<bool>,
    #[serde(default)]
    pub locked_message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDocument {
    pub kind: String,
    pub version: String,
    pub metadata: Metadata,
    #[serde(default)]
    pub spec: UserSpecV2,
    #[serde(default)]
    pub status: LoginStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleOptionsDocument {
    /// 0 = off, 1 = per-session, 2 = hardware key, matching the backend enum.
    #[serde(default)]
    pub require_session_mfa: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleConditionsDocument {
    #[serde(default)]
    pub logins: Vec<String>,
    #[serde(default)]
    pub node_labels: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSpecDocument {
    #[serde(default)]
    pub options: RoleOptionsDocument,
    #[serde(default)]
    pub allow: RoleConditionsDocument,
    #[serde(default)]
    pub deny: RoleConditionsDocument,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDocument {
    pub kind: String,
    pub version: String,
    pub metadata: Metadata,
    #[serde(default)]
    pub spec: RoleSpecDocument,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerDocument {
    pub kind: String,
    pub version: String,
    pub metadata: Metadata,
    #[serde(default)]
    pub hostname: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppDocument {
    pub kind: String,
    pub version: String,
    pub metadata: Metadata,
    #[serde(default)]
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseDocument {
    pub kind: String,
    pub version: String,
    pub metadata: Metadata,
    #[serde(default)]
    pub protocol: String,
    #[serde(default)]
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListResourcesRequest {
    pub resource_type: String,
    #[serde(default)]
    pub start_key: String,
    #[serde(default)]
    pub limit: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListResourcesResponse {
    pub resources: Vec<ServerDocument>,
    #[serde(default)]
    pub next_key: String,
    #[serde(default)]
    pub total_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateResetPasswordTokenRequest {
    pub name: String,
    /// Token lifetime in seconds.
    pub ttl_secs: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetPasswordTokenDocument {
    pub metadata: Metadata,
    pub user: String,
    pub url: String,
}
