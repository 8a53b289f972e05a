//! Upstream user, adapted from the versioned wire document.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gatesync_core::{ConnectorResult, ResourceError};

use crate::wire::{
    BOT_LABEL, CreatedBy, ExternalIdentity, KIND_USER, LoginStatus, Metadata,
    RESOURCE_TYPE_LABEL, SYSTEM_RESOURCE_TYPE, USER_VERSION, UserDocument, UserSpecV2,
};

/// Trait key holding the OS logins a user may assume.
pub const LOGINS_TRAIT: &str = "logins";

// ─────────────────────────────────────────────────────────────────────────────
// Classification
// ─────────────────────────────────────────────────────────────────────────────

/// What kind of principal a user record represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserKind {
    Human,
    /// Machine identity (bot).
    Service,
    /// Built-in backend identity.
    System,
}

impl core::fmt::Display for UserKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            UserKind::Human => write!(f, "human"),
            UserKind::Service => write!(f, "service"),
            UserKind::System => write!(f, "system"),
        }
    }
}

/// Where a user's identity lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    Local,
    /// Federated through an SSO connector.
    Sso,
}

impl core::fmt::Display for UserType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            UserType::Local => write!(f, "local"),
            UserType::Sso => write!(f, "sso"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SsoProtocol {
    Oidc,
    Saml,
    Github,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SsoIdentity {
    pub protocol: SsoProtocol,
    pub connector_id: String,
    pub username: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// User
// ─────────────────────────────────────────────────────────────────────────────

/// A user record as the connector sees it.
///
/// `roles` is the single source of truth for role membership and keeps the
/// upstream order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub namespace: String,
    pub description: String,
    pub revision: String,
    pub labels: BTreeMap<String, String>,
    pub roles: Vec<String>,
    pub traits: BTreeMap<String, Vec<String>>,
    pub sso_identities: Vec<SsoIdentity>,
    /// `None` when upstream did not report a lock state.
    pub locked: Option<bool>,
    pub locked_message: String,
    pub created_by: Option<CreatedBy>,
    pub expires: Option<DateTime<Utc>>,
}

impl User {
    /// A new local user with the given roles.
    pub fn new_local(name: impl Into<String>, roles: Vec<String>) -> Self {
        Self {
            name: name.into(),
            namespace: "default".to_string(),
            description: String::new(),
            revision: String::new(),
            labels: BTreeMap::new(),
            roles,
            traits: BTreeMap::new(),
            sso_identities: Vec::new(),
            locked: None,
            locked_message: String::new(),
            created_by: None,
            expires: None,
        }
    }

    pub fn with_trait(mut self, key: impl Into<String>, values: Vec<String>) -> Self {
        self.traits.insert(key.into(), values);
        self
    }

    pub fn is_bot(&self) -> bool {
        self.labels.contains_key(BOT_LABEL)
    }

    pub fn is_system(&self) -> bool {
        self.labels
            .get(RESOURCE_TYPE_LABEL)
            .is_some_and(|v| v == SYSTEM_RESOURCE_TYPE)
    }

    /// system > service > human.
    pub fn kind(&self) -> UserKind {
        if self.is_system() {
            UserKind::System
        } else if self.is_bot() {
            UserKind::Service
        } else {
            UserKind::Human
        }
    }

    pub fn user_type(&self) -> UserType {
        if self.sso_identities.is_empty() {
            UserType::Local
        } else {
            UserType::Sso
        }
    }

    pub fn logins(&self) -> &[String] {
        self.traits
            .get(LOGINS_TRAIT)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Append `login` unless already present. Returns whether it was added.
    pub fn add_login(&mut self, login: &str) -> bool {
        let logins = self.traits.entry(LOGINS_TRAIT.to_string()).or_default();
        if logins.iter().any(|l| l == login) {
            return false;
        }
        logins.push(login.to_string());
        true
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Append `role` unless already present. Returns whether it was added.
    pub fn add_role(&mut self, role: &str) -> bool {
        if self.has_role(role) {
            return false;
        }
        self.roles.push(role.to_string());
        true
    }

    /// Remove every occurrence of `role`, keeping the others in order.
    pub fn remove_role(&mut self, role: &str) -> bool {
        let before = self.roles.len();
        self.roles.retain(|r| r != role);
        self.roles.len() != before
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Wire adaptation
    // ─────────────────────────────────────────────────────────────────────────

    pub fn from_document(doc: UserDocument) -> ConnectorResult<Self> {
        if doc.version != USER_VERSION {
            return Err(ResourceError::UnsupportedVersion {
                kind: KIND_USER.to_string(),
                version: doc.version,
                name: doc.metadata.name,
            }
            .into());
        }

        let tag = |protocol: SsoProtocol, ids: Vec<ExternalIdentity>| {
            ids.into_iter().map(move |id| SsoIdentity {
                protocol,
                connector_id: id.connector_id,
                username: id.username,
            })
        };

        let spec = doc.spec;
        let sso_identities = tag(SsoProtocol::Oidc, spec.oidc_identities)
            .chain(tag(SsoProtocol::Saml, spec.saml_identities))
            .chain(tag(SsoProtocol::Github, spec.github_identities))
            .collect();

        Ok(Self {
            name: doc.metadata.name,
            namespace: doc.metadata.namespace,
            description: doc.metadata.description,
            revision: doc.metadata.revision,
            labels: doc.metadata.labels,
            roles: spec.roles,
            traits: spec.traits,
            sso_identities,
            locked: doc.status.is_locked,
            locked_message: doc.status.locked_message,
            created_by: spec.created_by,
            expires: doc.metadata.expires,
        })
    }

    pub fn to_document(&self) -> UserDocument {
        let pick = |protocol: SsoProtocol| {
            self.sso_identities
                .iter()
                .filter(|id| id.protocol == protocol)
                .map(|id| ExternalIdentity {
                    connector_id: id.connector_id.clone(),
                    username: id.username.clone(),
                })
                .collect::<Vec<_>>()
        };

        UserDocument {
            kind: KIND_USER.to_string(),
            version: USER_VERSION.to_string(),
            metadata: Metadata {
                name: self.name.clone(),
                namespace: self.namespace.clone(),
                description: self.description.clone(),
                labels: self.labels.clone(),
                revision: self.revision.clone(),
                id: 0,
                expires: self.expires,
            },
            spec: UserSpecV2 {
                roles: self.roles.clone(),
                traits: self.traits.clone(),
                oidc_identities: pick(SsoProtocol::Oidc),
                saml_identities: pick(SsoProtocol::Saml),
                github_identities: pick(SsoProtocol::Github),
                created_by: self.created_by.clone(),
            },
            status: LoginStatus {
                is_locked: self.locked,
                locked_message: self.locked_message.clone(),
            },
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use gatesync_core::ConnectorError;
    use proptest::prelude::*;

    fn labeled(labels: &[(&str, &str)]) -> User {
        let mut user = User::new_local("robot", vec![]);
        for (k, v) in labels {
            user.labels.insert(k.to_string(), v.to_string());
        }
        user
    }

    #[test]
    fn classification_priority() {
        assert_eq!(labeled(&[]).kind(), UserKind::Human);
        assert_eq!(labeled(&[(BOT_LABEL, "true")]).kind(), UserKind::Service);
        assert_eq!(
            labeled(&[(BOT_LABEL, "true"), (RESOURCE_TYPE_LABEL, "system")]).kind(),
            UserKind::System
        );
        assert_eq!(labeled(&[(RESOURCE_TYPE_LABEL, "other")]).kind(), UserKind::Human);
    }

    #[test]
    fn logins_and_roles_are_deduplicated() {
        let mut user = User::new_local("alice", vec!["admin".into()]);
        assert!(user.add_login("alice"));
        assert!(!user.add_login("alice"));
        assert_eq!(user.logins(), ["alice".to_string()]);

        assert!(!user.add_role("admin"));
        assert!(user.add_role("reviewer"));
        assert_eq!(user.roles, ["admin", "reviewer"]);
    }

    #[test]
    fn document_round_trip_preserves_identities() {
        let mut user = User::new_local("carol", vec!["access".into()]);
        user.sso_identities.push(SsoIdentity {
            protocol: SsoProtocol::Saml,
            connector_id: "okta".into(),
            username: "carol@example.com".into(),
        });
        user.locked = Some(true);

        let back = User::from_document(user.to_document()).unwrap();
        assert_eq!(back, user);
        assert_eq!(back.user_type(), UserType::Sso);
    }

    #[test]
    fn unknown_version_is_a_mapping_error() {
        let mut doc = User::new_local("dave", vec![]).to_document();
        doc.version = "v9".into();
        assert_eq!(
            User::from_document(doc),
            Err(ConnectorError::Mapping(ResourceError::UnsupportedVersion {
                kind: "user".into(),
                version: "v9".into(),
                name: "dave".into(),
            }))
        );
    }

    proptest! {
        #[test]
        fn remove_role_preserves_order(
            roles in proptest::collection::vec("[a-c]{1,2}", 0..12),
            target in "[a-c]{1,2}",
        ) {
            let mut user = User::new_local("u", roles.clone());
            user.remove_role(&target);
            let expected: Vec<String> = roles.into_iter().filter(|r| *r != target).collect();
            prop_assert_eq!(user.roles, expected);
        }
    }
}
