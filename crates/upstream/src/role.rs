use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use gatesync_core::{ConnectorError, ConnectorResult};

use crate::wire::{
    KIND_ROLE, Metadata, ROLE_VERSION, RoleConditionsDocument, RoleDocument, RoleOptionsDocument,
    RoleSpecDocument,
};

/// Second-factor requirement for starting a session under a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequireMfaType {
    #[default]
    Off,
    Session,
    HardwareKey,
}

impl RequireMfaType {
    fn from_wire(value: i32) -> Self {
        match value {
            1 => Self::Session,
            2 => Self::HardwareKey,
            _ => Self::Off,
        }
    }

    fn to_wire(self) -> i32 {
        match self {
            Self::Off => 0,
            Self::Session => 1,
            Self::HardwareKey => 2,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleOptions {
    pub require_session_mfa: RequireMfaType,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleConditions {
    pub logins: Vec<String>,
    pub node_labels: BTreeMap<String, Vec<String>>,
}

/// Upstream role. Its name is its stable identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
    pub revision: String,
    pub description: String,
    pub options: RoleOptions,
    pub allow: RoleConditions,
    pub deny: RoleConditions,
}

impl Role {
    /// Build a role, rejecting an empty name the way the backend would.
    pub fn new(
        name: impl Into<String>,
        options: RoleOptions,
        allow: RoleConditions,
    ) -> ConnectorResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ConnectorError::validation("role name must not be empty"));
        }
        Ok(Self {
            name,
            revision: String::new(),
            description: String::new(),
            options,
            allow,
            deny: RoleConditions::default(),
        })
    }

    pub fn from_document(doc: RoleDocument) -> Self {
        let conditions = |c: RoleConditionsDocument| RoleConditions {
            logins: c.logins,
            node_labels: c.node_labels,
        };
        Self {
            name: doc.metadata.name,
            revision: doc.metadata.revision,
            description: doc.metadata.description,
            options: RoleOptions {
                require_session_mfa: RequireMfaType::from_wire(doc.spec.options.require_session_mfa),
            },
            allow: conditions(doc.spec.allow),
            deny: conditions(doc.spec.deny),
        }
    }

    pub fn to_document(&self) -> RoleDocument {
        let conditions = |c: &RoleConditions| RoleConditionsDocument {
            logins: c.logins.clone(),
            node_labels: c.node_labels.clone(),
        };
        RoleDocument {
            kind: KIND_ROLE.to_string(),
            version: ROLE_VERSION.to_string(),
            metadata: Metadata {
                description: self.description.clone(),
                revision: self.revision.clone(),
                ..Metadata::named(self.name.clone())
            },
            spec: RoleSpecDocument {
                options: RoleOptionsDocument {
                    require_session_mfa: self.options.require_session_mfa.to_wire(),
                },
                allow: conditions(&self.allow),
                deny: conditions(&self.deny),
            },
        }
    }
}
