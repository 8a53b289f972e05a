//! Connector metadata and account provisioning types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::annotations::Annotations;
use crate::resource::{PlaintextData, Profile, Resource};

/// A field the platform should collect when creating an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountField {
    pub display_name: String,
    pub required: bool,
    pub description: String,
    pub placeholder: String,
    pub order: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountCreationSchema {
    pub fields: BTreeMap<String, AccountField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorMetadata {
    pub display_name: String,
    pub description: String,
    pub account_creation_schema: Option<AccountCreationSchema>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialOption {
    NoPassword,
    RandomPassword,
    Sso,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountProvisioningDetails {
    pub supported_credential_options: Vec<CredentialOption>,
    pub preferred_credential_option: CredentialOption,
}

/// Account request as submitted by the platform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub profile: Profile,
}

impl AccountInfo {
    /// String field from the profile; missing, non-string and blank values
    /// all read as `None`.
    pub fn string_field(&self, key: &str) -> Option<&str> {
        self.profile
            .get(key)
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAccountResponse {
    pub resource: Resource,
    pub plaintext: Vec<PlaintextData>,
    pub annotations: Annotations,
}
