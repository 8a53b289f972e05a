//! Canonical resource representation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::annotations::{Annotation, Annotations};
use crate::error::ResourceError;
use crate::id::ResourceId;
use crate::value_object::ValueObject;

/// Free-form profile attached to a resource trait.
pub type Profile = Map<String, Value>;

/// Structural shape a resource type advertises to the governance platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraitKind {
    User,
    Role,
}

/// Static descriptor of a resource kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResourceType {
    pub id: &'static str,
    pub display_name: &'static str,
    pub traits: &'static [TraitKind],
    pub skip_entitlements_and_grants: bool,
}

impl ResourceType {
    pub fn annotations(&self) -> Annotations {
        let mut annos = Annotations::new();
        if self.skip_entitlements_and_grants {
            annos.push(Annotation::SkipEntitlementsAndGrants);
        }
        annos
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    #[default]
    Unspecified,
    Human,
    Service,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    #[default]
    Unspecified,
    Enabled,
    Disabled,
}

impl UserStatus {
    /// `None` means the upstream object did not report a lock state.
    pub fn from_locked(locked: Option<bool>) -> Self {
        match locked {
            Some(true) => Self::Disabled,
            Some(false) => Self::Enabled,
            None => Self::Unspecified,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    pub address: String,
    pub is_primary: bool,
}

/// User-shaped resource data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserTrait {
    pub profile: Profile,
    pub login: String,
    pub status: UserStatus,
    pub account_type: AccountType,
    pub emails: Vec<Email>,
}

impl UserTrait {
    pub fn new(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            ..Default::default()
        }
    }

    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_status(mut self, status: UserStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_account_type(mut self, account_type: AccountType) -> Self {
        self.account_type = account_type;
        self
    }

    pub fn with_email(mut self, address: impl Into<String>, is_primary: bool) -> Self {
        self.emails.push(Email {
            address: address.into(),
            is_primary,
        });
        self
    }
}

/// Role-shaped resource data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleTrait {
    pub profile: Profile,
}

impl RoleTrait {
    pub fn new(profile: Profile) -> Self {
        Self { profile }
    }
}

/// A synced object.
///
/// Built by a mapper and never mutated afterwards; a fresh one is built on
/// every sync pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    pub display_name: String,
    pub parent_id: Option<ResourceId>,
    pub annotations: Annotations,
}

impl ValueObject for Resource {}

impl Resource {
    pub fn user_trait(&self) -> Option<&UserTrait> {
        self.annotations.user_trait()
    }

    pub fn role_trait(&self) -> Option<&RoleTrait> {
        self.annotations.role_trait()
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.user_trait()
            .map(|t| &t.profile)
            .or_else(|| self.role_trait().map(|t| &t.profile))
    }
}

fn resource_id(resource_type: &ResourceType, id: &str) -> Result<ResourceId, ResourceError> {
    if resource_type.id.is_empty() {
        return Err(ResourceError::EmptyResourceType);
    }
    if id.trim().is_empty() {
        return Err(ResourceError::EmptyId {
            resource_type: resource_type.id.to_string(),
        });
    }
    Ok(ResourceId::new(resource_type.id, id))
}

/// Build a user-shaped resource.
pub fn new_user_resource(
    display_name: &str,
    resource_type: &ResourceType,
    id: &str,
    user_trait: UserTrait,
    parent_id: Option<ResourceId>,
) -> Result<Resource, ResourceError> {
    Ok(Resource {
        id: resource_id(resource_type, id)?,
        display_name: display_name.to_string(),
        parent_id,
        annotations: Annotations::new().with(Annotation::UserTrait(user_trait)),
    })
}

/// Build a role-shaped resource.
pub fn new_role_resource(
    display_name: &str,
    resource_type: &ResourceType,
    id: &str,
    role_trait: RoleTrait,
) -> Result<Resource, ResourceError> {
    Ok(Resource {
        id: resource_id(resource_type, id)?,
        display_name: display_name.to_string(),
        parent_id: None,
        annotations: Annotations::new().with(Annotation::RoleTrait(role_trait)),
    })
}

/// Named secret returned out-of-band (e.g. an account setup link).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaintextData {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl core::fmt::Debug for PlaintextData {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PlaintextData")
            .field("name", &self.name)
            .field("bytes", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDGET: ResourceType = ResourceType {
        id: "widget",
        display_name: "Widget",
        traits: &[TraitKind::Role],
        skip_entitlements_and_grants: false,
    };

    #[test]
    fn empty_id_is_rejected() {
        let err = new_role_resource("w", &WIDGET, "  ", RoleTrait::default()).unwrap_err();
        assert_eq!(
            err,
            ResourceError::EmptyId {
                resource_type: "widget".into()
            }
        );
    }

    #[test]
    fn user_resource_carries_trait_and_parent() {
        let parent = ResourceId::new("role", "admin");
        let trait_ = UserTrait::new("alice")
            .with_status(UserStatus::Enabled)
            .with_email("alice", true);
        let r = new_user_resource("alice", &WIDGET, "alice", trait_, Some(parent.clone())).unwrap();

        assert_eq!(r.parent_id, Some(parent));
        let ut = r.user_trait().unwrap();
        assert_eq!(ut.login, "alice");
        assert_eq!(ut.emails.len(), 1);
        assert!(r.role_trait().is_none());
    }

    #[test]
    fn status_follows_lock_flag() {
        assert_eq!(UserStatus::from_locked(Some(true)), UserStatus::Disabled);
        assert_eq!(UserStatus::from_locked(Some(false)), UserStatus::Enabled);
        assert_eq!(UserStatus::from_locked(None), UserStatus::Unspecified);
    }

    #[test]
    fn plaintext_debug_is_redacted() {
        let p = PlaintextData {
            name: "link".into(),
            bytes: b"https://secret".to_vec(),
        };
        assert!(!format!("{p:?}").contains("secret"));
    }
}
