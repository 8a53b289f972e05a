use serde::{Deserialize, Serialize};

use crate::annotations::Annotations;
use crate::entitlement::{Entitlement, new_assignment_entitlement};
use crate::id::ResourceId;
use crate::resource::Resource;
use crate::value_object::ValueObject;

/// Assertion that `principal` holds `entitlement`.
///
/// Recomputed from upstream state on every call; never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grant {
    pub id: String,
    pub entitlement: Entitlement,
    pub principal: ResourceId,
    pub annotations: Annotations,
}

impl ValueObject for Grant {}

/// Build a grant of `resource`'s `slug` entitlement to `principal`.
pub fn new_grant(resource: &Resource, slug: &str, principal: ResourceId) -> Grant {
    let entitlement = new_assignment_entitlement(resource, slug);
    Grant {
        id: format!("{}:{}", entitlement.id, principal),
        entitlement,
        principal,
        annotations: Annotations::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{ResourceType, RoleTrait, TraitKind, new_role_resource};

    const ROLE: ResourceType = ResourceType {
        id: "role",
        display_name: "Role",
        traits: &[TraitKind::Role],
        skip_entitlements_and_grants: false,
    };

    #[test]
    fn grant_ids_follow_platform_convention() {
        let role = new_role_resource("reviewer", &ROLE, "reviewer", RoleTrait::default()).unwrap();
        let g = new_grant(&role, "member", ResourceId::new("user", "alice"));

        assert_eq!(g.entitlement.id, "role:reviewer:member");
        assert_eq!(g.id, "role:reviewer:member:user:alice");
        assert_eq!(g.entitlement.resource.id, role.id);
    }
}
