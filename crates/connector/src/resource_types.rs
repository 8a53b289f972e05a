//! Resource-type descriptors for the five synced kinds.

use gatesync_core::{ResourceType, TraitKind};

/// Slug of the single assignment entitlement on every non-user resource.
pub const MEMBERSHIP: &str = "member";

/// Users are leaves: they hold no entitlements themselves.
pub const USER: ResourceType = ResourceType {
    id: "user",
    display_name: "User",
    traits: &[TraitKind::User],
    skip_entitlements_and_grants: true,
};

pub const ROLE: ResourceType = ResourceType {
    id: "role",
    display_name: "Role",
    traits: &[TraitKind::Role],
    skip_entitlements_and_grants: false,
};

// Nodes, apps and databases have no dedicated platform trait, so they are
// shaped like roles.

pub const NODE: ResourceType = ResourceType {
    id: "node",
    display_name: "Node",
    traits: &[],
    skip_entitlements_and_grants: false,
};

pub const APP: ResourceType = ResourceType {
    id: "app",
    display_name: "App",
    traits: &[],
    skip_entitlements_and_grants: false,
};

pub const DATABASE: ResourceType = ResourceType {
    id: "database",
    display_name: "Database",
    traits: &[],
    skip_entitlements_and_grants: false,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_users_skip_entitlements_and_grants() {
        assert!(USER.annotations().skips_entitlements_and_grants());
        for rt in [ROLE, NODE, APP, DATABASE] {
            assert!(rt.annotations().is_empty(), "{}", rt.id);
        }
    }
}
