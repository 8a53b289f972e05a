//! Role-membership reconciliation.
//!
//! A user's role list is the only place membership lives. Grants are derived
//! from it on read, and grant/revoke edit it in place. Everything here is
//! pure so it can be checked without an upstream.

use gatesync_core::{ConnectorResult, Grant, Resource, ResourceId, new_grant};
use gatesync_upstream::{RequireMfaType, Role, RoleConditions, RoleOptions, User};

use crate::resource_types::{MEMBERSHIP, USER};

/// One `member` grant per user that lists `role` among its roles.
///
/// Users without a name cannot be addressed as principals and are skipped.
pub fn role_membership_grants(role: &Resource, users: &[User]) -> Vec<Grant> {
    let role_name = role.id.resource.as_str();
    users
        .iter()
        .filter(|u| !u.name.is_empty() && u.has_role(role_name))
        .map(|u| new_grant(role, MEMBERSHIP, ResourceId::new(USER.id, &u.name)))
        .collect()
}

/// The role shape a membership grant asks for: session MFA, with `login`
/// as the only allowed login.
pub fn membership_role(role_name: &str, login: &str) -> ConnectorResult<Role> {
    Role::new(
        role_name,
        RoleOptions {
            require_session_mfa: RequireMfaType::Session,
        },
        RoleConditions {
            logins: vec![login.to_string()],
            ..Default::default()
        },
    )
}

/// Add `role` and `login` to `user`. Returns whether anything changed.
pub fn apply_grant(user: &mut User, role: &Role, login: &str) -> bool {
    let login_added = user.add_login(login);
    let role_added = user.add_role(&role.name);
    login_added || role_added
}

/// Remove `role_name` from `user`, leaving the other roles in order.
/// Returns whether it was present.
pub fn apply_revoke(user: &mut User, role_name: &str) -> bool {
    user.remove_role(role_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatesync_core::{RoleTrait, new_role_resource};
    use proptest::prelude::*;

    use crate::resource_types::ROLE;

    fn role_resource(name: &str) -> Resource {
        new_role_resource(name, &ROLE, name, RoleTrait::default()).unwrap()
    }

    fn user(name: &str, roles: &[&str]) -> User {
        User::new_local(name, roles.iter().map(|r| r.to_string()).collect())
    }

    #[test]
    fn grants_follow_role_lists() {
        let users = [
            user("alice", &["access", "reviewer"]),
            user("bob", &["access"]),
            user("", &["reviewer"]),
            user("carol", &["reviewer", "reviewer"]),
        ];
        let grants = role_membership_grants(&role_resource("reviewer"), &users);

        let principals: Vec<_> = grants.iter().map(|g| g.principal.resource.as_str()).collect();
        assert_eq!(principals, ["alice", "carol"]);
        assert_eq!(grants[0].id, "role:reviewer:member:user:alice");
    }

    #[test]
    fn membership_role_requires_session_mfa() {
        let role = membership_role("prod", "alice").unwrap();
        assert_eq!(role.options.require_session_mfa, RequireMfaType::Session);
        assert_eq!(role.allow.logins, ["alice"]);
        assert!(role.allow.node_labels.is_empty());

        assert!(membership_role("", "alice").is_err());
    }

    #[test]
    fn grant_is_idempotent() {
        let role = membership_role("reviewer", "alice").unwrap();
        let mut u = user("alice", &["access"]);

        assert!(apply_grant(&mut u, &role, "alice"));
        let after_first = u.clone();
        assert!(!apply_grant(&mut u, &role, "alice"));
        assert_eq!(u, after_first);
        assert_eq!(u.roles, ["access", "reviewer"]);
        assert_eq!(u.logins(), ["alice"]);
    }

    #[test]
    fn revoke_of_absent_role_changes_nothing() {
        let mut u = user("alice", &["access"]);
        assert!(!apply_revoke(&mut u, "reviewer"));
        assert_eq!(u.roles, ["access"]);
    }

    proptest! {
        #[test]
        fn grant_then_revoke_restores_roles(
            roles in proptest::collection::vec("[a-z]{1,6}", 0..6),
            target in "[A-Z]{1,6}",
        ) {
            let mut u = User::new_local("alice", roles.clone());
            let role = membership_role(&target, "alice").unwrap();

            prop_assert!(apply_grant(&mut u, &role, "alice"));
            prop_assert!(u.has_role(&target));
            prop_assert!(apply_revoke(&mut u, &target));
            prop_assert_eq!(u.roles, roles);
        }

        #[test]
        fn each_holder_gets_exactly_one_grant(
            memberships in proptest::collection::vec(proptest::bool::ANY, 0..20),
        ) {
            let users: Vec<User> = memberships
                .iter()
                .enumerate()
                .map(|(i, &member)| {
                    let roles = if member { vec!["ops".into(), "ops".into()] } else { vec![] };
                    User::new_local(format!("u{i}"), roles)
                })
                .collect();

            let grants = role_membership_grants(&role_resource("ops"), &users);
            let expected = memberships.iter().filter(|m| **m).count();
            prop_assert_eq!(grants.len(), expected);
        }
    }
}
