use gatesync_core::{Resource, ResourceError, RoleTrait, new_role_resource};
use gatesync_upstream::Role;

use super::profile;
use crate::resource_types::ROLE;

/// Roles are keyed by name; the revision is kept in the profile.
pub fn role_resource(role: &Role) -> Result<Resource, ResourceError> {
    let profile = profile([
        ("role_id", role.revision.as_str()),
        ("role_name", role.name.as_str()),
        ("role_description", role.description.as_str()),
    ]);
    new_role_resource(&role.name, &ROLE, &role.name, RoleTrait::new(profile))
}
