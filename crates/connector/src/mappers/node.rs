use gatesync_core::{Resource, ResourceError, RoleTrait, new_role_resource};
use gatesync_upstream::Node;

use super::profile;
use crate::resource_types::NODE;

pub fn node_resource(node: &Node) -> Result<Resource, ResourceError> {
    let profile = profile([
        ("node_id", node.id.as_str()),
        ("node_name", node.name.as_str()),
        ("namespace", node.namespace.as_str()),
    ]);
    new_role_resource(&node.name, &NODE, &node.id, RoleTrait::new(profile))
}
