//! Upstream object → governance resource mappers.
//!
//! Mappers are pure: the same upstream object always yields the same
//! resource, and an object with an empty key is rejected rather than
//! emitted.

mod app;
mod database;
mod node;
mod role;
mod user;

pub use app::app_resource;
pub use database::database_resource;
pub use node::node_resource;
pub use role::role_resource;
pub use user::user_resource;

use serde_json::Value;

use gatesync_core::Profile;

/// Build a profile from string-valued fields.
pub(crate) fn profile<'a>(fields: impl IntoIterator<Item = (&'a str, &'a str)>) -> Profile {
    fields
        .into_iter()
        .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
        .collect()
}
