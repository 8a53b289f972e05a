use gatesync_core::{Resource, ResourceError, RoleTrait, new_role_resource};
use gatesync_upstream::App;

use super::profile;
use crate::resource_types::APP;

pub fn app_resource(app: &App) -> Result<Resource, ResourceError> {
    let profile = profile([("app_id", app.id.as_str()), ("app_name", app.name.as_str())]);
    new_role_resource(&app.name, &APP, &app.id, RoleTrait::new(profile))
}
