use gatesync_core::{Resource, ResourceError, RoleTrait, new_role_resource};
use gatesync_upstream::Database;

use super::profile;
use crate::resource_types::DATABASE;

pub fn database_resource(db: &Database) -> Result<Resource, ResourceError> {
    let profile = profile([("db_id", db.id.as_str()), ("db_name", db.name.as_str())]);
    new_role_resource(&db.name, &DATABASE, &db.id, RoleTrait::new(profile))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_profile() {
        let db = Database {
            id: "rev-9".into(),
            name: "orders".into(),
            protocol: "postgres".into(),
        };
        let r = database_resource(&db).unwrap();

        assert_eq!(r.id.to_string(), "database:rev-9");
        assert_eq!(r.display_name, "orders");
        assert_eq!(r.profile().unwrap()["db_name"], "orders");
    }
}
