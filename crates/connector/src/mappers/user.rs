use gatesync_core::{
    AccountType, Resource, ResourceError, ResourceId, UserStatus, UserTrait, new_user_resource,
};
use gatesync_upstream::{User, UserKind};

use super::profile;
use crate::names::split_dash_separated_name;
use crate::resource_types::USER;

fn account_type(kind: UserKind) -> AccountType {
    match kind {
        UserKind::Human => AccountType::Human,
        UserKind::Service => AccountType::Service,
        UserKind::System => AccountType::System,
    }
}

/// Map an upstream user.
///
/// The backend keeps no email for users, so human accounts use their login
/// as the primary address. `parent` is recorded as given.
pub fn user_resource(user: &User, parent: Option<&ResourceId>) -> Result<Resource, ResourceError> {
    let name = user.name.as_str();
    let (first_name, last_name) = split_dash_separated_name(name);
    let account_type = account_type(user.kind());
    let is_human = account_type == AccountType::Human;

    let mut fields = vec![
        ("name", name),
        ("user_id", user.revision.as_str()),
        ("first_name", first_name),
        ("last_name", last_name),
    ];
    if is_human {
        fields.push(("email", name));
    }

    let mut user_trait = UserTrait::new(name)
        .with_profile(profile(fields))
        .with_status(UserStatus::from_locked(user.locked))
        .with_account_type(account_type);
    if is_human {
        user_trait = user_trait.with_email(name, true);
    }

    new_user_resource(name, &USER, name, user_trait, parent.cloned())
}
