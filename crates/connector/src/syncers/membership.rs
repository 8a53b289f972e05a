//! Role-membership writes shared by the syncers that provision access.

use tracing::{debug, info};

use gatesync_core::{Annotation, Annotations, ConnectorResult, ResourceId};
use gatesync_upstream::Client;

use super::ensure_user_principal;
use crate::reconcile::{apply_grant, apply_revoke, membership_role};
use crate::session::SyncSession;

/// Attach `role_name` (and the principal's own login) to the principal's
/// user record. Writes nothing when both are already present.
pub(crate) async fn grant_membership(
    client: &Client,
    session: &SyncSession,
    principal: &ResourceId,
    role_name: &str,
) -> ConnectorResult<Annotations> {
    ensure_user_principal(principal)?;

    let login = principal.resource.as_str();
    let role = membership_role(role_name, login)?;

    let mut user = client.get_user(login).await?;
    if !apply_grant(&mut user, &role, login) {
        debug!(user = %user.name, role = role_name, "membership already present");
        return Ok(Annotations::new().with(Annotation::GrantAlreadyExists));
    }

    let updated = client.update_user(&user).await?;
    session.invalidate_users();
    info!(user = %updated.name, role = role_name, revision = %updated.revision, "membership granted");
    Ok(Annotations::new())
}

/// Detach `role_name` from the principal's user record, keeping the other
/// roles in order. Writes nothing when it was not attached.
pub(crate) async fn revoke_membership(
    client: &Client,
    session: &SyncSession,
    principal: &ResourceId,
    role_name: &str,
) -> ConnectorResult<Annotations> {
    ensure_user_principal(principal)?;

    let mut user = client.get_user(&principal.resource).await?;
    if !apply_revoke(&mut user, role_name) {
        debug!(user = %user.name, role = role_name, "membership already absent");
        return Ok(Annotations::new().with(Annotation::GrantAlreadyRevoked));
    }

    let updated = client.update_user(&user).await?;
    session.invalidate_users();
    info!(user = %updated.name, role = role_name, revision = %updated.revision, "membership revoked");
    Ok(Annotations::new())
}
