//! Per-kind resource syncers.
//!
//! Each syncer lists one upstream kind, publishes its static `member`
//! entitlement and derives grants from upstream state. Nothing is persisted
//! between calls except what the [`SyncSession`] memoizes for one pass.

use async_trait::async_trait;
use tracing::warn;

use gatesync_core::{
    AccountInfo, AccountProvisioningDetails, Annotations, ConnectorError, ConnectorResult,
    CreateAccountResponse, Entitlement, Grant, Page, PaginationToken, Resource, ResourceId,
    ResourceType, new_assignment_entitlement,
};

use crate::resource_types::{MEMBERSHIP, USER};
use crate::session::SyncSession;

mod app;
mod database;
mod membership;
mod node;
mod role;
mod user;

pub use app::AppSyncer;
pub use database::DatabaseSyncer;
pub use node::NodeSyncer;
pub use role::RoleSyncer;
pub use user::{DEFAULT_ROLE, SETUP_LINK_FIELD, SETUP_LINK_TTL_HOURS, UserSyncer};

#[async_trait]
pub trait ResourceSyncer: Send + Sync {
    fn resource_type(&self) -> ResourceType;

    async fn list(
        &self,
        session: &SyncSession,
        parent: Option<&ResourceId>,
        token: &PaginationToken,
    ) -> ConnectorResult<Page<Resource>>;

    /// The single `member` entitlement, grantable to users.
    async fn entitlements(
        &self,
        _session: &SyncSession,
        resource: &Resource,
        _token: &PaginationToken,
    ) -> ConnectorResult<Page<Entitlement>> {
        Ok(Page::last(vec![membership_entitlement(
            resource,
            self.resource_type(),
        )]))
    }

    async fn grants(
        &self,
        _session: &SyncSession,
        _resource: &Resource,
        _token: &PaginationToken,
    ) -> ConnectorResult<Page<Grant>> {
        Ok(Page::empty())
    }

    async fn grant(
        &self,
        _session: &SyncSession,
        _principal: &Resource,
        _entitlement: &Entitlement,
    ) -> ConnectorResult<Annotations> {
        Err(no_entitlements(self.resource_type()))
    }

    async fn revoke(&self, _session: &SyncSession, _grant: &Grant) -> ConnectorResult<Annotations> {
        Err(no_entitlements(self.resource_type()))
    }
}

/// Account lifecycle for syncers whose kind can be provisioned.
#[async_trait]
pub trait AccountManager: Send + Sync {
    fn create_account_capability_details(&self) -> AccountProvisioningDetails;

    async fn create_account(&self, info: &AccountInfo) -> ConnectorResult<CreateAccountResponse>;

    async fn delete(&self, id: &ResourceId) -> ConnectorResult<Annotations>;
}

/// `"<name> <Kind> member"` / `"Member of <name> <kind>"`.
pub fn membership_entitlement(resource: &Resource, kind: ResourceType) -> Entitlement {
    let name = &resource.display_name;
    new_assignment_entitlement(resource, MEMBERSHIP)
        .with_grantable_to(&USER)
        .with_display_name(format!("{name} {} {MEMBERSHIP}", kind.display_name))
        .with_description(format!(
            "Member of {name} {}",
            kind.display_name.to_lowercase()
        ))
}

/// Only users can hold memberships.
pub(crate) fn ensure_user_principal(principal: &ResourceId) -> ConnectorResult<()> {
    if principal.is_type(USER.id) {
        return Ok(());
    }
    warn!(
        principal_type = %principal.resource_type,
        principal_id = %principal.resource,
        "only users can hold membership"
    );
    Err(ConnectorError::invalid_principal_type(
        &principal.resource_type,
        format!("only users can hold membership, got '{principal}'"),
    ))
}

fn no_entitlements(kind: ResourceType) -> ConnectorError {
    ConnectorError::validation(format!("{} resources hold no entitlements", kind.id))
}
