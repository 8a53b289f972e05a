use async_trait::async_trait;
use tracing::instrument;

use gatesync_core::{
    Annotations, ConnectorResult, Entitlement, Grant, Page, PaginationToken, Resource, ResourceId,
    ResourceType,
};
use gatesync_upstream::Client;

use super::ResourceSyncer;
use super::membership::{grant_membership, revoke_membership};
use crate::mappers::role_resource;
use crate::reconcile::role_membership_grants;
use crate::resource_types::ROLE;
use crate::session::SyncSession;

/// Roles are the only kind whose membership is reconciled upstream.
#[derive(Debug, Clone)]
pub struct RoleSyncer {
    client: Client,
}

impl RoleSyncer {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResourceSyncer for RoleSyncer {
    fn resource_type(&self) -> ResourceType {
        ROLE
    }

    #[instrument(skip_all, fields(session = %session.id()))]
    async fn list(
        &self,
        session: &SyncSession,
        _parent: Option<&ResourceId>,
        _token: &PaginationToken,
    ) -> ConnectorResult<Page<Resource>> {
        // A role listing starts a fresh view of membership.
        session.invalidate_users();

        let roles = self.client.list_roles().await?;
        let resources = roles
            .iter()
            .map(role_resource)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::last(resources))
    }

    #[instrument(skip_all, fields(session = %session.id(), role = %resource.id.resource))]
    async fn grants(
        &self,
        session: &SyncSession,
        resource: &Resource,
        _token: &PaginationToken,
    ) -> ConnectorResult<Page<Grant>> {
        let users = session.users(&self.client).await?;
        Ok(Page::last(role_membership_grants(resource, &users)))
    }

    #[instrument(skip_all, fields(principal = %principal.id, role = %entitlement.resource.id.resource))]
    async fn grant(
        &self,
        session: &SyncSession,
        principal: &Resource,
        entitlement: &Entitlement,
    ) -> ConnectorResult<Annotations> {
        grant_membership(
            &self.client,
            session,
            &principal.id,
            &entitlement.resource.id.resource,
        )
        .await
    }

    #[instrument(skip_all, fields(grant = %grant.id))]
    async fn revoke(&self, session: &SyncSession, grant: &Grant) -> ConnectorResult<Annotations> {
        revoke_membership(
            &self.client,
            session,
            &grant.principal,
            &grant.entitlement.resource.id.resource,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use gatesync_core::{Annotation, ConnectorError};
    use gatesync_upstream::{InMemoryTransport, TransportError, User};

    use crate::mappers::user_resource;

    fn setup() -> (InMemoryTransport, RoleSyncer) {
        let transport = InMemoryTransport::new()
            .with_role("access", "Default access")
            .with_role("reviewer", "Code review")
            .with_user(User::new_local("alice", vec!["access".into()]))
            .with_user(User::new_local("bob", vec!["access".into(), "reviewer".into()]));
        let client = Client::from_transport(Arc::new(transport.clone()), "proxy:443");
        (transport, RoleSyncer::new(client))
    }

    async fn role(syncer: &RoleSyncer, session: &SyncSession, name: &str) -> Resource {
        let page = syncer
            .list(session, None, &PaginationToken::start())
            .await
            .unwrap();
        page.items
            .into_iter()
            .find(|r| r.id.resource == name)
            .unwrap()
    }

    fn alice(transport: &InMemoryTransport) -> Resource {
        user_resource(&transport.user("alice").unwrap(), None).unwrap()
    }

    #[tokio::test]
    async fn lists_every_role_on_one_page() {
        let (_, syncer) = setup();
        let page = syncer
            .list(&SyncSession::new(), None, &PaginationToken::start())
            .await
            .unwrap();
        assert_eq!(page.items.len(), 2);
        assert!(!page.has_more());
    }

    #[tokio::test]
    async fn grants_come_from_role_lists() {
        let (_, syncer) = setup();
        let session = SyncSession::new();
        let reviewer = role(&syncer, &session, "reviewer").await;

        let grants = syncer
            .grants(&session, &reviewer, &PaginationToken::start())
            .await
            .unwrap();
        let ids: Vec<_> = grants.items.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, ["role:reviewer:member:user:bob"]);
    }

    #[tokio::test]
    async fn second_grant_is_a_no_op() {
        let (transport, syncer) = setup();
        let session = SyncSession::new();
        let reviewer = role(&syncer, &session, "reviewer").await;
        let entitlement = crate::syncers::membership_entitlement(&reviewer, ROLE);
        let principal = alice(&transport);

        let first = syncer.grant(&session, &principal, &entitlement).await.unwrap();
        assert!(first.is_empty());
        let writes = transport.mutation_count();

        let second = syncer.grant(&session, &principal, &entitlement).await.unwrap();
        assert!(second.contains(&Annotation::GrantAlreadyExists));
        assert_eq!(transport.mutation_count(), writes);

        let user = transport.user("alice").unwrap();
        assert_eq!(user.roles, ["access", "reviewer"]);
        assert_eq!(user.logins(), ["alice"]);
    }

    #[tokio::test]
    async fn granting_an_unknown_role_does_not_create_it() {
        let (transport, syncer) = setup();
        let session = SyncSession::new();
        let prod = gatesync_core::new_role_resource(
            "prod",
            &ROLE,
            "prod",
            gatesync_core::RoleTrait::default(),
        )
        .unwrap();
        let entitlement = crate::syncers::membership_entitlement(&prod, ROLE);

        syncer
            .grant(&session, &alice(&transport), &entitlement)
            .await
            .unwrap();

        assert!(transport.user("alice").unwrap().has_role("prod"));
        assert!(!transport.has_role("prod"));
    }

    #[tokio::test]
    async fn revoke_of_missing_membership_writes_nothing() {
        let (transport, syncer) = setup();
        let session = SyncSession::new();
        let reviewer = role(&syncer, &session, "reviewer").await;
        let grant = gatesync_core::new_grant(&reviewer, "member", ResourceId::new("user", "alice"));

        let annos = syncer.revoke(&session, &grant).await.unwrap();
        assert!(annos.contains(&Annotation::GrantAlreadyRevoked));
        assert_eq!(transport.mutation_count(), 0);
    }

    #[tokio::test]
    async fn stale_update_surfaces_as_conflict() {
        let (transport, syncer) = setup();
        let session = SyncSession::new();
        let reviewer = role(&syncer, &session, "reviewer").await;
        let entitlement = crate::syncers::membership_entitlement(&reviewer, ROLE);

        transport.fail_next_update(TransportError::CompareFailed("revision changed".into()));
        let err = syncer
            .grant(&session, &alice(&transport), &entitlement)
            .await
            .unwrap_err();

        assert!(matches!(err, ConnectorError::Conflict(_)));
        assert_eq!(transport.user("alice").unwrap().roles, ["access"]);
    }

    #[tokio::test]
    async fn role_principal_is_rejected_before_any_call() {
        let (transport, syncer) = setup();
        let session = SyncSession::new();
        let reviewer = role(&syncer, &session, "reviewer").await;
        let access = role(&syncer, &session, "access").await;
        let entitlement = crate::syncers::membership_entitlement(&reviewer, ROLE);

        let err = syncer.grant(&session, &access, &entitlement).await.unwrap_err();
        assert!(matches!(err, ConnectorError::InvalidPrincipalType { .. }));
        assert_eq!(transport.mutation_count(), 0);
    }

    #[tokio::test]
    async fn grant_to_unknown_user_is_not_found() {
        let (transport, syncer) = setup();
        let session = SyncSession::new();
        let reviewer = role(&syncer, &session, "reviewer").await;
        let entitlement = crate::syncers::membership_entitlement(&reviewer, ROLE);
        let ghost = gatesync_core::new_user_resource(
            "ghost",
            &crate::resource_types::USER,
            "ghost",
            gatesync_core::UserTrait::new("ghost"),
            None,
        )
        .unwrap();

        let err = syncer.grant(&session, &ghost, &entitlement).await.unwrap_err();
        assert!(matches!(err, ConnectorError::NotFound(_)));
        assert_eq!(transport.mutation_count(), 0);
        assert!(transport.user("ghost").is_none());
    }

    #[tokio::test]
    async fn revoke_from_unknown_user_is_not_found() {
        let (transport, syncer) = setup();
        let session = SyncSession::new();
        let reviewer = role(&syncer, &session, "reviewer").await;
        let grant = gatesync_core::new_grant(&reviewer, "member", ResourceId::new("user", "ghost"));

        let err = syncer.revoke(&session, &grant).await.unwrap_err();
        assert!(matches!(err, ConnectorError::NotFound(_)));
        assert_eq!(transport.mutation_count(), 0);
    }

    #[tokio::test]
    async fn revoke_for_non_user_principal_uses_neutral_wording() {
        let (transport, syncer) = setup();
        let session = SyncSession::new();
        let reviewer = role(&syncer, &session, "reviewer").await;
        let grant = gatesync_core::new_grant(&reviewer, "member", ResourceId::new("role", "admin"));

        let err = syncer.revoke(&session, &grant).await.unwrap_err();
        match err {
            ConnectorError::InvalidPrincipalType { message, .. } => {
                assert!(message.contains("hold membership"), "{message}");
                assert!(!message.contains("granted"), "{message}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(transport.mutation_count(), 0);
    }
}
