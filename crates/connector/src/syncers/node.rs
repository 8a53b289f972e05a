use async_trait::async_trait;
use tracing::instrument;

use gatesync_core::{
    Annotations, ConnectorResult, Entitlement, Grant, Page, PaginationToken, Resource, ResourceId,
    ResourceType,
};
use gatesync_upstream::Client;

use super::ResourceSyncer;
use super::membership::{grant_membership, revoke_membership};
use crate::mappers::node_resource;
use crate::resource_types::NODE;
use crate::session::SyncSession;

/// Nodes are the one paginated kind. Each call returns exactly the page
/// upstream produced for the given cursor.
#[derive(Debug, Clone)]
pub struct NodeSyncer {
    client: Client,
}

impl NodeSyncer {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResourceSyncer for NodeSyncer {
    fn resource_type(&self) -> ResourceType {
        NODE
    }

    #[instrument(skip_all, fields(session = %session.id(), cursor = %token.token))]
    async fn list(
        &self,
        session: &SyncSession,
        _parent: Option<&ResourceId>,
        token: &PaginationToken,
    ) -> ConnectorResult<Page<Resource>> {
        let page = self.client.list_nodes_page(&token.token, token.size).await?;
        let resources = page
            .nodes
            .iter()
            .map(node_resource)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::more(resources, page.next_key))
    }

    // Node access is provisioned as a session-MFA role named after the node.
    // Upstream does not report which roles reach a node, so grants are
    // never listed.

    #[instrument(skip_all, fields(principal = %principal.id, node = %entitlement.resource.display_name))]
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
            &entitlement.resource.display_name,
        )
        .await
    }

    #[instrument(skip_all, fields(grant = %grant.id))]
    async fn revoke(&self, session: &SyncSession, grant: &Grant) -> ConnectorResult<Annotations> {
        revoke_membership(
            &self.client,
            session,
            &grant.principal,
            &grant.entitlement.resource.display_name,
        )
        .await
    }
}
