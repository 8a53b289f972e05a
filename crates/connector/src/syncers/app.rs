use async_trait::async_trait;
use tracing::{debug, instrument};

use gatesync_core::{
    Annotations, ConnectorResult, Entitlement, Grant, Page, PaginationToken, Resource, ResourceId,
    ResourceType,
};
use gatesync_upstream::Client;

use super::{ResourceSyncer, ensure_user_principal};
use crate::mappers::app_resource;
use crate::resource_types::APP;
use crate::session::SyncSession;

#[derive(Debug, Clone)]
pub struct AppSyncer {
    client: Client,
}

impl AppSyncer {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResourceSyncer for AppSyncer {
    fn resource_type(&self) -> ResourceType {
        APP
    }

    #[instrument(skip_all, fields(session = %session.id()))]
    async fn list(
        &self,
        session: &SyncSession,
        _parent: Option<&ResourceId>,
        _token: &PaginationToken,
    ) -> ConnectorResult<Page<Resource>> {
        let apps = self.client.list_apps().await?;
        let resources = apps
            .iter()
            .map(app_resource)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::last(resources))
    }

    async fn grant(
        &self,
        _session: &SyncSession,
        principal: &Resource,
        entitlement: &Entitlement,
    ) -> ConnectorResult<Annotations> {
        ensure_user_principal(&principal.id)?;
        debug!(principal = %principal.id, entitlement = %entitlement.id, "app grants are not provisioned");
        Ok(Annotations::new())
    }

    async fn revoke(&self, _session: &SyncSession, grant: &Grant) -> ConnectorResult<Annotations> {
        ensure_user_principal(&grant.principal)?;
        debug!(grant = %grant.id, "app revokes are not provisioned");
        Ok(Annotations::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use gatesync_upstream::InMemoryTransport;

    #[tokio::test]
    async fn lists_apps_with_membership_entitlement() {
        let transport = InMemoryTransport::new()
            .with_app("grafana", "http://localhost:3000")
            .with_app("jenkins", "http://localhost:8080");
        let syncer = AppSyncer::new(Client::from_transport(Arc::new(transport), "proxy:443"));
        let session = SyncSession::new();

        let page = syncer
            .list(&session, None, &PaginationToken::start())
            .await
            .unwrap();
        assert_eq!(page.items.len(), 2);
        assert!(!page.has_more());

        let ents = syncer
            .entitlements(&session, &page.items[0], &PaginationToken::start())
            .await
            .unwrap();
        assert_eq!(ents.items.len(), 1);
        assert!(ents.items[0].display_name.ends_with(" App member"));
    }
}
