use async_trait::async_trait;
use tracing::{debug, instrument};

use gatesync_core::{
    Annotations, ConnectorResult, Entitlement, Grant, Page, PaginationToken, Resource, ResourceId,
    ResourceType,
};
use gatesync_upstream::Client;

use super::{ResourceSyncer, ensure_user_principal};
use crate::mappers::database_resource;
use crate::resource_types::DATABASE;
use crate::session::SyncSession;

#[derive(Debug, Clone)]
pub struct DatabaseSyncer {
    client: Client,
}

impl DatabaseSyncer {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResourceSyncer for DatabaseSyncer {
    fn resource_type(&self) -> ResourceType {
        DATABASE
    }

    #[instrument(skip_all, fields(session = %session.id()))]
    async fn list(
        &self,
        session: &SyncSession,
        _parent: Option<&ResourceId>,
        _token: &PaginationToken,
    ) -> ConnectorResult<Page<Resource>> {
        let dbs = self.client.list_databases().await?;
        let resources = dbs
            .iter()
            .map(database_resource)
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
        debug!(principal = %principal.id, entitlement = %entitlement.id, "database grants are not provisioned");
        Ok(Annotations::new())
    }

    async fn revoke(&self, _session: &SyncSession, grant: &Grant) -> ConnectorResult<Annotations> {
        ensure_user_principal(&grant.principal)?;
        debug!(grant = %grant.id, "database revokes are not provisioned");
        Ok(Annotations::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use gatesync_upstream::InMemoryTransport;

    #[tokio::test]
    async fn lists_databases() {
        let transport = InMemoryTransport::new().with_database("orders", "postgres");
        let syncer = DatabaseSyncer::new(Client::from_transport(Arc::new(transport), "proxy:443"));
        let session = SyncSession::new();

        let page = syncer
            .list(&session, None, &PaginationToken::start())
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert!(page.items[0].id.is_type("database"));

        let grants = syncer
            .grants(&session, &page.items[0], &PaginationToken::start())
            .await
            .unwrap();
        assert!(grants.items.is_empty());
    }
}
