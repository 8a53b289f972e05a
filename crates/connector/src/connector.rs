//! Connector facade: the surface the sync driver talks to.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{info, instrument};

use gatesync_core::{
    AccountCreationSchema, AccountField, AccountInfo, AccountProvisioningDetails, Annotations,
    ConnectorMetadata, ConnectorResult, CreateAccountResponse, ResourceId,
};
use gatesync_upstream::{Client, Dialer};

use crate::config::ConnectorConfig;
use crate::syncers::{
    AccountManager, AppSyncer, DEFAULT_ROLE, DatabaseSyncer, NodeSyncer, ResourceSyncer, RoleSyncer,
    UserSyncer,
};

pub const DISPLAY_NAME: &str = "Access Proxy";
pub const DESCRIPTION: &str =
    "Syncs users, roles, nodes, apps and databases, and manages role membership.";

#[derive(Debug, Clone)]
pub struct Connector {
    client: Client,
    users: UserSyncer,
}

impl Connector {
    /// Validate `config` and connect. Configuration errors are reported
    /// before anything is dialed.
    #[instrument(skip_all, fields(proxy = %config.proxy_address))]
    pub async fn new<D: Dialer>(dialer: &D, config: &ConnectorConfig) -> ConnectorResult<Self> {
        config.validate()?;
        let client = Client::connect(dialer, &config.proxy_address, config.credential()?).await?;
        info!(proxy = client.proxy_address(), "connector ready");
        Ok(Self::from_client(client))
    }

    pub fn from_client(client: Client) -> Self {
        Self {
            users: UserSyncer::new(client.clone()),
            client,
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Syncers in the order the driver walks them: users, roles, nodes,
    /// apps, databases.
    pub fn resource_syncers(&self) -> Vec<Arc<dyn ResourceSyncer>> {
        vec![
            Arc::new(self.users.clone()),
            Arc::new(RoleSyncer::new(self.client.clone())),
            Arc::new(NodeSyncer::new(self.client.clone())),
            Arc::new(AppSyncer::new(self.client.clone())),
            Arc::new(DatabaseSyncer::new(self.client.clone())),
        ]
    }

    pub fn syncer_for(&self, resource_type: &str) -> Option<Arc<dyn ResourceSyncer>> {
        self.resource_syncers()
            .into_iter()
            .find(|s| s.resource_type().id == resource_type)
    }

    pub fn metadata(&self) -> ConnectorMetadata {
        let mut fields = BTreeMap::new();
        fields.insert(
            "name".to_string(),
            AccountField {
                display_name: "Name".to_string(),
                required: true,
                description: "Login of the new user; spaces become dashes.".to_string(),
                placeholder: "jane-doe".to_string(),
                order: 1,
            },
        );
        fields.insert(
            "role".to_string(),
            AccountField {
                display_name: "Role".to_string(),
                required: false,
                description: "Role assigned on creation.".to_string(),
                placeholder: DEFAULT_ROLE.to_string(),
                order: 3,
            },
        );

        ConnectorMetadata {
            display_name: DISPLAY_NAME.to_string(),
            description: DESCRIPTION.to_string(),
            account_creation_schema: Some(AccountCreationSchema { fields }),
        }
    }

    /// Always healthy. Credentials were already checked when connecting.
    pub async fn validate(&self) -> ConnectorResult<Annotations> {
        Ok(Annotations::new())
    }

    pub fn create_account_capability_details(&self) -> AccountProvisioningDetails {
        self.users.create_account_capability_details()
    }

    pub async fn create_account(&self, info: &AccountInfo) -> ConnectorResult<CreateAccountResponse> {
        self.users.create_account(info).await
    }

    pub async fn delete(&self, id: &ResourceId) -> ConnectorResult<Annotations> {
        self.users.delete(id).await
    }
}
