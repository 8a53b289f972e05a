use std::collections::HashSet;

use async_trait::async_trait;
use tracing::{info, instrument, warn};

use gatesync_core::{
    AccountInfo, AccountProvisioningDetails, Annotations, ConnectorError, ConnectorResult,
    CreateAccountResponse, CredentialOption, Entitlement, Page, PaginationToken, PlaintextData,
    Resource, ResourceId, ResourceType,
};
use gatesync_upstream::user::LOGINS_TRAIT;
use gatesync_upstream::{Client, User, UserType};

use super::{AccountManager, ResourceSyncer};
use crate::mappers::user_resource;
use crate::names::clean_resource_name;
use crate::resource_types::USER;
use crate::session::SyncSession;

/// Role assigned to new accounts when the request names none. The backend
/// refuses users without at least one role.
pub const DEFAULT_ROLE: &str = "access";

/// Lifetime of the credential-setup link handed back on account creation.
pub const SETUP_LINK_TTL_HOURS: i64 = 24;

pub const SETUP_LINK_FIELD: &str = "password_configuration_link";

#[derive(Debug, Clone)]
pub struct UserSyncer {
    client: Client,
}

impl UserSyncer {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResourceSyncer for UserSyncer {
    fn resource_type(&self) -> ResourceType {
        USER
    }

    #[instrument(skip_all, fields(session = %session.id()))]
    async fn list(
        &self,
        session: &SyncSession,
        parent: Option<&ResourceId>,
        _token: &PaginationToken,
    ) -> ConnectorResult<Page<Resource>> {
        let users = self.client.list_users().await?;

        let mut seen = HashSet::new();
        let mut resources = Vec::with_capacity(users.len());
        for user in &users {
            if !seen.insert(user.name.as_str()) {
                warn!(user = %user.name, "duplicate login in upstream listing");
                continue;
            }
            resources.push(user_resource(user, parent)?);
        }
        Ok(Page::last(resources))
    }

    /// Users are leaves.
    async fn entitlements(
        &self,
        _session: &SyncSession,
        _resource: &Resource,
        _token: &PaginationToken,
    ) -> ConnectorResult<Page<Entitlement>> {
        Ok(Page::empty())
    }
}

#[async_trait]
impl AccountManager for UserSyncer {
    fn create_account_capability_details(&self) -> AccountProvisioningDetails {
        AccountProvisioningDetails {
            supported_credential_options: vec![CredentialOption::NoPassword],
            preferred_credential_option: CredentialOption::NoPassword,
        }
    }

    /// Create a local user and return it with a one-time setup link.
    ///
    /// The requested name is kept verbatim as the user's login; the account
    /// name itself is the cleaned form.
    #[instrument(skip_all)]
    async fn create_account(&self, info: &AccountInfo) -> ConnectorResult<CreateAccountResponse> {
        let requested = info
            .string_field("name")
            .ok_or_else(|| ConnectorError::validation("missing required field: name"))?;
        let role = info.string_field("role").unwrap_or(DEFAULT_ROLE);

        let name = clean_resource_name(requested);
        if name.is_empty() {
            return Err(ConnectorError::validation(format!(
                "name '{requested}' has no usable characters"
            )));
        }

        let user = User::new_local(name, vec![role.to_string()])
            .with_trait(LOGINS_TRAIT, vec![requested.to_string()]);
        let created = self.client.create_user(&user).await?;

        let token = self
            .client
            .create_reset_credential_token(
                &created.name,
                chrono::Duration::hours(SETUP_LINK_TTL_HOURS),
            )
            .await?;

        info!(user = %created.name, role, "account created");
        Ok(CreateAccountResponse {
            resource: user_resource(&created, None)?,
            plaintext: vec![PlaintextData {
                name: SETUP_LINK_FIELD.to_string(),
                bytes: token.url.into_bytes(),
            }],
            annotations: Annotations::new(),
        })
    }

    /// Delete a local user. Federated users are owned by their identity
    /// provider and are refused.
    #[instrument(skip_all, fields(id = %id))]
    async fn delete(&self, id: &ResourceId) -> ConnectorResult<Annotations> {
        if id.resource.is_empty() {
            return Err(ConnectorError::validation("missing resource name"));
        }
        if !id.is_type(USER.id) {
            return Err(ConnectorError::validation(format!(
                "only users can be deleted, got '{id}'"
            )));
        }

        let user = self.client.get_user(&id.resource).await?;
        if user.user_type() != UserType::Local {
            return Err(ConnectorError::validation(format!(
                "cannot delete federated ({}) user: {}",
                user.user_type(),
                user.name
            )));
        }

        self.client.delete_user(&user.name).await?;
        info!(user = %user.name, "account deleted");
        Ok(Annotations::new())
    }
}
