//! In-memory upstream backend.
//!
//! Intended for tests/dev. Clones share state, so a test can keep a handle
//! while the connector owns another.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use crate::role::Role;
use crate::transport::{DialConfig, Dialer, TransportError, UpstreamTransport};
use crate::user::User;
use crate::wire::{
    AppDocument, CreateResetPasswordTokenRequest, CreatedBy, DatabaseDocument, KIND_APP,
    KIND_DATABASE, KIND_NODE, ListResourcesRequest, ListResourcesResponse, Metadata,
    ResetPasswordTokenDocument, RoleDocument, ServerDocument, UserDocument,
};

#[derive(Debug, Default)]
struct State {
    users: BTreeMap<String, UserDocument>,
    /// Extra documents appended to user listings only.
    listed_duplicates: Vec<UserDocument>,
    roles: BTreeMap<String, RoleDocument>,
    nodes: BTreeMap<String, ServerDocument>,
    apps: Vec<AppDocument>,
    databases: Vec<DatabaseDocument>,
    reset_tokens: Vec<ResetPasswordTokenDocument>,
    next_revision: u64,
    mutations: u64,
    fail_next_update: Option<TransportError>,
}

impl State {
    fn revision(&mut self) -> String {
        self.next_revision += 1;
        format!("rev-{}", self.next_revision)
    }
}

#[derive(Debug, Clone)]
pub struct InMemoryTransport {
    state: Arc<RwLock<State>>,
    page_size: u32,
    public_addr: String,
}

impl Default for InMemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> TransportError {
    TransportError::ConnectionProblem("lock poisoned".to_string())
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self {
            state: Arc::default(),
            page_size: 100,
            public_addr: "localhost:3080".to_string(),
        }
    }

    /// Node listing page size used when the request sets no limit.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_user(self, user: User) -> Self {
        self.insert_user(user);
        self
    }

    pub fn with_role(self, name: &str, description: &str) -> Self {
        if let Ok(mut s) = self.state.write() {
            let revision = s.revision();
            let doc = Role {
                name: name.to_string(),
                revision,
                description: description.to_string(),
                options: Default::default(),
                allow: Default::default(),
                deny: Default::default(),
            }
            .to_document();
            s.roles.insert(name.to_string(), doc);
        }
        self
    }

    pub fn with_node(self, name: &str, hostname: &str) -> Self {
        if let Ok(mut s) = self.state.write() {
            let revision = s.revision();
            s.nodes.insert(
                name.to_string(),
                ServerDocument {
                    kind: KIND_NODE.to_string(),
                    version: "v2".to_string(),
                    metadata: Metadata {
                        revision,
                        ..Metadata::named(name)
                    },
                    hostname: hostname.to_string(),
                },
            );
        }
        self
    }

    pub fn with_app(self, name: &str, uri: &str) -> Self {
        if let Ok(mut s) = self.state.write() {
            let revision = s.revision();
            s.apps.push(AppDocument {
                kind: KIND_APP.to_string(),
                version: "v3".to_string(),
                metadata: Metadata {
                    revision,
                    ..Metadata::named(name)
                },
                uri: uri.to_string(),
            });
        }
        self
    }

    pub fn with_database(self, name: &str, protocol: &str) -> Self {
        if let Ok(mut s) = self.state.write() {
            let revision = s.revision();
            s.databases.push(DatabaseDocument {
                kind: KIND_DATABASE.to_string(),
                version: "v3".to_string(),
                metadata: Metadata {
                    revision,
                    ..Metadata::named(name)
                },
                protocol: protocol.to_string(),
                uri: String::new(),
            });
        }
        self
    }

    /// Append `user` to every user listing after the stored users, even when
    /// a stored user has the same name. Point lookups never see it.
    pub fn with_listed_duplicate(self, user: User) -> Self {
        if let Ok(mut s) = self.state.write() {
            let mut doc = user.to_document();
            doc.metadata.revision = s.revision();
            s.listed_duplicates.push(doc);
        }
        self
    }

    /// Insert or replace a user without counting it as a mutation.
    pub fn insert_user(&self, user: User) {
        if let Ok(mut s) = self.state.write() {
            let mut doc = user.to_document();
            doc.metadata.revision = s.revision();
            s.users.insert(user.name, doc);
        }
    }

    pub fn user(&self, name: &str) -> Option<User> {
        let s = self.state.read().ok()?;
        s.users
            .get(name)
            .cloned()
            .and_then(|doc| User::from_document(doc).ok())
    }

    pub fn has_role(&self, name: &str) -> bool {
        self.state
            .read()
            .map(|s| s.roles.contains_key(name))
            .unwrap_or(false)
    }

    /// Number of writes performed through the transport.
    pub fn mutation_count(&self) -> u64 {
        self.state.read().map(|s| s.mutations).unwrap_or(0)
    }

    pub fn reset_tokens(&self) -> Vec<ResetPasswordTokenDocument> {
        self.state
            .read()
            .map(|s| s.reset_tokens.clone())
            .unwrap_or_default()
    }

    /// Make the next `update_user` call fail with `err`.
    pub fn fail_next_update(&self, err: TransportError) {
        if let Ok(mut s) = self.state.write() {
            s.fail_next_update = Some(err);
        }
    }
}

#[async_trait]
impl UpstreamTransport for InMemoryTransport {
    async fn get_users(&self, _with_secrets: bool) -> Result<Vec<UserDocument>, TransportError> {
        let s = self.state.read().map_err(|_| poisoned())?;
        Ok(s.users
            .values()
            .chain(&s.listed_duplicates)
            .cloned()
            .collect())
    }

    async fn get_user(&self, name: &str, _with_secrets: bool) -> Result<UserDocument, TransportError> {
        let s = self.state.read().map_err(|_| poisoned())?;
        s.users
            .get(name)
            .cloned()
            .ok_or_else(|| TransportError::NotFound(format!("user \"{name}\" is not found")))
    }

    async fn create_user(&self, mut user: UserDocument) -> Result<UserDocument, TransportError> {
        let name = user.metadata.name.clone();
        if name.trim().is_empty() {
            return Err(TransportError::BadParameter("missing user name".to_string()));
        }
        if user.spec.roles.is_empty() {
            return Err(TransportError::BadParameter(format!(
                "user \"{name}\" must have at least one role"
            )));
        }

        let mut s = self.state.write().map_err(|_| poisoned())?;
        if s.users.contains_key(&name) {
            return Err(TransportError::AlreadyExists(format!(
                "user \"{name}\" already exists"
            )));
        }

        user.metadata.revision = s.revision();
        user.spec.created_by = Some(CreatedBy {
            user: "gatesync".to_string(),
            time: Utc::now(),
        });
        s.users.insert(name, user.clone());
        s.mutations += 1;
        Ok(user)
    }

    async fn update_user(&self, mut user: UserDocument) -> Result<UserDocument, TransportError> {
        let name = user.metadata.name.clone();
        let mut s = self.state.write().map_err(|_| poisoned())?;

        if let Some(err) = s.fail_next_update.take() {
            return Err(err);
        }

        let current = s
            .users
            .get(&name)
            .ok_or_else(|| TransportError::NotFound(format!("user \"{name}\" is not found")))?;

        if !user.metadata.revision.is_empty() && user.metadata.revision != current.metadata.revision
        {
            return Err(TransportError::CompareFailed(format!(
                "user \"{name}\" was concurrently modified"
            )));
        }

        user.metadata.revision = s.revision();
        s.users.insert(name, user.clone());
        s.mutations += 1;
        Ok(user)
    }

    async fn delete_user(&self, name: &str) -> Result<(), TransportError> {
        let mut s = self.state.write().map_err(|_| poisoned())?;
        if s.users.remove(name).is_none() {
            return Err(TransportError::NotFound(format!("user \"{name}\" is not found")));
        }
        s.mutations += 1;
        Ok(())
    }

    async fn get_roles(&self) -> Result<Vec<RoleDocument>, TransportError> {
        let s = self.state.read().map_err(|_| poisoned())?;
        Ok(s.roles.values().cloned().collect())
    }

    async fn list_resources(
        &self,
        request: ListResourcesRequest,
    ) -> Result<ListResourcesResponse, TransportError> {
        if request.resource_type != KIND_NODE {
            return Err(TransportError::BadParameter(format!(
                "unsupported resource type \"{}\"",
                request.resource_type
            )));
        }

        let limit = if request.limit > 0 {
            request.limit
        } else {
            self.page_size
        } as usize;

        let s = self.state.read().map_err(|_| poisoned())?;
        let mut remaining = s
            .nodes
            .range(request.start_key.clone()..)
            .map(|(_, doc)| doc.clone());

        let resources: Vec<ServerDocument> = remaining.by_ref().take(limit).collect();
        let next_key = remaining
            .next()
            .map(|doc| doc.metadata.name)
            .unwrap_or_default();

        Ok(ListResourcesResponse {
            resources,
            next_key,
            total_count: s.nodes.len() as u32,
        })
    }

    async fn get_apps(&self) -> Result<Vec<AppDocument>, TransportError> {
        let s = self.state.read().map_err(|_| poisoned())?;
        Ok(s.apps.clone())
    }

    async fn get_databases(&self) -> Result<Vec<DatabaseDocument>, TransportError> {
        let s = self.state.read().map_err(|_| poisoned())?;
        Ok(s.databases.clone())
    }

    async fn create_reset_password_token(
        &self,
        request: CreateResetPasswordTokenRequest,
    ) -> Result<ResetPasswordTokenDocument, TransportError> {
        let mut s = self.state.write().map_err(|_| poisoned())?;
        if !s.users.contains_key(&request.name) {
            return Err(TransportError::NotFound(format!(
                "user \"{}\" is not found",
                request.name
            )));
        }

        let token_id = format!("token-{}", s.reset_tokens.len() + 1);
        let doc = ResetPasswordTokenDocument {
            metadata: Metadata {
                expires: Some(Utc::now() + chrono::Duration::seconds(request.ttl_secs)),
                ..Metadata::named(token_id.clone())
            },
            user: request.name,
            url: format!("https://{}/web/invite/{token_id}", self.public_addr),
        };
        s.reset_tokens.push(doc.clone());
        s.mutations += 1;
        Ok(doc)
    }
}

/// Dialer handing out a shared [`InMemoryTransport`].
#[derive(Debug)]
pub struct InMemoryDialer {
    transport: InMemoryTransport,
    reject_credentials: bool,
    delay: Option<Duration>,
    dialed: Mutex<Vec<String>>,
}

impl InMemoryDialer {
    pub fn new(transport: InMemoryTransport) -> Self {
        Self {
            transport,
            reject_credentials: false,
            delay: None,
            dialed: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting_credentials(mut self) -> Self {
        self.reject_credentials = true;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn dialed_addrs(&self) -> Vec<String> {
        self.dialed.lock().map(|d| d.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Dialer for InMemoryDialer {
    type Transport = InMemoryTransport;

    async fn dial(&self, config: DialConfig) -> Result<Self::Transport, TransportError> {
        if let Ok(mut dialed) = self.dialed.lock() {
            dialed.extend(config.addrs.iter().cloned());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.reject_credentials {
            return Err(TransportError::AccessDenied(format!(
                "identity from {} rejected",
                config.credential.source_name()
            )));
        }
        Ok(self.transport.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn node_listing_pages_by_native_key() {
        let t = InMemoryTransport::new()
            .with_page_size(2)
            .with_node("a", "a.local")
            .with_node("b", "b.local")
            .with_node("c", "c.local");

        let req = |start: &str| ListResourcesRequest {
            resource_type: KIND_NODE.into(),
            start_key: start.into(),
            limit: 0,
        };

        let first = t.list_resources(req("")).await.unwrap();
        assert_eq!(first.resources.len(), 2);
        assert_eq!(first.next_key, "c");

        let second = t.list_resources(req(&first.next_key)).await.unwrap();
        assert_eq!(second.resources.len(), 1);
        assert_eq!(second.next_key, "");
    }

    #[tokio::test]
    async fn stale_revision_is_a_compare_failure() {
        let t = InMemoryTransport::new().with_user(User::new_local("alice", vec!["access".into()]));
        let stale = t.get_user("alice", false).await.unwrap();

        t.update_user(stale.clone()).await.unwrap();
        let err = t.update_user(stale).await.unwrap_err();
        assert!(matches!(err, TransportError::CompareFailed(_)));
    }

    #[tokio::test]
    async fn listed_duplicates_follow_stored_users() {
        let t = InMemoryTransport::new()
            .with_user(User::new_local("alice", vec!["access".into()]))
            .with_listed_duplicate(User::new_local("alice", vec!["admin".into()]));

        let listed = t.get_users(false).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].spec.roles, ["access"]);
        assert_eq!(listed[1].spec.roles, ["admin"]);

        let fetched = t.get_user("alice", false).await.unwrap();
        assert_eq!(fetched.spec.roles, ["access"]);
    }

    #[tokio::test]
    async fn users_need_a_role() {
        let t = InMemoryTransport::new();
        let err = t
            .create_user(User::new_local("bob", vec![]).to_document())
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::BadParameter(_)));
        assert_eq!(t.mutation_count(), 0);
    }
}
