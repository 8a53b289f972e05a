//! Per-sync-pass state.
//!
//! A session carries the user listing shared by the role syncer's grant
//! computation. It replaces process-wide caches: each sync pass gets its own
//! session, and dropping it drops everything it memoized.

use std::sync::{Arc, RwLock};

use tracing::debug;

use gatesync_core::{ConnectorResult, SessionId};
use gatesync_upstream::{Client, User};

#[derive(Debug, Default)]
pub struct SyncSession {
    id: SessionId,
    users: RwLock<Option<Arc<Vec<User>>>>,
}

impl SyncSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Users known to this session, fetched from upstream on first use.
    pub async fn users(&self, client: &Client) -> ConnectorResult<Arc<Vec<User>>> {
        if let Some(users) = self.cached_users() {
            return Ok(users);
        }

        // The lock is not held across the fetch; a concurrent loader simply
        // overwrites with an equally fresh listing.
        let users = Arc::new(client.list_users().await?);
        debug!(session = %self.id, count = users.len(), "loaded user listing");
        self.store_users(Arc::clone(&users));
        Ok(users)
    }

    pub fn store_users(&self, users: Arc<Vec<User>>) {
        let mut slot = self.users.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(users);
    }

    /// Drop the memoized listing so the next read goes upstream.
    pub fn invalidate_users(&self) {
        let mut slot = self.users.write().unwrap_or_else(|e| e.into_inner());
        if slot.take().is_some() {
            debug!(session = %self.id, "invalidated user listing");
        }
    }

    fn cached_users(&self) -> Option<Arc<Vec<User>>> {
        let slot = self.users.read().unwrap_or_else(|e| e.into_inner());
        slot.clone()
    }
}
