//! `gatesync-connector`: resource synchronization and access-grant
//! reconciliation.
//!
//! Five syncers (user, role, node, app, database) list upstream inventory as
//! governance resources, derive entitlements and grants from it, and turn
//! grant/revoke requests into mutations of a user's role list.

pub mod config;
pub mod connector;
pub mod mappers;
pub mod names;
pub mod reconcile;
pub mod resource_types;
pub mod session;
pub mod syncers;

pub use config::ConnectorConfig;
pub use connector::Connector;
pub use resource_types::{APP, DATABASE, MEMBERSHIP, NODE, ROLE, USER};
pub use session::SyncSession;
pub use syncers::{
    AccountManager, AppSyncer, DatabaseSyncer, NodeSyncer, ResourceSyncer, RoleSyncer, UserSyncer,
};
