//! `gatesync-upstream`: client facade for the upstream access backend.
//!
//! Everything the connector needs from the backend goes through [`Client`].
//! The wire client itself sits behind [`UpstreamTransport`]; the facade adapts
//! versioned wire documents into the concrete types in [`user`], [`role`] and
//! [`inventory`].

pub mod address;
pub mod client;
pub mod credential;
pub mod in_memory;
pub mod inventory;
pub mod role;
pub mod transport;
pub mod user;
pub mod wire;

pub use address::{DEFAULT_PORT, has_port, normalize_proxy_address};
pub use client::{CONNECT_TIMEOUT, Client, NodePage, ResetToken};
pub use credential::Credential;
pub use in_memory::{InMemoryDialer, InMemoryTransport};
pub use inventory::{App, Database, Node};
pub use role::{RequireMfaType, Role, RoleConditions, RoleOptions};
pub use transport::{DialConfig, Dialer, TransportError, UpstreamTransport};
pub use user::{User, UserKind, UserType};
