//! Connector configuration.
//!
//! One required setting (the proxy address) plus exactly one credential
//! source. Validation runs before any network call.

use serde::Deserialize;

use gatesync_core::{ConnectorError, ConnectorResult};
use gatesync_upstream::Credential;

pub const PROXY_ADDRESS_ENV: &str = "GATESYNC_PROXY_ADDRESS";
pub const KEY_FILE_ENV: &str = "GATESYNC_KEY_FILE";
pub const KEY_ENV: &str = "GATESYNC_KEY";

#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ConnectorConfig {
    /// Proxy address of the upstream backend, e.g. `proxy.example.com:443`.
    pub proxy_address: String,
    /// Path to an identity file.
    #[serde(default)]
    pub key_file: Option<String>,
    /// Identity file contents.
    #[serde(default)]
    pub key: Option<String>,
}

impl core::fmt::Debug for ConnectorConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ConnectorConfig")
            .field("proxy_address", &self.proxy_address)
            .field("key_file", &self.key_file)
            .field("key", &self.key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl ConnectorConfig {
    pub fn new(proxy_address: impl Into<String>) -> Self {
        Self {
            proxy_address: proxy_address.into(),
            ..Default::default()
        }
    }

    pub fn with_key_file(mut self, path: impl Into<String>) -> Self {
        self.key_file = Some(path.into());
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Read `GATESYNC_PROXY_ADDRESS`, `GATESYNC_KEY_FILE` and `GATESYNC_KEY`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        Self {
            proxy_address: get(PROXY_ADDRESS_ENV).unwrap_or_default(),
            key_file: get(KEY_FILE_ENV),
            key: get(KEY_ENV),
        }
    }

    pub fn validate(&self) -> ConnectorResult<()> {
        if self.proxy_address.trim().is_empty() {
            return Err(ConnectorError::config("proxy address is required"));
        }
        self.credential().map(|_| ())
    }

    pub fn credential(&self) -> ConnectorResult<Credential> {
        Credential::from_sources(self.key_file.as_deref(), self.key.as_deref())
    }
}
