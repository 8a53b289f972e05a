//! Credential source selection.

use std::path::PathBuf;

use gatesync_core::{ConnectorError, ConnectorResult};

/// Identity material used to authenticate against the proxy.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// Path to an identity file on disk.
    KeyFile(PathBuf),
    /// Identity file contents passed inline.
    Inline(String),
}

impl Credential {
    /// Select exactly one non-empty credential source.
    ///
    /// Both present or neither present is a configuration error.
    pub fn from_sources(key_file: Option<&str>, key: Option<&str>) -> ConnectorResult<Self> {
        let key_file = key_file.map(str::trim).filter(|s| !s.is_empty());
        let key = key.filter(|s| !s.trim().is_empty());

        match (key_file, key) {
            (Some(path), None) => Ok(Self::KeyFile(PathBuf::from(path))),
            (None, Some(key)) => Ok(Self::Inline(key.to_string())),
            (Some(_), Some(_)) => Err(ConnectorError::config(
                "exactly one of key file or inline key must be set, got both",
            )),
            (None, None) => Err(ConnectorError::config("no key provided")),
        }
    }

    pub fn source_name(&self) -> &'static str {
        match self {
            Self::KeyFile(_) => "key_file",
            Self::Inline(_) => "inline_key",
        }
    }
}

impl core::fmt::Debug for Credential {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::KeyFile(path) => f.debug_tuple("KeyFile").field(path).finish(),
            Self::Inline(_) => f.debug_tuple("Inline").field(&"<redacted>").finish(),
        }
    }
}
