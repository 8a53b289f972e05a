//! Process-wide tracing setup for connector hosts.

pub mod tracing;

pub use crate::tracing::{LogConfig, LogFormat, init_with};

/// Install the default subscriber: JSON lines, `RUST_LOG` filter, `info`
/// otherwise.
///
/// Safe to call multiple times; only the first call installs anything.
pub fn init() {
    init_with(&LogConfig::from_env());
}
