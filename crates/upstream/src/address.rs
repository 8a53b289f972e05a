//! Proxy address normalization.

/// Port appended when the configured proxy address has none.
pub const DEFAULT_PORT: u16 = 443;

fn strip_scheme(address: &str) -> &str {
    let address = address.trim();
    address
        .strip_prefix("https://")
        .or_else(|| address.strip_prefix("http://"))
        .unwrap_or(address)
        .trim_end_matches('/')
}

/// Whether `address` (scheme ignored) ends in an explicit `:port`.
pub fn has_port(address: &str) -> bool {
    match strip_scheme(address).rsplit_once(':') {
        Some((host, port)) => {
            !host.is_empty() && !port.is_empty() && port.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

/// Strip any `http(s)://` prefix and append `:443` when no port is given.
///
/// `"host"` becomes `"host:443"`, `"https://host:9000"` becomes `"host:9000"`.
pub fn normalize_proxy_address(address: &str) -> String {
    let bare = strip_scheme(address);
    if has_port(bare) {
        bare.to_string()
    } else {
        format!("{bare}:{DEFAULT_PORT}")
    }
}
