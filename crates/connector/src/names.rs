//! Name conventions for upstream logins.

use std::sync::LazyLock;

use regex::Regex;

static DISALLOWED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^a-z0-9\-.+]+").expect("DISALLOWED is a valid regex pattern")
});

/// Lowercase, turn spaces into `-` and drop anything outside `[a-z0-9-.+]`.
pub fn clean_resource_name(name: &str) -> String {
    let lowered = name.replace(' ', "-").to_lowercase();
    DISALLOWED.replace_all(&lowered, "").into_owned()
}

/// Split a login at its first `-` into (first, last) name.
pub fn split_dash_separated_name(name: &str) -> (&str, &str) {
    match name.split_once('-') {
        Some((first, last)) => (first, last),
        None => (name, ""),
    }
}
