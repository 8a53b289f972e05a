//! Pagination cursors.
//!
//! An empty token means "first page" on input and "no more pages" on output.

use serde::{Deserialize, Serialize};

use crate::annotations::Annotations;

/// Opaque cursor handed back by the driver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationToken {
    pub token: String,
    pub size: u32,
}

impl PaginationToken {
    pub fn start() -> Self {
        Self::default()
    }

    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            size: 0,
        }
    }

    pub fn is_start(&self) -> bool {
        self.token.is_empty()
    }
}

/// One page of results plus the cursor for the next one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_page_token: String,
    pub annotations: Annotations,
}

impl<T> Page<T> {
    /// Final page.
    pub fn last(items: Vec<T>) -> Self {
        Self::more(items, String::new())
    }

    /// A page followed by `next_page_token` (final when empty).
    pub fn more(items: Vec<T>, next_page_token: impl Into<String>) -> Self {
        Self {
            items,
            next_page_token: next_page_token.into(),
            annotations: Annotations::new(),
        }
    }

    pub fn empty() -> Self {
        Self::last(Vec::new())
    }

    pub fn has_more(&self) -> bool {
        !self.next_page_token.is_empty()
    }

    pub fn next_token(&self) -> PaginationToken {
        PaginationToken::new(self.next_page_token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cursor_ends_the_walk() {
        let p: Page<u8> = Page::last(vec![1, 2]);
        assert!(!p.has_more());
        assert!(p.next_token().is_start());

        let p: Page<u8> = Page::more(vec![1], "k2");
        assert!(p.has_more());
        assert_eq!(p.next_token().token, "k2");
    }
}
