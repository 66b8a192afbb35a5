//! Shared types used across rigel crates.
//!
//! This crate is intentionally small and dependency-light.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A byte-span into a source string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Slice `source` with this span, or `None` if the span is out of bounds
    /// or does not fall on UTF-8 boundaries.
    pub fn text<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.start..self.end)
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Span({}..{})", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn span_basics() {
        let span = Span::new(3, 8);
        assert_eq!(span.len(), 5);
        assert!(!span.is_empty());
        assert_eq!(span.text("hello, world"), Some("lo, w"));
        assert_eq!(format!("{span:?}"), "Span(3..8)");
    }

    #[test]
    fn out_of_bounds_text_is_none() {
        let span = Span::new(2, 99);
        assert_eq!(span.text("abc"), None);
        assert!(Span::new(5, 5).is_empty());
    }
}
