//! The stateless search-and-highlight service.

use crate::decorate::{self, DecoratedText};
use crate::search::{self, MatchSet};
use std::sync::Arc;

/// Result of a highlight or clear call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightOutcome {
    /// The text with every match highlighted.
    pub decorated: DecoratedText,
    /// The matches, in discovery order.
    pub matches: MatchSet,
}

impl HighlightOutcome {
    /// Number of matches.
    pub fn count(&self) -> usize {
        self.matches.len()
    }
}

/// Finds and decorates case-insensitive occurrences of a query.
///
/// Holds no state between calls; the host owns the text buffer and the current match set.
#[derive(Debug, Clone, Copy, Default)]
pub struct Highlighter;

impl Highlighter {
    /// Create a highlighter.
    pub fn new() -> Self {
        Self
    }

    /// See [`search::search`].
    pub fn search(&self, text: &str, query: &str) -> MatchSet {
        search::search(text, query)
    }

    /// See [`decorate::render`].
    pub fn render(&self, text: &Arc<str>, matches: &MatchSet) -> DecoratedText {
        decorate::render(Arc::clone(text), matches)
    }

    /// Unmarked text with a match count of zero.
    pub fn clear(&self, text: &Arc<str>) -> HighlightOutcome {
        HighlightOutcome {
            decorated: DecoratedText::plain(Arc::clone(text)),
            matches: MatchSet::new(),
        }
    }

    /// Search `text` for `query` and decorate every match.
    pub fn highlight(&self, text: &Arc<str>, query: &str) -> HighlightOutcome {
        let matches = self.search(text, query);
        let decorated = self.render(text, &matches);
        HighlightOutcome { decorated, matches }
    }
}
