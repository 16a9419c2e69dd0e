//! Search session state machine.
//!
//! The session owns the text buffer, the current match set and the injected diagnostic
//! provider. Hosts translate their UI callbacks into [`SessionEvent`]s and render whatever
//! [`SearchSession::decorated`] returns; user-visible notifications come back as [`Notice`]s.
//!
//! ```text
//! Idle --Submit(n > 0)--> Highlighted
//! Idle --Submit(n = 0)--> NoMatch            (Notice::NoMatch)
//! Highlighted --QueryChanged/Close--> Idle   (decoration cleared)
//! NoMatch --QueryChanged/Close--> Idle
//! any --Refresh--> Idle                      (buffer replaced)
//! ```

use crate::decorate::DecoratedText;
use crate::highlighter::Highlighter;
use crate::provider::DiagnosticProvider;
use crate::search::{MatchSet, MatchSpan};
use std::fmt;
use std::sync::Arc;

/// Buffer shown when the provider fails.
pub const PLACEHOLDER_TEXT: &str = "No diagnostic text available.";

/// Where the search view is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No active search.
    Idle,
    /// Matches present and displayed.
    Highlighted,
    /// Search executed, zero matches.
    NoMatch,
}

/// Discrete input events from the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The user submitted a query.
    Submit(String),
    /// The query field's contents changed.
    QueryChanged(String),
    /// The search view was closed.
    Close,
    /// Fetch new diagnostic text from the provider.
    Refresh,
    /// Focus the next match (wrapping).
    NextMatch,
    /// Focus the previous match (wrapping).
    PreviousMatch,
}

/// A user-visible notification requested by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A submit found this many matches.
    MatchesFound(usize),
    /// A submit found nothing.
    NoMatch {
        /// The submitted query.
        query: String,
    },
    /// Visible highlighting was removed.
    Cleared,
    /// New text was loaded.
    Refreshed {
        /// Provider description.
        source: String,
    },
    /// The provider failed; the placeholder text is shown instead.
    ProviderFailed(String),
    /// The current match moved.
    Focus {
        /// Zero-based index of the current match.
        index: usize,
        /// Total number of matches.
        count: usize,
    },
}

impl Notice {
    /// Returns `true` for notices that hosts should surface prominently (e.g. as a toast).
    pub fn is_alert(&self) -> bool {
        matches!(self, Self::NoMatch { .. } | Self::ProviderFailed(_))
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MatchesFound(count) => write!(f, "Matches found {count}"),
            Self::NoMatch { .. } => write!(f, "No Match found"),
            Self::Cleared => Ok(()),
            Self::Refreshed { source } => write!(f, "Loaded {source}"),
            Self::ProviderFailed(err) => write!(f, "Failed to load diagnostics: {err}"),
            Self::Focus { index, count } => write!(f, "Match {}/{}", index + 1, count),
        }
    }
}

/// Search state for one diagnostic text session.
#[derive(Debug)]
pub struct SearchSession<P> {
    provider: P,
    highlighter: Highlighter,
    buffer: Arc<str>,
    state: SessionState,
    query: String,
    matches: MatchSet,
    decorated: DecoratedText,
    current: Option<usize>,
}

impl<P: DiagnosticProvider> SearchSession<P> {
    /// Create an idle session with an empty buffer. Call [`SearchSession::refresh`] to load
    /// text from the provider.
    pub fn new(provider: P) -> Self {
        let buffer: Arc<str> = Arc::from("");
        Self {
            provider,
            highlighter: Highlighter::new(),
            decorated: DecoratedText::plain(Arc::clone(&buffer)),
            buffer,
            state: SessionState::Idle,
            query: String::new(),
            matches: MatchSet::new(),
            current: None,
        }
    }

    /// Create a session and load the initial buffer.
    pub fn open(provider: P) -> (Self, Option<Notice>) {
        let mut session = Self::new(provider);
        let notice = session.refresh();
        (session, notice)
    }

    /// Apply one input event.
    pub fn handle(&mut self, event: SessionEvent) -> Option<Notice> {
        match event {
            SessionEvent::Submit(query) => self.submit(&query),
            SessionEvent::QueryChanged(text) => self.query_changed(&text),
            SessionEvent::Close => self.close(),
            SessionEvent::Refresh => self.refresh(),
            SessionEvent::NextMatch => self.step_match(true),
            SessionEvent::PreviousMatch => self.step_match(false),
        }
    }

    /// Search the buffer for `query`. Valid from every state.
    pub fn submit(&mut self, query: &str) -> Option<Notice> {
        self.query = query.to_string();
        let outcome = self.highlighter.highlight(&self.buffer, query);
        let count = outcome.count();

        if count == 0 {
            log::debug!("no match for {query:?}");
            self.clear();
            self.state = SessionState::NoMatch;
            return Some(Notice::NoMatch {
                query: query.to_string(),
            });
        }

        self.matches = outcome.matches;
        self.current = Some(0);
        self.decorated = outcome.decorated.with_current(self.current);
        self.state = SessionState::Highlighted;
        Some(Notice::MatchesFound(count))
    }

    /// The query field was edited; any visible highlighting is dropped.
    pub fn query_changed(&mut self, text: &str) -> Option<Notice> {
        self.query = text.to_string();
        match self.state {
            SessionState::Highlighted => {
                self.clear();
                Some(Notice::Cleared)
            }
            SessionState::NoMatch => {
                self.state = SessionState::Idle;
                None
            }
            SessionState::Idle => None,
        }
    }

    /// Close the search view. Returns [`Notice::Cleared`] only if something was highlighted.
    pub fn close(&mut self) -> Option<Notice> {
        let was_highlighted = self.state == SessionState::Highlighted;
        self.clear();
        was_highlighted.then_some(Notice::Cleared)
    }

    /// Replace the buffer with fresh provider text.
    ///
    /// On failure the buffer becomes [`PLACEHOLDER_TEXT`]. Either way previous matches are
    /// invalidated and the session returns to [`SessionState::Idle`].
    pub fn refresh(&mut self) -> Option<Notice> {
        let source = self.provider.describe();
        let notice = match self.provider.fetch() {
            Ok(text) => {
                log::info!("loaded {} bytes from {source}", text.len());
                self.buffer = Arc::from(text);
                Notice::Refreshed { source }
            }
            Err(err) => {
                log::warn!("diagnostic provider {source} failed: {err}");
                self.buffer = Arc::from(PLACEHOLDER_TEXT);
                Notice::ProviderFailed(err.to_string())
            }
        };
        self.clear();
        Some(notice)
    }

    /// Drop all highlighting. Idempotent.
    pub fn clear(&mut self) {
        let outcome = self.highlighter.clear(&self.buffer);
        self.decorated = outcome.decorated;
        self.matches = outcome.matches;
        self.current = None;
        self.state = SessionState::Idle;
    }

    fn step_match(&mut self, forward: bool) -> Option<Notice> {
        if self.state != SessionState::Highlighted || self.matches.is_empty() {
            return None;
        }

        let count = self.matches.len();
        let index = match (self.current, forward) {
            (Some(i), true) => (i + 1) % count,
            (Some(i), false) => (i + count - 1) % count,
            (None, true) => 0,
            (None, false) => count - 1,
        };

        self.current = Some(index);
        self.decorated.set_current(self.current);
        Some(Notice::Focus { index, count })
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Last submitted or edited query.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The full text buffer.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// What the host should render.
    pub fn decorated(&self) -> &DecoratedText {
        &self.decorated
    }

    /// Matches of the last successful submit; empty unless highlighted.
    pub fn matches(&self) -> &MatchSet {
        &self.matches
    }

    /// Number of current matches.
    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    /// The focused match and its index.
    pub fn current_match(&self) -> Option<(usize, MatchSpan)> {
        let index = self.current?;
        self.matches.get(index).map(|span| (index, span))
    }

    /// The injected provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Mutable access to the injected provider.
    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }
}
