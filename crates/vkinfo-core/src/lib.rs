#![warn(missing_docs)]
//! vkinfo core - search and highlight for Vulkan diagnostic text
//!
//! # Overview
//!
//! `vkinfo-core` holds everything a host needs to display a block of diagnostic text and let
//! the user search it: a case-insensitive search that reports overlapping occurrences, a
//! decorated-text model for highlighting, a state machine driving the search view, and the
//! diagnostic providers that produce the text.
//!
//! The crate does no rendering. Hosts (see `vkinfo-tui`) turn [`DecoratedText`] segments or
//! lines into styled output.
//!
//! # Quick Start
//!
//! ```rust
//! use vkinfo_core::{Notice, SearchSession, SessionEvent, SessionState, StaticProvider};
//!
//! let provider = StaticProvider::new("Vulkan Version: 1.3.0\nDevice Name: Adreno (TM) 650\n");
//! let (mut session, _) = SearchSession::open(provider);
//!
//! let notice = session.handle(SessionEvent::Submit("vulkan".to_string()));
//! assert_eq!(notice, Some(Notice::MatchesFound(1)));
//! assert_eq!(session.state(), SessionState::Highlighted);
//!
//! session.handle(SessionEvent::Close);
//! assert_eq!(session.state(), SessionState::Idle);
//! assert!(session.decorated().is_plain());
//! ```
//!
//! # Offsets
//!
//! All offsets are character offsets (Unicode scalar values), half-open `[start, end)`.
//!
//! # Module Description
//!
//! - [`search`] - case folding and the match scan
//! - [`decorate`] - highlighted text and its segment/line views
//! - [`highlighter`] - the stateless search + render service
//! - [`session`] - the `Idle` / `Highlighted` / `NoMatch` state machine
//! - [`provider`] - diagnostic text sources
//! - [`report`] - structured Vulkan reports and their text layout

pub mod decorate;
pub mod error;
pub mod highlighter;
pub mod provider;
pub mod report;
pub mod search;
pub mod session;

pub use decorate::{
    DecoratedLine, DecoratedText, Emphasis, Highlight, HighlightKind, Run, Segment, render,
};
pub use error::ProviderError;
pub use highlighter::{HighlightOutcome, Highlighter};
pub use provider::{
    CommandProvider, DEFAULT_PROGRAM, DiagnosticProvider, FileProvider, ReportProvider,
    StaticProvider,
};
pub use report::{VulkanReport, format_version, render_report};
pub use search::{MatchSet, MatchSpan, fold_case, fold_char, search};
pub use session::{Notice, PLACEHOLDER_TEXT, SearchSession, SessionEvent, SessionState};
