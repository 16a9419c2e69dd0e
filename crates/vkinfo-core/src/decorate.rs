//! Decorated text: a text buffer plus match highlights.
//!
//! Highlights are anchored to character offsets and never modify the text. Renderers consume
//! either the flat [`Segment`] view or the per-line [`DecoratedLine`] view; both split the text
//! into maximal runs of constant [`Emphasis`].

use crate::search::{CharIndex, MatchSet, MatchSpan};
use std::sync::Arc;

/// What a highlight marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HighlightKind {
    /// An occurrence of the query.
    Match,
    /// The occurrence the host is currently focused on.
    CurrentMatch,
}

/// A single highlight item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight {
    /// Anchor range in character offsets.
    pub span: MatchSpan,
    /// Plain or current match.
    pub kind: HighlightKind,
}

/// Visual emphasis of a run of text.
///
/// `depth` counts how many highlights cover the run, so overlapping matches stack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Emphasis {
    /// Number of highlights covering the run; zero means plain text.
    pub depth: usize,
    /// The run belongs to the current match.
    pub current: bool,
}

impl Emphasis {
    /// Plain, unmarked text.
    pub const NONE: Self = Self {
        depth: 0,
        current: false,
    };

    /// Returns `true` if at least one highlight covers the run.
    pub fn is_marked(&self) -> bool {
        self.depth > 0
    }

    /// Returns `true` if more than one highlight covers the run.
    pub fn is_stacked(&self) -> bool {
        self.depth > 1
    }
}

/// A maximal `[start, end)` character range with constant emphasis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// Inclusive start character offset.
    pub start: usize,
    /// Exclusive end character offset.
    pub end: usize,
    /// Emphasis shared by every character in the segment.
    pub emphasis: Emphasis,
}

/// A piece of one display line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    /// Text of the run, never containing `'\n'`.
    pub text: String,
    /// Emphasis of the run.
    pub emphasis: Emphasis,
}

/// One line of decorated text (without its line terminator).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecoratedLine {
    /// Non-empty runs in text order. An empty line has no runs.
    pub runs: Vec<Run>,
}

impl DecoratedLine {
    /// The line's plain text.
    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    /// Returns `true` if any run is highlighted.
    pub fn is_marked(&self) -> bool {
        self.runs.iter().any(|run| run.emphasis.is_marked())
    }
}

/// A text buffer with match highlights applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoratedText {
    text: Arc<str>,
    highlights: Vec<Highlight>,
}

impl DecoratedText {
    /// Unmarked text.
    pub fn plain(text: impl Into<Arc<str>>) -> Self {
        Self {
            text: text.into(),
            highlights: Vec::new(),
        }
    }

    /// Tag every span of `matches` with a [`HighlightKind::Match`] highlight.
    pub fn from_matches(text: impl Into<Arc<str>>, matches: &MatchSet) -> Self {
        let highlights = matches
            .iter()
            .map(|span| Highlight {
                span,
                kind: HighlightKind::Match,
            })
            .collect();
        Self {
            text: text.into(),
            highlights,
        }
    }

    /// Mark the highlight at `index` as the current match; all others become plain matches.
    ///
    /// An out-of-range index leaves no current match.
    pub fn with_current(mut self, index: Option<usize>) -> Self {
        self.set_current(index);
        self
    }

    /// In-place form of [`DecoratedText::with_current`].
    pub fn set_current(&mut self, index: Option<usize>) {
        for (i, highlight) in self.highlights.iter_mut().enumerate() {
            highlight.kind = if Some(i) == index {
                HighlightKind::CurrentMatch
            } else {
                HighlightKind::Match
            };
        }
    }

    /// The undecorated text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Shared handle to the underlying buffer.
    pub fn buffer(&self) -> &Arc<str> {
        &self.text
    }

    /// Applied highlights, ordered by start offset.
    pub fn highlights(&self) -> &[Highlight] {
        &self.highlights
    }

    /// Returns `true` if no highlight is applied.
    pub fn is_plain(&self) -> bool {
        self.highlights.is_empty()
    }

    /// Split the text into maximal runs of constant emphasis, in text order.
    ///
    /// Highlight ranges are clamped to the text; empty text yields no segments.
    pub fn segments(&self) -> Vec<Segment> {
        let char_count = self.text.chars().count();

        // (offset, depth delta, current delta)
        let mut events: Vec<(usize, isize, isize)> = Vec::with_capacity(self.highlights.len() * 2);
        for highlight in &self.highlights {
            let start = highlight.span.start.min(char_count);
            let end = highlight.span.end.min(char_count);
            if start >= end {
                continue;
            }
            let current = isize::from(highlight.kind == HighlightKind::CurrentMatch);
            events.push((start, 1, current));
            events.push((end, -1, -current));
        }
        events.sort_by_key(|event| event.0);

        let mut segments: Vec<Segment> = Vec::new();
        let mut cursor = 0;
        let mut depth: isize = 0;
        let mut current: isize = 0;

        for (offset, depth_delta, current_delta) in events {
            if offset > cursor {
                let emphasis = Emphasis {
                    depth: depth.max(0) as usize,
                    current: current > 0,
                };
                push_segment(&mut segments, cursor, offset, emphasis);
                cursor = offset;
            }
            depth += depth_delta;
            current += current_delta;
        }

        if cursor < char_count {
            push_segment(&mut segments, cursor, char_count, Emphasis::NONE);
        }

        segments
    }

    /// Split the decorated text into display lines on `'\n'`.
    ///
    /// A trailing `'\r'` is dropped from each line. Text ending in `'\n'` yields a final empty
    /// line.
    pub fn lines(&self) -> Vec<DecoratedLine> {
        let index = CharIndex::new(&self.text);
        let mut lines = vec![DecoratedLine::default()];

        for segment in self.segments() {
            let slice = index.slice(&self.text, segment.start, segment.end);
            for (i, piece) in slice.split('\n').enumerate() {
                if i > 0 {
                    lines.push(DecoratedLine::default());
                }
                if piece.is_empty() {
                    continue;
                }
                if let Some(line) = lines.last_mut() {
                    line.runs.push(Run {
                        text: piece.to_string(),
                        emphasis: segment.emphasis,
                    });
                }
            }
        }

        for line in &mut lines {
            if let Some(last) = line.runs.last_mut() {
                if last.text.ends_with('\r') {
                    last.text.pop();
                }
            }
            line.runs.retain(|run| !run.text.is_empty());
        }

        lines
    }

    /// Zero-based `(line, column)` of the character at `char_offset`.
    pub fn position_of(&self, char_offset: usize) -> (usize, usize) {
        let mut line = 0;
        let mut column = 0;
        for ch in self.text.chars().take(char_offset) {
            if ch == '\n' {
                line += 1;
                column = 0;
            } else {
                column += 1;
            }
        }
        (line, column)
    }

    /// Number of display lines.
    pub fn line_count(&self) -> usize {
        self.text.chars().filter(|&ch| ch == '\n').count() + 1
    }
}

fn push_segment(segments: &mut Vec<Segment>, start: usize, end: usize, emphasis: Emphasis) {
    match segments.last_mut() {
        Some(last) if last.end == start && last.emphasis == emphasis => last.end = end,
        _ => segments.push(Segment {
            start,
            end,
            emphasis,
        }),
    }
}

/// Produce a decorated representation of `text` with every span of `matches` highlighted.
///
/// Overlapping spans are applied independently; the overlapped characters get a stacked
/// [`Emphasis`]. An empty match set yields plain text.
pub fn render(text: impl Into<Arc<str>>, matches: &MatchSet) -> DecoratedText {
    DecoratedText::from_matches(text, matches)
}
