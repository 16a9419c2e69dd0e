//! Case-insensitive substring search.
//!
//! All public offsets are **character offsets** (Unicode scalar values), not byte offsets.
//! Both the text and the query are folded with [`fold_char`] before comparison. The fold maps
//! every character to exactly one character, so offsets found in the folded text are valid
//! offsets into the original text.

/// Folds a single character for case-insensitive comparison.
///
/// Uses the locale-independent Unicode lowercase mapping when it produces exactly one
/// character. Characters whose lowercase form expands (e.g. `'İ'` -> `"i\u{307}"`) are kept
/// as-is.
pub fn fold_char(ch: char) -> char {
    let mut lower = ch.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(folded), None) => folded,
        _ => ch,
    }
}

/// Folds every character of `text` with [`fold_char`].
pub fn fold_case(text: &str) -> String {
    text.chars().map(fold_char).collect()
}

/// One occurrence of a query, expressed as a half-open character range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MatchSpan {
    /// Inclusive start character offset.
    pub start: usize,
    /// Exclusive end character offset.
    pub end: usize,
}

impl MatchSpan {
    /// Create a new span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the length of the span in characters.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the span covers no characters.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Check if the span covers the character at `offset`.
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Check if two spans share at least one character.
    pub fn overlaps(&self, other: &MatchSpan) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// The spans found by one search, in left-to-right discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSet {
    spans: Vec<MatchSpan>,
}

impl MatchSet {
    /// Create an empty match set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of matches.
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Returns `true` if nothing matched.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// All spans, ordered by start offset.
    pub fn spans(&self) -> &[MatchSpan] {
        &self.spans
    }

    /// The span at `index`, if any.
    pub fn get(&self, index: usize) -> Option<MatchSpan> {
        self.spans.get(index).copied()
    }

    /// Iterate over the spans by value.
    pub fn iter(&self) -> impl Iterator<Item = MatchSpan> + '_ {
        self.spans.iter().copied()
    }

    /// Drop all spans.
    pub fn clear(&mut self) {
        self.spans.clear();
    }
}

impl<'a> IntoIterator for &'a MatchSet {
    type Item = &'a MatchSpan;
    type IntoIter = std::slice::Iter<'a, MatchSpan>;

    fn into_iter(self) -> Self::IntoIter {
        self.spans.iter()
    }
}

impl FromIterator<MatchSpan> for MatchSet {
    fn from_iter<I: IntoIterator<Item = MatchSpan>>(iter: I) -> Self {
        let mut spans: Vec<MatchSpan> = iter.into_iter().collect();
        spans.sort_by_key(|span| span.start);
        Self { spans }
    }
}

/// Character/byte offset table for a UTF-8 string.
#[derive(Debug)]
pub(crate) struct CharIndex {
    char_to_byte: Vec<usize>,
    text_len: usize,
}

impl CharIndex {
    pub(crate) fn new(text: &str) -> Self {
        let mut char_to_byte: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        char_to_byte.push(text.len());
        Self {
            char_to_byte,
            text_len: text.len(),
        }
    }

    pub(crate) fn char_count(&self) -> usize {
        self.char_to_byte.len().saturating_sub(1)
    }

    pub(crate) fn char_to_byte(&self, char_offset: usize) -> usize {
        let clamped = char_offset.min(self.char_count());
        self.char_to_byte
            .get(clamped)
            .copied()
            .unwrap_or(self.text_len)
    }

    pub(crate) fn byte_to_char(&self, byte_offset: usize) -> usize {
        let clamped = byte_offset.min(self.text_len);
        match self.char_to_byte.binary_search(&clamped) {
            Ok(idx) => idx,
            Err(idx) => idx,
        }
    }

    /// Slice `text` (the string this index was built from) by character range.
    pub(crate) fn slice<'t>(&self, text: &'t str, start: usize, end: usize) -> &'t str {
        let start = self.char_to_byte(start);
        let end = self.char_to_byte(end).max(start);
        &text[start..end]
    }
}

/// Find every case-insensitive occurrence of `query` in `text`.
///
/// After a match at `s` the scan resumes at `s + 1`, so overlapping occurrences are all
/// reported: `"aa"` in `"aaa"` yields `[0, 2)` and `[1, 3)`.
///
/// - Returns an empty set if `query` is empty or longer than `text`.
/// - Spans are character offsets into `text` and are half-open.
pub fn search(text: &str, query: &str) -> MatchSet {
    if query.is_empty() {
        return MatchSet::new();
    }

    let folded_query = fold_case(query);
    let query_len = folded_query.chars().count();
    let folded_text = fold_case(text);
    let index = CharIndex::new(&folded_text);

    if query_len > index.char_count() {
        return MatchSet::new();
    }

    let mut spans = Vec::new();
    let mut start_char = 0;
    while start_char < index.char_count() {
        let start_byte = index.char_to_byte(start_char);
        let Some(found) = folded_text[start_byte..].find(&folded_query) else {
            break;
        };

        let start = index.byte_to_char(start_byte + found);
        spans.push(MatchSpan::new(start, start + query_len));
        start_char = start + 1;
    }

    log::debug!("search {query:?}: {} match(es)", spans.len());
    MatchSet { spans }
}

/// Returns `true` if the characters of `text` covered by `span` fold to the same string as
/// `query`.
#[cfg(test)]
fn is_match_at(text: &str, query: &str, span: MatchSpan) -> bool {
    if span.is_empty() {
        return false;
    }
    let index = CharIndex::new(text);
    if span.end > index.char_count() {
        return false;
    }
    fold_case(index.slice(text, span.start, span.end)) == fold_case(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn spans(set: &MatchSet) -> Vec<(usize, usize)> {
        set.iter().map(|s| (s.start, s.end)).collect()
    }

    #[test]
    fn test_overlapping_matches_are_reported() {
        assert_eq!(spans(&search("aaa", "aa")), vec![(0, 2), (1, 3)]);
        assert_eq!(spans(&search("aaaa", "aa")), vec![(0, 2), (1, 3), (2, 4)]);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(spans(&search("Vulkan Info", "VULKAN")), vec![(0, 6)]);
        assert_eq!(spans(&search("VULKAN vulkan Vulkan", "vUlKaN")).len(), 3);
    }

    #[test]
    fn test_no_match() {
        assert!(search("Vulkan Info", "xyz").is_empty());
    }

    #[test]
    fn test_empty_query_matches_nothing() {
        assert!(search("anything", "").is_empty());
        assert!(search("", "").is_empty());
    }

    #[test]
    fn test_query_longer_than_text() {
        assert!(search("abc", "abcd").is_empty());
        assert!(search("", "a").is_empty());
    }

    #[test]
    fn test_offsets_are_char_offsets() {
        // "é" and "👋" are multi-byte; offsets count characters.
        let text = "é👋 Device Name: Ädreno";
        let set = search(text, "ädreno");
        assert_eq!(spans(&set), vec![(16, 22)]);
        assert!(is_match_at(text, "ädreno", set.spans()[0]));
    }

    #[test]
    fn test_expanding_lowercase_is_kept_verbatim() {
        assert_eq!(fold_char('İ'), 'İ');
        assert_eq!(fold_char('K'), 'k');
        // Kelvin sign folds to ASCII 'k' (3 bytes -> 1 byte) without shifting char offsets.
        let set = search("\u{212A}elvin kelvin", "KELVIN");
        assert_eq!(spans(&set), vec![(0, 6), (7, 13)]);
    }

    #[test]
    fn test_every_span_matches_query() {
        let text = "maxImageDimension1D 16384\nmaxImageDimension2D 16384\nMAXIMAGEDIMENSION3D 2048";
        let query = "ImageDimension";
        let set = search(text, query);
        assert_eq!(set.len(), 3);
        for span in &set {
            assert_eq!(span.len(), query.chars().count());
            assert!(is_match_at(text, query, *span));
        }
    }

    #[test]
    fn test_starts_are_non_decreasing() {
        let set = search("abababab", "aba");
        let starts: Vec<usize> = set.iter().map(|s| s.start).collect();
        assert_eq!(starts, vec![0, 2, 4]);
    }

    #[test]
    fn test_span_helpers() {
        let a = MatchSpan::new(0, 2);
        let b = MatchSpan::new(1, 3);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&MatchSpan::new(2, 4)));
        assert!(a.contains(1));
        assert!(!a.contains(2));
        assert_eq!(b.len(), 2);
    }
}
