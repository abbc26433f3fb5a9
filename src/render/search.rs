//! Case-insensitive search highlighting.
//!
//! Highlights are ordinary [`StyledSpan`]s tagged [`SpanOwner::Search`], so a
//! new query replaces only the highlighter's own spans and never disturbs diff
//! or syntax colouring.

use std::ops::Range;

use regex::RegexBuilder;
use tracing::{debug, warn};

use super::span::{SpanOwner, StyledSpan, StyledText};
use crate::theme::Theme;

/// Search highlighter.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchHighlighter;

impl SearchHighlighter {
    /// Create a highlighter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Byte ranges of every case-insensitive occurrence of `query`.
    ///
    /// The query is trimmed first; a blank query matches nothing. Each search
    /// resumes at the end of the previous match, so matches never overlap.
    #[must_use]
    pub fn matches(&self, text: &str, query: &str) -> Vec<Range<usize>> {
        let query = query.trim();
        if query.is_empty() || text.is_empty() {
            return Vec::new();
        }

        match RegexBuilder::new(&regex::escape(query))
            .case_insensitive(true)
            .build()
        {
            Ok(re) => re.find_iter(text).map(|m| m.range()).collect(),
            Err(e) => {
                warn!(error = %e, "search pattern rejected, using ASCII scan");
                ascii_matches(text, query)
            }
        }
    }

    /// Spans for every occurrence of `query`.
    #[must_use]
    pub fn spans(&self, text: &str, query: &str, theme: &Theme) -> Vec<StyledSpan> {
        self.matches(text, query)
            .into_iter()
            .map(|r| StyledSpan::bg(r, theme.search_bg, SpanOwner::Search))
            .collect()
    }

    /// Replace the search highlights in `styled` with those for `query`.
    ///
    /// Returns the number of matches.
    pub fn apply(&self, styled: &mut StyledText, text: &str, query: &str, theme: &Theme) -> usize {
        styled.clear_owner(SpanOwner::Search);
        let spans = self.spans(text, query, theme);
        let count = spans.len();
        styled.extend(spans);
        debug!(matches = count, "search highlight applied");
        count
    }
}

fn ascii_matches(text: &str, query: &str) -> Vec<Range<usize>> {
    let haystack = text.as_bytes();
    let needle = query.as_bytes();
    let mut found = Vec::new();
    let mut from = 0;
    while from + needle.len() <= haystack.len() {
        if haystack[from..from + needle.len()].eq_ignore_ascii_case(needle)
            && text.is_char_boundary(from)
            && text.is_char_boundary(from + needle.len())
        {
            found.push(from..from + needle.len());
            from += needle.len();
        } else {
            from += 1;
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_case_insensitive() {
        let text = "error Error ERROR eRrOr";
        let found = SearchHighlighter::new().matches(text, "ERROR");
        assert_eq!(found, vec![0..5, 6..11, 12..17, 18..23]);
    }

    #[test]
    fn test_query_is_trimmed() {
        let found = SearchHighlighter::new().matches("foo bar foo", "  foo \n");
        assert_eq!(found, vec![0..3, 8..11]);
    }

    #[test]
    fn test_blank_query_matches_nothing() {
        assert!(SearchHighlighter::new().matches("anything", "   ").is_empty());
        assert!(SearchHighlighter::new().matches("", "x").is_empty());
    }

    #[test]
    fn test_matches_do_not_overlap() {
        let found = SearchHighlighter::new().matches("aaaa", "aa");
        assert_eq!(found, vec![0..2, 2..4]);
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let found = SearchHighlighter::new().matches("a.b axb (a.b)", "a.b");
        assert_eq!(found, vec![0..3, 9..12]);
    }

    #[test]
    fn test_apply_replaces_only_search_spans() {
        let theme = Theme::dark();
        let text = "foo bar foo";
        let mut styled = StyledText::new(text.len());
        styled.push(StyledSpan::fg(0..3, theme.keyword, SpanOwner::Syntax));

        let highlighter = SearchHighlighter::new();
        assert_eq!(highlighter.apply(&mut styled, text, "foo", &theme), 2);
        assert_eq!(highlighter.apply(&mut styled, text, "bar", &theme), 1);
        assert_eq!(styled.spans_of(SpanOwner::Search).count(), 1);

        assert_eq!(highlighter.apply(&mut styled, text, "", &theme), 0);
        assert_eq!(styled.spans(), &[StyledSpan::fg(0..3, theme.keyword, SpanOwner::Syntax)]);
    }

    #[test]
    fn test_ascii_fallback() {
        assert_eq!(ascii_matches("Hello hello", "HELLO"), vec![0..5, 6..11]);
        assert_eq!(ascii_matches("é", "x"), Vec::<Range<usize>>::new());
    }
}
