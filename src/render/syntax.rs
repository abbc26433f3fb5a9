//! Lightweight cross-language lexical colouring.
//!
//! This is not a lexer. Four passes run in a fixed order over the whole text
//! (strings, comments, keywords, numbers) and later passes win where they
//! overlap. One shared ruleset covers every file type, trading accuracy for
//! speed on large session logs.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use super::span::{Rgb, SpanOwner, StyledSpan};
use crate::theme::Theme;

/// Quote characters that open string literals.
pub const STRING_QUOTES: [u8; 3] = [b'"', b'\'', b'`'];

/// Markers that start a comment running to end of line.
pub const COMMENT_MARKERS: [&str; 3] = ["//", "#", ";"];

const NUMBER_PATTERN: &str = r"\b(?:0[xX][0-9a-fA-F]+|\d+(?:\.\d+)?)\b";

/// Curated keywords from mainstream languages, coloured uniformly.
const DEFAULT_KEYWORDS: &[&str] = &[
    // control flow
    "if", "else", "elif", "for", "while", "do", "loop", "break", "continue", "return", "match",
    "switch", "case", "default", "try", "catch", "finally", "throw", "throws", "raise", "yield",
    "await", "async", "goto", "defer", "guard",
    // declarations
    "fn", "func", "function", "def", "class", "struct", "enum", "trait", "impl", "interface",
    "type", "let", "var", "const", "static", "mut", "pub", "private", "protected", "public",
    "import", "from", "export", "use", "package", "module", "namespace", "extends",
    "implements", "new", "delete", "this", "self", "super", "in", "is", "as", "where", "with",
    "lambda", "and", "or", "not",
    // common types
    "void", "int", "float", "double", "bool", "boolean", "string", "char", "byte", "long",
    "short", "i32", "i64", "u8", "u32", "u64", "usize", "f32", "f64", "str", "String",
    // literals
    "true", "false", "null", "nil", "None", "True", "False", "undefined",
];

static NUMBER_RE: Lazy<Option<Regex>> = Lazy::new(|| compile("number", NUMBER_PATTERN));

static DEFAULT_KEYWORD_RE: Lazy<Option<Regex>> =
    Lazy::new(|| KeywordTable::default().compile());

fn compile(pass: &str, pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!(pass, error = %e, "skipping syntax pass: pattern failed to compile");
            None
        }
    }
}

/// The keyword list used by the keyword pass.
///
/// Kept as data so it can be extended (for example from configuration)
/// without touching the scanning logic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordTable {
    words: Vec<String>,
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self {
            words: DEFAULT_KEYWORDS.iter().map(|w| (*w).to_string()).collect(),
        }
    }
}

impl KeywordTable {
    /// Create a table from an explicit word list.
    #[must_use]
    pub fn new(words: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let mut table = Self { words: Vec::new() };
        table.extend(words);
        table
    }

    /// Add words, ignoring blanks and duplicates.
    pub fn extend(&mut self, words: impl IntoIterator<Item = impl Into<String>>) {
        for word in words {
            let word = word.into().trim().to_string();
            if !word.is_empty() && !self.words.contains(&word) {
                self.words.push(word);
            }
        }
    }

    /// Words in the table.
    #[must_use]
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Build the combined word-boundary pattern.
    ///
    /// Returns `None` (and logs) if the table is empty or the pattern fails
    /// to compile.
    #[must_use]
    pub fn compile(&self) -> Option<Regex> {
        if self.words.is_empty() {
            return None;
        }
        // Longest first so alternation prefers `elif` over `el...` style prefixes.
        let mut words: Vec<&str> = self.words.iter().map(String::as_str).collect();
        words.sort_by_key(|w| std::cmp::Reverse(w.len()));
        let alternation = words
            .iter()
            .map(|w| regex::escape(w))
            .collect::<Vec<_>>()
            .join("|");
        compile("keyword", &format!(r"\b(?:{alternation})\b"))
    }
}

/// Plain-mode tokenizer.
#[derive(Debug, Clone)]
pub struct SyntaxTokenizer {
    keywords: Option<Regex>,
}

impl Default for SyntaxTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntaxTokenizer {
    /// Tokenizer using the default keyword table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            keywords: DEFAULT_KEYWORD_RE.clone(),
        }
    }

    /// Tokenizer using a custom keyword table.
    #[must_use]
    pub fn with_keywords(table: &KeywordTable) -> Self {
        Self {
            keywords: table.compile(),
        }
    }

    /// Produce spans for all four passes, in application order.
    #[must_use]
    pub fn tokenize(&self, text: &str, theme: &Theme) -> Vec<StyledSpan> {
        let mut spans = Vec::new();

        for quote in STRING_QUOTES {
            spans.extend(
                string_runs(text, quote)
                    .into_iter()
                    .map(|r| StyledSpan::fg(r, theme.string, SpanOwner::Syntax)),
            );
        }

        for marker in COMMENT_MARKERS {
            spans.extend(
                comment_runs(text, marker)
                    .into_iter()
                    .map(|r| StyledSpan::fg(r, theme.comment, SpanOwner::Syntax)),
            );
        }

        if let Some(re) = &self.keywords {
            push_matches(&mut spans, re, text, theme.keyword);
        }

        if let Some(re) = NUMBER_RE.as_ref() {
            push_matches(&mut spans, re, text, theme.number);
        }

        spans
    }
}

fn push_matches(spans: &mut Vec<StyledSpan>, re: &Regex, text: &str, color: Rgb) {
    spans.extend(
        re.find_iter(text)
            .map(|m| StyledSpan::fg(m.range(), color, SpanOwner::Syntax)),
    );
}

/// Byte ranges of `quote`-delimited runs, quotes included.
///
/// A backslash escapes the following byte. Unterminated runs extend to the end
/// of the text.
fn string_runs(text: &str, quote: u8) -> Vec<std::ops::Range<usize>> {
    let bytes = text.as_bytes();
    let mut runs = Vec::new();
    let mut open: Option<usize> = None;
    let mut escaping = false;

    for (i, &b) in bytes.iter().enumerate() {
        match open {
            None => {
                if b == quote {
                    open = Some(i);
                }
            }
            Some(start) => {
                if escaping {
                    escaping = false;
                } else if b == b'\\' {
                    escaping = true;
                } else if b == quote {
                    runs.push(start..i + 1);
                    open = None;
                }
            }
        }
    }

    if let Some(start) = open {
        runs.push(start..bytes.len());
    }
    runs
}

/// Byte ranges from each occurrence of `marker` to the end of its line.
fn comment_runs(text: &str, marker: &str) -> Vec<std::ops::Range<usize>> {
    let mut runs = Vec::new();
    let mut from = 0;
    while let Some(found) = text[from..].find(marker) {
        let start = from + found;
        let end = text[start..]
            .find('\n')
            .map_or(text.len(), |nl| start + nl);
        runs.push(start..end);
        // Later markers on the same line are already covered.
        from = end;
        if from >= text.len() {
            break;
        }
    }
    runs
}
