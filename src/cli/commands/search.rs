//! Search command implementation.
//!
//! Lists case-insensitive matches in one file as `line:col: text`.

use serde::Serialize;

use crate::cli::{Cli, OutputFormat, SearchArgs};
use crate::error::{Result, ViewError};
use crate::render::{LineIndex, SearchHighlighter};
use crate::util::read_input;

/// A single match with its location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    /// 1-based logical line.
    pub line: usize,
    /// 1-based character column.
    pub column: usize,
    /// Byte offset of the match start.
    pub start: usize,
    /// Byte offset one past the match end.
    pub end: usize,
    /// The matched text as it appears in the input.
    pub matched: String,
    /// The full line containing the match.
    pub text: String,
}

/// Run the search command.
pub fn run(cli: &Cli, args: &SearchArgs) -> Result<()> {
    if args.query.trim().is_empty() {
        return Err(ViewError::invalid_argument("query", "must not be blank"));
    }

    let text = read_input(&args.input)?;
    let mut hits = find_hits(&text, &args.query);
    if let Some(limit) = args.limit {
        hits.truncate(limit);
    }

    match (cli.effective_output(), args.count) {
        (OutputFormat::Json, true) => {
            println!("{}", serde_json::json!({ "count": hits.len() }));
        }
        (OutputFormat::Json, false) => {
            println!("{}", serde_json::to_string_pretty(&hits)?);
        }
        (OutputFormat::Text, true) => println!("{}", hits.len()),
        (OutputFormat::Text, false) => {
            for hit in &hits {
                println!("{}:{}: {}", hit.line, hit.column, hit.text);
            }
        }
    }

    Ok(())
}

/// Locate every match of `query` in `text`.
#[must_use]
pub fn find_hits(text: &str, query: &str) -> Vec<SearchHit> {
    let index = LineIndex::build(text);
    SearchHighlighter::new()
        .matches(text, query)
        .into_iter()
        .filter_map(|range| {
            let line = index.line_number_for(range.start);
            let line_range = index.line_range(line, text.len())?;
            Some(SearchHit {
                line,
                column: text[line_range.start..range.start].chars().count() + 1,
                start: range.start,
                end: range.end,
                matched: text[range].to_string(),
                text: text[line_range].trim_end_matches('\r').to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_hits_report_line_and_column() {
        let text = "first line\nSecond ERROR here\nerror again";
        let hits = find_hits(text, "error");
        assert_eq!(hits.len(), 2);
        assert_eq!((hits[0].line, hits[0].column), (2, 8));
        assert_eq!(hits[0].matched, "ERROR");
        assert_eq!(hits[0].text, "Second ERROR here");
        assert_eq!((hits[1].line, hits[1].column), (3, 1));
    }

    #[test]
    fn test_column_counts_chars() {
        let hits = find_hits("héllo wörld", "wör");
        assert_eq!(hits[0].column, 7);
        assert_eq!(hits[0].start, 7);
    }

    #[test]
    fn test_blank_query_has_no_hits() {
        assert!(find_hits("anything", "   ").is_empty());
    }
}
