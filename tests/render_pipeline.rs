//! Integration tests for the render pipeline.
//!
//! These tests drive the public API end to end: document in, render result
//! out, then through the scheduler, cache and terminal adapter.

use std::sync::Arc;
use std::time::Duration;

use rstest::rstest;

use snatch_view::cache::RenderCache;
use snatch_view::config::CacheConfig;
use snatch_view::render::{
    DiffLineKind, GutterMetrics, GutterPadding, LineNumbers, MonospaceMetrics, SpanOwner,
    SyntaxTokenizer,
};
use snatch_view::scheduler::{RenderScheduler, RenderedView};
use snatch_view::theme::Theme;
use snatch_view::{render, Document, Renderer};

const EXAMPLE_DIFF: &str = "diff --git a/f.txt b/f.txt
index 111..222 100644
--- a/f.txt
+++ b/f.txt
@@ -1,2 +1,3 @@
 unchanged line
-removed line
+added line one
+added line two";

fn numbers(left: Option<usize>, right: Option<usize>) -> LineNumbers {
    LineNumbers { left, right }
}

mod diff_mode {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_example_scenario() {
        let result = render(&Document::new(EXAMPLE_DIFF).with_diff_mode(true));

        assert_eq!(
            result.line_kinds,
            vec![
                DiffLineKind::FileMeta,
                DiffLineKind::FileMeta,
                DiffLineKind::FileMeta,
                DiffLineKind::FileMeta,
                DiffLineKind::Header,
                DiffLineKind::Context,
                DiffLineKind::Removed,
                DiffLineKind::Added,
                DiffLineKind::Added,
            ]
        );
        assert_eq!(
            result.per_line_numbers[4..],
            [
                numbers(None, None),
                numbers(Some(1), Some(1)),
                numbers(Some(2), None),
                numbers(None, Some(2)),
                numbers(None, Some(3)),
            ]
        );
        assert!(result.per_line_numbers[..4]
            .iter()
            .all(|n| *n == LineNumbers::default()));
    }

    #[test]
    fn test_header_resets_counters() {
        let text = "@@ -10,5 +20,7 @@\n context\n+added\n@@ -50 +60 @@\n+again";
        let result = render(&Document::new(text).with_diff_mode(true));

        assert_eq!(result.per_line_numbers[1], numbers(Some(10), Some(20)));
        assert_eq!(result.per_line_numbers[2], numbers(None, Some(21)));
        assert_eq!(result.per_line_numbers[4], numbers(None, Some(60)));
    }

    #[test]
    fn test_search_overlays_diff_background() {
        let result = render(
            &Document::new(EXAMPLE_DIFF)
                .with_diff_mode(true)
                .with_search("ADDED"),
        );
        assert_eq!(result.search_matches, 2);

        let styled = result.styled_text();
        let last = styled.spans().last().unwrap();
        assert_eq!(last.owner, SpanOwner::Search);
        assert_eq!(last.bg, Some(Theme::dark().search_bg));
    }
}

mod plain_mode {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_line_index_in_result() {
        let result = render(&Document::new("a\nbb\n\nccc"));
        assert_eq!(result.line_break_offsets, vec![1, 4, 5]);
        assert_eq!(result.logical_line_count, 4);
        assert!(result.per_line_numbers.is_empty());
        assert!(result.line_kinds.is_empty());
    }

    #[test]
    fn test_syntax_tokenizer_is_idempotent() {
        let text = "fn main() { let s = \"a // b\"; return 0x1F + 2.5; } # done";
        let tokenizer = SyntaxTokenizer::new();
        let theme = Theme::dark();
        assert_eq!(tokenizer.tokenize(text, &theme), tokenizer.tokenize(text, &theme));
    }

    #[rstest]
    #[case("error")]
    #[case("ERROR")]
    #[case("  ErRoR  ")]
    fn test_search_is_case_insensitive(#[case] query: &str) {
        let text = "Error one\nerror two\nno match\nERROR three";
        let result = render(&Document::new(text).with_search(query));
        assert_eq!(result.search_matches, 3);
    }

    #[test]
    fn test_blank_query_highlights_nothing() {
        let result = render(&Document::new("some text").with_search(" \t "));
        assert_eq!(result.search_matches, 0);
        assert!(result
            .styled_spans
            .iter()
            .all(|s| s.owner != SpanOwner::Search));
    }

    #[test]
    fn test_highlight_isolation() {
        let renderer = Renderer::default();
        let text = "let name = \"value\"; // trailing 42";
        let mut result = renderer.render(&Document::new(text));
        let before = result.styled_spans.clone();

        renderer.rehighlight(&mut result, text, "a");
        assert!(result.search_matches > 0);
        renderer.rehighlight(&mut result, text, "");

        assert_eq!(result.styled_spans, before);
        assert_eq!(result.search_matches, 0);
    }
}

mod gutter {
    use super::*;
    use pretty_assertions::assert_eq;

    fn width(max_number: usize) -> f32 {
        GutterMetrics::compute(
            max_number,
            12.0,
            &MonospaceMetrics::default(),
            &GutterPadding::default(),
        )
        .width
    }

    #[rstest]
    #[case(9, 10)]
    #[case(99, 100)]
    #[case(999, 1000)]
    #[case(9999, 10000)]
    fn test_width_grows_at_power_of_ten(#[case] below: usize, #[case] at: usize) {
        assert!(width(at) > width(below));
    }

    #[test]
    fn test_plain_gutter_tracks_line_count() {
        let nine = "x\n".repeat(8) + "x";
        let ten = "x\n".repeat(9) + "x";
        let a = render(&Document::new(nine));
        let b = render(&Document::new(ten));
        assert_eq!(a.gutter.digits, 1);
        assert_eq!(b.gutter.digits, 2);
        assert!(b.gutter_width > a.gutter_width);
    }

    #[test]
    fn test_font_size_changes_width() {
        let text = "x\n".repeat(200);
        let small = render(&Document::new(text.as_str()).with_font_size(8.0));
        let large = render(&Document::new(text.as_str()).with_font_size(40.0));
        assert!(large.gutter_width > small.gutter_width);
    }
}

mod background {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_latest_generation_wins() {
        let scheduler = RenderScheduler::new(Renderer::default(), RenderCache::disabled());
        let mut view = RenderedView::new();

        for i in 0..5 {
            scheduler.submit(Document::new(format!("revision {i}")));
        }
        let last = scheduler.submit(Document::new("final revision"));

        let outcome = scheduler
            .wait_next(Duration::from_secs(10))
            .expect("render should finish");
        assert!(view.apply(outcome, scheduler.latest_generation()));
        assert_eq!(view.applied_generation(), last);
        assert_eq!(view.document().map(|d| &*d.text), Some("final revision"));
    }

    #[test]
    fn test_cache_short_circuits_identical_documents() {
        let cache = RenderCache::new(&CacheConfig::default());
        let doc = Document::new("cached text").with_search("text");
        let renderer = Renderer::default();

        let (first, hit) = cache.get_or_render(&doc, |d| renderer.render(d));
        assert!(!hit);
        let (second, hit) = cache.get_or_render(&doc, |_| panic!("should not re-render"));
        assert!(hit);
        assert!(Arc::ptr_eq(&first, &second));

        let (_, hit) = cache.get_or_render(&doc.clone().with_wrap(true), |d| renderer.render(d));
        assert!(!hit);
    }
}
