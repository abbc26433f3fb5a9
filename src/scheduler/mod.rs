//! Background rendering with generation gating.
//!
//! The interactive thread only captures inputs: [`RenderScheduler::submit`]
//! tags each [`Document`] with a fresh generation and hands it to the rayon
//! pool. Passes are never cancelled. Instead every finished pass comes back
//! over a channel and is applied only if its generation is still the latest
//! one issued, so a slow pass for old text can never overwrite a newer result.
//!
//! [`RenderedView`] is the interactive-thread side: the only owner of the
//! displayed result and the selection.

use std::ops::Range;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, error};

use crate::cache::RenderCache;
use crate::render::{Document, RenderResult, Renderer, StyledText};
use crate::util::clamp_range;

/// Monotonic render request number. Zero means "nothing issued yet".
pub type Generation = u64;

/// A finished background pass.
#[derive(Debug, Clone)]
pub struct RenderOutcome {
    /// Generation assigned at submission.
    pub generation: Generation,
    /// The rendered input.
    pub document: Document,
    /// The render output.
    pub result: Arc<RenderResult>,
    /// Wall time spent in the worker.
    pub elapsed: Duration,
    /// Whether the result came from the cache.
    pub cached: bool,
}

/// Dispatches render passes to the rayon pool.
pub struct RenderScheduler {
    renderer: Arc<Renderer>,
    cache: Arc<RenderCache>,
    latest: Arc<AtomicU64>,
    tx: mpsc::Sender<RenderOutcome>,
    rx: mpsc::Receiver<RenderOutcome>,
}

impl RenderScheduler {
    /// Create a scheduler.
    pub fn new(renderer: Renderer, cache: RenderCache) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            renderer: Arc::new(renderer),
            cache: Arc::new(cache),
            latest: Arc::new(AtomicU64::new(0)),
            tx,
            rx,
        }
    }

    /// Shared renderer.
    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Shared cache.
    pub fn cache(&self) -> &RenderCache {
        &self.cache
    }

    /// Most recently issued generation.
    pub fn latest_generation(&self) -> Generation {
        self.latest.load(Ordering::Acquire)
    }

    /// Whether `generation` is still the latest.
    pub fn is_current(&self, generation: Generation) -> bool {
        generation == self.latest_generation()
    }

    /// Queue a render of `doc` and return its generation.
    pub fn submit(&self, doc: Document) -> Generation {
        let generation = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        let renderer = Arc::clone(&self.renderer);
        let cache = Arc::clone(&self.cache);
        let tx = self.tx.clone();

        debug!(generation, bytes = doc.text.len(), "render submitted");

        rayon::spawn(move || {
            let started = Instant::now();
            let rendered = catch_unwind(AssertUnwindSafe(|| {
                cache.get_or_render(&doc, |d| renderer.render(d))
            }));

            match rendered {
                Ok((result, cached)) => {
                    let outcome = RenderOutcome {
                        generation,
                        document: doc,
                        result,
                        elapsed: started.elapsed(),
                        cached,
                    };
                    // Receiver gone means the view was torn down.
                    let _ = tx.send(outcome);
                }
                Err(_) => error!(generation, "render pass panicked"),
            }
        });

        generation
    }

    /// Drain finished passes without blocking, returning the current one if
    /// it has arrived. Stale passes are dropped.
    pub fn try_next(&self) -> Option<RenderOutcome> {
        let mut current = None;
        while let Ok(outcome) = self.rx.try_recv() {
            if self.is_current(outcome.generation) {
                current = Some(outcome);
            } else {
                debug!(
                    generation = outcome.generation,
                    latest = self.latest_generation(),
                    "discarding stale render"
                );
            }
        }
        current
    }

    /// Block up to `timeout` for the current pass.
    pub fn wait_next(&self, timeout: Duration) -> Option<RenderOutcome> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(outcome) if self.is_current(outcome.generation) => return Some(outcome),
                Ok(outcome) => {
                    debug!(generation = outcome.generation, "discarding stale render");
                }
                Err(_) => return None,
            }
        }
    }
}

impl std::fmt::Debug for RenderScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderScheduler")
            .field("latest", &self.latest_generation())
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

/// Displayed render state, owned by the interactive thread.
#[derive(Debug, Default)]
pub struct RenderedView {
    document: Option<Document>,
    result: Option<Arc<RenderResult>>,
    selection: Range<usize>,
    applied: Generation,
}

impl RenderedView {
    /// Empty view.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `outcome` if it is the latest generation.
    ///
    /// The selection is kept and clamped onto the new text. Returns whether
    /// the outcome was applied.
    pub fn apply(&mut self, outcome: RenderOutcome, latest: Generation) -> bool {
        if outcome.generation != latest || outcome.generation <= self.applied {
            debug!(
                generation = outcome.generation,
                latest,
                applied = self.applied,
                "render outcome rejected"
            );
            return false;
        }

        self.selection = clamp_range(&outcome.document.text, self.selection.clone());
        self.applied = outcome.generation;
        self.result = Some(outcome.result);
        self.document = Some(outcome.document);
        true
    }

    /// Re-run only the search highlighter for a new query.
    ///
    /// Returns the number of matches.
    pub fn set_query(&mut self, renderer: &Renderer, query: &str) -> usize {
        let (Some(doc), Some(result)) = (self.document.as_mut(), self.result.as_mut()) else {
            return 0;
        };
        doc.search_query = query.to_string();
        let result = Arc::make_mut(result);
        renderer.rehighlight(result, &doc.text, query);
        result.search_matches
    }

    /// Set the selection, clamped onto the current text.
    pub fn select(&mut self, range: Range<usize>) {
        self.selection = match &self.document {
            Some(doc) => clamp_range(&doc.text, range),
            None => 0..0,
        };
    }

    /// Current selection.
    pub fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    /// Generation of the displayed result.
    pub fn applied_generation(&self) -> Generation {
        self.applied
    }

    /// Displayed document.
    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// Displayed result.
    pub fn result(&self) -> Option<&RenderResult> {
        self.result.as_deref()
    }

    /// Displayed spans.
    pub fn styled_text(&self) -> StyledText {
        self.result
            .as_deref()
            .map(RenderResult::styled_text)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{render, SpanOwner};

    fn scheduler() -> RenderScheduler {
        RenderScheduler::new(Renderer::default(), RenderCache::disabled())
    }

    fn outcome(generation: Generation, text: &str) -> RenderOutcome {
        let document = Document::new(text);
        RenderOutcome {
            generation,
            result: Arc::new(render(&document)),
            document,
            elapsed: Duration::ZERO,
            cached: false,
        }
    }

    #[test]
    fn test_generations_increase() {
        let scheduler = scheduler();
        assert_eq!(scheduler.latest_generation(), 0);
        let a = scheduler.submit(Document::new("a"));
        let b = scheduler.submit(Document::new("b"));
        assert!(b > a);
        assert!(scheduler.is_current(b));
        assert!(!scheduler.is_current(a));
    }

    #[test]
    fn test_only_latest_generation_is_delivered() {
        let scheduler = scheduler();
        scheduler.submit(Document::new("first"));
        scheduler.submit(Document::new("second"));
        let last = scheduler.submit(Document::new("third"));

        let outcome = scheduler
            .wait_next(Duration::from_secs(10))
            .expect("latest render should arrive");
        assert_eq!(outcome.generation, last);
        assert_eq!(&*outcome.document.text, "third");
    }

    #[test]
    fn test_view_rejects_stale_outcome() {
        let mut view = RenderedView::new();
        assert!(!view.apply(outcome(1, "old"), 2));
        assert!(view.result().is_none());

        assert!(view.apply(outcome(2, "new"), 2));
        assert_eq!(view.applied_generation(), 2);

        // Late arrival of an older pass must not win.
        assert!(!view.apply(outcome(1, "old"), 1));
        assert_eq!(view.document().map(|d| &*d.text), Some("new"));
    }

    #[test]
    fn test_selection_is_clamped_on_apply() {
        let mut view = RenderedView::new();
        view.apply(outcome(1, "hello world"), 1);
        view.select(6..11);
        assert_eq!(view.selection(), 6..11);

        view.apply(outcome(2, "hey"), 2);
        assert_eq!(view.selection(), 3..3);
    }

    #[test]
    fn test_set_query_only_touches_search_spans() {
        let renderer = Renderer::default();
        let mut view = RenderedView::new();
        view.apply(outcome(1, "let foo = \"foo\";"), 1);
        let before = view.styled_text();

        assert_eq!(view.set_query(&renderer, "FOO"), 2);
        assert_eq!(view.styled_text().spans_of(SpanOwner::Search).count(), 2);

        assert_eq!(view.set_query(&renderer, ""), 0);
        assert_eq!(view.styled_text(), before);
    }

    #[test]
    fn test_set_query_on_empty_view() {
        let mut view = RenderedView::new();
        assert_eq!(view.set_query(&Renderer::default(), "x"), 0);
        view.select(0..5);
        assert_eq!(view.selection(), 0..0);
    }
}
