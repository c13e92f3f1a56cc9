//! Math annotation: find marked nodes, typeset them in place.
//!
//! # Flow
//!
//! ```text
//! ReadySignal ──fires──▶ MathAnnotator::on_ready
//!                              │
//!              renderer? ──no──┴──▶ Outcome::Skipped   (page has no math library)
//!                 │ yes
//!                 ▼
//!           annotate(host)  ── for each `.arithmatex` in document order:
//!                                 \( tex \)  → render(tex, node, inline)
//!                                 \[ tex \]  → render(tex, node, block)
//!                                 otherwise  → leave untouched
//! ```
//!
//! The renderer is injected at construction. `None` means math rendering is
//! not needed on this page; it is never an error.

use std::ops::{Add, AddAssign};

use crate::error::{MathError, MathResult};
use crate::math::{node_text, DisplayMode, MathExpr, MathRenderer, RenderOptions};
use crate::node::{Document, Element};
use crate::transform::Transform;

/// Class marking math containers in generated pages.
pub const DEFAULT_MARKER_CLASS: &str = "arithmatex";

// =============================================================================
// AnnotateConfig
// =============================================================================

/// Configuration for math annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotateConfig {
    marker_class: String,
}

impl AnnotateConfig {
    /// Default config (`arithmatex` marker).
    pub fn new() -> Self {
        Self {
            marker_class: DEFAULT_MARKER_CLASS.to_string(),
        }
    }

    /// Use a different marker class.
    ///
    /// The class must be a single token: non-empty, no whitespace.
    pub fn with_marker_class(mut self, class: impl Into<String>) -> MathResult<Self> {
        let class = class.into();
        if class.is_empty() || class.chars().any(char::is_whitespace) {
            return Err(MathError::InvalidMarkerClass(class));
        }
        self.marker_class = class;
        Ok(self)
    }

    /// Marker class in use.
    pub fn marker_class(&self) -> &str {
        &self.marker_class
    }
}

impl Default for AnnotateConfig {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// MathHost
// =============================================================================

/// Host-environment adapter: the document the annotator scans.
///
/// `for_each_marked` must visit, in document order, exactly the elements
/// carrying `class` when the call starts. Marked elements created by `f`
/// are not visited.
pub trait MathHost {
    /// Visit marked elements (mutable, document order).
    fn for_each_marked(&mut self, class: &str, f: &mut dyn FnMut(&mut Element));
}

impl MathHost for Document {
    fn for_each_marked(&mut self, class: &str, f: &mut dyn FnMut(&mut Element)) {
        self.for_each_class_mut(class, |elem| f(elem));
    }
}

impl<H: MathHost + ?Sized> MathHost for &mut H {
    fn for_each_marked(&mut self, class: &str, f: &mut dyn FnMut(&mut Element)) {
        (**self).for_each_marked(class, f)
    }
}

// =============================================================================
// Stats / Outcome / State
// =============================================================================

/// Counters from one annotation pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AnnotateStats {
    /// Marked elements visited
    pub scanned: usize,
    /// Render calls in inline mode
    pub rendered_inline: usize,
    /// Render calls in block mode
    pub rendered_block: usize,
    /// Marked elements without recognized delimiters
    pub skipped: usize,
}

impl AnnotateStats {
    /// Total render calls.
    pub fn rendered(&self) -> usize {
        self.rendered_inline + self.rendered_block
    }

    fn record(&mut self, mode: DisplayMode) {
        match mode {
            DisplayMode::Inline => self.rendered_inline += 1,
            DisplayMode::Block => self.rendered_block += 1,
        }
    }
}

impl Add for AnnotateStats {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl AddAssign for AnnotateStats {
    fn add_assign(&mut self, rhs: Self) {
        self.scanned += rhs.scanned;
        self.rendered_inline += rhs.rendered_inline;
        self.rendered_block += rhs.rendered_block;
        self.skipped += rhs.skipped;
    }
}

/// What happened when the ready signal was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The page was scanned and matching nodes were rendered
    Annotated(AnnotateStats),
    /// No renderer is available; the page was not touched
    Skipped,
    /// The ready signal was already handled earlier
    AlreadyDone,
}

impl Outcome {
    /// Stats of the pass, if one ran.
    pub fn stats(&self) -> Option<AnnotateStats> {
        match self {
            Outcome::Annotated(stats) => Some(*stats),
            _ => None,
        }
    }
}

/// Annotator lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnnotatorState {
    /// Waiting for the ready signal
    #[default]
    AwaitingReady,
    /// Ready signal handled (terminal)
    Done,
}

// =============================================================================
// NoRenderer
// =============================================================================

/// Renderer type for annotators built without one. It has no values.
#[derive(Debug, Clone, Copy)]
pub enum NoRenderer {}

impl MathRenderer for NoRenderer {
    fn render(&self, _tex: &str, _target: &mut Element, _opts: &RenderOptions) {
        match *self {}
    }
}

// =============================================================================
// MathAnnotator
// =============================================================================

/// Scans a page for math nodes and hands them to a renderer.
#[derive(Debug)]
pub struct MathAnnotator<R> {
    renderer: Option<R>,
    config: AnnotateConfig,
    state: AnnotatorState,
}

impl<R: MathRenderer> MathAnnotator<R> {
    /// Create an annotator; `None` means no math library on this page.
    pub fn new(renderer: Option<R>) -> Self {
        Self::with_config(renderer, AnnotateConfig::default())
    }

    /// Create an annotator with an explicit config.
    pub fn with_config(renderer: Option<R>, config: AnnotateConfig) -> Self {
        Self {
            renderer,
            config,
            state: AnnotatorState::AwaitingReady,
        }
    }

    /// Create an annotator with a renderer.
    pub fn with_renderer(renderer: R) -> Self {
        Self::new(Some(renderer))
    }

    /// Whether a renderer was injected.
    pub fn has_renderer(&self) -> bool {
        self.renderer.is_some()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> AnnotatorState {
        self.state
    }

    /// Config in use.
    pub fn config(&self) -> &AnnotateConfig {
        &self.config
    }

    /// Typeset every marked node of `host`.
    ///
    /// Nodes are handled in document order. Text without recognized
    /// delimiters is left as-is. Without a renderer the host is not touched.
    pub fn annotate<H: MathHost + ?Sized>(&self, host: &mut H) -> AnnotateStats {
        let mut stats = AnnotateStats::default();
        let Some(renderer) = self.renderer.as_ref() else {
            return stats;
        };

        host.for_each_marked(self.config.marker_class(), &mut |elem: &mut Element| {
            stats.scanned += 1;
            let text = node_text(elem);
            match MathExpr::parse(&text) {
                Some(expr) => {
                    log::trace!("rendering {} math in <{}>: {:?}", expr.mode, elem.tag, expr.tex);
                    renderer.render(expr.tex, elem, &expr.options());
                    stats.record(expr.mode);
                }
                None => {
                    log::trace!("skipping undelimited math node <{}>: {:?}", elem.tag, text);
                    stats.skipped += 1;
                }
            }
        });

        log::debug!(
            "annotated {} math node(s): {} inline, {} block, {} skipped",
            stats.scanned,
            stats.rendered_inline,
            stats.rendered_block,
            stats.skipped
        );
        stats
    }

    /// Ready-signal callback.
    ///
    /// Runs [`annotate`](Self::annotate) at most once over the annotator's
    /// lifetime, and only when a renderer is present.
    pub fn on_ready<H: MathHost + ?Sized>(&mut self, host: &mut H) -> Outcome {
        if self.state == AnnotatorState::Done {
            return Outcome::AlreadyDone;
        }
        self.state = AnnotatorState::Done;

        if !self.has_renderer() {
            log::debug!("no math renderer available, skipping annotation");
            return Outcome::Skipped;
        }
        Outcome::Annotated(self.annotate(host))
    }

    /// Wait for the page to be ready, then handle it.
    #[cfg(feature = "async")]
    pub async fn run<H: MathHost + ?Sized>(
        &mut self,
        ready: crate::ready::ReadySignal,
        host: &mut H,
    ) -> Outcome {
        ready.await;
        log::debug!("page ready, starting math annotation");
        self.on_ready(host)
    }

    /// Annotate many pages (e.g. every page of a generated site).
    ///
    /// Each page is annotated on its own, in document order. Does not touch
    /// the annotator's lifecycle state.
    #[cfg(not(feature = "parallel"))]
    pub fn annotate_batch(&self, docs: &mut [Document]) -> AnnotateStats {
        docs.iter_mut()
            .map(|doc| self.annotate(doc))
            .fold(AnnotateStats::default(), Add::add)
    }

    /// Annotate many pages in parallel (e.g. every page of a generated site).
    ///
    /// Each page is annotated on its own, in document order. Does not touch
    /// the annotator's lifecycle state.
    #[cfg(feature = "parallel")]
    pub fn annotate_batch(&self, docs: &mut [Document]) -> AnnotateStats
    where
        R: Sync,
    {
        use rayon::prelude::*;

        docs.par_iter_mut()
            .map(|doc| self.annotate(doc))
            .reduce(AnnotateStats::default, Add::add)
    }
}

impl MathAnnotator<NoRenderer> {
    /// Annotator for pages that load no math library.
    pub fn disabled() -> Self {
        Self::new(None)
    }
}

impl<R: MathRenderer> Transform for MathAnnotator<R> {
    /// Treats the document as ready and handles it immediately.
    fn transform(mut self, mut doc: Document) -> Document {
        self.on_ready(&mut doc);
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::render_fn;
    use std::cell::RefCell;

    /// Records calls and replaces the node with a marker.
    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<(String, bool)>>,
    }

    impl MathRenderer for Recorder {
        fn render(&self, tex: &str, target: &mut Element, opts: &RenderOptions) {
            self.calls.borrow_mut().push((tex.to_string(), opts.display_mode));
            target.set_raw_html(format!("<span class=\"katex\">{tex}</span>"));
        }
    }

    fn math(tag: &str, text: &str) -> Element {
        Element::new(tag).with_class(DEFAULT_MARKER_CLASS).text(text)
    }

    fn page() -> Document {
        Document::new(
            Element::new("body")
                .child(Element::new("p").text("Area ").child(math("span", r"\(\pi r^2\)")))
                .child(math("div", r"\[E = mc^2\]"))
                .child(math("span", "not math"))
                .child(Element::new("span").text(r"\(unmarked\)")),
        )
    }

    #[test]
    fn test_annotate_dispatches_by_delimiter() {
        let recorder = Recorder::default();
        let annotator = MathAnnotator::with_renderer(&recorder);
        let mut doc = page();

        let stats = annotator.annotate(&mut doc);

        assert_eq!(
            *recorder.calls.borrow(),
            vec![(r"\pi r^2".to_string(), false), ("E = mc^2".to_string(), true)]
        );
        assert_eq!(
            stats,
            AnnotateStats {
                scanned: 3,
                rendered_inline: 1,
                rendered_block: 1,
                skipped: 1,
            }
        );
        assert_eq!(stats.rendered(), 2);

        // Skipped node left as literal text
        let skipped = doc.find(|e| e.text_content() == "not math").unwrap();
        assert!(skipped.has_class(DEFAULT_MARKER_CLASS));
    }

    #[test]
    fn test_annotate_twice_does_not_rerender() {
        let recorder = Recorder::default();
        let annotator = MathAnnotator::with_renderer(&recorder);
        let mut doc = page();

        annotator.annotate(&mut doc);
        let second = annotator.annotate(&mut doc);

        assert_eq!(recorder.calls.borrow().len(), 2);
        assert_eq!(second.rendered(), 0);
        assert_eq!(second.skipped, 3);
    }

    #[test]
    fn test_on_ready_runs_once() {
        let recorder = Recorder::default();
        let mut annotator = MathAnnotator::with_renderer(&recorder);
        let mut doc = page();

        assert_eq!(annotator.state(), AnnotatorState::AwaitingReady);
        let outcome = annotator.on_ready(&mut doc);
        assert_eq!(outcome.stats().map(|s| s.rendered()), Some(2));
        assert_eq!(annotator.state(), AnnotatorState::Done);

        assert_eq!(annotator.on_ready(&mut doc), Outcome::AlreadyDone);
        assert_eq!(recorder.calls.borrow().len(), 2);
    }

    #[test]
    fn test_on_ready_without_renderer_skips() {
        let mut annotator = MathAnnotator::disabled();
        let mut doc = page();
        let before = doc.clone();

        assert_eq!(annotator.on_ready(&mut doc), Outcome::Skipped);
        assert_eq!(doc, before);
        assert_eq!(annotator.state(), AnnotatorState::Done);
        assert!(Outcome::Skipped.stats().is_none());
    }

    #[test]
    fn test_custom_marker_class() {
        let recorder = Recorder::default();
        let config = AnnotateConfig::new().with_marker_class("math").unwrap();
        let annotator = MathAnnotator::with_config(Some(&recorder), config);

        let mut doc = Document::new(
            Element::new("div")
                .child(Element::new("span").with_class("math").text(r"\(a\)"))
                .child(math("span", r"\(b\)")),
        );
        annotator.annotate(&mut doc);
        assert_eq!(*recorder.calls.borrow(), vec![("a".to_string(), false)]);
    }

    #[test]
    fn test_invalid_marker_class() {
        assert!(matches!(
            AnnotateConfig::new().with_marker_class(""),
            Err(MathError::InvalidMarkerClass(_))
        ));
        assert!(matches!(
            AnnotateConfig::new().with_marker_class("two words"),
            Err(MathError::InvalidMarkerClass(_))
        ));
        assert_eq!(AnnotateConfig::default().marker_class(), "arithmatex");
    }

    #[test]
    fn test_nested_marked_nodes_follow_document_order() {
        let order = RefCell::new(Vec::new());
        let renderer = render_fn(|tex: &str, _elem: &mut Element, _opts: &RenderOptions| {
            order.borrow_mut().push(tex.to_string());
        });
        let annotator = MathAnnotator::with_renderer(renderer);

        // Outer container is skipped (its text is not delimited), inner ones render
        let mut doc = Document::new(
            Element::new("section")
                .with_class(DEFAULT_MARKER_CLASS)
                .text("Derivation: ")
                .child(math("span", r"\(1\)"))
                .child(Element::new("p").child(math("span", r"\[2\]")))
                .child(math("span", r"\(3\)")),
        );
        let stats = annotator.annotate(&mut doc);

        assert_eq!(*order.borrow(), vec!["1", "2", "3"]);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.scanned, 4);
    }

    #[test]
    fn test_rendered_output_is_not_rescanned() {
        let calls = RefCell::new(0);
        let renderer = render_fn(|tex: &str, elem: &mut Element, _opts: &RenderOptions| {
            *calls.borrow_mut() += 1;
            elem.replace_children([math("span", &format!(r"\({tex}\)")).into()]);
        });
        let annotator = MathAnnotator::with_renderer(renderer);
        let mut doc = Document::new(Element::new("body").child(math("span", r"\(x\)")));

        let stats = annotator.annotate(&mut doc);

        assert_eq!(*calls.borrow(), 1);
        assert_eq!(stats.scanned, 1);
        assert_eq!(doc.find_by_class(DEFAULT_MARKER_CLASS).len(), 2);
    }

    #[test]
    fn test_nested_math_inside_rendered_node_is_still_rendered() {
        let recorder = Recorder::default();
        let annotator = MathAnnotator::with_renderer(&recorder);
        let mut doc = Document::new(
            Element::new("body").child(
                Element::new("span")
                    .with_class(DEFAULT_MARKER_CLASS)
                    .text(r"\(a ")
                    .child(math("span", r"\(b\)"))
                    .text(r"\)"),
            ),
        );

        let stats = annotator.annotate(&mut doc);

        assert_eq!(
            *recorder.calls.borrow(),
            vec![(r"a \(b\)".to_string(), false), ("b".to_string(), false)]
        );
        assert_eq!(stats.rendered_inline, 2);
        assert_eq!(doc.find_by_class(DEFAULT_MARKER_CLASS).len(), 1);
    }

    #[test]
    fn test_transform_annotates_immediately() {
        let recorder = Recorder::default();
        let doc = MathAnnotator::with_renderer(&recorder).transform(page());
        assert_eq!(recorder.calls.borrow().len(), 2);
        assert_eq!(doc.find_by_class(DEFAULT_MARKER_CLASS).len(), 3);
    }

    #[test]
    fn test_annotate_batch_sums_pages() {
        let annotator = MathAnnotator::with_renderer(render_fn(
            |tex: &str, elem: &mut Element, _opts: &RenderOptions| elem.set_raw_html(tex),
        ));
        let mut docs = vec![page(), page(), Document::new(Element::new("body"))];

        let stats = annotator.annotate_batch(&mut docs);
        assert_eq!(stats.scanned, 6);
        assert_eq!(stats.rendered(), 4);
        assert_eq!(stats.skipped, 2);
        assert_eq!(annotator.state(), AnnotatorState::AwaitingReady);
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_run_waits_for_ready_signal() {
        use crate::ready::ReadySignal;

        let (trigger, ready) = ReadySignal::pair();
        let mut annotator = MathAnnotator::with_renderer(render_fn(
            |tex: &str, elem: &mut Element, _opts: &RenderOptions| elem.set_raw_html(tex),
        ));
        let mut doc = page();

        let fire = tokio::spawn(async move {
            tokio::task::yield_now().await;
            trigger.content_loaded();
        });

        let outcome = annotator.run(ready, &mut doc).await;
        fire.await.unwrap();

        assert_eq!(outcome.stats().map(|s| s.rendered()), Some(2));
        assert!(doc.any(|e| e.text_content() == "E = mc^2"));
    }
}
