//! Reveal collapsed thought panels before reading the page.
//!
//! Gemini renders a model's reasoning inside `<model-thoughts>` only after
//! its header button is clicked. Every collapsed panel is activated at once,
//! then the page is polled until each panel holds a `.markdown` body or the
//! deadline passes. Running out of time is not an error: panels that never
//! rendered simply contribute nothing to the export.

use std::time::Duration;

use once_cell::sync::Lazy;
use scraper::Selector;
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::node::{Document, NodeId};
use crate::options::ExtractOptions;
use crate::page::Page;

static THOUGHT_PANEL: Lazy<Selector> = Lazy::new(|| Selector::parse("model-thoughts").unwrap());
static DISCLOSURE_CONTROL: Lazy<Selector> = Lazy::new(|| Selector::parse("button").unwrap());
static EXPANDED_CONTENT: Lazy<Selector> = Lazy::new(|| Selector::parse(".markdown").unwrap());

/// Shortest delay between polls, so a zero interval cannot spin
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// A collapsed panel and the control that reveals it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Panel {
    pub control: NodeId,
    pub container: NodeId,
}

/// How an [`expand`] call ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpandOutcome {
    /// Every panel was already open, or the page has none
    NothingToExpand,
    /// All activated panels rendered content
    Expanded { panels: usize },
    /// The deadline passed with `pending` panels still empty
    TimedOut { panels: usize, pending: usize },
}

/// Whether `container` already holds rendered content
pub fn is_expanded(doc: &Document, container: NodeId) -> bool {
    doc.select_first(container, &EXPANDED_CONTENT).is_some()
}

/// Collapsed panels that have a control to open them, in document order
pub fn collapsed_panels(doc: &Document) -> Vec<Panel> {
    doc.select(doc.root(), &THOUGHT_PANEL)
        .into_iter()
        .filter(|&container| !is_expanded(doc, container))
        .filter_map(|container| {
            doc.select_first(container, &DISCLOSURE_CONTROL)
                .map(|control| Panel { control, container })
        })
        .collect()
}

/// Activate every collapsed panel, then wait until all of them show content
/// or `options.expand_timeout` elapses. Never fails and never waits past the
/// deadline.
pub async fn expand<P: Page>(page: &P, options: &ExtractOptions) -> ExpandOutcome {
    let panels = page.with_document(collapsed_panels);
    if panels.is_empty() {
        return ExpandOutcome::NothingToExpand;
    }

    for panel in &panels {
        page.activate(panel.control);
    }
    debug!(panels = panels.len(), "activated thought panels");

    let deadline = Instant::now() + options.expand_timeout;
    let interval = options.poll_interval.max(MIN_POLL_INTERVAL);

    loop {
        let pending = page.with_document(|doc| {
            panels
                .iter()
                .filter(|panel| !is_expanded(doc, panel.container))
                .count()
        });
        if pending == 0 {
            debug!(panels = panels.len(), "thought panels expanded");
            return ExpandOutcome::Expanded {
                panels: panels.len(),
            };
        }

        let now = Instant::now();
        if now >= deadline {
            debug!(pending, "continuing with thought panels still collapsed");
            return ExpandOutcome::TimedOut {
                panels: panels.len(),
                pending,
            };
        }

        sleep(interval.min(deadline - now)).await;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;

    /// A host that renders a panel's body `delay` after its control is
    /// activated, or never when `delay` is `None`.
    struct RenderingPage {
        doc: RefCell<Document>,
        delay: Option<Duration>,
        scheduled: RefCell<Vec<(Instant, NodeId)>>,
        activations: Cell<usize>,
    }

    impl RenderingPage {
        fn new(doc: Document, delay: Option<Duration>) -> Self {
            Self {
                doc: RefCell::new(doc),
                delay,
                scheduled: RefCell::new(Vec::new()),
                activations: Cell::new(0),
            }
        }

        fn render_due(&self) {
            let now = Instant::now();
            let mut scheduled = self.scheduled.borrow_mut();
            let mut doc = self.doc.borrow_mut();
            scheduled.retain(|&(ready_at, container)| {
                if ready_at > now {
                    return true;
                }
                let body = doc.append_element_with_attrs(container, "div", &[("class", "markdown")]);
                doc.append_text(body, "thinking...");
                false
            });
        }
    }

    impl Page for RenderingPage {
        fn with_document<R>(&self, f: impl FnOnce(&Document) -> R) -> R {
            self.render_due();
            f(&self.doc.borrow())
        }

        fn activate(&self, control: NodeId) {
            self.activations.set(self.activations.get() + 1);
            let Some(delay) = self.delay else { return };
            let container = self
                .doc
                .borrow()
                .closest(control, "model-thoughts")
                .expect("control sits in a panel");
            self.scheduled
                .borrow_mut()
                .push((Instant::now() + delay, container));
        }
    }

    fn page_with_panels(collapsed: usize, open: usize) -> Document {
        let mut doc = Document::new("body");
        let root = doc.root();
        for _ in 0..collapsed {
            let panel = doc.append_element(root, "model-thoughts");
            doc.append_element(panel, "button");
        }
        for _ in 0..open {
            let panel = doc.append_element(root, "model-thoughts");
            doc.append_element(panel, "button");
            doc.append_element_with_attrs(panel, "div", &[("class", "markdown")]);
        }
        doc
    }

    #[test]
    fn test_collapsed_panels_skip_open_ones() {
        let doc = page_with_panels(2, 1);
        let panels = collapsed_panels(&doc);
        assert_eq!(panels.len(), 2);
        assert!(panels.iter().all(|p| doc.parent(p.control) == Some(p.container)));
    }

    #[test]
    fn test_panel_without_control_is_ignored() {
        let mut doc = Document::new("body");
        let root = doc.root();
        doc.append_element(root, "model-thoughts");
        assert!(collapsed_panels(&doc).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_to_expand_returns_immediately() {
        let page = RenderingPage::new(page_with_panels(0, 2), None);
        let start = Instant::now();
        let outcome = expand(&page, &ExtractOptions::default()).await;
        assert_eq!(outcome, ExpandOutcome::NothingToExpand);
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(page.activations.get(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolves_once_all_panels_render() {
        let page = RenderingPage::new(page_with_panels(3, 0), Some(Duration::from_millis(250)));
        let start = Instant::now();
        let outcome = expand(&page, &ExtractOptions::default()).await;

        assert_eq!(outcome, ExpandOutcome::Expanded { panels: 3 });
        assert_eq!(page.activations.get(), 3);
        // Activated together, so one render delay plus at most one poll
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(250));
        assert!(elapsed < Duration::from_millis(400), "took {:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_at_deadline_without_failing() {
        let page = RenderingPage::new(page_with_panels(2, 0), None);
        let options = ExtractOptions::default();
        let start = Instant::now();
        let outcome = expand(&page, &options).await;

        assert_eq!(outcome, ExpandOutcome::TimedOut { panels: 2, pending: 2 });
        let elapsed = start.elapsed();
        assert!(elapsed >= options.expand_timeout);
        assert!(elapsed < options.expand_timeout + options.poll_interval, "took {:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_sleep_is_clipped_to_deadline() {
        let page = RenderingPage::new(page_with_panels(1, 0), None);
        let options = ExtractOptions::default()
            .with_expand_timeout(Duration::from_millis(250))
            .with_poll_interval(Duration::from_millis(100));
        let start = Instant::now();
        expand(&page, &options).await;

        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(250));
        assert!(elapsed < Duration::from_millis(300), "took {:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_timeout_checks_once() {
        let page = RenderingPage::new(page_with_panels(1, 0), Some(Duration::from_millis(10)));
        let options = ExtractOptions::default().with_expand_timeout(Duration::ZERO);
        let outcome = expand(&page, &options).await;
        assert_eq!(outcome, ExpandOutcome::TimedOut { panels: 1, pending: 1 });
        assert_eq!(page.activations.get(), 1);
    }
}
