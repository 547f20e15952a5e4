//! The host page the converter reads from.
//!
//! A [`Page`] owns the live document. The converter only reads it, except for
//! asking the host to activate disclosure controls; the host renders the
//! revealed content on its own schedule, and later reads observe the result.

use chrono::{DateTime, FixedOffset, Local};

use crate::node::{Document, NodeId};

/// A live conversation page.
///
/// Methods take `&self`; hosts that render asynchronously keep their
/// document behind interior mutability on a single thread.
pub trait Page {
    /// Run `f` against the current state of the document
    fn with_document<R>(&self, f: impl FnOnce(&Document) -> R) -> R;

    /// Trigger a disclosure control, as a click would
    fn activate(&self, control: NodeId);

    /// Address of the page, empty when unknown
    fn url(&self) -> String {
        String::new()
    }

    /// Local wall-clock time used for the front matter date
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().into()
    }
}

/// A page that never changes, such as a saved HTML file.
///
/// Activating a control does nothing.
#[derive(Debug, Clone)]
pub struct StaticPage {
    document: Document,
    url: String,
    captured_at: Option<DateTime<FixedOffset>>,
}

impl StaticPage {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            url: String::new(),
            captured_at: None,
        }
    }

    /// Parse `html` as a full page
    pub fn from_html(html: &str) -> Self {
        Self::new(Document::parse_html(html))
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Pin the date reported by [`Page::now`]
    pub fn with_captured_at(mut self, date: DateTime<FixedOffset>) -> Self {
        self.captured_at = Some(date);
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

impl Page for StaticPage {
    fn with_document<R>(&self, f: impl FnOnce(&Document) -> R) -> R {
        f(&self.document)
    }

    fn activate(&self, _control: NodeId) {}

    fn url(&self) -> String {
        self.url.clone()
    }

    fn now(&self) -> DateTime<FixedOffset> {
        self.captured_at.unwrap_or_else(|| Local::now().into())
    }
}
