//! # gemini-markdown
//!
//! Convert Gemini conversation pages to Markdown.
//!
//! The converter walks a DOM tree of a Gemini chat: each conversation turn
//! becomes a `## User` / `## Gemini` section, model reasoning hidden behind
//! "Show thinking" panels becomes a collapsible `<details>` quote, and the
//! whole document is prefixed with YAML front matter (title, capture date,
//! source URL).
//!
//! ## Design
//!
//! - **Arena DOM**: [`Document`] wraps scraper's tree, whose nodes sit in one
//!   arena with parent links, so ancestor queries (list nesting, thought
//!   detection) are cheap and selectors are scraper's own.
//! - **Host agnostic**: the live page is reached through the [`Page`] trait.
//!   A browser bridge, a headless driver or a saved file ([`StaticPage`]) can
//!   all be converted the same way.
//! - **Best effort expansion**: collapsed thought panels are opened and polled
//!   with a deadline; a timeout degrades the output instead of failing.
//!
//! ## Example
//!
//! ```rust
//! use gemini_markdown::{Extractor, ExtractOptions, StaticPage};
//!
//! let html = r#"
//!   <div class="conversation-container">
//!     <user-query><div class="query-text">Hello?</div></user-query>
//!     <model-response><div class="markdown"><p>Hi <b>there</b></p></div></model-response>
//!   </div>"#;
//!
//! let page = StaticPage::from_html(html).with_url("https://gemini.google.com/app/1");
//! let extractor = Extractor::with_options(ExtractOptions::default());
//!
//! let runtime = tokio::runtime::Builder::new_current_thread()
//!     .enable_time()
//!     .build()
//!     .unwrap();
//! let markdown = runtime.block_on(extractor.extract(&page)).unwrap();
//! assert!(markdown.contains("## User\n\nHello?\n\n## Gemini\n\nHi **there**\n\n---\n\n"));
//! ```

pub mod expand;
pub mod extract;
pub mod front_matter;
pub mod html;
pub mod list;
pub mod node;
mod options;
pub mod page;
mod utilities;
pub mod visitor;

pub use expand::{expand, ExpandOutcome};
pub use extract::{extract, Block, Extractor, Turn};
pub use front_matter::{build_front_matter, FrontMatter, DEFAULT_TITLE};
pub use node::{Document, NodeId, NodeType};
pub use options::{ExtractOptions, DEFAULT_EXPAND_TIMEOUT, DEFAULT_POLL_INTERVAL};
pub use page::{Page, StaticPage};
pub use scraper::Selector;
pub use visitor::visit;

/// Error type for extraction
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The page lacks a container every conversation page has
    #[error("Missing container: {0}")]
    MissingContainer(String),
}

pub type Result<T> = std::result::Result<T, ExtractError>;
