//! Extractor - the main entry point for converting a Gemini page to Markdown.

use once_cell::sync::Lazy;
use scraper::Selector;
use tracing::trace;

use crate::expand::expand;
use crate::front_matter::build_front_matter;
use crate::node::Document;
use crate::options::ExtractOptions;
use crate::page::Page;
use crate::utilities::prefix_continuation_lines;
use crate::visitor::visit;
use crate::{ExtractError, Result};

static BODY: Lazy<Selector> = Lazy::new(|| Selector::parse("body").unwrap());
static TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".conversation-title-container .conversation-title").unwrap());
static TURN: Lazy<Selector> = Lazy::new(|| Selector::parse(".conversation-container").unwrap());
static USER_QUERY: Lazy<Selector> = Lazy::new(|| Selector::parse("user-query .query-text").unwrap());
static RESPONSE_CONTENT: Lazy<Selector> =
    Lazy::new(|| Selector::parse("model-response .markdown").unwrap());

/// One block of a model response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Trimmed Markdown, never empty
    pub text: String,
    /// Whether the block came from a thought panel
    pub is_thought: bool,
}

impl Block {
    pub fn render(&self) -> String {
        if self.is_thought {
            format!(
                "<details>\n<summary>Thinking</summary>\n\n> {}\n\n</details>\n\n",
                prefix_continuation_lines(&self.text, "> ")
            )
        } else {
            format!("{}\n\n", self.text)
        }
    }
}

/// One user/model exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub user_text: Option<String>,
    /// `None` when the turn has no model response content at all. Blocks
    /// that convert to nothing are already dropped.
    pub response: Option<Vec<Block>>,
}

impl Turn {
    pub fn render(&self) -> String {
        let mut out = String::new();

        if let Some(user_text) = &self.user_text {
            out.push_str(&format!("## User\n\n{}\n\n", user_text));
        }

        if let Some(blocks) = &self.response {
            out.push_str("## Gemini\n\n");
            for block in blocks {
                out.push_str(&block.render());
            }
            out.push_str("---\n\n");
        }

        out
    }
}

/// Conversation title shown above the chat, if any
pub fn conversation_title(doc: &Document) -> Option<String> {
    doc.select_first(doc.root(), &TITLE)
        .map(|n| doc.text_content(n).trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Read every conversation turn in document order
pub fn collect_turns(doc: &Document) -> Vec<Turn> {
    doc.select(doc.root(), &TURN)
        .into_iter()
        .map(|turn| {
            let user_text = doc
                .select_first(turn, &USER_QUERY)
                .map(|n| doc.inner_text(n).trim().to_string());

            let content = doc.select(turn, &RESPONSE_CONTENT);
            let response = (!content.is_empty()).then(|| {
                content
                    .into_iter()
                    .filter_map(|node| {
                        let text = visit(doc, node).trim().to_string();
                        (!text.is_empty()).then(|| Block {
                            text,
                            is_thought: doc.closest(node, "model-thoughts").is_some(),
                        })
                    })
                    .collect()
            });

            Turn {
                user_text,
                response,
            }
        })
        .collect()
}

/// The document must at least have a body to hold a conversation
fn check_host(doc: &Document) -> Result<()> {
    let root = doc.root();
    if doc.tag_name(root) == "body" || doc.select_first(root, &BODY).is_some() {
        Ok(())
    } else {
        Err(ExtractError::MissingContainer("body".to_string()))
    }
}

/// Converts Gemini conversation pages to Markdown
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    options: ExtractOptions,
}

impl Extractor {
    /// Create an Extractor with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an Extractor with custom options
    pub fn with_options(options: ExtractOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Reveal hidden thoughts, then render the whole conversation with its
    /// front matter.
    ///
    /// Fails only when the page lacks a `<body>`; missing titles, queries or
    /// responses are omitted or defaulted.
    pub async fn extract<P: Page>(&self, page: &P) -> Result<String> {
        page.with_document(check_host)?;

        let outcome = expand(page, &self.options).await;
        trace!(?outcome, "expansion finished");

        let (title, turns) =
            page.with_document(|doc| (conversation_title(doc), collect_turns(doc)));
        trace!(turns = turns.len(), "collected conversation turns");

        let mut markdown = build_front_matter(title.as_deref(), page.now(), &page.url());
        for turn in &turns {
            markdown.push_str(&turn.render());
        }
        Ok(markdown)
    }
}

/// Extract a page with default options
pub async fn extract<P: Page>(page: &P) -> Result<String> {
    Extractor::new().extract(page).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thought_block() {
        let block = Block {
            text: "reasoning".to_string(),
            is_thought: true,
        };
        assert_eq!(
            block.render(),
            "<details>\n<summary>Thinking</summary>\n\n> reasoning\n\n</details>\n\n"
        );
    }

    #[test]
    fn test_multiline_thought_is_quoted() {
        let block = Block {
            text: "a\n\nb".to_string(),
            is_thought: true,
        };
        assert!(block.render().contains("> a\n> \n> b\n\n</details>"));
    }

    #[test]
    fn test_turn_render() {
        let turn = Turn {
            user_text: Some("Hi".to_string()),
            response: Some(vec![Block {
                text: "Hello".to_string(),
                is_thought: false,
            }]),
        };
        assert_eq!(turn.render(), "## User\n\nHi\n\n## Gemini\n\nHello\n\n---\n\n");
    }

    #[test]
    fn test_turn_without_response_has_no_rule() {
        let turn = Turn {
            user_text: Some("Hi".to_string()),
            response: None,
        };
        assert_eq!(turn.render(), "## User\n\nHi\n\n");
    }

    #[test]
    fn test_collect_turns_drops_empty_blocks() {
        let doc = Document::parse_html(
            r#"<div class="conversation-container">
                 <user-query><div class="query-text"><p>Question</p></div></user-query>
                 <model-response>
                   <model-thoughts><div class="markdown"><p>Because</p></div></model-thoughts>
                   <div class="markdown">   </div>
                   <div class="markdown"><p>Answer</p></div>
                 </model-response>
               </div>"#,
        );
        let turns = collect_turns(&doc);
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].user_text.as_deref(), Some("Question"));
        assert_eq!(
            turns[0].response,
            Some(vec![
                Block {
                    text: "Because".to_string(),
                    is_thought: true
                },
                Block {
                    text: "Answer".to_string(),
                    is_thought: false
                },
            ])
        );
    }

    #[test]
    fn test_title() {
        let doc = Document::parse_html(
            r#"<div class="conversation-title-container"><span class="conversation-title">  Trip plan </span></div>"#,
        );
        assert_eq!(conversation_title(&doc).as_deref(), Some("Trip plan"));
        assert_eq!(conversation_title(&Document::parse_html("<p></p>")), None);
    }

    #[test]
    fn test_check_host() {
        assert!(check_host(&Document::parse_html("")).is_ok());
        assert!(check_host(&Document::new("body")).is_ok());
        assert!(matches!(
            check_host(&Document::new("div")),
            Err(ExtractError::MissingContainer(_))
        ));
    }
}
