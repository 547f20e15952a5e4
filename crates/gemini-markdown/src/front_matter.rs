//! YAML front matter for exported conversations.

use chrono::{DateTime, FixedOffset, TimeZone};

use crate::utilities::flatten_line_breaks;

/// Title used when the page has none
pub const DEFAULT_TITLE: &str = "Gemini Conversation";

/// Metadata written ahead of the conversation body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontMatter {
    pub title: String,
    pub date: DateTime<FixedOffset>,
    pub source: String,
}

impl FrontMatter {
    /// Build front matter, substituting [`DEFAULT_TITLE`] for a missing or
    /// blank title
    pub fn new(title: Option<&str>, date: DateTime<FixedOffset>, source: &str) -> Self {
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TITLE);
        Self {
            title: title.to_string(),
            date,
            source: source.to_string(),
        }
    }

    /// Render the `---` delimited block, including the blank line after it
    pub fn render(&self) -> String {
        format!(
            "---\ntitle: \"{}\"\ndate: {}\nsource: \"{}\"\n---\n\n",
            escape_scalar(&self.title),
            format_local_iso(&self.date),
            escape_scalar(&self.source)
        )
    }
}

/// Render front matter for the given fields
pub fn build_front_matter(
    title: Option<&str>,
    date: DateTime<FixedOffset>,
    source: &str,
) -> String {
    FrontMatter::new(title, date, source).render()
}

/// Escape a value for a double-quoted YAML scalar
pub fn escape_scalar(value: &str) -> String {
    flatten_line_breaks(&value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// `YYYY-MM-DDTHH:MM:SS±HH:MM` in the wall-clock time of `date`'s offset
pub fn format_local_iso<Tz>(date: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    date.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
}
