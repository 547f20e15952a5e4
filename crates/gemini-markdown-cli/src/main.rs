//! Convert a saved Gemini conversation page to Markdown.
//!
//!   gemini-markdown page.html --source https://gemini.google.com/app/abc -o chat.md
//!   curl ... | gemini-markdown -
//!
//! A saved page cannot render collapsed thought panels, so expansion is
//! skipped unless `--expand-timeout-ms` asks for it.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use gemini_markdown::{ExtractOptions, Extractor, StaticPage, DEFAULT_POLL_INTERVAL};

#[derive(Parser, Debug)]
#[command(
    name = "gemini-markdown",
    version,
    about = "Convert a saved Gemini conversation page to Markdown"
)]
struct Cli {
    /// HTML file to convert, or `-` for stdin
    input: PathBuf,

    /// Where to write the Markdown (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// URL recorded as the `source` in the front matter
    #[arg(long, default_value = "")]
    source: String,

    /// How long to wait for collapsed thought panels to render
    #[arg(long, default_value_t = 0)]
    expand_timeout_ms: u64,

    /// Delay between checks while waiting for thought panels
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL.as_millis() as u64)]
    poll_interval_ms: u64,
}

impl Cli {
    fn options(&self) -> ExtractOptions {
        ExtractOptions::default()
            .with_expand_timeout(Duration::from_millis(self.expand_timeout_ms))
            .with_poll_interval(Duration::from_millis(self.poll_interval_ms))
    }

    fn read_input(&self) -> Result<String> {
        if self.input.as_os_str() == "-" {
            let mut html = String::new();
            io::stdin()
                .read_to_string(&mut html)
                .context("Failed to read HTML from stdin")?;
            Ok(html)
        } else {
            fs::read_to_string(&self.input)
                .with_context(|| format!("Failed to read {}", self.input.display()))
        }
    }

    fn write_output(&self, markdown: &str) -> Result<()> {
        match &self.output {
            Some(path) => fs::write(path, markdown)
                .with_context(|| format!("Failed to write {}", path.display())),
            None => io::stdout()
                .write_all(markdown.as_bytes())
                .context("Failed to write to stdout"),
        }
    }

    async fn run(self) -> Result<()> {
        let html = self.read_input()?;
        tracing::info!(bytes = html.len(), "Converting page");

        let page = StaticPage::from_html(&html).with_url(self.source.clone());
        let markdown = Extractor::with_options(self.options())
            .extract(&page)
            .await
            .context("Page is not a Gemini conversation")?;

        self.write_output(&markdown)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gemini_markdown=warn".parse()?),
        )
        .init();

    Cli::parse().run().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_skip_expansion() {
        let cli = Cli::parse_from(["gemini-markdown", "page.html"]);
        let options = cli.options();
        assert_eq!(options.expand_timeout, Duration::ZERO);
        assert_eq!(options.poll_interval, DEFAULT_POLL_INTERVAL);
        assert_eq!(cli.source, "");
        assert!(cli.output.is_none());
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from([
            "gemini-markdown",
            "-",
            "-o",
            "chat.md",
            "--source",
            "https://gemini.google.com/app/1",
            "--expand-timeout-ms",
            "8000",
            "--poll-interval-ms",
            "50",
        ]);
        assert_eq!(cli.input, PathBuf::from("-"));
        assert_eq!(cli.output, Some(PathBuf::from("chat.md")));
        assert_eq!(cli.options().expand_timeout, Duration::from_millis(8000));
        assert_eq!(cli.options().poll_interval, Duration::from_millis(50));
    }
}
