//! Configuration options for extraction

use std::time::Duration;

/// Default deadline for revealing collapsed thought panels
pub const DEFAULT_EXPAND_TIMEOUT: Duration = Duration::from_millis(8000);

/// Default delay between readiness checks while panels render
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Options for [`crate::Extractor`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// How long to wait for disclosure panels to render their content.
    /// Zero skips the wait entirely.
    pub expand_timeout: Duration,

    /// Delay between readiness checks
    pub poll_interval: Duration,
}

impl ExtractOptions {
    pub fn with_expand_timeout(mut self, timeout: Duration) -> Self {
        self.expand_timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            expand_timeout: DEFAULT_EXPAND_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}
