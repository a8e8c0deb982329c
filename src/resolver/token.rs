//! Access-token discovery in embed player markup.
//!
//! The embed host hides the `getSources` key somewhere in the page and
//! changes how often. Each known hiding scheme is a [`TokenStrategy`];
//! [`TokenFinder`] tries them in registration order and the first hit wins.
//! Supporting a new scheme means appending a strategy, not touching the
//! resolver pipeline.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ResolveError;

/// Length of the assembled key.
pub const TOKEN_LEN: usize = 48;

static SINGLE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[a-zA-Z0-9]{48}\b").unwrap());

static SPLIT_RUNS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b([a-zA-Z0-9]{16})\b.*?\b([a-zA-Z0-9]{16})\b.*?\b([a-zA-Z0-9]{16})\b",
    )
    .unwrap()
});

/// One way of locating the key in raw markup.
pub trait TokenStrategy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn find(&self, markup: &str) -> Option<String>;
}

/// A single standalone 48-character alphanumeric run.
pub struct SingleRun;

impl TokenStrategy for SingleRun {
    fn name(&self) -> &'static str {
        "single-run"
    }

    fn find(&self, markup: &str) -> Option<String> {
        SINGLE_RUN.find(markup).map(|m| m.as_str().to_string())
    }
}

/// Three standalone 16-character runs on one line, concatenated in order.
pub struct SplitRuns;

impl TokenStrategy for SplitRuns {
    fn name(&self) -> &'static str {
        "split-runs"
    }

    fn find(&self, markup: &str) -> Option<String> {
        let caps = SPLIT_RUNS.captures(markup)?;
        Some(format!("{}{}{}", &caps[1], &caps[2], &caps[3]))
    }
}

/// Ordered set of strategies.
pub struct TokenFinder {
    strategies: Vec<Box<dyn TokenStrategy>>,
}

impl TokenFinder {
    /// All known strategies, most common scheme first.
    #[must_use]
    pub fn new() -> Self {
        let strategies: Vec<Box<dyn TokenStrategy>> = vec![Box::new(SingleRun), Box::new(SplitRuns)];
        Self { strategies }
    }

    /// A finder with no strategies; build it up with [`TokenFinder::with`].
    #[must_use]
    pub fn empty() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Append a strategy after the existing ones.
    #[must_use]
    pub fn with(mut self, strategy: impl TokenStrategy + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// First token any strategy finds, or [`ResolveError::TokenNotFound`].
    pub fn discover(&self, markup: &str) -> Result<String, ResolveError> {
        for strategy in &self.strategies {
            if let Some(token) = strategy.find(markup) {
                tracing::debug!(strategy = strategy.name(), "Embed token found");
                return Ok(token);
            }
        }
        tracing::warn!(
            strategies = ?self.strategy_names(),
            markup_len = markup.len(),
            "No embed token strategy matched; upstream format may have changed"
        );
        Err(ResolveError::TokenNotFound)
    }
}

impl Default for TokenFinder {
    fn default() -> Self {
        Self::new()
    }
}

/// Discover the token with the default strategies.
pub fn discover_token(markup: &str) -> Result<String, ResolveError> {
    TokenFinder::new().discover(markup)
}
