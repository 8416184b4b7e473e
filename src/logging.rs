//! Logging setup and log-safe rendering of secrets
//!
//! Narrative API keys and raw provider error bodies pass through here before
//! they reach a log line or the terminal.

use crate::config::LoggingConfig;
use std::fmt;
use tracing_subscriber::{fmt as tracing_fmt, prelude::*, EnvFilter};

/// Initialize tracing/logging
///
/// `RUST_LOG` wins over the configured level. Output goes to stderr so that
/// tables, JSON and CSV on stdout stay machine-readable.
pub fn init_tracing(cfg: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.level));

    let registry = tracing_subscriber::registry().with(filter);

    if cfg.format == "json" {
        registry
            .with(tracing_fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                tracing_fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

/// Masked API key representation
///
/// Shows only the first 8 characters followed by `***`
#[derive(Clone, Debug)]
pub struct SensitiveApiKey<'a> {
    inner: &'a str,
}

impl<'a> SensitiveApiKey<'a> {
    /// # Example
    /// ```
    /// use cost_projector::logging::SensitiveApiKey;
    ///
    /// let sanitized = SensitiveApiKey::new("sk-ant-api123-abcdef123456");
    /// assert_eq!(format!("{}", sanitized), "sk-ant-a***");
    /// ```
    pub fn new(key: &'a str) -> Self {
        Self { inner: key }
    }
}

impl<'a> fmt::Display for SensitiveApiKey<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let visible_len = 8.min(self.inner.len());
        if self.inner.len() <= visible_len || !self.inner.is_char_boundary(visible_len) {
            write!(f, "***")
        } else {
            write!(f, "{}***", &self.inner[..visible_len])
        }
    }
}

/// Whether a string looks like an API key
pub fn is_sensitive_key(value: &str) -> bool {
    const SENSITIVE_PREFIXES: [&str; 5] = ["sk-ant-", "sk-", "pk-", "Bearer sk-", "Bearer pk-"];
    SENSITIVE_PREFIXES.iter().any(|prefix| value.starts_with(prefix))
}

/// Mask every key-shaped word in the value, leaving the rest unchanged
///
/// # Example
/// ```
/// use cost_projector::logging::sanitize_log_value;
///
/// assert_eq!(sanitize_log_value("sk-ant-api123-key"), "sk-ant-a***");
/// assert_eq!(sanitize_log_value("claude-3-5-haiku"), "claude-3-5-haiku");
/// assert_eq!(
///     sanitize_log_value("Upstream error (401): bad key 'sk-ant-api03-abcdef'"),
///     "Upstream error (401): bad key 'sk-ant-a***'"
/// );
/// ```
pub fn sanitize_log_value(value: &str) -> String {
    value
        .split(' ')
        .map(mask_key_in_word)
        .collect::<Vec<_>>()
        .join(" ")
}

/// A key starts at a word boundary and runs over `[A-Za-z0-9_-]`
fn mask_key_in_word(word: &str) -> String {
    let start = word.char_indices().map(|(i, _)| i).find(|&i| {
        let at_boundary = word[..i]
            .chars()
            .next_back()
            .map_or(true, |prev| !prev.is_ascii_alphanumeric());
        at_boundary && is_sensitive_key(&word[i..])
    });

    match start {
        Some(start) => {
            let end = word[start..]
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
                .map_or(word.len(), |len| start + len);
            format!(
                "{}{}{}",
                &word[..start],
                SensitiveApiKey::new(&word[start..end]),
                &word[end..]
            )
        }
        None => word.to_string(),
    }
}

/// Mask an API key for display: first 7 and last 4 characters
///
/// Example: "sk-1234567890abcdef" -> "sk-1234...cdef"
pub fn mask_api_key(key: &str) -> String {
    if key.len() <= 11 || !key.is_ascii() {
        return "***".to_string();
    }

    let prefix = &key[..7];
    let suffix = &key[key.len() - 4..];

    format!("{}...{}", prefix, suffix)
}

/// Truncate text for a log line, respecting char boundaries
pub fn truncate_for_log(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{}…", truncated)
    }
}
