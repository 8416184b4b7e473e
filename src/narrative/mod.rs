//! Narrative commentary on computed projections
//!
//! Commentary is supplementary: the numbers on screen never depend on it.
//! Failures collapse into one of two fixed user-facing messages (or into
//! nothing at all for decorative kinds), while the full error goes to the log.

pub mod anthropic;
pub mod prompts;
pub mod retry;
pub mod scheduler;

pub use anthropic::AnthropicNarrator;
pub use scheduler::{CommentaryHandle, CommentaryOutcome, CommentaryScheduler};

use crate::config::RetryConfig;
use crate::engine::{Scenario, ScenarioReport};
use crate::error::AppError;
use crate::logging::{sanitize_log_value, truncate_for_log};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Shown when the provider keeps rate limiting after all retries
pub const RATE_LIMIT_MESSAGE: &str = "The analysis service is temporarily unavailable due to \
high demand. Please try again in a moment.";

/// Shown for any other commentary failure
pub const GENERIC_FAILURE_MESSAGE: &str = "Analysis unavailable right now. Please try again.";

/// What kind of commentary is being asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeKind {
    /// Multi-paragraph analysis of drivers, risks and recommendations
    Analysis,
    /// A short executive summary
    ExecutiveSummary,
    /// One or two sentences describing the projection curve
    GraphTrend,
    /// Month-by-month narration of the projection
    MonthlyNarration,
}

impl NarrativeKind {
    pub const ALL: [NarrativeKind; 4] = [
        NarrativeKind::Analysis,
        NarrativeKind::ExecutiveSummary,
        NarrativeKind::GraphTrend,
        NarrativeKind::MonthlyNarration,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NarrativeKind::Analysis => "analysis",
            NarrativeKind::ExecutiveSummary => "summary",
            NarrativeKind::GraphTrend => "graph",
            NarrativeKind::MonthlyNarration => "monthly",
        }
    }

    /// Decorative kinds render nothing on failure instead of an error line
    pub fn is_decorative(&self) -> bool {
        matches!(
            self,
            NarrativeKind::GraphTrend | NarrativeKind::MonthlyNarration
        )
    }
}

impl fmt::Display for NarrativeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NarrativeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "analysis" => Ok(NarrativeKind::Analysis),
            "summary" | "executive_summary" => Ok(NarrativeKind::ExecutiveSummary),
            "graph" | "graph_trend" => Ok(NarrativeKind::GraphTrend),
            "monthly" | "monthly_narration" => Ok(NarrativeKind::MonthlyNarration),
            other => Err(format!("unknown narrative kind '{}'", other)),
        }
    }
}

/// A single commentary request: the scenario, the kind of text wanted and
/// the `{scenario, parameters, results}` snapshot it should describe
#[derive(Debug, Clone, Serialize)]
pub struct CommentaryRequest {
    pub scenario: Scenario,
    pub kind: NarrativeKind,
    pub snapshot: serde_json::Value,
}

impl CommentaryRequest {
    pub fn new(report: &ScenarioReport, kind: NarrativeKind) -> Self {
        Self {
            scenario: report.scenario(),
            kind,
            snapshot: report.snapshot(),
        }
    }
}

/// Text generator behind the commentary service
#[async_trait]
pub trait Narrator: Send + Sync {
    async fn generate(&self, request: &CommentaryRequest) -> Result<String, AppError>;
}

/// Result of a commentary request as it should be displayed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Commentary {
    /// Generated text
    Text(String),
    /// Generation failed; carries one of the fixed user-facing messages
    Unavailable(&'static str),
    /// Generation failed for a decorative kind; render nothing
    Empty,
}

impl Commentary {
    pub fn as_text(&self) -> &str {
        match self {
            Commentary::Text(text) => text,
            Commentary::Unavailable(message) => message,
            Commentary::Empty => "",
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Commentary::Text(_))
    }
}

/// Wraps a [`Narrator`] with rate-limit retries and failure mapping
pub struct CommentaryService<N: ?Sized> {
    narrator: Arc<N>,
    retry: RetryConfig,
}

impl<N: Narrator + ?Sized> CommentaryService<N> {
    pub fn new(narrator: Arc<N>, retry: RetryConfig) -> Self {
        Self { narrator, retry }
    }

    /// Generate commentary; never fails, see [`Commentary`]
    pub async fn commentary(&self, request: &CommentaryRequest) -> Commentary {
        debug!(
            scenario = %request.scenario,
            kind = %request.kind,
            "Requesting commentary"
        );

        let result =
            retry::retry_rate_limited(&self.retry, || self.narrator.generate(request)).await;

        match result {
            Ok(text) => Commentary::Text(text),
            Err(e) => {
                let detail = truncate_for_log(&sanitize_log_value(&e.to_string()), 500);
                if e.is_rate_limited() {
                    warn!(
                        scenario = %request.scenario,
                        kind = %request.kind,
                        error_kind = e.kind(),
                        error = %detail,
                        "Commentary rate limited after retries"
                    );
                } else {
                    error!(
                        scenario = %request.scenario,
                        kind = %request.kind,
                        error_kind = e.kind(),
                        error = %detail,
                        "Commentary generation failed"
                    );
                }

                if request.kind.is_decorative() {
                    Commentary::Empty
                } else if e.is_rate_limited() {
                    Commentary::Unavailable(RATE_LIMIT_MESSAGE)
                } else {
                    Commentary::Unavailable(GENERIC_FAILURE_MESSAGE)
                }
            }
        }
    }
}
