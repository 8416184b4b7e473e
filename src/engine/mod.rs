//! Deterministic cost and value projection engines
//!
//! Every engine is a pure function from a parameter record to a freshly
//! allocated report. Nothing here fails: malformed numbers are neutralised
//! and zero divisors produce 0 or `None` instead of NaN or infinity.

pub mod rag;
pub mod roi;
pub mod translation;

pub use rag::{compute_rag, RagParameters, RagReport};
pub use roi::{
    compute_roi, compute_roi_with_cost, AiOperatingCost, CostSource, RoiParameters, RoiReport,
};
pub use translation::{compute_translation, TranslationParameters, TranslationReport};

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Length of every projection series
pub const PROJECTION_MONTHS: usize = 12;

/// The three modelled scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    Translation,
    Rag,
    Roi,
}

impl Scenario {
    pub const ALL: [Scenario; 3] = [Scenario::Translation, Scenario::Rag, Scenario::Roi];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::Translation => "translation",
            Scenario::Rag => "rag",
            Scenario::Roi => "roi",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scenario {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "translation" => Ok(Scenario::Translation),
            "rag" => Ok(Scenario::Rag),
            "roi" => Ok(Scenario::Roi),
            other => Err(format!("unknown scenario '{}'", other)),
        }
    }
}

/// A computed report for any of the scenarios
#[derive(Debug, Clone)]
pub enum ScenarioReport {
    Translation(TranslationReport),
    Rag(RagReport),
    Roi(RoiReport),
}

impl ScenarioReport {
    pub fn scenario(&self) -> Scenario {
        match self {
            ScenarioReport::Translation(_) => Scenario::Translation,
            ScenarioReport::Rag(_) => Scenario::Rag,
            ScenarioReport::Roi(_) => Scenario::Roi,
        }
    }

    /// Serialised `{scenario, parameters, results}` view of the report, the
    /// payload handed to commentary generation
    pub fn snapshot(&self) -> serde_json::Value {
        let report = match self {
            ScenarioReport::Translation(r) => serde_json::to_value(r),
            ScenarioReport::Rag(r) => serde_json::to_value(r),
            ScenarioReport::Roi(r) => serde_json::to_value(r),
        };

        let mut results = report.unwrap_or(serde_json::Value::Null);
        let parameters = results
            .as_object_mut()
            .and_then(|fields| fields.remove("parameters"))
            .unwrap_or(serde_json::Value::Null);

        serde_json::json!({
            "scenario": self.scenario().as_str(),
            "parameters": parameters,
            "results": results,
        })
    }
}

/// Named cost components that sum to a phase total
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CostBreakdown {
    components: Vec<(&'static str, f64)>,
    total: f64,
}

impl CostBreakdown {
    /// Build a breakdown; the total is the sum of the components
    ///
    /// Components are costs: negative or overflowed amounts are recorded as 0.
    pub fn new(components: &[(&'static str, f64)]) -> Self {
        let mut breakdown = Self {
            components: components
                .iter()
                .map(|(name, value)| (*name, amount(*value)))
                .collect(),
            total: 0.0,
        };
        breakdown.calculate_total();
        breakdown
    }

    fn calculate_total(&mut self) {
        self.total = finite(self.components.iter().map(|(_, amount)| amount).sum());
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    /// Amount of a named component, 0 when absent
    pub fn get(&self, name: &str) -> f64 {
        self.components
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, amount)| *amount)
            .unwrap_or(0.0)
    }

    pub fn components(&self) -> &[(&'static str, f64)] {
        &self.components
    }
}

impl Serialize for CostBreakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.components.len() + 1))?;
        for (name, amount) in &self.components {
            map.serialize_entry(name, amount)?;
        }
        map.serialize_entry("total", &self.total)?;
        map.end()
    }
}

/// One month of a cost-versus-value projection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionPoint {
    pub period_label: String,
    pub cumulative_cost: f64,
    pub cumulative_value: f64,
    pub cumulative_net_gain: f64,
}

/// "Month N" label for a 0-based index
pub fn period_label(index: usize) -> String {
    format!("Month {}", index + 1)
}

/// Series where `initial` is paid in month 1 and `monthly` accrues for each
/// elapsed month after it: `v[i] = initial + monthly * i`
pub fn accrual_series(initial: f64, monthly: f64) -> Vec<f64> {
    (0..PROJECTION_MONTHS)
        .map(|i| finite(initial + monthly * i as f64))
        .collect()
}

/// Series with no setup component: `v[i] = monthly * (i + 1)`
pub fn linear_series(monthly: f64) -> Vec<f64> {
    (0..PROJECTION_MONTHS)
        .map(|i| finite(monthly * (i + 1) as f64))
        .collect()
}

/// Sanitise an input amount: non-finite or negative values become 0
pub(crate) fn amount(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Derived quantity: an overflow to infinity (or an `inf * 0` NaN) becomes 0
pub(crate) fn finite(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Sanitise a percentage into `[0, 100]`
pub(crate) fn percent(value: f64) -> f64 {
    amount(value).min(100.0)
}

/// Positive value or the supplied safe default
pub(crate) fn positive_or(value: f64, default: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        default
    }
}

/// Division that yields 0 instead of NaN/infinity
pub(crate) fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }
    let result = numerator / denominator;
    if result.is_finite() {
        result
    } else {
        0.0
    }
}

/// Ratio that is not computable when the denominator is 0
pub(crate) fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator > 0.0 && denominator.is_finite() {
        Some(numerator / denominator).filter(|r| r.is_finite())
    } else {
        None
    }
}
