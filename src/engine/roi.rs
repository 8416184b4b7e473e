use crate::engine::rag::RagReport;
use crate::engine::translation::TranslationReport;
use crate::engine::{
    amount, finite, linear_series, percent, period_label, ratio, safe_div, CostBreakdown,
    ProjectionPoint,
};
use crate::normalize::lenient;
use serde::{Deserialize, Serialize};

/// Average tokens per indexed document assumed for re-embedding spend
pub const REEMBED_TOKENS_PER_DOCUMENT: f64 = 800.0;

const TOKENS_PER_MILLION: f64 = 1_000_000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoiParameters {
    #[serde(deserialize_with = "lenient")]
    pub time_saved_per_request_minutes: f64,
    #[serde(deserialize_with = "lenient")]
    pub requests_per_user_per_month: f64,
    #[serde(deserialize_with = "lenient")]
    pub employee_hourly_rate: f64,
    #[serde(deserialize_with = "lenient")]
    pub user_count: f64,
    #[serde(deserialize_with = "lenient")]
    pub avg_tokens_per_request: f64,
    #[serde(deserialize_with = "lenient")]
    pub cost_per_million_tokens: f64,
    #[serde(deserialize_with = "lenient")]
    pub indexed_document_count: f64,
    #[serde(deserialize_with = "lenient")]
    pub reindexing_frequency_per_year: f64,
    #[serde(deserialize_with = "lenient")]
    pub embedding_cost_per_million: f64,
    #[serde(deserialize_with = "lenient")]
    pub vector_db_base_monthly: f64,
    #[serde(deserialize_with = "lenient")]
    pub percent_outputs_reviewed: f64,
    #[serde(deserialize_with = "lenient")]
    pub review_minutes_per_output: f64,
    #[serde(deserialize_with = "lenient")]
    pub reviewer_hourly_rate: f64,
}

impl Default for RoiParameters {
    fn default() -> Self {
        Self {
            time_saved_per_request_minutes: 10.0,
            requests_per_user_per_month: 40.0,
            employee_hourly_rate: 50.0,
            user_count: 200.0,
            avg_tokens_per_request: 2_000.0,
            cost_per_million_tokens: 5.0,
            indexed_document_count: 10_000.0,
            reindexing_frequency_per_year: 12.0,
            embedding_cost_per_million: 0.02,
            vector_db_base_monthly: 70.0,
            percent_outputs_reviewed: 10.0,
            review_minutes_per_output: 2.0,
            reviewer_hourly_rate: 60.0,
        }
    }
}

/// Monthly AI operating cost split into its three pillars.
///
/// Inference and governance scale with request volume; orchestration
/// (vector store + re-embedding) does not.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AiOperatingCost {
    pub inference: f64,
    pub orchestration: f64,
    pub governance: f64,
}

impl AiOperatingCost {
    /// Pillars derived from the ROI parameters themselves
    pub fn from_parameters(params: &RoiParameters) -> Self {
        let monthly_requests =
            finite(amount(params.user_count) * amount(params.requests_per_user_per_month));

        let inference = (monthly_requests * amount(params.avg_tokens_per_request)
            / TOKENS_PER_MILLION)
            * amount(params.cost_per_million_tokens);

        let reembed_tokens = amount(params.indexed_document_count) * REEMBED_TOKENS_PER_DOCUMENT;
        let orchestration = amount(params.vector_db_base_monthly)
            + (reembed_tokens / TOKENS_PER_MILLION)
                * amount(params.embedding_cost_per_million)
                * (amount(params.reindexing_frequency_per_year) / 12.0);

        let governance = (monthly_requests * percent(params.percent_outputs_reviewed) / 100.0)
            * (amount(params.review_minutes_per_output) / 60.0)
            * amount(params.reviewer_hourly_rate);

        Self {
            inference: amount(inference),
            orchestration: amount(orchestration),
            governance: amount(governance),
        }
    }

    /// Pillars taken from a computed RAG lifecycle, so the ROI view can
    /// price the system modelled in the RAG scenario
    pub fn from_rag(report: &RagReport) -> Self {
        let run = &report.run.costs;
        let govern = &report.govern.costs;
        Self {
            inference: finite(
                run.get("inference") + run.get("query_embedding") + run.get("reranking"),
            ),
            orchestration: finite(run.get("vector_db") + govern.get("reindexing")),
            governance: finite(
                govern.get("monitoring") + govern.get("evaluation") + govern.get("human_review"),
            ),
        }
    }

    /// Pillars taken from the recurring translation cost: API spend is
    /// inference, human review is governance, there is no orchestration
    pub fn from_translation(report: &TranslationReport) -> Self {
        Self {
            inference: report.monthly_api_cost(),
            orchestration: 0.0,
            governance: report.monthly_review_cost(),
        }
    }

    pub fn total(&self) -> f64 {
        finite(self.inference + self.orchestration + self.governance)
    }

    pub fn breakdown(&self) -> CostBreakdown {
        CostBreakdown::new(&[
            ("inference", self.inference),
            ("orchestration", self.orchestration),
            ("governance", self.governance),
        ])
    }

    /// Costs at a different adoption level; orchestration stays fixed
    fn scaled(&self, adoption: f64) -> Self {
        Self {
            inference: self.inference * adoption,
            orchestration: self.orchestration,
            governance: self.governance * adoption,
        }
    }
}

/// Where the ROI view takes its monthly AI operating cost from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostSource {
    /// The ROI parameters' own inference/orchestration/governance inputs
    #[default]
    Parameters,
    /// The recurring cost of the translation scenario
    Translation,
    /// The RAG lifecycle currently being modelled
    Rag,
}

impl CostSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CostSource::Parameters => "parameters",
            CostSource::Translation => "translation",
            CostSource::Rag => "rag",
        }
    }
}

impl std::str::FromStr for CostSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "parameters" | "params" => Ok(CostSource::Parameters),
            "translation" => Ok(CostSource::Translation),
            "rag" => Ok(CostSource::Rag),
            other => Err(format!("unknown cost source '{}'", other)),
        }
    }
}

/// Sensitivity scenario definition
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScenarioProfile {
    pub name: &'static str,
    pub time_saved_factor: f64,
    pub adoption_factor: f64,
}

pub const SCENARIO_PROFILES: [ScenarioProfile; 3] = [
    ScenarioProfile {
        name: "Conservative",
        time_saved_factor: 0.6,
        adoption_factor: 0.7,
    },
    ScenarioProfile {
        name: "Base Case",
        time_saved_factor: 1.0,
        adoption_factor: 1.0,
    },
    ScenarioProfile {
        name: "Optimistic",
        time_saved_factor: 1.3,
        adoption_factor: 1.0,
    },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioVariant {
    pub name: &'static str,
    pub time_saved_minutes: f64,
    pub effective_users: f64,
    pub monthly_value: f64,
    pub monthly_cost: f64,
    pub net_monthly_gain: f64,
    pub roi_ratio: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoiReport {
    pub parameters: RoiParameters,
    pub monthly_requests: f64,
    pub hours_saved_per_month: f64,
    /// `inference` + `orchestration` + `governance`
    pub costs: CostBreakdown,
    pub monthly_productivity_value: f64,
    pub net_monthly_gain: f64,
    /// `None` when there is no AI cost to divide by
    pub roi_ratio: Option<f64>,
    pub cost_per_user: f64,
    pub annual_net_gain: f64,
    pub break_even_month: Option<usize>,
    pub projection: Vec<ProjectionPoint>,
    pub scenarios: Vec<ScenarioVariant>,
}

impl RoiReport {
    pub fn total_ai_monthly_cost(&self) -> f64 {
        self.costs.total()
    }

    /// ROI ratio for display, "—" when not computable
    pub fn roi_ratio_label(&self) -> String {
        format_ratio(self.roi_ratio)
    }
}

pub fn format_ratio(ratio: Option<f64>) -> String {
    match ratio {
        Some(r) => format!("{:.2}x", r),
        None => "—".to_string(),
    }
}

fn productivity_value(time_saved_minutes: f64, monthly_requests: f64, hourly_rate: f64) -> f64 {
    finite((time_saved_minutes / 60.0) * monthly_requests * hourly_rate)
}

/// ROI with pillars derived from the parameters
pub fn compute_roi(params: &RoiParameters) -> RoiReport {
    compute_roi_with_cost(params, AiOperatingCost::from_parameters(params))
}

/// ROI against an externally supplied monthly AI operating cost.
pub fn compute_roi_with_cost(
    params: &RoiParameters,
    operating_cost: AiOperatingCost,
) -> RoiReport {
    let user_count = amount(params.user_count);
    let requests_per_user = amount(params.requests_per_user_per_month);
    let time_saved = amount(params.time_saved_per_request_minutes);
    let hourly_rate = amount(params.employee_hourly_rate);

    let monthly_requests = finite(user_count * requests_per_user);
    let costs = operating_cost.breakdown();
    let total_cost = costs.total();

    let monthly_productivity_value = productivity_value(time_saved, monthly_requests, hourly_rate);
    let net_monthly_gain = finite(monthly_productivity_value - total_cost);

    let cost_series = linear_series(total_cost);
    let value_series = linear_series(monthly_productivity_value);
    let projection: Vec<ProjectionPoint> = cost_series
        .iter()
        .zip(value_series.iter())
        .enumerate()
        .map(|(i, (cost, value))| ProjectionPoint {
            period_label: period_label(i),
            cumulative_cost: *cost,
            cumulative_value: *value,
            cumulative_net_gain: finite(value - cost),
        })
        .collect();

    let break_even_month = projection
        .iter()
        .position(|p| p.cumulative_value > 0.0 && p.cumulative_net_gain >= 0.0)
        .map(|i| i + 1);
    let annual_net_gain = projection
        .last()
        .map(|p| p.cumulative_net_gain)
        .unwrap_or_default();

    let scenarios = SCENARIO_PROFILES
        .iter()
        .map(|profile| {
            let scenario_time_saved = finite(time_saved * profile.time_saved_factor);
            let effective_users = user_count * profile.adoption_factor;
            let scenario_requests = finite(effective_users * requests_per_user);
            let monthly_value =
                productivity_value(scenario_time_saved, scenario_requests, hourly_rate);
            let monthly_cost = operating_cost.scaled(profile.adoption_factor).total();

            ScenarioVariant {
                name: profile.name,
                time_saved_minutes: scenario_time_saved,
                effective_users,
                monthly_value,
                monthly_cost,
                net_monthly_gain: finite(monthly_value - monthly_cost),
                roi_ratio: ratio(monthly_value, monthly_cost),
            }
        })
        .collect();

    RoiReport {
        parameters: params.clone(),
        monthly_requests,
        hours_saved_per_month: finite((time_saved / 60.0) * monthly_requests),
        monthly_productivity_value,
        net_monthly_gain,
        roi_ratio: ratio(monthly_productivity_value, total_cost),
        cost_per_user: safe_div(total_cost, user_count),
        annual_net_gain,
        break_even_month,
        costs,
        projection,
        scenarios,
    }
}
