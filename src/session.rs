//! Current parameters for an interactive session
//!
//! The engines are pure; `Session` is the one place parameters change. Field
//! updates round-trip through `serde_json` so they get the same lenient
//! normalisation as configuration files.

use crate::config::Config;
use crate::engine::{
    compute_rag, compute_roi, compute_roi_with_cost, compute_translation, AiOperatingCost,
    CostSource, RagParameters, RoiParameters, Scenario, ScenarioReport, TranslationParameters,
};
use crate::error::AppError;
use serde_json::Value;
use tracing::debug;

const COST_SOURCE_FIELD: &str = "cost_source";

#[derive(Debug, Clone, Default)]
pub struct Session {
    defaults: Defaults,
    pub translation: TranslationParameters,
    pub rag: RagParameters,
    pub roi: RoiParameters,
    pub roi_cost_source: CostSource,
}

#[derive(Debug, Clone, Default)]
struct Defaults {
    translation: TranslationParameters,
    rag: RagParameters,
    roi: RoiParameters,
}

impl Session {
    pub fn new(translation: TranslationParameters, rag: RagParameters, roi: RoiParameters) -> Self {
        Self {
            defaults: Defaults {
                translation: translation.clone(),
                rag: rag.clone(),
                roi: roi.clone(),
            },
            translation,
            rag,
            roi,
            roi_cost_source: CostSource::default(),
        }
    }

    /// Start from the parameter sets in the loaded configuration
    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.translation.clone(), cfg.rag.clone(), cfg.roi.clone())
    }

    /// Recompute a scenario from the current parameters
    pub fn report(&self, scenario: Scenario) -> ScenarioReport {
        match scenario {
            Scenario::Translation => {
                ScenarioReport::Translation(compute_translation(&self.translation))
            }
            Scenario::Rag => ScenarioReport::Rag(compute_rag(&self.rag)),
            Scenario::Roi => ScenarioReport::Roi(match self.roi_cost_source {
                CostSource::Parameters => compute_roi(&self.roi),
                CostSource::Translation => compute_roi_with_cost(
                    &self.roi,
                    AiOperatingCost::from_translation(&compute_translation(&self.translation)),
                ),
                CostSource::Rag => compute_roi_with_cost(
                    &self.roi,
                    AiOperatingCost::from_rag(&compute_rag(&self.rag)),
                ),
            }),
        }
    }

    /// Set `<scenario>.<field>[.<field>...]` from raw user text and return the
    /// recomputed report
    ///
    /// Numbers accept the same currency/grouping noise as config files;
    /// unparseable numbers fall back the way normalisation does. Unknown
    /// scenarios, unknown fields and whole parameter groups are rejected.
    pub fn set(&mut self, path: &str, raw: &str) -> Result<ScenarioReport, AppError> {
        let (scenario_name, field_path) = path.split_once('.').ok_or_else(|| {
            AppError::InvalidParameter(format!("expected <scenario>.<field>, got '{}'", path))
        })?;
        let scenario: Scenario = scenario_name.parse().map_err(AppError::InvalidParameter)?;

        if scenario == Scenario::Roi && field_path == COST_SOURCE_FIELD {
            self.roi_cost_source = raw.parse().map_err(AppError::InvalidParameter)?;
            debug!(cost_source = self.roi_cost_source.as_str(), "ROI cost source changed");
            return Ok(self.report(scenario));
        }

        let mut value = match scenario {
            Scenario::Translation => serde_json::to_value(&self.translation)?,
            Scenario::Rag => serde_json::to_value(&self.rag)?,
            Scenario::Roi => serde_json::to_value(&self.roi)?,
        };

        let slot = field_path
            .split('.')
            .try_fold(&mut value, |node, key| node.get_mut(key))
            .ok_or_else(|| AppError::InvalidParameter(format!("unknown field '{}'", path)))?;
        *slot = coerce(slot, raw, path)?;

        match scenario {
            Scenario::Translation => self.translation = serde_json::from_value(value)?,
            Scenario::Rag => self.rag = serde_json::from_value(value)?,
            Scenario::Roi => self.roi = serde_json::from_value(value)?,
        }

        debug!(field = path, value = raw, "Parameter updated");
        Ok(self.report(scenario))
    }

    /// Restore a scenario's parameters to the session's starting values
    pub fn reset(&mut self, scenario: Scenario) -> ScenarioReport {
        match scenario {
            Scenario::Translation => self.translation = self.defaults.translation.clone(),
            Scenario::Rag => self.rag = self.defaults.rag.clone(),
            Scenario::Roi => {
                self.roi = self.defaults.roi.clone();
                self.roi_cost_source = CostSource::default();
            }
        }
        self.report(scenario)
    }

    /// Current parameters of a scenario as JSON
    pub fn parameters(&self, scenario: Scenario) -> Result<Value, AppError> {
        let value = match scenario {
            Scenario::Translation => serde_json::to_value(&self.translation)?,
            Scenario::Rag => serde_json::to_value(&self.rag)?,
            Scenario::Roi => serde_json::to_value(&self.roi)?,
        };
        Ok(value)
    }
}

/// Build the replacement JSON value for a field, based on the shape of the
/// value it replaces
fn coerce(current: &Value, raw: &str, path: &str) -> Result<Value, AppError> {
    let raw = raw.trim();
    match current {
        Value::Bool(_) => parse_bool(raw).map(Value::Bool).ok_or_else(|| {
            AppError::InvalidParameter(format!("'{}' expects true or false, got '{}'", path, raw))
        }),
        Value::Object(_) | Value::Array(_) => Err(AppError::InvalidParameter(format!(
            "'{}' is a group of parameters, set one of its fields",
            path
        ))),
        // numbers (and unset optional numbers) go through lenient normalisation
        Value::Number(_) | Value::Null | Value::String(_) => Ok(Value::String(raw.to_string())),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::translation::QualityTier;

    fn roi_report(report: ScenarioReport) -> crate::engine::RoiReport {
        match report {
            ScenarioReport::Roi(r) => r,
            other => panic!("expected ROI report, got {:?}", other.scenario()),
        }
    }

    #[test]
    fn test_set_number_with_currency() {
        let mut session = Session::default();
        let report = roi_report(session.set("roi.employee_hourly_rate", "$85.50").unwrap());

        assert_eq!(session.roi.employee_hourly_rate, 85.5);
        assert_eq!(report.parameters.employee_hourly_rate, 85.5);
    }

    #[test]
    fn test_set_garbage_number_falls_back() {
        let mut session = Session::default();
        session.set("roi.user_count", "lots").unwrap();
        assert_eq!(session.roi.user_count, 0.0);
    }

    #[test]
    fn test_set_nested_field() {
        let mut session = Session::default();
        session.set("rag.run.reranker_enabled", "yes").unwrap();
        session.set("rag.build.chunk_size_tokens", "1,000").unwrap();

        assert!(session.rag.run.reranker_enabled);
        assert_eq!(session.rag.build.chunk_size_tokens, 1000.0);
    }

    #[test]
    fn test_set_enum_and_optional_fields() {
        let mut session = Session::default();
        session.set("translation.quality_tier", "full").unwrap();
        session.set("translation.base_cost_per_thousand_chars", "0.02").unwrap();

        assert_eq!(session.translation.quality_tier, QualityTier::Full);
        assert_eq!(session.translation.base_cost_per_thousand_chars, Some(0.02));
    }

    #[test]
    fn test_rejects_unknown_names() {
        let mut session = Session::default();
        assert!(matches!(
            session.set("payroll.user_count", "1"),
            Err(AppError::InvalidParameter(_))
        ));
        assert!(matches!(
            session.set("roi.head_count", "1"),
            Err(AppError::InvalidParameter(_))
        ));
        assert!(matches!(session.set("roi", "1"), Err(AppError::InvalidParameter(_))));
        assert!(matches!(session.set("rag.build", "1"), Err(AppError::InvalidParameter(_))));
        assert!(matches!(
            session.set("rag.run.reranker_enabled", "maybe"),
            Err(AppError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_reset_restores_starting_values() {
        let mut session = Session::default();
        session.set("roi.user_count", "999").unwrap();
        session.set("roi.cost_source", "rag").unwrap();

        session.reset(Scenario::Roi);
        assert_eq!(session.roi, RoiParameters::default());
        assert_eq!(session.roi_cost_source, CostSource::Parameters);
    }

    #[test]
    fn test_cost_source_switch() {
        let mut session = Session::default();
        let from_params = roi_report(session.report(Scenario::Roi));
        let from_rag = roi_report(session.set("roi.cost_source", "rag").unwrap());

        let rag = compute_rag(&session.rag);
        let expected = AiOperatingCost::from_rag(&rag).total();
        assert!((from_rag.total_ai_monthly_cost() - expected).abs() < 1e-9);
        assert!(
            (from_params.total_ai_monthly_cost() - from_rag.total_ai_monthly_cost()).abs() > 1e-9
        );
    }
}
