use crate::catalog::{self, ModelRate};
use crate::engine::{accrual_series, amount, finite, period_label, safe_div, CostBreakdown};
use crate::normalize::{lenient, lenient_opt};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Valid language multipliers; anything else snaps to 1
pub const LANGUAGE_MULTIPLIERS: [f64; 4] = [1.0, 3.0, 10.0, 20.0];

/// Share of translated characters that goes through human review
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    None,
    #[default]
    Basic,
    Full,
}

impl QualityTier {
    pub fn review_fraction(&self) -> f64 {
        match self {
            QualityTier::None => 0.0,
            QualityTier::Basic => 0.03,
            QualityTier::Full => 0.20,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityTier::None => "none",
            QualityTier::Basic => "basic",
            QualityTier::Full => "full",
        }
    }

    /// Unknown labels mean "no review"
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "basic" => QualityTier::Basic,
            "full" => QualityTier::Full,
            _ => QualityTier::None,
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for QualityTier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(value.as_str().map(QualityTier::parse).unwrap_or(QualityTier::None))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationParameters {
    pub selected_model_id: String,
    #[serde(deserialize_with = "lenient")]
    pub characters_per_document: f64,
    #[serde(deserialize_with = "lenient")]
    pub document_count: f64,
    #[serde(deserialize_with = "lenient")]
    pub monthly_growth_percent: f64,
    #[serde(deserialize_with = "lenient")]
    pub language_multiplier: f64,
    pub quality_tier: QualityTier,
    /// Overrides the selected model's catalog rate when set
    #[serde(deserialize_with = "lenient_opt")]
    pub base_cost_per_thousand_chars: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub human_review_cost_per_thousand_chars: f64,
}

impl Default for TranslationParameters {
    fn default() -> Self {
        Self {
            selected_model_id: "gpt-4o-mini".to_string(),
            characters_per_document: 2500.0,
            document_count: 1000.0,
            monthly_growth_percent: 5.0,
            language_multiplier: 1.0,
            quality_tier: QualityTier::Basic,
            base_cost_per_thousand_chars: None,
            human_review_cost_per_thousand_chars: 0.05,
        }
    }
}

/// Snap a requested multiplier onto the valid tiers
pub fn resolve_language_multiplier(requested: f64) -> f64 {
    if LANGUAGE_MULTIPLIERS.contains(&requested) {
        requested
    } else {
        1.0
    }
}

pub fn language_scope_label(multiplier: f64) -> &'static str {
    match multiplier as u32 {
        3 => "Core markets (3 languages)",
        10 => "Regional (10 languages)",
        20 => "Global (20 languages)",
        _ => "Single language",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslationPoint {
    pub period_label: String,
    pub cumulative_api: f64,
    pub cumulative_review: f64,
    pub cumulative_total: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TranslationReport {
    pub parameters: TranslationParameters,
    pub model: &'static ModelRate,
    pub base_cost_per_thousand_chars: f64,
    pub language_multiplier: f64,
    pub language_scope: &'static str,
    pub review_fraction: f64,
    pub base_characters: f64,
    pub total_initial_characters: f64,
    pub initial_review_characters: f64,
    /// One-time migration: `api` + `human_review`
    pub setup: CostBreakdown,
    pub monthly_new_documents: f64,
    pub monthly_new_characters: f64,
    /// Recurring: `api` + `human_review`
    pub monthly: CostBreakdown,
    pub cost_per_document: f64,
    pub projection: Vec<TranslationPoint>,
    pub total_year1: f64,
}

impl TranslationReport {
    pub fn initial_api_cost(&self) -> f64 {
        self.setup.get("api")
    }

    pub fn initial_review_cost(&self) -> f64 {
        self.setup.get("human_review")
    }

    pub fn initial_total(&self) -> f64 {
        self.setup.total()
    }

    pub fn monthly_api_cost(&self) -> f64 {
        self.monthly.get("api")
    }

    pub fn monthly_review_cost(&self) -> f64 {
        self.monthly.get("human_review")
    }

    pub fn monthly_total(&self) -> f64 {
        self.monthly.total()
    }
}

/// Compute one-time migration cost, recurring monthly cost and the 12-month
/// cumulative spend for multi-language document translation.
pub fn compute_translation(params: &TranslationParameters) -> TranslationReport {
    let model = catalog::translation_model(&params.selected_model_id);

    let characters_per_document = amount(params.characters_per_document);
    let document_count = amount(params.document_count);
    let growth_percent = amount(params.monthly_growth_percent);
    let language_multiplier = resolve_language_multiplier(params.language_multiplier);
    let base_rate = amount(
        params
            .base_cost_per_thousand_chars
            .unwrap_or_else(|| model.cost_per_million_chars() / 1000.0),
    );
    let review_rate = amount(params.human_review_cost_per_thousand_chars);
    let review_fraction = params.quality_tier.review_fraction();

    // Initial migration
    let base_characters = finite(document_count * characters_per_document);
    let total_initial_characters = finite(base_characters * language_multiplier);
    let initial_review_characters = finite(total_initial_characters * review_fraction);
    let setup = CostBreakdown::new(&[
        ("api", (total_initial_characters / 1000.0) * base_rate),
        ("human_review", (initial_review_characters / 1000.0) * review_rate),
    ]);

    // Recurring growth
    let monthly_new_documents = finite(document_count * (growth_percent / 100.0));
    let monthly_new_characters =
        finite(monthly_new_documents * characters_per_document * language_multiplier);
    let monthly = CostBreakdown::new(&[
        ("api", (monthly_new_characters / 1000.0) * base_rate),
        ("human_review", (monthly_new_characters * review_fraction / 1000.0) * review_rate),
    ]);

    let api_series = accrual_series(setup.get("api"), monthly.get("api"));
    let review_series = accrual_series(setup.get("human_review"), monthly.get("human_review"));
    let projection: Vec<TranslationPoint> = api_series
        .iter()
        .zip(review_series.iter())
        .enumerate()
        .map(|(i, (api, review))| TranslationPoint {
            period_label: period_label(i),
            cumulative_api: *api,
            cumulative_review: *review,
            cumulative_total: finite(api + review),
        })
        .collect();

    let total_year1 = projection
        .last()
        .map(|p| p.cumulative_total)
        .unwrap_or_default();

    TranslationReport {
        parameters: params.clone(),
        model,
        base_cost_per_thousand_chars: base_rate,
        language_multiplier,
        language_scope: language_scope_label(language_multiplier),
        review_fraction,
        base_characters,
        total_initial_characters,
        initial_review_characters,
        cost_per_document: safe_div(setup.total(), document_count),
        setup,
        monthly_new_documents,
        monthly_new_characters,
        monthly,
        projection,
        total_year1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_params() -> TranslationParameters {
        TranslationParameters {
            selected_model_id: "gpt-4o-mini".to_string(),
            characters_per_document: 2500.0,
            document_count: 1000.0,
            monthly_growth_percent: 5.0,
            language_multiplier: 1.0,
            quality_tier: QualityTier::Basic,
            base_cost_per_thousand_chars: Some(0.00015),
            human_review_cost_per_thousand_chars: 0.05,
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_reference_arithmetic() {
        let report = compute_translation(&reference_params());

        assert_eq!(report.total_initial_characters, 2_500_000.0);
        assert!(close(report.initial_api_cost(), 0.375));
        assert!(close(report.initial_review_characters, 75_000.0));
        assert!(close(report.initial_review_cost(), 3.75));
        assert!(close(report.initial_total(), 4.125));

        assert!(close(report.monthly_new_documents, 50.0));
        assert!(close(report.monthly_new_characters, 125_000.0));
        assert!(close(report.monthly_api_cost(), 0.01875));
        assert!(close(report.monthly_review_cost(), 0.1875));
    }

    #[test]
    fn test_projection_starts_at_setup() {
        let report = compute_translation(&reference_params());

        assert_eq!(report.projection.len(), 12);
        assert!(close(report.projection[0].cumulative_total, report.initial_total()));
        assert!(close(
            report.projection[11].cumulative_total,
            report.initial_total() + report.monthly_total() * 11.0
        ));
        assert_eq!(report.total_year1, report.projection[11].cumulative_total);
        assert_eq!(report.projection[3].period_label, "Month 4");
    }

    #[test]
    fn test_language_multiplier_snaps() {
        assert_eq!(resolve_language_multiplier(3.0), 3.0);
        assert_eq!(resolve_language_multiplier(20.0), 20.0);
        assert_eq!(resolve_language_multiplier(7.0), 1.0);
        assert_eq!(resolve_language_multiplier(0.0), 1.0);
        assert_eq!(resolve_language_multiplier(f64::NAN), 1.0);

        let mut params = reference_params();
        params.language_multiplier = 10.0;
        let report = compute_translation(&params);
        assert_eq!(report.total_initial_characters, 25_000_000.0);
        assert_eq!(report.language_scope, "Regional (10 languages)");
    }

    #[test]
    fn test_quality_tiers() {
        assert_eq!(QualityTier::None.review_fraction(), 0.0);
        assert_eq!(QualityTier::Basic.review_fraction(), 0.03);
        assert_eq!(QualityTier::Full.review_fraction(), 0.20);
        assert_eq!(QualityTier::parse("FULL"), QualityTier::Full);
        assert_eq!(QualityTier::parse("premium"), QualityTier::None);

        let mut params = reference_params();
        params.quality_tier = QualityTier::None;
        let report = compute_translation(&params);
        assert_eq!(report.initial_review_cost(), 0.0);
        assert_eq!(report.monthly_review_cost(), 0.0);
    }

    #[test]
    fn test_rate_derived_from_catalog() {
        let mut params = reference_params();
        params.base_cost_per_thousand_chars = None;
        params.selected_model_id = "deepl-pro".to_string();

        let report = compute_translation(&params);
        assert!(close(report.base_cost_per_thousand_chars, 0.025));
        assert!(close(report.initial_api_cost(), 2500.0 * 0.025));
    }

    #[test]
    fn test_zero_documents() {
        let mut params = reference_params();
        params.document_count = 0.0;

        let report = compute_translation(&params);
        assert_eq!(report.initial_total(), 0.0);
        assert_eq!(report.cost_per_document, 0.0);
        assert_eq!(report.total_year1, 0.0);
    }

    #[test]
    fn test_deserialize_malformed_fields() {
        let params: TranslationParameters = serde_json::from_value(serde_json::json!({
            "document_count": "1,000",
            "characters_per_document": "abc",
            "language_multiplier": "7",
            "quality_tier": 3
        }))
        .unwrap();

        assert_eq!(params.document_count, 1000.0);
        assert_eq!(params.characters_per_document, 0.0);
        assert_eq!(params.quality_tier, QualityTier::None);
        assert_eq!(compute_translation(&params).language_multiplier, 1.0);
        // untouched fields keep their defaults
        assert_eq!(params.human_review_cost_per_thousand_chars, 0.05);
    }
}
