// Cross-engine properties through the public API

use cost_projector::engine::translation::QualityTier;
use cost_projector::engine::{
    compute_rag, compute_roi, compute_roi_with_cost, compute_translation, AiOperatingCost,
    RagParameters, RoiParameters, TranslationParameters, PROJECTION_MONTHS,
};
use serde_json::{json, Value};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9 * a.abs().max(b.abs()).max(1.0)
}

fn all_finite(values: impl IntoIterator<Item = f64>) -> bool {
    values.into_iter().all(f64::is_finite)
}

// Non-finite floats serialize as null; only genuinely optional results may be null
fn assert_no_null_results(value: &Value, path: &str) {
    match value {
        Value::Null => panic!("{} is not a finite number", path),
        Value::Object(fields) => {
            for (key, field) in fields {
                if key == "parameters" || key == "roi_ratio" || key == "break_even_month" {
                    continue;
                }
                assert_no_null_results(field, &format!("{}.{}", path, key));
            }
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                assert_no_null_results(item, &format!("{}[{}]", path, i));
            }
        }
        _ => {}
    }
}

#[test]
fn test_translation_reference_chain() {
    let report = compute_translation(&TranslationParameters::default());

    assert!(close(report.total_initial_characters, 2_500_000.0));
    assert!(close(report.initial_api_cost(), 0.375));
    assert!(close(report.initial_review_cost(), 3.75));
    assert!(close(report.initial_total(), 4.125));
    assert!(close(report.monthly_new_documents, 50.0));
    assert!(close(report.monthly_api_cost(), 0.01875));
    assert!(close(report.monthly_review_cost(), 0.1875));

    assert_eq!(report.projection.len(), PROJECTION_MONTHS);
    assert!(close(report.projection[0].cumulative_total, report.initial_total()));
    assert!(close(
        report.projection[11].cumulative_total,
        report.initial_total() + 11.0 * report.monthly_total()
    ));
    assert_eq!(report.total_year1, report.projection[11].cumulative_total);
}

#[test]
fn test_translation_projection_never_decreases() {
    for tier in [QualityTier::None, QualityTier::Basic, QualityTier::Full] {
        for multiplier in [1.0, 3.0, 10.0, 20.0] {
            let report = compute_translation(&TranslationParameters {
                quality_tier: tier,
                language_multiplier: multiplier,
                ..TranslationParameters::default()
            });
            for pair in report.projection.windows(2) {
                assert!(pair[1].cumulative_total >= pair[0].cumulative_total);
                assert!(close(
                    pair[1].cumulative_total,
                    pair[1].cumulative_api + pair[1].cumulative_review
                ));
            }
        }
    }
}

#[test]
fn test_review_tier_ordering() {
    let cost = |tier| {
        compute_translation(&TranslationParameters {
            quality_tier: tier,
            ..TranslationParameters::default()
        })
        .initial_review_cost()
    };

    assert_eq!(cost(QualityTier::None), 0.0);
    assert!(cost(QualityTier::Basic) < cost(QualityTier::Full));
}

#[test]
fn test_garbage_parameters_are_neutralised() {
    let translation: TranslationParameters = serde_json::from_value(json!({
        "selected_model_id": "no-such-model",
        "characters_per_document": "lots",
        "document_count": "1,000",
        "monthly_growth_percent": null,
        "language_multiplier": 7,
        "quality_tier": "platinum"
    }))
    .unwrap();
    let report = compute_translation(&translation);

    assert_eq!(report.model.id, "gpt-4o-mini");
    assert_eq!(report.language_multiplier, 1.0);
    assert_eq!(report.review_fraction, 0.0);
    assert_eq!(report.initial_total(), 0.0);
    assert!(all_finite(report.projection.iter().map(|p| p.cumulative_total)));

    let rag: RagParameters = serde_json::from_value(json!({
        "build": {"document_count": "$-5", "chunk_size_tokens": "0"},
        "run": {"queries_per_month": "NaN", "cache_hit_rate_percent": "250%"}
    }))
    .unwrap();
    let report = compute_rag(&rag);
    assert_eq!(report.build.chunk_size_tokens, 500.0);
    assert_eq!(report.run.effective_queries, 0.0);
    assert_eq!(report.run.unit_cost_per_interaction, 0.0);
    assert_eq!(report.setup_cost_per_document, 0.0);
    assert!(all_finite(report.projection.iter().map(|p| p.cumulative_total)));
}

#[test]
fn test_overflowing_inputs_stay_finite() {
    let translation = compute_translation(&TranslationParameters {
        document_count: 1e200,
        characters_per_document: 1e200,
        quality_tier: QualityTier::None,
        ..TranslationParameters::default()
    });
    assert_eq!(translation.initial_review_cost(), 0.0);
    assert!(translation.initial_total().is_finite());
    assert!(translation.total_year1.is_finite());
    assert_no_null_results(&serde_json::to_value(&translation).unwrap(), "translation");

    let mut rag = RagParameters::default();
    rag.build.document_count = 1e200;
    rag.build.tokens_per_document = 1e200;
    rag.run.managed_db_cost_per_thousand_vectors = 0.0;
    let rag = compute_rag(&rag);
    assert_eq!(rag.run.costs.get("vector_db"), 0.0);
    assert!(rag.monthly_ops_total().is_finite());
    assert!(rag.annualized_total.is_finite());
    assert_no_null_results(&serde_json::to_value(&rag).unwrap(), "rag");

    let roi = compute_roi(&RoiParameters {
        user_count: 1e200,
        requests_per_user_per_month: 1e200,
        ..RoiParameters::default()
    });
    assert!(roi.net_monthly_gain.is_finite());
    assert_no_null_results(&serde_json::to_value(&roi).unwrap(), "roi");
}

#[test]
fn test_rag_annualized_identity() {
    let report = compute_rag(&RagParameters::default());
    let expected = report.one_time_setup_total()
        + 12.0 * (report.monthly_ops_total() + report.monthly_governance_total());

    assert!(close(report.annualized_total, expected));
    assert_eq!(report.projection.len(), PROJECTION_MONTHS);
    assert!(close(report.projection[0].cumulative_total, report.one_time_setup_total()));
}

#[test]
fn test_rag_reranker_only_adds_cost() {
    let mut params = RagParameters::default();
    let without = compute_rag(&params);
    params.run.reranker_enabled = true;
    let with = compute_rag(&params);

    assert_eq!(without.run.costs.get("reranking"), 0.0);
    assert!(with.run.costs.get("reranking") > 0.0);
    assert!(close(
        with.monthly_ops_total() - without.monthly_ops_total(),
        with.run.costs.get("reranking")
    ));
}

#[test]
fn test_roi_net_identity_for_any_cost_source() {
    let params = RoiParameters::default();
    let rag = compute_rag(&RagParameters::default());

    for report in [
        compute_roi(&params),
        compute_roi_with_cost(&params, AiOperatingCost::from_rag(&rag)),
    ] {
        assert!(close(
            report.net_monthly_gain,
            report.monthly_productivity_value - report.total_ai_monthly_cost()
        ));
        for (i, point) in report.projection.iter().enumerate() {
            let months = (i + 1) as f64;
            assert!(close(point.cumulative_net_gain, report.net_monthly_gain * months));
        }
    }
}

#[test]
fn test_roi_from_rag_uses_rag_totals() {
    let rag = compute_rag(&RagParameters::default());
    let cost = AiOperatingCost::from_rag(&rag);

    assert!(close(
        cost.total(),
        rag.monthly_ops_total() + rag.monthly_governance_total()
    ));
}

#[test]
fn test_roi_negative_when_costs_exceed_value() {
    let report = compute_roi(&RoiParameters {
        time_saved_per_request_minutes: 0.1,
        ..RoiParameters::default()
    });

    assert!(report.net_monthly_gain < 0.0);
    assert_eq!(report.break_even_month, None);
    assert!(report.roi_ratio.unwrap() < 1.0);
}

#[test]
fn test_conservative_overtakes_base_when_costs_dominate() {
    // Conservative nets less than Base Case only while
    // 0.3 * (inference + governance) < 0.58 * monthly value
    for time_saved in [0.05, 0.1, 0.12, 0.14, 0.5, 1.0, 10.0] {
        let params = RoiParameters {
            time_saved_per_request_minutes: time_saved,
            ..RoiParameters::default()
        };
        let cost = AiOperatingCost::from_parameters(&params);
        let report = compute_roi(&params);
        let conservative = &report.scenarios[0];
        let base = &report.scenarios[1];

        let below_base = 0.3 * (cost.inference + cost.governance)
            < 0.58 * report.monthly_productivity_value;
        assert_eq!(
            conservative.net_monthly_gain < base.net_monthly_gain,
            below_base,
            "time saved {}",
            time_saved
        );
    }

    let report = compute_roi(&RoiParameters {
        time_saved_per_request_minutes: 0.1,
        ..RoiParameters::default()
    });
    assert!(close(report.scenarios[0].net_monthly_gain, -966.16));
    assert!((report.scenarios[1].net_monthly_gain - -1083.493333).abs() < 1e-3);
    assert!(report.scenarios[0].net_monthly_gain > report.scenarios[1].net_monthly_gain);
}

#[test]
fn test_engines_are_idempotent() {
    let params = RagParameters::default();
    let a = serde_json::to_value(compute_rag(&params)).unwrap();
    let b = serde_json::to_value(compute_rag(&params)).unwrap();
    assert_eq!(a, b);

    let params = TranslationParameters {
        quality_tier: QualityTier::Full,
        language_multiplier: 3.0,
        ..TranslationParameters::default()
    };
    let a = serde_json::to_value(compute_translation(&params)).unwrap();
    let b = serde_json::to_value(compute_translation(&params)).unwrap();
    assert_eq!(a, b);
}
