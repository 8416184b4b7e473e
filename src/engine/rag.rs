use crate::catalog::{self, ModelRate};
use crate::engine::{
    accrual_series, amount, finite, percent, period_label, positive_or, safe_div, CostBreakdown,
};
use crate::normalize::lenient;
use serde::{Deserialize, Serialize};

/// Chunk size used when the configured one is zero or invalid
pub const DEFAULT_CHUNK_SIZE_TOKENS: f64 = 500.0;

/// float32 vectors
const BYTES_PER_DIMENSION: f64 = 4.0;
const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;
const TOKENS_PER_MILLION: f64 = 1_000_000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildParameters {
    #[serde(deserialize_with = "lenient")]
    pub document_count: f64,
    #[serde(deserialize_with = "lenient")]
    pub tokens_per_document: f64,
    #[serde(deserialize_with = "lenient")]
    pub parsing_cost_per_document: f64,
    #[serde(deserialize_with = "lenient")]
    pub chunk_size_tokens: f64,
    #[serde(deserialize_with = "lenient")]
    pub overlap_percent: f64,
    #[serde(deserialize_with = "lenient")]
    pub metadata_overhead_percent: f64,
    pub embedding_model_id: String,
}

impl Default for BuildParameters {
    fn default() -> Self {
        Self {
            document_count: 10_000.0,
            tokens_per_document: 1_000.0,
            parsing_cost_per_document: 0.01,
            chunk_size_tokens: DEFAULT_CHUNK_SIZE_TOKENS,
            overlap_percent: 20.0,
            metadata_overhead_percent: 20.0,
            embedding_model_id: "text-embedding-3-small".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunParameters {
    #[serde(deserialize_with = "lenient")]
    pub queries_per_month: f64,
    #[serde(deserialize_with = "lenient")]
    pub avg_query_tokens: f64,
    #[serde(deserialize_with = "lenient")]
    pub retrieved_chunks_per_query: f64,
    #[serde(deserialize_with = "lenient")]
    pub avg_answer_tokens: f64,
    #[serde(deserialize_with = "lenient")]
    pub cache_hit_rate_percent: f64,
    #[serde(deserialize_with = "lenient")]
    pub managed_db_cost_per_thousand_vectors: f64,
    pub reranker_enabled: bool,
    #[serde(deserialize_with = "lenient")]
    pub reranker_cost_per_thousand: f64,
    pub inference_model_id: String,
}

impl Default for RunParameters {
    fn default() -> Self {
        Self {
            queries_per_month: 5_000.0,
            avg_query_tokens: 50.0,
            retrieved_chunks_per_query: 5.0,
            avg_answer_tokens: 300.0,
            cache_hit_rate_percent: 20.0,
            managed_db_cost_per_thousand_vectors: 0.10,
            reranker_enabled: false,
            reranker_cost_per_thousand: 2.0,
            inference_model_id: "gpt-4o-mini".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernParameters {
    #[serde(deserialize_with = "lenient")]
    pub monitoring_cost_per_thousand: f64,
    #[serde(deserialize_with = "lenient")]
    pub eval_runs_per_month: f64,
    #[serde(deserialize_with = "lenient")]
    pub eval_tokens_per_run: f64,
    #[serde(deserialize_with = "lenient")]
    pub human_review_hours_per_month: f64,
    #[serde(deserialize_with = "lenient")]
    pub human_hourly_rate: f64,
    #[serde(deserialize_with = "lenient")]
    pub reindex_frequency_per_year: f64,
}

impl Default for GovernParameters {
    fn default() -> Self {
        Self {
            monitoring_cost_per_thousand: 0.50,
            eval_runs_per_month: 4.0,
            eval_tokens_per_run: 200_000.0,
            human_review_hours_per_month: 10.0,
            human_hourly_rate: 60.0,
            reindex_frequency_per_year: 4.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RagParameters {
    pub build: BuildParameters,
    pub run: RunParameters,
    pub govern: GovernParameters,
}

/// One-time ingest phase
#[derive(Debug, Clone, Serialize)]
pub struct BuildPhase {
    pub chunk_size_tokens: f64,
    pub effective_tokens: f64,
    pub total_chunks: f64,
    pub storage_bytes: f64,
    pub storage_gb: f64,
    /// `parsing` + `embedding`
    pub costs: CostBreakdown,
}

/// Monthly operations phase
#[derive(Debug, Clone, Serialize)]
pub struct RunPhase {
    pub effective_queries: f64,
    pub tokens_in_per_query: f64,
    /// `query_embedding` + `vector_db` + `reranking` + `inference`
    pub costs: CostBreakdown,
    pub unit_cost_per_interaction: f64,
    pub cost_per_thousand_queries: f64,
}

/// Monthly quality and labour phase
#[derive(Debug, Clone, Serialize)]
pub struct GovernPhase {
    /// `monitoring` + `evaluation` + `human_review` + `reindexing`
    pub costs: CostBreakdown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RagPoint {
    pub period_label: String,
    pub cumulative_setup: f64,
    pub cumulative_operations: f64,
    pub cumulative_governance: f64,
    pub cumulative_total: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RagReport {
    pub parameters: RagParameters,
    pub embedding_model: &'static ModelRate,
    pub inference_model: &'static ModelRate,
    pub build: BuildPhase,
    pub run: RunPhase,
    pub govern: GovernPhase,
    pub setup_cost_per_document: f64,
    pub annualized_total: f64,
    pub projection: Vec<RagPoint>,
}

impl RagReport {
    pub fn one_time_setup_total(&self) -> f64 {
        self.build.costs.total()
    }

    pub fn monthly_ops_total(&self) -> f64 {
        self.run.costs.total()
    }

    pub fn monthly_governance_total(&self) -> f64 {
        self.govern.costs.total()
    }
}

fn compute_build(params: &BuildParameters, embedding: &ModelRate) -> BuildPhase {
    let document_count = amount(params.document_count);
    let chunk_size_tokens = positive_or(params.chunk_size_tokens, DEFAULT_CHUNK_SIZE_TOKENS);

    let effective_tokens = finite(
        (document_count * amount(params.tokens_per_document))
            * (1.0 + amount(params.overlap_percent) / 100.0),
    );
    let total_chunks = finite((effective_tokens / chunk_size_tokens).ceil());

    let parsing_cost = document_count * amount(params.parsing_cost_per_document);
    let embedding_cost = (effective_tokens / TOKENS_PER_MILLION) * embedding.embedding_rate();

    let storage_bytes = finite(
        total_chunks
            * f64::from(embedding.dimension())
            * BYTES_PER_DIMENSION
            * (1.0 + amount(params.metadata_overhead_percent) / 100.0),
    );

    BuildPhase {
        chunk_size_tokens,
        effective_tokens,
        total_chunks,
        storage_bytes,
        storage_gb: storage_bytes / BYTES_PER_GB,
        costs: CostBreakdown::new(&[("parsing", parsing_cost), ("embedding", embedding_cost)]),
    }
}

fn compute_run(
    params: &RunParameters,
    build: &BuildPhase,
    embedding: &ModelRate,
    inference: &ModelRate,
) -> RunPhase {
    let queries = amount(params.queries_per_month);
    let query_tokens = amount(params.avg_query_tokens);

    let query_embedding_cost =
        (queries * query_tokens / TOKENS_PER_MILLION) * embedding.embedding_rate();
    let vector_db_cost =
        (build.total_chunks / 1000.0) * amount(params.managed_db_cost_per_thousand_vectors);
    let rerank_cost = if params.reranker_enabled {
        (queries / 1000.0) * amount(params.reranker_cost_per_thousand)
    } else {
        0.0
    };

    // Cache hits skip LLM inference entirely
    let effective_queries =
        finite(queries * (1.0 - percent(params.cache_hit_rate_percent) / 100.0));
    let tokens_in_per_query = finite(
        query_tokens + amount(params.retrieved_chunks_per_query) * build.chunk_size_tokens,
    );
    let inference_cost = (effective_queries * tokens_in_per_query / TOKENS_PER_MILLION)
        * inference.input_rate()
        + (effective_queries * amount(params.avg_answer_tokens) / TOKENS_PER_MILLION)
            * inference.output_rate();

    let costs = CostBreakdown::new(&[
        ("query_embedding", query_embedding_cost),
        ("vector_db", vector_db_cost),
        ("reranking", rerank_cost),
        ("inference", inference_cost),
    ]);

    RunPhase {
        effective_queries,
        tokens_in_per_query,
        unit_cost_per_interaction: safe_div(costs.total(), queries),
        cost_per_thousand_queries: finite(safe_div(costs.total(), queries) * 1000.0),
        costs,
    }
}

fn compute_govern(
    params: &GovernParameters,
    run: &RunParameters,
    setup_total: f64,
    inference: &ModelRate,
) -> GovernPhase {
    let monitoring_cost =
        (amount(run.queries_per_month) / 1000.0) * amount(params.monitoring_cost_per_thousand);
    // Evaluation runs are billed at the inference model's input rate
    let eval_cost = (amount(params.eval_runs_per_month) * amount(params.eval_tokens_per_run)
        / TOKENS_PER_MILLION)
        * inference.input_rate();
    let human_cost =
        amount(params.human_review_hours_per_month) * amount(params.human_hourly_rate);
    // Each re-index is priced as a full repeat of the one-time setup
    let reindex_cost = setup_total * (amount(params.reindex_frequency_per_year) / 12.0);

    GovernPhase {
        costs: CostBreakdown::new(&[
            ("monitoring", monitoring_cost),
            ("evaluation", eval_cost),
            ("human_review", human_cost),
            ("reindexing", reindex_cost),
        ]),
    }
}

/// Compute the build / run / govern lifecycle of a RAG system and its
/// 12-month cumulative cost.
pub fn compute_rag(params: &RagParameters) -> RagReport {
    let embedding_model = catalog::embedding_model(&params.build.embedding_model_id);
    let inference_model = catalog::inference_model(&params.run.inference_model_id);

    let build = compute_build(&params.build, embedding_model);
    let run = compute_run(&params.run, &build, embedding_model, inference_model);
    let govern = compute_govern(&params.govern, &params.run, build.costs.total(), inference_model);

    let setup_total = build.costs.total();
    let ops_total = run.costs.total();
    let governance_total = govern.costs.total();
    let annualized_total = finite(setup_total + 12.0 * ops_total + 12.0 * governance_total);

    let operations_series = accrual_series(0.0, ops_total);
    let governance_series = accrual_series(0.0, governance_total);
    let projection = operations_series
        .iter()
        .zip(governance_series.iter())
        .enumerate()
        .map(|(i, (ops, gov))| RagPoint {
            period_label: period_label(i),
            cumulative_setup: setup_total,
            cumulative_operations: *ops,
            cumulative_governance: *gov,
            cumulative_total: finite(setup_total + ops + gov),
        })
        .collect();

    RagReport {
        parameters: params.clone(),
        embedding_model,
        inference_model,
        setup_cost_per_document: safe_div(setup_total, amount(params.build.document_count)),
        annualized_total,
        projection,
        build,
        run,
        govern,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9 * a.abs().max(1.0)
    }

    #[test]
    fn test_build_phase() {
        let report = compute_rag(&RagParameters::default());

        // 10k docs * 1k tokens * 1.2 overlap
        assert!(close(report.build.effective_tokens, 12_000_000.0));
        assert_eq!(report.build.total_chunks, 24_000.0);
        assert!(close(report.build.costs.get("parsing"), 100.0));
        assert!(close(report.build.costs.get("embedding"), 12.0 * 0.02));
        assert!(close(report.one_time_setup_total(), 100.0 + 0.24));

        // 24k chunks * 1536 dims * 4 bytes * 1.2 metadata
        assert!(close(report.build.storage_bytes, 24_000.0 * 1536.0 * 4.0 * 1.2));
        assert!(report.build.storage_gb > 0.16 && report.build.storage_gb < 0.17);
    }

    #[test]
    fn test_cache_hits_reduce_inference_queries() {
        let mut params = RagParameters::default();
        params.run.queries_per_month = 5000.0;
        params.run.cache_hit_rate_percent = 20.0;

        let report = compute_rag(&params);
        assert!(close(report.run.effective_queries, 4000.0));

        // 50 query tokens + 5 chunks * 500 tokens
        assert_eq!(report.run.tokens_in_per_query, 2550.0);
        let expected = (4000.0 * 2550.0 / 1e6) * 0.15 + (4000.0 * 300.0 / 1e6) * 0.60;
        assert!(close(report.run.costs.get("inference"), expected));
    }

    #[test]
    fn test_reranker_toggle() {
        let mut params = RagParameters::default();
        assert_eq!(compute_rag(&params).run.costs.get("reranking"), 0.0);

        params.run.reranker_enabled = true;
        let report = compute_rag(&params);
        assert!(close(report.run.costs.get("reranking"), 5.0 * 2.0));
    }

    #[test]
    fn test_annualized_total_identity() {
        let report = compute_rag(&RagParameters::default());
        let expected = report.one_time_setup_total()
            + 12.0 * report.monthly_ops_total()
            + 12.0 * report.monthly_governance_total();
        assert!(close(report.annualized_total, expected));
    }

    #[test]
    fn test_projection_follows_setup_then_accrual() {
        let report = compute_rag(&RagParameters::default());
        let monthly = report.monthly_ops_total() + report.monthly_governance_total();

        assert_eq!(report.projection.len(), 12);
        assert!(close(report.projection[0].cumulative_total, report.one_time_setup_total()));
        assert!(close(
            report.projection[11].cumulative_total,
            report.one_time_setup_total() + monthly * 11.0
        ));
    }

    #[test]
    fn test_zero_queries_has_zero_unit_cost() {
        let mut params = RagParameters::default();
        params.run.queries_per_month = 0.0;

        let report = compute_rag(&params);
        assert_eq!(report.run.unit_cost_per_interaction, 0.0);
        assert_eq!(report.run.cost_per_thousand_queries, 0.0);
        assert!(report.annualized_total.is_finite());
    }

    #[test]
    fn test_invalid_chunk_size_uses_default() {
        let mut params = RagParameters::default();
        params.build.chunk_size_tokens = 0.0;
        let report = compute_rag(&params);
        assert_eq!(report.build.chunk_size_tokens, DEFAULT_CHUNK_SIZE_TOKENS);
        assert_eq!(report.build.total_chunks, 24_000.0);

        params.build.chunk_size_tokens = -20.0;
        assert_eq!(compute_rag(&params).build.chunk_size_tokens, DEFAULT_CHUNK_SIZE_TOKENS);
    }

    #[test]
    fn test_governance_components() {
        let report = compute_rag(&RagParameters::default());
        let costs = &report.govern.costs;

        assert!(close(costs.get("monitoring"), 5.0 * 0.5));
        assert!(close(costs.get("evaluation"), 0.8 * 0.15));
        assert!(close(costs.get("human_review"), 600.0));
        assert!(close(costs.get("reindexing"), report.one_time_setup_total() * 4.0 / 12.0));
    }

    #[test]
    fn test_negative_inputs_never_produce_negative_costs() {
        let mut params = RagParameters::default();
        params.build.document_count = -100.0;
        params.run.queries_per_month = -5.0;
        params.run.cache_hit_rate_percent = 150.0;
        params.govern.human_hourly_rate = f64::NAN;

        let report = compute_rag(&params);
        for (_, value) in report
            .build
            .costs
            .components()
            .iter()
            .chain(report.run.costs.components())
            .chain(report.govern.costs.components())
        {
            assert!(*value >= 0.0);
        }
        assert!(report.annualized_total >= 0.0);
    }
}
