use super::render::{breakdown_table, count, money, new_table, unit_money};
use anyhow::Result;
use colored::Colorize;
use comfy_table::Cell;
use cost_projector::engine::{compute_rag, RagParameters, RagReport};
use tracing::info;

/// Execute the rag command
pub fn execute(params: &RagParameters, json: bool) -> Result<()> {
    let report = compute_rag(params);
    info!(
        embedding_model = report.embedding_model.id,
        inference_model = report.inference_model.id,
        annualized_total = report.annualized_total,
        "RAG projection computed"
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render(&report);
    }
    Ok(())
}

pub fn render(report: &RagReport) {
    println!("{}", "RAG Lifecycle Cost Projection".green().bold());
    println!(
        "  {}: {} ({})",
        "Embedding".cyan(),
        report.embedding_model.display_name,
        report.embedding_model.rate_label()
    );
    println!(
        "  {}: {} ({})",
        "Inference".cyan(),
        report.inference_model.display_name,
        report.inference_model.rate_label()
    );
    println!();

    println!("{}", "Build (one-time)".bold());
    println!(
        "  {} effective tokens, {} chunks of {} tokens, {:.3} GB of vectors",
        count(report.build.effective_tokens),
        count(report.build.total_chunks),
        count(report.build.chunk_size_tokens),
        report.build.storage_gb
    );
    println!("{}", breakdown_table("BUILD", &report.build.costs));
    println!(
        "  {}: {}",
        "Setup Cost per Document".cyan(),
        unit_money(report.setup_cost_per_document)
    );
    println!();

    println!("{}", "Run (monthly)".bold());
    println!(
        "  {} billable queries, {} input tokens per query",
        count(report.run.effective_queries),
        count(report.run.tokens_in_per_query)
    );
    println!("{}", breakdown_table("RUN", &report.run.costs));
    println!(
        "  {}: {}   {}: {}",
        "Cost per Interaction".cyan(),
        unit_money(report.run.unit_cost_per_interaction),
        "Cost per 1K Queries".cyan(),
        money(report.run.cost_per_thousand_queries)
    );
    println!();

    println!("{}", "Govern (monthly)".bold());
    println!("{}", breakdown_table("GOVERN", &report.govern.costs));
    println!();

    let mut table = new_table(&["MONTH", "SETUP", "OPERATIONS", "GOVERNANCE", "CUMULATIVE TOTAL"]);
    for point in &report.projection {
        table.add_row(vec![
            Cell::new(&point.period_label),
            Cell::new(money(point.cumulative_setup)),
            Cell::new(money(point.cumulative_operations)),
            Cell::new(money(point.cumulative_governance)),
            Cell::new(money(point.cumulative_total)),
        ]);
    }
    println!("{}", "12-Month Cumulative Cost".bold());
    println!("{}", table);
    println!(
        "\n{}: {}",
        "Annualized Total".bold(),
        money(report.annualized_total).green()
    );
}
