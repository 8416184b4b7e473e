use super::render::{breakdown_table, count, money, new_table, percent, unit_money};
use anyhow::Result;
use colored::Colorize;
use comfy_table::Cell;
use cost_projector::engine::{compute_translation, TranslationParameters, TranslationReport};
use tracing::info;

/// Execute the translation command
pub fn execute(params: &TranslationParameters, json: bool) -> Result<()> {
    let report = compute_translation(params);
    info!(
        model = report.model.id,
        total_year1 = report.total_year1,
        "Translation projection computed"
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render(&report);
    }
    Ok(())
}

pub fn render(report: &TranslationReport) {
    println!("{}", "Translation Cost Projection".green().bold());
    println!(
        "  {}: {} ({})",
        "Model".cyan(),
        report.model.display_name,
        report.model.rate_label()
    );
    println!("  {}: {}", "Language Scope".cyan(), report.language_scope);
    println!(
        "  {}: {} ({} reviewed)",
        "Quality Tier".cyan(),
        report.parameters.quality_tier.as_str(),
        percent(report.review_fraction * 100.0)
    );
    println!(
        "  {}: {} characters ({} per 1K chars)",
        "Initial Backlog".cyan(),
        count(report.total_initial_characters),
        unit_money(report.base_cost_per_thousand_chars)
    );
    println!();

    println!("{}", breakdown_table("INITIAL SETUP", &report.setup));
    println!("{}", breakdown_table("MONTHLY RECURRING", &report.monthly));
    println!(
        "  {}: {} new documents / {} characters per month",
        "Growth".cyan(),
        count(report.monthly_new_documents),
        count(report.monthly_new_characters)
    );
    println!("  {}: {}", "Cost per Document".cyan(), unit_money(report.cost_per_document));
    println!();

    let mut table = new_table(&["MONTH", "API", "HUMAN REVIEW", "CUMULATIVE TOTAL"]);
    for point in &report.projection {
        table.add_row(vec![
            Cell::new(&point.period_label),
            Cell::new(money(point.cumulative_api)),
            Cell::new(money(point.cumulative_review)),
            Cell::new(money(point.cumulative_total)),
        ]);
    }
    println!("{}", "12-Month Cumulative Spend".bold());
    println!("{}", table);
    println!(
        "\n{}: {}",
        "Year-1 Cumulative Spend".bold(),
        money(report.total_year1).green()
    );
}
