use super::render::{breakdown_table, count, money, new_table};
use anyhow::{bail, Result};
use colored::Colorize;
use comfy_table::{Cell, Color};
use cost_projector::engine::roi::format_ratio;
use cost_projector::engine::{RoiReport, Scenario, ScenarioReport};
use cost_projector::session::Session;
use tracing::info;

/// Execute the roi command
pub fn execute(session: &Session, json: bool) -> Result<()> {
    let report = match session.report(Scenario::Roi) {
        ScenarioReport::Roi(report) => report,
        other => bail!("Unexpected {} report for ROI", other.scenario()),
    };
    info!(
        cost_source = session.roi_cost_source.as_str(),
        net_monthly_gain = report.net_monthly_gain,
        "ROI projection computed"
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render(&report);
    }
    Ok(())
}

fn signed(value: f64) -> Cell {
    let cell = Cell::new(money(value));
    if value < 0.0 {
        cell.fg(Color::Red)
    } else {
        cell.fg(Color::Green)
    }
}

pub fn render(report: &RoiReport) {
    println!("{}", "AI Productivity ROI".green().bold());
    println!(
        "  {}: {} requests/month, {:.1} hours saved/month",
        "Usage".cyan(),
        count(report.monthly_requests),
        report.hours_saved_per_month
    );
    println!(
        "  {}: {}",
        "Monthly Productivity Value".cyan(),
        money(report.monthly_productivity_value)
    );
    println!();

    println!("{}", breakdown_table("AI OPERATING COST", &report.costs));

    let net = money(report.net_monthly_gain);
    let net = if report.net_monthly_gain < 0.0 {
        net.red()
    } else {
        net.green()
    };
    println!("  {}: {}", "Net Monthly Gain".bold(), net);
    println!("  {}: {}", "ROI Ratio".bold(), report.roi_ratio_label());
    println!("  {}: {}", "Cost per User".cyan(), money(report.cost_per_user));
    println!(
        "  {}: {}",
        "Break-even".cyan(),
        report
            .break_even_month
            .map(|m| format!("Month {}", m))
            .unwrap_or_else(|| "not within 12 months".to_string())
    );
    println!();

    let mut scenarios = new_table(&[
        "SCENARIO",
        "TIME SAVED",
        "USERS",
        "MONTHLY VALUE",
        "MONTHLY COST",
        "NET GAIN",
        "ROI",
    ]);
    for variant in &report.scenarios {
        scenarios.add_row(vec![
            Cell::new(variant.name),
            Cell::new(format!("{:.1} min", variant.time_saved_minutes)),
            Cell::new(format!("{:.1}", variant.effective_users)),
            Cell::new(money(variant.monthly_value)),
            Cell::new(money(variant.monthly_cost)),
            signed(variant.net_monthly_gain),
            Cell::new(format_ratio(variant.roi_ratio)),
        ]);
    }
    println!("{}", "Scenarios".bold());
    println!("{}", scenarios);
    println!();

    let mut table = new_table(&["MONTH", "CUMULATIVE COST", "CUMULATIVE VALUE", "NET GAIN"]);
    for point in &report.projection {
        table.add_row(vec![
            Cell::new(&point.period_label),
            Cell::new(money(point.cumulative_cost)),
            Cell::new(money(point.cumulative_value)),
            signed(point.cumulative_net_gain),
        ]);
    }
    println!("{}", "12-Month Projection".bold());
    println!("{}", table);

    let annual = money(report.annual_net_gain);
    let annual = if report.annual_net_gain < 0.0 {
        annual.red()
    } else {
        annual.green()
    };
    println!("\n{}: {}", "Annual Net Gain".bold(), annual);
}
