//! Shared table and number formatting for command output

use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use cost_projector::engine::{CostBreakdown, ScenarioReport};

/// Table with the standard preset and cyan header cells
pub fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).fg(Color::Cyan))
            .collect::<Vec<_>>(),
    );
    table
}

/// `$1,234.57`; negative amounts as `-$12.00`
pub fn money(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let cents = (value.abs() * 100.0).round() as u64;
    format!("{}${}.{:02}", sign, format_number(cents / 100), cents % 100)
}

/// Small unit costs keep more precision: `$0.000375`
pub fn unit_money(value: f64) -> String {
    if value != 0.0 && value.abs() < 0.01 {
        format!("${:.6}", value)
    } else {
        money(value)
    }
}

/// Format a number with thousands separators
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let len = s.len();

    for (i, c) in s.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result
}

/// Round a count for display with separators
pub fn count(value: f64) -> String {
    if value.is_finite() && value >= 0.0 {
        format_number(value.round() as u64)
    } else {
        "0".to_string()
    }
}

pub fn percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Component/amount table with a bold total row
pub fn breakdown_table(title: &str, breakdown: &CostBreakdown) -> Table {
    let mut table = new_table(&[title, "AMOUNT"]);
    for (name, amount) in breakdown.components() {
        table.add_row(vec![Cell::new(label(name)), Cell::new(money(*amount))]);
    }
    table.add_row(vec![
        Cell::new("Total").fg(Color::Green),
        Cell::new(money(breakdown.total())).fg(Color::Green),
    ]);
    table
}

/// `human_review` -> `Human review`
pub fn label(name: &str) -> String {
    let spaced = name.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// One-line summary printed after an interactive parameter change
pub fn headline(report: &ScenarioReport) -> String {
    match report {
        ScenarioReport::Translation(r) => format!(
            "setup {} | monthly {} | year 1 {}",
            money(r.initial_total()),
            money(r.monthly_total()),
            money(r.total_year1)
        ),
        ScenarioReport::Rag(r) => format!(
            "setup {} | monthly ops {} | governance {} | annualized {}",
            money(r.one_time_setup_total()),
            money(r.monthly_ops_total()),
            money(r.monthly_governance_total()),
            money(r.annualized_total)
        ),
        ScenarioReport::Roi(r) => format!(
            "value {} | cost {} | net {} | ROI {}",
            money(r.monthly_productivity_value),
            money(r.total_ai_monthly_cost()),
            money(r.net_monthly_gain),
            r.roi_ratio_label()
        ),
    }
}
