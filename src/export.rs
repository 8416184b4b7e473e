//! Translation estimate as a `Metric,Value` CSV

use crate::engine::{amount, TranslationReport};
use crate::error::AppError;
use chrono::NaiveDate;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// `translation_cost_estimate_<YYYY-MM-DD>.csv`
pub fn default_file_name(date: NaiveDate) -> String {
    format!("translation_cost_estimate_{}.csv", date.format("%Y-%m-%d"))
}

/// Flat key/value rows of the translation estimate
pub fn translation_rows(report: &TranslationReport) -> Vec<(&'static str, String)> {
    let params = &report.parameters;
    vec![
        ("AI Model", report.model.display_name.to_string()),
        ("Language Scope", report.language_scope.to_string()),
        ("Document Volume", format!("{}", amount(params.document_count))),
        ("Chars per Document", format!("{}", amount(params.characters_per_document))),
        ("Monthly Growth %", format!("{}", amount(params.monthly_growth_percent))),
        ("Quality Tier", params.quality_tier.as_str().to_string()),
        ("Initial Setup Cost", format!("{:.2}", report.initial_total())),
        ("Monthly Recurring Cost", format!("{:.2}", report.monthly_total())),
        ("Year-1 Cumulative Spend", format!("{:.2}", report.total_year1)),
        ("Total Initial Characters", format!("{}", report.total_initial_characters)),
    ]
}

/// Render the CSV text, header included
pub fn translation_csv(report: &TranslationReport) -> String {
    let mut csv = String::from("Metric,Value\n");
    for (metric, value) in translation_rows(report) {
        csv.push_str(metric);
        csv.push(',');
        csv.push_str(&value);
        csv.push('\n');
    }
    csv
}

/// Write the CSV to `path`
pub fn write_translation_csv(report: &TranslationReport, path: &Path) -> Result<PathBuf, AppError> {
    let mut file = std::fs::File::create(path)?;
    file.write_all(translation_csv(report).as_bytes())?;
    file.flush()?;

    info!(path = %path.display(), "Translation estimate exported");
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{compute_translation, TranslationParameters};

    #[test]
    fn test_default_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(default_file_name(date), "translation_cost_estimate_2024-03-07.csv");
    }

    #[test]
    fn test_csv_layout() {
        let report = compute_translation(&TranslationParameters::default());
        let csv = translation_csv(&report);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "Metric,Value");
        assert_eq!(lines.len(), 11);
        assert_eq!(lines[1], "AI Model,GPT-4o mini");
        assert_eq!(lines[3], "Document Volume,1000");
        assert_eq!(lines[4], "Chars per Document,2500");
        assert_eq!(lines[6], "Quality Tier,basic");
        assert!(lines[7].starts_with("Initial Setup Cost,4.1"));
        assert_eq!(lines[10], "Total Initial Characters,2500000");
    }
}
