use anyhow::{Context, Result};
use colored::Colorize;
use cost_projector::engine::{compute_translation, TranslationParameters};
use cost_projector::export::{default_file_name, translation_csv, write_translation_csv};
use std::path::PathBuf;

/// Execute the export command
///
/// `-` writes to stdout; no path means today's default file name
pub fn execute(params: &TranslationParameters, output: Option<PathBuf>) -> Result<()> {
    let report = compute_translation(params);

    match output {
        Some(path) if path.as_os_str() == "-" => {
            print!("{}", translation_csv(&report));
        }
        output => {
            let path = output.unwrap_or_else(|| {
                PathBuf::from(default_file_name(chrono::Local::now().date_naive()))
            });
            let written = write_translation_csv(&report, &path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("{} {}", "✓ Exported".green(), written.display());
        }
    }

    Ok(())
}
