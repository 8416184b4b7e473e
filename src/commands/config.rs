use anyhow::Result;
use colored::Colorize;
use cost_projector::config::{self, Config};
use cost_projector::logging::mask_api_key;
use std::path::Path;
use tracing::info;

/// Execute the config show command
///
/// Displays the effective configuration with secrets masked
pub fn show(path: &Path) -> Result<()> {
    println!("{}", "Loading configuration...".yellow());
    info!(path = %path.display(), "Loading configuration for display");

    let cfg = config::load_config(path)?;
    let sanitized = sanitize_secrets(&cfg);

    println!("{}", "Current Configuration:".green().bold());
    println!();

    let toml_string = toml::to_string_pretty(&sanitized)?;
    println!("{}", toml_string);

    Ok(())
}

/// Execute the config validate command
pub fn validate(path: &Path) -> Result<()> {
    println!("{}", "Validating configuration...".yellow());
    info!(path = %path.display(), "Validating configuration file");

    let cfg = config::load_config(path)?;

    println!("{}", "✓ Configuration is valid".green());
    println!();
    println!("{}", "Summary:".bold());
    println!(
        "  {}: {}",
        "File".cyan(),
        if path.exists() {
            path.display().to_string()
        } else {
            format!("{} (not found, using defaults)", path.display())
        }
    );
    println!("  {}: {} ({})", "Logging".cyan(), cfg.logging.level, cfg.logging.format);
    println!(
        "  {}: {}",
        "Narrative".cyan(),
        if cfg.narrative.enabled {
            format!("enabled ({})", cfg.narrative.model).green()
        } else {
            "disabled".red()
        }
    );
    println!("  {}: {}", "Translation Model".cyan(), cfg.translation.selected_model_id);
    println!(
        "  {}: {} / {}",
        "RAG Models".cyan(),
        cfg.rag.build.embedding_model_id,
        cfg.rag.run.inference_model_id
    );
    println!("  {}: {}", "ROI Users".cyan(), cfg.roi.user_count);

    info!("Configuration validation successful");
    Ok(())
}

/// Mask the narrative API key for display
fn sanitize_secrets(cfg: &Config) -> Config {
    let mut sanitized = cfg.clone();
    if let Some(key) = sanitized.narrative.api_key.as_mut() {
        *key = mask_api_key(key);
    }
    sanitized
}
