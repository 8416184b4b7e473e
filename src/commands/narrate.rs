use anyhow::{bail, Result};
use colored::Colorize;
use cost_projector::config::NarrativeConfig;
use cost_projector::engine::ScenarioReport;
use cost_projector::narrative::{
    AnthropicNarrator, Commentary, CommentaryRequest, CommentaryService, NarrativeKind,
};
use std::sync::Arc;

/// Shown in place of an empty decorative commentary
pub const NO_INSIGHT: &str = "No insight available.";

/// Build the commentary service from configuration
pub fn build_service(cfg: &NarrativeConfig) -> Result<CommentaryService<AnthropicNarrator>> {
    if !cfg.enabled {
        bail!(
            "Narrative commentary is disabled; \
             set [narrative] enabled = true and api_key in the config"
        );
    }
    let narrator = AnthropicNarrator::new(cfg.clone())?;
    Ok(CommentaryService::new(Arc::new(narrator), cfg.retry.clone()))
}

/// Execute the narrate command
pub async fn execute(
    cfg: &NarrativeConfig,
    report: &ScenarioReport,
    kind: NarrativeKind,
) -> Result<()> {
    let service = build_service(cfg)?;

    println!(
        "{}",
        format!("Generating {} for {}...", kind, report.scenario()).yellow()
    );
    let commentary = service
        .commentary(&CommentaryRequest::new(report, kind))
        .await;

    print_commentary(kind, &commentary);
    Ok(())
}

/// Print commentary; failures are dimmed so they never read like figures
pub fn print_commentary(kind: NarrativeKind, commentary: &Commentary) {
    match commentary {
        Commentary::Text(text) if kind == NarrativeKind::Analysis => {
            for (label, body) in parse_labelled_sections(text) {
                if !label.is_empty() {
                    println!("{}", label.bold());
                }
                println!("{}\n", body);
            }
        }
        Commentary::Text(text) => println!("{}", text),
        Commentary::Unavailable(message) => println!("{}", message.yellow()),
        Commentary::Empty => println!("{}", NO_INSIGHT.dimmed()),
    }
}

/// Split "**Label**: text" lines into (label, body) sections
///
/// Best effort: text before the first label, or with no labels at all, comes
/// back under an empty label.
pub fn parse_labelled_sections(text: &str) -> Vec<(String, String)> {
    let mut sections: Vec<(String, String)> = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Some((label, rest)) = split_label(trimmed) {
            sections.push((label.to_string(), rest.to_string()));
            continue;
        }

        match sections.last_mut() {
            Some((_, body)) => {
                if !body.is_empty() {
                    body.push('\n');
                }
                body.push_str(trimmed);
            }
            None => sections.push((String::new(), trimmed.to_string())),
        }
    }

    sections
}

fn split_label(line: &str) -> Option<(&str, &str)> {
    let inner = line.strip_prefix("**")?;
    let (label, rest) = inner.split_once("**")?;
    let rest = rest.strip_prefix(':').or_else(|| {
        // "**Label:** text"
        label.ends_with(':').then_some(rest)
    })?;
    let label = label.trim_end_matches(':').trim();
    if label.is_empty() {
        return None;
    }
    Some((label, rest.trim()))
}
