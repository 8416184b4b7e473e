use super::narrate::{build_service, print_commentary};
use super::render::headline;
use super::{rag, roi, translation};
use anyhow::Result;
use colored::Colorize;
use cost_projector::config::Config;
use cost_projector::engine::{Scenario, ScenarioReport};
use cost_projector::narrative::{
    AnthropicNarrator, CommentaryOutcome, CommentaryRequest, CommentaryScheduler, NarrativeKind,
};
use cost_projector::session::Session;
use std::collections::HashMap;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const HELP: &str = "\
Commands:
  set <scenario>.<field> <value>   change a parameter (e.g. set roi.user_count 500)
  show <scenario>                  print the full report
  params <scenario>                print the current parameters as JSON
  reset <scenario>                 restore the starting parameters
  help                             this text
  quit                             leave the session
Scenarios: translation, rag, roi  (roi.cost_source parameters|translation|rag)";

/// Execute the session command
pub async fn execute(cfg: &Config) -> Result<()> {
    let mut session = Session::from_config(cfg);
    let scheduler = build_scheduler(cfg);
    let mut pending = PendingCommentary::default();

    println!("{}", "Cost projector session".green().bold());
    println!("{}", HELP.dimmed());
    if scheduler.is_some() {
        println!(
            "{}",
            format!(
                "Narrative commentary follows each change after {} ms of quiet",
                cfg.narrative.debounce_ms
            )
            .dimmed()
        );
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => continue,
            ["quit"] | ["exit"] => break,
            ["help"] => println!("{}", HELP),
            ["set", path, value @ ..] if !value.is_empty() => {
                match session.set(path, &value.join(" ")) {
                    Ok(report) => {
                        println!(
                            "{} {}",
                            report.scenario().to_string().cyan(),
                            headline(&report)
                        );
                        if let Some(scheduler) = &scheduler {
                            pending.track(
                                report.scenario(),
                                submit_commentary(scheduler, &report),
                            );
                        }
                    }
                    Err(e) => println!("{}", e.to_string().red()),
                }
            }
            ["show", scenario] => match scenario.parse::<Scenario>() {
                Ok(scenario) => render(&session.report(scenario)),
                Err(e) => println!("{}", e.red()),
            },
            ["params", scenario] => match scenario.parse::<Scenario>() {
                Ok(scenario) => {
                    let parameters = session.parameters(scenario)?;
                    println!("{}", serde_json::to_string_pretty(&parameters)?);
                }
                Err(e) => println!("{}", e.red()),
            },
            ["reset", scenario] => match scenario.parse::<Scenario>() {
                Ok(scenario) => {
                    let report = session.reset(scenario);
                    println!("{} {}", scenario.to_string().cyan(), headline(&report));
                }
                Err(e) => println!("{}", e.red()),
            },
            _ => println!("{}", format!("Unrecognised command: {}", line.trim()).red()),
        }
    }

    let waiting = pending.drain().await;
    if waiting > 0 {
        info!(count = waiting, "Waited for pending commentary before leaving the session");
    }

    Ok(())
}

/// Latest commentary task per scenario, awaited before the session ends so
/// piped input still gets its commentary printed
#[derive(Default)]
struct PendingCommentary {
    tasks: HashMap<Scenario, JoinHandle<()>>,
}

impl PendingCommentary {
    /// Replaced tasks keep running; they resolve as superseded on their own
    fn track(&mut self, scenario: Scenario, task: JoinHandle<()>) {
        self.tasks.insert(scenario, task);
    }

    /// Await every tracked task; returns how many were still running
    async fn drain(self) -> usize {
        let waiting = self.tasks.values().filter(|task| !task.is_finished()).count();
        for (scenario, task) in self.tasks {
            if let Err(e) = task.await {
                warn!(scenario = %scenario, error = %e, "Commentary task failed");
            }
        }
        waiting
    }
}

fn build_scheduler(cfg: &Config) -> Option<CommentaryScheduler<AnthropicNarrator>> {
    if !cfg.narrative.enabled {
        return None;
    }
    match build_service(&cfg.narrative) {
        Ok(service) => Some(CommentaryScheduler::new(
            service,
            Duration::from_millis(cfg.narrative.debounce_ms),
        )),
        Err(e) => {
            warn!(error = %e, "Narrative commentary unavailable for this session");
            None
        }
    }
}

/// Queue an executive summary; only the latest one per scenario is printed
fn submit_commentary(
    scheduler: &CommentaryScheduler<AnthropicNarrator>,
    report: &ScenarioReport,
) -> JoinHandle<()> {
    let kind = NarrativeKind::ExecutiveSummary;
    let handle = scheduler.submit(CommentaryRequest::new(report, kind));

    tokio::spawn(async move {
        let scenario = handle.scenario();
        let generation = handle.generation();
        match handle.outcome().await {
            CommentaryOutcome::Ready(commentary) => {
                println!("{}", format!("[{} commentary]", scenario).magenta());
                print_commentary(kind, &commentary);
            }
            CommentaryOutcome::Superseded => {
                debug!(scenario = %scenario, generation = generation, "Commentary superseded");
            }
        }
    })
}

fn render(report: &ScenarioReport) {
    match report {
        ScenarioReport::Translation(r) => translation::render(r),
        ScenarioReport::Rag(r) => rag::render(r),
        ScenarioReport::Roi(r) => roi::render(r),
    }
}
