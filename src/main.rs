use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cost_projector::config::{self, LoggingConfig};
use cost_projector::init_tracing;
use cost_projector::session::Session;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let command = args.get_command();

    // Tracing needs the logging section, so load first and report a bad
    // config only once a subscriber exists
    let loaded = config::load_config(&args.config);
    let logging = loaded
        .as_ref()
        .map(|cfg| cfg.logging.clone())
        .unwrap_or_else(|_| LoggingConfig::default());
    init_tracing(&logging);
    let cfg = loaded?;

    match command {
        cli::Commands::Translation { json } => {
            commands::translation::execute(&cfg.translation, json)?;
        }
        cli::Commands::Rag { json } => {
            commands::rag::execute(&cfg.rag, json)?;
        }
        cli::Commands::Roi { json, cost_source } => {
            let mut session = Session::from_config(&cfg);
            session.roi_cost_source = cost_source;
            commands::roi::execute(&session, json)?;
        }
        cli::Commands::Export { output } => {
            commands::export::execute(&cfg.translation, output)?;
        }
        cli::Commands::Narrate { scenario, kind } => {
            let report = Session::from_config(&cfg).report(scenario);
            commands::narrate::execute(&cfg.narrative, &report, kind).await?;
        }
        cli::Commands::Session => {
            commands::session::execute(&cfg).await?;
        }
        cli::Commands::Catalog { json } => {
            commands::catalog::execute(json)?;
        }
        cli::Commands::Config { action } => match action {
            cli::ConfigCommands::Show => commands::config::show(&args.config)?,
            cli::ConfigCommands::Validate => commands::config::validate(&args.config)?,
        },
        cli::Commands::Version => {
            println!("Cost Projector v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
