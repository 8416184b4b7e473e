use clap::{Parser, Subcommand};
use cost_projector::config::DEFAULT_CONFIG_PATH;
use cost_projector::engine::{CostSource, Scenario};
use cost_projector::narrative::NarrativeKind;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "cost-projector",
    version,
    about = "AI translation, RAG and ROI cost projections"
)]
pub struct Cli {
    /// Configuration file path
    #[arg(
        short,
        long,
        default_value = DEFAULT_CONFIG_PATH,
        global = true,
        env = "COST_PROJECTOR_CONFIG"
    )]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Translation backlog and recurring cost (default)
    Translation {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// RAG build, run and govern cost
    Rag {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Productivity ROI with conservative and optimistic variants
    Roi {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Where the monthly AI operating cost comes from: parameters, translation, rag
        #[arg(long, default_value = "parameters")]
        cost_source: CostSource,
    },

    /// Export the translation estimate as CSV
    Export {
        /// Output file, "-" for stdout (default: translation_cost_estimate_<date>.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate narrative commentary for a scenario
    Narrate {
        /// translation, rag or roi
        scenario: Scenario,

        /// analysis, summary, graph or monthly
        #[arg(short, long, default_value = "analysis")]
        kind: NarrativeKind,
    },

    /// Interactive session: change parameters and watch the numbers move
    Session,

    /// List catalog models and their rates
    Catalog {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Display current configuration (with secrets masked)
    Show,

    /// Validate configuration file
    Validate,
}

impl Cli {
    /// Get the command to execute, defaulting to Translation if none provided
    pub fn get_command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or(Commands::Translation { json: false })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_translation() {
        let cli = Cli {
            config: PathBuf::from(DEFAULT_CONFIG_PATH),
            command: None,
        };

        match cli.get_command() {
            Commands::Translation { json } => assert!(!json),
            _ => panic!("Expected Translation command"),
        }
    }

    #[test]
    fn test_cli_parsing_roi_with_cost_source() {
        let args = vec!["cost-projector", "roi", "--json", "--cost-source", "rag"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.get_command() {
            Commands::Roi { json, cost_source } => {
                assert!(json);
                assert_eq!(cost_source, CostSource::Rag);
            }
            _ => panic!("Expected Roi command"),
        }
    }

    #[test]
    fn test_cli_parsing_narrate() {
        let args = vec!["cost-projector", "narrate", "rag", "--kind", "monthly"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.get_command() {
            Commands::Narrate { scenario, kind } => {
                assert_eq!(scenario, Scenario::Rag);
                assert_eq!(kind, NarrativeKind::MonthlyNarration);
            }
            _ => panic!("Expected Narrate command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_scenario() {
        let args = vec!["cost-projector", "narrate", "payroll"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_cli_parsing_export_stdout() {
        let args = vec!["cost-projector", "--config", "custom.toml", "export", "-o", "-"];
        let cli = Cli::try_parse_from(args).unwrap();

        assert_eq!(cli.config, PathBuf::from("custom.toml"));
        match cli.get_command() {
            Commands::Export { output } => assert_eq!(output, Some(PathBuf::from("-"))),
            _ => panic!("Expected Export command"),
        }
    }

    #[test]
    fn test_cli_parsing_config_validate() {
        let args = vec!["cost-projector", "config", "validate"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.get_command() {
            Commands::Config { action } => {
                assert!(matches!(action, ConfigCommands::Validate));
            }
            _ => panic!("Expected Config command"),
        }
    }
}
