//! CLI command definitions and argument parsing.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Pronos CLI - AI sports predictions and match analysis.
#[derive(Debug, Parser)]
#[command(name = "pronos")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "PRONOS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Model override
    #[arg(long, global = true, env = "PRONOS_MODEL")]
    pub model: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show today's predictions
    Predictions(PredictionsArgs),

    /// Analyze a single match
    Analyze(AnalyzeArgs),

    /// Manage archived analyses
    Archive(ArchiveArgs),

    /// Inspect or create the configuration file
    Config(ConfigArgs),
}

/// Arguments for the predictions command.
#[derive(Debug, Parser)]
pub struct PredictionsArgs {
    /// Number of predictions to request
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Ignore the cached batch and fetch a new one
    #[arg(short, long)]
    pub refresh: bool,
}

/// Arguments for the analyze command.
#[derive(Debug, Parser)]
pub struct AnalyzeArgs {
    /// Sport (Football, Basketball, Tennis)
    #[arg(short, long)]
    pub sport: String,

    /// Home side or first player
    #[arg(long)]
    pub team1: String,

    /// Away side or second player
    #[arg(long)]
    pub team2: String,

    /// Bet to assess
    #[arg(short, long)]
    pub bet_type: String,

    /// Save the analysis to the archive
    #[arg(short, long)]
    pub archive: bool,
}

/// Arguments for archive management.
#[derive(Debug, Parser)]
pub struct ArchiveArgs {
    #[command(subcommand)]
    pub action: ArchiveAction,
}

/// Archive management actions.
#[derive(Debug, Subcommand)]
pub enum ArchiveAction {
    /// List archived analyses
    List,

    /// Show one archived analysis
    Show {
        /// Archive id
        id: String,
    },

    /// Remove one archived analysis
    Remove {
        /// Archive id
        id: String,
    },

    /// Remove every archived analysis
    Clear {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Print the configuration file path
    Path,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predictions_command() {
        let cli = Cli::parse_from(["pronos", "predictions", "-n", "5", "--refresh"]);
        match cli.command {
            Command::Predictions(args) => {
                assert_eq!(args.count, Some(5));
                assert!(args.refresh);
            }
            _ => panic!("Expected Predictions command"),
        }
    }

    #[test]
    fn test_analyze_command() {
        let cli = Cli::parse_from([
            "pronos",
            "analyze",
            "--sport",
            "Tennis",
            "--team1",
            "Sinner",
            "--team2",
            "Alcaraz",
            "--bet-type",
            "Sinner gagne",
            "--archive",
        ]);
        match cli.command {
            Command::Analyze(args) => {
                assert_eq!(args.team2, "Alcaraz");
                assert!(args.archive);
            }
            _ => panic!("Expected Analyze command"),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["pronos", "-vv", "archive", "list", "--format", "json"]);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.format, Some(CliFormat::Json)));
        assert!(matches!(
            cli.command,
            Command::Archive(ArchiveArgs {
                action: ArchiveAction::List
            })
        ));
    }

    #[test]
    fn test_analyze_requires_teams() {
        let result = Cli::try_parse_from(["pronos", "analyze", "--sport", "Football"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_format_conversion() {
        let format: crate::config::OutputFormat = CliFormat::Quiet.into();
        assert_eq!(format, crate::config::OutputFormat::Quiet);
    }
}
