//! Pronos CLI - AI sports predictions from the command line.

use clap::Parser;
use pronos_cli::commands;
use pronos_cli::{build_provider, Cli, Command, Config, FileCache, Formatter};
use pronos_ingest::{IngestionPipeline, RequestGeneration};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        tracing::debug!("Command failed: {:?}", e);
        eprintln!("{}", e);
        std::process::exit(e.exit_code());
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Log to stderr so stdout stays parseable in json/quiet modes
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> pronos_cli::Result<()> {
    let config_path = match cli.config {
        Some(path) => path,
        None => Config::default_path()?,
    };
    let config = Config::load(&config_path)?;

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    let formatter = Formatter::new(format, color_enabled);
    let cache_path = Config::cache_path(&config_path);

    match cli.command {
        Command::Config(args) => {
            commands::execute_config(args, &config, &config_path, &formatter)?;
        }
        Command::Archive(args) => {
            let mut cache = FileCache::open(cache_path)?;
            commands::execute_archive(args, &mut cache, &formatter)?;
        }
        Command::Predictions(args) => {
            let mut cache = FileCache::open(cache_path)?;
            let generation = RequestGeneration::new();
            commands::execute_predictions(args, &mut cache, &generation, &formatter, || {
                let provider = build_provider(&config, cli.model.as_deref())?;
                Ok(IngestionPipeline::new(provider, config.ingest.clone())?)
            })
            .await?;
        }
        Command::Analyze(args) => {
            let provider = build_provider(&config, cli.model.as_deref())?;
            let pipeline = IngestionPipeline::new(provider, config.ingest.clone())?;
            let mut cache = FileCache::open(cache_path)?;
            commands::execute_analyze(args, &pipeline, &mut cache, &formatter).await?;
        }
    }

    Ok(())
}
