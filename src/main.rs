//! Interactive library shell.

use std::{error::Error, io, path::PathBuf};

use clap::Parser;
use library_circulation::{CirculationEngine, CirculationLogger, EngineConfig, Shell};
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for the library shell
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file with engine sizing; missing fields keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum pending borrow requests, overriding the config file
    #[arg(long, env = "LIBRARY_BORROW_CAPACITY")]
    borrow_capacity: Option<usize>,

    /// Maximum pending returns, overriding the config file
    #[arg(long, env = "LIBRARY_RETURN_CAPACITY")]
    return_capacity: Option<usize>,

    /// Log accepted operations as well as rejections
    #[arg(short, long)]
    verbose: bool,

    /// Print the menu without colors
    #[arg(long)]
    no_color: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = resolve_config(&args)?;
    debug!(?config, "starting library shell");

    let mut engine = CirculationEngine::new(&config);
    engine.register_observer(Box::new(CirculationLogger));

    let mut shell =
        Shell::new(engine, io::stdin().lock(), io::stdout().lock()).with_color(!args.no_color);
    shell.run()?;
    Ok(())
}

/// Send logs to stderr so they do not interleave with the menu
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Config file (or defaults) with command-line overrides applied
fn resolve_config(args: &Args) -> Result<EngineConfig, Box<dyn Error>> {
    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    Ok(config.with_overrides(args.borrow_capacity, args.return_capacity)?)
}
