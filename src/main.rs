mod batch;
mod cli;
mod color;
mod compare;
mod config;
mod import;
mod loc;
mod matrix;
mod normalize;
mod pipeline;
mod report;
mod report_helpers;
mod version;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use config::Config;

/// `RUST_LOG` wins over the `-v` count when set.
fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = Config::load(cli.config.as_deref()).and_then(|config| match &cli.command {
        Commands::Compare(args) => pipeline::run(args, &config),
        Commands::Import(args) => import::run(args, &config.import),
    });

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
