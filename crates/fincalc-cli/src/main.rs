use anyhow::Result;
use clap::Parser;
use fincalc_cli::{Cli, FincalcConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = FincalcConfig::load()?.apply_profile();

    init_tracing(&cli.log_filter(&config), config.logging.json)?;
    config.log_source();

    info!(version = env!("CARGO_PKG_VERSION"), command = ?cli.command, "Starting fincalc");

    let output = cli.execute(&config)?;
    println!("{output}");
    Ok(())
}

/// Logs go to stderr so command output on stdout stays machine-readable.
fn init_tracing(filter: &str, json: bool) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(filter)?)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}
