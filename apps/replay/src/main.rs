mod cli;
mod replay;

use anyhow::Context;
use clap::Parser;
use readalong_tracker::TrackerSettings;
use tracing_subscriber::EnvFilter;

use crate::cli::CliArgs;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let default_filter = if args.debug {
        "info,readalong=trace"
    } else {
        "info,readalong=debug"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = match &args.settings {
        Some(path) => TrackerSettings::from_json_file(path)?,
        None => TrackerSettings::default(),
    };
    tracing::info!(?settings, "Starting replay");

    let script = std::fs::read_to_string(&args.script)
        .with_context(|| format!("failed to read script {}", args.script.display()))?;
    let events = replay::read_events(&args.transcript)?;

    let summary = replay::run(&script, events, settings, !args.finals_only).await?;
    println!("{summary}");
    Ok(())
}
