use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "readalong-replay",
    about = "Replay a recorded recognizer session against a script"
)]
pub struct CliArgs {
    /// Script text file
    #[arg(short, long)]
    pub script: PathBuf,

    /// Recognizer events, one JSON object per line
    #[arg(short, long)]
    pub transcript: PathBuf,

    /// Tracker settings JSON (missing fields use defaults)
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Hide interim cursor previews
    #[arg(long)]
    pub finals_only: bool,

    /// Enable debug mode with verbose logging
    #[arg(long)]
    pub debug: bool,
}
