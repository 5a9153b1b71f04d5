// src/cli/mod.rs — CLI definition (clap derive)

pub mod optimize;
pub mod score;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "burnish", about = "Iterative text refinement engine", version)]
pub struct Cli {
    /// Config file path (defaults to ./burnish.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Refine a text file through the iteration loop
    Optimize(OptimizeArgs),
    /// Print the heuristic quality breakdown for a text file
    Score(ScoreArgs),
}

#[derive(Args)]
pub struct OptimizeArgs {
    /// Input file; reads stdin when omitted
    pub file: Option<PathBuf>,

    /// Rewrite collaborator: a command that reads text on stdin, gets the
    /// instructions in $BURNISH_INSTRUCTIONS, and prints the rewrite
    #[arg(long, value_name = "CMD")]
    pub rewrite_cmd: String,

    /// Optimization mode (standard, thorough, quick, creative, academic,
    /// technical, business)
    #[arg(short, long, default_value = "standard")]
    pub mode: String,

    /// The request the text is answering (drives the completeness strategy)
    #[arg(short, long)]
    pub query: Option<String>,

    /// Override the mode's iteration cap
    #[arg(long)]
    pub max_iterations: Option<u32>,

    /// Override the mode's quality threshold (0.0-1.0)
    #[arg(long)]
    pub quality: Option<f32>,

    /// Override the mode's time budget
    #[arg(long)]
    pub time_limit_ms: Option<u64>,

    /// Select the top two strategies per iteration (applied sequentially)
    #[arg(long)]
    pub parallel: bool,

    /// Opt in to the SEO enhancement strategy
    #[arg(long)]
    pub seo: bool,

    /// Emit the full run result as JSON instead of plain text
    #[arg(long)]
    pub json: bool,

    /// Suppress progress output on stderr
    #[arg(long)]
    pub quiet: bool,
}

#[derive(Args)]
pub struct ScoreArgs {
    /// Input file; reads stdin when omitted
    pub file: Option<PathBuf>,

    /// Emit the breakdown as JSON
    #[arg(long)]
    pub json: bool,
}

/// Read the input text from a file or stdin.
pub(crate) fn read_input(file: Option<&PathBuf>) -> anyhow::Result<String> {
    match file {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => Ok(std::io::read_to_string(std::io::stdin())?),
    }
}
