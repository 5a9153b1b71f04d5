// src/main.rs — burnish entry point

use clap::Parser;

use burnish::cli::{self, Cli, Commands};
use burnish::infra::config::Config;
use burnish::infra::logger;

#[tokio::main]
async fn main() {
    // Initialize logging (respects RUST_LOG)
    logger::init_logging("warn");

    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Optimize(args) => cli::optimize::run(args, &config).await,
        Commands::Score(args) => cli::score::run(args),
    }
}
