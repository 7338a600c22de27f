use anyhow::Result;
use clap::Parser;

mod alias;
mod args;
mod auth;
mod cfg;
mod commands;
mod error;
mod format;
mod range;
mod resolve;
mod sheets;
mod spec;
mod store;

use args::{Args, Command};
use cfg::Cfg;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level)?;

    let cfg = Cfg::load(&args)?;

    match &args.command {
        Command::Get { spec } => commands::get(&cfg, spec).await,
        Command::Cat { spec } => commands::cat(&cfg, spec).await,
        Command::Tail { spec, lines } => commands::tail(&cfg, spec, *lines).await,
        Command::Ls { spec } => commands::ls(&cfg, spec).await,
        Command::Put { spec, force_put } => commands::put(&cfg, spec, *force_put).await,
        Command::Touch(touch) => commands::touch(&cfg, touch).await,
        Command::Rm { spec, force_delete } => commands::rm(&cfg, spec, *force_delete).await,
        Command::Alias(alias) => commands::alias(&cfg, alias),
        Command::Config { key } => commands::config(&cfg, key.as_deref()),
    }
}

fn init_logging(level: &str) -> Result<()> {
    let filter = match level {
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    };

    tracing_subscriber::fmt().with_max_level(filter).init();

    Ok(())
}
