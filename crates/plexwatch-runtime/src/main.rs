//! aw-watcher-plex: reports the most relevant Plex playback session to
//! ActivityWatch as a heartbeat every poll interval.

use clap::Parser;

mod cli;
mod config;
mod display;
mod poll_loop;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    let filter = if args.verbose {
        "debug".to_string()
    } else {
        std::env::var("AW_WATCHER_PLEX_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "info".to_string())
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let settings = match config::load_settings(&args) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    };

    tracing::info!("aw-watcher-plex starting");
    poll_loop::run_watcher(settings).await
}
