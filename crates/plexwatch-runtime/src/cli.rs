//! CLI definition using clap derive.

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(
    name = "aw-watcher-plex",
    version,
    about = "Report Plex playback to ActivityWatch"
)]
pub struct Cli {
    /// Config file (default: <config dir>/activitywatch/aw-watcher-plex/aw-watcher-plex.toml)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Plex access token, overrides the config file
    #[arg(long, env = "PLEX_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Plex server base URL, overrides the config file
    #[arg(long)]
    pub base_url: Option<String>,

    /// Poll interval in seconds, overrides the config file
    #[arg(long)]
    pub poll_time: Option<f64>,

    /// Do not report paused sessions
    #[arg(long)]
    pub no_log_pauses: bool,

    /// Report to the ActivityWatch testing server (port 5666)
    #[arg(long)]
    pub testing: bool,

    /// ActivityWatch server URL, takes precedence over --testing
    #[arg(long)]
    pub aw_url: Option<String>,

    /// Debug logging
    #[arg(long, short = 'v')]
    pub verbose: bool,
}
