//! Poll loop: wires session source → selector → extractor → heartbeat sink.
//! One sequential task: tick, sleep for the poll interval, repeat.

use std::time::Duration;

use anyhow::Context;
use chrono::{DateTime, Utc};
use thiserror::Error;

use plexwatch_aw::{AwClient, AwError, Event, HeartbeatSink, pulse_duration};
use plexwatch_core::{PlaybackDescription, extract_at, select};
use plexwatch_plex::{PlexClient, PlexError, SessionSource};

use crate::config::{SECTION, Settings};
use crate::display;

/// Bucket type reported to the activity tracker.
pub const BUCKET_TYPE: &str = "currently-playing";

/// Result of a tick that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    NoSessions,
    Skipped(SkipReason),
    Reported(Box<PlaybackDescription>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The selected session's player exposes no state.
    NoPlayerState,
    /// Not playing and `log_pauses` is off.
    PausedNotLogged,
}

#[derive(Debug, Error)]
pub enum TickError {
    #[error("failed to fetch sessions: {0}")]
    Fetch(#[from] PlexError),

    #[error("failed to report heartbeat: {0}")]
    Report(#[from] AwError),
}

/// What the loop does after a failed tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
}

/// Every tick failure is transient: log it and try again next tick.
pub fn error_policy(err: &TickError) -> LoopControl {
    match err {
        TickError::Fetch(_) | TickError::Report(_) => LoopControl::Continue,
    }
}

/// Per-run parameters shared by every tick.
#[derive(Debug, Clone)]
pub struct TickContext {
    pub bucket_id: String,
    pub poll_interval: Duration,
    pub log_pauses: bool,
}

impl TickContext {
    pub fn pulse_duration(&self) -> Duration {
        pulse_duration(self.poll_interval)
    }
}

/// Run the watcher until ctrl-c or SIGTERM.
pub async fn run_watcher(settings: Settings) -> anyhow::Result<()> {
    let sink = AwClient::new(&settings.aw_server_url, SECTION)
        .context("invalid activitywatch server url")?;
    let bucket_id = sink.bucket_id();
    sink.ensure_bucket(&bucket_id, BUCKET_TYPE)
        .await
        .with_context(|| format!("failed to create bucket {bucket_id}"))?;
    sink.connect()
        .await
        .context("failed to connect to activitywatch")?;

    let source =
        PlexClient::new(&settings.base_url, settings.token.clone()).context("invalid base_url")?;
    match source.server_identity().await {
        Ok(name) => tracing::info!("Connected to Plex server: {name}"),
        Err(e) => tracing::warn!("could not reach Plex server yet: {e}"),
    }

    let ctx = TickContext {
        bucket_id,
        poll_interval: settings.poll_interval,
        log_pauses: settings.log_pauses,
    };
    tracing::info!(
        bucket = %ctx.bucket_id,
        poll_secs = ctx.poll_interval.as_secs_f64(),
        log_pauses = ctx.log_pauses,
        "watcher started"
    );

    tokio::select! {
        () = run_poll_loop(&source, &sink, &ctx) => {}
        () = shutdown_signal() => {}
    }

    tracing::info!("watcher stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => tracing::info!("received ctrl-c, shutting down"),
                    _ = sigterm.recv() => tracing::info!("received SIGTERM, shutting down"),
                }
            }
            Err(e) => {
                tracing::warn!("failed to register SIGTERM handler: {e}");
                ctrl_c.await.ok();
                tracing::info!("received ctrl-c, shutting down");
            }
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        tracing::info!("received ctrl-c, shutting down");
    }
}

/// Tick forever. A failed tick never ends the loop.
pub async fn run_poll_loop<S, K>(source: &S, sink: &K, ctx: &TickContext)
where
    S: SessionSource + ?Sized,
    K: HeartbeatSink + ?Sized,
{
    loop {
        match poll_tick(source, sink, ctx, Utc::now()).await {
            Ok(outcome) => println!("{}", display::outcome_line(&outcome)),
            Err(e) => {
                tracing::error!("Error: {e}");
                match error_policy(&e) {
                    LoopControl::Continue => {}
                }
            }
        }

        tokio::time::sleep(ctx.poll_interval).await;
    }
}

/// One fetch → select → extract → report pass.
pub async fn poll_tick<S, K>(
    source: &S,
    sink: &K,
    ctx: &TickContext,
    now: DateTime<Utc>,
) -> Result<TickOutcome, TickError>
where
    S: SessionSource + ?Sized,
    K: HeartbeatSink + ?Sized,
{
    let sessions = source.list_active_sessions().await?;

    let Some(session) = select(&sessions) else {
        return Ok(TickOutcome::NoSessions);
    };

    if session.player_state().is_none() {
        tracing::debug!(title = ?session.title, "selected session has no player state");
        return Ok(TickOutcome::Skipped(SkipReason::NoPlayerState));
    }

    tracing::debug!(
        sessions = sessions.len(),
        duration = ?session.duration,
        year = ?session.year,
        device = ?session.player.as_ref().and_then(|p| p.device.as_deref()),
        view_offset = ?session.view_offset,
        "raw session data"
    );

    let desc = extract_at(session, now);
    tracing::debug!(data = ?desc, "processed metadata");

    if !ctx.log_pauses && !desc.is_playing() {
        return Ok(TickOutcome::Skipped(SkipReason::PausedNotLogged));
    }

    let event = Event::new(now, &desc.heartbeat_data())?;
    sink.heartbeat(&ctx.bucket_id, &event, ctx.pulse_duration())
        .await?;

    Ok(TickOutcome::Reported(Box::new(desc)))
}
