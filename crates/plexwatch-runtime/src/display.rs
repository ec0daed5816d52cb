//! One-line console summaries, printed once per tick.

use plexwatch_core::{MediaDetails, PlaybackDescription};

use crate::poll_loop::{SkipReason, TickOutcome};

pub const NO_SESSIONS: &str = "No active sessions";
pub const PAUSED_SKIPPED: &str = "Session paused - skipping due to log_pauses=false";
pub const NO_PLAYER_STATE: &str = "Session has no player state - skipping";

/// Console line for a tick outcome.
pub fn outcome_line(outcome: &TickOutcome) -> String {
    match outcome {
        TickOutcome::NoSessions => NO_SESSIONS.to_string(),
        TickOutcome::Skipped(SkipReason::PausedNotLogged) => PAUSED_SKIPPED.to_string(),
        TickOutcome::Skipped(SkipReason::NoPlayerState) => NO_PLAYER_STATE.to_string(),
        TickOutcome::Reported(desc) => playback_line(desc),
    }
}

/// `Playing: Show - S2E5 - Title on PC` or `Paused: Title on TV`.
///
/// Any state other than playing (paused, buffering, unknown or unrecognized)
/// is shown as `Paused`.
pub fn playback_line(desc: &PlaybackDescription) -> String {
    let state = if desc.is_playing() { "Playing" } else { "Paused" };
    let title = desc.title.as_deref().unwrap_or("(untitled)");
    let device = desc.device.as_deref().unwrap_or("unknown device");

    match &desc.details {
        MediaDetails::Episode {
            show_title,
            season_number,
            episode_number,
        } => format!(
            "{state}: {} - S{}E{} - {title} on {device}",
            show_title.as_deref().unwrap_or("(unknown show)"),
            number_or_placeholder(*season_number),
            number_or_placeholder(*episode_number),
        ),
        _ => format!("{state}: {title} on {device}"),
    }
}

fn number_or_placeholder(n: Option<u32>) -> String {
    n.map_or_else(|| "?".to_string(), |n| n.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use plexwatch_core::{Player, PlayerState, Session, extract};

    fn describe(kind: &str, state: &str) -> PlaybackDescription {
        extract(&Session {
            title: Some("Episode Title".to_string()),
            kind: Some(kind.to_string()),
            grandparent_title: Some("Show Title".to_string()),
            parent_index: Some(2),
            index: Some(5),
            player: Some(Player {
                state: Some(PlayerState::from(state)),
                device: Some("PC".to_string()),
                ..Player::default()
            }),
            ..Session::default()
        })
    }

    #[test]
    fn episode_line() {
        assert_eq!(
            playback_line(&describe("episode", "playing")),
            "Playing: Show Title - S2E5 - Episode Title on PC"
        );
    }

    #[test]
    fn movie_line_paused() {
        assert_eq!(
            playback_line(&describe("movie", "paused")),
            "Paused: Episode Title on PC"
        );
    }

    #[test]
    fn non_playing_states_show_as_paused() {
        for state in ["buffering", "unknown", "stopped"] {
            assert_eq!(
                playback_line(&describe("movie", state)),
                "Paused: Episode Title on PC"
            );
        }
    }

    #[test]
    fn missing_values_have_placeholders() {
        let desc = extract(&Session {
            kind: Some("episode".to_string()),
            ..Session::default()
        });
        assert_eq!(
            playback_line(&desc),
            "Paused: (unknown show) - S?E? - (untitled) on unknown device"
        );
    }

    #[test]
    fn outcome_lines() {
        assert_eq!(outcome_line(&TickOutcome::NoSessions), NO_SESSIONS);
        assert_eq!(
            outcome_line(&TickOutcome::Skipped(SkipReason::PausedNotLogged)),
            PAUSED_SKIPPED
        );
        let reported = TickOutcome::Reported(Box::new(describe("clip", "playing")));
        assert_eq!(outcome_line(&reported), "Playing: Episode Title on PC");
    }
}
