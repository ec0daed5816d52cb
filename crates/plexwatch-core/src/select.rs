//! Session selection: pick the one session to report on when the server is
//! streaming several at once.
//!
//! Playing sessions win over everything else. Within the eligible set the
//! session with the greatest view offset is chosen; a missing offset counts
//! as 0. Among equal offsets the last one in input order wins.

use crate::types::Session;

/// Select the session to report on, or `None` if there are no sessions.
pub fn select(sessions: &[Session]) -> Option<&Session> {
    let playing = sessions
        .iter()
        .filter(|s| s.is_playing())
        .max_by_key(|s| s.view_offset_or_zero());

    playing.or_else(|| sessions.iter().max_by_key(|s| s.view_offset_or_zero()))
}
