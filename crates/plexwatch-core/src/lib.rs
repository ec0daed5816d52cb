//! plexwatch-core: session selection and metadata extraction.
//! Pure logic over already-fetched session records. No I/O, no async.

pub mod extract;
mod lenient;
pub mod select;
pub mod types;

pub use extract::{extract, extract_at};
pub use select::select;
pub use types::{
    Genre, HeartbeatData, MediaDetails, MediaKind, PlaybackDescription, Player, PlayerInfo,
    PlayerState, Progress, Session,
};
