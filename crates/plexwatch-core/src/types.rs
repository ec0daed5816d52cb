use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use crate::lenient::{lenient, lenient_list};

// ─── Player state ─────────────────────────────────────────────────

/// Playback state reported by a player.
///
/// `Unknown` is the sentinel used when the server does not report a state.
/// It is distinct from both `Playing` and `Paused`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PlayerState {
    Playing,
    Paused,
    Buffering,
    #[default]
    Unknown,
    Other(String),
}

impl PlayerState {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Buffering => "buffering",
            Self::Unknown => "unknown",
            Self::Other(s) => s.as_str(),
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing)
    }
}

impl From<String> for PlayerState {
    fn from(s: String) -> Self {
        match s.as_str() {
            "playing" => Self::Playing,
            "paused" => Self::Paused,
            "buffering" => Self::Buffering,
            "unknown" => Self::Unknown,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for PlayerState {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<PlayerState> for String {
    fn from(state: PlayerState) -> Self {
        match state {
            PlayerState::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for PlayerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Media kind ───────────────────────────────────────────────────

/// Discriminant derived from the session `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Movie,
    Episode,
    Other,
}

impl MediaKind {
    pub fn from_type(kind: Option<&str>) -> Self {
        match kind {
            Some("movie") => Self::Movie,
            Some("episode") => Self::Episode,
            _ => Self::Other,
        }
    }
}

// ─── Session (raw, loosely typed) ─────────────────────────────────

/// One genre entry. The server sends `{"tag": "Drama"}`; bare strings are
/// accepted too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Genre {
    Tagged { tag: Option<String> },
    Bare(String),
}

impl Genre {
    pub fn tag(&self) -> Option<&str> {
        match self {
            Self::Tagged { tag } => tag.as_deref(),
            Self::Bare(s) => Some(s.as_str()),
        }
    }
}

impl From<&str> for Genre {
    fn from(tag: &str) -> Self {
        Self::Tagged {
            tag: Some(tag.to_string()),
        }
    }
}

/// Player sub-record of a session.
///
/// A field with an unexpected JSON type decodes as `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Player {
    #[serde(deserialize_with = "lenient")]
    pub state: Option<PlayerState>,
    #[serde(deserialize_with = "lenient")]
    pub device: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub platform: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub title: Option<String>,
}

/// One active playback stream as reported by the media server.
///
/// Field names follow the server's JSON keys. Any field may be absent, and a
/// field with an unexpected JSON type decodes as `None`; unreadable genre
/// entries are dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Session {
    #[serde(deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(rename = "type", deserialize_with = "lenient")]
    pub kind: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub duration: Option<u64>,
    #[serde(deserialize_with = "lenient")]
    pub year: Option<i32>,
    #[serde(deserialize_with = "lenient")]
    pub content_rating: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub summary: Option<String>,
    #[serde(rename = "Genre", deserialize_with = "lenient_list")]
    pub genres: Option<Vec<Genre>>,
    /// Show title (episodes).
    #[serde(deserialize_with = "lenient")]
    pub grandparent_title: Option<String>,
    /// Season number (episodes).
    #[serde(deserialize_with = "lenient")]
    pub parent_index: Option<u32>,
    /// Episode number (episodes).
    #[serde(deserialize_with = "lenient")]
    pub index: Option<u32>,
    #[serde(deserialize_with = "lenient")]
    pub studio: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub rating: Option<f64>,
    /// Playback position in milliseconds.
    #[serde(deserialize_with = "lenient")]
    pub view_offset: Option<u64>,
    #[serde(rename = "Player", deserialize_with = "lenient")]
    pub player: Option<Player>,
}

impl Session {
    pub fn media_kind(&self) -> MediaKind {
        MediaKind::from_type(self.kind.as_deref())
    }

    /// Player state, if the player sub-record exposes one.
    pub fn player_state(&self) -> Option<&PlayerState> {
        self.player.as_ref().and_then(|p| p.state.as_ref())
    }

    pub fn is_playing(&self) -> bool {
        self.player_state().is_some_and(PlayerState::is_playing)
    }

    pub fn view_offset_or_zero(&self) -> u64 {
        self.view_offset.unwrap_or(0)
    }
}

// ─── Playback description (normalized) ────────────────────────────

/// Type-specific fields. Only the block matching the session type is emitted.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaDetails {
    Episode {
        show_title: Option<String>,
        season_number: Option<u32>,
        episode_number: Option<u32>,
    },
    Movie {
        studio: Option<String>,
        rating: Option<f64>,
    },
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Progress {
    #[serde(rename = "viewOffset")]
    pub view_offset: u64,
    /// Capture time of the description, not a value read from the session.
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerInfo {
    pub title: Option<String>,
    pub device: Option<String>,
    pub platform: Option<String>,
    pub state: PlayerState,
}

/// Normalized description of one session, sent as heartbeat data.
///
/// Every common field is always present; absent inputs become `None`,
/// an empty list, `0` or [`PlayerState::Unknown`].
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackDescription {
    pub title: Option<String>,
    pub media_type: Option<String>,
    pub player_state: PlayerState,
    pub duration: Option<u64>,
    pub year: Option<i32>,
    pub device: Option<String>,
    pub platform: Option<String>,
    pub genres: Vec<String>,
    pub content_rating: Option<String>,
    pub summary: Option<String>,
    pub progress: Progress,
    pub player: PlayerInfo,
    pub details: MediaDetails,
}

impl PlaybackDescription {
    pub fn is_playing(&self) -> bool {
        self.player_state.is_playing()
    }

    /// View of this description used as heartbeat data.
    pub fn heartbeat_data(&self) -> HeartbeatData<'_> {
        HeartbeatData(self)
    }

    fn serialize_fields<S: Serializer>(
        &self,
        serializer: S,
        with_progress: bool,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("title", &self.title)?;
        map.serialize_entry("type", &self.media_type)?;
        map.serialize_entry("player_state", &self.player_state)?;
        map.serialize_entry("duration", &self.duration)?;
        map.serialize_entry("year", &self.year)?;
        map.serialize_entry("device", &self.device)?;
        map.serialize_entry("platform", &self.platform)?;
        map.serialize_entry("genres", &self.genres)?;
        map.serialize_entry("contentRating", &self.content_rating)?;
        map.serialize_entry("summary", &self.summary)?;
        if with_progress {
            map.serialize_entry("progress", &self.progress)?;
        }
        map.serialize_entry("player", &self.player)?;
        match &self.details {
            MediaDetails::Episode {
                show_title,
                season_number,
                episode_number,
            } => {
                map.serialize_entry("show_title", show_title)?;
                map.serialize_entry("season_number", season_number)?;
                map.serialize_entry("episode_number", episode_number)?;
            }
            MediaDetails::Movie { studio, rating } => {
                map.serialize_entry("studio", studio)?;
                map.serialize_entry("rating", rating)?;
            }
            MediaDetails::None => {}
        }
        map.end()
    }
}

impl Serialize for PlaybackDescription {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.serialize_fields(serializer, true)
    }
}

/// A [`PlaybackDescription`] serialized without its `progress` block.
///
/// The activity tracker only merges heartbeats whose data is identical, so
/// the payload carries nothing that changes while playback continues.
#[derive(Debug, Clone, Copy)]
pub struct HeartbeatData<'a>(&'a PlaybackDescription);

impl Serialize for HeartbeatData<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize_fields(serializer, false)
    }
}
