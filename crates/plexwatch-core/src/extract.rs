//! Metadata extraction: resolve a loosely-typed [`Session`] into a
//! fixed-shape [`PlaybackDescription`].
//!
//! Extraction never fails. Every absent field resolves to its default here,
//! so nothing downstream needs to check for presence.

use chrono::{DateTime, Utc};

use crate::types::{MediaDetails, MediaKind, PlaybackDescription, PlayerInfo, Progress, Session};

/// Extract a description, stamping progress with the current time.
pub fn extract(session: &Session) -> PlaybackDescription {
    extract_at(session, Utc::now())
}

/// Extract a description with an explicit capture time.
pub fn extract_at(session: &Session, captured_at: DateTime<Utc>) -> PlaybackDescription {
    let player = session.player.as_ref();
    let player_state = session.player_state().cloned().unwrap_or_default();
    let device = player.and_then(|p| p.device.clone());
    let platform = player.and_then(|p| p.platform.clone());

    PlaybackDescription {
        title: session.title.clone(),
        media_type: session.kind.clone(),
        player_state: player_state.clone(),
        duration: session.duration,
        year: session.year,
        device: device.clone(),
        platform: platform.clone(),
        genres: genre_tags(session),
        content_rating: session.content_rating.clone(),
        summary: session.summary.clone(),
        progress: Progress {
            view_offset: session.view_offset_or_zero(),
            timestamp: captured_at,
        },
        player: PlayerInfo {
            title: player.and_then(|p| p.title.clone()),
            device,
            platform,
            state: player_state,
        },
        details: media_details(session),
    }
}

fn genre_tags(session: &Session) -> Vec<String> {
    session
        .genres
        .iter()
        .flatten()
        .filter_map(|g| g.tag())
        .map(str::to_string)
        .collect()
}

fn media_details(session: &Session) -> MediaDetails {
    match session.media_kind() {
        MediaKind::Episode => MediaDetails::Episode {
            show_title: session.grandparent_title.clone(),
            season_number: session.parent_index,
            episode_number: session.index,
        },
        MediaKind::Movie => MediaDetails::Movie {
            studio: session.studio.clone(),
            rating: session.rating,
        },
        MediaKind::Other => MediaDetails::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Genre, Player, PlayerState};
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn episode_session() -> Session {
        Session {
            title: Some("Episode Title".to_string()),
            kind: Some("episode".to_string()),
            duration: Some(1_800_000),
            year: Some(2024),
            summary: Some("Episode summary".to_string()),
            content_rating: Some("TV-14".to_string()),
            genres: Some(vec![Genre::from("Drama"), Genre::from("Sci-Fi")]),
            view_offset: Some(360_000),
            grandparent_title: Some("Show Title".to_string()),
            parent_index: Some(2),
            index: Some(5),
            player: Some(Player {
                title: Some("Plex for Windows".to_string()),
                device: Some("PC".to_string()),
                platform: Some("Windows".to_string()),
                state: Some(PlayerState::Playing),
            }),
            ..Session::default()
        }
    }

    fn movie_session() -> Session {
        Session {
            title: Some("Movie Title".to_string()),
            kind: Some("movie".to_string()),
            duration: Some(7_200_000),
            year: Some(2024),
            summary: Some("Movie summary".to_string()),
            content_rating: Some("PG-13".to_string()),
            genres: Some(vec![Genre::from("Action"), Genre::from("Adventure")]),
            view_offset: Some(900_000),
            studio: Some("Universal Studios".to_string()),
            rating: Some(8.5),
            player: Some(Player {
                title: Some("Plex for TV".to_string()),
                device: Some("Smart TV".to_string()),
                platform: Some("Tizen".to_string()),
                state: Some(PlayerState::Playing),
            }),
            ..Session::default()
        }
    }

    #[test]
    fn episode_session_is_fully_extracted() {
        let desc = extract_at(&episode_session(), fixed_now());

        assert_eq!(desc.title.as_deref(), Some("Episode Title"));
        assert_eq!(desc.media_type.as_deref(), Some("episode"));
        assert_eq!(desc.player_state, PlayerState::Playing);
        assert_eq!(desc.duration, Some(1_800_000));
        assert_eq!(desc.year, Some(2024));
        assert_eq!(desc.summary.as_deref(), Some("Episode summary"));
        assert_eq!(desc.content_rating.as_deref(), Some("TV-14"));
        assert_eq!(desc.genres, vec!["Drama", "Sci-Fi"]);
        assert_eq!(desc.progress.view_offset, 360_000);
        assert_eq!(desc.progress.timestamp, fixed_now());
        assert_eq!(
            desc.details,
            MediaDetails::Episode {
                show_title: Some("Show Title".to_string()),
                season_number: Some(2),
                episode_number: Some(5),
            }
        );
        assert_eq!(desc.player.title.as_deref(), Some("Plex for Windows"));
        assert_eq!(desc.player.device.as_deref(), Some("PC"));
        assert_eq!(desc.player.platform.as_deref(), Some("Windows"));
        assert_eq!(desc.player.state, PlayerState::Playing);
    }

    #[test]
    fn movie_session_is_fully_extracted() {
        let desc = extract_at(&movie_session(), fixed_now());

        assert_eq!(desc.title.as_deref(), Some("Movie Title"));
        assert_eq!(desc.media_type.as_deref(), Some("movie"));
        assert_eq!(desc.genres, vec!["Action", "Adventure"]);
        assert_eq!(desc.progress.view_offset, 900_000);
        assert_eq!(
            desc.details,
            MediaDetails::Movie {
                studio: Some("Universal Studios".to_string()),
                rating: Some(8.5),
            }
        );
        assert_eq!(desc.player.device.as_deref(), Some("Smart TV"));
        assert_eq!(desc.device.as_deref(), Some("Smart TV"));
        assert_eq!(desc.platform.as_deref(), Some("Tizen"));
    }

    #[test]
    fn missing_attributes_use_defaults() {
        let session = Session {
            title: Some("Test Title".to_string()),
            kind: Some("movie".to_string()),
            player: Some(Player {
                state: Some(PlayerState::Playing),
                ..Player::default()
            }),
            ..Session::default()
        };
        let desc = extract_at(&session, fixed_now());

        assert_eq!(desc.title.as_deref(), Some("Test Title"));
        assert!(desc.duration.is_none());
        assert!(desc.year.is_none());
        assert!(desc.summary.is_none());
        assert!(desc.content_rating.is_none());
        assert!(desc.genres.is_empty());
        assert_eq!(desc.progress.view_offset, 0);
        assert!(desc.player.title.is_none());
        assert!(desc.player.device.is_none());
        assert!(desc.player.platform.is_none());
        assert_eq!(desc.player.state, PlayerState::Playing);
        assert_eq!(
            desc.details,
            MediaDetails::Movie {
                studio: None,
                rating: None
            }
        );
    }

    #[test]
    fn empty_session_never_fails() {
        let desc = extract_at(&Session::default(), fixed_now());

        assert!(desc.title.is_none());
        assert!(desc.media_type.is_none());
        assert_eq!(desc.player_state, PlayerState::Unknown);
        assert_eq!(desc.player.state, PlayerState::Unknown);
        assert!(desc.genres.is_empty());
        assert_eq!(desc.progress.view_offset, 0);
        assert_eq!(desc.details, MediaDetails::None);
    }

    #[test]
    fn player_without_state_defaults_to_unknown() {
        let session = Session {
            player: Some(Player {
                device: Some("PC".to_string()),
                ..Player::default()
            }),
            ..Session::default()
        };
        let desc = extract_at(&session, fixed_now());
        assert_eq!(desc.player_state, PlayerState::Unknown);
        assert_eq!(desc.player.device.as_deref(), Some("PC"));
    }

    #[test]
    fn empty_genre_list_and_untagged_genres() {
        let mut session = Session {
            genres: Some(Vec::new()),
            ..Session::default()
        };
        assert!(extract_at(&session, fixed_now()).genres.is_empty());

        session.genres = Some(vec![Genre::Tagged { tag: None }, Genre::from("Drama")]);
        assert_eq!(extract_at(&session, fixed_now()).genres, vec!["Drama"]);
    }

    #[test]
    fn other_types_get_no_type_specific_fields() {
        let session = Session {
            kind: Some("track".to_string()),
            grandparent_title: Some("Artist".to_string()),
            studio: Some("Label".to_string()),
            ..Session::default()
        };
        let desc = extract_at(&session, fixed_now());
        assert_eq!(desc.details, MediaDetails::None);

        let json = serde_json::to_value(&desc).expect("serialize");
        for key in ["show_title", "season_number", "episode_number", "studio", "rating"] {
            assert!(json.get(key).is_none(), "{key} must not be emitted");
        }
    }

    #[test]
    fn episode_fields_do_not_leak_into_movie_output() {
        let mut session = movie_session();
        session.grandparent_title = Some("Stray".to_string());
        session.parent_index = Some(1);

        let json = serde_json::to_value(extract_at(&session, fixed_now())).expect("serialize");
        assert_eq!(json["studio"], "Universal Studios");
        assert_eq!(json["rating"], 8.5);
        assert!(json.get("show_title").is_none());
        assert!(json.get("season_number").is_none());
        assert!(json.get("episode_number").is_none());
    }

    #[test]
    fn movie_fields_do_not_leak_into_episode_output() {
        let mut session = episode_session();
        session.studio = Some("Stray".to_string());

        let json = serde_json::to_value(extract_at(&session, fixed_now())).expect("serialize");
        assert_eq!(json["show_title"], "Show Title");
        assert_eq!(json["season_number"], 2);
        assert_eq!(json["episode_number"], 5);
        assert!(json.get("studio").is_none());
        assert!(json.get("rating").is_none());
    }

    #[test]
    fn serialized_shape_uses_wire_keys() {
        let json = serde_json::to_value(extract_at(&Session::default(), fixed_now()))
            .expect("serialize");

        for key in [
            "title",
            "type",
            "player_state",
            "duration",
            "year",
            "device",
            "platform",
            "genres",
            "contentRating",
            "summary",
            "progress",
            "player",
        ] {
            assert!(json.get(key).is_some(), "{key} must always be present");
        }
        assert_eq!(json["player_state"], "unknown");
        assert_eq!(json["genres"], serde_json::json!([]));
        assert_eq!(json["progress"]["viewOffset"], 0);
        assert!(json["progress"]["timestamp"].is_string());
        assert_eq!(json["player"]["state"], "unknown");
        assert!(json["player"]["device"].is_null());
    }

    #[test]
    fn heartbeat_data_omits_capture_time() {
        let session = Session {
            title: Some("Heat".to_string()),
            kind: Some("movie".to_string()),
            studio: Some("Warner".to_string()),
            view_offset: Some(1_000),
            ..Session::default()
        };
        let earlier = extract_at(&session, fixed_now());
        let later = extract_at(&session, fixed_now() + chrono::Duration::seconds(5));

        let data = serde_json::to_value(earlier.heartbeat_data()).expect("serialize");
        assert!(data.get("progress").is_none());
        assert_eq!(data["title"], "Heat");
        assert_eq!(data["studio"], "Warner");
        assert_eq!(
            data,
            serde_json::to_value(later.heartbeat_data()).expect("serialize")
        );
    }
}
