//! Domain entities handed to the playback core
//!
//! Rows arrive from the backend as loosely typed records ([`TrackRecord`],
//! [`TrackVersionRecord`]). They are validated once, at the data-source
//! boundary, into [`Track`] and [`TrackVersion`]. Everything downstream of
//! that boundary only ever sees validated values.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Title used when a record carries none
pub const UNTITLED: &str = "Untitled";

/// Validation failures at the data-source boundary
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackError {
    #[error("Track record has no id")]
    MissingId,

    #[error("Track '{id}' has no audio URL")]
    MissingAudioUrl { id: String },

    #[error("Track '{id}' has an invalid duration: {duration}")]
    InvalidDuration { id: String, duration: f64 },
}

/// A playable unit
///
/// Immutable once handed to the player. Playing a track with a different id
/// replaces the current one entirely.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub audio_url: String,
    pub cover_url: Option<String>,
    /// Known duration in seconds (0 when unknown)
    pub duration: f64,
    pub style_tags: Vec<String>,
    pub lyrics: Option<String>,
}

impl Track {
    /// Build a track from already-trusted values
    pub fn new(id: impl Into<String>, title: impl Into<String>, audio_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            audio_url: audio_url.into(),
            cover_url: None,
            duration: 0.0,
            style_tags: Vec::new(),
            lyrics: None,
        }
    }

    /// Set the known duration (seconds)
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = duration.max(0.0);
        self
    }
}

/// Track row as stored by the backend
///
/// Every field is optional and `metadata` is free-form JSON.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TrackRecord {
    pub id: Option<String>,
    pub title: Option<String>,
    pub audio_url: Option<String>,
    pub cover_url: Option<String>,
    pub duration: Option<f64>,
    pub style_tags: Option<Vec<String>>,
    pub lyrics: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

impl TryFrom<TrackRecord> for Track {
    type Error = TrackError;

    fn try_from(record: TrackRecord) -> Result<Self, Self::Error> {
        let id = non_empty(record.id).ok_or(TrackError::MissingId)?;
        let audio_url =
            non_empty(record.audio_url).ok_or_else(|| TrackError::MissingAudioUrl { id: id.clone() })?;
        let duration = validate_duration(&id, record.duration)?;

        Ok(Track {
            title: non_empty(record.title).unwrap_or_else(|| UNTITLED.to_string()),
            cover_url: non_empty(record.cover_url),
            style_tags: record.style_tags.unwrap_or_default(),
            lyrics: non_empty(record.lyrics),
            id,
            audio_url,
            duration,
        })
    }
}

/// One alternate render of a track
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackVersion {
    pub id: String,
    pub parent_track_id: String,
    pub version_number: u32,
    /// Creation timestamp as reported by the backend (RFC 3339)
    pub created_at: String,
    pub is_master: bool,
    pub title: String,
    /// Versions still rendering have no audio yet
    pub audio_url: Option<String>,
    pub cover_url: Option<String>,
    pub duration: f64,
    pub style_tags: Vec<String>,
    pub lyrics: Option<String>,
}

impl TrackVersion {
    /// Playable form of this version
    pub fn to_track(&self) -> Result<Track, TrackError> {
        let audio_url = self
            .audio_url
            .clone()
            .ok_or_else(|| TrackError::MissingAudioUrl { id: self.id.clone() })?;

        Ok(Track {
            id: self.id.clone(),
            title: self.title.clone(),
            audio_url,
            cover_url: self.cover_url.clone(),
            duration: self.duration,
            style_tags: self.style_tags.clone(),
            lyrics: self.lyrics.clone(),
        })
    }

    pub fn has_audio(&self) -> bool {
        self.audio_url.is_some()
    }
}

/// Version row as stored by the backend
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TrackVersionRecord {
    pub id: Option<String>,
    pub parent_track_id: Option<String>,
    pub version_number: Option<u32>,
    pub created_at: Option<String>,
    pub is_master: Option<bool>,
    pub title: Option<String>,
    pub audio_url: Option<String>,
    pub cover_url: Option<String>,
    pub duration: Option<f64>,
    pub style_tags: Option<Vec<String>>,
    pub lyrics: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

impl TryFrom<TrackVersionRecord> for TrackVersion {
    type Error = TrackError;

    fn try_from(record: TrackVersionRecord) -> Result<Self, Self::Error> {
        let id = non_empty(record.id).ok_or(TrackError::MissingId)?;
        let duration = validate_duration(&id, record.duration)?;

        Ok(TrackVersion {
            parent_track_id: non_empty(record.parent_track_id).unwrap_or_else(|| id.clone()),
            version_number: record.version_number.unwrap_or(0),
            created_at: record.created_at.unwrap_or_default(),
            is_master: record.is_master.unwrap_or(false),
            title: non_empty(record.title).unwrap_or_else(|| UNTITLED.to_string()),
            audio_url: non_empty(record.audio_url),
            cover_url: non_empty(record.cover_url),
            style_tags: record.style_tags.unwrap_or_default(),
            lyrics: non_empty(record.lyrics),
            id,
            duration,
        })
    }
}

/// Validate a batch of records, logging and skipping the invalid ones
pub fn validate_tracks(records: Vec<TrackRecord>) -> Vec<Track> {
    records
        .into_iter()
        .filter_map(|record| match Track::try_from(record) {
            Ok(track) => Some(track),
            Err(e) => {
                log::warn!("Tracks: skipping invalid record: {}", e);
                None
            }
        })
        .collect()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn validate_duration(id: &str, duration: Option<f64>) -> Result<f64, TrackError> {
    match duration {
        None => Ok(0.0),
        Some(d) if d.is_finite() && d >= 0.0 => Ok(d),
        Some(d) => Err(TrackError::InvalidDuration {
            id: id.to_string(),
            duration: d,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, url: Option<&str>) -> TrackRecord {
        TrackRecord {
            id: Some(id.to_string()),
            audio_url: url.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_record_becomes_track() {
        let mut rec = record("t1", Some("https://cdn.example/t1.mp3"));
        rec.title = Some("Night Drive".to_string());
        rec.duration = Some(184.5);
        rec.metadata = Some(serde_json::json!({"provider": "suno", "is_public": true}));

        let track = Track::try_from(rec).unwrap();
        assert_eq!(track.id, "t1");
        assert_eq!(track.title, "Night Drive");
        assert_eq!(track.duration, 184.5);
    }

    #[test]
    fn test_missing_fields_are_rejected() {
        assert_eq!(
            Track::try_from(TrackRecord::default()),
            Err(TrackError::MissingId)
        );
        assert_eq!(
            Track::try_from(record("t2", Some("  "))),
            Err(TrackError::MissingAudioUrl { id: "t2".to_string() })
        );

        let mut rec = record("t3", Some("u"));
        rec.duration = Some(-1.0);
        assert!(matches!(
            Track::try_from(rec),
            Err(TrackError::InvalidDuration { .. })
        ));
    }

    #[test]
    fn test_defaults_for_optional_fields() {
        let track = Track::try_from(record("t4", Some("u"))).unwrap();
        assert_eq!(track.title, UNTITLED);
        assert_eq!(track.duration, 0.0);
        assert!(track.style_tags.is_empty());
    }

    #[test]
    fn test_validate_tracks_skips_invalid_rows() {
        let tracks = validate_tracks(vec![
            record("a", Some("ua")),
            record("b", None),
            record("c", Some("uc")),
        ]);
        let ids: Vec<_> = tracks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_version_without_audio_is_not_playable() {
        let version = TrackVersion::try_from(TrackVersionRecord {
            id: Some("v1".to_string()),
            parent_track_id: Some("t1".to_string()),
            version_number: Some(1),
            ..Default::default()
        })
        .unwrap();

        assert!(!version.has_audio());
        assert_eq!(
            version.to_track(),
            Err(TrackError::MissingAudioUrl { id: "v1".to_string() })
        );
    }

    #[test]
    fn test_version_from_json_row() {
        let row = serde_json::json!({
            "id": "v2",
            "parent_track_id": "t1",
            "version_number": 2,
            "created_at": "2025-11-07T10:00:00Z",
            "is_master": true,
            "audio_url": "https://cdn.example/v2.mp3",
            "duration": 120.0,
            "metadata": {"suno_id": "abc"}
        });
        let record: TrackVersionRecord = serde_json::from_value(row).unwrap();
        let version = TrackVersion::try_from(record).unwrap();

        assert!(version.is_master);
        let track = version.to_track().unwrap();
        assert_eq!(track.id, "v2");
        assert_eq!(track.duration, 120.0);
    }
}
