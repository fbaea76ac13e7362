//! Track catalog loading
//!
//! The catalog is a YAML list of backend track rows. Rows that do not
//! validate are logged and skipped; the rest become playable tracks.

use std::path::Path;

use anyhow::{Context, Result};
use muse_core::{validate_tracks, Track, TrackRecord};

pub fn load_catalog(path: &Path) -> Result<Vec<Track>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog {:?}", path))?;
    parse_catalog(&contents).with_context(|| format!("Failed to parse catalog {:?}", path))
}

pub fn parse_catalog(contents: &str) -> Result<Vec<Track>> {
    let records: Vec<TrackRecord> = serde_yaml::from_str(contents)?;
    let total = records.len();
    let tracks = validate_tracks(records);
    log::info!("Catalog: {} of {} tracks playable", tracks.len(), total);
    Ok(tracks)
}

/// A few short tracks so the player is usable without a catalog file
pub fn demo_catalog() -> Vec<Track> {
    [
        ("demo-1", "Night Drive", 42.0),
        ("demo-2", "Glass Harbor", 37.5),
        ("demo-3", "Paper Lanterns", 51.0),
        ("demo-4", "Slow Orbit", 28.0),
    ]
    .into_iter()
    .map(|(id, title, duration)| {
        Track::new(id, title, format!("https://cdn.muse.example/audio/{id}.mp3")).with_duration(duration)
    })
    .collect()
}
