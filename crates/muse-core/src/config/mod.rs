//! Configuration for the Muse playback core
//!
//! One YAML file with a section per controller:
//!
//! ```yaml
//! player:
//!   volume: 0.8
//!   muted: false
//!   looping: false
//!   shuffling: false
//!   playback_rate: 1.0
//!   queue_policy: allow_duplicates
//! recorder:
//!   max_duration_secs: 60
//! mixer:
//!   volume: 0.8
//! ```
//!
//! Every struct is `#[serde(default)]`, so partial files are fine.

mod io;
mod paths;

pub use io::{load_config, save_config, Sanitize};
pub use paths::{default_config_dir, default_config_path, default_recordings_dir};

use serde::{Deserialize, Serialize};

/// Lowest playback rate the transport accepts
pub const MIN_PLAYBACK_RATE: f32 = 0.25;
/// Highest playback rate the transport accepts
pub const MAX_PLAYBACK_RATE: f32 = 2.0;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MuseConfig {
    pub player: PlayerPreferences,
    pub recorder: RecorderConfig,
    pub mixer: MixerConfig,
}

impl Sanitize for MuseConfig {
    fn sanitized(self) -> Self {
        Self {
            player: self.player.sanitized(),
            recorder: self.recorder.sanitized(),
            mixer: self.mixer.sanitized(),
        }
    }
}

/// How the queue treats a track whose id is already queued
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueuePolicy {
    /// Append unconditionally; the same id may appear several times
    #[default]
    AllowDuplicates,
    /// Adding an id that is already queued does nothing
    UniqueById,
}

/// Player preferences persisted between sessions
///
/// Only user preferences live here. Transport state (track, position,
/// queue) is never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerPreferences {
    pub volume: f32,
    pub muted: bool,
    pub looping: bool,
    pub shuffling: bool,
    pub playback_rate: f32,
    pub queue_policy: QueuePolicy,
    /// Capacity of the bounded output → controller event channel
    pub event_capacity: usize,
    /// "Previous" restarts the current track when further in than this
    pub restart_threshold_secs: f64,
}

impl Default for PlayerPreferences {
    fn default() -> Self {
        Self {
            volume: 1.0,
            muted: false,
            looping: false,
            shuffling: false,
            playback_rate: 1.0,
            queue_policy: QueuePolicy::AllowDuplicates,
            event_capacity: 256,
            restart_threshold_secs: 3.0,
        }
    }
}

impl Sanitize for PlayerPreferences {
    fn sanitized(self) -> Self {
        let defaults = Self::default();
        Self {
            volume: clamp_or(self.volume, 0.0, 1.0, defaults.volume),
            playback_rate: clamp_or(
                self.playback_rate,
                MIN_PLAYBACK_RATE,
                MAX_PLAYBACK_RATE,
                defaults.playback_rate,
            ),
            event_capacity: self.event_capacity.max(1),
            restart_threshold_secs: if self.restart_threshold_secs.is_finite() {
                self.restart_threshold_secs.max(0.0)
            } else {
                defaults.restart_threshold_secs
            },
            ..self
        }
    }
}

/// Recorder settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    /// Recording stops on its own after this many seconds
    pub max_duration_secs: u32,
    /// Analyser window size (power of two)
    pub fft_size: usize,
    /// MIME type attached to finished recordings
    pub mime_type: String,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            max_duration_secs: 60,
            fft_size: 2048,
            mime_type: "audio/wav".to_string(),
        }
    }
}

impl Sanitize for RecorderConfig {
    fn sanitized(self) -> Self {
        let fft_size = self.fft_size.clamp(32, 32768).next_power_of_two();
        Self {
            max_duration_secs: self.max_duration_secs.max(1),
            fft_size,
            ..self
        }
    }
}

/// Prompt mixer and live-session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MixerConfig {
    /// Output gain of the live stream
    pub volume: f32,
    /// Playback starts this far behind the first received chunk
    pub buffer_secs: f64,
    pub sample_rate: u32,
    /// Interleaved channels in received audio chunks (1 or 2)
    pub channels: u16,
    /// Prompt texts, one slot each
    pub prompts: Vec<String>,
}

/// Prompt slots the mixer starts with
pub const DEFAULT_PROMPTS: [&str; 16] = [
    "Epic orchestral symphony",
    "Ambient electronic soundscape",
    "Jazz piano improvisation",
    "Heavy metal guitar riffs",
    "Tropical house beat",
    "Classical string quartet",
    "Hip-hop drum patterns",
    "Synthwave retro vibes",
    "Blues harmonica solo",
    "Techno bass drops",
    "Folk acoustic guitar",
    "R&B smooth vocals",
    "Rock drum fills",
    "EDM synth leads",
    "Reggae offbeat rhythm",
    "Soul brass section",
];

impl Default for MixerConfig {
    fn default() -> Self {
        Self {
            volume: 0.8,
            buffer_secs: 2.0,
            sample_rate: 48_000,
            channels: 2,
            prompts: DEFAULT_PROMPTS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl Sanitize for MixerConfig {
    fn sanitized(self) -> Self {
        let defaults = Self::default();
        Self {
            volume: clamp_or(self.volume, 0.0, 1.0, defaults.volume),
            buffer_secs: if self.buffer_secs.is_finite() {
                self.buffer_secs.max(0.0)
            } else {
                defaults.buffer_secs
            },
            sample_rate: if self.sample_rate == 0 {
                defaults.sample_rate
            } else {
                self.sample_rate
            },
            channels: self.channels.clamp(1, 2),
            prompts: if self.prompts.is_empty() {
                defaults.prompts
            } else {
                self.prompts
            },
        }
    }
}

fn clamp_or(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MuseConfig::default();
        assert_eq!(config.player.volume, 1.0);
        assert_eq!(config.player.playback_rate, 1.0);
        assert_eq!(config.player.queue_policy, QueuePolicy::AllowDuplicates);
        assert_eq!(config.recorder.max_duration_secs, 60);
        assert_eq!(config.mixer.prompts.len(), 16);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = "player:\n  volume: 0.4\n  queue_policy: unique_by_id\n";
        let config: MuseConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.player.volume, 0.4);
        assert_eq!(config.player.queue_policy, QueuePolicy::UniqueById);
        assert_eq!(config.player.playback_rate, 1.0);
        assert_eq!(config.mixer, MixerConfig::default());
    }

    #[test]
    fn test_sanitize_clamps_preferences() {
        let prefs = PlayerPreferences {
            volume: 3.0,
            playback_rate: 9.0,
            event_capacity: 0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(prefs.volume, 1.0);
        assert_eq!(prefs.playback_rate, MAX_PLAYBACK_RATE);
        assert_eq!(prefs.event_capacity, 1);

        let prefs = PlayerPreferences {
            volume: f32::NAN,
            playback_rate: 0.01,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(prefs.volume, 1.0);
        assert_eq!(prefs.playback_rate, MIN_PLAYBACK_RATE);
    }

    #[test]
    fn test_sanitize_rounds_fft_size() {
        let recorder = RecorderConfig {
            fft_size: 1000,
            max_duration_secs: 0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(recorder.fft_size, 1024);
        assert_eq!(recorder.max_duration_secs, 1);
    }

    #[test]
    fn test_yaml_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");

        let mut config = MuseConfig::default();
        config.player.volume = 0.3;
        config.player.muted = true;
        config.player.shuffling = true;
        config.mixer.prompts = vec!["Dub techno chords".to_string()];

        save_config(&config, &path).unwrap();
        let loaded: MuseConfig = load_config(&path);
        assert_eq!(loaded, config);
    }
}
