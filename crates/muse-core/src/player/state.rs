//! Transport state
//!
//! Pure state transitions for the single playback transport. Nothing here
//! touches the audio output; [`super::PlayerController`] diffs the state
//! before and after each operation and drives the output from that.
//!
//! Invariants:
//! - `is_playing` implies a track is loaded
//! - `current_time` is reset to 0 whenever the loaded track id changes and
//!   preserved across pause/resume of the same id
//! - `volume` stays in `[0, 1]`, `playback_rate` in `[0.25, 2.0]`

use serde::Serialize;

use crate::config::{PlayerPreferences, MAX_PLAYBACK_RATE, MIN_PLAYBACK_RATE};
use crate::types::Track;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackState {
    current_track: Option<Track>,
    is_playing: bool,
    current_time: f64,
    duration: f64,
    volume: f32,
    is_muted: bool,
    is_looping: bool,
    is_shuffling: bool,
    playback_rate: f32,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current_track: None,
            is_playing: false,
            current_time: 0.0,
            duration: 0.0,
            volume: 1.0,
            is_muted: false,
            is_looping: false,
            is_shuffling: false,
            playback_rate: 1.0,
        }
    }
}

impl PlaybackState {
    /// Fresh transport carrying persisted preferences
    pub fn from_preferences(prefs: &PlayerPreferences) -> Self {
        let mut state = Self::default();
        state.set_volume(prefs.volume);
        state.is_muted = prefs.muted;
        state.is_looping = prefs.looping;
        state.is_shuffling = prefs.shuffling;
        state.set_playback_rate(prefs.playback_rate);
        state
    }

    // ─────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────

    pub fn current_track(&self) -> Option<&Track> {
        self.current_track.as_ref()
    }

    pub fn current_track_id(&self) -> Option<&str> {
        self.current_track.as_ref().map(|t| t.id.as_str())
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Stored volume (kept while muted)
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Volume actually sent to the output
    pub fn effective_volume(&self) -> f32 {
        if self.is_muted {
            0.0
        } else {
            self.volume
        }
    }

    pub fn is_muted(&self) -> bool {
        self.is_muted
    }

    pub fn is_looping(&self) -> bool {
        self.is_looping
    }

    pub fn is_shuffling(&self) -> bool {
        self.is_shuffling
    }

    pub fn playback_rate(&self) -> f32 {
        self.playback_rate
    }

    // ─────────────────────────────────────────────────────────────
    // Transport
    // ─────────────────────────────────────────────────────────────

    /// Play a track
    ///
    /// Same id as the loaded track: resume in place. Different id: replace
    /// the track, rewind to 0 and take the track's known duration.
    /// Returns the track that was replaced, if any.
    pub fn play(&mut self, track: Track) -> Option<Track> {
        if self.current_track_id() == Some(track.id.as_str()) {
            self.is_playing = true;
            return None;
        }

        self.duration = track.duration;
        self.current_time = 0.0;
        self.is_playing = true;
        self.current_track.replace(track)
    }

    pub fn pause(&mut self) {
        self.is_playing = false;
    }

    /// Resume only if a track is loaded; returns whether anything changed
    pub fn resume(&mut self) -> bool {
        if self.current_track.is_none() {
            return false;
        }
        self.is_playing = true;
        true
    }

    pub fn stop(&mut self) {
        self.is_playing = false;
        self.current_time = 0.0;
    }

    /// Flip between playing and paused
    ///
    /// Without a loaded track there is nothing to play, so the flag stays
    /// false. Returns the new `is_playing`.
    pub fn toggle_play_pause(&mut self) -> bool {
        if self.current_track.is_some() {
            self.is_playing = !self.is_playing;
        }
        self.is_playing
    }

    /// Position reported by the output (seconds, never negative)
    pub fn set_current_time(&mut self, time: f64) {
        if time.is_finite() {
            self.current_time = time.max(0.0);
        }
    }

    /// Duration reported by the output (seconds, never negative)
    pub fn set_duration(&mut self, duration: f64) {
        if duration.is_finite() {
            self.duration = duration.max(0.0);
        }
    }

    /// Mark playback as failed; the track stays loaded
    pub fn fail(&mut self) {
        self.is_playing = false;
    }

    // ─────────────────────────────────────────────────────────────
    // Audio controls
    // ─────────────────────────────────────────────────────────────

    /// Clamp to `[0, 1]` and unmute
    ///
    /// NaN is not a volume: it is ignored, but the call still unmutes.
    pub fn set_volume(&mut self, volume: f32) {
        if !volume.is_nan() {
            self.volume = volume.clamp(0.0, 1.0);
        }
        self.is_muted = false;
    }

    /// Flip mute without touching the stored volume
    pub fn toggle_mute(&mut self) {
        self.is_muted = !self.is_muted;
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.is_looping = looping;
    }

    pub fn set_shuffling(&mut self, shuffling: bool) {
        self.is_shuffling = shuffling;
    }

    /// Clamp to `[0.25, 2.0]`; NaN is ignored
    pub fn set_playback_rate(&mut self, rate: f32) {
        if !rate.is_nan() {
            self.playback_rate = rate.clamp(MIN_PLAYBACK_RATE, MAX_PLAYBACK_RATE);
        }
    }

    /// Preferences worth persisting from this state
    pub fn write_preferences(&self, prefs: &mut PlayerPreferences) {
        prefs.volume = self.volume;
        prefs.muted = self.is_muted;
        prefs.looping = self.is_looping;
        prefs.shuffling = self.is_shuffling;
        prefs.playback_rate = self.playback_rate;
    }
}
