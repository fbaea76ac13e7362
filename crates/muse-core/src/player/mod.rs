//! Playback controller
//!
//! [`PlayerController`] is the one place that owns the transport state, the
//! pending-track queue and the audio output. It is constructed explicitly
//! ([`PlayerController::create`]) and handed to whoever needs it, then torn
//! down with [`PlayerController::dispose`]; there is no global instance.
//!
//! # Architecture
//!
//! ```text
//!  UI intents ──► PlayerController ──► AudioOutput (load/play/pause/seek/volume/rate)
//!                   ▲        │
//!                   │        └──► subscribers (PlayerSnapshot per mutation)
//!                   │
//!   pump_events() ◄─┴── flume (bounded) ◄── EventSender (time updates, ended, errors)
//! ```
//!
//! Every operation mutates [`PlaybackState`] first, then diffs the state
//! against its previous value to drive the output, so the output can never
//! be told something the state does not reflect.

mod event;
mod output;
mod queue;
mod state;

pub use event::{EventSender, PlayerEvent};
pub use output::{AudioOutput, NullOutput};
pub use queue::{Queue, QueueError};
pub use state::PlaybackState;

use flume::{Receiver, Sender, TrySendError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::config::PlayerPreferences;
use crate::types::Track;

/// How many replaced tracks "previous" can walk back through
const HISTORY_LIMIT: usize = 50;

/// Pending snapshots per subscriber before new ones are skipped
const SUBSCRIBER_CAPACITY: usize = 64;

/// Everything a view needs to render the player
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSnapshot {
    pub state: PlaybackState,
    pub queue: Vec<Track>,
    pub last_error: Option<String>,
}

pub struct PlayerController<O: AudioOutput> {
    state: PlaybackState,
    queue: Queue,
    /// Tracks replaced by `play`, most recent last
    history: Vec<Track>,
    output: O,
    events: Receiver<PlayerEvent>,
    subscribers: Vec<Sender<PlayerSnapshot>>,
    preferences: PlayerPreferences,
    rng: StdRng,
    last_error: Option<String>,
}

impl<O: AudioOutput> PlayerController<O> {
    /// Create a controller that takes ownership of the output
    pub fn create(mut output: O, preferences: &PlayerPreferences) -> Self {
        let (sender, events) = event::event_channel(preferences.event_capacity);
        output.attach(sender);

        let state = PlaybackState::from_preferences(preferences);
        output.set_volume(state.effective_volume());
        output.set_playback_rate(state.playback_rate());

        log::info!(
            "Player: created (volume {:.2}, muted {}, rate {:.2}, queue policy {:?})",
            state.volume(),
            state.is_muted(),
            state.playback_rate(),
            preferences.queue_policy
        );

        Self {
            state,
            queue: Queue::new(preferences.queue_policy),
            history: Vec::new(),
            output,
            events,
            subscribers: Vec::new(),
            preferences: preferences.clone(),
            rng: StdRng::from_entropy(),
            last_error: None,
        }
    }

    /// Make shuffle picks reproducible
    pub fn with_shuffle_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Tear down: release the output and return the preferences to persist
    pub fn dispose(mut self) -> PlayerPreferences {
        self.output.unload();
        self.queue.clear();
        self.subscribers.clear();
        log::info!("Player: disposed");
        self.preferences()
    }

    // ─────────────────────────────────────────────────────────────
    // Read access
    // ─────────────────────────────────────────────────────────────

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn queue(&self) -> &[Track] {
        self.queue.tracks()
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    /// Message of the last playback failure, for a one-shot toast
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn take_error(&mut self) -> Option<String> {
        self.last_error.take()
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            state: self.state.clone(),
            queue: self.queue.tracks().to_vec(),
            last_error: self.last_error.clone(),
        }
    }

    /// Current preferences (transport settings merged into the loaded ones)
    pub fn preferences(&self) -> PlayerPreferences {
        let mut preferences = self.preferences.clone();
        self.state.write_preferences(&mut preferences);
        preferences
    }

    /// Receive a snapshot after every state change
    pub fn subscribe(&mut self) -> Receiver<PlayerSnapshot> {
        let (tx, rx) = flume::bounded(SUBSCRIBER_CAPACITY);
        self.subscribers.push(tx);
        rx
    }

    // ─────────────────────────────────────────────────────────────
    // Transport
    // ─────────────────────────────────────────────────────────────

    /// Play a track: resume if it is already loaded, otherwise replace
    pub fn play(&mut self, track: Track) {
        let prev = self.state.clone();
        self.load_and_play(track, true);
        self.commit(&prev);
    }

    pub fn pause(&mut self) {
        let prev = self.state.clone();
        self.state.pause();
        self.commit(&prev);
    }

    pub fn resume(&mut self) {
        let prev = self.state.clone();
        if !self.state.resume() {
            log::debug!("Player: resume ignored, no track loaded");
        }
        self.commit(&prev);
    }

    /// Stop and rewind to 0
    pub fn stop(&mut self) {
        let prev = self.state.clone();
        self.stop_and_rewind();
        self.commit(&prev);
    }

    pub fn toggle_play_pause(&mut self) {
        let prev = self.state.clone();
        if self.state.current_track().is_none() {
            log::debug!("Player: toggle ignored, no track loaded");
        }
        self.state.toggle_play_pause();
        self.commit(&prev);
    }

    /// User seek; clamped to the known duration
    pub fn seek(&mut self, position: f64) {
        if self.state.current_track().is_none() || !position.is_finite() {
            return;
        }
        let prev = self.state.clone();
        let duration = self.state.duration();
        let position = if duration > 0.0 {
            position.clamp(0.0, duration)
        } else {
            position.max(0.0)
        };
        self.state.set_current_time(position);
        self.output.seek(position);
        self.commit(&prev);
    }

    /// Position setter fed by output time updates (does not seek)
    pub fn set_current_time(&mut self, time: f64) {
        let prev = self.state.clone();
        self.state.set_current_time(time);
        self.commit(&prev);
    }

    pub fn set_duration(&mut self, duration: f64) {
        let prev = self.state.clone();
        self.state.set_duration(duration);
        self.commit(&prev);
    }

    // ─────────────────────────────────────────────────────────────
    // Audio controls
    // ─────────────────────────────────────────────────────────────

    pub fn set_volume(&mut self, volume: f32) {
        let prev = self.state.clone();
        self.state.set_volume(volume);
        self.commit(&prev);
    }

    pub fn toggle_mute(&mut self) {
        let prev = self.state.clone();
        self.state.toggle_mute();
        self.commit(&prev);
    }

    pub fn set_looping(&mut self, looping: bool) {
        let prev = self.state.clone();
        self.state.set_looping(looping);
        self.commit(&prev);
    }

    pub fn set_shuffling(&mut self, shuffling: bool) {
        let prev = self.state.clone();
        self.state.set_shuffling(shuffling);
        self.commit(&prev);
    }

    pub fn set_playback_rate(&mut self, rate: f32) {
        let prev = self.state.clone();
        self.state.set_playback_rate(rate);
        self.commit(&prev);
    }

    // ─────────────────────────────────────────────────────────────
    // Queue
    // ─────────────────────────────────────────────────────────────

    /// Append to the queue; false when the queue policy rejected it
    pub fn add_to_queue(&mut self, track: Track) -> bool {
        let prev = self.state.clone();
        let added = self.queue.push(track);
        self.commit(&prev);
        added
    }

    /// Remove every queued entry with this id (no-op when absent)
    pub fn remove_from_queue(&mut self, track_id: &str) -> usize {
        let prev = self.state.clone();
        let removed = self.queue.remove(track_id);
        self.commit(&prev);
        removed
    }

    pub fn clear_queue(&mut self) {
        let prev = self.state.clone();
        self.queue.clear();
        self.commit(&prev);
    }

    /// Reorder the queue (drag and drop)
    pub fn move_in_queue(&mut self, from: usize, to: usize) -> Result<(), QueueError> {
        let prev = self.state.clone();
        self.queue.move_track(from, to)?;
        self.commit(&prev);
        Ok(())
    }

    /// Advance to the next queued track, or stop when the queue is empty
    ///
    /// Afterwards either a fresh track is playing from 0 and the queue is one
    /// shorter, or playback is stopped at 0. On an empty queue the finished
    /// track stays loaded so the UI can keep showing it.
    pub fn play_next(&mut self) {
        let prev = self.state.clone();
        self.advance();
        self.commit(&prev);
    }

    /// Restart the current track, or go back to the previously played one
    ///
    /// Past the restart threshold, or with no history, this rewinds. Otherwise
    /// the current track returns to the head of the queue and the most
    /// recently replaced track plays.
    pub fn play_previous(&mut self) {
        let prev = self.state.clone();
        let past_threshold = self.state.current_time() > self.preferences.restart_threshold_secs;

        match self.history.pop() {
            Some(previous) if !past_threshold => {
                if let Some(current) = self.state.current_track().cloned() {
                    self.queue.push_front(current);
                }
                self.load_and_play(previous, false);
            }
            popped => {
                if let Some(track) = popped {
                    self.history.push(track);
                }
                self.rewind();
            }
        }
        self.commit(&prev);
    }

    /// "Play all from here": play `track`, queue the rest of `tracks`
    pub fn play_track_with_queue(&mut self, track: Track, tracks: Vec<Track>) {
        let prev = self.state.clone();
        self.queue.replace_excluding(tracks, &track.id);
        self.load_and_play(track, true);
        self.commit(&prev);
    }

    // ─────────────────────────────────────────────────────────────
    // Output events
    // ─────────────────────────────────────────────────────────────

    /// Apply every pending output event; returns how many were applied
    ///
    /// Events for a track that is no longer loaded are discarded.
    pub fn pump_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events.try_recv() {
            if self.state.current_track_id() != Some(event.track_id()) {
                log::debug!("Player: dropping stale event {:?}", event);
                continue;
            }
            self.apply_event(event);
            applied += 1;
        }
        applied
    }

    fn apply_event(&mut self, event: PlayerEvent) {
        let prev = self.state.clone();
        match event {
            PlayerEvent::TimeUpdate { position, .. } => {
                self.state.set_current_time(position);
            }
            PlayerEvent::DurationChange { duration, .. } => {
                self.state.set_duration(duration);
            }
            PlayerEvent::Ended { track_id } => {
                if self.state.is_looping() {
                    log::debug!("Player: '{}' ended, looping", track_id);
                    self.rewind();
                    self.output.play();
                } else {
                    log::debug!("Player: '{}' ended, advancing", track_id);
                    self.advance();
                }
            }
            PlayerEvent::Error { track_id, message } => {
                log::error!("Player: playback of '{}' failed: {}", track_id, message);
                self.state.fail();
                self.last_error = Some(message);
            }
        }
        self.commit(&prev);
    }

    // ─────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────

    fn load_and_play(&mut self, track: Track, remember: bool) {
        let track_id = track.id.clone();
        if let Some(replaced) = self.state.play(track) {
            log::info!("Player: playing '{}' (replacing '{}')", track_id, replaced.id);
            self.last_error = None;
            if remember {
                self.history.push(replaced);
                if self.history.len() > HISTORY_LIMIT {
                    self.history.remove(0);
                }
            }
        }
    }

    fn advance(&mut self) {
        let next = if self.state.is_shuffling() {
            self.queue.pop_random(&mut self.rng)
        } else {
            self.queue.pop_front()
        };

        match next {
            Some(track) if self.state.current_track_id() == Some(track.id.as_str()) => {
                // Queued again behind itself: play it from the top. The
                // state stays playing, so commit sees no transition.
                let was_playing = self.state.is_playing();
                self.rewind();
                self.load_and_play(track, true);
                if was_playing {
                    self.output.play();
                }
            }
            Some(track) => self.load_and_play(track, true),
            None => {
                log::debug!("Player: queue empty, stopping");
                self.stop_and_rewind();
            }
        }
    }

    fn stop_and_rewind(&mut self) {
        let had_position = self.state.current_time() != 0.0;
        self.state.stop();
        if had_position && self.state.current_track().is_some() {
            self.output.seek(0.0);
        }
    }

    fn rewind(&mut self) {
        self.state.set_current_time(0.0);
        if self.state.current_track().is_some() {
            self.output.seek(0.0);
        }
    }

    /// Drive the output from the state diff, then notify subscribers
    fn commit(&mut self, prev: &PlaybackState) {
        let state = &self.state;

        if prev.current_track_id() != state.current_track_id() {
            match state.current_track() {
                Some(track) => self.output.load(track),
                None => self.output.unload(),
            }
            if state.is_playing() {
                self.output.play();
            }
        } else if prev.is_playing() != state.is_playing() {
            if state.is_playing() {
                self.output.play();
            } else {
                self.output.pause();
            }
        }

        if prev.effective_volume() != state.effective_volume() {
            self.output.set_volume(state.effective_volume());
        }
        if prev.playback_rate() != state.playback_rate() {
            self.output.set_playback_rate(state.playback_rate());
        }

        self.publish();
    }

    fn publish(&mut self) {
        if self.subscribers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        self.subscribers.retain(|tx| match tx.try_send(snapshot.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                log::debug!("Player: subscriber lagging, snapshot skipped");
                true
            }
            Err(TrySendError::Disconnected(_)) => false,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QueuePolicy;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Load(String),
        Play,
        Pause,
        Seek(f64),
        Volume(f32),
        Rate(f32),
        Unload,
    }

    #[derive(Default)]
    struct FakeOutput {
        calls: Vec<Call>,
        events: Option<EventSender>,
    }

    impl FakeOutput {
        fn send(&self, event: PlayerEvent) {
            assert!(self.events.as_ref().unwrap().notify(event));
        }
    }

    impl AudioOutput for FakeOutput {
        fn attach(&mut self, events: EventSender) {
            self.events = Some(events);
        }
        fn load(&mut self, track: &Track) {
            self.calls.push(Call::Load(track.id.clone()));
        }
        fn play(&mut self) {
            self.calls.push(Call::Play);
        }
        fn pause(&mut self) {
            self.calls.push(Call::Pause);
        }
        fn seek(&mut self, position: f64) {
            self.calls.push(Call::Seek(position));
        }
        fn set_volume(&mut self, volume: f32) {
            self.calls.push(Call::Volume(volume));
        }
        fn set_playback_rate(&mut self, rate: f32) {
            self.calls.push(Call::Rate(rate));
        }
        fn unload(&mut self) {
            self.calls.push(Call::Unload);
        }
    }

    fn track(id: &str) -> Track {
        Track::new(id, id.to_uppercase(), format!("https://cdn.example/{id}.mp3")).with_duration(180.0)
    }

    fn player() -> PlayerController<FakeOutput> {
        PlayerController::create(FakeOutput::default(), &PlayerPreferences::default())
    }

    fn queue_ids<O: AudioOutput>(player: &PlayerController<O>) -> Vec<String> {
        player.queue().iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn test_replay_same_track_keeps_position() {
        let mut p = player();
        p.play(track("a"));
        p.set_current_time(33.0);
        p.play(track("a"));
        assert_eq!(p.state().current_time(), 33.0);

        p.play(track("b"));
        assert_eq!(p.state().current_time(), 0.0);
        assert_eq!(p.state().current_track_id(), Some("b"));
    }

    #[test]
    fn test_play_next_on_empty_queue_stops() {
        let mut p = player();
        p.play_next();
        assert!(!p.state().is_playing());
        assert_eq!(p.state().current_time(), 0.0);

        p.play(track("a"));
        p.set_current_time(50.0);
        p.play_next();
        assert!(!p.state().is_playing());
        assert_eq!(p.state().current_time(), 0.0);
        // Finished track stays visible
        assert_eq!(p.state().current_track_id(), Some("a"));
    }

    #[test]
    fn test_two_track_queue_scenario() {
        let mut p = player();
        p.play(track("a"));
        p.add_to_queue(track("b"));
        p.add_to_queue(track("c"));

        p.play_next();
        assert_eq!(p.state().current_track_id(), Some("b"));
        assert_eq!(queue_ids(&p), vec!["c"]);
        assert!(p.state().is_playing());

        p.play_next();
        assert_eq!(p.state().current_track_id(), Some("c"));
        assert!(p.queue().is_empty());
        assert!(p.state().is_playing());

        p.play_next();
        assert!(!p.state().is_playing());
        assert_eq!(p.state().current_time(), 0.0);
    }

    #[test]
    fn test_mute_restores_volume() {
        let mut p = player();
        p.set_volume(0.8);
        p.toggle_mute();
        assert!(p.state().is_muted());
        assert_eq!(p.state().volume(), 0.8);
        p.toggle_mute();
        assert!(!p.state().is_muted());
        assert_eq!(p.state().volume(), 0.8);

        let volumes: Vec<_> = p
            .output()
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::Volume(v) => Some(*v),
                _ => None,
            })
            .collect();
        // create, set 0.8, mute, unmute
        assert_eq!(volumes, vec![1.0, 0.8, 0.0, 0.8]);
    }

    #[test]
    fn test_output_follows_state() {
        let mut p = player();
        p.play(track("a"));
        p.pause();
        p.resume();
        p.set_current_time(10.0);
        p.stop();

        let calls = &p.output().calls;
        assert_eq!(
            calls[2..].to_vec(),
            vec![
                Call::Load("a".into()),
                Call::Play,
                Call::Pause,
                Call::Play,
                Call::Seek(0.0),
                Call::Pause,
            ]
        );
    }

    #[test]
    fn test_remove_absent_id_keeps_queue() {
        let mut p = player();
        p.add_to_queue(track("a"));
        p.add_to_queue(track("b"));
        assert_eq!(p.remove_from_queue("nope"), 0);
        assert_eq!(queue_ids(&p), vec!["a", "b"]);
    }

    #[test]
    fn test_unique_policy_rejects_duplicate() {
        let prefs = PlayerPreferences {
            queue_policy: QueuePolicy::UniqueById,
            ..Default::default()
        };
        let mut p = PlayerController::create(FakeOutput::default(), &prefs);
        assert!(p.add_to_queue(track("a")));
        assert!(!p.add_to_queue(track("a")));
        assert_eq!(p.queue().len(), 1);
    }

    #[test]
    fn test_play_track_with_queue() {
        let mut p = player();
        let all = vec![track("a"), track("b"), track("c")];
        p.play_track_with_queue(track("b"), all);
        assert_eq!(p.state().current_track_id(), Some("b"));
        assert!(p.state().is_playing());
        assert_eq!(queue_ids(&p), vec!["a", "c"]);
    }

    #[test]
    fn test_events_drive_position_and_drop_stale() {
        let mut p = player();
        p.play(track("a"));
        p.output().send(PlayerEvent::TimeUpdate {
            track_id: "a".into(),
            position: 12.0,
        });
        p.output().send(PlayerEvent::DurationChange {
            track_id: "a".into(),
            duration: 201.0,
        });
        assert_eq!(p.pump_events(), 2);
        assert_eq!(p.state().current_time(), 12.0);
        assert_eq!(p.state().duration(), 201.0);

        // Late report from "a" after switching to "b"
        p.output().send(PlayerEvent::TimeUpdate {
            track_id: "a".into(),
            position: 13.0,
        });
        p.play(track("b"));
        assert_eq!(p.pump_events(), 0);
        assert_eq!(p.state().current_time(), 0.0);
    }

    #[test]
    fn test_ended_advances_or_loops() {
        let mut p = player();
        p.play(track("a"));
        p.add_to_queue(track("b"));
        p.output().send(PlayerEvent::Ended { track_id: "a".into() });
        p.pump_events();
        assert_eq!(p.state().current_track_id(), Some("b"));

        p.set_looping(true);
        p.set_current_time(179.0);
        p.output().send(PlayerEvent::Ended { track_id: "b".into() });
        p.pump_events();
        assert_eq!(p.state().current_track_id(), Some("b"));
        assert_eq!(p.state().current_time(), 0.0);
        assert!(p.state().is_playing());
    }

    #[test]
    fn test_error_event_surfaces_once() {
        let mut p = player();
        p.play(track("a"));
        p.output().send(PlayerEvent::Error {
            track_id: "a".into(),
            message: "decode failed".into(),
        });
        p.pump_events();
        assert!(!p.state().is_playing());
        assert_eq!(p.state().current_track_id(), Some("a"));
        assert_eq!(p.take_error().as_deref(), Some("decode failed"));
        assert!(p.take_error().is_none());
    }

    #[test]
    fn test_previous_restarts_or_goes_back() {
        let mut p = player();
        p.play(track("a"));
        p.play(track("b"));

        p.set_current_time(30.0);
        p.play_previous();
        assert_eq!(p.state().current_track_id(), Some("b"));
        assert_eq!(p.state().current_time(), 0.0);

        p.set_current_time(1.0);
        p.play_previous();
        assert_eq!(p.state().current_track_id(), Some("a"));
        assert_eq!(queue_ids(&p), vec!["b"]);

        // No more history: rewinds in place
        p.set_current_time(2.0);
        p.play_previous();
        assert_eq!(p.state().current_track_id(), Some("a"));
        assert_eq!(p.state().current_time(), 0.0);
    }

    #[test]
    fn test_shuffle_takes_from_queue() {
        let mut p = player().with_shuffle_seed(42);
        p.set_shuffling(true);
        p.play(track("a"));
        for id in ["b", "c", "d"] {
            p.add_to_queue(track(id));
        }
        p.play_next();
        let current = p.state().current_track_id().unwrap().to_string();
        assert!(["b", "c", "d"].contains(&current.as_str()));
        assert_eq!(p.queue().len(), 2);
        assert!(!queue_ids(&p).contains(&current));
    }

    #[test]
    fn test_duplicate_head_restarts_track() {
        let mut p = player();
        p.play(track("a"));
        p.set_current_time(40.0);
        p.add_to_queue(track("a"));
        p.play_next();
        assert_eq!(p.state().current_track_id(), Some("a"));
        assert_eq!(p.state().current_time(), 0.0);
        assert!(p.queue().is_empty());
    }

    #[test]
    fn test_duplicate_head_after_end_plays_again() {
        let mut p = player();
        p.play(track("a"));
        p.add_to_queue(track("a"));
        p.set_current_time(180.0);
        let before = p.output().calls.len();

        p.output().send(PlayerEvent::Ended { track_id: "a".into() });
        p.pump_events();

        assert_eq!(p.state().current_track_id(), Some("a"));
        assert_eq!(p.state().current_time(), 0.0);
        assert!(p.state().is_playing());
        assert!(p.queue().is_empty());
        assert_eq!(p.output().calls[before..], [Call::Seek(0.0), Call::Play]);
    }

    #[test]
    fn test_seek_clamps_to_duration() {
        let mut p = player();
        p.seek(10.0);
        assert_eq!(p.state().current_time(), 0.0);

        p.play(track("a"));
        p.seek(500.0);
        assert_eq!(p.state().current_time(), 180.0);
        assert_eq!(p.output().calls.last(), Some(&Call::Seek(180.0)));
    }

    #[test]
    fn test_subscribers_receive_snapshots() {
        let mut p = player();
        let rx = p.subscribe();
        p.play(track("a"));
        p.add_to_queue(track("b"));

        let snapshots: Vec<_> = rx.try_iter().collect();
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[1].queue.len(), 1);
        assert_eq!(snapshots[1].state.current_track_id(), Some("a"));

        drop(rx);
        p.pause();
        assert!(p.subscribers.is_empty());
    }

    #[test]
    fn test_dispose_returns_preferences() {
        let mut p = player();
        p.set_volume(0.3);
        p.set_playback_rate(1.25);
        p.set_looping(true);
        p.play(track("a"));

        let prefs = p.dispose();
        assert_eq!(prefs.volume, 0.3);
        assert_eq!(prefs.playback_rate, 1.25);
        assert!(prefs.looping);
    }
}
