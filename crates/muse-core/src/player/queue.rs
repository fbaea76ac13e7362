//! Pending-track queue
//!
//! Insertion order is playback order. Removal by id is idempotent.

use rand::Rng;
use serde::Serialize;
use thiserror::Error;

use crate::config::QueuePolicy;
use crate::types::Track;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueueError {
    #[error("Queue position {index} is out of range (queue length {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Queue {
    tracks: Vec<Track>,
    #[serde(skip)]
    policy: QueuePolicy,
}

impl Queue {
    pub fn new(policy: QueuePolicy) -> Self {
        Self {
            tracks: Vec::new(),
            policy,
        }
    }

    pub fn policy(&self) -> QueuePolicy {
        self.policy
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn contains(&self, track_id: &str) -> bool {
        self.tracks.iter().any(|t| t.id == track_id)
    }

    /// Append a track; returns false when the policy rejected it
    pub fn push(&mut self, track: Track) -> bool {
        if self.policy == QueuePolicy::UniqueById && self.contains(&track.id) {
            log::debug!("Queue: '{}' already queued, ignoring", track.id);
            return false;
        }
        self.tracks.push(track);
        true
    }

    /// Put a track back at the head (used by "previous")
    pub fn push_front(&mut self, track: Track) {
        if self.policy == QueuePolicy::UniqueById {
            self.tracks.retain(|t| t.id != track.id);
        }
        self.tracks.insert(0, track);
    }

    /// Remove every entry with this id; returns how many were removed
    pub fn remove(&mut self, track_id: &str) -> usize {
        let before = self.tracks.len();
        self.tracks.retain(|t| t.id != track_id);
        before - self.tracks.len()
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    /// Replace the contents, leaving out one id (the track now playing)
    pub fn replace_excluding(&mut self, tracks: Vec<Track>, exclude_id: &str) {
        self.tracks.clear();
        for track in tracks {
            if track.id != exclude_id {
                self.push(track);
            }
        }
    }

    /// Take the head
    pub fn pop_front(&mut self) -> Option<Track> {
        if self.tracks.is_empty() {
            None
        } else {
            Some(self.tracks.remove(0))
        }
    }

    /// Take a uniformly random entry
    pub fn pop_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Track> {
        if self.tracks.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.tracks.len());
        Some(self.tracks.remove(index))
    }

    /// Move the entry at `from` so it ends up at `to`
    pub fn move_track(&mut self, from: usize, to: usize) -> Result<(), QueueError> {
        let len = self.tracks.len();
        for index in [from, to] {
            if index >= len {
                return Err(QueueError::IndexOutOfRange { index, len });
            }
        }
        let track = self.tracks.remove(from);
        self.tracks.insert(to, track);
        Ok(())
    }
}
