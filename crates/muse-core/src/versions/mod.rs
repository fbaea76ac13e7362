//! A/B version comparison
//!
//! Two named slots, A and B, each bound to one render of a track. One slot is
//! active: it names the version the listener wants to hear. Rebinding and
//! activating slots is bookkeeping; every playback request goes through
//! [`VersionTransport::switch_to_version`], so slots and transport can only
//! disagree when something outside the comparator loaded another track.
//! [`VersionComparator::phase`] makes that case explicit.
//!
//! ```text
//!                 flip / activate(bound)
//!   ┌────────────────────────────────────────────┐
//!   ▼                                            │
//! Idle ──play──► PlayingBound(slot) ──────────────┘
//!   ▲                 │   external load of an unslotted version
//!   │ pause           ▼
//!   └──────── PlayingUnbound(version_id) ──assign/play_pause──► PlayingBound(slot)
//! ```

use serde::Serialize;
use thiserror::Error;

use crate::player::{AudioOutput, PlayerController};
use crate::types::{Track, TrackVersion};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum VersionError {
    #[error("Version {id} not found")]
    UnknownVersion { id: String },

    #[error("Version {id} has no audio yet")]
    MissingAudio { id: String },

    #[error("Track {track_id} has no versions")]
    NoVersions { track_id: String },

    #[error("Could not load versions of {track_id}: {message}")]
    Source { track_id: String, message: String },
}

/// Comparison slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Slot {
    A,
    B,
}

impl Slot {
    pub fn other(self) -> Self {
        match self {
            Slot::A => Slot::B,
            Slot::B => Slot::A,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Slot::A => "A",
            Slot::B => "B",
        }
    }
}

/// What the transport is doing relative to the slots
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ComparisonPhase {
    /// Nothing playing
    Idle,
    /// Playing the version bound to this slot
    PlayingBound(Slot),
    /// Playing a version neither slot references
    PlayingUnbound(String),
}

/// Result of a comparator handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotOutcome {
    /// A playback request was issued
    Switched,
    /// The loaded version was paused or resumed in place
    Toggled,
    /// Nothing to do (e.g. activating an unbound slot)
    Unchanged,
}

/// The playback side the comparator drives
pub trait VersionTransport {
    /// Load and play this version (or resume it if already loaded)
    fn switch_to_version(&mut self, track: Track);

    /// Id of the version loaded in the transport
    fn loaded_version(&self) -> Option<&str>;

    fn is_playing(&self) -> bool;

    fn toggle_play_pause(&mut self);
}

impl<O: AudioOutput> VersionTransport for PlayerController<O> {
    fn switch_to_version(&mut self, track: Track) {
        self.play(track);
    }

    fn loaded_version(&self) -> Option<&str> {
        self.state().current_track_id()
    }

    fn is_playing(&self) -> bool {
        self.state().is_playing()
    }

    fn toggle_play_pause(&mut self) {
        PlayerController::toggle_play_pause(self);
    }
}

/// Where versions come from (the backend repository)
pub trait VersionSource {
    fn find_versions(&self, track_id: &str) -> Result<Vec<TrackVersion>, VersionError>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VersionComparator {
    versions: Vec<TrackVersion>,
    slot_a: Option<String>,
    slot_b: Option<String>,
    active: Slot,
}

impl VersionComparator {
    /// Bind A to `selected` (or the master, or the first version) and B to
    /// the next distinct version; A is active
    pub fn new(versions: Vec<TrackVersion>, selected: Option<&str>) -> Self {
        let (slot_a, slot_b) = default_bindings(&versions, selected);
        Self {
            versions,
            slot_a,
            slot_b,
            active: Slot::A,
        }
    }

    /// Fetch the versions of a track and build a comparator over them
    pub fn load<S: VersionSource + ?Sized>(
        source: &S,
        track_id: &str,
        selected: Option<&str>,
    ) -> Result<Self, VersionError> {
        let versions = source.find_versions(track_id)?;
        if versions.is_empty() {
            return Err(VersionError::NoVersions {
                track_id: track_id.to_string(),
            });
        }
        log::debug!("Versions: loaded {} versions of '{}'", versions.len(), track_id);
        Ok(Self::new(versions, selected))
    }

    // ─────────────────────────────────────────────────────────────
    // Read access
    // ─────────────────────────────────────────────────────────────

    pub fn versions(&self) -> &[TrackVersion] {
        &self.versions
    }

    pub fn active_slot(&self) -> Slot {
        self.active
    }

    pub fn binding(&self, slot: Slot) -> Option<&str> {
        match slot {
            Slot::A => self.slot_a.as_deref(),
            Slot::B => self.slot_b.as_deref(),
        }
    }

    /// Version bound to a slot
    pub fn version_in(&self, slot: Slot) -> Option<&TrackVersion> {
        self.binding(slot).and_then(|id| self.find(id))
    }

    /// Slot referencing a version; the active slot wins if both do
    pub fn slot_of(&self, version_id: &str) -> Option<Slot> {
        [self.active, self.active.other()]
            .into_iter()
            .find(|slot| self.binding(*slot) == Some(version_id))
    }

    pub fn phase<T: VersionTransport + ?Sized>(&self, transport: &T) -> ComparisonPhase {
        match transport.loaded_version() {
            Some(id) if transport.is_playing() => match self.slot_of(id) {
                Some(slot) => ComparisonPhase::PlayingBound(slot),
                None => ComparisonPhase::PlayingUnbound(id.to_string()),
            },
            _ => ComparisonPhase::Idle,
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Handlers
    // ─────────────────────────────────────────────────────────────

    /// Rebind the active slot and play the version
    pub fn handle_manual_select<T: VersionTransport + ?Sized>(
        &mut self,
        version_id: &str,
        transport: &mut T,
    ) -> Result<SlotOutcome, VersionError> {
        let track = self.playable(version_id)?;
        self.bind(self.active, version_id);
        transport.switch_to_version(track);
        Ok(SlotOutcome::Switched)
    }

    /// Rebind a slot; with `play`, also make it active and play it
    pub fn handle_assign_slot<T: VersionTransport + ?Sized>(
        &mut self,
        slot: Slot,
        version_id: &str,
        play: bool,
        transport: &mut T,
    ) -> Result<SlotOutcome, VersionError> {
        if !play {
            self.require(version_id)?;
            self.bind(slot, version_id);
            return Ok(SlotOutcome::Unchanged);
        }

        let track = self.playable(version_id)?;
        self.bind(slot, version_id);
        self.active = slot;
        transport.switch_to_version(track);
        Ok(SlotOutcome::Switched)
    }

    /// Make a slot active and play its version; unbound slots are ignored
    pub fn handle_activate_slot<T: VersionTransport + ?Sized>(
        &mut self,
        slot: Slot,
        transport: &mut T,
    ) -> Result<SlotOutcome, VersionError> {
        let Some(version_id) = self.binding(slot).map(str::to_string) else {
            log::debug!("Versions: slot {} is unbound, ignoring", slot.label());
            return Ok(SlotOutcome::Unchanged);
        };

        let track = self.playable(&version_id)?;
        self.active = slot;
        transport.switch_to_version(track);
        Ok(SlotOutcome::Switched)
    }

    /// Switch listening focus to the other slot
    pub fn handle_flip_active<T: VersionTransport + ?Sized>(
        &mut self,
        transport: &mut T,
    ) -> Result<SlotOutcome, VersionError> {
        self.handle_activate_slot(self.active.other(), transport)
    }

    /// Play/pause button of a version row
    ///
    /// The loaded version toggles in place. Any other version is bound to
    /// the slot already referencing it (A if none), made active and played.
    pub fn handle_play_pause<T: VersionTransport + ?Sized>(
        &mut self,
        version_id: &str,
        transport: &mut T,
    ) -> Result<SlotOutcome, VersionError> {
        if transport.loaded_version() == Some(version_id) {
            transport.toggle_play_pause();
            return Ok(SlotOutcome::Toggled);
        }

        let track = self.playable(version_id)?;
        let slot = self.slot_of(version_id).unwrap_or(Slot::A);
        self.bind(slot, version_id);
        self.active = slot;
        transport.switch_to_version(track);
        Ok(SlotOutcome::Switched)
    }

    /// Exchange the A and B bindings; the active slot stays put
    pub fn swap_slots(&mut self) {
        std::mem::swap(&mut self.slot_a, &mut self.slot_b);
    }

    /// Replace the version list, keeping bindings that still exist
    pub fn set_versions(&mut self, versions: Vec<TrackVersion>) {
        self.versions = versions;

        let keep = |binding: &Option<String>, versions: &[TrackVersion]| {
            binding
                .as_ref()
                .filter(|id| versions.iter().any(|v| &v.id == *id))
                .cloned()
        };
        let kept_a = keep(&self.slot_a, &self.versions);
        let kept_b = keep(&self.slot_b, &self.versions);

        self.slot_a = kept_a.or_else(|| {
            let (default_a, _) = default_bindings(&self.versions, None);
            if default_a.is_some() && default_a == kept_b {
                next_distinct(&self.versions, kept_b.as_deref()).or(default_a)
            } else {
                default_a
            }
        });
        self.slot_b = kept_b.or_else(|| next_distinct(&self.versions, self.slot_a.as_deref()));

        if self.binding(self.active).is_none() {
            self.active = Slot::A;
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────

    fn find(&self, version_id: &str) -> Option<&TrackVersion> {
        self.versions.iter().find(|v| v.id == version_id)
    }

    fn require(&self, version_id: &str) -> Result<&TrackVersion, VersionError> {
        self.find(version_id).ok_or_else(|| VersionError::UnknownVersion {
            id: version_id.to_string(),
        })
    }

    fn playable(&self, version_id: &str) -> Result<Track, VersionError> {
        self.require(version_id)?.to_track().map_err(|e| {
            log::warn!("Versions: {}", e);
            VersionError::MissingAudio {
                id: version_id.to_string(),
            }
        })
    }

    fn bind(&mut self, slot: Slot, version_id: &str) {
        let binding = Some(version_id.to_string());
        match slot {
            Slot::A => self.slot_a = binding,
            Slot::B => self.slot_b = binding,
        }
    }
}

/// A: selected if known, else master, else first. B: first other version.
fn default_bindings(versions: &[TrackVersion], selected: Option<&str>) -> (Option<String>, Option<String>) {
    let a = selected
        .and_then(|id| versions.iter().find(|v| v.id == id))
        .or_else(|| versions.iter().find(|v| v.is_master))
        .or_else(|| versions.first())
        .map(|v| v.id.clone());
    let b = next_distinct(versions, a.as_deref());
    (a, b)
}

fn next_distinct(versions: &[TrackVersion], bound: Option<&str>) -> Option<String> {
    versions
        .iter()
        .find(|v| Some(v.id.as_str()) != bound)
        .map(|v| v.id.clone())
}
