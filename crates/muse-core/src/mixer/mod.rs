//! Weighted prompt mixer
//!
//! A fixed bank of text prompts, each with an influence weight in `[0, 1]`,
//! steering a live generative audio session. Prompts are addressed by id
//! (`prompt-0` … `prompt-N`). The upstream moderator can mark a prompt as
//! filtered; a filtered prompt keeps its text but its weight is frozen and
//! it is never sent upstream again. There is no way to unfilter.
//!
//! The mixer performs no I/O. Operations that must reach the service return
//! the [`ClientMessage`] to send; incoming text frames go through
//! [`PromptMixer::handle_server_text`]. The mix output can be recorded
//! through [`PromptMixer::capture_source`].

mod protocol;
mod session;
mod tap;

pub use protocol::{
    audio_level, decode_pcm_chunk, ClientMessage, PlaybackCommand, PromptWeight, ProtocolError,
    ReferenceAudio, ServerMessage, StereoFrame,
};
pub use session::{LiveSession, ScheduledChunk, SessionState, SessionUpdate};
pub use tap::{LiveMixCapture, LiveMixStream};

use rand::Rng;
use serde::Serialize;
use thiserror::Error;

use crate::config::MixerConfig;
use crate::recorder::Recording;
use tap::MixTap;

/// Chance that a prompt starts active in [`PromptMixer::randomize_activation`]
const ACTIVATION_PROBABILITY: f64 = 0.2;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MixerError {
    #[error("Unknown prompt {0}")]
    UnknownPrompt(String),

    #[error("Prompt {0} was filtered and cannot be changed")]
    PromptFiltered(String),

    #[error("Not connected to the live session")]
    NotConnected,

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightedPrompt {
    pub id: String,
    pub text: String,
    pub weight: f32,
    pub is_filtered: bool,
    /// Moderator's reason, when given
    pub filter_reason: Option<String>,
}

impl WeightedPrompt {
    pub fn is_active(&self) -> bool {
        self.weight > 0.0 && !self.is_filtered
    }
}

pub struct PromptMixer {
    prompts: Vec<WeightedPrompt>,
    session: LiveSession,
    volume: f32,
    sample_rate: u32,
    tap: MixTap,
}

impl PromptMixer {
    /// Prompt bank from the configured texts, all at weight 0
    pub fn new(config: &MixerConfig) -> Self {
        let prompts = config
            .prompts
            .iter()
            .enumerate()
            .map(|(i, text)| WeightedPrompt {
                id: format!("prompt-{i}"),
                text: text.clone(),
                weight: 0.0,
                is_filtered: false,
                filter_reason: None,
            })
            .collect();

        Self {
            prompts,
            session: LiveSession::new(config),
            volume: config.volume.clamp(0.0, 1.0),
            sample_rate: config.sample_rate,
            tap: MixTap::default(),
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Prompts
    // ─────────────────────────────────────────────────────────────

    pub fn prompts(&self) -> &[WeightedPrompt] {
        &self.prompts
    }

    pub fn prompt(&self, id: &str) -> Option<&WeightedPrompt> {
        self.prompts.iter().find(|p| p.id == id)
    }

    /// Prompts as sent upstream: weight above 0 and not filtered
    pub fn active_prompts(&self) -> Vec<PromptWeight> {
        self.prompts
            .iter()
            .filter(|p| p.is_active())
            .map(|p| PromptWeight {
                text: p.text.clone(),
                weight: p.weight,
            })
            .collect()
    }

    /// Set a prompt's weight (clamped to `[0, 1]`)
    ///
    /// Returns the update to send when the session is open.
    pub fn update_weight(&mut self, id: &str, weight: f32) -> Result<Option<ClientMessage>, MixerError> {
        let prompt = self.prompt_mut(id)?;
        if prompt.is_filtered {
            return Err(MixerError::PromptFiltered(id.to_string()));
        }
        if !weight.is_nan() {
            prompt.weight = weight.clamp(0.0, 1.0);
        }
        Ok(self.prompts_update())
    }

    /// Change a prompt's text; takes effect upstream with the next weight update
    pub fn update_text(&mut self, id: &str, text: impl Into<String>) -> Result<(), MixerError> {
        self.prompt_mut(id)?.text = text.into();
        Ok(())
    }

    /// Start each unfiltered prompt at weight 1 with probability 0.2, else 0
    pub fn randomize_activation<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for prompt in self.prompts.iter_mut().filter(|p| !p.is_filtered) {
            prompt.weight = if rng.gen_bool(ACTIVATION_PROBABILITY) { 1.0 } else { 0.0 };
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Session
    // ─────────────────────────────────────────────────────────────

    pub fn session(&self) -> &LiveSession {
        &self.session
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    /// Begin connecting; returns the initial prompts for session creation
    pub fn connect(&mut self) -> Vec<PromptWeight> {
        self.session.begin_connect();
        self.sync_tap();
        let initial = self.active_prompts();
        log::info!("Mixer: connecting with {} active prompts", initial.len());
        initial
    }

    /// The connection is up
    pub fn connection_opened(&mut self, session_id: Option<String>) {
        self.session.opened(session_id);
        self.sync_tap();
    }

    /// Could not connect, or the connection broke
    pub fn connection_failed(&mut self, message: impl Into<String>) {
        self.session.fail(message.into());
        self.sync_tap();
    }

    pub fn connection_closed(&mut self) {
        self.session.closed();
        self.sync_tap();
    }

    pub fn disconnect(&mut self) {
        log::info!("Mixer: disconnected");
        self.session.disconnect();
        self.sync_tap();
    }

    /// Apply an incoming text frame; `now` is the output clock in seconds
    ///
    /// Malformed frames are logged and reported without changing state.
    pub fn handle_server_text(&mut self, text: &str, now: f64) -> Result<SessionUpdate, MixerError> {
        let message = ServerMessage::parse(text).map_err(|e| {
            log::error!("Mixer: message parsing error: {}", e);
            e
        })?;

        let update = self.session.handle(message, now);
        self.sync_tap();
        match &update {
            SessionUpdate::Filtered { prompt_id, reason } => self.mark_filtered(prompt_id, reason.clone()),
            SessionUpdate::Audio(chunk) => self.tap.feed(&chunk.frames, self.volume),
            SessionUpdate::Nothing | SessionUpdate::Failed(_) => {}
        }
        Ok(update)
    }

    /// Pause, resume or stop generation without closing the connection
    ///
    /// Returns the message to send, or `None` when the session is not open.
    pub fn playback_control(&self, command: PlaybackCommand) -> Option<ClientMessage> {
        if !self.session.state().is_open() {
            log::debug!("Mixer: {:?} ignored while {:?}", command, self.session.state());
            return None;
        }
        log::info!("Mixer: playback {:?}", command);
        Some(ClientMessage::PlaybackControl { command })
    }

    /// Send a finished recording as the generation reference
    pub fn reference_update(&self, recording: &Recording, weight: f32) -> Result<ClientMessage, MixerError> {
        if !self.session.state().is_open() {
            return Err(MixerError::NotConnected);
        }
        Ok(ClientMessage::reference_update(
            recording.blob.bytes(),
            recording.blob.mime_type(),
            weight,
        ))
    }

    // ─────────────────────────────────────────────────────────────
    // Output
    // ─────────────────────────────────────────────────────────────

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Clamp to `[0, 1]`; NaN is ignored
    pub fn set_volume(&mut self, volume: f32) {
        if !volume.is_nan() {
            self.volume = volume.clamp(0.0, 1.0);
        }
    }

    /// Capture source for recording the mix, after the output gain
    ///
    /// Pair it with [`FinalizeMode::Deferred`](crate::recorder::FinalizeMode::Deferred).
    pub fn capture_source(&self) -> LiveMixCapture {
        LiveMixCapture::new(self.tap.clone(), self.sample_rate)
    }

    /// Visualizer glow of a prompt: session level scaled by its weight
    pub fn glow(&self, id: &str) -> f32 {
        self.prompt(id)
            .filter(|p| p.is_active())
            .map(|p| self.session.level() * p.weight)
            .unwrap_or(0.0)
    }

    // ─────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────

    fn sync_tap(&self) {
        self.tap.set_playing(self.session.state() == SessionState::Playing);
    }

    fn prompt_mut(&mut self, id: &str) -> Result<&mut WeightedPrompt, MixerError> {
        self.prompts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| MixerError::UnknownPrompt(id.to_string()))
    }

    fn prompts_update(&self) -> Option<ClientMessage> {
        if !self.session.state().is_open() {
            return None;
        }
        let prompts = self.active_prompts();
        log::debug!("Mixer: prompts updated: {}", prompts.len());
        Some(ClientMessage::PromptsUpdate { prompts })
    }

    fn mark_filtered(&mut self, id: &str, reason: Option<String>) {
        match self.prompts.iter_mut().find(|p| p.id == id) {
            Some(prompt) => {
                log::warn!("Mixer: prompt '{}' filtered ({:?})", prompt.text, reason);
                prompt.is_filtered = true;
                prompt.filter_reason = reason;
            }
            None => log::warn!("Mixer: filter for unknown prompt {}", id),
        }
    }
}
