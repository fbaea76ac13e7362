//! Live-generation session state
//!
//! ```text
//! Idle ──connect──► Connecting ──opened──► Loading ──first audio──► Playing
//!   ▲                   │                     │                        │
//!   │                   └─────── failure ─────┴──────► Error ◄─────────┘
//!   └──────────────── disconnect (from any state) / close while Playing
//! ```
//!
//! Audio chunks are scheduled back to back on the output clock. The first
//! chunk is placed `buffer_secs` in the future to absorb network jitter.

use serde::Serialize;

use super::protocol::{audio_level, decode_pcm_chunk, ServerMessage, StereoFrame};
use crate::config::MixerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    Idle,
    Connecting,
    Loading,
    Playing,
    Error,
}

impl SessionState {
    /// The connection accepts client messages
    pub fn is_open(self) -> bool {
        matches!(self, SessionState::Loading | SessionState::Playing)
    }
}

/// Decoded audio placed on the output timeline
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledChunk {
    /// Output clock time (seconds) at which the chunk starts
    pub start_at: f64,
    pub frames: Vec<StereoFrame>,
    pub level: f32,
}

/// What a server message meant for the mixer
#[derive(Debug, Clone, PartialEq)]
pub enum SessionUpdate {
    Nothing,
    Audio(ScheduledChunk),
    Filtered { prompt_id: String, reason: Option<String> },
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct LiveSession {
    state: SessionState,
    session_id: Option<String>,
    buffer_secs: f64,
    sample_rate: u32,
    channels: u16,
    next_start: Option<f64>,
    level: f32,
    last_error: Option<String>,
}

impl LiveSession {
    pub fn new(config: &MixerConfig) -> Self {
        Self {
            state: SessionState::Idle,
            session_id: None,
            buffer_secs: config.buffer_secs,
            sample_rate: config.sample_rate,
            channels: config.channels,
            next_start: None,
            level: 0.0,
            last_error: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Level of the most recent chunk, for the visualizer
    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub(crate) fn begin_connect(&mut self) {
        self.reset_timeline();
        self.last_error = None;
        self.state = SessionState::Connecting;
    }

    pub(crate) fn opened(&mut self, session_id: Option<String>) {
        if self.state != SessionState::Connecting {
            log::debug!("Mixer: ignoring open while {:?}", self.state);
            return;
        }
        log::info!("Mixer: connected, waiting for audio");
        self.session_id = session_id;
        self.state = SessionState::Loading;
    }

    pub(crate) fn fail(&mut self, message: String) {
        log::error!("Mixer: session failed: {}", message);
        self.last_error = Some(message);
        self.state = SessionState::Error;
    }

    /// Transport closed by the remote end
    pub(crate) fn closed(&mut self) {
        if self.state == SessionState::Playing {
            log::info!("Mixer: connection closed");
            self.state = SessionState::Idle;
        }
    }

    pub(crate) fn disconnect(&mut self) {
        self.reset_timeline();
        self.session_id = None;
        self.state = SessionState::Idle;
    }

    /// Apply a server message; `now` is the output clock in seconds
    pub(crate) fn handle(&mut self, message: ServerMessage, now: f64) -> SessionUpdate {
        match message {
            ServerMessage::SessionCreated { session_id } => {
                log::info!("Mixer: session confirmed");
                if session_id.is_some() {
                    self.session_id = session_id;
                }
                SessionUpdate::Nothing
            }
            ServerMessage::AudioChunk { chunk } => self.schedule(&chunk, now),
            ServerMessage::PromptFiltered { prompt_id, reason } => SessionUpdate::Filtered { prompt_id, reason },
            ServerMessage::Error { message } => {
                self.fail(message.clone());
                SessionUpdate::Failed(message)
            }
            ServerMessage::Unknown => {
                log::warn!("Mixer: unknown message type");
                SessionUpdate::Nothing
            }
        }
    }

    fn schedule(&mut self, chunk: &str, now: f64) -> SessionUpdate {
        if !self.state.is_open() {
            log::debug!("Mixer: dropping audio while {:?}", self.state);
            return SessionUpdate::Nothing;
        }

        let frames = match decode_pcm_chunk(chunk, self.channels) {
            Ok(frames) => frames,
            Err(e) => {
                log::error!("Mixer: audio processing error: {}", e);
                return SessionUpdate::Nothing;
            }
        };

        let start_at = match self.next_start {
            Some(t) => t,
            None => {
                self.state = SessionState::Playing;
                log::info!("Mixer: first audio, playing in {:.1}s", self.buffer_secs);
                now + self.buffer_secs
            }
        };
        let duration = frames.len() as f64 / self.sample_rate.max(1) as f64;
        self.next_start = Some(start_at + duration);
        self.level = audio_level(&frames);

        SessionUpdate::Audio(ScheduledChunk {
            start_at,
            frames,
            level: self.level,
        })
    }

    fn reset_timeline(&mut self) {
        self.next_start = None;
        self.level = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;

    fn chunk(frames: usize) -> String {
        // Left channel at 0.25
        let frame = [0x00, 0x20, 0x00, 0x00];
        STANDARD.encode(frame.repeat(frames))
    }

    fn open_session() -> LiveSession {
        let mut session = LiveSession::new(&MixerConfig::default());
        session.begin_connect();
        session.opened(Some("s1".into()));
        session
    }

    #[test]
    fn test_first_chunk_starts_playing_after_buffer() {
        let mut session = open_session();
        assert_eq!(session.state(), SessionState::Loading);

        let first = session.handle(ServerMessage::AudioChunk { chunk: chunk(48_000) }, 10.0);
        let SessionUpdate::Audio(first) = first else {
            panic!("expected audio");
        };
        assert_eq!(session.state(), SessionState::Playing);
        assert_eq!(first.start_at, 12.0);
        assert_eq!(first.level, 1.0);

        // Back to back, independent of the clock
        let second = session.handle(ServerMessage::AudioChunk { chunk: chunk(24_000) }, 99.0);
        let SessionUpdate::Audio(second) = second else {
            panic!("expected audio");
        };
        assert_eq!(second.start_at, 13.0);
    }

    #[test]
    fn test_mono_chunks_follow_configured_channels() {
        let config = MixerConfig {
            channels: 1,
            ..Default::default()
        };
        let mut session = LiveSession::new(&config);
        session.begin_connect();
        session.opened(None);

        // 48_000 stereo frames of bytes read as 96_000 mono samples
        let update = session.handle(ServerMessage::AudioChunk { chunk: chunk(48_000) }, 0.0);
        let SessionUpdate::Audio(first) = update else {
            panic!("expected audio");
        };
        assert_eq!(first.frames.len(), 96_000);
        assert_eq!(first.frames[0].left, first.frames[0].right);

        let update = session.handle(ServerMessage::AudioChunk { chunk: chunk(1) }, 0.0);
        let SessionUpdate::Audio(second) = update else {
            panic!("expected audio");
        };
        assert_eq!(second.start_at, 4.0);
    }

    #[test]
    fn test_audio_ignored_when_not_open() {
        let mut session = LiveSession::new(&MixerConfig::default());
        let update = session.handle(ServerMessage::AudioChunk { chunk: chunk(10) }, 0.0);
        assert_eq!(update, SessionUpdate::Nothing);
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_error_message_fails_session() {
        let mut session = open_session();
        let update = session.handle(
            ServerMessage::Error {
                message: "quota exceeded".into(),
            },
            0.0,
        );
        assert_eq!(update, SessionUpdate::Failed("quota exceeded".into()));
        assert_eq!(session.state(), SessionState::Error);
        assert_eq!(session.last_error(), Some("quota exceeded"));
    }

    #[test]
    fn test_close_and_disconnect() {
        let mut session = open_session();
        session.closed();
        assert_eq!(session.state(), SessionState::Loading);

        session.handle(ServerMessage::AudioChunk { chunk: chunk(10) }, 0.0);
        session.closed();
        assert_eq!(session.state(), SessionState::Idle);

        let mut session = open_session();
        session.disconnect();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.session_id().is_none());
    }

    #[test]
    fn test_open_only_from_connecting() {
        let mut session = LiveSession::new(&MixerConfig::default());
        session.opened(None);
        assert_eq!(session.state(), SessionState::Idle);
    }
}
