//! JSON messages exchanged with the live-generation service
//!
//! Every message is an object with a `type` field. Audio arrives as base64
//! encoded 16-bit little-endian interleaved PCM (stereo at 48 kHz unless
//! configured otherwise).

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bytes per 16-bit sample
const SAMPLE_BYTES: usize = 2;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProtocolError {
    #[error("Malformed message: {0}")]
    Malformed(String),

    #[error("Invalid base64 audio: {0}")]
    InvalidAudio(String),

    #[error("Could not encode message: {0}")]
    Encode(String),
}

/// One prompt as sent upstream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptWeight {
    pub text: String,
    pub weight: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceAudio {
    /// Base64 encoded file bytes
    pub data: String,
    pub mime_type: String,
}

/// Transport command for the generated stream; the socket stays open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PlaybackCommand {
    Play,
    Pause,
    Stop,
}

/// Client → server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "prompts.update")]
    PromptsUpdate { prompts: Vec<PromptWeight> },

    /// Steer generation towards a recorded reference
    #[serde(rename = "reference.update")]
    ReferenceUpdate { audio: ReferenceAudio, weight: f32 },

    #[serde(rename = "playback.control")]
    PlaybackControl { command: PlaybackCommand },
}

impl ClientMessage {
    pub fn reference_update(bytes: &[u8], mime_type: &str, weight: f32) -> Self {
        ClientMessage::ReferenceUpdate {
            audio: ReferenceAudio {
                data: STANDARD.encode(bytes),
                mime_type: mime_type.to_string(),
            },
            weight: weight.clamp(0.0, 1.0),
        }
    }

    pub fn to_json(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(|e| ProtocolError::Encode(e.to_string()))
    }
}

/// Server → client
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "session.created")]
    SessionCreated {
        #[serde(default, rename = "sessionId")]
        session_id: Option<String>,
    },

    #[serde(rename = "audio.chunk")]
    AudioChunk { chunk: String },

    #[serde(rename = "prompt.filtered", rename_all = "camelCase")]
    PromptFiltered {
        prompt_id: String,
        #[serde(default)]
        reason: Option<String>,
    },

    #[serde(rename = "error")]
    Error { message: String },

    /// Any type this client does not know
    #[serde(other)]
    Unknown,
}

impl ServerMessage {
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(text).map_err(|e| ProtocolError::Malformed(e.to_string()))
    }
}

/// One decoded stereo frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StereoFrame {
    pub left: f32,
    pub right: f32,
}

/// Decode a base64 PCM chunk with `channels` interleaved channels
///
/// Mono is duplicated to both sides; beyond two channels only the first two
/// are kept. A trailing partial frame is dropped.
pub fn decode_pcm_chunk(chunk: &str, channels: u16) -> Result<Vec<StereoFrame>, ProtocolError> {
    let bytes = STANDARD
        .decode(chunk)
        .map_err(|e| ProtocolError::InvalidAudio(e.to_string()))?;

    let stereo = channels >= 2;
    let frame_bytes = SAMPLE_BYTES * channels.max(1) as usize;
    let remainder = bytes.len() % frame_bytes;
    if remainder != 0 {
        log::debug!("Mixer: dropping {} trailing bytes of a partial frame", remainder);
    }

    let sample = |b: &[u8]| i16::from_le_bytes([b[0], b[1]]) as f32 / 32768.0;
    Ok(bytes
        .chunks_exact(frame_bytes)
        .map(|f| {
            let left = sample(f);
            let right = if stereo { sample(&f[SAMPLE_BYTES..]) } else { left };
            StereoFrame { left, right }
        })
        .collect())
}

/// Visualizer level of a chunk: `min(1, mean(|left|) × 10)`
pub fn audio_level(frames: &[StereoFrame]) -> f32 {
    if frames.is_empty() {
        return 0.0;
    }
    let sum: f32 = frames.iter().map(|f| f.left.abs()).sum();
    (sum / frames.len() as f32 * 10.0).min(1.0)
}
