//! Capture device abstraction
//!
//! A [`CaptureSource`] hands out at most one live [`CaptureStream`] at a
//! time. The stream buffers interleaved `f32` samples on its own thread (or
//! callback); the recorder drains them whenever it is polled.

use std::sync::{Arc, Mutex};

use thiserror::Error;

/// Why a capture device could not be opened
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CaptureError {
    #[error("Microphone access was denied. Allow access in your system settings and try again")]
    PermissionDenied,

    #[error("No microphone found. Connect one and try again")]
    DeviceNotFound,

    #[error("The microphone is in use by another application")]
    DeviceBusy,

    #[error("The microphone does not support the requested settings")]
    Unsupported,

    #[error("Nothing to record: the live stream is not playing")]
    NotPlaying,

    #[error("Could not start recording: {0}")]
    Other(String),
}

/// Opens capture streams
pub trait CaptureSource {
    type Stream: CaptureStream;

    fn acquire(&mut self) -> Result<Self::Stream, CaptureError>;
}

/// A live capture session
pub trait CaptureStream {
    fn sample_rate(&self) -> u32;

    fn channels(&self) -> u16;

    /// Move every sample captured since the last call into `out`
    fn drain_into(&mut self, out: &mut Vec<f32>);

    /// Release the device; later drains return nothing new
    fn close(&mut self);
}

/// Interleaved sample buffer shared between a capture callback and the stream
#[derive(Debug, Clone, Default)]
pub struct SharedSamples {
    inner: Arc<Mutex<Vec<f32>>>,
}

impl SharedSamples {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append from the producer side
    pub fn push(&self, samples: &[f32]) {
        match self.inner.lock() {
            Ok(mut buf) => buf.extend_from_slice(samples),
            Err(_) => log::error!("Recorder: capture buffer poisoned, dropping {} samples", samples.len()),
        }
    }

    /// Take everything buffered so far
    pub fn drain_into(&self, out: &mut Vec<f32>) {
        if let Ok(mut buf) = self.inner.lock() {
            out.append(&mut buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_samples_drain_empties() {
        let shared = SharedSamples::new();
        let producer = shared.clone();
        producer.push(&[0.1, 0.2]);
        producer.push(&[0.3]);

        let mut out = Vec::new();
        shared.drain_into(&mut out);
        assert_eq!(out, vec![0.1, 0.2, 0.3]);

        shared.drain_into(&mut out);
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn test_error_messages_are_presentable() {
        assert!(CaptureError::PermissionDenied.to_string().contains("denied"));
        assert_eq!(
            CaptureError::Other("boom".into()).to_string(),
            "Could not start recording: boom"
        );
    }
}
