//! Recording tap on the live mix
//!
//! Decoded chunks pass through a [`MixTap`] after the output gain. While a
//! [`LiveMixCapture`] stream is open, the tap copies them into its buffer as
//! interleaved stereo; otherwise they are dropped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::protocol::StereoFrame;
use crate::recorder::{CaptureError, CaptureSource, CaptureStream, SharedSamples};

#[derive(Debug, Clone, Default)]
pub(crate) struct MixTap {
    playing: Arc<AtomicBool>,
    sink: Arc<Mutex<Option<SharedSamples>>>,
}

impl MixTap {
    pub(crate) fn set_playing(&self, playing: bool) {
        self.playing.store(playing, Ordering::Release);
    }

    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Acquire)
    }

    /// Copy frames into the open capture buffer, if any
    pub(crate) fn feed(&self, frames: &[StereoFrame], gain: f32) {
        let Ok(sink) = self.sink.lock() else {
            return;
        };
        if let Some(samples) = sink.as_ref() {
            let interleaved: Vec<f32> = frames
                .iter()
                .flat_map(|f| [f.left * gain, f.right * gain])
                .collect();
            samples.push(&interleaved);
        }
    }

    fn attach(&self) -> SharedSamples {
        let samples = SharedSamples::new();
        if let Ok(mut sink) = self.sink.lock() {
            *sink = Some(samples.clone());
        }
        samples
    }

    fn detach(&self) {
        if let Ok(mut sink) = self.sink.lock() {
            *sink = None;
        }
    }
}

/// Capture source recording the live mix output
///
/// Created by [`PromptMixer::capture_source`](super::PromptMixer::capture_source).
/// Acquiring fails with [`CaptureError::NotPlaying`] unless the session is
/// playing.
#[derive(Debug, Clone)]
pub struct LiveMixCapture {
    tap: MixTap,
    sample_rate: u32,
}

impl LiveMixCapture {
    pub(crate) fn new(tap: MixTap, sample_rate: u32) -> Self {
        Self { tap, sample_rate }
    }
}

impl CaptureSource for LiveMixCapture {
    type Stream = LiveMixStream;

    fn acquire(&mut self) -> Result<LiveMixStream, CaptureError> {
        if !self.tap.is_playing() {
            return Err(CaptureError::NotPlaying);
        }
        log::debug!("Mixer: recording tap attached");
        Ok(LiveMixStream {
            samples: self.tap.attach(),
            tap: self.tap.clone(),
            sample_rate: self.sample_rate,
            open: true,
        })
    }
}

pub struct LiveMixStream {
    tap: MixTap,
    samples: SharedSamples,
    sample_rate: u32,
    open: bool,
}

impl CaptureStream for LiveMixStream {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn channels(&self) -> u16 {
        2
    }

    fn drain_into(&mut self, out: &mut Vec<f32>) {
        self.samples.drain_into(out);
    }

    fn close(&mut self) {
        if self.open {
            self.open = false;
            self.tap.detach();
            log::debug!("Mixer: recording tap detached");
        }
    }
}
