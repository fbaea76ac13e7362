//! Recording sessions
//!
//! [`RecorderController`] owns at most one live capture stream and turns
//! what it captured into an immutable WAV [`Blob`] behind an object URL.
//!
//! ```text
//!            start()                 stop() [Immediate]
//!   Idle ─────────────► Recording ─────────────────────► Stopped
//!    ▲                      │  stop() [Deferred]            │
//!    │                      ▼                               │
//!    │                  Encoding ──finish_encoding()────────┘
//!    │                                                      │
//!    └──────────────── reset() / discard() ◄────────────────┘
//! ```
//!
//! Starting while `Recording` or `Encoding` is ignored; a failed start leaves
//! the recorder where it was with `last_error` set.

mod analyser;
mod blob;
mod capture;
#[cfg(feature = "cpal-capture")]
mod microphone;
mod wav;

pub use analyser::{Analyser, AnalyserFrame, FrameLoop, FramePhase};
pub use blob::{Blob, ObjectUrlRegistry};
pub use capture::{CaptureError, CaptureSource, CaptureStream, SharedSamples};
#[cfg(feature = "cpal-capture")]
pub use microphone::{CpalCapture, CpalStream};
pub use wav::encode_wav;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::config::RecorderConfig;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecorderError {
    #[error("{0}")]
    Capture(#[from] CaptureError),

    #[error("Could not encode recording: {0}")]
    Encode(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingState {
    Idle,
    Recording,
    Encoding,
    Stopped,
}

/// How captured audio is finalized on stop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FinalizeMode {
    /// Encode during `stop()` (microphone)
    #[default]
    Immediate,
    /// `stop()` enters `Encoding`; `finish_encoding()` completes it (live mix)
    Deferred,
}

/// A finished recording
#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    pub blob: Arc<Blob>,
    pub url: String,
    pub duration_secs: f64,
    pub file_name: String,
    pub sample_rate: u32,
    pub channels: u16,
}

impl Recording {
    /// Write the WAV file into `dir` (see `config::default_recordings_dir`)
    pub fn save(&self, dir: &Path) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, self.blob.bytes())?;
        log::info!("Recorder: saved {:?}", path);
        Ok(path)
    }
}

/// Captured audio waiting to be encoded
struct Take {
    samples: Vec<f32>,
    sample_rate: u32,
    channels: u16,
}

impl Take {
    fn duration_secs(&self) -> f64 {
        let per_second = self.sample_rate as f64 * self.channels.max(1) as f64;
        if per_second == 0.0 {
            0.0
        } else {
            self.samples.len() as f64 / per_second
        }
    }
}

pub struct RecorderController<S: CaptureSource> {
    source: S,
    config: RecorderConfig,
    mode: FinalizeMode,
    state: RecordingState,
    stream: Option<S::Stream>,
    take: Option<Take>,
    recording: Option<Recording>,
    urls: ObjectUrlRegistry,
    analyser: Analyser,
    frames: FrameLoop,
    last_error: Option<String>,
    scratch: Vec<f32>,
}

impl<S: CaptureSource> RecorderController<S> {
    pub fn new(source: S, config: &RecorderConfig, mode: FinalizeMode) -> Self {
        Self {
            source,
            mode,
            state: RecordingState::Idle,
            stream: None,
            take: None,
            recording: None,
            urls: ObjectUrlRegistry::new(),
            analyser: Analyser::new(config.fft_size),
            frames: FrameLoop::default(),
            last_error: None,
            scratch: Vec::new(),
            config: config.clone(),
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Read access
    // ─────────────────────────────────────────────────────────────

    pub fn state(&self) -> RecordingState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state == RecordingState::Recording
    }

    pub fn recording(&self) -> Option<&Recording> {
        self.recording.as_ref()
    }

    pub fn urls(&self) -> &ObjectUrlRegistry {
        &self.urls
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn take_error(&mut self) -> Option<String> {
        self.last_error.take()
    }

    /// Seconds captured so far in the current (or pending) take
    pub fn elapsed_secs(&self) -> f64 {
        self.take.as_ref().map(Take::duration_secs).unwrap_or(0.0)
    }

    pub fn frame_phase(&self) -> FramePhase {
        self.frames.phase()
    }

    // ─────────────────────────────────────────────────────────────
    // Session
    // ─────────────────────────────────────────────────────────────

    /// Open the capture device and start a new take
    ///
    /// A previous finished recording is released only once the device is
    /// open, so a failed start keeps it.
    pub fn start(&mut self) -> Result<(), RecorderError> {
        if matches!(self.state, RecordingState::Recording | RecordingState::Encoding) {
            log::debug!("Recorder: start ignored while {:?}", self.state);
            return Ok(());
        }

        let stream = match self.source.acquire() {
            Ok(stream) => stream,
            Err(e) => {
                log::warn!("Recorder: could not acquire capture device: {:?}", e);
                self.last_error = Some(e.to_string());
                return Err(e.into());
            }
        };

        self.release_recording();
        self.take = Some(Take {
            samples: Vec::new(),
            sample_rate: stream.sample_rate(),
            channels: stream.channels(),
        });
        log::info!(
            "Recorder: recording ({} channels, {}Hz, max {}s)",
            stream.channels(),
            stream.sample_rate(),
            self.config.max_duration_secs
        );
        self.stream = Some(stream);
        self.analyser.reset();
        self.frames.start();
        self.last_error = None;
        self.state = RecordingState::Recording;
        Ok(())
    }

    /// Pull captured samples; stops automatically at the maximum length
    ///
    /// Returns true when this call hit the limit and stopped the recording.
    pub fn poll(&mut self) -> Result<bool, RecorderError> {
        if self.state != RecordingState::Recording {
            return Ok(false);
        }
        self.pull();

        if self.elapsed_secs() >= self.config.max_duration_secs as f64 {
            log::info!("Recorder: maximum length of {}s reached", self.config.max_duration_secs);
            self.stop()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Stop capturing and finalize (or enter `Encoding` in deferred mode)
    pub fn stop(&mut self) -> Result<(), RecorderError> {
        if self.state != RecordingState::Recording {
            log::debug!("Recorder: stop ignored while {:?}", self.state);
            return Ok(());
        }
        self.pull();
        self.close_stream();

        match self.mode {
            FinalizeMode::Immediate => self.finalize(),
            FinalizeMode::Deferred => {
                log::debug!("Recorder: encoding {:.1}s", self.elapsed_secs());
                self.state = RecordingState::Encoding;
                Ok(())
            }
        }
    }

    /// Complete a deferred stop
    pub fn finish_encoding(&mut self) -> Result<(), RecorderError> {
        if self.state != RecordingState::Encoding {
            log::debug!("Recorder: nothing to encode while {:?}", self.state);
            return Ok(());
        }
        self.finalize()
    }

    /// Abandon the current take without encoding it
    pub fn discard(&mut self) {
        if matches!(self.state, RecordingState::Recording | RecordingState::Encoding) {
            log::info!("Recorder: take discarded");
            self.close_stream();
            self.take = None;
            self.state = RecordingState::Idle;
        }
    }

    /// Release everything and return to `Idle`
    pub fn reset(&mut self) {
        self.close_stream();
        self.take = None;
        self.release_recording();
        self.analyser.reset();
        self.last_error = None;
        self.state = RecordingState::Idle;
    }

    // ─────────────────────────────────────────────────────────────
    // Visualizer
    // ─────────────────────────────────────────────────────────────

    /// Host idle callback for the frame loop
    pub fn on_idle(&mut self) {
        self.frames.on_idle();
    }

    /// Host animation-frame callback; yields a frame while recording
    pub fn on_animation_frame(&mut self) -> Option<AnalyserFrame> {
        if !self.frames.on_frame() || self.state != RecordingState::Recording {
            return None;
        }
        self.pull();
        Some(self.analyser.frame())
    }

    // ─────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────

    fn pull(&mut self) {
        let (Some(stream), Some(take)) = (self.stream.as_mut(), self.take.as_mut()) else {
            return;
        };
        self.scratch.clear();
        stream.drain_into(&mut self.scratch);
        if self.scratch.is_empty() {
            return;
        }

        // Never keep more than the maximum length
        let limit = (self.config.max_duration_secs as f64
            * take.sample_rate as f64
            * take.channels.max(1) as f64) as usize;
        let room = limit.saturating_sub(take.samples.len());
        let accepted = &self.scratch[..self.scratch.len().min(room)];

        take.samples.extend_from_slice(accepted);
        self.analyser.push(accepted, take.channels);
    }

    fn close_stream(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.close();
        }
        self.frames.cancel();
    }

    fn release_recording(&mut self) {
        if let Some(recording) = self.recording.take() {
            self.urls.revoke(&recording.url);
            log::debug!("Recorder: revoked {}", recording.url);
        }
    }

    fn finalize(&mut self) -> Result<(), RecorderError> {
        let Some(take) = self.take.take() else {
            self.state = RecordingState::Idle;
            return Ok(());
        };

        let bytes = match encode_wav(&take.samples, take.sample_rate, take.channels) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::error!("Recorder: WAV encoding failed: {}", e);
                let err = RecorderError::Encode(e.to_string());
                self.last_error = Some(err.to_string());
                self.state = RecordingState::Idle;
                return Err(err);
            }
        };

        let blob = Arc::new(Blob::new(bytes, self.config.mime_type.clone()));
        let url = self.urls.create(blob.clone());
        let file_name = format!("recording-{}.wav", chrono::Local::now().format("%Y%m%d-%H%M%S"));
        let duration_secs = take.duration_secs();

        log::info!(
            "Recorder: finished {} ({:.1}s, {} bytes)",
            file_name,
            duration_secs,
            blob.len()
        );

        self.recording = Some(Recording {
            blob,
            url,
            duration_secs,
            file_name,
            sample_rate: take.sample_rate,
            channels: take.channels,
        });
        self.state = RecordingState::Stopped;
        Ok(())
    }
}

impl<S: CaptureSource> Drop for RecorderController<S> {
    fn drop(&mut self) {
        self.close_stream();
        self.release_recording();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Capture source fed by the test
    #[derive(Clone, Default)]
    struct FakeSource {
        acquired: Rc<RefCell<usize>>,
        closed: Rc<RefCell<usize>>,
        fail_with: Option<CaptureError>,
        feed: SharedSamples,
    }

    struct FakeStream {
        feed: SharedSamples,
        closed: Rc<RefCell<usize>>,
    }

    impl CaptureSource for FakeSource {
        type Stream = FakeStream;

        fn acquire(&mut self) -> Result<FakeStream, CaptureError> {
            if let Some(e) = self.fail_with.clone() {
                return Err(e);
            }
            *self.acquired.borrow_mut() += 1;
            Ok(FakeStream {
                feed: self.feed.clone(),
                closed: self.closed.clone(),
            })
        }
    }

    impl CaptureStream for FakeStream {
        fn sample_rate(&self) -> u32 {
            100
        }
        fn channels(&self) -> u16 {
            1
        }
        fn drain_into(&mut self, out: &mut Vec<f32>) {
            self.feed.drain_into(out);
        }
        fn close(&mut self) {
            *self.closed.borrow_mut() += 1;
        }
    }

    fn config() -> RecorderConfig {
        RecorderConfig {
            max_duration_secs: 2,
            fft_size: 64,
            ..Default::default()
        }
    }

    fn recorder(mode: FinalizeMode) -> (RecorderController<FakeSource>, FakeSource) {
        let source = FakeSource::default();
        (RecorderController::new(source.clone(), &config(), mode), source)
    }

    #[test]
    fn test_start_while_recording_is_noop() {
        let (mut rec, source) = recorder(FinalizeMode::Immediate);
        rec.start().unwrap();
        rec.start().unwrap();
        assert_eq!(rec.state(), RecordingState::Recording);
        assert_eq!(*source.acquired.borrow(), 1);
    }

    #[test]
    fn test_stop_produces_wav_blob() {
        let (mut rec, source) = recorder(FinalizeMode::Immediate);
        rec.start().unwrap();
        source.feed.push(&[0.25; 150]);
        rec.stop().unwrap();

        assert_eq!(rec.state(), RecordingState::Stopped);
        assert_eq!(*source.closed.borrow(), 1);
        let recording = rec.recording().unwrap();
        assert_eq!(recording.duration_secs, 1.5);
        assert_eq!(recording.blob.mime_type(), "audio/wav");
        assert_eq!(&recording.blob.bytes()[0..4], b"RIFF");
        assert!(recording.file_name.starts_with("recording-"));
        assert!(recording.file_name.ends_with(".wav"));
        assert!(rec.urls().resolve(&recording.url).is_some());
    }

    #[test]
    fn test_reset_revokes_url() {
        let (mut rec, _source) = recorder(FinalizeMode::Immediate);
        rec.start().unwrap();
        rec.stop().unwrap();
        let url = rec.recording().unwrap().url.clone();

        rec.reset();
        assert_eq!(rec.state(), RecordingState::Idle);
        assert!(rec.recording().is_none());
        assert!(rec.urls().resolve(&url).is_none());
        assert!(rec.urls().is_empty());
    }

    #[test]
    fn test_new_take_releases_previous_recording() {
        let (mut rec, _source) = recorder(FinalizeMode::Immediate);
        rec.start().unwrap();
        rec.stop().unwrap();
        let first = rec.recording().unwrap().url.clone();

        rec.start().unwrap();
        assert!(rec.urls().resolve(&first).is_none());
        rec.stop().unwrap();
        assert_eq!(rec.urls().len(), 1);
    }

    #[test]
    fn test_failed_start_reports_and_stays_idle() {
        let source = FakeSource {
            fail_with: Some(CaptureError::PermissionDenied),
            ..Default::default()
        };
        let mut rec = RecorderController::new(source, &config(), FinalizeMode::Immediate);
        assert_eq!(
            rec.start(),
            Err(RecorderError::Capture(CaptureError::PermissionDenied))
        );
        assert_eq!(rec.state(), RecordingState::Idle);
        assert!(rec.take_error().unwrap().contains("denied"));
        assert!(rec.take_error().is_none());
    }

    #[test]
    fn test_poll_stops_at_max_duration() {
        let (mut rec, source) = recorder(FinalizeMode::Immediate);
        rec.start().unwrap();
        source.feed.push(&[0.0; 120]);
        assert!(!rec.poll().unwrap());
        assert_eq!(rec.elapsed_secs(), 1.2);

        source.feed.push(&[0.0; 500]);
        assert!(rec.poll().unwrap());
        assert_eq!(rec.state(), RecordingState::Stopped);
        assert_eq!(rec.recording().unwrap().duration_secs, 2.0);
    }

    #[test]
    fn test_deferred_stop_goes_through_encoding() {
        let (mut rec, source) = recorder(FinalizeMode::Deferred);
        rec.start().unwrap();
        source.feed.push(&[0.1; 50]);
        rec.stop().unwrap();
        assert_eq!(rec.state(), RecordingState::Encoding);
        assert!(rec.recording().is_none());

        // Cannot start over while encoding
        rec.start().unwrap();
        assert_eq!(rec.state(), RecordingState::Encoding);

        rec.finish_encoding().unwrap();
        assert_eq!(rec.state(), RecordingState::Stopped);
        assert_eq!(rec.recording().unwrap().duration_secs, 0.5);
    }

    #[test]
    fn test_discard_drops_take() {
        let (mut rec, source) = recorder(FinalizeMode::Deferred);
        rec.start().unwrap();
        source.feed.push(&[0.1; 50]);
        rec.discard();
        assert_eq!(rec.state(), RecordingState::Idle);
        assert!(rec.recording().is_none());
        assert_eq!(*source.closed.borrow(), 1);
    }

    #[test]
    fn test_frames_only_while_recording() {
        let (mut rec, source) = recorder(FinalizeMode::Immediate);
        rec.on_idle();
        assert!(rec.on_animation_frame().is_none());

        rec.start().unwrap();
        source.feed.push(&[0.5; 64]);
        assert!(rec.on_animation_frame().is_none());
        rec.on_idle();
        let frame = rec.on_animation_frame().unwrap();
        assert_eq!(frame.waveform.len(), 64);
        assert_eq!(frame.frequency.len(), 32);
        assert!(frame.waveform.iter().all(|&b| b == 192));

        rec.stop().unwrap();
        assert_eq!(rec.frame_phase(), FramePhase::Stopped);
        rec.on_idle();
        assert!(rec.on_animation_frame().is_none());
    }

    #[test]
    fn test_save_writes_wav_file() {
        let (mut rec, source) = recorder(FinalizeMode::Immediate);
        rec.start().unwrap();
        source.feed.push(&[0.0; 10]);
        rec.stop().unwrap();

        let dir = tempfile::tempdir().unwrap();
        let recording = rec.recording().unwrap();
        let path = recording.save(&dir.path().join("takes")).unwrap();
        assert_eq!(path.file_name().unwrap().to_str(), Some(recording.file_name.as_str()));
        assert_eq!(std::fs::read(&path).unwrap(), recording.blob.bytes());
    }

    #[test]
    fn test_drop_closes_stream() {
        let (mut rec, source) = recorder(FinalizeMode::Immediate);
        rec.start().unwrap();
        drop(rec);
        assert_eq!(*source.closed.borrow(), 1);
    }
}
