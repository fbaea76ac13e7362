//! Live analyser frames and the visualizer frame loop
//!
//! The analyser keeps the most recent `fft_size` mono samples and turns them
//! into the two byte arrays a waveform view draws from:
//!
//! - frequency data: `fft_size / 2` bins, Blackman-windowed magnitude
//!   spectrum, smoothed over time, mapped from [-100 dB, -30 dB] to 0..=255
//! - waveform data: `fft_size` samples mapped from [-1, 1] to 0..=255
//!   (silence is 128)

use std::collections::VecDeque;
use std::sync::Arc;

use realfft::num_complex::Complex;
use realfft::{RealFftPlanner, RealToComplex};

const MIN_DECIBELS: f32 = -100.0;
const MAX_DECIBELS: f32 = -30.0;
const SMOOTHING: f32 = 0.8;

/// One visualizer frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyserFrame {
    pub frequency: Vec<u8>,
    pub waveform: Vec<u8>,
}

pub struct Analyser {
    fft_size: usize,
    history: VecDeque<f32>,
    fft: Arc<dyn RealToComplex<f32>>,
    window: Vec<f32>,
    input: Vec<f32>,
    spectrum: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    smoothed: Vec<f32>,
}

impl Analyser {
    /// `fft_size` must be a power of two (the recorder config guarantees it)
    pub fn new(fft_size: usize) -> Self {
        let fft_size = fft_size.max(2);
        let mut planner = RealFftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(fft_size);

        // Blackman window
        let window = (0..fft_size)
            .map(|i| {
                let x = 2.0 * std::f32::consts::PI * i as f32 / fft_size as f32;
                0.42 - 0.5 * x.cos() + 0.08 * (2.0 * x).cos()
            })
            .collect();

        Self {
            fft_size,
            history: VecDeque::with_capacity(fft_size),
            input: fft.make_input_vec(),
            spectrum: fft.make_output_vec(),
            scratch: fft.make_scratch_vec(),
            smoothed: vec![0.0; fft_size / 2],
            fft,
            window,
        }
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    pub fn frequency_bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Feed interleaved samples; channels are averaged to mono
    pub fn push(&mut self, samples: &[f32], channels: u16) {
        let channels = channels.max(1) as usize;
        for frame in samples.chunks(channels) {
            let mono = frame.iter().sum::<f32>() / frame.len() as f32;
            if self.history.len() == self.fft_size {
                self.history.pop_front();
            }
            self.history.push_back(mono);
        }
    }

    /// Forget all history (new recording)
    pub fn reset(&mut self) {
        self.history.clear();
        self.smoothed.iter_mut().for_each(|v| *v = 0.0);
    }

    /// Compute the current frame
    pub fn frame(&mut self) -> AnalyserFrame {
        let missing = self.fft_size - self.history.len();
        let samples = std::iter::repeat(0.0).take(missing).chain(self.history.iter().copied());

        let mut waveform = Vec::with_capacity(self.fft_size);
        for ((slot, sample), w) in self.input.iter_mut().zip(samples).zip(&self.window) {
            waveform.push((128.0 * (sample + 1.0)).clamp(0.0, 255.0) as u8);
            *slot = sample * w;
        }

        if let Err(e) = self
            .fft
            .process_with_scratch(&mut self.input, &mut self.spectrum, &mut self.scratch)
        {
            log::warn!("Recorder: analyser FFT failed: {}", e);
            return AnalyserFrame {
                frequency: vec![0; self.frequency_bin_count()],
                waveform,
            };
        }

        let scale = 1.0 / self.fft_size as f32;
        let range = MAX_DECIBELS - MIN_DECIBELS;
        let frequency = self
            .smoothed
            .iter_mut()
            .zip(&self.spectrum)
            .map(|(smoothed, bin)| {
                *smoothed = SMOOTHING * *smoothed + (1.0 - SMOOTHING) * bin.norm() * scale;
                let db = 20.0 * smoothed.log10();
                if !db.is_finite() {
                    return 0;
                }
                (255.0 * (db - MIN_DECIBELS) / range).clamp(0.0, 255.0) as u8
            })
            .collect();

        AnalyserFrame { frequency, waveform }
    }
}

/// Phase of the idle-gated animation-frame loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramePhase {
    Stopped,
    /// Waiting for the host to report idle time
    AwaitingIdle,
    /// Idle seen; the next animation frame renders
    AwaitingFrame,
}

/// Throttles visualizer rendering to one frame per idle period
///
/// `Stopped → AwaitingIdle → AwaitingFrame → AwaitingIdle → …` until
/// cancelled. Callbacks arriving in the wrong phase are ignored.
#[derive(Debug, Clone)]
pub struct FrameLoop {
    phase: FramePhase,
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self {
            phase: FramePhase::Stopped,
        }
    }
}

impl FrameLoop {
    pub fn phase(&self) -> FramePhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase != FramePhase::Stopped
    }

    pub fn start(&mut self) {
        if self.phase == FramePhase::Stopped {
            self.phase = FramePhase::AwaitingIdle;
        }
    }

    pub fn cancel(&mut self) {
        self.phase = FramePhase::Stopped;
    }

    /// Idle callback; returns true if it armed the next frame
    pub fn on_idle(&mut self) -> bool {
        if self.phase == FramePhase::AwaitingIdle {
            self.phase = FramePhase::AwaitingFrame;
            true
        } else {
            false
        }
    }

    /// Animation-frame callback; returns true if a frame should be drawn
    pub fn on_frame(&mut self) -> bool {
        if self.phase == FramePhase::AwaitingFrame {
            self.phase = FramePhase::AwaitingIdle;
            true
        } else {
            false
        }
    }
}
