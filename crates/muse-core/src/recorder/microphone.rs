//! Microphone capture on the default input device

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BuildStreamError, SampleFormat, Stream, StreamConfig};

use super::capture::{CaptureError, CaptureSource, CaptureStream, SharedSamples};

/// Opens the system default input device
#[derive(Debug, Default)]
pub struct CpalCapture;

impl CpalCapture {
    pub fn new() -> Self {
        Self
    }
}

pub struct CpalStream {
    stream: Option<Stream>,
    samples: SharedSamples,
    sample_rate: u32,
    channels: u16,
}

impl CaptureSource for CpalCapture {
    type Stream = CpalStream;

    fn acquire(&mut self) -> Result<CpalStream, CaptureError> {
        let host = cpal::default_host();
        let device = host.default_input_device().ok_or(CaptureError::DeviceNotFound)?;
        let supported = device
            .default_input_config()
            .map_err(|e| CaptureError::Other(e.to_string()))?;

        let sample_format = supported.sample_format();
        let config: StreamConfig = supported.into();
        let samples = SharedSamples::new();

        log::info!(
            "Recorder: opening '{}' ({} channels, {}Hz, {:?})",
            device.name().unwrap_or_else(|_| "unknown".to_string()),
            config.channels,
            config.sample_rate.0,
            sample_format
        );

        let err_fn = |err: cpal::StreamError| log::error!("Recorder: input stream error: {}", err);
        let stream = match sample_format {
            SampleFormat::F32 => {
                let producer = samples.clone();
                device.build_input_stream(
                    &config,
                    move |data: &[f32], _: &cpal::InputCallbackInfo| producer.push(data),
                    err_fn,
                    None,
                )
            }
            SampleFormat::I16 => {
                let producer = samples.clone();
                device.build_input_stream(
                    &config,
                    move |data: &[i16], _: &cpal::InputCallbackInfo| {
                        let converted: Vec<f32> = data.iter().map(|&s| s as f32 / i16::MAX as f32).collect();
                        producer.push(&converted);
                    },
                    err_fn,
                    None,
                )
            }
            other => {
                log::warn!("Recorder: unsupported input sample format {:?}", other);
                return Err(CaptureError::Unsupported);
            }
        }
        .map_err(classify_build_error)?;

        stream.play().map_err(|e| CaptureError::Other(e.to_string()))?;

        Ok(CpalStream {
            stream: Some(stream),
            samples,
            sample_rate: config.sample_rate.0,
            channels: config.channels,
        })
    }
}

impl CaptureStream for CpalStream {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn channels(&self) -> u16 {
        self.channels
    }

    fn drain_into(&mut self, out: &mut Vec<f32>) {
        if self.stream.is_some() {
            self.samples.drain_into(out);
        }
    }

    fn close(&mut self) {
        // Dropping the stream releases the device
        if self.stream.take().is_some() {
            log::debug!("Recorder: input stream closed");
        }
    }
}

fn classify_build_error(e: BuildStreamError) -> CaptureError {
    match e {
        BuildStreamError::DeviceNotAvailable => CaptureError::DeviceBusy,
        BuildStreamError::StreamConfigNotSupported | BuildStreamError::InvalidArgument => {
            CaptureError::Unsupported
        }
        other => CaptureError::Other(other.to_string()),
    }
}
