//! Live capture device backend, behind the `device` feature.
//!
//! Grounded on the teacher's `audio/recorder.rs` CPAL `Recorder` (sample
//! format handling) and `audio/dispatch.rs`'s `FrameDispatcher` (bounded
//! channel + dropped-sample counter for a producer that can outrun the
//! consumer).

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, Stream};
use crossbeam_channel::{Receiver, Sender, TrySendError};

use crate::error::SourceError;
use crate::frame::SampleWidth;

use super::{Rewind, SampleReader};

const CHANNEL_CAPACITY: usize = 64;

/// A `SampleReader` fed by a live `cpal` input stream. Implements `Rewind`
/// so it composes with generic `RewindableSource`/`Rewind`-bounded callers,
/// but every call fails with `RewindUnsupported`: a live device cannot
/// replay its own past. Wrap in [`crate::source::RecordingWrapper`] first if
/// rewind is actually required.
pub struct DeviceSampleReader {
    _stream: Stream,
    receiver: Receiver<f32>,
    dropped: Arc<AtomicUsize>,
    sampling_rate: u32,
    channels: u8,
    sample_width: SampleWidth,
}

impl DeviceSampleReader {
    /// Opens the system's default input device at its native configuration.
    pub fn default_input() -> Result<Self, SourceError> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| SourceError::Device("no default input device".into()))?;
        let config = device
            .default_input_config()
            .map_err(|e| SourceError::Device(e.to_string()))?;

        let sampling_rate = config.sample_rate().0;
        let channels = config.channels() as u8;
        let sample_format = config.sample_format();
        let sample_width = width_of(sample_format)?;

        let (tx, rx): (Sender<f32>, Receiver<f32>) = crossbeam_channel::bounded(CHANNEL_CAPACITY * 64);
        let dropped = Arc::new(AtomicUsize::new(0));

        let stream = build_stream(&device, &config.into(), sample_format, tx, Arc::clone(&dropped))?;
        stream.play().map_err(|e| SourceError::Device(e.to_string()))?;

        Ok(Self {
            _stream: stream,
            receiver: rx,
            dropped,
            sampling_rate,
            channels,
            sample_width,
        })
    }

    /// Count of samples dropped because the consumer could not keep up.
    pub fn dropped_count(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl SampleReader for DeviceSampleReader {
    fn sampling_rate(&self) -> u32 {
        self.sampling_rate
    }

    fn channels(&self) -> u8 {
        self.channels
    }

    fn sample_width(&self) -> SampleWidth {
        self.sample_width
    }

    fn read_samples(&mut self, buf: &mut [f32]) -> Result<usize, SourceError> {
        let mut n = 0;
        while n < buf.len() {
            match self.receiver.recv() {
                Ok(sample) => {
                    buf[n] = sample;
                    n += 1;
                }
                Err(_) => break, // stream dropped: treat as end of stream
            }
        }
        Ok(n)
    }
}

impl Rewind for DeviceSampleReader {
    fn rewind(&mut self) -> Result<(), SourceError> {
        Err(SourceError::RewindUnsupported)
    }
}

fn width_of(format: SampleFormat) -> Result<SampleWidth, SourceError> {
    match format {
        SampleFormat::F32 => Ok(SampleWidth::ThirtyTwo),
        SampleFormat::I16 | SampleFormat::U16 => Ok(SampleWidth::Sixteen),
        other => Err(SourceError::Device(format!("unsupported sample format: {other:?}"))),
    }
}

fn build_stream(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    format: SampleFormat,
    tx: Sender<f32>,
    dropped: Arc<AtomicUsize>,
) -> Result<Stream, SourceError> {
    let err_fn = |err| tracing::warn!(%err, "capture stream error");

    let stream = match format {
        SampleFormat::F32 => device.build_input_stream(
            config,
            move |data: &[f32], _| push_samples(data, |s| s, &tx, &dropped),
            err_fn,
            None,
        ),
        SampleFormat::I16 => device.build_input_stream(
            config,
            move |data: &[i16], _| {
                push_samples(data, |s| s as f32 / 32_768.0_f32, &tx, &dropped)
            },
            err_fn,
            None,
        ),
        SampleFormat::U16 => device.build_input_stream(
            config,
            move |data: &[u16], _| {
                push_samples(data, |s| (s as f32 - 32_768.0_f32) / 32_768.0_f32, &tx, &dropped)
            },
            err_fn,
            None,
        ),
        other => return Err(SourceError::Device(format!("unsupported sample format: {other:?}"))),
    };

    stream.map_err(|e| SourceError::Device(e.to_string()))
}

fn push_samples<T, F>(data: &[T], mut convert: F, tx: &Sender<f32>, dropped: &AtomicUsize)
where
    T: Copy,
    F: FnMut(T) -> f32,
{
    for raw in data.iter().copied() {
        if let Err(TrySendError::Full(_) | TrySendError::Disconnected(_)) = tx.try_send(convert(raw)) {
            dropped.fetch_add(1, Ordering::Relaxed);
        }
    }
}
