use crate::error::{ConfigError, SourceError};
use crate::frame::{AudioMeta, PcmFrame, SampleWidth};

use super::{FrameSource, RewindableSource, Rewind, SampleReader};

/// Block/hop windowing parameters shared by every [`Framer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramerConfig {
    /// Samples per channel per frame.
    pub block_size: usize,
    /// Samples per channel advanced between consecutive frames.
    /// Must satisfy `0 < hop_size <= block_size`; `hop_size == block_size`
    /// means no overlap.
    pub hop_size: usize,
}

impl FramerConfig {
    pub fn new(block_size: usize, hop_size: usize) -> Result<Self, ConfigError> {
        let cfg = Self { block_size, hop_size };
        cfg.validate()?;
        Ok(cfg)
    }

    /// A non-overlapping framer: `hop_size == block_size`.
    pub fn non_overlapping(block_size: usize) -> Result<Self, ConfigError> {
        Self::new(block_size, block_size)
    }

    /// Block/hop sizes set by duration instead of raw sample count:
    /// `samples = round(sampling_rate * seconds)`.
    pub fn from_duration(sampling_rate: u32, block_secs: f64, hop_secs: f64) -> Result<Self, ConfigError> {
        Self::new(
            samples_for_duration(sampling_rate, block_secs),
            samples_for_duration(sampling_rate, hop_secs),
        )
    }

    /// A non-overlapping framer with block size set by duration.
    pub fn non_overlapping_duration(sampling_rate: u32, block_secs: f64) -> Result<Self, ConfigError> {
        Self::non_overlapping(samples_for_duration(sampling_rate, block_secs))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.block_size == 0 {
            return Err(ConfigError::BlockSizeZero);
        }
        if self.hop_size == 0 {
            return Err(ConfigError::HopSizeZero);
        }
        if self.hop_size > self.block_size {
            return Err(ConfigError::HopExceedsBlock {
                hop: self.hop_size,
                block: self.block_size,
            });
        }
        Ok(())
    }
}

fn samples_for_duration(sampling_rate: u32, seconds: f64) -> usize {
    (f64::from(sampling_rate) * seconds).round() as usize
}

/// Turns a [`SampleReader`] into a [`FrameSource`] of [`PcmFrame`]s by
/// applying block/hop windowing: the k-th frame covers samples
/// `[k*hop, k*hop + block)`. Implemented once; every backend in
/// `crate::source` is just a `SampleReader` passed through this.
pub struct Framer<R> {
    reader: R,
    config: FramerConfig,
    channels: u8,
    /// Interleaved samples of the current window, front-aligned.
    window: Vec<f32>,
    exhausted: bool,
}

impl<R: SampleReader> Framer<R> {
    pub fn new(reader: R, config: FramerConfig) -> Self {
        let channels = reader.channels();
        Self {
            reader,
            config,
            channels,
            window: Vec::new(),
            exhausted: false,
        }
    }

    fn channels_usize(&self) -> usize {
        self.channels.max(1) as usize
    }
}

impl<R: SampleReader> FrameSource for Framer<R> {
    type Frame = PcmFrame;

    fn read(&mut self) -> Result<Option<PcmFrame>, SourceError> {
        if self.exhausted {
            return Ok(None);
        }
        let ch = self.channels_usize();
        let block_len = self.config.block_size * ch;
        let hop_len = self.config.hop_size * ch;

        if self.window.is_empty() {
            let mut buf = vec![0.0f32; block_len];
            let read = self.reader.read_samples(&mut buf)?;
            if read < block_len {
                self.exhausted = true;
                return Ok(None);
            }
            self.window = buf;
        } else {
            self.window.drain(..hop_len);
            let mut incoming = vec![0.0f32; hop_len];
            let read = self.reader.read_samples(&mut incoming)?;
            if read < hop_len {
                self.exhausted = true;
                self.window.clear();
                return Ok(None);
            }
            self.window.extend_from_slice(&incoming);
        }

        Ok(Some(PcmFrame::new(
            self.window.clone(),
            AudioMeta {
                sampling_rate: self.reader.sampling_rate(),
                channels: self.channels,
                sample_width: self.reader.sample_width(),
            },
        )))
    }

    fn sampling_rate(&self) -> u32 {
        self.reader.sampling_rate()
    }

    fn sample_width(&self) -> SampleWidth {
        self.reader.sample_width()
    }

    fn channels(&self) -> u8 {
        self.channels
    }

    fn block_size(&self) -> usize {
        self.config.block_size
    }

    fn hop_size(&self) -> usize {
        self.config.hop_size
    }
}

impl<R: SampleReader + Rewind> RewindableSource for Framer<R> {
    fn rewind(&mut self) -> Result<(), SourceError> {
        self.reader.rewind()?;
        self.window.clear();
        self.exhausted = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::BufferSampleReader;

    fn samples(n: usize) -> Vec<f32> {
        (0..n).map(|i| i as f32).collect()
    }

    #[test]
    fn non_overlapping_frames_cover_disjoint_ranges() {
        let reader = BufferSampleReader::new(samples(9), 16_000, 1);
        let mut framer = Framer::new(reader, FramerConfig::non_overlapping(3).unwrap());
        let f1 = framer.read().unwrap().unwrap();
        let f2 = framer.read().unwrap().unwrap();
        let f3 = framer.read().unwrap().unwrap();
        assert_eq!(f1.samples, vec![0.0, 1.0, 2.0]);
        assert_eq!(f2.samples, vec![3.0, 4.0, 5.0]);
        assert_eq!(f3.samples, vec![6.0, 7.0, 8.0]);
        assert!(framer.read().unwrap().is_none());
    }

    #[test]
    fn overlapping_frames_advance_by_hop_size() {
        let reader = BufferSampleReader::new(samples(6), 16_000, 1);
        let mut framer = Framer::new(reader, FramerConfig::new(4, 2).unwrap());
        let f1 = framer.read().unwrap().unwrap();
        let f2 = framer.read().unwrap().unwrap();
        assert_eq!(f1.samples, vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(f2.samples, vec![2.0, 3.0, 4.0, 5.0]);
        assert!(framer.read().unwrap().is_none());
    }

    #[test]
    fn insufficient_trailing_samples_never_emit_a_partial_frame() {
        let reader = BufferSampleReader::new(samples(5), 16_000, 1);
        let mut framer = Framer::new(reader, FramerConfig::non_overlapping(3).unwrap());
        assert!(framer.read().unwrap().is_some());
        assert!(framer.read().unwrap().is_none());
        // Exhaustion is sticky.
        assert!(framer.read().unwrap().is_none());
    }

    #[test]
    fn rewind_replays_from_the_start() {
        let reader = BufferSampleReader::new(samples(6), 16_000, 1);
        let mut framer = Framer::new(reader, FramerConfig::non_overlapping(3).unwrap());
        let first = framer.read().unwrap().unwrap();
        framer.rewind().unwrap();
        let replayed = framer.read().unwrap().unwrap();
        assert_eq!(first, replayed);
    }

    #[test]
    fn duration_constructor_rounds_to_the_nearest_sample_count() {
        // 20ms @ 16kHz = 320 samples exactly.
        let cfg = FramerConfig::from_duration(16_000, 0.020, 0.020).unwrap();
        assert_eq!(cfg.block_size, 320);
        assert_eq!(cfg.hop_size, 320);

        // 16.5ms @ 1000Hz rounds to 17, not truncates to 16.
        let cfg = FramerConfig::non_overlapping_duration(1_000, 0.0165).unwrap();
        assert_eq!(cfg.block_size, 17);
    }

    #[test]
    fn config_rejects_hop_greater_than_block() {
        assert_eq!(
            FramerConfig::new(4, 5).unwrap_err(),
            ConfigError::HopExceedsBlock { hop: 5, block: 4 }
        );
    }
}
