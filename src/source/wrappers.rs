use crate::error::SourceError;
use crate::frame::SampleWidth;

use super::{Rewind, SampleReader};

/// Records every sample pulled through it so a non-seekable source (a live
/// device) can still support [`Rewind`]: rewinding replays from the
/// recording instead of reopening the device. Once the replay catches up to
/// the live edge, reads resume from `inner` and keep extending the
/// recording.
pub struct RecordingWrapper<R> {
    inner: R,
    recorded: Vec<f32>,
    replay_pos: Option<usize>,
}

impl<R: SampleReader> RecordingWrapper<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            recorded: Vec::new(),
            replay_pos: None,
        }
    }
}

impl<R: SampleReader> SampleReader for RecordingWrapper<R> {
    fn sampling_rate(&self) -> u32 {
        self.inner.sampling_rate()
    }

    fn channels(&self) -> u8 {
        self.inner.channels()
    }

    fn sample_width(&self) -> SampleWidth {
        self.inner.sample_width()
    }

    fn read_samples(&mut self, buf: &mut [f32]) -> Result<usize, SourceError> {
        let Some(pos) = self.replay_pos else {
            let n = self.inner.read_samples(buf)?;
            self.recorded.extend_from_slice(&buf[..n]);
            return Ok(n);
        };

        let available = self.recorded.len() - pos;
        let from_replay = available.min(buf.len());
        buf[..from_replay].copy_from_slice(&self.recorded[pos..pos + from_replay]);

        if pos + from_replay < self.recorded.len() {
            self.replay_pos = Some(pos + from_replay);
            return Ok(from_replay);
        }
        self.replay_pos = None;

        if from_replay == buf.len() {
            return Ok(from_replay);
        }
        let rest = &mut buf[from_replay..];
        let live = self.inner.read_samples(rest)?;
        self.recorded.extend_from_slice(&rest[..live]);
        Ok(from_replay + live)
    }
}

impl<R: SampleReader> Rewind for RecordingWrapper<R> {
    fn rewind(&mut self) -> Result<(), SourceError> {
        self.replay_pos = Some(0);
        Ok(())
    }
}

/// Caps the total number of samples `inner` will ever yield. Once the
/// budget is exhausted, reads behave as end-of-stream regardless of how
/// much `inner` still has left.
pub struct LimitedDurationWrapper<R> {
    inner: R,
    remaining: usize,
}

impl<R: SampleReader> LimitedDurationWrapper<R> {
    /// `max_frames` is expressed in per-channel frame count; the sample
    /// budget is `max_frames * channels`.
    pub fn new(inner: R, max_frames: usize) -> Self {
        let channels = inner.channels().max(1) as usize;
        Self {
            inner,
            remaining: max_frames * channels,
        }
    }
}

impl<R: SampleReader> SampleReader for LimitedDurationWrapper<R> {
    fn sampling_rate(&self) -> u32 {
        self.inner.sampling_rate()
    }

    fn channels(&self) -> u8 {
        self.inner.channels()
    }

    fn sample_width(&self) -> SampleWidth {
        self.inner.sample_width()
    }

    fn read_samples(&mut self, buf: &mut [f32]) -> Result<usize, SourceError> {
        if self.remaining == 0 {
            return Ok(0);
        }
        let cap = buf.len().min(self.remaining);
        let n = self.inner.read_samples(&mut buf[..cap])?;
        self.remaining -= n;
        Ok(n)
    }
}

impl<R: SampleReader + Rewind> Rewind for LimitedDurationWrapper<R> {
    fn rewind(&mut self) -> Result<(), SourceError> {
        self.inner.rewind()
    }
}
