//! Frame sources: `read()` a sequence of fixed-size, possibly overlapping
//! frames out of an underlying sample stream.
//!
//! The windowing policy (block size, hop size) is implemented once, in
//! [`framer::Framer`], against the low-level [`SampleReader`] capability.
//! Each concrete backend (in-memory buffer, raw-PCM file, live device) only
//! has to implement `SampleReader`; none of them re-derives block/hop math.

mod buffer;
#[cfg(feature = "device")]
mod device;
mod file;
mod framer;
mod wrappers;

pub use buffer::BufferSampleReader;
#[cfg(feature = "device")]
pub use device::DeviceSampleReader;
pub use file::FileSampleReader;
pub use framer::{Framer, FramerConfig};
pub use wrappers::{LimitedDurationWrapper, RecordingWrapper};

use crate::error::SourceError;
use crate::frame::SampleWidth;

/// Pull-based access to raw interleaved PCM samples, normalized to
/// `[-1.0, 1.0]`. Implemented once per backend.
pub trait SampleReader {
    fn sampling_rate(&self) -> u32;
    fn channels(&self) -> u8;
    /// Bit width the underlying samples were (or, for sources that never see
    /// raw bytes, nominally would be) encoded at on the wire.
    fn sample_width(&self) -> SampleWidth;

    /// Fills as much of `buf` as samples are available and returns the count
    /// written. A short read (`< buf.len()`) that is not a hard error means
    /// the underlying stream is exhausted.
    fn read_samples(&mut self, buf: &mut [f32]) -> Result<usize, SourceError>;
}

/// Capability for resetting a sample reader to its start. Seekable files and
/// buffers rewind directly; a bare live device implements this too, but
/// always returns `RewindUnsupported` — wrap it in [`RecordingWrapper`]
/// first if rewind is actually needed.
pub trait Rewind {
    fn rewind(&mut self) -> Result<(), SourceError>;
}

/// What [`framer::Framer`] (and anything else that frames a stream)
/// implements: pull whole frames, in order, until exhaustion.
pub trait FrameSource {
    type Frame;

    /// Returns the next frame, or `None` once the source cannot produce a
    /// full frame (insufficient remaining samples). Once `None` is returned,
    /// subsequent calls keep returning `None`.
    fn read(&mut self) -> Result<Option<Self::Frame>, SourceError>;

    fn sampling_rate(&self) -> u32;
    fn sample_width(&self) -> SampleWidth;
    fn channels(&self) -> u8;
    fn block_size(&self) -> usize;
    fn hop_size(&self) -> usize;
}

/// A [`FrameSource`] that additionally supports resetting to its start.
pub trait RewindableSource: FrameSource {
    fn rewind(&mut self) -> Result<(), SourceError>;
}
