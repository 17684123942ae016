use crate::error::SourceError;
use crate::frame::SampleWidth;

use super::{Rewind, SampleReader};

/// An in-memory interleaved sample buffer. Always seekable/rewindable; the
/// simplest `SampleReader` backend, used heavily in tests.
pub struct BufferSampleReader {
    samples: Vec<f32>,
    sampling_rate: u32,
    channels: u8,
    pos: usize,
}

impl BufferSampleReader {
    pub fn new(samples: Vec<f32>, sampling_rate: u32, channels: u8) -> Self {
        Self {
            samples,
            sampling_rate,
            channels,
            pos: 0,
        }
    }
}

impl SampleReader for BufferSampleReader {
    fn sampling_rate(&self) -> u32 {
        self.sampling_rate
    }

    fn channels(&self) -> u8 {
        self.channels
    }

    /// Samples are already decoded to normalized `f32`; there is no wire
    /// encoding to report. `ThirtyTwo` is the nominal full-precision value.
    fn sample_width(&self) -> SampleWidth {
        SampleWidth::ThirtyTwo
    }

    fn read_samples(&mut self, buf: &mut [f32]) -> Result<usize, SourceError> {
        let available = self.samples.len() - self.pos;
        let n = available.min(buf.len());
        buf[..n].copy_from_slice(&self.samples[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

impl Rewind for BufferSampleReader {
    fn rewind(&mut self) -> Result<(), SourceError> {
        self.pos = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_short_reads_at_the_end_of_the_buffer() {
        let mut reader = BufferSampleReader::new(vec![1.0, 2.0, 3.0], 8_000, 1);
        let mut buf = [0.0; 2];
        assert_eq!(reader.read_samples(&mut buf).unwrap(), 2);
        let mut buf2 = [0.0; 2];
        assert_eq!(reader.read_samples(&mut buf2).unwrap(), 1);
        assert_eq!(buf2[0], 3.0);
    }

    #[test]
    fn rewind_resets_the_cursor() {
        let mut reader = BufferSampleReader::new(vec![1.0, 2.0], 8_000, 1);
        let mut buf = [0.0; 2];
        reader.read_samples(&mut buf).unwrap();
        reader.rewind().unwrap();
        let mut buf2 = [0.0; 2];
        assert_eq!(reader.read_samples(&mut buf2).unwrap(), 2);
        assert_eq!(buf2, buf);
    }
}
