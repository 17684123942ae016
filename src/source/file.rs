use std::io::{Read, Seek, SeekFrom};

use crate::error::SourceError;
use crate::frame::{decode_sample_normalized, SampleWidth};

use super::{Rewind, SampleReader};

/// A `SampleReader` over raw little-endian interleaved PCM bytes. Container
/// parsing (WAV headers, etc.) is a collaborator's job; this reader expects
/// `inner` already positioned at the first sample.
pub struct FileSampleReader<T> {
    inner: T,
    sampling_rate: u32,
    channels: u8,
    width: SampleWidth,
    data_start: u64,
    scratch: Vec<u8>,
}

impl<T: Read + Seek> FileSampleReader<T> {
    pub fn new(mut inner: T, sampling_rate: u32, channels: u8, width: SampleWidth) -> Result<Self, SourceError> {
        let data_start = inner.stream_position()?;
        Ok(Self {
            inner,
            sampling_rate,
            channels,
            width,
            data_start,
            scratch: Vec::new(),
        })
    }
}

impl<T: Read + Seek> SampleReader for FileSampleReader<T> {
    fn sampling_rate(&self) -> u32 {
        self.sampling_rate
    }

    fn channels(&self) -> u8 {
        self.channels
    }

    fn sample_width(&self) -> SampleWidth {
        self.width
    }

    fn read_samples(&mut self, buf: &mut [f32]) -> Result<usize, SourceError> {
        let width = self.width.bytes();
        self.scratch.resize(buf.len() * width, 0);
        let mut filled = 0usize;
        while filled < self.scratch.len() {
            let n = self.inner.read(&mut self.scratch[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        let samples_read = filled / width;
        for (i, chunk) in self.scratch[..samples_read * width].chunks_exact(width).enumerate() {
            buf[i] = decode_sample_normalized(chunk, self.width);
        }
        Ok(samples_read)
    }
}

impl<T: Read + Seek> Rewind for FileSampleReader<T> {
    fn rewind(&mut self) -> Result<(), SourceError> {
        self.inner.seek(SeekFrom::Start(self.data_start))?;
        Ok(())
    }
}
