//! The stream tokenizer: a bounded-memory online state machine turning a
//! sequence of `(frame, valid?)` pairs into emitted events.

mod drive;
mod engine;
mod event;
mod format;
mod state;

pub use drive::{tokenize_collect, tokenize_streaming};
pub use event::Event;
pub use format::{format_event_line, TimestampFormat};

use crate::error::ConfigError;

/// Sentinel meaning "no upper bound" for the `usize`-valued config fields
/// that accept one (`max_length`, `max_continuous_silence`,
/// `init_max_silence`).
pub const UNBOUNDED: usize = usize::MAX;

/// Behavior switches. Implemented as a small hand-rolled bitmask rather than
/// pulling in the `bitflags` crate: two flags do not justify the dependency,
/// and nothing else in this codebase's dependency tree reaches for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Mode(u8);

impl Mode {
    /// A short event must be discarded outright when it falls below
    /// `min_length`, even when the tail-of-a-long-event exemption would
    /// otherwise rescue it.
    pub const STRICT_MIN_LENGTH: Mode = Mode(0b01);
    /// When closing an event, drop any tolerated trailing non-valid frames
    /// instead of keeping up to `max_continuous_silence` of them.
    pub const DROP_TRAILING_SILENCE: Mode = Mode(0b10);

    const ALL_BITS: u8 = Self::STRICT_MIN_LENGTH.0 | Self::DROP_TRAILING_SILENCE.0;

    pub const fn empty() -> Self {
        Mode(0)
    }

    pub fn from_bits(bits: u8) -> Result<Self, ConfigError> {
        if bits & !Self::ALL_BITS != 0 {
            return Err(ConfigError::UnknownModeBits(bits));
        }
        Ok(Mode(bits))
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, flag: Mode) -> bool {
        self.0 & flag.0 == flag.0
    }

    pub fn with(self, flag: Mode) -> Self {
        Mode(self.0 | flag.0)
    }
}

impl std::ops::BitOr for Mode {
    type Output = Mode;
    fn bitor(self, rhs: Mode) -> Mode {
        self.with(rhs)
    }
}

/// Immutable configuration for one tokenization run. Validated once, at
/// construction, via [`TokenizerConfig::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenizerConfig {
    pub min_length: usize,
    pub max_length: usize,
    pub max_continuous_silence: usize,
    pub init_min: usize,
    pub init_max_silence: usize,
    pub mode: Mode,
}

impl TokenizerConfig {
    pub fn new(
        min_length: usize,
        max_length: usize,
        max_continuous_silence: usize,
        init_min: usize,
        init_max_silence: usize,
        mode: Mode,
    ) -> Result<Self, ConfigError> {
        let cfg = Self {
            min_length,
            max_length,
            max_continuous_silence,
            init_min,
            init_max_silence,
            mode,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.min_length == 0 {
            return Err(ConfigError::MinLengthZero(0));
        }
        if self.max_length < self.min_length {
            return Err(ConfigError::MaxLengthBelowMin {
                max: self.max_length,
                min: self.min_length,
            });
        }
        Ok(())
    }
}

pub use engine::StreamTokenizer;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_min_length() {
        assert_eq!(
            TokenizerConfig::new(0, 10, 0, 1, 0, Mode::empty()).unwrap_err(),
            ConfigError::MinLengthZero(0)
        );
    }

    #[test]
    fn rejects_max_length_below_min_length() {
        assert_eq!(
            TokenizerConfig::new(10, 5, 0, 1, 0, Mode::empty()).unwrap_err(),
            ConfigError::MaxLengthBelowMin { max: 5, min: 10 }
        );
    }

    #[test]
    fn mode_from_bits_rejects_unknown_bits() {
        assert_eq!(Mode::from_bits(0b100).unwrap_err(), ConfigError::UnknownModeBits(0b100));
    }

    #[test]
    fn mode_combines_with_bitor() {
        let mode = Mode::STRICT_MIN_LENGTH | Mode::DROP_TRAILING_SILENCE;
        assert!(mode.contains(Mode::STRICT_MIN_LENGTH));
        assert!(mode.contains(Mode::DROP_TRAILING_SILENCE));
    }
}
