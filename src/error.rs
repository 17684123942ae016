//! Centralized error types for the tokenizer core.
//!
//! Each module boundary that can fail owns a small `thiserror` enum; this
//! module aggregates them into one top-level error a driver can match on.

use thiserror::Error;

/// Raised when a [`crate::tokenizer::TokenizerConfig`] or
/// [`crate::source::FramerConfig`] violates one of its documented
/// constraints. Always surfaced synchronously at construction.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("min_length must be >= 1, got {0}")]
    MinLengthZero(usize),

    #[error("max_length ({max}) must be >= min_length ({min})")]
    MaxLengthBelowMin { max: usize, min: usize },

    #[error("unknown mode bits: {0:#04x}")]
    UnknownModeBits(u8),

    #[error("block_size must be > 0")]
    BlockSizeZero,

    #[error("hop_size must be > 0")]
    HopSizeZero,

    #[error("hop_size ({hop}) must be <= block_size ({block})")]
    HopExceedsBlock { hop: usize, block: usize },
}

/// Raised by a [`crate::source::FrameSource`] implementation.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O failure reading frame source: {0}")]
    Io(#[from] std::io::Error),

    #[error("rewind is not supported by this source")]
    RewindUnsupported,

    #[error("device capture error: {0}")]
    Device(String),
}

/// Raised by a [`crate::validator::Validator`] that reports
/// [`crate::validator::ValidatorOutcome::Failed`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("validator failed: {0}")]
pub struct ValidatorError(pub String);

/// Error returned by the top-level driver functions
/// ([`crate::tokenizer::tokenize_collect`], [`crate::tokenizer::tokenize_streaming`]).
#[derive(Debug, Error)]
pub enum TokenizeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("frame source failed: {0}")]
    Source(#[from] SourceError),

    #[error("validator failed: {0}")]
    Validator(#[from] ValidatorError),
}
