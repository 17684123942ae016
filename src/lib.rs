//! Streaming activity tokenizer: turns a sequence of fixed-duration frames
//! into contiguous events bounded by configurable duration and
//! silence-tolerance rules.

pub mod error;
pub mod frame;
pub mod source;
pub mod telemetry;
pub mod tokenizer;
pub mod validator;

pub use error::{ConfigError, SourceError, TokenizeError, ValidatorError};
pub use frame::{AudioMeta, PcmFrame, SampleWidth};
pub use tokenizer::{
    format_event_line, tokenize_collect, tokenize_streaming, Event, Mode, StreamTokenizer, TimestampFormat,
    TokenizerConfig,
};
pub use validator::{ChannelReduction, EnergyValidator, Validator, ValidatorOutcome};
