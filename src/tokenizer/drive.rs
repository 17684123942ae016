use crate::error::TokenizeError;
use crate::source::FrameSource;
use crate::validator::{Validator, ValidatorOutcome};

use super::engine::StreamTokenizer;
use super::event::Event;
use super::TokenizerConfig;

/// Pulls frames from `source`, validates each with `validator`, and returns
/// every emitted event as a buffered list once the source is exhausted.
///
/// On a source I/O failure or a validator failure, the tokenizer is flushed
/// (so the returned error still carries whatever events closed cleanly
/// before the failure) and the failure is then propagated.
pub fn tokenize_collect<S, V>(
    source: &mut S,
    validator: &mut V,
    config: TokenizerConfig,
) -> Result<Vec<Event<S::Frame>>, TokenizeError>
where
    S: FrameSource,
    S::Frame: Clone,
    V: Validator<S::Frame>,
{
    let mut events = Vec::new();
    let result = run(source, validator, config, |ev| events.push(ev));
    result.map(|()| events)
}

/// Same driver loop as [`tokenize_collect`], but events are delivered
/// synchronously to `on_event` the moment they close, instead of being
/// buffered. `on_event` must not itself call back into the source.
pub fn tokenize_streaming<S, V, C>(
    source: &mut S,
    validator: &mut V,
    config: TokenizerConfig,
    on_event: C,
) -> Result<(), TokenizeError>
where
    S: FrameSource,
    S::Frame: Clone,
    V: Validator<S::Frame>,
    C: FnMut(Event<S::Frame>),
{
    run(source, validator, config, on_event)
}

fn run<S, V>(
    source: &mut S,
    validator: &mut V,
    config: TokenizerConfig,
    mut on_event: impl FnMut(Event<S::Frame>),
) -> Result<(), TokenizeError>
where
    S: FrameSource,
    S::Frame: Clone,
    V: Validator<S::Frame>,
{
    let mut tokenizer = StreamTokenizer::new(config);
    let mut index = 0usize;

    loop {
        let frame = match source.read() {
            Ok(Some(frame)) => frame,
            Ok(None) => break,
            Err(err) => {
                tokenizer.flush(&mut on_event);
                return Err(TokenizeError::Source(err));
            }
        };

        match validator.is_valid(&frame) {
            ValidatorOutcome::Valid => {
                tokenizer.process(frame, index, true, &mut on_event);
            }
            ValidatorOutcome::Invalid => {
                tokenizer.process(frame, index, false, &mut on_event);
            }
            ValidatorOutcome::Failed(reason) => {
                tokenizer.process(frame, index, false, &mut on_event);
                tokenizer.flush(&mut on_event);
                return Err(TokenizeError::Validator(crate::error::ValidatorError(reason)));
            }
        }
        index += 1;
    }

    tokenizer.flush(&mut on_event);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{BufferSampleReader, Framer, FramerConfig};
    use crate::tokenizer::Mode;
    use crate::validator::{ChannelReduction, EnergyValidator};

    #[test]
    fn tokenize_collect_runs_the_energy_validator_over_a_buffer_source() {
        let mut silence = vec![0.0f32; 160 * 3];
        silence.extend(vec![0.9f32; 160 * 4]);
        silence.extend(vec![0.0f32; 160 * 3]);

        let reader = BufferSampleReader::new(silence, 16_000, 1);
        let mut framer = Framer::new(reader, FramerConfig::non_overlapping(160).unwrap());
        let mut validator = EnergyValidator::new(-30.0, ChannelReduction::Mix);
        let config = TokenizerConfig::new(1, usize::MAX, 0, 1, 0, Mode::empty()).unwrap();

        let events = tokenize_collect(&mut framer, &mut validator, config).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].start, 3);
        assert_eq!(events[0].end, 6);
    }

    #[test]
    fn tokenize_streaming_delivers_events_in_order_via_callback() {
        let mut silence = vec![0.0f32; 160 * 2];
        silence.extend(vec![0.9f32; 160 * 2]);
        silence.extend(vec![0.0f32; 160 * 2]);
        silence.extend(vec![0.9f32; 160 * 2]);

        let reader = BufferSampleReader::new(silence, 16_000, 1);
        let mut framer = Framer::new(reader, FramerConfig::non_overlapping(160).unwrap());
        let mut validator = EnergyValidator::new(-30.0, ChannelReduction::Mix);
        let config = TokenizerConfig::new(1, usize::MAX, 0, 1, 0, Mode::empty()).unwrap();

        let mut starts = Vec::new();
        tokenize_streaming(&mut framer, &mut validator, config, |ev| starts.push(ev.start)).unwrap();
        assert_eq!(starts, vec![2, 6]);
    }
}
