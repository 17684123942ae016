use super::event::Event;
use super::state::{Candidate, Status};
use super::{Mode, TokenizerConfig};

/// The state machine at the center of this crate. Consumes one
/// `(frame, index, valid)` triple at a time via [`StreamTokenizer::process`]
/// and may emit zero or one [`Event`] per call; [`StreamTokenizer::flush`]
/// closes out whatever is in progress at end-of-stream.
///
/// Grounded on the teacher's `CaptureState::on_frame` (a small `match`
/// returning an optional terminal outcome) and `sakai-toyo-dictara`'s
/// `SmoothedVad` onset/hangover counters, generalized from a fixed
/// speech/silence policy to the configurable duration/silence-tolerance
/// rules this tokenizer implements.
pub struct StreamTokenizer<F> {
    config: TokenizerConfig,
    status: Status,
    candidate: Candidate<F>,
    last_emitted_end: Option<usize>,
    last_emission_was_max_length_forced: bool,
}

impl<F: Clone> StreamTokenizer<F> {
    pub fn new(config: TokenizerConfig) -> Self {
        Self {
            config,
            status: Status::Idle,
            candidate: Candidate::empty(),
            last_emitted_end: None,
            last_emission_was_max_length_forced: false,
        }
    }

    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    /// Feeds one frame at stream position `index` with the validator's
    /// verdict `valid`, invoking `on_event` synchronously if this frame
    /// closes out an event.
    pub fn process(&mut self, frame: F, index: usize, valid: bool, mut on_event: impl FnMut(Event<F>)) {
        match self.status {
            Status::Idle => {
                if !valid {
                    return;
                }
                self.start_candidate(frame, index);
                if self.candidate.valid_count_since_start >= self.config.init_min {
                    self.status = Status::PossibleEnd;
                    tracing::trace!(index, "candidate confirmed immediately");
                } else {
                    self.status = Status::PossibleStart;
                    tracing::trace!(index, "candidate opened");
                }
            }
            Status::PossibleStart => {
                if valid {
                    self.candidate.frames.push(frame);
                    self.candidate.last_valid_index = index;
                    self.candidate.trailing_silence = 0;
                    self.candidate.valid_count_since_start += 1;
                    if self.candidate.valid_count_since_start >= self.config.init_min {
                        self.status = Status::PossibleEnd;
                        tracing::trace!(index, "candidate confirmed");
                    }
                } else {
                    self.candidate.frames.push(frame);
                    self.candidate.trailing_silence += 1;
                    if self.candidate.trailing_silence > self.config.init_max_silence {
                        tracing::trace!(index, "candidate aborted during confirmation");
                        self.reset_to_idle();
                        return;
                    }
                }
            }
            Status::PossibleEnd => {
                if valid {
                    self.candidate.frames.push(frame);
                    self.candidate.last_valid_index = index;
                    self.candidate.trailing_silence = 0;
                } else {
                    self.candidate.frames.push(frame);
                    self.candidate.trailing_silence += 1;
                    if self.candidate.trailing_silence > self.config.max_continuous_silence {
                        self.close(false, &mut on_event);
                        return;
                    }
                }
            }
        }

        self.apply_length_cap(&mut on_event);
    }

    /// Closes whatever candidate is in progress at end-of-stream. Uses the
    /// same closing rule as a silence overflow; a `PossibleStart` candidate
    /// that never reached `init_min` is discarded, like an abort. Idempotent:
    /// calling `flush` with no status change in between emits nothing twice.
    pub fn flush(&mut self, mut on_event: impl FnMut(Event<F>)) {
        match self.status {
            Status::Idle => {}
            Status::PossibleStart => self.reset_to_idle(),
            Status::PossibleEnd => self.close(false, &mut on_event),
        }
    }

    fn start_candidate(&mut self, frame: F, index: usize) {
        self.candidate = Candidate {
            frames: vec![frame],
            start_index: index,
            last_valid_index: index,
            trailing_silence: 0,
            valid_count_since_start: 1,
        };
    }

    fn reset_to_idle(&mut self) {
        self.candidate = Candidate::empty();
        self.status = Status::Idle;
    }

    fn apply_length_cap(&mut self, on_event: &mut impl FnMut(Event<F>)) {
        if self.candidate.frames.len() != self.config.max_length {
            return;
        }
        match self.status {
            Status::PossibleStart => {
                tracing::trace!("candidate abandoned: hit max_length before confirmation");
                self.reset_to_idle();
            }
            Status::PossibleEnd => self.close(true, on_event),
            Status::Idle => {}
        }
    }

    /// Runs the emission rule (SPEC_FULL §4.3) and transitions to `Idle`.
    fn close(&mut self, forced_by_max_length: bool, on_event: &mut impl FnMut(Event<F>)) {
        let n = self.candidate.frames.len();
        let (emit_len, end_index) = if forced_by_max_length {
            (n, self.candidate.start_index + n - 1)
        } else if self.config.mode.contains(Mode::DROP_TRAILING_SILENCE) {
            let keep = self.candidate.last_valid_index - self.candidate.start_index + 1;
            (keep, self.candidate.last_valid_index)
        } else {
            let overflow = self
                .candidate
                .trailing_silence
                .saturating_sub(self.config.max_continuous_silence);
            let keep = n.saturating_sub(overflow);
            (keep, self.candidate.start_index + keep - 1)
        };

        let length = emit_len;
        let emit = if length >= self.config.min_length {
            true
        } else if self.config.mode.contains(Mode::STRICT_MIN_LENGTH) {
            false
        } else {
            !forced_by_max_length
                && self.last_emission_was_max_length_forced
                && self.last_emitted_end == self.candidate.start_index.checked_sub(1)
        };

        if emit {
            let frames: Vec<F> = self.candidate.frames[..emit_len].to_vec();
            tracing::debug!(start = self.candidate.start_index, end = end_index, "event emitted");
            on_event(Event { frames, start: self.candidate.start_index, end: end_index });
            self.last_emitted_end = Some(end_index);
            self.last_emission_was_max_length_forced = forced_by_max_length;
        } else {
            tracing::trace!(start = self.candidate.start_index, "closure discarded below min_length");
        }

        self.reset_to_idle();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(events_str: &str, config: TokenizerConfig) -> Vec<(String, usize, usize)> {
        let mut tok = StreamTokenizer::new(config);
        let mut events = Vec::new();
        for (i, c) in events_str.chars().enumerate() {
            let valid = c.is_ascii_uppercase();
            tok.process(c, i, valid, |ev| {
                events.push((ev.frames.iter().collect::<String>(), ev.start, ev.end));
            });
        }
        tok.flush(|ev| events.push((ev.frames.iter().collect::<String>(), ev.start, ev.end)));
        events
    }

    #[test]
    fn s1_basic_overflow_with_zero_tolerance() {
        let config = TokenizerConfig::new(1, 9999, 0, 1, 0, Mode::empty()).unwrap();
        let events = run("aaaABCDEFbbGHIJKccc", config);
        assert_eq!(
            events,
            vec![
                ("ABCDEF".to_string(), 3, 8),
                ("GHIJK".to_string(), 11, 15),
            ]
        );
    }

    #[test]
    fn s2_tolerates_trailing_silence_up_to_the_cap() {
        let config = TokenizerConfig::new(1, 9999, 2, 1, 0, Mode::empty()).unwrap();
        let events = run("aaaABCDbbEFcGHIdddJKee", config);
        assert_eq!(events.len(), 2);
        assert_eq!((events[0].1, events[0].2), (3, 16));
        assert_eq!((events[1].1, events[1].2), (18, 21));
        assert_eq!(events[0].0, "ABCDbbEFcGHIdd");
        assert_eq!(events[1].0, "JKee");
    }

    #[test]
    fn s3_drop_trailing_silence_trims_to_last_valid_frame() {
        let config =
            TokenizerConfig::new(1, 9999, 2, 1, 0, Mode::DROP_TRAILING_SILENCE).unwrap();
        let events = run("aaaABCDbbEFcGHIdddJKee", config);
        assert_eq!(events, vec![("ABCDbbEFcGHI".to_string(), 3, 14), ("JK".to_string(), 18, 19)]);
    }

    #[test]
    fn s4_length_cap_forces_splits_via_streaming_callback() {
        let config = TokenizerConfig::new(1, 5, 0, 1, 0, Mode::empty()).unwrap();
        let events = run("aaaABCDEFGHIJKbbb", config);
        assert_eq!(
            events,
            vec![
                ("ABCDE".to_string(), 3, 7),
                ("FGHIJ".to_string(), 8, 12),
                ("K".to_string(), 13, 13),
            ]
        );
    }

    #[test]
    fn s5_brief_noise_is_rejected_during_confirmation() {
        let config = TokenizerConfig::new(20, usize::MAX, usize::MAX, 3, 1, Mode::empty()).unwrap();
        // Leading silence, one isolated noise frame, two silence frames
        // (exceeds init_max_silence=1 so the candidate aborts), then a long
        // valid run that confirms cleanly.
        let input: String = "ooAooo".to_string() + &"A".repeat(25);
        let events = run(&input, config);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].1, 6); // first frame of the long run
    }

    #[test]
    fn s6_alternating_valid_invalid_merges_into_one_event_when_unbounded() {
        let config = TokenizerConfig::new(1, usize::MAX, 1, 1, 1, Mode::empty()).unwrap();
        let events = run("AoAoA", config);
        assert_eq!(events, vec![("AoAoA".to_string(), 0, 4)]);
    }

    #[test]
    fn s6_alternating_splits_when_max_length_forces_it() {
        let config = TokenizerConfig::new(1, 3, 1, 1, 1, Mode::empty()).unwrap();
        let events = run("AoAoA", config);
        assert_eq!(events, vec![("AoA".to_string(), 0, 2), ("A".to_string(), 4, 4)]);
    }

    #[test]
    fn flush_is_idempotent() {
        let config = TokenizerConfig::new(1, 9999, 0, 1, 0, Mode::empty()).unwrap();
        let mut tok = StreamTokenizer::new(config);
        let mut events = Vec::new();
        tok.process('A', 0, true, |ev| events.push(ev));
        tok.flush(|ev| events.push(ev));
        tok.flush(|ev| events.push(ev));
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn max_length_forced_tail_exemption_emits_short_continuation() {
        // max_length=3 forces a close at (0,2); the next candidate starts
        // immediately at index 3 and is cut short by silence before
        // reaching min_length=2, but since it continues the previous
        // max-length-forced emission it is rescued rather than discarded.
        let config = TokenizerConfig::new(2, 3, 0, 1, 0, Mode::empty()).unwrap();
        let events = run("AAAAo", config);
        assert_eq!(events, vec![("AAA".to_string(), 0, 2), ("A".to_string(), 3, 3)]);
    }

    #[test]
    fn strict_min_length_discards_the_tail_exemption_too() {
        let config =
            TokenizerConfig::new(2, 3, 0, 1, 0, Mode::STRICT_MIN_LENGTH).unwrap();
        let events = run("AAAAo", config);
        assert_eq!(events, vec![("AAA".to_string(), 0, 2)]);
    }
}
