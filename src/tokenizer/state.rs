/// Where the tokenizer is with respect to the current candidate event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Status {
    /// No event in progress.
    Idle,
    /// A candidate has started but has not yet accumulated `init_min`
    /// valid frames under the `init_max_silence` constraint.
    PossibleStart,
    /// The candidate is confirmed; it is now governed by
    /// `max_continuous_silence` and `max_length`.
    PossibleEnd,
}

/// The in-progress candidate event, reset on every close/abort.
pub(super) struct Candidate<F> {
    pub(super) frames: Vec<F>,
    pub(super) start_index: usize,
    pub(super) last_valid_index: usize,
    pub(super) trailing_silence: usize,
    pub(super) valid_count_since_start: usize,
}

impl<F> Candidate<F> {
    pub(super) fn empty() -> Self {
        Self {
            frames: Vec::new(),
            start_index: 0,
            last_valid_index: 0,
            trailing_silence: 0,
            valid_count_since_start: 0,
        }
    }
}
