use crate::frame::PcmFrame;

use super::{Validator, ValidatorOutcome};

/// How a multi-channel frame is reduced to the single scalar stream the
/// energy calculation operates on. Lives at the source/validator boundary,
/// not inside the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelReduction {
    /// Validate each channel independently; the frame is valid if *any*
    /// channel's reduced signal is valid. Emitted frames still carry every
    /// channel — only the verdict is OR-ed.
    None,
    /// Use a single channel, by index.
    Channel(u8),
    /// Arithmetic mean across channels per sample ("mix"/"avg").
    Mix,
}

/// The reference validator: `10 * log10(mean(x^2))` against a fixed
/// threshold. Grounded on the teacher's `SimpleThresholdVad`, generalized
/// from a hardcoded RMS-dB formula to the float-energy formula this
/// system's frames expect, with explicit multi-channel reduction.
#[derive(Debug, Clone)]
pub struct EnergyValidator {
    energy_threshold_db: f64,
    reduction: ChannelReduction,
    /// Floor added before `log10` to avoid `log10(0)` on pure silence.
    epsilon: f64,
}

const DEFAULT_EPSILON: f64 = 1e-10;

impl EnergyValidator {
    pub fn new(energy_threshold_db: f64, reduction: ChannelReduction) -> Self {
        Self {
            energy_threshold_db,
            reduction,
            epsilon: DEFAULT_EPSILON,
        }
    }

    /// Mean-square energy in dB for one reduced scalar channel.
    fn energy_db(samples: &[f32], epsilon: f64) -> f64 {
        if samples.is_empty() {
            return f64::NEG_INFINITY;
        }
        let mean_sq: f64 = samples.iter().map(|&s| f64::from(s) * f64::from(s)).sum::<f64>()
            / samples.len() as f64;
        10.0 * mean_sq.max(epsilon).log10()
    }

    fn reduced_channels(&self, frame: &PcmFrame) -> Vec<Vec<f32>> {
        let channels = frame.meta.channels.max(1) as usize;
        if channels == 1 {
            return vec![frame.samples.clone()];
        }
        match self.reduction {
            ChannelReduction::Channel(idx) => {
                let idx = idx as usize;
                vec![frame
                    .samples
                    .iter()
                    .skip(idx)
                    .step_by(channels)
                    .copied()
                    .collect()]
            }
            ChannelReduction::Mix => {
                let frame_len = frame.samples.len() / channels;
                let mut mixed = Vec::with_capacity(frame_len);
                for group in frame.samples.chunks_exact(channels) {
                    mixed.push(group.iter().sum::<f32>() / channels as f32);
                }
                vec![mixed]
            }
            ChannelReduction::None => (0..channels)
                .map(|idx| {
                    frame
                        .samples
                        .iter()
                        .skip(idx)
                        .step_by(channels)
                        .copied()
                        .collect()
                })
                .collect(),
        }
    }
}

impl Validator<PcmFrame> for EnergyValidator {
    fn is_valid(&mut self, frame: &PcmFrame) -> ValidatorOutcome {
        let any_valid = self
            .reduced_channels(frame)
            .iter()
            .any(|channel| Self::energy_db(channel, self.epsilon) >= self.energy_threshold_db);
        if any_valid {
            ValidatorOutcome::Valid
        } else {
            ValidatorOutcome::Invalid
        }
    }
}
