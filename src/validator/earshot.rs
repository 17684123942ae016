//! Alternate validator backend using a small third-party voice-activity
//! model instead of energy thresholding, behind the `earshot-vad` feature.
//! Grounded on the teacher's `vad_earshot.rs` adapter.

use earshot::{VoiceActivityDetector, VoiceActivityProfile};

use crate::frame::PcmFrame;

use super::{Validator, ValidatorOutcome};

/// Frame size `earshot` expects, in samples, at 16kHz: 10/20/30ms frames.
const FRAME_SAMPLES_16K: usize = 320; // 20ms @ 16kHz

pub struct EarshotValidator {
    detector: VoiceActivityDetector,
    scratch: Vec<i16>,
}

impl EarshotValidator {
    pub fn new(profile: VoiceActivityProfile) -> Self {
        Self {
            detector: VoiceActivityDetector::new(profile),
            scratch: Vec::with_capacity(FRAME_SAMPLES_16K),
        }
    }
}

impl Validator<PcmFrame> for EarshotValidator {
    fn is_valid(&mut self, frame: &PcmFrame) -> ValidatorOutcome {
        if frame.meta.sampling_rate != 16_000 {
            return ValidatorOutcome::Failed(format!(
                "earshot validator requires 16kHz input, got {}Hz",
                frame.meta.sampling_rate
            ));
        }

        self.scratch.clear();
        self.scratch
            .extend(frame.samples.iter().map(|&s| (s.clamp(-1.0, 1.0) * 32_768.0) as i16));
        self.scratch.resize(FRAME_SAMPLES_16K, 0);

        match self.detector.predict_16khz(&self.scratch) {
            Ok(true) => ValidatorOutcome::Valid,
            Ok(false) => ValidatorOutcome::Invalid,
            Err(e) => ValidatorOutcome::Failed(format!("{e:?}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{AudioMeta, SampleWidth};

    #[test]
    fn rejects_frames_at_the_wrong_sample_rate() {
        let mut validator = EarshotValidator::new(VoiceActivityProfile::LBR);
        let frame = PcmFrame::new(
            vec![0.0; 320],
            AudioMeta { sampling_rate: 8_000, channels: 1, sample_width: SampleWidth::Sixteen },
        );
        assert!(matches!(validator.is_valid(&frame), ValidatorOutcome::Failed(_)));
    }
}
