//! Pure formatting helpers for the optional human-readable per-event summary
//! line. No I/O: a collaborator (a CLI, a log writer) decides where the
//! resulting string goes.

use super::Event;

/// Which timestamp rendering [`format_event_line`] should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampFormat {
    /// `%S`: seconds as a float, millisecond precision. Default.
    SecondsFloat,
    /// `%h:%m:%s.%i`.
    Hms,
}

impl Default for TimestampFormat {
    fn default() -> Self {
        TimestampFormat::SecondsFloat
    }
}

fn index_to_seconds(index: usize, sampling_rate: u32) -> f64 {
    index as f64 / sampling_rate.max(1) as f64
}

fn render(total_seconds: f64, format: TimestampFormat) -> String {
    match format {
        TimestampFormat::SecondsFloat => format!("{total_seconds:.3}"),
        TimestampFormat::Hms => {
            let millis = (total_seconds * 1000.0).round() as u64;
            let h = millis / 3_600_000;
            let m = (millis / 60_000) % 60;
            let s = (millis / 1_000) % 60;
            let i = millis % 1_000;
            format!("{h:02}:{m:02}:{s:02}.{i:03}")
        }
    }
}

/// Renders one summary line for an emitted event: its 1-based `id` and its
/// start/end, both converted from frame index to seconds via `sampling_rate`
/// and rendered per `format`.
pub fn format_event_line<F>(id: usize, event: &Event<F>, sampling_rate: u32, format: TimestampFormat) -> String {
    let start = render(index_to_seconds(event.start, sampling_rate), format);
    let end = render(index_to_seconds(event.end, sampling_rate), format);
    format!("{id} {start} {end}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(start: usize, end: usize) -> Event<()> {
        Event { frames: vec![(); end - start + 1], start, end }
    }

    #[test]
    fn default_format_renders_seconds_as_a_float() {
        let line = format_event_line(1, &event(16_000, 32_000), 16_000, TimestampFormat::SecondsFloat);
        assert_eq!(line, "1 1.000 2.000");
    }

    #[test]
    fn hms_format_renders_hours_minutes_seconds_millis() {
        // 3661.5s = 1h 1m 1.5s
        let line = format_event_line(3, &event(0, 58_584_000), 16_000, TimestampFormat::Hms);
        assert_eq!(line, "3 00:00:00.000 01:01:01.500");
    }
}
