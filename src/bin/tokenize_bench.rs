//! Benchmark/demo harness: synthesizes a speech/silence PCM pattern and
//! reports how many events the tokenizer detects and how long the run took.
//!
//! Grounded on the teacher's `bin/latency_measurement.rs` (clap-derived args,
//! `anyhow` for the bin-layer error path, a small summary struct printed at
//! the end).

use anyhow::{bail, Result};
use clap::Parser;
use std::time::Instant;

use aad_core::source::{BufferSampleReader, Framer, FramerConfig};
use aad_core::tokenizer::{tokenize_collect, Mode, TokenizerConfig};
use aad_core::validator::{ChannelReduction, EnergyValidator};

/// Run the activity tokenizer against a synthetic speech/silence pattern.
#[derive(Debug, Parser)]
#[command(about = "Benchmark the streaming activity tokenizer against synthetic PCM")]
struct Args {
    /// Speech segment duration, in milliseconds.
    #[arg(long, default_value_t = 400)]
    speech_ms: u64,

    /// Silence segment duration, in milliseconds.
    #[arg(long, default_value_t = 600)]
    silence_ms: u64,

    /// Number of speech/silence segment pairs to synthesize.
    #[arg(long, default_value_t = 20)]
    segments: usize,

    /// Sample rate of the synthetic stream.
    #[arg(long, default_value_t = 16_000)]
    sample_rate: u32,

    /// Analysis frame size, in milliseconds.
    #[arg(long, default_value_t = 20)]
    frame_ms: u64,

    /// Energy threshold, in dB.
    #[arg(long, default_value_t = -30.0)]
    threshold_db: f64,

    /// Maximum tolerated continuous silence inside an event, in frames.
    #[arg(long, default_value_t = 5)]
    max_continuous_silence: usize,

    /// Emit one JSON object per line (start/end/frame count) instead of the
    /// human-readable summary.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, serde::Serialize)]
struct BenchSummary {
    frames_scanned: usize,
    events_found: usize,
    elapsed_ms: u128,
}

#[derive(Debug, serde::Serialize)]
struct EventSummary {
    start: usize,
    end: usize,
    frames: usize,
}

fn main() -> Result<()> {
    aad_core::telemetry::init_tracing();
    let args = Args::parse();

    if args.segments == 0 {
        bail!("--segments must be >= 1");
    }

    let frame_secs = args.frame_ms as f64 / 1000.0;
    let framer_config = FramerConfig::non_overlapping_duration(args.sample_rate, frame_secs)?;
    let samples = synth_pattern(&args);
    let frames_scanned = samples.len() / framer_config.block_size;

    let reader = BufferSampleReader::new(samples, args.sample_rate, 1);
    let mut framer = Framer::new(reader, framer_config);
    let mut validator = EnergyValidator::new(args.threshold_db, ChannelReduction::Mix);
    let config = TokenizerConfig::new(1, usize::MAX, args.max_continuous_silence, 1, 0, Mode::empty())?;

    let start = Instant::now();
    let events = tokenize_collect(&mut framer, &mut validator, config)?;
    let elapsed_ms = start.elapsed().as_millis();

    let summary = BenchSummary {
        frames_scanned,
        events_found: events.len(),
        elapsed_ms,
    };

    if args.json {
        println!("{}", serde_json::to_string(&summary)?);
        for event in &events {
            let line = EventSummary { start: event.start, end: event.end, frames: event.len() };
            println!("{}", serde_json::to_string(&line)?);
        }
    } else {
        println!("{summary:#?}");
        for (i, event) in events.iter().enumerate() {
            println!("event[{i}] start={} end={} frames={}", event.start, event.end, event.len());
        }
    }

    Ok(())
}

fn synth_pattern(args: &Args) -> Vec<f32> {
    let speech_samples = ((args.sample_rate as u64 * args.speech_ms) / 1000) as usize;
    let silence_samples = ((args.sample_rate as u64 * args.silence_ms) / 1000) as usize;
    let mut samples = Vec::with_capacity((speech_samples + silence_samples) * args.segments);
    for _ in 0..args.segments {
        samples.extend(std::iter::repeat(0.8f32).take(speech_samples));
        samples.extend(std::iter::repeat(0.0f32).take(silence_samples));
    }
    samples
}
