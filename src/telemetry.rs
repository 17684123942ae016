//! Structured logging bootstrap for the `tokenize_bench` binary.
//!
//! The library itself never installs a subscriber — it only emits `tracing`
//! events (see `tokenizer::engine`) — so embedding applications choose their
//! own sink. This module is the bin-layer init, grounded on the teacher's
//! own `telemetry.rs`, trimmed of its file-path/TUI-specific concerns.

use std::env;
use std::sync::OnceLock;

use tracing_subscriber::fmt::time::UtcTime;

static TRACING_INIT: OnceLock<()> = OnceLock::new();

/// Initializes a JSON `tracing` subscriber writing to stderr, gated on
/// `AAD_TRACE=1`. Safe to call more than once; only the first call takes
/// effect.
pub fn init_tracing() {
    if env::var("AAD_TRACE").as_deref() != Ok("1") {
        return;
    }
    TRACING_INIT.get_or_init(|| {
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_timer(UtcTime::rfc_3339())
            .with_writer(std::io::stderr)
            .with_current_span(false)
            .with_span_list(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}
