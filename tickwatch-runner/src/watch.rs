//! The poll-compute-render loop.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use tickwatch_core::data::BarSource;

use crate::config::WatchConfig;
use crate::cycle::run_cycle;
use crate::render::render_cycle;

const SLEEP_SLICE: Duration = Duration::from_millis(100);

/// Sleep for `duration`, waking early once `cancel` is set.
///
/// Returns `true` if the full duration elapsed.
pub fn sleep_interruptible(duration: Duration, cancel: &AtomicBool) -> bool {
    let deadline = Instant::now() + duration;
    loop {
        if cancel.load(Ordering::Relaxed) {
            return false;
        }
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        thread::sleep(SLEEP_SLICE.min(deadline - now));
    }
}

/// Run cycles until `cancel` is set or `max_cycles` cycles have been rendered.
///
/// Each cycle is rendered to `sink` as one block. Returns the number of
/// cycles run; only errors writing to `sink` end the loop early.
pub fn watch<W: Write>(
    source: &dyn BarSource,
    config: &WatchConfig,
    sink: &mut W,
    cancel: &AtomicBool,
    max_cycles: Option<usize>,
) -> io::Result<usize> {
    let refresh = Duration::from_secs(config.refresh_secs);
    let mut cycles = 0usize;

    info!(
        symbols = config.symbols.len(),
        interval = %config.interval,
        refresh_secs = config.refresh_secs,
        source = source.name(),
        "watch started"
    );

    while !cancel.load(Ordering::Relaxed) {
        if source.is_available() {
            let started = Instant::now();
            let cycle = run_cycle(source, config);
            writeln!(sink, "{}", render_cycle(&cycle, &config.volatility_symbol))?;
            sink.flush()?;
            info!(
                cycle = cycles + 1,
                ok = cycle.succeeded(),
                failed = cycle.failed(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "cycle complete"
            );
        } else {
            warn!(source = source.name(), "source unavailable, skipping cycle");
            writeln!(sink, "{} unavailable, skipping cycle", source.name())?;
        }
        cycles += 1;

        if max_cycles.is_some_and(|max| cycles >= max) {
            break;
        }
        if !sleep_interruptible(refresh, cancel) {
            break;
        }
    }

    info!(cycles, "watch stopped");
    Ok(cycles)
}
