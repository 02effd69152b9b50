//! `ClockPort`: diagnostic-only timing. Nothing reachable from this module is
//! permitted to feed a decision — only incident timestamps and log lines may
//! consult it.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// The `ClockPort` consumed interface (spec.md §6): wall-clock reads for
/// audit garnish only.
pub trait ClockPort: Send + Sync {
    fn now_ms(&self) -> u64;
    fn now_iso(&self) -> String;
}

/// Real wall clock, used by hosts embedding the trust engine outside of tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl ClockPort for SystemClock {
    fn now_ms(&self) -> u64 {
        unix_now()
    }

    fn now_iso(&self) -> String {
        let ms = self.now_ms();
        format!("1970-01-01T00:00:00.000Z+{ms}ms")
    }
}

/// Deterministic clock for tests: caller drives `set`/`advance` explicitly so
/// golden outputs stay byte-identical across runs.
#[derive(Default)]
pub struct FixedClock {
    millis: std::sync::atomic::AtomicU64,
}

impl FixedClock {
    pub fn new(millis: u64) -> Self {
        Self { millis: std::sync::atomic::AtomicU64::new(millis) }
    }

    pub fn advance(&self, delta_ms: u64) {
        self.millis.fetch_add(delta_ms, std::sync::atomic::Ordering::SeqCst);
    }
}

impl ClockPort for FixedClock {
    fn now_ms(&self) -> u64 {
        self.millis.load(std::sync::atomic::Ordering::SeqCst)
    }

    fn now_iso(&self) -> String {
        format!("1970-01-01T00:00:00.000Z+{}ms", self.now_ms())
    }
}

/// Returns the number of milliseconds since UNIX EPOCH. Diagnostic only.
#[inline]
pub fn unix_now() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).expect("system clock before epoch").as_millis() as u64
}

/// Reports on drop if the timed operation passed the threshold `TR` in
/// milliseconds. Pure diagnostics; never consulted by a decision.
pub struct Stopwatch<const TR: u64 = 1000> {
    name: &'static str,
    start: Instant,
}

impl Stopwatch {
    pub fn new(name: &'static str) -> Self {
        Self { name, start: Instant::now() }
    }
}

impl<const TR: u64> Stopwatch<TR> {
    pub fn with_threshold(name: &'static str) -> Self {
        Self { name, start: Instant::now() }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl<const TR: u64> Drop for Stopwatch<TR> {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        if elapsed > Duration::from_millis(TR) {
            trust_core::log::trace!("[{}] abnormal time: {:#?}", self.name, elapsed);
        }
    }
}
