use std::sync::LazyLock;
use std::time::Instant;

static ENGINE_START: LazyLock<Instant> = LazyLock::new(Instant::now);

/// Milliseconds elapsed since the engine clock was first read. Monotonic;
/// only ever compared between the two hands' release timestamps.
///
/// Never returns 0: a fresh hand's last-release timestamp stays 0 until its
/// first real release, and a live timestamp must not tie with it.
#[inline(always)]
pub fn now_ms() -> u64 {
    ENGINE_START.elapsed().as_millis() as u64 + 1
}
