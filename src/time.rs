//! FILETIME conversion.
//!
//! The driver speaks Windows FILETIME: 100-nanosecond ticks since
//! 1601-01-01 UTC, split into low and high 32-bit halves. The backend
//! speaks [`SystemTime`]. The all-zero FILETIME is a sentinel meaning
//! "no time" and maps to `None` rather than to any real instant.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Ticks between 1601-01-01 and the Unix epoch.
const UNIX_EPOCH_TICKS: u64 = 116_444_736_000_000_000;
const TICKS_PER_SEC: u64 = 10_000_000;
const NANOS_PER_TICK: u32 = 100;

/// A FILETIME in the driver's split representation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct FileTime {
    pub low: u32,
    pub high: u32,
}

impl FileTime {
    /// The "no time" sentinel.
    pub const ZERO: FileTime = FileTime { low: 0, high: 0 };

    pub fn from_ticks(ticks: u64) -> Self {
        Self { low: ticks as u32, high: (ticks >> 32) as u32 }
    }

    pub fn ticks(self) -> u64 {
        (u64::from(self.high) << 32) | u64::from(self.low)
    }

    pub fn is_zero(self) -> bool {
        self.low == 0 && self.high == 0
    }
}

/// FILETIME to wall-clock time; the zero sentinel becomes `None`.
///
/// Instants before 1970 are representable and convert exactly; an
/// instant the platform clock cannot express collapses to `None`.
pub fn filetime_to_system(ft: FileTime) -> Option<SystemTime> {
    if ft.is_zero() {
        return None;
    }
    let ticks = ft.ticks();
    if ticks >= UNIX_EPOCH_TICKS {
        Some(UNIX_EPOCH + tick_duration(ticks - UNIX_EPOCH_TICKS))
    } else {
        UNIX_EPOCH.checked_sub(tick_duration(UNIX_EPOCH_TICKS - ticks))
    }
}

/// Wall-clock time to FILETIME; `None` becomes the zero sentinel.
///
/// Sub-tick nanoseconds truncate, so the round trip is exact to 100 ns.
pub fn system_to_filetime(time: Option<SystemTime>) -> FileTime {
    let Some(time) = time else {
        return FileTime::ZERO;
    };
    let ticks = match time.duration_since(UNIX_EPOCH) {
        Ok(after) => UNIX_EPOCH_TICKS.saturating_add(duration_ticks(after)),
        Err(before) => UNIX_EPOCH_TICKS.saturating_sub(duration_ticks(before.duration())),
    };
    FileTime::from_ticks(ticks)
}

fn tick_duration(ticks: u64) -> Duration {
    Duration::new(ticks / TICKS_PER_SEC, (ticks % TICKS_PER_SEC) as u32 * NANOS_PER_TICK)
}

fn duration_ticks(d: Duration) -> u64 {
    d.as_secs() * TICKS_PER_SEC + u64::from(d.subsec_nanos() / NANOS_PER_TICK)
}
