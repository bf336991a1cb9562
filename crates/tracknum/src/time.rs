use std::time::{SystemTime, UNIX_EPOCH};

/// A source of wall-clock timestamps in milliseconds since the Unix epoch.
///
/// This abstraction exists so request creation times can be pinned in tests.
///
/// # Example
///
/// ```
/// use tracknum::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// assert_eq!(FixedTime.current_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since the Unix epoch.
    fn current_millis(&self) -> u64;
}

/// The system wall clock.
///
/// Request timestamps are informational (they appear on receipts), so plain
/// `SystemTime` is sufficient; no monotonicity is required of them.
#[derive(Debug, Default, Clone, Copy)]
pub struct WallClock;

impl TimeSource for WallClock {
    fn current_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}
