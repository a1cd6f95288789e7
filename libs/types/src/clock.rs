//! Wall-clock timestamps as Unix nanos

use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time in Unix nanoseconds.
///
/// Saturates to 0 for clocks before the epoch rather than failing; the
/// venue only orders events that it stamped itself.
pub fn unix_nanos() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as i64)
        .unwrap_or(0)
}
