//! Turning wall time into scheduler time.

use std::time::Duration;

#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};

/// Longest stretch of wall time handed to a single `Scheduler::advance`
///
/// A host stalled for longer (suspended terminal, debugger) resumes where it
/// stopped instead of replaying every missed instruction at once.
pub const MAX_CATCH_UP: Duration = Duration::from_millis(100);

/// Clip `elapsed` to `MAX_CATCH_UP`, dropping the rest
pub fn catch_up(elapsed: Duration) -> Duration {
    if elapsed > MAX_CATCH_UP {
        warn!("host stalled for {:?}, dropping {:?}", elapsed, elapsed - MAX_CATCH_UP);
        MAX_CATCH_UP
    } else {
        elapsed
    }
}
