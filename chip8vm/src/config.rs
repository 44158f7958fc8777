//! Construction-time settings of a `Machine` and its `Scheduler`.

use core::time::Duration;

/// Switches between the documented behavioural variants of chip-8 programs
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Quirks {
    /// `8XY6`/`8XYE` shift VY instead of VX before storing into VX
    pub shift_uses_vy: bool,
    /// `FX55`/`FX65` leave I pointing right past the last transferred byte
    pub increment_index_on_bulk_transfer: bool,
}

impl Default for Quirks {
    fn default() -> Self {
        Self {
            shift_uses_vy: false,
            increment_index_on_bulk_transfer: true,
        }
    }
}

/// Rates of the two periodic activities driven by the `Scheduler`
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Clock {
    /// Instructions executed per second
    pub cycle_hz: u64,
    /// Delay and sound timer decrements per second
    pub timer_hz: u64,
}

impl Clock {
    pub const DEFAULT_CYCLE_HZ: u64 = 250;
    pub const TIMER_HZ: u64 = 60;

    pub fn with_cycle_hz(cycle_hz: u64) -> Self {
        Self {
            cycle_hz,
            ..Self::default()
        }
    }

    pub fn cycle_period(&self) -> Duration {
        Self::period(self.cycle_hz)
    }

    pub fn timer_period(&self) -> Duration {
        Self::period(self.timer_hz)
    }

    /// Never shorter than a nanosecond, never longer than a second
    fn period(freq: u64) -> Duration {
        Duration::from_nanos((1_000_000_000u64 / freq.max(1)).max(1))
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self {
            cycle_hz: Self::DEFAULT_CYCLE_HZ,
            timer_hz: Self::TIMER_HZ,
        }
    }
}
