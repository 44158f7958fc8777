//! Cooperative scheduler merging the execution cadence with the 60 Hz timers.
//!
//! The scheduler owns no clock of its own. The platform measures wall time and
//! feeds it in through [`Scheduler::advance`], which makes the whole run
//! reproducible under simulated time.
//!
//! An activity fires when its deadline lies strictly before the accumulated
//! time, so `advance` over a window of length `d` right after `start` runs
//! exactly the ticks that fall into `[0, d)`.

use core::time::Duration;

#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};

use crate::config::Clock;
use crate::context::Context;
use crate::error::Error;
use crate::machine::Machine;

/// Number of activities fired during a single `advance`
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Ticks {
    pub cycles: usize,
    pub timers: usize,
}

#[derive(Copy, Clone, Debug)]
enum Activity {
    Cycle,
    Timer,
}

#[derive(Debug)]
pub struct Scheduler {
    clock: Clock,
    running: bool,
    elapsed: Duration,
    next_cycle: Duration,
    next_timer: Duration,
}

impl Scheduler {
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            running: false,
            elapsed: Duration::from_secs(0),
            next_cycle: Duration::from_secs(0),
            next_timer: Duration::from_secs(0),
        }
    }

    pub fn clock(&self) -> Clock {
        self.clock
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Arm both activities
    ///
    /// The first instruction is due right away, the first timer tick one timer
    /// period later. Starting a running scheduler rearms it from zero.
    pub fn start(&mut self) {
        self.elapsed = Duration::from_secs(0);
        self.next_cycle = Duration::from_secs(0);
        self.next_timer = self.clock.timer_period();
        self.running = true;
        info!(
            "scheduler started at {} Hz, timers at {} Hz",
            self.clock.cycle_hz, self.clock.timer_hz
        );
    }

    /// Disarm both activities and silence the tone
    pub fn stop<C: Context>(&mut self, machine: &mut Machine<C>) {
        if self.running {
            info!("scheduler stopped after {:?}", self.elapsed);
        }
        self.running = false;
        self.elapsed = Duration::from_secs(0);
        self.next_cycle = Duration::from_secs(0);
        self.next_timer = Duration::from_secs(0);
        machine.context_mut().sound_off();
    }

    /// Let `elapsed` more time pass and fire every activity that became due
    ///
    /// A machine waiting for a key still counts its cycles. A fault stops the
    /// scheduler before it is returned.
    pub fn advance<C: Context>(
        &mut self,
        machine: &mut Machine<C>,
        elapsed: Duration,
    ) -> Result<Ticks, Error> {
        let mut ticks = Ticks::default();
        if !self.running {
            return Ok(ticks);
        }
        self.elapsed += elapsed;

        while let Some(activity) = self.due() {
            match activity {
                Activity::Timer => {
                    machine.tick_timers();
                    self.next_timer += self.clock.timer_period();
                    ticks.timers += 1;
                }
                Activity::Cycle => {
                    self.next_cycle += self.clock.cycle_period();
                    ticks.cycles += 1;
                    match machine.tick_chip() {
                        Ok(()) | Err(nb::Error::WouldBlock) => {}
                        Err(nb::Error::Other(e)) => {
                            self.stop(machine);
                            return Err(e);
                        }
                    }
                }
            }
        }
        Ok(ticks)
    }

    /// Earliest activity with a deadline before the accumulated time, timer first on a tie
    fn due(&self) -> Option<Activity> {
        let (activity, deadline) = if self.next_timer <= self.next_cycle {
            (Activity::Timer, self.next_timer)
        } else {
            (Activity::Cycle, self.next_cycle)
        };
        if deadline < self.elapsed {
            Some(activity)
        } else {
            None
        }
    }
}
