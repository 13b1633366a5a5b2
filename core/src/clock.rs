use std::time::Duration;

use crate::constants::{CLOCK_SPEED, TIMER_HZ};
use crate::error::{ConfigError, Fault};

const NANOS_PER_SECOND: u128 = 1_000_000_000;

/// Something the clock can drive: one instruction per `cycle`, one 60Hz
/// timer decrement per `tick_timers`.
pub trait Clocked {
    fn cycle(&mut self) -> Result<(), Fault>;
    fn tick_timers(&mut self);
}

/// # Clock
///
/// Two virtual clocks fed by the same wall-clock deltas:
/// - the instruction clock runs at `clock_speed` Hz
/// - the timer clock runs at a fixed 60Hz
///
/// Rather than counting fractional leftovers per call, the clock keeps the
/// total elapsed time and the number of events already delivered on each
/// clock. After any sequence of `advance` calls summing to T seconds exactly
/// floor(T * hz) cycles and floor(T * 60) timer ticks have run, no matter how
/// the calls were sliced. Within one advance events are delivered in virtual
/// time order; a timer tick wins a tie.
#[derive(Debug, Clone)]
pub struct Clock {
    clock_speed: u32,
    /// Instruction clock time since its last rebase
    cycle_nanos: u128,
    cycles: u64,
    /// Timer clock time since creation
    timer_nanos: u128,
    timer_ticks: u64,
}

impl Clock {
    pub fn new(clock_speed: u32) -> Result<Self, ConfigError> {
        if clock_speed == 0 {
            return Err(ConfigError::ZeroClockSpeed);
        }
        Ok(Clock {
            clock_speed,
            cycle_nanos: 0,
            cycles: 0,
            timer_nanos: 0,
            timer_ticks: 0,
        })
    }

    /// Forgets all elapsed time on both clocks
    pub fn restart(&mut self) {
        self.cycle_nanos = 0;
        self.cycles = 0;
        self.timer_nanos = 0;
        self.timer_ticks = 0;
    }

    pub fn clock_speed(&self) -> u32 {
        self.clock_speed
    }

    /// Changes the instruction rate from now on; the timer clock is untouched
    pub fn set_clock_speed(&mut self, clock_speed: u32) -> Result<(), ConfigError> {
        if clock_speed == 0 {
            return Err(ConfigError::ZeroClockSpeed);
        }
        self.clock_speed = clock_speed;
        self.cycle_nanos = 0;
        self.cycles = 0;
        Ok(())
    }

    /// Timer ticks delivered since creation
    pub fn timer_ticks(&self) -> u64 {
        self.timer_ticks
    }

    /// Runs every cycle and timer tick that falls within the next `elapsed`.
    ///
    /// Stops at the first fault and returns it; the rest of the slice is
    /// dropped.
    pub fn advance<M: Clocked>(&mut self, elapsed: Duration, machine: &mut M) -> Result<(), Fault> {
        self.cycle_nanos += elapsed.as_nanos();
        self.timer_nanos += elapsed.as_nanos();

        let hz = u128::from(self.clock_speed);
        let target_cycles = (self.cycle_nanos * hz / NANOS_PER_SECOND) as u64;
        let target_ticks = (self.timer_nanos * u128::from(TIMER_HZ) / NANOS_PER_SECOND) as u64;

        while self.cycles < target_cycles || self.timer_ticks < target_ticks {
            let timer_due = self.timer_ticks < target_ticks;
            let cycle_due = self.cycles < target_cycles;
            if timer_due && (!cycle_due || self.timer_first(hz)) {
                self.timer_ticks += 1;
                machine.tick_timers();
            } else {
                self.cycles += 1;
                if let Err(fault) = machine.cycle() {
                    self.cycles = target_cycles;
                    self.timer_ticks = target_ticks;
                    return Err(fault);
                }
            }
        }
        Ok(())
    }

    /// Whether the next timer tick comes no later than the next cycle.
    ///
    /// The next cycle lands at `(cycles + 1) / hz` on the instruction clock,
    /// the next tick at `(timer_ticks + 1) / 60`. The instruction clock may
    /// have been rebased, so its events are offset by the difference between
    /// the two clocks.
    fn timer_first(&self, hz: u128) -> bool {
        let offset = self.timer_nanos - self.cycle_nanos;
        let next_tick = u128::from(self.timer_ticks + 1) * NANOS_PER_SECOND;
        let next_cycle =
            (u128::from(self.cycles + 1) * NANOS_PER_SECOND + offset * hz) * u128::from(TIMER_HZ);
        next_tick * hz <= next_cycle
    }
}

impl Default for Clock {
    fn default() -> Self {
        Clock {
            clock_speed: CLOCK_SPEED,
            cycle_nanos: 0,
            cycles: 0,
            timer_nanos: 0,
            timer_ticks: 0,
        }
    }
}
