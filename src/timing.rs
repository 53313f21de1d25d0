//! Clocks and the fixed-step scheduler.

use std::time::{Duration, Instant};

/// Source of monotonic time. Swapped for [`ManualClock`] in tests.
pub trait Clock {
    /// Time since the clock was created.
    fn now(&self) -> Duration;

    fn sleep(&mut self, duration: Duration);
}

/// Wall clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&mut self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// Clock that only moves when told to. Sleeping advances it instantly.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    now: Duration,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, duration: Duration) {
        self.now += duration;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now
    }

    fn sleep(&mut self, duration: Duration) {
        self.advance(duration);
    }
}

/// Fixed timestep accumulator.
///
/// Elapsed time is banked and paid out in whole ticks. A stall longer than
/// `max_catch_up` ticks is dropped instead of fast-forwarding the game.
#[derive(Debug, Clone)]
pub struct FixedStep {
    tick: Duration,
    max_catch_up: u32,
    accumulator: Duration,
}

impl FixedStep {
    pub fn new(tick: Duration, max_catch_up: u32) -> Self {
        Self {
            tick,
            max_catch_up: max_catch_up.max(1),
            accumulator: Duration::ZERO,
        }
    }

    pub fn tick_duration(&self) -> Duration {
        self.tick
    }

    /// Banks `elapsed` and returns how many ticks are due now.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if self.tick.is_zero() {
            return 0;
        }
        self.accumulator += elapsed;

        let mut due = 0;
        while self.accumulator >= self.tick && due < self.max_catch_up {
            self.accumulator -= self.tick;
            due += 1;
        }
        if self.accumulator >= self.tick {
            self.accumulator = Duration::ZERO;
        }
        due
    }

    /// Time left until the next tick is due.
    pub fn remaining(&self) -> Duration {
        self.tick.saturating_sub(self.accumulator)
    }
}
