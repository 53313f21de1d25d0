//! The game loop controller: owns the world and feeds it fixed ticks.

use std::time::Duration;

use rand::Rng;
use rand::rngs::StdRng;
use tracing::{debug, info, trace};

use crate::config::{Physics, TimingConfig};
use crate::game::{self, Phase, TickOutcome, World};
use crate::input::InputLatch;
use crate::timing::{Clock, FixedStep};

pub struct Controller<C: Clock, R: Rng = StdRng> {
    world: World,
    physics: Physics,
    rng: R,
    latch: InputLatch,
    clock: C,
    stepper: FixedStep,
    last_pump: Duration,
}

impl<C: Clock, R: Rng> Controller<C, R> {
    pub fn new(physics: Physics, timing: &TimingConfig, clock: C, rng: R) -> Self {
        let last_pump = clock.now();
        Self {
            world: World::new(&physics),
            physics,
            rng,
            latch: InputLatch::new(),
            clock,
            stepper: FixedStep::new(timing.tick_duration(), timing.max_catch_up),
            last_pump,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn physics(&self) -> &Physics {
        &self.physics
    }

    /// Live tuning. Takes effect from the next tick.
    pub fn physics_mut(&mut self) -> &mut Physics {
        &mut self.physics
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Latches the primary action for the next tick.
    pub fn press(&mut self) {
        self.latch.press();
    }

    /// Runs one tick now, regardless of the clock.
    pub fn step_once(&mut self) -> TickOutcome {
        let flap = self.latch.take();
        let (next, outcome) = game::step(&self.world, flap, &self.physics, &mut self.rng);
        self.world = next;
        self.log_outcome(&outcome);
        outcome
    }

    /// Runs every tick that is due according to the clock.
    pub fn pump(&mut self) -> Vec<TickOutcome> {
        let now = self.clock.now();
        let elapsed = now.saturating_sub(self.last_pump);
        self.last_pump = now;

        let due = self.stepper.advance(elapsed);
        (0..due).map(|_| self.step_once()).collect()
    }

    /// How long the host may wait for input before the next tick is due.
    pub fn time_to_next_tick(&self) -> Duration {
        let since_pump = self.clock.now().saturating_sub(self.last_pump);
        self.stepper.remaining().saturating_sub(since_pump)
    }

    fn log_outcome(&self, outcome: &TickOutcome) {
        let world = &self.world;
        if outcome.started {
            info!(tick = world.tick, "run started");
        }
        if outcome.scored > 0 {
            debug!(score = world.score, "pipe passed");
        }
        if outcome.crashed {
            info!(score = world.score, best = world.best, tick = world.tick, "run ended");
        }
        if outcome.restarted {
            info!(best = world.best, "restarted");
        }
        if world.phase == Phase::Playing {
            trace!(
                y = world.bird.y,
                velocity = world.bird.velocity,
                pipes = world.pipes.len(),
                "tick"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::{Clock, ManualClock};
    use rand::SeedableRng;

    fn controller() -> Controller<ManualClock> {
        let timing = TimingConfig {
            tick_hz: 50,
            max_catch_up: 4,
        };
        Controller::new(
            Physics::default(),
            &timing,
            ManualClock::new(),
            StdRng::seed_from_u64(1),
        )
    }

    #[test]
    fn test_no_ticks_without_time() {
        let mut ctl = controller();
        assert!(ctl.pump().is_empty());
        assert_eq!(ctl.world().tick, 0);
    }

    #[test]
    fn test_pump_runs_due_ticks() {
        let mut ctl = controller();
        ctl.clock_mut().advance(Duration::from_millis(45));
        assert_eq!(ctl.pump().len(), 2);
        assert_eq!(ctl.world().tick, 2);
        assert_eq!(ctl.time_to_next_tick(), Duration::from_millis(15));
    }

    #[test]
    fn test_sleeping_out_the_wait_lands_on_next_tick() {
        let mut ctl = controller();
        ctl.clock_mut().advance(Duration::from_millis(5));
        assert!(ctl.pump().is_empty());
        let wait = ctl.time_to_next_tick();
        ctl.clock_mut().sleep(wait);
        assert_eq!(ctl.pump().len(), 1);
    }

    #[test]
    fn test_press_is_consumed_by_one_tick() {
        let mut ctl = controller();
        ctl.press();
        ctl.press();
        ctl.clock_mut().advance(Duration::from_millis(60));

        let outcomes = ctl.pump();

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].started);
        assert!(!outcomes[1].started && !outcomes[1].flapped);
        assert!(!outcomes[2].started && !outcomes[2].flapped);
        assert_eq!(ctl.world().phase, Phase::Playing);
    }

    #[test]
    fn test_tuning_applies_to_next_tick() {
        let mut ctl = controller();
        ctl.press();
        ctl.step_once();
        ctl.physics_mut().gravity = 2.0;
        let before = ctl.world().bird.velocity;
        ctl.step_once();
        assert!((ctl.world().bird.velocity - (before + 2.0)).abs() < 1e-9);
    }
}
