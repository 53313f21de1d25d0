//! The per-tick simulation step.

use rand::Rng;

use super::types::{Phase, Pipe, World};
use crate::config::Physics;

/// What a primary action did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEffect {
    Started,
    Flapped,
    Restarted,
}

/// What happened during one tick. Drives sound and logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub started: bool,
    pub flapped: bool,
    pub restarted: bool,
    /// Pipes passed this tick.
    pub scored: u32,
    pub crashed: bool,
}

/// Applies one primary action (flap key or click).
///
/// While playing this assigns `flap_strength` to the velocity. Before the
/// first flap it only starts the run, and after a crash it restarts.
pub fn apply_input(world: &mut World, physics: &Physics) -> InputEffect {
    match world.phase {
        Phase::NotStarted => {
            world.phase = Phase::Playing;
            InputEffect::Started
        }
        Phase::Playing => {
            world.bird.velocity = physics.flap_strength;
            InputEffect::Flapped
        }
        Phase::Ended => {
            world.reset(physics);
            InputEffect::Restarted
        }
    }
}

/// Pure transition: `prev` plus one tick of input gives the next world.
pub fn step<R: Rng + ?Sized>(
    prev: &World,
    flap: bool,
    physics: &Physics,
    rng: &mut R,
) -> (World, TickOutcome) {
    let mut next = prev.clone();
    let outcome = advance(&mut next, flap, physics, rng);
    (next, outcome)
}

/// In-place version of [`step`].
///
/// Order within a tick:
///  1. Consume input
///  2. Gravity
///  3. Scroll pipes, drop the ones fully off-screen
///  4. Spawn
///  5. Collision (bounds, then pipes)
///  6. Score passed pipes
pub fn advance<R: Rng + ?Sized>(
    world: &mut World,
    flap: bool,
    physics: &Physics,
    rng: &mut R,
) -> TickOutcome {
    let mut outcome = TickOutcome::default();
    world.tick += 1;

    if flap {
        match apply_input(world, physics) {
            InputEffect::Started => outcome.started = true,
            InputEffect::Flapped => outcome.flapped = true,
            InputEffect::Restarted => outcome.restarted = true,
        }
    }

    if world.phase != Phase::Playing {
        return outcome;
    }

    integrate_bird(world, physics);
    scroll_pipes(world, physics);
    spawn_pipes(world, physics, rng);

    if check_collision(world, physics) {
        world.phase = Phase::Ended;
        world.best = world.best.max(world.score);
        outcome.crashed = true;
        return outcome;
    }

    outcome.scored = score_passed_pipes(world, physics);
    outcome
}

/// Explicit Euler, one step per tick.
fn integrate_bird(world: &mut World, physics: &Physics) {
    world.bird.velocity += physics.gravity;
    world.bird.y += world.bird.velocity;
}

fn scroll_pipes(world: &mut World, physics: &Physics) {
    for pipe in &mut world.pipes {
        pipe.x -= physics.pipe_speed;
    }
    world.pipes.retain(|p| p.trailing_edge(physics) >= 0.0);
    world.distance += physics.pipe_speed;
}

/// Spawns at `spawn_x` into an empty field, otherwise exactly
/// `pipe_spacing` behind the last pipe once that slot has scrolled in.
fn spawn_pipes<R: Rng + ?Sized>(world: &mut World, physics: &Physics, rng: &mut R) {
    let spawn_x = physics.spawn_x();
    match world.pipes.last() {
        None => spawn_pipe(world, spawn_x, physics, rng),
        Some(last) => {
            let next_x = last.x + physics.pipe_spacing;
            if next_x <= spawn_x {
                spawn_pipe(world, next_x, physics, rng);
            }
        }
    }
}

/// Push a pipe at `x` with a random gap position.
pub fn spawn_pipe<R: Rng + ?Sized>(world: &mut World, x: f64, physics: &Physics, rng: &mut R) {
    let (min_center, max_center) = gap_center_range(physics);
    let gap_center = if max_center > min_center {
        rng.random_range(min_center..=max_center)
    } else {
        min_center
    };
    world.pipes.push(Pipe::new(x, gap_center));
}

/// Bounds for a gap centre that keeps `gap_margin` clear of ceiling and ground.
/// Collapses to the lower bound when the gap cannot fit.
pub fn gap_center_range(physics: &Physics) -> (f64, f64) {
    let half_gap = physics.pipe_gap / 2.0;
    let min_center = physics.gap_margin + half_gap;
    let max_center = (physics.ground_y() - physics.gap_margin - half_gap).max(min_center);
    (min_center, max_center)
}

/// Whether the bird touches the ceiling, the ground or any pipe.
pub fn check_collision(world: &World, physics: &Physics) -> bool {
    let bird = world.bird.bounds();

    if bird.top <= 0.0 || bird.bottom >= physics.ground_y() {
        return true;
    }

    world.pipes.iter().any(|pipe| {
        bird.overlaps(&pipe.top_rect(physics)) || bird.overlaps(&pipe.bottom_rect(physics))
    })
}

/// Marks pipes whose trailing edge is behind the bird's centre.
fn score_passed_pipes(world: &mut World, physics: &Physics) -> u32 {
    let bird_x = world.bird.x;
    let mut passed = 0;
    for pipe in &mut world.pipes {
        if !pipe.passed && bird_x > pipe.trailing_edge(physics) {
            pipe.passed = true;
            passed += 1;
        }
    }
    world.score += passed;
    passed
}
