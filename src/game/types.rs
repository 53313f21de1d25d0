//! Game state: the bird, the pipes and the phase machine.

use crate::config::Physics;
use crate::geometry::Aabb;

/// Where the run is. Only `Playing` integrates physics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the first flap.
    NotStarted,
    Playing,
    /// Crashed. The next flap restarts.
    Ended,
}

/// The player sprite. `x` never changes during a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    pub x: f64,
    /// Centre of the sprite, 0 = ceiling.
    pub y: f64,
    /// Positive = downward.
    pub velocity: f64,
    pub half_w: f64,
    pub half_h: f64,
}

impl Bird {
    pub fn new(physics: &Physics) -> Self {
        Self {
            x: physics.bird_x,
            y: physics.start_y,
            velocity: 0.0,
            half_w: physics.bird_half_width,
            half_h: physics.bird_half_height,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.x, self.y, self.half_w, self.half_h)
    }
}

/// A top + bottom pipe pair with a gap between them.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    /// Left edge.
    pub x: f64,
    /// Fixed at spawn.
    pub gap_center: f64,
    /// Whether the bird has passed this pipe (for scoring).
    pub passed: bool,
}

impl Pipe {
    pub fn new(x: f64, gap_center: f64) -> Self {
        Self {
            x,
            gap_center,
            passed: false,
        }
    }

    pub fn gap_top(&self, physics: &Physics) -> f64 {
        self.gap_center - physics.pipe_gap / 2.0
    }

    pub fn gap_bottom(&self, physics: &Physics) -> f64 {
        self.gap_center + physics.pipe_gap / 2.0
    }

    pub fn trailing_edge(&self, physics: &Physics) -> f64 {
        self.x + physics.pipe_width
    }

    pub fn top_rect(&self, physics: &Physics) -> Aabb {
        Aabb::new(self.x, 0.0, self.trailing_edge(physics), self.gap_top(physics))
    }

    pub fn bottom_rect(&self, physics: &Physics) -> Aabb {
        Aabb::new(
            self.x,
            self.gap_bottom(physics),
            self.trailing_edge(physics),
            physics.ground_y(),
        )
    }
}

/// Complete simulation state. The renderer draws from a reference to this.
#[derive(Debug, Clone, PartialEq)]
pub struct World {
    pub bird: Bird,
    /// Ordered by ascending `x`.
    pub pipes: Vec<Pipe>,
    pub phase: Phase,
    pub score: u32,
    /// Best score of this process. Never written to disk.
    pub best: u32,
    /// Ticks elapsed since the process started, in every phase.
    pub tick: u64,
    /// Total distance scrolled while playing.
    pub distance: f64,
}

impl World {
    pub fn new(physics: &Physics) -> Self {
        Self {
            bird: Bird::new(physics),
            pipes: Vec::new(),
            phase: Phase::NotStarted,
            score: 0,
            best: 0,
            tick: 0,
            distance: 0.0,
        }
    }

    /// Back to `NotStarted`, folding the last run into `best`.
    pub fn reset(&mut self, physics: &Physics) {
        self.best = self.best.max(self.score);
        self.bird = Bird::new(physics);
        self.pipes.clear();
        self.phase = Phase::NotStarted;
        self.score = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_world_defaults() {
        let physics = Physics::default();
        let world = World::new(&physics);
        assert_eq!(world.phase, Phase::NotStarted);
        assert_eq!(world.score, 0);
        assert_eq!(world.best, 0);
        assert!(world.pipes.is_empty());
        assert!((world.bird.x - physics.bird_x).abs() < f64::EPSILON);
        assert!((world.bird.y - physics.start_y).abs() < f64::EPSILON);
        assert!(world.bird.velocity.abs() < f64::EPSILON);
    }

    #[test]
    fn test_pipe_rects_leave_the_gap_open() {
        let physics = Physics::default();
        let pipe = Pipe::new(200.0, 300.0);
        let top = pipe.top_rect(&physics);
        let bottom = pipe.bottom_rect(&physics);

        assert!((top.bottom - 210.0).abs() < f64::EPSILON);
        assert!((bottom.top - 390.0).abs() < f64::EPSILON);
        assert!((bottom.bottom - physics.ground_y()).abs() < f64::EPSILON);
        assert!((top.right - 260.0).abs() < f64::EPSILON);
        assert!(!top.overlaps(&bottom));
    }

    #[test]
    fn test_reset_keeps_best() {
        let physics = Physics::default();
        let mut world = World::new(&physics);
        world.phase = Phase::Ended;
        world.score = 7;
        world.best = 3;
        world.bird.y = 10.0;
        world.bird.velocity = 4.0;
        world.pipes.push(Pipe::new(100.0, 250.0));

        world.reset(&physics);

        assert_eq!(world.phase, Phase::NotStarted);
        assert_eq!(world.score, 0);
        assert_eq!(world.best, 7);
        assert!(world.pipes.is_empty());
        assert!((world.bird.y - physics.start_y).abs() < f64::EPSILON);
        assert!(world.bird.velocity.abs() < f64::EPSILON);
    }
}
