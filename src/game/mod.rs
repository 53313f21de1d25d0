//! Flappy simulation.
//!
//! A bird falls under gravity and flaps upward while pipe pairs scroll in
//! from the right. Hitting a pipe, the ceiling or the ground ends the run.
//! Everything here is deterministic given the RNG, with no I/O or clock.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
