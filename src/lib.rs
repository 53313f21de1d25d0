//! Flappy Loop
//!
//! A Flappy Bird clone for the terminal. The simulation is a pure step
//! function over [`game::World`], driven at a fixed rate by
//! [`controller::Controller`] and drawn by [`render::Scene`].

pub mod audio;
pub mod config;
pub mod controller;
pub mod error;
pub mod game;
pub mod geometry;
pub mod input;
pub mod logging;
pub mod render;
pub mod timing;

pub use config::{AppConfig, Physics};
pub use controller::Controller;
pub use error::{Error, Result};
pub use game::{Phase, TickOutcome, World};
