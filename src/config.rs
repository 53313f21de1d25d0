//! Game configuration
//!
//! Values are layered, later sources overriding earlier ones:
//! 1. built-in defaults
//! 2. `config/default.toml`
//! 3. `config/{profile}.toml`
//! 4. environment variables with prefix `FLAPPY_` (e.g. `FLAPPY_PHYSICS__GRAVITY=0.6`)

use std::path::PathBuf;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Dimensions of the playfield in world units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f64,
    pub height: f64,
    /// Height of the ground strip at the bottom of the playfield.
    pub ground_height: f64,
}

impl WorldConfig {
    /// The ground line. Touching it ends the run.
    pub fn ground_y(&self) -> f64 {
        self.height - self.ground_height
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 600.0,
            ground_height: 60.0,
        }
    }
}

/// Everything the simulation step needs. Tuning keys mutate this at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Physics {
    /// Velocity added every tick (positive = downward).
    pub gravity: f64,
    /// Velocity assigned on a flap (negative = upward).
    pub flap_strength: f64,
    /// Distance every pipe moves left per tick.
    pub pipe_speed: f64,
    /// Vertical opening between the top and bottom pipe.
    pub pipe_gap: f64,
    pub pipe_width: f64,
    /// Horizontal distance between consecutive pipes.
    pub pipe_spacing: f64,
    /// Minimum distance between the gap and the ceiling or ground.
    pub gap_margin: f64,
    /// Where new pipes enter. Defaults to the right edge of the world.
    pub spawn_x: Option<f64>,
    pub bird_x: f64,
    pub start_y: f64,
    pub bird_half_width: f64,
    pub bird_half_height: f64,
    pub world: WorldConfig,
}

impl Physics {
    pub fn ground_y(&self) -> f64 {
        self.world.ground_y()
    }

    pub fn spawn_x(&self) -> f64 {
        self.spawn_x.unwrap_or(self.world.width)
    }

    pub fn tune_gravity(&mut self, delta: f64) {
        self.gravity = (self.gravity + delta).max(0.05);
    }

    /// Positive `delta` makes the flap stronger.
    pub fn tune_flap(&mut self, delta: f64) {
        self.flap_strength = (self.flap_strength - delta).min(-0.5);
    }

    pub fn tune_speed(&mut self, delta: f64) {
        self.pipe_speed = (self.pipe_speed + delta).max(0.2);
    }
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            gravity: 0.5,
            flap_strength: -9.0,
            pipe_speed: 3.0,
            pipe_gap: 180.0,
            pipe_width: 60.0,
            // One pipe every 90 frames at speed 3.
            pipe_spacing: 270.0,
            gap_margin: 100.0,
            spawn_x: None,
            bird_x: 80.0,
            start_y: 270.0,
            bird_half_width: 15.0,
            bird_half_height: 12.0,
            world: WorldConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Simulation ticks per second.
    pub tick_hz: u32,
    /// Most ticks run in one frame when catching up after a stall.
    pub max_catch_up: u32,
}

impl TimingConfig {
    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.tick_hz.max(1)))
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_hz: 60,
            max_catch_up: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub enabled: bool,
    /// Master gain, 0.0 to 1.0.
    pub volume: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: 0.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is not set.
    pub level: String,
    /// The terminal belongs to the renderer, so logs go to a file.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: Some(PathBuf::from("flappy.log")),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// The active profile (debug, release, etc.)
    pub profile: String,
    pub physics: Physics,
    pub timing: TimingConfig,
    pub audio: AudioConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Loads and validates configuration for `profile`.
    pub fn load(profile: &str) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", profile)).required(false))
            .add_source(
                Environment::with_prefix("FLAPPY")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override("profile", profile)?
            .build()?;

        let app: AppConfig = config.try_deserialize()?;
        app.validate()?;
        Ok(app)
    }

    /// Loads configuration using the FLAPPY_PROFILE environment variable,
    /// defaulting to "release"
    pub fn load_from_env() -> Result<Self> {
        let profile = std::env::var("FLAPPY_PROFILE").unwrap_or_else(|_| "release".to_string());
        Self::load(&profile)
    }

    pub fn validate(&self) -> Result<()> {
        let p = &self.physics;
        positive("physics.world.width", p.world.width)?;
        positive("physics.world.height", p.world.height)?;
        finite("physics.world.ground_height", p.world.ground_height)?;
        if p.world.ground_height < 0.0 || p.world.ground_height >= p.world.height {
            return Err(invalid(
                "physics.world.ground_height",
                format!("must be in [0, {}), got {}", p.world.height, p.world.ground_height),
            ));
        }
        finite("physics.gravity", p.gravity)?;
        finite("physics.flap_strength", p.flap_strength)?;
        positive("physics.pipe_speed", p.pipe_speed)?;
        positive("physics.pipe_gap", p.pipe_gap)?;
        positive("physics.pipe_width", p.pipe_width)?;
        positive("physics.pipe_spacing", p.pipe_spacing)?;
        finite("physics.gap_margin", p.gap_margin)?;
        if p.gap_margin < 0.0 {
            return Err(invalid(
                "physics.gap_margin",
                format!("must not be negative, got {}", p.gap_margin),
            ));
        }
        finite("physics.bird_x", p.bird_x)?;
        finite("physics.start_y", p.start_y)?;
        positive("physics.bird_half_width", p.bird_half_width)?;
        positive("physics.bird_half_height", p.bird_half_height)?;
        if let Some(x) = p.spawn_x {
            finite("physics.spawn_x", x)?;
        }
        if self.timing.tick_hz == 0 {
            return Err(invalid("timing.tick_hz", "must be at least 1".to_string()));
        }
        if !(0.0..=1.0).contains(&self.audio.volume) {
            return Err(invalid(
                "audio.volume",
                format!("must be in [0, 1], got {}", self.audio.volume),
            ));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> Error {
    Error::InvalidConfig { field, reason }
}

fn finite(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, format!("must be finite, got {value}")))
    }
}

fn positive(field: &'static str, value: f64) -> Result<()> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be positive, got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.physics.ground_y() - 540.0).abs() < f64::EPSILON);
        assert!((config.physics.spawn_x() - 400.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rejects_non_positive_pipe_speed() {
        let mut config = AppConfig::default();
        config.physics.pipe_speed = 0.0;
        match config.validate() {
            Err(Error::InvalidConfig { field, .. }) => assert_eq!(field, "physics.pipe_speed"),
            other => panic!("expected invalid pipe_speed, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_negative_gap_margin() {
        let mut config = AppConfig::default();
        config.physics.gap_margin = -1.0;
        match config.validate() {
            Err(Error::InvalidConfig { field, .. }) => assert_eq!(field, "physics.gap_margin"),
            other => panic!("expected invalid gap_margin, got {other:?}"),
        }

        config.physics.gap_margin = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_nan_gravity() {
        let mut config = AppConfig::default();
        config.physics.gravity = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_ground_taller_than_world() {
        let mut config = AppConfig::default();
        config.physics.world.ground_height = 600.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_tick_rate() {
        let mut config = AppConfig::default();
        config.timing.tick_hz = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tick_duration() {
        let timing = TimingConfig {
            tick_hz: 50,
            max_catch_up: 1,
        };
        assert_eq!(timing.tick_duration(), Duration::from_millis(20));
    }

    #[test]
    fn test_tuning_is_clamped() {
        let mut physics = Physics::default();
        physics.tune_gravity(-10.0);
        assert!((physics.gravity - 0.05).abs() < f64::EPSILON);

        physics.tune_flap(-100.0);
        assert!((physics.flap_strength - (-0.5)).abs() < f64::EPSILON);

        physics.tune_flap(2.0);
        assert!((physics.flap_strength - (-2.5)).abs() < f64::EPSILON);

        physics.tune_speed(-10.0);
        assert!((physics.pipe_speed - 0.2).abs() < f64::EPSILON);
    }
}
