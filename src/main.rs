use std::io::{self, Stdout, Write, stdout};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute, terminal,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use flappy_loop::audio::Audio;
use flappy_loop::input::{Command, command_for};
use flappy_loop::render::{PixelBuf, Scene};
use flappy_loop::timing::SystemClock;
use flappy_loop::{AppConfig, Controller, Result, logging};

/// Raw mode and the alternate screen, undone on drop so an error or panic
/// never leaves the terminal unusable.
struct TerminalGuard {
    out: Stdout,
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = stdout();
        execute!(
            out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap,
            EnableMouseCapture,
        )?;
        Ok(Self { out })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(
            self.out,
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        );
        let _ = terminal::disable_raw_mode();
    }
}

fn main() -> Result<()> {
    let config = AppConfig::load_from_env()?;
    logging::init(&config.logging)?;
    info!(profile = %config.profile, ?config.physics, "Starting game");

    let audio = Audio::new(&config.audio);
    info!(enabled = audio.is_enabled(), "Audio ready");
    let mut controller = Controller::new(
        config.physics.clone(),
        &config.timing,
        SystemClock::new(),
        StdRng::from_os_rng(),
    );

    let mut guard = TerminalGuard::enter()?;
    let result = run(&mut controller, &audio, &mut guard.out);
    drop(guard);

    info!(best = controller.world().best, "Exiting");
    result
}

fn run(
    controller: &mut Controller<SystemClock>,
    audio: &Audio,
    out: &mut impl Write,
) -> Result<()> {
    let (cols, rows) = terminal::size()?;
    let mut buf = PixelBuf::for_terminal(cols, rows);
    let mut show_hud = false;
    let mut dirty = true;

    loop {
        // Input: wait for events until the next tick is due.
        let mut timeout = controller.time_to_next_tick();
        while event::poll(timeout)? {
            timeout = Duration::ZERO;
            let Some(command) = command_for(&event::read()?) else {
                continue;
            };
            match command {
                Command::Quit => return Ok(()),
                Command::Flap => controller.press(),
                Command::TuneGravity(delta) => controller.physics_mut().tune_gravity(delta),
                Command::TuneFlap(delta) => controller.physics_mut().tune_flap(delta),
                Command::TuneSpeed(delta) => controller.physics_mut().tune_speed(delta),
                Command::Resize { cols, rows } => {
                    buf.resize(cols as usize, rows as usize * 2);
                    info!(cols, rows, "Terminal resized");
                }
            }
            if matches!(
                command,
                Command::TuneGravity(_) | Command::TuneFlap(_) | Command::TuneSpeed(_)
            ) {
                show_hud = true;
                let physics = controller.physics();
                debug!(
                    gravity = physics.gravity,
                    flap = physics.flap_strength,
                    speed = physics.pipe_speed,
                    "Physics tuned"
                );
            }
            dirty = true;
        }

        // Update
        let outcomes = controller.pump();
        for outcome in &outcomes {
            audio.react(outcome);
        }

        // Render
        if dirty || !outcomes.is_empty() {
            Scene::new(controller.world(), controller.physics(), show_hud).draw(&mut buf);
            buf.render(out)?;
            dirty = false;
        }
    }
}
