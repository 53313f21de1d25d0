//! Synthesized sound effects.
//!
//! Each effect is rendered once with fundsp into a sample buffer and played
//! through a detached rodio sink, so playback never blocks the game loop.

use fundsp::prelude::*;
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle, Sink};
use tracing::{debug, warn};

use crate::config::AudioConfig;
use crate::game::TickOutcome;

const SAMPLE_RATE: u32 = 44_100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sound {
    Flap,
    Score,
    Crash,
}

struct Output {
    // Dropping the stream stops all playback.
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

/// Sound player. Silent when audio is disabled or no device is available.
pub struct Audio {
    output: Option<Output>,
    flap: Vec<f32>,
    score: Vec<f32>,
    crash: Vec<f32>,
}

impl Audio {
    pub fn new(config: &AudioConfig) -> Self {
        let output = if config.enabled {
            match OutputStream::try_default() {
                Ok((stream, handle)) => Some(Output {
                    _stream: stream,
                    handle,
                }),
                Err(e) => {
                    warn!(error = %e, "No audio output, running silent");
                    None
                }
            }
        } else {
            debug!("Audio disabled by configuration");
            None
        };

        let volume = config.volume;
        Self {
            output,
            flap: render(flap_voice(), 0.08, volume),
            score: render(score_voice(), 0.18, volume),
            crash: render(crash_voice(), 0.5, volume),
        }
    }

    pub fn silent() -> Self {
        Self::new(&AudioConfig {
            enabled: false,
            volume: 0.0,
        })
    }

    /// Whether sounds reach an output device.
    pub fn is_enabled(&self) -> bool {
        self.output.is_some()
    }

    pub fn play(&self, sound: Sound) {
        let Some(output) = &self.output else {
            return;
        };
        let samples = match sound {
            Sound::Flap => &self.flap,
            Sound::Score => &self.score,
            Sound::Crash => &self.crash,
        };
        match Sink::try_new(&output.handle) {
            Ok(sink) => {
                sink.append(SamplesBuffer::new(1, SAMPLE_RATE, samples.clone()));
                sink.detach(); // Play in background
            }
            Err(e) => warn!(error = %e, ?sound, "Failed to play sound"),
        }
    }

    /// Plays whatever a tick calls for.
    pub fn react(&self, outcome: &TickOutcome) {
        for sound in sounds_for(outcome) {
            self.play(sound);
        }
    }
}

/// The sounds a tick calls for. A crash drowns out everything else.
pub fn sounds_for(outcome: &TickOutcome) -> Vec<Sound> {
    if outcome.crashed {
        return vec![Sound::Crash];
    }
    let mut sounds = Vec::new();
    if outcome.flapped || outcome.started {
        sounds.push(Sound::Flap);
    }
    if outcome.scored > 0 {
        sounds.push(Sound::Score);
    }
    sounds
}

/// Linear ramp from `from` to `to` over `secs`, then held.
fn ramp(from: f32, to: f32, secs: f32) -> impl Fn(f32) -> f32 + Clone + Send + Sync {
    move |t: f32| from + (to - from) * (t / secs).min(1.0)
}

/// Short rising chirp.
fn flap_voice() -> impl AudioUnit {
    let freq = ramp(520.0, 880.0, 0.08);
    let gain = ramp(0.2, 0.0, 0.08);
    (lfo(freq) >> sine::<f32>()) * lfo(gain)
}

/// Two-note chime.
fn score_voice() -> impl AudioUnit {
    let freq = |t: f32| -> f32 { if t < 0.07 { 988.0 } else { 1319.0 } };
    let gain = ramp(0.15, 0.0, 0.18);
    (lfo(freq) >> sine::<f32>()) * lfo(gain)
}

/// Falling sawtooth: 400Hz to 80Hz over 0.4s, fading out over 0.5s.
fn crash_voice() -> impl AudioUnit {
    let freq = ramp(400.0, 80.0, 0.4);
    let gain = ramp(0.15, 0.0, 0.5);
    (lfo(freq) >> saw()) * lfo(gain)
}

fn render(mut voice: impl AudioUnit, secs: f32, volume: f32) -> Vec<f32> {
    voice.set_sample_rate(f64::from(SAMPLE_RATE));
    let len = (SAMPLE_RATE as f32 * secs) as usize;
    (0..len).map(|_| voice.get_mono() * volume).collect()
}
