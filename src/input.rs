//! Terminal input: mapping events to commands, and the flap latch.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};

const GRAVITY_STEP: f64 = 0.05;
const FLAP_STEP: f64 = 0.5;
const SPEED_STEP: f64 = 0.25;

/// What the host loop should do with an input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// The primary action: start, flap or restart depending on phase.
    Flap,
    Quit,
    TuneGravity(f64),
    /// Positive = stronger flap.
    TuneFlap(f64),
    TuneSpeed(f64),
    Resize { cols: u16, rows: u16 },
}

/// Maps a terminal event. Key releases and repeats are ignored so the
/// primary action stays edge-triggered.
pub fn command_for(event: &Event) -> Option<Command> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => key_command(key),
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Down(_) => Some(Command::Flap),
            _ => None,
        },
        Event::Resize(cols, rows) => Some(Command::Resize {
            cols: *cols,
            rows: *rows,
        }),
        _ => None,
    }
}

fn key_command(key: &KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Command::Quit);
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char(' ') | KeyCode::Up | KeyCode::Enter => Some(Command::Flap),
        // Tuning: a/z = gravity, s/x = flap, d/c = speed
        KeyCode::Char('a') => Some(Command::TuneGravity(GRAVITY_STEP)),
        KeyCode::Char('z') => Some(Command::TuneGravity(-GRAVITY_STEP)),
        KeyCode::Char('s') => Some(Command::TuneFlap(FLAP_STEP)),
        KeyCode::Char('x') => Some(Command::TuneFlap(-FLAP_STEP)),
        KeyCode::Char('d') => Some(Command::TuneSpeed(SPEED_STEP)),
        KeyCode::Char('c') => Some(Command::TuneSpeed(-SPEED_STEP)),
        _ => None,
    }
}

/// Edge-triggered flag for the primary action, consumed at the start of a tick.
///
/// Any number of presses between two ticks count as one.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputLatch {
    pending: bool,
}

impl InputLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self) {
        self.pending = true;
    }

    /// Returns whether a press was latched, and clears it.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, MouseButton, MouseEvent};

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        })
    }

    fn mouse(kind: MouseEventKind) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column: 3,
            row: 4,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_key_and_click_share_primary_action() {
        for code in [KeyCode::Char(' '), KeyCode::Up, KeyCode::Enter] {
            assert_eq!(
                command_for(&key(code, KeyEventKind::Press)),
                Some(Command::Flap)
            );
        }
        assert_eq!(
            command_for(&mouse(MouseEventKind::Down(MouseButton::Left))),
            Some(Command::Flap)
        );
    }

    #[test]
    fn test_release_and_drag_are_ignored() {
        assert_eq!(
            command_for(&key(KeyCode::Char(' '), KeyEventKind::Release)),
            None
        );
        assert_eq!(
            command_for(&key(KeyCode::Char(' '), KeyEventKind::Repeat)),
            None
        );
        assert_eq!(
            command_for(&mouse(MouseEventKind::Up(MouseButton::Left))),
            None
        );
        assert_eq!(
            command_for(&mouse(MouseEventKind::Drag(MouseButton::Left))),
            None
        );
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(
            command_for(&key(KeyCode::Char('q'), KeyEventKind::Press)),
            Some(Command::Quit)
        );
        assert_eq!(
            command_for(&key(KeyCode::Esc, KeyEventKind::Press)),
            Some(Command::Quit)
        );
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(command_for(&ctrl_c), Some(Command::Quit));
    }

    #[test]
    fn test_tuning_keys() {
        assert_eq!(
            command_for(&key(KeyCode::Char('a'), KeyEventKind::Press)),
            Some(Command::TuneGravity(GRAVITY_STEP))
        );
        assert_eq!(
            command_for(&key(KeyCode::Char('x'), KeyEventKind::Press)),
            Some(Command::TuneFlap(-FLAP_STEP))
        );
        assert_eq!(
            command_for(&key(KeyCode::Char('c'), KeyEventKind::Press)),
            Some(Command::TuneSpeed(-SPEED_STEP))
        );
    }

    #[test]
    fn test_resize() {
        assert_eq!(
            command_for(&Event::Resize(80, 24)),
            Some(Command::Resize { cols: 80, rows: 24 })
        );
    }

    #[test]
    fn test_latch_collapses_presses() {
        let mut latch = InputLatch::new();
        assert!(!latch.take());
        latch.press();
        latch.press();
        latch.press();
        assert!(latch.take());
        assert!(!latch.take());
    }
}
