use std::io;
use std::time::Duration;

use crossterm::event;
use crossterm::event::Event as CrossTermEvent;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use tracing::trace;

use crate::events::Command;

/// Something that can be polled for key presses without blocking
pub trait KeySource {
    /// Return at most one pending command. Never waits for input.
    fn read_key(&mut self) -> io::Result<Option<Command>>;
}

/// Key presses from the terminal crossterm is attached to
pub struct CrosstermKeys;

impl KeySource for CrosstermKeys {
    fn read_key(&mut self) -> io::Result<Option<Command>> {
        if !event::poll(Duration::ZERO)? {
            return Ok(None);
        }

        Ok(convert_event(event::read()?))
    }
}

/// Converts a crossterm event into a command. Key releases, repeats and unbound keys are dropped.
pub fn convert_event(event: CrossTermEvent) -> Option<Command> {
    let CrossTermEvent::Key(key_event) = event else {
        return None;
    };

    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    match key_event {
        KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            ..
        } => Some(Command::Interrupt),
        KeyEvent {
            code: KeyCode::Char(' '),
            ..
        } => Some(Command::TogglePause),
        // crossterm reports keypad enter as plain enter
        KeyEvent {
            code: KeyCode::Enter,
            ..
        } => Some(Command::Step),
        KeyEvent {
            code: KeyCode::Esc, ..
        } => Some(Command::Quit),
        _ => {
            trace!(?key_event, "ignoring key");
            None
        }
    }
}
