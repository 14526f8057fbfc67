//! Input Actor: Dedicated thread for polling terminal events.
//!
//! Uses crossterm's event polling to turn key presses into
//! [`InputEvent`]s without blocking the main loop.

use super::messages::InputEvent;
use crate::error::{GameError, Result};
use crossbeam_channel::Sender;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::warn;

/// Input actor that polls terminal events.
pub struct InputActor {
    /// Handle to the input thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
}

impl InputActor {
    /// Spawn the input actor thread.
    ///
    /// `poll_timeout` bounds how long a shutdown request can go unnoticed.
    pub fn spawn(sender: Sender<InputEvent>, poll_timeout: Duration) -> Result<Self> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = Arc::clone(&shutdown);

        let handle = thread::Builder::new()
            .name("gridwalk-input".to_string())
            .spawn(move || Self::run_loop(&sender, &shutdown_clone, poll_timeout))
            .map_err(|source| GameError::Spawn { name: "input", source })?;

        Ok(Self {
            handle: Some(handle),
            shutdown,
        })
    }

    /// Signal the input thread to shutdown.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Wait for the input thread to finish.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    fn run_loop(sender: &Sender<InputEvent>, shutdown: &AtomicBool, poll_timeout: Duration) {
        while !shutdown.load(Ordering::Relaxed) {
            match event::poll(poll_timeout) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => {
                        if let Some(input) = convert_key(key) {
                            if sender.send(input).is_err() {
                                // Receiver dropped, exit
                                break;
                            }
                        }
                    }
                    Ok(_) => {}
                    Err(e) => warn!(error = %e, "input_read_failed"),
                },
                Ok(false) => {}
                Err(e) => warn!(error = %e, "input_poll_failed"),
            }
        }
    }
}

impl Drop for InputActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Map a crossterm key press to a game input.
///
/// Arrow keys are folded onto `w`/`a`/`s`/`d`. Releases, repeats and
/// unbound keys yield `None`.
pub fn convert_key(key: KeyEvent) -> Option<InputEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    Some(match key.code {
        KeyCode::Esc => InputEvent::quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => InputEvent::quit(),
        KeyCode::Char('e' | 'E') => InputEvent::interact(),
        KeyCode::Char(c @ ('w' | 'a' | 's' | 'd')) => InputEvent::movement(c),
        KeyCode::Char(c @ ('W' | 'A' | 'S' | 'D')) => InputEvent::movement(c.to_ascii_lowercase()),
        KeyCode::Up => InputEvent::movement('w'),
        KeyCode::Left => InputEvent::movement('a'),
        KeyCode::Down => InputEvent::movement('s'),
        KeyCode::Right => InputEvent::movement('d'),
        _ => return None,
    })
}
