//! Status line: the last user-facing event message.
//!
//! Writes are last-write-wins and replace the whole message. It is kept out
//! of the world lock so actors that only report never contend with movers.

use std::sync::{Mutex, PoisonError};

/// Shared status message.
#[derive(Debug, Default)]
pub struct StatusLine {
    message: Mutex<String>,
}

impl StatusLine {
    /// Replace the message.
    pub fn set(&self, message: impl Into<String>) {
        let message = message.into();
        *self.message.lock().unwrap_or_else(PoisonError::into_inner) = message;
    }

    /// Current message.
    pub fn get(&self) -> String {
        self.message
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Messages shown on the status line.
pub mod messages {
    /// Player stepped onto the trap.
    pub const GAME_OVER: &str = "GAME OVER! You fell into the trap!";
    /// Player stepped onto the portal.
    pub const TELEPORTED: &str = "You entered the portal and were teleported!";
    /// Portal saw an `enter` signal.
    pub const PORTAL_ENTERED: &str = "You entered the portal!";
    /// Portal saw a `close` signal.
    pub const PORTAL_CLOSED: &str = "The portal closed!";
    /// Portal watchdog expired.
    pub const PORTAL_VANISHED: &str = "The portal vanished from inactivity.";
    /// Trap saw a `playerNear` signal.
    pub const TRAP_SPRUNG: &str = "You fell into a trap!";
    /// Trap saw an `otherNear` signal.
    pub const TRAP_OTHER: &str = "Something else triggered the trap!";
    /// Trap saw a `disable` signal.
    pub const TRAP_DISABLED: &str = "The trap was deactivated.";

    /// Message for the interact action.
    pub fn interacting(x: i32, y: i32) -> String {
        format!("Interacting at ({x}, {y})")
    }
}
