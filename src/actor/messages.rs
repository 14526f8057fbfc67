//! Message types for actor communication.

use crate::world::Snapshot;

/// What the player asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    /// Leave the game.
    Quit,
    /// Interact with the current position.
    Interact,
    /// Move one step; the direction is in [`InputEvent::key`].
    Move,
}

/// One decoded keyboard event, sent from the input actor to the main loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputEvent {
    /// Event kind.
    pub kind: InputKind,
    /// Key that produced it (`w`/`a`/`s`/`d` for moves).
    pub key: char,
}

impl InputEvent {
    /// A quit request.
    pub const fn quit() -> Self {
        Self {
            kind: InputKind::Quit,
            key: '\u{1b}',
        }
    }

    /// An interact request.
    pub const fn interact() -> Self {
        Self {
            kind: InputKind::Interact,
            key: 'e',
        }
    }

    /// A move request for `key`.
    pub const fn movement(key: char) -> Self {
        Self {
            kind: InputKind::Move,
            key,
        }
    }
}

/// Commands sent to the render thread.
#[derive(Debug)]
pub enum RenderCommand {
    /// Draw this frame.
    Draw(Box<Snapshot>),
    /// Shutdown the render thread.
    Shutdown,
}
