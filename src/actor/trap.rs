//! Trap Actor: Stationary, reacts to proximity, can be disabled for good.

use super::mailbox::{signal, Notifier};
use crate::error::{GameError, Result};
use crate::world::status::messages;
use crate::world::{EntityKind, Pos, SharedWorld};
use crossbeam_channel::{never, select, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info};

/// Senders for the trap's signals.
#[derive(Clone, Debug)]
pub struct TrapHandle {
    /// The player stepped onto the trap.
    pub player_near: Notifier,
    /// Something other than the player triggered the trap.
    ///
    /// Nothing in the game sends this yet.
    pub other_near: Notifier,
    /// Disable the trap and stop its actor.
    pub disable: Notifier,
}

/// Receivers for the trap's signals.
#[derive(Debug)]
pub struct TrapInbox {
    player_near: Receiver<()>,
    other_near: Receiver<()>,
    disable: Receiver<()>,
}

/// Create the trap's channels.
pub fn channel(capacity: usize) -> (TrapHandle, TrapInbox) {
    let (player_near, player_rx) = signal("trap", "player_near", capacity);
    let (other_near, other_rx) = signal("trap", "other_near", capacity);
    let (disable, disable_rx) = signal("trap", "disable", capacity);
    (
        TrapHandle {
            player_near,
            other_near,
            disable,
        },
        TrapInbox {
            player_near: player_rx,
            other_near: other_rx,
            disable: disable_rx,
        },
    )
}

/// Trap lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrapState {
    /// Armed and listening.
    Active,
    /// Terminal: the actor loop has exited.
    Disabled,
}

/// The trap actor.
pub struct TrapActor {
    world: Arc<SharedWorld>,
    inbox: TrapInbox,
    home: Pos,
    tick: Duration,
    state: TrapState,
}

impl TrapActor {
    /// Create a trap at `home`.
    pub fn new(world: Arc<SharedWorld>, inbox: TrapInbox, home: Pos, tick: Duration) -> Self {
        Self {
            world,
            inbox,
            home,
            tick,
            state: TrapState::Active,
        }
    }

    /// Current lifecycle state.
    #[inline]
    pub const fn state(&self) -> TrapState {
        self.state
    }

    /// Write the trap tile at its home coordinate, if it exists.
    pub fn place(&self) -> bool {
        let placed = self.world.acquire().place_entity(EntityKind::Trap, self.home);
        debug!(x = self.home.x, y = self.home.y, placed, "trap_placed");
        placed
    }

    /// Run one iteration of the multiplexed wait.
    ///
    /// A dropped `disable` sender leaves nobody able to stop the trap, so it
    /// is treated as a silent disable.
    pub fn step(&mut self) -> TrapState {
        if self.state == TrapState::Disabled {
            return TrapState::Disabled;
        }

        let player_near = self.inbox.player_near.clone();
        let other_near = self.inbox.other_near.clone();
        let disable = self.inbox.disable.clone();

        select! {
            recv(player_near) -> msg => match msg {
                Ok(()) => self.report(messages::TRAP_SPRUNG),
                Err(_) => self.inbox.player_near = never(),
            },
            recv(other_near) -> msg => match msg {
                Ok(()) => self.report(messages::TRAP_OTHER),
                Err(_) => self.inbox.other_near = never(),
            },
            recv(disable) -> msg => {
                if msg.is_ok() {
                    self.report(messages::TRAP_DISABLED);
                }
                self.state = TrapState::Disabled;
            },
            default => thread::sleep(self.tick),
        }
        self.state
    }

    fn report(&self, message: &'static str) {
        debug!(message, "trap_triggered");
        self.world.status().set(message);
    }

    /// Place the trap and serve signals until disabled.
    pub fn run(mut self) {
        info!("trap_started");
        self.place();
        while self.step() == TrapState::Active {}
        info!("trap_disabled");
    }

    /// Start the trap on its own thread. Join it after sending `disable`.
    pub fn spawn(self) -> Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("gridwalk-trap".to_string())
            .spawn(move || self.run())
            .map_err(|source| GameError::Spawn { name: "trap", source })
    }
}
