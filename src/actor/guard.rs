//! Guard Actor: Patrols at random and chases the player on request.
//!
//! Each iteration multiplexes over `chase` and `stop_chase`:
//! - **chase**: one step toward the player
//! - **stop_chase**: pause one tick without moving
//! - **neither ready**: one random step, then sleep one tick
//!
//! Both moving branches go through [`World::step_entity`], so the guard
//! never leaves the grid or walks through walls, entities or the player.
//!
//! [`World::step_entity`]: crate::world::World::step_entity

use super::mailbox::{signal, Notifier};
use crate::error::{GameError, Result};
use crate::world::{EntityKind, Pos, SharedWorld};
use crossbeam_channel::{never, select, Receiver};
use rand::rngs::StdRng;
use rand::Rng;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info};

/// Senders for the guard's signals.
#[derive(Clone, Debug)]
pub struct GuardHandle {
    /// Step toward the player.
    pub chase: Notifier,
    /// Stop chasing; pause one tick.
    pub stop_chase: Notifier,
}

/// Receivers for the guard's signals.
#[derive(Debug)]
pub struct GuardInbox {
    chase: Receiver<()>,
    stop_chase: Receiver<()>,
}

/// Create the guard's channels.
pub fn channel(capacity: usize) -> (GuardHandle, GuardInbox) {
    let (chase, chase_rx) = signal("guard", "chase", capacity);
    let (stop_chase, stop_rx) = signal("guard", "stop_chase", capacity);
    (
        GuardHandle { chase, stop_chase },
        GuardInbox {
            chase: chase_rx,
            stop_chase: stop_rx,
        },
    )
}

/// What the guard did on its last iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardState {
    /// Took a random step (or tried to).
    Roaming,
    /// Stepped toward the player (or tried to).
    Chasing,
    /// Paused after a `stop_chase`.
    Paused,
}

/// The guard actor.
pub struct GuardActor<R = StdRng> {
    world: Arc<SharedWorld>,
    inbox: GuardInbox,
    home: Pos,
    tick: Duration,
    rng: R,
    state: GuardState,
}

impl<R: Rng + Send + 'static> GuardActor<R> {
    /// Create a guard that starts at `home`.
    pub fn new(world: Arc<SharedWorld>, inbox: GuardInbox, home: Pos, tick: Duration, rng: R) -> Self {
        Self {
            world,
            inbox,
            home,
            tick,
            rng,
            state: GuardState::Roaming,
        }
    }

    /// State after the last iteration.
    #[inline]
    pub const fn state(&self) -> GuardState {
        self.state
    }

    /// Write the guard tile at its home coordinate, if it exists.
    pub fn place(&self) -> bool {
        let placed = self.world.acquire().place_entity(EntityKind::Guard, self.home);
        debug!(x = self.home.x, y = self.home.y, placed, "guard_placed");
        placed
    }

    /// Run one iteration of the multiplexed wait.
    pub fn step(&mut self) -> GuardState {
        let chase = self.inbox.chase.clone();
        let stop_chase = self.inbox.stop_chase.clone();

        self.state = select! {
            recv(chase) -> msg => match msg {
                Ok(()) => self.chase(),
                Err(_) => {
                    self.inbox.chase = never();
                    GuardState::Roaming
                }
            },
            recv(stop_chase) -> msg => match msg {
                Ok(()) => self.pause(),
                Err(_) => {
                    self.inbox.stop_chase = never();
                    GuardState::Roaming
                }
            },
            default => self.roam(),
        };
        self.state
    }

    fn chase(&mut self) -> GuardState {
        let mut world = self.world.acquire();
        let moved = world.entity_pos(EntityKind::Guard).and_then(|at| {
            let (dx, dy) = at.step_toward(world.player());
            world.step_entity(EntityKind::Guard, dx, dy)
        });
        world.release();

        debug!(?moved, "guard_chase");
        GuardState::Chasing
    }

    fn pause(&self) -> GuardState {
        debug!("guard_pause");
        thread::sleep(self.tick);
        GuardState::Paused
    }

    fn roam(&mut self) -> GuardState {
        let dx = self.rng.gen_range(-1..=1);
        let dy = self.rng.gen_range(-1..=1);
        let moved = self.world.acquire().step_entity(EntityKind::Guard, dx, dy);

        if moved.is_some() {
            debug!(dx, dy, ?moved, "guard_roam");
        }
        thread::sleep(self.tick);
        GuardState::Roaming
    }

    /// Place the guard and patrol forever.
    pub fn run(mut self) {
        info!("guard_started");
        self.place();
        loop {
            self.step();
        }
    }

    /// Start the guard on its own thread.
    ///
    /// The guard has no shutdown path; the thread ends with the process.
    pub fn spawn(self) -> Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("gridwalk-guard".to_string())
            .spawn(move || self.run())
            .map_err(|source| GameError::Spawn { name: "guard", source })
    }
}
