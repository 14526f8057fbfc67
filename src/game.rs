//! Game assembly: shared world, entity actors and the dispatcher.

use crate::actor::{entity_channels, GuardActor, InputEvent, PortalActor, TrapActor};
use crate::config::GameConfig;
use crate::dispatch::{Dispatcher, Flow};
use crate::error::Result;
use crate::world::{SharedWorld, Snapshot, World};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::{info, warn};

/// A running game.
///
/// The guard and portal threads run for the rest of the process; only the
/// trap can be told to stop.
pub struct Game {
    world: Arc<SharedWorld>,
    dispatcher: Dispatcher,
    trap_thread: Option<JoinHandle<()>>,
}

impl Game {
    /// Share `world` and spawn one thread per entity.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Spawn`](crate::GameError::Spawn) if a thread
    /// cannot be created.
    pub fn start(world: World, config: &GameConfig) -> Result<Self> {
        let entities = &config.entities;
        let timing = &config.timing;

        let mut capacity = entities.mailbox_capacity;
        if capacity == 0 {
            warn!("mailbox_capacity is 0, using 1");
            capacity = 1;
        }

        let world = Arc::new(SharedWorld::new(world));
        let (handles, inboxes) = entity_channels(capacity);

        GuardActor::new(
            Arc::clone(&world),
            inboxes.guard,
            entities.guard,
            timing.tick,
            StdRng::from_entropy(),
        )
        .spawn()?;
        PortalActor::new(Arc::clone(&world), inboxes.portal, entities.portal, timing.portal_timeout).spawn()?;
        let trap_thread = TrapActor::new(Arc::clone(&world), inboxes.trap, entities.trap, timing.tick).spawn()?;

        info!(
            guard = ?entities.guard,
            portal = ?entities.portal,
            trap = ?entities.trap,
            "game_started"
        );

        let dispatcher = Dispatcher::new(Arc::clone(&world), handles, entities.teleport_target, entities.guard_sight);
        Ok(Self {
            world,
            dispatcher,
            trap_thread: Some(trap_thread),
        })
    }

    /// The shared world.
    #[inline]
    pub const fn world(&self) -> &Arc<SharedWorld> {
        &self.world
    }

    /// Handle one input event.
    pub fn dispatch(&mut self, event: &InputEvent) -> Flow {
        self.dispatcher.dispatch(event)
    }

    /// Copy the world and status line for drawing.
    pub fn snapshot(&self) -> Snapshot {
        self.world.snapshot()
    }

    /// Disable the trap and wait for its thread.
    pub fn shutdown(&mut self) {
        if let Some(thread) = self.trap_thread.take() {
            self.dispatcher.handles().trap.disable.notify();
            if thread.join().is_err() {
                warn!("trap thread panicked");
            }
            info!("game_stopped");
        }
    }
}

impl Drop for Game {
    fn drop(&mut self) {
        self.shutdown();
    }
}
