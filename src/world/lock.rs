//! The world lock.
//!
//! Every read or write of the grid, the player position, the displaced
//! register or the entity slots happens inside a critical section opened by
//! [`SharedWorld::acquire`]. Exactly one [`WorldGuard`] exists at a time.
//!
//! Never send on a channel or sleep while holding a guard: decide under the
//! lock, release it, then notify.

use super::{Snapshot, StatusLine, World};
use std::ops::{Deref, DerefMut};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// The world plus its lock, shared by the dispatcher and every actor.
#[derive(Debug)]
pub struct SharedWorld {
    world: Mutex<World>,
    status: StatusLine,
}

impl SharedWorld {
    /// Wrap a freshly loaded world.
    pub fn new(world: World) -> Self {
        Self {
            world: Mutex::new(world),
            status: StatusLine::default(),
        }
    }

    /// Block until the critical section is free and enter it.
    ///
    /// A mover that panicked mid-section leaves the world as it was after
    /// its last completed write, so a poisoned lock is entered anyway.
    pub fn acquire(&self) -> WorldGuard<'_> {
        WorldGuard {
            inner: self.world.lock().unwrap_or_else(PoisonError::into_inner),
        }
    }

    /// The status line. Not covered by the world lock.
    #[inline]
    pub const fn status(&self) -> &StatusLine {
        &self.status
    }

    /// Copy the world and the current status for drawing.
    pub fn snapshot(&self) -> Snapshot {
        let status = self.status.get();
        self.acquire().snapshot(status)
    }
}

/// An open critical section. Dropping it releases the lock.
pub struct WorldGuard<'a> {
    inner: MutexGuard<'a, World>,
}

impl WorldGuard<'_> {
    /// Leave the critical section.
    #[inline]
    pub fn release(self) {
        drop(self);
    }
}

impl Deref for WorldGuard<'_> {
    type Target = World;

    #[inline]
    fn deref(&self) -> &World {
        &self.inner
    }
}

impl DerefMut for WorldGuard<'_> {
    #[inline]
    fn deref_mut(&mut self) -> &mut World {
        &mut self.inner
    }
}
