//! Portal Actor: Reports entries and closes after inactivity.
//!
//! Every iteration waits on `enter`, `close` and a fresh inactivity timeout
//! at once. Whatever fires first sets the status line and re-arms the
//! [`Watchdog`]; the timeout is a per-iteration deadline, not a global one.
//!
//! Two drivers share the same reactions:
//! - [`PortalActor::step`] blocks (used by the actor thread)
//! - [`PortalActor::poll`] never blocks and takes the current instant from
//!   the caller, so the inactivity rule can be checked with synthetic time

use super::mailbox::{signal, Notifier};
use crate::error::{GameError, Result};
use crate::world::status::messages;
use crate::world::{EntityKind, Pos, SharedWorld};
use crossbeam_channel::{never, select, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Senders for the portal's signals.
#[derive(Clone, Debug)]
pub struct PortalHandle {
    /// The player walked into the portal.
    pub enter: Notifier,
    /// Close the portal.
    pub close: Notifier,
}

/// Receivers for the portal's signals.
#[derive(Debug)]
pub struct PortalInbox {
    enter: Receiver<()>,
    close: Receiver<()>,
}

/// Create the portal's channels.
pub fn channel(capacity: usize) -> (PortalHandle, PortalInbox) {
    let (enter, enter_rx) = signal("portal", "enter", capacity);
    let (close, close_rx) = signal("portal", "close", capacity);
    (
        PortalHandle { enter, close },
        PortalInbox {
            enter: enter_rx,
            close: close_rx,
        },
    )
}

/// What woke the portal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PortalEvent {
    /// An `enter` signal.
    Entered,
    /// A `close` signal.
    Closed,
    /// The watchdog expired.
    Vanished,
}

impl PortalEvent {
    /// Status message for this event.
    pub const fn message(self) -> &'static str {
        match self {
            Self::Entered => messages::PORTAL_ENTERED,
            Self::Closed => messages::PORTAL_CLOSED,
            Self::Vanished => messages::PORTAL_VANISHED,
        }
    }
}

/// Inactivity deadline, re-armed after every event.
#[derive(Clone, Copy, Debug)]
pub struct Watchdog {
    timeout: Duration,
    deadline: Instant,
}

impl Watchdog {
    /// Arm a watchdog at `now`.
    pub fn new(timeout: Duration, now: Instant) -> Self {
        Self {
            timeout,
            deadline: now + timeout,
        }
    }

    /// Re-arm from `now`.
    #[inline]
    pub fn reset(&mut self, now: Instant) {
        self.deadline = now + self.timeout;
    }

    /// Time left before expiry.
    #[inline]
    pub fn remaining(&self, now: Instant) -> Duration {
        self.deadline.saturating_duration_since(now)
    }

    /// Whether the full timeout has elapsed since the last reset.
    #[inline]
    pub fn expired(&self, now: Instant) -> bool {
        now >= self.deadline
    }
}

/// The portal actor.
pub struct PortalActor {
    world: Arc<SharedWorld>,
    inbox: PortalInbox,
    home: Pos,
    watchdog: Watchdog,
}

impl PortalActor {
    /// Create a portal at `home`, arming the watchdog now.
    pub fn new(world: Arc<SharedWorld>, inbox: PortalInbox, home: Pos, timeout: Duration) -> Self {
        Self::with_start(world, inbox, home, timeout, Instant::now())
    }

    /// Create a portal whose watchdog was armed at `start`.
    pub fn with_start(
        world: Arc<SharedWorld>,
        inbox: PortalInbox,
        home: Pos,
        timeout: Duration,
        start: Instant,
    ) -> Self {
        Self {
            world,
            inbox,
            home,
            watchdog: Watchdog::new(timeout, start),
        }
    }

    /// Write the portal tile at its home coordinate, if it exists.
    pub fn place(&self) -> bool {
        let placed = self.world.acquire().place_entity(EntityKind::Portal, self.home);
        debug!(x = self.home.x, y = self.home.y, placed, "portal_placed");
        placed
    }

    fn react(&mut self, event: PortalEvent, now: Instant) -> PortalEvent {
        self.world.status().set(event.message());
        self.watchdog.reset(now);
        debug!(?event, "portal_event");
        event
    }

    /// Evaluate pending signals at `now` without blocking.
    ///
    /// Returns `None` if nothing was pending and the watchdog has not expired.
    pub fn poll(&mut self, now: Instant) -> Option<PortalEvent> {
        let enter = self.inbox.enter.clone();
        let close = self.inbox.close.clone();

        let event = select! {
            recv(enter) -> msg => match msg {
                Ok(()) => Some(PortalEvent::Entered),
                Err(_) => {
                    self.inbox.enter = never();
                    None
                }
            },
            recv(close) -> msg => match msg {
                Ok(()) => Some(PortalEvent::Closed),
                Err(_) => {
                    self.inbox.close = never();
                    None
                }
            },
            default => self.watchdog.expired(now).then_some(PortalEvent::Vanished),
        };
        event.map(|event| self.react(event, now))
    }

    /// Block until a signal arrives or the watchdog expires.
    ///
    /// A disconnected channel is dropped from the wait and the iteration
    /// yields `None`.
    pub fn step(&mut self) -> Option<PortalEvent> {
        let enter = self.inbox.enter.clone();
        let close = self.inbox.close.clone();
        let wait = self.watchdog.remaining(Instant::now());

        let event = select! {
            recv(enter) -> msg => match msg {
                Ok(()) => Some(PortalEvent::Entered),
                Err(_) => {
                    self.inbox.enter = never();
                    None
                }
            },
            recv(close) -> msg => match msg {
                Ok(()) => Some(PortalEvent::Closed),
                Err(_) => {
                    self.inbox.close = never();
                    None
                }
            },
            default(wait) => Some(PortalEvent::Vanished),
        };
        event.map(|event| self.react(event, Instant::now()))
    }

    /// Place the portal and serve signals forever.
    pub fn run(mut self) {
        info!("portal_started");
        self.place();
        self.watchdog.reset(Instant::now());
        loop {
            self.step();
        }
    }

    /// Start the portal on its own thread.
    ///
    /// The portal has no shutdown path; the thread ends with the process.
    pub fn spawn(self) -> Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("gridwalk-portal".to_string())
            .spawn(move || self.run())
            .map_err(|source| GameError::Spawn { name: "portal", source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Grid, Tile, World};

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn portal(start: Instant) -> (PortalActor, PortalHandle, Arc<SharedWorld>) {
        let world = World::new(Grid::filled(6, 6, Tile::EMPTY), Pos::new(0, 0));
        let shared = Arc::new(SharedWorld::new(world));
        let (handle, inbox) = channel(4);
        let portal = PortalActor::with_start(Arc::clone(&shared), inbox, Pos::new(4, 4), TIMEOUT, start);
        (portal, handle, shared)
    }

    #[test]
    fn test_watchdog() {
        let t0 = Instant::now();
        let mut dog = Watchdog::new(TIMEOUT, t0);
        assert!(!dog.expired(t0));
        assert!(!dog.expired(t0 + Duration::from_millis(4999)));
        assert!(dog.expired(t0 + TIMEOUT));
        assert_eq!(dog.remaining(t0 + Duration::from_secs(2)), Duration::from_secs(3));
        assert_eq!(dog.remaining(t0 + Duration::from_secs(9)), Duration::ZERO);

        dog.reset(t0 + Duration::from_secs(4));
        assert!(!dog.expired(t0 + Duration::from_secs(8)));
        assert!(dog.expired(t0 + Duration::from_secs(9)));
    }

    #[test]
    fn test_place() {
        let (portal, _handle, shared) = portal(Instant::now());
        assert!(portal.place());
        assert_eq!(shared.acquire().grid().get(Pos::new(4, 4)), Some(Tile::PORTAL));
    }

    #[test]
    fn test_timeout_fires_only_after_full_inactivity() {
        let t0 = Instant::now();
        let (mut portal, _handle, shared) = portal(t0);

        assert_eq!(portal.poll(t0 + Duration::from_secs(1)), None);
        assert_eq!(portal.poll(t0 + Duration::from_millis(4999)), None);
        assert_eq!(shared.status().get(), "");

        assert_eq!(portal.poll(t0 + TIMEOUT), Some(PortalEvent::Vanished));
        assert_eq!(shared.status().get(), messages::PORTAL_VANISHED);

        // Re-armed by the timeout itself.
        assert_eq!(portal.poll(t0 + Duration::from_secs(6)), None);
        assert_eq!(portal.poll(t0 + Duration::from_secs(10)), Some(PortalEvent::Vanished));
    }

    #[test]
    fn test_signals_reset_the_watchdog() {
        let t0 = Instant::now();
        let (mut portal, handle, shared) = portal(t0);

        handle.enter.notify();
        assert_eq!(portal.poll(t0 + Duration::from_secs(4)), Some(PortalEvent::Entered));
        assert_eq!(shared.status().get(), messages::PORTAL_ENTERED);

        // 5s after start but only 1s after the entry.
        assert_eq!(portal.poll(t0 + TIMEOUT), None);

        handle.close.notify();
        assert_eq!(portal.poll(t0 + Duration::from_secs(8)), Some(PortalEvent::Closed));
        assert_eq!(shared.status().get(), messages::PORTAL_CLOSED);

        assert_eq!(portal.poll(t0 + Duration::from_secs(12)), None);
        assert_eq!(portal.poll(t0 + Duration::from_secs(13)), Some(PortalEvent::Vanished));
    }

    #[test]
    fn test_pending_signal_wins_over_expired_watchdog() {
        let t0 = Instant::now();
        let (mut portal, handle, _shared) = portal(t0);

        handle.enter.notify();
        assert_eq!(portal.poll(t0 + Duration::from_secs(60)), Some(PortalEvent::Entered));
    }

    #[test]
    fn test_step_blocks_until_timeout() {
        let world = World::new(Grid::filled(1, 1, Tile::EMPTY), Pos::new(0, 0));
        let shared = Arc::new(SharedWorld::new(world));
        let (_handle, inbox) = channel(4);
        let mut portal = PortalActor::new(Arc::clone(&shared), inbox, Pos::new(4, 4), Duration::from_millis(20));

        let start = Instant::now();
        assert_eq!(portal.step(), Some(PortalEvent::Vanished));
        assert!(start.elapsed() >= Duration::from_millis(15));
        assert_eq!(shared.status().get(), messages::PORTAL_VANISHED);
    }

    #[test]
    fn test_step_on_thread() {
        let world = World::new(Grid::filled(6, 6, Tile::EMPTY), Pos::new(0, 0));
        let shared = Arc::new(SharedWorld::new(world));
        let (handle, inbox) = channel(4);
        PortalActor::new(Arc::clone(&shared), inbox, Pos::new(4, 4), Duration::from_secs(30))
            .spawn()
            .unwrap();

        handle.enter.notify();
        let deadline = Instant::now() + Duration::from_secs(5);
        while shared.status().get() != messages::PORTAL_ENTERED {
            assert!(Instant::now() < deadline, "portal never reacted");
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(shared.acquire().entity_pos(EntityKind::Portal), Some(Pos::new(4, 4)));
    }
}
