//! Actor Model: Independently scheduled threads around the shared world.
//!
//! - **Guard / Portal / Trap actors**: entity behaviors, each a loop over a
//!   nondeterministic `select!` of its signal channels with an idle fallback
//! - **Input Actor**: Polls terminal events, forwards to main loop
//! - **Render Actor**: Receives snapshots, draws them
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     InputEvent      ┌──────────────┐  chase/stop_chase  ┌───────┐
//! │ Input Thread │ ─────────────────▶  │              │ ─────────────────▶ │ Guard │
//! └──────────────┘                     │  Main Loop   │  enter/close       ├───────┤
//!                                      │ (dispatcher) │ ─────────────────▶ │Portal │
//! ┌──────────────┐    RenderCommand    │              │  player_near/..    ├───────┤
//! │Render Thread │ ◀────────────────── │              │ ─────────────────▶ │ Trap  │
//! └──────────────┘                     └──────┬───────┘                    └───┬───┘
//!                                             │      SharedWorld (lock)        │
//!                                             └────────────────────────────────┘
//! ```
//!
//! Every signal channel is bounded and written with `try_send`, so a
//! sleeping actor can never stall the main loop.

mod guard;
mod input;
mod mailbox;
mod messages;
mod portal;
mod renderer;
mod trap;

pub use guard::{GuardActor, GuardHandle, GuardInbox, GuardState};
pub use input::{convert_key, InputActor};
pub use mailbox::{signal, Notifier};
pub use messages::{InputEvent, InputKind, RenderCommand};
pub use portal::{PortalActor, PortalEvent, PortalHandle, PortalInbox, Watchdog};
pub use renderer::{RenderStats, RendererActor};
pub use trap::{TrapActor, TrapHandle, TrapInbox, TrapState};

/// Sending sides of every entity's signals.
#[derive(Clone, Debug)]
pub struct EntityHandles {
    /// Guard signals.
    pub guard: GuardHandle,
    /// Portal signals.
    pub portal: PortalHandle,
    /// Trap signals.
    pub trap: TrapHandle,
}

/// Receiving sides of every entity's signals.
#[derive(Debug)]
pub struct EntityInboxes {
    /// Guard signals.
    pub guard: GuardInbox,
    /// Portal signals.
    pub portal: PortalInbox,
    /// Trap signals.
    pub trap: TrapInbox,
}

/// Create all entity channels with the same capacity.
pub fn entity_channels(capacity: usize) -> (EntityHandles, EntityInboxes) {
    let (guard, guard_inbox) = guard::channel(capacity);
    let (portal, portal_inbox) = portal::channel(capacity);
    let (trap, trap_inbox) = trap::channel(capacity);
    (
        EntityHandles { guard, portal, trap },
        EntityInboxes {
            guard: guard_inbox,
            portal: portal_inbox,
            trap: trap_inbox,
        },
    )
}
