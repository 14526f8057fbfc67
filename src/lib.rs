//! # Gridwalk
//!
//! A terminal exploration game on a character-tile map.
//!
//! The player walks a grid of walls and vegetation while three entities
//! live on their own threads: a guard that roams and chases, a portal that
//! teleports the player and vanishes after inactivity, and a trap.
//!
//! ## Core Concepts
//!
//! - **Shared world**: grid, player position and the displaced-tile
//!   register behind one lock ([`SharedWorld`])
//! - **Actor model**: one thread per entity, each waiting on its own
//!   bounded signal channels with an idle fallback
//! - **Fire-and-forget signals**: the dispatcher never blocks on an actor
//! - **Single-write frames**: each snapshot is drawn into one ANSI buffer
//!
//! ## Example
//!
//! ```rust,no_run
//! use gridwalk::{load_map, Game, GameConfig, InputEvent};
//!
//! let config = GameConfig::default();
//! let map = load_map("map.txt".as_ref())?;
//! let mut game = Game::start(map.into_world(), &config)?;
//! game.dispatch(&InputEvent::movement('d'));
//! println!("{}", game.snapshot().status);
//! # Ok::<(), gridwalk::GameError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod game;
pub mod session;
pub mod terminal;
pub mod world;

// Re-exports for convenience
pub use actor::{EntityHandles, InputEvent, InputKind, RenderCommand};
pub use config::GameConfig;
pub use dispatch::{Direction, Dispatcher, Flow, MoveOutcome};
pub use error::{GameError, Result};
pub use game::Game;
pub use world::map::{load_map, parse_map};
pub use world::{EntityKind, Grid, Pos, SharedWorld, Snapshot, Tile, World};
