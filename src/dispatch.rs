//! Player Action Dispatcher.
//!
//! Turns one [`InputEvent`] at a time into world changes. The collision
//! decision and the move itself happen inside one critical section; status
//! updates and actor notifications happen after the lock is released, and
//! notifications never block.

use crate::actor::{EntityHandles, InputEvent, InputKind};
use crate::world::status::messages;
use crate::world::{EntityKind, Pos, SharedWorld, World};
use std::sync::Arc;
use tracing::debug;

/// Whether the game loop should keep going.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    /// Keep running.
    Continue,
    /// Leave the game loop.
    Quit,
}

/// A unit move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// `w`
    Up,
    /// `a`
    Left,
    /// `s`
    Down,
    /// `d`
    Right,
}

impl Direction {
    /// Resolve a movement key. Unbound keys yield `None`.
    pub const fn from_key(key: char) -> Option<Self> {
        match key {
            'w' => Some(Self::Up),
            'a' => Some(Self::Left),
            's' => Some(Self::Down),
            'd' => Some(Self::Right),
            _ => None,
        }
    }

    /// `(dx, dy)` for this direction.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Left => (-1, 0),
            Self::Down => (0, 1),
            Self::Right => (1, 0),
        }
    }
}

/// Result of one player move attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Target outside the grid. Nothing changed.
    OutOfBounds,
    /// Target tangible. Nothing changed.
    Blocked,
    /// Player stepped to the new position.
    Moved(Pos),
    /// Target is the trap. The player did not move.
    Trapped,
    /// Target is the portal. The player is now at the given position.
    Teleported(Pos),
}

/// Decide and apply one player step. The caller holds the world lock.
pub fn resolve_move(world: &mut World, direction: Direction, teleport_to: Pos) -> MoveOutcome {
    let (dx, dy) = direction.delta();
    let from = world.player();
    let to = from.offset(dx, dy);

    let Some(target) = world.grid().get(to) else {
        return MoveOutcome::OutOfBounds;
    };

    match EntityKind::from_tile(target) {
        Some(EntityKind::Trap) => MoveOutcome::Trapped,
        Some(EntityKind::Portal) => teleport(world, from, teleport_to),
        _ if target.is_tangible() => MoveOutcome::Blocked,
        _ => {
            // An entity sharing the player's cell keeps its tile.
            if world.entity_at(from).is_none() {
                world.move_tile(from, dx, dy);
            }
            world.set_player(to);
            MoveOutcome::Moved(to)
        }
    }
}

/// Relocate the player through the displaced register.
///
/// An off-grid target leaves the player in place. When either end holds an
/// entity only the player marker moves, so the entity keeps its tile.
fn teleport(world: &mut World, from: Pos, to: Pos) -> MoveOutcome {
    if !world.grid().contains(to) {
        return MoveOutcome::Teleported(from);
    }
    if world.entity_at(from).is_none() && world.entity_at(to).is_none() {
        world.transfer(from, to);
    }
    world.set_player(to);
    MoveOutcome::Teleported(to)
}

/// The dispatcher.
pub struct Dispatcher {
    world: Arc<SharedWorld>,
    handles: EntityHandles,
    teleport_to: Pos,
    guard_sight: u32,
    guard_alerted: bool,
}

impl Dispatcher {
    /// Create a dispatcher that notifies the actors behind `handles`.
    pub const fn new(world: Arc<SharedWorld>, handles: EntityHandles, teleport_to: Pos, guard_sight: u32) -> Self {
        Self {
            world,
            handles,
            teleport_to,
            guard_sight,
            guard_alerted: false,
        }
    }

    /// The actor handles.
    #[inline]
    pub const fn handles(&self) -> &EntityHandles {
        &self.handles
    }

    /// Handle one input event.
    pub fn dispatch(&mut self, event: &InputEvent) -> Flow {
        match event.kind {
            InputKind::Quit => return Flow::Quit,
            InputKind::Interact => self.interact(),
            InputKind::Move => {
                if let Some(direction) = Direction::from_key(event.key) {
                    self.move_player(direction);
                }
            }
        }
        Flow::Continue
    }

    fn interact(&self) {
        let at = self.world.acquire().player();
        self.world.status().set(messages::interacting(at.x, at.y));
    }

    /// Move the player one step and report what happened.
    pub fn move_player(&mut self, direction: Direction) -> MoveOutcome {
        let mut world = self.world.acquire();
        let outcome = resolve_move(&mut world, direction, self.teleport_to);
        let guard = world.entity_pos(EntityKind::Guard);
        world.release();

        debug!(?direction, ?outcome, "player_move");
        match outcome {
            MoveOutcome::Trapped => {
                self.world.status().set(messages::GAME_OVER);
                self.handles.trap.player_near.notify();
            }
            MoveOutcome::Teleported(at) => {
                self.world.status().set(messages::TELEPORTED);
                self.handles.portal.enter.notify();
                self.watch_guard(at, guard);
            }
            MoveOutcome::Moved(at) => self.watch_guard(at, guard),
            MoveOutcome::OutOfBounds | MoveOutcome::Blocked => {}
        }
        outcome
    }

    /// Tell the guard to chase while the player is in sight, and to stop
    /// once when the player leaves it.
    fn watch_guard(&mut self, player: Pos, guard: Option<Pos>) {
        let in_sight = guard.is_some_and(|g| g.chebyshev(player) <= self.guard_sight);
        if in_sight {
            self.handles.guard.chase.notify();
            self.guard_alerted = true;
        } else if self.guard_alerted {
            self.handles.guard.stop_chase.notify();
            self.guard_alerted = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{entity_channels, EntityInboxes};
    use crate::world::map::parse_map;
    use crate::world::{Grid, Tile};

    const TELEPORT: Pos = Pos::new(1, 1);

    fn dispatcher(world: World) -> (Dispatcher, EntityInboxes, Arc<SharedWorld>) {
        let shared = Arc::new(SharedWorld::new(world));
        let (handles, inboxes) = entity_channels(4);
        let dispatcher = Dispatcher::new(Arc::clone(&shared), handles, TELEPORT, 0);
        (dispatcher, inboxes, shared)
    }

    fn open_world(player: Pos) -> World {
        World::new(Grid::filled(8, 8, Tile::EMPTY), player)
    }

    #[test]
    fn test_direction_keys() {
        assert_eq!(Direction::from_key('w').map(Direction::delta), Some((0, -1)));
        assert_eq!(Direction::from_key('a').map(Direction::delta), Some((-1, 0)));
        assert_eq!(Direction::from_key('s').map(Direction::delta), Some((0, 1)));
        assert_eq!(Direction::from_key('d').map(Direction::delta), Some((1, 0)));
        assert_eq!(Direction::from_key('q'), None);
    }

    #[test]
    fn test_quit_and_interact() {
        let (mut d, _inboxes, shared) = dispatcher(open_world(Pos::new(3, 4)));
        assert_eq!(d.dispatch(&InputEvent::quit()), Flow::Quit);
        assert_eq!(shared.status().get(), "");

        assert_eq!(d.dispatch(&InputEvent::interact()), Flow::Continue);
        assert_eq!(shared.status().get(), "Interacting at (3, 4)");
        assert_eq!(shared.acquire().player(), Pos::new(3, 4));
    }

    #[test]
    fn test_small_map_scenario() {
        let (mut d, _inboxes, shared) = dispatcher(parse_map("☺ \n▤▤\n").into_world());
        assert_eq!(shared.acquire().player(), Pos::new(0, 0));

        // Right onto empty floor.
        assert_eq!(d.dispatch(&InputEvent::movement('d')), Flow::Continue);
        assert_eq!(shared.acquire().player(), Pos::new(1, 0));

        // Down into the wall.
        let grid = shared.acquire().grid().clone();
        assert_eq!(d.move_player(Direction::Down), MoveOutcome::Blocked);
        assert_eq!(shared.acquire().player(), Pos::new(1, 0));
        assert_eq!(shared.acquire().grid(), &grid);
        assert_eq!(shared.status().get(), "");

        // Off the top edge.
        assert_eq!(d.move_player(Direction::Up), MoveOutcome::OutOfBounds);
        assert_eq!(shared.acquire().player(), Pos::new(1, 0));
    }

    #[test]
    fn test_move_is_a_single_step() {
        let (mut d, _inboxes, shared) = dispatcher(open_world(Pos::new(1, 3)));
        assert_eq!(d.move_player(Direction::Right), MoveOutcome::Moved(Pos::new(2, 3)));
        assert_eq!(shared.acquire().player(), Pos::new(2, 3));
    }

    #[test]
    fn test_unknown_key_is_ignored() {
        let (mut d, _inboxes, shared) = dispatcher(open_world(Pos::new(1, 3)));
        let before = shared.acquire().clone();
        assert_eq!(d.dispatch(&InputEvent::movement('x')), Flow::Continue);
        assert_eq!(shared.acquire().player(), before.player());
        assert_eq!(shared.acquire().grid(), before.grid());
    }

    #[test]
    fn test_tangible_collision_changes_nothing() {
        let mut grid = Grid::filled(8, 8, Tile::EMPTY);
        grid.set(Pos::new(2, 3), Tile::ENEMY);
        let mut world = World::new(grid, Pos::new(2, 2));
        world.place_entity(EntityKind::Guard, Pos::new(3, 2));
        let (mut d, _inboxes, shared) = dispatcher(world);
        shared.status().set("unchanged");
        let before = shared.acquire().clone();

        assert_eq!(d.move_player(Direction::Right), MoveOutcome::Blocked);
        assert_eq!(d.move_player(Direction::Down), MoveOutcome::Blocked);

        let after = shared.acquire();
        assert_eq!(after.player(), before.player());
        assert_eq!(after.grid(), before.grid());
        assert_eq!(after.displaced(), before.displaced());
        assert_eq!(shared.status().get(), "unchanged");
    }

    #[test]
    fn test_trap_collision() {
        let mut world = open_world(Pos::new(5, 6));
        world.place_entity(EntityKind::Trap, Pos::new(6, 6));
        let (mut d, inboxes, shared) = dispatcher(world);
        let grid = shared.acquire().grid().clone();

        assert_eq!(d.dispatch(&InputEvent::movement('d')), Flow::Continue);
        assert_eq!(shared.acquire().player(), Pos::new(5, 6));
        assert_eq!(shared.acquire().grid(), &grid);
        assert_eq!(shared.status().get(), messages::GAME_OVER);

        let mut trap = crate::actor::TrapActor::new(
            Arc::clone(&shared),
            inboxes.trap,
            Pos::new(6, 6),
            std::time::Duration::ZERO,
        );
        trap.step();
        assert_eq!(shared.status().get(), messages::TRAP_SPRUNG);
    }

    #[test]
    fn test_portal_collision_teleports_from_anywhere() {
        for (player, portal, key) in [
            (Pos::new(3, 4), Pos::new(4, 4), 'd'),
            (Pos::new(6, 6), Pos::new(6, 5), 'w'),
            (Pos::new(0, 7), Pos::new(0, 6), 'w'),
        ] {
            let mut world = open_world(player);
            world.place_entity(EntityKind::Portal, portal);
            let (mut d, inboxes, shared) = dispatcher(world);

            assert_eq!(d.dispatch(&InputEvent::movement(key)), Flow::Continue);
            assert_eq!(shared.acquire().player(), TELEPORT);
            assert_eq!(shared.status().get(), messages::TELEPORTED);

            let mut portal_actor = crate::actor::PortalActor::new(
                Arc::clone(&shared),
                inboxes.portal,
                portal,
                std::time::Duration::from_secs(5),
            );
            assert_eq!(
                portal_actor.poll(std::time::Instant::now()),
                Some(crate::actor::PortalEvent::Entered)
            );
        }
    }

    #[test]
    fn test_teleport_keeps_portal_and_register_consistent() {
        let mut grid = Grid::filled(6, 6, Tile::EMPTY);
        grid.set(TELEPORT, Tile::VEGETATION);
        let mut world = World::new(grid, Pos::new(3, 4));
        world.place_entity(EntityKind::Portal, Pos::new(4, 4));
        let (mut d, _inboxes, shared) = dispatcher(world);

        assert_eq!(d.move_player(Direction::Right), MoveOutcome::Teleported(TELEPORT));
        let world = shared.acquire();
        assert_eq!(world.grid().get(Pos::new(4, 4)), Some(Tile::PORTAL));
        assert_eq!(world.grid().get(Pos::new(3, 4)), Some(Tile::EMPTY));
        assert_eq!(world.displaced(), Tile::VEGETATION);
    }

    #[test]
    fn test_teleport_target_outside_grid() {
        let mut world = World::new(Grid::filled(3, 1, Tile::EMPTY), Pos::new(0, 0));
        world.place_entity(EntityKind::Portal, Pos::new(1, 0));
        let (mut d, _inboxes, shared) = dispatcher(world);

        assert_eq!(d.move_player(Direction::Right), MoveOutcome::Teleported(Pos::new(0, 0)));
        assert_eq!(shared.acquire().player(), Pos::new(0, 0));
        assert_eq!(shared.status().get(), messages::TELEPORTED);
    }

    #[test]
    fn test_teleport_onto_guard_keeps_guard_tile() {
        let mut world = open_world(Pos::new(3, 4));
        world.place_entity(EntityKind::Portal, Pos::new(4, 4));
        world.place_entity(EntityKind::Guard, TELEPORT);
        let (mut d, _inboxes, shared) = dispatcher(world);

        assert_eq!(d.move_player(Direction::Right), MoveOutcome::Teleported(TELEPORT));
        assert_eq!(shared.acquire().grid().get(TELEPORT), Some(Tile::GUARD));
    }

    fn guard_tiles(world: &World) -> Vec<Pos> {
        let mut found = Vec::new();
        for (y, row) in (0..).zip(world.grid().rows()) {
            for (x, tile) in (0..).zip(row) {
                if *tile == Tile::GUARD {
                    found.push(Pos::new(x, y));
                }
            }
        }
        found
    }

    fn assert_guard_in_sync(world: &World) {
        let at = world.entity_pos(EntityKind::Guard).unwrap();
        assert_eq!(world.grid().get(at), Some(Tile::GUARD));
        assert_eq!(guard_tiles(world), vec![at]);
    }

    #[test]
    fn test_stepping_off_a_shared_cell_leaves_the_guard_tile() {
        let mut world = open_world(Pos::new(3, 4));
        world.place_entity(EntityKind::Portal, Pos::new(4, 4));
        world.place_entity(EntityKind::Guard, TELEPORT);
        let (mut d, _inboxes, shared) = dispatcher(world);

        assert_eq!(d.move_player(Direction::Right), MoveOutcome::Teleported(TELEPORT));
        assert_eq!(d.move_player(Direction::Right), MoveOutcome::Moved(Pos::new(2, 1)));
        assert_guard_in_sync(&shared.acquire());

        let mut world = shared.acquire();
        assert_eq!(world.step_entity(EntityKind::Guard, 0, 1), Some(Pos::new(1, 2)));
        assert_guard_in_sync(&world);
    }

    #[test]
    fn test_teleport_onto_guard_then_walk_away() {
        let mut world = open_world(Pos::new(3, 4));
        world.place_entity(EntityKind::Portal, Pos::new(4, 4));
        world.place_entity(EntityKind::Guard, TELEPORT);
        let (mut d, _inboxes, shared) = dispatcher(world);

        assert_eq!(d.move_player(Direction::Right), MoveOutcome::Teleported(TELEPORT));
        assert_eq!(d.move_player(Direction::Down), MoveOutcome::Moved(Pos::new(1, 2)));
        assert_eq!(d.move_player(Direction::Right), MoveOutcome::Moved(Pos::new(2, 2)));

        let mut world = shared.acquire();
        assert_guard_in_sync(&world);
        assert_eq!(world.grid().get(Pos::new(4, 4)), Some(Tile::PORTAL));
        assert!(world.step_entity(EntityKind::Guard, -1, 0).is_some());
        assert_guard_in_sync(&world);
    }

    #[test]
    fn test_start_on_entity_home_keeps_entity_tiles() {
        let mut map = String::new();
        for y in 0..5 {
            for x in 0..5 {
                map.push(if (x, y) == (2, 2) { '☺' } else { ' ' });
            }
            map.push('\n');
        }
        let mut world = parse_map(&map).into_world();
        assert!(world.place_entity(EntityKind::Guard, Pos::new(2, 2)));
        let (mut d, _inboxes, shared) = dispatcher(world);

        assert_eq!(d.move_player(Direction::Right), MoveOutcome::Moved(Pos::new(3, 2)));
        let world = shared.acquire();
        assert_eq!(world.entity_pos(EntityKind::Guard), Some(Pos::new(2, 2)));
        assert_guard_in_sync(&world);
        assert_eq!(world.grid().get(Pos::new(3, 2)), Some(Tile::EMPTY));
    }

    #[test]
    fn test_start_on_trap_home_keeps_trap_tile() {
        let mut world = open_world(Pos::new(6, 6));
        world.place_entity(EntityKind::Trap, Pos::new(6, 6));
        let (mut d, _inboxes, shared) = dispatcher(world);

        assert_eq!(d.move_player(Direction::Left), MoveOutcome::Moved(Pos::new(5, 6)));
        assert_eq!(shared.acquire().grid().get(Pos::new(6, 6)), Some(Tile::TRAP));
        assert_eq!(d.move_player(Direction::Right), MoveOutcome::Trapped);
    }

    #[test]
    fn test_guard_sight_sends_chase_then_stop() {
        let mut world = open_world(Pos::new(0, 0));
        world.place_entity(EntityKind::Guard, Pos::new(4, 0));
        let shared = Arc::new(SharedWorld::new(world));
        let (handles, inboxes) = entity_channels(4);
        let mut d = Dispatcher::new(Arc::clone(&shared), handles, TELEPORT, 2);

        // Distance 3: out of sight.
        d.move_player(Direction::Right);
        assert_eq!(d.handles().guard.chase.pending(), 0);

        // Distance 2: chase.
        d.move_player(Direction::Right);
        assert_eq!(d.handles().guard.chase.pending(), 1);

        // Back out of sight: one stop, not repeated.
        d.move_player(Direction::Left);
        d.move_player(Direction::Left);
        assert_eq!(d.handles().guard.stop_chase.pending(), 1);
        drop(inboxes);
    }

    #[test]
    fn test_notifications_never_block() {
        let mut world = open_world(Pos::new(5, 6));
        world.place_entity(EntityKind::Trap, Pos::new(6, 6));
        let (mut d, _inboxes, shared) = dispatcher(world);

        // Nobody is receiving; the mailbox fills and further signals drop.
        for _ in 0..20 {
            assert_eq!(d.move_player(Direction::Right), MoveOutcome::Trapped);
        }
        assert_eq!(d.handles().trap.player_near.pending(), 4);
        assert_eq!(shared.status().get(), messages::GAME_OVER);
    }
}
