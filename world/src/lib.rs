#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state for Scrollmap.
//!
//! The [`World`] owns the loaded level indexes, the player and the held
//! input. It doubles as the tick controller: every mutation arrives as a
//! [`Command`] through [`apply`], and every observable outcome leaves as an
//! [`Event`]. Nothing inside a tick can fail; blocked steps and stale path
//! results are dropped quietly and only level load failures are reported.

use std::{collections::VecDeque, time::Duration};

use log::{debug, trace, warn};
use scrollmap_core::{
    CellCoord, Command, Event, Facing, LevelData, LevelId, LevelLoadError, PathGeneration,
    SessionState,
};

mod actions;
mod input;
mod level_index;
mod resolver;

use actions::LevelTransition;
pub use input::InputTracker;
pub use level_index::{ActionIndex, LevelIndex, PathGraph, WalkabilityIndex};
pub use resolver::resolve_step;

const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(100);
// Steps animate over 95% of the tick period.
const ANIMATION_NUMERATOR: u32 = 19;
const ANIMATION_DENOMINATOR: u32 = 20;

/// Tunables for a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Interval between movement ticks.
    pub tick_period: Duration,
}

impl SessionConfig {
    /// Duration renderers should spend animating a single step.
    #[must_use]
    pub fn step_animation(&self) -> Duration {
        self.tick_period * ANIMATION_NUMERATOR / ANIMATION_DENOMINATOR
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_period: DEFAULT_TICK_PERIOD,
        }
    }
}

/// Represents the authoritative Scrollmap session.
#[derive(Debug)]
pub struct World {
    config: SessionConfig,
    state: SessionState,
    level: Option<LoadedLevel>,
    pending: Option<PendingLoad>,
    player: Player,
    input: InputTracker,
    generation: PathGeneration,
}

impl World {
    /// Creates a session with the default configuration, waiting for its first level.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    /// Creates a session using the provided configuration.
    #[must_use]
    pub fn with_config(config: SessionConfig) -> Self {
        Self {
            config,
            state: SessionState::Init,
            level: None,
            pending: None,
            player: Player::default(),
            input: InputTracker::new(),
            generation: PathGeneration::default(),
        }
    }

    fn set_state(&mut self, next: SessionState, out_events: &mut Vec<Event>) {
        if self.state == next {
            return;
        }
        debug!("session state {:?} -> {:?}", self.state, next);
        out_events.push(Event::StateChanged {
            from: self.state,
            to: next,
        });
        self.state = next;
    }

    fn begin_load(
        &mut self,
        level: LevelId,
        start: Option<CellCoord>,
        out_events: &mut Vec<Event>,
    ) {
        self.set_state(SessionState::Init, out_events);
        self.input.clear();
        self.player.path.clear();
        // Outstanding searches belong to the old level.
        self.generation = self.generation.next();
        self.pending = Some(PendingLoad { level, start });
        out_events.push(Event::LevelRequested { level });
    }

    fn finish_load(&mut self, level: LevelId, data: &LevelData, out_events: &mut Vec<Event>) {
        let Some(pending) = self.take_pending(level) else {
            debug!("ignoring data for level {level}; it was not requested");
            return;
        };

        let index = match LevelIndex::build(data) {
            Ok(index) => index,
            Err(error) => {
                self.fail_load(level, error, out_events);
                return;
            }
        };

        let start = pending.start.unwrap_or(self.player.cell);
        if !index.is_walkable(start) {
            self.fail_load(level, LevelLoadError::UnwalkableStart { cell: start }, out_events);
            return;
        }

        debug!("level {level} ({}) ready, player at {start}", index.name());
        self.player.cell = start;
        self.player.facing = Facing::Stand;
        out_events.push(Event::LevelLoaded {
            level,
            name: index.name().to_owned(),
            columns: index.columns(),
            rows: index.rows(),
            start,
        });
        self.level = Some(LoadedLevel { id: level, index });
        self.set_state(SessionState::Play, out_events);
    }

    fn take_pending(&mut self, level: LevelId) -> Option<PendingLoad> {
        if self.pending.map_or(false, |pending| pending.level == level) {
            self.pending.take()
        } else {
            None
        }
    }

    fn fail_load(&mut self, level: LevelId, error: LevelLoadError, out_events: &mut Vec<Event>) {
        warn!("level {level} failed to load: {error}");
        out_events.push(Event::LevelLoadFailed { level, error });
    }

    fn request_path(&mut self, destination: CellCoord, out_events: &mut Vec<Event>) {
        let Some(level) = self.level.as_ref() else {
            return;
        };
        let origin = self.player.cell;
        if origin == destination || !level.index.is_walkable(destination) {
            trace!("path request to {destination} rejected");
            return;
        }

        self.generation = self.generation.next();
        out_events.push(Event::PathRequested {
            generation: self.generation,
            origin,
            destination,
        });
    }

    fn assign_path(
        &mut self,
        generation: PathGeneration,
        path: Vec<CellCoord>,
        out_events: &mut Vec<Event>,
    ) {
        if self.state != SessionState::Play || generation != self.generation {
            trace!(
                "discarding stale path for generation {} (latest {})",
                generation.get(),
                self.generation.get()
            );
            return;
        }

        let steps = path.len();
        self.player.path = path.into();
        out_events.push(Event::PathAssigned { generation, steps });
    }

    fn tick(&mut self, out_events: &mut Vec<Event>) {
        if self.state != SessionState::Play {
            return;
        }
        let Some(level) = self.level.as_mut() else {
            return;
        };
        let from = self.player.cell;
        if !self.input.current_direction().is_zero() {
            // Searches still in flight were planned from a cell the player is leaving.
            self.generation = self.generation.next();
        }
        let delta = resolve_step(&self.input, &mut self.player.path, from);

        let facing = Facing::from_delta(delta);
        if facing != self.player.facing {
            self.player.facing = facing;
            out_events.push(Event::FacingChanged { facing });
        }

        if delta.is_zero() {
            return;
        }

        // Action cells are always walkable, so a blocked step can never land on one.
        let Some(to) = from
            .offset(delta)
            .filter(|cell| level.index.is_walkable(*cell))
        else {
            trace!("step {delta:?} from {from} blocked");
            self.player.path.clear();
            return;
        };

        self.player.cell = to;
        out_events.push(Event::PlayerMoved {
            from,
            to,
            delta,
            facing,
            animation: self.config.step_animation(),
        });

        let transition = actions::dispatch(
            to,
            level.index.actions_mut(),
            &mut self.player.gold,
            out_events,
        );
        if let Some(transition) = transition {
            self.transition(transition, out_events);
        }
    }

    fn transition(&mut self, transition: LevelTransition, out_events: &mut Vec<Event>) {
        self.set_state(SessionState::Transitioning, out_events);
        self.begin_load(transition.level, transition.start, out_events);
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::RequestLevel { level, start } => {
            world.begin_load(level, start, out_events);
        }
        Command::LoadLevel { level, data } => {
            world.finish_load(level, &data, out_events);
        }
        Command::LevelLoadFailed { level, reason } => {
            if world.take_pending(level).is_some() {
                let error = LevelLoadError::Unavailable { level, reason };
                world.fail_load(level, error, out_events);
            }
        }
        Command::KeyDown { key } => {
            if world.state == SessionState::Play {
                let _ = world.input.key_down(key);
            }
        }
        Command::KeyUp { key } => {
            if world.state == SessionState::Play {
                let _ = world.input.key_up(key);
            }
        }
        Command::RequestPath { destination } => {
            if world.state == SessionState::Play {
                world.request_path(destination, out_events);
            }
        }
        Command::AssignPath { generation, path } => {
            world.assign_path(generation, path, out_events);
        }
        Command::Tick => world.tick(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use scrollmap_core::{
        Action, CellCoord, Facing, LevelId, MovementKey, PathGeneration, PathGraphView,
        SessionState, StepDelta,
    };

    use super::{SessionConfig, World};

    /// Current lifecycle state of the tick controller.
    #[must_use]
    pub fn state(world: &World) -> SessionState {
        world.state
    }

    /// Configuration the session was created with.
    #[must_use]
    pub fn config(world: &World) -> SessionConfig {
        world.config
    }

    /// Identifier of the level currently in play, if any.
    #[must_use]
    pub fn level_id(world: &World) -> Option<LevelId> {
        world.level.as_ref().map(|level| level.id)
    }

    /// Display name of the level currently in play, if any.
    #[must_use]
    pub fn level_name(world: &World) -> Option<&str> {
        world.level.as_ref().map(|level| level.index.name())
    }

    /// Level currently awaiting data from the loader, if any.
    #[must_use]
    pub fn pending_level(world: &World) -> Option<LevelId> {
        world.pending.as_ref().map(|pending| pending.level)
    }

    /// Grid dimensions as `(columns, rows)`, if a level is loaded.
    #[must_use]
    pub fn dimensions(world: &World) -> Option<(u32, u32)> {
        world
            .level
            .as_ref()
            .map(|level| (level.index.columns(), level.index.rows()))
    }

    /// Cell the player occupies.
    #[must_use]
    pub fn player_cell(world: &World) -> CellCoord {
        world.player.cell
    }

    /// Gold collected so far across all levels.
    #[must_use]
    pub fn gold(world: &World) -> u32 {
        world.player.gold
    }

    /// Facing derived on the most recent tick.
    #[must_use]
    pub fn facing(world: &World) -> Facing {
        world.player.facing
    }

    /// Cells queued for the player to walk, front first.
    #[must_use]
    pub fn pending_path(world: &World) -> Vec<CellCoord> {
        world.player.path.iter().copied().collect()
    }

    /// Movement keys currently held, in press order.
    #[must_use]
    pub fn held_keys(world: &World) -> &[MovementKey] {
        world.input.held()
    }

    /// Direction produced by the held keys.
    #[must_use]
    pub fn input_direction(world: &World) -> StepDelta {
        world.input.current_direction()
    }

    /// Generation of the most recent path request.
    #[must_use]
    pub fn path_generation(world: &World) -> PathGeneration {
        world.generation
    }

    /// Traversability matrix of the loaded level, if any.
    #[must_use]
    pub fn path_graph(world: &World) -> Option<PathGraphView<'_>> {
        world.level.as_ref().map(|level| level.index.graph().view())
    }

    /// Reports whether the player may occupy the cell in the loaded level.
    #[must_use]
    pub fn is_walkable(world: &World, cell: CellCoord) -> bool {
        world
            .level
            .as_ref()
            .map_or(false, |level| level.index.is_walkable(cell))
    }

    /// Character labelling the cell in the loaded level.
    #[must_use]
    pub fn glyph_at(world: &World, cell: CellCoord) -> Option<char> {
        world
            .level
            .as_ref()
            .and_then(|level| level.index.glyph_at(cell))
    }

    /// Live action cells in row-major order.
    #[must_use]
    pub fn action_cells(world: &World) -> Vec<(CellCoord, &Action)> {
        world
            .level
            .as_ref()
            .map(|level| level.index.actions().sorted())
            .unwrap_or_default()
    }
}

#[derive(Debug)]
struct LoadedLevel {
    id: LevelId,
    index: LevelIndex,
}

#[derive(Clone, Copy, Debug)]
struct PendingLoad {
    level: LevelId,
    start: Option<CellCoord>,
}

#[derive(Clone, Debug, Default)]
struct Player {
    cell: CellCoord,
    path: VecDeque<CellCoord>,
    facing: Facing,
    gold: u32,
}
