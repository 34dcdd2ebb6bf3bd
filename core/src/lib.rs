#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Scrollmap engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing input and collaborator deliveries, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems and renderers to react to deterministically. Systems consume
//! event streams, query immutable views, and respond exclusively with new
//! command batches.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

mod error;
mod level;

pub use error::LevelLoadError;
pub use level::{Action, ActionCell, CellType, LevelData};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Scrollmap.";

/// Lifecycle states of the tick controller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// A level is being prepared; ticks are ignored.
    #[default]
    Init,
    /// Normal gameplay; ticks move the player and fire actions.
    Play,
    /// Reserved for dialogs. Nothing in the engine enters this state yet.
    Modal,
    /// A level transition was triggered and is tearing down the session.
    Transitioning,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Starts loading a level, suspending play until the data arrives.
    RequestLevel {
        /// Level that should be loaded.
        level: LevelId,
        /// Cell the player should occupy once the level is ready, if any.
        start: Option<CellCoord>,
    },
    /// Delivers parsed level data produced by the level loader.
    LoadLevel {
        /// Level the data belongs to.
        level: LevelId,
        /// Parsed level content.
        data: LevelData,
    },
    /// Reports that the level loader could not produce the requested level.
    LevelLoadFailed {
        /// Level whose load failed.
        level: LevelId,
        /// Human readable failure description.
        reason: String,
    },
    /// Marks a movement key as held.
    KeyDown {
        /// Key that went down.
        key: MovementKey,
    },
    /// Marks a movement key as released.
    KeyUp {
        /// Key that came up.
        key: MovementKey,
    },
    /// Requests a computed path from the player's cell to the destination.
    RequestPath {
        /// Cell the player clicked or tapped.
        destination: CellCoord,
    },
    /// Delivers a completed path search for the given request generation.
    AssignPath {
        /// Generation of the request that produced the path.
        generation: PathGeneration,
        /// Cells to visit in order, excluding the origin.
        path: Vec<CellCoord>,
    },
    /// Runs a single movement tick.
    Tick,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Announces that the controller moved between lifecycle states.
    StateChanged {
        /// State that was left.
        from: SessionState,
        /// State that became active.
        to: SessionState,
    },
    /// Asks the level loader to fetch the provided level.
    LevelRequested {
        /// Level that should be loaded.
        level: LevelId,
    },
    /// Confirms that a level was indexed and play resumed.
    LevelLoaded {
        /// Identifier of the loaded level.
        level: LevelId,
        /// Display name of the level.
        name: String,
        /// Number of columns in the level grid.
        columns: u32,
        /// Number of rows in the level grid.
        rows: u32,
        /// Cell occupied by the player after positioning.
        start: CellCoord,
    },
    /// Reports that a level could not be loaded; play stays suspended.
    LevelLoadFailed {
        /// Level whose load failed.
        level: LevelId,
        /// Reason the level was rejected.
        error: LevelLoadError,
    },
    /// Announces a new path search request.
    PathRequested {
        /// Generation assigned to the request.
        generation: PathGeneration,
        /// Cell the search starts from.
        origin: CellCoord,
        /// Cell the search should reach.
        destination: CellCoord,
    },
    /// Confirms that a search result replaced the pending path.
    PathAssigned {
        /// Generation of the applied result.
        generation: PathGeneration,
        /// Number of steps queued.
        steps: usize,
    },
    /// Announces that the player's facing changed this tick.
    FacingChanged {
        /// Facing that became active.
        facing: Facing,
    },
    /// Confirms that the player committed a step.
    PlayerMoved {
        /// Cell the player occupied before the step.
        from: CellCoord,
        /// Cell the player occupies after the step.
        to: CellCoord,
        /// Delta applied by the step.
        delta: StepDelta,
        /// Facing derived from the delta.
        facing: Facing,
        /// Recommended duration for animating the step.
        animation: Duration,
    },
    /// Confirms that an item cell was consumed.
    ItemCollected {
        /// Cell that held the item.
        cell: CellCoord,
        /// Image associated with the item, if any.
        image: Option<String>,
        /// Gold granted by the item.
        gold: u32,
        /// Player gold after collection.
        total_gold: u32,
    },
    /// Reports an inventory item; inventories are not implemented so nothing changes.
    InventoryItemFound {
        /// Cell that holds the item.
        cell: CellCoord,
        /// Inventory entry named by the item, if any.
        item: Option<String>,
    },
}

/// Identifier of a level as understood by the level loader.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelId(u32);

impl LevelId {
    /// Creates a new level identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic counter stamped on every path request.
///
/// Only the result carrying the latest generation may replace the pending
/// path; anything older is stale and dropped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathGeneration(u64);

impl PathGeneration {
    /// Creates a generation with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the generation.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Generation that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Applies a step delta, returning `None` when the result leaves the
    /// non-negative quadrant.
    #[must_use]
    pub fn offset(self, delta: StepDelta) -> Option<CellCoord> {
        let column = i64::from(self.column) + i64::from(delta.dx());
        let row = i64::from(self.row) + i64::from(delta.dy());
        Some(Self::new(
            u32::try_from(column).ok()?,
            u32::try_from(row).ok()?,
        ))
    }

    /// Delta that moves from this cell to `other`. Not necessarily a unit step.
    #[must_use]
    pub fn delta_to(self, other: CellCoord) -> StepDelta {
        let dx = i64::from(other.column) - i64::from(self.column);
        let dy = i64::from(other.row) - i64::from(self.row);
        StepDelta::new(saturate(dx), saturate(dy))
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

fn saturate(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

/// Movement applied to the player during a single tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct StepDelta {
    dx: i32,
    dy: i32,
}

impl StepDelta {
    /// Delta that leaves the player in place.
    pub const ZERO: Self = Self::new(0, 0);

    /// Creates a new delta from horizontal and vertical components.
    #[must_use]
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// Horizontal component; positive values move right.
    #[must_use]
    pub const fn dx(&self) -> i32 {
        self.dx
    }

    /// Vertical component; positive values move down.
    #[must_use]
    pub const fn dy(&self) -> i32 {
        self.dy
    }

    /// Reports whether the delta leaves the player in place.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.dx == 0 && self.dy == 0
    }
}

/// Directional keys the player can hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MovementKey {
    /// Moves toward decreasing column indices.
    Left,
    /// Moves toward decreasing row indices.
    Up,
    /// Moves toward increasing column indices.
    Right,
    /// Moves toward increasing row indices.
    Down,
}

impl MovementKey {
    /// Every movement key in key-code order.
    pub const ALL: [MovementKey; 4] = [Self::Left, Self::Up, Self::Right, Self::Down];

    /// Maps a browser-style arrow key code (37 through 40) onto a movement key.
    #[must_use]
    pub const fn from_key_code(code: u32) -> Option<Self> {
        match code {
            37 => Some(Self::Left),
            38 => Some(Self::Up),
            39 => Some(Self::Right),
            40 => Some(Self::Down),
            _ => None,
        }
    }

    /// Unit delta produced while the key is held.
    #[must_use]
    pub const fn direction(self) -> StepDelta {
        match self {
            Self::Left => StepDelta::new(-1, 0),
            Self::Up => StepDelta::new(0, -1),
            Self::Right => StepDelta::new(1, 0),
            Self::Down => StepDelta::new(0, 1),
        }
    }
}

/// Direction the player sprite faces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Facing {
    /// Idle.
    #[default]
    Stand,
    /// Walking left.
    Left,
    /// Walking right.
    Right,
    /// Walking up.
    Up,
    /// Walking down.
    Down,
}

impl Facing {
    /// Derives the facing from a step delta, preferring the horizontal axis.
    #[must_use]
    pub const fn from_delta(delta: StepDelta) -> Self {
        if delta.dx() < 0 {
            Self::Left
        } else if delta.dx() > 0 {
            Self::Right
        } else if delta.dy() < 0 {
            Self::Up
        } else if delta.dy() > 0 {
            Self::Down
        } else {
            Self::Stand
        }
    }
}

/// Read-only view into the traversability matrix used by the pathfinder.
#[derive(Clone, Copy, Debug)]
pub struct PathGraphView<'a> {
    cells: &'a [bool],
    columns: u32,
    rows: u32,
}

impl<'a> PathGraphView<'a> {
    /// Captures a new view backed by a row-major traversability slice.
    #[must_use]
    pub fn new(cells: &'a [bool], columns: u32, rows: u32) -> Self {
        Self {
            cells,
            columns,
            rows,
        }
    }

    /// Reports whether the cell lies inside the grid and can be traversed.
    #[must_use]
    pub fn is_traversable(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(false)
    }

    /// Provides the dimensions of the underlying grid.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Row-major offset of the cell, if it lies inside the grid.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}
