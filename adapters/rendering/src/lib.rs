#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Scrollmap adapters.
//!
//! The session never draws anything itself. Adapters implement [`Renderer`]
//! and feed it the events produced by the world through [`present`], which
//! turns raw events into presentation-ready descriptors: scroll offsets,
//! sprite keys and animation durations.

use anyhow::Result as AnyResult;
use glam::Vec2;
use scrollmap_core::{CellCoord, Event, Facing, LevelId, LevelLoadError, StepDelta};
use std::time::Duration;
use thiserror::Error;

/// Sprites used to draw the player token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteKey {
    /// Idle player.
    PlayerStand,
    /// Player walking left.
    PlayerLeft,
    /// Player walking right.
    PlayerRight,
    /// Player walking up.
    PlayerUp,
    /// Player walking down.
    PlayerDown,
}

impl SpriteKey {
    /// Sprite matching the provided facing.
    #[must_use]
    pub const fn for_facing(facing: Facing) -> Self {
        match facing {
            Facing::Stand => Self::PlayerStand,
            Facing::Left => Self::PlayerLeft,
            Facing::Right => Self::PlayerRight,
            Facing::Up => Self::PlayerUp,
            Facing::Down => Self::PlayerDown,
        }
    }

    /// File name of the sprite image.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::PlayerStand => "player-stand.gif",
            Self::PlayerLeft => "player-left.gif",
            Self::PlayerRight => "player-right.gif",
            Self::PlayerUp => "player-up.gif",
            Self::PlayerDown => "player-down.gif",
        }
    }
}

/// Geometry used to translate grid movement into screen movement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportPresentation {
    cell_size: f32,
}

impl ViewportPresentation {
    /// Creates a viewport whose cells are `cell_size` pixels wide and tall.
    pub fn new(cell_size: f32) -> Result<Self, RenderingError> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(RenderingError::InvalidCellSize { cell_size });
        }
        Ok(Self { cell_size })
    }

    /// Edge length of a cell in pixels.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Translation applied to the map so the player stays centred.
    ///
    /// The map scrolls opposite to the step taken by the player.
    #[must_use]
    pub fn scroll_offset(&self, delta: StepDelta) -> Vec2 {
        Vec2::new(
            delta.dx().saturating_neg() as f32,
            delta.dy().saturating_neg() as f32,
        ) * self.cell_size
    }
}

impl Default for ViewportPresentation {
    fn default() -> Self {
        Self { cell_size: 32.0 }
    }
}

/// A committed player step, ready to animate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerMotion {
    /// Cell the player left.
    pub from: CellCoord,
    /// Cell the player now occupies.
    pub to: CellCoord,
    /// Map translation to animate.
    pub scroll: Vec2,
    /// Sprite to show while walking.
    pub sprite: SpriteKey,
    /// Recommended animation duration.
    pub duration: Duration,
}

/// Level that just became playable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelSummary {
    /// Identifier of the level.
    pub level: LevelId,
    /// Display name of the level.
    pub name: String,
    /// Number of columns in the grid.
    pub columns: u32,
    /// Number of rows in the grid.
    pub rows: u32,
    /// Cell the player starts on.
    pub start: CellCoord,
}

/// Item removed from the map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemPickup {
    /// Cell the item occupied.
    pub cell: CellCoord,
    /// Image the item was drawn with, for the removal animation.
    pub image: Option<String>,
    /// Gold granted by the item.
    pub gold: u32,
    /// Gold held after the pickup, for the score panel.
    pub total_gold: u32,
}

/// Snapshot of the visible map, one string per grid row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FramePresentation {
    /// Level display name.
    pub title: String,
    /// Grid rows, top first.
    pub rows: Vec<String>,
    /// Gold held by the player.
    pub gold: u32,
}

/// Collaborator that draws the session.
pub trait Renderer {
    /// Rebuilds the map visuals for a freshly loaded level.
    fn level_changed(&mut self, level: &LevelSummary) -> AnyResult<()>;

    /// Shows a level load failure to the player.
    fn level_load_failed(&mut self, level: LevelId, error: &LevelLoadError) -> AnyResult<()>;

    /// Animates a committed step.
    fn player_moved(&mut self, motion: &PlayerMotion) -> AnyResult<()>;

    /// Swaps the player sprite.
    fn facing_changed(&mut self, sprite: SpriteKey) -> AnyResult<()>;

    /// Removes a collected item from the map.
    fn item_collected(&mut self, pickup: &ItemPickup) -> AnyResult<()>;

    /// Notifies about an inventory item the player walked over.
    fn inventory_item_found(&mut self, _cell: CellCoord, _item: Option<&str>) -> AnyResult<()> {
        Ok(())
    }

    /// Draws a full frame of the map.
    fn frame(&mut self, _frame: &FramePresentation) -> AnyResult<()> {
        Ok(())
    }
}

/// Routes world events to the renderer.
///
/// Events without a visual counterpart are skipped.
pub fn present<R>(
    renderer: &mut R,
    viewport: &ViewportPresentation,
    events: &[Event],
) -> AnyResult<()>
where
    R: Renderer + ?Sized,
{
    for event in events {
        match event {
            Event::LevelLoaded {
                level,
                name,
                columns,
                rows,
                start,
            } => renderer.level_changed(&LevelSummary {
                level: *level,
                name: name.clone(),
                columns: *columns,
                rows: *rows,
                start: *start,
            })?,
            Event::LevelLoadFailed { level, error } => renderer.level_load_failed(*level, error)?,
            Event::FacingChanged { facing } => {
                renderer.facing_changed(SpriteKey::for_facing(*facing))?;
            }
            Event::PlayerMoved {
                from,
                to,
                delta,
                facing,
                animation,
            } => renderer.player_moved(&PlayerMotion {
                from: *from,
                to: *to,
                scroll: viewport.scroll_offset(*delta),
                sprite: SpriteKey::for_facing(*facing),
                duration: *animation,
            })?,
            Event::ItemCollected {
                cell,
                image,
                gold,
                total_gold,
            } => renderer.item_collected(&ItemPickup {
                cell: *cell,
                image: image.clone(),
                gold: *gold,
                total_gold: *total_gold,
            })?,
            Event::InventoryItemFound { cell, item } => {
                renderer.inventory_item_found(*cell, item.as_deref())?;
            }
            Event::StateChanged { .. }
            | Event::LevelRequested { .. }
            | Event::PathRequested { .. }
            | Event::PathAssigned { .. } => {}
        }
    }
    Ok(())
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, Error, PartialEq)]
pub enum RenderingError {
    /// Cells must have a positive, finite size.
    #[error("cell size must be positive (received {cell_size})")]
    InvalidCellSize {
        /// Provided size that failed validation.
        cell_size: f32,
    },
}
