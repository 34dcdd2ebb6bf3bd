//! Raw level content as delivered by the level loader.

use serde::{Deserialize, Serialize};

use crate::{CellCoord, LevelId};

/// Immutable description of a single level.
///
/// Mirrors the JSON documents shipped with the game: a grid of cell-type
/// characters, the descriptors for those characters, and the cells bound to
/// actions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelData {
    /// Display name shown in the score panel.
    #[serde(default)]
    pub level_name: String,
    /// Grid rows, each character naming a cell type.
    pub map: Vec<String>,
    /// Descriptors for every character used by the grid.
    pub cell_types: Vec<CellType>,
    /// Cells bound to side-effecting actions.
    #[serde(default)]
    pub action_cells: Vec<ActionCell>,
}

/// Shared properties of every cell labelled with the same character.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellType {
    /// Character used in the grid.
    #[serde(rename = "char")]
    pub glyph: char,
    /// Whether the player may occupy cells of this type.
    #[serde(default)]
    pub is_walkable: bool,
    /// Background color hint for renderers.
    #[serde(default)]
    pub bg_color: Option<String>,
    /// Background image hint for renderers.
    #[serde(default)]
    pub image: Option<String>,
}

/// Grid coordinate bound to an action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCell {
    /// Column of the cell.
    pub x: u32,
    /// Row of the cell.
    pub y: u32,
    /// Effect fired when the player arrives.
    pub action: Action,
}

impl ActionCell {
    /// Coordinate of the action cell.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        CellCoord::new(self.x, self.y)
    }
}

/// Effects that action cells may trigger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Action {
    /// Replaces the current level.
    NewLevel {
        /// Level to load.
        level: LevelId,
        /// Column the player starts at in the new level.
        #[serde(rename = "startX", default)]
        start_x: Option<u32>,
        /// Row the player starts at in the new level.
        #[serde(rename = "startY", default)]
        start_y: Option<u32>,
    },
    /// One-time pickup.
    Item {
        /// Image drawn on the map for the item.
        #[serde(default)]
        image: Option<String>,
        /// Gold granted when collected.
        #[serde(rename = "addGold", default)]
        add_gold: Option<u32>,
        /// Inventory entry the item represents.
        #[serde(rename = "addToInventory", default)]
        add_to_inventory: Option<String>,
    },
    /// Reserved for inventory interactions.
    Inventory,
}

impl Action {
    /// Start cell requested by a level transition.
    ///
    /// Only a complete pair repositions the player; a missing coordinate
    /// keeps the player where they are. Zero is a valid coordinate.
    #[must_use]
    pub fn start(&self) -> Option<CellCoord> {
        match self {
            Self::NewLevel {
                start_x: Some(x),
                start_y: Some(y),
                ..
            } => Some(CellCoord::new(*x, *y)),
            _ => None,
        }
    }
}
