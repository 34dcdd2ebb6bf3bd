//! Static lookup structures derived from a level when it loads.

use std::collections::{BTreeSet, HashMap};

use scrollmap_core::{Action, CellCoord, LevelData, LevelLoadError, PathGraphView};

/// Set of cell-type characters the player may occupy.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WalkabilityIndex {
    glyphs: BTreeSet<char>,
}

impl WalkabilityIndex {
    /// Reports whether cells labelled with `glyph` are walkable.
    #[must_use]
    pub fn contains(&self, glyph: char) -> bool {
        self.glyphs.contains(&glyph)
    }

    /// Walkable characters in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.glyphs.iter().copied()
    }
}

/// Action cells keyed by coordinate for constant-time arrival lookups.
#[derive(Clone, Debug, Default)]
pub struct ActionIndex {
    cells: HashMap<CellCoord, Action>,
}

impl ActionIndex {
    /// Action bound to the provided cell, if any.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<&Action> {
        self.cells.get(&cell)
    }

    /// Reports whether every action cell has been consumed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Live action cells in row-major order.
    #[must_use]
    pub fn sorted(&self) -> Vec<(CellCoord, &Action)> {
        let mut cells: Vec<_> = self
            .cells
            .iter()
            .map(|(cell, action)| (*cell, action))
            .collect();
        cells.sort_by_key(|(cell, _)| (cell.row(), cell.column()));
        cells
    }

    pub(crate) fn remove(&mut self, cell: CellCoord) -> Option<Action> {
        self.cells.remove(&cell)
    }
}

/// Dense traversability matrix consumed by the pathfinder.
///
/// Built once per level and never mutated; consumed action cells keep their
/// traversability.
#[derive(Clone, Debug, Default)]
pub struct PathGraph {
    columns: u32,
    rows: u32,
    cells: Vec<bool>,
}

impl PathGraph {
    /// Read-only view handed to systems.
    #[must_use]
    pub fn view(&self) -> PathGraphView<'_> {
        PathGraphView::new(&self.cells, self.columns, self.rows)
    }
}

/// Every lookup structure derived from a level at load time.
#[derive(Clone, Debug)]
pub struct LevelIndex {
    name: String,
    columns: u32,
    rows: u32,
    glyphs: Vec<char>,
    walkable: WalkabilityIndex,
    actions: ActionIndex,
    graph: PathGraph,
}

impl LevelIndex {
    /// Validates the level and derives its walkability, action and path indexes.
    pub fn build(data: &LevelData) -> Result<Self, LevelLoadError> {
        let mut declared = BTreeSet::new();
        let mut walkable = WalkabilityIndex::default();
        for cell_type in &data.cell_types {
            if !declared.insert(cell_type.glyph) {
                return Err(LevelLoadError::DuplicateCellType {
                    glyph: cell_type.glyph,
                });
            }
            if cell_type.is_walkable {
                let _ = walkable.glyphs.insert(cell_type.glyph);
            }
        }

        let expected = data
            .map
            .first()
            .map(|row| row.chars().count())
            .unwrap_or(0);
        if expected == 0 {
            return Err(LevelLoadError::EmptyGrid);
        }
        let columns = u32::try_from(expected).unwrap_or(u32::MAX);
        let rows = u32::try_from(data.map.len()).unwrap_or(u32::MAX);

        let mut glyphs = Vec::with_capacity(expected * data.map.len());
        let mut cells = Vec::with_capacity(glyphs.capacity());
        for (row_index, row) in (0_u32..).zip(&data.map) {
            let found = row.chars().count();
            if found != expected {
                return Err(LevelLoadError::RaggedRow {
                    row: row_index,
                    expected: columns,
                    found: u32::try_from(found).unwrap_or(u32::MAX),
                });
            }

            for (column, glyph) in (0_u32..).zip(row.chars()) {
                if !declared.contains(&glyph) {
                    return Err(LevelLoadError::UnknownCellType {
                        glyph,
                        cell: CellCoord::new(column, row_index),
                    });
                }
                glyphs.push(glyph);
                cells.push(walkable.contains(glyph));
            }
        }

        let graph = PathGraph {
            columns,
            rows,
            cells,
        };

        let mut actions = ActionIndex::default();
        for action_cell in &data.action_cells {
            let cell = action_cell.cell();
            let Some(index) = graph.view().index(cell) else {
                return Err(LevelLoadError::ActionOutOfBounds { cell });
            };
            if !graph.cells[index] {
                return Err(LevelLoadError::ActionOnUnwalkableCell { cell });
            }
            if actions
                .cells
                .insert(cell, action_cell.action.clone())
                .is_some()
            {
                return Err(LevelLoadError::DuplicateActionCell { cell });
            }
        }

        Ok(Self {
            name: data.level_name.clone(),
            columns,
            rows,
            glyphs,
            walkable,
            actions,
            graph,
        })
    }

    /// Display name of the level.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Character labelling the cell, if it lies inside the grid.
    #[must_use]
    pub fn glyph_at(&self, cell: CellCoord) -> Option<char> {
        self.graph
            .view()
            .index(cell)
            .and_then(|index| self.glyphs.get(index).copied())
    }

    /// Reports whether the player may occupy the cell.
    ///
    /// Out-of-bounds cells are never walkable.
    #[must_use]
    pub fn is_walkable(&self, cell: CellCoord) -> bool {
        self.glyph_at(cell)
            .map_or(false, |glyph| self.walkable.contains(glyph))
    }

    /// Characters marked walkable by the level.
    #[must_use]
    pub fn walkability(&self) -> &WalkabilityIndex {
        &self.walkable
    }

    /// Live action cells.
    #[must_use]
    pub fn actions(&self) -> &ActionIndex {
        &self.actions
    }

    /// Traversability matrix for the pathfinder.
    #[must_use]
    pub fn graph(&self) -> &PathGraph {
        &self.graph
    }

    pub(crate) fn actions_mut(&mut self) -> &mut ActionIndex {
        &mut self.actions
    }
}
