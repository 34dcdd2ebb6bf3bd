//! Resumable breadth-first search over the path graph.

use std::collections::VecDeque;

use scrollmap_core::{CellCoord, PathGeneration, PathGraphView};

const UNVISITED: usize = usize::MAX;

/// Outcome of advancing a search by a bounded number of expansions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Progress {
    /// The budget ran out before the search finished.
    Pending,
    /// Shortest path found, excluding the origin.
    Found(Vec<CellCoord>),
    /// The frontier emptied without reaching the destination.
    Unreachable,
}

/// Single in-flight search that keeps its frontier between slices.
#[derive(Clone, Debug)]
pub(crate) struct Search {
    generation: PathGeneration,
    origin: CellCoord,
    destination: CellCoord,
    columns: u32,
    rows: u32,
    allow_diagonal: bool,
    frontier: VecDeque<CellCoord>,
    parents: Vec<usize>,
}

impl Search {
    /// Seeds a search, or returns `None` when the origin lies outside the graph.
    pub(crate) fn new(
        generation: PathGeneration,
        origin: CellCoord,
        destination: CellCoord,
        graph: &PathGraphView<'_>,
        allow_diagonal: bool,
    ) -> Option<Self> {
        let (columns, rows) = graph.dimensions();
        let origin_index = graph.index(origin)?;
        let cell_count = usize::try_from(columns)
            .ok()?
            .checked_mul(usize::try_from(rows).ok()?)?;

        let mut parents = vec![UNVISITED; cell_count];
        parents[origin_index] = origin_index;
        let mut frontier = VecDeque::new();
        frontier.push_back(origin);

        Some(Self {
            generation,
            origin,
            destination,
            columns,
            rows,
            allow_diagonal,
            frontier,
            parents,
        })
    }

    pub(crate) const fn generation(&self) -> PathGeneration {
        self.generation
    }

    pub(crate) const fn destination(&self) -> CellCoord {
        self.destination
    }

    /// Expands at most `*budget` nodes, decrementing the budget per expansion.
    pub(crate) fn advance(&mut self, graph: &PathGraphView<'_>, budget: &mut u32) -> Progress {
        if graph.dimensions() != (self.columns, self.rows) {
            return Progress::Unreachable;
        }

        while *budget > 0 {
            let Some(cell) = self.frontier.pop_front() else {
                return Progress::Unreachable;
            };
            *budget -= 1;

            if cell == self.destination {
                return Progress::Found(self.trace(graph, cell));
            }

            let Some(cell_index) = graph.index(cell) else {
                continue;
            };
            for neighbor in neighbors(cell, self.columns, self.rows, self.allow_diagonal) {
                if !graph.is_traversable(neighbor) {
                    continue;
                }
                let Some(neighbor_index) = graph.index(neighbor) else {
                    continue;
                };
                if self.parents[neighbor_index] != UNVISITED {
                    continue;
                }
                self.parents[neighbor_index] = cell_index;
                self.frontier.push_back(neighbor);
            }
        }

        if self.frontier.is_empty() {
            Progress::Unreachable
        } else {
            Progress::Pending
        }
    }

    fn trace(&self, graph: &PathGraphView<'_>, goal: CellCoord) -> Vec<CellCoord> {
        let mut path = Vec::new();
        let columns = usize::try_from(self.columns).unwrap_or(1).max(1);
        let mut cursor = goal;
        while cursor != self.origin {
            path.push(cursor);
            let Some(index) = graph.index(cursor) else {
                break;
            };
            let parent = self.parents[index];
            if parent == index || parent == UNVISITED {
                break;
            }
            cursor = coord(parent, columns);
        }
        path.reverse();
        path
    }
}

fn coord(index: usize, columns: usize) -> CellCoord {
    let column = u32::try_from(index % columns).unwrap_or(u32::MAX);
    let row = u32::try_from(index / columns).unwrap_or(u32::MAX);
    CellCoord::new(column, row)
}

/// Neighbors in a fixed order: north, east, south, west, then the diagonals
/// clockwise from north-east.
fn neighbors(
    cell: CellCoord,
    columns: u32,
    rows: u32,
    allow_diagonal: bool,
) -> impl Iterator<Item = CellCoord> {
    const ORTHOGONAL: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];
    const DIAGONAL: [(i32, i32); 4] = [(1, -1), (1, 1), (-1, 1), (-1, -1)];

    let diagonals: &'static [(i32, i32)] = if allow_diagonal { &DIAGONAL } else { &[] };
    ORTHOGONAL
        .iter()
        .chain(diagonals)
        .filter_map(move |&(dx, dy)| {
            let column = cell.column().checked_add_signed(dx)?;
            let row = cell.row().checked_add_signed(dy)?;
            (column < columns && row < rows).then(|| CellCoord::new(column, row))
        })
}
