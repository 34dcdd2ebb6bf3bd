#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Incremental pathfinding system for Scrollmap.
//!
//! The system never touches the world directly. It picks up
//! [`Event::PathRequested`] notifications, queues a breadth-first search per
//! request and advances the queue by a fixed number of node expansions every
//! time [`Pathfinder::tick_search`] runs. Finished searches are reported as
//! [`Command::AssignPath`] stamped with the request generation, leaving the
//! world to discard results that have been superseded.

use std::collections::VecDeque;

use log::{debug, trace};
use scrollmap_core::{CellCoord, Command, Event, PathGeneration, PathGraphView};

mod search;

use search::{Progress, Search};

const DEFAULT_BUDGET: u32 = 64;

/// Tunables for the pathfinding system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathfinderConfig {
    /// Node expansions performed per search slice, shared by queued searches.
    pub budget: u32,
    /// Allows diagonal steps in addition to the four orthogonal ones.
    pub allow_diagonal: bool,
}

impl Default for PathfinderConfig {
    fn default() -> Self {
        Self {
            budget: DEFAULT_BUDGET,
            allow_diagonal: false,
        }
    }
}

/// Work performed by a single search slice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SliceReport {
    /// Node expansions consumed, never more than the configured budget.
    pub expansions: u32,
    /// Searches that finished during the slice, with or without a path.
    pub completed: usize,
    /// Searches still queued after the slice.
    pub pending: usize,
}

/// Pure system that turns path requests into path assignments.
#[derive(Debug, Default)]
pub struct Pathfinder {
    config: PathfinderConfig,
    queue: VecDeque<Search>,
}

impl Pathfinder {
    /// Creates a pathfinder using the provided configuration.
    #[must_use]
    pub fn new(config: PathfinderConfig) -> Self {
        Self {
            config,
            queue: VecDeque::new(),
        }
    }

    /// Configuration the pathfinder was created with.
    #[must_use]
    pub const fn config(&self) -> PathfinderConfig {
        self.config
    }

    /// Number of searches waiting for budget.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Consumes world events, queueing searches for new path requests.
    ///
    /// Level changes drop every queued search since the graph they ran on is
    /// gone. Requests arriving while no graph is available are ignored.
    pub fn handle(&mut self, events: &[Event], graph: Option<PathGraphView<'_>>) {
        for event in events {
            match event {
                Event::LevelRequested { .. } | Event::LevelLoaded { .. } => {
                    if !self.queue.is_empty() {
                        debug!("dropping {} queued searches on level change", self.queue.len());
                    }
                    self.queue.clear();
                }
                Event::PathRequested {
                    generation,
                    origin,
                    destination,
                } => {
                    if let Some(graph) = graph {
                        let _ = self.request_path(*generation, *origin, *destination, graph);
                    }
                }
                _ => {}
            }
        }
    }

    /// Queues a search from `origin` to `destination`.
    ///
    /// Returns `false` without queueing anything when the destination equals
    /// the origin, is not traversable, or the origin lies outside the graph.
    pub fn request_path(
        &mut self,
        generation: PathGeneration,
        origin: CellCoord,
        destination: CellCoord,
        graph: PathGraphView<'_>,
    ) -> bool {
        if origin == destination || !graph.is_traversable(destination) {
            trace!("search {} to {destination} rejected", generation.get());
            return false;
        }

        let Some(search) = Search::new(
            generation,
            origin,
            destination,
            &graph,
            self.config.allow_diagonal,
        ) else {
            trace!("search {} starts outside the grid", generation.get());
            return false;
        };

        self.queue.push_back(search);
        true
    }

    /// Performs one bounded slice of search work.
    ///
    /// Searches are resolved in request order; budget left over by a search
    /// that finishes early flows into the next one. Found paths are emitted as
    /// [`Command::AssignPath`]; unreachable destinations emit nothing.
    pub fn tick_search(&mut self, graph: PathGraphView<'_>, out: &mut Vec<Command>) -> SliceReport {
        let mut budget = self.config.budget;
        let mut completed = 0;

        while budget > 0 {
            let Some(search) = self.queue.front_mut() else {
                break;
            };
            let progress = search.advance(&graph, &mut budget);
            let generation = search.generation();
            let destination = search.destination();

            match progress {
                Progress::Pending => break,
                Progress::Found(path) => {
                    debug!(
                        "search {} reached {destination} in {} steps",
                        generation.get(),
                        path.len()
                    );
                    out.push(Command::AssignPath { generation, path });
                }
                Progress::Unreachable => {
                    debug!("search {} found no path to {destination}", generation.get());
                }
            }

            let _ = self.queue.pop_front();
            completed += 1;
        }

        SliceReport {
            expansions: self.config.budget - budget,
            completed,
            pending: self.queue.len(),
        }
    }
}
