//! Merges held input and the pending path into one step per tick.

use std::collections::VecDeque;

use scrollmap_core::{CellCoord, StepDelta};

use crate::input::InputTracker;

/// Resolves the step the player attempts during the current tick.
///
/// A held direction always wins: the pending path is replaced by the single
/// cell the held direction points at, which is consumed immediately, so the
/// remainder of a computed path is discarded. Without held keys the front of
/// the path is dequeued and the delta toward it returned as-is, even when the
/// cell is not adjacent. Walkability is not checked here.
pub fn resolve_step(
    input: &InputTracker,
    path: &mut VecDeque<CellCoord>,
    current: CellCoord,
) -> StepDelta {
    let held = input.current_direction();
    if !held.is_zero() {
        path.clear();
        match current.offset(held) {
            Some(next) => path.push_back(next),
            None => return held,
        }
    }

    path.pop_front()
        .map_or(StepDelta::ZERO, |next| current.delta_to(next))
}
