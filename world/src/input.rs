//! Held movement key bookkeeping.

use scrollmap_core::{MovementKey, StepDelta};

/// Tracks the movement keys currently held by the player.
///
/// Keys are kept in press order, but only presence matters when deriving a
/// direction: opposing keys on the same axis cancel out.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputTracker {
    held: Vec<MovementKey>,
}

impl InputTracker {
    /// Creates a tracker with no keys held.
    #[must_use]
    pub const fn new() -> Self {
        Self { held: Vec::new() }
    }

    /// Marks the key as held. Returns `false` if it already was.
    pub fn key_down(&mut self, key: MovementKey) -> bool {
        if self.is_held(key) {
            return false;
        }
        self.held.push(key);
        true
    }

    /// Marks the key as released. Returns `false` if it was not held.
    pub fn key_up(&mut self, key: MovementKey) -> bool {
        let Some(position) = self.held.iter().position(|held| *held == key) else {
            return false;
        };
        let _ = self.held.remove(position);
        true
    }

    /// Releases every key.
    pub fn clear(&mut self) {
        self.held.clear();
    }

    /// Reports whether the key is currently held.
    #[must_use]
    pub fn is_held(&self, key: MovementKey) -> bool {
        self.held.contains(&key)
    }

    /// Held keys in press order.
    #[must_use]
    pub fn held(&self) -> &[MovementKey] {
        &self.held
    }

    /// Combines held keys into a delta with each axis in `-1..=1`.
    #[must_use]
    pub fn current_direction(&self) -> StepDelta {
        self.held.iter().fold(StepDelta::ZERO, |total, key| {
            let step = key.direction();
            StepDelta::new(total.dx() + step.dx(), total.dy() + step.dy())
        })
    }
}
