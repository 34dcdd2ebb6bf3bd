//! Simulated clock driving the movement tick and the search slice.

use std::time::Duration;

use anyhow::{bail, Result};

/// Periodic task due on the simulated clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Firing {
    /// Advance pathfinding by one budgeted slice.
    SearchSlice,
    /// Run one movement tick.
    MovementTick,
}

#[derive(Clone, Copy, Debug)]
struct Timer {
    period: Duration,
    next_due: Duration,
}

impl Timer {
    fn new(period: Duration) -> Self {
        Self {
            period,
            next_due: period,
        }
    }

    fn due_by(&self, deadline: Duration) -> Option<Duration> {
        (self.next_due <= deadline).then_some(self.next_due)
    }

    fn fire(&mut self) {
        self.next_due += self.period;
    }
}

/// Two independent fixed-period timers sharing one clock.
#[derive(Clone, Debug)]
pub struct Scheduler {
    now: Duration,
    tick: Timer,
    slice: Timer,
}

impl Scheduler {
    /// Creates a scheduler with both timers first due one period from now.
    pub fn new(tick_period: Duration, slice_period: Duration) -> Result<Self> {
        if tick_period.is_zero() || slice_period.is_zero() {
            bail!("scheduler periods must be positive");
        }
        Ok(Self {
            now: Duration::ZERO,
            tick: Timer::new(tick_period),
            slice: Timer::new(slice_period),
        })
    }

    /// Time elapsed on the simulated clock.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Moves the clock forward, returning the firings that fell due in time
    /// order. A search slice due at the same instant as a tick runs first.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<Firing> {
        let deadline = self.now.saturating_add(elapsed);
        let mut firings = Vec::new();

        loop {
            let slice = self.slice.due_by(deadline);
            let tick = self.tick.due_by(deadline);
            match (slice, tick) {
                (Some(slice_at), Some(tick_at)) if slice_at <= tick_at => {
                    self.slice.fire();
                    firings.push(Firing::SearchSlice);
                }
                (_, Some(_)) => {
                    self.tick.fire();
                    firings.push(Firing::MovementTick);
                }
                (Some(_), None) => {
                    self.slice.fire();
                    firings.push(Firing::SearchSlice);
                }
                (None, None) => break,
            }
        }

        self.now = deadline;
        firings
    }
}
