use std::collections::VecDeque;

use super::action::Direction;

/// Buffers direction changes entered between two ticks.
///
/// Rapid input (e.g. UP then LEFT inside one tick) would otherwise let the
/// player reverse into the neck, so the whole batch is validated at once
/// against both the direction accepted so far and the body's actual travel.
#[derive(Debug, Clone, Default)]
pub struct DirectionQueue {
    pending: VecDeque<Direction>,
}

impl DirectionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, direction: Direction) {
        self.pending.push_back(direction);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Drain the queue and return the direction for the next move.
    ///
    /// `current` is the snake's stored heading, `travel` the direction the
    /// body is actually moving (head relative to neck).
    pub fn resolve(&mut self, current: Direction, travel: Direction) -> Direction {
        let mut accepted = current;

        while let Some(next) = self.pending.pop_front() {
            if accepted.is_opposite(next) || travel.is_opposite(next) {
                continue;
            }
            accepted = next;
        }

        accepted
    }
}
