//! Self-collision detection and the trim policy that replaces dying.

use super::state::{Point, MINIMUM_LENGTH};

/// Result of cutting the snake after it ran into itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trim {
    /// The new body, head first
    pub body: Vec<Point>,
    /// Where the deduction cue should appear
    pub at: Point,
    /// Magnitude of the deduction cue, always at least 1
    pub deduction: u32,
}

/// Index of the body segment `new_head` would land on, if any.
///
/// The head (index 0) cannot be hit and the tail is skipped because it
/// vacates its cell on the same tick.
pub fn check_self_collision(new_head: Point, body: &[Point]) -> Option<usize> {
    let end = body.len().saturating_sub(1);
    (1..end).find(|&i| body[i] == new_head)
}

/// Whether moving the head to `pos` would hit the body (tail excluded)
pub fn would_collide(pos: Point, body: &[Point]) -> bool {
    let end = body.len().saturating_sub(1);
    body[..end].contains(&pos)
}

/// Shorten the snake at the collision point instead of ending the game.
///
/// Hitting at or beyond [`MINIMUM_LENGTH`] cuts off the looped-back part;
/// hitting closer to the head keeps exactly [`MINIMUM_LENGTH`] segments.
pub fn trim(new_head: Point, body: &[Point], collision_index: usize) -> Trim {
    let (keep, at) = if collision_index >= MINIMUM_LENGTH {
        (collision_index, body[collision_index])
    } else {
        (MINIMUM_LENGTH - 1, body[0])
    };

    let mut trimmed = Vec::with_capacity(keep + 1);
    trimmed.push(new_head);
    trimmed.extend(body.iter().take(keep).copied());

    let lost = body.len().saturating_sub(trimmed.len());
    let available = body.len().saturating_sub(MINIMUM_LENGTH);
    let deduction = lost.min(available).max(1) as u32;

    Trim {
        body: trimmed,
        at,
        deduction,
    }
}
