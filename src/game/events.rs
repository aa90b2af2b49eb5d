use super::engine::Deduction;
use super::state::{GameState, Point};

/// One-way notifications from the simulation to whatever hosts it.
///
/// The session collects these while handling input or a frame; the host
/// drains them right after, on the same thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    ScoreChanged(u32),
    StateChanged(GameState),
    ScoreDeduction(Deduction),
    FoodEaten(Point),
    FoodUnavailable,
}
