//! Greedy food-seeking steering used while the player is not in control.

use rand::seq::SliceRandom;
use rand::Rng;

use super::action::Direction;
use super::collision::would_collide;
use super::state::{Point, World};

/// One possible move considered by the autopilot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub direction: Direction,
    pub position: Point,
    /// Manhattan distance from `position` to the food, if there is food
    pub distance: Option<u32>,
    pub safe: bool,
}

#[derive(Debug, Clone)]
pub struct Autopilot {
    greedy_probability: f64,
}

impl Autopilot {
    pub fn new(greedy_probability: f64) -> Self {
        Self {
            greedy_probability: greedy_probability.clamp(0.0, 1.0),
        }
    }

    /// Every direction except a reversal, with its outcome
    pub fn candidates(&self, world: &World, current: Direction) -> Vec<Candidate> {
        let head = world.snake.head();
        let food = world.food.map(|food| food.position);

        Direction::ALL
            .into_iter()
            .filter(|&dir| !dir.is_opposite(current))
            .map(|direction| {
                let position = world.grid.neighbor(head, direction);
                Candidate {
                    direction,
                    position,
                    distance: food.map(|f| position.manhattan(f)),
                    safe: !would_collide(position, &world.snake.body),
                }
            })
            .collect()
    }

    /// Pick the heading for the next move.
    ///
    /// Mostly the safe move closest to the food; sometimes a random safe
    /// move so the idle snake does not look robotic. With no safe move the
    /// snake carries on straight and takes the trim.
    pub fn choose<R: Rng + ?Sized>(&self, world: &World, current: Direction, rng: &mut R) -> Direction {
        let mut safe: Vec<Candidate> = self
            .candidates(world, current)
            .into_iter()
            .filter(|c| c.safe)
            .collect();

        if safe.is_empty() {
            return current;
        }

        if world.food.is_none() {
            return safe
                .iter()
                .find(|c| c.direction == current)
                .unwrap_or(&safe[0])
                .direction;
        }

        // Stable sort keeps Direction::ALL order among ties
        safe.sort_by_key(|c| c.distance);

        if rng.gen_bool(self.greedy_probability) {
            safe[0].direction
        } else {
            safe.choose(rng).map_or(safe[0].direction, |c| c.direction)
        }
    }

    /// Random non-reversing heading, used by the idle-mode nudge
    pub fn random_turn<R: Rng + ?Sized>(current: Direction, rng: &mut R) -> Direction {
        let options: Vec<Direction> = Direction::ALL
            .into_iter()
            .filter(|dir| !dir.is_opposite(current))
            .collect();
        options.choose(rng).copied().unwrap_or(current)
    }
}
