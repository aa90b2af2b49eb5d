use super::{
    action::Direction,
    autopilot::Autopilot,
    collision::{check_self_collision, trim, would_collide},
    config::GameConfig,
    queue::DirectionQueue,
    state::{Food, GameState, Grid, Point, Snake, World, FOOD_SYMBOLS, MINIMUM_LENGTH},
};
use log::{debug, warn};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Random food placements tried before falling back to a free-cell scan
pub const FOOD_RETRY_LIMIT: usize = 1000;

/// Floating score cue produced by a trim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deduction {
    pub at: Point,
    pub amount: u32,
}

/// Information about a step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepInfo {
    /// Cell where food was eaten this step
    pub ate_food: Option<Point>,
    /// Whether the snake was trimmed after running into itself
    pub trimmed: bool,
    /// Cue to show for a trim while playing
    pub deduction: Option<Deduction>,
    /// The autopilot steered around a collision
    pub swerved: bool,
    /// Food could not be placed because no cell is free
    pub food_unavailable: bool,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Whether the snake moved at all (false once the game is over)
    pub advanced: bool,
    /// Additional information about the step
    pub info: StepInfo,
}

/// The game engine that handles all movement, collision and food logic
pub struct GameEngine {
    autopilot: Autopilot,
    rng: SmallRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: &GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        Self {
            autopilot: Autopilot::new(config.greedy_probability),
            rng,
        }
    }

    /// Create an engine with a fixed seed regardless of the config
    pub fn with_seed(config: &GameConfig, seed: u64) -> Self {
        Self {
            autopilot: Autopilot::new(config.greedy_probability),
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Fresh world: snake entering from a random edge, food on a free cell
    pub fn reset(&mut self, grid: Grid) -> World {
        let snake = self.spawn_snake(&grid);
        let food = self.generate_food(&grid, &snake);

        World::new(grid, snake, food)
    }

    /// Place a snake of [`MINIMUM_LENGTH`] on a random edge, heading inward
    pub fn spawn_snake(&mut self, grid: &Grid) -> Snake {
        let (head, direction) = match self.rng.gen_range(0..4) {
            0 => (Point::new(self.rng.gen_range(0..grid.width), 0), Direction::Down),
            1 => (
                Point::new(grid.width - 1, self.rng.gen_range(0..grid.height)),
                Direction::Left,
            ),
            2 => (
                Point::new(self.rng.gen_range(0..grid.width), grid.height - 1),
                Direction::Up,
            ),
            _ => (Point::new(0, self.rng.gen_range(0..grid.height)), Direction::Right),
        };

        Snake::new(grid, head, direction, MINIMUM_LENGTH)
    }

    /// Pick a free cell and a fresh symbol for the food.
    ///
    /// Rejection sampling is capped; after that the free cells are scanned
    /// directly. Returns `None` when the snake covers the whole grid.
    pub fn generate_food(&mut self, grid: &Grid, snake: &Snake) -> Option<Food> {
        let symbol = self.rng.gen_range(0..FOOD_SYMBOLS.len());

        for _ in 0..FOOD_RETRY_LIMIT {
            let position = Point::new(
                self.rng.gen_range(0..grid.width),
                self.rng.gen_range(0..grid.height),
            );
            if !snake.contains(position) {
                return Some(Food { position, symbol });
            }
        }

        let free: Vec<Point> = (0..grid.height)
            .flat_map(|y| (0..grid.width).map(move |x| Point::new(x, y)))
            .filter(|p| !snake.contains(*p))
            .collect();

        free.choose(&mut self.rng)
            .map(|&position| Food { position, symbol })
    }

    /// Head position after one move, wrapping around the grid
    pub fn calculate_new_head(grid: &Grid, head: Point, direction: Direction) -> Point {
        grid.neighbor(head, direction)
    }

    /// Execute one movement step
    ///
    /// Drains the direction queue first so input entered before this tick
    /// is never a frame late.
    pub fn step(
        &mut self,
        world: &mut World,
        state: GameState,
        queue: &mut DirectionQueue,
    ) -> StepResult {
        let mut info = StepInfo::default();

        if state == GameState::GameOver {
            queue.clear();
            return StepResult {
                advanced: false,
                info,
            };
        }

        let travel = world.snake.travel_direction(&world.grid);
        world.snake.direction = queue.resolve(world.snake.direction, travel);

        if world.food.is_none() {
            world.food = self.generate_food(&world.grid, &world.snake);
        }

        let direction = world.snake.direction;
        let new_head = Self::calculate_new_head(&world.grid, world.snake.head(), direction);

        match check_self_collision(new_head, &world.snake.body) {
            Some(index) if state == GameState::Playing => {
                let result = trim(new_head, &world.snake.body, index);
                debug!(
                    "Trimmed snake at index {} ({} -> {} segments)",
                    index,
                    world.snake.len(),
                    result.body.len()
                );
                world.snake.body = result.body;
                info.trimmed = true;
                info.deduction = Some(Deduction {
                    at: result.at,
                    amount: result.deduction,
                });
            }
            Some(index) => {
                let dodge = self.autopilot.choose(world, travel, &mut self.rng);
                let dodge_head = Self::calculate_new_head(&world.grid, world.snake.head(), dodge);

                if would_collide(dodge_head, &world.snake.body) {
                    let result = trim(new_head, &world.snake.body, index);
                    world.snake.body = result.body;
                    info.trimmed = true;
                } else {
                    world.snake.direction = dodge;
                    info.swerved = true;
                    self.advance(world, state, dodge_head, &mut info);
                }
            }
            None => self.advance(world, state, new_head, &mut info),
        }

        if state.is_autopiloted() {
            let travel = world.snake.travel_direction(&world.grid);
            world.snake.direction = self.autopilot.choose(world, travel, &mut self.rng);
        }

        StepResult {
            advanced: true,
            info,
        }
    }

    /// Move the head forward, eating food if it is there.
    ///
    /// Only the player grows the snake; the autopilot eats without growing.
    fn advance(&mut self, world: &mut World, state: GameState, new_head: Point, info: &mut StepInfo) {
        world.snake.body.insert(0, new_head);

        let ate = world.food.is_some_and(|food| food.position == new_head);
        if !(ate && state == GameState::Playing) {
            world.snake.body.pop();
        }

        if ate {
            info.ate_food = Some(new_head);
            world.food = self.generate_food(&world.grid, &world.snake);
            if world.food.is_none() {
                warn!("No free cell left for food on a {}x{} grid", world.grid.width, world.grid.height);
                info.food_unavailable = true;
            }
        }
    }

    /// Idle-mode nudge: with the given probability, turn to a random
    /// direction that does not reverse. Returns true when the roll hit.
    pub fn nudge(&mut self, world: &mut World, probability: f64) -> bool {
        if !self.rng.gen_bool(probability.clamp(0.0, 1.0)) {
            return false;
        }
        let travel = world.snake.travel_direction(&world.grid);
        world.snake.direction = Autopilot::random_turn(travel, &mut self.rng);
        true
    }

    /// Adopt new grid dimensions.
    ///
    /// Snake segments outside the new bounds are clamped onto the last
    /// row/column; food outside them or now under the snake is regenerated.
    /// Returns true when the food moved.
    pub fn resize(&mut self, world: &mut World, grid: Grid) -> bool {
        world.grid = grid;
        for segment in world.snake.body.iter_mut() {
            *segment = grid.clamp(*segment);
        }

        let misplaced = world.food.map_or(true, |food| {
            !grid.contains(food.position) || world.snake.contains(food.position)
        });
        if misplaced {
            world.food = self.generate_food(&grid, &world.snake);
        }

        misplaced
    }
}
