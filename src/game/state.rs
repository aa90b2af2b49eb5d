use super::action::Direction;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The snake never drops below this many segments
pub const MINIMUM_LENGTH: usize = 4;

/// Fruit palette the food marker picks its symbol from
pub const FOOD_SYMBOLS: [&str; 10] = [
    "🍎", "🍊", "🍉", "🍌", "🍇", "🍓", "🍍", "🍒", "🥝", "🥭",
];

/// A cell on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move point by delta, without wrapping
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Plain (non-wrapping) Manhattan distance
    pub fn manhattan(&self, other: Point) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// Toroidal playfield: leaving one edge re-enters on the opposite edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
}

impl Grid {
    /// Smallest side length that still fits a fresh snake in a straight line
    pub const MIN_SIDE: i32 = MINIMUM_LENGTH as i32 + 1;

    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width: width.max(Self::MIN_SIDE),
            height: height.max(Self::MIN_SIDE),
        }
    }

    /// Grid that fits a viewport of `cols x rows` terminal cells
    pub fn from_viewport(cols: u16, rows: u16, cell_width: u16, cell_height: u16) -> Self {
        let width = i32::from(cols) / i32::from(cell_width.max(1));
        let height = i32::from(rows) / i32::from(cell_height.max(1));
        Self::new(width, height)
    }

    pub fn contains(&self, p: Point) -> bool {
        (0..self.width).contains(&p.x) && (0..self.height).contains(&p.y)
    }

    pub fn wrap(&self, p: Point) -> Point {
        Point::new(p.x.rem_euclid(self.width), p.y.rem_euclid(self.height))
    }

    /// The cell one step from `p` in `direction`, wrapping around the edges
    pub fn neighbor(&self, p: Point, direction: Direction) -> Point {
        let (dx, dy) = direction.delta();
        self.wrap(p.moved_by(dx, dy))
    }

    /// Direction that moves `from` onto the adjacent cell `to`, if any
    pub fn heading(&self, from: Point, to: Point) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|&dir| self.neighbor(from, dir) == to)
    }

    /// Pull a point back inside the grid by clamping each axis
    pub fn clamp(&self, p: Point) -> Point {
        Point::new(p.x.clamp(0, self.width - 1), p.y.clamp(0, self.height - 1))
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Point>,
    /// Direction the next move will take
    pub direction: Direction,
}

impl Snake {
    /// Create a straight snake with its head at `head`, trailing behind it
    pub fn new(grid: &Grid, head: Point, direction: Direction, length: usize) -> Self {
        let back = direction.opposite();
        let mut body = Vec::with_capacity(length);
        let mut segment = head;
        for _ in 0..length {
            body.push(segment);
            segment = grid.neighbor(segment, back);
        }

        Self { body, direction }
    }

    /// Get the head position
    pub fn head(&self) -> Point {
        self.body[0]
    }

    pub fn neck(&self) -> Option<Point> {
        self.body.get(1).copied()
    }

    /// Direction the body is actually travelling, derived from head and neck.
    ///
    /// Falls back to the stored direction when the two are not adjacent,
    /// which can happen right after a resize clamp.
    pub fn travel_direction(&self, grid: &Grid) -> Direction {
        self.neck()
            .and_then(|neck| grid.heading(neck, self.head()))
            .unwrap_or(self.direction)
    }

    pub fn contains(&self, p: Point) -> bool {
        self.body.contains(&p)
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// A fruit waiting to be eaten
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Food {
    pub position: Point,
    /// Index into [`FOOD_SYMBOLS`]
    pub symbol: usize,
}

impl Food {
    pub fn glyph(&self) -> &'static str {
        FOOD_SYMBOLS[self.symbol % FOOD_SYMBOLS.len()]
    }
}

/// Who is steering the snake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameState {
    /// Attract mode: the autopilot plays while the resume is shown
    #[default]
    Auto,
    /// The player steers
    Playing,
    /// Player control suspended; the autopilot keeps the snake moving
    Paused,
    /// Declared for completeness, no transition enters it
    GameOver,
}

impl GameState {
    /// The resume panel is only shown while the player is not steering
    pub fn shows_resume(&self) -> bool {
        matches!(self, GameState::Auto | GameState::Paused)
    }

    /// States in which the autopilot owns movement
    pub fn is_autopiloted(&self) -> bool {
        matches!(self, GameState::Auto | GameState::Paused)
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GameState::Auto => "AUTO",
            GameState::Playing => "PLAYING",
            GameState::Paused => "PAUSED",
            GameState::GameOver => "GAME_OVER",
        };
        f.write_str(label)
    }
}

/// Everything the simulation mutates each tick
#[derive(Debug, Clone, PartialEq)]
pub struct World {
    pub grid: Grid,
    pub snake: Snake,
    /// `None` only when the snake fills every cell
    pub food: Option<Food>,
}

impl World {
    pub fn new(grid: Grid, snake: Snake, food: Option<Food>) -> Self {
        Self { grid, snake, food }
    }

    /// Score is derived from length, never stored
    pub fn score(&self) -> u32 {
        score_for_length(self.snake.len())
    }
}

pub fn score_for_length(length: usize) -> u32 {
    length.saturating_sub(MINIMUM_LENGTH) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_movement() {
        let pos = Point::new(5, 5);
        assert_eq!(pos.moved_by(1, 0), Point::new(6, 5));
        assert_eq!(pos.moved_by(-1, 0), Point::new(4, 5));
        assert_eq!(pos.moved_by(0, 1), Point::new(5, 6));
        assert_eq!(pos.moved_by(0, -1), Point::new(5, 4));
        assert_eq!(pos.manhattan(Point::new(2, 9)), 7);
    }

    #[test]
    fn test_grid_from_viewport() {
        let grid = Grid::from_viewport(81, 24, 2, 1);
        assert_eq!(grid.width, 40);
        assert_eq!(grid.height, 24);

        // Tiny terminals still get a playable grid
        let tiny = Grid::from_viewport(3, 2, 2, 1);
        assert_eq!(tiny.width, Grid::MIN_SIDE);
        assert_eq!(tiny.height, Grid::MIN_SIDE);
    }

    #[test]
    fn test_neighbor_wraps() {
        let grid = Grid::new(10, 8);
        assert_eq!(grid.neighbor(Point::new(9, 3), Direction::Right), Point::new(0, 3));
        assert_eq!(grid.neighbor(Point::new(0, 3), Direction::Left), Point::new(9, 3));
        assert_eq!(grid.neighbor(Point::new(4, 0), Direction::Up), Point::new(4, 7));
        assert_eq!(grid.neighbor(Point::new(4, 7), Direction::Down), Point::new(4, 0));
    }

    #[test]
    fn test_heading_across_edge() {
        let grid = Grid::new(10, 8);
        assert_eq!(
            grid.heading(Point::new(9, 2), Point::new(0, 2)),
            Some(Direction::Right)
        );
        assert_eq!(
            grid.heading(Point::new(3, 3), Point::new(3, 2)),
            Some(Direction::Up)
        );
        assert_eq!(grid.heading(Point::new(3, 3), Point::new(5, 3)), None);
    }

    #[test]
    fn test_snake_creation_wraps_behind_head() {
        let grid = Grid::new(10, 10);
        let snake = Snake::new(&grid, Point::new(1, 5), Direction::Right, 4);
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.head(), Point::new(1, 5));
        assert_eq!(snake.body[1], Point::new(0, 5));
        assert_eq!(snake.body[2], Point::new(9, 5));
        assert_eq!(snake.body[3], Point::new(8, 5));
        assert_eq!(snake.travel_direction(&grid), Direction::Right);
    }

    #[test]
    fn test_score_never_negative() {
        assert_eq!(score_for_length(2), 0);
        assert_eq!(score_for_length(MINIMUM_LENGTH), 0);
        assert_eq!(score_for_length(MINIMUM_LENGTH + 3), 3);
    }

    #[test]
    fn test_resume_visibility_per_state() {
        assert!(GameState::Auto.shows_resume());
        assert!(GameState::Paused.shows_resume());
        assert!(!GameState::Playing.shows_resume());
        assert!(!GameState::GameOver.shows_resume());
        assert_eq!(GameState::GameOver.to_string(), "GAME_OVER");
    }

    #[test]
    fn test_clamp_into_grid() {
        let grid = Grid::new(6, 6);
        assert_eq!(grid.clamp(Point::new(9, 2)), Point::new(5, 2));
        assert_eq!(grid.clamp(Point::new(3, 30)), Point::new(3, 5));
        assert!(grid.contains(grid.clamp(Point::new(100, 100))));
    }
}
