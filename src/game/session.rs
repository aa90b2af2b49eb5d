//! The game/input state machine wrapped around the engine.
//!
//! A `Session` owns every piece of live game state in one plain struct, so
//! the render loop reads the latest values directly. Changes the host cares
//! about are published as [`GameEvent`]s.

use log::info;
use std::time::Duration;

use super::{
    action::Direction,
    clock::FrameClock,
    config::GameConfig,
    engine::{GameEngine, StepResult},
    events::GameEvent,
    queue::DirectionQueue,
    state::{GameState, Grid, World},
};

/// Status line shown in the bottom-left corner.
///
/// Changing it blanks the line first and reveals the new text after a short
/// delay, for the 8-bit "blink" effect.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    text: String,
    visible: bool,
    pending: Option<(String, Duration)>,
}

impl StatusMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            visible: true,
            pending: None,
        }
    }

    /// Hide the message now and show `text` once `delay` has elapsed
    pub fn schedule(&mut self, text: impl Into<String>, delay: Duration) {
        self.visible = false;
        if delay.is_zero() {
            self.text = text.into();
            self.visible = true;
            self.pending = None;
        } else {
            self.pending = Some((text.into(), delay));
        }
    }

    pub fn advance(&mut self, elapsed: Duration) {
        let Some((_, remaining)) = self.pending.as_mut() else {
            return;
        };

        *remaining = remaining.saturating_sub(elapsed);
        if remaining.is_zero() {
            if let Some((text, _)) = self.pending.take() {
                self.text = text;
                self.visible = true;
            }
        }
    }

    /// Text currently on screen, if any
    pub fn current(&self) -> Option<&str> {
        self.visible.then_some(self.text.as_str())
    }
}

/// Status text for a state, phrased for keyboard or touch players
pub fn message_for(state: GameState, touch: bool) -> &'static str {
    match (state, touch) {
        (GameState::Auto, false) => "Press arrow keys to start game",
        (GameState::Auto, true) => "Tap here to start the game",
        (GameState::Playing, false) => "Press SPACE to pause",
        (GameState::Playing, true) => "Tap here to pause",
        (GameState::Paused, false) => "Press SPACE to resume",
        (GameState::Paused, true) => "Tap here to resume",
        (GameState::GameOver, _) => "GAME OVER",
    }
}

pub struct Session {
    config: GameConfig,
    engine: GameEngine,
    world: World,
    state: GameState,
    queue: DirectionQueue,
    clock: FrameClock,
    message: StatusMessage,
    help_visible: bool,
    nudge_elapsed: Duration,
    last_score: u32,
    events: Vec<GameEvent>,
}

impl Session {
    /// Start a new session in AUTO mode on the given grid
    pub fn new(config: GameConfig, grid: Grid) -> Self {
        let engine = GameEngine::new(&config);
        Self::with_engine(config, engine, grid)
    }

    pub fn with_engine(config: GameConfig, mut engine: GameEngine, grid: Grid) -> Self {
        let world = engine.reset(grid);
        Self::from_world(config, engine, world)
    }

    /// Resume from an existing world, still starting in AUTO mode
    pub fn from_world(config: GameConfig, engine: GameEngine, world: World) -> Self {
        let message = StatusMessage::new(message_for(GameState::Auto, config.touch));
        let last_score = world.score();

        Self {
            clock: FrameClock::from_config(&config),
            config,
            engine,
            world,
            state: GameState::Auto,
            queue: DirectionQueue::new(),
            message,
            help_visible: false,
            nudge_elapsed: Duration::ZERO,
            last_score,
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn score(&self) -> u32 {
        self.world.score()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.current()
    }

    pub fn help_visible(&self) -> bool {
        self.help_visible
    }

    /// Direction the snake body is moving in right now
    pub fn heading(&self) -> Direction {
        self.world.snake.travel_direction(&self.world.grid)
    }

    /// Arrow key, swipe, drag or direction-pad press.
    ///
    /// The first one leaves AUTO; only input while PLAYING steers.
    pub fn direction_input(&mut self, direction: Direction) {
        match self.state {
            GameState::Auto => self.set_state(GameState::Playing),
            GameState::Playing => self.queue.push(direction),
            GameState::Paused | GameState::GameOver => {}
        }
    }

    /// SPACE: pause or resume
    pub fn toggle_pause(&mut self) {
        match self.state {
            GameState::Playing => self.set_state(GameState::Paused),
            GameState::Paused => self.set_state(GameState::Playing),
            GameState::Auto | GameState::GameOver => {}
        }
    }

    /// Tap on the status message. Only the touch profile reacts.
    ///
    /// Returns true when the tap was handled.
    pub fn tap_message(&mut self) -> bool {
        if !self.config.touch {
            return false;
        }

        match self.state {
            GameState::Auto | GameState::Paused => self.set_state(GameState::Playing),
            GameState::Playing => self.set_state(GameState::Paused),
            GameState::GameOver => return false,
        }
        true
    }

    pub fn toggle_help(&mut self) {
        self.help_visible = !self.help_visible;
    }

    pub fn hide_help(&mut self) {
        self.help_visible = false;
    }

    /// Viewport changed: adopt the new grid before the next move
    pub fn resize(&mut self, grid: Grid) {
        if grid == self.world.grid {
            return;
        }

        info!(
            "Grid resized {}x{} -> {}x{}",
            self.world.grid.width, self.world.grid.height, grid.width, grid.height
        );
        if self.engine.resize(&mut self.world, grid) && self.world.food.is_none() {
            self.events.push(GameEvent::FoodUnavailable);
        }
    }

    /// Advance timers by one rendered frame and run the movement steps it
    /// earned. Returns the number of steps taken.
    pub fn frame(&mut self, elapsed: Duration) -> u32 {
        self.message.advance(elapsed);

        if self.state.is_autopiloted() {
            self.nudge_elapsed += elapsed;
            let interval = self.config.nudge_interval();
            while self.nudge_elapsed >= interval {
                self.nudge_elapsed -= interval;
                self.engine
                    .nudge(&mut self.world, self.config.nudge_probability);
            }
        }

        if self.state == GameState::GameOver {
            return 0;
        }

        let steps = self.clock.advance(elapsed);
        for _ in 0..steps {
            self.tick();
        }
        steps
    }

    /// Run exactly one movement step
    pub fn tick(&mut self) -> StepResult {
        let result = self
            .engine
            .step(&mut self.world, self.state, &mut self.queue);

        if let Some(at) = result.info.ate_food {
            self.events.push(GameEvent::FoodEaten(at));
        }
        if let Some(deduction) = result.info.deduction {
            self.events.push(GameEvent::ScoreDeduction(deduction));
        }
        if result.info.food_unavailable {
            self.events.push(GameEvent::FoodUnavailable);
        }
        self.publish_score();

        result
    }

    /// Take every notification produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn set_state(&mut self, state: GameState) {
        if state == self.state {
            return;
        }

        info!("Game state {} -> {}", self.state, state);
        self.state = state;
        self.queue.clear();
        self.nudge_elapsed = Duration::ZERO;
        self.message
            .schedule(message_for(state, self.config.touch), self.config.message_delay());
        self.events.push(GameEvent::StateChanged(state));
    }

    fn publish_score(&mut self) {
        let score = self.world.score();
        if score != self.last_score {
            self.last_score = score;
            self.events.push(GameEvent::ScoreChanged(score));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::engine::Deduction;
    use crate::game::state::{Food, Point, Snake, MINIMUM_LENGTH};

    fn config() -> GameConfig {
        GameConfig {
            seed: Some(5),
            ..GameConfig::default()
        }
    }

    fn session_with(config: GameConfig, body: Vec<Point>, direction: Direction, food: Point) -> Session {
        let engine = GameEngine::with_seed(&config, 5);
        let world = World::new(
            Grid::new(20, 20),
            Snake { body, direction },
            Some(Food {
                position: food,
                symbol: 3,
            }),
        );
        Session::from_world(config, engine, world)
    }

    fn straight(head: Point, direction: Direction, len: usize) -> Vec<Point> {
        Snake::new(&Grid::new(20, 20), head, direction, len).body
    }

    #[test]
    fn test_starts_in_auto() {
        let session = Session::new(config(), Grid::new(30, 20));
        assert_eq!(session.state(), GameState::Auto);
        assert_eq!(session.score(), 0);
        assert_eq!(session.message(), Some("Press arrow keys to start game"));
        assert!(!session.help_visible());
    }

    #[test]
    fn test_first_arrow_starts_playing_without_steering() {
        let mut session = session_with(
            config(),
            straight(Point::new(5, 5), Direction::Right, 4),
            Direction::Right,
            Point::new(15, 15),
        );

        session.direction_input(Direction::Up);

        assert_eq!(session.state(), GameState::Playing);
        assert_eq!(
            session.drain_events(),
            vec![GameEvent::StateChanged(GameState::Playing)]
        );

        session.tick();
        assert_eq!(session.world().snake.head(), Point::new(6, 5));
    }

    #[test]
    fn test_space_toggles_pause() {
        let mut session = Session::new(config(), Grid::new(30, 20));

        // SPACE does nothing in AUTO
        session.toggle_pause();
        assert_eq!(session.state(), GameState::Auto);

        session.direction_input(Direction::Up);
        session.toggle_pause();
        assert_eq!(session.state(), GameState::Paused);
        session.toggle_pause();
        assert_eq!(session.state(), GameState::Playing);

        let states: Vec<GameEvent> = session
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::StateChanged(_)))
            .collect();
        assert_eq!(
            states,
            vec![
                GameEvent::StateChanged(GameState::Playing),
                GameEvent::StateChanged(GameState::Paused),
                GameEvent::StateChanged(GameState::Playing),
            ]
        );
    }

    #[test]
    fn test_message_blanks_then_reappears() {
        let mut session = Session::new(config(), Grid::new(30, 20));
        session.direction_input(Direction::Down);

        assert_eq!(session.message(), None);
        session.frame(Duration::from_millis(300));
        assert_eq!(session.message(), None);
        session.frame(Duration::from_millis(250));
        assert_eq!(session.message(), Some("Press SPACE to pause"));

        session.toggle_pause();
        session.frame(Duration::from_millis(600));
        assert_eq!(session.message(), Some("Press SPACE to resume"));
    }

    #[test]
    fn test_message_tap_only_in_touch_profile() {
        let mut desktop = Session::new(config(), Grid::new(30, 20));
        assert!(!desktop.tap_message());
        assert_eq!(desktop.state(), GameState::Auto);

        let touch_config = GameConfig {
            touch: true,
            ..config()
        };
        let mut touch = Session::new(touch_config, Grid::new(30, 20));
        assert_eq!(touch.message(), Some("Tap here to start the game"));

        assert!(touch.tap_message());
        assert_eq!(touch.state(), GameState::Playing);
        assert!(touch.tap_message());
        assert_eq!(touch.state(), GameState::Paused);
        assert!(touch.tap_message());
        assert_eq!(touch.state(), GameState::Playing);

        touch.frame(Duration::from_millis(500));
        assert_eq!(touch.message(), Some("Tap here to pause"));
    }

    #[test]
    fn test_direction_input_ignored_while_paused() {
        let mut session = session_with(
            config(),
            straight(Point::new(5, 5), Direction::Right, 4),
            Direction::Right,
            Point::new(15, 15),
        );
        session.direction_input(Direction::Up);
        session.toggle_pause();
        session.direction_input(Direction::Down);

        assert!(session.queue.is_empty());
    }

    #[test]
    fn test_queued_turns_apply_on_next_tick() {
        let mut session = session_with(
            config(),
            straight(Point::new(5, 5), Direction::Right, 4),
            Direction::Right,
            Point::new(15, 15),
        );
        session.direction_input(Direction::Right);
        session.direction_input(Direction::Up);
        session.direction_input(Direction::Down);

        session.tick();

        assert_eq!(session.heading(), Direction::Up);
        assert_eq!(session.world().snake.head(), Point::new(5, 4));
    }

    #[test]
    fn test_score_events_on_eating_and_trim() {
        let mut session = session_with(
            config(),
            straight(Point::new(5, 5), Direction::Right, 4),
            Direction::Right,
            Point::new(6, 5),
        );
        session.direction_input(Direction::Right);
        session.drain_events();

        session.tick();
        let events = session.drain_events();
        assert!(events.contains(&GameEvent::FoodEaten(Point::new(6, 5))));
        assert!(events.contains(&GameEvent::ScoreChanged(1)));
        assert_eq!(session.world().snake.len(), MINIMUM_LENGTH + 1);

        // No change, no event
        session.world.food = Some(Food {
            position: Point::new(15, 15),
            symbol: 0,
        });
        session.tick();
        assert!(!session
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::ScoreChanged(_))));
    }

    #[test]
    fn test_trim_publishes_deduction() {
        let body = vec![
            Point::new(5, 5),
            Point::new(5, 6),
            Point::new(4, 6),
            Point::new(4, 5),
            Point::new(4, 4),
            Point::new(5, 4),
            Point::new(6, 4),
            Point::new(7, 4),
        ];
        let mut session = session_with(config(), body, Direction::Left, Point::new(15, 15));
        session.direction_input(Direction::Left);
        session.drain_events();

        session.tick();

        let events = session.drain_events();
        assert!(events.contains(&GameEvent::ScoreDeduction(Deduction {
            at: Point::new(5, 5),
            amount: 4
        })));
        assert!(events.contains(&GameEvent::ScoreChanged(0)));
    }

    #[test]
    fn test_frame_steps_follow_speed() {
        let mut session = Session::new(config(), Grid::new(30, 20));
        assert_eq!(session.frame(Duration::from_millis(50)), 0);
        assert_eq!(session.frame(Duration::from_millis(50)), 1);
        assert_eq!(session.frame(Duration::from_secs(10)), 3);
        assert!(session.world().snake.len() >= MINIMUM_LENGTH);
    }

    #[test]
    fn test_help_toggle() {
        let mut session = Session::new(config(), Grid::new(30, 20));
        session.toggle_help();
        assert!(session.help_visible());
        session.toggle_help();
        assert!(!session.help_visible());
        session.toggle_help();
        session.hide_help();
        assert!(!session.help_visible());
    }

    #[test]
    fn test_resize_keeps_world_in_bounds() {
        let mut session = Session::new(config(), Grid::new(60, 40));
        let smaller = Grid::new(12, 8);
        session.resize(smaller);

        let world = session.world();
        assert_eq!(world.grid, smaller);
        assert!(world.snake.body.iter().all(|p| smaller.contains(*p)));
        assert!(smaller.contains(world.food.unwrap().position));
    }
}
