use anyhow::{Context, Result};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind, MouseEvent,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use log::{debug, info, warn};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::io::{stderr, Stderr};
use std::time::{Duration, Instant};
use tokio::time::{interval, MissedTickBehavior};

use crate::game::{GameConfig, GameEvent, GameState, Grid, Session};
use crate::input::{Gesture, GestureTracker, InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::{DeductionCue, Hit, HudLayout, Renderer, Theme};
use crate::resume::Resume;

/// The interactive resume: snake behind, resume panel in front
pub struct ArcadeMode {
    session: Session,
    renderer: Renderer,
    metrics: GameMetrics,
    input_handler: InputHandler,
    gestures: GestureTracker,
    cues: Vec<DeductionCue>,
    area: Rect,
    should_quit: bool,
}

impl ArcadeMode {
    /// Set up a session sized for a `cols x rows` terminal
    pub fn new(config: GameConfig, resume: &Resume, theme: Theme, cols: u16, rows: u16) -> Self {
        let grid = Grid::from_viewport(cols, rows, config.cell_width, config.cell_height);
        Self::with_session(Session::new(config, grid), resume, theme, cols, rows)
    }

    pub fn with_session(session: Session, resume: &Resume, theme: Theme, cols: u16, rows: u16) -> Self {
        let config = session.config().clone();
        info!(
            "Starting on a {}x{} grid ({}x{} terminal)",
            session.world().grid.width,
            session.world().grid.height,
            cols,
            rows
        );

        Self {
            renderer: Renderer::new(&config, resume, theme),
            gestures: GestureTracker::new(&config),
            session,
            metrics: GameMetrics::new(),
            input_handler: InputHandler::new(),
            cues: Vec::new(),
            area: Rect::new(0, 0, cols, rows),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        self.metrics.update();
        info!("Session over: {}", self.metrics.summary());

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut frame_timer = interval(self.session.config().frame_interval());
        frame_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut last_frame = Instant::now();

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => warn!("Terminal event error: {}", err),
                        None => self.should_quit = true,
                    }
                }

                // Advance the game and redraw
                _ = frame_timer.tick() => {
                    let now = Instant::now();
                    self.on_frame(now.duration_since(last_frame));
                    last_frame = now;

                    let layout = self.layout();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.session, &self.metrics, &self.cues, &layout);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn layout(&self) -> HudLayout {
        let show_pad = self.session.config().touch && self.session.state() != GameState::Auto;
        HudLayout::new(self.area, show_pad)
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            // Only process key press events, not release
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                let action = self.input_handler.handle_key_event(key);
                self.handle_key(action);
            }
            Event::Mouse(mouse) => self.handle_mouse(mouse, Instant::now()),
            Event::Resize(cols, rows) => self.resize(cols, rows),
            _ => {}
        }

        self.drain_events();
    }

    fn handle_key(&mut self, action: KeyAction) {
        match action {
            KeyAction::Move(direction) => self.session.direction_input(direction),
            KeyAction::TogglePause => self.session.toggle_pause(),
            KeyAction::ToggleHelp => self.session.toggle_help(),
            KeyAction::ToggleTheme => self.renderer.toggle_theme(),
            KeyAction::ScrollUp => self.renderer.scroll_up(),
            KeyAction::ScrollDown => self.renderer.scroll_down(),
            KeyAction::ScrollTop => self.renderer.scroll_top(),
            KeyAction::Quit => self.should_quit = true,
            KeyAction::None => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        match mouse.kind {
            MouseEventKind::ScrollUp => {
                self.renderer.scroll_up();
                return;
            }
            MouseEventKind::ScrollDown => {
                self.renderer.scroll_down();
                return;
            }
            _ => {}
        }

        let heading = self.session.heading();
        let Some(gesture) = self.gestures.handle(mouse, now, heading) else {
            return;
        };
        debug!("Gesture {:?}", gesture);

        let layout = self.layout();
        match gesture {
            Gesture::Press { column, row } => match layout.hit(column, row) {
                Some(Hit::HelpIcon) => self.session.toggle_help(),
                Some(Hit::Pad(direction)) => {
                    // A pad press is not the start of a swipe
                    self.gestures.cancel();
                    self.session.direction_input(direction);
                }
                Some(Hit::Message) | None => {}
            },
            Gesture::Drag(direction) | Gesture::Swipe(direction) => {
                self.session.direction_input(direction);
            }
            Gesture::Tap { column, row } => {
                if layout.hit(column, row) == Some(Hit::Message) {
                    self.session.tap_message();
                }
            }
        }
    }

    fn resize(&mut self, cols: u16, rows: u16) {
        let config = self.session.config();
        let grid = Grid::from_viewport(cols, rows, config.cell_width, config.cell_height);
        self.area = Rect::new(0, 0, cols, rows);
        self.session.resize(grid);
    }

    fn on_frame(&mut self, elapsed: Duration) {
        self.session.frame(elapsed);
        self.metrics.on_frame(elapsed);
        self.metrics.update();
        self.cues.retain_mut(|cue| cue.tick(elapsed));
        self.drain_events();
    }

    /// Apply everything the session published since the last drain
    fn drain_events(&mut self) {
        for event in self.session.drain_events() {
            self.metrics.record(&event);

            match event {
                GameEvent::ScoreDeduction(deduction) => {
                    let lifetime = self.session.config().deduction_display();
                    self.cues.push(DeductionCue::new(deduction, lifetime));
                }
                GameEvent::StateChanged(state) => {
                    if state == GameState::Playing {
                        self.renderer.scroll_top();
                    }
                }
                GameEvent::FoodUnavailable => debug!("Food unavailable this step"),
                GameEvent::ScoreChanged(_) | GameEvent::FoodEaten(_) => {}
            }
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(
            terminal.backend_mut(),
            DisableMouseCapture,
            LeaveAlternateScreen
        )
        .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, GameEngine};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton};

    fn mode(touch: bool) -> ArcadeMode {
        let config = GameConfig {
            touch,
            seed: Some(11),
            ..GameConfig::default()
        };
        let grid = Grid::from_viewport(80, 24, config.cell_width, config.cell_height);
        let engine = GameEngine::with_seed(&config, 11);
        let session = Session::with_engine(config, engine, grid);
        ArcadeMode::with_session(session, &Resume::embedded().unwrap(), Theme::dark(), 80, 24)
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_game_initialization() {
        let mode = mode(false);
        assert_eq!(mode.session.state(), GameState::Auto);
        assert_eq!(mode.session.score(), 0);
        assert_eq!(mode.session.world().grid, Grid::new(40, 24));
    }

    #[test]
    fn test_keys_drive_session() {
        let mut mode = mode(false);

        mode.handle_event(key(KeyCode::Left));
        assert_eq!(mode.session.state(), GameState::Playing);

        mode.handle_event(key(KeyCode::Char(' ')));
        assert_eq!(mode.session.state(), GameState::Paused);

        mode.handle_event(key(KeyCode::Char('h')));
        assert!(mode.session.help_visible());

        mode.handle_event(key(KeyCode::Char('q')));
        assert!(mode.should_quit);
    }

    #[test]
    fn test_key_release_ignored() {
        let mut mode = mode(false);
        let mut release = KeyEvent::new(KeyCode::Up, KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;

        mode.handle_event(Event::Key(release));
        assert_eq!(mode.session.state(), GameState::Auto);
    }

    #[test]
    fn test_help_icon_press() {
        let mut mode = mode(false);
        let icon = mode.layout().help_icon;
        let now = Instant::now();

        mode.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), icon.x, icon.y), now);
        assert!(mode.session.help_visible());
        mode.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), icon.x, icon.y), now);
        assert!(mode.session.help_visible());
    }

    #[test]
    fn test_message_tap_in_touch_profile() {
        let mut mode = mode(true);
        let message = mode.layout().message;
        let now = Instant::now();

        mode.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), message.x + 2, message.y), now);
        mode.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), message.x + 2, message.y), now);

        assert_eq!(mode.session.state(), GameState::Playing);
        // The pad appears once the game has started
        assert!(mode.layout().pad.is_some());
    }

    #[test]
    fn test_swipe_starts_game() {
        let mut mode = mode(false);
        let now = Instant::now();

        mode.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 40, 12), now);
        mode.handle_mouse(
            mouse(MouseEventKind::Up(MouseButton::Left), 40, 6),
            now + Duration::from_millis(120),
        );

        assert_eq!(mode.session.state(), GameState::Playing);
    }

    #[test]
    fn test_pad_press_steers() {
        let mut mode = mode(true);
        mode.handle_event(key(KeyCode::Up));
        mode.drain_events();

        let heading = mode.session.heading();
        let turn = if heading.is_horizontal() {
            Direction::Up
        } else {
            Direction::Left
        };
        let pad = mode.layout().pad.unwrap();
        let (_, rect) = pad.iter().find(|(d, _)| *d == turn).copied().unwrap();

        mode.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), rect.x, rect.y), Instant::now());
        mode.session.tick();

        assert_eq!(mode.session.heading(), turn);
    }

    #[test]
    fn test_wheel_scrolls_resume() {
        let mut mode = mode(false);
        mode.handle_mouse(mouse(MouseEventKind::ScrollDown, 10, 10), Instant::now());
        assert!(mode.renderer.scroll() > 0);
        mode.handle_event(key(KeyCode::Home));
        assert_eq!(mode.renderer.scroll(), 0);
    }

    #[test]
    fn test_resize_updates_grid() {
        let mut mode = mode(false);
        mode.handle_event(Event::Resize(40, 12));

        let grid = mode.session.world().grid;
        assert_eq!(grid, Grid::new(20, 12));
        assert!(mode.session.world().snake.body.iter().all(|p| grid.contains(*p)));
        assert_eq!(mode.layout().board, Rect::new(0, 0, 40, 12));
    }

    #[test]
    fn test_frames_collect_cues_and_metrics() {
        let mut mode = mode(false);
        mode.handle_event(key(KeyCode::Right));
        for _ in 0..100 {
            mode.on_frame(Duration::from_millis(16));
        }

        assert!(mode.metrics.play_time >= Duration::from_millis(1500));
        assert!(mode.cues.iter().all(|cue| cue.deduction.amount >= 1));
    }
}
