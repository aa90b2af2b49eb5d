use log::debug;
use std::time::{Duration, Instant};

use crate::game::{GameEvent, GameState};

/// Running totals for the HUD and the exit summary
pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    /// Time spent with the player in control
    pub play_time: Duration,
    pub best_score: u32,
    pub fruit_eaten: u32,
    pub trims: u32,
    pub points_lost: u32,
    state: GameState,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            play_time: Duration::ZERO,
            best_score: 0,
            fruit_eaten: 0,
            trims: 0,
            points_lost: 0,
            state: GameState::Auto,
        }
    }

    pub fn update(&mut self) {
        self.elapsed_time = self.start_time.elapsed();
    }

    /// Account one rendered frame
    pub fn on_frame(&mut self, elapsed: Duration) {
        if self.state == GameState::Playing {
            self.play_time += elapsed;
        }
    }

    pub fn record(&mut self, event: &GameEvent) {
        match event {
            GameEvent::ScoreChanged(score) => {
                self.best_score = self.best_score.max(*score);
            }
            GameEvent::StateChanged(state) => {
                self.state = *state;
            }
            GameEvent::ScoreDeduction(deduction) => {
                self.trims += 1;
                self.points_lost += deduction.amount;
            }
            // Only the player's fruit counts
            GameEvent::FoodEaten(_) if self.state == GameState::Playing => {
                self.fruit_eaten += 1;
            }
            GameEvent::FoodEaten(_) => {}
            GameEvent::FoodUnavailable => {
                debug!("Board full after {} fruit", self.fruit_eaten);
            }
        }
    }

    pub fn format_time(&self) -> String {
        format_duration(self.elapsed_time)
    }

    pub fn format_play_time(&self) -> String {
        format_duration(self.play_time)
    }

    /// One-line summary logged on exit
    pub fn summary(&self) -> String {
        format!(
            "session {} (played {}), best score {}, fruit {}, trims {} (-{})",
            self.format_time(),
            self.format_play_time(),
            self.best_score,
            self.fruit_eaten,
            self.trims,
            self.points_lost
        )
    }
}

fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let minutes = total_secs / 60;
    let seconds = total_secs % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
