use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration for the game and its render loop
///
/// Every field has a default, so a JSON config file only needs to name the
/// values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Terminal columns per grid cell
    pub cell_width: u16,
    /// Terminal rows per grid cell
    pub cell_height: u16,
    /// Snake speed in moves per second
    pub moves_per_second: f64,
    /// Safety cap on logical steps performed in one rendered frame
    pub max_steps_per_frame: u32,
    /// Target redraw rate of the render loop
    pub frames_per_second: u32,

    // Autopilot
    /// Chance that the autopilot takes the closest safe direction
    pub greedy_probability: f64,
    /// Period of the idle-mode direction nudge, in milliseconds
    pub nudge_interval_ms: u64,
    /// Chance that a nudge actually turns the snake
    pub nudge_probability: f64,

    // Host UI timings
    /// Blank-out time before a new status message appears
    pub message_delay_ms: u64,
    /// Lifetime of the floating score deduction cue
    pub deduction_display_ms: u64,

    // Pointer gestures
    /// Minimum pointer travel (in columns) for a drag or swipe
    pub min_swipe_distance: f32,
    /// Longest press that still counts as a swipe
    pub max_swipe_ms: u64,
    /// Quiet period after a swipe during which new presses are ignored
    pub swipe_debounce_ms: u64,

    /// Touch profile: tap-oriented messages, message taps and direction pad
    pub touch: bool,
    /// Fixed RNG seed, for reproducible runs
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            cell_width: 2,
            cell_height: 1,
            moves_per_second: 10.0,
            max_steps_per_frame: 3,
            frames_per_second: 60,
            greedy_probability: 0.85,
            nudge_interval_ms: 1000,
            nudge_probability: 0.2,
            message_delay_ms: 500,
            deduction_display_ms: 1500,
            min_swipe_distance: 3.0,
            max_swipe_ms: 300,
            swipe_debounce_ms: 100,
            touch: false,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a configuration with a custom cell size
    pub fn new(cell_width: u16, cell_height: u16) -> Self {
        Self {
            cell_width,
            cell_height,
            ..Default::default()
        }
    }

    /// Load a configuration from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: GameConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        Ok(config)
    }

    /// Time between two snake moves
    pub fn movement_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.moves_per_second)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.frames_per_second))
    }

    pub fn nudge_interval(&self) -> Duration {
        Duration::from_millis(self.nudge_interval_ms)
    }

    pub fn message_delay(&self) -> Duration {
        Duration::from_millis(self.message_delay_ms)
    }

    pub fn deduction_display(&self) -> Duration {
        Duration::from_millis(self.deduction_display_ms)
    }

    pub fn max_swipe_duration(&self) -> Duration {
        Duration::from_millis(self.max_swipe_ms)
    }

    pub fn swipe_debounce(&self) -> Duration {
        Duration::from_millis(self.swipe_debounce_ms)
    }

    /// Validate configuration parameters
    ///
    /// # Returns
    ///
    /// `Ok(())` if all parameters are valid, `Err(String)` with an error message otherwise.
    pub fn validate(&self) -> Result<(), String> {
        if self.cell_width == 0 || self.cell_height == 0 {
            return Err(format!(
                "cell size must be at least 1x1, got {}x{}",
                self.cell_width, self.cell_height
            ));
        }

        if !(self.moves_per_second > 0.0 && self.moves_per_second.is_finite()) {
            return Err(format!(
                "moves_per_second must be positive, got {}",
                self.moves_per_second
            ));
        }

        if self.max_steps_per_frame == 0 {
            return Err("max_steps_per_frame must be at least 1".to_string());
        }

        if self.frames_per_second == 0 {
            return Err("frames_per_second must be at least 1".to_string());
        }

        if !(0.0..=1.0).contains(&self.greedy_probability) {
            return Err(format!(
                "greedy_probability must be in [0, 1], got {}",
                self.greedy_probability
            ));
        }

        if !(0.0..=1.0).contains(&self.nudge_probability) {
            return Err(format!(
                "nudge_probability must be in [0, 1], got {}",
                self.nudge_probability
            ));
        }

        if self.nudge_interval_ms == 0 {
            return Err("nudge_interval_ms must be at least 1".to_string());
        }

        if self.min_swipe_distance <= 0.0 {
            return Err(format!(
                "min_swipe_distance must be positive, got {}",
                self.min_swipe_distance
            ));
        }

        Ok(())
    }
}
