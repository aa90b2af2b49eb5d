use log::debug;
use std::time::Duration;

use super::config::GameConfig;

/// Fixed-step accumulator that turns frame time into movement steps.
///
/// Movement speed stays independent of the frame rate, and at most
/// `max_steps` steps run per frame. When a stall (e.g. a suspended
/// terminal) leaves more backlog than the cap allows, the excess is dropped.
#[derive(Debug, Clone)]
pub struct FrameClock {
    interval: Duration,
    max_steps: u32,
    accumulated: Duration,
}

impl FrameClock {
    pub fn new(interval: Duration, max_steps: u32) -> Self {
        Self {
            interval,
            max_steps: max_steps.max(1),
            accumulated: Duration::ZERO,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.movement_interval(), config.max_steps_per_frame)
    }

    /// Add one frame's elapsed time and return how many steps to run
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.accumulated += elapsed;

        let mut steps = 0;
        while self.accumulated >= self.interval && steps < self.max_steps {
            self.accumulated -= self.interval;
            steps += 1;
        }

        if self.accumulated >= self.interval {
            debug!("Dropping {:?} of movement backlog", self.accumulated);
            self.accumulated = Duration::ZERO;
        }

        steps
    }

    pub fn accumulated(&self) -> Duration {
        self.accumulated
    }

    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
    }
}
