//! Core game logic for the snake that lives behind the resume
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The terminal host drives it through [`Session`] and reads the world back for drawing.

pub mod action;
pub mod autopilot;
pub mod clock;
pub mod collision;
pub mod config;
pub mod engine;
pub mod events;
pub mod queue;
pub mod session;
pub mod state;

// Re-export commonly used types
pub use action::Direction;
pub use autopilot::Autopilot;
pub use clock::FrameClock;
pub use config::GameConfig;
pub use engine::{Deduction, GameEngine, StepInfo, StepResult};
pub use events::GameEvent;
pub use queue::DirectionQueue;
pub use session::{message_for, Session, StatusMessage};
pub use state::{Food, GameState, Grid, Point, Snake, World, MINIMUM_LENGTH};
