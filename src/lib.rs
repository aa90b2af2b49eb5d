//! Retro Resume - a resume that hides behind a game of Snake
//!
//! This library provides:
//! - Core game logic (game module), free of terminal I/O
//! - Keyboard and pointer gesture input (input module)
//! - TUI rendering of the board, HUD and resume panel (render module)
//! - Resume data and its plain-text/markdown export (resume module)
//! - The interactive terminal mode (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod resume;
