pub mod gesture;
pub mod handler;

pub use gesture::{Gesture, GestureTracker};
pub use handler::{InputHandler, KeyAction};
