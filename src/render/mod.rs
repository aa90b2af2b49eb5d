pub mod layout;
pub mod renderer;
pub mod theme;

pub use layout::{Hit, HudLayout};
pub use renderer::{DeductionCue, Renderer};
pub use theme::{Theme, ThemeKind};
