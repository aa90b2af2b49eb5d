//! Pointer gestures over terminal mouse events.
//!
//! Left-button presses, drags and releases are classified the way a touch
//! screen would classify them: a press, a continuous drag, a quick swipe
//! or a tap.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use std::time::{Duration, Instant};

use crate::game::{Direction, GameConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// Button went down at a terminal cell
    Press { column: u16, row: u16 },
    /// Pointer travelled far enough mid-drag to steer
    Drag(Direction),
    /// Quick flick released within the swipe window
    Swipe(Direction),
    /// Short release without meaningful travel
    Tap { column: u16, row: u16 },
}

#[derive(Debug, Clone, Copy)]
struct Touch {
    started: Instant,
    origin: (u16, u16),
    anchor: (u16, u16),
    dragged: bool,
}

#[derive(Debug, Clone)]
pub struct GestureTracker {
    min_distance: f32,
    max_swipe: Duration,
    debounce: Duration,
    /// Columns one terminal row is worth
    row_scale: f32,
    touch: Option<Touch>,
    last_swipe: Option<Instant>,
}

impl GestureTracker {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            min_distance: config.min_swipe_distance,
            max_swipe: config.max_swipe_duration(),
            debounce: config.swipe_debounce(),
            row_scale: f32::from(config.cell_width.max(1)) / f32::from(config.cell_height.max(1)),
            touch: None,
            last_swipe: None,
        }
    }

    /// Feed one mouse event. `heading` is the direction the snake is
    /// travelling, used to decide whether a drag is a real turn.
    pub fn handle(&mut self, event: MouseEvent, now: Instant, heading: Direction) -> Option<Gesture> {
        let at = (event.column, event.row);

        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.debounced(now) {
                    self.touch = None;
                    return None;
                }
                self.touch = Some(Touch {
                    started: now,
                    origin: at,
                    anchor: at,
                    dragged: false,
                });
                Some(Gesture::Press {
                    column: event.column,
                    row: event.row,
                })
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let anchor = self.touch?.anchor;
                let (direction, distance) = self.dominant(anchor, at);
                if distance < self.min_distance {
                    return None;
                }

                if direction == heading || direction.is_opposite(heading) {
                    return None;
                }
                let touch = self.touch.as_mut()?;
                touch.anchor = at;
                touch.dragged = true;
                Some(Gesture::Drag(direction))
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let touch = self.touch.take()?;
                let (direction, distance) = self.dominant(touch.origin, at);

                if distance < self.min_distance {
                    return Some(Gesture::Tap {
                        column: event.column,
                        row: event.row,
                    });
                }

                if now.duration_since(touch.started) > self.max_swipe {
                    return None;
                }

                self.last_swipe = Some(now);
                // A drag already steered during this gesture
                (!touch.dragged).then_some(Gesture::Swipe(direction))
            }
            _ => None,
        }
    }

    /// Forget any gesture in progress
    pub fn cancel(&mut self) {
        self.touch = None;
    }

    fn debounced(&self, now: Instant) -> bool {
        self.last_swipe
            .is_some_and(|last| now.duration_since(last) < self.debounce)
    }

    /// Direction along the dominant axis and the weighted distance
    fn dominant(&self, from: (u16, u16), to: (u16, u16)) -> (Direction, f32) {
        let dx = f32::from(to.0) - f32::from(from.0);
        let dy = (f32::from(to.1) - f32::from(from.1)) * self.row_scale;

        if dx.abs() >= dy.abs() {
            let direction = if dx >= 0.0 {
                Direction::Right
            } else {
                Direction::Left
            };
            (direction, dx.abs())
        } else {
            let direction = if dy > 0.0 { Direction::Down } else { Direction::Up };
            (direction, dy.abs())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn down(column: u16, row: u16) -> MouseEvent {
        mouse(MouseEventKind::Down(MouseButton::Left), column, row)
    }

    fn drag(column: u16, row: u16) -> MouseEvent {
        mouse(MouseEventKind::Drag(MouseButton::Left), column, row)
    }

    fn up(column: u16, row: u16) -> MouseEvent {
        mouse(MouseEventKind::Up(MouseButton::Left), column, row)
    }

    fn tracker() -> GestureTracker {
        GestureTracker::new(&GameConfig::default())
    }

    #[test]
    fn test_press_then_tap() {
        let mut tracker = tracker();
        let t0 = Instant::now();

        assert_eq!(
            tracker.handle(down(10, 4), t0, Direction::Right),
            Some(Gesture::Press { column: 10, row: 4 })
        );
        assert_eq!(
            tracker.handle(up(11, 4), t0 + Duration::from_millis(80), Direction::Right),
            Some(Gesture::Tap { column: 11, row: 4 })
        );
    }

    #[test]
    fn test_quick_flick_is_a_swipe() {
        let mut tracker = tracker();
        let t0 = Instant::now();

        tracker.handle(down(10, 10), t0, Direction::Right);
        assert_eq!(
            tracker.handle(up(10, 6), t0 + Duration::from_millis(150), Direction::Right),
            Some(Gesture::Swipe(Direction::Up))
        );
    }

    #[test]
    fn test_slow_release_is_ignored() {
        let mut tracker = tracker();
        let t0 = Instant::now();

        tracker.handle(down(10, 10), t0, Direction::Up);
        assert_eq!(
            tracker.handle(up(20, 10), t0 + Duration::from_millis(400), Direction::Up),
            None
        );
    }

    #[test]
    fn test_rows_are_weighted_by_cell_aspect() {
        let mut tracker = tracker();
        let t0 = Instant::now();

        // Two rows count as four columns with 2x1 cells
        tracker.handle(down(10, 10), t0, Direction::Right);
        assert_eq!(
            tracker.handle(up(11, 12), t0 + Duration::from_millis(100), Direction::Right),
            Some(Gesture::Swipe(Direction::Down))
        );
    }

    #[test]
    fn test_drag_steers_and_resets_anchor() {
        let mut tracker = tracker();
        let t0 = Instant::now();

        tracker.handle(down(10, 10), t0, Direction::Right);
        assert_eq!(tracker.handle(drag(10, 11), t0, Direction::Right), None);
        assert_eq!(
            tracker.handle(drag(10, 12), t0, Direction::Right),
            Some(Gesture::Drag(Direction::Down))
        );
        // Anchor moved to (10, 12): small wiggles no longer count
        assert_eq!(tracker.handle(drag(11, 12), t0, Direction::Down), None);
        assert_eq!(
            tracker.handle(drag(14, 12), t0, Direction::Down),
            Some(Gesture::Drag(Direction::Right))
        );

        // Steering already happened, so no swipe on release
        assert_eq!(
            tracker.handle(up(14, 12), t0 + Duration::from_millis(100), Direction::Right),
            None
        );
    }

    #[test]
    fn test_drag_along_heading_or_back_is_ignored() {
        let mut tracker = tracker();
        let t0 = Instant::now();

        tracker.handle(down(10, 10), t0, Direction::Right);
        assert_eq!(tracker.handle(drag(15, 10), t0, Direction::Right), None);
        assert_eq!(tracker.handle(drag(9, 10), t0, Direction::Right), None);
    }

    #[test]
    fn test_rejected_drag_keeps_anchor() {
        let mut tracker = tracker();
        let t0 = Instant::now();

        tracker.handle(down(10, 10), t0, Direction::Right);
        // Along the heading: dropped, anchor stays at (10, 10)
        assert_eq!(tracker.handle(drag(14, 10), t0, Direction::Right), None);
        // Still mostly rightward when measured from (10, 10)
        assert_eq!(tracker.handle(drag(15, 12), t0, Direction::Right), None);
        assert_eq!(
            tracker.handle(drag(11, 12), t0, Direction::Right),
            Some(Gesture::Drag(Direction::Down))
        );
    }

    #[test]
    fn test_presses_right_after_swipe_are_debounced() {
        let mut tracker = tracker();
        let t0 = Instant::now();

        tracker.handle(down(10, 10), t0, Direction::Up);
        tracker.handle(up(16, 10), t0 + Duration::from_millis(100), Direction::Up);

        let soon = t0 + Duration::from_millis(150);
        assert_eq!(tracker.handle(down(5, 5), soon, Direction::Right), None);
        assert_eq!(tracker.handle(up(5, 5), soon, Direction::Right), None);

        let later = t0 + Duration::from_millis(250);
        assert_eq!(
            tracker.handle(down(5, 5), later, Direction::Right),
            Some(Gesture::Press { column: 5, row: 5 })
        );
    }

    #[test]
    fn test_other_buttons_ignored() {
        let mut tracker = tracker();
        let event = mouse(MouseEventKind::Down(MouseButton::Right), 1, 1);
        assert_eq!(tracker.handle(event, Instant::now(), Direction::Up), None);
        tracker.cancel();
        assert_eq!(tracker.handle(up(1, 1), Instant::now(), Direction::Up), None);
    }
}
