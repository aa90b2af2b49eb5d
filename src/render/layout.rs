//! Screen regions of the HUD and pointer hit testing.

use ratatui::layout::{Position, Rect};

use crate::game::{Direction, Point};

/// Width reserved for the status message; fits the longest message
pub const MESSAGE_WIDTH: u16 = 34;
const PAD_BUTTON_WIDTH: u16 = 5;
const HELP_WIDTH: u16 = 52;
const HELP_HEIGHT: u16 = 16;
const PANEL_MAX_WIDTH: u16 = 84;

/// What a pointer press landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    HelpIcon,
    Message,
    Pad(Direction),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HudLayout {
    pub board: Rect,
    pub score: Rect,
    pub help_icon: Rect,
    pub message: Rect,
    pub panel: Rect,
    pub help: Rect,
    /// Direction pad buttons, only laid out when the pad is shown
    pub pad: Option<[(Direction, Rect); 4]>,
}

impl HudLayout {
    pub fn new(area: Rect, show_pad: bool) -> Self {
        let bottom = area.bottom().saturating_sub(1);

        let score = Rect::new(area.x + 1, area.y, 16.min(area.width), 1).intersection(area);
        let help_icon = Rect::new(area.right().saturating_sub(4), area.y, 3, 1).intersection(area);
        let message = Rect::new(area.x + 1, bottom, MESSAGE_WIDTH, 1).intersection(area);

        let panel_width = area.width.saturating_sub(4).min(PANEL_MAX_WIDTH);
        let panel_height = area.height.saturating_sub(4);
        let panel = centered(area, panel_width, panel_height);
        let help = centered(area, HELP_WIDTH, HELP_HEIGHT);

        let pad = show_pad.then(|| {
            let width = PAD_BUTTON_WIDTH * 3;
            let left = area.right().saturating_sub(width + 1);
            let top = bottom.saturating_sub(3);
            let button = |col: u16, row: u16| {
                Rect::new(left + col * PAD_BUTTON_WIDTH, top + row, PAD_BUTTON_WIDTH, 1)
                    .intersection(area)
            };
            [
                (Direction::Up, button(1, 0)),
                (Direction::Left, button(0, 1)),
                (Direction::Right, button(2, 1)),
                (Direction::Down, button(1, 2)),
            ]
        });

        Self {
            board: area,
            score,
            help_icon,
            message,
            panel,
            help,
            pad,
        }
    }

    /// Find what sits under a terminal cell. The pad wins over everything
    /// else since it is drawn on top.
    pub fn hit(&self, column: u16, row: u16) -> Option<Hit> {
        let at = Position::new(column, row);

        if let Some(pad) = &self.pad {
            if let Some((direction, _)) = pad.iter().find(|(_, rect)| rect.contains(at)) {
                return Some(Hit::Pad(*direction));
            }
        }
        if self.help_icon.contains(at) {
            return Some(Hit::HelpIcon);
        }
        if self.message.contains(at) {
            return Some(Hit::Message);
        }
        None
    }

    /// Top-left terminal cell of a grid cell, if it is on screen
    pub fn cell_origin(&self, p: Point, cell_width: u16, cell_height: u16) -> Option<(u16, u16)> {
        let x = u16::try_from(p.x).ok()?.checked_mul(cell_width)?;
        let y = u16::try_from(p.y).ok()?.checked_mul(cell_height)?;
        let x = self.board.x.checked_add(x)?;
        let y = self.board.y.checked_add(y)?;

        (x < self.board.right() && y < self.board.bottom()).then_some((x, y))
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
