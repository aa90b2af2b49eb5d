use clap::ValueEnum;
use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ThemeKind {
    #[default]
    Dark,
    Light,
}

/// Color theme for the TUI
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub kind: ThemeKind,
    /// Board background
    pub bg: Color,
    /// Default text color
    pub fg: Color,
    /// Secondary text (dates, captions)
    pub muted: Color,
    /// Section headings and links
    pub accent: Color,
    /// Brightest snake segment
    pub snake_head: Color,
    /// Segments 1 and 2
    pub snake_neck: Color,
    /// Segment 3, between neck and body
    pub snake_transition: Color,
    pub snake_body: Color,
    /// Stroke drawn around every snake cell
    pub snake_border: Color,
    /// Fallback food color for one-column cells
    pub food: Color,
    pub score: Color,
    pub deduction: Color,
    pub panel_bg: Color,
    pub panel_border: Color,
    /// Key binding text color
    pub key: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn new(kind: ThemeKind) -> Self {
        match kind {
            ThemeKind::Dark => Self::dark(),
            ThemeKind::Light => Self::light(),
        }
    }

    /// Dark theme (default), green phosphor snake
    pub fn dark() -> Self {
        Self {
            kind: ThemeKind::Dark,
            bg: Color::Rgb(12, 14, 20),
            fg: Color::Rgb(230, 230, 240),
            muted: Color::Rgb(140, 145, 165),
            accent: Color::Rgb(110, 200, 255),
            snake_head: Color::Rgb(170, 255, 170),
            snake_neck: Color::Rgb(90, 230, 110),
            snake_transition: Color::Rgb(60, 190, 85),
            snake_body: Color::Rgb(40, 150, 65),
            snake_border: Color::Rgb(10, 60, 25),
            food: Color::Rgb(255, 90, 90),
            score: Color::Rgb(255, 210, 100),
            deduction: Color::Rgb(255, 80, 80),
            panel_bg: Color::Rgb(22, 25, 35),
            panel_border: Color::Rgb(130, 140, 170),
            key: Color::Rgb(255, 210, 100),
        }
    }

    pub fn light() -> Self {
        Self {
            kind: ThemeKind::Light,
            bg: Color::Rgb(245, 245, 235),
            fg: Color::Rgb(30, 30, 40),
            muted: Color::Rgb(100, 100, 115),
            accent: Color::Rgb(30, 100, 200),
            snake_head: Color::Rgb(20, 110, 40),
            snake_neck: Color::Rgb(40, 140, 60),
            snake_transition: Color::Rgb(70, 165, 85),
            snake_body: Color::Rgb(100, 185, 110),
            snake_border: Color::Rgb(200, 230, 200),
            food: Color::Rgb(210, 40, 40),
            score: Color::Rgb(190, 110, 10),
            deduction: Color::Rgb(220, 40, 40),
            panel_bg: Color::Rgb(255, 255, 250),
            panel_border: Color::Rgb(60, 60, 80),
            key: Color::Rgb(200, 120, 20),
        }
    }

    pub fn toggled(&self) -> Self {
        match self.kind {
            ThemeKind::Dark => Self::light(),
            ThemeKind::Light => Self::dark(),
        }
    }

    /// Shade for the snake segment at `index`
    pub fn segment(&self, index: usize) -> Color {
        match index {
            0 => self.snake_head,
            1 | 2 => self.snake_neck,
            3 => self.snake_transition,
            _ => self.snake_body,
        }
    }
}
