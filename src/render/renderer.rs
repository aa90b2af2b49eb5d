use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Clear, Paragraph, Wrap},
    Frame,
};
use std::time::Duration;

use super::layout::HudLayout;
use super::theme::Theme;
use crate::game::{Deduction, Direction, GameConfig, Session};
use crate::metrics::GameMetrics;
use crate::resume::{blocks, Block as ResumeBlock, Headings, Resume};

/// Lines moved by one scroll step
const SCROLL_STEP: u16 = 5;
const SKILL_BAR_WIDTH: usize = 10;

/// Floating `-N` shown where the snake was trimmed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeductionCue {
    pub deduction: Deduction,
    remaining: Duration,
}

impl DeductionCue {
    pub fn new(deduction: Deduction, lifetime: Duration) -> Self {
        Self {
            deduction,
            remaining: lifetime,
        }
    }

    /// Age the cue; returns false once it should disappear
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        self.remaining = self.remaining.saturating_sub(elapsed);
        !self.remaining.is_zero()
    }
}

pub struct Renderer {
    theme: Theme,
    resume: Vec<ResumeBlock>,
    email: String,
    scroll: u16,
    cell_width: u16,
    cell_height: u16,
}

impl Renderer {
    pub fn new(config: &GameConfig, resume: &Resume, theme: Theme) -> Self {
        Self {
            theme,
            resume: blocks(resume),
            email: resume.basics.email.clone(),
            scroll: 0,
            cell_width: config.cell_width.max(1),
            cell_height: config.cell_height.max(1),
        }
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(SCROLL_STEP);
    }

    pub fn scroll_down(&mut self) {
        let max = u16::try_from(self.resume.len()).unwrap_or(u16::MAX);
        self.scroll = self.scroll.saturating_add(SCROLL_STEP).min(max);
    }

    pub fn scroll_top(&mut self) {
        self.scroll = 0;
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        session: &Session,
        metrics: &GameMetrics,
        cues: &[DeductionCue],
        layout: &HudLayout,
    ) {
        let background = Block::default().style(Style::default().bg(self.theme.bg));
        frame.render_widget(background, layout.board);

        // Snake and food share one surface, redrawn every frame
        self.draw_board(frame.buffer_mut(), session, layout);

        if session.state().shows_resume() {
            self.render_resume(frame, layout.panel);
        }

        self.draw_cues(frame.buffer_mut(), cues, layout);

        let score = self.render_score(session, metrics);
        frame.render_widget(score, layout.score);

        if let Some(text) = session.message() {
            let message = Paragraph::new(Line::from(Span::styled(
                text,
                Style::default().fg(self.theme.fg).add_modifier(Modifier::BOLD),
            )));
            frame.render_widget(message, layout.message);
        }

        let icon = Paragraph::new(Span::styled(
            "[?]",
            Style::default().fg(self.theme.key).add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(icon, layout.help_icon);

        if let Some(pad) = &layout.pad {
            for (direction, rect) in pad {
                let arrow = match direction {
                    Direction::Up => "[ ↑ ]",
                    Direction::Down => "[ ↓ ]",
                    Direction::Left => "[ ← ]",
                    Direction::Right => "[ → ]",
                };
                let button = Paragraph::new(Span::styled(
                    arrow,
                    Style::default().fg(self.theme.bg).bg(self.theme.accent),
                ));
                frame.render_widget(button, *rect);
            }
        }

        if session.help_visible() {
            self.render_help(frame, layout.help, session.config().touch);
        }
    }

    fn draw_board(&self, buf: &mut Buffer, session: &Session, layout: &HudLayout) {
        let world = session.world();

        for (index, segment) in world.snake.body.iter().enumerate().rev() {
            let Some((x, y)) = layout.cell_origin(*segment, self.cell_width, self.cell_height) else {
                continue;
            };
            let mut style = Style::default()
                .fg(self.theme.segment(index))
                .bg(self.theme.snake_border);
            if index == 0 {
                style = style.add_modifier(Modifier::BOLD);
            }
            self.fill_cell(buf, layout.board, x, y, &self.segment_glyph(), style);
        }

        if let Some(food) = world.food {
            if let Some((x, y)) = layout.cell_origin(food.position, self.cell_width, self.cell_height) {
                // Fruit symbols are two columns wide
                let glyph = if self.cell_width >= 2 { food.glyph() } else { "●" };
                let style = Style::default().fg(self.theme.food);
                buf.set_stringn(x, y, glyph, usize::from(layout.board.right() - x), style);
            }
        }
    }

    /// `▐██▌` leaves a half-column stroke on each side of the cell
    fn segment_glyph(&self) -> String {
        match self.cell_width {
            1 => "█".to_string(),
            w => format!("▐{}▌", "█".repeat(usize::from(w) - 2)),
        }
    }

    fn fill_cell(&self, buf: &mut Buffer, area: Rect, x: u16, y: u16, glyph: &str, style: Style) {
        for row in 0..self.cell_height {
            let Some(line) = y.checked_add(row).filter(|line| *line < area.bottom()) else {
                break;
            };
            buf.set_stringn(x, line, glyph, usize::from(area.right() - x), style);
        }
    }

    fn draw_cues(&self, buf: &mut Buffer, cues: &[DeductionCue], layout: &HudLayout) {
        let style = Style::default()
            .fg(self.theme.deduction)
            .add_modifier(Modifier::BOLD);

        for cue in cues {
            let at = cue.deduction.at;
            if let Some((x, y)) = layout.cell_origin(at, self.cell_width, self.cell_height) {
                // Float one row above the cell when there is room
                let y = y.checked_sub(1).unwrap_or(y);
                let text = format!("-{}", cue.deduction.amount);
                buf.set_stringn(x, y, text, usize::from(layout.board.right() - x), style);
            }
        }
    }

    fn render_score(&self, session: &Session, metrics: &GameMetrics) -> Paragraph<'_> {
        let mut spans = vec![
            Span::styled("SCORE ", Style::default().fg(self.theme.score)),
            Span::styled(
                session.score().to_string(),
                Style::default()
                    .fg(self.theme.fg)
                    .add_modifier(Modifier::BOLD),
            ),
        ];
        if metrics.best_score > 0 {
            spans.push(Span::styled(
                format!(" HI {}", metrics.best_score),
                Style::default().fg(self.theme.muted),
            ));
        }

        Paragraph::new(Line::from(spans))
    }

    fn render_resume(&self, frame: &mut Frame, area: Rect) {
        let lines: Vec<Line> = self
            .resume
            .iter()
            .map(|block| self.resume_line(block))
            .collect();

        let panel = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0))
            .style(Style::default().fg(self.theme.fg).bg(self.theme.panel_bg))
            .block(
                Block::bordered()
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(self.theme.panel_border))
                    .title(" RESUME ")
                    .title_bottom(Line::from(" PgUp/PgDn scroll  h help ").right_aligned()),
            );

        frame.render_widget(Clear, area);
        frame.render_widget(panel, area);
    }

    fn resume_line(&self, block: &ResumeBlock) -> Line<'static> {
        let theme = &self.theme;
        let bold = Style::default().add_modifier(Modifier::BOLD);

        match block {
            ResumeBlock::Name(name) => Line::from(Span::styled(
                name.clone(),
                bold.fg(theme.accent),
            )),
            ResumeBlock::Label(label) => {
                Line::from(Span::styled(label.clone(), Style::default().fg(theme.muted)))
            }
            ResumeBlock::Paragraph(text) => Line::from(text.clone()),
            ResumeBlock::Field { label, value } => Line::from(vec![
                Span::styled(format!("{}: ", label), bold),
                Span::raw(value.clone()),
            ]),
            ResumeBlock::Heading(section) => Line::from(Span::styled(
                Headings::Retro.for_section(*section),
                bold.fg(theme.score),
            )),
            ResumeBlock::Subheading(text) => Line::from(Span::styled(text.clone(), bold)),
            ResumeBlock::Meta(text) => {
                Line::from(Span::styled(text.clone(), Style::default().fg(theme.muted)))
            }
            ResumeBlock::Bullet(text) => Line::from(format!(" • {}", text)),
            ResumeBlock::Skill { name, level } => {
                let filled = (usize::from(*level) * SKILL_BAR_WIDTH / 100).min(SKILL_BAR_WIDTH);
                Line::from(vec![
                    Span::raw(format!(" {:<28}", name)),
                    Span::styled("█".repeat(filled), Style::default().fg(theme.snake_neck)),
                    Span::styled(
                        "░".repeat(SKILL_BAR_WIDTH - filled),
                        Style::default().fg(theme.muted),
                    ),
                    Span::raw(format!(" {}%", level)),
                ])
            }
            ResumeBlock::Entry { name, detail } => Line::from(vec![
                Span::raw(format!(" {} ", name)),
                Span::styled(detail.clone(), Style::default().fg(theme.muted)),
            ]),
            ResumeBlock::Tags { label, items } => {
                let mut spans = Vec::new();
                if let Some(label) = label {
                    spans.push(Span::styled(format!(" {}: ", label), bold));
                } else {
                    spans.push(Span::raw("   "));
                }
                spans.push(Span::styled(
                    items.join(" · "),
                    Style::default().fg(theme.accent),
                ));
                Line::from(spans)
            }
            ResumeBlock::Link { label, url } => Line::from(vec![
                Span::styled(format!("{} ", label), bold.fg(theme.accent)),
                Span::styled(
                    url.clone(),
                    Style::default()
                        .fg(theme.muted)
                        .add_modifier(Modifier::UNDERLINED),
                ),
            ]),
            ResumeBlock::Blank => Line::from(""),
        }
    }

    fn render_help(&self, frame: &mut Frame, area: Rect, touch: bool) {
        let key = Style::default().fg(self.theme.key).add_modifier(Modifier::BOLD);
        let heading = Style::default()
            .fg(self.theme.accent)
            .add_modifier(Modifier::BOLD);

        let controls: &[(&str, &str)] = if touch {
            &[
                ("Pad", "Control snake direction"),
                ("Swipe", "Quick swipe in any direction"),
                ("Drag", "Hold and drag to keep steering"),
                ("Message", "Click the message to pause/resume"),
            ]
        } else {
            &[
                ("↑ ↓ ← →", "Control snake direction"),
                ("SPACE", "Pause/Resume game"),
            ]
        };

        let mut lines = vec![Line::from(Span::styled("GAME CONTROLS", heading))];
        for (keys, what) in controls.iter().chain(&[
            ("H", "Toggle this help screen"),
            ("T", "Switch dark/light theme"),
            ("Q", "Quit"),
        ]) {
            lines.push(Line::from(vec![
                Span::styled(format!(" {:<8}", keys), key),
                Span::raw(*what),
            ]));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("HOW TO PLAY", heading)));
        lines.push(Line::from(
            "Collect fruit to grow and score. Running into yourself trims the snake, \
             but never below its starting length.",
        ));
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Report bugs at: ", Style::default().fg(self.theme.muted)),
            Span::styled(self.email.clone(), Style::default().fg(self.theme.accent)),
        ]));

        let help = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .alignment(Alignment::Left)
            .style(Style::default().fg(self.theme.fg).bg(self.theme.panel_bg))
            .block(
                Block::bordered()
                    .border_type(BorderType::Thick)
                    .border_style(Style::default().fg(self.theme.key))
                    .title(" HELP ")
                    .title_bottom(Line::from(" h to close ").centered()),
            );

        frame.render_widget(Clear, area);
        frame.render_widget(help, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Food, GameEngine, Grid, Point, Snake, World};
    use ratatui::{backend::TestBackend, Terminal};

    fn session() -> Session {
        let config = GameConfig::default();
        let engine = GameEngine::with_seed(&config, 1);
        let grid = Grid::new(40, 20);
        let world = World::new(
            grid,
            Snake::new(&grid, Point::new(10, 5), Direction::Right, 4),
            Some(Food {
                position: Point::new(30, 15),
                symbol: 0,
            }),
        );
        Session::from_world(config, engine, world)
    }

    fn renderer() -> Renderer {
        Renderer::new(
            &GameConfig::default(),
            &Resume::embedded().unwrap(),
            Theme::dark(),
        )
    }

    fn draw(renderer: &Renderer, session: &Session, cues: &[DeductionCue]) -> Buffer {
        let backend = TestBackend::new(80, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                let layout = HudLayout::new(frame.area(), false);
                renderer.render(frame, session, &GameMetrics::new(), cues, &layout);
            })
            .unwrap();
        terminal.backend().buffer().clone()
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_cue_expires() {
        let deduction = Deduction {
            at: Point::new(1, 1),
            amount: 3,
        };
        let mut cue = DeductionCue::new(deduction, Duration::from_millis(1500));
        assert!(cue.tick(Duration::from_millis(1000)));
        assert!(!cue.tick(Duration::from_millis(500)));
    }

    #[test]
    fn test_scroll_bounds() {
        let mut renderer = renderer();
        renderer.scroll_up();
        assert_eq!(renderer.scroll(), 0);

        for _ in 0..1000 {
            renderer.scroll_down();
        }
        assert_eq!(renderer.scroll() as usize, renderer.resume.len());

        renderer.scroll_top();
        assert_eq!(renderer.scroll(), 0);
    }

    #[test]
    fn test_resume_panel_uses_retro_headings() {
        let renderer = renderer();
        let lines: Vec<String> = renderer
            .resume
            .iter()
            .map(|b| renderer.resume_line(b).to_string())
            .collect();

        assert!(lines.iter().any(|l| l == "[JOB DUNGEONS]"));
        assert!(lines.iter().any(|l| l == "[POWER UPS]"));
        assert!(!lines.iter().any(|l| l == "Work Experience"));
    }

    #[test]
    fn test_draws_score_and_message() {
        let buf = draw(&renderer(), &session(), &[]);

        assert!(row_text(&buf, 0).contains("SCORE 0"));
        assert!(row_text(&buf, 0).contains("[?]"));
        assert!(row_text(&buf, 19).contains("Press arrow keys to start game"));
    }

    #[test]
    fn test_snake_drawn_without_panel_while_playing() {
        let mut session = session();
        session.direction_input(Direction::Up);
        let buf = draw(&renderer(), &session, &[]);

        // Head at grid (10, 5) -> columns 20..22, row 5
        assert_eq!(buf[(20, 5)].symbol(), "▐");
        assert_eq!(buf[(21, 5)].symbol(), "▌");
        let screen: String = (0..buf.area.height).map(|y| row_text(&buf, y)).collect();
        assert!(!screen.contains("RESUME"));
    }

    #[test]
    fn test_deduction_cue_drawn_above_cell() {
        let mut session = session();
        session.direction_input(Direction::Up);
        let cue = DeductionCue::new(
            Deduction {
                at: Point::new(25, 10),
                amount: 4,
            },
            Duration::from_secs(1),
        );
        let buf = draw(&renderer(), &session, &[cue]);

        assert!(row_text(&buf, 9).contains("-4"));
    }

    #[test]
    fn test_help_overlay_shows_email() {
        let mut session = session();
        session.toggle_help();
        let buf = draw(&renderer(), &session, &[]);

        let screen: String = (0..buf.area.height).map(|y| row_text(&buf, y)).collect();
        assert!(screen.contains("GAME CONTROLS"));
        assert!(screen.contains("alex.parker@example.com"));
    }
}
