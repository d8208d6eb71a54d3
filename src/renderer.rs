use ratatui::{
    Frame,
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::entities::Bounds;
use crate::game::Game;

/// Sprite sheets the game can blit from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteSheet {
    Beetlemorph,
}

/// One cell of a sprite sheet: `column` is the animation frame, `row` the
/// cosmetic variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteFrame {
    pub sheet: SpriteSheet,
    pub column: u8,
    pub row: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextSize {
    Small,
    #[default]
    Normal,
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextStyle {
    pub align: TextAlign,
    pub size: TextSize,
}

/// Everything the simulation needs from a rendering backend.
///
/// Coordinates are game units; text is positioned by its baseline like a
/// canvas. The game never reads anything back.
pub trait DrawSurface {
    /// Push the current style so it can be restored later
    fn save(&mut self);
    /// Pop the style pushed by the matching `save`
    fn restore(&mut self);
    fn set_text_style(&mut self, style: TextStyle);
    fn fill_rect(&mut self, bounds: Bounds);
    /// Blit the `frame` region of a sprite sheet into `dest`
    fn draw_sprite(&mut self, frame: SpriteFrame, dest: Bounds);
    fn fill_text(&mut self, text: &str, x: f32, y: f32);
}

/// Glyph art for each animation column of a sheet
fn sprite_glyphs(sheet: SpriteSheet, column: u8) -> &'static [&'static str] {
    match sheet {
        SpriteSheet::Beetlemorph => match column {
            0 => &[" \\|/ ", "{===}", " /_\\ "],
            1 => &[" \\ / ", "{=*=}", " / \\ "],
            _ => &[" . . ", " *.* ", " . . "],
        },
    }
}

fn sprite_color(sheet: SpriteSheet, row: u8) -> Color {
    match sheet {
        SpriteSheet::Beetlemorph => match row % 4 {
            0 => Color::Red,
            1 => Color::Magenta,
            2 => Color::Yellow,
            _ => Color::Green,
        },
    }
}

/// [`DrawSurface`] over a ratatui buffer.
///
/// Game units are scaled onto `viewport`; anything outside it is clipped.
pub struct TerminalSurface<'a> {
    buffer: &'a mut Buffer,
    viewport: Rect,
    game_width: f32,
    game_height: f32,
    style: TextStyle,
    saved: Vec<TextStyle>,
}

impl<'a> TerminalSurface<'a> {
    pub fn new(buffer: &'a mut Buffer, viewport: Rect, game_width: f32, game_height: f32) -> Self {
        Self {
            buffer,
            viewport,
            game_width,
            game_height,
            style: TextStyle::default(),
            saved: Vec::new(),
        }
    }

    /// Largest rect inside `area` with the game's aspect ratio, centred
    /// horizontally, leaving one column on each side for a border.
    /// Terminal cells are about twice as tall as they are wide.
    pub fn viewport_for(area: Rect, game_width: f32, game_height: f32) -> Rect {
        let available_width = area.width.saturating_sub(2);
        let ratio = game_width / game_height * 2.0;

        let mut height = area.height;
        let mut width = (height as f32 * ratio) as u16;
        if width > available_width {
            width = available_width;
            height = ((width as f32 / ratio) as u16).min(area.height);
        }

        Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y,
            width,
            height,
        }
    }

    fn to_col(&self, x: f32) -> f32 {
        x * self.viewport.width as f32 / self.game_width
    }

    fn to_row(&self, y: f32) -> f32 {
        y * self.viewport.height as f32 / self.game_height
    }

    /// Cells covered by `bounds`, at least one in each direction, clipped to
    /// the viewport.
    fn cells(&self, bounds: Bounds) -> Option<Rect> {
        let left = self.to_col(bounds.x).floor() as i32;
        let top = self.to_row(bounds.y).floor() as i32;
        let right = (self.to_col(bounds.right()).ceil() as i32).max(left + 1);
        let bottom = (self.to_row(bounds.bottom()).ceil() as i32).max(top + 1);

        let left = left.max(0);
        let top = top.max(0);
        let right = right.min(self.viewport.width as i32);
        let bottom = bottom.min(self.viewport.height as i32);
        if left >= right || top >= bottom {
            return None;
        }

        Some(Rect {
            x: self.viewport.x + left as u16,
            y: self.viewport.y + top as u16,
            width: (right - left) as u16,
            height: (bottom - top) as u16,
        })
    }

    fn put(&mut self, col: i32, row: i32, symbol: char, style: Style) {
        if col < 0
            || row < 0
            || col >= self.viewport.width as i32
            || row >= self.viewport.height as i32
        {
            return;
        }
        let position = (self.viewport.x + col as u16, self.viewport.y + row as u16);
        if let Some(cell) = self.buffer.cell_mut(position) {
            cell.set_char(symbol).set_style(style);
        }
    }
}

impl DrawSurface for TerminalSurface<'_> {
    fn save(&mut self) {
        self.saved.push(self.style);
    }

    fn restore(&mut self) {
        if let Some(style) = self.saved.pop() {
            self.style = style;
        }
    }

    fn set_text_style(&mut self, style: TextStyle) {
        self.style = style;
    }

    fn fill_rect(&mut self, bounds: Bounds) {
        let Some(area) = self.cells(bounds) else {
            return;
        };
        let style = Style::default().fg(Color::White);
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                if let Some(cell) = self.buffer.cell_mut((x, y)) {
                    cell.set_char('█').set_style(style);
                }
            }
        }
    }

    fn draw_sprite(&mut self, frame: SpriteFrame, dest: Bounds) {
        let Some(area) = self.cells(dest) else {
            return;
        };
        let glyphs = sprite_glyphs(frame.sheet, frame.column);
        let style = Style::default()
            .fg(sprite_color(frame.sheet, frame.row))
            .add_modifier(Modifier::BOLD);

        // Centre the art in the covered cells and crop whatever does not fit
        let art_height = glyphs.len() as u16;
        let top_pad = area.height.saturating_sub(art_height) / 2;
        for (i, line) in glyphs.iter().enumerate().take(area.height as usize) {
            let y = area.y + top_pad + i as u16;
            let line_width = line.chars().count() as u16;
            let left_pad = area.width.saturating_sub(line_width) / 2;
            for (j, symbol) in line.chars().enumerate().take(area.width as usize) {
                let x = area.x + left_pad + j as u16;
                if let Some(cell) = self.buffer.cell_mut((x, y)) {
                    cell.set_char(symbol).set_style(style);
                }
            }
        }
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        let length = text.chars().count() as i32;
        let anchor = self.to_col(x).floor() as i32;
        let col = match self.style.align {
            TextAlign::Left => anchor,
            TextAlign::Center => anchor - length / 2,
        };
        // The baseline sits on the row below the glyphs
        let row = self.to_row(y).ceil() as i32 - 1;

        let style = match self.style.size {
            TextSize::Small => Style::default().fg(Color::Gray),
            TextSize::Normal => Style::default().fg(Color::White),
            TextSize::Large => Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        };
        for (i, symbol) in text.chars().enumerate() {
            self.put(col + i as i32, row, symbol, style);
        }
    }
}

/// Draws the game into a terminal frame
#[derive(Debug, Default)]
pub struct GameRenderer {}

impl GameRenderer {
    pub fn new() -> Self {
        Self {}
    }

    /// Advance the game by `delta_ms` and draw it, bordered, with a controls hint.
    pub fn render(&self, frame: &mut Frame, game: &mut Game, delta_ms: f32) {
        let area = frame.area();
        let (game_width, game_height) = (game.width(), game.height());
        // Bottom row is reserved for the controls hint
        let play_area = Rect {
            height: area.height.saturating_sub(1),
            ..area
        };
        let viewport = TerminalSurface::viewport_for(play_area, game_width, game_height);

        let bordered = Rect {
            x: viewport.x.saturating_sub(1),
            y: viewport.y,
            width: (viewport.width + 2).min(area.width),
            height: viewport.height,
        };
        let block = Block::default()
            .borders(Borders::LEFT | Borders::RIGHT)
            .border_style(Style::default().fg(Color::DarkGray));
        frame.render_widget(block, bordered);

        {
            let mut surface =
                TerminalSurface::new(frame.buffer_mut(), viewport, game_width, game_height);
            game.render(&mut surface, delta_ms);
        }

        let controls = Line::from(vec![Span::styled(
            "[←/→ A/D: Move] [Space/1: Fire] [R: Restart] [Q: Quit]",
            Style::default().fg(Color::DarkGray),
        )]);
        let controls_area = Rect {
            x: area.x,
            y: area.y + area.height.saturating_sub(1),
            width: area.width,
            height: 1,
        };
        frame.render_widget(Paragraph::new(controls).centered(), controls_area);
    }
}
