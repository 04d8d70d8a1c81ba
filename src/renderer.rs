use std::io;

use ratatui::Frame;
use ratatui::Terminal;
use ratatui::backend::Backend;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph};

use crate::config::{BORDER_HALF_BLOCK, CELL_COLUMNS, GLYPH_CELL, PALETTE_CLASSIC, Palette};
use crate::engine::FrameState;
use crate::game_loop::Renderer;
use crate::grid::Vector2i;

/// Draws frames into a ratatui terminal.
pub struct TerminalRenderer<B: Backend> {
    terminal: Terminal<B>,
    palette: Palette,
}

impl<B: Backend> TerminalRenderer<B> {
    #[must_use]
    pub fn new(terminal: Terminal<B>) -> Self {
        Self::with_palette(terminal, PALETTE_CLASSIC)
    }

    #[must_use]
    pub fn with_palette(terminal: Terminal<B>, palette: Palette) -> Self {
        Self { terminal, palette }
    }

    #[must_use]
    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }
}

impl<B: Backend> Renderer for TerminalRenderer<B> {
    fn draw(&mut self, state: &FrameState, paused: bool) -> io::Result<()> {
        let palette = self.palette;
        self.terminal.draw(|frame| render(frame, state, paused, &palette))?;
        Ok(())
    }
}

/// Renders the whole board from a snapshot; nothing carries over between frames.
pub fn render(frame: &mut Frame<'_>, state: &FrameState, paused: bool, palette: &Palette) {
    let area = frame.area();
    let board_area = board_rect(area, state);

    let block = Block::bordered()
        .border_set(BORDER_HALF_BLOCK)
        .border_style(Style::new().fg(palette.border).bg(palette.board_bg))
        .style(Style::new().bg(palette.board_bg));
    let inner = block.inner(board_area);
    frame.render_widget(block, board_area);

    draw_cell(frame, inner, state.apple, palette.apple);
    draw_cell(frame, inner, state.poison_apple, palette.poison_apple);
    for segment in &state.snake {
        draw_cell(frame, inner, *segment, palette.snake);
    }
    for stone in &state.stones {
        draw_cell(frame, inner, *stone, palette.stone);
    }

    let status_y = board_area.bottom();
    if status_y < area.bottom() {
        let status_area = Rect::new(area.x, status_y, area.width, 1);
        frame.render_widget(status_line(state, paused, palette), status_area);
    }
}

fn status_line<'a>(state: &FrameState, paused: bool, palette: &Palette) -> Paragraph<'a> {
    let text = if paused {
        "PAUSED  [p] resume  [q] quit".to_owned()
    } else {
        format!(
            "length {}  tick {}  [p] pause  [q] quit",
            state.snake.len(),
            state.tick
        )
    };

    let mut style = Style::new().fg(palette.status);
    if paused {
        style = style.add_modifier(Modifier::BOLD);
    }

    Paragraph::new(Line::from(text)).style(style)
}

/// Board rectangle including its border, clipped to the available area.
fn board_rect(area: Rect, state: &FrameState) -> Rect {
    let columns = u16::try_from(state.grid.width())
        .unwrap_or(u16::MAX)
        .saturating_mul(CELL_COLUMNS)
        .saturating_add(2);
    let rows = u16::try_from(state.grid.height())
        .unwrap_or(u16::MAX)
        .saturating_add(2);

    Rect::new(
        area.x,
        area.y,
        columns.min(area.width),
        rows.min(area.height.saturating_sub(1)),
    )
}

fn draw_cell(frame: &mut Frame<'_>, inner: Rect, cell: Vector2i, color: Color) {
    let Some((x, y)) = cell_to_terminal(inner, cell) else {
        return;
    };

    frame
        .buffer_mut()
        .set_string(x, y, GLYPH_CELL, Style::new().fg(color));
}

fn cell_to_terminal(inner: Rect, cell: Vector2i) -> Option<(u16, u16)> {
    let x_offset = u16::try_from(cell.x).ok()?.checked_mul(CELL_COLUMNS)?;
    let y_offset = u16::try_from(cell.y).ok()?;

    let x = inner.x.checked_add(x_offset)?;
    let y = inner.y.checked_add(y_offset)?;
    if x.saturating_add(CELL_COLUMNS) > inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}
