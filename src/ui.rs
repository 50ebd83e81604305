#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Allow truncation when casting from usize to u16 since board dimensions are always small
    clippy::cast_possible_truncation
)]

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::components::CellState;
use crate::game::{BOARD_HEIGHT, BOARD_WIDTH, PIECE_SIZE};
use crate::generator::PiecePattern;
use crate::snapshot::GameSnapshot;

// Each cell is 2 characters wide, 1 tall
const CELL_WIDTH: u16 = 2;
const BOARD_AREA_WIDTH: u16 = BOARD_WIDTH as u16 * CELL_WIDTH + 2;
const BOARD_AREA_HEIGHT: u16 = BOARD_HEIGHT as u16 + 2;
const INFO_WIDTH: u16 = 24;

#[must_use]
pub fn min_terminal_size() -> (u16, u16) {
    (BOARD_AREA_WIDTH + INFO_WIDTH, BOARD_AREA_HEIGHT)
}

pub fn render(f: &mut Frame, snapshot: &GameSnapshot, show_controls: bool) {
    let (min_width, min_height) = min_terminal_size();
    if f.area().width < min_width || f.area().height < min_height {
        let warning = Paragraph::new(
            "Terminal too small!\nPlease resize your terminal\nto continue playing.",
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("gridfall"));
        f.render_widget(warning, centered_rect(80, 50, f.area()));
        return;
    }

    if snapshot.game_over {
        let prompt = Paragraph::new("PRESS [ENTER] TO PLAY AGAIN")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        let area = f.area();
        let line = Rect {
            x: area.x,
            y: area.y + area.height / 2,
            width: area.width,
            height: 1,
        };
        f.render_widget(prompt, line);
        return;
    }

    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(BOARD_AREA_WIDTH),
            Constraint::Min(INFO_WIDTH),
        ])
        .split(f.area());

    let board_area = Rect {
        height: BOARD_AREA_HEIGHT,
        ..main_layout[0]
    };
    render_board(f, snapshot, board_area);
    render_info(f, snapshot, main_layout[1], show_controls);

    if snapshot.paused {
        let banner = Paragraph::new("GAME PAUSED")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD))
            .block(Block::default().borders(Borders::ALL));
        let area = centered_rect(60, 20, board_area);
        f.render_widget(Clear, area);
        f.render_widget(banner, area);
    }
}

fn cell_style(cell: CellState, fade_highlight: bool) -> (&'static str, Color) {
    match cell {
        CellState::Empty => (" .", Color::DarkGray),
        CellState::Moving => ("██", Color::White),
        CellState::Full => ("██", Color::Gray),
        CellState::Block => ("▒▒", Color::DarkGray),
        CellState::Fading if fade_highlight => ("██", Color::Red),
        CellState::Fading => ("██", Color::Gray),
    }
}

fn render_board(f: &mut Frame, snapshot: &GameSnapshot, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("gridfall");
    let inner = block.inner(area);
    f.render_widget(block, area);

    for (y, row) in snapshot.board.rows().enumerate() {
        for (x, cell) in row.into_iter().enumerate() {
            let (symbol, color) = cell_style(cell, snapshot.fade_highlight);
            let cell_x = inner.left() + x as u16 * CELL_WIDTH;
            let cell_y = inner.top() + y as u16;
            if cell_x + 1 < inner.right() && cell_y < inner.bottom() {
                put_cell(f.buffer_mut(), cell_x, cell_y, symbol, color);
            }
        }
    }
}

fn put_cell(buffer: &mut Buffer, x: u16, y: u16, symbol: &str, color: Color) {
    for (offset, ch) in symbol.chars().enumerate() {
        if let Some(cell) = buffer.cell_mut((x + offset as u16, y)) {
            cell.set_char(ch);
            cell.set_fg(color);
        }
    }
}

fn render_info(f: &mut Frame, snapshot: &GameSnapshot, area: Rect, show_controls: bool) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),                      // Title
            Constraint::Length(PIECE_SIZE as u16 + 2), // Preview
            Constraint::Length(2),                      // Lines
            Constraint::Min(0),                         // Controls
        ])
        .split(area);

    f.render_widget(Paragraph::new("INCOMING:"), layout[0]);
    render_preview(f, &snapshot.incoming, layout[1]);
    f.render_widget(
        Paragraph::new(format!("LINES:      {:04}", snapshot.lines)),
        layout[2],
    );

    if show_controls {
        let controls = Paragraph::new(
            "Controls:\n\
            ←/→: Move left/right\n\
            ↓: Fast fall\n\
            ↑/Space: Rotate\n\
            P: Pause\n\
            Enter: Play again\n\
            Q: Quit",
        )
        .block(Block::default().borders(Borders::TOP))
        .wrap(Wrap { trim: true });
        f.render_widget(controls, layout[3]);
    }
}

fn render_preview(f: &mut Frame, pattern: &PiecePattern, area: Rect) {
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    for y in 0..PIECE_SIZE {
        for x in 0..PIECE_SIZE {
            let (symbol, color) = if pattern.is_set(x, y) {
                ("██", Color::Gray)
            } else {
                (" .", Color::DarkGray)
            };
            let cell_x = inner.left() + x as u16 * CELL_WIDTH;
            let cell_y = inner.top() + y as u16;
            if cell_x + 1 < inner.right() && cell_y < inner.bottom() {
                put_cell(f.buffer_mut(), cell_x, cell_y, symbol, color);
            }
        }
    }
}

/// Helper function to create a centered rect using up certain percentage of the available rect
#[must_use]
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
