#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Allow truncation when casting from usize to i32 since board dimensions are always small enough to fit in i32
    clippy::cast_possible_truncation,
    // Allow sign loss when going from signed to unsigned types since we validate values are non-negative before casting
    clippy::cast_sign_loss,
    // Allow potential wrapping when casting between types as board coordinates are within reasonable ranges
    clippy::cast_possible_wrap
)]

use log::{debug, trace};

use crate::components::{ActivePiece, Board, CellState, Position};
use crate::game::{BOARD_WIDTH, LAST_PLAY_ROW, SPAWN_X};
use crate::generator::{PieceGenerator, PiecePattern};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    fn dx(self) -> i32 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Descent {
    // The piece moved one row down
    Fell,
    // The piece settled into `Full` cells
    Landed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Rotated,
    // The rotated frame would hit the stack or leave the grid
    Guarded,
}

fn board_cell(position: Position, x: usize, y: usize) -> (i32, i32) {
    (position.x + x as i32, position.y + y as i32)
}

// Returns `false` without touching the board when the spawn area is already
// occupied.
pub fn spawn(board: &mut Board, active: &mut ActivePiece, generator: &mut PieceGenerator) -> bool {
    let pattern = generator.take();
    let position = Position { x: SPAWN_X, y: 0 };

    let blocked = pattern.filled().any(|(px, py)| {
        let (x, y) = board_cell(position, px, py);
        board.get_signed(x, y) != Some(CellState::Empty)
    });
    if blocked {
        debug!("Spawn area occupied, piece cannot enter");
        return false;
    }

    active.pattern = pattern;
    active.position = position;
    stamp(board, active);
    debug!("Spawned piece at ({}, {})", position.x, position.y);
    true
}

fn stamp(board: &mut Board, active: &ActivePiece) {
    for (px, py) in active.pattern.filled() {
        let (x, y) = board_cell(active.position, px, py);
        board.set(x as usize, y as usize, CellState::Moving);
    }
}

fn clear_moving(board: &mut Board) {
    for y in (0..=LAST_PLAY_ROW).rev() {
        for x in 1..BOARD_WIDTH - 1 {
            if board.get(x, y) == CellState::Moving {
                board.set(x, y, CellState::Empty);
            }
        }
    }
}

#[must_use]
pub fn check_detection(board: &Board) -> bool {
    (0..=LAST_PLAY_ROW).rev().any(|y| {
        (1..BOARD_WIDTH - 1).any(|x| {
            board.get(x, y) == CellState::Moving
                && matches!(board.get(x, y + 1), CellState::Full | CellState::Block)
        })
    })
}

pub fn resolve_falling(board: &mut Board, active: &mut ActivePiece, landed: bool) -> Descent {
    if landed {
        for y in (0..=LAST_PLAY_ROW).rev() {
            for x in 1..BOARD_WIDTH - 1 {
                if board.get(x, y) == CellState::Moving {
                    board.set(x, y, CellState::Full);
                }
            }
        }
        debug!(
            "Piece landed at ({}, {})",
            active.position.x, active.position.y
        );
        return Descent::Landed;
    }

    // Bottom-up so a moved cell is never visited twice
    for y in (0..LAST_PLAY_ROW).rev() {
        for x in 1..BOARD_WIDTH - 1 {
            if board.get(x, y) == CellState::Moving {
                board.set(x, y + 1, CellState::Moving);
                board.set(x, y, CellState::Empty);
            }
        }
    }
    active.position.y += 1;
    Descent::Fell
}

// Shifts the piece one column. Returns `true` on collision, in which case
// nothing moved.
pub fn resolve_lateral(board: &mut Board, active: &mut ActivePiece, direction: Direction) -> bool {
    let wall = match direction {
        Direction::Left => 0,
        Direction::Right => BOARD_WIDTH - 1,
    };
    let dx = direction.dx();

    let collision = (0..=LAST_PLAY_ROW).any(|y| {
        (1..BOARD_WIDTH - 1).any(|x| {
            if board.get(x, y) != CellState::Moving {
                return false;
            }
            let next = (x as i32 + dx) as usize;
            next == wall || board.get(next, y) == CellState::Full
        })
    });
    if collision {
        trace!("Lateral move {direction:?} blocked");
        return true;
    }

    // Walk columns in the direction of travel so no cell is moved twice
    let columns: Vec<usize> = match direction {
        Direction::Left => (1..BOARD_WIDTH - 1).collect(),
        Direction::Right => (1..BOARD_WIDTH - 1).rev().collect(),
    };
    for y in (0..=LAST_PLAY_ROW).rev() {
        for &x in &columns {
            if board.get(x, y) == CellState::Moving {
                board.set((x as i32 + dx) as usize, y, CellState::Moving);
                board.set(x, y, CellState::Empty);
            }
        }
    }
    active.position.x += dx;
    false
}

fn rotation_blocked(board: &Board, pattern: &PiecePattern, position: Position) -> bool {
    pattern.filled().any(|(px, py)| {
        let (x, y) = board_cell(position, px, py);
        match board.get_signed(x, y) {
            Some(cell) => cell.is_solid(),
            None => true,
        }
    })
}

// Either way the piece is wiped and re-stamped from its pattern.
pub fn resolve_turn(board: &mut Board, active: &mut ActivePiece) -> Turn {
    let rotated = active.pattern.rotated();
    let outcome = if rotation_blocked(board, &rotated, active.position) {
        trace!("Rotation guarded");
        Turn::Guarded
    } else {
        active.pattern = rotated;
        Turn::Rotated
    };

    clear_moving(board);
    stamp(board, active);
    outcome
}
