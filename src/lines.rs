#![warn(clippy::all, clippy::pedantic)]

use log::debug;

use crate::components::{Board, CellState};
use crate::game::{BOARD_WIDTH, FADE_BLINK_PERIOD, INTERIOR_WIDTH, LAST_PLAY_ROW};

pub fn check_completion(board: &mut Board) -> usize {
    let mut marked = 0;
    for y in (0..=LAST_PLAY_ROW).rev() {
        let full = (1..BOARD_WIDTH - 1)
            .filter(|&x| board.get(x, y) == CellState::Full)
            .count();
        if full == INTERIOR_WIDTH {
            for x in 1..BOARD_WIDTH - 1 {
                board.set(x, y, CellState::Fading);
            }
            marked += 1;
        }
    }
    if marked > 0 {
        debug!("Marked {marked} completed rows");
    }
    marked
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FadeStep {
    pub highlight: bool,
    pub finished: bool,
}

pub fn advance_fade(counter: &mut u32, fading_time: u32) -> FadeStep {
    *counter += 1;
    FadeStep {
        highlight: *counter % FADE_BLINK_PERIOD < FADE_BLINK_PERIOD / 2,
        finished: *counter >= fading_time,
    }
}

/// Removes every `Fading` row and pulls the rows above it down.
pub fn delete_complete_lines(board: &mut Board) -> u32 {
    let mut deleted = 0;

    for y in (0..=LAST_PLAY_ROW).rev() {
        // Compaction pulls a new row into `y`, which may be fading too
        while board.get(1, y) == CellState::Fading {
            for x in 1..BOARD_WIDTH - 1 {
                board.set(x, y, CellState::Empty);
            }

            for above in (0..y).rev() {
                for x in 1..BOARD_WIDTH - 1 {
                    let cell = board.get(x, above);
                    if matches!(cell, CellState::Full | CellState::Fading) {
                        board.set(x, above + 1, cell);
                        board.set(x, above, CellState::Empty);
                    }
                }
            }

            deleted += 1;
        }
    }

    deleted
}
