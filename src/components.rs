#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Allow truncation when casting from usize to i32 since board dimensions are always small enough to fit in i32
    clippy::cast_possible_truncation,
    // Allow sign loss when going from signed to unsigned types since we validate values are non-negative before casting
    clippy::cast_sign_loss,
    // Allow potential wrapping when casting between types of same size as we validate values are in range
    clippy::cast_possible_wrap,
    // Allow more than 3 bools in structs for input handling where bools represent distinct keys
    clippy::struct_excessive_bools
)]

use bevy_ecs::prelude::*;

use crate::game::{
    BOARD_HEIGHT, BOARD_WIDTH, FADING_TIME, FAST_FALL_AWAIT_COUNTER, GRAVITY_SPEED_INITIAL,
    LATERAL_SPEED, TURNING_SPEED,
};
use crate::generator::PiecePattern;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellState {
    #[default]
    Empty,
    // Part of the falling piece
    Moving,
    // Settled
    Full,
    // Border wall, never rewritten
    Block,
    // Completed row waiting for deletion
    Fading,
}

impl CellState {
    #[must_use]
    pub fn is_solid(self) -> bool {
        matches!(self, CellState::Full | CellState::Block | CellState::Fading)
    }
}

/// The playfield, indexed as `cells[x][y]` with y growing downward.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [[CellState; BOARD_HEIGHT]; BOARD_WIDTH],
}

impl Board {
    #[must_use]
    pub fn new() -> Self {
        let mut board = Self {
            cells: [[CellState::Empty; BOARD_HEIGHT]; BOARD_WIDTH],
        };
        board.initialize();
        board
    }

    #[must_use]
    pub fn is_border(x: usize, y: usize) -> bool {
        x == 0 || x == BOARD_WIDTH - 1 || y == BOARD_HEIGHT - 1
    }

    pub fn initialize(&mut self) {
        for x in 0..BOARD_WIDTH {
            for y in 0..BOARD_HEIGHT {
                self.cells[x][y] = if Self::is_border(x, y) {
                    CellState::Block
                } else {
                    CellState::Empty
                };
            }
        }
    }

    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> CellState {
        debug_assert!(
            x < BOARD_WIDTH && y < BOARD_HEIGHT,
            "board read out of bounds at ({x}, {y})"
        );
        self.cells[x][y]
    }

    #[must_use]
    pub fn get_signed(&self, x: i32, y: i32) -> Option<CellState> {
        if x < 0 || y < 0 || x >= BOARD_WIDTH as i32 || y >= BOARD_HEIGHT as i32 {
            return None;
        }
        Some(self.cells[x as usize][y as usize])
    }

    pub fn set(&mut self, x: usize, y: usize, value: CellState) {
        debug_assert!(
            x < BOARD_WIDTH && y < BOARD_HEIGHT,
            "board write out of bounds at ({x}, {y})"
        );
        debug_assert!(
            !Self::is_border(x, y),
            "attempted to overwrite border cell at ({x}, {y})"
        );
        self.cells[x][y] = value;
    }

    #[must_use]
    pub fn count(&self, state: CellState) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|&&cell| cell == state)
            .count()
    }

    pub fn rows(&self) -> impl Iterator<Item = [CellState; BOARD_WIDTH]> + '_ {
        (0..BOARD_HEIGHT).map(move |y| std::array::from_fn(|x| self.cells[x][y]))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActivePiece {
    pub pattern: PiecePattern,
    pub position: Position,
}

#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cadence {
    pub gravity: u32,
    pub lateral: u32,
    pub turn: u32,
    pub fast_fall: u32,
    pub fade: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resume {
    Spawning,
    Falling,
    Clearing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    // No piece on the board; one appears on the next frame
    #[default]
    Spawning,
    // A piece is under player control
    Falling,
    // Completed rows are fading out
    Clearing,
    Paused(Resume),
    GameOver,
}

impl Phase {
    #[must_use]
    pub fn is_paused(self) -> bool {
        matches!(self, Phase::Paused(_))
    }

    #[must_use]
    pub fn is_game_over(self) -> bool {
        self == Phase::GameOver
    }

    #[must_use]
    pub fn toggled_pause(self) -> Self {
        match self {
            Phase::Spawning => Phase::Paused(Resume::Spawning),
            Phase::Falling => Phase::Paused(Resume::Falling),
            Phase::Clearing => Phase::Paused(Resume::Clearing),
            Phase::Paused(Resume::Spawning) => Phase::Spawning,
            Phase::Paused(Resume::Falling) => Phase::Falling,
            Phase::Paused(Resume::Clearing) => Phase::Clearing,
            Phase::GameOver => Phase::GameOver,
        }
    }
}

#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub phase: Phase,
    // Lines cleared this game
    pub lines: u32,
    // Blink phase of fading rows
    pub fade_highlight: bool,
    // Frames per cell of fall
    pub gravity_speed: u32,
}

impl GameState {
    #[must_use]
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            phase: Phase::Spawning,
            lines: 0,
            fade_highlight: false,
            gravity_speed: tuning.gravity_speed,
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(&Tuning::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyEdges {
    pub pause: bool,
    pub rotate: bool,
    pub left: bool,
    pub right: bool,
    pub restart: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeldKeys {
    pub left: bool,
    pub right: bool,
    pub down: bool,
    pub up: bool,
}

// Input state for one logic frame
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Input {
    pub pressed: KeyEdges,
    pub held: HeldKeys,
}

impl Input {
    pub fn clear_edges(&mut self) {
        self.pressed = KeyEdges::default();
    }
}

#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tuning {
    pub gravity_speed: u32,
    pub lateral_speed: u32,
    pub turning_speed: u32,
    pub fast_fall_delay: u32,
    pub fading_time: u32,
    // Lines per one-frame gravity speedup, 0 keeps gravity constant
    pub lines_per_speedup: u32,
    pub min_gravity_speed: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity_speed: GRAVITY_SPEED_INITIAL,
            lateral_speed: LATERAL_SPEED,
            turning_speed: TURNING_SPEED,
            fast_fall_delay: FAST_FALL_AWAIT_COUNTER,
            fading_time: FADING_TIME,
            lines_per_speedup: 0,
            min_gravity_speed: 5,
        }
    }
}

impl Tuning {
    #[must_use]
    pub fn gravity_for(&self, lines: u32) -> u32 {
        if self.lines_per_speedup == 0 {
            return self.gravity_speed;
        }
        let floor = self.min_gravity_speed.min(self.gravity_speed).max(1);
        self.gravity_speed
            .saturating_sub(lines / self.lines_per_speedup)
            .max(floor)
    }
}
