#![warn(clippy::all, clippy::pedantic)]

// Playfield dimensions, border included
pub const BOARD_WIDTH: usize = 12;
pub const BOARD_HEIGHT: usize = 20;

// Size of the square frame every piece pattern lives in
pub const PIECE_SIZE: usize = 4;

// Interior cells of a row (everything between the two side walls)
pub const INTERIOR_WIDTH: usize = BOARD_WIDTH - 2;

// Last row a piece can occupy; the row below it is the floor
pub const LAST_PLAY_ROW: usize = BOARD_HEIGHT - 2;

// Spawn column of the 4x4 frame
pub const SPAWN_X: i32 = ((BOARD_WIDTH - PIECE_SIZE) / 2) as i32;

// Cadences, in frames
pub const GRAVITY_SPEED_INITIAL: u32 = 30;
pub const LATERAL_SPEED: u32 = 10;
pub const TURNING_SPEED: u32 = 12;
pub const FAST_FALL_AWAIT_COUNTER: u32 = 30;

// Line clear animation
pub const FADING_TIME: u32 = 33;
pub const FADE_BLINK_PERIOD: u32 = 8;

// Rows checked for a top-out after every frame
pub const GAME_OVER_ROWS: usize = 2;

pub const TARGET_FPS: u32 = 60;
