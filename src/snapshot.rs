use bevy_ecs::prelude::*;

use crate::components::{Board, GameState, Phase};
use crate::generator::{PieceGenerator, PiecePattern};

/// Everything the renderer needs for one frame, detached from the world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub board: Board,
    pub incoming: PiecePattern,
    pub lines: u32,
    pub phase: Phase,
    pub paused: bool,
    pub game_over: bool,
    pub fade_highlight: bool,
}

impl GameSnapshot {
    #[must_use]
    pub fn capture(world: &World) -> Self {
        let state = world.resource::<GameState>();
        Self {
            board: world.resource::<Board>().clone(),
            incoming: *world.resource::<PieceGenerator>().incoming(),
            lines: state.lines,
            phase: state.phase,
            paused: state.phase.is_paused(),
            game_over: state.phase.is_game_over(),
            fade_highlight: state.fade_highlight,
        }
    }
}
