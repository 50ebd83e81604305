#![warn(clippy::all, clippy::pedantic)]

use bevy_ecs::prelude::*;
use log::{debug, info, trace};

use crate::components::{
    ActivePiece, Board, Cadence, CellState, GameState, Input, Phase, Tuning,
};
use crate::controller::{self, Descent, Direction};
use crate::game::{BOARD_WIDTH, GAME_OVER_ROWS};
use crate::generator::PieceGenerator;
use crate::lines;

pub fn init_game(world: &mut World) {
    let tuning = *world.resource::<Tuning>();

    world.resource_mut::<Board>().initialize();
    world.insert_resource(ActivePiece::default());
    world.insert_resource(Cadence::default());
    world.insert_resource(GameState::new(&tuning));
    world.resource_mut::<PieceGenerator>().reset();

    info!("New game started");
}

pub fn frame_system(world: &mut World) {
    let input = *world.resource::<Input>();
    let tuning = *world.resource::<Tuning>();

    if world.resource::<GameState>().phase.is_game_over() {
        if input.pressed.restart {
            info!("Restart requested");
            init_game(world);
        }
        return;
    }

    if input.pressed.pause {
        let mut state = world.resource_mut::<GameState>();
        state.phase = state.phase.toggled_pause();
        debug!("Pause toggled, now {:?}", state.phase);
    }

    match world.resource::<GameState>().phase {
        Phase::Spawning => {
            spawn_system(world);
            game_over_system(world);
        }
        Phase::Falling => {
            falling_system(world, &input, &tuning);
            game_over_system(world);
        }
        Phase::Clearing => clearing_system(world, &tuning),
        Phase::Paused(_) | Phase::GameOver => {}
    }
}

pub fn spawn_system(world: &mut World) {
    let spawned = world.resource_scope(|world, mut board: Mut<Board>| {
        world.resource_scope(|world, mut generator: Mut<PieceGenerator>| {
            let mut active = world.resource_mut::<ActivePiece>();
            controller::spawn(&mut board, &mut active, &mut generator)
        })
    });

    // Give the player a moment before fast fall kicks in
    world.resource_mut::<Cadence>().fast_fall = 0;

    let mut state = world.resource_mut::<GameState>();
    if spawned {
        state.phase = Phase::Falling;
    } else {
        info!("Game over: no room to spawn, {} lines", state.lines);
        state.phase = Phase::GameOver;
    }
}

fn held_direction(input: &Input) -> Option<Direction> {
    if input.held.left {
        Some(Direction::Left)
    } else if input.held.right {
        Some(Direction::Right)
    } else {
        None
    }
}

pub fn falling_system(world: &mut World, input: &Input, tuning: &Tuning) {
    let gravity_speed = world.resource::<GameState>().gravity_speed;
    let mut cadence = *world.resource::<Cadence>();

    cadence.fast_fall += 1;
    cadence.gravity += 1;
    cadence.lateral += 1;
    cadence.turn += 1;

    // A fresh press acts on the same frame
    if input.pressed.left || input.pressed.right {
        cadence.lateral = tuning.lateral_speed;
    }
    if input.pressed.rotate {
        cadence.turn = tuning.turning_speed;
    }

    if input.held.down && cadence.fast_fall >= tuning.fast_fall_delay {
        cadence.gravity += gravity_speed;
    }

    trace!(
        "Cadence: gravity {}/{}, lateral {}, turn {}, fast fall {}",
        cadence.gravity, gravity_speed, cadence.lateral, cadence.turn, cadence.fast_fall
    );

    let mut next_phase = Phase::Falling;

    if cadence.gravity >= gravity_speed {
        next_phase = world.resource_scope(|world, mut board: Mut<Board>| {
            let mut active = world.resource_mut::<ActivePiece>();
            let landed = controller::check_detection(&board);
            let descent = controller::resolve_falling(&mut board, &mut active, landed);

            if lines::check_completion(&mut board) > 0 {
                Phase::Clearing
            } else if descent == Descent::Landed {
                Phase::Spawning
            } else {
                Phase::Falling
            }
        });
        cadence.gravity = 0;
    }

    // A piece that just settled no longer answers to input
    if next_phase == Phase::Falling {
        world.resource_scope(|world, mut board: Mut<Board>| {
            let mut active = world.resource_mut::<ActivePiece>();

            if cadence.lateral >= tuning.lateral_speed {
                if let Some(direction) = held_direction(input) {
                    controller::resolve_lateral(&mut board, &mut active, direction);
                    cadence.lateral = 0;
                }
            }

            if cadence.turn >= tuning.turning_speed && input.held.up {
                // A guarded turn still counts as an attempt
                controller::resolve_turn(&mut board, &mut active);
                cadence.turn = 0;
            }
        });
    }

    *world.resource_mut::<Cadence>() = cadence;
    world.resource_mut::<GameState>().phase = next_phase;
}

pub fn clearing_system(world: &mut World, tuning: &Tuning) {
    let mut cadence = *world.resource::<Cadence>();
    let step = lines::advance_fade(&mut cadence.fade, tuning.fading_time);

    let deleted = if step.finished {
        cadence.fade = 0;
        Some(world.resource_scope(|_, mut board: Mut<Board>| {
            lines::delete_complete_lines(&mut board)
        }))
    } else {
        None
    };

    *world.resource_mut::<Cadence>() = cadence;

    let mut state = world.resource_mut::<GameState>();
    state.fade_highlight = step.highlight;
    if let Some(deleted) = deleted {
        state.lines += deleted;
        state.gravity_speed = tuning.gravity_for(state.lines);
        state.phase = Phase::Spawning;
        info!("Cleared {deleted} lines, {} total", state.lines);
    }
}

// Ends the game once the settled stack reaches the top rows.
pub fn game_over_system(world: &mut World) {
    let topped_out = {
        let board = world.resource::<Board>();
        (0..GAME_OVER_ROWS)
            .any(|y| (1..BOARD_WIDTH - 1).any(|x| board.get(x, y) == CellState::Full))
    };

    if topped_out {
        let mut state = world.resource_mut::<GameState>();
        if !state.phase.is_game_over() {
            info!("Game over: stack reached the top, {} lines", state.lines);
        }
        state.phase = Phase::GameOver;
    }
}
