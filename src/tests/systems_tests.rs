#[cfg(test)]
mod tests {
    use crate::components::*;
    use crate::game::BOARD_WIDTH;
    use crate::generator::{PiecePattern, ShapeKind};
    use crate::systems::*;
    use crate::tests::test_utils::{
        cells_in, holding, holding_down, idle, pressing, scripted_generator,
    };
    use bevy_ecs::prelude::*;

    // Helper function to create a test world
    fn setup_test_world(rolls: &[u8], tuning: Tuning) -> World {
        let mut world = World::new();

        world.insert_resource(tuning);
        world.insert_resource(scripted_generator(rolls));
        world.insert_resource(Input::default());
        world.insert_resource(Board::new());
        world.insert_resource(ActivePiece::default());
        world.insert_resource(Cadence::default());
        world.insert_resource(GameState::new(&tuning));

        world
    }

    fn quick_gravity() -> Tuning {
        Tuning {
            gravity_speed: 1,
            ..Tuning::default()
        }
    }

    fn step(world: &mut World, input: Input) {
        world.insert_resource(input);
        frame_system(world);
    }

    fn phase(world: &World) -> Phase {
        world.resource::<GameState>().phase
    }

    fn moving(world: &World) -> Vec<(usize, usize)> {
        cells_in(world.resource::<Board>(), CellState::Moving)
    }

    fn press_left() -> Input {
        pressing(
            KeyEdges {
                left: true,
                ..KeyEdges::default()
            },
            HeldKeys {
                left: true,
                ..HeldKeys::default()
            },
        )
    }

    fn press_rotate() -> Input {
        pressing(
            KeyEdges {
                rotate: true,
                ..KeyEdges::default()
            },
            HeldKeys {
                up: true,
                ..HeldKeys::default()
            },
        )
    }

    fn press_pause() -> Input {
        pressing(
            KeyEdges {
                pause: true,
                ..KeyEdges::default()
            },
            HeldKeys::default(),
        )
    }

    #[test]
    fn test_spawn_system() {
        let mut world = setup_test_world(&[3], Tuning::default());
        world.resource_mut::<Cadence>().fast_fall = 40;

        spawn_system(&mut world);

        assert_eq!(phase(&world), Phase::Falling);
        assert_eq!(moving(&world), vec![(4, 1), (5, 1), (6, 1), (7, 1)]);
        assert_eq!(world.resource::<Cadence>().fast_fall, 0);
    }

    #[test]
    fn test_spawn_into_occupied_area_ends_game() {
        let mut world = setup_test_world(&[3], Tuning::default());
        world.resource_mut::<Board>().set(6, 1, CellState::Full);

        spawn_system(&mut world);

        assert_eq!(phase(&world), Phase::GameOver);
        assert!(moving(&world).is_empty());
    }

    #[test]
    fn test_spawn_frame_does_not_advance_counters() {
        let mut world = setup_test_world(&[3], Tuning::default());
        step(&mut world, idle());

        assert_eq!(phase(&world), Phase::Falling);
        assert_eq!(*world.resource::<Cadence>(), Cadence::default());
    }

    #[test]
    fn test_gravity_cadence() {
        let mut world = setup_test_world(&[3], Tuning::default());
        step(&mut world, idle());

        for _ in 0..29 {
            step(&mut world, idle());
        }
        assert_eq!(moving(&world), vec![(4, 1), (5, 1), (6, 1), (7, 1)]);
        assert_eq!(world.resource::<Cadence>().gravity, 29);

        step(&mut world, idle());
        assert_eq!(moving(&world), vec![(4, 2), (5, 2), (6, 2), (7, 2)]);
        assert_eq!(world.resource::<Cadence>().gravity, 0);
        assert_eq!(world.resource::<ActivePiece>().position.y, 1);
    }

    #[test]
    fn test_fast_fall_after_delay() {
        let mut world = setup_test_world(&[3, 0], Tuning::default());
        step(&mut world, idle());

        for _ in 0..29 {
            step(&mut world, holding_down());
        }
        assert_eq!(world.resource::<ActivePiece>().position.y, 0);

        // From here on the piece drops every frame
        for _ in 0..17 {
            step(&mut world, holding_down());
        }
        assert_eq!(moving(&world), vec![(4, 18), (5, 18), (6, 18), (7, 18)]);

        step(&mut world, holding_down());
        assert!(moving(&world).is_empty());
        assert_eq!(
            cells_in(world.resource::<Board>(), CellState::Full),
            vec![(4, 18), (5, 18), (6, 18), (7, 18)]
        );
        assert_eq!(phase(&world), Phase::Spawning);

        step(&mut world, holding_down());
        assert_eq!(phase(&world), Phase::Falling);
        assert_eq!(world.resource::<Cadence>().fast_fall, 0);
        assert_eq!(
            world.resource::<ActivePiece>().pattern,
            PiecePattern::from_shape(ShapeKind::Cube)
        );
    }

    #[test]
    fn test_lateral_press_acts_immediately_then_repeats() {
        let mut world = setup_test_world(&[3], Tuning::default());
        step(&mut world, idle());

        step(&mut world, press_left());
        assert_eq!(world.resource::<ActivePiece>().position.x, 3);

        let held_left = holding(HeldKeys {
            left: true,
            ..HeldKeys::default()
        });
        for _ in 0..9 {
            step(&mut world, held_left);
        }
        assert_eq!(world.resource::<ActivePiece>().position.x, 3);

        step(&mut world, held_left);
        assert_eq!(world.resource::<ActivePiece>().position.x, 2);
    }

    #[test]
    fn test_blocked_lateral_attempt_resets_counter() {
        let mut world = setup_test_world(&[3], Tuning::default());
        step(&mut world, idle());

        // Three gravity steps take the line clear of the top-out rows
        for _ in 0..90 {
            step(&mut world, idle());
        }
        assert_eq!(moving(&world), vec![(4, 4), (5, 4), (6, 4), (7, 4)]);
        world.resource_mut::<Board>().set(3, 4, CellState::Full);

        step(&mut world, press_left());
        assert_eq!(phase(&world), Phase::Falling);
        assert_eq!(world.resource::<ActivePiece>().position.x, 4);
        assert_eq!(world.resource::<Cadence>().lateral, 0);

        world.resource_mut::<Board>().set(3, 4, CellState::Empty);
        let held_left = holding(HeldKeys {
            left: true,
            ..HeldKeys::default()
        });
        for _ in 0..9 {
            step(&mut world, held_left);
            assert_eq!(phase(&world), Phase::Falling);
        }
        assert_eq!(world.resource::<ActivePiece>().position.x, 4);

        step(&mut world, held_left);
        assert_eq!(world.resource::<ActivePiece>().position.x, 3);
        assert_eq!(moving(&world), vec![(3, 4), (4, 4), (5, 4), (6, 4)]);
    }

    #[test]
    fn test_left_wins_over_right() {
        let mut world = setup_test_world(&[3], Tuning::default());
        step(&mut world, idle());

        step(
            &mut world,
            pressing(
                KeyEdges {
                    left: true,
                    right: true,
                    ..KeyEdges::default()
                },
                HeldKeys {
                    left: true,
                    right: true,
                    ..HeldKeys::default()
                },
            ),
        );
        assert_eq!(world.resource::<ActivePiece>().position.x, 3);
    }

    #[test]
    fn test_rotation_press_and_hold() {
        let mut world = setup_test_world(&[3], Tuning::default());
        step(&mut world, idle());

        step(&mut world, press_rotate());
        assert_eq!(moving(&world), vec![(5, 0), (5, 1), (5, 2), (5, 3)]);

        let held_up = holding(HeldKeys {
            up: true,
            ..HeldKeys::default()
        });
        for _ in 0..11 {
            step(&mut world, held_up);
        }
        assert_eq!(moving(&world), vec![(5, 0), (5, 1), (5, 2), (5, 3)]);

        step(&mut world, held_up);
        assert_eq!(moving(&world), vec![(4, 2), (5, 2), (6, 2), (7, 2)]);
    }

    #[test]
    fn test_no_input_on_landing_frame() {
        let mut world = setup_test_world(&[3], quick_gravity());
        world.resource_mut::<Board>().set(5, 6, CellState::Full);
        step(&mut world, idle());

        for _ in 0..4 {
            step(&mut world, idle());
        }
        assert_eq!(moving(&world), vec![(4, 5), (5, 5), (6, 5), (7, 5)]);

        step(&mut world, press_rotate());
        assert!(moving(&world).is_empty());
        assert_eq!(
            cells_in(world.resource::<Board>(), CellState::Full),
            vec![(4, 5), (5, 5), (5, 6), (6, 5), (7, 5)]
        );
        assert_eq!(phase(&world), Phase::Spawning);
    }

    #[test]
    fn test_line_clear_cycle() {
        let mut world = setup_test_world(&[3, 0], quick_gravity());
        {
            let mut board = world.resource_mut::<Board>();
            for x in (1..4).chain(8..BOARD_WIDTH - 1) {
                board.set(x, 18, CellState::Full);
            }
        }
        step(&mut world, idle());
        for _ in 0..17 {
            step(&mut world, idle());
        }
        assert_eq!(moving(&world), vec![(4, 18), (5, 18), (6, 18), (7, 18)]);

        step(&mut world, idle());
        assert_eq!(phase(&world), Phase::Clearing);
        assert_eq!(world.resource::<Board>().count(CellState::Fading), 10);

        step(&mut world, idle());
        assert!(world.resource::<GameState>().fade_highlight);

        for _ in 1..32 {
            step(&mut world, idle());
        }
        assert_eq!(phase(&world), Phase::Clearing);
        assert_eq!(world.resource::<GameState>().lines, 0);

        step(&mut world, idle());
        let state = world.resource::<GameState>();
        assert_eq!(state.phase, Phase::Spawning);
        assert_eq!(state.lines, 1);
        assert_eq!(world.resource::<Board>().count(CellState::Fading), 0);
        assert_eq!(world.resource::<Board>().count(CellState::Full), 0);
        assert_eq!(world.resource::<Cadence>().fade, 0);
    }

    #[test]
    fn test_pause_freezes_and_resumes() {
        let mut world = setup_test_world(&[3], quick_gravity());
        step(&mut world, idle());

        step(&mut world, press_pause());
        assert_eq!(phase(&world), Phase::Paused(Resume::Falling));
        let frozen_board = world.resource::<Board>().clone();
        let frozen_cadence = *world.resource::<Cadence>();

        for _ in 0..100 {
            step(&mut world, holding_down());
        }
        assert_eq!(*world.resource::<Board>(), frozen_board);
        assert_eq!(*world.resource::<Cadence>(), frozen_cadence);

        // Unpausing runs the frame straight away
        step(&mut world, press_pause());
        assert_eq!(phase(&world), Phase::Falling);
        assert_eq!(moving(&world), vec![(4, 2), (5, 2), (6, 2), (7, 2)]);
    }

    #[test]
    fn test_pause_while_spawning() {
        let mut world = setup_test_world(&[3], Tuning::default());

        step(&mut world, press_pause());
        assert_eq!(phase(&world), Phase::Paused(Resume::Spawning));
        assert!(moving(&world).is_empty());

        step(&mut world, press_pause());
        assert_eq!(phase(&world), Phase::Falling);
        assert_eq!(moving(&world).len(), 4);
    }

    #[test]
    fn test_game_over_ignores_pause() {
        let mut world = setup_test_world(&[3], Tuning::default());
        world.resource_mut::<GameState>().phase = Phase::GameOver;

        step(&mut world, press_pause());
        assert_eq!(phase(&world), Phase::GameOver);

        step(&mut world, holding_down());
        assert_eq!(phase(&world), Phase::GameOver);
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut world = setup_test_world(&[3, 0], Tuning::default());
        step(&mut world, idle());
        {
            let mut board = world.resource_mut::<Board>();
            board.set(2, 10, CellState::Full);
        }
        {
            let mut state = world.resource_mut::<GameState>();
            state.phase = Phase::GameOver;
            state.lines = 12;
        }

        step(
            &mut world,
            pressing(
                KeyEdges {
                    restart: true,
                    ..KeyEdges::default()
                },
                HeldKeys::default(),
            ),
        );

        let state = world.resource::<GameState>();
        assert_eq!(state.phase, Phase::Spawning);
        assert_eq!(state.lines, 0);
        assert_eq!(*world.resource::<Board>(), Board::new());
        assert_eq!(*world.resource::<Cadence>(), Cadence::default());
    }

    #[test]
    fn test_game_over_system() {
        let mut world = setup_test_world(&[3], Tuning::default());
        world.insert_resource(GameState {
            phase: Phase::Falling,
            ..GameState::default()
        });

        world.resource_mut::<Board>().set(3, 2, CellState::Full);
        game_over_system(&mut world);
        assert_eq!(phase(&world), Phase::Falling);

        world.resource_mut::<Board>().set(3, 1, CellState::Full);
        game_over_system(&mut world);
        assert_eq!(phase(&world), Phase::GameOver);
    }

    #[test]
    fn test_moving_cells_in_top_rows_are_not_game_over() {
        let mut world = setup_test_world(&[1], Tuning::default());
        step(&mut world, idle());

        assert!(moving(&world).contains(&(5, 0)));
        assert_eq!(phase(&world), Phase::Falling);
    }

    #[test]
    fn test_clearing_speeds_up_gravity() {
        let tuning = Tuning {
            lines_per_speedup: 1,
            fading_time: 1,
            ..Tuning::default()
        };
        let mut world = setup_test_world(&[3], tuning);
        {
            let mut board = world.resource_mut::<Board>();
            for x in 1..BOARD_WIDTH - 1 {
                board.set(x, 18, CellState::Fading);
            }
        }
        world.resource_mut::<GameState>().phase = Phase::Clearing;

        step(&mut world, idle());

        let state = world.resource::<GameState>();
        assert_eq!(state.lines, 1);
        assert_eq!(state.gravity_speed, 29);
        assert_eq!(state.phase, Phase::Spawning);
    }
}
