#![warn(clippy::all, clippy::pedantic)]

use bevy_ecs::prelude::*;
use log::info;

use crate::FrameClock;
use crate::components::{ActivePiece, Board, Cadence, GameState, Input, Tuning};
use crate::config::Config;
use crate::generator::PieceGenerator;
use crate::snapshot::GameSnapshot;
use crate::systems::{frame_system, init_game};

pub struct App {
    pub world: World,
    pub should_quit: bool,
    pub show_controls: bool,
}

impl App {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        let generator = match config.gameplay.seed {
            Some(seed) => {
                info!("Using piece seed {seed}");
                PieceGenerator::seeded(seed)
            }
            None => PieceGenerator::from_entropy(),
        };

        let mut app = Self::with_generator(config.tuning(), generator);
        app.show_controls = config.display.show_controls;
        app.world
            .insert_resource(FrameClock::new(config.frames_per_second()));
        app
    }

    #[must_use]
    pub fn with_generator(tuning: Tuning, generator: PieceGenerator) -> Self {
        let mut world = World::new();
        world.insert_resource(tuning);
        world.insert_resource(generator);
        world.insert_resource(Input::default());
        world.insert_resource(Board::new());
        world.insert_resource(ActivePiece::default());
        world.insert_resource(Cadence::default());
        world.insert_resource(GameState::new(&tuning));

        Self {
            world,
            should_quit: false,
            show_controls: true,
        }
    }

    pub fn step(&mut self, input: Input) {
        self.world.insert_resource(input);
        frame_system(&mut self.world);
        self.world.resource_mut::<Input>().clear_edges();
    }

    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::capture(&self.world)
    }

    #[must_use]
    pub fn game_state(&self) -> &GameState {
        self.world.resource::<GameState>()
    }

    // Starts over, keeping configuration and the piece source.
    pub fn reset(&mut self) {
        self.world.insert_resource(Input::default());
        init_game(&mut self.world);
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}
