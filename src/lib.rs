pub mod app;
pub mod components;
pub mod config;
pub mod controller;
pub mod game;
pub mod generator;
pub mod input;
pub mod lines;
pub mod snapshot;
pub mod systems;
pub mod ui;

#[cfg(test)]
mod tests;

use bevy_ecs::prelude::Resource;
use std::time::{Duration, Instant};

// Frames run back to back after a stall before the clock gives up catching up
const MAX_CATCH_UP_FRAMES: u32 = 5;

/// Fixed-rate frame scheduler for the logic loop.
#[derive(Resource, Debug, Clone)]
pub struct FrameClock {
    frame: Duration,
    last_tick: Instant,
    frames: u64,
}

impl FrameClock {
    #[must_use]
    pub fn new(frames_per_second: u32) -> Self {
        Self::starting_at(frames_per_second, Instant::now())
    }

    #[must_use]
    pub fn starting_at(frames_per_second: u32, now: Instant) -> Self {
        Self {
            frame: Duration::from_secs(1) / frames_per_second.max(1),
            last_tick: now,
            frames: 0,
        }
    }

    #[must_use]
    pub fn frame_duration(&self) -> Duration {
        self.frame
    }

    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn due_frames(&mut self) -> u32 {
        self.due_frames_at(Instant::now())
    }

    pub fn due_frames_at(&mut self, now: Instant) -> u32 {
        let elapsed = now.saturating_duration_since(self.last_tick);
        let due = elapsed.as_nanos() / self.frame.as_nanos().max(1);
        if due == 0 {
            return 0;
        }

        let due = u32::try_from(due).unwrap_or(u32::MAX);
        if due > MAX_CATCH_UP_FRAMES {
            self.last_tick = now;
            self.frames += u64::from(MAX_CATCH_UP_FRAMES);
            return MAX_CATCH_UP_FRAMES;
        }

        self.last_tick += self.frame * due;
        self.frames += u64::from(due);
        due
    }

    #[must_use]
    pub fn until_next(&self) -> Duration {
        (self.last_tick + self.frame).saturating_duration_since(Instant::now())
    }
}
