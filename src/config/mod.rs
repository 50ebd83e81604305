pub mod loader;

use serde::{Deserialize, Serialize};

use crate::components::Tuning;
use crate::game::{
    FADING_TIME, FAST_FALL_AWAIT_COUNTER, GRAVITY_SPEED_INITIAL, LATERAL_SPEED, TARGET_FPS,
    TURNING_SPEED,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub gameplay: GameplayConfig,
    pub display: DisplayConfig,
}

// Frame thresholds and randomness
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplayConfig {
    pub gravity_speed: u32,
    pub lateral_speed: u32,
    pub turning_speed: u32,
    pub fast_fall_delay: u32,
    pub fading_time: u32,
    pub lines_per_speedup: u32,
    pub min_gravity_speed: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            gravity_speed: GRAVITY_SPEED_INITIAL,
            lateral_speed: LATERAL_SPEED,
            turning_speed: TURNING_SPEED,
            fast_fall_delay: FAST_FALL_AWAIT_COUNTER,
            fading_time: FADING_TIME,
            lines_per_speedup: 0,
            min_gravity_speed: 5,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub frames_per_second: u32,
    pub show_controls: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            frames_per_second: TARGET_FPS,
            show_controls: true,
        }
    }
}

impl Config {
    // Cadence thresholds for the simulation. Zero thresholds are raised to
    // one frame.
    #[must_use]
    pub fn tuning(&self) -> Tuning {
        let g = &self.gameplay;
        Tuning {
            gravity_speed: g.gravity_speed.max(1),
            lateral_speed: g.lateral_speed.max(1),
            turning_speed: g.turning_speed.max(1),
            fast_fall_delay: g.fast_fall_delay,
            fading_time: g.fading_time.max(1),
            lines_per_speedup: g.lines_per_speedup,
            min_gravity_speed: g.min_gravity_speed.max(1),
        }
    }

    #[must_use]
    pub fn frames_per_second(&self) -> u32 {
        self.display.frames_per_second.max(1)
    }
}
