//! Level table
//!
//! Levels are played in order; each one is a fixed number of timed waves.

use serde::Serialize;

/// Static configuration of one level
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GameLevel {
    /// 1-based level number
    pub id: u32,
    pub title: &'static str,
    /// Waves in this level
    pub waves: u32,
    /// Duck quota of every wave
    pub ducks_per_wave: u32,
    /// Base flight speed (pixels per 1/60 s)
    pub duck_speed: f32,
    /// Seconds on the wave clock
    pub time_per_wave: f32,
    pub points_per_duck: u64,
}

impl GameLevel {
    /// Ducks that must be shot for a wave to count as passed
    pub fn required_ducks(&self, success_ratio: f32) -> u32 {
        (self.ducks_per_wave as f32 * success_ratio).ceil() as u32
    }
}

pub const LEVELS: [GameLevel; 6] = [
    GameLevel {
        id: 1,
        title: "Beginner",
        waves: 3,
        ducks_per_wave: 4,
        duck_speed: 2.5,
        time_per_wave: 20.0,
        points_per_duck: 100,
    },
    GameLevel {
        id: 2,
        title: "Easy",
        waves: 4,
        ducks_per_wave: 5,
        duck_speed: 3.0,
        time_per_wave: 18.0,
        points_per_duck: 150,
    },
    GameLevel {
        id: 3,
        title: "Medium",
        waves: 4,
        ducks_per_wave: 6,
        duck_speed: 3.5,
        time_per_wave: 16.0,
        points_per_duck: 200,
    },
    GameLevel {
        id: 4,
        title: "Hard",
        waves: 5,
        ducks_per_wave: 7,
        duck_speed: 4.0,
        time_per_wave: 15.0,
        points_per_duck: 250,
    },
    GameLevel {
        id: 5,
        title: "Expert",
        waves: 5,
        ducks_per_wave: 8,
        duck_speed: 4.5,
        time_per_wave: 15.0,
        points_per_duck: 300,
    },
    GameLevel {
        id: 6,
        title: "Master",
        waves: 6,
        ducks_per_wave: 10,
        duck_speed: 5.0,
        time_per_wave: 15.0,
        points_per_duck: 500,
    },
];

/// Level by 1-based number, clamped to the table
pub fn level(number: u32) -> &'static GameLevel {
    let index = (number.max(1) as usize - 1).min(LEVELS.len() - 1);
    &LEVELS[index]
}

/// Whether `number` is the final configured level
pub fn is_last_level(number: u32) -> bool {
    number as usize >= LEVELS.len()
}
