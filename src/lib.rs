//! Duck Hunt - a pay-to-play shooting gallery
//!
//! Core modules:
//! - `sim`: Deterministic simulation (duck flight, spawning, shots, game state machine)
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences
//! - `season`: Season golden tickets and leaderboard
//! - `payment`: Payment kinds, prices and failures
//! - `audio`: Sound effects for simulation events
//! - `platform`: Browser/native platform abstraction

pub mod audio;
pub mod payment;
pub mod platform;
pub mod season;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use season::{LocalLedger, SeasonLedger};
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Play field dimensions (screen space, y grows downward)
    pub const GAME_WIDTH: f32 = 800.0;
    pub const GAME_HEIGHT: f32 = 600.0;

    /// Duck sprite box; positions are the sprite's top-left corner
    pub const DUCK_WIDTH: f32 = 60.0;
    pub const DUCK_HEIGHT: f32 = 60.0;

    /// Velocities are expressed in pixels per 1/60 s frame
    pub const FRAME_SCALE: f32 = 60.0;

    /// Largest elapsed time a single tick may integrate (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Downward acceleration of a shot duck (pixels per frame per frame)
    pub const FALL_ACCEL: f32 = 0.8;
    /// Fall speed when a shot duck starts dropping
    pub const FALL_START_SPEED: f32 = 4.0;
    /// Terminal fall speed
    pub const FALL_MAX_SPEED: f32 = 18.0;

    /// Chance per tick a flying duck changes heading
    pub const ERRATIC_CHANCE: f32 = 0.02;
    /// Same chance for a hazard duck close to fleeing
    pub const ERRATIC_CHANCE_HAZARD: f32 = 0.06;
    /// Maximum heading change for one erratic turn (radians, ±half)
    pub const ERRATIC_TURN: f32 = 0.5;
    /// Vertical speed kept after bouncing off the top edge
    pub const TOP_BOUNCE_DAMPING: f32 = 0.8;
}

/// Center of a duck sprite whose top-left corner is `pos`
#[inline]
pub fn duck_center(pos: Vec2) -> Vec2 {
    pos + Vec2::new(consts::DUCK_WIDTH / 2.0, consts::DUCK_HEIGHT / 2.0)
}

/// Rotate a velocity by `delta` radians, keeping its speed
#[inline]
pub fn rotate_velocity(vel: Vec2, delta: f32) -> Vec2 {
    let speed = vel.length();
    let angle = vel.y.atan2(vel.x) + delta;
    Vec2::new(angle.cos() * speed, angle.sin() * speed)
}
