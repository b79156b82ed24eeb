//! Duck entities and their flight physics
//!
//! Screen space: origin top-left, y grows downward. A duck's `pos` is the
//! top-left corner of its sprite box and `vel` is in pixels per 1/60 s frame.

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rng::RandomSource;
use crate::consts::*;
use crate::rotate_velocity;
use crate::tuning::Tuning;

/// Lifecycle of a duck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuckState {
    Flying,
    /// Hit this frame; starts falling on the next tick
    Shot,
    Falling,
    /// Flew away or timed out
    Escaped,
    /// Hit the ground after being shot
    Dead,
}

/// Duck types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuckKind {
    /// Worth the level's points
    Normal,
    /// Grants a power-up when shot
    Powerup,
    /// Costs a life if it escapes
    Hazard,
}

/// What a power-up duck grants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerupEffect {
    Health,
    RapidFire,
}

/// Sprite facing (presentation hint)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    TopLeft,
    TopRight,
}

impl Direction {
    pub fn from_velocity(vel: Vec2) -> Self {
        match (vel.y < 0.0, vel.x < 0.0) {
            (true, true) => Direction::TopLeft,
            (true, false) => Direction::TopRight,
            (false, true) => Direction::Left,
            (false, false) => Direction::Right,
        }
    }
}

/// Width of the upward launch arc (radians, centered on straight up)
const SPAWN_ARC: f32 = 2.0 * std::f32::consts::FRAC_PI_3;
/// Per-duck speed multiplier range
const SPEED_MIN: f32 = 0.7;
const SPEED_MAX: f32 = 1.3;
/// Fraction of flight time after which hazard ducks turn more erratic
const HAZARD_JITTER_AGE: f64 = 0.75;

/// A duck entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Duck {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub state: DuckState,
    kind: DuckKind,
    powerup: Option<PowerupEffect>,
    /// Timestamp (ms) the duck appeared
    pub spawn_time: f64,
    pub direction: Direction,
    pub animation_frame: u8,
}

impl Duck {
    /// Launch a duck from the grass line.
    ///
    /// `index` is the duck's position in the wave; it picks one of three
    /// lateral bands so consecutive ducks spread across the field. Draws, in
    /// order: x within band, launch angle, speed multiplier.
    pub fn spawn(
        id: u32,
        index: u32,
        kind: DuckKind,
        powerup: Option<PowerupEffect>,
        base_speed: f32,
        now: f64,
        rng: &mut impl RandomSource,
    ) -> Self {
        let band = (index % 3) as f32;
        let band_width = (GAME_WIDTH - DUCK_WIDTH * 2.0) / 3.0;
        let x = DUCK_WIDTH + band * band_width + rng.next_f32() * band_width;

        let angle = -FRAC_PI_2 + (rng.next_f32() - 0.5) * SPAWN_ARC;
        let speed = base_speed * rng.range(SPEED_MIN, SPEED_MAX);
        let vel = Vec2::new(angle.cos() * speed, angle.sin() * speed);

        // Only power-up ducks carry an effect
        let powerup = if kind == DuckKind::Powerup {
            Some(powerup.unwrap_or(PowerupEffect::RapidFire))
        } else {
            None
        };

        Self {
            id,
            pos: Vec2::new(x, GAME_HEIGHT - DUCK_HEIGHT),
            vel,
            state: DuckState::Flying,
            kind,
            powerup,
            spawn_time: now,
            direction: Direction::from_velocity(vel),
            animation_frame: 0,
        }
    }

    pub fn kind(&self) -> DuckKind {
        self.kind
    }

    pub fn powerup(&self) -> Option<PowerupEffect> {
        self.powerup
    }

    /// Flying, shot or falling
    pub fn is_active(&self) -> bool {
        matches!(
            self.state,
            DuckState::Flying | DuckState::Shot | DuckState::Falling
        )
    }

    pub fn age_ms(&self, now: f64) -> f64 {
        now - self.spawn_time
    }

    /// Mark a flying duck as hit
    pub fn hit(&mut self) {
        if self.state == DuckState::Flying {
            self.state = DuckState::Shot;
            self.vel = Vec2::ZERO;
        }
    }

    /// Shot -> falling
    pub fn start_falling(&mut self) {
        if self.state == DuckState::Shot {
            self.state = DuckState::Falling;
            self.vel = Vec2::new(0.0, FALL_START_SPEED);
            self.animation_frame = 0;
        }
    }

    /// Advance one tick. Returns the terminal state if the duck just reached one.
    pub fn update(
        &mut self,
        dt: f32,
        now: f64,
        tuning: &Tuning,
        rng: &mut impl RandomSource,
    ) -> Option<DuckState> {
        match self.state {
            DuckState::Flying => self.update_flying(dt, now, tuning, rng),
            DuckState::Falling => self.update_falling(dt),
            _ => None,
        }
    }

    fn update_flying(
        &mut self,
        dt: f32,
        now: f64,
        tuning: &Tuning,
        rng: &mut impl RandomSource,
    ) -> Option<DuckState> {
        let age = self.age_ms(now);
        if age >= tuning.duck_flight_time_ms {
            self.state = DuckState::Escaped;
            return Some(DuckState::Escaped);
        }
        let fleeing = age >= tuning.duck_flee_age_ms;

        let step = dt * FRAME_SCALE;
        let mut pos = self.pos + self.vel * step;
        let mut vel = self.vel;

        let max_x = GAME_WIDTH - DUCK_WIDTH;
        if pos.x <= 0.0 {
            vel.x = vel.x.abs();
            pos.x = 0.0;
        } else if pos.x >= max_x {
            vel.x = -vel.x.abs();
            pos.x = max_x;
        }

        let floor = GAME_HEIGHT - DUCK_HEIGHT;
        if pos.y >= floor {
            vel.y = -vel.y.abs();
            pos.y = floor;
        }
        // Fleeing ducks no longer bounce off the top
        if pos.y <= 0.0 && !fleeing {
            vel.y = vel.y.abs() * TOP_BOUNCE_DAMPING;
            pos.y = 0.0;
        }

        let jittery = self.kind == DuckKind::Hazard
            && age >= tuning.duck_flight_time_ms * HAZARD_JITTER_AGE;
        let turn_chance = if jittery {
            ERRATIC_CHANCE_HAZARD
        } else {
            ERRATIC_CHANCE
        };
        if rng.chance(turn_chance) {
            let turn = (rng.next_f32() - 0.5) * ERRATIC_TURN;
            vel = rotate_velocity(vel, turn);
        }

        if fleeing {
            vel.y = -vel.y.abs().max(1.0);
        }

        self.pos = pos;
        self.vel = vel;
        self.direction = Direction::from_velocity(vel);
        self.animation_frame = (self.animation_frame + 1) % 3;

        if self.pos.y <= -DUCK_HEIGHT {
            self.state = DuckState::Escaped;
            return Some(DuckState::Escaped);
        }
        None
    }

    fn update_falling(&mut self, dt: f32) -> Option<DuckState> {
        let step = dt * FRAME_SCALE;
        self.vel.x = 0.0;
        self.vel.y = (self.vel.y + FALL_ACCEL * step).min(FALL_MAX_SPEED);
        self.pos.y += self.vel.y * step;
        self.animation_frame = (self.animation_frame + 1) % 2;

        let floor = GAME_HEIGHT - DUCK_HEIGHT;
        if self.pos.y >= floor {
            self.pos.y = floor;
            self.state = DuckState::Dead;
            return Some(DuckState::Dead);
        }
        None
    }
}
