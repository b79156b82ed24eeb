//! Data-driven game balance
//!
//! Every knob of the duck economy lives here so a JSON override can retune a
//! build without touching the simulation.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Weighted draw over duck kinds; must sum to 1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DuckTypeChances {
    pub normal: f32,
    pub powerup: f32,
    pub hazard: f32,
}

impl Default for DuckTypeChances {
    fn default() -> Self {
        Self {
            normal: 0.55,
            powerup: 0.25,
            hazard: 0.20,
        }
    }
}

impl DuckTypeChances {
    pub fn total(&self) -> f32 {
        self.normal + self.powerup + self.hazard
    }
}

/// Game balance values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub duck_chances: DuckTypeChances,
    /// Ducks released per spawn batch
    pub ducks_per_spawn: u32,
    /// Bullets granted per duck in a batch
    pub bullets_per_duck: u32,
    /// Fraction of a wave's quota that must be shot to advance
    pub success_ratio: f32,
    pub initial_lives: u8,
    pub max_lives: u8,
    /// Click must land within this distance of a duck's center
    pub hit_radius: f32,
    /// A flying duck older than this escapes unconditionally (ms)
    pub duck_flight_time_ms: f64,
    /// A flying duck older than this stops bouncing off the top edge (ms)
    pub duck_flee_age_ms: f64,
    /// Minimum time between power-up spawns (ms)
    pub powerup_cooldown_ms: f64,
    /// Minimum time between spawn batches (ms)
    pub spawn_dwell_ms: f64,
    /// Length of one rapid-fire grant (ms)
    pub rapid_fire_duration_ms: f64,
    pub health_bonus: u64,
    pub rapid_fire_bonus: u64,
    /// Net score for shooting a hazard duck; negative values penalize
    pub hazard_hit_points: i64,
    /// Chance a power-up restores health when lives are full
    pub health_chance_base: f32,
    /// Chance a power-up restores health at one life left
    pub health_chance_max: f32,
    /// Lives taken when the player retries a failed wave
    pub failed_wave_life_penalty: u8,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            duck_chances: DuckTypeChances::default(),
            ducks_per_spawn: 2,
            bullets_per_duck: 2,
            success_ratio: 0.5,
            initial_lives: 3,
            max_lives: 5,
            hit_radius: 50.0,
            duck_flight_time_ms: 8000.0,
            duck_flee_age_ms: 6000.0,
            powerup_cooldown_ms: 10_000.0,
            spawn_dwell_ms: 500.0,
            rapid_fire_duration_ms: 5000.0,
            health_bonus: 300,
            rapid_fire_bonus: 500,
            hazard_hit_points: 50,
            health_chance_base: 0.4,
            health_chance_max: 0.8,
            failed_wave_life_penalty: 0,
        }
    }
}

/// Reasons a tuning table is rejected
#[derive(Debug, Clone, PartialEq)]
pub enum TuningError {
    ChancesDontSumToOne { total: f32 },
    NegativeChance,
    RatioOutOfRange { name: &'static str, value: f32 },
    LivesOutOfRange { initial: u8, max: u8 },
    ZeroBatch,
    FleeAfterEscape { flee_ms: f64, flight_ms: f64 },
    Parse(String),
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChancesDontSumToOne { total } => {
                write!(f, "duck type chances must sum to 1.0, got {total}")
            }
            Self::NegativeChance => write!(f, "duck type chances must be non-negative"),
            Self::RatioOutOfRange { name, value } => {
                write!(f, "{name} must be within 0.0..=1.0, got {value}")
            }
            Self::LivesOutOfRange { initial, max } => write!(
                f,
                "lives out of range: initial={initial}, max={max} (need 1 <= initial <= max)"
            ),
            Self::ZeroBatch => write!(f, "ducks_per_spawn must be at least 1"),
            Self::FleeAfterEscape { flee_ms, flight_ms } => write!(
                f,
                "flee age {flee_ms}ms must not exceed flight time {flight_ms}ms"
            ),
            Self::Parse(msg) => write!(f, "invalid tuning json: {msg}"),
        }
    }
}

impl std::error::Error for TuningError {}

impl Tuning {
    /// Parse a (possibly partial) JSON override and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning =
            serde_json::from_str(json).map_err(|e| TuningError::Parse(e.to_string()))?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        let c = &self.duck_chances;
        if c.normal < 0.0 || c.powerup < 0.0 || c.hazard < 0.0 {
            return Err(TuningError::NegativeChance);
        }
        if (c.total() - 1.0).abs() > 1e-3 {
            return Err(TuningError::ChancesDontSumToOne { total: c.total() });
        }
        for (name, value) in [
            ("success_ratio", self.success_ratio),
            ("health_chance_base", self.health_chance_base),
            ("health_chance_max", self.health_chance_max),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(TuningError::RatioOutOfRange { name, value });
            }
        }
        if self.initial_lives == 0 || self.initial_lives > self.max_lives {
            return Err(TuningError::LivesOutOfRange {
                initial: self.initial_lives,
                max: self.max_lives,
            });
        }
        if self.ducks_per_spawn == 0 {
            return Err(TuningError::ZeroBatch);
        }
        if self.duck_flee_age_ms > self.duck_flight_time_ms {
            return Err(TuningError::FleeAfterEscape {
                flee_ms: self.duck_flee_age_ms,
                flight_ms: self.duck_flight_time_ms,
            });
        }
        Ok(())
    }

    /// Bullets loaded for a batch of `ducks`
    pub fn bullets_for(&self, ducks: u32) -> u32 {
        ducks * self.bullets_per_duck
    }

    /// Bullets a fresh wave starts with
    pub fn starting_bullets(&self) -> u32 {
        self.bullets_for(self.ducks_per_spawn)
    }
}
