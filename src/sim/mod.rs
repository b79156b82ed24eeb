//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Wall-clock timestamps are passed in, never read
//! - Randomness comes from an injected `RandomSource`
//! - Stable iteration order (ducks by spawn order)
//! - No rendering, audio or platform dependencies

pub mod action;
pub mod autopilot;
pub mod collision;
pub mod duck;
pub mod levels;
pub mod rng;
pub mod spawn;
pub mod state;
pub mod tick;

pub use action::{Action, dispatch};
pub use collision::{ShotOutcome, hit_test, shoot};
pub use duck::{Direction, Duck, DuckKind, DuckState, PowerupEffect};
pub use levels::{GameLevel, LEVELS};
pub use rng::{RandomSource, SequenceRng};
pub use spawn::{health_chance, should_spawn, spawn_batch};
pub use state::{
    DogReaction, DogState, GameEvent, GameOverReason, GamePhase, GameState, GameStats,
};
pub use tick::{FrameScheduler, LoopDriver, ManualScheduler, TickOutcome, tick};
