//! Idle/demo mode AI
//!
//! Plays the game the way a steady human would: waits a reaction delay
//! between shots and always goes for the duck closest to escaping.

use glam::Vec2;

use super::action::Action;
use super::duck::DuckKind;
use super::state::{GamePhase, GameState};
use crate::duck_center;

#[derive(Debug, Clone)]
pub struct Autopilot {
    /// Minimum time between shots (ms)
    pub reaction_ms: f64,
    /// Leave hazard ducks alone unless nothing else is up
    pub prefer_safe_targets: bool,
    last_shot: Option<f64>,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            reaction_ms: 350.0,
            prefer_safe_targets: false,
            last_shot: None,
        }
    }
}

/// Point to shoot at: the center of the oldest flying duck
pub fn aim(state: &GameState, prefer_safe_targets: bool) -> Option<Vec2> {
    let oldest = |hazards: bool| {
        state
            .flying_ducks()
            .filter(|d| hazards || d.kind() != DuckKind::Hazard)
            .min_by(|a, b| {
                a.spawn_time
                    .partial_cmp(&b.spawn_time)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    };
    let target = if prefer_safe_targets {
        oldest(false).or_else(|| oldest(true))
    } else {
        oldest(true)
    };
    target.map(|d| duck_center(d.pos))
}

impl Autopilot {
    /// Decide what to do at `now`, if anything
    pub fn next_action(&mut self, state: &GameState, now: f64) -> Option<Action> {
        match state.phase {
            GamePhase::Playing => {
                if self.last_shot.is_some_and(|t| now - t < self.reaction_ms) {
                    return None;
                }
                let can_fire = state.stats.bullets > 0 || state.stats.rapid_fire_active(now);
                if !can_fire {
                    return None;
                }
                let target = aim(state, self.prefer_safe_targets)?;
                self.last_shot = Some(now);
                Some(Action::Shoot {
                    x: target.x,
                    y: target.y,
                })
            }
            GamePhase::WaveEnd => {
                self.last_shot = None;
                if state.level_complete() {
                    Some(Action::NextLevel)
                } else {
                    Some(Action::NextWave)
                }
            }
            _ => None,
        }
    }
}
