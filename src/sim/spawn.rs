//! Spawn policy
//!
//! Ducks arrive in small batches. A new batch is released only once the
//! previous one is fully resolved, so each batch comes with a fresh bullet
//! allowance sized to it.

use super::duck::{Duck, DuckKind, PowerupEffect};
use super::rng::RandomSource;
use super::state::{DogState, GamePhase, GameState};
use crate::tuning::Tuning;

/// Chance a power-up duck restores health instead of granting rapid fire.
///
/// Rises linearly from `health_chance_base` at full lives to
/// `health_chance_max` at one life left.
pub fn health_chance(lives: u8, tuning: &Tuning) -> f32 {
    let base = tuning.health_chance_base;
    let ceiling = tuning.health_chance_max.max(base);
    if tuning.max_lives <= 1 {
        return ceiling;
    }
    let missing = tuning.max_lives.saturating_sub(lives.max(1)) as f32;
    let span = (tuning.max_lives - 1) as f32;
    (base + (ceiling - base) * missing / span).clamp(base, ceiling)
}

/// Power-up cooldown has elapsed at `now`
pub fn powerup_ready(last_powerup_spawn: Option<f64>, now: f64, tuning: &Tuning) -> bool {
    last_powerup_spawn.is_none_or(|t| now - t >= tuning.powerup_cooldown_ms)
}

/// Draw a duck kind. `powerup_allowed` converts power-up draws to normal.
pub fn choose_kind(
    rng: &mut impl RandomSource,
    tuning: &Tuning,
    powerup_allowed: bool,
) -> DuckKind {
    let chances = &tuning.duck_chances;
    let roll = rng.next_f32();
    if roll < chances.normal {
        DuckKind::Normal
    } else if roll < chances.normal + chances.powerup {
        if powerup_allowed {
            DuckKind::Powerup
        } else {
            DuckKind::Normal
        }
    } else {
        DuckKind::Hazard
    }
}

/// Draw the effect a power-up duck will grant
pub fn choose_powerup(rng: &mut impl RandomSource, lives: u8, tuning: &Tuning) -> PowerupEffect {
    if rng.chance(health_chance(lives, tuning)) {
        PowerupEffect::Health
    } else {
        PowerupEffect::RapidFire
    }
}

/// Whether the loop should release the next batch at `now`
pub fn should_spawn(state: &GameState, now: f64) -> bool {
    if state.phase != GamePhase::Playing {
        return false;
    }
    let quota_left = state.stats.ducks_spawned < state.current_level().ducks_per_wave;
    let dwell_done = state
        .last_spawn_at
        .is_none_or(|t| now - t >= state.tuning.spawn_dwell_ms);
    quota_left && dwell_done && state.active_ducks() == 0
}

/// Release one batch of ducks. Returns how many were spawned.
///
/// Per duck the draws are: kind, power-up effect (power-up ducks only), then
/// the duck's launch parameters.
pub fn spawn_batch(state: &mut GameState, now: f64, rng: &mut impl RandomSource) -> u32 {
    let level = *state.current_level();
    let already = state.stats.ducks_spawned;
    let remaining = level.ducks_per_wave.saturating_sub(already);
    let count = state.tuning.ducks_per_spawn.min(remaining);
    if count == 0 {
        return 0;
    }

    let cooldown_over = powerup_ready(state.stats.last_powerup_spawn, now, &state.tuning);
    let mut spawned_powerup = false;

    for i in 0..count {
        let kind = choose_kind(rng, &state.tuning, cooldown_over && !spawned_powerup);
        let effect = if kind == DuckKind::Powerup {
            spawned_powerup = true;
            Some(choose_powerup(rng, state.stats.lives, &state.tuning))
        } else {
            None
        };
        let id = state.next_entity_id();
        let duck = Duck::spawn(id, already + i, kind, effect, level.duck_speed, now, rng);
        log::debug!(
            "Spawned duck {} ({:?}{}) at x={:.0}",
            id,
            kind,
            effect.map(|e| format!(", {:?}", e)).unwrap_or_default(),
            duck.pos.x
        );
        state.ducks.push(duck);
    }

    state.stats.ducks_spawned = already + count;
    state.stats.bullets = state.tuning.bullets_for(count);
    if spawned_powerup {
        state.stats.last_powerup_spawn = Some(now);
    }
    state.last_spawn_at = Some(now);
    if already == 0 {
        state.dog.state = DogState::Sniffing;
    }

    count
}
