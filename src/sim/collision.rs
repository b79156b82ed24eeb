//! Shot hit-testing and scoring
//!
//! A shot is a click point in play-field space. Every flying duck whose
//! sprite center lies strictly within the hit radius is hit, so one shot can
//! drop several overlapping ducks.

use glam::Vec2;

use super::duck::{Duck, DuckKind, DuckState, PowerupEffect};
use super::state::{GameEvent, GamePhase, GameState};
use crate::duck_center;

/// Result of a processed shot
#[derive(Debug, Clone, PartialEq)]
pub struct ShotOutcome {
    /// IDs of the ducks hit, in spawn order
    pub hits: Vec<u32>,
    /// Signed score change before clamping
    pub points: i64,
    /// False while rapid fire is active
    pub consumed_bullet: bool,
}

impl ShotOutcome {
    pub fn is_miss(&self) -> bool {
        self.hits.is_empty()
    }
}

/// Indices of flying ducks within `radius` of `point`
pub fn hit_test(ducks: &[Duck], point: Vec2, radius: f32) -> Vec<usize> {
    ducks
        .iter()
        .enumerate()
        .filter(|(_, d)| d.state == DuckState::Flying)
        .filter(|(_, d)| duck_center(d.pos).distance(point) < radius)
        .map(|(i, _)| i)
        .collect()
}

/// Fire at `point`. Returns `None` when the shot is not allowed (not playing,
/// or out of bullets without rapid fire); nothing changes in that case.
pub fn shoot(state: &mut GameState, point: Vec2, now: f64) -> Option<ShotOutcome> {
    if state.phase != GamePhase::Playing {
        return None;
    }
    let rapid_fire = state.stats.rapid_fire_active(now);
    if state.stats.bullets == 0 && !rapid_fire {
        return None;
    }

    let points_per_duck = state.current_level().points_per_duck as i64;
    let tuning = state.tuning.clone();
    let hit_indices = hit_test(&state.ducks, point, tuning.hit_radius);

    let mut hits = Vec::with_capacity(hit_indices.len());
    let mut points = 0i64;
    let mut events = Vec::new();

    for index in hit_indices {
        let duck = &mut state.ducks[index];
        duck.hit();
        hits.push(duck.id);
        let kind = duck.kind();
        let effect = duck.powerup();
        events.push(GameEvent::DuckHit { kind });

        match kind {
            DuckKind::Normal => points += points_per_duck,
            DuckKind::Hazard => points += tuning.hazard_hit_points,
            DuckKind::Powerup => {
                points += points_per_duck;
                match effect {
                    Some(PowerupEffect::Health) => {
                        state.stats.lives = state.stats.lives.saturating_add(1).min(tuning.max_lives);
                        points += tuning.health_bonus as i64;
                        events.push(GameEvent::HealthRestored {
                            lives: state.stats.lives,
                        });
                    }
                    Some(PowerupEffect::RapidFire) | None => {
                        let until = state.stats.rapid_fire_until.max(now)
                            + tuning.rapid_fire_duration_ms;
                        state.stats.rapid_fire_until = until;
                        points += tuning.rapid_fire_bonus as i64;
                        events.push(GameEvent::RapidFireGranted { until });
                    }
                }
            }
        }
    }

    if hits.is_empty() {
        events.push(GameEvent::ShotMissed);
    }

    if !rapid_fire {
        state.stats.bullets -= 1;
    }
    let count = hits.len() as u32;
    state.stats.ducks_shot += count;
    state.stats.total_ducks_shot += count;
    state.stats.add_score(points);
    for event in events {
        state.push_event(event);
    }

    log::debug!(
        "Shot at ({:.0}, {:.0}): {} hit, {:+} points, {} bullets left",
        point.x,
        point.y,
        count,
        points,
        state.stats.bullets
    );

    Some(ShotOutcome {
        hits,
        points,
        consumed_bullet: !rapid_fire,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::SequenceRng;

    fn playing_with(ducks: &[(DuckKind, Option<PowerupEffect>, Vec2)]) -> GameState {
        let mut state = GameState::new();
        state.start_new_game(0.0);
        state.drain_events();
        let mut rng = SequenceRng::new(vec![0.5]);
        for (i, (kind, effect, pos)) in ducks.iter().enumerate() {
            let id = state.next_entity_id();
            let mut duck = Duck::spawn(id, i as u32, *kind, *effect, 2.5, 0.0, &mut rng);
            duck.pos = *pos;
            state.ducks.push(duck);
        }
        state.stats.ducks_spawned = ducks.len() as u32;
        state
    }

    #[test]
    fn test_hit_normal_duck() {
        let mut state = playing_with(&[(DuckKind::Normal, None, Vec2::new(100.0, 100.0))]);
        let outcome = shoot(&mut state, Vec2::new(130.0, 130.0), 10.0).expect("shot allowed");
        assert_eq!(outcome.hits.len(), 1);
        assert_eq!(state.ducks[0].state, DuckState::Shot);
        assert_eq!(state.stats.score, 100);
        assert_eq!(state.stats.ducks_shot, 1);
        assert_eq!(state.stats.total_ducks_shot, 1);
        assert_eq!(state.stats.bullets, 3);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::DuckHit {
                kind: DuckKind::Normal
            }]
        );
    }

    #[test]
    fn test_radius_is_strict() {
        let ducks = playing_with(&[(DuckKind::Normal, None, Vec2::new(100.0, 100.0))]).ducks;
        // Center is (130, 130); 50 px away is outside
        assert!(hit_test(&ducks, Vec2::new(180.0, 130.0), 50.0).is_empty());
        assert_eq!(hit_test(&ducks, Vec2::new(179.0, 130.0), 50.0), vec![0]);
    }

    #[test]
    fn test_miss_consumes_bullet() {
        let mut state = playing_with(&[(DuckKind::Normal, None, Vec2::new(100.0, 100.0))]);
        let outcome = shoot(&mut state, Vec2::new(700.0, 500.0), 10.0).expect("shot allowed");
        assert!(outcome.is_miss());
        assert_eq!(state.stats.bullets, 3);
        assert_eq!(state.stats.score, 0);
        assert_eq!(state.drain_events(), vec![GameEvent::ShotMissed]);
    }

    #[test]
    fn test_overlapping_ducks_all_hit() {
        let mut state = playing_with(&[
            (DuckKind::Normal, None, Vec2::new(100.0, 100.0)),
            (DuckKind::Normal, None, Vec2::new(120.0, 110.0)),
        ]);
        let outcome = shoot(&mut state, Vec2::new(140.0, 135.0), 0.0).expect("shot allowed");
        assert_eq!(outcome.hits.len(), 2);
        assert_eq!(state.stats.score, 200);
        assert_eq!(state.stats.bullets, 3);
    }

    #[test]
    fn test_no_bullets_no_effect() {
        let mut state = playing_with(&[(DuckKind::Normal, None, Vec2::new(100.0, 100.0))]);
        state.stats.bullets = 0;
        let before = state.stats.clone();
        assert_eq!(shoot(&mut state, Vec2::new(130.0, 130.0), 10.0), None);
        assert_eq!(state.stats, before);
        assert_eq!(state.ducks[0].state, DuckState::Flying);
        assert!(state.events().is_empty());
    }

    #[test]
    fn test_rapid_fire_shots_are_free() {
        let mut state = playing_with(&[(DuckKind::Normal, None, Vec2::new(100.0, 100.0))]);
        state.stats.bullets = 0;
        state.stats.rapid_fire_until = 5000.0;
        let outcome = shoot(&mut state, Vec2::new(130.0, 130.0), 1000.0).expect("rapid fire");
        assert!(!outcome.consumed_bullet);
        assert_eq!(state.stats.bullets, 0);
        assert_eq!(state.stats.score, 100);
    }

    #[test]
    fn test_health_powerup_capped_at_max_lives() {
        let mut state = playing_with(&[(
            DuckKind::Powerup,
            Some(PowerupEffect::Health),
            Vec2::new(100.0, 100.0),
        )]);
        state.stats.lives = 5;
        shoot(&mut state, Vec2::new(130.0, 130.0), 0.0).expect("shot allowed");
        assert_eq!(state.stats.lives, 5);
        assert_eq!(state.stats.score, 100 + 300);
    }

    #[test]
    fn test_health_powerup_at_u8_cap() {
        let mut state = playing_with(&[(
            DuckKind::Powerup,
            Some(PowerupEffect::Health),
            Vec2::new(100.0, 100.0),
        )]);
        state.tuning.max_lives = u8::MAX;
        state.stats.lives = u8::MAX;
        shoot(&mut state, Vec2::new(130.0, 130.0), 0.0).expect("shot allowed");
        assert_eq!(state.stats.lives, u8::MAX);
    }

    #[test]
    fn test_health_powerup_adds_life() {
        let mut state = playing_with(&[(
            DuckKind::Powerup,
            Some(PowerupEffect::Health),
            Vec2::new(100.0, 100.0),
        )]);
        shoot(&mut state, Vec2::new(130.0, 130.0), 0.0).expect("shot allowed");
        assert_eq!(state.stats.lives, 4);
        assert!(
            state
                .events()
                .contains(&GameEvent::HealthRestored { lives: 4 })
        );
    }

    #[test]
    fn test_rapid_fire_extends_window() {
        let mut state = playing_with(&[(
            DuckKind::Powerup,
            Some(PowerupEffect::RapidFire),
            Vec2::new(100.0, 100.0),
        )]);
        state.stats.rapid_fire_until = 3000.0;
        shoot(&mut state, Vec2::new(130.0, 130.0), 1000.0).expect("shot allowed");
        assert_eq!(state.stats.rapid_fire_until, 8000.0);
        assert_eq!(state.stats.score, 100 + 500);
        // Shot fired during rapid fire: no bullet used
        assert_eq!(state.stats.bullets, 4);
    }

    #[test]
    fn test_hazard_hit_reward_and_penalty() {
        let mut state = playing_with(&[(DuckKind::Hazard, None, Vec2::new(100.0, 100.0))]);
        shoot(&mut state, Vec2::new(130.0, 130.0), 0.0).expect("shot allowed");
        assert_eq!(state.stats.score, 50);
        assert_eq!(state.stats.lives, 3);

        let mut state = playing_with(&[(DuckKind::Hazard, None, Vec2::new(100.0, 100.0))]);
        state.tuning.hazard_hit_points = -200;
        state.stats.score = 80;
        shoot(&mut state, Vec2::new(130.0, 130.0), 0.0).expect("shot allowed");
        assert_eq!(state.stats.score, 0, "score clamps at zero");
    }

    #[test]
    fn test_shot_ignored_outside_playing() {
        let mut state = playing_with(&[(DuckKind::Normal, None, Vec2::new(100.0, 100.0))]);
        state.phase = GamePhase::Paused;
        assert_eq!(shoot(&mut state, Vec2::new(130.0, 130.0), 0.0), None);
        assert_eq!(state.stats.bullets, 4);
    }

    #[test]
    fn test_falling_ducks_cannot_be_hit_again() {
        let mut state = playing_with(&[(DuckKind::Normal, None, Vec2::new(100.0, 100.0))]);
        shoot(&mut state, Vec2::new(130.0, 130.0), 0.0).expect("shot allowed");
        let outcome = shoot(&mut state, Vec2::new(130.0, 130.0), 0.0).expect("shot allowed");
        assert!(outcome.is_miss());
        assert_eq!(state.stats.ducks_shot, 1);
    }
}
