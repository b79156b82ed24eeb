//! Wave/level state machine
//!
//! Every player or host request is an `Action`. `dispatch` routes it to one
//! handler per variant; a handler that does not apply in the current phase
//! leaves the state untouched and reports `false`.

use glam::Vec2;

use super::collision;
use super::duck::{DuckKind, DuckState};
use super::levels;
use super::state::{DogReaction, DogState, GameEvent, GameOverReason, GamePhase, GameState};
use crate::payment::{PaymentError, PaymentKind, PaymentStatus};

/// Requests the core accepts
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Start from the menu; asks for payment unless already paid
    Start,
    Shoot { x: f32, y: f32 },
    Pause,
    Resume,
    NextWave,
    NextLevel,
    BuyLife,
    Continue,
    /// Full reset including the paid flag
    ResetGame,
    /// Back to the title screen, keeping payment and wallet
    GoToMenu,
    SetPaid(bool),
    SetWallet(Option<String>),
    RequestPayment(PaymentKind),
    PaymentConfirmed(PaymentKind),
    PaymentFailed(PaymentKind, PaymentError),
    CancelPayment,
}

/// Apply an action at time `now` (ms). Returns false if it was ignored.
pub fn dispatch(state: &mut GameState, action: Action, now: f64) -> bool {
    let applied = match &action {
        Action::Start => start(state, now),
        Action::Shoot { x, y } => collision::shoot(state, Vec2::new(*x, *y), now).is_some(),
        Action::Pause => pause(state, now),
        Action::Resume => resume(state, now),
        Action::NextWave => next_wave(state, now),
        Action::NextLevel => next_level(state, now),
        Action::BuyLife => buy_life(state, now),
        Action::Continue => continue_game(state, now),
        Action::ResetGame => reset_game(state),
        Action::GoToMenu => go_to_menu(state),
        Action::SetPaid(paid) => {
            state.paid = *paid;
            true
        }
        Action::SetWallet(address) => {
            state.wallet = address.clone();
            true
        }
        Action::RequestPayment(kind) => request_payment(state, *kind),
        Action::PaymentConfirmed(kind) => payment_confirmed(state, *kind, now),
        Action::PaymentFailed(kind, error) => payment_failed(state, *kind, error.clone()),
        Action::CancelPayment => cancel_payment(state),
    };
    if !applied {
        log::debug!("Ignored {:?} in {:?}", action, state.phase);
    }
    applied
}

fn start(state: &mut GameState, now: f64) -> bool {
    if state.phase != GamePhase::Menu {
        return false;
    }
    if state.paid {
        state.start_new_game(now);
        true
    } else {
        request_payment(state, PaymentKind::NewGame)
    }
}

/// Payment kinds that make sense in the current phase
fn payment_allowed(phase: GamePhase, kind: PaymentKind) -> bool {
    match kind {
        PaymentKind::NewGame => matches!(phase, GamePhase::Menu | GamePhase::AwaitingPayment),
        PaymentKind::ExtraLife => matches!(phase, GamePhase::GameOver | GamePhase::WaveEnd),
        PaymentKind::Continue => phase == GamePhase::GameOver,
    }
}

fn request_payment(state: &mut GameState, kind: PaymentKind) -> bool {
    // One payment in flight at a time
    if !payment_allowed(state.phase, kind) || matches!(state.payment, PaymentStatus::Pending(_)) {
        return false;
    }
    if kind == PaymentKind::NewGame {
        state.phase = GamePhase::AwaitingPayment;
    }
    state.payment = PaymentStatus::Pending(kind);
    log::info!("Payment requested: {}", kind.as_str());
    state.push_event(GameEvent::PaymentRequested(kind));
    true
}

fn payment_confirmed(state: &mut GameState, kind: PaymentKind, now: f64) -> bool {
    if !state.payment.is_pending(kind) || !payment_allowed(state.phase, kind) {
        return false;
    }
    state.payment = PaymentStatus::Idle;
    log::info!("Payment accepted: {}", kind.as_str());
    state.push_event(GameEvent::PaymentAccepted(kind));
    match kind {
        PaymentKind::NewGame => {
            state.paid = true;
            state.start_new_game(now);
            true
        }
        PaymentKind::ExtraLife => buy_life(state, now),
        PaymentKind::Continue => continue_game(state, now),
    }
}

fn payment_failed(state: &mut GameState, kind: PaymentKind, error: PaymentError) -> bool {
    if !state.payment.is_pending(kind) {
        return false;
    }
    log::warn!("Payment {} failed: {}", kind.as_str(), error);
    state.payment = PaymentStatus::Failed { kind, error };
    state.push_event(GameEvent::PaymentFailed(kind));
    true
}

fn cancel_payment(state: &mut GameState) -> bool {
    let Some(kind) = state.payment.kind() else {
        return false;
    };
    state.payment = PaymentStatus::Idle;
    if kind == PaymentKind::NewGame && state.phase == GamePhase::AwaitingPayment {
        state.phase = GamePhase::Menu;
    }
    true
}

fn pause(state: &mut GameState, now: f64) -> bool {
    if state.phase != GamePhase::Playing {
        return false;
    }
    state.phase = GamePhase::Paused;
    state.paused_at = Some(now);
    state.push_event(GameEvent::Paused);
    true
}

fn resume(state: &mut GameState, now: f64) -> bool {
    if state.phase != GamePhase::Paused {
        return false;
    }
    if let Some(paused_at) = state.paused_at.take() {
        state.shift_clock((now - paused_at).max(0.0));
    }
    state.phase = GamePhase::Playing;
    state.push_event(GameEvent::Resumed);
    true
}

/// Close the current wave: tally escapes, charge hazard escapes against lives.
///
/// Ducks still flying when the wave ends count as escaped.
pub fn end_wave(state: &mut GameState) -> bool {
    if state.phase != GamePhase::Playing {
        return false;
    }

    let escaped: Vec<DuckKind> = state
        .ducks
        .iter()
        .filter(|d| matches!(d.state, DuckState::Escaped | DuckState::Flying))
        .map(|d| d.kind())
        .collect();
    let shot = state
        .ducks
        .iter()
        .filter(|d| matches!(d.state, DuckState::Shot | DuckState::Falling | DuckState::Dead))
        .count() as u32;
    let hazards = escaped.iter().filter(|k| **k == DuckKind::Hazard).count() as u32;

    let missed = escaped.len() as u32;
    state.stats.ducks_missed += missed;
    state.stats.total_ducks_missed += missed;
    state.stats.hazard_ducks_escaped += hazards;

    let lives_lost = hazards.min(state.stats.lives as u32) as u8;
    state.stats.lives -= lives_lost;
    if hazards > 0 {
        state.push_event(GameEvent::HazardDamage { lives_lost });
    }

    state.dog.state = if missed > 0 {
        DogState::Laughing
    } else if shot > 0 {
        DogState::Celebrating
    } else {
        DogState::Hidden
    };
    state.dog.ducks_held = if state.dog.state == DogState::Celebrating {
        shot
    } else {
        0
    };

    if state.stats.lives == 0 {
        state.dog = DogReaction {
            state: DogState::Laughing,
            ducks_held: 0,
        };
        game_over(state, GameOverReason::HazardDucksEscaped);
        return true;
    }

    let success = state.wave_succeeded();
    state.phase = GamePhase::WaveEnd;
    log::info!(
        "Wave {} ended: {} shot, {} missed, success={}",
        state.stats.wave,
        state.stats.ducks_shot,
        missed,
        success
    );
    state.push_event(GameEvent::WaveEnded { success });
    true
}

fn game_over(state: &mut GameState, reason: GameOverReason) {
    state.phase = GamePhase::GameOver;
    state.stats.game_over_reason = Some(reason);
    log::info!("Game over: {:?} (score {})", reason, state.stats.score);
    state.push_event(GameEvent::GameOver { reason });
}

fn next_wave(state: &mut GameState, now: f64) -> bool {
    if state.phase != GamePhase::WaveEnd {
        return false;
    }

    if !state.wave_succeeded() {
        state.stats.wave_retries += 1;
        let penalty = state.tuning.failed_wave_life_penalty;
        state.stats.lives = state.stats.lives.saturating_sub(penalty);
        state.push_event(GameEvent::WaveFailed);
        if state.stats.lives == 0 {
            game_over(state, GameOverReason::LowAccuracy);
        } else {
            state.restart_wave(now);
        }
        return true;
    }

    if state.stats.wave >= state.current_level().waves {
        // Level complete; NextLevel moves on
        return false;
    }

    state.stats.wave += 1;
    state.stats.wave_retries = 0;
    state.restart_wave(now);
    true
}

fn next_level(state: &mut GameState, now: f64) -> bool {
    if state.phase != GamePhase::WaveEnd || !state.level_complete() {
        return false;
    }

    if levels::is_last_level(state.stats.level) {
        state.phase = GamePhase::Victory;
        state.ducks.clear();
        log::info!(
            "Victory! score {} accuracy {:.0}%",
            state.stats.score,
            state.stats.accuracy()
        );
        state.push_event(GameEvent::Victory);
        return true;
    }

    state.stats.level += 1;
    state.stats.wave = 1;
    state.stats.wave_retries = 0;
    state.push_event(GameEvent::LevelUp {
        level: state.stats.level,
    });
    state.restart_wave(now);
    true
}

fn buy_life(state: &mut GameState, now: f64) -> bool {
    if !matches!(state.phase, GamePhase::GameOver | GamePhase::WaveEnd) {
        return false;
    }
    state.stats.lives = state.stats.lives.saturating_add(1).min(state.tuning.max_lives);
    state.stats.wave = 1;
    state.stats.wave_retries = 0;
    state.stats.game_over_reason = None;
    state.restart_wave(now);
    true
}

fn continue_game(state: &mut GameState, now: f64) -> bool {
    if state.phase != GamePhase::GameOver {
        return false;
    }
    state.stats.lives = state.tuning.initial_lives;
    state.stats.wave = 1;
    state.stats.wave_retries = 0;
    state.stats.game_over_reason = None;
    state.restart_wave(now);
    true
}

fn go_to_menu(state: &mut GameState) -> bool {
    let mut fresh = GameState::with_tuning(state.tuning.clone());
    fresh.paid = state.paid;
    fresh.wallet = state.wallet.take();
    // Drop any payment still in flight
    if !matches!(state.payment, PaymentStatus::Pending(_)) {
        fresh.payment = std::mem::take(&mut state.payment);
    }
    *state = fresh;
    true
}

fn reset_game(state: &mut GameState) -> bool {
    if !matches!(
        state.phase,
        GamePhase::Menu | GamePhase::GameOver | GamePhase::Victory
    ) {
        return false;
    }
    let mut fresh = GameState::with_tuning(state.tuning.clone());
    fresh.wallet = state.wallet.take();
    *state = fresh;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::duck::{Duck, PowerupEffect};
    use crate::sim::rng::SequenceRng;
    use crate::sim::state::GameStats;

    fn playing() -> GameState {
        let mut state = GameState::new();
        assert!(dispatch(&mut state, Action::SetPaid(true), 0.0));
        assert!(dispatch(&mut state, Action::Start, 0.0));
        state.drain_events();
        state
    }

    fn add_duck(state: &mut GameState, kind: DuckKind, duck_state: DuckState) {
        let mut rng = SequenceRng::new(vec![0.5]);
        let id = state.next_entity_id();
        let effect = (kind == DuckKind::Powerup).then_some(PowerupEffect::Health);
        let mut duck = Duck::spawn(id, 0, kind, effect, 2.5, 0.0, &mut rng);
        duck.state = duck_state;
        state.ducks.push(duck);
        state.stats.ducks_spawned += 1;
    }

    /// Level 1 wave that ends with `shot` of 4 ducks shot
    fn wave_end_with(shot: u32) -> GameState {
        let mut state = playing();
        for i in 0..4 {
            let s = if i < shot {
                DuckState::Dead
            } else {
                DuckState::Escaped
            };
            add_duck(&mut state, DuckKind::Normal, s);
        }
        state.stats.ducks_shot = shot;
        assert!(end_wave(&mut state));
        state
    }

    #[test]
    fn test_start_without_payment_awaits_payment() {
        let mut state = GameState::new();
        assert!(dispatch(&mut state, Action::Start, 0.0));
        assert_eq!(state.phase, GamePhase::AwaitingPayment);
        assert_eq!(state.payment, PaymentStatus::Pending(PaymentKind::NewGame));

        assert!(dispatch(&mut state, Action::PaymentConfirmed(PaymentKind::NewGame), 100.0));
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.paid);
        assert_eq!(state.payment, PaymentStatus::Idle);
        assert_eq!(state.wave_started_at, 100.0);
        assert_eq!(state.stats.ducks_spawned, 0);
    }

    #[test]
    fn test_payment_failure_is_retryable() {
        let mut state = GameState::new();
        dispatch(&mut state, Action::Start, 0.0);
        assert!(dispatch(
            &mut state,
            Action::PaymentFailed(PaymentKind::NewGame, PaymentError::Cancelled),
            0.0
        ));
        assert_eq!(state.phase, GamePhase::AwaitingPayment);
        assert!(matches!(state.payment, PaymentStatus::Failed { .. }));

        // Confirmation without a pending request is ignored
        assert!(!dispatch(&mut state, Action::PaymentConfirmed(PaymentKind::NewGame), 0.0));

        assert!(dispatch(&mut state, Action::RequestPayment(PaymentKind::NewGame), 0.0));
        assert!(dispatch(&mut state, Action::PaymentConfirmed(PaymentKind::NewGame), 0.0));
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_cancel_new_game_payment_returns_to_menu() {
        let mut state = GameState::new();
        dispatch(&mut state, Action::Start, 0.0);
        assert!(dispatch(&mut state, Action::CancelPayment, 0.0));
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.payment, PaymentStatus::Idle);
        assert!(!dispatch(&mut state, Action::CancelPayment, 0.0));
    }

    #[test]
    fn test_shoot_ignored_outside_playing() {
        let mut state = GameState::new();
        assert!(!dispatch(&mut state, Action::Shoot { x: 10.0, y: 10.0 }, 0.0));
        assert_eq!(state.stats.bullets, 4);
    }

    #[test]
    fn test_pause_is_idempotent() {
        let mut state = playing();
        assert!(dispatch(&mut state, Action::Pause, 1000.0));
        assert!(!dispatch(&mut state, Action::Pause, 1100.0));
        assert_eq!(state.phase, GamePhase::Paused);
        assert_eq!(state.paused_at, Some(1000.0));
    }

    #[test]
    fn test_resume_shifts_wave_clock() {
        let mut state = playing();
        add_duck(&mut state, DuckKind::Normal, DuckState::Flying);
        dispatch(&mut state, Action::Pause, 2000.0);
        assert!(dispatch(&mut state, Action::Resume, 7000.0));
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.wave_started_at, 5000.0);
        assert_eq!(state.ducks[0].spawn_time, 5000.0);
        assert!(!dispatch(&mut state, Action::Resume, 7000.0));
    }

    #[test]
    fn test_wave_success_threshold_exactly_met() {
        let state = wave_end_with(2);
        assert_eq!(state.phase, GamePhase::WaveEnd);
        assert!(state.wave_succeeded());
        assert_eq!(state.stats.ducks_missed, 2);
        assert!(state.events().contains(&GameEvent::WaveEnded { success: true }));
    }

    #[test]
    fn test_failed_wave_restarts_without_penalty() {
        let mut state = wave_end_with(1);
        assert!(!state.wave_succeeded());
        assert!(dispatch(&mut state, Action::NextWave, 5000.0));
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.stats.wave, 1);
        assert_eq!(state.stats.lives, 3);
        assert_eq!(state.stats.ducks_shot, 0);
        assert_eq!(state.stats.ducks_spawned, 0);
        assert_eq!(state.stats.wave_retries, 1);
        assert!(state.ducks.is_empty());
        assert_eq!(state.wave_started_at, 5000.0);
    }

    #[test]
    fn test_failed_wave_penalty_can_end_game() {
        let mut state = wave_end_with(0);
        state.tuning.failed_wave_life_penalty = 1;
        state.stats.lives = 1;
        assert!(dispatch(&mut state, Action::NextWave, 0.0));
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(
            state.stats.game_over_reason,
            Some(GameOverReason::LowAccuracy)
        );
    }

    #[test]
    fn test_next_wave_advances() {
        let mut state = wave_end_with(3);
        assert!(dispatch(&mut state, Action::NextWave, 0.0));
        assert_eq!(state.stats.wave, 2);
        assert_eq!(state.stats.ducks_shot, 0);
        assert_eq!(state.stats.total_ducks_shot, 0, "only shoot() counts totals");
        assert_eq!(state.stats.bullets, 4);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_next_level_requires_completed_level() {
        let mut state = wave_end_with(4);
        assert!(!dispatch(&mut state, Action::NextLevel, 0.0));

        state.stats.wave = 3;
        assert!(!dispatch(&mut state, Action::NextWave, 0.0));
        assert!(dispatch(&mut state, Action::NextLevel, 0.0));
        assert_eq!(state.stats.level, 2);
        assert_eq!(state.stats.wave, 1);
        assert_eq!(state.current_level().title, "Easy");
        assert_eq!(state.time_remaining, 18.0);
    }

    #[test]
    fn test_next_level_on_last_level_is_victory() {
        let mut state = playing();
        state.stats.level = 6;
        state.stats.wave = 6;
        for _ in 0..10 {
            add_duck(&mut state, DuckKind::Normal, DuckState::Dead);
        }
        state.stats.ducks_shot = 10;
        end_wave(&mut state);
        assert!(dispatch(&mut state, Action::NextLevel, 0.0));
        assert_eq!(state.phase, GamePhase::Victory);
        assert_eq!(state.stats.level, 6);
        assert!(state.events().contains(&GameEvent::Victory));
    }

    #[test]
    fn test_hazard_escape_takes_last_life() {
        let mut state = playing();
        state.stats.lives = 1;
        add_duck(&mut state, DuckKind::Hazard, DuckState::Escaped);
        add_duck(&mut state, DuckKind::Normal, DuckState::Dead);
        assert!(end_wave(&mut state));
        assert_eq!(state.stats.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(
            state.stats.game_over_reason,
            Some(GameOverReason::HazardDucksEscaped)
        );
        assert_eq!(state.stats.hazard_ducks_escaped, 1);
        assert_eq!(state.dog.state, DogState::Laughing);
    }

    #[test]
    fn test_lives_floor_at_zero() {
        let mut state = playing();
        state.stats.lives = 1;
        for _ in 0..3 {
            add_duck(&mut state, DuckKind::Hazard, DuckState::Flying);
        }
        end_wave(&mut state);
        assert_eq!(state.stats.lives, 0);
        assert!(
            state
                .events()
                .contains(&GameEvent::HazardDamage { lives_lost: 1 })
        );
    }

    #[test]
    fn test_dog_celebrates_clean_wave() {
        let state = wave_end_with(4);
        assert_eq!(state.dog.state, DogState::Celebrating);
        assert_eq!(state.dog.ducks_held, 4);
    }

    #[test]
    fn test_buy_life_restarts_level_at_wave_one() {
        let mut state = playing();
        state.stats.wave = 2;
        state.stats.lives = 1;
        add_duck(&mut state, DuckKind::Hazard, DuckState::Escaped);
        end_wave(&mut state);
        assert_eq!(state.phase, GamePhase::GameOver);

        assert!(dispatch(&mut state, Action::RequestPayment(PaymentKind::ExtraLife), 0.0));
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(dispatch(&mut state, Action::PaymentConfirmed(PaymentKind::ExtraLife), 900.0));
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.stats.lives, 1);
        assert_eq!(state.stats.wave, 1);
        assert_eq!(state.stats.game_over_reason, None);
        assert!(state.ducks.is_empty());
    }

    #[test]
    fn test_buy_life_capped() {
        let mut state = wave_end_with(3);
        state.stats.lives = 5;
        assert!(dispatch(&mut state, Action::BuyLife, 0.0));
        assert_eq!(state.stats.lives, 5);
    }

    #[test]
    fn test_continue_keeps_score_and_level() {
        let mut state = playing();
        state.stats.level = 3;
        state.stats.wave = 2;
        state.stats.score = 4200;
        state.stats.lives = 1;
        add_duck(&mut state, DuckKind::Hazard, DuckState::Escaped);
        end_wave(&mut state);

        assert!(!dispatch(&mut state, Action::RequestPayment(PaymentKind::NewGame), 0.0));
        assert!(dispatch(&mut state, Action::RequestPayment(PaymentKind::Continue), 0.0));
        assert!(dispatch(&mut state, Action::PaymentConfirmed(PaymentKind::Continue), 0.0));
        assert_eq!(state.stats.lives, 3);
        assert_eq!(state.stats.level, 3);
        assert_eq!(state.stats.wave, 1);
        assert_eq!(state.stats.score, 4200);
    }

    #[test]
    fn test_continue_only_after_game_over() {
        let mut state = wave_end_with(3);
        assert!(!dispatch(&mut state, Action::Continue, 0.0));
        assert_eq!(state.phase, GamePhase::WaveEnd);
    }

    #[test]
    fn test_go_to_menu_keeps_payment_and_wallet() {
        let mut state = playing();
        dispatch(&mut state, Action::SetWallet(Some("0xabc".into())), 0.0);
        state.stats.score = 900;
        assert!(dispatch(&mut state, Action::GoToMenu, 0.0));
        assert_eq!(state.phase, GamePhase::Menu);
        assert!(state.paid);
        assert_eq!(state.wallet.as_deref(), Some("0xabc"));
        assert_eq!(state.stats, GameStats::fresh(&state.tuning));
    }

    #[test]
    fn test_reset_then_start_is_fresh_game() {
        let mut state = wave_end_with(3);
        state.stats.score = 12_345;
        dispatch(&mut state, Action::SetWallet(Some("0xabc".into())), 0.0);
        assert!(!dispatch(&mut state, Action::ResetGame, 0.0), "not from wave end");
        dispatch(&mut state, Action::GoToMenu, 0.0);
        assert!(dispatch(&mut state, Action::ResetGame, 0.0));
        assert!(!state.paid);
        assert_eq!(state.wallet.as_deref(), Some("0xabc"));

        dispatch(&mut state, Action::Start, 0.0);
        dispatch(&mut state, Action::PaymentConfirmed(PaymentKind::NewGame), 0.0);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.stats, GameStats::fresh(&state.tuning));
        assert_eq!(state.stats.score, 0);
        assert_eq!(state.stats.level, 1);
        assert_eq!(state.stats.wave, 1);
        assert_eq!(state.stats.lives, 3);
    }

    #[test]
    fn test_menu_drops_pending_entry_fee() {
        let mut state = GameState::new();
        assert!(dispatch(&mut state, Action::Start, 0.0));
        assert!(dispatch(&mut state, Action::GoToMenu, 0.0));
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.payment, PaymentStatus::Idle);

        state.drain_events();
        assert!(dispatch(&mut state, Action::Start, 0.0));
        assert_eq!(state.phase, GamePhase::AwaitingPayment);
        assert_eq!(state.payment, PaymentStatus::Pending(PaymentKind::NewGame));
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::PaymentRequested(PaymentKind::NewGame)]
        );
    }

    #[test]
    fn test_start_reports_ignored_payment_request() {
        let mut state = GameState::new();
        state.payment = PaymentStatus::Pending(PaymentKind::NewGame);
        assert!(!dispatch(&mut state, Action::Start, 0.0));
        assert_eq!(state.phase, GamePhase::Menu);
    }

    #[test]
    fn test_second_payment_waits_for_first() {
        let mut state = playing();
        state.stats.lives = 1;
        add_duck(&mut state, DuckKind::Hazard, DuckState::Escaped);
        end_wave(&mut state);
        assert_eq!(state.phase, GamePhase::GameOver);

        assert!(dispatch(&mut state, Action::RequestPayment(PaymentKind::Continue), 0.0));
        assert!(!dispatch(&mut state, Action::RequestPayment(PaymentKind::ExtraLife), 0.0));
        assert_eq!(state.payment, PaymentStatus::Pending(PaymentKind::Continue));

        assert!(dispatch(&mut state, Action::PaymentConfirmed(PaymentKind::Continue), 0.0));
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.stats.lives, state.tuning.initial_lives);
    }

    #[test]
    fn test_buy_life_at_u8_cap() {
        let mut state = playing();
        state.tuning.max_lives = u8::MAX;
        state.stats.lives = u8::MAX;
        state.phase = GamePhase::GameOver;
        assert!(dispatch(&mut state, Action::BuyLife, 0.0));
        assert_eq!(state.stats.lives, u8::MAX);
    }
}
