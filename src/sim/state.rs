//! Game state and core simulation types
//!
//! `GameState` is the single owned container the loop driver and the action
//! dispatcher mutate. Presentation only ever reads it.

use serde::{Deserialize, Serialize};

use super::duck::{Duck, DuckKind, DuckState};
use super::levels::{self, GameLevel};
use crate::payment::{PaymentKind, PaymentStatus};
use crate::tuning::Tuning;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen
    Menu,
    /// Waiting for the entry fee to clear
    AwaitingPayment,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Wave finished, waiting for the player to move on
    WaveEnd,
    /// Run ended
    GameOver,
    /// Every level cleared
    Victory,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    /// Escaped hazard ducks took the last life
    HazardDucksEscaped,
    /// Failed-wave retries took the last life
    LowAccuracy,
}

/// What the hunting dog is doing (presentation hint)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DogState {
    #[default]
    Hidden,
    /// New wave, sniffing out ducks
    Sniffing,
    /// Holding up shot ducks
    Celebrating,
    /// Something got away
    Laughing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DogReaction {
    pub state: DogState,
    pub ducks_held: u32,
}

/// Something that happened during a tick or action.
///
/// Hosts drain these each frame to drive sound and notifications.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Shot fired, nothing hit
    ShotMissed,
    DuckHit { kind: DuckKind },
    HealthRestored { lives: u8 },
    RapidFireGranted { until: f64 },
    DuckEscaped { kind: DuckKind },
    /// Shot duck reached the ground
    DuckDown,
    HazardDamage { lives_lost: u8 },
    WaveStarted { level: u32, wave: u32 },
    WaveEnded { success: bool },
    /// Wave restarts after missing the success threshold
    WaveFailed,
    LevelUp { level: u32 },
    GameOver { reason: GameOverReason },
    Victory,
    Paused,
    Resumed,
    PaymentRequested(PaymentKind),
    PaymentAccepted(PaymentKind),
    PaymentFailed(PaymentKind),
}

/// Scoreboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStats {
    /// Never negative; penalties clamp at zero
    pub score: u64,
    /// 1-based level number
    pub level: u32,
    /// 1-based wave within the level
    pub wave: u32,
    /// Bullets left in the current batch
    pub bullets: u32,
    /// Ducks shot this wave
    pub ducks_shot: u32,
    /// Ducks that got away this wave
    pub ducks_missed: u32,
    pub total_ducks_shot: u32,
    pub total_ducks_missed: u32,
    pub lives: u8,
    /// Timestamp (ms) rapid fire ends
    pub rapid_fire_until: f64,
    /// Ducks released this wave
    pub ducks_spawned: u32,
    pub hazard_ducks_escaped: u32,
    pub game_over_reason: Option<GameOverReason>,
    /// Timestamp (ms) of the last power-up spawn
    pub last_powerup_spawn: Option<f64>,
    /// Times the current wave was retried
    pub wave_retries: u32,
}

impl GameStats {
    /// Baseline for a brand new run
    pub fn fresh(tuning: &Tuning) -> Self {
        Self {
            score: 0,
            level: 1,
            wave: 1,
            bullets: tuning.starting_bullets(),
            ducks_shot: 0,
            ducks_missed: 0,
            total_ducks_shot: 0,
            total_ducks_missed: 0,
            lives: tuning.initial_lives,
            rapid_fire_until: 0.0,
            ducks_spawned: 0,
            hazard_ducks_escaped: 0,
            game_over_reason: None,
            last_powerup_spawn: None,
            wave_retries: 0,
        }
    }

    /// Percentage of ducks shot over the whole run
    pub fn accuracy(&self) -> f32 {
        let seen = self.total_ducks_shot + self.total_ducks_missed;
        if seen == 0 {
            return 0.0;
        }
        self.total_ducks_shot as f32 * 100.0 / seen as f32
    }

    pub fn rapid_fire_active(&self, now: f64) -> bool {
        now < self.rapid_fire_until
    }

    /// Add a signed amount to the score, clamping at zero
    pub fn add_score(&mut self, delta: i64) {
        self.score = (self.score as i64).saturating_add(delta).max(0) as u64;
    }
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    pub stats: GameStats,
    /// Ducks of the current wave, in spawn order
    pub ducks: Vec<Duck>,
    /// Seconds left on the wave clock
    pub time_remaining: f32,
    /// Entry fee paid
    pub paid: bool,
    /// Wallet address used to attribute leaderboard entries
    pub wallet: Option<String>,
    pub payment: PaymentStatus,
    pub dog: DogReaction,
    pub tuning: Tuning,
    /// Timestamp (ms) the current wave clock started
    pub wave_started_at: f64,
    /// Timestamp (ms) of the last spawn batch, `None` spawns immediately
    pub last_spawn_at: Option<f64>,
    /// Timestamp (ms) the game was paused
    pub paused_at: Option<f64>,
    /// Timestamp (ms) the current run started
    pub game_started_at: f64,
    #[serde(skip)]
    events: Vec<GameEvent>,
    next_id: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Fresh state on the title screen
    pub fn new() -> Self {
        Self::with_tuning(Tuning::default())
    }

    pub fn with_tuning(tuning: Tuning) -> Self {
        Self {
            phase: GamePhase::Menu,
            stats: GameStats::fresh(&tuning),
            ducks: Vec::new(),
            time_remaining: levels::level(1).time_per_wave,
            paid: false,
            wallet: None,
            payment: PaymentStatus::Idle,
            dog: DogReaction::default(),
            tuning,
            wave_started_at: 0.0,
            last_spawn_at: None,
            paused_at: None,
            game_started_at: 0.0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn current_level(&self) -> &'static GameLevel {
        levels::level(self.stats.level)
    }

    /// Ducks still flying, shot or falling
    pub fn active_ducks(&self) -> usize {
        self.ducks.iter().filter(|d| d.is_active()).count()
    }

    /// Ducks currently in the air (targets)
    pub fn flying_ducks(&self) -> impl Iterator<Item = &Duck> {
        self.ducks.iter().filter(|d| d.state == DuckState::Flying)
    }

    /// Ducks shot meet the success threshold for this wave
    pub fn wave_succeeded(&self) -> bool {
        let required = self
            .current_level()
            .required_ducks(self.tuning.success_ratio);
        self.stats.ducks_shot >= required
    }

    /// The wave just played passed and was the level's last
    pub fn level_complete(&self) -> bool {
        self.wave_succeeded() && self.stats.wave >= self.current_level().waves
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events recorded since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Reset stats to a wave-1 baseline and start playing
    pub fn start_new_game(&mut self, now: f64) {
        self.stats = GameStats::fresh(&self.tuning);
        self.game_started_at = now;
        self.restart_wave(now);
    }

    /// Clear the field and per-wave counters, start the wave clock, play
    pub fn restart_wave(&mut self, now: f64) {
        self.ducks.clear();
        self.stats.ducks_shot = 0;
        self.stats.ducks_missed = 0;
        self.stats.ducks_spawned = 0;
        self.stats.bullets = self.tuning.starting_bullets();
        self.time_remaining = self.current_level().time_per_wave;
        self.wave_started_at = now;
        self.last_spawn_at = None;
        self.paused_at = None;
        self.dog = DogReaction::default();
        self.phase = GamePhase::Playing;
        log::info!(
            "Level {} wave {} started",
            self.stats.level,
            self.stats.wave
        );
        self.push_event(GameEvent::WaveStarted {
            level: self.stats.level,
            wave: self.stats.wave,
        });
    }

    /// Move every wall-clock anchor forward by `ms` (time spent paused)
    pub fn shift_clock(&mut self, ms: f64) {
        self.wave_started_at += ms;
        self.game_started_at += ms;
        if let Some(t) = self.last_spawn_at.as_mut() {
            *t += ms;
        }
        if let Some(t) = self.stats.last_powerup_spawn.as_mut() {
            *t += ms;
        }
        if self.stats.rapid_fire_until > 0.0 {
            self.stats.rapid_fire_until += ms;
        }
        for duck in &mut self.ducks {
            duck.spawn_time += ms;
        }
    }
}
