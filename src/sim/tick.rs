//! Game loop driver
//!
//! `tick` advances the simulation by one rendered frame. `LoopDriver` owns the
//! frame scheduling: exactly one frame is pending while the game is playing,
//! and none otherwise.

use super::action;
use super::duck::DuckState;
use super::rng::RandomSource;
use super::spawn;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::MAX_FRAME_DT;

/// What happened during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub spawned: u32,
    pub escaped: u32,
    /// Shot ducks that reached the ground
    pub landed: u32,
    pub wave_ended: bool,
}

/// Advance the game by `dt` seconds at wall-clock time `now` (ms).
///
/// Does nothing outside `Playing`.
pub fn tick(
    state: &mut GameState,
    dt: f32,
    now: f64,
    rng: &mut impl RandomSource,
) -> TickOutcome {
    let mut outcome = TickOutcome::default();
    if state.phase != GamePhase::Playing {
        return outcome;
    }
    let dt = dt.clamp(0.0, MAX_FRAME_DT);

    // Kinematics
    let mut events = Vec::new();
    for duck in &mut state.ducks {
        if duck.state == DuckState::Shot {
            duck.start_falling();
            continue;
        }
        match duck.update(dt, now, &state.tuning, rng) {
            Some(DuckState::Escaped) => {
                outcome.escaped += 1;
                events.push(GameEvent::DuckEscaped { kind: duck.kind() });
            }
            Some(DuckState::Dead) => {
                outcome.landed += 1;
                events.push(GameEvent::DuckDown);
            }
            _ => {}
        }
    }
    for event in events {
        state.push_event(event);
    }

    // Wave clock
    let level = state.current_level();
    let elapsed = ((now - state.wave_started_at) / 1000.0) as f32;
    state.time_remaining = (level.time_per_wave - elapsed).max(0.0);

    // No new ducks once the clock has run out
    if state.time_remaining > 0.0 && spawn::should_spawn(state, now) {
        outcome.spawned = spawn::spawn_batch(state, now, rng);
    }

    let quota_done =
        state.stats.ducks_spawned >= level.ducks_per_wave && state.active_ducks() == 0;
    if quota_done || state.time_remaining <= 0.0 {
        if state.time_remaining <= 0.0 {
            log::debug!("Wave timer expired with {} ducks active", state.active_ducks());
        }
        outcome.wave_ended = action::end_wave(state);
    }

    outcome
}

/// Host frame scheduling (`requestAnimationFrame` in the browser)
pub trait FrameScheduler {
    type Handle: Copy + PartialEq + core::fmt::Debug;

    /// Ask for one frame callback
    fn request_frame(&mut self) -> Self::Handle;

    /// Drop a requested callback that has not fired yet
    fn cancel_frame(&mut self, handle: Self::Handle);
}

/// Keeps one frame in flight while playing and integrates elapsed time.
#[derive(Debug)]
pub struct LoopDriver<S: FrameScheduler> {
    scheduler: S,
    pending: Option<S::Handle>,
    last_time: Option<f64>,
}

impl<S: FrameScheduler> LoopDriver<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            pending: None,
            last_time: None,
        }
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    /// Match scheduling to the phase. Call after every dispatched action.
    pub fn sync(&mut self, state: &GameState) {
        if state.phase == GamePhase::Playing {
            if self.pending.is_none() {
                self.pending = Some(self.scheduler.request_frame());
            }
        } else {
            self.stop();
        }
    }

    /// Cancel the pending frame, if any
    pub fn stop(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
        self.last_time = None;
    }

    /// Frame callback. Returns `None` for a stale or cancelled handle.
    pub fn on_frame(
        &mut self,
        handle: S::Handle,
        state: &mut GameState,
        now: f64,
        rng: &mut impl RandomSource,
    ) -> Option<TickOutcome> {
        if self.pending != Some(handle) {
            log::trace!("Ignoring stale frame {:?}", handle);
            return None;
        }
        self.pending = None;
        if state.phase != GamePhase::Playing {
            self.last_time = None;
            return None;
        }

        let dt = self
            .last_time
            .map(|t| ((now - t) / 1000.0) as f32)
            .unwrap_or(0.0)
            .clamp(0.0, MAX_FRAME_DT);
        self.last_time = Some(now);

        let outcome = tick(state, dt, now, rng);
        self.sync(state);
        Some(outcome)
    }
}

/// Scheduler driven by hand, for tests and the headless demo
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next: u32,
    outstanding: Vec<u32>,
    cancelled: u32,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles requested and not yet fired or cancelled
    pub fn outstanding(&self) -> &[u32] {
        &self.outstanding
    }

    pub fn cancelled(&self) -> u32 {
        self.cancelled
    }

    /// Take the oldest outstanding frame
    pub fn fire(&mut self) -> Option<u32> {
        if self.outstanding.is_empty() {
            None
        } else {
            Some(self.outstanding.remove(0))
        }
    }
}

impl FrameScheduler for ManualScheduler {
    type Handle = u32;

    fn request_frame(&mut self) -> u32 {
        self.next += 1;
        self.outstanding.push(self.next);
        self.next
    }

    fn cancel_frame(&mut self, handle: u32) {
        self.outstanding.retain(|h| *h != handle);
        self.cancelled += 1;
    }
}

impl LoopDriver<ManualScheduler> {
    /// Fire the outstanding frame at `now`, if there is one
    pub fn run_frame(
        &mut self,
        state: &mut GameState,
        now: f64,
        rng: &mut impl RandomSource,
    ) -> Option<TickOutcome> {
        let handle = self.scheduler.fire()?;
        self.on_frame(handle, state, now, rng)
    }
}
