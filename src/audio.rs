//! Sound effects
//!
//! The simulation only records `GameEvent`s; this module decides which of
//! them make a sound. In the browser the sounds are synthesized with the Web
//! Audio API, so no sample files ship with the game.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Shot that hit nothing
    Gunshot,
    /// Shot that dropped a duck
    DuckHit,
    HealthUp,
    /// Rapid fire granted
    PowerUp,
    DuckEscape,
    /// Shot duck hits the ground
    DuckFall,
    /// Escaped hazard duck cost a life
    Damage,
    LevelUp,
    GameOver,
    Victory,
    /// UI click (pause/resume)
    Click,
    /// Payment went through
    Payment,
}

impl SoundEffect {
    /// Sound for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::ShotMissed => Some(Self::Gunshot),
            GameEvent::DuckHit { .. } => Some(Self::DuckHit),
            GameEvent::HealthRestored { .. } => Some(Self::HealthUp),
            GameEvent::RapidFireGranted { .. } => Some(Self::PowerUp),
            GameEvent::DuckEscaped { .. } => Some(Self::DuckEscape),
            GameEvent::DuckDown => Some(Self::DuckFall),
            GameEvent::HazardDamage { .. } => Some(Self::Damage),
            GameEvent::LevelUp { .. } => Some(Self::LevelUp),
            GameEvent::GameOver { .. } => Some(Self::GameOver),
            GameEvent::Victory => Some(Self::Victory),
            GameEvent::Paused | GameEvent::Resumed => Some(Self::Click),
            GameEvent::PaymentAccepted(_) => Some(Self::Payment),
            GameEvent::WaveStarted { .. }
            | GameEvent::WaveEnded { .. }
            | GameEvent::WaveFailed
            | GameEvent::PaymentRequested(_)
            | GameEvent::PaymentFailed(_) => None,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, AudioContextState, GainNode, OscillatorNode, OscillatorType};

    use super::SoundEffect;
    use crate::settings::Settings;

    /// Procedural sound player
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            // Fails outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: settings.effective_volume(),
            }
        }

        /// Pick up volume or mute changes
        pub fn apply_settings(&mut self, settings: &Settings) {
            self.volume = settings.effective_volume();
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        pub fn play(&self, effect: SoundEffect) {
            let vol = self.volume;
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };
            if ctx.state() == AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Gunshot => self.play_gunshot(ctx, vol),
                SoundEffect::DuckHit => {
                    self.play_gunshot(ctx, vol);
                    self.play_quack(ctx, vol);
                }
                SoundEffect::HealthUp => self.play_arpeggio(ctx, vol, &[523.0, 659.0, 784.0], 0.08),
                SoundEffect::PowerUp => self.play_power_up(ctx, vol),
                SoundEffect::DuckEscape => self.play_flap_away(ctx, vol),
                SoundEffect::DuckFall => self.play_fall(ctx, vol),
                SoundEffect::Damage => self.play_damage(ctx, vol),
                SoundEffect::LevelUp => self.play_arpeggio(ctx, vol, &[400.0, 500.0, 600.0, 800.0], 0.1),
                SoundEffect::GameOver => self.play_game_over(ctx, vol),
                SoundEffect::Victory => {
                    self.play_arpeggio(ctx, vol, &[523.0, 659.0, 784.0, 1047.0, 1319.0], 0.12)
                }
                SoundEffect::Click => self.play_click(ctx, vol),
                SoundEffect::Payment => self.play_arpeggio(ctx, vol, &[880.0, 1320.0], 0.06),
            }
        }

        /// Oscillator routed through its own gain node
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;
            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;
            Some((osc, gain))
        }

        /// One enveloped tone, optionally sweeping to `end_freq`
        fn tone(
            &self,
            ctx: &AudioContext,
            osc_type: OscillatorType,
            (start_freq, end_freq): (f32, f32),
            level: f32,
            start: f64,
            length: f64,
        ) {
            let Some((osc, gain)) = self.create_osc(ctx, start_freq, osc_type) else {
                return;
            };
            gain.gain().set_value_at_time(level, start).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, start + length)
                .ok();
            if end_freq != start_freq {
                osc.frequency().set_value_at_time(start_freq, start).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(end_freq, start + length)
                    .ok();
            }
            osc.start_with_when(start).ok();
            osc.stop_with_when(start + length + 0.05).ok();
        }

        /// Sharp crack over a low thump
        fn play_gunshot(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();
            if let Some((osc, gain)) = self.create_osc(ctx, 2000.0, OscillatorType::Square) {
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.06)
                    .ok();
                osc.frequency().set_value_at_time(2000.0, t).ok();
                osc.frequency().set_value_at_time(300.0, t + 0.01).ok();
                osc.frequency().set_value_at_time(1500.0, t + 0.02).ok();
                osc.frequency().set_value_at_time(120.0, t + 0.04).ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.08).ok();
            }
            self.tone(ctx, OscillatorType::Sine, (120.0, 40.0), vol * 0.5, t, 0.15);
        }

        /// Two-note squawk
        fn play_quack(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time() + 0.05;
            self.tone(ctx, OscillatorType::Sawtooth, (700.0, 450.0), vol * 0.2, t, 0.09);
            self.tone(ctx, OscillatorType::Sawtooth, (650.0, 380.0), vol * 0.2, t + 0.11, 0.1);
        }

        fn play_power_up(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();
            self.tone(ctx, OscillatorType::Triangle, (300.0, 1200.0), vol * 0.3, t, 0.25);
            self.tone(ctx, OscillatorType::Sine, (600.0, 2400.0), vol * 0.15, t + 0.05, 0.25);
        }

        /// Rapid wing beats fading upward
        fn play_flap_away(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();
            for i in 0..4 {
                let start = t + i as f64 * 0.07;
                let level = vol * 0.2 * (1.0 - i as f32 * 0.2);
                self.tone(ctx, OscillatorType::Triangle, (200.0, 320.0), level, start, 0.05);
            }
        }

        /// Whistle down, then a thud
        fn play_fall(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();
            self.tone(ctx, OscillatorType::Sine, (1200.0, 200.0), vol * 0.2, t, 0.35);
            self.tone(ctx, OscillatorType::Sine, (90.0, 40.0), vol * 0.5, t + 0.35, 0.12);
        }

        fn play_damage(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();
            self.tone(ctx, OscillatorType::Sawtooth, (220.0, 55.0), vol * 0.4, t, 0.4);
            self.tone(ctx, OscillatorType::Square, (110.0, 50.0), vol * 0.2, t, 0.3);
        }

        fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();
            for (i, freq) in [400.0, 350.0, 300.0, 200.0].iter().enumerate() {
                let start = t + i as f64 * 0.2;
                self.tone(ctx, OscillatorType::Sine, (*freq, *freq), vol * 0.3, start, 0.3);
            }
        }

        fn play_click(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();
            self.tone(ctx, OscillatorType::Sine, (900.0, 900.0), vol * 0.15, t, 0.04);
        }

        /// Rising notes, `step` seconds apart
        fn play_arpeggio(&self, ctx: &AudioContext, vol: f32, freqs: &[f32], step: f64) {
            let t = ctx.current_time();
            for (i, freq) in freqs.iter().enumerate() {
                let start = t + i as f64 * step;
                self.tone(ctx, OscillatorType::Triangle, (*freq, *freq), vol * 0.25, start, 0.25);
            }
        }
    }
}
