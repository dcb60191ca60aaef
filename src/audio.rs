//! Audio sink backed by the Web Audio API
//!
//! Procedurally generated sound effects - no external files needed.
//! Playback denial (autoplay policy, missing user gesture, no secure
//! context) is swallowed: the simulation must never observe an audio
//! failure.

use crate::sim::SoundKey;

#[cfg(target_arch = "wasm32")]
use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

/// Audio manager for the game
pub struct AudioManager {
    #[cfg(target_arch = "wasm32")]
    ctx: Option<AudioContext>,
    master_volume: f32,
    muted: bool,
    /// Background music starts once and loops; one-shots always restart
    music_started: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    #[cfg(target_arch = "wasm32")]
    pub fn new() -> Self {
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            master_volume: 0.8,
            muted: false,
            music_started: false,
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn new() -> Self {
        Self {
            master_volume: 0.8,
            muted: false,
            music_started: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }

    /// Play a named effect. Never fails observably.
    #[cfg(target_arch = "wasm32")]
    pub fn play(&mut self, key: SoundKey) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require a user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match key {
            SoundKey::BackgroundMusic => {
                if !self.music_started {
                    self.music_started = true;
                    self.play_background_music(ctx, vol);
                }
            }
            SoundKey::GoodCatchPrimary => self.play_good_primary(ctx, vol),
            SoundKey::GoodCatchSecondary => self.play_good_secondary(ctx, vol),
            SoundKey::BadCatch => self.play_bad_catch(ctx, vol),
            SoundKey::Terminal => self.play_terminal(ctx, vol),
        }
    }

    /// Native stub: requests are accepted and dropped
    #[cfg(not(target_arch = "wasm32"))]
    pub fn play(&mut self, key: SoundKey) {
        if self.effective_volume() <= 0.0 {
            return;
        }
        if key == SoundKey::BackgroundMusic {
            if self.music_started {
                return;
            }
            self.music_started = true;
        }
        log::debug!("audio: {:?}", key);
    }

    // === Sound generators (wasm only) ===

    /// Create an oscillator with gain envelope
    #[cfg(target_arch = "wasm32")]
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

    /// Background track - slow looping two-voice drone with a gentle pulse
    #[cfg(target_arch = "wasm32")]
    fn play_background_music(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        for (freq, level) in [(110.0, 0.10), (220.0, 0.06)] {
            if let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Triangle) {
                gain.gain().set_value_at_time(0.0, t).ok();
                gain.gain()
                    .linear_ramp_to_value_at_time(vol * level, t + 2.0)
                    .ok();
                osc.start().ok();
                // No stop: the drone loops for the whole session
            }
        }
    }

    /// Rare high-value catch - bright ascending chime
    #[cfg(target_arch = "wasm32")]
    fn play_good_primary(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [800.0, 1000.0, 1200.0].iter().enumerate() {
            let delay = i as f64 * 0.06;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.25).ok();
            }
        }
    }

    /// Ordinary catch - short ping
    #[cfg(target_arch = "wasm32")]
    fn play_good_secondary(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 600.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.1)
            .ok();
        osc.frequency().set_value_at_time(600.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(900.0, t + 0.08)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.12).ok();
    }

    /// Damage catch - low buzz dropping away
    #[cfg(target_arch = "wasm32")]
    fn play_bad_catch(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 180.0, OscillatorType::Sawtooth) {
            gain.gain().set_value_at_time(vol * 0.4, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                .ok();
            osc.frequency().set_value_at_time(180.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(60.0, t + 0.25)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.3).ok();
        }

        // Sub thump
        if let Some((osc, gain)) = self.create_osc(ctx, 55.0, OscillatorType::Sine) {
            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.15).ok();
        }
    }

    /// Game over - sad descending line
    #[cfg(target_arch = "wasm32")]
    fn play_terminal(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [400.0, 350.0, 300.0, 200.0].iter().enumerate() {
            let delay = i as f64 * 0.2;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.4).ok();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn muted_manager_swallows_requests() {
        let mut audio = AudioManager::new();
        audio.set_muted(true);
        // Must not panic or propagate anything
        audio.play(SoundKey::BadCatch);
        audio.play(SoundKey::BackgroundMusic);
    }

    #[test]
    fn volume_is_clamped() {
        let mut audio = AudioManager::new();
        audio.set_master_volume(2.0);
        assert_eq!(audio.effective_volume(), 1.0);
        audio.set_master_volume(-1.0);
        assert_eq!(audio.effective_volume(), 0.0);
    }
}
