//! Game state and core simulation types
//!
//! One explicitly-owned state struct holds everything mutable at runtime.
//! Side effects aimed at external collaborators (audio, score persistence,
//! navigation) are queued as [`GameEvent`]s and drained by the driver, so
//! the simulation itself stays platform-free and testable.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::Rect;
use super::note::{Note, NoteRegistry, SoundKey};
use super::spawner::{spawn_note, spawn_probability};
use crate::consts::*;

/// Current phase of gameplay (one-way: NotStarted -> Running -> Over)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Waiting for the first directional input; renders a prompt
    NotStarted,
    /// Active gameplay
    Running,
    /// Lives depleted; notes drain visually, nothing else advances
    Over,
}

/// Side effects requested from external collaborators, drained each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Forward a named effect to the audio sink
    Sound(SoundKey),
    /// Hand the final score to the persistence sink (once per session)
    ScoreCommitted(u64),
    /// Move the player to the results view
    NavigateToResults,
}

/// The player's paddle, anchored to the bottom edge of the canvas
#[derive(Debug, Clone)]
pub struct Paddle {
    /// Left edge, clamped to [0, CANVAS_WIDTH - PLAYER_WIDTH]
    pub x: f32,
}

impl Default for Paddle {
    fn default() -> Self {
        Self {
            x: (CANVAS_WIDTH - PLAYER_WIDTH) / 2.0,
        }
    }
}

impl Paddle {
    /// Horizontal step per frame; grows slowly with difficulty
    #[inline]
    fn step(difficulty_level: u32) -> f32 {
        PLAYER_BASE_STEP + difficulty_level as f32 / 5.0
    }

    pub fn move_left(&mut self, difficulty_level: u32) {
        self.x = (self.x - Self::step(difficulty_level)).max(0.0);
    }

    pub fn move_right(&mut self, difficulty_level: u32) {
        self.x = (self.x + Self::step(difficulty_level)).min(CANVAS_WIDTH - PLAYER_WIDTH);
    }

    /// Collision box for catch tests
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.x,
            CANVAS_HEIGHT - PLAYER_HEIGHT,
            PLAYER_WIDTH,
            PLAYER_HEIGHT,
        )
    }
}

/// A note as the render sink sees it
#[derive(Debug, Clone)]
pub struct NoteSprite {
    /// Registry name, doubling as the sprite key
    pub name: &'static str,
    pub pos: Vec2,
}

/// Read-only per-frame view of everything the render sink needs
#[derive(Debug, Clone)]
pub struct RenderSnapshot {
    pub score: u64,
    pub lives: f32,
    pub difficulty_level: u32,
    pub phase: GamePhase,
    pub paddle_x: f32,
    pub notes: Vec<NoteSprite>,
    /// Timestamp of the last damaging catch, for damage-feedback animation
    pub last_damage_at: Option<f64>,
}

/// Complete game state (single instance, process-lifetime)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Total points, monotonically non-decreasing except on reset
    pub score: u64,
    /// Life total; fractional, clamped to >= 0 on terminal entry
    pub lives: f32,
    /// Difficulty knob, >= 1, advanced by the wall-clock ramp
    pub difficulty_level: u32,
    /// Current phase
    pub phase: GamePhase,
    /// Player paddle
    pub paddle: Paddle,
    /// Live notes in spawn order
    pub notes: Vec<Note>,
    /// Timestamp of the last damaging catch; presentation-only
    pub last_damage_at: Option<f64>,

    registry: NoteRegistry,
    rng: Pcg32,
    /// Wall-clock anchor of the difficulty ramp; set at most once
    ramp_started_at: Option<f64>,
    /// Wall-clock moment of terminal entry
    over_at: Option<f64>,
    /// One-shot latch for the terminal side effects
    terminal_handled: bool,
    /// One-shot latch for the results navigation request
    results_requested: bool,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a fresh game over the given registry, with a seeded RNG
    pub fn new(registry: NoteRegistry, seed: u64) -> Self {
        Self {
            score: 0,
            lives: STARTING_LIVES,
            difficulty_level: 1,
            phase: GamePhase::NotStarted,
            paddle: Paddle::default(),
            notes: Vec::new(),
            last_damage_at: None,
            registry,
            rng: Pcg32::seed_from_u64(seed),
            ramp_started_at: None,
            over_at: None,
            terminal_handled: false,
            results_requested: false,
            events: Vec::new(),
        }
    }

    #[inline]
    pub fn registry(&self) -> &NoteRegistry {
        &self.registry
    }

    /// Transition out of the prompt: begin play, anchor the difficulty
    /// ramp and request the background track. No-op outside `NotStarted`.
    pub fn start(&mut self, now: f64) {
        if self.phase != GamePhase::NotStarted {
            return;
        }
        self.phase = GamePhase::Running;
        self.start_difficulty_ramp(now);
        self.play_effect(SoundKey::BackgroundMusic);
        log::info!("game started");
    }

    /// Anchor the periodic difficulty increment (idempotent: the first
    /// call wins, later calls never re-anchor or double the rate)
    pub fn start_difficulty_ramp(&mut self, now: f64) {
        if self.ramp_started_at.is_none() {
            self.ramp_started_at = Some(now);
        }
    }

    /// Advance the difficulty level from wall-clock time: one increment
    /// per fixed period since the ramp was anchored, frame rate independent
    pub fn update_difficulty(&mut self, now: f64) {
        if let Some(t0) = self.ramp_started_at {
            let elapsed = (now - t0).max(0.0);
            let level = 1 + (elapsed / DIFFICULTY_PERIOD_SECS) as u32;
            if level > self.difficulty_level {
                self.difficulty_level = level;
            }
        }
    }

    /// Bernoulli spawn admission for this frame, then at most one spawn
    pub fn maybe_spawn(&mut self) {
        use rand::Rng;
        if self.rng.random::<f32>() < spawn_probability(self.difficulty_level) {
            let note = spawn_note(&self.registry, &mut self.rng, self.difficulty_level);
            self.notes.push(note);
        }
    }

    // --- Mutating operations exposed to catch effects ---

    /// `delta >= 0` expected but not enforced
    pub fn add_score(&mut self, delta: u64) {
        self.score += delta;
    }

    /// Life delta; may be negative, positive or fractional
    pub fn add_lives(&mut self, delta: f32) {
        self.lives += delta;
    }

    /// Record the damage-feedback timestamp. Consumed only by
    /// presentation; no simulation-state effect.
    pub fn notify_damage(&mut self, now: f64) {
        self.last_damage_at = Some(now);
    }

    /// Forward a named effect to the audio collaborator. Playback denial
    /// is the sink's problem; the simulation never observes it.
    pub fn play_effect(&mut self, key: SoundKey) {
        self.events.push(GameEvent::Sound(key));
    }

    /// If lives are depleted, clamp to 0 and enter the terminal phase.
    /// The terminal side effects (score handoff, game-over sound) fire
    /// exactly once; calling again when already Over is a no-op.
    pub fn check_terminal(&mut self, now: f64) {
        if self.lives > 0.0 {
            return;
        }
        self.lives = 0.0;
        self.phase = GamePhase::Over;
        if self.over_at.is_none() {
            self.over_at = Some(now);
        }
        if !self.terminal_handled {
            self.terminal_handled = true;
            self.play_effect(SoundKey::Terminal);
            self.events.push(GameEvent::ScoreCommitted(self.score));
            log::info!("game over, final score {}", self.score);
        }
    }

    /// Apply the catch effect for a note of the given registry type.
    /// One generic routine driven by the type's effect descriptor; the
    /// damage pipeline runs only on a strictly negative life delta.
    pub fn apply_catch(&mut self, type_idx: usize, now: f64) {
        let ty = *self.registry.get(type_idx);

        self.add_score(ty.score_value);
        self.add_lives(ty.life_delta);
        if ty.life_delta < 0.0 {
            self.notify_damage(now);
        }
        self.play_effect(ty.sound);
        if ty.life_delta < 0.0 {
            self.check_terminal(now);
        }
    }

    /// Request the results view (one-shot)
    pub fn request_results(&mut self) {
        if !self.results_requested {
            self.results_requested = true;
            self.events.push(GameEvent::NavigateToResults);
        }
    }

    /// Schedule check for the delayed terminal navigation
    pub fn maybe_request_results(&mut self, now: f64) {
        if let Some(t0) = self.over_at {
            if now - t0 >= RESULTS_DELAY_SECS {
                self.request_results();
            }
        }
    }

    /// Drain the side effects queued since the last drain
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Read-only snapshot for the render sink
    pub fn render_snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            score: self.score,
            lives: self.lives,
            difficulty_level: self.difficulty_level,
            phase: self.phase,
            paddle_x: self.paddle.x,
            notes: self
                .notes
                .iter()
                .map(|n| NoteSprite {
                    name: self.registry.get(n.type_idx).name,
                    pos: n.pos,
                })
                .collect(),
            last_damage_at: self.last_damage_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::note::NoteType;
    use proptest::prelude::*;

    fn state() -> GameState {
        GameState::new(NoteRegistry::standard().unwrap(), 42)
    }

    /// Registry index helpers for the standard catalog
    fn idx_of(state: &GameState, name: &str) -> usize {
        state
            .registry()
            .types()
            .iter()
            .position(|t| t.name == name)
            .unwrap()
    }

    #[test]
    fn lives_sequence_and_terminal_entry() {
        let mut st = state();
        let a = idx_of(&st, "A"); // +0.25
        let fx = idx_of(&st, "Fx"); // -0.5
        let f = idx_of(&st, "F"); // -1.0

        st.apply_catch(a, 0.0);
        assert_eq!(st.lives, 3.25);
        assert_eq!(st.phase, GamePhase::NotStarted);

        st.apply_catch(fx, 1.0);
        assert_eq!(st.lives, 2.75);
        assert_ne!(st.phase, GamePhase::Over);

        st.apply_catch(f, 2.0);
        assert_eq!(st.lives, 1.75);
        assert_ne!(st.phase, GamePhase::Over);

        st.apply_catch(f, 3.0);
        assert_eq!(st.lives, 0.75);
        assert_ne!(st.phase, GamePhase::Over, "must not end before lives <= 0");

        st.apply_catch(f, 4.0);
        assert_eq!(st.lives, 0.0, "lives clamp to zero on terminal entry");
        assert_eq!(st.phase, GamePhase::Over);
    }

    #[test]
    fn terminal_side_effects_fire_exactly_once() {
        let mut st = state();
        st.lives = 0.25;
        let f = idx_of(&st, "F");

        st.apply_catch(f, 1.0);
        assert_eq!(st.phase, GamePhase::Over);

        st.check_terminal(2.0);
        st.check_terminal(3.0);

        let events = st.take_events();
        let commits = events
            .iter()
            .filter(|e| matches!(e, GameEvent::ScoreCommitted(_)))
            .count();
        let terminal_sounds = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Sound(SoundKey::Terminal)))
            .count();
        assert_eq!(commits, 1);
        assert_eq!(terminal_sounds, 1);
    }

    #[test]
    fn damage_pipeline_only_on_negative_delta() {
        let mut st = state();
        let b = idx_of(&st, "B"); // life_delta == 0

        st.apply_catch(b, 5.0);
        assert_eq!(st.last_damage_at, None);
        let events = st.take_events();
        assert!(
            events
                .iter()
                .all(|e| !matches!(e, GameEvent::Sound(SoundKey::BadCatch)))
        );

        let fx = idx_of(&st, "Fx");
        st.apply_catch(fx, 6.0);
        assert_eq!(st.last_damage_at, Some(6.0));
        assert!(
            st.take_events()
                .contains(&GameEvent::Sound(SoundKey::BadCatch))
        );
    }

    #[test]
    fn difficulty_ramp_start_is_idempotent() {
        let mut st = state();
        st.start_difficulty_ramp(0.0);
        st.start_difficulty_ramp(0.0);
        st.start_difficulty_ramp(3.0); // late re-anchor attempt

        st.update_difficulty(4.9);
        assert_eq!(st.difficulty_level, 1);

        st.update_difficulty(5.0);
        assert_eq!(st.difficulty_level, 2, "one increment per period, not two");

        st.update_difficulty(25.0);
        assert_eq!(st.difficulty_level, 6);
    }

    #[test]
    fn difficulty_never_decreases() {
        let mut st = state();
        st.start_difficulty_ramp(0.0);
        st.update_difficulty(20.0);
        assert_eq!(st.difficulty_level, 5);
        st.update_difficulty(6.0); // stale timestamp must not regress
        assert_eq!(st.difficulty_level, 5);
    }

    #[test]
    fn results_navigation_fires_once_after_delay() {
        let mut st = state();
        st.lives = 0.0;
        st.check_terminal(10.0);
        st.take_events();

        st.maybe_request_results(11.0);
        assert!(st.take_events().is_empty());

        st.maybe_request_results(12.0);
        assert_eq!(st.take_events(), vec![GameEvent::NavigateToResults]);

        st.maybe_request_results(13.0);
        assert!(st.take_events().is_empty());
    }

    #[test]
    fn start_requests_background_music_and_anchors_ramp() {
        let mut st = state();
        st.start(2.0);
        assert_eq!(st.phase, GamePhase::Running);
        assert!(
            st.take_events()
                .contains(&GameEvent::Sound(SoundKey::BackgroundMusic))
        );

        st.update_difficulty(7.0);
        assert_eq!(st.difficulty_level, 2);

        // Starting again is a no-op
        st.start(3.0);
        assert!(st.take_events().is_empty());
    }

    #[test]
    fn paddle_clamps_to_canvas_bounds() {
        let mut paddle = Paddle::default();
        for _ in 0..1_000 {
            paddle.move_left(10);
        }
        assert_eq!(paddle.x, 0.0);
        for _ in 0..1_000 {
            paddle.move_right(10);
        }
        assert_eq!(paddle.x, CANVAS_WIDTH - PLAYER_WIDTH);
    }

    proptest! {
        /// Catches with non-negative score values never decrease the score
        #[test]
        fn score_is_monotone(catches in proptest::collection::vec(0usize..7, 0..200)) {
            let mut st = state();
            let mut last = st.score;
            for idx in catches {
                st.apply_catch(idx, 0.0);
                prop_assert!(st.score >= last);
                last = st.score;
            }
        }
    }
}
