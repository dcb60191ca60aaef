//! Note Drop - a falling-note catch arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, collisions, game state)
//! - `audio`: Procedural sound effects for named gameplay events
//! - `highscores`: Session score handoff and leaderboard persistence
//! - `settings`: Player preferences

pub mod audio;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Logical canvas dimensions (the coordinate space the simulation runs in)
    pub const CANVAS_WIDTH: f32 = 1200.0;
    pub const CANVAS_HEIGHT: f32 = 800.0;

    /// Falling note render/collision box (shared by every note)
    pub const NOTE_WIDTH: f32 = 80.0;
    pub const NOTE_HEIGHT: f32 = 80.0;

    /// Player paddle box, anchored to the bottom edge of the canvas
    pub const PLAYER_WIDTH: f32 = 150.0;
    pub const PLAYER_HEIGHT: f32 = 250.0;

    /// Horizontal paddle step per frame before the difficulty bonus
    pub const PLAYER_BASE_STEP: f32 = 10.0;

    /// Fall speed floor before difficulty scaling
    pub const BASE_FALL_SPEED: f32 = 2.0;

    /// Per-frame spawn probability at difficulty 0 plus per-level gain.
    /// The sum is deliberately uncapped; past 1.0 it means "every frame".
    pub const BASE_SPAWN_PROBABILITY: f32 = 0.03;
    pub const SPAWN_PROBABILITY_PER_LEVEL: f32 = 1.0 / 300.0;

    /// Starting life total (fractional lives are allowed)
    pub const STARTING_LIVES: f32 = 3.0;

    /// Wall-clock period between difficulty increments
    pub const DIFFICULTY_PERIOD_SECS: f64 = 5.0;

    /// Delay between entering the terminal phase and requesting the
    /// results view
    pub const RESULTS_DELAY_SECS: f64 = 2.0;
}
