//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies; side effects leave the
//!   simulation as queued [`GameEvent`]s drained by the driver

pub mod collision;
pub mod note;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::Rect;
pub use note::{Note, NoteRegistry, NoteType, RegistryError, SoundKey};
pub use spawner::{select_index, spawn_note, spawn_probability};
pub use state::{GameEvent, GamePhase, GameState, NoteSprite, Paddle, RenderSnapshot};
pub use tick::{TickInput, tick};
