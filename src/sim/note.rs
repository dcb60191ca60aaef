//! Note types and falling-note entities
//!
//! A [`NoteType`] holds the immutable data shared by every note of that
//! kind: spawn weight, score value, life delta and the sound to request on
//! catch. Catch behavior is a pure effect descriptor applied by one generic
//! routine in the game state, so the simulation never branches per note
//! letter.

use glam::Vec2;
use thiserror::Error;

use super::collision::Rect;
use crate::consts::{NOTE_HEIGHT, NOTE_WIDTH};

/// Named sound effects the simulation can request from the audio sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundKey {
    /// Looping track started when the game begins
    BackgroundMusic,
    /// Rare high-value catch
    GoodCatchPrimary,
    /// Ordinary scoring catch
    GoodCatchSecondary,
    /// Damage catch
    BadCatch,
    /// Game over
    Terminal,
}

/// Immutable per-kind note data (registry-lifetime)
#[derive(Debug, Clone, Copy)]
pub struct NoteType {
    /// Identifier, unique within the registry
    pub name: &'static str,
    /// Relative spawn probability; weights need not sum to 1
    pub weight: f32,
    /// Points awarded on catch
    pub score_value: u64,
    /// Life variation on catch (halves and quarters allowed)
    pub life_delta: f32,
    /// Effect requested from the audio sink on catch
    pub sound: SoundKey,
}

/// Registry construction failures (fatal at initialization)
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("note registry is empty")]
    Empty,
    #[error("note registry total weight is not positive")]
    NonPositiveWeight,
}

/// Ordered catalog of note kinds, fixed at startup
#[derive(Debug, Clone)]
pub struct NoteRegistry {
    types: Vec<NoteType>,
    total_weight: f32,
}

impl NoteRegistry {
    /// Build a registry, validating the weighted-selection invariants
    pub fn new(types: Vec<NoteType>) -> Result<Self, RegistryError> {
        if types.is_empty() {
            return Err(RegistryError::Empty);
        }
        let total_weight: f32 = types.iter().map(|t| t.weight).sum();
        if !(total_weight > 0.0) {
            return Err(RegistryError::NonPositiveWeight);
        }
        Ok(Self {
            types,
            total_weight,
        })
    }

    /// The standard seven-note catalog
    pub fn standard() -> Result<Self, RegistryError> {
        Self::new(vec![
            NoteType {
                name: "A",
                weight: 0.05,
                score_value: 100,
                life_delta: 0.25,
                sound: SoundKey::GoodCatchPrimary,
            },
            NoteType {
                name: "B",
                weight: 0.10,
                score_value: 50,
                life_delta: 0.0,
                sound: SoundKey::GoodCatchSecondary,
            },
            NoteType {
                name: "C",
                weight: 0.15,
                score_value: 30,
                life_delta: 0.0,
                sound: SoundKey::GoodCatchSecondary,
            },
            NoteType {
                name: "D",
                weight: 0.15,
                score_value: 20,
                life_delta: 0.0,
                sound: SoundKey::GoodCatchSecondary,
            },
            NoteType {
                name: "E",
                weight: 0.15,
                score_value: 10,
                life_delta: 0.0,
                sound: SoundKey::GoodCatchSecondary,
            },
            NoteType {
                name: "Fx",
                weight: 0.25,
                score_value: 0,
                life_delta: -0.5,
                sound: SoundKey::BadCatch,
            },
            NoteType {
                name: "F",
                weight: 0.15,
                score_value: 0,
                life_delta: -1.0,
                sound: SoundKey::BadCatch,
            },
        ])
    }

    #[inline]
    pub fn get(&self, idx: usize) -> &NoteType {
        &self.types[idx]
    }

    #[inline]
    pub fn types(&self) -> &[NoteType] {
        &self.types
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Sum of all spawn weights (> 0 by construction)
    #[inline]
    pub fn total_weight(&self) -> f32 {
        self.total_weight
    }
}

/// One falling note instance
///
/// Created by the spawner just above the visible area, moved only by its
/// own vertical update, removed on exit-or-catch.
#[derive(Debug, Clone)]
pub struct Note {
    /// Index into the registry this note was spawned from
    pub type_idx: usize,
    /// Top-left corner position
    pub pos: Vec2,
    /// Vertical speed, fixed at creation from the difficulty level
    pub fall_speed: f32,
}

impl Note {
    /// Advance the note by its fall speed
    #[inline]
    pub fn fall(&mut self) {
        self.pos.y += self.fall_speed;
    }

    /// Collision/render box (all notes share the same dimensions)
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, NOTE_WIDTH, NOTE_HEIGHT)
    }

    /// True once the note's top edge has passed below the canvas
    #[inline]
    pub fn is_off_screen(&self, canvas_height: f32) -> bool {
        self.pos.y > canvas_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_is_valid() {
        let reg = NoteRegistry::standard().unwrap();
        assert_eq!(reg.len(), 7);
        assert!((reg.total_weight() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn empty_registry_is_rejected() {
        assert!(matches!(
            NoteRegistry::new(Vec::new()),
            Err(RegistryError::Empty)
        ));
    }

    #[test]
    fn non_positive_weight_is_rejected() {
        let types = vec![NoteType {
            name: "Z",
            weight: 0.0,
            score_value: 1,
            life_delta: 0.0,
            sound: SoundKey::GoodCatchSecondary,
        }];
        assert!(matches!(
            NoteRegistry::new(types),
            Err(RegistryError::NonPositiveWeight)
        ));
    }

    #[test]
    fn note_falls_and_leaves_screen() {
        let mut note = Note {
            type_idx: 0,
            pos: Vec2::new(10.0, 795.0),
            fall_speed: 6.0,
        };
        assert!(!note.is_off_screen(800.0));
        note.fall();
        assert!(note.is_off_screen(800.0));
    }
}
