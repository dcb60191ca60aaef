//! Weighted note spawning
//!
//! Alias-free weighted sampling over the registry plus difficulty-scaled
//! fall-speed assignment. In the limit of N draws the empirical frequency of
//! type `t` converges to `weight(t) / total_weight`.

use glam::Vec2;
use rand::Rng;

use super::note::{Note, NoteRegistry};
use crate::consts::{
    BASE_FALL_SPEED, BASE_SPAWN_PROBABILITY, CANVAS_WIDTH, NOTE_HEIGHT, NOTE_WIDTH,
    SPAWN_PROBABILITY_PER_LEVEL,
};

/// Map a draw in `[0, total_weight)` to a registry index by cumulative walk.
///
/// Floating-point accumulation drift must never leave the draw unmatched,
/// so the last entry is the guaranteed fallback.
fn index_for_draw(registry: &NoteRegistry, draw: f32) -> usize {
    let mut sum = 0.0;
    for (idx, ty) in registry.types().iter().enumerate() {
        sum += ty.weight;
        if draw < sum {
            return idx;
        }
    }
    registry.len() - 1
}

/// Weighted random selection of a note type index
pub fn select_index<R: Rng>(registry: &NoteRegistry, rng: &mut R) -> usize {
    let draw = rng.random::<f32>() * registry.total_weight();
    index_for_draw(registry, draw)
}

/// Spawn one note just above the visible area at a random horizontal
/// position. Fall speed scales with a deterministic difficulty term plus a
/// random jitter bounded by difficulty, so higher levels widen the speed
/// variance as well as raising the floor.
pub fn spawn_note<R: Rng>(registry: &NoteRegistry, rng: &mut R, difficulty_level: u32) -> Note {
    let type_idx = select_index(registry, rng);
    let level = difficulty_level as f32;

    let x = rng.random_range(0.0..CANVAS_WIDTH - NOTE_WIDTH);
    let fall_speed = BASE_FALL_SPEED + level / 10.0 + rng.random::<f32>() * level;

    Note {
        type_idx,
        pos: Vec2::new(x, -NOTE_HEIGHT),
        fall_speed,
    }
}

/// Per-frame Bernoulli spawn admission probability.
///
/// Uncapped: at high difficulty this exceeds 1 and spawns every frame
/// (still at most one note per frame by construction).
#[inline]
pub fn spawn_probability(difficulty_level: u32) -> f32 {
    BASE_SPAWN_PROBABILITY + difficulty_level as f32 * SPAWN_PROBABILITY_PER_LEVEL
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn weighted_selection_converges() {
        let registry = NoteRegistry::standard().unwrap();
        let mut rng = Pcg32::seed_from_u64(0x5eed);
        let draws = 200_000;

        let mut counts = vec![0u32; registry.len()];
        for _ in 0..draws {
            counts[select_index(&registry, &mut rng)] += 1;
        }

        for (idx, ty) in registry.types().iter().enumerate() {
            let expected = ty.weight / registry.total_weight();
            let observed = counts[idx] as f32 / draws as f32;
            assert!(
                (observed - expected).abs() < 0.01,
                "type {} observed {} expected {}",
                ty.name,
                observed,
                expected
            );
        }
    }

    #[test]
    fn drifted_draw_falls_back_to_last_entry() {
        let registry = NoteRegistry::standard().unwrap();
        let last = registry.len() - 1;
        // A draw at or past the total weight must still resolve.
        assert_eq!(index_for_draw(&registry, registry.total_weight()), last);
        assert_eq!(
            index_for_draw(&registry, registry.total_weight() + 1.0),
            last
        );
    }

    #[test]
    fn zero_draw_selects_first_entry() {
        let registry = NoteRegistry::standard().unwrap();
        assert_eq!(index_for_draw(&registry, 0.0), 0);
    }

    #[test]
    fn spawned_notes_start_above_canvas_within_bounds() {
        let registry = NoteRegistry::standard().unwrap();
        let mut rng = Pcg32::seed_from_u64(7);
        let level = 4;

        for _ in 0..1_000 {
            let note = spawn_note(&registry, &mut rng, level);
            assert_eq!(note.pos.y, -NOTE_HEIGHT);
            assert!(note.pos.x >= 0.0);
            assert!(note.pos.x < CANVAS_WIDTH - NOTE_WIDTH);
            assert!(note.fall_speed >= BASE_FALL_SPEED + level as f32 / 10.0);
            assert!(note.fall_speed <= BASE_FALL_SPEED + level as f32 / 10.0 + level as f32);
            assert!(note.type_idx < registry.len());
        }
    }

    proptest! {
        #[test]
        fn spawn_probability_strictly_increases(level in 0u32..10_000) {
            prop_assert!(spawn_probability(level + 1) > spawn_probability(level));
        }
    }
}
