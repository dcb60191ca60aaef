//! Per-frame simulation update
//!
//! One logical frame callback drives the whole simulation; no frame runs
//! concurrently with another. Input arrives as held-intent flags that are
//! only read here, never combined.

use super::state::{GamePhase, GameState};
use crate::consts::CANVAS_HEIGHT;

/// Input intent for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Move-left key currently held
    pub left: bool,
    /// Move-right key currently held
    pub right: bool,
    /// Jump straight to the results view (only honored on the prompt)
    pub view_results: bool,
}

/// Advance the game by one frame.
///
/// `now` is wall-clock seconds, used for the difficulty ramp and the
/// delayed terminal navigation; everything else is frame-based.
pub fn tick(state: &mut GameState, input: &TickInput, now: f64) {
    match state.phase {
        GamePhase::NotStarted => {
            if input.view_results {
                state.request_results();
                return;
            }
            // First directional input starts the game; gameplay begins
            // on the next frame.
            if input.left || input.right {
                state.start(now);
            }
        }

        GamePhase::Running => {
            state.update_difficulty(now);
            state.maybe_spawn();
            advance_notes(state, now, true);

            // Right wins when both keys are held
            if input.right {
                state.paddle.move_right(state.difficulty_level);
            } else if input.left {
                state.paddle.move_left(state.difficulty_level);
            }
        }

        GamePhase::Over => {
            // Notes keep draining for visual continuity; no spawns, no
            // catches, paddle frozen.
            advance_notes(state, now, false);
            state.maybe_request_results(now);
        }
    }
}

/// Move every live note, drop the ones past the bottom edge and, while
/// collisions are live, resolve paddle catches in spawn order.
fn advance_notes(state: &mut GameState, now: f64, resolve_catches: bool) {
    let paddle = state.paddle.rect();
    let mut caught = Vec::new();

    let mut i = 0;
    while i < state.notes.len() {
        state.notes[i].fall();

        if state.notes[i].is_off_screen(CANVAS_HEIGHT) {
            state.notes.remove(i);
            continue;
        }

        if resolve_catches && state.notes[i].rect().overlaps(&paddle) {
            caught.push(state.notes[i].type_idx);
            state.notes.remove(i);
            continue;
        }

        i += 1;
    }

    for type_idx in caught {
        state.apply_catch(type_idx, now);
    }
}
