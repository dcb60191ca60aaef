//! Note Drop entry point
//!
//! The wasm build wires keyboard input, the frame loop and the HUD around
//! the simulation and drains its events into the audio, persistence and
//! navigation collaborators. The native build runs a headless autopilot
//! session for quick smoke testing.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;

    use note_drop::audio::AudioManager;
    use note_drop::highscores::{self, HighScores};
    use note_drop::settings::Settings;
    use note_drop::sim::{GameEvent, GamePhase, GameState, NoteRegistry, TickInput, tick};

    /// How long the damage-feedback class stays on the lives readout
    const DAMAGE_FEEDBACK_SECS: f64 = 0.5;

    /// Everything the driver owns
    struct Game {
        state: GameState,
        input: TickInput,
        audio: AudioManager,
        highscores: HighScores,
        settings: Settings,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let registry = NoteRegistry::standard().expect("standard registry is valid");
            let settings = Settings::load();

            let mut audio = AudioManager::new();
            audio.set_master_volume(settings.master_volume);
            audio.set_muted(settings.muted);

            Self {
                state: GameState::new(registry, seed),
                input: TickInput::default(),
                audio,
                highscores: HighScores::load(),
                settings,
            }
        }

        /// Run one frame and route the queued side effects
        fn frame(&mut self, now: f64) {
            tick(&mut self.state, &self.input, now);
            // One-shot intents are consumed by the frame they arrive in
            self.input.view_results = false;

            for event in self.state.take_events() {
                match event {
                    GameEvent::Sound(key) => self.audio.play(key),
                    GameEvent::ScoreCommitted(score) => {
                        highscores::set_session_score(score);
                        self.highscores.add_score(
                            score,
                            self.state.difficulty_level,
                            js_sys::Date::now(),
                        );
                        self.highscores.save();
                    }
                    GameEvent::NavigateToResults => {
                        if let Some(window) = web_sys::window() {
                            let _ = window.location().set_href("highscores.html");
                        }
                    }
                }
            }
        }

        /// Push the current state into the DOM HUD
        fn update_hud(&self, now: f64) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let snapshot = self.state.render_snapshot();

            if let Some(el) = document.get_element_by_id("hud-score") {
                el.set_text_content(Some(&snapshot.score.to_string()));
            }
            if let Some(el) = document.get_element_by_id("hud-lives") {
                el.set_text_content(Some(&format!("{}", snapshot.lives)));

                // Damage feedback is pure presentation, recomputed each
                // frame from the timestamp the simulation recorded
                let flashing = !self.settings.reduced_motion
                    && snapshot
                        .last_damage_at
                        .is_some_and(|t| now - t <= DAMAGE_FEEDBACK_SECS);
                let _ = el.set_attribute(
                    "class",
                    if flashing { "hud-value damage" } else { "hud-value" },
                );
            }
            if let Some(el) = document.get_element_by_id("hud-level") {
                el.set_text_content(Some(&snapshot.difficulty_level.to_string()));
            }

            if let Some(el) = document.get_element_by_id("start-prompt") {
                let _ = el.set_attribute(
                    "class",
                    if snapshot.phase == GamePhase::NotStarted {
                        ""
                    } else {
                        "hidden"
                    },
                );
            }
            if let Some(el) = document.get_element_by_id("game-over") {
                let _ = el.set_attribute(
                    "class",
                    if snapshot.phase == GamePhase::Over {
                        ""
                    } else {
                        "hidden"
                    },
                );
            }
        }
    }

    /// Session auto-start signal: `?retry=true`, consumed once at init
    fn should_auto_start() -> bool {
        let Some(window) = web_sys::window() else {
            return false;
        };
        let Ok(search) = window.location().search() else {
            return false;
        };
        web_sys::UrlSearchParams::new_with_str(&search)
            .ok()
            .and_then(|params| params.get("retry"))
            .is_some_and(|v| v == "true")
    }

    fn now_secs() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now() / 1000.0)
            .unwrap_or(0.0)
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("failed to init logger");

        log::info!("Note Drop starting...");

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("game initialized with seed {}", seed);

        if should_auto_start() {
            let mut g = game.borrow_mut();
            let now = now_secs();
            g.state.start(now);
            g.frame(now);
            log::info!("auto-started from retry flow");
        }

        setup_input_handlers(game.clone());
        request_animation_frame(game);

        log::info!("Note Drop running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");

        // Key down: held intents plus the prompt's start/results triggers
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "ArrowLeft" => g.input.left = true,
                    "ArrowRight" => g.input.right = true,
                    "Space" => g.input.view_results = true,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up: release held intents
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "ArrowLeft" => g.input.left = false,
                    "ArrowRight" => g.input.right = false,
                    _ => {}
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            let now = now_secs();
            g.frame(now);
            g.update_hud(now);
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use note_drop::audio::AudioManager;
    use note_drop::consts::{CANVAS_HEIGHT, PLAYER_WIDTH};
    use note_drop::highscores::{self, HighScores};
    use note_drop::sim::{GameEvent, GamePhase, GameState, NoteRegistry, TickInput, tick};

    env_logger::init();
    log::info!("Note Drop (native) starting headless session...");

    let registry = match NoteRegistry::standard() {
        Ok(reg) => reg,
        Err(err) => {
            log::error!("cannot start: {err}");
            std::process::exit(1);
        }
    };

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let mut state = GameState::new(registry, seed);
    let mut audio = AudioManager::new();
    let mut highscores = HighScores::load();

    // Kick the state machine out of the prompt, then let a simple
    // autopilot chase the lowest safe note.
    let mut input = TickInput {
        right: true,
        ..Default::default()
    };

    for frame in 0..100_000u64 {
        let now = frame as f64 / 60.0;
        tick(&mut state, &input, now);

        let target = state
            .notes
            .iter()
            .filter(|n| state.registry().get(n.type_idx).life_delta >= 0.0)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|n| n.pos.x);
        match target {
            Some(x) => {
                let center = state.paddle.x + PLAYER_WIDTH / 2.0;
                input.left = x < center;
                input.right = x > center;
            }
            None => {
                input.left = false;
                input.right = false;
            }
        }

        for event in state.take_events() {
            match event {
                GameEvent::Sound(key) => audio.play(key),
                GameEvent::ScoreCommitted(score) => {
                    highscores::set_session_score(score);
                    highscores.add_score(score, state.difficulty_level, now * 1000.0);
                    highscores.save();
                }
                GameEvent::NavigateToResults => {
                    log::info!("results view requested");
                }
            }
        }

        if state.phase == GamePhase::Over && state.notes.is_empty() {
            break;
        }
    }

    log::info!(
        "session over: score {}, difficulty {}, canvas height {}",
        state.score,
        state.difficulty_level,
        CANVAS_HEIGHT
    );
    println!(
        "final score: {} (difficulty level {})",
        state.score, state.difficulty_level
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
