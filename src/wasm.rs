//! JavaScript bindings for embedding the simulation in a web page
//!
//! The page owns input capture and drawing: it latches intents between
//! frames, calls `tick` once per animation frame with `performance.now()`,
//! and renders the JSON snapshot.

use wasm_bindgen::prelude::*;

use crate::settings::Settings;
use crate::sim::{GameState, TickInput, tick};
use crate::snapshot::Snapshot;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Logger already installed by a previous instance
        return;
    }
    log::info!("Brick Breaker core loaded");
}

/// One embedded game session
#[wasm_bindgen]
pub struct BrickBreaker {
    state: GameState,
    settings: Settings,
    input: TickInput,
}

#[wasm_bindgen]
impl BrickBreaker {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            state: GameState::new(),
            settings: Settings::default(),
            input: TickInput::default(),
        }
    }

    /// Replace presentation settings from JSON; malformed input keeps the current ones
    pub fn set_settings(&mut self, json: &str) -> bool {
        match Settings::from_json(json) {
            Ok(settings) => {
                self.settings = settings;
                true
            }
            Err(e) => {
                log::warn!("Ignoring settings: {}", e);
                false
            }
        }
    }

    /// Held movement keys
    pub fn set_held(&mut self, left: bool, right: bool, boost: bool) {
        self.input.move_left = left;
        self.input.move_right = right;
        self.input.boost = boost;
    }

    pub fn press_launch(&mut self) {
        self.input.launch = true;
    }

    pub fn press_pause(&mut self) {
        self.input.toggle_pause = true;
    }

    pub fn press_restart(&mut self) {
        self.input.restart = true;
    }

    /// Advance one frame; one-shot presses are consumed
    pub fn tick(&mut self, now_ms: f64) {
        tick(&mut self.state, &self.input, now_ms);
        self.input.launch = false;
        self.input.toggle_pause = false;
        self.input.restart = false;
    }

    /// Snapshot for the renderer as JSON
    pub fn snapshot(&self, now_ms: f64) -> Result<String, JsError> {
        let snapshot = Snapshot::capture(&self.state, &self.settings, now_ms);
        Ok(snapshot.to_json()?)
    }

    /// Events raised by the latest tick as JSON
    pub fn events(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&self.state.events)?)
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }
}

impl Default for BrickBreaker {
    fn default() -> Self {
        Self::new()
    }
}
