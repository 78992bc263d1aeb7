use serde::{Deserialize, Serialize};
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

pub mod board;
pub mod engine;
pub mod input;
pub mod store;
pub mod view;

pub use board::{Board, Direction, LineMove, Position, slide_and_merge};
pub use engine::{Command, GameEngine, HistoryEntry};
pub use store::{BestScore, KeyValueStore, MemoryStore};
pub use view::{DispatchOutcome, GameStatus, Notification, NotificationKind, RenderModel};

use input::{ControlBindings, DEFAULT_SWIPE_MIN_DISTANCE, SwipeTracker};
use store::DEFAULT_BEST_SCORE_KEY;

#[wasm_bindgen(start)]
pub fn bootstrap() {
    console_error_panic_hook::set_once();
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn log(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}

// JS imports are unavailable off wasm, so native builds and tests stay quiet.
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn log(_msg: &str) {}

#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase", default)]
pub struct GameSettings {
    pub seed: Option<u64>,
    pub best_score_key: String,
    pub bindings: ControlBindings,
    pub swipe_min_distance: f64,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            seed: None,
            best_score_key: DEFAULT_BEST_SCORE_KEY.to_string(),
            bindings: ControlBindings::default(),
            swipe_min_distance: DEFAULT_SWIPE_MIN_DISTANCE,
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn best_score_store(key: &str) -> BestScore {
    BestScore::new(Box::new(store::LocalStorage), key)
}

#[cfg(not(target_arch = "wasm32"))]
fn best_score_store(key: &str) -> BestScore {
    BestScore::new(Box::new(MemoryStore::new()), key)
}

/// Input front end shared by the wasm client: decodes keys and swipes into
/// engine commands.
struct Controller {
    bindings: ControlBindings,
    swipe: SwipeTracker,
}

impl Controller {
    fn new(settings: &GameSettings) -> Self {
        Self {
            bindings: settings.bindings.clone(),
            swipe: SwipeTracker::new(settings.swipe_min_distance),
        }
    }

    fn key_command(&self, code: &str) -> Option<Command> {
        self.bindings.direction_for(code).map(Command::Move)
    }

    fn touch_start(&mut self, x: f64, y: f64) {
        self.swipe.touch_start(x, y);
    }

    fn touch_end(&mut self, x: f64, y: f64) -> Option<Command> {
        self.swipe.touch_end(x, y).map(Command::Move)
    }
}

fn build_engine(settings: &GameSettings) -> GameEngine {
    let best = best_score_store(&settings.best_score_key);
    match settings.seed {
        Some(seed) => GameEngine::with_seed(best, seed),
        None => GameEngine::new(best),
    }
}

#[wasm_bindgen]
pub struct GameClient {
    engine: GameEngine,
    controller: Controller,
}

impl GameClient {
    fn run(&mut self, command: Option<Command>) -> Result<JsValue, JsValue> {
        let outcome = match command {
            Some(command) => self.engine.dispatch(command),
            None => DispatchOutcome::default(),
        };
        to_value(&outcome).map_err(|e| e.into())
    }
}

#[wasm_bindgen]
impl GameClient {
    #[wasm_bindgen(constructor)]
    pub fn new(settings: JsValue) -> Result<GameClient, JsValue> {
        let settings: GameSettings = from_value(settings).unwrap_or_default();
        let engine = build_engine(&settings);
        log(&format!("[game] started, best score {}", engine.best_score()));
        Ok(Self {
            controller: Controller::new(&settings),
            engine,
        })
    }

    #[wasm_bindgen(js_name = newGame)]
    pub fn new_game(&mut self) -> Result<JsValue, JsValue> {
        self.run(Some(Command::NewGame))
    }

    #[wasm_bindgen(js_name = "move")]
    pub fn move_tiles(&mut self, direction: &str) -> Result<JsValue, JsValue> {
        let dir: Direction = direction.parse().map_err(|e: String| JsValue::from_str(&e))?;
        self.run(Some(Command::Move(dir)))
    }

    /// Takes `KeyboardEvent.code`. Unbound keys return an unchanged outcome.
    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&mut self, code: &str) -> Result<JsValue, JsValue> {
        let command = self.controller.key_command(code);
        self.run(command)
    }

    #[wasm_bindgen(js_name = isBoundKey)]
    pub fn is_bound_key(&self, code: &str) -> bool {
        self.controller.key_command(code).is_some()
    }

    #[wasm_bindgen(js_name = touchStart)]
    pub fn touch_start(&mut self, x: f64, y: f64) {
        self.controller.touch_start(x, y);
    }

    #[wasm_bindgen(js_name = touchEnd)]
    pub fn touch_end(&mut self, x: f64, y: f64) -> Result<JsValue, JsValue> {
        let command = self.controller.touch_end(x, y);
        self.run(command)
    }

    #[wasm_bindgen(js_name = undo)]
    pub fn undo(&mut self) -> Result<JsValue, JsValue> {
        self.run(Some(Command::Undo))
    }

    #[wasm_bindgen(js_name = toggleHint)]
    pub fn toggle_hint(&mut self) -> Result<JsValue, JsValue> {
        self.run(Some(Command::ToggleHint))
    }

    #[wasm_bindgen(js_name = continueGame)]
    pub fn continue_game(&mut self) -> Result<JsValue, JsValue> {
        self.run(Some(Command::ContinueAfterWin))
    }

    #[wasm_bindgen(js_name = snapshot)]
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        to_value(&self.engine.snapshot()).map_err(|e| e.into())
    }

    #[wasm_bindgen(js_name = snapshotJson)]
    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.engine.snapshot())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = boardText)]
    pub fn board_text(&self) -> String {
        self.engine.board().to_string()
    }
}
