//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Logger setup
//! - Storage (LocalStorage on web)
//! - The JS-facing game handle (web)

/// Install the logger for this platform
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
}

/// Install the logger for this platform (`RUST_LOG` controls the level)
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    if let Err(e) = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).try_init() {
        log::debug!("Logger already initialized: {}", e);
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::{LocalStorage, WebGame};

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::prelude::*;

    use crate::error::GameError;
    use crate::game::{Game, GameBuilder};
    use crate::persistence::KeyValueStore;
    use crate::settings::Settings;
    use crate::sim::{CircleWorld, StepClock, TickInput, run_frame};

    use super::init_logging;

    /// Browser LocalStorage
    pub struct LocalStorage {
        storage: web_sys::Storage,
    }

    impl LocalStorage {
        /// Fails if the page has no window or storage is disabled
        pub fn open() -> Result<Self, GameError> {
            let storage = web_sys::window()
                .and_then(|w| w.local_storage().ok())
                .flatten()
                .ok_or_else(|| GameError::Storage("LocalStorage is not available".into()))?;
            Ok(Self { storage })
        }
    }

    impl KeyValueStore for LocalStorage {
        fn get(&self, key: &str) -> Option<String> {
            self.storage.get_item(key).ok().flatten()
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), GameError> {
            self.storage
                .set_item(key, value)
                .map_err(|e| GameError::Storage(format!("{:?}", e)))
        }
    }

    /// Game handle driven from `requestAnimationFrame`
    #[wasm_bindgen]
    pub struct WebGame {
        game: Game<CircleWorld, LocalStorage>,
        clock: StepClock,
        input: TickInput,
    }

    #[wasm_bindgen]
    impl WebGame {
        #[wasm_bindgen(constructor)]
        pub fn new(seed: u64) -> Result<WebGame, JsValue> {
            init_logging();
            let to_js = |e: GameError| JsValue::from_str(&e.to_string());

            let store = LocalStorage::open().map_err(to_js)?;
            let settings = Settings::load(&store);
            let game = GameBuilder::new()
                .world(CircleWorld::new(settings.gravity_vector()))
                .settings(settings)
                .store(store)
                .seed(seed)
                .build()
                .map_err(to_js)?;
            log::info!("Orb Drop running!");

            Ok(WebGame {
                game,
                clock: StepClock::new(),
                input: TickInput::default(),
            })
        }

        pub fn pointer_move(&mut self, x: f32) {
            self.input.pointer_x = Some(x);
        }

        pub fn pointer_commit(&mut self) {
            self.input.drop = true;
        }

        pub fn start(&mut self) {
            self.input.start = true;
        }

        pub fn restart(&mut self) {
            self.input.restart = true;
        }

        /// Advance by the elapsed frame time; returns the fixed steps run
        pub fn frame(&mut self, frame_ms: f32) -> u32 {
            run_frame(&mut self.game, &mut self.clock, &mut self.input, frame_ms)
        }

        pub fn score(&self) -> u64 {
            self.game.current_score()
        }

        pub fn best_score(&self) -> u64 {
            self.game.best_score()
        }

        pub fn next_tier(&self) -> usize {
            self.game.next_tier_preview()
        }

        pub fn is_game_over(&self) -> bool {
            self.game.is_game_over()
        }

        /// Flat `[x, y, tier, ...]` for every orb on the board
        pub fn orbs(&self) -> Vec<f32> {
            self.game
                .entities()
                .iter()
                .flat_map(|e| [e.position.x, e.position.y, e.tier as f32])
                .collect()
        }
    }
}
