//! Orb Drop - a drop-and-merge arcade game core
//!
//! Core modules:
//! - `sim`: Merge/spawn/game-over rules on top of a pluggable physics world
//! - `game`: Session owner exposing the input and observer surface
//! - `score`: Score tracking with a persisted best score
//! - `persistence`: Key-value storage backends
//! - `platform`: Browser/native platform glue (logging, LocalStorage)
//! - `settings`: Data-driven board geometry and timing

pub mod error;
pub mod game;
pub mod persistence;
pub mod platform;
pub mod score;
pub mod settings;
pub mod sim;

pub use error::GameError;
pub use game::{Game, GameBuilder};
pub use persistence::{KeyValueStore, MemoryStore};
pub use score::ScoreTracker;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (60 Hz)
    pub const SIM_DT_MS: f32 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Radius used to clamp the pointer when nothing is held
    pub const FALLBACK_HOLD_RADIUS: f32 = 25.0;

    /// Storage key for the best score
    pub const BEST_SCORE_KEY: &str = "orb_drop_best_score";
    /// Storage key for settings overrides
    pub const SETTINGS_KEY: &str = "orb_drop_settings";
}
