//! Error types
//!
//! Gameplay never fails: out-of-order input is ignored. Errors only surface
//! while constructing a game or talking to storage.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    /// No physics world was supplied; raised before any game state exists.
    #[error("physics world unavailable: a physics backend must be supplied before the game is built")]
    PhysicsUnavailable,

    /// Settings failed validation.
    #[error("invalid settings: {0}")]
    InvalidSettings(&'static str),

    /// Settings or stored data was not valid JSON.
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// File-backed storage failed.
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Browser storage rejected an operation.
    #[error("storage unavailable: {0}")]
    Storage(String),
}
