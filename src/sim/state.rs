//! Session state and the events it reports
//!
//! The session is the only owner of the game phase. Every restart bumps its
//! generation, which invalidates anything scheduled by the previous game.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::registry::EntityId;
use super::tier::TierIndex;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first start
    #[default]
    Idle,
    /// Active gameplay
    Playing,
    /// Board overflowed; waits for a restart
    GameOver,
}

/// Things the presentation layer may want to react to
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Started,
    Restarted,
    Spawned { entity: EntityId, tier: TierIndex, x: f32 },
    Dropped { entity: EntityId, tier: TierIndex },
    Merged { entity: EntityId, tier: TierIndex, position: Vec2 },
    /// Score went up (drives the score pulse)
    ScoreIncreased { points: u64, total: u64 },
    NewBest { best: u64 },
    GameOver { score: u64 },
}

/// Read-only view of an orb, for drawing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityView {
    pub id: EntityId,
    pub tier: TierIndex,
    pub position: Vec2,
    pub dropped: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    phase: GamePhase,
    /// Incremented on every restart
    generation: u32,
    /// Simulated time since the session started (ms)
    clock_ms: f64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Idle -> Playing. Returns false if the game already started.
    pub fn start(&mut self) -> bool {
        if self.phase != GamePhase::Idle {
            return false;
        }
        self.phase = GamePhase::Playing;
        true
    }

    /// Any phase -> Playing with a fresh generation
    pub fn restart(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.phase = GamePhase::Playing;
    }

    /// Playing -> GameOver. Returns false if the game was not running.
    pub fn end(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.phase = GamePhase::GameOver;
        true
    }

    pub fn advance(&mut self, dt_ms: f32) {
        self.clock_ms += f64::from(dt_ms);
    }
}
