//! Board geometry and gameplay timing
//!
//! Defaults reproduce the reference board. Overrides can be stored as JSON in
//! the key-value store next to the best score.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::SETTINGS_KEY;
use crate::error::GameError;
use crate::persistence::KeyValueStore;
use crate::sim::physics::Material;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Board ===
    /// Playfield width (px)
    pub width: f32,
    /// Playfield height (px); the floor's top edge sits here
    pub height: f32,
    /// Thickness of the walls and floor
    pub wall_thickness: f32,
    /// Extra gap kept between a held orb and the side walls
    pub side_margin: f32,

    // === Overflow ===
    /// Orbs whose center is above this y are in danger (+y is down)
    pub danger_line: f32,
    /// How long an orb may stay above the line (ms)
    pub danger_grace_ms: f64,

    // === Spawning ===
    /// Y of a freshly spawned orb; must be below the danger line
    pub spawn_y: f32,
    /// Delay between a drop and the next spawn (ms)
    pub spawn_cooldown_ms: f64,

    // === Physics ===
    /// Downward acceleration (px/s²)
    pub gravity: f32,
    /// Upward speed given to a merge product (px/s)
    pub merge_pop_speed: f32,
    pub restitution: f32,
    pub friction: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: 560.0,
            height: 700.0,
            wall_thickness: 20.0,
            side_margin: 10.0,

            danger_line: 60.0,
            danger_grace_ms: 2000.0,

            // Below the danger line so a held orb never counts as overflow
            spawn_y: 100.0,
            spawn_cooldown_ms: 500.0,

            gravity: 1000.0,
            merge_pop_speed: 120.0,
            restitution: 0.3,
            friction: 0.5,
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(GameError::InvalidSettings("board dimensions must be positive"));
        }
        if self.wall_thickness <= 0.0 {
            return Err(GameError::InvalidSettings("wall thickness must be positive"));
        }
        if self.side_margin < 0.0 {
            return Err(GameError::InvalidSettings("side margin cannot be negative"));
        }
        if self.spawn_y <= self.danger_line {
            return Err(GameError::InvalidSettings("spawn line must be below the danger line"));
        }
        if self.spawn_y >= self.height {
            return Err(GameError::InvalidSettings("spawn line must be inside the board"));
        }
        if self.danger_grace_ms < 0.0 || self.spawn_cooldown_ms < 0.0 {
            return Err(GameError::InvalidSettings("durations cannot be negative"));
        }
        if !(0.0..=1.0).contains(&self.restitution) || self.friction < 0.0 {
            return Err(GameError::InvalidSettings("material out of range"));
        }
        Ok(())
    }

    /// Horizontal range a held orb of `radius` may occupy
    pub fn hold_range(&self, radius: f32) -> (f32, f32) {
        let min = radius + self.side_margin;
        let max = self.width - radius - self.side_margin;
        if min > max {
            // Orb wider than the board: center it
            let mid = self.width / 2.0;
            (mid, mid)
        } else {
            (min, max)
        }
    }

    /// Clamp a pointer x so an orb of `radius` stays inside the walls
    pub fn clamp_hold_x(&self, x: f32, radius: f32) -> f32 {
        let (min, max) = self.hold_range(radius);
        x.clamp(min, max)
    }

    pub fn gravity_vector(&self) -> Vec2 {
        Vec2::new(0.0, self.gravity)
    }

    pub fn orb_material(&self) -> Material {
        Material {
            restitution: self.restitution,
            friction: self.friction,
        }
    }

    /// Load settings from storage, falling back to defaults
    pub fn load(store: &impl KeyValueStore) -> Self {
        match store.get(SETTINGS_KEY) {
            Some(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from storage");
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring stored settings: {}", e);
                    Self::default()
                }
            },
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings to storage
    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<(), GameError> {
        let json = serde_json::to_string(self)?;
        store.set(SETTINGS_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
