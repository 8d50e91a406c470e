//! Gameplay simulation module
//!
//! All merge/spawn/game-over rules live here, on top of a [`PhysicsWorld`]:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by body handle)
//! - No rendering or platform dependencies

pub mod collision;
pub mod danger;
pub mod merge;
pub mod physics;
pub mod registry;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod tier;
pub mod world;

pub use danger::DangerVerdict;
pub use merge::MergeOutcome;
pub use physics::{BodyHandle, Material, PhysicsWorld, Shape, StepReport};
pub use registry::{BodyKind, Entity, EntityId, EntityRegistry};
pub use spawn::{PendingSpawn, SpawnController};
pub use state::{EntityView, GameEvent, GamePhase, Session};
pub use tick::{StepClock, TickInput, run_frame, tick};
pub use tier::{MAX_TIER, SPAWNABLE_TIERS, TIERS, Tier, TierIndex};
pub use world::CircleWorld;
