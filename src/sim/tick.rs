//! Fixed timestep driving
//!
//! Frames arrive at whatever rate the host manages; the game only ever moves
//! in `SIM_DT_MS` steps. [`StepClock`] converts frame time into step counts and
//! [`tick`] applies one step's worth of buffered input.

use crate::consts::{MAX_SUBSTEPS, SIM_DT_MS};
use crate::game::Game;
use crate::persistence::KeyValueStore;
use crate::sim::physics::PhysicsWorld;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer x in board coordinates
    pub pointer_x: Option<f32>,
    /// Drop the held orb (click/tap/space)
    pub drop: bool,
    /// Start from the title screen
    pub start: bool,
    /// Restart (button or play-again)
    pub restart: bool,
}

impl TickInput {
    /// Forget one-shot commands after they have been applied
    pub fn clear_one_shots(&mut self) {
        self.drop = false;
        self.start = false;
        self.restart = false;
    }
}

/// Apply input, then advance the game by one fixed step
pub fn tick<W: PhysicsWorld, S: KeyValueStore>(game: &mut Game<W, S>, input: &TickInput, dt_ms: f32) {
    if input.restart {
        game.on_restart_requested();
    } else if input.start {
        game.on_start_requested();
    }

    if let Some(x) = input.pointer_x {
        game.on_pointer_move(x);
    }
    if input.drop {
        game.on_pointer_commit();
    }

    game.step(dt_ms);
}

/// Fixed-step accumulator
#[derive(Debug, Clone, Default)]
pub struct StepClock {
    accumulator: f32,
}

impl StepClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a frame's elapsed time and return how many fixed steps to run.
    ///
    /// Capped at `MAX_SUBSTEPS`; time beyond the cap is dropped so a long
    /// stall can't snowball.
    pub fn advance(&mut self, frame_ms: f32) -> u32 {
        self.accumulator += frame_ms.clamp(0.0, 250.0);

        let mut steps = 0;
        while self.accumulator >= SIM_DT_MS && steps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT_MS;
            steps += 1;
        }
        if steps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT_MS);
        }
        steps
    }
}

/// Run one rendered frame: as many fixed ticks as the clock allows.
/// One-shot input fires on the first tick only.
pub fn run_frame<W: PhysicsWorld, S: KeyValueStore>(
    game: &mut Game<W, S>,
    clock: &mut StepClock,
    input: &mut TickInput,
    frame_ms: f32,
) -> u32 {
    let steps = clock.advance(frame_ms);
    for _ in 0..steps {
        tick(game, input, SIM_DT_MS);
        input.clear_one_shots();
    }
    steps
}
