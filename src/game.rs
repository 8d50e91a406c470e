//! Game session
//!
//! [`Game`] is the single owner of all gameplay state: the physics world, the
//! entity registry, the spawn slot, the score and the session phase. Input
//! handlers and observers are the only way in or out.

use glam::Vec2;

use crate::error::GameError;
use crate::persistence::{KeyValueStore, MemoryStore};
use crate::score::ScoreTracker;
use crate::settings::Settings;
use crate::sim::danger::{self, DangerVerdict};
use crate::sim::merge::{self, MergeOutcome};
use crate::sim::physics::{BodyHandle, PhysicsWorld, Shape};
use crate::sim::registry::{EntityId, EntityRegistry};
use crate::sim::spawn::SpawnController;
use crate::sim::state::{EntityView, GameEvent, GamePhase, Session};
use crate::sim::tier::TierIndex;

/// Assembles a [`Game`]. A physics world is mandatory; building without one
/// fails before any game state exists.
pub struct GameBuilder<W, S = MemoryStore> {
    world: Option<W>,
    store: S,
    settings: Settings,
    seed: Option<u64>,
}

impl<W: PhysicsWorld> Default for GameBuilder<W, MemoryStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: PhysicsWorld> GameBuilder<W, MemoryStore> {
    pub fn new() -> Self {
        Self {
            world: None,
            store: MemoryStore::new(),
            settings: Settings::default(),
            seed: None,
        }
    }
}

impl<W: PhysicsWorld, S: KeyValueStore> GameBuilder<W, S> {
    pub fn world(mut self, world: W) -> Self {
        self.world = Some(world);
        self
    }

    /// Storage for the best score (defaults to an empty in-memory store)
    pub fn store<T: KeyValueStore>(self, store: T) -> GameBuilder<W, T> {
        GameBuilder {
            world: self.world,
            store,
            settings: self.settings,
            seed: self.seed,
        }
    }

    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// RNG seed for the tier picks (random if unset)
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<Game<W, S>, GameError> {
        let mut world = self.world.ok_or(GameError::PhysicsUnavailable)?;
        self.settings.validate()?;

        let seed = self.seed.unwrap_or_else(rand::random::<u64>);
        let walls = build_walls(&mut world, &self.settings);
        let score = ScoreTracker::load(self.store);
        log::info!("Game initialized with seed: {}", seed);

        Ok(Game {
            spawner: SpawnController::new(seed, &self.settings),
            world,
            settings: self.settings,
            session: Session::new(),
            registry: EntityRegistry::new(),
            score,
            events: Vec::new(),
            walls,
        })
    }
}

/// Floor plus left and right walls, just outside the playfield
fn build_walls<W: PhysicsWorld>(world: &mut W, settings: &Settings) -> [BodyHandle; 3] {
    let w = settings.width;
    let h = settings.height;
    let t = settings.wall_thickness;

    let boxes = [
        (Vec2::new(w / 2.0, h + t / 2.0), Vec2::new(w / 2.0, t / 2.0)),
        (Vec2::new(-t / 2.0, h / 2.0), Vec2::new(t / 2.0, h / 2.0)),
        (Vec2::new(w + t / 2.0, h / 2.0), Vec2::new(t / 2.0, h / 2.0)),
    ];
    boxes.map(|(center, half_extents)| {
        let body = world.create_static_body(Shape::Rect { half_extents }, center);
        world.add_to_world(body);
        body
    })
}

pub struct Game<W, S> {
    world: W,
    settings: Settings,
    session: Session,
    registry: EntityRegistry,
    spawner: SpawnController,
    score: ScoreTracker<S>,
    events: Vec<GameEvent>,
    walls: [BodyHandle; 3],
}

impl<W: PhysicsWorld, S: KeyValueStore> Game<W, S> {
    // === Input ===

    /// Idle -> Playing, spawning the first orb
    pub fn on_start_requested(&mut self) {
        if !self.session.start() {
            log::debug!("Start ignored in {:?}", self.session.phase());
            return;
        }
        log::info!("Starting game...");
        self.events.push(GameEvent::Started);
        self.spawn_current();
    }

    /// Wipe the board and play again; best score survives
    pub fn on_restart_requested(&mut self) {
        for body in self.registry.clear() {
            self.world.remove_from_world(body);
        }
        self.score.reset();
        self.spawner.reset();
        self.session.restart();
        log::info!("Game restarted (generation {})", self.session.generation());
        self.events.push(GameEvent::Restarted);
        self.spawn_current();
    }

    pub fn on_pointer_move(&mut self, x: f32) {
        if !self.session.is_playing() {
            return;
        }
        self.spawner
            .follow_pointer(x, &mut self.world, &self.registry, &self.settings);
    }

    /// Drop the held orb
    pub fn on_pointer_commit(&mut self) {
        if !self.session.is_playing() {
            log::debug!("Drop ignored in {:?}", self.session.phase());
            return;
        }
        let dropped = self.spawner.release(
            &mut self.world,
            &mut self.registry,
            self.session.clock_ms(),
            self.session.generation(),
            &self.settings,
        );
        match dropped.and_then(|id| self.registry.get(id).map(|e| (id, e.tier))) {
            Some((entity, tier)) => self.events.push(GameEvent::Dropped { entity, tier }),
            None => log::debug!("Drop ignored: nothing to drop"),
        }
    }

    // === Simulation ===

    /// Advance one fixed step: due spawn, physics, merges, overflow check.
    /// Nothing moves outside of `Playing`.
    pub fn step(&mut self, dt_ms: f32) {
        if !self.session.is_playing() {
            return;
        }
        self.session.advance(dt_ms);

        if self
            .spawner
            .take_due(self.session.clock_ms(), self.session.generation())
        {
            self.spawn_current();
        }

        let report = self.world.step(dt_ms);
        self.handle_collisions(&report.collisions);
        self.handle_step_complete(&report.positions);
    }

    /// Feed collision-start events from the physics world
    pub fn handle_collisions(&mut self, pairs: &[(BodyHandle, BodyHandle)]) -> Vec<MergeOutcome> {
        if !self.session.is_playing() {
            return Vec::new();
        }
        let outcomes = merge::resolve_collisions(pairs, &mut self.world, &mut self.registry, &self.settings);

        for merge in &outcomes {
            for id in merge.consumed {
                self.spawner.forget(
                    id,
                    self.session.clock_ms(),
                    self.session.generation(),
                    &self.settings,
                );
            }
            self.events.push(GameEvent::Merged {
                entity: merge.product,
                tier: merge.tier,
                position: merge.position,
            });
            self.add_score(merge.points);
        }
        outcomes
    }

    /// Feed post-step body positions to the overflow check
    pub fn handle_step_complete(&mut self, positions: &[(BodyHandle, Vec2)]) {
        if !self.session.is_playing() {
            return;
        }
        let verdict = danger::monitor(
            positions,
            &mut self.registry,
            self.session.clock_ms(),
            &self.settings,
        );
        if let DangerVerdict::Overflowed(id) = verdict {
            self.trigger_game_over(id);
        }
    }

    fn spawn_current(&mut self) {
        if !self.session.is_playing() {
            return;
        }
        let entity = self
            .spawner
            .spawn(&mut self.world, &mut self.registry, &self.settings);
        if let Some(e) = self.registry.get(entity) {
            let x = self.world.position(e.body).map_or(0.0, |p| p.x);
            self.events.push(GameEvent::Spawned {
                entity,
                tier: e.tier,
                x,
            });
        }
    }

    fn add_score(&mut self, points: u64) {
        let change = self.score.add(points);
        self.events.push(GameEvent::ScoreIncreased {
            points: change.points,
            total: change.total,
        });
        if let Some(best) = change.new_best {
            self.events.push(GameEvent::NewBest { best });
        }
    }

    fn trigger_game_over(&mut self, culprit: EntityId) {
        if !self.session.end() {
            return;
        }
        self.spawner.lock();
        log::info!(
            "Game over: {:?} overflowed, final score {}",
            culprit,
            self.score.score()
        );
        self.events.push(GameEvent::GameOver {
            score: self.score.score(),
        });
    }

    // === Observers ===

    pub fn current_score(&self) -> u64 {
        self.score.score()
    }

    pub fn best_score(&self) -> u64 {
        self.score.best()
    }

    pub fn next_tier_preview(&self) -> TierIndex {
        self.spawner.next_tier()
    }

    pub fn is_game_over(&self) -> bool {
        self.session.phase() == GamePhase::GameOver
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase()
    }

    /// Whether a drop would currently be accepted
    pub fn can_drop(&self) -> bool {
        self.session.is_playing() && self.spawner.can_drop() && self.held().is_some()
    }

    /// The orb the player is holding, if any
    pub fn held(&self) -> Option<EntityId> {
        self.spawner
            .current()
            .filter(|&id| self.registry.get(id).is_some_and(|e| !e.dropped))
    }

    /// Every orb on the board, for drawing
    pub fn entities(&self) -> Vec<EntityView> {
        self.registry
            .iter()
            .filter_map(|(id, e)| {
                self.world.position(e.body).map(|position| EntityView {
                    id,
                    tier: e.tier,
                    position,
                    dropped: e.dropped,
                })
            })
            .collect()
    }

    pub fn body_of(&self, id: EntityId) -> Option<BodyHandle> {
        self.registry.get(id).map(|e| e.body)
    }

    pub fn walls(&self) -> [BodyHandle; 3] {
        self.walls
    }

    /// Take all events since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    pub fn store(&self) -> &S {
        self.score.store()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{BEST_SCORE_KEY, SIM_DT_MS};
    use crate::sim::tier::TIERS;
    use crate::sim::world::CircleWorld;

    type TestGame = Game<CircleWorld, MemoryStore>;

    fn game_with(settings: Settings) -> TestGame {
        GameBuilder::new()
            .world(CircleWorld::new(settings.gravity_vector()))
            .settings(settings)
            .seed(42)
            .build()
            .unwrap()
    }

    fn game() -> TestGame {
        game_with(Settings::default())
    }

    fn run_ms(game: &mut TestGame, ms: f32) {
        let steps = (ms / SIM_DT_MS).ceil() as u32;
        for _ in 0..steps {
            game.step(SIM_DT_MS);
        }
    }

    #[test]
    fn test_missing_physics_fails_fast() {
        let result = GameBuilder::<CircleWorld, MemoryStore>::new().build();
        assert!(matches!(result, Err(GameError::PhysicsUnavailable)));
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = Settings {
            spawn_y: 10.0,
            ..Settings::default()
        };
        let result = GameBuilder::<_, MemoryStore>::new()
            .world(CircleWorld::new(Vec2::ZERO))
            .settings(settings)
            .build();
        assert!(matches!(result, Err(GameError::InvalidSettings(_))));
    }

    #[test]
    fn test_idle_ignores_input() {
        let mut game = game();
        assert_eq!(game.phase(), GamePhase::Idle);

        game.on_pointer_move(100.0);
        game.on_pointer_commit();
        run_ms(&mut game, 100.0);

        assert!(game.entities().is_empty());
        assert!(game.drain_events().is_empty());
    }

    #[test]
    fn test_start_spawns_held_orb() {
        let mut game = game();
        let preview = game.next_tier_preview();
        game.on_start_requested();

        assert_eq!(game.phase(), GamePhase::Playing);
        let orbs = game.entities();
        assert_eq!(orbs.len(), 1);
        assert_eq!(orbs[0].tier, preview);
        assert!(!orbs[0].dropped);
        assert!(game.can_drop());

        // Second start is a no-op
        game.on_start_requested();
        assert_eq!(game.entities().len(), 1);
    }

    #[test]
    fn test_drop_then_respawn_after_cooldown() {
        let mut game = game();
        game.on_start_requested();
        game.on_pointer_commit();
        game.on_pointer_commit();

        let drops = game
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::Dropped { .. }))
            .count();
        assert_eq!(drops, 1);
        assert!(!game.can_drop());

        run_ms(&mut game, 400.0);
        assert!(game.held().is_none());

        run_ms(&mut game, 150.0);
        assert!(game.held().is_some());
        assert!(game.can_drop());
        assert_eq!(game.entities().len(), 2);
    }

    #[test]
    fn test_two_cherries_merge_scenario() {
        let mut game = game();
        game.spawner.next = 0;
        game.on_start_requested();
        game.on_pointer_move(280.0);
        let first = game.held().unwrap();
        game.on_pointer_commit();

        game.spawner.next = 0;
        run_ms(&mut game, 520.0);
        let second = game.held().unwrap();
        assert_ne!(first, second);

        let body_a = game.body_of(first).unwrap();
        let body_b = game.body_of(second).unwrap();
        let pos_a = game.world().position(body_a).unwrap();
        let pos_b = game.world().position(body_b).unwrap();
        assert_eq!(pos_b.x, 280.0);

        let outcomes = game.handle_collisions(&[(body_a, body_b)]);
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].tier, 1);
        assert_eq!(outcomes[0].position, (pos_a + pos_b) / 2.0);
        assert_eq!(game.current_score(), TIERS[1].score);

        // Held orb was consumed: a replacement arrives after the cooldown
        assert!(game.held().is_none());
        assert!(!game.can_drop());
        let orbs = game.entities();
        assert_eq!(orbs.len(), 1);
        assert_eq!(orbs[0].tier, 1);
    }

    #[test]
    fn test_respawn_after_held_orb_merges() {
        let mut game = game_with(still_settings());
        game.spawner.next = 0;
        game.on_start_requested();
        let held = game.body_of(game.held().unwrap()).unwrap();
        let other = orb(&mut game, 0, 400.0);

        game.handle_collisions(&[(held, other)]);
        assert!(game.held().is_none());

        // Clicking while nothing is held does nothing
        game.on_pointer_commit();
        run_ms(&mut game, 400.0);
        assert!(game.held().is_none());

        run_ms(&mut game, 150.0);
        assert!(game.held().is_some());
        assert!(game.can_drop());
        game.on_pointer_commit();
        assert!(!game.can_drop());
    }

    #[test]
    fn test_dropped_orbs_merge_through_physics() {
        let mut game = game();
        game.spawner.next = 0;
        game.on_start_requested();
        game.on_pointer_move(280.0);
        game.on_pointer_commit();

        game.spawner.next = 0;
        run_ms(&mut game, 550.0);
        assert!(game.can_drop());
        game.on_pointer_commit();
        game.drain_events();

        // Second cherry lands on the first one resting on the floor
        run_ms(&mut game, 2000.0);

        let merges = game
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::Merged { .. }))
            .count();
        assert_eq!(merges, 1);
        assert_eq!(game.current_score(), TIERS[1].score);
        let dropped: Vec<_> = game.entities().into_iter().filter(|e| e.dropped).collect();
        assert_eq!(dropped.len(), 1);
        assert_eq!(dropped[0].tier, 1);
    }

    #[test]
    fn test_score_is_sum_of_merges() {
        let mut game = game();
        game.on_start_requested();

        let mut expected = 0;
        for tier in [0usize, 2, 5] {
            let a = orb(&mut game, tier, 150.0);
            let b = orb(&mut game, tier, 400.0);
            game.handle_collisions(&[(a, b)]);
            expected += TIERS[tier + 1].score;
        }
        assert_eq!(game.current_score(), expected);
        assert_eq!(game.best_score(), expected);
        assert_eq!(
            game.store().get(BEST_SCORE_KEY),
            Some(expected.to_string())
        );
    }

    fn orb(game: &mut TestGame, tier: TierIndex, x: f32) -> BodyHandle {
        let body = game.world.create_dynamic_body(
            Shape::Circle {
                radius: TIERS[tier].radius,
            },
            Vec2::new(x, 500.0),
            game.settings.orb_material(),
        );
        game.world.add_to_world(body);
        game.registry.insert(body, tier, true);
        body
    }

    fn still_settings() -> Settings {
        Settings {
            gravity: 0.0,
            ..Settings::default()
        }
    }

    #[test]
    fn test_overflow_ends_game() {
        let mut game = game_with(still_settings());
        game.on_start_requested();
        let body = game.body_of(game.held().unwrap()).unwrap();

        game.world_mut().set_position(body, Vec2::new(280.0, 30.0));
        run_ms(&mut game, 1900.0);
        assert!(!game.is_game_over());

        run_ms(&mut game, 200.0);
        assert!(game.is_game_over());
        assert!(!game.can_drop());
        assert!(game
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::GameOver { .. })));

        // Terminal: input and steps are ignored
        game.on_pointer_commit();
        game.step(SIM_DT_MS);
        assert!(game.drain_events().is_empty());
    }

    #[test]
    fn test_returning_below_line_resets_timer() {
        let mut game = game_with(still_settings());
        game.on_start_requested();
        let body = game.body_of(game.held().unwrap()).unwrap();

        game.world_mut().set_position(body, Vec2::new(280.0, 30.0));
        run_ms(&mut game, 1500.0);
        game.world_mut().set_position(body, Vec2::new(280.0, 100.0));
        run_ms(&mut game, 100.0);
        game.world_mut().set_position(body, Vec2::new(280.0, 30.0));
        run_ms(&mut game, 1500.0);

        assert!(!game.is_game_over());
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut game = game_with(still_settings());
        game.on_start_requested();
        let a = orb(&mut game, 3, 150.0);
        let b = orb(&mut game, 3, 400.0);
        game.handle_collisions(&[(a, b)]);
        let best = game.best_score();
        assert!(best > 0);

        let body = game.body_of(game.held().unwrap()).unwrap();
        game.world_mut().set_position(body, Vec2::new(280.0, 30.0));
        run_ms(&mut game, 2100.0);
        assert!(game.is_game_over());

        game.on_restart_requested();
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.current_score(), 0);
        assert_eq!(game.best_score(), best);
        assert_eq!(game.entities().len(), 1);
        assert!(game.held().is_some());
        assert!(game.can_drop());
        // Only the walls and the new held orb remain in the world
        assert_eq!(game.world().body_count(), 4);
    }

    #[test]
    fn test_restart_cancels_pending_spawn() {
        let mut game = game();
        game.on_start_requested();
        game.on_pointer_commit();
        game.on_restart_requested();

        run_ms(&mut game, 1000.0);
        // Just the restart spawn; the old cooldown never fires
        assert_eq!(game.entities().len(), 1);
        assert!(game.held().is_some());
    }
}
