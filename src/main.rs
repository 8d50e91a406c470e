//! Orb Drop entry point
//!
//! The browser build is driven through `platform::WebGame`. Natively this runs
//! a headless autoplay session against the built-in physics world.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::Parser;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use orb_drop::consts::SIM_DT_MS;
    use orb_drop::persistence::{JsonFileStore, KeyValueStore, MemoryStore};
    use orb_drop::sim::{CircleWorld, GameEvent, StepClock, TickInput, TIERS, run_frame};
    use orb_drop::{GameBuilder, Settings};

    #[derive(Parser, Debug)]
    #[command(about = "Play Orb Drop headless with a random-drop bot", version)]
    struct Args {
        /// RNG seed for tier picks and bot moves
        #[arg(long)]
        seed: Option<u64>,
        /// Maximum simulated frames
        #[arg(long, default_value_t = 36_000)]
        frames: u32,
        /// Simulated frame time in milliseconds
        #[arg(long, default_value_t = 16.0)]
        frame_ms: f32,
        /// JSON file holding the best score and settings overrides
        #[arg(long)]
        store: Option<PathBuf>,
    }

    pub fn run() -> Result<()> {
        orb_drop::platform::init_logging();
        let args = Args::parse();
        log::info!("Orb Drop (headless) starting...");

        match &args.store {
            Some(path) => {
                let store = JsonFileStore::open(path)
                    .with_context(|| format!("opening store {}", path.display()))?;
                play(&args, store)
            }
            None => play(&args, MemoryStore::new()),
        }
    }

    fn play<S: KeyValueStore>(args: &Args, store: S) -> Result<()> {
        let seed = args.seed.unwrap_or_else(rand::random::<u64>);
        let settings = Settings::load(&store);
        let mut game = GameBuilder::new()
            .world(CircleWorld::new(settings.gravity_vector()))
            .settings(settings)
            .store(store)
            .seed(seed)
            .build()
            .context("building game")?;

        let mut bot = Pcg32::seed_from_u64(seed ^ 0x5eed);
        let mut clock = StepClock::new();
        let mut input = TickInput {
            start: true,
            ..Default::default()
        };
        let width = game.settings().width;

        let mut merges = 0u32;
        let mut largest = 0usize;
        let mut elapsed_ms = 0.0f64;

        for _ in 0..args.frames {
            if game.can_drop() {
                input.pointer_x = Some(bot.random_range(0.0..width));
                input.drop = true;
            }
            let steps = run_frame(&mut game, &mut clock, &mut input, args.frame_ms);
            elapsed_ms += f64::from(steps) * f64::from(SIM_DT_MS);

            for event in game.drain_events() {
                match event {
                    GameEvent::Merged { tier, .. } => {
                        merges += 1;
                        largest = largest.max(tier);
                    }
                    GameEvent::NewBest { best } => log::debug!("New best: {}", best),
                    GameEvent::GameOver { score } => log::info!("Game over with {} points", score),
                    _ => {}
                }
            }
            if game.is_game_over() {
                break;
            }
        }

        println!("Seed:        {}", seed);
        println!("Time played: {:.1}s", elapsed_ms / 1000.0);
        println!("Merges:      {}", merges);
        println!("Largest orb: {}", TIERS[largest].name);
        println!("Score:       {}", game.current_score());
        println!("Best:        {}", game.best_score());
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::WebGame, this is just to satisfy the compiler
}
