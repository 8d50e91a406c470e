//! Score tracking
//!
//! The running score resets every game; the best score only ever grows and is
//! written through to storage whenever it does.

use crate::consts::BEST_SCORE_KEY;
use crate::persistence::KeyValueStore;

/// Result of adding points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreChange {
    pub points: u64,
    pub total: u64,
    /// Best score after the change, if it moved
    pub new_best: Option<u64>,
}

#[derive(Debug)]
pub struct ScoreTracker<S> {
    score: u64,
    best: u64,
    store: S,
}

impl<S: KeyValueStore> ScoreTracker<S> {
    /// Create a tracker, loading the best score once from `store`
    pub fn load(store: S) -> Self {
        let best = match store.get(BEST_SCORE_KEY) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                log::warn!("Stored best score {:?} is not a number, starting from 0", raw);
                0
            }),
            None => 0,
        };
        log::info!("Best score: {}", best);
        Self {
            score: 0,
            best,
            store,
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    pub fn add(&mut self, points: u64) -> ScoreChange {
        self.score += points;

        let new_best = if self.score > self.best {
            self.best = self.score;
            if let Err(e) = self.store.set(BEST_SCORE_KEY, &self.best.to_string()) {
                log::warn!("Failed to persist best score: {}", e);
            }
            Some(self.best)
        } else {
            None
        };

        ScoreChange {
            points,
            total: self.score,
            new_best,
        }
    }

    /// Start a new game; the best score carries over
    pub fn reset(&mut self) {
        self.score = 0;
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use proptest::prelude::*;

    #[test]
    fn test_best_loaded_from_store() {
        let mut store = MemoryStore::new();
        store.set(BEST_SCORE_KEY, "120").unwrap();
        let tracker = ScoreTracker::load(store);
        assert_eq!(tracker.best(), 120);
        assert_eq!(tracker.score(), 0);
    }

    #[test]
    fn test_garbage_best_reads_as_zero() {
        let mut store = MemoryStore::new();
        store.set(BEST_SCORE_KEY, "lots").unwrap();
        assert_eq!(ScoreTracker::load(store).best(), 0);
    }

    #[test]
    fn test_new_best_is_persisted() {
        let mut tracker = ScoreTracker::load(MemoryStore::new());
        let change = tracker.add(3);
        assert_eq!(change, ScoreChange { points: 3, total: 3, new_best: Some(3) });
        assert_eq!(tracker.store().get(BEST_SCORE_KEY).as_deref(), Some("3"));
    }

    #[test]
    fn test_reset_keeps_best() {
        let mut tracker = ScoreTracker::load(MemoryStore::new());
        tracker.add(10);
        tracker.reset();
        assert_eq!(tracker.score(), 0);
        assert_eq!(tracker.best(), 10);

        // Below best: no rewrite
        let change = tracker.add(6);
        assert_eq!(change.new_best, None);
        assert_eq!(tracker.store().get(BEST_SCORE_KEY).as_deref(), Some("10"));
    }

    proptest! {
        #[test]
        fn prop_best_is_running_maximum(
            games in prop::collection::vec(prop::collection::vec(1u64..70, 0..20), 1..6)
        ) {
            let mut tracker = ScoreTracker::load(MemoryStore::new());
            let mut max_seen = 0;
            for game in games {
                tracker.reset();
                for points in game {
                    let before = tracker.best();
                    tracker.add(points);
                    max_seen = max_seen.max(tracker.score());
                    prop_assert!(tracker.best() >= before);
                    prop_assert_eq!(tracker.best(), max_seen);
                }
            }
        }
    }
}
