//! Orb tier table
//!
//! Ordered smallest to largest. Radius and score strictly increase with index.

/// Index into [`TIERS`]
pub type TierIndex = usize;

/// A single orb tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tier {
    pub index: TierIndex,
    pub name: &'static str,
    /// Collision radius in pixels
    pub radius: f32,
    /// Points awarded when this tier is produced by a merge
    pub score: u64,
    /// Display color (0xRRGGBB)
    pub color: u32,
}

const fn tier(index: TierIndex, name: &'static str, radius: f32, score: u64, color: u32) -> Tier {
    Tier {
        index,
        name,
        radius,
        score,
        color,
    }
}

/// Number of tiers
pub const TIER_COUNT: usize = 11;

/// Highest tier index; two of these never merge
pub const MAX_TIER: TierIndex = TIER_COUNT - 1;

/// Only the lowest tiers can be spawned directly
pub const SPAWNABLE_TIERS: usize = 5;

pub const TIERS: [Tier; TIER_COUNT] = [
    tier(0, "cherry", 20.0, 1, 0xff0844),
    tier(1, "strawberry", 28.0, 3, 0xff4757),
    tier(2, "grape", 35.0, 6, 0xa29bfe),
    tier(3, "orange", 42.0, 10, 0xffa502),
    tier(4, "lemon", 48.0, 15, 0xffd32a),
    tier(5, "apple", 55.0, 21, 0xff6348),
    tier(6, "pear", 62.0, 28, 0x26de81),
    tier(7, "peach", 68.0, 36, 0xffbe76),
    tier(8, "pineapple", 75.0, 45, 0xf6b93b),
    tier(9, "melon", 120.0, 55, 0x55efc4),
    tier(10, "watermelon", 150.0, 66, 0xff7675),
];

/// Look up a tier by index
#[inline]
pub fn get(index: TierIndex) -> Option<&'static Tier> {
    TIERS.get(index)
}

/// The tier a merge of two `index` orbs produces, if any
#[inline]
pub fn merge_product(index: TierIndex) -> Option<&'static Tier> {
    if index >= MAX_TIER {
        None
    } else {
        TIERS.get(index + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_table_is_strictly_increasing() {
        for pair in TIERS.windows(2) {
            assert!(pair[1].radius > pair[0].radius, "{} radius", pair[1].name);
            assert!(pair[1].score > pair[0].score, "{} score", pair[1].name);
        }
    }

    #[test]
    fn test_indices_match_position() {
        for (i, t) in TIERS.iter().enumerate() {
            assert_eq!(t.index, i);
        }
    }

    #[test]
    fn test_max_tier_has_no_product() {
        assert!(merge_product(MAX_TIER).is_none());
        assert!(merge_product(MAX_TIER + 3).is_none());
        assert_eq!(merge_product(0).map(|t| t.index), Some(1));
    }

    proptest! {
        #[test]
        fn prop_product_is_next_tier(index in 0usize..MAX_TIER) {
            let product = merge_product(index).unwrap();
            prop_assert_eq!(product.index, index + 1);
            prop_assert!(product.score > TIERS[index].score);
        }
    }
}
