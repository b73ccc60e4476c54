#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Loot generation system rolling victory drops from a dedicated stream.
//!
//! The stream passed to [`LootGeneration::roll`] must never be the battle
//! stream; drops are independent of everything that happened in combat.

use std::collections::btree_map::Entry;

use idle_arena_core::{Attribute, ItemSnapshot, ProfileLookup};
use rand::Rng;
use uuid::Builder;

/// Draws per roll are taken from `MIN_DROPS..MAX_DROPS`.
const MIN_DROPS: u32 = 1;
const MAX_DROPS: u32 = 4;
const BONUS_CHANCE: f64 = 0.5;

/// Loot system that reuses a scratch buffer of eligible catalog rows.
#[derive(Debug, Default)]
pub struct LootGeneration {
    eligible: Vec<usize>,
}

impl LootGeneration {
    /// Creates a new loot system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends between one and three equipment drops at `item_level` to `out`.
    ///
    /// Each drop copies a uniformly chosen equipment row's base attributes and
    /// has an even chance of gaining or raising one random bonus attribute.
    pub fn roll<R: Rng + ?Sized>(
        &mut self,
        catalog: &dyn ProfileLookup,
        item_level: i32,
        rng: &mut R,
        out: &mut Vec<ItemSnapshot>,
    ) {
        let count = rng.gen_range(MIN_DROPS..MAX_DROPS);

        let profiles = catalog.equipment_profiles();
        self.eligible.clear();
        self.eligible.extend(
            profiles
                .iter()
                .enumerate()
                .filter(|(_, profile)| profile.is_equipment())
                .map(|(index, _)| index),
        );
        if self.eligible.is_empty() {
            log::debug!("catalog has no equipment rows; no loot dropped");
            return;
        }

        for _ in 0..count {
            let choice = self.eligible[rng.gen_range(0..self.eligible.len())];
            let profile = &profiles[choice];
            let mut attributes = profile.base_attributes.clone();

            if rng.gen::<f64>() > BONUS_CHANCE {
                let attribute = Attribute::BONUS_POOL[rng.gen_range(0..Attribute::BONUS_POOL.len())];
                match attributes.entry(attribute) {
                    Entry::Vacant(slot) => {
                        let _ = slot.insert(rng.gen_range(1..5));
                    }
                    Entry::Occupied(mut slot) => {
                        *slot.get_mut() += rng.gen_range(1..3);
                    }
                }
            }

            let id = Builder::from_random_bytes(rng.gen()).into_uuid();
            log::debug!("rolled {:?} at level {item_level}", profile.key);
            out.push(ItemSnapshot {
                id,
                item: profile.key,
                item_level,
                equipped_slot: None,
                attributes,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use idle_arena_catalog::ProfileRegistry;
    use idle_arena_core::{ItemCategory, ProfileLookup};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::LootGeneration;

    #[test]
    fn drops_between_one_and_three_equipment_items() {
        let registry = ProfileRegistry::builtin().expect("builtin catalog");
        let mut loot = LootGeneration::new();

        for seed in 0..64 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut drops = Vec::new();
            loot.roll(&registry, 7, &mut rng, &mut drops);

            assert!((1..=3).contains(&drops.len()));
            for item in &drops {
                let profile = registry
                    .equipment_profile(item.item)
                    .expect("dropped item is registered");
                assert_eq!(profile.category, ItemCategory::Equipment);
                assert_eq!(item.item_level, 7);
                for (attribute, base) in &profile.base_attributes {
                    let rolled = item.attributes.get(attribute).copied().unwrap_or(0);
                    assert!(rolled >= *base);
                }
                assert!(item.attributes.len() <= profile.base_attributes.len() + 1);
            }
        }
    }

    #[test]
    fn identical_seeds_roll_identical_drops() {
        let registry = ProfileRegistry::builtin().expect("builtin catalog");
        let mut loot = LootGeneration::new();
        let mut first = Vec::new();
        let mut second = Vec::new();

        loot.roll(&registry, 3, &mut ChaCha8Rng::seed_from_u64(67890), &mut first);
        loot.roll(&registry, 3, &mut ChaCha8Rng::seed_from_u64(67890), &mut second);

        assert_eq!(first, second);
    }

    #[test]
    fn empty_catalog_drops_nothing() {
        let registry = ProfileRegistry::builder().build().expect("empty catalog");
        let mut drops = Vec::new();
        LootGeneration::new().roll(
            &registry,
            1,
            &mut ChaCha8Rng::seed_from_u64(1),
            &mut drops,
        );
        assert!(drops.is_empty());
    }
}
