//! Coin conservation audit.
//!
//! Coins are minted once, when their cache spawns, and afterwards only move
//! between containers. At any point the coins held by the player and by
//! every spawned cache must therefore be exactly the set of minted coins:
//!
//! ```text
//! player ∪ cache_1 ∪ ... ∪ cache_n == minted      (as multisets)
//! ```
//!
//! [`collect`](crate::transfer::collect) and
//! [`deposit`](crate::transfer::deposit) preserve this by construction. The
//! audit catches anything that breaks it anyway: a duplicated coin, a lost
//! coin, or a coin that was never minted.

use std::collections::BTreeSet;

use geocoin_types::CoinId;

use crate::inventory::PlayerInventory;
use crate::registry::CacheRegistry;

/// The result of a conservation audit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConservationResult {
    /// Held coins match minted coins exactly.
    Balanced,
    /// The invariant is broken.
    Anomaly(CoinAnomaly),
}

impl ConservationResult {
    /// Whether the audit passed.
    pub const fn is_balanced(&self) -> bool {
        matches!(self, Self::Balanced)
    }
}

/// Details of a conservation violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinAnomaly {
    /// Number of coins ever minted.
    pub expected: usize,
    /// Number of coins found across the player and all caches.
    pub observed: usize,
    /// Coins found in more than one place.
    pub duplicates: BTreeSet<CoinId>,
    /// Minted coins found nowhere.
    pub missing: BTreeSet<CoinId>,
    /// Held coins that were never minted.
    pub unknown: BTreeSet<CoinId>,
    /// Human-readable description.
    pub message: String,
}

impl core::fmt::Display for CoinAnomaly {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Audit the player inventory and every cache in `registry` against the
/// registry's minted coins.
pub fn verify_conservation(
    registry: &CacheRegistry,
    player: &PlayerInventory,
) -> ConservationResult {
    let held_coins = player
        .coins()
        .iter()
        .chain(registry.caches().flat_map(|cache| cache.coins().iter()));

    let mut held = BTreeSet::new();
    let mut duplicates = BTreeSet::new();
    let mut observed: usize = 0;
    for coin in held_coins {
        observed = observed.saturating_add(1);
        if !held.insert(coin.id()) {
            duplicates.insert(coin.id());
        }
    }

    let minted = registry.minted();
    let missing: BTreeSet<CoinId> = minted.difference(&held).copied().collect();
    let unknown: BTreeSet<CoinId> = held.difference(minted).copied().collect();

    if duplicates.is_empty() && missing.is_empty() && unknown.is_empty() {
        return ConservationResult::Balanced;
    }

    let expected = minted.len();
    ConservationResult::Anomaly(CoinAnomaly {
        expected,
        observed,
        message: format!(
            "COIN_ANOMALY: expected {expected} coin(s), found {observed} \
             ({} duplicated, {} missing, {} unknown)",
            duplicates.len(),
            missing.len(),
            unknown.len(),
        ),
        duplicates,
        missing,
        unknown,
    })
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic,
    clippy::arithmetic_side_effects
)]
mod tests {
    use geocoin_types::{CellKey, Coin};
    use geocoin_world::{Board, CoinCountPolicy, SpawnPolicy};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::transfer::{collect, deposit};

    fn always_registry() -> CacheRegistry {
        let policy =
            SpawnPolicy::new(Box::new(|_: &str| 0.0_f64), 0.5, 3, CoinCountPolicy::Fixed).unwrap();
        CacheRegistry::new(policy)
    }

    fn spawn_row(registry: &mut CacheRegistry, count: i64) -> Vec<CellKey> {
        let mut board = Board::new(1e-4, 1).unwrap();
        let keys: Vec<CellKey> = (0..count).map(|j| CellKey::new(0, j)).collect();
        registry.populate(&mut board, &keys)
    }

    #[test]
    fn fresh_world_is_balanced() {
        let mut registry = always_registry();
        spawn_row(&mut registry, 4);
        let player = PlayerInventory::new();
        assert!(verify_conservation(&registry, &player).is_balanced());
    }

    #[test]
    fn empty_world_is_balanced() {
        let registry = always_registry();
        let player = PlayerInventory::new();
        assert_eq!(verify_conservation(&registry, &player), ConservationResult::Balanced);
    }

    #[test]
    fn random_transfer_sequences_conserve_coins() {
        let mut registry = always_registry();
        let keys = spawn_row(&mut registry, 5);
        let mut player = PlayerInventory::new();
        let mut rng = StdRng::seed_from_u64(2024);

        for _ in 0..1_000 {
            let key = keys[rng.random_range(0..keys.len())];
            let cache = registry.get_mut(key).unwrap();
            if rng.random_bool(0.5) {
                collect(cache, &mut player);
            } else {
                deposit(cache, &mut player);
            }
            let total = player.len() + registry.caches().map(|c| c.coin_count()).sum::<usize>();
            assert_eq!(total, registry.minted_count());
        }
        assert!(verify_conservation(&registry, &player).is_balanced());
    }

    #[test]
    fn duplicated_coin_is_reported() {
        let mut registry = always_registry();
        let keys = spawn_row(&mut registry, 1);
        let mut player = PlayerInventory::new();
        let copy = registry.get(keys[0]).unwrap().coins()[0].clone();
        player.push(copy.clone());

        let ConservationResult::Anomaly(anomaly) = verify_conservation(&registry, &player) else {
            panic!("duplicate went unnoticed");
        };
        assert_eq!(anomaly.expected, 3);
        assert_eq!(anomaly.observed, 4);
        assert!(anomaly.duplicates.contains(&copy.id()));
        assert!(anomaly.missing.is_empty());
        assert!(anomaly.to_string().starts_with("COIN_ANOMALY"));
    }

    #[test]
    fn lost_and_forged_coins_are_reported() {
        let mut registry = always_registry();
        let keys = spawn_row(&mut registry, 1);
        let lost = registry.get_mut(keys[0]).unwrap().pop_coin().unwrap();
        let mut player = PlayerInventory::new();
        let forged = Coin::new(CellKey::new(99, 99), 0);
        player.push(forged.clone());

        let ConservationResult::Anomaly(anomaly) = verify_conservation(&registry, &player) else {
            panic!("loss went unnoticed");
        };
        assert_eq!(anomaly.missing.iter().copied().collect::<Vec<_>>(), vec![lost.id()]);
        assert_eq!(anomaly.unknown.iter().copied().collect::<Vec<_>>(), vec![forged.id()]);
        assert!(anomaly.duplicates.is_empty());
    }
}
