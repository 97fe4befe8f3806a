//! Procedural cache placement.
//!
//! The [`SpawnPolicy`] decides, independently for every cell, whether a cache
//! exists there and which coins it starts with. Both decisions are drawn
//! from a [`Luck`] source keyed by the cell's canonical key, so the world is
//! the same regardless of which cells are visited first:
//!
//! | Decision   | Seed                 | Rule                                   |
//! |------------|----------------------|----------------------------------------|
//! | existence  | `"i,j"`              | `luck < spawn_probability`             |
//! | coin count | `"i,j,initialValue"` | `floor(luck * (max_coins + 1))` (opt.) |
//!
//! The coin-count seed is distinct from the existence seed so that the
//! number of coins is not correlated with whether the cache exists.

use geocoin_types::{Cell, CellKey, Coin};
use serde::{Deserialize, Serialize};

use crate::error::WorldError;
use crate::luck::Luck;

/// Suffix appended to the cell key when rolling a cache's coin count.
const COIN_COUNT_SEED_SUFFIX: &str = "initialValue";

/// How many coins a freshly spawned cache starts with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoinCountPolicy {
    /// Every cache starts with exactly `max_coins` coins.
    #[default]
    Fixed,
    /// Each cache rolls a count in `0..=max_coins` from its own seed.
    Luck,
}

/// Deterministic per-cell spawn rules.
pub struct SpawnPolicy {
    /// Keyed randomness source.
    luck: Box<dyn Luck>,
    /// Probability in `[0, 1]` that a given cell hosts a cache.
    spawn_probability: f64,
    /// Upper bound on the coins a new cache starts with.
    max_coins: u32,
    /// Fixed or rolled coin count.
    coin_count: CoinCountPolicy,
}

impl core::fmt::Debug for SpawnPolicy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SpawnPolicy")
            .field("spawn_probability", &self.spawn_probability)
            .field("max_coins", &self.max_coins)
            .field("coin_count", &self.coin_count)
            .finish_non_exhaustive()
    }
}

impl SpawnPolicy {
    /// Create a spawn policy.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidSpawnProbability`] if the probability is
    /// not a finite value in `[0, 1]`, or [`WorldError::ZeroMaxCoins`] if
    /// `max_coins` is zero.
    pub fn new(
        luck: Box<dyn Luck>,
        spawn_probability: f64,
        max_coins: u32,
        coin_count: CoinCountPolicy,
    ) -> Result<Self, WorldError> {
        if !(0.0..=1.0).contains(&spawn_probability) {
            return Err(WorldError::InvalidSpawnProbability {
                probability: spawn_probability,
            });
        }
        if max_coins == 0 {
            return Err(WorldError::ZeroMaxCoins);
        }
        Ok(Self {
            luck,
            spawn_probability,
            max_coins,
            coin_count,
        })
    }

    /// Probability that a cell hosts a cache.
    pub const fn spawn_probability(&self) -> f64 {
        self.spawn_probability
    }

    /// Configured upper bound on initial coins.
    pub const fn max_coins(&self) -> u32 {
        self.max_coins
    }

    /// Configured coin count policy.
    pub const fn coin_count_policy(&self) -> CoinCountPolicy {
        self.coin_count
    }

    /// Whether `cell` hosts a cache. Pure in the cell's coordinates.
    pub fn should_spawn(&self, cell: &Cell) -> bool {
        let roll = self.luck.luck(&spawn_seed(cell.key()));
        tracing::trace!(cell = %cell.key(), roll, "spawn roll");
        roll < self.spawn_probability
    }

    /// Number of coins a new cache at `cell` starts with, at most
    /// `max_coins`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn coin_count(&self, cell: &Cell, max_coins: u32) -> u32 {
        match self.coin_count {
            CoinCountPolicy::Fixed => max_coins,
            CoinCountPolicy::Luck => {
                let roll = self.luck.luck(&coin_count_seed(cell.key()));
                // Saturating cast: a misbehaving source cannot push the
                // count below zero or past `max_coins`.
                let rolled = (roll * (f64::from(max_coins) + 1.0)).floor() as u32;
                rolled.min(max_coins)
            }
        }
    }

    /// The coins a new cache at `cell` starts with.
    ///
    /// Serials run `0..count` in mint order, so the last coin is the first
    /// one a player collects.
    pub fn initial_coins(&self, cell: &Cell, max_coins: u32) -> Vec<Coin> {
        let origin = cell.key();
        (0..self.coin_count(cell, max_coins))
            .map(|serial| Coin::new(origin, serial))
            .collect()
    }

    /// Roll existence and contents for `cell` in one step.
    ///
    /// Returns `None` when no cache belongs at this cell.
    pub fn spawn(&self, cell: &Cell) -> Option<Vec<Coin>> {
        self.should_spawn(cell)
            .then(|| self.initial_coins(cell, self.max_coins))
    }
}

/// Seed for the existence roll: the canonical `"i,j"` key.
pub fn spawn_seed(key: CellKey) -> String {
    key.to_string()
}

/// Seed for the coin count roll: `"i,j,initialValue"`.
pub fn coin_count_seed(key: CellKey) -> String {
    format!("{key},{COIN_COUNT_SEED_SUFFIX}")
}
