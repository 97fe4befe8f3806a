//! The cache registry: at most one cache per cell.
//!
//! [`CacheRegistry::get_or_create`] is idempotent. The first call for a cell
//! consults the [`SpawnPolicy`]; if the policy places a cache there, the
//! cache is minted, inserted, and only then handed back. Later calls return
//! the same cache untouched, so contents are never re-rolled.
//!
//! Negative spawn decisions are not remembered. The policy is a pure
//! function of the cell, so asking again yields the same answer.
//!
//! Callers name cells by [`CellKey`] and the registry obtains the cell
//! itself from the [`Board`], so every cache holds the board's canonical
//! instance and equal coordinates can never produce two caches.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use geocoin_types::{CellKey, CoinId};
use geocoin_world::{Board, SpawnPolicy};
use tracing::{debug, error};

use crate::cache::Cache;

/// Lazily spawned caches, keyed by cell.
#[derive(Debug)]
pub struct CacheRegistry {
    /// Decides existence and initial contents for unseen cells.
    policy: SpawnPolicy,
    /// Every cache spawned so far.
    caches: BTreeMap<CellKey, Cache>,
    /// Identifiers of every coin ever minted.
    minted: BTreeSet<CoinId>,
}

impl CacheRegistry {
    /// Create an empty registry that spawns with `policy`.
    pub const fn new(policy: SpawnPolicy) -> Self {
        Self {
            policy,
            caches: BTreeMap::new(),
            minted: BTreeSet::new(),
        }
    }

    /// The spawn policy in use.
    pub const fn policy(&self) -> &SpawnPolicy {
        &self.policy
    }

    /// Return the cache at `key`, spawning it on first visit.
    ///
    /// A new cache holds `board`'s canonical cell for `key`. Returns `None`
    /// when the spawn policy places no cache at this cell.
    pub fn get_or_create(&mut self, board: &mut Board, key: CellKey) -> Option<&mut Cache> {
        match self.caches.entry(key) {
            Entry::Occupied(existing) => Some(existing.into_mut()),
            Entry::Vacant(slot) => {
                let cell = board.canonicalize(key);
                let coins = self.policy.spawn(&cell)?;
                for coin in &coins {
                    if !self.minted.insert(coin.id()) {
                        error!(coin = %coin, "coin identifier minted twice");
                    }
                }
                debug!(cell = %key, coins = coins.len(), "spawning cache");
                Some(slot.insert(Cache::new(cell, coins)))
            }
        }
    }

    /// Spawn every eligible cell in `keys`.
    ///
    /// Returns the keys of the cells that host a cache, in input order.
    pub fn populate(&mut self, board: &mut Board, keys: &[CellKey]) -> Vec<CellKey> {
        keys.iter()
            .copied()
            .filter(|key| self.get_or_create(board, *key).is_some())
            .collect()
    }

    /// The cache at `key`, if one has been spawned.
    pub fn get(&self, key: CellKey) -> Option<&Cache> {
        self.caches.get(&key)
    }

    /// Mutable access to the cache at `key`, if one has been spawned.
    pub fn get_mut(&mut self, key: CellKey) -> Option<&mut Cache> {
        self.caches.get_mut(&key)
    }

    /// Whether a cache has been spawned at `key`.
    pub fn contains(&self, key: CellKey) -> bool {
        self.caches.contains_key(&key)
    }

    /// Number of spawned caches.
    pub fn len(&self) -> usize {
        self.caches.len()
    }

    /// Whether no cache has been spawned yet.
    pub fn is_empty(&self) -> bool {
        self.caches.is_empty()
    }

    /// Iterate over spawned caches in key order.
    pub fn caches(&self) -> impl Iterator<Item = &Cache> {
        self.caches.values()
    }

    /// Total number of coins ever minted.
    pub fn minted_count(&self) -> usize {
        self.minted.len()
    }

    /// Identifiers of every coin ever minted.
    pub const fn minted(&self) -> &BTreeSet<CoinId> {
        &self.minted
    }
}
