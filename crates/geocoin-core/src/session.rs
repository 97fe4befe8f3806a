//! A single game session.
//!
//! [`GameSession`] owns everything one player's game needs: the board that
//! canonicalizes cells, the registry of spawned caches, and the player's
//! inventory. The presentation layer drives it through a handful of calls:
//! reveal the cells around a point, then collect from or deposit into the
//! cache at a revealed cell.
//!
//! Nothing here is global. Two sessions built from the same configuration
//! and luck source see the same world but keep independent state.

use std::rc::Rc;

use geocoin_caches::{
    Cache, CacheRegistry, ConservationResult, PlayerInventory, collect, deposit,
    verify_conservation,
};
use geocoin_types::{Cell, CellBounds, CellKey, Coin, LatLng, SessionId};
use geocoin_world::{Board, HashLuck, Luck, SpawnPolicy, WorldError};
use serde::Serialize;
use tracing::{debug, error, info};

use crate::config::{ConfigError, GameConfig};

/// Errors raised by [`GameSession`] operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The configuration failed validation.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The board or spawn policy rejected its parameters.
    #[error("world error: {0}")]
    World(#[from] WorldError),

    /// A transfer targeted a cell that hosts no cache.
    #[error("no cache at cell {cell}")]
    NoCacheAtCell {
        /// The cell that was targeted.
        cell: CellKey,
    },
}

/// Presentation-ready description of one cache.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheSummary {
    /// The cell hosting the cache.
    pub cell: CellKey,
    /// Geographic extent of the cell.
    pub bounds: CellBounds,
    /// Heading line, e.g. `Cache at (5, -3)`.
    pub title: String,
    /// Contents line, e.g. `Contains 3 coin(s)`.
    pub contents: String,
    /// One label per coin, oldest first.
    pub coin_labels: Vec<String>,
}

/// One player's world state.
#[derive(Debug)]
pub struct GameSession {
    id: SessionId,
    start: LatLng,
    board: Board,
    registry: CacheRegistry,
    player: PlayerInventory,
}

impl GameSession {
    /// Build a session from `config` using the default [`HashLuck`] source.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Config`] if `config` fails validation, or
    /// [`SessionError::World`] if the board or spawn policy rejects it.
    pub fn new(config: &GameConfig) -> Result<Self, SessionError> {
        Self::with_luck(config, HashLuck)
    }

    /// Build a session from `config` with a caller-supplied luck source.
    ///
    /// # Errors
    ///
    /// See [`GameSession::new`].
    pub fn with_luck<L: Luck + 'static>(config: &GameConfig, luck: L) -> Result<Self, SessionError> {
        config.validate()?;
        let board = Board::new(config.board.tile_width, config.board.visibility_radius)?;
        let policy = SpawnPolicy::new(
            Box::new(luck),
            config.spawn.probability,
            config.spawn.max_coins,
            config.spawn.coin_count,
        )?;
        let id = SessionId::new();

        info!(
            session = %id,
            tile_width = board.tile_width(),
            visibility_radius = board.visibility_radius(),
            spawn_probability = policy.spawn_probability(),
            max_coins = policy.max_coins(),
            coin_count = ?policy.coin_count_policy(),
            "Game session created"
        );

        Ok(Self {
            id,
            start: config.player.start,
            board,
            registry: CacheRegistry::new(policy),
            player: PlayerInventory::new(),
        })
    }

    /// Session identifier.
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// Where the player started.
    pub const fn start(&self) -> LatLng {
        self.start
    }

    /// The board.
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// The cache registry.
    pub const fn registry(&self) -> &CacheRegistry {
        &self.registry
    }

    /// The player's inventory.
    pub const fn player(&self) -> &PlayerInventory {
        &self.player
    }

    /// Canonical cell containing `point`.
    pub fn cell_at(&mut self, point: LatLng) -> Rc<Cell> {
        self.board.cell_for_point(point)
    }

    /// Reveal every cell within the board's visibility radius of `point`
    /// and spawn caches where the policy places them.
    ///
    /// Returns the keys of the revealed cells that host a cache, in
    /// row-major order. Calling this again over the same area returns the
    /// same caches with their current contents.
    pub fn reveal_near(&mut self, point: LatLng) -> Vec<CellKey> {
        let keys: Vec<CellKey> = self
            .board
            .cells_near_point(point)
            .iter()
            .map(|cell| cell.key())
            .collect();
        let hosting = self.registry.populate(&mut self.board, &keys);
        debug!(
            session = %self.id,
            lat = point.lat,
            lng = point.lng,
            cells = keys.len(),
            caches = hosting.len(),
            "revealed neighborhood"
        );
        hosting
    }

    /// The cache at the cell containing `point`, spawning it if this is the
    /// cell's first visit.
    pub fn cache_at_point(&mut self, point: LatLng) -> Option<&mut Cache> {
        let key = self.board.key_for_point(point);
        self.registry.get_or_create(&mut self.board, key)
    }

    /// The cache at `key`, if one has been spawned.
    pub fn cache(&self, key: CellKey) -> Option<&Cache> {
        self.registry.get(key)
    }

    /// Mutable access to the cache at `key`, for attaching an observer or a
    /// render handle.
    pub fn cache_mut(&mut self, key: CellKey) -> Option<&mut Cache> {
        self.registry.get_mut(key)
    }

    /// Collect one coin from the cache at `key`.
    ///
    /// `Ok(None)` means the cache was empty.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoCacheAtCell`] if no cache has been spawned
    /// at `key`.
    pub fn collect_at(&mut self, key: CellKey) -> Result<Option<Coin>, SessionError> {
        let cache = self
            .registry
            .get_mut(key)
            .ok_or(SessionError::NoCacheAtCell { cell: key })?;
        Ok(collect(cache, &mut self.player))
    }

    /// Deposit the player's most recent coin into the cache at `key`.
    ///
    /// `Ok(None)` means the player carried nothing.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoCacheAtCell`] if no cache has been spawned
    /// at `key`.
    pub fn deposit_at(&mut self, key: CellKey) -> Result<Option<Coin>, SessionError> {
        let cache = self
            .registry
            .get_mut(key)
            .ok_or(SessionError::NoCacheAtCell { cell: key })?;
        Ok(deposit(cache, &mut self.player))
    }

    /// Describe the cache at `key` for display.
    pub fn describe_cache(&self, key: CellKey) -> Option<CacheSummary> {
        let cache = self.registry.get(key)?;
        let cell = cache.cell();
        Some(CacheSummary {
            cell: key,
            bounds: self.board.bounds_for_cell(cell),
            title: format!("Cache at {cell}"),
            contents: format!("Contains {} coin(s)", cache.coin_count()),
            coin_labels: cache.coins().iter().map(Coin::label).collect(),
        })
    }

    /// Check that every minted coin is held exactly once.
    pub fn audit(&self) -> ConservationResult {
        let result = verify_conservation(&self.registry, &self.player);
        if let ConservationResult::Anomaly(anomaly) = &result {
            error!(
                session = %self.id,
                expected = anomaly.expected,
                observed = anomaly.observed,
                "{anomaly}"
            );
        }
        result
    }
}
