//! Caches, the player inventory, and coin transfers for the Geocoin world
//! core.
//!
//! Every coin in the game is minted once, when its cache spawns, and is
//! never destroyed afterwards. Coins only move between caches and the
//! player, one at a time, through [`collect`] and [`deposit`]. The
//! conservation audit in [`conservation`] checks that nothing was
//! duplicated or lost along the way.
//!
//! # Modules
//!
//! - [`cache`] -- [`Cache`]: a cell's coin stack plus UI hooks
//!   ([`CacheObserver`], [`RenderHandle`]).
//! - [`conservation`] -- [`verify_conservation`] and [`CoinAnomaly`].
//! - [`error`] -- [`CacheError`].
//! - [`inventory`] -- [`PlayerInventory`].
//! - [`registry`] -- [`CacheRegistry`]: lazy, idempotent, one cache per cell.
//! - [`transfer`] -- [`collect`] and [`deposit`].
//!
//! # Usage
//!
//! ```
//! use geocoin_caches::{CacheRegistry, PlayerInventory, collect, deposit};
//! use geocoin_types::CellKey;
//! use geocoin_world::{Board, CoinCountPolicy, SpawnPolicy};
//!
//! // A luck source that spawns a cache everywhere.
//! let policy = SpawnPolicy::new(Box::new(|_: &str| 0.0_f64), 0.1, 3, CoinCountPolicy::Fixed)
//!     .ok();
//! let Some(policy) = policy else { return };
//! let Ok(mut board) = Board::new(1e-4, 1) else { return };
//! let mut registry = CacheRegistry::new(policy);
//! let mut player = PlayerInventory::new();
//!
//! if let Some(cache) = registry.get_or_create(&mut board, CellKey::new(3, -4)) {
//!     collect(cache, &mut player);
//!     assert_eq!(cache.coin_count(), 2);
//!     deposit(cache, &mut player);
//!     assert_eq!(cache.coin_count(), 3);
//! }
//! assert!(player.is_empty());
//! ```

pub mod cache;
pub mod conservation;
pub mod error;
pub mod inventory;
pub mod registry;
pub mod transfer;

// Re-export primary types at crate root.
pub use cache::{Cache, CacheObserver, RenderHandle};
pub use conservation::{CoinAnomaly, ConservationResult, verify_conservation};
pub use error::CacheError;
pub use inventory::PlayerInventory;
pub use registry::CacheRegistry;
pub use transfer::{collect, deposit};
