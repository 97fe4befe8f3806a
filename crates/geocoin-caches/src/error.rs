//! Error types for the geocoin-caches crate.
//!
//! Moving coins never fails: collecting from an empty cache or depositing
//! from an empty inventory is a defined no-op. The only error is misuse of
//! the observer hook.

use geocoin_types::CellKey;

/// Errors that can occur when wiring a cache to the UI layer.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The cache already has an observer; it is attached once at creation.
    #[error("cache at {cell} already has an observer attached")]
    ObserverAlreadyAttached {
        /// The cache's cell.
        cell: CellKey,
    },
}
