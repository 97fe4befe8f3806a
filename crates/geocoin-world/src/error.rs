//! Error types for the `geocoin-world` crate.
//!
//! Only construction can fail. Quantization, canonicalization, neighborhood
//! enumeration, and spawn decisions are total once a [`Board`] or
//! [`SpawnPolicy`] exists.
//!
//! [`Board`]: crate::board::Board
//! [`SpawnPolicy`]: crate::spawn::SpawnPolicy

/// Errors raised when building world components from configuration.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// Tile width must be a finite, strictly positive number of degrees.
    #[error("tile width must be finite and positive, got {tile_width}")]
    InvalidTileWidth {
        /// The rejected tile width.
        tile_width: f64,
    },

    /// Spawn probability must lie in `[0, 1]`.
    #[error("spawn probability must be within [0, 1], got {probability}")]
    InvalidSpawnProbability {
        /// The rejected probability.
        probability: f64,
    },

    /// A spawned cache must be allowed to hold at least one coin.
    #[error("max coins per cache must be at least 1")]
    ZeroMaxCoins,
}
