//! Error types for the Geocoin engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during startup and the scripted round.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: geocoin_core::ConfigError,
    },

    /// Session construction or a session operation failed.
    #[error("session error: {source}")]
    Session {
        /// The underlying session error.
        #[from]
        source: geocoin_core::SessionError,
    },

    /// Attaching a cache observer failed.
    #[error("cache error: {source}")]
    Cache {
        /// The underlying cache error.
        #[from]
        source: geocoin_caches::CacheError,
    },

    /// The end-of-round audit found coins created, lost, or duplicated.
    #[error("conservation violated: {message}")]
    Conservation {
        /// The anomaly description.
        message: String,
    },
}
