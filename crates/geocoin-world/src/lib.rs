//! Grid, randomness, and cache placement for the Geocoin world core.
//!
//! This crate models where things are: geographic points quantized into an
//! identity-stable grid, and the deterministic rules that decide which grid
//! cells host a cache.
//!
//! # Modules
//!
//! - [`board`] -- [`Board`]: point-to-cell quantization, canonical cell
//!   instances, cell bounds, and neighborhood enumeration.
//! - [`error`] -- Error types for invalid world configuration.
//! - [`luck`] -- The [`Luck`] trait and the default [`HashLuck`] source.
//! - [`spawn`] -- [`SpawnPolicy`]: per-cell cache existence and initial coins.

pub mod board;
pub mod error;
pub mod luck;
pub mod spawn;

// Re-export primary types at crate root.
pub use board::Board;
pub use error::WorldError;
pub use luck::{HashLuck, Luck};
pub use spawn::{CoinCountPolicy, SpawnPolicy};
