//! Shared type definitions for the Geocoin world core.
//!
//! Every crate in the workspace speaks these types, and they flow to the
//! `TypeScript` map UI via `ts-rs`.
//!
//! # Modules
//!
//! - [`ids`] -- [`CoinId`] and the UUID-backed [`SessionId`]
//! - [`structs`] -- Points, cell bounds, cells, and coins

pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use ids::{CoinId, SessionId};
pub use structs::{Cell, CellBounds, CellKey, Coin, LatLng};
