//! Configuration and session orchestration for the Geocoin world.
//!
//! This crate is the entry point for a presentation layer. It loads the
//! game configuration and builds a [`GameSession`] that owns the board, the
//! cache registry, and the player inventory.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `geocoin-config.yaml` into
//!   strongly-typed structs.
//! - [`session`] -- [`GameSession`]: reveal cells, collect and deposit
//!   coins, describe caches, audit conservation.
//!
//! [`GameSession`]: session::GameSession

pub mod config;
pub mod session;

pub use config::{ConfigError, GameConfig};
pub use session::{CacheSummary, GameSession, SessionError};
