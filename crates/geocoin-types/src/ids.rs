//! Identifier types.
//!
//! [`CoinId`] is derived from the coin's origin cell and a per-cell serial,
//! so the same world always mints the same identifiers. Everything that is
//! not part of world generation (currently only the game session) uses a
//! UUID v7 newtype built by `define_id!`.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::structs::CellKey;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }
    };
}

define_id! {
    /// Unique identifier for one game session (one running world).
    SessionId
}

/// Globally unique coin identifier.
///
/// A cache is spawned at most once per cell, and the coins it starts with
/// get serials `0..n`, so `(origin, serial)` never repeats within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CoinId {
    /// Cell where the coin was minted.
    pub origin: CellKey,
    /// Position of the coin in its origin cache's initial contents.
    pub serial: u32,
}

impl CoinId {
    /// Build an identifier from its origin cell and serial.
    pub const fn new(origin: CellKey, serial: u32) -> Self {
        Self { origin, serial }
    }
}

impl core::fmt::Display for CoinId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}:{}#{}", self.origin.i, self.origin.j, self.serial)
    }
}
