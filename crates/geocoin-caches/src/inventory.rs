//! The player's coin inventory.
//!
//! One inventory exists per game session. It is passed explicitly to
//! [`collect`](crate::transfer::collect) and
//! [`deposit`](crate::transfer::deposit) rather than living in a global.

use geocoin_types::{Coin, CoinId};

/// Coins carried by the player, oldest first.
#[derive(Debug, Default)]
pub struct PlayerInventory {
    /// Coin stack; the last element is the most recently collected coin.
    coins: Vec<Coin>,
}

impl PlayerInventory {
    /// Create an empty inventory.
    pub const fn new() -> Self {
        Self { coins: Vec::new() }
    }

    /// Carried coins, oldest first.
    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    /// Number of carried coins.
    pub const fn len(&self) -> usize {
        self.coins.len()
    }

    /// Whether the player carries nothing.
    pub const fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }

    /// Whether the player carries the coin with `id`.
    pub fn contains(&self, id: CoinId) -> bool {
        self.coins.iter().any(|coin| coin.id() == id)
    }

    /// The coin that the next deposit would hand over.
    pub fn last(&self) -> Option<&Coin> {
        self.coins.last()
    }

    /// Remove and return the most recently collected coin.
    pub(crate) fn pop(&mut self) -> Option<Coin> {
        self.coins.pop()
    }

    /// Put `coin` on top of the stack.
    pub(crate) fn push(&mut self, coin: Coin) {
        self.coins.push(coin);
    }
}
