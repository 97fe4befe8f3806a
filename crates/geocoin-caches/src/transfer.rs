//! Coin transfers between a cache and the player.
//!
//! [`collect`] and [`deposit`] are the only code paths that move a coin
//! from one container to another. Each moves exactly one coin, last in
//! first out, so the total number of coins in the world never changes.
//!
//! An empty source is a normal outcome, not an error: the call returns
//! `None`, touches nothing, and does not notify the cache's observer.

use geocoin_types::Coin;
use tracing::{debug, trace};

use crate::cache::Cache;
use crate::inventory::PlayerInventory;

/// Move the most recently added coin from `cache` to the player.
///
/// Returns the moved coin, or `None` if the cache was empty.
pub fn collect(cache: &mut Cache, player: &mut PlayerInventory) -> Option<Coin> {
    let Some(coin) = cache.pop_coin() else {
        trace!(cell = %cache.key(), "collect from empty cache");
        return None;
    };
    player.push(coin.clone());
    debug!(
        cell = %cache.key(),
        coin = %coin,
        cache_coins = cache.coin_count(),
        player_coins = player.len(),
        "coin collected"
    );
    cache.notify();
    Some(coin)
}

/// Move the player's most recently collected coin into `cache`.
///
/// Returns the moved coin, or `None` if the player carries nothing.
pub fn deposit(cache: &mut Cache, player: &mut PlayerInventory) -> Option<Coin> {
    let Some(coin) = player.pop() else {
        trace!(cell = %cache.key(), "deposit with empty inventory");
        return None;
    };
    cache.push_coin(coin.clone());
    debug!(
        cell = %cache.key(),
        coin = %coin,
        cache_coins = cache.coin_count(),
        player_coins = player.len(),
        "coin deposited"
    );
    cache.notify();
    Some(coin)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use geocoin_types::{Cell, CellKey};

    use super::*;

    fn cache_at(i: i64, count: u32) -> Cache {
        let key = CellKey::new(i, 0);
        let coins = (0..count).map(|serial| Coin::new(key, serial)).collect();
        Cache::new(Rc::new(Cell::new(key)), coins)
    }

    fn counting_observer(cache: &mut Cache) -> Rc<RefCell<Vec<usize>>> {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&calls);
        cache
            .attach_observer(move |_: &Cell, coins: &[Coin]| sink.borrow_mut().push(coins.len()))
            .unwrap();
        calls
    }

    #[test]
    fn collect_takes_most_recent_coin() {
        let mut cache = cache_at(0, 3);
        let mut player = PlayerInventory::new();

        let coin = collect(&mut cache, &mut player).unwrap();
        assert_eq!(coin.serial(), 2);
        assert_eq!(cache.coin_count(), 2);
        assert_eq!(player.len(), 1);
        assert_eq!(player.last(), Some(&coin));
    }

    #[test]
    fn deposit_returns_most_recently_collected_coin() {
        let mut first = cache_at(0, 1);
        let mut second = cache_at(1, 1);
        let mut player = PlayerInventory::new();

        let from_first = collect(&mut first, &mut player).unwrap();
        let from_second = collect(&mut second, &mut player).unwrap();

        let deposited = deposit(&mut first, &mut player).unwrap();
        assert_eq!(deposited, from_second);
        assert_eq!(first.coins()[0], from_second);
        assert_eq!(player.coins(), &[from_first]);
    }

    #[test]
    fn collect_then_deposit_restores_counts() {
        let mut cache = cache_at(0, 3);
        let mut player = PlayerInventory::new();
        let original: Vec<Coin> = cache.coins().to_vec();

        assert!(collect(&mut cache, &mut player).is_some());
        assert!(deposit(&mut cache, &mut player).is_some());
        assert_eq!(cache.coins(), original.as_slice());
        assert!(player.is_empty());
    }

    #[test]
    fn collect_from_empty_cache_is_noop() {
        let mut cache = cache_at(0, 0);
        let calls = counting_observer(&mut cache);
        let mut player = PlayerInventory::new();

        assert!(collect(&mut cache, &mut player).is_none());
        assert!(cache.is_empty());
        assert!(player.is_empty());
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn deposit_with_empty_inventory_is_noop() {
        let mut cache = cache_at(0, 2);
        let calls = counting_observer(&mut cache);
        let mut player = PlayerInventory::new();

        assert!(deposit(&mut cache, &mut player).is_none());
        assert_eq!(cache.coin_count(), 2);
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn observer_sees_state_after_each_transfer() {
        let mut cache = cache_at(0, 2);
        let calls = counting_observer(&mut cache);
        let mut player = PlayerInventory::new();

        collect(&mut cache, &mut player);
        collect(&mut cache, &mut player);
        collect(&mut cache, &mut player);
        deposit(&mut cache, &mut player);

        assert_eq!(*calls.borrow(), vec![1, 0, 1]);
    }

    #[test]
    fn transfers_work_without_observer() {
        let mut cache = cache_at(0, 1);
        let mut player = PlayerInventory::new();
        assert!(collect(&mut cache, &mut player).is_some());
        assert!(deposit(&mut cache, &mut player).is_some());
        assert_eq!(cache.coin_count(), 1);
    }
}
