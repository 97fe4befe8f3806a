//! The per-cell cache entity.
//!
//! A [`Cache`] owns its canonical cell, a stack of coins, and two hooks
//! owned by the UI layer: an opaque [`RenderHandle`] and an optional
//! [`CacheObserver`] that is told about every successful transfer.
//!
//! The coin stack can only be changed through
//! [`collect`](crate::transfer::collect) and
//! [`deposit`](crate::transfer::deposit).

use std::rc::Rc;

use geocoin_types::{Cell, CellKey, Coin};

use crate::error::CacheError;

/// Receives a cache's new state after each successful transfer.
pub trait CacheObserver {
    /// Called after a coin was collected from or deposited into the cache.
    fn on_cache_changed(&mut self, cell: &Cell, coins: &[Coin]);
}

impl<F> CacheObserver for F
where
    F: FnMut(&Cell, &[Coin]),
{
    fn on_cache_changed(&mut self, cell: &Cell, coins: &[Coin]) {
        self(cell, coins);
    }
}

/// Opaque handle to whatever the UI layer draws for a cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RenderHandle(pub u64);

/// A cache of coins at one grid cell.
pub struct Cache {
    /// Canonical cell instance from the board.
    cell: Rc<Cell>,
    /// Coin stack; the last element is the most recently added coin.
    coins: Vec<Coin>,
    /// UI drawing handle, if the UI has attached one.
    render_handle: Option<RenderHandle>,
    /// Refresh hook, if the UI has attached one.
    observer: Option<Box<dyn CacheObserver>>,
}

impl core::fmt::Debug for Cache {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Cache")
            .field("cell", &self.cell)
            .field("coins", &self.coins)
            .field("render_handle", &self.render_handle)
            .field("has_observer", &self.observer.is_some())
            .finish()
    }
}

impl Cache {
    /// Create a cache holding `coins`, bottom of the stack first.
    pub(crate) const fn new(cell: Rc<Cell>, coins: Vec<Coin>) -> Self {
        Self {
            cell,
            coins,
            render_handle: None,
            observer: None,
        }
    }

    /// The canonical cell this cache sits in.
    pub const fn cell(&self) -> &Rc<Cell> {
        &self.cell
    }

    /// The canonical key of this cache's cell.
    pub fn key(&self) -> CellKey {
        self.cell.key()
    }

    /// Current contents, bottom of the stack first.
    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    /// Number of coins currently held.
    pub const fn coin_count(&self) -> usize {
        self.coins.len()
    }

    /// Whether the cache holds no coins.
    pub const fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }

    /// The UI drawing handle, if any.
    pub const fn render_handle(&self) -> Option<RenderHandle> {
        self.render_handle
    }

    /// Record the UI drawing handle for this cache.
    pub const fn set_render_handle(&mut self, handle: RenderHandle) {
        self.render_handle = Some(handle);
    }

    /// Whether an observer is attached.
    pub const fn has_observer(&self) -> bool {
        self.observer.is_some()
    }

    /// Attach the refresh hook.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ObserverAlreadyAttached`] if an observer is
    /// already present; the existing one is kept.
    pub fn attach_observer<O>(&mut self, observer: O) -> Result<(), CacheError>
    where
        O: CacheObserver + 'static,
    {
        if self.observer.is_some() {
            return Err(CacheError::ObserverAlreadyAttached { cell: self.key() });
        }
        self.observer = Some(Box::new(observer));
        Ok(())
    }

    /// Remove and return the most recently added coin.
    pub(crate) fn pop_coin(&mut self) -> Option<Coin> {
        self.coins.pop()
    }

    /// Put `coin` on top of the stack.
    pub(crate) fn push_coin(&mut self, coin: Coin) {
        self.coins.push(coin);
    }

    /// Tell the observer, if any, about the current contents.
    pub(crate) fn notify(&mut self) {
        if let Some(observer) = self.observer.as_mut() {
            observer.on_cache_changed(&self.cell, &self.coins);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    fn cache_with(count: u32) -> Cache {
        let key = CellKey::new(4, 2);
        let coins = (0..count).map(|serial| Coin::new(key, serial)).collect();
        Cache::new(Rc::new(Cell::new(key)), coins)
    }

    #[test]
    fn new_cache_exposes_cell_and_coins() {
        let cache = cache_with(3);
        assert_eq!(cache.key(), CellKey::new(4, 2));
        assert_eq!(cache.coin_count(), 3);
        assert!(!cache.is_empty());
        assert_eq!(cache.coins()[0].serial(), 0);
        assert!(cache.render_handle().is_none());
        assert!(!cache.has_observer());
    }

    #[test]
    fn coin_stack_is_last_in_first_out() {
        let mut cache = cache_with(2);
        let top = cache.pop_coin().unwrap();
        assert_eq!(top.serial(), 1);
        cache.push_coin(top);
        assert_eq!(cache.coins().last().map(Coin::serial), Some(1));
    }

    #[test]
    fn observer_attaches_once() {
        let mut cache = cache_with(1);
        assert!(cache.attach_observer(|_: &Cell, _: &[Coin]| {}).is_ok());
        let second = cache.attach_observer(|_: &Cell, _: &[Coin]| {});
        assert!(matches!(
            second,
            Err(CacheError::ObserverAlreadyAttached { cell }) if cell == CellKey::new(4, 2)
        ));
    }

    #[test]
    fn notify_passes_current_state() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut cache = cache_with(2);
        let sink = Rc::clone(&seen);
        cache
            .attach_observer(move |cell: &Cell, coins: &[Coin]| {
                sink.borrow_mut().push((cell.key(), coins.len()));
            })
            .unwrap();
        cache.notify();
        assert_eq!(*seen.borrow(), vec![(CellKey::new(4, 2), 2)]);
    }

    #[test]
    fn notify_without_observer_is_silent() {
        let mut cache = cache_with(0);
        cache.notify();
        assert!(cache.is_empty());
    }

    #[test]
    fn render_handle_is_recorded() {
        let mut cache = cache_with(0);
        cache.set_render_handle(RenderHandle(17));
        assert_eq!(cache.render_handle(), Some(RenderHandle(17)));
    }

    #[test]
    fn debug_reports_observer_presence() {
        let mut cache = cache_with(0);
        assert!(format!("{cache:?}").contains("has_observer: false"));
        cache.attach_observer(|_: &Cell, _: &[Coin]| {}).unwrap();
        assert!(format!("{cache:?}").contains("has_observer: true"));
    }
}
