//! Cache observer that stands in for the map's marker layer.
//!
//! A map front end keeps one marker per revealed cache and redraws its popup
//! whenever the cache's contents change. The headless engine has no map, so
//! [`MarkerLayer`] hands out [`RenderHandle`]s and the attached
//! [`MarkerCallback`] logs each popup refresh instead of drawing it.

use std::rc::Rc;

use geocoin_caches::{Cache, CacheError, CacheObserver, RenderHandle};
use geocoin_types::{Cell, Coin};
use tracing::debug;

/// Observer attached to a single cache.
pub struct MarkerCallback {
    handle: RenderHandle,
    refreshes: Rc<std::cell::Cell<u64>>,
}

impl CacheObserver for MarkerCallback {
    fn on_cache_changed(&mut self, cell: &Cell, coins: &[Coin]) {
        self.refreshes.set(self.refreshes.get().saturating_add(1));
        debug!(
            marker = self.handle.0,
            cell = %cell,
            coins = coins.len(),
            top = ?coins.last().map(Coin::label),
            "Marker popup refreshed"
        );
    }
}

/// Issues render handles and counts popup refreshes across all markers.
#[derive(Debug, Default)]
pub struct MarkerLayer {
    next_handle: u64,
    refreshes: Rc<std::cell::Cell<u64>>,
}

impl MarkerLayer {
    /// Create an empty layer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Give `cache` a marker: a fresh render handle and an observer that
    /// refreshes it.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ObserverAlreadyAttached`] if the cache already
    /// has a marker.
    pub fn attach(&mut self, cache: &mut Cache) -> Result<RenderHandle, CacheError> {
        let handle = RenderHandle(self.next_handle);
        cache.attach_observer(MarkerCallback {
            handle,
            refreshes: Rc::clone(&self.refreshes),
        })?;
        cache.set_render_handle(handle);
        self.next_handle = self.next_handle.saturating_add(1);
        Ok(handle)
    }

    /// Number of markers placed.
    pub const fn marker_count(&self) -> u64 {
        self.next_handle
    }

    /// Total popup refreshes across all markers.
    pub fn refreshes(&self) -> u64 {
        self.refreshes.get()
    }
}
