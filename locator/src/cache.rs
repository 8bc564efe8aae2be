//! Address cache: the one current endpoint set, swapped atomically.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::endpoint::EndpointSet;

/// Holds the current [`EndpointSet`].
///
/// Starts empty and is only ever replaced by a non-empty set. Readers never block
/// and always see either the old or the new set as a whole.
#[derive(Debug)]
pub struct AddressCache {
    current: ArcSwap<EndpointSet>,
}

impl AddressCache {
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(EndpointSet::new()),
        }
    }

    /// Snapshot of the current set.
    pub fn read(&self) -> Arc<EndpointSet> {
        self.current.load_full()
    }

    pub fn is_empty(&self) -> bool {
        self.current.load().is_empty()
    }

    /// Publishes `endpoints` as the current set and returns the published snapshot.
    ///
    /// An empty set is never published; `None` is returned and the cache is left as is.
    pub fn replace(&self, endpoints: EndpointSet) -> Option<Arc<EndpointSet>> {
        if endpoints.is_empty() {
            return None;
        }
        let published = Arc::new(endpoints);
        self.current.store(published.clone());
        Some(published)
    }
}

impl Default for AddressCache {
    fn default() -> Self {
        Self::new()
    }
}
