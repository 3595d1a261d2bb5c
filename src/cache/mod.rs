//! Known-domain caches.
//!
//! `KnownDomainCache` is a fixed-capacity set of domain keys with least-recently-used
//! eviction. Reads count as accesses, so `contains` reorders the cache and is a
//! mutation.
//!
//! `KnownDomainCaches` holds the two instances used by the classifier: the
//! persistent cache and the incognito-only cache. Each is behind its own mutex;
//! locks are never held across an `.await`.

use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};

use lru::LruCache;

use crate::config::KNOWN_DOMAINS_CACHE_CAPACITY;

/// Bounded, recency-ordered set of known domain keys.
pub struct KnownDomainCache {
    // Only presence matters
    cache: LruCache<String, ()>,
}

impl KnownDomainCache {
    /// Creates a cache holding at most `capacity` domains.
    ///
    /// A zero capacity falls back to `KNOWN_DOMAINS_CACHE_CAPACITY`.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .or(NonZeroUsize::new(KNOWN_DOMAINS_CACHE_CAPACITY))
            .unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
        }
    }

    /// Returns whether `domain` is cached, marking it most recently used if so.
    pub fn contains(&mut self, domain: &str) -> bool {
        // get() instead of contains() to update recency
        self.cache.get(domain).is_some()
    }

    /// Adds `domain`, evicting the least recently used entry when full.
    pub fn add(&mut self, domain: &str) {
        self.cache.put(domain.to_string(), ());
    }

    /// Forgets `domain`; absent keys are ignored.
    pub fn remove(&mut self, domain: &str) {
        self.cache.pop(domain);
    }

    /// Removes every domain.
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    /// Number of cached domains.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Returns `true` if no domain is cached.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Maximum number of domains kept before eviction.
    pub fn capacity(&self) -> usize {
        self.cache.cap().get()
    }
}

/// The persistent and incognito known-domain caches.
///
/// Incognito traffic only ever writes to the incognito cache; the incognito cache
/// is consulted only for incognito navigations.
pub struct KnownDomainCaches {
    persistent: Mutex<KnownDomainCache>,
    incognito: Mutex<KnownDomainCache>,
}

impl KnownDomainCaches {
    /// Creates both caches with the same capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            persistent: Mutex::new(KnownDomainCache::new(capacity)),
            incognito: Mutex::new(KnownDomainCache::new(capacity)),
        }
    }

    /// Locks the persistent cache.
    pub fn persistent(&self) -> MutexGuard<'_, KnownDomainCache> {
        // Cache operations cannot leave the set half-updated, so a poisoned
        // lock is still usable
        self.persistent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Locks the incognito cache.
    pub fn incognito(&self) -> MutexGuard<'_, KnownDomainCache> {
        self.incognito.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Locks the cache that incognito (`true`) or normal (`false`) navigations write to.
    pub fn for_writes(&self, is_incognito: bool) -> MutexGuard<'_, KnownDomainCache> {
        if is_incognito {
            self.incognito()
        } else {
            self.persistent()
        }
    }
}

impl Default for KnownDomainCaches {
    fn default() -> Self {
        Self::new(KNOWN_DOMAINS_CACHE_CAPACITY)
    }
}
