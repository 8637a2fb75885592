//! Bounded cache of Smartsheet API clients keyed by credential identity
//!
//! Each distinct `(api key, endpoint)` pair gets one client handle, created
//! lazily on first use and reused afterwards. The cache holds at most
//! `capacity` handles; once an insert pushes it over, one victim chosen by the
//! configured [`EvictionPolicy`] is dropped. There is no TTL and no explicit
//! invalidation.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::Result;

/// Default Smartsheet REST endpoint used when a request names none
pub const DEFAULT_ENDPOINT: &str = "https://api.smartsheet.com/2.0";

/// Default number of client handles kept alive
pub const DEFAULT_CAPACITY: usize = 100;

/// Identity of one backing client: SHA-256 over the API key and endpoint.
///
/// The raw key never lives in the cache map or in logs.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CredentialKey(String);

impl CredentialKey {
    /// Derive the key for an API key and an optional endpoint
    #[must_use]
    pub fn derive(api_key: &str, endpoint: Option<&str>) -> Self {
        let endpoint = normalize_endpoint(endpoint);
        let mut hasher = Sha256::new();
        hasher.update(api_key.as_bytes());
        hasher.update([0u8]);
        hasher.update(endpoint.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    /// Full hex digest
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CredentialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0[..12.min(self.0.len())])
    }
}

impl fmt::Debug for CredentialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CredentialKey({self})")
    }
}

/// Trim an endpoint and fall back to [`DEFAULT_ENDPOINT`] when blank
#[must_use]
pub fn normalize_endpoint(endpoint: Option<&str>) -> String {
    match endpoint.map(str::trim) {
        Some(e) if !e.is_empty() => e.trim_end_matches('/').to_string(),
        _ => DEFAULT_ENDPOINT.to_string(),
    }
}

/// Which entry to drop when the cache is over capacity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvictionPolicy {
    /// Oldest inserted entry goes first; lookups never refresh position
    #[default]
    #[serde(alias = "fifo")]
    InsertionOrder,
    /// Least recently used entry goes first; lookups refresh position
    #[serde(alias = "lru")]
    LeastRecentlyUsed,
}

impl EvictionPolicy {
    fn refresh_on_hit(self) -> bool {
        matches!(self, Self::LeastRecentlyUsed)
    }
}

struct Inner<C> {
    entries: HashMap<CredentialKey, Arc<C>>,
    /// Front is the next victim
    order: VecDeque<CredentialKey>,
}

impl<C> Inner<C> {
    fn touch(&mut self, key: &CredentialKey) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            if let Some(k) = self.order.remove(pos) {
                self.order.push_back(k);
            }
        }
    }

    fn pop_victim(&mut self) -> Option<CredentialKey> {
        let victim = self.order.pop_front()?;
        self.entries.remove(&victim);
        Some(victim)
    }
}

/// Cache counters tracked atomically
#[derive(Debug, Default)]
struct CacheCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

/// Point-in-time cache statistics
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsSnapshot {
    /// Lookups served by an existing handle
    pub hits: u64,
    /// Lookups that created a handle
    pub misses: u64,
    /// Handles dropped for capacity
    pub evictions: u64,
    /// Current number of handles
    pub size: usize,
    /// Maximum number of handles
    pub capacity: usize,
    /// Active eviction policy
    pub policy: EvictionPolicy,
}

/// Bounded client cache with an injected eviction policy
pub struct ClientCache<C> {
    inner: Mutex<Inner<C>>,
    capacity: usize,
    policy: EvictionPolicy,
    counters: CacheCounters,
}

impl<C> ClientCache<C> {
    /// Create a cache with the default insertion-order policy
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self::with_policy(capacity, EvictionPolicy::default())
    }

    /// Create a cache with an explicit eviction policy
    #[must_use]
    pub fn with_policy(capacity: usize, policy: EvictionPolicy) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
            capacity: capacity.max(1),
            policy,
            counters: CacheCounters::default(),
        }
    }

    /// Maximum number of live handles
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Active eviction policy
    #[must_use]
    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }

    /// Number of live handles
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Whether the cache holds no handles
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a handle exists for `key`
    #[must_use]
    pub fn contains(&self, key: &CredentialKey) -> bool {
        self.inner.lock().entries.contains_key(key)
    }

    /// Return the handle for `key`, building it with `factory` if absent.
    ///
    /// A failing factory leaves the cache untouched. The lock is held while
    /// the factory runs so a key never ends up with two live handles.
    pub fn get_or_create<F>(&self, key: &CredentialKey, factory: F) -> Result<Arc<C>>
    where
        F: FnOnce() -> Result<C>,
    {
        let mut inner = self.inner.lock();

        if let Some(handle) = inner.entries.get(key).cloned() {
            if self.policy.refresh_on_hit() {
                inner.touch(key);
            }
            self.counters.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(handle);
        }

        let handle = Arc::new(factory()?);
        inner.entries.insert(key.clone(), Arc::clone(&handle));
        inner.order.push_back(key.clone());
        self.counters.misses.fetch_add(1, Ordering::Relaxed);
        debug!(credential = %key, size = inner.entries.len(), "Created API client");

        while inner.entries.len() > self.capacity {
            if let Some(victim) = inner.pop_victim() {
                self.counters.evictions.fetch_add(1, Ordering::Relaxed);
                debug!(credential = %victim, policy = ?self.policy, "Evicted API client");
            }
        }

        Ok(handle)
    }

    /// Drop the entry the policy would evict next, returning its key
    pub fn evict(&self) -> Option<CredentialKey> {
        let victim = self.inner.lock().pop_victim();
        if victim.is_some() {
            self.counters.evictions.fetch_add(1, Ordering::Relaxed);
        }
        victim
    }

    /// Current statistics
    #[must_use]
    pub fn stats(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            evictions: self.counters.evictions.load(Ordering::Relaxed),
            size: self.len(),
            capacity: self.capacity,
            policy: self.policy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use pretty_assertions::assert_eq;

    fn key(n: usize) -> CredentialKey {
        CredentialKey::derive(&format!("key-{n}"), None)
    }

    fn fill(cache: &ClientCache<usize>, range: std::ops::Range<usize>) {
        for n in range {
            cache.get_or_create(&key(n), || Ok(n)).unwrap();
        }
    }

    #[test]
    fn credential_key_is_deterministic() {
        assert_eq!(
            CredentialKey::derive("abc", None),
            CredentialKey::derive("abc", Some(DEFAULT_ENDPOINT))
        );
        assert_eq!(
            CredentialKey::derive("abc", Some("https://api.smartsheet.eu/2.0/")),
            CredentialKey::derive("abc", Some("https://api.smartsheet.eu/2.0"))
        );
        assert_ne!(
            CredentialKey::derive("abc", None),
            CredentialKey::derive("abd", None)
        );
        assert_ne!(
            CredentialKey::derive("abc", None),
            CredentialKey::derive("abc", Some("https://api.smartsheet.eu/2.0"))
        );
    }

    #[test]
    fn credential_key_does_not_expose_api_key() {
        let k = CredentialKey::derive("super-secret-token", None);
        assert!(!k.as_str().contains("super-secret-token"));
        assert_eq!(k.as_str().len(), 64);
        assert_eq!(k.to_string().len(), 12);
    }

    #[test]
    fn blank_endpoint_falls_back_to_default() {
        assert_eq!(normalize_endpoint(None), DEFAULT_ENDPOINT);
        assert_eq!(normalize_endpoint(Some("  ")), DEFAULT_ENDPOINT);
    }

    #[test]
    fn reuses_existing_handle() {
        let cache = ClientCache::new(10);
        let first = cache.get_or_create(&key(1), || Ok(1)).unwrap();
        let second = cache
            .get_or_create(&key(1), || -> Result<usize> { panic!("factory must not run") })
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn failing_factory_inserts_nothing() {
        let cache: ClientCache<usize> = ClientCache::new(10);
        let err = cache
            .get_or_create(&key(1), || Err(Error::Internal("boom".into())))
            .unwrap_err();
        assert!(err.to_string().contains("boom"));
        assert!(cache.is_empty());
    }

    #[test]
    fn never_exceeds_capacity() {
        let cache = ClientCache::new(DEFAULT_CAPACITY);
        fill(&cache, 0..250);
        assert_eq!(cache.len(), DEFAULT_CAPACITY);
        assert_eq!(cache.stats().evictions, 150);
    }

    #[test]
    fn insertion_order_evicts_oldest_even_if_recently_used() {
        let cache = ClientCache::new(3);
        fill(&cache, 0..3);

        // Heavy reuse of the oldest key does not protect it
        for _ in 0..5 {
            cache.get_or_create(&key(0), || Ok(0)).unwrap();
        }
        fill(&cache, 3..4);

        assert!(!cache.contains(&key(0)));
        assert!(cache.contains(&key(1)));
        assert!(cache.contains(&key(2)));
        assert!(cache.contains(&key(3)));
    }

    #[test]
    fn lru_policy_protects_recently_used() {
        let cache = ClientCache::with_policy(3, EvictionPolicy::LeastRecentlyUsed);
        fill(&cache, 0..3);
        cache.get_or_create(&key(0), || Ok(0)).unwrap();
        fill(&cache, 3..4);

        assert!(cache.contains(&key(0)));
        assert!(!cache.contains(&key(1)));
    }

    #[test]
    fn explicit_evict_follows_policy() {
        let cache = ClientCache::new(5);
        fill(&cache, 0..3);
        assert_eq!(cache.evict(), Some(key(0)));
        assert_eq!(cache.evict(), Some(key(1)));
        assert_eq!(cache.len(), 1);

        cache.evict();
        assert_eq!(cache.evict(), None);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let cache = ClientCache::new(0);
        assert_eq!(cache.capacity(), 1);
        fill(&cache, 0..3);
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(&key(2)));
    }

    #[test]
    fn policy_deserializes_from_short_names() {
        let fifo: EvictionPolicy = serde_json::from_str("\"fifo\"").unwrap();
        let lru: EvictionPolicy = serde_json::from_str("\"lru\"").unwrap();
        assert_eq!(fifo, EvictionPolicy::InsertionOrder);
        assert_eq!(lru, EvictionPolicy::LeastRecentlyUsed);
    }
}
