//! Time-limited store of estimated centers, owned by the host application.
//!
//! Times are unix seconds supplied by the caller, so the cache never reads a clock itself.

use std::collections::HashMap;
use std::io::{Read, Write};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::center::CenterStrategy;
use crate::error::Result;
use crate::types::Coordinate;

/// Freshness window of a cached center: one day.
pub const DEFAULT_TTL_SECS: u64 = 24 * 60 * 60;


/// Identity a center was computed for: the listings API credential and the strategy used.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub credential: String,
    pub strategy: CenterStrategy,
}

impl CacheKey {
    pub fn new<S: Into<String>>(credential: S, strategy: CenterStrategy) -> CacheKey {
        CacheKey {
            credential: credential.into(),
            strategy: strategy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CachedCenter {
    pub center: Coordinate,
    pub computed_at: u64,
}

#[derive(Serialize, Deserialize)]
struct Entry {
    #[serde(flatten)]
    key: CacheKey,
    #[serde(flatten)]
    value: CachedCenter,
}

#[derive(Debug, Clone)]
pub struct CenterCache {
    ttl_secs: u64,
    entries: HashMap<CacheKey, CachedCenter>,
}

impl Default for CenterCache {
    fn default() -> Self {
        CenterCache::new(DEFAULT_TTL_SECS)
    }
}

impl CenterCache {
    pub fn new(ttl_secs: u64) -> CenterCache {
        CenterCache {
            ttl_secs: ttl_secs,
            entries: HashMap::new(),
        }
    }

    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    fn is_fresh(&self, entry: &CachedCenter, now: u64) -> bool {
        now.saturating_sub(entry.computed_at) < self.ttl_secs
    }

    /// Cached center for key, if computed less than the TTL before `now`.
    pub fn get(&self, key: &CacheKey, now: u64) -> Option<Coordinate> {
        self.entries
            .get(key)
            .filter(|e| self.is_fresh(e, now))
            .map(|e| e.center)
    }

    pub fn insert(&mut self, key: CacheKey, center: Coordinate, now: u64) {
        self.entries.insert(key,
                            CachedCenter {
                                center: center,
                                computed_at: now,
                            });
    }

    /// Return the fresh cached center or compute, store and return a new one. A computation that
    /// yields no center is not cached.
    pub fn get_or_compute<F>(&mut self, key: CacheKey, now: u64, compute: F) -> Option<Coordinate>
        where F: FnOnce() -> Option<Coordinate>
    {
        if let Some(center) = self.get(&key, now) {
            debug!("center cache hit for strategy {}", key.strategy);
            return Some(center);
        }
        let center = compute()?;
        self.insert(key, center, now);
        Some(center)
    }

    /// Drop stale entries, returning how many were removed.
    pub fn purge_expired(&mut self, now: u64) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl_secs;
        self.entries.retain(|_, e| now.saturating_sub(e.computed_at) < ttl);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize all entries as a JSON array.
    pub fn save<W: Write>(&self, writer: W) -> Result<()> {
        let entries: Vec<Entry> = self.entries
            .iter()
            .map(|(k, v)| {
                Entry {
                    key: k.clone(),
                    value: *v,
                }
            })
            .collect();
        serde_json::to_writer(writer, &entries)?;
        Ok(())
    }

    /// Load entries previously written by `save`.
    pub fn load<R: Read>(reader: R, ttl_secs: u64) -> Result<CenterCache> {
        let entries: Vec<Entry> = serde_json::from_reader(reader)?;
        let mut cache = CenterCache::new(ttl_secs);
        for e in entries {
            cache.entries.insert(e.key, e.value);
        }
        Ok(cache)
    }
}
