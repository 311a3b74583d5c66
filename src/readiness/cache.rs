//! Content-addressed result cache with TTL.
//!
//! Keys are SHA-256 digests of the validation inputs, so a changed input is a
//! different key and never needs explicit invalidation. Entries are stored
//! whole behind an `Arc`; a racing insert for the same key replaces one
//! complete entry with another.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::order::ParsedWorkflow;
use crate::parse::types::{MetadataCatalog, ParameterValues};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stable digest of (workflow, metadata snapshot, parameter values).
pub fn compute_key(
    workflow: &ParsedWorkflow,
    catalog: &MetadataCatalog,
    values: &ParameterValues,
) -> Result<CacheKey, serde_json::Error> {
    let mut hasher = Sha256::new();
    update_json(&mut hasher, workflow)?;
    update_json(&mut hasher, catalog)?;
    update_json(&mut hasher, values)?;
    Ok(CacheKey(format!("{:x}", hasher.finalize())))
}

/// NUL never appears in serialized JSON, so it separates the parts.
fn update_json<T: Serialize>(hasher: &mut Sha256, value: &T) -> Result<(), serde_json::Error> {
    hasher.update(serde_json::to_vec(value)?);
    hasher.update([0u8]);
    Ok(())
}

struct CacheEntry<V> {
    value: Arc<V>,
    inserted_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.inserted_at.is_some_and(|at| at.elapsed() >= ttl)
    }
}

/// `Instant` panics on wasm32-unknown-unknown; there entries only leave the
/// cache through `clear`.
fn timestamp() -> Option<Instant> {
    if cfg!(target_arch = "wasm32") {
        None
    } else {
        Some(Instant::now())
    }
}

pub struct ResultCache<V> {
    entries: DashMap<CacheKey, CacheEntry<V>>,
    ttl: Duration,
}

impl<V> ResultCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Expired entries are dropped on access.
    pub fn get(&self, key: &CacheKey) -> Option<Arc<V>> {
        {
            let entry = self.entries.get(key)?;
            if !entry.is_expired(self.ttl) {
                return Some(Arc::clone(&entry.value));
            }
        }
        self.entries.remove_if(key, |_, entry| entry.is_expired(self.ttl));
        None
    }

    pub fn insert(&self, key: CacheKey, value: Arc<V>) {
        self.entries.insert(
            key,
            CacheEntry {
                value,
                inserted_at: timestamp(),
            },
        );
    }

    /// Returns the number of entries dropped.
    pub fn clear(&self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    /// Returns the number of entries dropped.
    pub fn clear_expired(&self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(self.ttl));
        before.saturating_sub(self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::types::Action;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn workflow() -> ParsedWorkflow {
        ParsedWorkflow::from_actions(vec![Action {
            id: "a".into(),
            action_type: "swap".into(),
            parameters: vec![],
            next_actions: vec![],
        }])
        .unwrap()
    }

    fn values(amount: &str) -> ParameterValues {
        ParameterValues::from([(
            "a".to_string(),
            BTreeMap::from([("amount".to_string(), json!(amount))]),
        )])
    }

    #[test]
    fn identical_inputs_share_a_key() {
        let catalog = MetadataCatalog::new();
        let first = compute_key(&workflow(), &catalog, &values("1.0")).unwrap();
        let second = compute_key(&workflow(), &catalog, &values("1.0")).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.as_str().len(), 64);
    }

    #[test]
    fn changed_value_changes_the_key() {
        let catalog = MetadataCatalog::new();
        let before = compute_key(&workflow(), &catalog, &values("1.0")).unwrap();
        let after = compute_key(&workflow(), &catalog, &values("1.5")).unwrap();
        assert_ne!(before, after);
    }

    #[test]
    fn hit_then_clear() {
        let cache = ResultCache::new(Duration::from_secs(60));
        let key = CacheKey("k".into());
        cache.insert(key.clone(), Arc::new(7));
        assert_eq!(cache.get(&key).as_deref(), Some(&7));
        assert_eq!(cache.clear(), 1);
        assert!(cache.get(&key).is_none());
    }

    #[test]
    fn zero_ttl_expires_immediately() {
        let cache = ResultCache::new(Duration::ZERO);
        cache.insert(CacheKey("a".into()), Arc::new(1));
        cache.insert(CacheKey("b".into()), Arc::new(2));
        assert_eq!(cache.clear_expired(), 2);
        assert!(cache.is_empty());

        cache.insert(CacheKey("c".into()), Arc::new(3));
        assert!(cache.get(&CacheKey("c".into())).is_none());
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn live_entries_survive_expiry_sweep() {
        let cache = ResultCache::new(Duration::from_secs(3600));
        cache.insert(CacheKey("a".into()), Arc::new(1));
        assert_eq!(cache.clear_expired(), 0);
        assert_eq!(cache.len(), 1);
    }
}
