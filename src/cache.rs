use std::hash::Hash;
use std::sync::{Arc, Weak};

use log::debug;
use tokio::task;
use tokio::time::{sleep, Duration};

const CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub enabled: bool,
    pub ttl: Duration,
}

/// Keeps fetched documents around for `ttl`, so a busy page does not hit the
/// upstream on every request.
pub struct Cache<K, V> {
    enabled: bool,
    inner: quick_cache::sync::Cache<K, Arc<V>>,
    ttl: Duration,
}

impl<K, V> Cache<K, V>
where
    K: Clone + Eq + Hash + Send + Sync + std::fmt::Display + 'static,
    V: Send + Sync + 'static,
{
    pub fn new(config: Config) -> Arc<Self> {
        Arc::new(Self {
            enabled: config.enabled,
            ttl: config.ttl,
            inner: quick_cache::sync::Cache::new(CAPACITY),
        })
    }

    pub fn insert(self: Arc<Self>, key: K, value: V) -> Arc<V> {
        let arcd = Arc::new(value);
        if !self.enabled {
            return arcd;
        }

        self.inner.insert(key.clone(), Arc::clone(&arcd));

        // Only evict the entry this insert created; a later insert of the same
        // key runs its own timer.
        let entry = Arc::downgrade(&arcd);
        let self_clone = Arc::clone(&self);
        task::spawn(async move {
            sleep(self_clone.ttl).await;
            if self_clone
                .inner
                .remove_if(&key, |current| Weak::ptr_eq(&Arc::downgrade(current), &entry))
                .is_some()
            {
                debug!("Evicted cached {key}");
            }
        });

        arcd
    }

    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        if !self.enabled {
            return None;
        }

        self.inner.get(key)
    }
}

impl<K, V> std::fmt::Debug for Cache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache")
            .field("enabled", &self.enabled)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
