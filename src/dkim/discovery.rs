use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use futures::future::join_all;
use tracing::debug;

use crate::resolver::{TxtLookup, fqdn};

pub(crate) trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

struct CacheEntry {
    selectors: Vec<String>,
    expires_at: Instant,
}

/// Probes a candidate-selector list against `<selector>._domainkey.<domain>`
/// and remembers, per domain, which selectors answered.
///
/// All probes for one discovery run are issued concurrently; a failing probe
/// only marks its own selector absent. Cached results short-circuit the
/// probe set until the TTL expires.
pub struct SelectorDiscovery {
    candidates: Vec<String>,
    ttl: Duration,
    clock: Box<dyn Clock>,
    cache: Mutex<HashMap<String, CacheEntry>>,
}

impl SelectorDiscovery {
    pub fn new(candidates: Vec<String>, ttl: Duration) -> Self {
        Self::with_clock(candidates, ttl, Box::new(SystemClock))
    }

    pub(crate) fn with_clock(
        candidates: Vec<String>,
        ttl: Duration,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            candidates,
            ttl,
            clock,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Candidate selectors published by `domain`, freshly probed or from the
    /// per-domain cache.
    pub async fn discover<R: TxtLookup>(&self, resolver: &R, domain: &str) -> Vec<String> {
        let key = domain.trim().trim_end_matches('.').to_ascii_lowercase();
        let now = self.clock.now();

        if let Some(entry) = self.lock_cache().get(&key) {
            if entry.expires_at > now {
                return entry.selectors.clone();
            }
        }

        let probes = self.candidates.iter().map(|selector| async move {
            let name = fqdn(&format!("{selector}._domainkey"), domain);
            match resolver.lookup_txt(&name).await {
                Ok(records) if !records.is_empty() => Some(selector.clone()),
                Ok(_) => None,
                Err(err) => {
                    debug!(selector = %selector, error = %err, "selector probe failed");
                    None
                }
            }
        });
        let selectors: Vec<String> = join_all(probes).await.into_iter().flatten().collect();

        self.lock_cache().insert(
            key,
            CacheEntry {
                selectors: selectors.clone(),
                expires_at: now + self.ttl,
            },
        );
        selectors
    }

    fn lock_cache(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.cache
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
