//! Session-scoped cache of backend response bodies.
//!
//! Entries expire per endpoint (see [`Endpoint::cache_ttl`]); the listing is
//! reused for ten minutes, summaries for a day.
//!
//! [`Endpoint::cache_ttl`]: crate::Endpoint::cache_ttl

use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

/// How a client call interacts with the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheMode {
    /// Serve a live entry if present, otherwise fetch and store.
    #[default]
    Use,
    /// Always fetch, then overwrite the entry.
    Refresh,
    /// Always fetch; neither read nor write the cache.
    Bypass,
}

impl CacheMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Use => "use",
            Self::Refresh => "refresh",
            Self::Bypass => "bypass",
        }
    }

    pub const fn reads(self) -> bool {
        matches!(self, Self::Use)
    }

    pub const fn writes(self) -> bool {
        !matches!(self, Self::Bypass)
    }
}

impl Display for CacheMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CacheMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "use" => Ok(Self::Use),
            "refresh" => Ok(Self::Refresh),
            "bypass" => Ok(Self::Bypass),
            other => Err(format!(
                "invalid cache mode '{other}', expected one of use, refresh, bypass"
            )),
        }
    }
}

#[derive(Debug, Clone)]
struct CachedBody {
    body: String,
    expires_at: Instant,
}

impl CachedBody {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Thread-safe response cache keyed by request path.
#[derive(Debug, Clone, Default)]
pub struct CacheStore {
    entries: Arc<RwLock<HashMap<String, CachedBody>>>,
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live body for `key`, if any.
    pub async fn get(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.body.clone())
    }

    /// Stores `body` for `ttl`, dropping any entries that have expired.
    /// A zero TTL stores nothing.
    pub async fn put(&self, key: impl Into<String>, body: impl Into<String>, ttl: Duration) {
        if ttl.is_zero() {
            return;
        }

        let now = Instant::now();
        let entry = CachedBody {
            body: body.into(),
            expires_at: now + ttl,
        };
        let mut entries = self.entries.write().await;
        let purged = retain_live(&mut entries, now);
        if purged > 0 {
            tracing::debug!(purged, "purged expired cache entries");
        }
        entries.insert(key.into(), entry);
    }

    /// Drops expired entries and returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        retain_live(&mut entries, Instant::now())
    }

    /// Entry count, expired entries included until purged.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

fn retain_live(entries: &mut HashMap<String, CachedBody>, now: Instant) -> usize {
    let before = entries.len();
    entries.retain(|_, entry| entry.is_live(now));
    before - entries.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = "/api/nifty500-market-data";

    #[tokio::test]
    async fn stores_and_overwrites_bodies() {
        let cache = CacheStore::new();
        assert!(cache.get(LISTING).await.is_none());

        cache.put(LISTING, "[]", Duration::from_secs(60)).await;
        assert_eq!(cache.get(LISTING).await.as_deref(), Some("[]"));

        cache
            .put(LISTING, r#"[{"symbol":"TCS"}]"#, Duration::from_secs(60))
            .await;
        assert_eq!(
            cache.get(LISTING).await.as_deref(),
            Some(r#"[{"symbol":"TCS"}]"#)
        );
    }

    #[tokio::test]
    async fn entries_expire_after_ttl() {
        let cache = CacheStore::new();
        cache
            .put("/api/stock-data/TCS", "{}", Duration::from_millis(50))
            .await;
        assert!(cache.get("/api/stock-data/TCS").await.is_some());

        tokio::time::sleep(Duration::from_millis(80)).await;

        assert!(cache.get("/api/stock-data/TCS").await.is_none());
        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.purge_expired().await, 1);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn zero_ttl_is_not_stored() {
        let cache = CacheStore::new();
        cache.put(LISTING, "[]", Duration::ZERO).await;
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn storing_drops_expired_entries() {
        let cache = CacheStore::new();
        cache
            .put("/api/stock-data/TCS", "{}", Duration::from_millis(20))
            .await;
        cache
            .put("/api/stock-data/INFY", "{}", Duration::from_secs(60))
            .await;

        tokio::time::sleep(Duration::from_millis(40)).await;
        cache.put(LISTING, "[]", Duration::from_secs(60)).await;

        assert_eq!(cache.len().await, 2);
        assert!(cache.get("/api/stock-data/INFY").await.is_some());
        assert_eq!(cache.purge_expired().await, 0);
    }

    #[test]
    fn cache_mode_parses_and_describes_access() {
        assert_eq!("Refresh".parse::<CacheMode>(), Ok(CacheMode::Refresh));
        assert!("sometimes".parse::<CacheMode>().is_err());
        assert_eq!(CacheMode::default(), CacheMode::Use);
        assert!(CacheMode::Use.reads() && CacheMode::Use.writes());
        assert!(!CacheMode::Refresh.reads() && CacheMode::Refresh.writes());
        assert!(!CacheMode::Bypass.reads() && !CacheMode::Bypass.writes());
    }
}
