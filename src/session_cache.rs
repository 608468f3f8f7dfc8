//! Session-scoped persistence of the last successful registration.
//!
//! A cache with a TTL: one JSON record under a fixed file name, carrying
//! its own timestamp, checked for staleness at read time. Survives a
//! restart within the window; anything older than five minutes is
//! discarded.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::constants::{REGISTRATION_CACHE_FILE, REGISTRATION_CACHE_TTL_MS};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedRegistration {
    pub strategy_id: Option<u64>,
    pub da_url: String,
    pub tx_hash: String,
    pub saved_at_ms: i64,
}

pub struct RegistrationCache {
    path: PathBuf,
}

impl RegistrationCache {
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(REGISTRATION_CACHE_FILE),
        }
    }

    /// The stored record, if present and younger than the TTL. An expired
    /// record is cleared on the spot.
    pub fn load(&self) -> Option<CachedRegistration> {
        self.load_at(Utc::now().timestamp_millis())
    }

    fn load_at(&self, now_ms: i64) -> Option<CachedRegistration> {
        let raw = fs::read_to_string(&self.path).ok()?;
        let record: CachedRegistration = serde_json::from_str(&raw).ok()?;
        if now_ms - record.saved_at_ms < REGISTRATION_CACHE_TTL_MS {
            Some(record)
        } else {
            self.clear();
            None
        }
    }

    /// Persist a fresh record stamped with the current time. Cache loss is
    /// not fatal; failures are logged and swallowed.
    pub fn store(&self, strategy_id: Option<u64>, da_url: &str, tx_hash: &str) {
        let record = CachedRegistration {
            strategy_id,
            da_url: da_url.to_string(),
            tx_hash: tx_hash.to_string(),
            saved_at_ms: Utc::now().timestamp_millis(),
        };
        if let Some(parent) = self.path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                warn!(error = %e, "Could not create registration cache directory");
                return;
            }
        }
        match serde_json::to_string(&record) {
            Ok(raw) => {
                if let Err(e) = fs::write(&self.path, raw) {
                    warn!(error = %e, "Could not persist registration record");
                }
            }
            Err(e) => warn!(error = %e, "Could not serialize registration record"),
        }
    }

    pub fn clear(&self) {
        let _ = fs::remove_file(&self.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache_in_temp(test: &str) -> RegistrationCache {
        let dir = std::env::temp_dir().join(format!(
            "arena-cache-{}-{}",
            test,
            std::process::id()
        ));
        fs::create_dir_all(&dir).unwrap();
        let cache = RegistrationCache::new(&dir);
        cache.clear();
        cache
    }

    fn record(age_ms: i64) -> CachedRegistration {
        CachedRegistration {
            strategy_id: Some(7),
            da_url: "https://storagescan-galileo.0g.ai/submissions".to_string(),
            tx_hash: "0xabc".to_string(),
            saved_at_ms: 1_700_000_000_000 - age_ms,
        }
    }

    fn write_raw(cache: &RegistrationCache, record: &CachedRegistration) {
        fs::write(&cache.path, serde_json::to_string(record).unwrap()).unwrap();
    }

    #[test]
    fn four_minute_old_record_is_returned_verbatim() {
        let cache = cache_in_temp("fresh");
        let stored = record(4 * 60 * 1000);
        write_raw(&cache, &stored);

        assert_eq!(cache.load_at(1_700_000_000_000), Some(stored));
    }

    #[test]
    fn expired_record_is_discarded_and_cleared() {
        let cache = cache_in_temp("expired");
        write_raw(&cache, &record(5 * 60 * 1000 + 1));

        assert_eq!(cache.load_at(1_700_000_000_000), None);
        // cleared on read, gone for the next load too
        assert_eq!(cache.load_at(1_700_000_000_000), None);
        assert!(!cache.path.exists());
    }

    #[test]
    fn record_at_exactly_the_ttl_is_stale() {
        let cache = cache_in_temp("boundary");
        write_raw(&cache, &record(REGISTRATION_CACHE_TTL_MS));

        assert_eq!(cache.load_at(1_700_000_000_000), None);
    }

    #[test]
    fn store_then_load_round_trips() {
        let cache = cache_in_temp("roundtrip");
        cache.store(Some(9), "https://example.com", "0xdef");

        let loaded = cache.load().expect("freshly stored record");
        assert_eq!(loaded.strategy_id, Some(9));
        assert_eq!(loaded.da_url, "https://example.com");
        assert_eq!(loaded.tx_hash, "0xdef");
        cache.clear();
        assert!(cache.load().is_none());
    }

    #[test]
    fn garbage_on_disk_reads_as_absent() {
        let cache = cache_in_temp("garbage");
        fs::write(&cache.path, "{not json").unwrap();

        assert_eq!(cache.load_at(1_700_000_000_000), None);
    }
}
