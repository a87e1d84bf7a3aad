// ============================================================================
// Structure : SeriesCache
// ============================================================================
// Mémoïsation du dernier fetch réussi, avec TTL d'une heure, pour limiter
// les appels API (FRED et Yahoo imposent des limites de fréquence).
//
// La clé est (empreinte de la clé API, taille de fenêtre) : changer de clé
// FRED ou de fenêtre invalide l'entrée. L'empreinte évite de garder la clé
// API en clair dans le cache.
//
// Le coeur de calcul (stats) ne voit jamais ce cache : il reçoit toujours
// un snapshot déjà résolu. Le cache est un collaborateur de DataSource.
// ============================================================================

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::api::Snapshot;

/// TTL par défaut : une heure, comme l'app d'origine
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Clé d'une entrée de cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheKey {
    /// Empreinte (hash) de la clé API FRED, pas la clé elle-même
    pub credential_fingerprint: u64,

    /// Taille de la fenêtre demandée, en jours
    pub window_days: i64,
}

impl CacheKey {
    pub fn new(fred_api_key: &str, window_days: i64) -> Self {
        Self {
            credential_fingerprint: fingerprint(fred_api_key),
            window_days,
        }
    }
}

/// Empreinte stable d'une credential pour la durée du process
fn fingerprint(credential: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    credential.hash(&mut hasher);
    hasher.finish()
}

/// Une entrée : le résultat complet d'un fetch (séries + erreurs) et son âge
#[derive(Debug, Clone)]
struct CacheEntry {
    key: CacheKey,
    snapshot: Snapshot,
    errors: Vec<String>,
    fetched_at: Instant,
}

/// Cache mono-entrée avec TTL
///
/// Une seule entrée suffit : l'application ne travaille que sur un couple
/// (clé API, fenêtre) à la fois.
#[derive(Debug)]
pub struct SeriesCache {
    ttl: Duration,
    entry: Option<CacheEntry>,
}

impl SeriesCache {
    /// Cache avec le TTL d'une heure
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    /// Cache avec un TTL arbitraire (utile pour les tests)
    pub fn with_ttl(ttl: Duration) -> Self {
        Self { ttl, entry: None }
    }

    /// Retourne le résultat mémorisé s'il est encore frais pour cette clé
    pub fn get(&self, key: CacheKey) -> Option<(&Snapshot, &[String])> {
        let entry = self.entry.as_ref()?;

        if entry.key != key {
            debug!("Cache key mismatch, entry ignored");
            return None;
        }

        if entry.fetched_at.elapsed() >= self.ttl {
            debug!("Cache entry expired");
            return None;
        }

        debug!(age_secs = entry.fetched_at.elapsed().as_secs(), "Cache hit");
        Some((&entry.snapshot, &entry.errors))
    }

    /// Mémorise le résultat d'un fetch
    pub fn store(&mut self, key: CacheKey, snapshot: Snapshot, errors: Vec<String>) {
        info!(series = snapshot.len(), "Storing fetch result in cache");
        self.entry = Some(CacheEntry {
            key,
            snapshot,
            errors,
            fetched_at: Instant::now(),
        });
    }

    /// Vide le cache (refresh forcé)
    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}

impl Default for SeriesCache {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MetricId, TimeSeries};
    use chrono::NaiveDate;

    fn sample_snapshot() -> Snapshot {
        let mut series = TimeSeries::new();
        series.push(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 2000.0);

        let mut snapshot = Snapshot::new();
        snapshot.insert(MetricId::GoldPrice, series);
        snapshot
    }

    #[test]
    fn test_empty_cache_misses() {
        let cache = SeriesCache::new();
        assert!(cache.get(CacheKey::new("key", 90)).is_none());
    }

    #[test]
    fn test_fresh_entry_hits() {
        let mut cache = SeriesCache::new();
        let key = CacheKey::new("key", 90);
        cache.store(key, sample_snapshot(), vec!["warning".to_string()]);

        let (snapshot, errors) = cache.get(key).unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(errors, &["warning".to_string()]);
    }

    #[test]
    fn test_different_credential_misses() {
        let mut cache = SeriesCache::new();
        cache.store(CacheKey::new("key-a", 90), sample_snapshot(), vec![]);

        // Autre clé API : empreinte différente, pas de hit
        assert!(cache.get(CacheKey::new("key-b", 90)).is_none());
    }

    #[test]
    fn test_different_window_misses() {
        let mut cache = SeriesCache::new();
        cache.store(CacheKey::new("key", 90), sample_snapshot(), vec![]);

        assert!(cache.get(CacheKey::new("key", 30)).is_none());
    }

    #[test]
    fn test_expired_entry_misses() {
        // TTL nul : l'entrée expire immédiatement
        let mut cache = SeriesCache::with_ttl(Duration::ZERO);
        let key = CacheKey::new("key", 90);
        cache.store(key, sample_snapshot(), vec![]);

        assert!(cache.get(key).is_none());
    }

    #[test]
    fn test_invalidate_clears_entry() {
        let mut cache = SeriesCache::new();
        let key = CacheKey::new("key", 90);
        cache.store(key, sample_snapshot(), vec![]);

        cache.invalidate();
        assert!(cache.get(key).is_none());
    }

    #[test]
    fn test_fingerprint_is_stable() {
        assert_eq!(fingerprint("abc"), fingerprint("abc"));
        assert_ne!(fingerprint("abc"), fingerprint("abd"));
    }
}
