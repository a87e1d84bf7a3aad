// ============================================================================
// Module : api
// ============================================================================
// Clients API et source de données agrégée. Deux providers :
// - Yahoo Finance : prix de l'or et indice dollar (closes journaliers)
// - FRED : taux nominal, anticipation d'inflation, taux réel
// ============================================================================

pub mod fred;
pub mod yahoo;

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use chrono::{Days, Utc};
use tracing::{error, info, instrument};

use crate::models::{MetricId, Provider, TimeSeries};

pub use fred::fetch_fred_series;
pub use yahoo::fetch_daily_closes;

/// Fenêtre de données demandée aux providers, en jours calendaires
pub const WINDOW_DAYS: i64 = 90;

/// Snapshot de données : une série par indicateur récupéré avec succès
///
/// BTreeMap pour un ordre d'itération stable (export CSV reproductible).
pub type Snapshot = BTreeMap<MetricId, TimeSeries>;

/// Source de données agrégée sur les deux providers
///
/// Contrat : fetch_all ne retourne JAMAIS d'erreur globale. Chaque série
/// échoue ou réussit indépendamment ; les échecs sont collectés en strings
/// lisibles. Un snapshot vide + erreurs est un résultat valide.
pub struct DataSource {
    client: reqwest::Client,
}

impl DataSource {
    /// Crée la source de données avec son client HTTP
    ///
    /// User-Agent navigateur : Yahoo bloque les clients sans User-Agent.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .context("Échec de la création du client HTTP")?;

        Ok(Self { client })
    }

    /// Récupère les 5 indicateurs sur la fenêtre demandée
    ///
    /// # Retourne
    /// * snapshot : séries récupérées avec succès (peut être vide)
    /// * erreurs : un message par série en échec
    #[instrument(skip(self, fred_api_key))]
    pub async fn fetch_all(&self, fred_api_key: &str, window_days: i64) -> (Snapshot, Vec<String>) {
        let mut snapshot = Snapshot::new();
        let mut errors = Vec::new();

        let start = Utc::now()
            .date_naive()
            .checked_sub_days(Days::new(window_days as u64))
            .unwrap_or_else(|| Utc::now().date_naive());

        for (i, metric) in MetricId::ALL.into_iter().enumerate() {
            let result = match metric.provider() {
                Provider::Yahoo => {
                    fetch_daily_closes(&self.client, metric.provider_code(), window_days).await
                }
                Provider::Fred => {
                    fetch_fred_series(&self.client, fred_api_key, metric.provider_code(), start)
                        .await
                }
            };

            match result {
                Ok(series) => {
                    info!(
                        metric = metric.label(),
                        points = series.len(),
                        "Series fetched successfully"
                    );
                    snapshot.insert(metric, series);
                }
                Err(e) => {
                    // L'échec d'une série n'interrompt pas les autres
                    error!(metric = metric.label(), error = ?e, "Failed to fetch series");
                    errors.push(format!("{}: {}", metric.label(), e));
                }
            }

            // Petit délai entre les requêtes (rate limiting), inutile
            // après la dernière
            if i + 1 < MetricId::ALL.len() {
                tokio::time::sleep(tokio::time::Duration::from_millis(200)).await;
            }
        }

        info!(
            fetched = snapshot.len(),
            failed = errors.len(),
            "Fetch round finished"
        );
        (snapshot, errors)
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // Test avec de vrais appels réseau : on vérifie seulement le contrat
    // "pas d'erreur globale", pas les données (elles changent).
    #[tokio::test]
    async fn test_fetch_all_never_fails_globally() {
        let source = DataSource::new().unwrap();

        // Clé FRED invalide : les 3 séries FRED doivent échouer proprement,
        // sans empêcher le retour du snapshot (vide ou partiel selon réseau)
        let (snapshot, errors) = source.fetch_all("invalid-key", 30).await;

        assert!(snapshot.len() + errors.len() >= 3);
        for error in &errors {
            assert!(!error.is_empty());
        }
    }
}
