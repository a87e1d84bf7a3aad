// ============================================================================
// API Client : FRED (Federal Reserve Economic Data)
// ============================================================================
// Récupère une série d'observations depuis l'API FRED :
//   GET /fred/series/observations?series_id=...&api_key=...&file_type=json
//
// Particularité du format FRED : les valeurs sont des STRINGS, et une valeur
// manquante est la string ".". On les filtre ici (sémantique "dropna") pour
// que le reste de l'application ne voie que des points valides.
// ============================================================================

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::models::TimeSeries;

const FRED_BASE_URL: &str = "https://api.stlouisfed.org/fred/series/observations";

// ============================================================================
// Structures pour parser la réponse JSON de FRED
// ============================================================================

#[derive(Debug, Deserialize)]
struct FredResponse {
    observations: Vec<FredObservation>,
}

/// Une observation FRED : date "YYYY-MM-DD" et valeur en string ("." = manquant)
#[derive(Debug, Deserialize)]
struct FredObservation {
    date: String,
    value: String,
}

// ============================================================================
// Fonctions publiques de l'API
// ============================================================================

/// Récupère une série FRED à partir d'une date de début
///
/// # Arguments
/// * `client` - Client HTTP partagé
/// * `api_key` - Clé API FRED
/// * `series_id` - Code de la série (ex: "DGS10", "T10YIE", "DFII10")
/// * `start` - Première date d'observation demandée
///
/// # Retourne
/// * `Result<TimeSeries>` - Série sans les points manquants, ou erreur
#[instrument(skip(client, api_key))]
pub async fn fetch_fred_series(
    client: &reqwest::Client,
    api_key: &str,
    series_id: &str,
    start: NaiveDate,
) -> Result<TimeSeries> {
    let url = build_fred_url(api_key, series_id, start);
    debug!(series_id, %start, "Built FRED API URL");

    let response = client
        .get(&url)
        .send()
        .await
        .context("Échec de la requête HTTP vers FRED")?;

    let status = response.status();
    debug!(status = %status, "Received HTTP response from FRED");

    if !status.is_success() {
        anyhow::bail!("FRED a retourné une erreur : HTTP {}", status);
    }

    let fred_response: FredResponse = response
        .json()
        .await
        .context("Échec du parsing JSON de la réponse FRED")?;

    let series = parse_fred_observations(fred_response, series_id)?;
    debug!(points = series.len(), "Successfully fetched FRED series");
    Ok(series)
}

/// Construit l'URL de l'API FRED
fn build_fred_url(api_key: &str, series_id: &str, start: NaiveDate) -> String {
    format!(
        "{}?series_id={}&api_key={}&file_type=json&observation_start={}",
        FRED_BASE_URL,
        series_id,
        api_key,
        start.format("%Y-%m-%d")
    )
}

/// Convertit les observations FRED en TimeSeries, en filtrant les manquants
fn parse_fred_observations(response: FredResponse, series_id: &str) -> Result<TimeSeries> {
    let total = response.observations.len();
    let mut series = TimeSeries::new();
    let mut skipped_count = 0;

    // Les observations arrivent en ordre chronologique : push préserve
    // l'invariant de dates croissantes de TimeSeries
    for obs in response.observations {
        // "." = valeur manquante chez FRED (jour férié, donnée pas encore
        // publiée). On skip, la série peut être plus courte que la fenêtre.
        if obs.value == "." {
            skipped_count += 1;
            continue;
        }

        let date = NaiveDate::parse_from_str(&obs.date, "%Y-%m-%d")
            .with_context(|| format!("Date FRED invalide : {}", obs.date))?;
        let value: f64 = obs
            .value
            .parse()
            .with_context(|| format!("Valeur FRED invalide : {}", obs.value))?;

        series.push(date, value);
    }

    if skipped_count > 0 {
        warn!(
            skipped = skipped_count,
            total,
            "Skipped missing FRED observations"
        );
    }

    if series.is_empty() {
        anyhow::bail!("Aucune observation valide pour la série FRED {}", series_id);
    }

    Ok(series)
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_fred_url() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let url = build_fred_url("testkey", "DGS10", start);

        assert!(url.contains("series_id=DGS10"));
        assert!(url.contains("api_key=testkey"));
        assert!(url.contains("file_type=json"));
        assert!(url.contains("observation_start=2024-01-15"));
    }

    #[test]
    fn test_parse_skips_missing_values() {
        // Le "." du 2 janvier (jour férié) doit disparaître de la série
        let response = FredResponse {
            observations: vec![
                FredObservation {
                    date: "2024-01-01".to_string(),
                    value: "3.95".to_string(),
                },
                FredObservation {
                    date: "2024-01-02".to_string(),
                    value: ".".to_string(),
                },
                FredObservation {
                    date: "2024-01-03".to_string(),
                    value: "4.02".to_string(),
                },
            ],
        };

        let series = parse_fred_observations(response, "DGS10").unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.points[0].value, 3.95);
        assert_eq!(series.points[1].value, 4.02);
    }

    #[test]
    fn test_parse_all_missing_is_an_error() {
        let response = FredResponse {
            observations: vec![FredObservation {
                date: "2024-01-01".to_string(),
                value: ".".to_string(),
            }],
        };

        assert!(parse_fred_observations(response, "DGS10").is_err());
    }

    #[test]
    fn test_parse_invalid_value_is_an_error() {
        let response = FredResponse {
            observations: vec![FredObservation {
                date: "2024-01-01".to_string(),
                value: "n/a".to_string(),
            }],
        };

        assert!(parse_fred_observations(response, "DGS10").is_err());
    }
}
