// ============================================================================
// API Client : Yahoo Finance
// ============================================================================
// Récupère les closes journaliers d'un symbole depuis l'API chart de Yahoo :
//   https://query1.finance.yahoo.com/v8/finance/chart/{symbole}
//
// Le dashboard n'a besoin que du close de chaque jour : on ignore open,
// high, low et volume. Les closes null (séance sans cotation) sont filtrés,
// la série résultante peut donc être plus courte que la fenêtre demandée.
// ============================================================================

use anyhow::{Context, Result};
use chrono::DateTime;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::models::TimeSeries;

// ============================================================================
// Structures pour parser la réponse JSON de Yahoo Finance
// ============================================================================
// Yahoo retourne un JSON profond ; on ne déclare que les champs utilisés,
// serde ignore le reste
// ============================================================================

#[derive(Debug, Deserialize)]
struct YahooResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Vec<ChartResult>,
    /// Erreur applicative signalée par Yahoo (symbole inconnu, etc.),
    /// renvoyée avec un HTTP 200
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
}

/// Seule la colonne close nous intéresse
#[derive(Debug, Deserialize)]
struct Quote {
    close: Option<Vec<Option<f64>>>,
}

// ============================================================================
// Fonctions publiques de l'API
// ============================================================================

/// Récupère la série des closes journaliers d'un symbole
///
/// # Arguments
/// * `client` - Client HTTP partagé
/// * `symbol` - Symbole Yahoo (ex: "GC=F" pour l'or, "DX-Y.NYB" pour le dollar)
/// * `window_days` - Taille de la fenêtre en jours calendaires
///
/// # Retourne
/// * `Result<TimeSeries>` - Série (date, close) sans les points manquants
#[instrument(skip(client))]
pub async fn fetch_daily_closes(
    client: &reqwest::Client,
    symbol: &str,
    window_days: i64,
) -> Result<TimeSeries> {
    let url = build_yahoo_url(symbol, window_days);
    debug!(url = %url, "Built Yahoo Finance API URL");

    let response = client
        .get(&url)
        .send()
        .await
        .context("Échec de la requête HTTP vers Yahoo Finance")?;

    let status = response.status();
    debug!(status = %status, "Received HTTP response from Yahoo");

    if !status.is_success() {
        anyhow::bail!("Yahoo Finance a retourné une erreur : HTTP {}", status);
    }

    let yahoo_response: YahooResponse = response
        .json()
        .await
        .context("Échec du parsing JSON de la réponse Yahoo")?;

    let series = parse_yahoo_response(yahoo_response, symbol)?;
    debug!(points = series.len(), "Successfully fetched daily closes");
    Ok(series)
}

/// Construit l'URL de l'API chart de Yahoo (intervalle journalier)
fn build_yahoo_url(symbol: &str, window_days: i64) -> String {
    let now = chrono::Utc::now().timestamp();
    let period1 = now - window_days * 24 * 60 * 60;

    format!(
        "https://query1.finance.yahoo.com/v8/finance/chart/{}?interval=1d&period1={}&period2={}",
        symbol, period1, now
    )
}

/// Convertit la réponse Yahoo en TimeSeries des closes
fn parse_yahoo_response(yahoo_response: YahooResponse, symbol: &str) -> Result<TimeSeries> {
    // Yahoo répond HTTP 200 même pour un symbole inconnu : l'erreur est
    // dans le corps JSON
    if let Some(api_error) = yahoo_response.chart.error {
        anyhow::bail!("Yahoo Finance a signalé une erreur pour {} : {}", symbol, api_error);
    }

    let result = yahoo_response
        .chart
        .result
        .into_iter()
        .next()
        .context("Aucune donnée retournée par Yahoo Finance")?;

    let timestamps = result.timestamp.unwrap_or_default();
    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .and_then(|q| q.close)
        .unwrap_or_default();

    let mut series = TimeSeries::new();
    let mut skipped_count = 0;

    for (i, &timestamp) in timestamps.iter().enumerate() {
        // Close null : séance sans cotation, on skip (dropna)
        let close = match closes.get(i).and_then(|&v| v) {
            Some(v) => v,
            None => {
                skipped_count += 1;
                continue;
            }
        };

        let datetime = DateTime::from_timestamp(timestamp, 0).context("Timestamp invalide")?;
        series.push(datetime.date_naive(), close);
    }

    if skipped_count > 0 {
        warn!(
            skipped = skipped_count,
            total = timestamps.len(),
            "Skipped sessions with missing close"
        );
    }

    if series.is_empty() {
        anyhow::bail!("Aucun close valide trouvé pour {}", symbol);
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
    fn test_build_yahoo_url() {
        let url = build_yahoo_url("GC=F", 90);
        assert!(url.contains("GC=F"));
        assert!(url.contains("interval=1d"));
        assert!(url.contains("yahoo.com"));
    }

    #[test]
    fn test_parse_skips_null_closes() {
        let response = YahooResponse {
            chart: Chart {
                error: None,
                result: vec![ChartResult {
                    timestamp: Some(vec![1_704_067_200, 1_704_153_600, 1_704_240_000]),
                    indicators: Indicators {
                        quote: vec![Quote {
                            close: Some(vec![Some(2063.5), None, Some(2071.8)]),
                        }],
                    },
                }],
            },
        };

        let series = parse_yahoo_response(response, "GC=F").unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.points[0].value, 2063.5);
        assert_eq!(series.points[1].value, 2071.8);
    }

    #[test]
    fn test_parse_empty_result_is_an_error() {
        let response = YahooResponse {
            chart: Chart {
                result: vec![],
                error: None,
            },
        };
        assert!(parse_yahoo_response(response, "GC=F").is_err());
    }

    #[test]
    fn test_parse_surfaces_yahoo_api_error() {
        // HTTP 200 mais erreur applicative dans le corps (symbole inconnu)
        let response = YahooResponse {
            chart: Chart {
                result: vec![],
                error: Some(serde_json::json!({
                    "code": "Not Found",
                    "description": "No data found, symbol may be delisted"
                })),
            },
        };

        let err = parse_yahoo_response(response, "BADSYM").unwrap_err();
        assert!(err.to_string().contains("BADSYM"));
        assert!(err.to_string().contains("Not Found"));
    }
}
