// ============================================================================
// ChangeCalculator - Variation sur fenêtre glissante
// ============================================================================
// Calcule, pour une série ordonnée : la dernière valeur, la valeur 30
// observations en arrière (ou moins si la série est courte), et la variation
// absolue et en pourcentage entre les deux.
//
// La fenêtre est comptée en OBSERVATIONS, pas en jours calendaires : une
// série journalière avec des trous (week-ends, jours fériés FRED) compare
// simplement le dernier point au 30e point non manquant précédent. C'est le
// comportement de l'app d'origine.
// ============================================================================

use chrono::NaiveDate;

use crate::models::TimeSeries;
use crate::stats::StatsError;

/// Nombre maximal d'observations pour la comparaison glissante
pub const LOOKBACK_OBSERVATIONS: usize = 30;

/// Résultat du calcul de variation pour une série
///
/// Immutable, recalculé à chaque appel. Fonction pure de la série :
/// deux appels sur le même snapshot donnent un résultat bit-identique.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeResult {
    /// Dernière valeur de la série
    pub latest_value: f64,

    /// Date du dernier point
    pub latest_timestamp: NaiveDate,

    /// Nombre d'observations réellement disponibles pour la comparaison,
    /// plafonné à 30 ; 0 si la série a moins de 2 points
    pub lookback_count: usize,

    /// Valeur lookback_count observations avant la dernière,
    /// None seulement quand lookback_count == 0
    pub reference_value: Option<f64>,

    /// latest_value - reference_value, ou 0 sans référence
    pub absolute_change: f64,

    /// Variation en %, définie à 0 quand la référence vaut 0 ou n'existe pas
    pub percent_change: f64,
}

/// Calcule la variation glissante d'une série
///
/// # Erreurs
/// `StatsError::EmptySeries` si la série est vide. Les appelants filtrent
/// les séries vides en amont ; cette erreur signale un contrat violé.
///
/// # Exemple
/// Série de 31 points de 1900.0 à 2000.0 : lookback_count = 30,
/// reference_value = 1900.0, absolute_change = 100.0, percent_change ≈ 5.26.
pub fn compute_change(series: &TimeSeries) -> Result<ChangeResult, StatsError> {
    let last = series.last().ok_or(StatsError::EmptySeries)?;

    let latest_value = last.value;
    let latest_timestamp = last.date;

    // min(30, len - 1) : avec 31 points on remonte de 30 observations,
    // avec k <= 30 points on remonte de k - 1, avec 1 point de 0
    let lookback_count = LOOKBACK_OBSERVATIONS.min(series.len() - 1);

    if lookback_count == 0 {
        // Un seul point : pas de référence, variation neutre
        return Ok(ChangeResult {
            latest_value,
            latest_timestamp,
            lookback_count: 0,
            reference_value: None,
            absolute_change: 0.0,
            percent_change: 0.0,
        });
    }

    // Point lookback_count observations avant le dernier
    let reference_value = series.points[series.len() - 1 - lookback_count].value;
    let absolute_change = latest_value - reference_value;

    // Référence à zéro : variation % définie à 0 plutôt qu'une division
    // par zéro. Une référence de 0.0 exactement est un cas plausible
    // (taux réel qui traverse zéro), pas une donnée corrompue.
    let percent_change = if reference_value == 0.0 {
        0.0
    } else {
        absolute_change / reference_value * 100.0
    };

    Ok(ChangeResult {
        latest_value,
        latest_timestamp,
        lookback_count,
        reference_value: Some(reference_value),
        absolute_change,
        percent_change,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    /// Série de n points journaliers interpolés linéairement de first à last
    fn linear_series(n: usize, first: f64, last: f64) -> TimeSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut series = TimeSeries::new();
        for i in 0..n {
            let t = if n > 1 { i as f64 / (n - 1) as f64 } else { 0.0 };
            let date = start.checked_add_days(Days::new(i as u64)).unwrap();
            series.push(date, first + t * (last - first));
        }
        series
    }

    #[test]
    fn test_empty_series_is_a_contract_error() {
        let series = TimeSeries::new();
        assert_eq!(compute_change(&series), Err(StatsError::EmptySeries));
    }

    #[test]
    fn test_single_point_has_no_reference() {
        let series = linear_series(1, 1950.0, 1950.0);
        let result = compute_change(&series).unwrap();

        assert_eq!(result.latest_value, 1950.0);
        assert_eq!(result.lookback_count, 0);
        assert_eq!(result.reference_value, None);
        assert_eq!(result.absolute_change, 0.0);
        assert_eq!(result.percent_change, 0.0);
    }

    #[test]
    fn test_short_series_uses_all_available_points() {
        // k = 10 points : lookback = k - 1 = 9, référence = premier point
        let series = linear_series(10, 100.0, 109.0);
        let result = compute_change(&series).unwrap();

        assert_eq!(result.lookback_count, 9);
        assert_eq!(result.reference_value, Some(100.0));
        assert_eq!(result.absolute_change, 9.0);
    }

    #[test]
    fn test_lookback_capped_at_30() {
        // 90 points, valeur = index : on ne remonte que de 30 observations
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut series = TimeSeries::new();
        for i in 0..90u64 {
            series.push(start.checked_add_days(Days::new(i)).unwrap(), i as f64);
        }

        let result = compute_change(&series).unwrap();
        assert_eq!(result.lookback_count, 30);
        // index 89 - 30 = 59
        assert_eq!(result.reference_value, Some(59.0));
        assert_eq!(result.absolute_change, 30.0);
    }

    #[test]
    fn test_exactly_31_points_gold_scenario() {
        // Scénario concret : 31 points de 1900.0 à 2000.0
        let series = linear_series(31, 1900.0, 2000.0);
        let result = compute_change(&series).unwrap();

        assert_eq!(result.latest_value, 2000.0);
        assert_eq!(result.lookback_count, 30);
        assert_eq!(result.reference_value, Some(1900.0));
        assert_eq!(result.absolute_change, 100.0);
        assert!((result.percent_change - 100.0 / 1900.0 * 100.0).abs() < 1e-9);
        assert!((result.percent_change - 5.263).abs() < 1e-3);
    }

    #[test]
    fn test_zero_reference_degenerates_to_zero_percent() {
        // Taux réel qui part de 0.0 : pas de division par zéro
        let mut series = TimeSeries::new();
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        series.push(start, 0.0);
        series.push(start.checked_add_days(Days::new(1)).unwrap(), 1.5);

        let result = compute_change(&series).unwrap();
        assert_eq!(result.reference_value, Some(0.0));
        assert_eq!(result.absolute_change, 1.5);
        assert_eq!(result.percent_change, 0.0);
    }

    #[test]
    fn test_negative_reference_flips_sign() {
        // Référence -5.0, dernière valeur -3.0 : variation absolue +2.0
        // mais pourcentage -40.0 (signe inversé par la référence négative).
        // Comportement voulu, identique à l'app d'origine.
        let mut series = TimeSeries::new();
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        series.push(start, -5.0);
        series.push(start.checked_add_days(Days::new(1)).unwrap(), -3.0);

        let result = compute_change(&series).unwrap();
        assert_eq!(result.absolute_change, 2.0);
        assert_eq!(result.percent_change, -40.0);
    }

    #[test]
    fn test_idempotence() {
        let series = linear_series(45, 102.0, 98.5);
        let first = compute_change(&series).unwrap();
        let second = compute_change(&series).unwrap();
        assert_eq!(first, second);
    }
}
