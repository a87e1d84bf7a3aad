// ============================================================================
// AxisRange - Bornes Y du graphique
// ============================================================================
// Calcule les bornes de l'axe Y pour le graphique d'une série, selon une
// politique à trois paliers basée sur le ratio amplitude / minimum :
//
//   ratio < 0.05  : série quasi plate, marge = 2 × amplitude
//                   (sinon la courbe serait un trait collé au bord)
//   0.05..0.15    : marge = 0.5 × amplitude
//   ratio >= 0.15 : série à fortes variations, axe basé à zéro [0, max × 1.1]
//
// Les seuils (0.05, 0.15) et multiplicateurs (2, 0.5, 1.1) sont des
// heuristiques d'affichage héritées telles quelles de l'app d'origine ;
// ne pas les "améliorer", la parité de comportement prime.
//
// Le graphique consomme ces bornes SANS les recalculer : c'est une sortie
// du coeur de calcul, pas une affaire de rendu.
// ============================================================================

use crate::models::TimeSeries;
use crate::stats::StatsError;

/// Bornes de l'axe Y pour l'affichage d'une série
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    /// Bornes sous forme de tableau, le format attendu par ratatui
    pub fn bounds(&self) -> [f64; 2] {
        [self.min, self.max]
    }
}

/// Calcule les bornes Y pour une série
///
/// La série fournie est la fenêtre d'affichage complète (90 jours en
/// pratique), pas seulement la fenêtre de lookback.
///
/// # Erreurs
/// `StatsError::EmptySeries` si la série est vide (même contrat que
/// `compute_change` : l'appelant filtre en amont).
pub fn compute_axis_range(series: &TimeSeries) -> Result<AxisRange, StatsError> {
    let (data_min, data_max) = series.min_max().ok_or(StatsError::EmptySeries)?;
    let data_range = data_max - data_min;

    // Ratio calculé une seule fois. None quand data_min <= 0 : le ratio
    // n'est pas une fraction positive exploitable (division par zéro, ou
    // signe inversé pour un minimum négatif), traité comme "grand".
    let ratio = (data_min > 0.0).then(|| data_range / data_min);

    let margin = match ratio {
        // Série quasi plate
        Some(r) if r < 0.05 => data_range * 2.0,
        Some(r) if r < 0.15 => data_range * 0.5,
        // Fortes variations ou ratio indéfini : axe basé à zéro
        _ => {
            return Ok(AxisRange {
                min: 0.0,
                max: data_max * 1.1,
            })
        }
    };

    Ok(AxisRange {
        min: data_min - margin,
        max: data_max + margin,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate};

    fn series_of(values: &[f64]) -> TimeSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut series = TimeSeries::new();
        for (i, &v) in values.iter().enumerate() {
            series.push(start.checked_add_days(Days::new(i as u64)).unwrap(), v);
        }
        series
    }

    #[test]
    fn test_empty_series_is_a_contract_error() {
        assert_eq!(
            compute_axis_range(&TimeSeries::new()),
            Err(StatsError::EmptySeries)
        );
    }

    #[test]
    fn test_near_flat_series_gets_double_margin() {
        // [100, 100.1] : ratio = 0.001 < 0.05, marge = 2 × 0.1
        let range = compute_axis_range(&series_of(&[100.0, 100.1])).unwrap();
        assert!((range.min - 99.8).abs() < 1e-9);
        assert!((range.max - 100.3).abs() < 1e-9);
    }

    #[test]
    fn test_mid_tier_gets_half_margin() {
        // [100, 108] : amplitude 8, ratio 0.08 dans [0.05, 0.15), marge = 4
        let range = compute_axis_range(&series_of(&[100.0, 108.0])).unwrap();
        assert!((range.min - 96.0).abs() < 1e-9);
        assert!((range.max - 112.0).abs() < 1e-9);
    }

    #[test]
    fn test_tier_boundaries_are_half_open() {
        // ratio exactement 0.05 : palier du milieu (intervalle [0.05, 0.15))
        let range = compute_axis_range(&series_of(&[100.0, 105.0])).unwrap();
        assert!((range.min - 97.5).abs() < 1e-9);
        assert!((range.max - 107.5).abs() < 1e-9);

        // ratio exactement 0.15 : palier axe basé à zéro
        let range = compute_axis_range(&series_of(&[100.0, 115.0])).unwrap();
        assert_eq!(range.min, 0.0);
        assert!((range.max - 126.5).abs() < 1e-9);
    }

    #[test]
    fn test_wide_swing_gets_zero_based_axis() {
        // [50, 100] : ratio 1.0 >= 0.15, axe [0, 110]
        let range = compute_axis_range(&series_of(&[50.0, 100.0])).unwrap();
        assert_eq!(range.min, 0.0);
        assert!((range.max - 110.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_minimum_falls_through_to_zero_based() {
        // min = 0 : ratio indéfini, traité comme le palier >= 0.15
        let range = compute_axis_range(&series_of(&[0.0, 4.0])).unwrap();
        assert_eq!(range.min, 0.0);
        assert!((range.max - 4.4).abs() < 1e-9);
    }

    #[test]
    fn test_negative_minimum_falls_through_to_zero_based() {
        // Taux réel négatif : même traitement que min = 0
        let range = compute_axis_range(&series_of(&[-0.5, 1.2])).unwrap();
        assert_eq!(range.min, 0.0);
        assert!((range.max - 1.32).abs() < 1e-9);
    }

    #[test]
    fn test_single_point_is_flat() {
        // Un point : amplitude 0, ratio 0, palier quasi plat, marge 0
        let range = compute_axis_range(&series_of(&[1900.0])).unwrap();
        assert_eq!(range.min, 1900.0);
        assert_eq!(range.max, 1900.0);
    }

    #[test]
    fn test_bounds_shape_for_ratatui() {
        let range = AxisRange { min: 96.0, max: 112.0 };
        assert_eq!(range.bounds(), [96.0, 112.0]);
    }
}
