// ============================================================================
// Structure : TimeSeries
// ============================================================================
// Série temporelle journalière : une suite ordonnée de (date, valeur)
//
// Invariants :
// 1. Les dates sont strictement croissantes (garanti par les parseurs API,
//    qui lisent les observations dans l'ordre chronologique)
// 2. Les valeurs sont finies : les points manquants ("." chez FRED, null
//    chez Yahoo) sont filtrés AVANT d'arriver ici (sémantique "dropna")
// ============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Un point d'une série : une date calendaire et sa valeur
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Série temporelle ordonnée, possédée par l'appelant
///
/// Le coeur de calcul (module stats) ne fait que la lire : aucune méthode
/// de stats ne mute une série.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub points: Vec<SeriesPoint>,
}

impl TimeSeries {
    /// Crée une série vide
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Crée une série depuis des points déjà ordonnés
    pub fn from_points(points: Vec<SeriesPoint>) -> Self {
        Self { points }
    }

    /// Ajoute un point à la fin de la série
    ///
    /// Les parseurs appellent push dans l'ordre chronologique, ce qui
    /// préserve l'invariant de dates croissantes.
    pub fn push(&mut self, date: NaiveDate, value: f64) {
        self.points.push(SeriesPoint::new(date, value));
    }

    /// Nombre de points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Vérifie si la série est vide
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Dernier point (le plus récent)
    pub fn last(&self) -> Option<&SeriesPoint> {
        self.points.last()
    }

    /// Itérateur sur les valeurs seules
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }

    /// Minimum et maximum des valeurs, en une seule passe
    ///
    /// CONCEPT RUST : fold pour min/max simultanés
    /// - Une seule traversée au lieu de deux
    /// - None si la série est vide
    pub fn min_max(&self) -> Option<(f64, f64)> {
        if self.points.is_empty() {
            return None;
        }

        Some(self.points.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(min, max), p| (min.min(p.value), max.max(p.value)),
        ))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, n).unwrap()
    }

    #[test]
    fn test_empty_series() {
        let series = TimeSeries::new();
        assert!(series.is_empty());
        assert_eq!(series.len(), 0);
        assert!(series.last().is_none());
        assert!(series.min_max().is_none());
    }

    #[test]
    fn test_push_and_last() {
        let mut series = TimeSeries::new();
        series.push(day(1), 1900.0);
        series.push(day(2), 1920.5);

        assert_eq!(series.len(), 2);
        let last = series.last().unwrap();
        assert_eq!(last.date, day(2));
        assert_eq!(last.value, 1920.5);
    }

    #[test]
    fn test_min_max() {
        let mut series = TimeSeries::new();
        series.push(day(1), 103.2);
        series.push(day(2), 101.7);
        series.push(day(3), 104.9);

        assert_eq!(series.min_max(), Some((101.7, 104.9)));
    }

    #[test]
    fn test_min_max_single_point() {
        let series = TimeSeries::from_points(vec![SeriesPoint::new(day(1), 4.2)]);
        assert_eq!(series.min_max(), Some((4.2, 4.2)));
    }
}
