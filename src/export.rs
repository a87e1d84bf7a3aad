// ============================================================================
// Export CSV
// ============================================================================
// Aplatit le snapshot en un tableau : une ligne par date calendaire (union
// des dates de toutes les séries, ordre croissant), une colonne par
// indicateur, cellule vide quand une série n'a pas de point ce jour-là.
//
// Pure mise en forme : aucun calcul, aucune I/O ici. L'écriture du fichier
// est faite par l'appelant (le worker).
// ============================================================================

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::api::Snapshot;
use crate::models::MetricId;

/// Construit le contenu CSV du snapshot complet
///
/// Les colonnes suivent l'ordre d'affichage du dashboard (MetricId::ALL),
/// en ne gardant que les indicateurs présents dans le snapshot.
pub fn to_csv(snapshot: &Snapshot) -> String {
    // Colonnes effectivement présentes, dans l'ordre d'affichage
    let columns: Vec<MetricId> = MetricId::ALL
        .into_iter()
        .filter(|m| snapshot.contains_key(m))
        .collect();

    // Union des dates de toutes les séries
    // CONCEPT RUST : BTreeMap comme index trié
    // - clé = date, valeur = une cellule optionnelle par colonne
    // - l'itération ressort les dates en ordre croissant
    let mut rows: BTreeMap<NaiveDate, Vec<Option<f64>>> = BTreeMap::new();

    for (col_index, metric) in columns.iter().enumerate() {
        if let Some(series) = snapshot.get(metric) {
            for point in &series.points {
                rows.entry(point.date)
                    .or_insert_with(|| vec![None; columns.len()])[col_index] =
                    Some(point.value);
            }
        }
    }

    // Header
    let mut csv = String::from("date");
    for metric in &columns {
        csv.push(',');
        csv.push_str(metric.label());
    }
    csv.push('\n');

    // Lignes
    for (date, cells) in &rows {
        csv.push_str(&date.format("%Y-%m-%d").to_string());
        for cell in cells {
            csv.push(',');
            if let Some(value) = cell {
                csv.push_str(&format!("{}", value));
            }
        }
        csv.push('\n');
    }

    csv
}

/// Nom de fichier d'export pour une date donnée (ex: gold_data_20240115.csv)
pub fn export_filename(today: NaiveDate) -> String {
    format!("gold_data_{}.csv", today.format("%Y%m%d"))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeSeries;

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, n).unwrap()
    }

    #[test]
    fn test_empty_snapshot_gives_header_only() {
        let csv = to_csv(&Snapshot::new());
        assert_eq!(csv, "date\n");
    }

    #[test]
    fn test_single_series() {
        let mut series = TimeSeries::new();
        series.push(day(1), 2000.0);
        series.push(day(2), 2010.5);

        let mut snapshot = Snapshot::new();
        snapshot.insert(MetricId::GoldPrice, series);

        let csv = to_csv(&snapshot);
        assert_eq!(
            csv,
            "date,Gold Price\n2024-01-01,2000\n2024-01-02,2010.5\n"
        );
    }

    #[test]
    fn test_union_of_dates_with_gaps() {
        // L'or cote le 1 et le 3, le taux nominal le 2 et le 3 :
        // trois lignes, cellules vides sur les trous
        let mut gold = TimeSeries::new();
        gold.push(day(1), 2000.0);
        gold.push(day(3), 2020.0);

        let mut rate = TimeSeries::new();
        rate.push(day(2), 4.1);
        rate.push(day(3), 4.2);

        let mut snapshot = Snapshot::new();
        snapshot.insert(MetricId::GoldPrice, gold);
        snapshot.insert(MetricId::NominalRate, rate);

        let csv = to_csv(&snapshot);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "date,Gold Price,10Y Nominal Rate");
        assert_eq!(lines[1], "2024-01-01,2000,");
        assert_eq!(lines[2], "2024-01-02,,4.1");
        assert_eq!(lines[3], "2024-01-03,2020,4.2");
    }

    #[test]
    fn test_columns_follow_display_order() {
        // Le BTreeMap du snapshot trie par MetricId, mais les colonnes CSV
        // doivent suivre l'ordre du dashboard (MetricId::ALL)
        let mut snapshot = Snapshot::new();
        let mut series = TimeSeries::new();
        series.push(day(1), 1.0);
        snapshot.insert(MetricId::RealRate, series.clone());
        snapshot.insert(MetricId::GoldPrice, series);

        let csv = to_csv(&snapshot);
        assert!(csv.starts_with("date,Gold Price,10Y Real Rate\n"));
    }

    #[test]
    fn test_export_filename() {
        assert_eq!(export_filename(day(15)), "gold_data_20240115.csv");
    }
}
