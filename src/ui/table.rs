// ============================================================================
// Table - Vue tableau des données récentes
// ============================================================================
// Affiche les 30 dernières dates (les plus récentes en premier) avec une
// colonne par indicateur, cellule "-" quand une série n'a pas de point ce
// jour-là. L'équivalent du tableau "données complètes" de l'app d'origine.
// ============================================================================

use std::collections::BTreeMap;

use chrono::NaiveDate;
use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;
use crate::models::MetricCard;

/// Nombre de dates affichées (les plus récentes)
pub const TABLE_ROWS: usize = 30;

/// Construit les lignes du tableau : les `limit` dernières dates de l'union
/// des séries, ordre décroissant, une cellule optionnelle par carte
///
/// Pure mise en forme, même principe que l'export CSV : aucun calcul.
pub fn recent_rows(cards: &[MetricCard], limit: usize) -> Vec<(NaiveDate, Vec<Option<f64>>)> {
    // Union des dates, triée par le BTreeMap
    let mut by_date: BTreeMap<NaiveDate, Vec<Option<f64>>> = BTreeMap::new();

    for (col, card) in cards.iter().enumerate() {
        if let Some(series) = &card.series {
            for point in &series.points {
                by_date
                    .entry(point.date)
                    .or_insert_with(|| vec![None; cards.len()])[col] = Some(point.value);
            }
        }
    }

    // Les plus récentes d'abord, tronquées à limit
    by_date.into_iter().rev().take(limit).collect()
}

/// Dessine la vue tableau
pub fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    let rows_data = recent_rows(&app.cards, TABLE_ROWS);

    if rows_data.is_empty() {
        render_no_data(frame, area);
        return;
    }

    // Header : Date + nom de chaque indicateur
    let mut header_cells = vec![Cell::from("Date").style(
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )];
    for card in &app.cards {
        header_cells.push(Cell::from(card.metric.label()).style(
            Style::default().fg(card.metric.color()).add_modifier(Modifier::BOLD),
        ));
    }
    let header = Row::new(header_cells).bottom_margin(1);

    let rows: Vec<Row> = rows_data
        .iter()
        .map(|(date, cells)| {
            let mut row_cells = vec![Cell::from(date.format("%Y-%m-%d").to_string())];
            for cell in cells {
                let text = match cell {
                    Some(value) => format!("{:.2}", value),
                    None => "-".to_string(),
                };
                row_cells.push(Cell::from(text));
            }
            Row::new(row_cells)
        })
        .collect();

    // Date + une colonne par carte, à largeur égale
    let mut widths = vec![Constraint::Length(12)];
    for _ in &app.cards {
        widths.push(Constraint::Min(14));
    }

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(" 📋 Données récentes ({} derniers jours) ", TABLE_ROWS))
            .title_alignment(Alignment::Center),
    );

    frame.render_widget(table, area);
}

/// Message quand aucune série n'est chargée
fn render_no_data(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" 📋 Données récentes ");

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Aucune donnée à afficher",
            Style::default().fg(Color::Red),
        )),
        Line::from(""),
        Line::from(Span::styled("[ESC] Retour", Style::default().fg(Color::Gray))),
    ];

    let paragraph = Paragraph::new(text).block(block).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MetricId, TimeSeries};
    use crate::stats::compute_change;

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, n).unwrap()
    }

    fn card_with(metric: MetricId, points: &[(u32, f64)]) -> MetricCard {
        let mut series = TimeSeries::new();
        for &(d, v) in points {
            series.push(day(d), v);
        }
        let change = compute_change(&series).unwrap();
        MetricCard::with_data(metric, series, change)
    }

    #[test]
    fn test_no_rows_without_data() {
        let cards: Vec<MetricCard> = MetricId::ALL.into_iter().map(MetricCard::new).collect();
        assert!(recent_rows(&cards, TABLE_ROWS).is_empty());
    }

    #[test]
    fn test_rows_are_union_of_dates_descending() {
        // L'or cote le 1 et le 3, le taux le 2 et le 3
        let cards = vec![
            card_with(MetricId::GoldPrice, &[(1, 2000.0), (3, 2020.0)]),
            card_with(MetricId::NominalRate, &[(2, 4.1), (3, 4.2)]),
        ];

        let rows = recent_rows(&cards, TABLE_ROWS);
        assert_eq!(rows.len(), 3);

        // Ordre décroissant, la plus récente en premier
        assert_eq!(rows[0].0, day(3));
        assert_eq!(rows[0].1, vec![Some(2020.0), Some(4.2)]);

        // Cellules vides sur les trous
        assert_eq!(rows[1].0, day(2));
        assert_eq!(rows[1].1, vec![None, Some(4.1)]);
        assert_eq!(rows[2].0, day(1));
        assert_eq!(rows[2].1, vec![Some(2000.0), None]);
    }

    #[test]
    fn test_rows_truncated_to_most_recent() {
        // 31 jours de données, limite 30 : le jour 1 disparaît
        let points: Vec<(u32, f64)> = (1..=31).map(|d| (d, d as f64)).collect();
        let cards = vec![card_with(MetricId::GoldPrice, &points)];

        let rows = recent_rows(&cards, 30);
        assert_eq!(rows.len(), 30);
        assert_eq!(rows[0].0, day(31));
        assert_eq!(rows[29].0, day(2));
    }
}
