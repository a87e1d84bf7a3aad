// ============================================================================
// Chart - Rendu du graphique pour un indicateur
// ============================================================================
// Affiche la courbe de l'indicateur sélectionné sur la fenêtre complète
// (90 jours).
//
// Les bornes Y viennent de stats::compute_axis_range, calculées sur la série
// AFFICHÉE entière : le rendu ne recalcule jamais d'échelle lui-même. C'est
// une sortie du coeur de calcul, pas une affaire de graphique.
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::app::App;
use crate::models::{MetricCard, TimeSeries};
use crate::stats::{compute_axis_range, AxisRange};

/// Dessine l'écran graphique pour la carte sélectionnée
pub fn render_chart(frame: &mut Frame, app: &App, area: Rect) {
    let card = match app.selected_card() {
        Some(card) => card,
        None => {
            render_no_data(frame, area, "Aucun indicateur sélectionné");
            return;
        }
    };

    let series = match &card.series {
        Some(series) if !series.is_empty() => series,
        _ => {
            let msg = format!("Pas de données pour {}", card.metric.label());
            render_no_data(frame, area, &msg);
            return;
        }
    };

    // Bornes Y fournies par le coeur de calcul. Err est inatteignable après
    // la garde non-vide ci-dessus ; on dégrade en message plutôt que paniquer.
    let range = match compute_axis_range(series) {
        Ok(range) => range,
        Err(_) => {
            render_no_data(frame, area, "Série vide");
            return;
        }
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Graphique
        ])
        .split(area)
        .to_vec();

    render_chart_header(frame, card, chunks[0]);
    render_chart_graph(frame, card, series, range, chunks[1]);
}

/// Dessine le header avec la dernière valeur et la variation
fn render_chart_header(frame: &mut Frame, card: &MetricCard, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" 📈 {} ", card.metric.label()));

    let text = if let (Some(value), Some(change)) = (card.latest_value(), card.percent_change()) {
        let color = if change >= 0.0 { Color::Green } else { Color::Red };
        let arrow = if change >= 0.0 { "▲" } else { "▼" };

        vec![Line::from(vec![
            Span::raw("Dernière valeur: "),
            Span::styled(
                format!("{:.2}{}", value, card.metric.unit()),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(format!("{} {:+.2}%", arrow, change), Style::default().fg(color)),
            Span::raw("  "),
            Span::styled(
                "[ESC]",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" Retour"),
        ])]
    } else {
        vec![Line::from("Chargement...")]
    };

    let paragraph = Paragraph::new(text).block(block).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

/// Dessine la courbe avec les bornes Y imposées par AxisRange
fn render_chart_graph(
    frame: &mut Frame,
    card: &MetricCard,
    series: &TimeSeries,
    range: AxisRange,
    area: Rect,
) {
    // Points (x, y) : x = index de l'observation, y = valeur
    let points: Vec<(f64, f64)> = series
        .values()
        .enumerate()
        .map(|(i, value)| (i as f64, value))
        .collect();

    if points.is_empty() {
        render_no_data(frame, area, "Pas de données à afficher");
        return;
    }

    let color = card.metric.color();
    let unit = card.metric.unit();

    let datasets = vec![Dataset::default()
        .name(card.metric.label())
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(&points)];

    // Labels X : première et dernière date de la fenêtre
    let first_date = series.points.first().map(|p| p.date.format("%d/%m").to_string());
    let last_date = series.points.last().map(|p| p.date.format("%d/%m").to_string());

    let x_axis = Axis::default()
        .title("Date")
        .style(Style::default().fg(Color::Gray))
        .bounds([0.0, (points.len() - 1) as f64])
        .labels(vec![
            Span::raw(first_date.unwrap_or_default()),
            Span::raw(last_date.unwrap_or_default()),
        ]);

    // Bornes Y : celles d'AxisRange, telles quelles
    let [y_min, y_max] = range.bounds();
    let y_axis = Axis::default()
        .title(if unit.is_empty() { "Valeur" } else { unit })
        .style(Style::default().fg(Color::Gray))
        .bounds(range.bounds())
        .labels(vec![
            Span::raw(format!("{:.2}", y_min)),
            Span::raw(format!("{:.2}", (y_min + y_max) / 2.0)),
            Span::raw(format!("{:.2}", y_max)),
        ]);

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(format!(" {} - 90 jours ", card.metric.label())),
        )
        .x_axis(x_axis)
        .y_axis(y_axis);

    frame.render_widget(chart, area);
}

/// Affiche un message quand il n'y a pas de données à afficher
fn render_no_data(frame: &mut Frame, area: Rect, message: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" ⚠ Erreur ");

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(Color::Red))),
        Line::from(""),
        Line::from(Span::styled("[ESC] Retour", Style::default().fg(Color::Gray))),
    ];

    let paragraph = Paragraph::new(text).block(block).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}
