// ============================================================================
// Dashboard - Rendu de l'interface principale
// ============================================================================
// Dessine les cartes des 5 indicateurs : nom, dernière valeur, variation sur
// la fenêtre de lookback avec indicateur directionnel (▲ / ▼ / —), et date
// de la dernière observation.
//
// Une carte sans référence de comparaison (série d'un seul point, données
// pas chargées) affiche une variation neutre "—", jamais une erreur.
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::{App, Screen};
use crate::models::MetricCard;
use crate::ui::{chart, help, table};

/// Dessine l'interface complète selon l'écran courant
pub fn render(frame: &mut Frame, app: &App) {
    match app.current_screen {
        Screen::Dashboard => render_dashboard(frame, app),
        Screen::ChartView => chart::render_chart(frame, app, frame.size()),
        Screen::TableView => table::render_table(frame, app, frame.size()),
        Screen::HelpView => help::render_help(frame, frame.size()),
        Screen::InputMode => render_input_mode(frame, app),
    }
}

/// Dessine le dashboard (cartes + avertissements + footer)
fn render_dashboard(frame: &mut Frame, app: &App) {
    let chunks = create_layout(frame.size(), app);

    render_header(frame, app, chunks[0]);
    render_cards(frame, app, chunks[1]);
    if chunks.len() == 4 {
        render_warnings(frame, app, chunks[2]);
    }
    render_footer(frame, app, *chunks.last().expect("layout has a footer"));
}

/// Crée le layout principal ; une zone d'avertissements apparaît seulement
/// quand le dernier fetch a des séries en échec
fn create_layout(area: Rect, app: &App) -> Vec<Rect> {
    let mut constraints = vec![
        Constraint::Length(3), // Header
        Constraint::Min(0),    // Cartes
    ];

    if !app.fetch_errors.is_empty() {
        // Une ligne par erreur + bordures
        constraints.push(Constraint::Length(app.fetch_errors.len() as u16 + 2));
    }

    constraints.push(Constraint::Length(3)); // Footer

    Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area)
        .to_vec()
}

/// Dessine le header : titre, heure du dernier rafraîchissement, chargement
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" 💰 GoldWatch ")
        .title_alignment(Alignment::Center);

    let status = if app.is_loading_data() {
        let message = app
            .loading_message
            .as_deref()
            .unwrap_or("Chargement des données...");
        Span::styled(
            message.to_string(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )
    } else if let Some(message) = &app.status_message {
        Span::styled(message.clone(), Style::default().fg(Color::Green))
    } else if let Some(updated) = app.last_updated {
        Span::styled(
            format!(
                "🕐 {} | cache 1h | données FRED + Yahoo Finance",
                updated.format("%Y-%m-%d %H:%M")
            ),
            Style::default().fg(Color::Gray),
        )
    } else {
        Span::styled("En attente de données...", Style::default().fg(Color::Gray))
    };

    let paragraph = Paragraph::new(vec![Line::from(status)])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Indicateur directionnel : hausse, baisse, ou neutre
///
/// Neutre quand la variation est exactement 0 (référence à zéro ou série
/// d'un seul point) : on n'affiche ni hausse ni baisse fictive.
fn direction_arrow(change: f64) -> &'static str {
    if change > 0.0 {
        "▲"
    } else if change < 0.0 {
        "▼"
    } else {
        "—"
    }
}

/// Formate la ligne d'une carte
fn card_line(card: &MetricCard) -> String {
    match &card.change {
        Some(change) => {
            let lookback = change.lookback_count;
            format!(
                " {:<24} {:>12}{:<5}  {} {:+.2}% ({}j)   📅 {}",
                card.metric.label(),
                format!("{:.2}", change.latest_value),
                card.metric.unit(),
                direction_arrow(change.percent_change),
                change.percent_change,
                lookback,
                change.latest_timestamp.format("%Y-%m-%d"),
            )
        }
        None => format!(" {:<24} {:>12}", card.metric.label(), "indisponible"),
    }
}

/// Dessine la liste des cartes d'indicateurs
fn render_cards(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" 📊 Indicateurs ");

    if !app.has_any_data() && !app.is_loading_data() {
        // Aucun indicateur récupéré : message d'aide plutôt que du vide
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "❌ Aucune donnée disponible",
                Style::default().fg(Color::Red),
            )),
            Line::from(Span::styled(
                "Réseau indisponible ou clé API invalide — [r] pour réessayer, [c] pour changer la clé",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(text).block(block).alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = app
        .cards
        .iter()
        .enumerate()
        .map(|(index, card)| {
            let style = if card.has_data() {
                if card.is_positive() {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default().fg(Color::Red)
                }
            } else {
                Style::default().fg(Color::DarkGray)
            };

            let mut list_item = ListItem::new(card_line(card)).style(style);

            if index == app.selected_index {
                list_item = list_item.style(
                    style
                        .add_modifier(Modifier::BOLD)
                        .add_modifier(Modifier::REVERSED),
                );
            }

            list_item
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}

/// Dessine le bloc d'avertissements (séries en échec au dernier fetch)
fn render_warnings(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" ⚠ Avertissements ");

    let text: Vec<Line> = app
        .fetch_errors
        .iter()
        .map(|e| Line::from(Span::styled(e.clone(), Style::default().fg(Color::Yellow))))
        .collect();

    let paragraph = Paragraph::new(text).block(block);
    frame.render_widget(paragraph, area);
}

/// Dessine le footer avec les raccourcis clavier
fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let shortcuts = if app.is_awaiting_quit_confirmation() {
        Line::from(vec![
            Span::styled(
                "⚠  Appuyez sur ",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "[q]",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
            Span::styled(
                " à nouveau pour quitter, ou n'importe quelle autre touche pour annuler ⚠",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ])
    } else {
        Line::from(vec![
            Span::styled("[q]", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw(" Quit  "),
            Span::styled("[↑↓ / j k]", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw(" Naviguer  "),
            Span::styled("[Enter]", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw(" Graphique  "),
            Span::styled("[t]", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw(" Tableau  "),
            Span::styled("[r/R]", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" Rafraîchir  "),
            Span::styled("[e]", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" Export CSV  "),
            Span::styled("[c]", Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)),
            Span::raw(" Clé API  "),
            Span::styled("[?]", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw(" Aide"),
        ])
    };

    let paragraph = Paragraph::new(vec![shortcuts])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Input Mode : saisie de la clé API FRED
// ============================================================================

/// Dessine le dashboard avec la ligne de saisie en bas
fn render_input_mode(frame: &mut Frame, app: &App) {
    let chunks = create_layout(frame.size(), app);

    render_header(frame, app, chunks[0]);
    render_cards(frame, app, chunks[1]);
    if chunks.len() == 4 {
        render_warnings(frame, app, chunks[2]);
    }
    render_input_footer(frame, app, *chunks.last().expect("layout has a footer"));
}

/// Dessine la ligne de saisie (clé masquée : on affiche des •)
fn render_input_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    // La clé API ne s'affiche pas en clair
    let masked: String = "•".repeat(app.input_buffer.chars().count());

    let input_line = Line::from(vec![
        Span::styled(
            &app.input_prompt,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(masked, Style::default().fg(Color::White)),
        Span::styled(
            "█",
            Style::default().fg(Color::White).add_modifier(Modifier::SLOW_BLINK),
        ),
    ]);

    let help_line = Line::from(vec![
        Span::styled("[Enter]", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Span::raw(" Valider et recharger  "),
        Span::styled("[ESC]", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
        Span::raw(" Annuler"),
    ]);

    let paragraph = Paragraph::new(vec![input_line, help_line])
        .block(block)
        .alignment(Alignment::Left);

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
    use chrono::NaiveDate;

    #[test]
    fn test_direction_arrow() {
        assert_eq!(direction_arrow(2.5), "▲");
        assert_eq!(direction_arrow(-0.1), "▼");
        assert_eq!(direction_arrow(0.0), "—");
    }

    #[test]
    fn test_card_line_without_data_is_neutral() {
        let card = MetricCard::new(MetricId::GoldPrice);
        let line = card_line(&card);
        assert!(line.contains("indisponible"));
    }

    #[test]
    fn test_card_line_single_point_shows_flat_change() {
        // Série d'un point : pas de référence, la carte doit afficher une
        // variation neutre, pas une erreur
        let mut series = TimeSeries::new();
        series.push(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(), 2000.0);
        let change = compute_change(&series).unwrap();
        let card = MetricCard::with_data(MetricId::GoldPrice, series, change);

        let line = card_line(&card);
        assert!(line.contains("—"));
        assert!(line.contains("+0.00%"));
        assert!(line.contains("2024-01-15"));
    }
}
