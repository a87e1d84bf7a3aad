// ============================================================================
// Help - Vue aide
// ============================================================================
// Notice sur les sources de données, la fréquence de mise à jour, le cache
// et les relations entre indicateurs — le contenu de l'encart "données" de
// l'app d'origine, porté à l'écran au lieu de rester en commentaire.
// ============================================================================

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Dessine la vue aide
pub fn render_help(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" ℹ Données ")
        .title_alignment(Alignment::Center);

    let section = |title: &str| {
        Line::from(Span::styled(
            title.to_string(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ))
    };
    let item = |text: &str| Line::from(format!("  {}", text));

    let text = vec![
        Line::from(""),
        section("Sources de données"),
        item("Prix de l'or, indice dollar : Yahoo Finance"),
        item("Taux (nominal, réel, anticipation d'inflation) : FRED"),
        Line::from(""),
        section("Fréquence de mise à jour"),
        item("Or et dollar : chaque jour de cotation"),
        item("Taux : selon le calendrier de publication FRED"),
        Line::from(""),
        section("Délai des données"),
        item("Cache d'une heure pour limiter les appels API"),
        item("[r] relance (cache respecté), [R] force un rechargement"),
        Line::from(""),
        section("Relations clés"),
        item("taux réel ≈ taux nominal - anticipation d'inflation"),
        item("taux réel ↑ → or généralement ↓"),
        item("indice dollar ↑ → or généralement ↓"),
        Line::from(""),
        Line::from(Span::styled(
            "⚠ Données fournies à titre indicatif, pas un conseil d'investissement",
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "[ESC] Retour",
            Style::default().fg(Color::Gray),
        )),
    ];

    let paragraph = Paragraph::new(text).block(block).alignment(Alignment::Left);
    frame.render_widget(paragraph, area);
}
