// ============================================================================
// Structure : App
// ============================================================================
// État global de l'application TUI. Tous les composants UI lisent depuis
// App, toutes les modifications passent par ses méthodes.
//
// State machine des écrans :
// - Dashboard : les 5 cartes d'indicateurs
// - ChartView : graphique de l'indicateur sélectionné
// - TableView : tableau des données récentes
// - HelpView  : sources de données et relations entre indicateurs
// - InputMode : saisie de la clé API FRED
// ============================================================================

use chrono::{DateTime, Local};
use tracing::warn;

use crate::api::Snapshot;
use crate::models::{MetricCard, MetricId};
use crate::stats::compute_change;

/// Écrans de l'application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Vue principale : les cartes d'indicateurs
    Dashboard,

    /// Vue graphique : courbe de l'indicateur sélectionné
    ChartView,

    /// Vue tableau : les 30 dernières dates de toutes les séries
    TableView,

    /// Vue aide : sources de données et relations clés
    HelpView,

    /// Mode saisie : modification de la clé API FRED
    InputMode,
}

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Une carte par indicateur, dans l'ordre d'affichage
    pub cards: Vec<MetricCard>,

    /// Index de la carte sélectionnée
    pub selected_index: usize,

    /// Écran actuellement affiché
    pub current_screen: Screen,

    /// Clé API FRED courante (modifiable via InputMode)
    pub fred_api_key: String,

    /// Messages d'erreur du dernier fetch (séries en échec)
    pub fetch_errors: Vec<String>,

    /// Heure locale du dernier rafraîchissement réussi
    pub last_updated: Option<DateTime<Local>>,

    /// Two-step quit : première pression de 'q' arme la confirmation
    pub confirm_quit: bool,

    /// Indique si un fetch est en cours (worker occupé)
    pub is_loading: bool,

    /// Message affiché pendant le chargement
    pub loading_message: Option<String>,

    /// Message de statut transitoire (ex: "CSV exporté vers ...")
    pub status_message: Option<String>,

    /// Buffer de saisie pour le mode Input
    pub input_buffer: String,

    /// Prompt affiché en mode Input
    pub input_prompt: String,
}

impl App {
    /// Crée l'application avec les 5 cartes vides (données pas encore chargées)
    pub fn new(fred_api_key: String) -> Self {
        Self {
            running: true,
            cards: MetricId::ALL.into_iter().map(MetricCard::new).collect(),
            selected_index: 0,
            current_screen: Screen::Dashboard,
            fred_api_key,
            fetch_errors: Vec::new(),
            last_updated: None,
            confirm_quit: false,
            is_loading: false,
            loading_message: None,
            status_message: None,
            input_buffer: String::new(),
            input_prompt: String::new(),
        }
    }

    /// Applique le résultat d'un fetch : reconstruit les cartes et calcule
    /// les variations
    ///
    /// Les séries vides sont filtrées ICI : c'est la garde du contrat
    /// non-vide du module stats. Une série absente ou vide donne une carte
    /// sans données, jamais un appel à compute_change sur du vide.
    pub fn apply_snapshot(&mut self, snapshot: &Snapshot, errors: Vec<String>) {
        self.cards = MetricId::ALL
            .into_iter()
            .map(|metric| {
                let series = snapshot.get(&metric).filter(|s| !s.is_empty());
                match series {
                    Some(series) => match compute_change(series) {
                        Ok(change) => MetricCard::with_data(metric, series.clone(), change),
                        Err(e) => {
                            // Inatteignable après le filtre is_empty, mais on
                            // dégrade en carte vide plutôt que paniquer
                            warn!(metric = metric.label(), error = %e, "Change computation failed");
                            MetricCard::new(metric)
                        }
                    },
                    None => MetricCard::new(metric),
                }
            })
            .collect();

        self.fetch_errors = errors;
        self.last_updated = Some(Local::now());
    }

    /// Vérifie si au moins une carte a des données
    pub fn has_any_data(&self) -> bool {
        self.cards.iter().any(|c| c.has_data())
    }

    /// Quitte l'application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Vérifie si l'application doit continuer
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Navigue vers le haut dans les cartes
    pub fn navigate_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    /// Navigue vers le bas dans les cartes
    pub fn navigate_down(&mut self) {
        let max_index = self.cards.len().saturating_sub(1);
        self.selected_index = (self.selected_index + 1).min(max_index);
    }

    /// Retourne la carte sélectionnée
    pub fn selected_card(&self) -> Option<&MetricCard> {
        self.cards.get(self.selected_index)
    }

    // ========================================================================
    // Navigation entre écrans
    // ========================================================================

    pub fn show_chart(&mut self) {
        self.current_screen = Screen::ChartView;
    }

    pub fn show_dashboard(&mut self) {
        self.current_screen = Screen::Dashboard;
    }

    pub fn is_on_dashboard(&self) -> bool {
        self.current_screen == Screen::Dashboard
    }

    pub fn is_on_chart(&self) -> bool {
        self.current_screen == Screen::ChartView
    }

    pub fn show_table(&mut self) {
        self.current_screen = Screen::TableView;
    }

    pub fn is_on_table(&self) -> bool {
        self.current_screen == Screen::TableView
    }

    pub fn show_help(&mut self) {
        self.current_screen = Screen::HelpView;
    }

    pub fn is_on_help(&self) -> bool {
        self.current_screen == Screen::HelpView
    }

    // ========================================================================
    // Two-step quit
    // ========================================================================

    /// Arme la confirmation de quit (première pression de 'q')
    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    /// Annule la confirmation (toute autre touche)
    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }

    // ========================================================================
    // Chargement et statut
    // ========================================================================

    pub fn start_loading(&mut self, message: Option<String>) {
        self.is_loading = true;
        self.loading_message = message;
        self.status_message = None;
    }

    pub fn stop_loading(&mut self) {
        self.is_loading = false;
        self.loading_message = None;
    }

    pub fn is_loading_data(&self) -> bool {
        self.is_loading
    }

    /// Affiche un message de statut (remplacé au prochain chargement)
    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }

    // ========================================================================
    // Input Mode (saisie de la clé API FRED)
    // ========================================================================

    /// Entre en mode input avec un prompt donné
    pub fn start_input(&mut self, prompt: String) {
        self.current_screen = Screen::InputMode;
        self.input_buffer.clear();
        self.input_prompt = prompt;
    }

    /// Annule le mode input et retourne au dashboard
    pub fn cancel_input(&mut self) {
        self.current_screen = Screen::Dashboard;
        self.input_buffer.clear();
        self.input_prompt.clear();
    }

    /// Récupère la valeur saisie et retourne au dashboard
    pub fn submit_input(&mut self) -> String {
        let value = self.input_buffer.clone();
        self.current_screen = Screen::Dashboard;
        self.input_buffer.clear();
        self.input_prompt.clear();
        value
    }

    pub fn append_char(&mut self, c: char) {
        self.input_buffer.push(c);
    }

    pub fn backspace(&mut self) {
        self.input_buffer.pop();
    }

    pub fn is_in_input_mode(&self) -> bool {
        self.current_screen == Screen::InputMode
    }

    /// Tick : appelé à chaque itération de la boucle
    pub fn tick(&mut self) {
        // Rien à mettre à jour entre deux événements pour l'instant
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeSeries;
    use chrono::NaiveDate;

    fn app() -> App {
        App::new("testkey".to_string())
    }

    #[test]
    fn test_app_creation() {
        let app = app();
        assert!(app.is_running());
        assert_eq!(app.cards.len(), 5);
        assert!(!app.has_any_data());
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_navigation_stays_in_bounds() {
        let mut app = app();

        app.navigate_up();
        assert_eq!(app.selected_index, 0);

        for _ in 0..10 {
            app.navigate_down();
        }
        assert_eq!(app.selected_index, 4);
    }

    #[test]
    fn test_apply_snapshot_builds_cards() {
        let mut app = app();

        let mut gold = TimeSeries::new();
        gold.push(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 2000.0);
        gold.push(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), 2050.0);

        let mut snapshot = Snapshot::new();
        snapshot.insert(MetricId::GoldPrice, gold);

        app.apply_snapshot(&snapshot, vec!["10Y Real Rate: timeout".to_string()]);

        // L'or a des données et une variation, les autres cartes sont vides
        assert!(app.cards[0].has_data());
        assert_eq!(app.cards[0].latest_value(), Some(2050.0));
        assert!(!app.cards[2].has_data());

        assert_eq!(app.fetch_errors.len(), 1);
        assert!(app.last_updated.is_some());
    }

    #[test]
    fn test_apply_snapshot_filters_empty_series() {
        // Une série vide dans le snapshot ne doit pas atteindre stats
        let mut app = app();
        let mut snapshot = Snapshot::new();
        snapshot.insert(MetricId::GoldPrice, TimeSeries::new());

        app.apply_snapshot(&snapshot, vec![]);
        assert!(!app.cards[0].has_data());
    }

    #[test]
    fn test_screen_transitions() {
        let mut app = app();
        assert!(app.is_on_dashboard());

        app.show_table();
        assert!(app.is_on_table());
        app.show_dashboard();

        app.show_help();
        assert!(app.is_on_help());
        app.show_dashboard();
        assert!(app.is_on_dashboard());
    }

    #[test]
    fn test_two_step_quit() {
        let mut app = app();
        assert!(!app.is_awaiting_quit_confirmation());

        app.request_quit();
        assert!(app.is_awaiting_quit_confirmation());
        assert!(app.is_running());

        app.quit();
        assert!(!app.is_running());
    }

    #[test]
    fn test_input_mode_roundtrip() {
        let mut app = app();
        app.start_input("FRED API key: ".to_string());
        assert!(app.is_in_input_mode());

        app.append_char('a');
        app.append_char('b');
        app.append_char('c');
        app.backspace();

        let value = app.submit_input();
        assert_eq!(value, "ab");
        assert!(app.is_on_dashboard());
        assert!(app.input_buffer.is_empty());
    }
}
