// ============================================================================
// Gestion des événements
// ============================================================================
// Lit les événements clavier crossterm et les convertit en événements
// applicatifs. Le poll avec timeout de 250ms produit des Tick réguliers
// quand aucune touche n'est pressée.
// ============================================================================

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind};

/// Événements de l'application
#[derive(Debug, Clone)]
pub enum Event {
    /// Touche pressée
    Key(KeyEvent),

    /// Tick régulier (pour rafraîchissement de l'affichage)
    Tick,
}

/// Gestionnaire d'événements
pub struct EventHandler;

impl EventHandler {
    pub fn new() -> Self {
        Self
    }

    /// Lit le prochain événement (bloquant, avec timeout de 250ms)
    ///
    /// Filtre sur KeyEventKind::Press : sur certains OS on reçoit Press ET
    /// Release, on ne garde que Press pour éviter les doublons.
    pub fn next(&self) -> Result<Event> {
        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                    Ok(Event::Key(key))
                }
                // Release, resize, souris : ignorés
                _ => Ok(Event::Tick),
            }
        } else {
            Ok(Event::Tick)
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Helpers : identifier les touches
// ============================================================================

/// Touche 'q' : quitter (two-step)
pub fn is_quit_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
    } else {
        false
    }
}

/// Touche Échap
pub fn is_escape_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Esc)
    } else {
        false
    }
}

/// Touche Espace
pub fn is_space_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Char(' '))
    } else {
        false
    }
}

/// Touche Entrée
pub fn is_enter_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Enter)
    } else {
        false
    }
}

/// Flèche haut ou 'k' (vim)
pub fn is_up_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K'))
    } else {
        false
    }
}

/// Flèche bas ou 'j' (vim)
pub fn is_down_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J'))
    } else {
        false
    }
}

/// Touche 'r' : rafraîchir (le cache d'une heure est respecté)
pub fn is_refresh_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Char('r'))
    } else {
        false
    }
}

/// Touche 'R' : rafraîchissement forcé (ignore le cache)
pub fn is_force_refresh_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Char('R'))
    } else {
        false
    }
}

/// Touche 'e' : exporter le snapshot en CSV
pub fn is_export_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Char('e') | KeyCode::Char('E'))
    } else {
        false
    }
}

/// Touche 't' : vue tableau des données récentes
pub fn is_table_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Char('t') | KeyCode::Char('T'))
    } else {
        false
    }
}

/// Touche '?' : vue aide
pub fn is_help_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Char('?'))
    } else {
        false
    }
}

/// Touche 'c' : modifier la clé API FRED
pub fn is_api_key_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
    } else {
        false
    }
}

/// Touche Backspace
pub fn is_backspace_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Backspace)
    } else {
        false
    }
}

/// Caractère valide pour la saisie d'une clé API (alphanumérique)
pub fn is_api_key_char_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Char(c) if c.is_ascii_alphanumeric())
    } else {
        false
    }
}

/// Extrait le caractère d'un événement clavier
pub fn get_char_from_event(event: &Event) -> Option<char> {
    if let Event::Key(key) = event {
        if let KeyCode::Char(c) = key.code {
            return Some(c);
        }
    }
    None
}

// ============================================================================
// Tests
// ============================================================================
