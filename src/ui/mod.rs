// ============================================================================
// Module : ui
// ============================================================================
// Interface utilisateur (Terminal User Interface)
// ============================================================================

pub mod chart;     // Rendu du graphique ligne
pub mod dashboard; // Rendu des cartes d'indicateurs
pub mod events;    // Gestion des événements clavier
pub mod help;      // Vue aide (sources et relations entre indicateurs)
pub mod table;     // Vue tableau des données récentes

// Re-exports pour simplifier les imports
pub use dashboard::render;
pub use events::{Event, EventHandler};
