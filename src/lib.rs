// ============================================================================
// GoldWatch - Library
// ============================================================================
// Dashboard terminal des 5 indicateurs liés à l'or : prix de l'or, indice
// dollar, taux nominal 10 ans, anticipation d'inflation, taux réel.
//
// Relations clés (affichées, pas calculées) :
// - taux réel ≈ taux nominal - anticipation d'inflation
// - taux réel en hausse → or généralement en baisse
// - dollar en hausse → or généralement en baisse
// ============================================================================

pub mod api;    // Clients FRED et Yahoo Finance, source de données agrégée
pub mod app;    // État de l'application
pub mod cache;  // Mémoïsation du fetch avec TTL d'une heure
pub mod export; // Export CSV du snapshot
pub mod models; // Séries temporelles et catalogue des indicateurs
pub mod stats;  // Coeur de calcul : variation et bornes d'axe (fonctions pures)
pub mod ui;     // Interface utilisateur
