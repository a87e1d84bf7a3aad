// ============================================================================
// Module : models
// ============================================================================
// Structures de données de l'application : séries temporelles et catalogue
// des indicateurs suivis
// ============================================================================

pub mod metric; // Catalogue des 5 indicateurs et cartes du dashboard
pub mod series; // Série temporelle (date, valeur)

// Re-export des structures principales pour simplifier les imports
pub use metric::{MetricCard, MetricId, Provider};
pub use series::{SeriesPoint, TimeSeries};
