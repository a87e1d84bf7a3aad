// ============================================================================
// Module : stats
// ============================================================================
// Coeur de calcul du dashboard : fonctions pures sur une TimeSeries
//
// Deux opérations, toutes deux sans état et déterministes :
// - compute_change : dernière valeur et variation sur 30 observations
// - compute_axis_range : bornes Y du graphique (politique à trois paliers)
//
// Même série en entrée => même résultat en sortie, toujours. C'est ce qui
// rend le cache amont sûr et les tests reproductibles.
// ============================================================================

pub mod axis;
pub mod change;

pub use axis::{compute_axis_range, AxisRange};
pub use change::{compute_change, ChangeResult};

use thiserror::Error;

/// Erreur du coeur de calcul
///
/// Une seule variante : la violation du contrat "série non vide". Les
/// appelants filtrent les séries vides en amont ; si l'un d'eux appelle
/// quand même, c'est un bug de l'appelant, pas une condition de données.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatsError {
    /// La série fournie ne contient aucun point
    #[error("empty series: the caller must filter empty series before calling")]
    EmptySeries,
}
