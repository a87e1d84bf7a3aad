// ============================================================================
// Structure : MetricId et MetricCard
// ============================================================================
// Catalogue des 5 indicateurs suivis par le dashboard :
//
//   - Prix de l'or (Yahoo Finance, GC=F)
//   - Indice dollar (Yahoo Finance, DX-Y.NYB)
//   - Taux nominal 10 ans (FRED, DGS10)
//   - Anticipation d'inflation 10 ans (FRED, T10YIE)
//   - Taux réel 10 ans (FRED, DFII10)
//
// Relation clé : taux réel ≈ taux nominal - anticipation d'inflation
// ============================================================================

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

use crate::models::TimeSeries;
use crate::stats::ChangeResult;

/// Provider de données pour un indicateur
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provider {
    /// Yahoo Finance (prix de marché, closes journaliers)
    Yahoo,
    /// FRED, Federal Reserve Economic Data (séries de taux)
    Fred,
}

/// Identifiant d'un des 5 indicateurs du dashboard
///
/// CONCEPT RUST : enum fieldless comme catalogue statique
/// - Chaque variant porte ses métadonnées via des méthodes
/// - ALL donne l'ordre d'affichage (le même que l'app d'origine)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MetricId {
    GoldPrice,
    DollarIndex,
    NominalRate,
    BreakevenInflation,
    RealRate,
}

impl MetricId {
    /// Les 5 indicateurs, dans l'ordre d'affichage du dashboard
    pub const ALL: [MetricId; 5] = [
        MetricId::GoldPrice,
        MetricId::DollarIndex,
        MetricId::NominalRate,
        MetricId::BreakevenInflation,
        MetricId::RealRate,
    ];

    /// Nom affiché sur la carte
    pub fn label(&self) -> &'static str {
        match self {
            MetricId::GoldPrice => "Gold Price",
            MetricId::DollarIndex => "US Dollar Index",
            MetricId::NominalRate => "10Y Nominal Rate",
            MetricId::BreakevenInflation => "10Y Inflation Breakeven",
            MetricId::RealRate => "10Y Real Rate",
        }
    }

    /// Unité affichée après la valeur ("$/oz", "%", ou rien)
    pub fn unit(&self) -> &'static str {
        match self {
            MetricId::GoldPrice => "$/oz",
            MetricId::DollarIndex => "",
            MetricId::NominalRate
            | MetricId::BreakevenInflation
            | MetricId::RealRate => "%",
        }
    }

    /// Provider qui sert cet indicateur
    pub fn provider(&self) -> Provider {
        match self {
            MetricId::GoldPrice | MetricId::DollarIndex => Provider::Yahoo,
            _ => Provider::Fred,
        }
    }

    /// Code de la série chez son provider (symbole Yahoo ou série FRED)
    pub fn provider_code(&self) -> &'static str {
        match self {
            MetricId::GoldPrice => "GC=F",
            MetricId::DollarIndex => "DX-Y.NYB",
            MetricId::NominalRate => "DGS10",
            MetricId::BreakevenInflation => "T10YIE",
            MetricId::RealRate => "DFII10",
        }
    }

    /// Couleur de la courbe sur le graphique
    pub fn color(&self) -> Color {
        match self {
            MetricId::GoldPrice => Color::Yellow,
            MetricId::DollarIndex => Color::Green,
            MetricId::NominalRate => Color::Cyan,
            MetricId::BreakevenInflation => Color::Magenta,
            MetricId::RealRate => Color::Blue,
        }
    }
}

/// Une carte du dashboard : un indicateur et ses données chargées
///
/// CONCEPT RUST : Option pour les données optionnelles
/// - series = None : pas encore chargé, ou fetch en échec
/// - change ne peut exister que si series existe (calculé ensemble)
#[derive(Debug, Clone)]
pub struct MetricCard {
    pub metric: MetricId,

    /// Série sur la fenêtre complète (90 jours), None si indisponible
    pub series: Option<TimeSeries>,

    /// Résultat du calcul de variation, None si indisponible
    pub change: Option<ChangeResult>,
}

impl MetricCard {
    /// Carte sans données (état initial ou fetch en échec)
    pub fn new(metric: MetricId) -> Self {
        Self {
            metric,
            series: None,
            change: None,
        }
    }

    /// Carte avec série et variation déjà calculées
    pub fn with_data(metric: MetricId, series: TimeSeries, change: ChangeResult) -> Self {
        Self {
            metric,
            series: Some(series),
            change: Some(change),
        }
    }

    /// Vérifie si les données sont chargées
    pub fn has_data(&self) -> bool {
        self.series.is_some()
    }

    /// Dernière valeur connue
    pub fn latest_value(&self) -> Option<f64> {
        self.change.as_ref().map(|c| c.latest_value)
    }

    /// Variation en pourcentage sur la fenêtre de lookback
    pub fn percent_change(&self) -> Option<f64> {
        self.change.as_ref().map(|c| c.percent_change)
    }

    /// Vérifie si l'indicateur est en hausse (ou stable)
    pub fn is_positive(&self) -> bool {
        self.percent_change().map(|c| c >= 0.0).unwrap_or(false)
    }
}

// ============================================================================
// Tests
// ============================================================================
