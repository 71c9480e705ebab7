//! Types d'erreurs pour le crate sector-coverage

use thiserror::Error;

/// Erreurs pouvant survenir lors du calcul de couverture
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoverageError {
    /// Polygone dégénéré, non fermé ou auto-intersecté
    #[error("Invalid geometry: {reason}")]
    InvalidGeometry { reason: String },

    /// Secteur inexploitable (portée nulle, ouverture hors de (0, 360])
    #[error("Degenerate sector {sector_id}: {reason}")]
    DegenerateSector { sector_id: String, reason: String },

    /// La primitive de découpage n'a pas pu résoudre l'intersection
    #[error("Polygon clipping failed: {reason}")]
    ClippingFailure { reason: String },

    /// Projection source non reconnue
    #[error("Unsupported projection: {0}")]
    UnsupportedProjection(String),
}

impl CoverageError {
    /// Crée une erreur de géométrie invalide
    pub fn invalid_geometry(reason: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            reason: reason.into(),
        }
    }

    /// Crée une erreur de secteur dégénéré
    pub fn degenerate_sector(sector_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DegenerateSector {
            sector_id: sector_id.into(),
            reason: reason.into(),
        }
    }

    /// Crée une erreur de découpage
    pub fn clipping_failure(reason: impl Into<String>) -> Self {
        Self::ClippingFailure {
            reason: reason.into(),
        }
    }

    /// Nom court du type d'erreur (utilisé dans les rapports)
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidGeometry { .. } => "InvalidGeometry",
            Self::DegenerateSector { .. } => "DegenerateSector",
            Self::ClippingFailure { .. } => "ClippingFailure",
            Self::UnsupportedProjection(_) => "UnsupportedProjection",
        }
    }
}
