//! Calcul de surface (m²) de polygones en lon/lat

use geo::{ChamberlainDuquetteArea, GeodesicArea, MultiPolygon, Polygon};
use serde::{Deserialize, Serialize};

/// Formule de surface
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaMethod {
    /// Sphère de rayon équatorial (Chamberlain & Duquette), comme les
    /// bibliothèques SIG web usuelles
    #[default]
    Spherical,
    /// Ellipsoïde WGS84 (Karney), plus précis et plus coûteux
    Geodesic,
}

impl AreaMethod {
    /// Surface non signée d'un polygone
    pub fn polygon_area(self, polygon: &Polygon) -> f64 {
        match self {
            Self::Spherical => polygon.chamberlain_duquette_unsigned_area(),
            Self::Geodesic => polygon.geodesic_area_unsigned(),
        }
    }

    /// Surface d'un multipolygone (somme des parties)
    pub fn multi_polygon_area(self, multi: &MultiPolygon) -> f64 {
        multi.iter().map(|p| self.polygon_area(p)).sum()
    }
}
