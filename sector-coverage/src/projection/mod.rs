//! Conversion des coordonnées projetées vers WGS84 (pure Rust)
//!
//! Le jeu de pylônes est exprimé dans une projection UTM fixe
//! (zone 39N pour Téhéran, EPSG:32639). La conversion n'intervient qu'au
//! moment de construire les secteurs.

mod ellipsoid;
mod utm;

pub use ellipsoid::WGS84;
pub use utm::{central_meridian, utm_to_geographic};

use crate::{CoverageError, GeoPoint, ProjectedPoint};

/// Conversion d'un point projeté vers des coordonnées géographiques.
///
/// Fonction totale: un point hors de la zone configurée donne un résultat
/// non défini, c'est à l'appelant de garantir la cohérence du jeu de données.
pub trait ToGeographic: Sync {
    fn to_geographic(&self, p: ProjectedPoint) -> GeoPoint;
}

/// Projection UTM WGS84 (EPSG:326xx / 327xx)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtmProjection {
    zone: u8,
    south: bool,
}

impl UtmProjection {
    /// Crée une projection UTM pour une zone 1..=60
    pub fn new(zone: u8, south: bool) -> Result<Self, CoverageError> {
        if !(1..=60).contains(&zone) {
            return Err(CoverageError::UnsupportedProjection(format!(
                "UTM zone {} outside 1..=60",
                zone
            )));
        }
        Ok(Self { zone, south })
    }

    /// Crée la projection depuis un code EPSG UTM WGS84
    pub fn from_epsg(epsg: u32) -> Result<Self, CoverageError> {
        match epsg {
            32601..=32660 => Self::new((epsg - 32600) as u8, false),
            32701..=32760 => Self::new((epsg - 32700) as u8, true),
            _ => Err(CoverageError::UnsupportedProjection(format!(
                "EPSG:{} is not a WGS84 UTM zone",
                epsg
            ))),
        }
    }

    /// Vérifie si l'EPSG est une zone UTM WGS84
    pub fn is_supported_epsg(epsg: u32) -> bool {
        matches!(epsg, 32601..=32660 | 32701..=32760)
    }

    pub fn zone(&self) -> u8 {
        self.zone
    }

    pub fn is_south(&self) -> bool {
        self.south
    }

    /// Code EPSG correspondant
    pub fn epsg(&self) -> u32 {
        let base = if self.south { 32700 } else { 32600 };
        base + self.zone as u32
    }
}

impl Default for UtmProjection {
    /// UTM 39N (Téhéran)
    fn default() -> Self {
        Self {
            zone: 39,
            south: false,
        }
    }
}

impl ToGeographic for UtmProjection {
    fn to_geographic(&self, p: ProjectedPoint) -> GeoPoint {
        utm_to_geographic(p.x, p.y, self.zone, self.south)
    }
}

/// Pas de conversion: x = longitude, y = latitude (EPSG:4326)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Identity;

impl ToGeographic for Identity {
    fn to_geographic(&self, p: ProjectedPoint) -> GeoPoint {
        GeoPoint::new(p.x, p.y)
    }
}

impl<T: ToGeographic + ?Sized> ToGeographic for &T {
    fn to_geographic(&self, p: ProjectedPoint) -> GeoPoint {
        (**self).to_geographic(p)
    }
}

impl<T: ToGeographic + ?Sized> ToGeographic for Box<T> {
    fn to_geographic(&self, p: ProjectedPoint) -> GeoPoint {
        (**self).to_geographic(p)
    }
}
