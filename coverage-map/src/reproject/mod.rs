//! Conversion des positions de pylônes vers WGS84
//!
//! Utilise la conversion UTM en pur Rust quand c'est possible, puis PROJ
//! si le binaire est compilé avec le feature `reproject`.

#[cfg(feature = "reproject")]
mod with_proj;

#[cfg(feature = "reproject")]
pub use with_proj::ProjConverter;

use anyhow::Result;
use sector_coverage::{GeoPoint, Identity, ProjectedPoint, ToGeographic, UtmProjection};

/// Conversion choisie selon l'EPSG du jeu de données
#[derive(Debug)]
pub enum SmartConverter {
    /// Coordonnées déjà en WGS84 (EPSG:4326)
    Identity,
    /// UTM WGS84 (pure Rust)
    Utm(UtmProjection),
    /// Conversion via PROJ (si feature activé)
    #[cfg(feature = "reproject")]
    Proj(ProjConverter),
}

impl SmartConverter {
    /// Crée la conversion pour un EPSG source
    pub fn new(source_epsg: u32) -> Result<Self> {
        if source_epsg == 4326 {
            return Ok(Self::Identity);
        }

        if UtmProjection::is_supported_epsg(source_epsg) {
            return Ok(Self::Utm(UtmProjection::from_epsg(source_epsg)?));
        }

        #[cfg(feature = "reproject")]
        {
            return Ok(Self::Proj(ProjConverter::new(source_epsg)?));
        }

        #[cfg(not(feature = "reproject"))]
        anyhow::bail!(
            "Projection EPSG:{} non supportée.\n\
             Projections supportées sans PROJ : 4326 (WGS84), 32601-32660 / 32701-32760 (UTM)\n\
             Pour d'autres projections, compilez avec: cargo build --features reproject",
            source_epsg
        );
    }

    /// Nom court pour les logs
    pub fn name(&self) -> String {
        match self {
            Self::Identity => "identity (EPSG:4326)".to_string(),
            Self::Utm(utm) => format!("utm (EPSG:{})", utm.epsg()),
            #[cfg(feature = "reproject")]
            Self::Proj(p) => format!("proj (EPSG:{})", p.source_epsg()),
        }
    }
}

impl ToGeographic for SmartConverter {
    fn to_geographic(&self, p: ProjectedPoint) -> GeoPoint {
        match self {
            Self::Identity => Identity.to_geographic(p),
            Self::Utm(utm) => utm.to_geographic(p),
            #[cfg(feature = "reproject")]
            Self::Proj(proj) => proj.to_geographic(p),
        }
    }
}
