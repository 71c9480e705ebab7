//! Conversion via PROJ
//!
//! Ce module est disponible uniquement avec le feature `reproject`.

use std::sync::Mutex;

use anyhow::{Context, Result};
use proj::Proj;
use sector_coverage::{GeoPoint, ProjectedPoint, ToGeographic};
use tracing::warn;

/// Conversion d'un EPSG quelconque vers WGS84 (lon, lat)
pub struct ProjConverter {
    proj: Mutex<Proj>,
    source_epsg: u32,
}

impl std::fmt::Debug for ProjConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjConverter")
            .field("source_epsg", &self.source_epsg)
            .finish()
    }
}

impl ProjConverter {
    /// Crée la conversion EPSG:source → EPSG:4326
    pub fn new(source_epsg: u32) -> Result<Self> {
        let source = format!("EPSG:{}", source_epsg);
        let proj = Proj::new_known_crs(&source, "EPSG:4326", None)
            .context(format!("Failed to create projection from {} to EPSG:4326", source))?;

        Ok(Self {
            proj: Mutex::new(proj),
            source_epsg,
        })
    }

    /// Retourne le SRID source
    pub fn source_epsg(&self) -> u32 {
        self.source_epsg
    }
}

impl ToGeographic for ProjConverter {
    /// Un échec de PROJ donne un point NaN: le secteur est alors rejeté par
    /// la validation et listé dans les diagnostics.
    fn to_geographic(&self, p: ProjectedPoint) -> GeoPoint {
        let converted = match self.proj.lock() {
            Ok(proj) => proj.convert((p.x, p.y)).map_err(|e| e.to_string()),
            Err(_) => Err("PROJ handle poisoned".to_string()),
        };

        match converted {
            Ok((lon, lat)) => GeoPoint::new(lon, lat),
            Err(e) => {
                warn!(x = p.x, y = p.y, error = %e, "Coordinate transformation failed");
                GeoPoint::new(f64::NAN, f64::NAN)
            }
        }
    }
}
