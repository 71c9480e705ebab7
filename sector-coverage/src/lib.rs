//! # sector-coverage
//!
//! Estimation de la couverture cellulaire d'une zone quelconque, par
//! technologie réseau (2G/3G/4G/5G...), à partir d'un catalogue de pylônes
//! et de leurs secteurs d'antenne (azimut, ouverture, portée).
//!
//! ## Features
//!
//! - Conversion UTM → WGS84 en pur Rust (zone 39N par défaut)
//! - Éventails de secteur par destination géodésique sphérique
//! - Intersection exacte polygone/polygone (`geo::BooleanOps`), jamais
//!   d'approximation par rectangles englobants
//! - Agrégation parallèle (rayon) avec réduction déterministe
//! - Erreurs par secteur non fatales, collectées en diagnostics
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sector_coverage::{aggregate, GeoPoint, QueryPolygon};
//!
//! let query = QueryPolygon::new(vec![
//!     GeoPoint::new(51.35, 35.68),
//!     GeoPoint::new(51.42, 35.68),
//!     GeoPoint::new(51.42, 35.73),
//!     GeoPoint::new(51.35, 35.73),
//! ]);
//!
//! let coverage = aggregate(&query, &towers)?;
//! for (network_type, area) in coverage.result.iter() {
//!     println!("{}: {:.0} m²", network_type, area);
//! }
//! ```

pub mod aggregate;
pub mod area;
pub mod error;
pub mod intersect;
pub mod projection;
pub mod sector;
pub mod types;

pub use aggregate::{AggregateOptions, Aggregator};
pub use area::AreaMethod;
pub use error::CoverageError;
pub use intersect::{intersect, BooleanClipper, Clipper, IntersectionOutcome, Intersector};
pub use projection::{Identity, ToGeographic, UtmProjection};
pub use sector::{build_sector_polygon, SectorPolygon, DEFAULT_RESOLUTION};
pub use types::{
    Coverage, CoverageResult, GeoPoint, ProjectedPoint, QueryPolygon, Sector, SectorDiagnostic,
    Tower,
};

/// Calcule la couverture d'un polygone requête, avec les réglages par défaut
/// (UTM 39N, résolution 50, surface sphérique, évaluation parallèle).
///
/// # Errors
///
/// Retourne `CoverageError::InvalidGeometry` si le polygone requête n'est pas
/// un polygone simple d'au moins 3 sommets distincts.
pub fn aggregate(query: &QueryPolygon, towers: &[Tower]) -> Result<Coverage, CoverageError> {
    Aggregator::default().aggregate(query, towers)
}
