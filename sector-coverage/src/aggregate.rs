//! Agrégation des surfaces couvertes par technologie
//!
//! Chaque couple (pylône, secteur) est indépendant: la construction de
//! l'éventail et l'intersection peuvent se faire en parallèle (rayon).
//! Les résultats sont ensuite réduits dans l'ordre d'entrée, sur un seul
//! thread, pour que les totaux soient identiques d'un appel à l'autre.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::area::AreaMethod;
use crate::intersect::{validate_ring, BooleanClipper, Clipper, IntersectionOutcome, Intersector};
use crate::projection::{ToGeographic, UtmProjection};
use crate::sector::{SectorPolygon, DEFAULT_RESOLUTION};
use crate::{Coverage, CoverageError, QueryPolygon, Sector, SectorDiagnostic, Tower};

/// Options d'agrégation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregateOptions {
    /// Segments d'arc par secteur
    pub resolution: usize,

    /// Évaluer les pylônes en parallèle
    pub parallel: bool,

    /// Formule de surface
    pub area_method: AreaMethod,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            parallel: true,
            area_method: AreaMethod::Spherical,
        }
    }
}

/// Résultat brut de l'évaluation d'un secteur
struct SectorOutcome<'a> {
    tower: &'a Tower,
    sector: &'a Sector,
    outcome: IntersectionOutcome,
}

/// Agrège la couverture d'un polygone requête sur un ensemble de pylônes
#[derive(Debug, Clone)]
pub struct Aggregator<P = UtmProjection, C = BooleanClipper> {
    projection: P,
    intersector: Intersector<C>,
    options: AggregateOptions,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(UtmProjection::default(), AggregateOptions::default())
    }
}

impl<P: ToGeographic> Aggregator<P> {
    /// Crée un agrégateur avec le découpage par défaut
    pub fn new(projection: P, options: AggregateOptions) -> Self {
        Self {
            projection,
            intersector: Intersector::new().with_area_method(options.area_method),
            options,
        }
    }
}

impl<P: ToGeographic, C: Clipper> Aggregator<P, C> {
    /// Remplace la primitive de découpage
    pub fn with_clipper<C2: Clipper>(self, clipper: C2) -> Aggregator<P, C2> {
        Aggregator {
            projection: self.projection,
            intersector: Intersector::with_clipper(clipper).with_area_method(self.options.area_method),
            options: self.options,
        }
    }

    pub fn options(&self) -> &AggregateOptions {
        &self.options
    }

    pub fn projection(&self) -> &P {
        &self.projection
    }

    pub fn intersector(&self) -> &Intersector<C> {
        &self.intersector
    }

    /// Empreintes des secteurs d'un pylône (position convertie une seule fois)
    pub fn footprints<'a>(
        &'a self,
        tower: &'a Tower,
    ) -> impl Iterator<Item = (&'a Sector, SectorPolygon)> + 'a {
        let center = self.projection.to_geographic(tower.location);
        tower
            .sectors
            .iter()
            .map(move |sector| (sector, sector.footprint(center, self.options.resolution)))
    }

    /// Calcule la surface couverte par technologie.
    ///
    /// # Errors
    ///
    /// Retourne `InvalidGeometry` si le polygone requête est dégénéré. Les
    /// secteurs invalides n'interrompent pas le calcul: ils sont listés dans
    /// `Coverage::diagnostics` et ne contribuent pas au résultat.
    pub fn aggregate(&self, query: &QueryPolygon, towers: &[Tower]) -> Result<Coverage, CoverageError> {
        if let Err(e) = validate_ring(query.ring()) {
            warn!(error = %e, "Query polygon rejected");
            return Err(e);
        }

        let per_tower: Vec<Vec<SectorOutcome>> = if self.options.parallel {
            towers
                .par_iter()
                .map(|tower| self.evaluate_tower(query, tower))
                .collect()
        } else {
            towers
                .iter()
                .map(|tower| self.evaluate_tower(query, tower))
                .collect()
        };

        let mut coverage = Coverage::default();

        for evaluated in per_tower.into_iter().flatten() {
            coverage.sectors_evaluated += 1;

            match evaluated.outcome {
                IntersectionOutcome::Overlap { area } => {
                    coverage.sectors_overlapping += 1;
                    coverage.result.add(&evaluated.sector.network_type, area);
                }
                IntersectionOutcome::NoOverlap => {}
                IntersectionOutcome::Invalid(error) => {
                    warn!(
                        tower_id = %evaluated.tower.id,
                        sector_id = %evaluated.sector.id,
                        error = %error,
                        "Sector skipped"
                    );
                    coverage.diagnostics.push(SectorDiagnostic {
                        tower_id: evaluated.tower.id.clone(),
                        sector_id: evaluated.sector.id.clone(),
                        network_type: evaluated.sector.network_type.clone(),
                        error,
                    });
                }
            }
        }

        info!(
            towers = towers.len(),
            sectors = coverage.sectors_evaluated,
            overlapping = coverage.sectors_overlapping,
            skipped = coverage.diagnostics.len(),
            "Coverage aggregated"
        );

        Ok(coverage)
    }

    /// Évalue tous les secteurs d'un pylône contre la requête (déjà validée)
    fn evaluate_tower<'a>(&self, query: &QueryPolygon, tower: &'a Tower) -> Vec<SectorOutcome<'a>> {
        debug!(tower_id = %tower.id, sectors = tower.sectors.len(), "Evaluating tower");

        let center = self.projection.to_geographic(tower.location);

        tower
            .sectors
            .iter()
            .map(|sector| {
                let outcome = match sector.validate() {
                    Ok(()) => {
                        let footprint = sector.footprint(center, self.options.resolution);
                        match validate_ring(footprint.ring()) {
                            Ok(()) => self.intersector.intersect_valid(footprint.ring(), query.ring()),
                            Err(e) => IntersectionOutcome::Invalid(e),
                        }
                    }
                    Err(e) => IntersectionOutcome::Invalid(e),
                };

                SectorOutcome {
                    tower,
                    sector,
                    outcome,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::Identity;
    use crate::{GeoPoint, ProjectedPoint};
    use geo::{BoundingRect, MultiPolygon, Polygon};

    fn sector(id: &str, network_type: &str, azimuth: f64, range: f64) -> Sector {
        Sector {
            id: id.to_string(),
            azimuth,
            beam_width: 60.0,
            range,
            network_type: network_type.to_string(),
        }
    }

    fn tower(id: &str, lon: f64, lat: f64, sectors: Vec<Sector>) -> Tower {
        Tower {
            id: id.to_string(),
            location: ProjectedPoint::new(lon, lat),
            sectors,
        }
    }

    fn square(lon: f64, lat: f64, size: f64) -> QueryPolygon {
        QueryPolygon::new(vec![
            GeoPoint::new(lon, lat),
            GeoPoint::new(lon + size, lat),
            GeoPoint::new(lon + size, lat + size),
            GeoPoint::new(lon, lat + size),
        ])
    }

    fn aggregator(parallel: bool) -> Aggregator<Identity> {
        Aggregator::new(
            Identity,
            AggregateOptions {
                parallel,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_sums_by_network_type() {
        let towers = vec![
            tower("A", 51.40, 35.70, vec![
                sector("A-0", "4G", 0.0, 500.0),
                sector("A-1", "4G", 120.0, 500.0),
                sector("A-2", "3G", 240.0, 500.0),
            ]),
        ];
        let query = square(51.35, 35.65, 0.1);

        let coverage = aggregator(false).aggregate(&query, &towers).unwrap();

        assert_eq!(coverage.sectors_evaluated, 3);
        assert_eq!(coverage.sectors_overlapping, 3);
        assert_eq!(coverage.result.len(), 2);

        let four_g = coverage.result.get("4G").unwrap();
        let three_g = coverage.result.get("3G").unwrap();
        assert!((four_g / three_g - 2.0).abs() < 1e-3, "4G={} 3G={}", four_g, three_g);
    }

    #[test]
    fn test_degenerate_sector_is_recovered() {
        let zero_range = sector("A-1", "5G", 90.0, 0.0);
        let towers = vec![tower("A", 51.40, 35.70, vec![
            sector("A-0", "4G", 0.0, 500.0),
            zero_range,
        ])];

        let coverage = aggregator(false).aggregate(&square(51.35, 35.65, 0.1), &towers).unwrap();

        assert!(coverage.result.contains("4G"));
        assert!(!coverage.result.contains("5G"));
        assert_eq!(coverage.diagnostics.len(), 1);
        assert_eq!(coverage.diagnostics[0].sector_id, "A-1");
        assert!(matches!(
            coverage.diagnostics[0].error,
            CoverageError::DegenerateSector { .. }
        ));
    }

    /// Échoue sur tout polygone situé entièrement au sud de `max_lat`
    struct FailingSouthClipper {
        max_lat: f64,
    }

    impl Clipper for FailingSouthClipper {
        fn clip(&self, a: &Polygon, b: &Polygon) -> Result<MultiPolygon, CoverageError> {
            let south = |p: &Polygon| p.bounding_rect().map_or(false, |r| r.max().y <= self.max_lat);
            if south(a) || south(b) {
                return Err(CoverageError::clipping_failure("coincident"));
            }
            BooleanClipper.clip(a, b)
        }
    }

    /// Identité, sauf pour les positions à x négatif (conversion ratée)
    struct NanForNegative;

    impl ToGeographic for NanForNegative {
        fn to_geographic(&self, p: ProjectedPoint) -> GeoPoint {
            if p.x < 0.0 {
                GeoPoint::new(f64::NAN, f64::NAN)
            } else {
                GeoPoint::new(p.x, p.y)
            }
        }
    }

    #[test]
    fn test_clipping_failure_is_recovered() {
        let towers = vec![tower("A", 51.40, 35.70, vec![
            sector("N", "4G", 0.0, 500.0),
            sector("S", "3G", 180.0, 500.0),
        ])];

        let coverage = aggregator(false)
            .with_clipper(FailingSouthClipper { max_lat: 35.70 + 1e-9 })
            .aggregate(&square(51.35, 35.65, 0.1), &towers)
            .unwrap();

        assert!(coverage.result.get("4G").unwrap() > 0.0);
        assert!(!coverage.result.contains("3G"));
        assert_eq!(coverage.sectors_evaluated, 2);
        assert_eq!(coverage.sectors_overlapping, 1);
        assert_eq!(coverage.diagnostics.len(), 1);
        assert_eq!(coverage.diagnostics[0].sector_id, "S");
        assert_eq!(
            coverage.diagnostics[0].error,
            CoverageError::clipping_failure("coincident")
        );
    }

    #[test]
    fn test_non_finite_center_is_recovered() {
        let towers = vec![
            tower("A", 51.40, 35.70, vec![sector("A-0", "4G", 0.0, 500.0)]),
            tower("B", -1.0, 0.0, vec![sector("B-0", "3G", 0.0, 500.0)]),
        ];
        let aggregator = Aggregator::new(NanForNegative, AggregateOptions::default());

        let coverage = aggregator.aggregate(&square(51.35, 35.65, 0.1), &towers).unwrap();

        assert!(coverage.result.contains("4G"));
        assert!(!coverage.result.contains("3G"));
        assert_eq!(coverage.diagnostics.len(), 1);
        assert_eq!(coverage.diagnostics[0].tower_id, "B");
        assert!(matches!(
            coverage.diagnostics[0].error,
            CoverageError::InvalidGeometry { .. }
        ));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let towers: Vec<Tower> = (0..40)
            .map(|i| {
                let lon = 51.30 + (i % 8) as f64 * 0.02;
                let lat = 35.60 + (i / 8) as f64 * 0.02;
                tower(&format!("T{}", i), lon, lat, vec![
                    sector(&format!("T{}-0", i), "4G", 10.0 * i as f64, 1500.0),
                    sector(&format!("T{}-1", i), "3G", 10.0 * i as f64 + 180.0, 2500.0),
                ])
            })
            .collect();
        let query = square(51.33, 35.63, 0.09);

        let sequential = aggregator(false).aggregate(&query, &towers).unwrap();
        let parallel = aggregator(true).aggregate(&query, &towers).unwrap();

        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_invalid_query_short_circuits() {
        let towers = vec![tower("A", 51.40, 35.70, vec![sector("A-0", "4G", 0.0, 500.0)])];
        let query = QueryPolygon::new(vec![GeoPoint::new(51.0, 35.0), GeoPoint::new(51.1, 35.0)]);

        let result = aggregator(false).aggregate(&query, &towers);
        assert!(matches!(result, Err(CoverageError::InvalidGeometry { .. })));
    }
}
