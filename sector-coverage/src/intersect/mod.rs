//! Intersection de deux anneaux et surface du recouvrement
//!
//! Étapes:
//! 1. validation des deux anneaux (polygones simples fermés)
//! 2. test rapide des rectangles englobants
//! 3. découpage exact via un [`Clipper`]
//! 4. surface du résultat, un recouvrement de surface nulle vaut `NoOverlap`

pub mod clip;
pub mod validate;

pub use clip::{BooleanClipper, Clipper};
pub use validate::validate_ring;

use geo::{BoundingRect, Intersects, LineString, Polygon};

use crate::area::AreaMethod;
use crate::CoverageError;

/// En dessous de ce seuil (m²), un recouvrement est considéré vide:
/// contact par une arête ou un sommet, ruban de largeur nulle.
pub const MIN_OVERLAP_AREA: f64 = 1e-6;

/// Résultat d'une intersection
#[derive(Debug, Clone, PartialEq)]
pub enum IntersectionOutcome {
    /// Pas de recouvrement (ou recouvrement de surface nulle)
    NoOverlap,
    /// Recouvrement, surface en m²
    Overlap { area: f64 },
    /// Entrée invalide ou échec du découpage
    Invalid(CoverageError),
}

impl IntersectionOutcome {
    /// Surface du recouvrement (0 si absent ou invalide)
    pub fn area(&self) -> f64 {
        match self {
            Self::Overlap { area } => *area,
            _ => 0.0,
        }
    }

    pub fn is_overlap(&self) -> bool {
        matches!(self, Self::Overlap { .. })
    }
}

/// Calcule l'intersection de deux anneaux lon/lat
#[derive(Debug, Clone, Default)]
pub struct Intersector<C = BooleanClipper> {
    clipper: C,
    area_method: AreaMethod,
}

impl Intersector {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Clipper> Intersector<C> {
    /// Utilise une autre primitive de découpage
    pub fn with_clipper(clipper: C) -> Self {
        Self {
            clipper,
            area_method: AreaMethod::default(),
        }
    }

    pub fn with_area_method(mut self, area_method: AreaMethod) -> Self {
        self.area_method = area_method;
        self
    }

    pub fn area_method(&self) -> AreaMethod {
        self.area_method
    }

    pub fn clipper(&self) -> &C {
        &self.clipper
    }

    /// Intersecte deux anneaux après validation des deux
    pub fn intersect(&self, a: &LineString, b: &LineString) -> IntersectionOutcome {
        if let Err(e) = validate_ring(a) {
            return IntersectionOutcome::Invalid(e);
        }
        if let Err(e) = validate_ring(b) {
            return IntersectionOutcome::Invalid(e);
        }
        self.intersect_valid(a, b)
    }

    /// Intersecte deux anneaux déjà validés
    pub(crate) fn intersect_valid(&self, a: &LineString, b: &LineString) -> IntersectionOutcome {
        let (Some(box_a), Some(box_b)) = (a.bounding_rect(), b.bounding_rect()) else {
            return IntersectionOutcome::NoOverlap;
        };
        if !box_a.intersects(&box_b) {
            return IntersectionOutcome::NoOverlap;
        }

        let poly_a = Polygon::new(a.clone(), vec![]);
        let poly_b = Polygon::new(b.clone(), vec![]);

        let clipped = match self.clipper.clip(&poly_a, &poly_b) {
            Ok(clipped) => clipped,
            Err(e) => return IntersectionOutcome::Invalid(e),
        };

        if clipped.0.is_empty() {
            return IntersectionOutcome::NoOverlap;
        }

        let area = self.area_method.multi_polygon_area(&clipped);
        if !area.is_finite() {
            return IntersectionOutcome::Invalid(CoverageError::clipping_failure(
                "intersection area is not finite",
            ));
        }
        if area <= MIN_OVERLAP_AREA {
            return IntersectionOutcome::NoOverlap;
        }

        IntersectionOutcome::Overlap { area }
    }
}

/// Intersection avec le découpage et la formule de surface par défaut
pub fn intersect(a: &LineString, b: &LineString) -> IntersectionOutcome {
    Intersector::new().intersect(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{build_sector_polygon, GeoPoint};
    use geo::{line_string, MultiPolygon};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Découpage instrumenté: compte les appels
    #[derive(Default)]
    struct CountingClipper {
        calls: AtomicUsize,
    }

    impl Clipper for CountingClipper {
        fn clip(&self, a: &Polygon, b: &Polygon) -> Result<MultiPolygon, CoverageError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            BooleanClipper.clip(a, b)
        }
    }

    /// Découpage qui échoue toujours
    struct FailingClipper;

    impl Clipper for FailingClipper {
        fn clip(&self, _: &Polygon, _: &Polygon) -> Result<MultiPolygon, CoverageError> {
            Err(CoverageError::clipping_failure("coincident edges"))
        }
    }

    fn square(x0: f64, y0: f64, size: f64) -> LineString {
        line_string![
            (x: x0, y: y0),
            (x: x0 + size, y: y0),
            (x: x0 + size, y: y0 + size),
            (x: x0, y: y0 + size),
            (x: x0, y: y0),
        ]
    }

    fn circle(center: GeoPoint, radius: f64) -> LineString {
        // Disque sans apex: on retire le centre de l'éventail à 360°
        let fan = build_sector_polygon(center, 0.0, 360.0, radius, 128);
        let arc = &fan.ring().0[1..fan.len() - 1];
        LineString::new(arc.to_vec())
    }

    #[test]
    fn test_sector_inside_larger_circle() {
        let center = GeoPoint::new(51.389, 35.6892);
        let sector = build_sector_polygon(center, 0.0, 90.0, 1000.0, 50);
        let query = circle(center, 2000.0);

        let outcome = intersect(sector.ring(), &query);
        let expected = sector.area(AreaMethod::Spherical);

        let IntersectionOutcome::Overlap { area } = outcome else {
            panic!("expected overlap, got {:?}", outcome);
        };
        assert!(((area - expected) / expected).abs() < 1e-3, "area={} expected={}", area, expected);
    }

    #[test]
    fn test_disjoint_bboxes_skip_clipping() {
        let intersector = Intersector::with_clipper(CountingClipper::default());

        let sector = build_sector_polygon(GeoPoint::new(51.3, 35.7), 45.0, 60.0, 1000.0, 50);
        let far = square(52.0, 36.0, 0.1);

        assert_eq!(intersector.intersect(sector.ring(), &far), IntersectionOutcome::NoOverlap);
        assert_eq!(intersector.clipper().calls.load(Ordering::SeqCst), 0);

        // Recouvrement réel: le découpage est appelé une fois
        let near = square(51.29, 35.69, 0.05);
        assert!(intersector.intersect(sector.ring(), &near).is_overlap());
        assert_eq!(intersector.clipper().calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_symmetric_area() {
        let a = square(51.30, 35.70, 0.02);
        let sector = build_sector_polygon(GeoPoint::new(51.31, 35.71), 30.0, 120.0, 1800.0, 50);
        let b = sector.ring().clone();

        let ab = intersect(&a, &b).area();
        let ba = intersect(&b, &a).area();

        assert!(ab > 0.0);
        assert!((ab - ba).abs() / ab < 1e-9, "ab={} ba={}", ab, ba);
    }

    #[test]
    fn test_bbox_overlap_without_geometric_overlap() {
        // Rectangles englobants qui se recouvrent, géométries disjointes
        let a = line_string![
            (x: 0.0, y: 0.0),
            (x: 0.01, y: 0.0),
            (x: 0.0, y: 0.01),
            (x: 0.0, y: 0.0),
        ];
        let b = line_string![
            (x: 0.01, y: 0.01),
            (x: 0.009, y: 0.01),
            (x: 0.01, y: 0.009),
            (x: 0.01, y: 0.01),
        ];
        assert_eq!(intersect(&a, &b), IntersectionOutcome::NoOverlap);
    }

    #[test]
    fn test_edge_touching_is_no_overlap() {
        let a = square(51.0, 35.0, 0.01);
        let b = square(51.01, 35.0, 0.01);
        assert_eq!(intersect(&a, &b), IntersectionOutcome::NoOverlap);
    }

    #[test]
    fn test_invalid_input() {
        let bowtie = line_string![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 1.0),
            (x: 1.0, y: 0.0),
            (x: 0.0, y: 1.0),
            (x: 0.0, y: 0.0),
        ];
        let outcome = intersect(&bowtie, &square(0.0, 0.0, 1.0));
        assert!(matches!(
            outcome,
            IntersectionOutcome::Invalid(CoverageError::InvalidGeometry { .. })
        ));
        assert_eq!(outcome.area(), 0.0);
    }

    #[test]
    fn test_clipping_failure_reported() {
        let intersector = Intersector::with_clipper(FailingClipper);
        let outcome = intersector.intersect(&square(0.0, 0.0, 1.0), &square(0.5, 0.5, 1.0));
        assert!(matches!(
            outcome,
            IntersectionOutcome::Invalid(CoverageError::ClippingFailure { .. })
        ));
    }
}
