//! Validation des anneaux avant découpage
//!
//! Un anneau valide est fermé, possède au moins 3 sommets distincts,
//! des coordonnées finies et aucune auto-intersection. Deux arêtes non
//! adjacentes peuvent se toucher en un sommet (cas de l'éventail à 360°),
//! mais ni se croiser ni se recouvrir.

use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::{Coord, Line, LineString};

use crate::CoverageError;

/// Tolérance de comparaison des sommets (degrés)
const TOLERANCE: f64 = 1e-12;

/// Vérifie qu'un anneau est un polygone simple fermé
pub fn validate_ring(ring: &LineString) -> Result<(), CoverageError> {
    let coords = &ring.0;

    if let Some(c) = coords.iter().find(|c| !c.x.is_finite() || !c.y.is_finite()) {
        return Err(CoverageError::invalid_geometry(format!(
            "non-finite coordinate ({}, {})",
            c.x, c.y
        )));
    }

    let (Some(&first), Some(&last)) = (coords.first(), coords.last()) else {
        return Err(CoverageError::invalid_geometry("empty ring"));
    };
    if !coords_equal(first, last) {
        return Err(CoverageError::invalid_geometry("ring is not closed"));
    }

    let distinct = count_distinct(&coords[..coords.len() - 1]);
    if distinct < 3 {
        return Err(CoverageError::invalid_geometry(format!(
            "ring has {} distinct vertices, at least 3 required",
            distinct
        )));
    }

    if let Some((i, j)) = find_self_intersection(coords) {
        return Err(CoverageError::invalid_geometry(format!(
            "ring self-intersects (edges {} and {})",
            i, j
        )));
    }

    Ok(())
}

/// Nombre de sommets distincts
fn count_distinct(coords: &[Coord]) -> usize {
    let mut sorted = coords.to_vec();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    sorted.dedup_by(|a, b| coords_equal(*a, *b));
    sorted.len()
}

/// Première paire d'arêtes non adjacentes qui se croisent ou se recouvrent
fn find_self_intersection(coords: &[Coord]) -> Option<(usize, usize)> {
    // Arêtes de longueur nulle ignorées (sommets répétés consécutifs)
    let edges: Vec<Line> = coords
        .windows(2)
        .filter(|w| !coords_equal(w[0], w[1]))
        .map(|w| Line::new(w[0], w[1]))
        .collect();

    let n = edges.len();
    for i in 0..n {
        for j in (i + 2)..n {
            // La première et la dernière arête partagent le point de fermeture
            if i == 0 && j == n - 1 {
                continue;
            }
            if !bboxes_overlap(&edges[i], &edges[j]) {
                continue;
            }
            match line_intersection(edges[i], edges[j]) {
                Some(LineIntersection::SinglePoint { is_proper: true, .. }) => return Some((i, j)),
                Some(LineIntersection::Collinear { .. }) => return Some((i, j)),
                _ => {}
            }
        }
    }

    None
}

fn bboxes_overlap(a: &Line, b: &Line) -> bool {
    a.start.x.min(a.end.x) <= b.start.x.max(b.end.x)
        && b.start.x.min(b.end.x) <= a.start.x.max(a.end.x)
        && a.start.y.min(a.end.y) <= b.start.y.max(b.end.y)
        && b.start.y.min(b.end.y) <= a.start.y.max(a.end.y)
}

/// Compare deux coordonnées avec tolérance
fn coords_equal(a: Coord, b: Coord) -> bool {
    (a.x - b.x).abs() < TOLERANCE && (a.y - b.y).abs() < TOLERANCE
}
