//! Construction de l'empreinte d'un secteur (éventail)
//!
//! Le secteur est approché par un éventail linéaire par morceaux: l'apex
//! au pylône, puis `resolution + 1` points de l'arc obtenus par destination
//! géodésique sphérique (haversine), puis retour à l'apex.

use geo::{Coord, HaversineDestination, LineString, Point, Polygon};

use crate::area::AreaMethod;
use crate::{GeoPoint, Sector};

/// Nombre de segments d'arc par défaut (compromis pour l'interactif)
pub const DEFAULT_RESOLUTION: usize = 50;

/// Empreinte fermée d'un secteur, en lon/lat
#[derive(Debug, Clone, PartialEq)]
pub struct SectorPolygon {
    ring: LineString,
}

impl SectorPolygon {
    /// Anneau fermé `[centre, arc_0, ..., arc_n, centre]`
    pub fn ring(&self) -> &LineString {
        &self.ring
    }

    /// Sommets de l'anneau
    pub fn points(&self) -> impl Iterator<Item = GeoPoint> + '_ {
        self.ring.coords().map(|&c| GeoPoint::from(c))
    }

    pub fn len(&self) -> usize {
        self.ring.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.0.is_empty()
    }

    pub fn to_polygon(&self) -> Polygon {
        Polygon::new(self.ring.clone(), vec![])
    }

    pub fn into_polygon(self) -> Polygon {
        Polygon::new(self.ring, vec![])
    }

    /// Surface de l'éventail (m²)
    pub fn area(&self, method: AreaMethod) -> f64 {
        method.polygon_area(&self.to_polygon())
    }
}

/// Construit l'éventail d'un secteur.
///
/// `resolution` est ramenée à au moins 1; le résultat contient alors
/// `resolution + 3` points (4 pour une résolution nulle) et se referme sur
/// le centre. Une portée nulle donne un polygone réduit au centre.
pub fn build_sector_polygon(
    center: GeoPoint,
    azimuth_deg: f64,
    beam_width_deg: f64,
    range_m: f64,
    resolution: usize,
) -> SectorPolygon {
    let resolution = resolution.max(1);
    let apex = Coord::from(center);
    let origin = Point::from(center);

    let step = beam_width_deg / resolution as f64;
    let start = azimuth_deg - beam_width_deg / 2.0;

    let mut coords = Vec::with_capacity(resolution + 3);
    coords.push(apex);

    for i in 0..=resolution {
        if range_m <= 0.0 {
            coords.push(apex);
            continue;
        }
        let bearing = start + i as f64 * step;
        coords.push(origin.haversine_destination(bearing, range_m).0);
    }

    // Cercle complet: le dernier point de l'arc rejoint exactement le premier
    if beam_width_deg >= 360.0 {
        coords[resolution + 1] = coords[1];
    }

    coords.push(apex);

    SectorPolygon {
        ring: LineString::new(coords),
    }
}

impl Sector {
    /// Empreinte du secteur autour d'un centre déjà converti en WGS84
    pub fn footprint(&self, center: GeoPoint, resolution: usize) -> SectorPolygon {
        build_sector_polygon(center, self.azimuth, self.beam_width, self.range, resolution)
    }
}
