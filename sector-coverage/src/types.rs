//! Types de données pour le crate sector-coverage

use std::collections::BTreeMap;

use geo::{Coord, LineString, Point};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::CoverageError;

/// Point géographique WGS84 (degrés)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Longitude en degrés
    pub lon: f64,
    /// Latitude en degrés
    pub lat: f64,
}

impl GeoPoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

impl From<GeoPoint> for Coord {
    fn from(p: GeoPoint) -> Self {
        Coord { x: p.lon, y: p.lat }
    }
}

impl From<Coord> for GeoPoint {
    fn from(c: Coord) -> Self {
        Self { lon: c.x, lat: c.y }
    }
}

impl From<GeoPoint> for Point {
    fn from(p: GeoPoint) -> Self {
        Point::new(p.lon, p.lat)
    }
}

impl From<Point> for GeoPoint {
    fn from(p: Point) -> Self {
        Self {
            lon: p.x(),
            lat: p.y(),
        }
    }
}

/// Point en coordonnées projetées (mètres, UTM 39N dans le jeu de Téhéran)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedPoint {
    pub x: f64,
    pub y: f64,
}

impl ProjectedPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Un secteur d'antenne directionnelle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sector {
    /// Identifiant du secteur (unique dans le jeu de données)
    pub id: String,

    /// Azimut de l'axe du secteur, en degrés depuis le nord
    pub azimuth: f64,

    /// Ouverture totale en degrés, symétrique autour de l'azimut
    pub beam_width: f64,

    /// Portée radiale en mètres
    pub range: f64,

    /// Technologie réseau ("2G", "3G", "4G", "5G"...), ensemble ouvert
    pub network_type: String,
}

impl Sector {
    /// Vérifie les invariants: ouverture dans (0, 360], portée > 0
    pub fn validate(&self) -> Result<(), CoverageError> {
        if !self.azimuth.is_finite() {
            return Err(CoverageError::degenerate_sector(
                &self.id,
                format!("azimuth is not finite ({})", self.azimuth),
            ));
        }
        if !self.beam_width.is_finite() || self.beam_width <= 0.0 || self.beam_width > 360.0 {
            return Err(CoverageError::degenerate_sector(
                &self.id,
                format!("beam width {} outside (0, 360]", self.beam_width),
            ));
        }
        if !self.range.is_finite() || self.range <= 0.0 {
            return Err(CoverageError::degenerate_sector(
                &self.id,
                format!("range {} must be strictly positive", self.range),
            ));
        }
        Ok(())
    }
}

/// Un pylône et ses secteurs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tower {
    /// Identifiant du pylône
    pub id: String,

    /// Position dans le système projeté du jeu de données
    pub location: ProjectedPoint,

    /// Secteurs portés (l'ordre n'a pas d'incidence sur le calcul)
    pub sectors: Vec<Sector>,
}

/// Polygone dessiné par l'utilisateur (lon/lat)
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPolygon {
    ring: LineString,
}

impl QueryPolygon {
    /// Construit le polygone, en refermant l'anneau si nécessaire.
    ///
    /// Aucune validation ici: un polygone dégénéré est rejeté par l'agrégation.
    pub fn new(points: impl IntoIterator<Item = GeoPoint>) -> Self {
        let mut coords: Vec<Coord> = points.into_iter().map(Coord::from).collect();

        if let (Some(&first), Some(&last)) = (coords.first(), coords.last()) {
            if coords.len() > 1 && first != last {
                debug!(points = coords.len(), "Auto-closing query ring");
                coords.push(first);
            }
        }

        Self {
            ring: LineString::new(coords),
        }
    }

    /// Anneau fermé (le premier point est répété en fin)
    pub fn ring(&self) -> &LineString {
        &self.ring
    }

    /// Sommets de l'anneau
    pub fn points(&self) -> impl Iterator<Item = GeoPoint> + '_ {
        self.ring.coords().map(|&c| GeoPoint::from(c))
    }
}

impl From<LineString> for QueryPolygon {
    fn from(ring: LineString) -> Self {
        Self::new(ring.into_iter().map(GeoPoint::from))
    }
}

/// Surface couverte cumulée par technologie (m²).
///
/// Une technologie absente signifie une couverture nulle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoverageResult(BTreeMap<String, f64>);

impl CoverageResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ajoute une surface au total de la technologie (clé créée à la demande)
    pub fn add(&mut self, network_type: &str, area: f64) {
        *self.0.entry(network_type.to_string()).or_insert(0.0) += area;
    }

    pub fn get(&self, network_type: &str) -> Option<f64> {
        self.0.get(network_type).copied()
    }

    pub fn contains(&self, network_type: &str) -> bool {
        self.0.contains_key(network_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Somme toutes technologies confondues (les recouvrements comptent plusieurs fois)
    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    pub fn into_inner(self) -> BTreeMap<String, f64> {
        self.0
    }
}

/// Erreur non fatale rattachée à un secteur
#[derive(Debug, Clone, PartialEq)]
pub struct SectorDiagnostic {
    pub tower_id: String,
    pub sector_id: String,
    pub network_type: String,
    pub error: CoverageError,
}

/// Résultat d'un appel d'agrégation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Coverage {
    /// Surfaces par technologie
    pub result: CoverageResult,

    /// Secteurs ignorés et leur cause
    pub diagnostics: Vec<SectorDiagnostic>,

    /// Nombre de secteurs examinés
    pub sectors_evaluated: usize,

    /// Nombre de secteurs ayant une intersection de surface non nulle
    pub sectors_overlapping: usize,
}
