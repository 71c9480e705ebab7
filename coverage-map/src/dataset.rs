//! Lecture des jeux de données GeoJSON (pylônes, polygone requête)
//!
//! Format des pylônes: FeatureCollection de Points dans la projection du
//! jeu (UTM 39N pour Téhéran), avec les propriétés
//!
//! ```json
//! {
//!   "tower_id": "T-0012",
//!   "cells": [
//!     { "azimuth": 120, "coverage_angle": 65, "coverage_length": 1500, "network_type": "4G" }
//!   ]
//! }
//! ```

use std::path::Path;

use geojson::{Feature, GeoJson, Geometry, Value};
use sector_coverage::{GeoPoint, ProjectedPoint, QueryPolygon, Sector, Tower};
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use tracing::debug;

/// Erreurs de lecture d'un jeu de données
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Erreur d'I/O
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Document GeoJSON illisible
    #[error("Invalid GeoJSON: {0}")]
    GeoJson(#[from] geojson::Error),

    /// Feature de pylône incomplète ou mal typée
    #[error("Invalid tower feature #{index}: {reason}")]
    InvalidTower { index: usize, reason: String },

    /// Aucun polygone exploitable dans le document requête
    #[error("No polygon found in query: {0}")]
    NoPolygon(String),
}

impl DatasetError {
    fn invalid_tower(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidTower {
            index,
            reason: reason.into(),
        }
    }
}

/// Propriétés d'une cellule dans le jeu source
#[derive(Debug, Deserialize)]
struct CellProperties {
    #[serde(default)]
    cell_id: Option<serde_json::Value>,
    #[serde(deserialize_with = "number_or_string")]
    azimuth: f64,
    #[serde(deserialize_with = "number_or_string")]
    coverage_angle: f64,
    #[serde(deserialize_with = "number_or_string")]
    coverage_length: f64,
    network_type: String,
}

/// Accepte `65`, `65.0` ou `"65"` (certains exports stockent les nombres en texte)
fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s
            .trim()
            .replace(',', ".")
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("not a number: {:?}", s))),
    }
}

/// Identifiant texte depuis une valeur JSON (chaîne ou nombre)
fn id_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Charge les pylônes depuis un fichier GeoJSON
pub fn load_towers(path: &Path) -> Result<Vec<Tower>, DatasetError> {
    let content = read(path)?;
    parse_towers(&content)
}

/// Parse une FeatureCollection de pylônes
pub fn parse_towers(content: &str) -> Result<Vec<Tower>, DatasetError> {
    let features = match content.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(fc) => fc.features,
        GeoJson::Feature(f) => vec![f],
        GeoJson::Geometry(_) => {
            return Err(DatasetError::invalid_tower(0, "expected Feature or FeatureCollection"))
        }
    };

    let towers = features
        .iter()
        .enumerate()
        .map(|(index, feature)| tower_from_feature(index, feature))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        towers = towers.len(),
        sectors = towers.iter().map(|t| t.sectors.len()).sum::<usize>(),
        "Towers loaded"
    );

    Ok(towers)
}

fn tower_from_feature(index: usize, feature: &Feature) -> Result<Tower, DatasetError> {
    let location = match feature.geometry.as_ref().map(|g| &g.value) {
        Some(Value::Point(coords)) if coords.len() >= 2 => ProjectedPoint::new(coords[0], coords[1]),
        Some(_) => return Err(DatasetError::invalid_tower(index, "geometry is not a Point")),
        None => return Err(DatasetError::invalid_tower(index, "missing geometry")),
    };

    let properties = feature
        .properties
        .as_ref()
        .ok_or_else(|| DatasetError::invalid_tower(index, "missing properties"))?;

    let id = properties
        .get("tower_id")
        .and_then(id_to_string)
        .ok_or_else(|| DatasetError::invalid_tower(index, "missing tower_id"))?;

    let cells = match properties.get("cells") {
        Some(cells) => Vec::<CellProperties>::deserialize(cells)
            .map_err(|e| DatasetError::invalid_tower(index, format!("tower {}: {}", id, e)))?,
        None => Vec::new(),
    };

    let mut sectors = Vec::with_capacity(cells.len());
    for (k, cell) in cells.into_iter().enumerate() {
        if cell.network_type.trim().is_empty() {
            return Err(DatasetError::invalid_tower(
                index,
                format!("tower {}: cell {} has an empty network_type", id, k),
            ));
        }
        let sector_id = cell
            .cell_id
            .as_ref()
            .and_then(id_to_string)
            .unwrap_or_else(|| format!("{}-{}", id, k));

        sectors.push(Sector {
            id: sector_id,
            azimuth: cell.azimuth,
            beam_width: cell.coverage_angle,
            range: cell.coverage_length,
            network_type: cell.network_type,
        });
    }

    Ok(Tower {
        id,
        location,
        sectors,
    })
}

/// Charge le polygone requête (lon/lat) depuis un fichier GeoJSON
pub fn load_query(path: &Path) -> Result<QueryPolygon, DatasetError> {
    let content = read(path)?;
    parse_query(&content)
}

/// Premier polygone d'un document GeoJSON (Geometry, Feature ou FeatureCollection).
///
/// Seul l'anneau extérieur est conservé.
pub fn parse_query(content: &str) -> Result<QueryPolygon, DatasetError> {
    let geojson = content.parse::<GeoJson>()?;

    let geometry = match &geojson {
        GeoJson::Geometry(g) => Some(g),
        GeoJson::Feature(f) => f.geometry.as_ref(),
        GeoJson::FeatureCollection(fc) => fc
            .features
            .iter()
            .filter_map(|f| f.geometry.as_ref())
            .find(|g| matches!(g.value, Value::Polygon(_))),
    };

    let exterior = geometry
        .and_then(exterior_ring)
        .ok_or_else(|| DatasetError::NoPolygon("expected a Polygon geometry".to_string()))?;

    let points = exterior
        .iter()
        .map(|position| match position.as_slice() {
            [lon, lat, ..] => Ok(GeoPoint::new(*lon, *lat)),
            _ => Err(DatasetError::NoPolygon("position with less than 2 values".to_string())),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(QueryPolygon::new(points))
}

fn exterior_ring(geometry: &Geometry) -> Option<&Vec<Vec<f64>>> {
    match &geometry.value {
        Value::Polygon(rings) => rings.first(),
        _ => None,
    }
}

fn read(path: &Path) -> Result<String, DatasetError> {
    std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.display().to_string(),
        source,
    })
}
