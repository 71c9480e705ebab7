//! # coverage-map
//!
//! Couverture cellulaire d'une zone dessinée, à partir d'un catalogue de
//! pylônes GeoJSON.
//!
//! ## Features
//!
//! - Lecture des pylônes (UTM 39N par défaut) et du polygone requête (WGS84)
//! - Surface couverte par technologie (2G/3G/4G/...) avec rapport JSON
//! - Export des empreintes de secteurs en GeoJSON, colorées par technologie
//! - Reprojection via PROJ (feature `reproject`)
//!
//! ## Usage CLI
//!
//! ```bash
//! # Surfaces par technologie
//! coverage-map compute --towers ./towers.geojson --query ./zone.geojson
//!
//! # Empreintes des secteurs
//! coverage-map sectors --towers ./towers.geojson --output ./sectors.geojson
//! ```

pub mod cli;
pub mod config;
pub mod dataset;
pub mod export;
pub mod report;
pub mod reproject;

pub use config::Config;
pub use dataset::{load_query, load_towers, DatasetError};
pub use report::{CoverageReport, CoverageStatus};
pub use reproject::SmartConverter;
