//! Définition et implémentation des commandes CLI
//!
//! - `compute`: pylônes + polygone requête → surfaces par technologie
//! - `sectors`: pylônes → empreintes des secteurs en GeoJSON

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Subcommand;
use sector_coverage::{AreaMethod, Aggregator, QueryPolygon, Tower};
use tracing::{info, warn};

use crate::config::Config;
use crate::dataset;
use crate::export::{export_footprints, SectorFootprint};
use crate::report::CoverageReport;
use crate::reproject::SmartConverter;

#[derive(Subcommand)]
pub enum Commands {
    /// Compute covered area per network type inside a query polygon
    Compute {
        /// Tower catalog (GeoJSON FeatureCollection of Points)
        #[arg(short, long)]
        towers: PathBuf,

        /// Query polygon (GeoJSON Polygon, Feature or FeatureCollection, WGS84)
        #[arg(short, long)]
        query: PathBuf,

        #[command(flatten)]
        settings: SettingsArgs,

        /// Maximum number of worker threads
        #[arg(long, alias = "threads")]
        jobs: Option<usize>,

        /// Evaluate towers on a single thread
        #[arg(long)]
        sequential: bool,

        /// Write the JSON report to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Export sector footprints to GeoJSON (WGS84)
    Sectors {
        /// Tower catalog (GeoJSON FeatureCollection of Points)
        #[arg(short, long)]
        towers: PathBuf,

        /// Output GeoJSON file
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        settings: SettingsArgs,
    },
}

/// Réglages communs (surchargent la configuration)
#[derive(clap::Args, Debug, Clone)]
pub struct SettingsArgs {
    /// Config preset name (default/precise/fast) or path to a JSON config
    #[arg(long, default_value = "default")]
    pub config: String,

    /// EPSG of the tower coordinates (default: from config, 32639 / UTM 39N)
    #[arg(long)]
    pub epsg: Option<u32>,

    /// Arc segments per sector
    #[arg(long)]
    pub resolution: Option<usize>,

    /// Area formula: spherical or geodesic
    #[arg(long, value_parser = parse_area_method)]
    pub area_method: Option<AreaMethod>,
}

impl SettingsArgs {
    /// Configuration finale: preset/fichier puis surcharges CLI
    pub fn resolve(&self) -> Result<Config> {
        let mut config = Config::from_name_or_path(&self.config)
            .with_context(|| format!("Failed to load config '{}'", self.config))?;

        if let Some(epsg) = self.epsg {
            config.epsg = epsg;
        }
        if let Some(resolution) = self.resolution {
            config.resolution = resolution;
        }
        if let Some(area_method) = self.area_method {
            config.area_method = area_method;
        }

        Ok(config)
    }
}

fn parse_area_method(s: &str) -> Result<AreaMethod, String> {
    match s.to_ascii_lowercase().as_str() {
        "spherical" => Ok(AreaMethod::Spherical),
        "geodesic" => Ok(AreaMethod::Geodesic),
        _ => Err(format!("Unknown area method: {}. Use: spherical, geodesic", s)),
    }
}

/// Exécute la commande compute
pub fn cmd_compute(
    towers_path: &Path,
    query_path: &Path,
    settings: &SettingsArgs,
    jobs: Option<usize>,
    sequential: bool,
    report_path: Option<&Path>,
) -> Result<CoverageReport> {
    let mut config = settings.resolve()?;
    if sequential {
        config.parallel = false;
    }

    if let Some(jobs) = jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    let towers = dataset::load_towers(towers_path)
        .with_context(|| format!("Failed to load towers from {}", towers_path.display()))?;
    let query = dataset::load_query(query_path)
        .with_context(|| format!("Failed to load query polygon from {}", query_path.display()))?;

    let report = compute_report(&config, &query, &towers)?;

    report.display();
    info!("{}", report.summary());

    if let Some(path) = report_path {
        report
            .save_to_file(path)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        info!(path = %path.display(), "Report saved");
    }

    Ok(report)
}

/// Calcule le rapport de couverture (sans I/O)
pub fn compute_report(config: &Config, query: &QueryPolygon, towers: &[Tower]) -> Result<CoverageReport> {
    let converter = SmartConverter::new(config.epsg)?;
    info!(
        converter = %converter.name(),
        resolution = config.resolution,
        parallel = config.parallel,
        "Computing coverage"
    );

    let aggregator = Aggregator::new(converter, config.aggregate_options());
    let query_area = config
        .area_method
        .polygon_area(&geo::Polygon::new(query.ring().clone(), vec![]));

    let start = Instant::now();
    let mut report = match aggregator.aggregate(query, towers) {
        Ok(coverage) => CoverageReport::from_coverage(&coverage, query_area, towers.len()),
        Err(e) => {
            warn!(error = %e, "Query polygon rejected");
            CoverageReport::failed(e.to_string(), towers.len())
        }
    };
    report.set_duration(start.elapsed());

    Ok(report)
}

/// Exécute la commande sectors
pub fn cmd_sectors(towers_path: &Path, output: &Path, settings: &SettingsArgs) -> Result<usize> {
    let config = settings.resolve()?;

    let towers = dataset::load_towers(towers_path)
        .with_context(|| format!("Failed to load towers from {}", towers_path.display()))?;

    let footprints = build_footprints(&config, &towers)?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    export_footprints(&footprints, output)?;

    println!(
        "Export complete: {} sectors from {} towers to {}",
        footprints.len(),
        towers.len(),
        output.display()
    );

    Ok(footprints.len())
}

/// Construit les empreintes exportables de tous les secteurs valides
pub fn build_footprints(config: &Config, towers: &[Tower]) -> Result<Vec<SectorFootprint>> {
    let converter = SmartConverter::new(config.epsg)?;
    let aggregator = Aggregator::new(converter, config.aggregate_options());

    let mut footprints = Vec::new();
    for tower in towers {
        for (sector, polygon) in aggregator.footprints(tower) {
            if let Err(e) = sector.validate() {
                warn!(tower_id = %tower.id, sector_id = %sector.id, error = %e, "Sector not exported");
                continue;
            }
            footprints.push(SectorFootprint {
                tower_id: tower.id.clone(),
                color: config.color_for(&sector.network_type).to_string(),
                sector: sector.clone(),
                polygon,
            });
        }
    }

    Ok(footprints)
}
