//! Rapport de couverture avec dégradation gracieuse
//!
//! Ce module met en forme le résultat d'une agrégation: surfaces par
//! technologie, part de la zone requête, secteurs ignorés et leur cause.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use sector_coverage::{Coverage, SectorDiagnostic};
use serde::Serialize;

/// Statut global du calcul
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CoverageStatus {
    /// Tous les secteurs ont été évalués
    Success,
    /// Calcul terminé, certains secteurs ignorés
    PartialSuccess,
    /// Polygone requête invalide: aucun résultat
    Failed,
}

/// Surface couverte pour une technologie
#[derive(Debug, Clone, Default, Serialize)]
pub struct TypeStats {
    /// Surface cumulée en m²
    pub area_m2: f64,
    /// Part de la zone requête (peut dépasser 1 si les secteurs se recouvrent)
    pub share: f64,
}

impl TypeStats {
    pub fn area_km2(&self) -> f64 {
        self.area_m2 / 1_000_000.0
    }
}

/// Secteur ignoré
#[derive(Debug, Clone, Serialize)]
pub struct SkippedSector {
    pub tower_id: String,
    pub sector_id: String,
    pub network_type: String,
    /// Type d'erreur (InvalidGeometry, DegenerateSector, ClippingFailure)
    pub kind: String,
    pub message: String,
}

impl From<&SectorDiagnostic> for SkippedSector {
    fn from(d: &SectorDiagnostic) -> Self {
        Self {
            tower_id: d.tower_id.clone(),
            sector_id: d.sector_id.clone(),
            network_type: d.network_type.clone(),
            kind: d.error.kind().to_string(),
            message: d.error.to_string(),
        }
    }
}

/// Rapport complet d'un calcul de couverture
#[derive(Debug, Clone, Serialize)]
pub struct CoverageReport {
    /// Statut global
    pub status: CoverageStatus,
    /// Durée du calcul
    pub duration_secs: f64,
    /// Surface de la zone requête (m²)
    pub query_area_m2: f64,

    /// Nombre de pylônes
    pub towers: usize,
    /// Nombre de secteurs évalués
    pub sectors_evaluated: usize,
    /// Nombre de secteurs recouvrant la zone
    pub sectors_overlapping: usize,
    /// Nombre de secteurs ignorés
    pub sectors_skipped: usize,

    /// Surface par technologie
    pub by_type: BTreeMap<String, TypeStats>,

    /// Secteurs ignorés
    pub skipped: Vec<SkippedSector>,

    /// Cause de l'échec global
    pub error: Option<String>,
}

impl CoverageReport {
    /// Construit le rapport à partir du résultat d'agrégation
    pub fn from_coverage(coverage: &Coverage, query_area_m2: f64, towers: usize) -> Self {
        let by_type = coverage
            .result
            .iter()
            .map(|(network_type, area)| {
                let share = if query_area_m2 > 0.0 {
                    area / query_area_m2
                } else {
                    0.0
                };
                (
                    network_type.to_string(),
                    TypeStats {
                        area_m2: area,
                        share,
                    },
                )
            })
            .collect();

        let mut report = Self {
            status: CoverageStatus::Success,
            duration_secs: 0.0,
            query_area_m2,
            towers,
            sectors_evaluated: coverage.sectors_evaluated,
            sectors_overlapping: coverage.sectors_overlapping,
            sectors_skipped: coverage.diagnostics.len(),
            by_type,
            skipped: coverage.diagnostics.iter().map(SkippedSector::from).collect(),
            error: None,
        };
        report.finalize();
        report
    }

    /// Rapport d'échec (polygone requête rejeté)
    pub fn failed(message: impl Into<String>, towers: usize) -> Self {
        Self {
            status: CoverageStatus::Failed,
            duration_secs: 0.0,
            query_area_m2: 0.0,
            towers,
            sectors_evaluated: 0,
            sectors_overlapping: 0,
            sectors_skipped: 0,
            by_type: BTreeMap::new(),
            skipped: Vec::new(),
            error: Some(message.into()),
        }
    }

    /// Définit la durée du calcul
    pub fn set_duration(&mut self, duration: Duration) {
        self.duration_secs = duration.as_secs_f64();
    }

    /// Détermine le statut final
    pub fn finalize(&mut self) {
        self.status = if self.error.is_some() {
            CoverageStatus::Failed
        } else if !self.skipped.is_empty() {
            CoverageStatus::PartialSuccess
        } else {
            CoverageStatus::Success
        };
    }

    /// Affiche le rapport sur la console
    pub fn display(&self) {
        println!("\n{}", "=".repeat(60));
        println!("COVERAGE REPORT");
        println!("{}", "=".repeat(60));

        println!("\nStatus: {:?}", self.status);
        println!("Duration: {:.3}s", self.duration_secs);

        if let Some(ref error) = self.error {
            println!("\nError: {}", error);
            println!("\n{}", "=".repeat(60));
            return;
        }

        println!("\n--- SUMMARY ---");
        println!("Query area: {:.3} km²", self.query_area_m2 / 1_000_000.0);
        println!(
            "Sectors: {} evaluated, {} overlapping, {} skipped ({} towers)",
            self.sectors_evaluated, self.sectors_overlapping, self.sectors_skipped, self.towers
        );

        println!("\n--- BY NETWORK TYPE ---");
        if self.by_type.is_empty() {
            println!("  (no coverage)");
        }
        for (network_type, stats) in &self.by_type {
            println!(
                "  {}: {:.3} km² ({:.1}% of query area)",
                network_type,
                stats.area_km2(),
                stats.share * 100.0
            );
        }

        if !self.skipped.is_empty() {
            println!("\n--- SKIPPED SECTORS ({}) ---", self.skipped.len());
            for s in self.skipped.iter().take(20) {
                println!("  [{}:{}] {} {}", s.tower_id, s.sector_id, s.kind, s.message);
            }
            if self.skipped.len() > 20 {
                println!("  ... and {} more", self.skipped.len() - 20);
            }
        }

        println!("\n{}", "=".repeat(60));
    }

    /// Sauvegarde le rapport en JSON
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Affichage compact pour le résumé
    pub fn summary(&self) -> String {
        if let Some(ref error) = self.error {
            return format!("{:?}: {}", self.status, error);
        }

        let types: Vec<String> = self
            .by_type
            .iter()
            .map(|(k, v)| format!("{}={:.3} km²", k, v.area_km2()))
            .collect();

        format!(
            "{:?}: {} sectors, {} overlapping, {} skipped [{}]",
            self.status,
            self.sectors_evaluated,
            self.sectors_overlapping,
            self.sectors_skipped,
            types.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sector_coverage::{CoverageError, CoverageResult};

    fn coverage() -> Coverage {
        let mut result = CoverageResult::new();
        result.add("4G", 2_000_000.0);
        result.add("3G", 500_000.0);
        Coverage {
            result,
            diagnostics: Vec::new(),
            sectors_evaluated: 6,
            sectors_overlapping: 3,
        }
    }

    #[test]
    fn test_from_coverage() {
        let report = CoverageReport::from_coverage(&coverage(), 10_000_000.0, 2);

        assert_eq!(report.status, CoverageStatus::Success);
        assert_eq!(report.sectors_evaluated, 6);
        assert_eq!(report.by_type.len(), 2);

        let four_g = &report.by_type["4G"];
        assert_eq!(four_g.area_km2(), 2.0);
        assert!((four_g.share - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_partial_success() {
        let mut coverage = coverage();
        coverage.diagnostics.push(SectorDiagnostic {
            tower_id: "T1".to_string(),
            sector_id: "T1-2".to_string(),
            network_type: "5G".to_string(),
            error: CoverageError::degenerate_sector("T1-2", "range 0 must be strictly positive"),
        });

        let report = CoverageReport::from_coverage(&coverage, 10_000_000.0, 2);

        assert_eq!(report.status, CoverageStatus::PartialSuccess);
        assert_eq!(report.sectors_skipped, 1);
        assert_eq!(report.skipped[0].kind, "DegenerateSector");
        assert!(report.skipped[0].message.contains("T1-2"));
    }

    #[test]
    fn test_failed() {
        let report = CoverageReport::failed("Invalid geometry: ring is not closed", 4);
        assert_eq!(report.status, CoverageStatus::Failed);
        assert!(report.by_type.is_empty());
        assert!(report.summary().contains("ring is not closed"));
    }

    #[test]
    fn test_summary() {
        let report = CoverageReport::from_coverage(&coverage(), 10_000_000.0, 2);
        let summary = report.summary();
        assert!(summary.contains("4G=2.000 km²"), "{}", summary);
        assert!(summary.contains("6 sectors"));
    }

    #[test]
    fn test_zero_query_area_share() {
        let report = CoverageReport::from_coverage(&coverage(), 0.0, 2);
        assert_eq!(report.by_type["3G"].share, 0.0);
    }

    #[test]
    fn test_serialize() {
        let report = CoverageReport::from_coverage(&coverage(), 10_000_000.0, 2);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "Success");
        assert_eq!(json["by_type"]["3G"]["area_m2"], 500_000.0);
    }
}
