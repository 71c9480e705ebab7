//! Export des empreintes de secteurs vers GeoJSON (géométries via geozero)

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use geo::Geometry;
use geozero::geojson::GeoJsonWriter;
use geozero::GeozeroGeometry;
use sector_coverage::{Sector, SectorPolygon};
use serde_json::json;

/// Empreinte d'un secteur prête à l'export
#[derive(Debug, Clone)]
pub struct SectorFootprint {
    pub tower_id: String,
    pub sector: Sector,
    pub polygon: SectorPolygon,
    /// Couleur d'affichage de la technologie
    pub color: String,
}

/// Écrit les empreintes dans un fichier GeoJSON (WGS84)
pub fn export_footprints(footprints: &[SectorFootprint], output_path: &Path) -> Result<()> {
    let file = File::create(output_path)
        .context(format!("Failed to create file: {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);

    write_collection(&mut writer, footprints)?;
    writer.flush()?;

    Ok(())
}

/// Écrit une FeatureCollection complète
fn write_collection<W: Write>(writer: &mut W, footprints: &[SectorFootprint]) -> Result<()> {
    write!(writer, r#"{{"type":"FeatureCollection","features":["#)?;

    for (i, footprint) in footprints.iter().enumerate() {
        if i > 0 {
            write!(writer, ",")?;
        }
        write_feature(writer, footprint)?;
    }

    write!(writer, "]}}")?;
    Ok(())
}

/// Écrit une feature en GeoJSON
fn write_feature<W: Write>(writer: &mut W, footprint: &SectorFootprint) -> Result<()> {
    write!(
        writer,
        r#"{{"type":"Feature","id":{},"#,
        serde_json::to_string(&footprint.sector.id)?
    )?;

    write!(writer, r#""geometry":"#)?;
    let mut geom_buf = Vec::new();
    let mut geom_writer = GeoJsonWriter::new(&mut geom_buf);
    Geometry::Polygon(footprint.polygon.to_polygon()).process_geom(&mut geom_writer)?;
    writer.write_all(&geom_buf)?;

    let sector = &footprint.sector;
    let properties = json!({
        "tower_id": footprint.tower_id,
        "sector_id": sector.id,
        "network_type": sector.network_type,
        "azimuth": sector.azimuth,
        "beam_width": sector.beam_width,
        "range": sector.range,
        "color": footprint.color,
    });
    write!(writer, r#","properties":{}}}"#, properties)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sector_coverage::{build_sector_polygon, GeoPoint};

    fn footprint() -> SectorFootprint {
        let sector = Sector {
            id: "T1-\"0\"".to_string(),
            azimuth: 120.0,
            beam_width: 65.0,
            range: 1500.0,
            network_type: "4G".to_string(),
        };
        let polygon = build_sector_polygon(GeoPoint::new(51.389, 35.6892), 120.0, 65.0, 1500.0, 8);
        SectorFootprint {
            tower_id: "T1".to_string(),
            sector,
            polygon,
            color: "blue".to_string(),
        }
    }

    #[test]
    fn test_write_collection_is_valid_geojson() {
        let mut buffer = Vec::new();
        write_collection(&mut buffer, &[footprint(), footprint()]).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["type"], "FeatureCollection");

        let features = value["features"].as_array().unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0]["id"], "T1-\"0\"");
        assert_eq!(features[0]["geometry"]["type"], "Polygon");
        assert_eq!(features[0]["properties"]["color"], "blue");
        assert_eq!(features[0]["properties"]["network_type"], "4G");

        // Anneau fermé de résolution + 3 points
        let ring = features[0]["geometry"]["coordinates"][0].as_array().unwrap();
        assert_eq!(ring.len(), 11);
        assert_eq!(ring[0], ring[10]);
    }

    #[test]
    fn test_export_footprints() {
        let temp_dir = std::env::temp_dir();
        let output_path = temp_dir.join("test_sector_footprints.geojson");

        export_footprints(&[footprint()], &output_path).unwrap();

        let content = std::fs::read_to_string(&output_path).unwrap();
        assert!(content.contains(r#""type":"FeatureCollection""#));
        assert!(content.contains(r#""tower_id":"T1""#));

        std::fs::remove_file(output_path).ok();
    }
}
