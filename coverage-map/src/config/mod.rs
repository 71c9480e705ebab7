//! Configuration du calcul de couverture

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use sector_coverage::{AggregateOptions, AreaMethod, DEFAULT_RESOLUTION};

/// Configuration principale
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// EPSG des coordonnées des pylônes dans le jeu de données
    pub epsg: u32,

    /// Segments d'arc par secteur
    pub resolution: usize,

    /// Évaluer les pylônes en parallèle
    pub parallel: bool,

    /// Formule de surface (spherical, geodesic)
    pub area_method: AreaMethod,

    /// Couleur d'affichage par technologie (export GeoJSON)
    pub colors: HashMap<String, String>,

    /// Couleur des technologies absentes de `colors`
    pub default_color: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            epsg: 32639,
            resolution: DEFAULT_RESOLUTION,
            parallel: true,
            area_method: AreaMethod::Spherical,
            colors: [("4G", "blue"), ("3G", "green")]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            default_color: "red".to_string(),
        }
    }
}

impl Config {
    /// Charge une configuration depuis un fichier
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Charge une configuration depuis un preset embarqué
    pub fn from_preset(preset: &str) -> Result<Self> {
        match preset {
            "default" => Self::load_embedded(include_str!("presets/default.json")),
            "precise" => Self::load_embedded(include_str!("presets/precise.json")),
            "fast" => Self::load_embedded(include_str!("presets/fast.json")),
            _ => anyhow::bail!("Unknown preset: {}. Use: default, precise, fast", preset),
        }
    }

    /// Nom de preset ou chemin vers un fichier JSON
    pub fn from_name_or_path(name: &str) -> Result<Self> {
        let path = Path::new(name);
        if path.exists() {
            Self::load(path)
        } else {
            Self::from_preset(name)
        }
    }

    fn load_embedded(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse embedded config")
    }

    /// Options transmises à l'agrégateur
    pub fn aggregate_options(&self) -> AggregateOptions {
        AggregateOptions {
            resolution: self.resolution,
            parallel: self.parallel,
            area_method: self.area_method,
        }
    }

    /// Couleur associée à une technologie
    pub fn color_for(&self, network_type: &str) -> &str {
        self.colors
            .get(network_type)
            .map(String::as_str)
            .unwrap_or(self.default_color.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_parse() {
        for preset in ["default", "precise", "fast"] {
            let config = Config::from_preset(preset).unwrap();
            assert_eq!(config.epsg, 32639, "preset {}", preset);
        }
        assert!(Config::from_preset("unknown").is_err());
    }

    #[test]
    fn test_default_preset_matches_default() {
        let preset = Config::from_preset("default").unwrap();
        let default = Config::default();
        assert_eq!(preset.resolution, default.resolution);
        assert_eq!(preset.area_method, default.area_method);
        assert_eq!(preset.colors, default.colors);
    }

    #[test]
    fn test_precise_preset() {
        let config = Config::from_preset("precise").unwrap();
        assert_eq!(config.resolution, 360);
        assert_eq!(config.area_method, AreaMethod::Geodesic);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"resolution": 20}"#).unwrap();
        assert_eq!(config.resolution, 20);
        assert_eq!(config.epsg, 32639);
        assert!(config.parallel);
    }

    #[test]
    fn test_color_for() {
        let config = Config::default();
        assert_eq!(config.color_for("4G"), "blue");
        assert_eq!(config.color_for("3G"), "green");
        assert_eq!(config.color_for("2G"), "red");
        assert_eq!(config.color_for("5G"), "red");
    }
}
