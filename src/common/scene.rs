//! Scene loading, parsing, and validation logic.
//!
//! A scene file describes the map and the fixed base-station layout a
//! simulation runs over. Stations are validated once at load time; the
//! simulation never re-checks them.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::simulation::engine::default_base_stations;
use crate::simulation::types::{BaseStation, MapBounds};

/// Error type for scene loading failures.
#[derive(Error, Debug)]
pub enum SceneLoadError {
    #[error("Failed to read file: {0}")]
    FileRead(String),
    #[error("Failed to parse JSON: {0}")]
    Parse(String),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Root structure of a scene file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// World size. Defaults to 1000 x 1000.
    #[serde(default)]
    pub map: MapBounds,
    pub base_stations: Vec<BaseStation>,
}

impl Default for Scene {
    fn default() -> Self {
        Scene {
            map: MapBounds::default(),
            base_stations: default_base_stations(),
        }
    }
}

/// Load and parse a scene from a file.
///
/// # Parameters
///
/// * `path` - Path to the scene JSON file
///
/// # Returns
///
/// Parsed and validated Scene or an error.
pub fn load_scene(path: impl AsRef<Path>) -> Result<Scene, SceneLoadError> {
    let path = path.as_ref();
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))
        .map_err(|e| SceneLoadError::FileRead(e.to_string()))?;

    parse_scene(&data)
}

/// Parse and validate a scene from JSON text.
pub fn parse_scene(data: &str) -> Result<Scene, SceneLoadError> {
    let scene: Scene = serde_json::from_str(data)
        .context("Invalid JSON format")
        .map_err(|e| SceneLoadError::Parse(format!("{:#}", e)))?;

    validate_scene(&scene).map_err(SceneLoadError::Validation)?;

    log::info!(
        "Loaded scene: {}x{} map, {} base stations",
        scene.map.width,
        scene.map.height,
        scene.base_stations.len()
    );
    Ok(scene)
}

/// Validate a scene.
///
/// # Returns
///
/// `Ok(())` if validation passes, `Err(String)` with error description otherwise.
pub fn validate_scene(scene: &Scene) -> Result<(), String> {
    const MAX_WORLD_COORD: f64 = 100_000.0;
    const MAX_STATIONS: usize = 10_000;

    if !(scene.map.width > 0.0 && scene.map.height > 0.0) || scene.map.width > MAX_WORLD_COORD || scene.map.height > MAX_WORLD_COORD {
        return Err(format!(
            "Map size {}x{} must be positive and at most {}",
            scene.map.width, scene.map.height, MAX_WORLD_COORD
        ));
    }

    if scene.base_stations.is_empty() {
        return Err("Scene must contain at least one base station".to_string());
    }
    if scene.base_stations.len() > MAX_STATIONS {
        return Err(format!(
            "Base station count {} exceeds maximum of {}",
            scene.base_stations.len(),
            MAX_STATIONS
        ));
    }

    let mut ids = HashSet::new();
    for station in &scene.base_stations {
        if station.id.trim().is_empty() {
            return Err("Base station with empty id".to_string());
        }
        if !ids.insert(station.id.as_str()) {
            return Err(format!("Duplicate base station id found: {}", station.id));
        }

        let p = &station.position;
        if !(0.0..=scene.map.width).contains(&p.x) || !(0.0..=scene.map.height).contains(&p.y) {
            return Err(format!(
                "Base station {} position ({}, {}) exceeds map bounds ({}x{})",
                station.id, p.x, p.y, scene.map.width, scene.map.height
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::types::Technology;

    #[test]
    fn parses_valid_scene() {
        let json = r#"{
            "map": { "width": 500.0, "height": 400.0 },
            "base_stations": [
                { "id": "ap", "technology": "Wi-Fi", "position": { "x": 10.0, "y": 20.0 } },
                { "id": "tower", "technology": "5G", "position": { "x": 250.0, "y": 200.0 } }
            ]
        }"#;
        let scene = parse_scene(json).unwrap();
        assert_eq!(scene.map.width, 500.0);
        assert_eq!(scene.base_stations.len(), 2);
        assert_eq!(scene.base_stations[1].technology, Technology::FiveG);
    }

    #[test]
    fn map_defaults_when_omitted() {
        let json = r#"{ "base_stations": [ { "id": "b", "technology": "BLE", "position": { "x": 1.0, "y": 1.0 } } ] }"#;
        let scene = parse_scene(json).unwrap();
        assert_eq!(scene.map, MapBounds::default());
    }

    #[test]
    fn rejects_unknown_technology() {
        let json = r#"{ "base_stations": [ { "id": "x", "technology": "LoRa", "position": { "x": 1.0, "y": 1.0 } } ] }"#;
        assert!(matches!(parse_scene(json), Err(SceneLoadError::Parse(_))));
    }

    #[test]
    fn rejects_duplicate_ids_and_out_of_bounds_stations() {
        let mut scene = Scene::default();
        scene.base_stations[1].id = scene.base_stations[0].id.clone();
        assert!(validate_scene(&scene).unwrap_err().contains("Duplicate"));

        let mut scene = Scene::default();
        scene.base_stations[0].position.x = 1500.0;
        assert!(validate_scene(&scene).unwrap_err().contains("exceeds map bounds"));
    }

    #[test]
    fn rejects_empty_layout() {
        let scene = Scene {
            map: MapBounds::default(),
            base_stations: Vec::new(),
        };
        assert!(validate_scene(&scene).is_err());
    }

    #[test]
    fn default_scene_is_valid() {
        assert!(validate_scene(&Scene::default()).is_ok());
    }

    #[test]
    fn missing_file_is_a_read_error() {
        assert!(matches!(load_scene("/nonexistent/scene.json"), Err(SceneLoadError::FileRead(_))));
    }
}
