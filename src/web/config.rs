use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

use crate::predict::Observer;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid station coordinates: {0}")]
    Coordinates(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub station: StationConfig,
    #[serde(default)]
    pub web: WebConfig,
    pub predict: Option<PredictConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct StationConfig {
    pub name: Option<String>,
    /// `"lat, lon"` in decimal degrees.
    pub coordinates: String,
    #[serde(default)]
    pub altitude_m: f64,
}

impl StationConfig {
    pub fn observer(&self) -> Result<Observer, ConfigError> {
        Observer::from_coordinates(&self.coordinates, Some(self.altitude_m))
            .ok_or_else(|| ConfigError::Coordinates(self.coordinates.clone()))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PredictConfig {
    pub tle_folder: PathBuf,
    #[serde(default = "default_horizon_days")]
    pub horizon_days: i64,
}

fn default_horizon_days() -> i64 {
    7
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let yaml = r#"
station:
  name: Tokyo
  coordinates: "35.6812, 139.7671"
  altitude_m: 40
web:
  bind: "127.0.0.1:9000"
predict:
  tle_folder: ./tles
  horizon_days: 3
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.web.bind, "127.0.0.1:9000");
        let predict = config.predict.unwrap();
        assert_eq!(predict.horizon_days, 3);
        let observer = config.station.observer().unwrap();
        assert_eq!(observer.altitude_m, 40.0);
    }

    #[test]
    fn defaults_apply_when_sections_are_omitted() {
        let yaml = r#"
station:
  coordinates: "0.0, 0.0"
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.web.bind, "0.0.0.0:8080");
        assert!(config.predict.is_none());
        assert_eq!(config.station.altitude_m, 0.0);
    }

    #[test]
    fn bad_coordinates_surface_as_config_error() {
        let station = StationConfig {
            name: None,
            coordinates: "not a place".to_string(),
            altitude_m: 0.0,
        };
        assert!(matches!(
            station.observer(),
            Err(ConfigError::Coordinates(_))
        ));
    }
}
