//! Run parameters, read from a JSON document.
//!
//! Every section and every key is optional; missing values fall back to
//! the defaults below, so `{}` is a complete configuration.

use std::{fs, path::Path};

use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::{
    anemone::ConsumptionScan,
    error::ConfigError,
    simulation::RunLimits,
    types::{Point3, Vector3},
};

pub const DEFAULT_NUM_TIMESTEPS: u64 = 65_000;
pub const DEFAULT_MIN_REMAINING_FOOD_PIECES: usize = 500;
pub const DEFAULT_MAX_FOOD_DIFFUSION_PER_TIMESTEP: f64 = 0.001;

pub const DEFAULT_PIECES_FOOD: usize = 1000;
pub const DEFAULT_NUM_TENTACLES: usize = 12;
pub const DEFAULT_DISK_RADIUS: f64 = 0.15;
/// Raised so a 0.4 long tentacle sits in the middle of the space.
pub const DEFAULT_DISK_CENTER: [f64; 3] = [0.0, 0.3, 0.0];
/// Straight up.
pub const DEFAULT_DISK_NORMAL_VECTOR: [f64; 3] = [0.0, 1.0, 0.0];
pub const DEFAULT_TENTACLE_LENGTH: f64 = 0.4;
pub const DEFAULT_NUM_TENTACLE_ELEMENTS: usize = 10;
pub const DEFAULT_CURRENT_VECTOR: [f64; 3] = [0.0, 0.0, 0.0];

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub simulation: SimulationSection,
    pub model: ModelSection,
    pub logging: LoggingSection,
}

/// End conditions and per-step motion settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSection {
    /// Upper bound on the number of steps in a run.
    pub num_timesteps: u64,
    /// A run stops once fewer pieces than this remain.
    pub min_remaining_food_pieces: usize,
    pub max_food_diffusion_per_timestep: f64,
    /// Seed for reproducible runs; unset draws a fresh seed.
    pub random_seed: Option<u64>,
    pub consumption_scan: ConsumptionScan,
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            num_timesteps: DEFAULT_NUM_TIMESTEPS,
            min_remaining_food_pieces: DEFAULT_MIN_REMAINING_FOOD_PIECES,
            max_food_diffusion_per_timestep: DEFAULT_MAX_FOOD_DIFFUSION_PER_TIMESTEP,
            random_seed: None,
            consumption_scan: ConsumptionScan::default(),
        }
    }
}

/// Anemone geometry, food population and the ambient current.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSection {
    pub num_pieces_food: usize,
    pub num_tentacles: usize,
    pub disk_radius: f64,
    pub disk_center_x: f64,
    pub disk_center_y: f64,
    pub disk_center_z: f64,
    pub disk_normal_vector_x: f64,
    pub disk_normal_vector_y: f64,
    pub disk_normal_vector_z: f64,
    pub tentacle_length: f64,
    pub num_tentacle_elements: usize,
    pub current_vector_x: f64,
    pub current_vector_y: f64,
    pub current_vector_z: f64,
}

impl Default for ModelSection {
    fn default() -> Self {
        let [disk_center_x, disk_center_y, disk_center_z] = DEFAULT_DISK_CENTER;
        let [disk_normal_vector_x, disk_normal_vector_y, disk_normal_vector_z] =
            DEFAULT_DISK_NORMAL_VECTOR;
        let [current_vector_x, current_vector_y, current_vector_z] = DEFAULT_CURRENT_VECTOR;
        Self {
            num_pieces_food: DEFAULT_PIECES_FOOD,
            num_tentacles: DEFAULT_NUM_TENTACLES,
            disk_radius: DEFAULT_DISK_RADIUS,
            disk_center_x,
            disk_center_y,
            disk_center_z,
            disk_normal_vector_x,
            disk_normal_vector_y,
            disk_normal_vector_z,
            tentacle_length: DEFAULT_TENTACLE_LENGTH,
            num_tentacle_elements: DEFAULT_NUM_TENTACLE_ELEMENTS,
            current_vector_x,
            current_vector_y,
            current_vector_z,
        }
    }
}

impl ModelSection {
    pub fn disk_center(&self) -> Point3 {
        Point3::new(self.disk_center_x, self.disk_center_y, self.disk_center_z)
    }

    pub fn disk_normal_vector(&self) -> Vector3 {
        Vector3::new(
            self.disk_normal_vector_x,
            self.disk_normal_vector_y,
            self.disk_normal_vector_z,
        )
    }

    pub fn current(&self) -> Vector3 {
        Vector3::new(
            self.current_vector_x,
            self.current_vector_y,
            self.current_vector_z,
        )
    }

    pub fn set_current(&mut self, current: Vector3) {
        self.current_vector_x = current.x;
        self.current_vector_y = current.y;
        self.current_vector_z = current.z;
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// One of `critical`, `error`, `warning`, `info`, `debug`, `trace`.
    pub level: Option<String>,
}

impl LoggingSection {
    /// Level filter for the configured name; unknown or missing names
    /// fall back to `error`.
    pub fn level_filter(&self) -> LevelFilter {
        self.level
            .as_deref()
            .map_or(LevelFilter::Error, parse_level_name)
    }
}

/// Maps a level name to a filter. `log` has no critical level, so
/// `critical` maps to `error`.
pub fn parse_level_name(name: &str) -> LevelFilter {
    match name.trim().to_ascii_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "critical" | "error" => LevelFilter::Error,
        "warning" | "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Error,
    }
}

impl Config {
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn run_limits(&self) -> RunLimits {
        RunLimits {
            max_timesteps: self.simulation.num_timesteps,
            min_remaining_food: self.simulation.min_remaining_food_pieces,
        }
    }

    pub fn level_filter(&self) -> LevelFilter {
        self.logging.level_filter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let cfg = Config::from_json_str("{}").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.simulation.num_timesteps, 65_000);
        assert_eq!(cfg.simulation.min_remaining_food_pieces, 500);
        assert_eq!(cfg.model.num_pieces_food, 1000);
        assert_eq!(cfg.model.num_tentacles, 12);
        assert_eq!(cfg.model.disk_center(), Point3::new(0.0, 0.3, 0.0));
        assert_eq!(cfg.model.disk_normal_vector(), Vector3::Y);
        assert_eq!(cfg.model.current(), Vector3::ZERO);
        assert_eq!(cfg.simulation.random_seed, None);
        assert_eq!(cfg.simulation.consumption_scan, ConsumptionScan::FirstSensor);
    }

    #[test]
    fn missing_keys_fall_back_per_key() {
        let cfg = Config::from_json_str(
            r#"{
                "simulation": { "num_timesteps": 10, "random_seed": 5 },
                "model": { "disk_center_y": -0.2, "current_vector_x": 0.01 }
            }"#,
        )
        .unwrap();

        assert_eq!(cfg.simulation.num_timesteps, 10);
        assert_eq!(cfg.simulation.random_seed, Some(5));
        assert_eq!(
            cfg.simulation.min_remaining_food_pieces,
            DEFAULT_MIN_REMAINING_FOOD_PIECES
        );
        assert_eq!(cfg.model.disk_center(), Point3::new(0.0, -0.2, 0.0));
        assert_eq!(cfg.model.current(), Vector3::new(0.01, 0.0, 0.0));
        assert_eq!(cfg.model.tentacle_length, DEFAULT_TENTACLE_LENGTH);
    }

    #[test]
    fn consumption_scan_uses_snake_case_names() {
        let cfg =
            Config::from_json_str(r#"{ "simulation": { "consumption_scan": "all_sensors" } }"#)
                .unwrap();
        assert_eq!(cfg.simulation.consumption_scan, ConsumptionScan::AllSensors);
    }

    #[test]
    fn wrongly_typed_value_is_rejected() {
        assert!(Config::from_json_str(r#"{ "model": { "num_tentacles": "twelve" } }"#).is_err());
    }

    #[test]
    fn level_names_map_to_filters() {
        assert_eq!(parse_level_name("critical"), LevelFilter::Error);
        assert_eq!(parse_level_name("error"), LevelFilter::Error);
        assert_eq!(parse_level_name("warning"), LevelFilter::Warn);
        assert_eq!(parse_level_name("INFO"), LevelFilter::Info);
        assert_eq!(parse_level_name("debug"), LevelFilter::Debug);
        assert_eq!(parse_level_name("verbose"), LevelFilter::Error);
        assert_eq!(LoggingSection::default().level_filter(), LevelFilter::Error);
    }

    #[test]
    fn default_config_round_trips_through_json() {
        let text = Config::default().to_json_pretty().unwrap();
        assert_eq!(Config::from_json_str(&text).unwrap(), Config::default());
    }

    #[test]
    fn run_limits_follow_simulation_section() {
        let mut cfg = Config::default();
        cfg.simulation.num_timesteps = 3;
        cfg.simulation.min_remaining_food_pieces = 7;
        let limits = cfg.run_limits();
        assert_eq!(limits.max_timesteps, 3);
        assert_eq!(limits.min_remaining_food, 7);
    }
}
