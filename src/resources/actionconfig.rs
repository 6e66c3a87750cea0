//! Action runner configuration resource.
//!
//! Manages settings loaded from an INI configuration file. Provides defaults
//! for safe startup and methods to load/save configuration.
//!
//! # Configuration File Format
//!
//! ```ini
//! [scripts]
//! path = assets/actions.json
//!
//! [simulation]
//! fps = 60
//! time_scale = 1.0
//!
//! [path]
//! samples_per_point = 16
//! collinear_threshold = 0.999
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::{info, warn};
use std::path::PathBuf;

use crate::action::curve::{CurveSettings, DEFAULT_COLLINEAR_THRESHOLD, DEFAULT_SAMPLES_PER_POINT};

/// Default safe values for startup
const DEFAULT_SCRIPTS_PATH: &str = "./assets/actions.json";
const DEFAULT_FPS: u32 = 60;
const DEFAULT_TIME_SCALE: f32 = 1.0;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Action runner configuration resource.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ActionConfig {
    /// JSON file the script store is loaded from.
    pub scripts_path: PathBuf,
    /// Simulation frames per second (fixed step).
    pub fps: u32,
    /// Multiplier applied to every frame delta.
    pub time_scale: f32,
    /// Dense curve samples per control point.
    pub samples_per_point: usize,
    /// Collinearity cutoff used when reducing curve samples.
    pub collinear_threshold: f32,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            scripts_path: PathBuf::from(DEFAULT_SCRIPTS_PATH),
            fps: DEFAULT_FPS,
            time_scale: DEFAULT_TIME_SCALE,
            samples_per_point: DEFAULT_SAMPLES_PER_POINT,
            collinear_threshold: DEFAULT_COLLINEAR_THRESHOLD,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing or out-of-range values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply(&config);
        Ok(())
    }

    /// Load configuration from INI text.
    pub fn load_from_str(&mut self, contents: &str) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .read(contents.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply(&config);
        Ok(())
    }

    fn apply(&mut self, config: &Ini) {
        // [scripts] section
        if let Some(path) = config.get("scripts", "path") {
            self.scripts_path = PathBuf::from(path);
        }

        // [simulation] section
        if let Some(fps) = config.getuint("simulation", "fps").ok().flatten() {
            if fps > 0 {
                self.fps = fps as u32;
            } else {
                warn!("Ignoring simulation.fps = 0");
            }
        }
        if let Some(scale) = config.getfloat("simulation", "time_scale").ok().flatten() {
            if scale >= 0.0 {
                self.time_scale = scale as f32;
            } else {
                warn!("Ignoring negative simulation.time_scale {}", scale);
            }
        }

        // [path] section
        if let Some(samples) = config.getuint("path", "samples_per_point").ok().flatten() {
            if samples > 0 {
                self.samples_per_point = samples as usize;
            } else {
                warn!("Ignoring path.samples_per_point = 0");
            }
        }
        if let Some(threshold) = config.getfloat("path", "collinear_threshold").ok().flatten() {
            if threshold > 0.0 && threshold <= 1.0 {
                self.collinear_threshold = threshold as f32;
            } else {
                warn!("Ignoring path.collinear_threshold {} outside (0, 1]", threshold);
            }
        }

        info!(
            "Loaded config: scripts={}, fps={}, time_scale={}, samples_per_point={}, collinear_threshold={}",
            self.scripts_path.display(),
            self.fps,
            self.time_scale,
            self.samples_per_point,
            self.collinear_threshold
        );
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        config.set(
            "scripts",
            "path",
            Some(self.scripts_path.display().to_string()),
        );
        config.set("simulation", "fps", Some(self.fps.to_string()));
        config.set("simulation", "time_scale", Some(self.time_scale.to_string()));
        config.set(
            "path",
            "samples_per_point",
            Some(self.samples_per_point.to_string()),
        );
        config.set(
            "path",
            "collinear_threshold",
            Some(self.collinear_threshold.to_string()),
        );

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Curve construction settings for controllers.
    pub fn curve_settings(&self) -> CurveSettings {
        CurveSettings {
            samples_per_point: self.samples_per_point,
            collinear_threshold: self.collinear_threshold,
        }
    }

    /// Unscaled length of one simulation frame in seconds.
    pub fn frame_delta(&self) -> f32 {
        1.0 / self.fps.max(1) as f32
    }
}
