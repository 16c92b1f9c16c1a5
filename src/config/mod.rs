//! # Configuration Module
//!
//! Simulation settings loaded from a JSON file.
//!
//! Configuration covers the knobs that are not part of the scene description:
//! world block size, terrain source and resolution, the RNG seed, the viewer
//! start position, and the fixed time step used by the headless driver.
//! Everything has a sensible default so the engine runs without any file on
//! disk.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors produced while reading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be opened or read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid JSON or does not match [`SimConfig`].
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Top-level simulation configuration.
///
/// Deserialized from JSON; any missing field takes its default, so a config
/// file only needs to name the settings it overrides.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Edge length of one world block in world units.
    pub block_size: f32,
    /// Optional grayscale height-map image (PNG or BMP). When absent the
    /// terrain is generated procedurally from noise.
    pub heightmap_path: Option<String>,
    /// Side length of the procedural height map, in samples.
    pub terrain_resolution: usize,
    /// Multiplier applied to raw height samples.
    pub height_scale: f32,
    /// Seed for the simulation random source.
    pub seed: u64,
    /// Viewer start position (x, y, z).
    pub viewer_start: [f32; 3],
    /// Number of frames the headless driver steps.
    pub frames: u32,
    /// Fixed time step in seconds.
    pub dt: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            block_size: 100.0,
            heightmap_path: None,
            terrain_resolution: 65,
            height_scale: 5.0 / 12.0,
            seed: 0,
            viewer_start: [3.0, 5.0, 20.0],
            frames: 600,
            dt: 1.0 / 60.0,
        }
    }
}

/// Loads a [`SimConfig`] from a JSON file.
///
/// # Arguments
/// * `path` - Path to the JSON configuration file
///
/// # Returns
/// The parsed configuration, or a [`ConfigError`] describing why the file
/// could not be used.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SimConfig, ConfigError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let config = serde_json::from_reader(reader)?;
    Ok(config)
}
