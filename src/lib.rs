#![warn(missing_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # World Engine
//!
//! An interactive 3D world simulator: a streaming block world with
//! height-map terrain, scene-driven models, animations, lights, and pooled
//! particle effects.
//!
//! ## Key Modules
//!
//! * `config` - Simulation settings loaded from JSON
//! * `core` - Core utilities, currently the deterministic random source
//! * `scene` - Scene description assets and the scene file loader
//! * `particles` - Particle descriptors, systems, pools and billboards
//! * `world` - Grid coordinates, terrain, blocks, the viewer and the
//!   streaming world manager
//!
//! ## Architecture
//!
//! The crate is the simulation core of an engine whose rendering, windowing
//! and input layers live outside it:
//! * All scene entities are owned by one container and referenced by index
//! * Particle systems publish visual handles to collectors; the renderer
//!   resolves handles to billboard records when it draws
//! * The world keeps a 3x3 block grid resident around the viewer, creating
//!   blocks lazily and never evicting them
//!
//! ## Usage
//!
//! ```rust,no_run
//! // Headless driver initialization
//! fn main() {
//!     world_engine::run();
//! }
//! ```

use std::path::Path;

use cgmath::Vector3;

use config::SimConfig;
use world::{Heightmap, WorldManager};

pub mod config;
pub mod core;
pub mod particles;
pub mod scene;
pub mod world;

/// Default configuration file consulted when none is given on the command
/// line.
const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Scene file loaded by the headless driver.
const DEFAULT_SCENE_PATH: &str = "assets/demo.scene";

/// Runs the headless simulation driver.
///
/// Loads configuration and scene, builds the world, and steps it through the
/// configured number of fixed-dt frames. A missing config file falls back to
/// defaults; a missing or malformed scene file is fatal.
pub fn run() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    log::info!("Logger initialized");

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = match config::load_config(&config_path) {
        Ok(config) => config,
        Err(config::ConfigError::Io(_)) if !Path::new(&config_path).exists() => {
            log::info!("no config file at '{config_path}', using defaults");
            SimConfig::default()
        }
        Err(err) => {
            log::error!("failed to load config '{config_path}': {err}");
            std::process::exit(1);
        }
    };

    let scene = match scene::load_scene(DEFAULT_SCENE_PATH) {
        Ok(scene) => scene,
        Err(err) => {
            log::error!("failed to load scene '{DEFAULT_SCENE_PATH}': {err}");
            std::process::exit(1);
        }
    };
    log::info!(
        "scene loaded: {} models, {} animations, {} lights, {} particle descriptors",
        scene.models.len(),
        scene.animations.len(),
        scene.lights.len(),
        scene.descriptors.len()
    );

    let heightmap = build_heightmap(&config);
    let mut world = WorldManager::new(scene, heightmap, &config);
    spawn_initial_effects(&mut world);

    log::info!(
        "world ready: {} resident blocks, viewer at {:?}",
        world.resident_len(),
        world.viewer().position
    );

    for frame in 0..config.frames {
        world.update(config.dt);
        if frame % 60 == 0 {
            log::debug!(
                "frame {frame}: center block ({}, {}), {} world billboards",
                world.center_block().x,
                world.center_block().y,
                world.billboards().world.len()
            );
        }
    }

    log::info!(
        "simulation finished: {} frames, {} resident blocks",
        config.frames,
        world.resident_len()
    );
}

/// Builds the terrain height map from the configured source.
///
/// An unreadable height-map image is fatal; procedural noise is the fallback
/// only when no image is configured at all.
fn build_heightmap(config: &SimConfig) -> Heightmap {
    match &config.heightmap_path {
        Some(path) => match Heightmap::from_image(path, config.height_scale) {
            Ok(map) => map,
            Err(err) => {
                log::error!("failed to load height map '{path}': {err}");
                std::process::exit(1);
            }
        },
        None => Heightmap::from_noise(
            config.terrain_resolution,
            config.terrain_resolution,
            config.seed as u32,
            config.height_scale,
        ),
    }
}

/// Spawns one system per particle descriptor the scene declares.
fn spawn_initial_effects(world: &mut WorldManager) {
    let names: Vec<String> = world
        .scene()
        .descriptors
        .iter()
        .map(|d| d.name.clone())
        .collect();
    for name in names {
        let position = Vector3::new(0.0, 2.0, 0.0);
        if world.spawn_effect(&name, position, false).is_some() {
            log::info!("spawned particle effect '{name}'");
        }
    }
}
