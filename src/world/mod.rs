//! # World Module
//!
//! The streaming world: grid coordinates, world blocks, terrain, the viewer,
//! and the manager that keeps a 3x3 grid of blocks resident around the
//! viewer.
//!
//! ## Streaming
//!
//! The manager tracks one state variable, the center block coordinate. Each
//! frame it recomputes the coordinate from the viewer position; when the
//! viewer crosses a block boundary the manager reconciles: it walks the
//! eight neighbor coordinates in fixed slot order, looks up or lazily
//! creates each block, and rebuilds the 9-element display list. Blocks are
//! never destroyed during a session, so resident memory grows monotonically
//! with the explored area — a known limitation of the design, not an
//! accident.
//!
//! ## Per-frame order
//!
//! Viewer movement, then center recomputation and reconcile, then particle
//! systems, then billboard ordering, then the active block. Block creation
//! always completes before its display index is published, so rendering may
//! index the display list 0..=8 without existence checks at any time after
//! construction.

pub mod block;
pub mod grid;
pub mod terrain;
pub mod viewer;

use std::collections::HashMap;
use std::sync::Arc;

use cgmath::{EuclideanSpace, Point3, Vector3};

use crate::config::SimConfig;
use crate::core::RandomSource;
use crate::particles::{BillboardCollectors, ParticleSystemRegistry, SystemId};
use crate::scene::SceneAssets;

pub use block::WorldBlock;
pub use grid::{center_block_for, neighbor_ring, GridCoordinate};
pub use terrain::{Heightmap, TerrainMesh, TerrainVertex};
pub use viewer::{Viewer, ViewerIntents};

/// Billboard capacity per collector.
const BILLBOARD_CAPACITY: usize = 2048;

/// The streaming world manager.
///
/// Owns the scene assets, the resident block registry, the particle system
/// registry, the billboard collectors, the viewer and the random source, and
/// coordinates them once per frame through [`WorldManager::update`].
pub struct WorldManager {
    block_size: f32,
    scene: SceneAssets,
    heightmap: Arc<Heightmap>,
    viewer: Viewer,
    intents: ViewerIntents,
    center_block: GridCoordinate,
    /// Resident blocks, in creation order. Never shrinks.
    blocks: Vec<WorldBlock>,
    /// Grid coordinate to resident index.
    block_index: HashMap<GridCoordinate, usize>,
    /// Indices of the 9 displayed blocks: ring slots 0..=7, center in 8.
    display: [usize; 9],
    particles: ParticleSystemRegistry,
    billboards: BillboardCollectors,
    rng: RandomSource,
}

impl WorldManager {
    /// Builds a world from parsed scene assets and a height map.
    ///
    /// The construction-time reconcile establishes the display-list
    /// invariant before the first frame: attempting to render earlier than
    /// that would be undefined, so the constructor never exposes such a
    /// state.
    ///
    /// # Arguments
    /// * `scene` - The fully parsed scene description
    /// * `heightmap` - Height samples shared by every block's terrain
    /// * `config` - Simulation settings
    pub fn new(scene: SceneAssets, heightmap: Heightmap, config: &SimConfig) -> Self {
        let start = config.viewer_start;
        let mut world = Self {
            block_size: config.block_size,
            scene,
            heightmap: Arc::new(heightmap),
            viewer: Viewer::new(Point3::new(start[0], start[1], start[2])),
            intents: ViewerIntents::default(),
            center_block: GridCoordinate::new(0, 0),
            blocks: Vec::new(),
            block_index: HashMap::new(),
            display: [0; 9],
            particles: ParticleSystemRegistry::new(),
            billboards: BillboardCollectors::new(BILLBOARD_CAPACITY),
            rng: RandomSource::with_seed(config.seed),
        };
        world.ensure_block(GridCoordinate::new(0, 0));
        world.reconcile();
        world
    }

    /// The current center block coordinate.
    pub fn center_block(&self) -> GridCoordinate {
        self.center_block
    }

    /// Number of resident blocks.
    pub fn resident_len(&self) -> usize {
        self.blocks.len()
    }

    /// The indices of the 9 displayed blocks, ring slots first, center last.
    pub fn display_list(&self) -> [usize; 9] {
        self.display
    }

    /// Borrows a resident block by index.
    pub fn block(&self, index: usize) -> &WorldBlock {
        &self.blocks[index]
    }

    /// The 9 displayed blocks in slot order, for the render passes.
    pub fn displayed_blocks(&self) -> impl Iterator<Item = &WorldBlock> {
        self.display.iter().map(|&idx| &self.blocks[idx])
    }

    /// The viewer.
    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    /// Mutable viewer access, e.g. for teleporting in tests.
    pub fn viewer_mut(&mut self) -> &mut Viewer {
        &mut self.viewer
    }

    /// This frame's movement intents, written by the external input layer.
    pub fn intents_mut(&mut self) -> &mut ViewerIntents {
        &mut self.intents
    }

    /// The shared scene assets.
    pub fn scene(&self) -> &SceneAssets {
        &self.scene
    }

    /// The particle system registry, for handle resolution while drawing.
    pub fn particles(&self) -> &ParticleSystemRegistry {
        &self.particles
    }

    /// The billboard collectors, for the billboard render pass.
    pub fn billboards(&self) -> &BillboardCollectors {
        &self.billboards
    }

    /// Spawns a particle effect by descriptor name.
    ///
    /// The new system is assigned to every resident block.
    ///
    /// # Arguments
    /// * `descriptor_name` - Name of a loaded `[particledescriptor]`
    /// * `position` - Emitter position
    /// * `character_owned` - Whether visuals go to the character collector
    ///
    /// # Returns
    /// The id of the new system, or `None` when no descriptor has that name.
    pub fn spawn_effect(
        &mut self,
        descriptor_name: &str,
        position: Vector3<f32>,
        character_owned: bool,
    ) -> Option<SystemId> {
        let idx = self.scene.find_particle_descriptor(descriptor_name)?;
        let descriptor = self.scene.descriptors[idx].clone();
        let id = self.particles.spawn(descriptor, position, character_owned);
        for block in &mut self.blocks {
            block.particle_system_ids.push(id);
        }
        Some(id)
    }

    /// Advances the whole simulation by one frame.
    ///
    /// # Arguments
    /// * `dt` - Frame time in seconds, non-negative and finite
    pub fn update(&mut self, dt: f32) {
        // Viewer first: streaming decisions use this frame's position.
        let intents = self.intents;
        self.viewer.update(&intents, dt);

        let new_center = center_block_for(self.viewer.position, self.block_size);
        if new_center != self.center_block {
            log::info!(
                "viewer crossed into block ({}, {})",
                new_center.x,
                new_center.y
            );
            self.center_block = new_center;
            self.reconcile();
        }

        self.particles
            .update_all(dt, &mut self.rng, &mut self.billboards);

        let camera = self.viewer.position.to_vec();
        let particles = &self.particles;
        self.billboards
            .world
            .sort_back_to_front(camera, |h| particles.billboard(h));
        self.billboards
            .character
            .sort_back_to_front(camera, |h| particles.billboard(h));

        let active = self.display[8];
        self.blocks[active].update(dt, &mut self.scene);
    }

    /// Rebuilds the 9-element display list around the current center block,
    /// lazily creating blocks that are not yet resident.
    ///
    /// Idempotent for an unchanged center: repeated calls neither create
    /// duplicate blocks nor reorder the display list.
    pub fn reconcile(&mut self) {
        let ring = neighbor_ring(self.center_block);
        for (slot, coordinate) in ring.iter().enumerate() {
            self.display[slot] = self.ensure_block(*coordinate);
        }
        self.display[8] = self.ensure_block(self.center_block);
    }

    /// Looks up the resident block at `coordinate`, creating it on first
    /// demand.
    fn ensure_block(&mut self, coordinate: GridCoordinate) -> usize {
        if let Some(&idx) = self.block_index.get(&coordinate) {
            return idx;
        }

        let mut block = WorldBlock::new(coordinate, &self.heightmap, self.block_size);
        let system_ids: Vec<SystemId> = (0..self.particles.len() as u32).map(SystemId).collect();
        block.assign_scene(&self.scene, &system_ids);

        let idx = self.blocks.len();
        self.blocks.push(block);
        self.block_index.insert(coordinate, idx);
        log::debug!(
            "created world block ({}, {}), {} resident",
            coordinate.x,
            coordinate.y,
            self.blocks.len()
        );
        idx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::ParticleDescriptor;
    use std::collections::HashSet;

    fn test_world() -> WorldManager {
        let mut scene = SceneAssets::default();
        scene
            .descriptors
            .push(Arc::new(ParticleDescriptor::fountain()));
        let heightmap = Heightmap::from_noise(5, 5, 0, 1.0);
        WorldManager::new(scene, heightmap, &SimConfig::default())
    }

    fn displayed_coordinates(world: &WorldManager) -> Vec<GridCoordinate> {
        world.displayed_blocks().map(|b| b.coordinate()).collect()
    }

    #[test]
    fn construction_establishes_the_nine_block_invariant() {
        let world = test_world();
        assert_eq!(world.resident_len(), 9);
        assert_eq!(world.center_block(), GridCoordinate::new(0, 0));

        let coords: HashSet<GridCoordinate> =
            displayed_coordinates(&world).into_iter().collect();
        for dx in -1..=1 {
            for dz in -1..=1 {
                assert!(coords.contains(&GridCoordinate::new(dx, dz)));
            }
        }
        // Center block occupies the last display slot.
        assert_eq!(
            world.block(world.display_list()[8]).coordinate(),
            GridCoordinate::new(0, 0)
        );
    }

    #[test]
    fn default_viewer_start_is_inside_block_zero() {
        let mut world = test_world();
        world.update(1.0 / 60.0);
        // (3, 5, 20) with 100-unit blocks floors to (0, 0): no transition.
        assert_eq!(world.center_block(), GridCoordinate::new(0, 0));
        assert_eq!(world.resident_len(), 9);
    }

    #[test]
    fn reconcile_is_idempotent() {
        let mut world = test_world();
        let display_before = world.display_list();
        let resident_before = world.resident_len();

        world.reconcile();
        world.reconcile();

        assert_eq!(world.display_list(), display_before);
        assert_eq!(world.resident_len(), resident_before);
    }

    #[test]
    fn crossing_a_boundary_streams_in_one_new_column() {
        let mut world = test_world();
        world.viewer_mut().position = Point3::new(120.0, 5.0, 20.0);
        world.update(1.0 / 60.0);

        assert_eq!(world.center_block(), GridCoordinate::new(1, 0));
        // Previous 9 plus the column at x = 2.
        assert_eq!(world.resident_len(), 12);

        let coords: HashSet<GridCoordinate> =
            displayed_coordinates(&world).into_iter().collect();
        assert_eq!(coords.len(), 9);
        for dz in -1..=1 {
            assert!(coords.contains(&GridCoordinate::new(2, dz)));
        }
    }

    #[test]
    fn blocks_are_created_at_most_once_per_coordinate() {
        let mut world = test_world();
        let tour = [
            Point3::new(120.0, 5.0, 20.0),
            Point3::new(220.0, 5.0, 20.0),
            Point3::new(120.0, 5.0, 20.0),
            Point3::new(3.0, 5.0, 20.0),
            Point3::new(120.0, 5.0, 120.0),
            Point3::new(3.0, 5.0, 20.0),
        ];
        for position in tour {
            world.viewer_mut().position = position;
            world.update(0.1);
        }

        let coords: HashSet<GridCoordinate> = (0..world.resident_len())
            .map(|i| world.block(i).coordinate())
            .collect();
        assert_eq!(coords.len(), world.resident_len());
    }

    #[test]
    fn resident_blocks_are_never_evicted() {
        let mut world = test_world();
        world.viewer_mut().position = Point3::new(320.0, 5.0, 20.0);
        world.update(0.1);
        let grown = world.resident_len();
        assert!(grown > 9);

        world.viewer_mut().position = Point3::new(3.0, 5.0, 20.0);
        world.update(0.1);
        assert_eq!(world.resident_len(), grown);
    }

    #[test]
    fn spawned_effects_tick_with_the_world() {
        let mut world = test_world();
        let id = world
            .spawn_effect("fountain", Vector3::new(0.0, 2.0, 0.0), false)
            .unwrap();
        assert_eq!(id, SystemId(0));
        // Every resident block references the new system.
        for i in 0..world.resident_len() {
            assert!(world.block(i).particle_system_ids.contains(&id));
        }

        for _ in 0..30 {
            world.update(0.1);
        }
        assert!(!world.billboards().world.is_empty());

        let system = world.particles().get(id).unwrap();
        assert_eq!(
            system.active_len() + system.inactive_len(),
            system.max_particles()
        );
    }

    #[test]
    fn unknown_effect_name_spawns_nothing() {
        let mut world = test_world();
        assert!(world
            .spawn_effect("smoke", Vector3::new(0.0, 0.0, 0.0), false)
            .is_none());
        assert!(world.particles().is_empty());
    }

    #[test]
    fn display_list_is_always_renderable() {
        let mut world = test_world();
        for step in 0..50 {
            world.viewer_mut().position =
                Point3::new(step as f32 * 37.0, 5.0, step as f32 * 23.0);
            world.update(0.05);
            for &idx in world.display_list().iter() {
                assert!(idx < world.resident_len());
            }
        }
    }
}
