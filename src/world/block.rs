//! World blocks: one spatial chunk of the streamed world.

use crate::particles::SystemId;
use crate::scene::SceneAssets;

use super::grid::GridCoordinate;
use super::terrain::{Heightmap, TerrainMesh};

/// One fixed-size square chunk of the world.
///
/// A block owns its grid coordinate and its block-local terrain mesh, and
/// holds index lists naming the shared scene entities active within it. The
/// indices point into the world's single [`SceneAssets`] container and
/// particle registry; blocks never own scene entities.
///
/// Blocks are created on first demand and live for the rest of the session;
/// the world never evicts them.
pub struct WorldBlock {
    coordinate: GridCoordinate,
    terrain: TerrainMesh,
    /// Indices of the scene models visible in this block.
    pub model_ids: Vec<usize>,
    /// Indices of the animations this block advances while active.
    pub animation_ids: Vec<usize>,
    /// Indices of the animation keys referenced by those animations.
    pub animation_key_ids: Vec<usize>,
    /// Indices of the lights shining in this block.
    pub light_ids: Vec<usize>,
    /// Particle systems active within this block.
    pub particle_system_ids: Vec<SystemId>,
}

impl WorldBlock {
    /// Creates a block at `coordinate` and builds its terrain mesh.
    ///
    /// # Arguments
    /// * `coordinate` - The block's grid coordinate
    /// * `heightmap` - The shared height samples the terrain is built from
    /// * `block_size` - Edge length in world units
    pub fn new(coordinate: GridCoordinate, heightmap: &Heightmap, block_size: f32) -> Self {
        Self {
            coordinate,
            terrain: TerrainMesh::build(heightmap, block_size),
            model_ids: Vec::new(),
            animation_ids: Vec::new(),
            animation_key_ids: Vec::new(),
            light_ids: Vec::new(),
            particle_system_ids: Vec::new(),
        }
    }

    /// The block's grid coordinate.
    pub fn coordinate(&self) -> GridCoordinate {
        self.coordinate
    }

    /// The block-local terrain mesh.
    pub fn terrain(&self) -> &TerrainMesh {
        &self.terrain
    }

    /// Wires the shared scene lists into this block.
    ///
    /// Every block currently receives the full global lists; per-block
    /// filtering is not part of the current design.
    pub fn assign_scene(&mut self, scene: &SceneAssets, particle_systems: &[SystemId]) {
        self.model_ids = (0..scene.models.len()).collect();
        self.animation_ids = (0..scene.animations.len()).collect();
        self.animation_key_ids = (0..scene.animation_keys.len()).collect();
        self.light_ids = (0..scene.lights.len()).collect();
        self.particle_system_ids = particle_systems.to_vec();
    }

    /// Advances the block's scene state by one frame.
    ///
    /// Only the active (center) block is updated each frame, so shared
    /// animations advance exactly once per frame.
    pub fn update(&mut self, dt: f32, scene: &mut SceneAssets) {
        for &idx in &self.animation_ids {
            if let Some(animation) = scene.animations.get_mut(idx) {
                animation.update(dt);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Animation;
    use crate::scene::animation::KeyFrame;
    use cgmath::Point2;

    fn small_heightmap() -> Heightmap {
        Heightmap::from_noise(5, 5, 0, 1.0)
    }

    #[test]
    fn new_block_builds_its_terrain() {
        let block = WorldBlock::new(Point2::new(2, -1), &small_heightmap(), 100.0);
        assert_eq!(block.coordinate(), Point2::new(2, -1));
        assert_eq!(block.terrain().vertex_count(), 4 * 4 * 6);
    }

    #[test]
    fn assign_scene_wires_the_full_global_lists() {
        let mut scene = SceneAssets::default();
        scene.animations.push(Animation::named("a"));
        scene.animations.push(Animation::named("b"));

        let mut block = WorldBlock::new(Point2::new(0, 0), &small_heightmap(), 100.0);
        block.assign_scene(&scene, &[SystemId(0)]);

        assert_eq!(block.animation_ids, vec![0, 1]);
        assert_eq!(block.particle_system_ids, vec![SystemId(0)]);
    }

    #[test]
    fn update_advances_referenced_animations() {
        let mut scene = SceneAssets::default();
        let mut anim = Animation::named("loop");
        anim.keys.push(KeyFrame {
            key: "k".to_string(),
            time: 10.0,
        });
        scene.animations.push(anim);

        let mut block = WorldBlock::new(Point2::new(0, 0), &small_heightmap(), 100.0);
        block.assign_scene(&scene, &[]);
        block.update(0.25, &mut scene);

        assert!((scene.animations[0].current_time - 0.25).abs() < 1e-6);
    }
}
