//! # Terrain Module
//!
//! Converts a height map into the colored, flat-shaded triangle mesh of one
//! world block.
//!
//! The mesh is an unindexed triangle list: two triangles per height-map
//! cell, `(W-1)*(H-1)*6` vertices total, each carrying its triangle's flat
//! normal and a color from the grid-marking pattern. No vertices are shared,
//! which is what keeps the normals flat.

pub mod heightmap;
pub mod vertex;

use cgmath::{InnerSpace, Vector3};

pub use heightmap::Heightmap;
pub use vertex::TerrainVertex;

/// Rows/columns between grid-marking lines.
const GRID_STEP: usize = 8;

/// Color of the alternating band A.
const BAND_COLOR_A: Vector3<f32> = Vector3::new(0.7, 0.0, 0.9);
/// Color of the alternating band B.
const BAND_COLOR_B: Vector3<f32> = Vector3::new(0.7, 0.7, 1.0);
/// Color of the grid-marking lines.
const GRIDLINE_COLOR: Vector3<f32> = Vector3::new(0.4, 0.8, 0.4);

/// The triangle mesh of one world block's terrain.
pub struct TerrainMesh {
    vertices: Vec<TerrainVertex>,
}

impl TerrainMesh {
    /// Builds the mesh for one block.
    ///
    /// Height-map cell `(column j, row i)` maps to block-local position
    /// `(j, height, (H-1) - i)`, translated by half the block size on x and
    /// z so the block is centered on its grid coordinate's origin.
    ///
    /// The color pattern is driven by a counter that advances by one per
    /// cell and jumps by [`GRID_STEP`] at the start of every
    /// [`GRID_STEP`]-th row: cells alternate between two band colors in
    /// 8-row stripes, and every 8th row or column is overridden with the
    /// gridline color.
    ///
    /// # Arguments
    /// * `map` - The height samples, already scaled to world units
    /// * `block_size` - Edge length of the block, for the centering offset
    pub fn build(map: &Heightmap, block_size: f32) -> Self {
        let (w, h) = (map.width(), map.height());
        let half = block_size / 2.0;
        let offset = Vector3::new(half, 0.0, half);

        let position_at = |column: usize, row: usize| -> Vector3<f32> {
            Vector3::new(
                column as f32,
                map.get(column, row),
                (h - 1) as f32 - row as f32,
            ) - offset
        };

        let mut vertices = Vec::with_capacity((w - 1) * (h - 1) * 6);
        let mut it = 0usize;

        for i in 0..h - 1 {
            if i % GRID_STEP == 0 {
                it += GRID_STEP;
            }
            for j in 0..w - 1 {
                let upper_left = position_at(j, i);
                let upper_right = position_at(j + 1, i);
                let lower_left = position_at(j, i + 1);
                let lower_right = position_at(j + 1, i + 1);

                let normal_1 = triangle_normal(upper_left, upper_right, lower_left);
                let normal_2 = triangle_normal(lower_left, upper_right, lower_right);

                let mut color = if it % (2 * GRID_STEP) < GRID_STEP {
                    BAND_COLOR_A
                } else {
                    BAND_COLOR_B
                };
                if it % GRID_STEP == 0 || j % GRID_STEP == 0 {
                    color = GRIDLINE_COLOR;
                }
                it += 1;

                vertices.push(TerrainVertex::new(upper_left, normal_1, color));
                vertices.push(TerrainVertex::new(upper_right, normal_1, color));
                vertices.push(TerrainVertex::new(lower_left, normal_1, color));

                vertices.push(TerrainVertex::new(lower_left, normal_2, color));
                vertices.push(TerrainVertex::new(upper_right, normal_2, color));
                vertices.push(TerrainVertex::new(lower_right, normal_2, color));
            }
        }

        Self { vertices }
    }

    /// The unindexed triangle list, ready for upload.
    pub fn vertices(&self) -> &[TerrainVertex] {
        &self.vertices
    }

    /// Number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Finds the terrain height and surface normal nearest to `point` in
    /// the xz plane.
    ///
    /// This is the grounding hook for character placement; full collision
    /// resolution is out of scope.
    ///
    /// # Returns
    /// `(height, normal)` of the nearest vertex, or `None` for an empty
    /// mesh.
    pub fn height_and_normal(&self, point: Vector3<f32>) -> Option<(f32, Vector3<f32>)> {
        let mut best: Option<(f32, &TerrainVertex)> = None;
        for vertex in &self.vertices {
            let dx = vertex.position[0] - point.x;
            let dz = vertex.position[2] - point.z;
            let distance = dx * dx + dz * dz;
            match best {
                Some((closest, _)) if distance >= closest => {}
                _ => best = Some((distance, vertex)),
            }
        }
        best.map(|(_, v)| (v.position[1], Vector3::from(v.normal)))
    }
}

/// Flat normal of the triangle `(a, b, c)`, counter-clockwise winding.
fn triangle_normal(a: Vector3<f32>, b: Vector3<f32>, c: Vector3<f32>) -> Vector3<f32> {
    (b - a).cross(c - a).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_map(size: usize, height: f32) -> Heightmap {
        Heightmap::from_samples(size, size, vec![height; size * size])
    }

    #[test]
    fn vertex_count_matches_cell_count() {
        let map = Heightmap::from_noise(17, 13, 0, 1.0);
        let mesh = TerrainMesh::build(&map, 100.0);
        assert_eq!(mesh.vertex_count(), 16 * 12 * 6);
    }

    #[test]
    fn flat_terrain_has_upward_normals() {
        let mesh = TerrainMesh::build(&flat_map(9, 3.0), 100.0);
        for vertex in mesh.vertices() {
            assert!((vertex.normal[1] - 1.0).abs() < 1e-5);
            assert!(vertex.normal[0].abs() < 1e-5);
            assert!(vertex.normal[2].abs() < 1e-5);
        }
    }

    #[test]
    fn mesh_is_centered_on_the_block_origin() {
        let mesh = TerrainMesh::build(&flat_map(3, 0.0), 100.0);
        let xs: Vec<f32> = mesh.vertices().iter().map(|v| v.position[0]).collect();
        let zs: Vec<f32> = mesh.vertices().iter().map(|v| v.position[2]).collect();
        assert!(xs.iter().cloned().fold(f32::INFINITY, f32::min) == -50.0);
        assert!(zs.iter().cloned().fold(f32::INFINITY, f32::min) == -50.0);
        assert!(xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max) == -48.0);
    }

    #[test]
    fn every_eighth_column_is_a_gridline() {
        let mesh = TerrainMesh::build(&flat_map(18, 0.0), 100.0);
        // 17 cells per row, 6 vertices per cell. Column 8 of any row gets
        // the gridline color.
        let row = 9usize; // a row inside the second stripe
        let cell = row * 17 + 8;
        let vertex = &mesh.vertices()[cell * 6];
        assert_eq!(Vector3::from(vertex.color), GRIDLINE_COLOR);
    }

    #[test]
    fn first_stripe_rows_are_gridlines_then_bands_alternate() {
        let mesh = TerrainMesh::build(&flat_map(18, 0.0), 100.0);
        // Row 0, column 1: the counter is 9 there (8 from the row jump plus
        // one cell), so 9 % 16 >= 8 selects band B and no gridline applies.
        let vertex = &mesh.vertices()[6];
        assert_eq!(Vector3::from(vertex.color), BAND_COLOR_B);
    }

    #[test]
    fn height_query_returns_the_nearest_vertex() {
        let mut samples = vec![0.0; 9];
        samples[4] = 7.0; // center of a 3x3 map
        let map = Heightmap::from_samples(3, 3, samples);
        let mesh = TerrainMesh::build(&map, 100.0);

        // Center vertex sits at (-49, 7, -49) after centering.
        let (height, normal) = mesh
            .height_and_normal(Vector3::new(-49.0, 0.0, -49.0))
            .unwrap();
        assert_eq!(height, 7.0);
        assert!((normal.magnitude() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn sloped_terrain_normals_are_unit_length() {
        let map = Heightmap::from_noise(9, 9, 3, 0.5);
        let mesh = TerrainMesh::build(&map, 100.0);
        for vertex in mesh.vertices() {
            let n = Vector3::from(vertex.normal);
            assert!((n.magnitude() - 1.0).abs() < 1e-4);
        }
    }
}
