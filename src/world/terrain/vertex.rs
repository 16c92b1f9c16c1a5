//! The terrain vertex format.

use cgmath::Vector3;

/// One terrain vertex: position, flat normal and color.
///
/// # Memory Layout
/// Three tightly packed `[f32; 3]` fields (36 bytes total), matching the
/// position/normal/color attribute layout an external renderer uploads
/// directly from the mesh's vertex slice.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TerrainVertex {
    /// Position in block-local space.
    pub position: [f32; 3],
    /// Flat normal of the owning triangle.
    pub normal: [f32; 3],
    /// Vertex color from the grid-marking pattern.
    pub color: [f32; 3],
}

impl TerrainVertex {
    /// Packs a vertex from math types.
    pub fn new(position: Vector3<f32>, normal: Vector3<f32>, color: Vector3<f32>) -> Self {
        Self {
            position: position.into(),
            normal: normal.into(),
            color: color.into(),
        }
    }
}
