//! Scene light sources.

use cgmath::{Vector3, Vector4};

/// A positional or directional light.
///
/// The position is homogeneous: `w == 1` is a point light, `w == 0` a
/// directional light whose xyz is the direction toward the scene.
#[derive(Debug, Clone)]
pub struct LightSource {
    /// Light name, for debugging.
    pub name: String,
    /// Homogeneous position/direction.
    pub position: Vector4<f32>,
    /// RGB color.
    pub color: Vector3<f32>,
}

impl LightSource {
    /// Creates a white point light at the origin.
    pub fn new() -> Self {
        Self {
            name: String::new(),
            position: Vector4::new(0.0, 0.0, 0.0, 1.0),
            color: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Default for LightSource {
    fn default() -> Self {
        Self::new()
    }
}
