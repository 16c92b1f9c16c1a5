//! Scene model entities.
//!
//! Models are flat data: a kind tag plus a transform, optionally driven by a
//! named animation. There is no class hierarchy; rendering code dispatches on
//! [`ModelKind`] at a single call site.

use cgmath::{Deg, Matrix4, Vector3};

/// The shape variant of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    /// Axis-aligned unit cube scaled by the model transform.
    Cube,
    /// Unit sphere scaled by the model transform.
    Sphere,
    /// Block-local terrain; geometry comes from the terrain mesh builder.
    Terrain,
}

/// A named, positioned scene model.
#[derive(Debug, Clone)]
pub struct Model {
    /// Model name, mainly for debugging and scene cross-references.
    pub name: String,
    /// Shape variant.
    pub kind: ModelKind,
    /// Position in world units, relative to the owning block's origin.
    pub position: Vector3<f32>,
    /// Per-axis scale factors.
    pub scaling: Vector3<f32>,
    /// Rotation axis.
    pub rotation_axis: Vector3<f32>,
    /// Rotation angle about `rotation_axis`, in degrees.
    pub rotation_angle_deg: f32,
    /// Name of the animation driving this model, if any.
    pub animation: Option<String>,
}

impl Model {
    /// Creates an untransformed model of the given kind.
    pub fn new(kind: ModelKind) -> Self {
        Self {
            name: String::new(),
            kind,
            position: Vector3::new(0.0, 0.0, 0.0),
            scaling: Vector3::new(1.0, 1.0, 1.0),
            rotation_axis: Vector3::new(0.0, 1.0, 0.0),
            rotation_angle_deg: 0.0,
            animation: None,
        }
    }

    /// Computes the model's world transform from its own fields.
    ///
    /// Translation, then rotation, then scaling. When the model is animated
    /// the animation supplies the translation/rotation part instead; see
    /// [`Model::world_matrix_with`].
    pub fn world_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from_axis_angle(self.rotation_axis, Deg(self.rotation_angle_deg))
            * Matrix4::from_nonuniform_scale(self.scaling.x, self.scaling.y, self.scaling.z)
    }

    /// Computes the world transform, substituting an animation-provided
    /// translation/rotation when one is given.
    ///
    /// # Arguments
    /// * `animated` - The interpolated animation transform for this frame,
    ///   or `None` for a static model
    pub fn world_matrix_with(&self, animated: Option<Matrix4<f32>>) -> Matrix4<f32> {
        match animated {
            Some(anim) => {
                anim * Matrix4::from_nonuniform_scale(
                    self.scaling.x,
                    self.scaling.y,
                    self.scaling.z,
                )
            }
            None => self.world_matrix(),
        }
    }
}
