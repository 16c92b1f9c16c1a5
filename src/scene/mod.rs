//! # Scene Module
//!
//! Scene description assets and the loader that produces them.
//!
//! A scene file is a tagged bracketed-section text format: a `[section]`
//! header followed by `key = value...` body lines. Recognized sections are
//! `cube`, `sphere`, `animationkey`, `animation`, `particledescriptor` and
//! `light`; a section whose tag starts with `#` is a comment. Any other tag
//! is a fatal load error.
//!
//! ## Ownership
//!
//! All parsed entities live in one [`SceneAssets`] container and are referred
//! to elsewhere by index, never by pointer. World blocks receive index lists
//! into these shared vectors at setup time.

pub mod animation;
pub mod light;
pub mod loader;
pub mod model;

use std::sync::Arc;

pub use animation::{Animation, AnimationKey};
pub use light::LightSource;
pub use loader::{load_scene, parse_scene, SceneError};
pub use model::{Model, ModelKind};

use crate::particles::ParticleDescriptor;

/// The fully parsed contents of a scene file.
///
/// This is the single owner of every scene entity. Subsystems that need an
/// entity hold an index into one of these vectors and resolve it through a
/// shared reference to the container.
#[derive(Debug, Default)]
pub struct SceneAssets {
    /// All models in the scene, in file order.
    pub models: Vec<Model>,
    /// Named keyframe snapshots referenced by animations.
    pub animation_keys: Vec<AnimationKey>,
    /// Animation tracks driving model transforms.
    pub animations: Vec<Animation>,
    /// Scene lights.
    pub lights: Vec<LightSource>,
    /// Particle effect templates, shared read-only by every system an
    /// emitter spawns.
    pub descriptors: Vec<Arc<ParticleDescriptor>>,
}

impl SceneAssets {
    /// Looks up an animation by name.
    ///
    /// # Returns
    /// The index of the animation in [`SceneAssets::animations`], if present.
    pub fn find_animation(&self, name: &str) -> Option<usize> {
        self.animations.iter().position(|a| a.name == name)
    }

    /// Looks up an animation key by name.
    pub fn find_animation_key(&self, name: &str) -> Option<usize> {
        self.animation_keys.iter().position(|k| k.name == name)
    }

    /// Looks up a particle descriptor by name.
    pub fn find_particle_descriptor(&self, name: &str) -> Option<usize> {
        self.descriptors.iter().position(|d| d.name == name)
    }
}
