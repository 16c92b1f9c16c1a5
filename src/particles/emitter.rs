//! Particle emitters.

use cgmath::Vector3;

/// The spawn point of one particle effect.
#[derive(Debug, Clone, Copy)]
pub struct ParticleEmitter {
    position: Vector3<f32>,
}

impl ParticleEmitter {
    /// Creates an emitter at the given world position.
    pub fn new(position: Vector3<f32>) -> Self {
        Self { position }
    }

    /// The world position new particles spawn at.
    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    /// Moves the emitter, e.g. to follow an animated model.
    pub fn set_position(&mut self, position: Vector3<f32>) {
        self.position = position;
    }
}
