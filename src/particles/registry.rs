//! The particle system registry.
//!
//! One registry per world owns every [`ParticleSystem`] instance, ticks them
//! once per frame, and resolves visual handles back to billboard records for
//! the sort pass and the external renderer.

use std::sync::Arc;

use cgmath::Vector3;

use crate::core::RandomSource;

use super::billboard::{Billboard, BillboardCollectors, VisualHandle};
use super::descriptor::ParticleDescriptor;
use super::emitter::ParticleEmitter;
use super::system::ParticleSystem;

/// Identifies one system within a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SystemId(pub u32);

/// Owns every particle system of one world.
#[derive(Default)]
pub struct ParticleSystemRegistry {
    systems: Vec<ParticleSystem>,
}

impl ParticleSystemRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            systems: Vec::new(),
        }
    }

    /// Number of systems owned.
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Whether no systems exist yet.
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Creates a new system and takes ownership of it.
    ///
    /// # Arguments
    /// * `descriptor` - Shared effect template
    /// * `position` - Emitter position
    /// * `character_owned` - Whether visuals go to the character collector
    ///
    /// # Returns
    /// The id of the new system.
    pub fn spawn(
        &mut self,
        descriptor: Arc<ParticleDescriptor>,
        position: Vector3<f32>,
        character_owned: bool,
    ) -> SystemId {
        let id = self.systems.len() as u32;
        self.systems.push(ParticleSystem::new(
            id,
            descriptor,
            ParticleEmitter::new(position),
            character_owned,
        ));
        SystemId(id)
    }

    /// Ticks every system exactly once.
    ///
    /// Each system's character flag selects the collector its handles go to.
    pub fn update_all(
        &mut self,
        dt: f32,
        rng: &mut RandomSource,
        collectors: &mut BillboardCollectors,
    ) {
        for system in &mut self.systems {
            let character_owned = system.character_owned();
            system.update(dt, character_owned, rng, collectors);
        }
    }

    /// Resolves a visual handle to the billboard it names, if still live.
    pub fn billboard(&self, handle: VisualHandle) -> Option<Billboard> {
        self.systems
            .get(handle.system as usize)
            .and_then(|s| s.billboard_for(handle.slot))
    }

    /// Borrows a system by id.
    pub fn get(&self, id: SystemId) -> Option<&ParticleSystem> {
        self.systems.get(id.0 as usize)
    }

    /// Mutably borrows a system by id, e.g. to move its emitter.
    pub fn get_mut(&mut self, id: SystemId) -> Option<&mut ParticleSystem> {
        self.systems.get_mut(id.0 as usize)
    }
}
