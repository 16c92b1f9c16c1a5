//! # Particles Module
//!
//! The particle effects engine: pooled transient entities emitted over time,
//! aged with deterministic phased color/size interpolation, and retired back
//! to their pool.
//!
//! ## Key Components
//! - `ParticleDescriptor`: immutable template shared by all particles of one
//!   effect
//! - `ParticleEmitter`: the spawn point of one effect
//! - `ParticleSystem`: one descriptor + emitter + fixed-capacity slot pool
//! - `ParticleSystemRegistry`: owns every system and ticks them each frame
//! - `BillboardList` / `BillboardCollectors`: render-collector registries the
//!   systems publish visual handles to
//!
//! ## Pool Invariant
//!
//! Every particle slot is in exactly one of a system's `active` or `inactive`
//! lists at all times, and `active.len() + inactive.len()` always equals the
//! system's fixed capacity. Pool transitions complete within a single
//! `update` pass; nothing outside the system ever observes a half-finished
//! transition.

pub mod billboard;
pub mod descriptor;
pub mod emitter;
pub mod registry;
pub mod system;

pub use billboard::{Billboard, BillboardCollectors, BillboardList, RenderCollector, VisualHandle};
pub use descriptor::ParticleDescriptor;
pub use emitter::ParticleEmitter;
pub use registry::{ParticleSystemRegistry, SystemId};
pub use system::ParticleSystem;
