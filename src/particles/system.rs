//! The particle system: a fixed-capacity slot pool with emission, aging and
//! retirement.
//!
//! ## Lifecycle
//!
//! Slots are pre-allocated at construction and cycle between the `inactive`
//! free list and the `active` list (kept in spawn order). Emission promotes
//! one free slot per elapsed emission period; retirement returns expired
//! slots to the free list and unregisters their visual handle exactly once.
//!
//! Retirement is two-pass: expired slots are collected first and removed
//! afterwards, so the traversal never mutates the list it is iterating.

use std::sync::Arc;

use cgmath::{Deg, InnerSpace, Quaternion, Rotation, Rotation3, Vector3, Vector4, VectorSpace};

use crate::core::RandomSource;

use super::billboard::{Billboard, BillboardCollectors, RenderCollector, VisualHandle};
use super::descriptor::ParticleDescriptor;
use super::emitter::ParticleEmitter;

/// One pooled particle slot.
#[derive(Debug, Clone)]
pub struct Particle {
    /// The particle's visual state.
    pub billboard: Billboard,
    /// Current velocity in world units per second.
    pub velocity: Vector3<f32>,
    /// Seconds since this slot was emitted.
    pub current_time: f32,
    /// Seconds this slot lives before retirement.
    pub life_time: f32,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            billboard: Billboard::new(),
            velocity: Vector3::new(0.0, 0.0, 0.0),
            current_time: 0.0,
            life_time: 0.0,
        }
    }
}

/// One particle effect instance: a shared descriptor, an emitter, and the
/// slot pool.
pub struct ParticleSystem {
    descriptor: Arc<ParticleDescriptor>,
    emitter: ParticleEmitter,
    id: u32,
    character_owned: bool,
    particles: Vec<Particle>,
    /// Active slots in spawn order.
    active: Vec<usize>,
    /// Free slots, order irrelevant.
    inactive: Vec<usize>,
    time_since_last_emission: f32,
}

impl ParticleSystem {
    /// Creates a system and pre-allocates its pool.
    ///
    /// Capacity is `ceil(rate * (lifetime + lifetime_randomness)) + 1`, the
    /// most slots that can be live at once given the emission period and the
    /// longest possible particle life.
    ///
    /// # Arguments
    /// * `id` - Registry id of this system, embedded in visual handles
    /// * `descriptor` - Shared effect template
    /// * `emitter` - Spawn point
    /// * `character_owned` - Whether visuals go to the character collector
    ///
    /// # Panics
    /// A descriptor with a non-positive or non-finite emission rate or
    /// lifetime is a programming defect, not runtime data, and fails an
    /// assertion.
    pub fn new(
        id: u32,
        descriptor: Arc<ParticleDescriptor>,
        emitter: ParticleEmitter,
        character_owned: bool,
    ) -> Self {
        assert!(
            descriptor.emission_rate > 0.0 && descriptor.emission_rate.is_finite(),
            "particle descriptor '{}' has invalid emission rate",
            descriptor.name
        );
        assert!(
            descriptor.total_lifetime > 0.0 && descriptor.total_lifetime.is_finite(),
            "particle descriptor '{}' has invalid lifetime",
            descriptor.name
        );

        let max_particles = (descriptor.emission_rate
            * (descriptor.total_lifetime + descriptor.total_lifetime_randomness))
            .ceil() as usize
            + 1;

        Self {
            descriptor,
            emitter,
            id,
            character_owned,
            particles: vec![Particle::default(); max_particles],
            active: Vec::with_capacity(max_particles),
            inactive: (0..max_particles).collect(),
            time_since_last_emission: 0.0,
        }
    }

    /// Fixed pool capacity of this system.
    pub fn max_particles(&self) -> usize {
        self.particles.len()
    }

    /// Number of live particles.
    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    /// Number of free slots.
    pub fn inactive_len(&self) -> usize {
        self.inactive.len()
    }

    /// Whether this system publishes to the character collector.
    pub fn character_owned(&self) -> bool {
        self.character_owned
    }

    /// The system's emitter, for repositioning.
    pub fn emitter_mut(&mut self) -> &mut ParticleEmitter {
        &mut self.emitter
    }

    /// The shared effect template.
    pub fn descriptor(&self) -> &ParticleDescriptor {
        &self.descriptor
    }

    fn handle(&self, slot: usize) -> VisualHandle {
        VisualHandle {
            system: self.id,
            slot: slot as u32,
        }
    }

    /// Resolves a pool slot to its billboard, if that slot is live.
    pub fn billboard_for(&self, slot: u32) -> Option<Billboard> {
        let slot = slot as usize;
        if self.active.contains(&slot) {
            Some(self.particles[slot].billboard)
        } else {
            None
        }
    }

    /// Advances the system by `dt` seconds. Must be called exactly once per
    /// frame per system.
    ///
    /// # Arguments
    /// * `dt` - Frame time in seconds, non-negative and finite
    /// * `character_owned` - Selects which collector receives visual handles
    /// * `rng` - Source for all randomized spawn parameters
    /// * `collectors` - The world's billboard collectors
    pub fn update(
        &mut self,
        dt: f32,
        character_owned: bool,
        rng: &mut RandomSource,
        collectors: &mut BillboardCollectors,
    ) {
        self.emit(character_owned, rng, collectors);
        self.time_since_last_emission += dt;

        self.advance(dt);
        self.retire(character_owned, collectors);
    }

    /// Promotes at most one free slot when the emission period has elapsed.
    fn emit(
        &mut self,
        character_owned: bool,
        rng: &mut RandomSource,
        collectors: &mut BillboardCollectors,
    ) {
        let period = 1.0 / self.descriptor.emission_rate;
        if self.time_since_last_emission <= period || self.inactive.is_empty() {
            return;
        }
        self.time_since_last_emission = 0.0;

        // Any free slot will do; the back of the list is cheapest.
        let Some(slot) = self.inactive.pop() else {
            return;
        };
        self.active.push(slot);

        let d = &self.descriptor;
        let particle = &mut self.particles[slot];
        particle.billboard.position = self.emitter.position();
        particle.billboard.size =
            d.initial_size + rng.uniform(-1.0, 1.0) * d.initial_size_randomness;
        particle.billboard.color = d.initial_color;
        particle.billboard.angle =
            d.initial_rotation_angle + rng.uniform(0.0, d.initial_rotation_angle_randomness);
        particle.current_time = 0.0;
        particle.life_time =
            d.total_lifetime + d.total_lifetime_randomness * rng.uniform(-1.0, 1.0);
        particle.velocity = cone_velocity(d.velocity, d.velocity_angle_randomness, rng);

        collectors
            .select_mut(character_owned)
            .register_visual(self.handle(slot));
    }

    /// Ages every active particle, including one emitted this frame.
    fn advance(&mut self, dt: f32) {
        let d = &self.descriptor;
        for &slot in &self.active {
            let p = &mut self.particles[slot];
            p.current_time += dt;
            p.billboard.position += p.velocity * dt;
            p.velocity += d.acceleration * dt;
            p.billboard.size += d.size_growth_velocity * dt;
            p.billboard.color = color_at(d, p.current_time, p.life_time, p.billboard.color);
        }
    }

    /// Returns expired slots to the free list, unregistering each visual
    /// exactly once.
    fn retire(&mut self, character_owned: bool, collectors: &mut BillboardCollectors) {
        let expired: Vec<usize> = self
            .active
            .iter()
            .copied()
            .filter(|&slot| self.particles[slot].current_time > self.particles[slot].life_time)
            .collect();

        for slot in expired {
            self.active.retain(|&s| s != slot);
            collectors
                .select_mut(character_owned)
                .unregister_visual(self.handle(slot));
            self.inactive.push(slot);
        }
    }
}

/// Tilts the nominal velocity by a random angle up to `cone_degrees`, then
/// rolls it a full random turn about the nominal direction, yielding an even
/// cone distribution.
fn cone_velocity(
    nominal: Vector3<f32>,
    cone_degrees: f32,
    rng: &mut RandomSource,
) -> Vector3<f32> {
    if nominal.magnitude2() <= f32::EPSILON {
        return nominal;
    }

    // Tilt axis: perpendicular to the nominal velocity, derived from the
    // world up axis (any perpendicular works once the roll is applied).
    let perp = nominal.cross(Vector3::unit_y());
    let tilt_axis = if perp.magnitude2() > 1e-12 {
        perp.normalize()
    } else {
        Vector3::unit_x()
    };

    let tilt = rng.uniform(0.0, cone_degrees);
    let tilted = Quaternion::from_axis_angle(tilt_axis, Deg(tilt)).rotate_vector(nominal);

    let roll = rng.uniform(0.0, 360.0);
    Quaternion::from_axis_angle(nominal.normalize(), Deg(roll)).rotate_vector(tilted)
}

/// Computes a particle's color for the given age.
///
/// Three non-overlapping, contiguous phases over `[0, life]`:
/// fade-in (initial to mid), constant mid, fade-out (mid to end). Boundary
/// conditions use logical conjunction; ages outside `[0, life]` leave the
/// color unchanged.
fn color_at(
    d: &ParticleDescriptor,
    t: f32,
    life: f32,
    current: Vector4<f32>,
) -> Vector4<f32> {
    let mut color = current;
    if 0.0 <= t && t <= d.fade_in_time && d.fade_in_time > 0.0 {
        color = d.initial_color.lerp(d.mid_color, t / d.fade_in_time);
    }
    if d.fade_in_time < t && t <= life - d.fade_out_time {
        color = d.mid_color;
    }
    if life - d.fade_out_time < t && t <= life && d.fade_out_time > 0.0 {
        color = d
            .mid_color
            .lerp(d.end_color, (t - (life - d.fade_out_time)) / d.fade_out_time);
    }
    color
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Angle;

    fn test_descriptor() -> ParticleDescriptor {
        ParticleDescriptor {
            name: "test".to_string(),
            emission_rate: 2.0,
            total_lifetime: 1.0,
            total_lifetime_randomness: 0.0,
            fade_in_time: 0.25,
            fade_out_time: 0.25,
            initial_color: Vector4::new(1.0, 0.0, 0.0, 1.0),
            mid_color: Vector4::new(0.0, 1.0, 0.0, 1.0),
            end_color: Vector4::new(0.0, 0.0, 1.0, 0.0),
            velocity: Vector3::new(0.0, 5.0, 0.0),
            ..ParticleDescriptor::default()
        }
    }

    fn make_system(descriptor: ParticleDescriptor) -> ParticleSystem {
        ParticleSystem::new(
            0,
            Arc::new(descriptor),
            ParticleEmitter::new(Vector3::new(0.0, 0.0, 0.0)),
            false,
        )
    }

    #[test]
    fn capacity_is_ceil_of_rate_times_lifetime_plus_one() {
        // rate=2, lifetime=1, randomness=0 -> ceil(2) + 1 = 3
        assert_eq!(make_system(test_descriptor()).max_particles(), 3);

        let mut d = test_descriptor();
        d.emission_rate = 3.0;
        d.total_lifetime = 1.1;
        // ceil(3.3) + 1 = 5
        assert_eq!(make_system(d).max_particles(), 5);
    }

    #[test]
    fn two_half_second_steps_emit_exactly_one_particle() {
        let mut system = make_system(test_descriptor());
        let mut rng = RandomSource::with_seed(0);
        let mut collectors = BillboardCollectors::new(64);

        system.update(0.51, false, &mut rng, &mut collectors);
        system.update(0.51, false, &mut rng, &mut collectors);

        assert_eq!(system.active_len(), 1);
        assert_eq!(collectors.world.len(), 1);
    }

    #[test]
    fn pool_sum_invariant_holds_across_updates() {
        let mut system = make_system(test_descriptor());
        let mut rng = RandomSource::with_seed(3);
        let mut collectors = BillboardCollectors::new(64);

        for step in 0..200 {
            let dt = 0.05 + 0.1 * ((step % 7) as f32 / 7.0);
            system.update(dt, false, &mut rng, &mut collectors);
            assert_eq!(
                system.active_len() + system.inactive_len(),
                system.max_particles()
            );
        }
    }

    #[test]
    fn no_slot_is_both_active_and_inactive() {
        let mut system = make_system(test_descriptor());
        let mut rng = RandomSource::with_seed(9);
        let mut collectors = BillboardCollectors::new(64);

        for _ in 0..100 {
            system.update(0.3, false, &mut rng, &mut collectors);
            for slot in 0..system.max_particles() {
                let in_active = system.active.contains(&slot);
                let in_inactive = system.inactive.contains(&slot);
                assert!(in_active != in_inactive, "slot {slot} in both or neither");
            }
        }
    }

    #[test]
    fn expired_particle_is_retired_and_unregistered_once() {
        let mut system = make_system(test_descriptor());
        let mut rng = RandomSource::with_seed(1);
        let mut collectors = BillboardCollectors::new(64);

        // Emit one particle.
        system.update(0.6, false, &mut rng, &mut collectors);
        system.update(0.1, false, &mut rng, &mut collectors);
        assert_eq!(system.active_len(), 1);
        let live_before = collectors.world.len();

        // Age it just past its 1.0s lifetime.
        let retired_before = system.inactive_len();
        system.update(1.01, false, &mut rng, &mut collectors);
        assert!(system.inactive_len() >= retired_before);
        assert!(collectors.world.len() <= live_before + 1);
        // The retired slot's handle is gone from the collector.
        for handle in collectors.world.handles() {
            assert!(system.billboard_for(handle.slot).is_some());
        }
    }

    #[test]
    fn emission_pauses_while_pool_is_exhausted() {
        let mut d = test_descriptor();
        d.emission_rate = 100.0;
        d.total_lifetime = 0.05;
        let mut system = make_system(d);
        let capacity = system.max_particles();
        let mut rng = RandomSource::with_seed(5);
        let mut collectors = BillboardCollectors::new(1024);

        for _ in 0..500 {
            system.update(0.02, false, &mut rng, &mut collectors);
            assert!(system.active_len() <= capacity);
            assert_eq!(
                system.active_len() + system.inactive_len(),
                system.max_particles()
            );
        }
    }

    #[test]
    fn color_boundaries_are_exact() {
        let d = test_descriptor();
        let life = 1.0;
        let unset = Vector4::new(0.5, 0.5, 0.5, 0.5);

        // Exactly at fade-in end: mid color, not a phase-1 blend.
        let c = color_at(&d, d.fade_in_time, life, unset);
        assert_eq!(c, d.mid_color);

        // Exactly at the start of fade-out: still mid color.
        let c = color_at(&d, life - d.fade_out_time, life, unset);
        assert_eq!(c, d.mid_color);

        // Exactly at end of life: end color.
        let c = color_at(&d, life, life, unset);
        assert!((c - d.end_color).magnitude2() < 1e-10);

        // At birth: initial color.
        let c = color_at(&d, 0.0, life, unset);
        assert_eq!(c, d.initial_color);
    }

    #[test]
    fn mid_phase_is_constant() {
        let d = test_descriptor();
        for t in [0.3, 0.5, 0.7] {
            assert_eq!(color_at(&d, t, 1.0, d.initial_color), d.mid_color);
        }
    }

    #[test]
    fn fade_in_interpolates_linearly() {
        let d = test_descriptor();
        let c = color_at(&d, d.fade_in_time / 2.0, 1.0, d.initial_color);
        let expected = d.initial_color.lerp(d.mid_color, 0.5);
        assert!((c - expected).magnitude2() < 1e-10);
    }

    #[test]
    fn cone_velocity_preserves_magnitude_and_respects_cone() {
        let mut rng = RandomSource::with_seed(11);
        let nominal = Vector3::new(0.0, 10.0, 0.0);
        for _ in 0..200 {
            let v = cone_velocity(nominal, 15.0, &mut rng);
            assert!((v.magnitude() - nominal.magnitude()).abs() < 1e-3);
            let cos_angle = v.normalize().dot(nominal.normalize());
            assert!(cos_angle >= Deg(15.0f32).cos() - 1e-4);
        }
    }

    #[test]
    fn cone_velocity_of_zero_vector_is_zero() {
        let mut rng = RandomSource::with_seed(2);
        let v = cone_velocity(Vector3::new(0.0, 0.0, 0.0), 45.0, &mut rng);
        assert_eq!(v, Vector3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn seeded_runs_are_deterministic() {
        let run = |seed: u64| -> Vec<f32> {
            let mut system = make_system(test_descriptor());
            let mut rng = RandomSource::with_seed(seed);
            let mut collectors = BillboardCollectors::new(64);
            for _ in 0..30 {
                system.update(0.3, false, &mut rng, &mut collectors);
            }
            system
                .active
                .iter()
                .map(|&s| system.particles[s].billboard.position.y)
                .collect()
        };
        assert_eq!(run(77), run(77));
    }

    #[test]
    #[should_panic]
    fn zero_emission_rate_is_a_precondition_violation() {
        let mut d = test_descriptor();
        d.emission_rate = 0.0;
        make_system(d);
    }
}
