//! Particle effect templates.

use cgmath::{Vector3, Vector4};

/// An immutable-after-load template describing one particle effect.
///
/// A descriptor is shared read-only by every particle its emitter spawns;
/// systems hold it behind an `Arc` and never mutate it after the scene is
/// loaded.
#[derive(Debug, Clone)]
pub struct ParticleDescriptor {
    /// Effect name, referenced when spawning systems.
    pub name: String,
    /// Particles emitted per second.
    pub emission_rate: f32,
    /// Color at emission (RGBA).
    pub initial_color: Vector4<f32>,
    /// Color during the constant middle phase.
    pub mid_color: Vector4<f32>,
    /// Color at the end of life.
    pub end_color: Vector4<f32>,
    /// Seconds spent fading from initial to mid color.
    pub fade_in_time: f32,
    /// Seconds spent fading from mid to end color, at the end of life.
    pub fade_out_time: f32,
    /// Nominal particle lifetime in seconds.
    pub total_lifetime: f32,
    /// Half-width of the uniform lifetime jitter.
    pub total_lifetime_randomness: f32,
    /// Billboard size at emission, in world units.
    pub initial_size: f32,
    /// Half-width of the uniform size jitter.
    pub initial_size_randomness: f32,
    /// Size change per second.
    pub size_growth_velocity: f32,
    /// Nominal emission velocity.
    pub velocity: Vector3<f32>,
    /// Maximum cone angle, in degrees, the velocity may tilt away from its
    /// nominal direction.
    pub velocity_angle_randomness: f32,
    /// Constant acceleration applied to every particle.
    pub acceleration: Vector3<f32>,
    /// Billboard rotation angle at emission, in degrees.
    pub initial_rotation_angle: f32,
    /// Width of the uniform rotation angle jitter (added, not centered).
    pub initial_rotation_angle_randomness: f32,
}

impl Default for ParticleDescriptor {
    fn default() -> Self {
        Self {
            name: String::new(),
            emission_rate: 10.0,
            initial_color: Vector4::new(1.0, 1.0, 1.0, 1.0),
            mid_color: Vector4::new(1.0, 1.0, 1.0, 1.0),
            end_color: Vector4::new(1.0, 1.0, 1.0, 0.0),
            fade_in_time: 0.2,
            fade_out_time: 0.2,
            total_lifetime: 1.0,
            total_lifetime_randomness: 0.0,
            initial_size: 1.0,
            initial_size_randomness: 0.0,
            size_growth_velocity: 0.0,
            velocity: Vector3::new(0.0, 1.0, 0.0),
            velocity_angle_randomness: 0.0,
            acceleration: Vector3::new(0.0, 0.0, 0.0),
            initial_rotation_angle: 0.0,
            initial_rotation_angle_randomness: 0.0,
        }
    }
}

impl ParticleDescriptor {
    /// A water-fountain preset: fast upward emission bent back down by
    /// gravity, fading to transparent.
    pub fn fountain() -> Self {
        Self {
            name: "fountain".to_string(),
            emission_rate: 60.0,
            initial_color: Vector4::new(0.2, 0.4, 1.0, 1.0),
            mid_color: Vector4::new(0.6, 0.8, 1.0, 0.8),
            end_color: Vector4::new(0.9, 0.95, 1.0, 0.0),
            fade_in_time: 0.2,
            fade_out_time: 0.5,
            total_lifetime: 2.0,
            total_lifetime_randomness: 0.3,
            initial_size: 0.4,
            initial_size_randomness: 0.1,
            size_growth_velocity: 0.05,
            velocity: Vector3::new(0.0, 10.0, 0.0),
            velocity_angle_randomness: 15.0,
            acceleration: Vector3::new(0.0, -9.8, 0.0),
            initial_rotation_angle: 0.0,
            initial_rotation_angle_randomness: 360.0,
        }
    }

    /// A camp-fire preset: slow rising particles growing and fading out.
    pub fn fire() -> Self {
        Self {
            name: "fire".to_string(),
            emission_rate: 30.0,
            initial_color: Vector4::new(1.0, 0.8, 0.2, 1.0),
            mid_color: Vector4::new(1.0, 0.4, 0.1, 0.9),
            end_color: Vector4::new(0.3, 0.3, 0.3, 0.0),
            fade_in_time: 0.1,
            fade_out_time: 0.8,
            total_lifetime: 1.5,
            total_lifetime_randomness: 0.4,
            initial_size: 0.6,
            initial_size_randomness: 0.2,
            size_growth_velocity: 0.3,
            velocity: Vector3::new(0.0, 2.0, 0.0),
            velocity_angle_randomness: 25.0,
            acceleration: Vector3::new(0.0, 0.5, 0.0),
            initial_rotation_angle: 0.0,
            initial_rotation_angle_randomness: 360.0,
        }
    }
}
