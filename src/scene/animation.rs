//! Keyframe animation tracks.
//!
//! An [`AnimationKey`] is a named transform snapshot; an [`Animation`] is an
//! ordered list of `(key, time)` pairs. Each frame the track's current time
//! advances and wraps at the track duration, and the transform for the
//! current time is found by linearly interpolating between the two bracketing
//! keys.

use cgmath::{Deg, Matrix4, Vector3, VectorSpace};

use super::SceneAssets;

/// A named transform snapshot used as one keyframe of an animation.
#[derive(Debug, Clone)]
pub struct AnimationKey {
    /// Key name, referenced by animations.
    pub name: String,
    /// Position at this key.
    pub position: Vector3<f32>,
    /// Scale at this key.
    pub scaling: Vector3<f32>,
    /// Rotation axis at this key.
    pub rotation_axis: Vector3<f32>,
    /// Rotation angle in degrees at this key.
    pub rotation_angle_deg: f32,
}

impl AnimationKey {
    /// Creates an identity key with the given name.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            position: Vector3::new(0.0, 0.0, 0.0),
            scaling: Vector3::new(1.0, 1.0, 1.0),
            rotation_axis: Vector3::new(0.0, 1.0, 0.0),
            rotation_angle_deg: 0.0,
        }
    }
}

/// One entry of an animation track: a key name and the track time at which
/// that key is reached.
#[derive(Debug, Clone)]
pub struct KeyFrame {
    /// Name of the [`AnimationKey`] this entry refers to.
    pub key: String,
    /// Track time of this entry, in seconds.
    pub time: f32,
}

/// An ordered keyframe track that drives a model transform over time.
#[derive(Debug, Clone)]
pub struct Animation {
    /// Track name, referenced by models.
    pub name: String,
    /// Keyframes in ascending time order.
    pub keys: Vec<KeyFrame>,
    /// Current track time in seconds, wrapped into `[0, duration)`.
    pub current_time: f32,
}

impl Animation {
    /// Creates an empty track with the given name.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            keys: Vec::new(),
            current_time: 0.0,
        }
    }

    /// The track duration: the time of the last keyframe.
    pub fn duration(&self) -> f32 {
        self.keys.last().map(|k| k.time).unwrap_or(0.0)
    }

    /// Advances the track time by `dt` seconds, wrapping at the duration.
    pub fn update(&mut self, dt: f32) {
        let duration = self.duration();
        if duration <= 0.0 {
            return;
        }
        self.current_time += dt;
        while self.current_time >= duration {
            self.current_time -= duration;
        }
    }

    /// Computes the interpolated transform at the current track time.
    ///
    /// Position, scale and rotation angle are interpolated linearly between
    /// the two keys bracketing the current time; the rotation axis is taken
    /// from the earlier key.
    ///
    /// # Arguments
    /// * `assets` - The scene container used to resolve key names
    ///
    /// # Returns
    /// The transform matrix, or identity when the track has no resolvable
    /// keys.
    pub fn transform_at(&self, assets: &SceneAssets) -> Matrix4<f32> {
        let resolved: Vec<(&AnimationKey, f32)> = self
            .keys
            .iter()
            .filter_map(|frame| {
                assets
                    .find_animation_key(&frame.key)
                    .map(|idx| (&assets.animation_keys[idx], frame.time))
            })
            .collect();

        let (before, after) = match resolved.len() {
            0 => return Matrix4::from_scale(1.0),
            1 => (resolved[0], resolved[0]),
            _ => {
                let next = resolved
                    .iter()
                    .position(|(_, time)| *time > self.current_time)
                    .unwrap_or(resolved.len() - 1);
                let prev = next.saturating_sub(1);
                (resolved[prev], resolved[next])
            }
        };

        let span = after.1 - before.1;
        let t = if span > 0.0 {
            ((self.current_time - before.1) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let position = before.0.position.lerp(after.0.position, t);
        let scaling = before.0.scaling.lerp(after.0.scaling, t);
        let angle =
            before.0.rotation_angle_deg + (after.0.rotation_angle_deg - before.0.rotation_angle_deg) * t;

        Matrix4::from_translation(position)
            * Matrix4::from_axis_angle(before.0.rotation_axis, Deg(angle))
            * Matrix4::from_nonuniform_scale(scaling.x, scaling.y, scaling.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Point3, Transform};

    fn two_key_assets() -> SceneAssets {
        let mut assets = SceneAssets::default();
        let mut start = AnimationKey::named("start");
        start.position = Vector3::new(0.0, 0.0, 0.0);
        let mut end = AnimationKey::named("end");
        end.position = Vector3::new(10.0, 0.0, 0.0);
        assets.animation_keys.push(start);
        assets.animation_keys.push(end);

        let mut anim = Animation::named("slide");
        anim.keys.push(KeyFrame {
            key: "start".to_string(),
            time: 0.0,
        });
        anim.keys.push(KeyFrame {
            key: "end".to_string(),
            time: 2.0,
        });
        assets.animations.push(anim);
        assets
    }

    #[test]
    fn midpoint_interpolates_position() {
        let mut assets = two_key_assets();
        assets.animations[0].current_time = 1.0;
        let m = assets.animations[0].transform_at(&assets);
        let p = m.transform_point(Point3::new(0.0, 0.0, 0.0));
        assert!((p.x - 5.0).abs() < 1e-5);
    }

    #[test]
    fn update_wraps_at_duration() {
        let mut assets = two_key_assets();
        assets.animations[0].update(2.5);
        assert!((assets.animations[0].current_time - 0.5).abs() < 1e-5);
    }

    #[test]
    fn empty_track_yields_identity() {
        let assets = SceneAssets::default();
        let anim = Animation::named("noop");
        let m = anim.transform_at(&assets);
        let p = m.transform_point(Point3::new(1.0, 2.0, 3.0));
        assert!((p.x - 1.0).abs() < 1e-6 && (p.y - 2.0).abs() < 1e-6);
    }
}
