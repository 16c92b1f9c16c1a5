//! The viewer: the simulated character position the streaming manager
//! follows.
//!
//! Input events and camera matrices live outside this crate; what arrives
//! here each frame is a set of movement intents, and what leaves is an
//! integrated world position.

use cgmath::{Angle, Point3, Rad, Vector3};

/// Movement intents for one frame, supplied by the external input layer.
#[derive(Debug, Default, Clone, Copy)]
pub struct ViewerIntents {
    /// Move along the facing direction.
    pub move_forward: bool,
    /// Move against the facing direction.
    pub move_backward: bool,
    /// Strafe left.
    pub move_left: bool,
    /// Strafe right.
    pub move_right: bool,
    /// Move straight up.
    pub move_up: bool,
    /// Move straight down.
    pub move_down: bool,
    /// Yaw rate in radians per second (positive turns right).
    pub turn: f32,
}

/// The viewer's position and heading.
#[derive(Debug)]
pub struct Viewer {
    /// World position.
    pub position: Point3<f32>,
    /// Heading around the Y axis.
    pub yaw: Rad<f32>,
    /// Movement speed in world units per second.
    pub speed: f32,
}

impl Viewer {
    /// Creates a viewer at `position` facing along -z.
    pub fn new(position: Point3<f32>) -> Self {
        Self {
            position,
            yaw: Rad(0.0),
            speed: 10.0,
        }
    }

    /// Integrates one frame of movement.
    ///
    /// # Arguments
    /// * `intents` - This frame's movement intents
    /// * `dt` - Frame time in seconds
    pub fn update(&mut self, intents: &ViewerIntents, dt: f32) {
        self.yaw += Rad(intents.turn) * dt;

        let (yaw_sin, yaw_cos) = self.yaw.sin_cos();
        let forward = Vector3::new(yaw_sin, 0.0, -yaw_cos);
        let right = Vector3::new(yaw_cos, 0.0, yaw_sin);

        let axis = |pos: bool, neg: bool| (pos as i32 - neg as i32) as f32;
        let ahead = axis(intents.move_forward, intents.move_backward);
        let side = axis(intents.move_right, intents.move_left);
        let rise = axis(intents.move_up, intents.move_down);

        self.position += forward * ahead * self.speed * dt;
        self.position += right * side * self.speed * dt;
        self.position.y += rise * self.speed * dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_moves_along_negative_z_by_default() {
        let mut viewer = Viewer::new(Point3::new(0.0, 0.0, 0.0));
        let intents = ViewerIntents {
            move_forward: true,
            ..ViewerIntents::default()
        };
        viewer.update(&intents, 1.0);
        assert!((viewer.position.z + viewer.speed).abs() < 1e-4);
        assert!(viewer.position.x.abs() < 1e-4);
    }

    #[test]
    fn idle_intents_do_not_move_the_viewer() {
        let mut viewer = Viewer::new(Point3::new(1.0, 2.0, 3.0));
        viewer.update(&ViewerIntents::default(), 0.5);
        assert_eq!(viewer.position, Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn quarter_turn_redirects_forward_motion() {
        let mut viewer = Viewer::new(Point3::new(0.0, 0.0, 0.0));
        viewer.yaw = Rad(std::f32::consts::FRAC_PI_2);
        let intents = ViewerIntents {
            move_forward: true,
            ..ViewerIntents::default()
        };
        viewer.update(&intents, 1.0);
        assert!((viewer.position.x - viewer.speed).abs() < 1e-4);
        assert!(viewer.position.z.abs() < 1e-4);
    }
}
