//! Camera framing state.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A coordinate axis the camera can be aligned with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Camera position and orientation, persisted through the `cam_state` property.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub position: Vec3,
    #[serde(default)]
    pub focal_point: Vec3,
    pub view_up: Vec3,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            position: Vec3::new(1.0, -0.4, 0.0),
            focal_point: Vec3::ZERO,
            view_up: Vec3::Z,
        }
    }
}

impl CameraState {
    /// Looks down `axis` from the `dir` side toward the origin.
    ///
    /// The view-up is `Z` when looking along `Y`, otherwise `Y`.
    pub fn along_axis(axis: Axis, dir: f32) -> Self {
        let (position, view_up) = match axis {
            Axis::X => (Vec3::new(dir, 0.0, 0.0), Vec3::Y),
            Axis::Y => (Vec3::new(0.0, dir, 0.0), Vec3::Z),
            Axis::Z => (Vec3::new(0.0, 0.0, dir), Vec3::Y),
        };
        Self {
            position,
            focal_point: Vec3::ZERO,
            view_up,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_views() {
        let cam = CameraState::along_axis(Axis::Y, -1.0);
        assert_eq!(cam.position, Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(cam.view_up, Vec3::Z);
        assert_eq!(CameraState::along_axis(Axis::Z, 1.0).view_up, Vec3::Y);
    }

    #[test]
    fn test_round_trip_json() {
        let cam = CameraState::along_axis(Axis::X, 1.0);
        let value = serde_json::to_value(cam).unwrap();
        let back: CameraState = serde_json::from_value(value).unwrap();
        assert_eq!(back, cam);
    }
}
