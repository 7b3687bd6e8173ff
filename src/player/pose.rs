//! Character Pose
//!
//! The minimal replicated state of one character: where the body is, how
//! it is turned, and how far the camera pivot is pitched. Everything a
//! peer needs to render the character, and nothing more - velocity is
//! deliberately not part of the pose.

use serde::{Deserialize, Serialize};

use crate::core::rotation::Quat;
use crate::core::vec3::Vec3;

/// The unit of replicated character state.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct CharacterPose {
    /// World-space body position.
    pub position: Vec3,
    /// Body orientation (yaw rotation about the vertical axis).
    pub orientation: Quat,
    /// Vertical camera angle in degrees, already clamped by the authority.
    ///
    /// Receivers must not re-clamp; they only interpolate toward it.
    pub look_pitch: f32,
}

impl CharacterPose {
    /// Create a pose from its parts.
    pub const fn new(position: Vec3, orientation: Quat, look_pitch: f32) -> Self {
        Self {
            position,
            orientation,
            look_pitch,
        }
    }

    /// Spawn pose at a position, facing yaw 0, looking level.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            orientation: Quat::IDENTITY,
            look_pitch: 0.0,
        }
    }
}
