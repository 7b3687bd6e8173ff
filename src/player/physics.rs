//! Physics Stepper Seam
//!
//! Collision resolution belongs to the host engine. The integrator only
//! needs two things from it: a ground-contact sample and a move
//! primitive that resolves a requested displacement and reports the
//! resulting ground contact. [`FlatGround`] is the reference
//! implementation used by tests and the demo loop.

use crate::core::vec3::Vec3;

/// The integrator's view of the host physics engine.
pub trait PhysicsStepper {
    /// Current ground-contact state.
    fn grounded(&self) -> bool;

    /// Resolve a displacement request against the world, mutating the
    /// body position. Returns the ground-contact state after the move.
    fn move_by(&mut self, displacement: Vec3) -> bool;

    /// Body position after the last resolved move.
    fn position(&self) -> Vec3;

    /// Place the body somewhere without sweeping (spawn / respawn).
    fn teleport(&mut self, position: Vec3);
}

/// Infinite flat floor at a fixed height.
///
/// Clamps any downward motion at the floor plane and reports grounded
/// while resting on it. Enough collision response to exercise the
/// integrator end to end.
#[derive(Debug, Clone)]
pub struct FlatGround {
    position: Vec3,
    floor_y: f32,
    grounded: bool,
}

impl FlatGround {
    /// Create a stepper with its body at `position` above a floor at
    /// `floor_y`.
    pub fn new(position: Vec3, floor_y: f32) -> Self {
        let grounded = position.y <= floor_y;
        Self {
            position: if grounded {
                Vec3::new(position.x, floor_y, position.z)
            } else {
                position
            },
            floor_y,
            grounded,
        }
    }

    /// Stepper resting on a floor at height zero.
    pub fn at_origin() -> Self {
        Self::new(Vec3::ZERO, 0.0)
    }
}

impl PhysicsStepper for FlatGround {
    fn grounded(&self) -> bool {
        self.grounded
    }

    fn move_by(&mut self, displacement: Vec3) -> bool {
        let mut next = self.position + displacement;
        if next.y <= self.floor_y {
            next.y = self.floor_y;
            self.grounded = true;
        } else {
            self.grounded = false;
        }
        self.position = next;
        self.grounded
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn teleport(&mut self, position: Vec3) {
        self.position = position;
        self.grounded = position.y <= self.floor_y;
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_ground_starts_grounded_on_floor() {
        let stepper = FlatGround::at_origin();
        assert!(stepper.grounded());
        assert_eq!(stepper.position(), Vec3::ZERO);
    }

    #[test]
    fn test_flat_ground_clamps_at_floor() {
        let mut stepper = FlatGround::new(Vec3::new(0.0, 2.0, 0.0), 0.0);
        assert!(!stepper.grounded());

        let grounded = stepper.move_by(Vec3::new(1.0, -5.0, 0.0));
        assert!(grounded);
        assert_eq!(stepper.position(), Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_flat_ground_leaves_floor_on_upward_move() {
        let mut stepper = FlatGround::at_origin();
        let grounded = stepper.move_by(Vec3::new(0.0, 0.3, 0.0));
        assert!(!grounded);
        assert!(stepper.position().y > 0.0);
    }

    #[test]
    fn test_flat_ground_teleport() {
        let mut stepper = FlatGround::at_origin();
        stepper.teleport(Vec3::new(5.0, 3.0, 5.0));
        assert_eq!(stepper.position(), Vec3::new(5.0, 3.0, 5.0));
        assert!(!stepper.grounded());
    }
}
