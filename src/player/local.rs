//! Local Authority Integrator
//!
//! Runs once per simulation tick for the one character this process
//! owns. Converts input and ground-contact sensing into a displacement
//! request for the physics stepper and authors the outgoing
//! [`CharacterPose`]. Frame-rate independent: everything scales by the
//! tick's `dt`.
//!
//! Vertical velocity and ground contact never leave this struct - peers
//! only ever see the resulting pose.

use tracing::warn;

use crate::core::rotation::Quat;
use crate::core::vec3::Vec3;
use crate::player::config::PlayerConfig;
use crate::player::input::{InputFrame, SuspendHandle};
use crate::player::physics::PhysicsStepper;
use crate::player::pose::CharacterPose;

/// Private integration state, mutated once per tick.
#[derive(Clone, Copy, Debug, Default)]
pub struct MotionState {
    /// Accumulated vertical velocity (gravity and jump impulses).
    pub vertical_velocity: f32,
    /// Ground contact sampled from the stepper this tick.
    pub grounded: bool,
}

/// The dedicated camera pivot.
///
/// Kept separate from the body so vertical look rotates only the camera,
/// never the whole character.
#[derive(Clone, Copy, Debug, Default)]
pub struct LookPivot {
    /// Current pitch in degrees.
    pub pitch_deg: f32,
}

impl LookPivot {
    /// Pivot looking straight ahead.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Simulation owner for the locally controlled character.
pub struct LocalAuthorityController {
    config: PlayerConfig,
    motion: MotionState,
    yaw_deg: f32,
    position: Vec3,
    stepper: Option<Box<dyn PhysicsStepper>>,
    look_pivot: Option<LookPivot>,
    suspend: SuspendHandle,
}

impl LocalAuthorityController {
    /// Create the controller.
    ///
    /// A missing stepper or look pivot is a configuration fault, not a
    /// fatal one: the dependent behavior is disabled with a warning and
    /// every other part of the tick keeps running.
    pub fn new(
        config: PlayerConfig,
        stepper: Option<Box<dyn PhysicsStepper>>,
        look_pivot: Option<LookPivot>,
        suspend: SuspendHandle,
    ) -> Self {
        if stepper.is_none() {
            warn!("local authority has no physics stepper; movement disabled");
        }
        if look_pivot.is_none() {
            warn!("local authority has no look pivot; vertical look disabled");
        }
        let position = stepper.as_ref().map(|s| s.position()).unwrap_or(Vec3::ZERO);
        Self {
            config,
            motion: MotionState::default(),
            yaw_deg: 0.0,
            position,
            stepper,
            look_pivot,
            suspend,
        }
    }

    /// Reset onto a spawn pose.
    pub fn activate(&mut self, spawn: CharacterPose) {
        self.position = spawn.position;
        self.yaw_deg = spawn.orientation.yaw_deg();
        if let Some(pivot) = self.look_pivot.as_mut() {
            pivot.pitch_deg = spawn.look_pitch;
        }
        if let Some(stepper) = self.stepper.as_mut() {
            stepper.teleport(spawn.position);
        }
        self.motion = MotionState::default();
    }

    /// Run one simulation tick with a strictly positive `dt`.
    ///
    /// While input is suspended the horizontal request is forced to zero
    /// and jump/look input is ignored, but gravity keeps integrating and
    /// the move primitive still runs - a character standing on nothing
    /// falls even with the menu open.
    pub fn tick(&mut self, dt: f32, input: &InputFrame) {
        let suspended = self.suspend.is_suspended();

        // Horizontal request in this tick's yaw basis, before look input
        // rotates the body.
        let horizontal = if suspended {
            Vec3::ZERO
        } else {
            self.horizontal_move(input)
        };

        if let Some(stepper) = self.stepper.as_mut() {
            // Ground reset: a small negative velocity keeps the sensor
            // pressed between ticks instead of accumulating toward flicker.
            let grounded = stepper.grounded();
            if grounded && self.motion.vertical_velocity < 0.0 {
                self.motion.vertical_velocity = self.config.movement.grounded_epsilon;
            }

            self.motion.vertical_velocity += self.config.movement.gravity * dt;

            if !suspended && input.jump_pressed() && grounded {
                // Launch velocity derived from the apex height so jump
                // tuning survives gravity changes.
                self.motion.vertical_velocity =
                    (self.config.movement.jump_height * -2.0 * self.config.movement.gravity).sqrt();
            }

            // One displacement request per tick; the stepper resolves
            // collisions and reports ground contact for the next tick.
            let displacement =
                (horizontal + Vec3::new(0.0, self.motion.vertical_velocity, 0.0)).scale(dt);
            self.motion.grounded = stepper.move_by(displacement);
            self.position = stepper.position();
        }

        if !suspended {
            self.apply_look(dt, input);
        }
    }

    /// Horizontal request in the body's yaw basis, speed-capped so
    /// diagonal input is no faster than a single axis.
    fn horizontal_move(&self, input: &InputFrame) -> Vec3 {
        let mut dir = Vec3::right_from_yaw(self.yaw_deg).scale(input.axis_x)
            + Vec3::forward_from_yaw(self.yaw_deg).scale(input.axis_y);
        if dir.length() > 1.0 {
            dir = dir.normalize();
        }
        dir.scale(self.config.movement.move_speed)
    }

    /// Yaw rotates the body; pitch accumulates on the pivot and is
    /// clamped there.
    fn apply_look(&mut self, dt: f32, input: &InputFrame) {
        let look = &self.config.look;
        self.yaw_deg += input.pointer_dx * look.sensitivity * dt;

        if let Some(pivot) = self.look_pivot.as_mut() {
            pivot.pitch_deg -= input.pointer_dy * look.sensitivity * dt;
            if look.clamp_vertical {
                pivot.pitch_deg = pivot.pitch_deg.clamp(look.min_pitch, look.max_pitch);
            }
        }
    }

    /// The pose this authority is currently vouching for.
    pub fn pose(&self) -> CharacterPose {
        CharacterPose {
            position: self.position,
            orientation: Quat::from_yaw_deg(self.yaw_deg),
            look_pitch: self
                .look_pivot
                .as_ref()
                .map(|p| p.pitch_deg)
                .unwrap_or(0.0),
        }
    }

    /// Integration state, for diagnostics and the head bob driver.
    pub fn motion(&self) -> &MotionState {
        &self.motion
    }

    /// Current body yaw in degrees.
    pub fn yaw_deg(&self) -> f32 {
        self.yaw_deg
    }

    /// Current body position.
    pub fn position(&self) -> Vec3 {
        self.position
    }
}

// =============================================================================
// TESTS
// =============================================================================
