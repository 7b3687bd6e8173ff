//! Role Dispatch
//!
//! The role of a networked character is decided exactly once, at spawn,
//! and never changes for the object's lifetime. Instead of a boolean
//! "is mine" flag branched on all over one component, each role is its
//! own type behind a shared lifecycle trait, and the choice is made at
//! construction.

use tracing::debug;

use crate::player::config::PlayerConfig;
use crate::player::input::{InputFrame, SuspendHandle};
use crate::player::local::{LocalAuthorityController, LookPivot};
use crate::player::physics::PhysicsStepper;
use crate::player::pose::CharacterPose;
use crate::player::remote::RemoteProxyController;

/// Which side of the replication model a character object is on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// This process owns the character: input, simulation, outgoing poses.
    LocalAuthority,
    /// Another process owns it; we only smooth toward received poses.
    RemoteProxy,
}

/// Lifecycle surface shared by both roles.
///
/// The host drives `tick` from its simulation step and `render` from its
/// frame loop; neither role requires the other hook to be called, and
/// calling both on every controller is always safe.
pub trait CharacterController {
    /// Reset onto a spawn pose when the character enters the world.
    fn on_activate(&mut self, spawn: CharacterPose);

    /// Advance simulation by `dt`. No-op for a remote proxy.
    fn tick(&mut self, dt: f32, input: &InputFrame);

    /// Advance presentation by `dt`. No-op for a local authority.
    fn render(&mut self, dt: f32);

    /// The character is leaving the world.
    fn on_deactivate(&mut self);

    /// The pose to draw (and, for the authority, to broadcast).
    fn pose(&self) -> CharacterPose;

    /// Deliver a pose sample from the network.
    ///
    /// Meaningful only for a remote proxy; an authority is the source of
    /// truth for its own character and ignores incoming samples.
    fn receive(&mut self, _pose: CharacterPose) {}
}

impl CharacterController for LocalAuthorityController {
    fn on_activate(&mut self, spawn: CharacterPose) {
        self.activate(spawn);
    }

    fn tick(&mut self, dt: f32, input: &InputFrame) {
        LocalAuthorityController::tick(self, dt, input);
    }

    fn render(&mut self, _dt: f32) {
        // The host reads pose() and applies it to its camera; there is
        // nothing frame-rate dependent on the authority side.
    }

    fn on_deactivate(&mut self) {
        debug!("local authority deactivated");
    }

    fn pose(&self) -> CharacterPose {
        LocalAuthorityController::pose(self)
    }
}

impl CharacterController for RemoteProxyController {
    fn on_activate(&mut self, spawn: CharacterPose) {
        self.activate(spawn);
    }

    fn tick(&mut self, _dt: f32, _input: &InputFrame) {
        // Proxies never simulate.
    }

    fn render(&mut self, dt: f32) {
        RemoteProxyController::render(self, dt);
    }

    fn on_deactivate(&mut self) {
        debug!("remote proxy deactivated");
    }

    fn pose(&self) -> CharacterPose {
        RemoteProxyController::pose(self)
    }

    fn receive(&mut self, pose: CharacterPose) {
        RemoteProxyController::receive(self, pose);
    }
}

/// Build the controller for a freshly spawned character.
///
/// A remote proxy has no use for the stepper, pivot, or suspend handle;
/// they are simply dropped for that role.
pub fn spawn_controller(
    role: Role,
    config: PlayerConfig,
    stepper: Option<Box<dyn PhysicsStepper>>,
    look_pivot: Option<LookPivot>,
    suspend: SuspendHandle,
    spawn: CharacterPose,
) -> Box<dyn CharacterController> {
    let mut controller: Box<dyn CharacterController> = match role {
        Role::LocalAuthority => Box::new(LocalAuthorityController::new(
            config, stepper, look_pivot, suspend,
        )),
        Role::RemoteProxy => Box::new(RemoteProxyController::new(config.smoothing, spawn)),
    };
    controller.on_activate(spawn);
    controller
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vec3::Vec3;
    use crate::player::physics::FlatGround;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_local_role_simulates() {
        let mut controller = spawn_controller(
            Role::LocalAuthority,
            PlayerConfig::default(),
            Some(Box::new(FlatGround::at_origin())),
            Some(LookPivot::new()),
            SuspendHandle::new(),
            CharacterPose::at(Vec3::ZERO),
        );

        controller.tick(DT, &InputFrame::with_axes(1.0, 0.0));
        controller.render(DT);
        assert!(controller.pose().position.x > 0.0);
    }

    #[test]
    fn test_local_role_ignores_received_poses() {
        let mut controller = spawn_controller(
            Role::LocalAuthority,
            PlayerConfig::default(),
            Some(Box::new(FlatGround::at_origin())),
            Some(LookPivot::new()),
            SuspendHandle::new(),
            CharacterPose::at(Vec3::ZERO),
        );

        controller.receive(CharacterPose::at(Vec3::new(50.0, 0.0, 50.0)));
        controller.render(DT);
        assert_eq!(controller.pose().position, Vec3::ZERO);
    }

    #[test]
    fn test_remote_role_ignores_input() {
        let spawn = CharacterPose::at(Vec3::new(1.0, 0.0, 1.0));
        let mut controller = spawn_controller(
            Role::RemoteProxy,
            PlayerConfig::default(),
            None,
            None,
            SuspendHandle::new(),
            spawn,
        );

        controller.tick(DT, &InputFrame::with_axes(1.0, 1.0));
        controller.render(DT);
        assert_eq!(controller.pose().position, spawn.position);
    }

    #[test]
    fn test_remote_role_follows_received_poses() {
        let mut controller = spawn_controller(
            Role::RemoteProxy,
            PlayerConfig::default(),
            None,
            None,
            SuspendHandle::new(),
            CharacterPose::at(Vec3::ZERO),
        );

        let target = CharacterPose::at(Vec3::new(2.0, 0.0, 0.0));
        controller.receive(target);
        for _ in 0..300 {
            controller.render(DT);
        }
        assert!(controller.pose().position.distance(target.position) < 1e-3);
    }
}
