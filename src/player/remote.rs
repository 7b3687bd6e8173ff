//! Remote Proxy Smoother
//!
//! Presents another participant's character as smooth motion despite
//! discrete, delayed, possibly reordered pose arrivals. Pure cosmetics:
//! no physics, no gravity, no collision - the authoritative simulation
//! lives on the owning peer.

use crate::core::rotation::smoothing_alpha;
use crate::player::config::SmoothingConfig;
use crate::player::pose::CharacterPose;

/// Non-authoritative stand-in for a remotely owned character.
pub struct RemoteProxyController {
    config: SmoothingConfig,
    /// What the peer last told us. Seeded from the spawn transform so a
    /// proxy that has received nothing holds still instead of chasing an
    /// undefined target.
    target: CharacterPose,
    /// What we are currently drawing.
    rendered: CharacterPose,
}

impl RemoteProxyController {
    /// Create a proxy holding the given spawn pose.
    pub fn new(config: SmoothingConfig, spawn: CharacterPose) -> Self {
        Self {
            config,
            target: spawn,
            rendered: spawn,
        }
    }

    /// Store a received pose sample.
    ///
    /// Last write wins unconditionally: no buffering, no reorder
    /// correction, no dead reckoning. The transport may deliver samples
    /// out of send order; whichever arrived last in real time is the
    /// target.
    pub fn receive(&mut self, pose: CharacterPose) {
        self.target = pose;
    }

    /// Advance the rendered pose one frame toward the target.
    ///
    /// First-order low-pass: a fraction `rate * dt` (capped at 1) of the
    /// remaining distance is closed each frame. Trades a small constant
    /// lag for smoothness with zero overshoot.
    pub fn render(&mut self, dt: f32) {
        let alpha = smoothing_alpha(self.config.rate, dt);
        self.rendered.position = self.rendered.position.lerp(self.target.position, alpha);
        self.rendered.orientation = self.rendered.orientation.nlerp(self.target.orientation, alpha);
        self.rendered.look_pitch += (self.target.look_pitch - self.rendered.look_pitch) * alpha;
    }

    /// The pose to draw this frame.
    pub fn pose(&self) -> CharacterPose {
        self.rendered
    }

    /// The most recently received sample.
    pub fn target(&self) -> CharacterPose {
        self.target
    }

    /// Re-seed both target and rendered pose (spawn / respawn).
    pub fn activate(&mut self, spawn: CharacterPose) {
        self.target = spawn;
        self.rendered = spawn;
    }
}

// =============================================================================
// TESTS
// =============================================================================
