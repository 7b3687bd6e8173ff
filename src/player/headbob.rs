//! Camera Head Bob
//!
//! Local-player camera offset driven by ground speed: a small sinusoid
//! while walking or running, a dip when landing from a jump, and a
//! footstep pulse once per bob cycle for the audio layer. Remote proxies
//! never bob - their camera is not rendered.

use std::f32::consts::{PI, TAU};

use crate::core::rotation::smoothing_alpha;
use crate::core::vec3::Vec3;

/// Head bob tuning.
#[derive(Debug, Clone)]
pub struct HeadBobConfig {
    /// Walk amplitude (units of camera offset).
    pub walk_amplitude: f32,
    /// Walk frequency (cycles/sec scale).
    pub walk_frequency: f32,
    /// Run amplitude.
    pub run_amplitude: f32,
    /// Run frequency.
    pub run_frequency: f32,
    /// Landing dip amplitude.
    pub land_amplitude: f32,
    /// Landing dip duration (sec).
    pub land_duration: f32,
    /// How hard the offset chases its target (1/sec).
    pub smooth_rate: f32,
    /// Below this horizontal speed the camera recenters.
    pub min_bob_speed: f32,
}

impl Default for HeadBobConfig {
    fn default() -> Self {
        Self {
            walk_amplitude: 0.015,
            walk_frequency: 8.0,
            run_amplitude: 0.03,
            run_frequency: 12.0,
            land_amplitude: 0.05,
            land_duration: 0.2,
            smooth_rate: 10.0,
            min_bob_speed: 0.1,
        }
    }
}

/// One frame of head bob output.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HeadBobFrame {
    /// Camera-local offset to add to the pivot position.
    pub offset: Vec3,
    /// True on the frame a bob cycle completes (footstep cue).
    pub footstep: bool,
}

/// Head bob oscillator state.
#[derive(Debug)]
pub struct HeadBob {
    config: HeadBobConfig,
    timer: f32,
    cycles: u32,
    offset: Vec3,
    land_timer: f32,
    was_grounded: bool,
    aiming: bool,
}

impl HeadBob {
    /// Create an idle oscillator.
    pub fn new(config: HeadBobConfig) -> Self {
        Self {
            config,
            timer: 0.0,
            cycles: 0,
            offset: Vec3::ZERO,
            land_timer: 0.0,
            was_grounded: true,
            aiming: false,
        }
    }

    /// Aiming recenters the camera and pauses the bob.
    pub fn set_aiming(&mut self, aiming: bool) {
        self.aiming = aiming;
    }

    /// Drop all oscillator state and recenter immediately.
    pub fn reset(&mut self) {
        self.timer = 0.0;
        self.cycles = 0;
        self.offset = Vec3::ZERO;
        self.land_timer = 0.0;
    }

    /// Advance one rendered frame.
    ///
    /// `horizontal_speed` is the body's ground-plane speed; `grounded`
    /// and `running` come from the integrator and input layer.
    pub fn tick(
        &mut self,
        dt: f32,
        horizontal_speed: f32,
        grounded: bool,
        running: bool,
    ) -> HeadBobFrame {
        // Landing edge starts the dip
        if !self.was_grounded && grounded {
            self.land_timer = self.config.land_duration;
        }
        self.was_grounded = grounded;

        let mut footstep = false;
        let mut target = Vec3::ZERO;

        if !self.aiming && grounded && horizontal_speed > self.config.min_bob_speed {
            let (amplitude, frequency) = if running {
                (self.config.run_amplitude, self.config.run_frequency)
            } else {
                (self.config.walk_amplitude, self.config.walk_frequency)
            };

            self.timer += dt * frequency;
            target = Vec3::new(
                self.timer.cos() * amplitude,
                // Vertical bob at twice the rate, slightly less pronounced
                (self.timer * 2.0).sin() * amplitude * 0.8,
                0.0,
            );

            let completed = (self.timer / TAU) as u32;
            if completed > self.cycles {
                self.cycles = completed;
                footstep = true;
            }
        } else {
            self.timer = 0.0;
            self.cycles = 0;
        }

        // Landing dip rides on top of whatever the bob is doing
        if self.land_timer > 0.0 {
            let progress = 1.0 - self.land_timer / self.config.land_duration;
            target.y -= (progress * PI).sin() * self.config.land_amplitude;
            self.land_timer -= dt;
        }

        self.offset = self
            .offset
            .lerp(target, smoothing_alpha(self.config.smooth_rate, dt));

        HeadBobFrame {
            offset: self.offset,
            footstep,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
