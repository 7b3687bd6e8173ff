//! Per-Tick Input and the Suspend Capability
//!
//! The host samples its input devices once per simulation tick and hands
//! the integrator a flat [`InputFrame`]. Device handling stays outside
//! this crate; an axis is just a float in [-1, 1] by the time it gets
//! here.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Raw input state for a single simulation tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputFrame {
    /// Strafe axis: -1 (left) to +1 (right).
    pub axis_x: f32,
    /// Forward axis: -1 (back) to +1 (forward).
    pub axis_y: f32,
    /// Horizontal pointer delta since the last tick.
    pub pointer_dx: f32,
    /// Vertical pointer delta since the last tick.
    pub pointer_dy: f32,
    /// Action flags (packed bits):
    /// - Bit 0: Jump pressed this tick
    /// - Bit 1: Run held
    /// - Bit 2-7: Reserved
    pub flags: u8,
}

impl InputFrame {
    /// Jump flag bit
    pub const FLAG_JUMP: u8 = 0x01;

    /// Run flag bit
    pub const FLAG_RUN: u8 = 0x02;

    /// Create a new empty input frame.
    pub const fn new() -> Self {
        Self {
            axis_x: 0.0,
            axis_y: 0.0,
            pointer_dx: 0.0,
            pointer_dy: 0.0,
            flags: 0,
        }
    }

    /// Create input with movement axes.
    pub const fn with_axes(axis_x: f32, axis_y: f32) -> Self {
        Self {
            axis_x,
            axis_y,
            pointer_dx: 0.0,
            pointer_dy: 0.0,
            flags: 0,
        }
    }

    /// Create input with a pointer delta.
    pub const fn with_pointer(pointer_dx: f32, pointer_dy: f32) -> Self {
        Self {
            axis_x: 0.0,
            axis_y: 0.0,
            pointer_dx,
            pointer_dy,
            flags: 0,
        }
    }

    /// Check if jump was pressed this tick.
    #[inline]
    pub fn jump_pressed(&self) -> bool {
        self.flags & Self::FLAG_JUMP != 0
    }

    /// Check if run is held.
    #[inline]
    pub fn run_held(&self) -> bool {
        self.flags & Self::FLAG_RUN != 0
    }

    /// Set jump flag.
    #[inline]
    pub fn set_jump(&mut self, pressed: bool) {
        if pressed {
            self.flags |= Self::FLAG_JUMP;
        } else {
            self.flags &= !Self::FLAG_JUMP;
        }
    }

    /// Set run flag.
    #[inline]
    pub fn set_run(&mut self, held: bool) {
        if held {
            self.flags |= Self::FLAG_RUN;
        } else {
            self.flags &= !Self::FLAG_RUN;
        }
    }

    /// Check if this is an idle frame (no axes, no pointer, no flags).
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.axis_x == 0.0
            && self.axis_y == 0.0
            && self.pointer_dx == 0.0
            && self.pointer_dy == 0.0
            && self.flags == 0
    }
}

/// Cloneable handle to the "input suspended" flag.
///
/// The pause menu owns the writer side; the local authority integrator
/// receives a clone at construction and polls it each tick. This is the
/// whole surface - no process-global menu state is consulted anywhere.
#[derive(Clone, Debug, Default)]
pub struct SuspendHandle(Arc<AtomicBool>);

impl SuspendHandle {
    /// Create a handle in the not-suspended state.
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a modal surface is swallowing gameplay input.
    #[inline]
    pub fn is_suspended(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Flip the flag. Called by whatever owns the modal surface.
    #[inline]
    pub fn set(&self, suspended: bool) {
        self.0.store(suspended, Ordering::Relaxed);
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_frame_flags() {
        let mut frame = InputFrame::new();
        assert!(!frame.jump_pressed());
        assert!(!frame.run_held());

        frame.set_jump(true);
        assert!(frame.jump_pressed());
        assert!(!frame.run_held());

        frame.set_run(true);
        assert!(frame.jump_pressed());
        assert!(frame.run_held());

        frame.set_jump(false);
        assert!(!frame.jump_pressed());
        assert!(frame.run_held());
    }

    #[test]
    fn test_input_frame_idle() {
        assert!(InputFrame::new().is_idle());
        assert!(!InputFrame::with_axes(0.5, 0.0).is_idle());
        assert!(!InputFrame::with_pointer(0.0, 1.0).is_idle());
    }

    #[test]
    fn test_suspend_handle_shared() {
        let writer = SuspendHandle::new();
        let reader = writer.clone();
        assert!(!reader.is_suspended());

        writer.set(true);
        assert!(reader.is_suspended());

        writer.set(false);
        assert!(!reader.is_suspended());
    }
}
