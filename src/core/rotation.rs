//! Body Rotation and Smoothing Helpers
//!
//! Characters only ever rotate about the vertical axis, but the wire
//! format carries a full unit quaternion so the transport stays agnostic
//! to how the body transform is authored.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unit quaternion (x, y, z, w).
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quat {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
    /// Scalar component
    pub w: f32,
}

impl Quat {
    /// Identity rotation.
    pub const IDENTITY: Self = Self { x: 0.0, y: 0.0, z: 0.0, w: 1.0 };

    /// Create from raw components. Callers are responsible for unit length.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Rotation about the vertical axis by `yaw_deg` degrees.
    #[inline]
    pub fn from_yaw_deg(yaw_deg: f32) -> Self {
        let half = yaw_deg.to_radians() * 0.5;
        Self {
            x: 0.0,
            y: half.sin(),
            z: 0.0,
            w: half.cos(),
        }
    }

    /// Extract the yaw angle in degrees.
    ///
    /// Exact for yaw-only rotations; an approximation otherwise.
    #[inline]
    pub fn yaw_deg(self) -> f32 {
        (2.0 * self.y.atan2(self.w)).to_degrees()
    }

    /// Dot product with another quaternion.
    #[inline]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Normalize to unit length. Returns identity if length is zero.
    #[inline]
    pub fn normalize(self) -> Self {
        let len = self.dot(self).sqrt();
        if len == 0.0 {
            return Self::IDENTITY;
        }
        let inv = 1.0 / len;
        Self {
            x: self.x * inv,
            y: self.y * inv,
            z: self.z * inv,
            w: self.w * inv,
        }
    }

    /// Normalized linear interpolation toward `other`.
    ///
    /// Takes the shortest arc (sign-corrects the target when the dot
    /// product is negative). t = 0 returns self, t = 1 returns other.
    #[inline]
    pub fn nlerp(self, other: Self, t: f32) -> Self {
        let other = if self.dot(other) < 0.0 {
            Self::new(-other.x, -other.y, -other.z, -other.w)
        } else {
            other
        };
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
            w: self.w + (other.w - self.w) * t,
        }
        .normalize()
    }

    /// Angular distance to another rotation, in degrees.
    #[inline]
    pub fn angle_to_deg(self, other: Self) -> f32 {
        let d = self.dot(other).abs().min(1.0);
        (2.0 * d.acos()).to_degrees()
    }

    /// Convert to a fixed-order float array for the wire format.
    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }

    /// Build from a wire-format float array.
    #[inline]
    pub fn from_array(a: [f32; 4]) -> Self {
        Self::new(a[0], a[1], a[2], a[3])
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl fmt::Debug for Quat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Quat({:.3}, {:.3}, {:.3}, {:.3})",
            self.x, self.y, self.z, self.w
        )
    }
}

/// Exponential smoothing factor for one frame.
///
/// Clamped to [0, 1] so a large `rate * dt` steps straight onto the
/// target instead of overshooting past it.
#[inline]
pub fn smoothing_alpha(rate: f32, dt: f32) -> f32 {
    (rate * dt).clamp(0.0, 1.0)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaw_roundtrip() {
        for deg in [-170.0f32, -90.0, -30.0, 0.0, 45.0, 90.0, 179.0] {
            let q = Quat::from_yaw_deg(deg);
            assert!((q.yaw_deg() - deg).abs() < 1e-3, "yaw {} roundtrip", deg);
            assert!((q.dot(q) - 1.0).abs() < 1e-6, "yaw {} unit length", deg);
        }
    }

    #[test]
    fn test_nlerp_endpoints() {
        let a = Quat::from_yaw_deg(10.0);
        let b = Quat::from_yaw_deg(70.0);
        assert!((a.nlerp(b, 0.0).yaw_deg() - 10.0).abs() < 1e-3);
        assert!((a.nlerp(b, 1.0).yaw_deg() - 70.0).abs() < 1e-3);
    }

    #[test]
    fn test_nlerp_shortest_arc() {
        // 170 -> -170 is 20 degrees through the back, not 340 around.
        let a = Quat::from_yaw_deg(170.0);
        let b = Quat::from_yaw_deg(-170.0);
        let mid = a.nlerp(b, 0.5);
        assert!(a.angle_to_deg(mid) < 15.0, "took the long way around");
    }

    #[test]
    fn test_nlerp_stays_unit() {
        let a = Quat::from_yaw_deg(0.0);
        let b = Quat::from_yaw_deg(120.0);
        for i in 0..=10 {
            let q = a.nlerp(b, i as f32 / 10.0);
            assert!((q.dot(q) - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_smoothing_alpha_clamps() {
        assert_eq!(smoothing_alpha(15.0, 0.0), 0.0);
        assert!((smoothing_alpha(15.0, 1.0 / 60.0) - 0.25).abs() < 1e-6);
        // Huge frame spike steps exactly onto the target
        assert_eq!(smoothing_alpha(15.0, 1.0), 1.0);
    }

    #[test]
    fn test_angle_to_deg() {
        let a = Quat::from_yaw_deg(0.0);
        let b = Quat::from_yaw_deg(90.0);
        assert!((a.angle_to_deg(b) - 90.0).abs() < 1e-3);
        assert!(a.angle_to_deg(a) < 1e-3);
    }
}
