//! 3D Float Vector
//!
//! World-space positions and displacements. Y is up; horizontal movement
//! lives in the XZ plane.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// 3D vector with f32 components.
#[derive(Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component
    pub x: f32,
    /// Y component (up)
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl Vec3 {
    /// Zero vector
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };

    /// Unit vector pointing up (+Y)
    pub const UP: Self = Self { x: 0.0, y: 1.0, z: 0.0 };

    /// Unit vector pointing down (-Y)
    pub const DOWN: Self = Self { x: 0.0, y: -1.0, z: 0.0 };

    /// Unit vector pointing forward (+Z)
    pub const FORWARD: Self = Self { x: 0.0, y: 0.0, z: 1.0 };

    /// Unit vector pointing right (+X)
    pub const RIGHT: Self = Self { x: 1.0, y: 0.0, z: 0.0 };

    /// Create a new vector.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Scale by a scalar.
    #[inline]
    pub fn scale(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
            z: self.z * scalar,
        }
    }

    /// Squared length (avoids sqrt - prefer this for comparisons).
    #[inline]
    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Length (magnitude). Prefer `length_squared` when possible.
    #[inline]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Squared distance to another point.
    #[inline]
    pub fn distance_squared(self, other: Self) -> f32 {
        (self - other).length_squared()
    }

    /// Distance to another point. Prefer `distance_squared` when possible.
    #[inline]
    pub fn distance(self, other: Self) -> f32 {
        self.distance_squared(other).sqrt()
    }

    /// Normalize to unit length.
    /// Returns ZERO if length is zero.
    #[inline]
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len == 0.0 {
            return Self::ZERO;
        }
        self.scale(1.0 / len)
    }

    /// Dot product with another vector.
    #[inline]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Copy with the Y component zeroed (ground-plane projection).
    #[inline]
    pub fn horizontal(self) -> Self {
        Self { y: 0.0, ..self }
    }

    /// Linear interpolation between two vectors.
    /// t = 0 returns self, t = 1 returns other.
    #[inline]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
        }
    }

    /// Body-local forward direction for a yaw angle in degrees.
    ///
    /// Yaw 0 faces +Z; positive yaw turns toward +X.
    #[inline]
    pub fn forward_from_yaw(yaw_deg: f32) -> Self {
        let rad = yaw_deg.to_radians();
        Self {
            x: rad.sin(),
            y: 0.0,
            z: rad.cos(),
        }
    }

    /// Body-local right direction for a yaw angle in degrees.
    #[inline]
    pub fn right_from_yaw(yaw_deg: f32) -> Self {
        let rad = yaw_deg.to_radians();
        Self {
            x: rad.cos(),
            y: 0.0,
            z: -rad.sin(),
        }
    }

    /// Convert to a fixed-order float array for the wire format.
    #[inline]
    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Build from a wire-format float array.
    #[inline]
    pub fn from_array(a: [f32; 3]) -> Self {
        Self::new(a[0], a[1], a[2])
    }
}

// Operator overloads for ergonomics
impl Add for Vec3 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Vec3 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f32) -> Self {
        self.scale(rhs)
    }
}

impl fmt::Debug for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vec3({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_constants() {
        assert_eq!(Vec3::ZERO.length(), 0.0);
        assert_eq!(Vec3::UP.y, 1.0);
        assert_eq!(Vec3::FORWARD.z, 1.0);
        assert_eq!(Vec3::RIGHT.x, 1.0);
    }

    #[test]
    fn test_vec3_add_sub() {
        let a = Vec3::new(3.0, 4.0, 5.0);
        let b = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(a + b, Vec3::new(4.0, 6.0, 8.0));
        assert_eq!(a - b, Vec3::new(2.0, 2.0, 2.0));
    }

    #[test]
    fn test_vec3_length() {
        // 3-4-12 -> 13
        let v = Vec3::new(3.0, 4.0, 12.0);
        assert_eq!(v.length_squared(), 169.0);
        assert!((v.length() - 13.0).abs() < 1e-6);
    }

    #[test]
    fn test_vec3_normalize() {
        let v = Vec3::new(3.0, 0.0, 4.0);
        let norm = v.normalize();
        assert!((norm.length() - 1.0).abs() < 1e-6);

        // Zero vector normalizes to zero
        assert_eq!(Vec3::ZERO.normalize(), Vec3::ZERO);
    }

    #[test]
    fn test_vec3_horizontal() {
        let v = Vec3::new(1.0, 5.0, 2.0);
        assert_eq!(v.horizontal(), Vec3::new(1.0, 0.0, 2.0));
    }

    #[test]
    fn test_vec3_lerp() {
        let a = Vec3::ZERO;
        let b = Vec3::new(10.0, -10.0, 20.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Vec3::new(5.0, -5.0, 10.0));
    }

    #[test]
    fn test_yaw_basis() {
        // Yaw 0: forward is +Z, right is +X
        let f0 = Vec3::forward_from_yaw(0.0);
        assert!((f0.z - 1.0).abs() < 1e-6 && f0.x.abs() < 1e-6);
        let r0 = Vec3::right_from_yaw(0.0);
        assert!((r0.x - 1.0).abs() < 1e-6 && r0.z.abs() < 1e-6);

        // Yaw 90: forward has turned to +X
        let f90 = Vec3::forward_from_yaw(90.0);
        assert!((f90.x - 1.0).abs() < 1e-6 && f90.z.abs() < 1e-6);

        // Basis stays orthonormal at arbitrary yaw
        let f = Vec3::forward_from_yaw(37.5);
        let r = Vec3::right_from_yaw(37.5);
        assert!(f.dot(r).abs() < 1e-6);
        assert!((f.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_wire_array_order() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.to_array(), [1.0, 2.0, 3.0]);
        assert_eq!(Vec3::from_array([1.0, 2.0, 3.0]), v);
    }
}
