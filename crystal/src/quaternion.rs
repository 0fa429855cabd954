use std::ops::{Add, Mul, Sub};

use crate::mat4::Mat4;
use crate::norm::Normed;
use crate::vector::Vec3;

/// A right-handed 3D rotation.
///
/// Operations never normalize: a rotation quaternion is expected to have a
/// norm of one, and the results for anything else are undefined.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Quaternion {
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    /// Rotation of `angle` radians around `axis`. The axis is normalized first.
    pub fn from_axis_angle(axis: Vec3, angle: f64) -> Self {
        let half = angle / 2.0;
        let mut scaled = axis.normalized();
        scaled.scale_mut(half.sin());

        Self::new(scaled.x, scaled.y, scaled.z, half.cos())
    }

    pub fn conjugated(&self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    pub fn rotate(&self, vector: Vec3) -> Vec3 {
        let pure = Quaternion::new(vector.x, vector.y, vector.z, 0.0);
        let res = *self * pure * self.conjugated();
        Vec3::new(res.x, res.y, res.z)
    }

    /// Creates a 4x4 rotation matrix from this quaternion.
    ///
    /// The quaternion must be a unit quaternion; a zero-length or
    /// denormalized input produces a matrix that is not a rotation.
    pub fn to_rotation_matrix(&self) -> Mat4 {
        let xx = self.x * self.x;
        let yy = self.y * self.y;
        let zz = self.z * self.z;
        let xy = self.x * self.y;
        let wz = self.z * self.w;
        let xz = self.z * self.x;
        let wy = self.y * self.w;
        let yz = self.y * self.z;
        let wx = self.x * self.w;

        Mat4 {
            m00: 1.0 - 2.0 * (yy + zz),
            m10: 2.0 * (xy + wz),
            m20: 2.0 * (xz - wy),

            m01: 2.0 * (xy - wz),
            m11: 1.0 - 2.0 * (zz + xx),
            m21: 2.0 * (yz + wx),

            m02: 2.0 * (xz + wy),
            m12: 2.0 * (yz - wx),
            m22: 1.0 - 2.0 * (yy + xx),
            ..Mat4::IDENTITY
        }
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<[f64; 4]> for Quaternion {
    fn from(data: [f64; 4]) -> Self {
        let [x, y, z, w] = data;
        Self::new(x, y, z, w)
    }
}

impl Add<f64> for Quaternion {
    type Output = Self;

    fn add(self, rhs: f64) -> Self::Output {
        Self::new(self.x + rhs, self.y + rhs, self.z + rhs, self.w + rhs)
    }
}

impl Sub<f64> for Quaternion {
    type Output = Self;

    fn sub(self, rhs: f64) -> Self::Output {
        Self::new(self.x - rhs, self.y - rhs, self.z - rhs, self.w - rhs)
    }
}

/// Hamilton product; `a * b` applies `b` first, then `a`.
impl Mul<Quaternion> for Quaternion {
    type Output = Self;

    #[rustfmt::skip]
    fn mul(self, rhs: Quaternion) -> Self::Output {
        Self::new(
            self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            self.w * rhs.y + self.y * rhs.w + self.z * rhs.x - self.x * rhs.z,
            self.w * rhs.z + self.z * rhs.w + self.x * rhs.y - self.y * rhs.x,
            self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
        )
    }
}

impl Mul<Vec3> for Quaternion {
    type Output = Vec3;

    fn mul(self, rhs: Vec3) -> Self::Output {
        self.rotate(rhs)
    }
}

impl Normed for Quaternion {
    fn norm_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w
    }

    fn scale_mut(&mut self, n: f64) {
        self.x *= n;
        self.y *= n;
        self.z *= n;
        self.w *= n;
    }

    fn unscale_mut(&mut self, n: f64) {
        self.x /= n;
        self.y /= n;
        self.z /= n;
        self.w /= n;
    }
}
