use std::ops::Mul;

use crate::{norm::Normed, quaternion::Quaternion, vector::Vec3, vector::Vec4};

/// A 4x4 matrix. `mRC` is the element in row `R` and column `C`.
///
/// Vectors are columns and are multiplied on the right (`M * v`), so the
/// translation of an affine matrix sits in `m03`, `m13` and `m23`. Fields are
/// declared column by column, which is also the order used for upload.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    pub m00: f64,
    pub m10: f64,
    pub m20: f64,
    pub m30: f64,

    pub m01: f64,
    pub m11: f64,
    pub m21: f64,
    pub m31: f64,

    pub m02: f64,
    pub m12: f64,
    pub m22: f64,
    pub m32: f64,

    pub m03: f64,
    pub m13: f64,
    pub m23: f64,
    pub m33: f64,
}

/// Near and far clipping plane distances of a projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipPlanes {
    pub near: f64,
    pub far: f64,
}

impl Default for ClipPlanes {
    fn default() -> Self {
        Self {
            near: Mat4::DEFAULT_NEAR,
            far: Mat4::DEFAULT_FAR,
        }
    }
}

impl Mat4 {
    #[rustfmt::skip]
    pub const IDENTITY: Self = Self::new(
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    );

    pub const DEFAULT_NEAR: f64 = 0.1;
    pub const DEFAULT_FAR: f64 = 100.0;
    /// Far plane sentinel for a perspective projection without far clipping.
    pub const INFINITE_FAR: f64 = -1.0;

    /// Arguments are given row by row, the way the matrix is written on paper.
    #[rustfmt::skip]
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        m00: f64, m01: f64, m02: f64, m03: f64,
        m10: f64, m11: f64, m12: f64, m13: f64,
        m20: f64, m21: f64, m22: f64, m23: f64,
        m30: f64, m31: f64, m32: f64, m33: f64,
    ) -> Self {
        Self {
            m00, m10, m20, m30,
            m01, m11, m21, m31,
            m02, m12, m22, m32,
            m03, m13, m23, m33,
        }
    }

    #[rustfmt::skip]
    pub const fn from_cols_array(m: [f64; 16]) -> Self {
        Self::new(
            m[0], m[4], m[8], m[12],
            m[1], m[5], m[9], m[13],
            m[2], m[6], m[10], m[14],
            m[3], m[7], m[11], m[15],
        )
    }

    #[rustfmt::skip]
    pub const fn to_cols_array(&self) -> [f64; 16] {
        [
            self.m00, self.m10, self.m20, self.m30,
            self.m01, self.m11, self.m21, self.m31,
            self.m02, self.m12, self.m22, self.m32,
            self.m03, self.m13, self.m23, self.m33,
        ]
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < 4 && col < 4 {
            Some(self.to_cols_array()[col * 4 + row])
        } else {
            None
        }
    }

    pub fn row(&self, row: usize) -> Option<Vec4> {
        Some(Vec4::new(
            self.get(row, 0)?,
            self.get(row, 1)?,
            self.get(row, 2)?,
            self.get(row, 3)?,
        ))
    }

    pub fn col(&self, col: usize) -> Option<Vec4> {
        Some(Vec4::new(
            self.get(0, col)?,
            self.get(1, col)?,
            self.get(2, col)?,
            self.get(3, col)?,
        ))
    }

    #[rustfmt::skip]
    pub const fn transpose(&self) -> Self {
        Self::new(
            self.m00, self.m10, self.m20, self.m30,
            self.m01, self.m11, self.m21, self.m31,
            self.m02, self.m12, self.m22, self.m32,
            self.m03, self.m13, self.m23, self.m33,
        )
    }

    /// Multiplies the elements at the same (row, column) position.
    ///
    /// This is not a transform composition; use `*` to chain transforms.
    pub fn component_mul(&self, rhs: &Mat4) -> Self {
        let (a, b) = (self.to_cols_array(), rhs.to_cols_array());
        let mut out = [0.0; 16];
        for (idx, value) in out.iter_mut().enumerate() {
            *value = a[idx] * b[idx];
        }
        Self::from_cols_array(out)
    }

    /// Creates a right-handed perspective projection with a [0, 1] depth range.
    ///
    /// `fov` is the vertical field of view in radians. Passing
    /// [`Mat4::INFINITE_FAR`] as `far` removes the far clipping plane.
    /// `near == far` divides by zero; callers must not pass it.
    pub fn from_perspective(fov: f64, aspect_ratio: f64, near: f64, far: f64) -> Self {
        let y_scale = 1.0 / (fov / 2.0).tan();
        let x_scale = y_scale / aspect_ratio;

        #[allow(clippy::float_cmp)]
        let neg_far_range = if far == Self::INFINITE_FAR {
            -1.0
        } else {
            far / (near - far)
        };

        Self {
            m00: x_scale,
            m11: y_scale,
            m22: neg_far_range,
            m32: -1.0,
            m23: near * neg_far_range,
            m33: 0.0,
            ..Self::IDENTITY
        }
    }

    /// Creates an off-center orthographic projection with a [0, 1] depth range.
    pub fn from_orthographic(
        left: f64,
        right: f64,
        bottom: f64,
        top: f64,
        near: f64,
        far: f64,
    ) -> Self {
        Self {
            m00: 2.0 / (right - left),
            m11: 2.0 / (top - bottom),
            m22: 1.0 / (near - far),
            m03: (left + right) / (left - right),
            m13: (top + bottom) / (bottom - top),
            m23: near / (near - far),
            ..Self::IDENTITY
        }
    }

    pub fn from_orthographic_planes(
        left: f64,
        right: f64,
        bottom: f64,
        top: f64,
        planes: ClipPlanes,
    ) -> Self {
        Self::from_orthographic(left, right, bottom, top, planes.near, planes.far)
    }

    /// Creates a view matrix for a camera at `camera` looking at `target`.
    /// `up` is the world up direction, usually [`Vec3::UP`].
    #[rustfmt::skip]
    pub fn from_look_at(camera: Vec3, target: Vec3, up: Vec3) -> Self {
        let z_axis = (camera - target).normalized();
        let x_axis = up.cross(&z_axis).normalized();
        let y_axis = z_axis.cross(&x_axis);

        Self::new(
            x_axis.x, x_axis.y, x_axis.z, -x_axis.dot(&camera),
            y_axis.x, y_axis.y, y_axis.z, -y_axis.dot(&camera),
            z_axis.x, z_axis.y, z_axis.z, -z_axis.dot(&camera),
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Creates a view matrix for a camera placed at `position` with `rotation`.
    pub fn from_view(position: Vec3, rotation: Quaternion) -> Self {
        rotation.conjugated().to_rotation_matrix() * (-position).to_translation_matrix()
    }

    pub fn determinant(&self) -> f64 {
        let (_, det) = self.adjugate();
        det
    }

    pub fn try_inverse(&self) -> Option<Self> {
        let (mut inv, det) = self.adjugate();

        if det == 0.0 {
            return None;
        }

        let inv_det = 1.0 / det;
        for value in inv.iter_mut() {
            *value *= inv_det;
        }
        Some(Self::from_cols_array(inv))
    }

    // Cofactor expansion over the column-major element array. Returns the
    // adjugate (in the same layout) together with the determinant.
    fn adjugate(&self) -> ([f64; 16], f64) {
        let m = self.to_cols_array();
        let mut inv = [0.0; 16];

        inv[0] = m[5] * m[10] * m[15] - m[5] * m[11] * m[14] - m[9] * m[6] * m[15]
            + m[9] * m[7] * m[14]
            + m[13] * m[6] * m[11]
            - m[13] * m[7] * m[10];

        inv[1] = -m[1] * m[10] * m[15] + m[1] * m[11] * m[14] + m[9] * m[2] * m[15]
            - m[9] * m[3] * m[14]
            - m[13] * m[2] * m[11]
            + m[13] * m[3] * m[10];

        inv[2] = m[1] * m[6] * m[15] - m[1] * m[7] * m[14] - m[5] * m[2] * m[15]
            + m[5] * m[3] * m[14]
            + m[13] * m[2] * m[7]
            - m[13] * m[3] * m[6];

        inv[3] = -m[1] * m[6] * m[11] + m[1] * m[7] * m[10] + m[5] * m[2] * m[11]
            - m[5] * m[3] * m[10]
            - m[9] * m[2] * m[7]
            + m[9] * m[3] * m[6];

        inv[4] = -m[4] * m[10] * m[15] + m[4] * m[11] * m[14] + m[8] * m[6] * m[15]
            - m[8] * m[7] * m[14]
            - m[12] * m[6] * m[11]
            + m[12] * m[7] * m[10];

        inv[5] = m[0] * m[10] * m[15] - m[0] * m[11] * m[14] - m[8] * m[2] * m[15]
            + m[8] * m[3] * m[14]
            + m[12] * m[2] * m[11]
            - m[12] * m[3] * m[10];

        inv[6] = -m[0] * m[6] * m[15] + m[0] * m[7] * m[14] + m[4] * m[2] * m[15]
            - m[4] * m[3] * m[14]
            - m[12] * m[2] * m[7]
            + m[12] * m[3] * m[6];

        inv[7] = m[0] * m[6] * m[11] - m[0] * m[7] * m[10] - m[4] * m[2] * m[11]
            + m[4] * m[3] * m[10]
            + m[8] * m[2] * m[7]
            - m[8] * m[3] * m[6];

        inv[8] = m[4] * m[9] * m[15] - m[4] * m[11] * m[13] - m[8] * m[5] * m[15]
            + m[8] * m[7] * m[13]
            + m[12] * m[5] * m[11]
            - m[12] * m[7] * m[9];

        inv[9] = -m[0] * m[9] * m[15] + m[0] * m[11] * m[13] + m[8] * m[1] * m[15]
            - m[8] * m[3] * m[13]
            - m[12] * m[1] * m[11]
            + m[12] * m[3] * m[9];

        inv[10] = m[0] * m[5] * m[15] - m[0] * m[7] * m[13] - m[4] * m[1] * m[15]
            + m[4] * m[3] * m[13]
            + m[12] * m[1] * m[7]
            - m[12] * m[3] * m[5];

        inv[11] = -m[0] * m[5] * m[11] + m[0] * m[7] * m[9] + m[4] * m[1] * m[11]
            - m[4] * m[3] * m[9]
            - m[8] * m[1] * m[7]
            + m[8] * m[3] * m[5];

        inv[12] = -m[4] * m[9] * m[14] + m[4] * m[10] * m[13] + m[8] * m[5] * m[14]
            - m[8] * m[6] * m[13]
            - m[12] * m[5] * m[10]
            + m[12] * m[6] * m[9];

        inv[13] = m[0] * m[9] * m[14] - m[0] * m[10] * m[13] - m[8] * m[1] * m[14]
            + m[8] * m[2] * m[13]
            + m[12] * m[1] * m[10]
            - m[12] * m[2] * m[9];

        inv[14] = -m[0] * m[5] * m[14] + m[0] * m[6] * m[13] + m[4] * m[1] * m[14]
            - m[4] * m[2] * m[13]
            - m[12] * m[1] * m[6]
            + m[12] * m[2] * m[5];

        inv[15] = m[0] * m[5] * m[10] - m[0] * m[6] * m[9] - m[4] * m[1] * m[10]
            + m[4] * m[2] * m[9]
            + m[8] * m[1] * m[6]
            - m[8] * m[2] * m[5];

        let det = m[0] * inv[0] + m[1] * inv[4] + m[2] * inv[8] + m[3] * inv[12];

        (inv, det)
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Standard matrix product, `(a * b) * v == a * (b * v)`.
impl Mul<Mat4> for Mat4 {
    type Output = Self;

    fn mul(self, rhs: Mat4) -> Self::Output {
        let (a, b) = (self.to_cols_array(), rhs.to_cols_array());
        let mut out = [0.0; 16];

        for col_idx in 0..4 {
            for row_idx in 0..4 {
                let mut value = 0.0;
                for idx in 0..4 {
                    value += a[idx * 4 + row_idx] * b[col_idx * 4 + idx];
                }
                out[col_idx * 4 + row_idx] = value;
            }
        }

        Self::from_cols_array(out)
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;

    fn mul(self, rhs: Vec4) -> Self::Output {
        Vec4::new(
            self.m00 * rhs.x + self.m01 * rhs.y + self.m02 * rhs.z + self.m03 * rhs.w,
            self.m10 * rhs.x + self.m11 * rhs.y + self.m12 * rhs.z + self.m13 * rhs.w,
            self.m20 * rhs.x + self.m21 * rhs.y + self.m22 * rhs.z + self.m23 * rhs.w,
            self.m30 * rhs.x + self.m31 * rhs.y + self.m32 * rhs.z + self.m33 * rhs.w,
        )
    }
}

/// Column-major `f32` layout expected by shader uniforms.
impl From<Mat4> for [[f32; 4]; 4] {
    fn from(value: Mat4) -> Self {
        let m = value.to_cols_array();
        let mut out = [[0.0f32; 4]; 4];
        for (col_idx, col) in out.iter_mut().enumerate() {
            for (row_idx, element) in col.iter_mut().enumerate() {
                *element = m[col_idx * 4 + row_idx] as f32;
            }
        }
        out
    }
}
